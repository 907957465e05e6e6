use serde::{Serialize, Serializer};

use crate::section::{find_section, titles_at_level};

/// Appended to content cut at `max_length`; counted inside the budget.
pub const TRUNCATION_MARKER: &str = "\n... (content truncated)";

/// Per-element outcome of a title path walk.
///
/// Serialized as `1`, `0` and `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Resolved,
    Failed,
    NotAttempted,
}

impl StepStatus {
    pub fn code(self) -> i8 {
        match self {
            Self::Resolved => 1,
            Self::Failed => 0,
            Self::NotAttempted => -1,
        }
    }
}

impl Serialize for StepStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// Outcome of [`navigate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationResult {
    pub success: bool,
    /// Resolved scope, possibly truncated
    pub content: String,
    /// Length of `content` in chars before truncation
    pub content_length: usize,
    pub current_level: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_level: Option<usize>,
    pub message: String,
    pub status_list: Vec<StepStatus>,
    pub query_path: Vec<String>,
    pub available_titles: Vec<String>,
    pub next_level_titles: Vec<String>,
}

impl NavigationResult {
    pub fn is_truncated(&self) -> bool {
        self.content.chars().count() < self.content_length
    }
}

/// Walk `title_path` one heading level per element, narrowing the document at each step.
///
/// The first title is looked up at level 1, the second at level 2, and so
/// on. The walk stops at the first failing element; the returned content is
/// then the last scope that did resolve. An empty path succeeds at level 0
/// with the whole document and its top-level titles as `next_level_titles`.
pub fn navigate<S: AsRef<str>>(
    document: &str,
    title_path: &[S],
    max_length: Option<usize>,
) -> NavigationResult {
    let query_path: Vec<String> = title_path
        .iter()
        .map(|title| title.as_ref().to_string())
        .collect();
    let mut current = document.to_string();
    let mut current_level = 0usize;
    let mut status_list = Vec::with_capacity(query_path.len());
    let mut available_titles = Vec::new();

    for title in &query_path {
        current_level += 1;
        match find_section(&current, title, current_level) {
            Ok(section) => {
                current = section.content;
                available_titles = section.available_titles;
                status_list.push(StepStatus::Resolved);
            }
            Err(failure) => {
                status_list.push(StepStatus::Failed);
                status_list.resize(query_path.len(), StepStatus::NotAttempted);
                let message = format!("Failed at level {current_level}: {}", failure.message);
                log::debug!("navigation stopped ({}): {message}", failure.kind);
                let (content, content_length) = truncate_content(current, max_length);
                return NavigationResult {
                    success: false,
                    content,
                    content_length,
                    current_level,
                    failed_level: Some(current_level),
                    message,
                    status_list,
                    query_path,
                    available_titles: failure.available_titles,
                    next_level_titles: Vec::new(),
                };
            }
        }
    }

    let next_level_titles = titles_at_level(&current, current_level + 1);
    let message = if query_path.is_empty() {
        "Empty title path: returning the whole document".to_string()
    } else {
        format!("Found: {}", query_path.join(" > "))
    };
    let (content, content_length) = truncate_content(current, max_length);
    NavigationResult {
        success: true,
        content,
        content_length,
        current_level,
        failed_level: None,
        message,
        status_list,
        query_path,
        available_titles,
        next_level_titles,
    }
}

fn truncate_content(content: String, max_length: Option<usize>) -> (String, usize) {
    let length = content.chars().count();
    let Some(max_length) = max_length else {
        return (content, length);
    };
    if length <= max_length {
        return (content, length);
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_length < marker_len {
        return (TRUNCATION_MARKER.chars().take(max_length).collect(), length);
    }
    let mut out: String = content.chars().take(max_length - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    (out, length)
}
