//! `get_api_doc_section` payloads.

use std::fmt::Write as _;
use std::path::Path;

use ask_ollama_navigator::{navigate, NavigationResult, StepStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocSection {
    /// Human-readable query report
    pub metadata: String,
    pub truncation: Truncation,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub original_length: usize,
    pub max_length: usize,
    pub is_truncated: bool,
}

/// Read the documentation file and resolve `titles` in it.
///
/// A read failure is not an error: it yields the same payload shape with a
/// configuration hint in `metadata`.
pub async fn load_section(path: &Path, titles: &[String], max_length: usize) -> DocSection {
    match tokio::fs::read_to_string(path).await {
        Ok(document) => section_from_document(&document, titles, max_length),
        Err(err) => {
            log::warn!("Failed to read API doc {}: {err}", path.display());
            unreadable_document(path, &err.to_string(), titles, max_length)
        }
    }
}

pub fn section_from_document(document: &str, titles: &[String], max_length: usize) -> DocSection {
    let result = navigate(document, titles, Some(max_length));
    DocSection {
        metadata: render_metadata(&result),
        truncation: Truncation {
            original_length: result.content_length,
            max_length,
            is_truncated: result.is_truncated(),
        },
        content: result.content,
    }
}

pub fn unreadable_document(
    path: &Path,
    reason: &str,
    titles: &[String],
    max_length: usize,
) -> DocSection {
    let mut metadata = String::from("Query failed\n");
    let _ = writeln!(metadata, "Error: failed to read the documentation file - {reason}");
    metadata.push_str("Deepest level: 0\nQuery path:\n");
    if !titles.is_empty() {
        let _ = writeln!(metadata, "  {} - not queried", titles.join(" > "));
    }
    metadata.push_str("Available titles at current level: unavailable\n");
    metadata.push_str("Available titles at next level: unavailable\n");
    metadata.push_str("\nConfiguration check:\n");
    metadata.push_str("Please verify api_doc.file_path in config.json\n");
    let _ = write!(metadata, "Currently set to: {}", path.display());

    DocSection {
        metadata,
        truncation: Truncation {
            original_length: 0,
            max_length,
            is_truncated: false,
        },
        content: String::new(),
    }
}

fn render_metadata(result: &NavigationResult) -> String {
    let mut out = String::new();
    if result.success {
        out.push_str("Query succeeded\n");
        let _ = writeln!(out, "Info: {}", result.message);
    } else {
        out.push_str("Query failed\n");
        let _ = writeln!(
            out,
            "Suggestion: {}. Check the title names against the available titles below",
            result.message
        );
    }
    let _ = writeln!(out, "Deepest level: {}", result.current_level);

    out.push_str("Query path:\n");
    for (title, status) in result.query_path.iter().zip(&result.status_list) {
        let label = match status {
            StepStatus::Resolved => "found",
            StepStatus::Failed => "title not found",
            StepStatus::NotAttempted => "not queried",
        };
        let _ = writeln!(out, "  {title} - {label}");
    }

    out.push_str("Available titles at current level:\n");
    for title in &result.available_titles {
        let _ = writeln!(out, "  - {title}");
    }
    out.push_str("Available titles at next level:");
    for title in &result.next_level_titles {
        let _ = write!(out, "\n  - {title}");
    }
    out
}
