use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a single-level section lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    /// Heading level below 1
    InvalidLevel,
    /// No heading at the requested level carries the requested title
    TitleNotFound,
    /// The scan itself broke (malformed heading, pattern build failure)
    ProcessingError,
}

impl LookupErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidLevel => "invalid_level",
            Self::TitleNotFound => "title_not_found",
            Self::ProcessingError => "processing_error",
        }
    }
}

impl fmt::Display for LookupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed section lookup, carrying the sibling titles seen at that level.
///
/// `available_titles` is empty for [`LookupErrorKind::InvalidLevel`] and
/// [`LookupErrorKind::ProcessingError`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct LookupFailure {
    pub kind: LookupErrorKind,
    pub message: String,
    pub available_titles: Vec<String>,
}

impl LookupFailure {
    pub(crate) fn invalid_level() -> Self {
        Self {
            kind: LookupErrorKind::InvalidLevel,
            message: "heading level must be positive".to_string(),
            available_titles: Vec::new(),
        }
    }

    pub(crate) fn title_not_found(
        title: &str,
        level: usize,
        available_titles: Vec<String>,
    ) -> Self {
        Self {
            kind: LookupErrorKind::TitleNotFound,
            message: format!("Title '{title}' not found at level {level}"),
            available_titles,
        }
    }

    pub(crate) fn processing(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::ProcessingError,
            message: message.into(),
            available_titles: Vec::new(),
        }
    }
}
