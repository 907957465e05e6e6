//! # ask-ollama navigator
//!
//! Title-path navigation over heading-structured Markdown documents.
//!
//! A document is treated as a flat list of lines in which `#`-prefixed lines
//! mark section boundaries. Navigation walks a list of titles, one per
//! heading level, and narrows the document to the matching subtree at each
//! step:
//!
//! ```text
//! ["API", "Generate a completion", "Parameters"]
//!     │
//!     ├──> level 1: find "# API"                    → scope = API section
//!     ├──> level 2: find "## Generate a completion" → scope = that subsection
//!     └──> level 3: find "### Parameters"           → scope = parameters block
//! ```
//!
//! Failures never panic or propagate: they come back in the
//! [`NavigationResult`] with per-level status codes and the sibling titles
//! that were available where the walk stopped.
//!
//! ## Example
//!
//! ```rust
//! use ask_ollama_navigator::navigate;
//!
//! let doc = "# Guide\nintro\n## Install\nrun it\n## Usage\ncall it\n";
//! let result = navigate(doc, &["Guide", "Usage"], None);
//!
//! assert!(result.success);
//! assert!(result.content.contains("call it"));
//! assert_eq!(result.available_titles, vec!["Install", "Usage"]);
//! ```

mod error;
mod navigate;
mod section;

pub use error::{LookupErrorKind, LookupFailure};
pub use navigate::{navigate, NavigationResult, StepStatus, TRUNCATION_MARKER};
pub use section::{find_section, titles_at_level, Section};
