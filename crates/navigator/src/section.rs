use regex::Regex;

use crate::error::LookupFailure;

/// A section resolved by [`find_section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Ancestor context followed by the section window, blank lines removed
    pub content: String,
    /// Full heading line, e.g. `"## Usage"`
    pub title: String,
    /// All titles at the searched level, in document order
    pub available_titles: Vec<String>,
}

fn heading_pattern(level: usize) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}\s+(.+?)\s*$", "#".repeat(level)))
}

fn heading_marker(level: usize) -> String {
    format!("{} ", "#".repeat(level))
}

fn collect_titles(document: &str, pattern: &Regex) -> Vec<String> {
    document
        .split('\n')
        .filter_map(|line| pattern.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// List every heading title at exactly `level`, in document order.
///
/// Duplicates are kept. Level 0 yields nothing.
pub fn titles_at_level(document: &str, level: usize) -> Vec<String> {
    if level < 1 {
        return Vec::new();
    }
    match heading_pattern(level) {
        Ok(pattern) => collect_titles(document, &pattern),
        Err(err) => {
            log::warn!("heading pattern for level {level} failed to build: {err}");
            Vec::new()
        }
    }
}

/// Locate the first heading at `level` titled `target_title` and slice out its section.
///
/// The section runs from the heading up to (not including) the next heading
/// of the same level. Every line before the first heading of that level is
/// prepended so ancestor titles and leading prose stay visible to nested
/// lookups.
pub fn find_section(
    document: &str,
    target_title: &str,
    level: usize,
) -> Result<Section, LookupFailure> {
    if level < 1 {
        return Err(LookupFailure::invalid_level());
    }

    let pattern = heading_pattern(level).map_err(|err| {
        LookupFailure::processing(format!(
            "heading pattern for level {level} failed to build: {err}"
        ))
    })?;
    let available_titles = collect_titles(document, &pattern);
    let marker = heading_marker(level);
    let lines: Vec<&str> = document.split('\n').collect();

    let mut first_sibling: Option<usize> = None;
    let mut target: Option<usize> = None;
    let mut end = lines.len();
    for (idx, line) in lines.iter().enumerate() {
        if !line.starts_with(&marker) {
            continue;
        }
        let title = pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or_else(|| {
                LookupFailure::processing(format!(
                    "malformed heading at line {}: {line:?}",
                    idx + 1
                ))
            })?;
        first_sibling.get_or_insert(idx);
        if target.is_some() {
            end = idx;
            break;
        }
        if title == target_title {
            target = Some(idx);
        }
    }

    let Some(target) = target else {
        return Err(LookupFailure::title_not_found(
            target_title,
            level,
            available_titles,
        ));
    };
    let first_sibling = first_sibling.unwrap_or(target);

    // Nothing before the first sibling can be a heading of this level, so the
    // prefix holds exactly the shallower headings, deeper headings and prose.
    let content = lines[..first_sibling]
        .iter()
        .chain(&lines[target..end])
        .filter(|line| !line.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Section {
        content,
        title: format!("{marker}{target_title}"),
        available_titles,
    })
}
