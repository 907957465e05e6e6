use ask_ollama_navigator::{find_section, navigate, titles_at_level, StepStatus, TRUNCATION_MARKER};
use pretty_assertions::assert_eq;

const DOC: &str = "# Main Title
Some introduction text

## Section 1
Content of section 1

## Section 2
Content of section 2

### Subsection 2.1
Content of subsection 2.1
#### Deep Section
Very deep content

### Subsection 2.2
Content of subsection 2.2

## Section 3
Content of section 3
";

const DEEP_PATH: [&str; 4] = ["Main Title", "Section 2", "Subsection 2.1", "Deep Section"];

fn assert_status_shape(statuses: &[StepStatus], success: bool) {
    if success {
        assert!(statuses.iter().all(|s| *s == StepStatus::Resolved));
        return;
    }
    let failed = statuses
        .iter()
        .position(|s| *s == StepStatus::Failed)
        .expect("exactly one failed entry");
    assert!(statuses[..failed].iter().all(|s| *s == StepStatus::Resolved));
    assert!(statuses[failed + 1..]
        .iter()
        .all(|s| *s == StepStatus::NotAttempted));
}

#[test]
fn deep_navigation_without_limit() {
    let result = navigate(DOC, &DEEP_PATH, None);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.status_list, vec![StepStatus::Resolved; 4]);
    assert_eq!(result.current_level, 4);
    assert_eq!(result.failed_level, None);
    assert!(result.content.contains("Very deep content"));
    assert_eq!(result.content_length, result.content.chars().count());
    assert_eq!(result.available_titles, vec!["Deep Section"]);
    assert!(result.next_level_titles.is_empty());
    assert_eq!(
        result.message,
        "Found: Main Title > Section 2 > Subsection 2.1 > Deep Section"
    );
    assert_eq!(result.query_path, DEEP_PATH.to_vec());
}

#[test]
fn deep_navigation_keeps_ancestor_breadcrumbs() {
    let result = navigate(DOC, &DEEP_PATH, None);
    assert_eq!(
        result.content,
        "# Main Title\n\
         Some introduction text\n\
         ## Section 2\n\
         Content of section 2\n\
         ### Subsection 2.1\n\
         Content of subsection 2.1\n\
         #### Deep Section\n\
         Very deep content"
    );
}

#[test]
fn deep_navigation_with_limit_truncates() {
    let result = navigate(DOC, &DEEP_PATH, Some(50));

    assert!(result.success);
    assert_eq!(result.status_list, vec![StepStatus::Resolved; 4]);
    assert!(result.content.chars().count() <= 50);
    assert!(result.content.ends_with(TRUNCATION_MARKER));
    assert!(result.content_length > 50);
    assert!(result.is_truncated());
}

#[test]
fn wrong_third_level_reports_siblings() {
    let result = navigate(DOC, &["Main Title", "Section 2", "Wrong Section"], Some(30));

    assert!(!result.success);
    assert_eq!(
        result.status_list,
        vec![
            StepStatus::Resolved,
            StepStatus::Resolved,
            StepStatus::Failed
        ]
    );
    assert_eq!(result.failed_level, Some(3));
    assert_eq!(result.current_level, 3);
    assert_eq!(result.available_titles, vec!["Subsection 2.1", "Subsection 2.2"]);
    assert!(result.next_level_titles.is_empty());
    assert!(result.content.chars().count() <= 30);
    assert!(result.content.ends_with(TRUNCATION_MARKER));
    assert_eq!(
        result.message,
        "Failed at level 3: Title 'Wrong Section' not found at level 3"
    );
}

#[test]
fn wrong_first_level_marks_rest_not_attempted() {
    let result = navigate(DOC, &["Wrong Title", "Section 2"], None);

    assert!(!result.success);
    assert_eq!(
        result.status_list,
        vec![StepStatus::Failed, StepStatus::NotAttempted]
    );
    assert_eq!(result.failed_level, Some(1));
    assert_eq!(result.available_titles, vec!["Main Title"]);
    // Nothing resolved, so the scope is still the whole document.
    assert_eq!(result.content, DOC);
}

#[test]
fn failure_content_is_last_resolved_scope() {
    let parent = navigate(DOC, &["Main Title", "Section 2"], None);
    let failed = navigate(DOC, &["Main Title", "Section 2", "Nope"], None);
    assert_eq!(failed.content, parent.content);
    assert_eq!(failed.content_length, parent.content_length);
}

#[test]
fn success_lists_drill_down_targets() {
    let result = navigate(DOC, &["Main Title", "Section 2"], None);
    assert!(result.success);
    assert_eq!(
        result.available_titles,
        vec!["Section 1", "Section 2", "Section 3"]
    );
    assert_eq!(
        result.next_level_titles,
        vec!["Subsection 2.1", "Subsection 2.2"]
    );
}

#[test]
fn status_list_shape_holds_for_many_paths() {
    let paths: Vec<Vec<&str>> = vec![
        vec!["Main Title"],
        vec!["Main Title", "Section 3"],
        vec!["Main Title", "Section 9", "x", "y"],
        vec!["Nope"],
        vec!["Main Title", "Section 2", "Subsection 2.2", "Missing"],
        vec!["Main Title", "Section 2", "Subsection 2.1", "Deep Section", "Deeper"],
    ];
    for path in paths {
        let result = navigate(DOC, path.as_slice(), None);
        assert_eq!(result.status_list.len(), path.len());
        assert_status_shape(&result.status_list, result.success);
        if !result.success {
            assert_eq!(result.failed_level, Some(result.current_level));
        }
    }
}

#[test]
fn navigation_is_idempotent() {
    let first = navigate(DOC, &DEEP_PATH, Some(120));
    let second = navigate(DOC, &DEEP_PATH, Some(120));
    assert_eq!(first, second);
}

#[test]
fn nested_lookup_matches_direct_navigation() {
    let parent = navigate(DOC, &["Main Title"], None);
    assert!(parent.success);
    let child = find_section(&parent.content, "Section 2", 2).expect("child resolves");
    let direct = navigate(DOC, &["Main Title", "Section 2"], None);
    assert_eq!(child.content, direct.content);
    assert_eq!(child.title, "## Section 2");
}

#[test]
fn titles_at_level_on_example_document() {
    assert_eq!(titles_at_level(DOC, 1), vec!["Main Title"]);
    assert_eq!(
        titles_at_level(DOC, 2),
        vec!["Section 1", "Section 2", "Section 3"]
    );
    assert_eq!(
        titles_at_level(DOC, 3),
        vec!["Subsection 2.1", "Subsection 2.2"]
    );
    assert_eq!(titles_at_level(DOC, 4), vec!["Deep Section"]);
}

#[test]
fn serialized_result_uses_wire_field_names() {
    let result = navigate(DOC, &["Wrong Title", "Section 2"], None);
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["success"], serde_json::json!(false));
    assert_eq!(value["status_list"], serde_json::json!([0, -1]));
    assert_eq!(value["failed_level"], serde_json::json!(1));
    assert_eq!(value["query_path"], serde_json::json!(["Wrong Title", "Section 2"]));
    assert_eq!(value["next_level_titles"], serde_json::json!([]));
}

#[test]
fn malformed_heading_reports_lookup_siblings_unchanged() {
    let doc = "# Top\n## \n## Child";
    let lookup = find_section(doc, "Child", 2).expect_err("malformed heading");
    let result = navigate(doc, &["Top", "Child"], None);

    assert!(!result.success);
    assert_eq!(result.failed_level, Some(2));
    assert!(result.message.starts_with("Failed at level 2:"), "{}", result.message);
    assert_eq!(result.available_titles, lookup.available_titles);
    assert!(result.available_titles.is_empty());
    assert_status_shape(&result.status_list, false);
}
