//! Tests for the query engine
//!
//! These tests verify:
//! - Wildcard pattern matching (anchored, case-insensitive, literal dots)
//! - Query string parsing
//! - Plan building (unknown fields dropped, last sort wins)
//! - Filtering (AND composition) and numeric/text sorting

use jsonrepo::query::{filter_and_sort, QueryPlan, SortDirective, WildcardPattern};
use jsonrepo::{QueryParams, Record, RepoError, SchemaModel};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn record(value: serde_json::Value) -> Record {
    Record::try_from(value).unwrap()
}

fn people_model() -> SchemaModel {
    SchemaModel::builder("Person")
        .field("Name")
        .field("City")
        .field("Age")
        .build()
}

fn people() -> Vec<Record> {
    vec![
        record(json!({"Id": 1, "Name": "Alice", "City": "Montreal", "Age": 30})),
        record(json!({"Id": 2, "Name": "bob", "City": "Laval", "Age": "9"})),
        record(json!({"Id": 3, "Name": "Abc", "City": "montreal", "Age": 10})),
        record(json!({"Id": 4, "Name": "arc", "City": "Quebec", "Age": "100"})),
    ]
}

fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().map(|r| r.id().unwrap()).collect()
}

// =============================================================================
// WildcardPattern Tests
// =============================================================================

#[test]
fn test_pattern_exact_match_is_anchored() {
    let pattern = WildcardPattern::new("bob").unwrap();

    assert!(pattern.matches("bob"));
    assert!(pattern.matches("BOB"));
    assert!(!pattern.matches("bobby"));
    assert!(!pattern.matches("abob"));
}

#[test]
fn test_pattern_prefix_and_suffix() {
    let pattern = WildcardPattern::new("a*c").unwrap();

    assert!(pattern.matches("abc"));
    assert!(pattern.matches("ac"));
    assert!(pattern.matches("ARC"));
    assert!(pattern.matches("a long trip to c"));
    assert!(!pattern.matches("abcd"));
    assert!(!pattern.matches("bac"));
}

#[test]
fn test_pattern_multiple_wildcards() {
    let pattern = WildcardPattern::new("*on*al").unwrap();

    assert!(pattern.matches("Montreal"));
    assert!(pattern.matches("onal"));
    assert!(!pattern.matches("Montreal!"));
}

#[test]
fn test_pattern_dot_is_literal() {
    let pattern = WildcardPattern::new("a.c").unwrap();

    assert!(pattern.matches("a.c"));
    assert!(!pattern.matches("abc"));
}

#[test]
fn test_pattern_repeated_wildcards_backtrack() {
    let pattern = WildcardPattern::new("*a*a*").unwrap();

    assert!(pattern.matches("banana"));
    assert!(pattern.matches("AA"));
    assert!(!pattern.matches("bandit"));
}

#[test]
fn test_pattern_regex_metacharacters_are_literal() {
    let pattern = WildcardPattern::new("a+b(c)?[d]$").unwrap();

    assert!(pattern.matches("A+B(C)?[D]$"));
    assert!(!pattern.matches("aab(c)[d]"));
    assert_eq!(pattern.as_str(), "a+b(c)?[d]$");
    assert!(!pattern.has_wildcard());
}

#[test]
fn test_pattern_wildcard_spans_lines() {
    let pattern = WildcardPattern::new("first*last").unwrap();

    assert!(pattern.matches("first\nmiddle\nlast"));
}

#[test]
fn test_pattern_star_only_matches_everything() {
    let pattern = WildcardPattern::new("*").unwrap();

    assert!(pattern.has_wildcard());
    assert!(pattern.matches(""));
    assert!(pattern.matches("anything at all"));
}

#[test]
fn test_pattern_empty_matches_only_empty() {
    let pattern = WildcardPattern::new("").unwrap();

    assert!(pattern.matches(""));
    assert!(!pattern.matches("x"));
}

// =============================================================================
// QueryParams Tests
// =============================================================================

#[test]
fn test_params_parse_query_string() {
    let params = QueryParams::parse("?Name=b*&sort=Id,desc").unwrap();

    let pairs: Vec<(&str, &str)> = params.iter().collect();
    assert_eq!(pairs, vec![("Name", "b*"), ("sort", "Id,desc")]);
}

#[test]
fn test_params_parse_decodes_components() {
    let params = QueryParams::parse("City=New+York&Name=J%C3%A9r%C3%B4me&flag").unwrap();

    let pairs: Vec<(&str, &str)> = params.iter().collect();
    assert_eq!(
        pairs,
        vec![("City", "New York"), ("Name", "Jérôme"), ("flag", "")]
    );
}

#[test]
fn test_params_parse_rejects_bad_escape() {
    assert!(matches!(
        QueryParams::parse("Name=%zz"),
        Err(RepoError::Query(_))
    ));
    assert!(matches!(QueryParams::parse("Name=%4"), Err(RepoError::Query(_))));
}

#[test]
fn test_params_parse_empty() {
    assert!(QueryParams::parse("").unwrap().is_empty());
    assert!(QueryParams::parse("?").unwrap().is_empty());
}

// =============================================================================
// Plan Tests
// =============================================================================

#[test]
fn test_sort_directive_parse() {
    assert_eq!(
        SortDirective::parse("Name"),
        SortDirective { field: "Name".into(), descending: false }
    );
    assert_eq!(
        SortDirective::parse("Name,desc"),
        SortDirective { field: "Name".into(), descending: true }
    );
    assert_eq!(
        SortDirective::parse("Name,DESC"),
        SortDirective { field: "Name".into(), descending: true }
    );
}

#[test]
fn test_plan_drops_unknown_fields() {
    let fields = vec!["Id".to_string(), "Name".to_string()];
    let params = QueryParams::new()
        .with("Unknown", "x")
        .with("sort", "Nope")
        .with("Name", "a*");

    let plan = QueryPlan::build(&params, &fields).unwrap();

    assert_eq!(plan.filters.len(), 1);
    assert_eq!(plan.filters[0].field, "Name");
    assert!(plan.sort.is_none());
}

#[test]
fn test_plan_last_sort_wins() {
    let fields = vec!["Id".to_string(), "Name".to_string()];
    let params = QueryParams::new()
        .with("sort", "Name")
        .with("SORT", "Id,desc");

    let plan = QueryPlan::build(&params, &fields).unwrap();

    assert_eq!(
        plan.sort,
        Some(SortDirective { field: "Id".into(), descending: true })
    );
}

#[test]
fn test_plan_field_names_are_case_sensitive() {
    let fields = vec!["Name".to_string()];
    let plan = QueryPlan::build(&QueryParams::new().with("name", "x"), &fields).unwrap();

    assert!(plan.is_noop());
}

// =============================================================================
// Filter Tests
// =============================================================================

#[test]
fn test_filter_wildcard() {
    let params = QueryParams::new().with("Name", "a*c");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![3, 4]);
}

#[test]
fn test_filter_case_insensitive_exact() {
    let params = QueryParams::new().with("City", "MONTREAL");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![1, 3]);
}

#[test]
fn test_filter_numeric_field() {
    let params = QueryParams::new().with("Age", "1*");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![3, 4]);
}

#[test]
fn test_filters_compose_as_and() {
    let params = QueryParams::new().with("Name", "a*").with("City", "m*");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![1, 3]);
}

#[test]
fn test_filter_unknown_field_is_noop() {
    let params = QueryParams::new().with("Salary", "0");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(result, people());
}

#[test]
fn test_filter_excludes_records_missing_the_field() {
    let mut records = people();
    records.push(record(json!({"Id": 5, "City": "Alma"})));
    let params = QueryParams::new().with("Name", "*");

    let result = filter_and_sort(records, &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![1, 2, 3, 4]);
}

// =============================================================================
// Sort Tests
// =============================================================================

#[test]
fn test_sort_numeric_not_lexicographic() {
    let params = QueryParams::new().with("sort", "Age");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    // 9, 10, 30, 100 whether stored as numbers or numeric strings
    assert_eq!(ids(&result), vec![2, 3, 1, 4]);
}

#[test]
fn test_sort_descending_reverses() {
    let params = QueryParams::new().with("sort", "Age,desc");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![4, 1, 3, 2]);
}

#[test]
fn test_sort_text_is_case_sensitive() {
    let params = QueryParams::new().with("sort", "Name");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    // Uppercase sorts before lowercase
    assert_eq!(ids(&result), vec![3, 1, 4, 2]);
}

#[test]
fn test_sort_unknown_field_keeps_order() {
    let params = QueryParams::new().with("sort", "Salary,desc");

    let result = filter_and_sort(people(), &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![1, 2, 3, 4]);
}

#[test]
fn test_sort_is_stable_for_equal_values() {
    let records = vec![
        record(json!({"Id": 1, "City": "Laval"})),
        record(json!({"Id": 2, "City": "Alma"})),
        record(json!({"Id": 3, "City": "Laval"})),
        record(json!({"Id": 4, "City": "Alma"})),
    ];
    let params = QueryParams::new().with("sort", "City");

    let result = filter_and_sort(records, &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![2, 4, 1, 3]);
}

#[test]
fn test_sort_missing_values_last() {
    let records = vec![
        record(json!({"Id": 1})),
        record(json!({"Id": 2, "Age": 5})),
        record(json!({"Id": 3, "Age": "unknown"})),
    ];
    let params = QueryParams::new().with("sort", "Age");

    let result = filter_and_sort(records, &params, &people_model()).unwrap();

    assert_eq!(ids(&result), vec![2, 3, 1]);
}

#[test]
fn test_sort_numbers_before_text() {
    let records = vec![
        record(json!({"Id": 1, "Age": "5"})),
        record(json!({"Id": 2, "Age": "#1"})),
        record(json!({"Id": 3, "Age": ""})),
        record(json!({"Id": 4, "Age": "-3"})),
    ];
    let params = QueryParams::new().with("sort", "Age");

    let result = filter_and_sort(records, &params, &people_model()).unwrap();

    // Numbers first, then text ("" before "#1")
    assert_eq!(ids(&result), vec![4, 1, 3, 2]);
}

#[test]
fn test_filter_then_sort_scenario() {
    let records = vec![
        record(json!({"Id": 1, "Name": "Alice"})),
        record(json!({"Id": 2, "Name": "bob"})),
    ];
    let model = people_model();

    let filtered = filter_and_sort(
        records.clone(),
        &QueryParams::new().with("Name", "b*").with("sort", "Name"),
        &model,
    )
    .unwrap();
    assert_eq!(ids(&filtered), vec![2]);

    let sorted = filter_and_sort(records, &QueryParams::new().with("sort", "Id,desc"), &model).unwrap();
    assert_eq!(ids(&sorted), vec![2, 1]);
}
