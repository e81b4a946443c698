//! Tests for the local pipeline

use gridstate_core::{ColumnDescriptor, FilterOperator, FilterType, GridAction};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn people() -> Vec<Value> {
    vec![
        json!({"name": "Ada", "age": 36, "active": true, "joined": "2021-05-01T09:00:00Z", "address": {"city": "Ankara"}}),
        json!({"name": "Grace", "age": 45, "active": false, "joined": "2019-11-20T17:30:00Z", "address": {"city": "İzmir"}}),
        json!({"name": "Linus", "age": 28, "active": true, "joined": "2021-05-01T22:15:00Z", "address": {"city": "Helsinki"}}),
        json!({"name": "Barbara", "age": "51", "active": "false", "joined": "2015-02-10", "address": {"city": "ankara"}}),
    ]
}

fn names(rows: &[Value]) -> Vec<&str> {
    rows.iter()
        .map(|row| row["name"].as_str().unwrap_or_default())
        .collect()
}

fn filtered(clause: FilterClause) -> Vec<String> {
    let state = GridState::default().apply(GridAction::Filter(clause));
    let output = run(&people(), &state, &ColumnSet::default());
    names(&output.rows).into_iter().map(String::from).collect()
}

#[test]
fn test_number_gt_scenario() {
    let rows = vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 10})];
    let state = GridState::default().apply(GridAction::Filter(
        FilterClause::new("n", FilterOperator::GreaterThan, "1").with_type(FilterType::Number),
    ));

    let output = run(&rows, &state, &ColumnSet::default());

    assert_eq!(output.rows, vec![json!({"n": 2}), json!({"n": 10})]);
    assert_eq!(output.total, 2);
}

#[test]
fn test_text_filters_are_case_insensitive() {
    assert_eq!(
        filtered(FilterClause::new("address.city", FilterOperator::Equal, "ANKARA")),
        vec!["Ada", "Barbara"]
    );
    assert_eq!(
        filtered(FilterClause::new("name", FilterOperator::Contains, "AR")),
        vec!["Barbara"]
    );
    assert_eq!(
        filtered(FilterClause::new("name", FilterOperator::NotContains, "a")),
        vec!["Linus"]
    );
    assert_eq!(
        filtered(FilterClause::new("name", FilterOperator::StartsWith, "g")),
        vec!["Grace"]
    );
    assert_eq!(
        filtered(FilterClause::new("name", FilterOperator::EndsWith, "A")),
        vec!["Ada", "Barbara"]
    );
    assert_eq!(
        filtered(FilterClause::new("name", FilterOperator::NotEqual, "ada")),
        vec!["Grace", "Linus", "Barbara"]
    );
}

#[test]
fn test_text_casing_handles_non_ascii() {
    assert_eq!(
        filtered(FilterClause::new("address.city", FilterOperator::StartsWith, "İZ")),
        vec!["Grace"]
    );
}

#[test]
fn test_text_comparison_operators_fail_open() {
    let all = vec!["Ada", "Grace", "Linus", "Barbara"];
    assert_eq!(filtered(FilterClause::new("name", FilterOperator::GreaterThan, "zzz")), all.clone());
    assert_eq!(filtered(FilterClause::range("name", "a", "b")), all);
}

#[test]
fn test_number_filters_coerce_strings_and_commas() {
    let number = |op, value: &str| {
        filtered(FilterClause::new("age", op, value).with_type(FilterType::Number))
    };

    assert_eq!(number(FilterOperator::Equal, "51"), vec!["Barbara"]);
    assert_eq!(number(FilterOperator::GreaterThanOrEqual, "45"), vec!["Grace", "Barbara"]);
    assert_eq!(number(FilterOperator::LessThan, "35,5"), vec!["Linus"]);
    assert_eq!(number(FilterOperator::LessThanOrEqual, "36"), vec!["Ada", "Linus"]);
    assert_eq!(number(FilterOperator::NotEqual, "36"), vec!["Grace", "Linus", "Barbara"]);
    // Substring operators mean nothing for numbers
    assert_eq!(number(FilterOperator::Contains, "9").len(), 4);
}

#[test]
fn test_number_range_is_inclusive() {
    assert_eq!(
        filtered(FilterClause::range("age", "36", "45").with_type(FilterType::Number)),
        vec!["Ada", "Grace"]
    );
}

#[test]
fn test_incomplete_range_is_not_applied() {
    let state = GridState::default().with_filter(
        FilterClause::range("age", "40", "").with_type(FilterType::Number),
    );
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(output.total, 4);
}

#[test]
fn test_unparsable_number_filter_matches_only_inequality() {
    let gt = filtered(FilterClause::new("age", FilterOperator::GreaterThan, "abc").with_type(FilterType::Number));
    assert!(gt.is_empty());

    let ne = filtered(FilterClause::new("age", FilterOperator::NotEqual, "abc").with_type(FilterType::Number));
    assert_eq!(ne.len(), 4);
}

#[test]
fn test_date_filters_compare_calendar_days() {
    assert_eq!(
        filtered(FilterClause::new("joined", FilterOperator::Equal, "2021-05-01").with_type(FilterType::Date)),
        vec!["Ada", "Linus"]
    );
    assert_eq!(
        filtered(FilterClause::new("joined", FilterOperator::LessThan, "2020-01-01").with_type(FilterType::Date)),
        vec!["Grace", "Barbara"]
    );
    assert_eq!(
        filtered(FilterClause::range("joined", "2019-01-01", "2021-05-01").with_type(FilterType::Date)),
        vec!["Ada", "Grace", "Linus"]
    );
}

#[test]
fn test_date_time_filters_compare_instants() {
    assert_eq!(
        filtered(
            FilterClause::new("joined", FilterOperator::GreaterThan, "2021-05-01T12:00:00Z")
                .with_type(FilterType::DateTime)
        ),
        vec!["Linus"]
    );
}

#[test]
fn test_boolean_filters_use_equality_only() {
    let boolean = |op, value: &str| {
        filtered(FilterClause::new("active", op, value).with_type(FilterType::Boolean))
    };

    assert_eq!(boolean(FilterOperator::Equal, "true"), vec!["Ada", "Linus"]);
    // Anything but "true" means false
    assert_eq!(boolean(FilterOperator::Equal, "no"), vec!["Grace", "Barbara"]);
    assert_eq!(boolean(FilterOperator::NotEqual, "true"), vec!["Grace", "Barbara"]);
    assert_eq!(boolean(FilterOperator::Contains, "true").len(), 4);
}

#[test]
fn test_column_type_applies_when_clause_is_untyped() {
    let columns = ColumnSet::new(vec![ColumnDescriptor::number("age")]);
    let state = GridState::default().apply(GridAction::Filter(FilterClause::new(
        "age",
        FilterOperator::GreaterThan,
        "40",
    )));

    let output = run(&people(), &state, &columns);
    assert_eq!(names(&output.rows), vec!["Grace", "Barbara"]);

    // Untyped and no column: text semantics, where `gt` is a no-op
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(output.total, 4);
}

#[test]
fn test_clauses_combine_with_and() {
    let state = GridState::default()
        .with_filter(FilterClause::new("address.city", FilterOperator::Equal, "ankara"))
        .with_filter(FilterClause::new("age", FilterOperator::LessThan, "40").with_type(FilterType::Number));

    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(names(&output.rows), vec!["Ada"]);
}

#[test]
fn test_same_clause_twice_yields_same_output() {
    let clause = FilterClause::new("name", FilterOperator::Contains, "a");
    let once = GridState::default().apply(GridAction::Filter(clause.clone()));
    let twice = once.apply(GridAction::Filter(clause));

    assert_eq!(
        run(&people(), &once, &ColumnSet::default()),
        run(&people(), &twice, &ColumnSet::default())
    );
}

#[test]
fn test_sort_cycle_orders_rows() {
    let state = GridState::default().apply(GridAction::Sort("name".into()));
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(names(&output.rows), vec!["Ada", "Barbara", "Grace", "Linus"]);

    let state = state.apply(GridAction::Sort("name".into()));
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(names(&output.rows), vec!["Linus", "Grace", "Barbara", "Ada"]);

    let state = state.apply(GridAction::Sort("name".into()));
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(names(&output.rows), vec!["Ada", "Grace", "Linus", "Barbara"]);
}

#[test]
fn test_sort_orders_numbers_before_strings() {
    // Barbara's age is a string, which sorts after every number
    let state = GridState::default().apply(GridAction::Sort("age".into()));
    let output = run(&people(), &state, &ColumnSet::default());
    assert_eq!(names(&output.rows), vec!["Linus", "Ada", "Grace", "Barbara"]);
}

#[test]
fn test_paginate_slices_when_total_exceeds_page_size() {
    let rows: Vec<Value> = (1..=25).map(|n| json!({"n": n})).collect();
    let state = GridState::default().apply(GridAction::ChangePage { page: 3, total: 25 });

    let output = run(&rows, &state, &ColumnSet::default());

    assert_eq!(output.total, 25);
    assert_eq!(output.rows.len(), 5);
    assert_eq!(output.rows[0], json!({"n": 21}));
}

#[test]
fn test_paginate_returns_everything_when_it_fits() {
    let rows = [1, 2, 3];
    assert_eq!(paginate(&rows, 30, 10), &[1, 2, 3]);
    assert_eq!(paginate(&rows, 0, 3), &[1, 2, 3]);
    assert_eq!(paginate(&rows, 2, 2), &[3]);
    let empty: &[i32] = &[];
    assert_eq!(paginate(&rows, 9, 2), empty);
}
