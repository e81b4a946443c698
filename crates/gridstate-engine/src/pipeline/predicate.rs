//! Per-clause row predicates
//!
//! Each clause is evaluated against one field value after coercing both sides
//! by the clause's type. Operator/type pairs with no defined meaning keep the
//! row.

use gridstate_core::value::{self, parse_number, temporal_key, text_key, to_bool, to_datetime};
use gridstate_core::{FilterClause, FilterOperator, FilterType};
use serde_json::Value;

/// Evaluate a clause against a row, given the clause's resolved type
pub fn row_matches(row: &Value, clause: &FilterClause, filter_type: FilterType) -> bool {
    if !clause.is_applicable() {
        return true;
    }
    if !FilterOperator::for_type(filter_type).contains(&clause.operator) {
        return true;
    }

    let item = value::lookup(row, &clause.field);

    match filter_type {
        FilterType::Text => evaluate_text(clause.operator, &text_key(item), &clause.value.to_lowercase()),
        FilterType::Boolean | FilterType::Select => {
            evaluate_boolean(clause.operator, to_bool(item), clause.value == "true")
        }
        ordered if ordered.is_temporal() => evaluate_ordered(
            clause.operator,
            temporal_key(to_datetime(item), ordered),
            temporal_key(value::parse_datetime(&clause.value), ordered),
            temporal_key(value::parse_datetime(&clause.value2), ordered),
        ),
        _ => evaluate_ordered(
            clause.operator,
            value::to_number(item),
            parse_number(&clause.value),
            parse_number(&clause.value2),
        ),
    }
}

/// Both sides already lower-cased
fn evaluate_text(operator: FilterOperator, item: &str, needle: &str) -> bool {
    match operator {
        FilterOperator::Equal => item == needle,
        FilterOperator::NotEqual => item != needle,
        FilterOperator::Contains => item.contains(needle),
        FilterOperator::NotContains => !item.contains(needle),
        FilterOperator::StartsWith => item.starts_with(needle),
        FilterOperator::EndsWith => item.ends_with(needle),
        _ => true,
    }
}

/// NaN on either side makes every comparison false and `ne` true
fn evaluate_ordered(operator: FilterOperator, item: f64, low: f64, high: f64) -> bool {
    match operator {
        FilterOperator::Equal => item == low,
        FilterOperator::NotEqual => item != low,
        FilterOperator::GreaterThan => item > low,
        FilterOperator::GreaterThanOrEqual => item >= low,
        FilterOperator::LessThan => item < low,
        FilterOperator::LessThanOrEqual => item <= low,
        FilterOperator::Range => item >= low && item <= high,
        _ => true,
    }
}

fn evaluate_boolean(operator: FilterOperator, item: Option<bool>, expected: bool) -> bool {
    match operator {
        FilterOperator::Equal => item == Some(expected),
        FilterOperator::NotEqual => item != Some(expected),
        _ => true,
    }
}
