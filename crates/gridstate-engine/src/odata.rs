//! OData-style query string builder
//!
//! Serializes a `GridState` into the `$top/$skip/$orderby/$filter` fragment a
//! remote source expects when it owns the rows. Field names are title-cased to
//! match the server's property casing; no URL encoding is applied, the host
//! does that when it attaches the fragment to a request.

use chrono::SecondsFormat;
use gridstate_core::value::{parse_datetime, parse_number};
use gridstate_core::{ColumnSet, FilterClause, FilterOperator, FilterType, GridState, SortDirection};

/// Build the query fragment using each clause's own type (text when unset)
pub fn build_query(state: &GridState) -> String {
    build_query_with_columns(state, &ColumnSet::default())
}

/// Build the query fragment, resolving untyped clauses through `columns`
pub fn build_query_with_columns(state: &GridState, columns: &ColumnSet) -> String {
    let mut query = format!("$top={}&$skip={}", state.page_size(), state.skip());

    let sort = state.sort();
    if sort.is_active() {
        query.push_str("&$orderby=");
        query.push_str(&to_title_case(&sort.field));
        if sort.dir == SortDirection::Descending {
            query.push_str(" desc");
        }
    }

    let clauses: Vec<String> = state
        .filters()
        .iter()
        .filter_map(|clause| {
            let filter_type = clause.resolved_type(columns.filter_type_for(&clause.field));
            render_clause(clause, filter_type)
        })
        .collect();

    if !clauses.is_empty() {
        query.push_str("&$filter=");
        query.push_str(&clauses.join(" and "));
    }

    tracing::debug!(query = %query, "Built remote query");
    query
}

/// Render one clause as an OData boolean expression.
///
/// Returns `None` for clauses that would not restrict anything locally
/// either: empty values and ranges missing a bound.
pub fn render_clause(clause: &FilterClause, filter_type: FilterType) -> Option<String> {
    if !clause.is_applicable() {
        return None;
    }

    let field = to_title_case(&clause.field);

    let expression = match filter_type {
        FilterType::Date => {
            let value = date_literal(&clause.value, false);
            format!("{field} eq {value}")
        }
        FilterType::DateTime => {
            let value = date_literal(&clause.value, true);
            format!("{field} eq {value}")
        }
        FilterType::Number => render_number(&field, clause),
        FilterType::Boolean => {
            let operator = match clause.operator {
                FilterOperator::NotEqual => "ne",
                _ => "eq",
            };
            format!("{field} {operator} {}", clause.value == "true")
        }
        FilterType::Text | FilterType::Select => render_text(&field, clause),
    };

    Some(expression)
}

fn render_number(field: &str, clause: &FilterClause) -> String {
    match clause.operator {
        FilterOperator::Range => format!(
            "({field} ge {} and {field} le {})",
            number_literal(&clause.value),
            number_literal(&clause.value2)
        ),
        // `contains` is meaningless for numbers
        FilterOperator::Contains => format!("{field} eq {}", number_literal(&clause.value)),
        operator => format!("{field} {} {}", operator.as_str(), number_literal(&clause.value)),
    }
}

fn render_text(field: &str, clause: &FilterClause) -> String {
    let value = escape_literal(&clause.value);

    match clause.operator {
        FilterOperator::Contains => format!("contains({field},'{value}')"),
        FilterOperator::NotContains => format!("not(contains({field},'{value}'))"),
        FilterOperator::StartsWith => format!("startswith({field},'{value}')"),
        FilterOperator::EndsWith => format!("endswith({field},'{value}')"),
        FilterOperator::Equal => format!("{field} eq '{value}'"),
        FilterOperator::NotEqual => format!("{field} ne '{value}'"),
        operator => format!("{field} {} '{value}'", operator.as_str()),
    }
}

/// Numbers go out with `.` as the decimal separator; unparsable input is
/// passed through so the server reports it.
fn number_literal(value: &str) -> String {
    let parsed = parse_number(value);
    if parsed.is_finite() {
        parsed.to_string()
    } else {
        value.trim().to_string()
    }
}

/// `YYYY-MM-DD` for dates, `YYYY-MM-DDTHH:MM:SS.sssZ` for timestamps
fn date_literal(value: &str, with_time: bool) -> String {
    match parse_datetime(value) {
        Some(dt) if with_time => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => {
            tracing::warn!(value, "Unparsable date in filter, sending it verbatim");
            value.to_string()
        }
    }
}

/// Single quotes inside OData string literals are doubled
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Capitalize the first letter of each space-separated token
pub fn to_title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
