//! Filter clause types
//!
//! A grid carries at most one clause per field. The clause records what the
//! user typed verbatim; coercion to numbers, dates or booleans happens when
//! the clause is evaluated or serialized, driven by its `FilterType`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Filter operators understood by the local pipeline and the query builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterOperator {
    #[default]
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = "startswith")]
    StartsWith,
    #[serde(rename = "endswith")]
    EndsWith,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "ge")]
    GreaterThanOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "le")]
    LessThanOrEqual,
    #[serde(rename = "range")]
    Range,
}

impl FilterOperator {
    /// Wire token, as used in serialized state and OData expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::Contains => "contains",
            Self::NotContains => "not contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "ge",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "le",
            Self::Range => "range",
        }
    }

    /// Returns true if this operator needs both `value` and `value2`
    pub fn requires_two_values(&self) -> bool {
        matches!(self, Self::Range)
    }

    /// Operators with a defined meaning for `filter_type`; any other pairing
    /// keeps every row
    pub fn for_type(filter_type: FilterType) -> &'static [FilterOperator] {
        match filter_type {
            FilterType::Text => &[
                Self::Contains,
                Self::NotContains,
                Self::Equal,
                Self::NotEqual,
                Self::StartsWith,
                Self::EndsWith,
            ],
            FilterType::Number | FilterType::Date | FilterType::DateTime => &[
                Self::Equal,
                Self::NotEqual,
                Self::GreaterThan,
                Self::GreaterThanOrEqual,
                Self::LessThan,
                Self::LessThanOrEqual,
                Self::Range,
            ],
            FilterType::Boolean | FilterType::Select => &[Self::Equal, Self::NotEqual],
        }
    }

    /// Get all available operators
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::Equal,
            Self::NotEqual,
            Self::Contains,
            Self::NotContains,
            Self::StartsWith,
            Self::EndsWith,
            Self::GreaterThan,
            Self::GreaterThanOrEqual,
            Self::LessThan,
            Self::LessThanOrEqual,
            Self::Range,
        ]
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown filter operator: {s}"))
    }
}

/// How a field's values are coerced before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    DateTime,
    Boolean,
    Select,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Boolean => "boolean",
            Self::Select => "select",
        }
    }

    /// Date and date-time values compare on a day or millisecond key
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-scoped filter condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field path, dotted for nested records (`address.city`)
    pub field: String,
    #[serde(default)]
    pub operator: FilterOperator,
    /// Primary value as typed by the user
    #[serde(default)]
    pub value: String,
    /// Upper bound, only read by `range`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value2: String,
    /// Explicit type; when absent the column's type applies, then text
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<FilterType>,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            value2: String::new(),
            filter_type: None,
        }
    }

    /// Inclusive range clause `[low, high]`
    pub fn range(field: impl Into<String>, low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Range,
            value: low.into(),
            value2: high.into(),
            filter_type: None,
        }
    }

    pub fn with_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = Some(filter_type);
        self
    }

    pub fn with_value2(mut self, value2: impl Into<String>) -> Self {
        self.value2 = value2.into();
        self
    }

    /// An empty clause is removed from state rather than kept
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Whether the clause has everything it needs to restrict rows.
    ///
    /// A range with one missing bound is kept in state (the user may still be
    /// typing) but is not applied.
    pub fn is_applicable(&self) -> bool {
        if self.value.is_empty() {
            return false;
        }
        if self.operator.requires_two_values() {
            return !self.value2.is_empty();
        }
        true
    }

    /// Resolve the effective type: explicit type, then the column's, then text
    pub fn resolved_type(&self, column_type: Option<FilterType>) -> FilterType {
        self.filter_type.or(column_type).unwrap_or_default()
    }
}
