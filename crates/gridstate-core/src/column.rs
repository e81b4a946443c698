//! Column metadata supplied by the host
//!
//! The engine reads these to resolve a clause's type when the clause does not
//! carry one. The `filterable`/`sortable` flags are for the host's UI; the
//! engine trusts whatever actions the caller issues.

use serde::{Deserialize, Serialize};

use crate::FilterType;

fn default_true() -> bool {
    true
}

/// Per-field metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field path, dotted for nested records
    pub field: String,
    /// Header text, defaults to the field when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub filter_type: FilterType,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl ColumnDescriptor {
    pub fn new(field: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            field: field.into(),
            title: None,
            filter_type,
            filterable: true,
            sortable: true,
        }
    }

    pub fn text(field: impl Into<String>) -> Self {
        Self::new(field, FilterType::Text)
    }

    pub fn number(field: impl Into<String>) -> Self {
        Self::new(field, FilterType::Number)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

/// Ordered set of column descriptors, looked up by field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Add a column, replacing an existing descriptor for the same field
    pub fn push(&mut self, column: ColumnDescriptor) {
        match self.columns.iter_mut().find(|c| c.field == column.field) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn get(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn filter_type_for(&self, field: &str) -> Option<FilterType> {
        self.get(field).map(|c| c.filter_type)
    }

    /// Unknown fields are allowed; only an explicit `false` forbids
    pub fn can_filter(&self, field: &str) -> bool {
        self.get(field).map(|c| c.filterable).unwrap_or(true)
    }

    pub fn can_sort(&self, field: &str) -> bool {
        self.get(field).map(|c| c.sortable).unwrap_or(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<ColumnDescriptor> for ColumnSet {
    fn from_iter<T: IntoIterator<Item = ColumnDescriptor>>(iter: T) -> Self {
        let mut set = ColumnSet::default();
        for column in iter {
            set.push(column);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_from_json() {
        let set: ColumnSet = serde_json::from_str(
            r#"[{"field":"age","type":"number"},{"field":"name","sortable":false}]"#,
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.filter_type_for("age"), Some(FilterType::Number));
        assert_eq!(set.filter_type_for("name"), Some(FilterType::Text));
        assert!(set.can_filter("name"));
        assert!(!set.can_sort("name"));
        assert!(set.can_sort("unknown"));
    }

    #[test]
    fn test_push_replaces_same_field() {
        let mut set: ColumnSet = [ColumnDescriptor::text("a"), ColumnDescriptor::text("b")]
            .into_iter()
            .collect();
        set.push(ColumnDescriptor::number("a").with_title("Amount"));

        assert_eq!(set.len(), 2);
        let a = set.get("a").unwrap();
        assert_eq!(a.filter_type, FilterType::Number);
        assert_eq!(a.display_title(), "Amount");
        assert_eq!(set.get("b").unwrap().display_title(), "b");
    }
}
