//! Single-column sort specification

use serde::{Deserialize, Serialize};

/// Sort direction; `None` serializes as the empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
    #[default]
    #[serde(rename = "")]
    None,
}

impl SortDirection {
    /// Next step of the unsorted -> asc -> desc -> unsorted cycle
    pub fn cycle(&self) -> Self {
        match self {
            Self::None => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
            Self::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub dir: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, dir: SortDirection) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Unsorted when either the field or the direction is empty
    pub fn is_active(&self) -> bool {
        !self.field.is_empty() && self.dir != SortDirection::None
    }

    /// The spec after one more click on `field`'s header
    pub fn toggled(&self, field: &str) -> Self {
        let dir = if self.field == field {
            self.dir.cycle()
        } else {
            SortDirection::Ascending
        };

        if dir == SortDirection::None {
            Self::default()
        } else {
            Self::new(field, dir)
        }
    }
}
