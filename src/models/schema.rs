//! Schema-related data models.
//!
//! A [`Schema`] is the ordered, name-unique list of typed columns that defines
//! the row layout of a page.

use serde::{Deserialize, Serialize};

/// Logical type of a column and of every cell in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Double,
    DateTime,
    Int,
    Boolean,
}

impl ColumnType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Double => "double",
            Self::DateTime => "datetime",
            Self::Int => "int",
            Self::Boolean => "boolean",
        }
    }

    /// Whether values of this type are right-aligned in text output.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Double | Self::Int)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column layout. Built once by the record mapper and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnDefinition>,
}

impl Schema {
    /// Name uniqueness is guaranteed by the record mapper builder.
    pub(crate) fn from_columns(columns: Vec<ColumnDefinition>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
