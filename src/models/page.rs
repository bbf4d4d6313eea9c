//! Row and page models.

use crate::models::ColumnType;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Double(f64),
    DateTime(DateTime<Utc>),
    Int(i64),
    Boolean(bool),
}

impl CellValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::String(_) => ColumnType::String,
            Self::Double(_) => ColumnType::Double,
            Self::DateTime(_) => ColumnType::DateTime,
            Self::Int(_) => ColumnType::Int,
            Self::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Render the cell for text output.
    pub fn display(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Double(d) => d.to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Int(i) => i.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::DateTime(dt) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::Int(i) => JsonValue::from(*i),
            Self::Boolean(b) => JsonValue::Bool(*b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// Ordered cells aligned 1:1 with the schema that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub(crate) fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The complete result of one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    /// Always false: every fetch materializes the full snapshot.
    pub has_next_page: bool,
}

impl Page {
    /// Create a terminal page.
    pub fn last(rows: Vec<Row>) -> Self {
        Self {
            rows,
            has_next_page: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
