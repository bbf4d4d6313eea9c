//! Typed column bindings.

use crate::error::{SourceError, SourceResult};
use crate::models::{CellValue, ColumnDefinition, ColumnType};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Result of a single extractor call. The error is a human-readable reason.
pub type ExtractResult<T> = Result<T, String>;

/// Rust value types that can populate a cell.
///
/// The associated column type is what ties a binding's declared column to the
/// cells it produces.
pub trait CellType {
    const COLUMN_TYPE: ColumnType;

    fn into_cell(self) -> CellValue;
}

impl CellType for String {
    const COLUMN_TYPE: ColumnType = ColumnType::String;

    fn into_cell(self) -> CellValue {
        CellValue::String(self)
    }
}

impl CellType for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Double;

    fn into_cell(self) -> CellValue {
        CellValue::Double(self)
    }
}

impl CellType for DateTime<Utc> {
    const COLUMN_TYPE: ColumnType = ColumnType::DateTime;

    fn into_cell(self) -> CellValue {
        CellValue::DateTime(self)
    }
}

impl CellType for i64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Int;

    fn into_cell(self) -> CellValue {
        CellValue::Int(self)
    }
}

impl CellType for bool {
    const COLUMN_TYPE: ColumnType = ColumnType::Boolean;

    fn into_cell(self) -> CellValue {
        CellValue::Boolean(self)
    }
}

type ExtractFn<R> = Arc<dyn Fn(&R) -> ExtractResult<CellValue> + Send + Sync>;

/// A column definition paired with the extractor that fills it.
pub struct Binding<R> {
    column: ColumnDefinition,
    extract: ExtractFn<R>,
}

impl<R> Binding<R> {
    /// Create a binding whose column type follows the extractor's value type.
    pub fn new<T, F>(name: impl Into<String>, extractor: F) -> Self
    where
        T: CellType,
        F: Fn(&R) -> ExtractResult<T> + Send + Sync + 'static,
    {
        Self {
            column: ColumnDefinition::new(name, T::COLUMN_TYPE),
            extract: Arc::new(move |record: &R| extractor(record).map(T::into_cell)),
        }
    }

    pub fn column(&self) -> &ColumnDefinition {
        &self.column
    }

    /// Run the extractor against a record, tagging failures with the column name.
    pub fn extract(&self, record: &R) -> SourceResult<CellValue> {
        (self.extract)(record)
            .map_err(|message| SourceError::extraction(&self.column.name, message))
    }
}

impl<R> Clone for Binding<R> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<R> fmt::Debug for Binding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_type_follows_extractor() {
        let binding = Binding::new("Length", |s: &String| Ok(s.len() as f64));
        assert_eq!(binding.column().column_type, ColumnType::Double);
        assert_eq!(
            binding.extract(&"abc".to_string()).unwrap(),
            CellValue::Double(3.0)
        );
    }

    #[test]
    fn test_binding_failure_is_tagged() {
        let binding = Binding::new("First", |s: &String| {
            s.chars()
                .next()
                .map(String::from)
                .ok_or_else(|| "empty".to_string())
        });
        let err = binding.extract(&String::new()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Extraction { ref column, ref message } if column == "First" && message == "empty"
        ));
    }
}
