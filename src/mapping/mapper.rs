//! Record mapper: builds a schema and a row builder from registered bindings.

use crate::error::{SourceError, SourceResult};
use crate::mapping::binding::{Binding, CellType, ExtractResult};
use crate::models::{Row, Schema};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Collects bindings in registration order.
///
/// Registration order is the row layout. Column names must be unique within
/// one builder.
pub struct RecordMapperBuilder<R> {
    bindings: Vec<Binding<R>>,
    names: HashSet<String>,
}

impl<R> RecordMapperBuilder<R> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a binding with a fallible extractor.
    ///
    /// Fails with [`SourceError::DuplicateColumn`] if `name` is already taken;
    /// the builder is left unchanged in that case.
    pub fn register<T, F>(&mut self, name: impl Into<String>, extractor: F) -> SourceResult<&mut Self>
    where
        T: CellType,
        F: Fn(&R) -> ExtractResult<T> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(SourceError::duplicate_column(name));
        }
        self.names.insert(name.clone());
        self.bindings.push(Binding::new(name, extractor));
        Ok(self)
    }

    pub fn for_string<F>(&mut self, name: impl Into<String>, extractor: F) -> SourceResult<&mut Self>
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.register(name, move |r| Ok(extractor(r)))
    }

    pub fn for_double<F>(&mut self, name: impl Into<String>, extractor: F) -> SourceResult<&mut Self>
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        self.register(name, move |r| Ok(extractor(r)))
    }

    pub fn for_date_time<F>(
        &mut self,
        name: impl Into<String>,
        extractor: F,
    ) -> SourceResult<&mut Self>
    where
        F: Fn(&R) -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.register(name, move |r| Ok(extractor(r)))
    }

    pub fn for_int<F>(&mut self, name: impl Into<String>, extractor: F) -> SourceResult<&mut Self>
    where
        F: Fn(&R) -> i64 + Send + Sync + 'static,
    {
        self.register(name, move |r| Ok(extractor(r)))
    }

    pub fn for_boolean<F>(&mut self, name: impl Into<String>, extractor: F) -> SourceResult<&mut Self>
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.register(name, move |r| Ok(extractor(r)))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Produce the schema and its row builder.
    ///
    /// May be called repeatedly; identical registrations yield equal schemas.
    pub fn build(&self) -> (Schema, RowBuilder<R>) {
        let schema = Schema::from_columns(
            self.bindings
                .iter()
                .map(|b| b.column().clone())
                .collect(),
        );
        let builder = RowBuilder {
            bindings: self.bindings.clone().into(),
        };
        (schema, builder)
    }
}

impl<R> std::fmt::Debug for RecordMapperBuilder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordMapperBuilder")
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl<R> Default for RecordMapperBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns domain records into rows. Immutable and cheap to clone.
pub struct RowBuilder<R> {
    bindings: Arc<[Binding<R>]>,
}

impl<R> RowBuilder<R> {
    /// Build one row, running every extractor in schema order.
    ///
    /// The first failing extractor aborts the row; no partial row is produced.
    pub fn apply(&self, record: &R) -> SourceResult<Row> {
        let cells = self
            .bindings
            .iter()
            .map(|binding| binding.extract(record))
            .collect::<SourceResult<Vec<_>>>()?;
        Ok(Row::new(cells))
    }

    /// Build rows for every record, preserving input order.
    pub fn apply_all<'a, I>(&self, records: I) -> SourceResult<Vec<Row>>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let rows = records
            .into_iter()
            .map(|record| self.apply(record))
            .collect::<SourceResult<Vec<_>>>()?;
        trace!(rows = rows.len(), columns = self.bindings.len(), "Mapped records");
        Ok(rows)
    }

    pub fn width(&self) -> usize {
        self.bindings.len()
    }
}

impl<R> Clone for RowBuilder<R> {
    fn clone(&self) -> Self {
        Self {
            bindings: Arc::clone(&self.bindings),
        }
    }
}

impl<R> std::fmt::Debug for RowBuilder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowBuilder")
            .field("bindings", &self.bindings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, ColumnType};
    use chrono::TimeZone;

    struct Item {
        label: String,
        weight: Option<f64>,
        seen_at: DateTime<Utc>,
    }

    fn item(label: &str, weight: Option<f64>) -> Item {
        Item {
            label: label.to_string(),
            weight,
            seen_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn builder() -> RecordMapperBuilder<Item> {
        let mut builder = RecordMapperBuilder::new();
        builder
            .for_string("Label", |i: &Item| i.label.clone())
            .unwrap()
            .register("Weight", |i: &Item| {
                i.weight.ok_or_else(|| "weight is missing".to_string())
            })
            .unwrap()
            .for_date_time("Seen At", |i: &Item| i.seen_at)
            .unwrap();
        builder
    }

    #[test]
    fn test_registration_order_is_layout() {
        let (schema, _) = builder().build();
        assert_eq!(schema.column_names(), vec!["Label", "Weight", "Seen At"]);
        assert_eq!(schema.columns()[1].column_type, ColumnType::Double);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut b = builder();
        let err = b.for_string("Label", |i: &Item| i.label.clone()).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateColumn { ref column } if column == "Label"));
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_builder_debug_lists_columns() {
        let debug = format!("{:?}", builder());
        assert!(debug.starts_with("RecordMapperBuilder"));
        assert!(debug.contains("\"Label\""));
        assert!(debug.contains("\"Seen At\""));
    }

    #[test]
    fn test_build_is_deterministic() {
        let b = builder();
        let (first, _) = b.build();
        let (second, _) = b.build();
        assert_eq!(first, second);
        assert_eq!(first, builder().build().0);
    }

    #[test]
    fn test_apply_produces_aligned_row() {
        let (schema, rows) = builder().build();
        let row = rows.apply(&item("a", Some(1.5))).unwrap();
        assert_eq!(row.len(), schema.len());
        for (cell, column) in row.cells().iter().zip(schema.columns()) {
            assert_eq!(cell.column_type(), column.column_type);
        }
        assert_eq!(row.get(1), Some(&CellValue::Double(1.5)));
    }

    #[test]
    fn test_apply_fails_whole_row() {
        let (_, rows) = builder().build();
        let err = rows.apply(&item("a", None)).unwrap_err();
        assert!(matches!(err, SourceError::Extraction { ref column, .. } if column == "Weight"));
    }

    #[test]
    fn test_apply_all_preserves_order() {
        let (_, rows) = builder().build();
        let items = vec![item("x", Some(1.0)), item("y", Some(2.0)), item("z", Some(3.0))];
        let out = rows.apply_all(&items).unwrap();
        let labels: Vec<_> = out.iter().map(|r| r.cells()[0].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_empty_builder() {
        let b: RecordMapperBuilder<Item> = RecordMapperBuilder::default();
        let (schema, rows) = b.build();
        assert!(schema.is_empty());
        assert!(rows.apply(&item("a", None)).unwrap().is_empty());
    }
}
