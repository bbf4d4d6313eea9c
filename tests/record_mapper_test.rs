//! Integration tests for the record mapper.
//!
//! These tests use a domain record unrelated to connections to check that the
//! mapper is generic over the record type.

use chrono::{DateTime, TimeZone, Utc};
use connections_source::RecordMapperBuilder;
use connections_source::error::SourceError;
use connections_source::models::{CellValue, ColumnType};

#[derive(Debug, Clone)]
struct Sensor {
    id: i64,
    label: String,
    reading: Option<f64>,
    online: bool,
    last_seen: DateTime<Utc>,
}

fn sensor(id: i64, reading: Option<f64>) -> Sensor {
    Sensor {
        id,
        label: format!("sensor-{id}"),
        reading,
        online: reading.is_some(),
        last_seen: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
    }
}

fn sensor_mapper() -> RecordMapperBuilder<Sensor> {
    let mut builder = RecordMapperBuilder::new();
    builder
        .for_int("Id", |s: &Sensor| s.id)
        .unwrap()
        .for_string("Label", |s: &Sensor| s.label.clone())
        .unwrap()
        .register("Reading", |s: &Sensor| {
            s.reading.ok_or_else(|| format!("{} has no reading", s.label))
        })
        .unwrap()
        .for_boolean("Online", |s: &Sensor| s.online)
        .unwrap()
        .for_date_time("Last Seen", |s: &Sensor| s.last_seen)
        .unwrap();
    builder
}

#[test]
fn test_all_cell_types() {
    let (schema, rows) = sensor_mapper().build();
    let types: Vec<ColumnType> = schema.columns().iter().map(|c| c.column_type).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::Int,
            ColumnType::String,
            ColumnType::Double,
            ColumnType::Boolean,
            ColumnType::DateTime,
        ]
    );

    let row = rows.apply(&sensor(7, Some(21.5))).unwrap();
    assert_eq!(
        row.cells(),
        &[
            CellValue::Int(7),
            CellValue::String("sensor-7".to_string()),
            CellValue::Double(21.5),
            CellValue::Boolean(true),
            CellValue::DateTime(Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()),
        ]
    );
}

#[test]
fn test_duplicate_registration_produces_no_schema() {
    let mut builder = RecordMapperBuilder::new();
    let result = builder
        .for_string("Label", |s: &Sensor| s.label.clone())
        .and_then(|b| b.for_int("Label", |s: &Sensor| s.id));

    let err = result.unwrap_err();
    assert!(
        matches!(err, SourceError::DuplicateColumn { ref column } if column == "Label"),
        "Should be DuplicateColumn error, got: {:?}",
        err
    );
    assert_eq!(builder.len(), 1);
}

#[test]
fn test_extraction_error_names_column() {
    let (_, rows) = sensor_mapper().build();
    let records = vec![sensor(1, Some(1.0)), sensor(2, None), sensor(3, Some(3.0))];

    let err = rows.apply_all(&records).unwrap_err();
    match err {
        SourceError::Extraction { column, message } => {
            assert_eq!(column, "Reading");
            assert_eq!(message, "sensor-2 has no reading");
        }
        other => panic!("Should be Extraction error, got: {:?}", other),
    }
}

#[test]
fn test_row_builder_is_shareable() {
    let (_, rows) = sensor_mapper().build();
    let cloned = rows.clone();
    assert_eq!(rows.width(), 5);
    assert_eq!(
        rows.apply(&sensor(4, Some(0.0))).unwrap(),
        cloned.apply(&sensor(4, Some(0.0))).unwrap()
    );

    let handle = std::thread::spawn(move || cloned.apply(&sensor(5, Some(5.0))).unwrap().len());
    assert_eq!(handle.join().unwrap(), 5);
}
