//! Column layout of the connections dataset.

use crate::error::SourceResult;
use crate::mapping::RecordMapperBuilder;
use crate::models::ConnectionRecord;

pub const NAME: &str = "Name";
pub const FULL_NAME: &str = "Full Name";
pub const FRIENDLY_NAME: &str = "Friendly Name";
pub const CONNECTION_ID: &str = "Connection ID";
pub const CONNECT_TIME: &str = "Connect Time";
pub const ATTRIBUTES: &str = "Attributes";
pub const SUBSCRIPTIONS: &str = "Number Of subscriptions";

/// Marker preceding each subscription set in open-connection diagnostics.
pub const SUBSCRIPTION_MARKER: &str = "Subscription Set:";

/// Count the subscription sets listed in a diagnostic payload.
pub fn count_subscriptions(text: &str) -> usize {
    text.matches(SUBSCRIPTION_MARKER).count()
}

/// A connection record plus the attributes derived by enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedConnection {
    pub record: ConnectionRecord,
    /// Set only when subscriptions were resolved.
    pub subscriptions: Option<usize>,
}

impl EnrichedConnection {
    pub fn plain(record: ConnectionRecord) -> Self {
        Self {
            record,
            subscriptions: None,
        }
    }

    pub fn with_subscriptions(record: ConnectionRecord, subscriptions: usize) -> Self {
        Self {
            record,
            subscriptions: Some(subscriptions),
        }
    }
}

/// Register the connection bindings.
///
/// The six base columns are always present; the subscription count is
/// appended when `resolve_subscriptions` is set.
pub fn connection_mapper(
    resolve_subscriptions: bool,
) -> SourceResult<RecordMapperBuilder<EnrichedConnection>> {
    let mut builder = RecordMapperBuilder::new();
    builder
        .for_string(NAME, |c: &EnrichedConnection| c.record.name.clone())?
        .for_string(FULL_NAME, |c: &EnrichedConnection| c.record.full_name.clone())?
        .for_string(FRIENDLY_NAME, |c: &EnrichedConnection| {
            c.record.friendly_name.clone()
        })?
        .for_string(CONNECTION_ID, |c: &EnrichedConnection| {
            c.record.connection_id_string()
        })?
        .for_date_time(CONNECT_TIME, |c: &EnrichedConnection| {
            c.record.connect_time_utc()
        })?
        .for_string(ATTRIBUTES, |c: &EnrichedConnection| c.record.attributes_text())?;

    if resolve_subscriptions {
        builder.register(SUBSCRIPTIONS, |c: &EnrichedConnection| {
            c.subscriptions
                .map(|n| n as f64)
                .ok_or_else(|| "subscription count was not resolved".to_string())
        })?;
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::models::{CellValue, ColumnType};
    use chrono::DateTime;
    use uuid::Uuid;

    fn record() -> ConnectionRecord {
        let time = DateTime::parse_from_rfc3339("2026-07-01T23:30:00-04:00").unwrap();
        ConnectionRecord::new("ops", Uuid::from_u128(42), time)
            .with_full_name("ops@cluster")
            .with_friendly_name("Operator")
    }

    #[test]
    fn test_count_subscriptions() {
        assert_eq!(
            count_subscriptions("Subscription Set: A Subscription Set: B"),
            2
        );
        assert_eq!(count_subscriptions("no markers here"), 0);
        assert_eq!(count_subscriptions(""), 0);
        assert_eq!(
            count_subscriptions("header\nSubscription Set: A\nSubscription Set:\n"),
            2
        );
        assert_eq!(count_subscriptions("Subscription Set:Subscription Set:"), 2);
    }

    #[test]
    fn test_base_layout() {
        let (schema, _) = connection_mapper(false).unwrap().build();
        assert_eq!(
            schema.column_names(),
            vec![NAME, FULL_NAME, FRIENDLY_NAME, CONNECTION_ID, CONNECT_TIME, ATTRIBUTES]
        );
        assert_eq!(schema.columns()[4].column_type, ColumnType::DateTime);
    }

    #[test]
    fn test_enriched_layout() {
        let (schema, _) = connection_mapper(true).unwrap().build();
        assert_eq!(schema.len(), 7);
        assert_eq!(schema.columns()[6].name, SUBSCRIPTIONS);
        assert_eq!(schema.columns()[6].column_type, ColumnType::Double);
    }

    #[test]
    fn test_row_values() {
        let (_, rows) = connection_mapper(true).unwrap().build();
        let row = rows
            .apply(&EnrichedConnection::with_subscriptions(record(), 3))
            .unwrap();

        assert_eq!(row.cells()[0], CellValue::String("ops".into()));
        assert_eq!(row.cells()[1], CellValue::String("ops@cluster".into()));
        assert_eq!(row.cells()[2], CellValue::String("Operator".into()));
        assert_eq!(
            row.cells()[3],
            CellValue::String("00000000-0000-0000-0000-00000000002a".into())
        );
        assert_eq!(
            row.cells()[4].as_date_time().unwrap().to_rfc3339(),
            "2026-07-02T03:30:00+00:00"
        );
        assert_eq!(row.cells()[5], CellValue::String(String::new()));
        assert_eq!(row.cells()[6], CellValue::Double(3.0));
    }

    #[test]
    fn test_unresolved_subscriptions_fail_row() {
        let (_, rows) = connection_mapper(true).unwrap().build();
        let err = rows.apply(&EnrichedConnection::plain(record())).unwrap_err();
        assert!(matches!(err, SourceError::Extraction { ref column, .. } if column == SUBSCRIPTIONS));
    }
}
