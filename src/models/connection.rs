//! Connection-related data models.
//!
//! A [`ConnectionRecord`] is the immutable snapshot of one active client
//! session as reported by the control plane's client list.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub name: String,
    pub full_name: String,
    pub friendly_name: String,
    pub connection_id: Uuid,
    /// Offset as reported by the upstream; normalized to UTC on output.
    pub connect_time: DateTime<FixedOffset>,
    /// Opaque attribute blob. Absent when the upstream reports none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsonValue>,
}

impl ConnectionRecord {
    /// Create a new connection record without attributes.
    pub fn new(
        name: impl Into<String>,
        connection_id: Uuid,
        connect_time: DateTime<FixedOffset>,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            friendly_name: name.clone(),
            name,
            connection_id,
            connect_time,
            attributes: None,
        }
    }

    /// Set the full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the friendly name.
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = friendly_name.into();
        self
    }

    /// Set the attribute blob.
    pub fn with_attributes(mut self, attributes: JsonValue) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Canonical string form of the connection identifier.
    pub fn connection_id_string(&self) -> String {
        self.connection_id.hyphenated().to_string()
    }

    pub fn connect_time_utc(&self) -> DateTime<Utc> {
        self.connect_time.with_timezone(&Utc)
    }

    /// Textual rendering of the attribute blob.
    ///
    /// Strings are rendered without quotes, other JSON values in their compact
    /// JSON form. Absent or null attributes render as an empty string.
    pub fn attributes_text(&self) -> String {
        match &self.attributes {
            None | Some(JsonValue::Null) => String::new(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Bool(b)) => b.to_string(),
            Some(JsonValue::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}
