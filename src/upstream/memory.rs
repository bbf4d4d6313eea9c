//! In-memory upstream.
//!
//! Serves a fixed connection snapshot plus per-connection diagnostic text.
//! Every request is recorded so callers can inspect what was sent and in
//! which order. The upstream can be taken offline to simulate a lost session.

use crate::error::{SourceError, SourceResult};
use crate::models::{ConnectionRecord, Request, Response};
use crate::upstream::Upstream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// On-disk snapshot format.
///
/// ```json
/// {
///   "connections": [ { "name": "...", "connection_id": "...", ... } ],
///   "diagnostics": { "<connection id>": "Subscription Set: ..." }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    /// Diagnostic text keyed by connection identifier.
    #[serde(default)]
    pub diagnostics: HashMap<String, String>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::snapshot(format!("Failed to read file: {e}"), &display))?;
        serde_json::from_str(&contents)
            .map_err(|e| SourceError::snapshot(format!("Invalid snapshot JSON: {e}"), &display))
    }
}

/// Normalize a diagnostic key so lookups match the canonical id form.
fn normalize_target(target: &str) -> String {
    Uuid::parse_str(target)
        .map(|id| id.hyphenated().to_string())
        .unwrap_or_else(|_| target.to_string())
}

pub struct InMemoryUpstream {
    bulk: Vec<Response>,
    diagnostics: HashMap<String, Response>,
    online: AtomicBool,
    latency: Option<Duration>,
    requests: Mutex<Vec<Request>>,
}

impl InMemoryUpstream {
    /// Create an empty, online upstream.
    pub fn new() -> Self {
        Self {
            bulk: Vec::new(),
            diagnostics: HashMap::new(),
            online: AtomicBool::new(true),
            latency: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut upstream = Self::new();
        for record in snapshot.connections {
            upstream = upstream.with_connection(record);
        }
        for (target, text) in snapshot.diagnostics {
            upstream = upstream.with_diagnostic(&target, text);
        }
        upstream
    }

    /// Load a snapshot file and serve it.
    pub async fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        Ok(Self::from_snapshot(Snapshot::load(path).await?))
    }

    /// Append a connection to the bulk reply.
    pub fn with_connection(self, record: ConnectionRecord) -> Self {
        self.with_bulk_response(Response::LoginInfo(record))
    }

    /// Append an arbitrary message to the bulk reply.
    pub fn with_bulk_response(mut self, response: Response) -> Self {
        self.bulk.push(response);
        self
    }

    /// Set the diagnostic text returned for a connection.
    pub fn with_diagnostic(self, target: &str, text: impl Into<String>) -> Self {
        self.with_diagnostic_response(target, Response::Text(text.into()))
    }

    /// Set an arbitrary diagnostic reply for a connection.
    pub fn with_diagnostic_response(mut self, target: &str, response: Response) -> Self {
        self.diagnostics.insert(normalize_target(target), response);
        self
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn connection_count(&self) -> usize {
        self.bulk
            .iter()
            .filter(|r| matches!(r, Response::LoginInfo(_)))
            .count()
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.lock().await.clone()
    }

    async fn receive(&self, request: &Request) -> SourceResult<()> {
        self.requests.lock().await.push(request.clone());
        debug!(?request, "In-memory upstream received request");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.online.load(Ordering::SeqCst) {
            return Err(SourceError::upstream_unavailable(
                "Session to the control plane is offline",
                "Reconnect the upstream session and retry",
            ));
        }
        Ok(())
    }

    fn diagnostic_reply(&self, target: &str) -> Response {
        // Connections without a diagnostic entry report no subscriptions.
        self.diagnostics
            .get(&normalize_target(target))
            .cloned()
            .unwrap_or_else(|| Response::Text(String::new()))
    }
}

impl Default for InMemoryUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Upstream for InMemoryUpstream {
    async fn send_messages(&self, request: Request) -> SourceResult<Vec<Response>> {
        self.receive(&request).await?;
        match request {
            Request::GetInfo(_) => Ok(self.bulk.clone()),
            Request::Diagnose { target, .. } => Ok(vec![self.diagnostic_reply(&target)]),
        }
    }

    async fn send_message(&self, request: Request) -> SourceResult<Response> {
        self.receive(&request).await?;
        match request {
            Request::Diagnose { target, .. } => Ok(self.diagnostic_reply(&target)),
            Request::GetInfo(_) => Err(SourceError::protocol(
                "single-reply request",
                "GetInfo (multi-reply)",
            )),
        }
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
