//! Connections data source.
//!
//! This module drives one query invocation end to end:
//! - `options`: argument validation
//! - `columns`: column layout and subscription-count parsing
//!
//! # Lifecycle
//!
//! 1. `initialize()` - bind the upstream handle (exactly once)
//! 2. `configure()` - validate arguments, build schema and row builder
//! 3. `fetch_page()` - bulk fetch, optional enrichment, row mapping
//!
//! A configured source can serve any number of `fetch_page()` calls. Each call
//! materializes the full snapshot as a single terminal page.

pub mod columns;
pub mod options;

pub use columns::{EnrichedConnection, SUBSCRIPTION_MARKER, count_subscriptions};
pub use options::{
    RESOLVE_SUBSCRIPTIONS, SourceArguments, SourceOptions, canonical_key, parse_argument,
    parse_arguments,
};

use crate::error::{SourceError, SourceResult};
use crate::mapping::RowBuilder;
use crate::models::{ConnectionRecord, Page, Request, Response, Schema};
use crate::upstream::Upstream;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default timeout for a single upstream request in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Schema and row builder selected by `configure()`.
#[derive(Debug, Clone)]
struct QueryPlan {
    options: SourceOptions,
    schema: Schema,
    rows: RowBuilder<EnrichedConnection>,
}

/// Data source exposing the control plane's active client connections.
pub struct ConnectionSource<U> {
    upstream: Option<Arc<U>>,
    plan: Option<QueryPlan>,
    request_timeout: Duration,
}

impl<U: Upstream> ConnectionSource<U> {
    /// Create an uninitialized source with default settings.
    pub fn new() -> Self {
        Self::with_request_timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create an uninitialized source with a custom per-request timeout.
    ///
    /// When the timeout fires the in-flight upstream request is abandoned
    /// (its future is dropped) and the invocation fails with
    /// [`SourceError::UpstreamUnavailable`]. Whether the upstream itself stops
    /// work on the dropped request is up to the transport.
    pub fn with_request_timeout(request_timeout: Duration) -> Self {
        Self {
            upstream: None,
            plan: None,
            request_timeout,
        }
    }

    /// Bind the upstream handle. Must be called exactly once.
    pub fn initialize(&mut self, upstream: Arc<U>) -> SourceResult<()> {
        if self.upstream.is_some() {
            return Err(SourceError::configuration(
                "Source is already initialized; the upstream handle is bound once",
            ));
        }
        debug!(upstream = upstream.name(), "Initialized connections source");
        self.upstream = Some(upstream);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.upstream.is_some()
    }

    pub fn is_configured(&self) -> bool {
        self.plan.is_some()
    }

    /// Validate arguments and select the schema.
    ///
    /// Performs no upstream request. Reconfiguring replaces the previous plan.
    pub fn configure(&mut self, arguments: &SourceArguments) -> SourceResult<&Schema> {
        self.upstream("configure")?;
        let options = SourceOptions::from_arguments(arguments)?;
        self.configure_with(options)
    }

    /// Select the schema from already validated options.
    pub fn configure_with(&mut self, options: SourceOptions) -> SourceResult<&Schema> {
        self.upstream("configure")?;
        let (schema, rows) = columns::connection_mapper(options.resolve_subscriptions)?.build();

        info!(
            resolve_subscriptions = options.resolve_subscriptions,
            columns = schema.len(),
            "Configured connections source"
        );

        let plan = self.plan.insert(QueryPlan {
            options,
            schema,
            rows,
        });
        Ok(&plan.schema)
    }

    /// The configured column layout.
    pub fn columns(&self) -> SourceResult<&Schema> {
        self.upstream("columns")?;
        Ok(&self.plan("columns")?.schema)
    }

    pub fn options(&self) -> SourceResult<SourceOptions> {
        self.upstream("options")?;
        Ok(self.plan("options")?.options)
    }

    /// Produce the single page of connections.
    ///
    /// Rows follow the order of the bulk reply. With subscription resolution
    /// enabled, one diagnostic request is issued per connection, sequentially
    /// and in that same order. Any failure aborts the whole page.
    pub async fn fetch_page(&self) -> SourceResult<Page> {
        let upstream = self.upstream("fetch_page")?;
        let plan = self.plan("fetch_page")?;
        let start = Instant::now();

        let records = self.fetch_connections(upstream.as_ref()).await?;

        let connections = if plan.options.resolve_subscriptions {
            self.resolve_subscriptions(upstream.as_ref(), records)
                .await?
        } else {
            records.into_iter().map(EnrichedConnection::plain).collect()
        };

        let rows = plan.rows.apply_all(&connections)?;

        info!(
            rows = rows.len(),
            columns = plan.schema.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched connections page"
        );

        Ok(Page::last(rows))
    }

    async fn fetch_connections(&self, upstream: &U) -> SourceResult<Vec<ConnectionRecord>> {
        let responses = self
            .bounded("client list", upstream.send_messages(Request::client_list()))
            .await?;

        let total = responses.len();
        let records: Vec<ConnectionRecord> = responses
            .into_iter()
            .filter_map(|response| match response {
                Response::LoginInfo(record) => Some(record),
                other => {
                    debug!(kind = other.kind(), "Skipping non-connection reply");
                    None
                }
            })
            .collect();

        debug!(
            replies = total,
            connections = records.len(),
            "Received client list"
        );
        Ok(records)
    }

    async fn resolve_subscriptions(
        &self,
        upstream: &U,
        records: Vec<ConnectionRecord>,
    ) -> SourceResult<Vec<EnrichedConnection>> {
        let mut connections = Vec::with_capacity(records.len());

        for record in records {
            let target = record.connection_id_string();
            let response = self
                .bounded(
                    "open connections diagnostic",
                    upstream.send_message(Request::open_connections(&target)),
                )
                .await?;

            let text = match response {
                Response::Text(text) => text,
                other => {
                    warn!(connection_id = %target, kind = other.kind(), "Unexpected diagnostic reply");
                    return Err(SourceError::protocol("Text", other.kind()));
                }
            };

            let count = count_subscriptions(&text);
            debug!(connection_id = %target, subscriptions = count, "Resolved subscriptions");
            connections.push(EnrichedConnection::with_subscriptions(record, count));
        }

        Ok(connections)
    }

    /// Apply the request timeout to one upstream call.
    async fn bounded<T>(
        &self,
        operation: &str,
        request: impl Future<Output = SourceResult<T>>,
    ) -> SourceResult<T> {
        match timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::upstream_unavailable(
                format!(
                    "{operation} request timed out after {}ms",
                    self.request_timeout.as_millis()
                ),
                "Check the upstream session or increase the request timeout",
            )),
        }
    }

    fn upstream(&self, operation: &str) -> SourceResult<&Arc<U>> {
        self.upstream
            .as_ref()
            .ok_or_else(|| SourceError::not_initialized(operation))
    }

    fn plan(&self, operation: &str) -> SourceResult<&QueryPlan> {
        self.plan.as_ref().ok_or_else(|| {
            SourceError::configuration(format!("{operation} requires configure() to be called first"))
        })
    }
}

impl<U: Upstream> Default for ConnectionSource<U> {
    fn default() -> Self {
        Self::new()
    }
}
