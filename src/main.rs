//! Connections Source - Main entry point.
//!
//! Loads a connection snapshot, runs one query invocation against it and
//! prints the resulting page to stdout.

use clap::Parser;
use connections_source::config::Config;
use connections_source::output;
use connections_source::source::SourceOptions;
use connections_source::{ConnectionSource, InMemoryUpstream};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the page.
fn init_tracing(config: &Config) {
    if !config.enable_logs {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!(
        snapshot = %config.snapshot.display(),
        "Starting connections source v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Validate arguments before touching the snapshot
    let options = SourceOptions::from_arguments(&config.source_arguments()?)?;

    let upstream = Arc::new(InMemoryUpstream::load(&config.snapshot).await?);
    info!(
        connections = upstream.connection_count(),
        "Loaded connection snapshot"
    );

    let mut source = ConnectionSource::with_request_timeout(config.request_timeout_duration());
    source.initialize(upstream)?;
    source.configure_with(options)?;

    let start = Instant::now();
    let page = match source.fetch_page().await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, suggestion = ?e.suggestion(), "Failed to fetch connections");
            return Err(e.into());
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let rendered = output::render(config.format, source.columns()?, &page, elapsed_ms)?;
    println!("{rendered}");

    Ok(())
}
