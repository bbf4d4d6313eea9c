//! Configuration handling for the connections source CLI.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use crate::error::SourceResult;
use crate::output::OutputFormat;
use crate::source::{
    DEFAULT_REQUEST_TIMEOUT_SECS, RESOLVE_SUBSCRIPTIONS, SourceArguments, canonical_key,
    parse_arguments,
};
use clap::Parser;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the connections source.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "connections-source",
    about = "Lists the active client connections of a control plane as a typed table",
    version,
    author
)]
pub struct Config {
    /// Connection snapshot file (JSON) served as the upstream
    #[arg(
        short = 's',
        long = "snapshot",
        value_name = "PATH",
        env = "CONNECTIONS_SNAPSHOT"
    )]
    pub snapshot: PathBuf,

    /// Resolve the number of subscriptions per connection (one extra request each)
    #[arg(long, env = "CONNECTIONS_RESOLVE_SUBSCRIPTIONS")]
    pub resolve_subscriptions: bool,

    /// Additional source arguments.
    /// Format: "key=value". Can be specified multiple times.
    #[arg(
        short = 'a',
        long = "arg",
        value_name = "KEY=VALUE",
        env = "CONNECTIONS_ARGS",
        value_delimiter = ','
    )]
    pub arguments: Vec<String>,

    /// Output format (json, table or markdown)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "json",
        env = "CONNECTIONS_FORMAT"
    )]
    pub format: OutputFormat,

    /// Timeout for a single upstream request in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        env = "CONNECTIONS_REQUEST_TIMEOUT"
    )]
    pub request_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "CONNECTIONS_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "CONNECTIONS_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output on stderr
    #[arg(long, env = "CONNECTIONS_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            snapshot: PathBuf::from("connections.json"),
            resolve_subscriptions: false,
            arguments: Vec::new(),
            format: OutputFormat::Json,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Build the source argument map.
    ///
    /// An explicit `--arg` for the subscription toggle wins over
    /// `--resolve-subscriptions`, whichever spelling of the key it uses. The
    /// flag only fills the toggle in when no such argument is given.
    pub fn source_arguments(&self) -> SourceResult<SourceArguments> {
        let mut arguments = parse_arguments(&self.arguments)?;
        let explicit = arguments
            .keys()
            .any(|key| canonical_key(key) == Some(RESOLVE_SUBSCRIPTIONS));
        if self.resolve_subscriptions && !explicit {
            arguments.insert(RESOLVE_SUBSCRIPTIONS.to_string(), JsonValue::Bool(true));
        }
        Ok(arguments)
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceOptions;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(!config.resolve_subscriptions);
    }

    #[test]
    fn test_request_timeout_duration() {
        let config = Config {
            request_timeout: 5,
            ..Config::default()
        };
        assert_eq!(config.request_timeout_duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_cli() {
        let config = Config::try_parse_from([
            "connections-source",
            "--snapshot",
            "snap.json",
            "--resolve-subscriptions",
            "--format",
            "table",
        ])
        .unwrap();
        assert_eq!(config.snapshot, PathBuf::from("snap.json"));
        assert_eq!(config.format, OutputFormat::Table);

        let options = SourceOptions::from_arguments(&config.source_arguments().unwrap()).unwrap();
        assert!(options.resolve_subscriptions);
    }

    #[test]
    fn test_generic_arguments() {
        let config = Config {
            arguments: vec!["Resolve Subscriptions=true".to_string()],
            ..Config::default()
        };
        let options = SourceOptions::from_arguments(&config.source_arguments().unwrap()).unwrap();
        assert!(options.resolve_subscriptions);
    }

    #[test]
    fn test_explicit_argument_overrides_flag() {
        for spelling in [
            "resolveSubscriptions=false",
            "resolve_subscriptions=false",
            "Resolve Subscriptions=false",
        ] {
            let config = Config {
                resolve_subscriptions: true,
                arguments: vec![spelling.to_string()],
                ..Config::default()
            };
            let arguments = config.source_arguments().unwrap();
            assert_eq!(arguments.len(), 1, "{spelling}");
            let options = SourceOptions::from_arguments(&arguments).unwrap();
            assert!(!options.resolve_subscriptions, "{spelling} should win");
        }
    }

    #[test]
    fn test_conflicting_explicit_arguments_rejected() {
        let config = Config {
            arguments: vec![
                "resolveSubscriptions=true".to_string(),
                "resolve_subscriptions=false".to_string(),
            ],
            ..Config::default()
        };
        let arguments = config.source_arguments().unwrap();
        assert!(SourceOptions::from_arguments(&arguments).is_err());
    }

    #[test]
    fn test_unknown_argument_rejected_on_validation() {
        let config = Config {
            arguments: vec!["pageSize=50".to_string()],
            ..Config::default()
        };
        let arguments = config.source_arguments().unwrap();
        assert!(SourceOptions::from_arguments(&arguments).is_err());
    }
}
