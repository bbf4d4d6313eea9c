//! Source arguments and their validation.
//!
//! Arguments arrive as a loose key/value map (from the CLI or a hosting query
//! engine) and are validated into [`SourceOptions`] before any upstream
//! request is made.

use crate::error::{SourceError, SourceResult};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Raw arguments as supplied by the caller.
pub type SourceArguments = serde_json::Map<String, JsonValue>;

/// Canonical key of the enrichment toggle.
pub const RESOLVE_SUBSCRIPTIONS: &str = "resolveSubscriptions";

/// Display label of the enrichment toggle, accepted as an alias.
pub const RESOLVE_SUBSCRIPTIONS_LABEL: &str = "Resolve Subscriptions";

/// Validated source options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceOptions {
    /// Default: false
    pub resolve_subscriptions: bool,
}

impl SourceOptions {
    pub fn with_resolve_subscriptions(mut self, resolve: bool) -> Self {
        self.resolve_subscriptions = resolve;
        self
    }

    /// Validate a raw argument map.
    ///
    /// Keys are matched ignoring case, spaces, `-` and `_`, so both
    /// `resolveSubscriptions` and `Resolve Subscriptions` are recognized.
    /// Unknown keys and non-boolean values are rejected; `null` keeps the default.
    /// Two spellings of the same key in one map are rejected.
    pub fn from_arguments(arguments: &SourceArguments) -> SourceResult<Self> {
        let mut options = Self::default();
        let mut seen: HashMap<&'static str, &str> = HashMap::new();

        for (key, value) in arguments {
            let canonical = canonical_key(key).ok_or_else(|| {
                SourceError::configuration(format!(
                    "Unrecognized argument '{key}'. Supported: {RESOLVE_SUBSCRIPTIONS} ({RESOLVE_SUBSCRIPTIONS_LABEL})"
                ))
            })?;
            if let Some(previous) = seen.insert(canonical, key.as_str()) {
                return Err(SourceError::configuration(format!(
                    "Argument '{key}' conflicts with '{previous}': both set {canonical}"
                )));
            }

            // resolveSubscriptions is the only recognized key
            options.resolve_subscriptions = match value {
                JsonValue::Bool(b) => *b,
                JsonValue::Null => false,
                other => {
                    return Err(SourceError::configuration(format!(
                        "'{key}' must be a boolean, got {other}"
                    )));
                }
            };
        }

        Ok(options)
    }
}

/// Map an argument key to its canonical name.
///
/// Keys are matched ignoring case, spaces, `-` and `_`. Returns `None` for
/// unrecognized keys.
pub fn canonical_key(key: &str) -> Option<&'static str> {
    match normalize_key(key).as_str() {
        "resolvesubscriptions" => Some(RESOLVE_SUBSCRIPTIONS),
        _ => None,
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse a single `key=value` argument.
///
/// # Format
///
/// - `key=true` / `key=false` - boolean (case-insensitive)
/// - `key=anything else` - string
/// - `key` - boolean `true`
pub fn parse_argument(s: &str) -> SourceResult<(String, JsonValue)> {
    let (key, value) = match s.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (s.trim(), None),
    };

    if key.is_empty() {
        return Err(SourceError::configuration(format!(
            "Invalid argument '{s}': expected key=value"
        )));
    }

    let value = match value {
        None => JsonValue::Bool(true),
        Some(v) if v.eq_ignore_ascii_case("true") => JsonValue::Bool(true),
        Some(v) if v.eq_ignore_ascii_case("false") => JsonValue::Bool(false),
        Some(v) => JsonValue::String(v.to_string()),
    };

    Ok((key.to_string(), value))
}

/// Parse a list of `key=value` arguments into an argument map.
///
/// Later occurrences of a key override earlier ones.
pub fn parse_arguments<S: AsRef<str>>(items: &[S]) -> SourceResult<SourceArguments> {
    let mut arguments = SourceArguments::new();
    for item in items {
        let (key, value) = parse_argument(item.as_ref())?;
        arguments.insert(key, value);
    }
    Ok(arguments)
}
