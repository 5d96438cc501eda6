//! Flat `key=value` config file parsing.
//!
//! The format is one pair per whitespace-separated token, e.g.
//! `bucket_size=16 aggregate_size=0`. Unknown keys are ignored by callers;
//! malformed values are reported back to the caller as `(key, value)` pairs
//! so it can decide whether to abort.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Parses `text` into a map of raw string key/value pairs.
///
/// This never fails: a malformed token (no `=`) is skipped. Type-level
/// validation (e.g. "is this an integer") is the caller's job, since each
/// config struct knows which keys it expects and what their types are.
pub fn parse_pairs(text: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for token in text.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            pairs.insert(key.to_string(), value.to_string());
        }
    }
    pairs
}

/// Reads and parses a config file at `path`.
pub fn read_pairs(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parse_pairs(&text))
}

/// Parses an `i64`-valued key out of `pairs`, returning `default` if absent.
///
/// A malformed value still aborts the overall load (§7), but the offending
/// key is logged here, at the point it's discovered, rather than silently
/// folded into the caller's `?` chain (§10.2).
pub fn parse_i64(
    pairs: &HashMap<String, String>,
    key: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    match pairs.get(key) {
        None => Ok(default),
        Some(value) => value.parse::<i64>().map_err(|_| {
            tracing::warn!(key, value, "malformed config value, load will abort");
            ConfigError::UnparseableValue {
                key: key.to_string(),
                value: value.clone(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_unknown() {
        let pairs = parse_pairs("bucket_size=16 aggregate_size=0 mystery=42");
        assert_eq!(pairs.get("bucket_size").map(String::as_str), Some("16"));
        assert_eq!(pairs.get("aggregate_size").map(String::as_str), Some("0"));
        assert_eq!(pairs.get("mystery").map(String::as_str), Some("42"));
    }

    #[test]
    fn parse_i64_reports_malformed_value() {
        let pairs = parse_pairs("bucket_size=not_a_number");
        let err = parse_i64(&pairs, "bucket_size", -1).unwrap_err();
        assert!(matches!(err, ConfigError::UnparseableValue { .. }));
    }

    #[test]
    fn parse_i64_defaults_when_absent() {
        let pairs = parse_pairs("aggregate_size=0");
        assert_eq!(parse_i64(&pairs, "bucket_size", -1).unwrap(), -1);
    }
}
