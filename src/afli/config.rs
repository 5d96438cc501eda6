use crate::config;
use crate::error::ConfigError;
use std::path::Path;

/// `-1` means "implementation default"; resolved by [`AfliConfig::bucket_size`].
const BUCKET_SIZE_DEFAULT_SENTINEL: i64 = -1;
/// `0` means "auto"; resolved by [`AfliConfig::aggregate_size`].
const AGGREGATE_SIZE_AUTO_SENTINEL: i64 = 0;

/// The concrete bucket capacity used when config says "implementation default".
pub const DEFAULT_BUCKET_SIZE: usize = 16;

/// `bucket_size` / `aggregate_size`, recognized by AFLI config files (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfliConfig {
    bucket_size: i64,
    aggregate_size: i64,
}

impl Default for AfliConfig {
    fn default() -> Self {
        Self {
            bucket_size: BUCKET_SIZE_DEFAULT_SENTINEL,
            aggregate_size: AGGREGATE_SIZE_AUTO_SENTINEL,
        }
    }
}

impl AfliConfig {
    pub fn new(bucket_size: i64, aggregate_size: i64) -> Self {
        Self {
            bucket_size,
            aggregate_size,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let pairs = config::read_pairs(path)?;
        Self::from_pairs(&pairs)
    }

    /// Parses every recognized key before returning, so a malformed key
    /// further down the struct still gets logged (via `parse_i64`) even
    /// though an earlier malformed key is what ultimately aborts the load
    /// (§10.2).
    pub(crate) fn from_pairs(
        pairs: &std::collections::HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let bucket_size = config::parse_i64(pairs, "bucket_size", BUCKET_SIZE_DEFAULT_SENTINEL);
        let aggregate_size =
            config::parse_i64(pairs, "aggregate_size", AGGREGATE_SIZE_AUTO_SENTINEL);
        Ok(Self {
            bucket_size: bucket_size?,
            aggregate_size: aggregate_size?,
        })
    }

    /// Resolved bucket capacity B, `>= 1`.
    #[inline]
    pub fn bucket_size(&self) -> usize {
        if self.bucket_size <= 0 {
            DEFAULT_BUCKET_SIZE
        } else {
            self.bucket_size as usize
        }
    }

    /// `Some(target)` if the config pins an aggregate size, `None` for "auto".
    #[inline]
    pub fn aggregate_size(&self) -> Option<usize> {
        if self.aggregate_size <= 0 {
            None
        } else {
            Some(self.aggregate_size as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_sentinels() {
        let cfg = AfliConfig::default();
        assert_eq!(cfg.bucket_size(), DEFAULT_BUCKET_SIZE);
        assert_eq!(cfg.aggregate_size(), None);
    }

    #[test]
    fn explicit_values_are_honored() {
        let cfg = AfliConfig::new(4, 64);
        assert_eq!(cfg.bucket_size(), 4);
        assert_eq!(cfg.aggregate_size(), Some(64));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let pairs = config::parse_pairs("bucket_size=8 unrelated=xyz");
        let cfg = AfliConfig::from_pairs(&pairs).unwrap();
        assert_eq!(cfg.bucket_size(), 8);
    }

    #[test]
    fn malformed_value_aborts_load() {
        let pairs = config::parse_pairs("bucket_size=nope");
        assert!(AfliConfig::from_pairs(&pairs).is_err());
    }
}
