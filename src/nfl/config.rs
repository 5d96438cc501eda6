use crate::afli::config::AfliConfig;
use crate::config;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// `bucket_size` / `aggregate_size` / `weights_path`, recognized by NFL
/// config files (§6). The first two are forwarded to the underlying AFLI.
#[derive(Debug, Clone)]
pub struct NflConfig {
    afli: AfliConfig,
    weights_path: Option<PathBuf>,
}

impl NflConfig {
    pub fn new(afli: AfliConfig, weights_path: Option<PathBuf>) -> Self {
        Self { afli, weights_path }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let pairs = config::read_pairs(path)?;
        let afli = AfliConfig::from_pairs(&pairs)?;
        let weights_path = pairs.get("weights_path").map(PathBuf::from);
        Ok(Self { afli, weights_path })
    }

    pub fn afli_config(&self) -> AfliConfig {
        self.afli
    }

    pub fn weights_path(&self) -> Option<&Path> {
        self.weights_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weights_path_alongside_afli_keys() {
        let pairs = config::parse_pairs("bucket_size=8 weights_path=/tmp/weights.bin");
        let afli = AfliConfig::from_pairs(&pairs).unwrap();
        let weights_path = pairs.get("weights_path").map(PathBuf::from);
        let cfg = NflConfig::new(afli, weights_path);
        assert_eq!(cfg.afli_config().bucket_size(), 8);
        assert_eq!(cfg.weights_path(), Some(Path::new("/tmp/weights.bin")));
    }

    #[test]
    fn weights_path_absent_by_default() {
        let cfg = NflConfig::new(AfliConfig::default(), None);
        assert_eq!(cfg.weights_path(), None);
    }
}
