use thiserror::Error;

/// Errors raised while loading a flat `key=value` configuration file,
/// shared by [`crate::afli::config::AfliConfig`] and [`crate::nfl::config::NflConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unparseable value for key `{key}`: `{value}`")]
    UnparseableValue { key: String, value: String },
}
