use crate::afli::AfliError;
use thiserror::Error;

/// Errors raised by [`super::Nfl`].
#[derive(Error, Debug)]
pub enum NflError {
    #[error("failed to load transform weights from `{path}`: {reason}")]
    WeightsLoad { path: String, reason: String },
    #[error(transparent)]
    Index(#[from] AfliError),
}

pub type Result<T> = std::result::Result<T, NflError>;
