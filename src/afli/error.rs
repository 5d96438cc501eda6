use thiserror::Error;

/// Errors raised by [`super::Afli`].
///
/// `DuplicateKey` and `NotFound` are the non-fatal classes from the design's
/// error taxonomy (they are everyday outcomes, not bugs); `MalformedInput` is
/// the fatal class and is only returned from `bulk_load`, never panicked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AfliError {
    #[error("malformed bulk-load input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, AfliError>;
