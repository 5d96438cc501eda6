//! An in-memory ordered key-value index combining a learned hierarchical
//! index (AFLI) with an optional learned numeric transform (NFL) that
//! flattens the key distribution before it enters the index.

/// Adaptive, model-driven hierarchical index.
pub mod afli;
/// Flat `key=value` configuration file parsing, shared by [`afli`] and [`nfl`].
pub mod config;
/// Shared error types.
pub mod error;
/// Distribution-flattening front-end over [`afli`].
pub mod nfl;
/// Stable request/operation types shared with external workload harnesses.
pub mod request;

pub use afli::{Afli, Cursor, InsertOutcome};
pub use error::ConfigError;
pub use nfl::Nfl;
pub use request::{OpCode, Request};
