//! Stable record types for a single workload operation.
//!
//! These mirror the tagged operations carried by an external workload trace
//! (`BulkLoad`, `Query`, `Insert`, `Update`, `Delete`); this crate defines the
//! shape so a harness can depend on a stable type, but does not itself parse
//! trace files from disk.

/// Identifies the kind of operation a [`Request`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    BulkLoad,
    Query,
    Insert,
    Update,
    Delete,
}

/// A single tagged key/value operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request<K, V> {
    pub op: OpCode,
    pub key: K,
    pub value: V,
}

impl<K, V> Request<K, V> {
    pub fn new(op: OpCode, key: K, value: V) -> Self {
        Self { op, key, value }
    }
}
