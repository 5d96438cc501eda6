//! Adaptive, model-driven hierarchical index (AFLI).
//!
//! [`Afli`] owns the root [`node`], bulk-loads a sorted unique key sequence
//! into it, and serves point operations by descending through per-node
//! affine models, falling back to small sorted buckets and (rarely) child
//! nodes to resolve model collisions (§4).

pub(crate) mod bucket;
pub mod config;
mod cursor;
pub mod error;
pub(crate) mod key;
mod node;

pub use config::AfliConfig;
pub use cursor::Cursor;
pub use error::AfliError;
pub use key::Key;

use node::{Node, NodeInsert};

/// Outcome of [`Afli::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The key was already present; no mutation happened (§4.3, §7).
    Duplicate,
}

/// Root holder: bulk-load, point ops, conflict-driven rebuild of subtrees (§4.3).
pub struct Afli<K, V> {
    root: Option<Node<K, V>>,
    config: AfliConfig,
}

impl<K: Key, V: Clone> Afli<K, V> {
    pub fn new(config: AfliConfig) -> Self {
        Self { root: None, config }
    }

    /// Builds the index from a sorted, unique key sequence.
    ///
    /// `tail_conflicts`, when given, is an estimate of residual collisions
    /// from an upstream [`crate::nfl::Nfl`] transform; it widens the root's
    /// slot count so a weak transform doesn't concentrate keys into a few
    /// slots (§3, `tail_conflicts`).
    pub fn bulk_load(
        &mut self,
        data: &[(K, V)],
        tail_conflicts: Option<u64>,
    ) -> error::Result<()> {
        for pair in data.windows(2) {
            if !(pair[0].0.to_f64() < pair[1].0.to_f64()) {
                return Err(AfliError::MalformedInput(
                    "bulk_load data must be strictly sorted with unique keys".to_string(),
                ));
            }
        }
        if data.is_empty() {
            self.root = None;
            return Ok(());
        }
        let size_floor = tail_conflicts.map(|tc| data.len() + tc as usize);
        self.root = Some(node::build(data, &self.config, size_floor));
        tracing::info!(keys = data.len(), tail_conflicts, "bulk_load complete");
        Ok(())
    }

    pub fn find(&self, k: K) -> Cursor<'_, V> {
        match self.root.as_ref().and_then(|root| root.find(k)) {
            Some(v) => Cursor::found(v),
            None => Cursor::end(),
        }
    }

    pub fn insert(&mut self, k: K, v: V) -> InsertOutcome {
        match self.root.as_mut() {
            None => {
                self.root = Some(node::build(&[(k, v)], &self.config, None));
                InsertOutcome::Inserted
            }
            Some(root) => match root.insert(k, v, &self.config) {
                NodeInsert::Inserted => InsertOutcome::Inserted,
                NodeInsert::Duplicate => InsertOutcome::Duplicate,
            },
        }
    }

    pub fn update(&mut self, k: K, v: V) -> bool {
        self.root.as_mut().is_some_and(|root| root.update(k, v))
    }

    /// Returns `1` if a matching key was removed, `0` otherwise.
    pub fn remove(&mut self, k: K) -> usize {
        usize::from(self.root.as_mut().is_some_and(|root| root.remove(k)))
    }

    /// Byte accounting for the per-node affine models alone.
    pub fn model_size(&self) -> usize {
        self.root.as_ref().map_or(0, Node::model_size)
    }

    /// Byte accounting for the full Node/Bucket/Child storage tree.
    pub fn index_size(&self) -> usize {
        self.root.as_ref().map_or(0, Node::index_size)
    }

    #[cfg(test)]
    pub(crate) fn audit(&self) -> bool {
        self.root.as_ref().map_or(true, Node::audit)
    }
}
