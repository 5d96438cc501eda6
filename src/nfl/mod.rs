//! Distribution-flattening front-end over [`crate::afli::Afli`].
//!
//! NFL evaluates a small trained transform over a batch of keys, decides
//! once (at bulk-load time) whether the transform is worth using via
//! [`auto_switch`], and — when enabled — feeds the transformed keys to the
//! underlying AFLI instead of the raw ones. The shipped implementation fixes
//! `K = f64`, `V = u64` (§3).

mod auto_switch;
pub mod config;
pub mod error;
mod transform;

pub use config::NflConfig;
pub use error::NflError;
pub use transform::TransformModel;

use crate::afli::{Afli, AfliConfig, Cursor, InsertOutcome};
use error::Result;

/// Orchestrates decide-to-transform, batch transform, and indexed dispatch
/// to the underlying AFLI (§4.5).
pub struct Nfl {
    afli: Afli<f64, u64>,
    transform: TransformModel,
    batch_size: usize,
    enabled: bool,
    tail_conflicts: u64,
    /// Transformed (or, if disabled, raw) keys for the in-flight batch.
    /// Length is always `batch_size`; only `[0, batch_len)` is valid (§3).
    scratch: Vec<f64>,
    batch_len: usize,
}

impl Nfl {
    pub fn new(config: NflConfig, batch_size: usize) -> Result<Self> {
        let weights_path = config.weights_path().ok_or_else(|| NflError::WeightsLoad {
            path: String::new(),
            reason: "NflConfig has no weights_path".to_string(),
        })?;
        let transform = TransformModel::load(weights_path)?;
        Ok(Self {
            afli: Afli::new(config.afli_config()),
            transform,
            batch_size,
            enabled: false,
            tail_conflicts: 0,
            scratch: vec![0.0; batch_size],
            batch_len: 0,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_transform(
        afli_config: AfliConfig,
        transform: TransformModel,
        batch_size: usize,
    ) -> Self {
        Self {
            afli: Afli::new(afli_config),
            transform,
            batch_size,
            enabled: false,
            tail_conflicts: 0,
            scratch: vec![0.0; batch_size],
            batch_len: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tail_conflicts(&self) -> u64 {
        self.tail_conflicts
    }

    /// Runs `auto_switch` once, then bulk-loads AFLI with the transformed
    /// keys (if enabled) or the raw keys (if not). `data` must be sorted
    /// by key with no duplicates, same as `Afli::bulk_load`.
    pub fn bulk_load(&mut self, data: &[(f64, u64)]) -> Result<()> {
        let keys: Vec<f64> = data.iter().map(|(k, _)| *k).collect();
        let (enabled, tail_conflicts) = auto_switch::auto_switch(&keys, &self.transform);
        self.bulk_load_with(data, enabled, tail_conflicts)
    }

    /// Bypasses `auto_switch` and forces the enabled/disabled decision.
    /// Used by tests to exercise both paths over the same dataset (§8,
    /// invariant 7 — NFL transparency).
    #[cfg(test)]
    pub(crate) fn bulk_load_forced(&mut self, data: &[(f64, u64)], enabled: bool) -> Result<()> {
        self.bulk_load_with(data, enabled, 0)
    }

    fn bulk_load_with(
        &mut self,
        data: &[(f64, u64)],
        enabled: bool,
        tail_conflicts: u64,
    ) -> Result<()> {
        self.enabled = enabled;
        self.tail_conflicts = tail_conflicts;

        if !enabled {
            self.afli.bulk_load(data, Some(tail_conflicts))?;
            return Ok(());
        }

        let mut transformed: Vec<(f64, u64)> = data
            .iter()
            .map(|(k, v)| (self.transform.evaluate(*k), *v))
            .collect();
        transformed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        break_transform_ties(&mut transformed);
        self.afli.bulk_load(&transformed, Some(tail_conflicts))?;
        Ok(())
    }

    /// Transforms `keys` (if enabled) into the owned scratch buffer,
    /// positioning the in-flight batch at `[0, keys.len())` (§4.5,
    /// "Operation index indirection"). `keys.len()` must be `<= batch_size`.
    pub fn begin_batch(&mut self, keys: &[f64]) {
        debug_assert!(keys.len() <= self.batch_size);
        self.batch_len = keys.len();
        if self.enabled {
            self.transform
                .evaluate_batch(keys, &mut self.scratch[..keys.len()]);
        } else {
            self.scratch[..keys.len()].copy_from_slice(keys);
        }
    }

    fn scratch_key(&self, i: usize) -> f64 {
        assert!(i < self.batch_len, "index out of range for the current batch");
        self.scratch[i]
    }

    pub fn find(&self, i: usize) -> Cursor<'_, u64> {
        self.afli.find(self.scratch_key(i))
    }

    pub fn insert(&mut self, i: usize, value: u64) -> InsertOutcome {
        let k = self.scratch_key(i);
        self.afli.insert(k, value)
    }

    pub fn update(&mut self, i: usize, value: u64) -> bool {
        let k = self.scratch_key(i);
        self.afli.update(k, value)
    }

    pub fn remove(&mut self, i: usize) -> usize {
        let k = self.scratch_key(i);
        self.afli.remove(k)
    }

    pub fn model_size(&self) -> usize {
        self.afli.model_size()
    }

    pub fn index_size(&self) -> usize {
        self.afli.index_size()
    }
}

/// The transform is monotone by construction but not guaranteed strictly so
/// (§4.4); exact ties after sorting would violate AFLI's bulk-load
/// uniqueness precondition even though the original keys were distinct, so
/// ties are nudged apart by the smallest representable step, preserving
/// their relative (stable-sorted) order.
fn break_transform_ties(sorted: &mut [(f64, u64)]) {
    for i in 1..sorted.len() {
        if sorted[i].0 <= sorted[i - 1].0 {
            sorted[i].0 = sorted[i - 1].0 + f64::EPSILON.max(sorted[i - 1].0.abs() * f64::EPSILON);
        }
    }
}
