use super::transform::TransformModel;

/// Number of evenly spaced probes used to estimate tail conflicts (§4.5).
const SAMPLE_SIZE: usize = 256;

/// The transform must cut estimated tail conflicts by at least this many
/// (relative to `SAMPLE_SIZE`) before `auto_switch` turns it on — a small
/// improvement isn't worth paying for a transform on every batch (§4.5,
/// Open Question: the source leaves the exact margin unspecified).
const SWITCH_MARGIN_FRACTION: f64 = 0.02;

/// Picks `n` evenly spaced indices into `[0, len)`, or every index if `len <= n`.
fn sample_indices(len: usize, n: usize) -> Vec<usize> {
    if len <= n {
        return (0..len).collect();
    }
    (0..n)
        .map(|i| (i * (len - 1)) / (n - 1).max(1))
        .collect()
}

/// Estimates the residual collision count after an ideal affine fit over
/// `sample` (assumed sorted): how many of `sample.len()` probes would land
/// on a slot already claimed by an earlier probe.
fn estimate_tail_conflicts(sample: &[f64]) -> u64 {
    let size = sample.len();
    if size < 2 {
        return 0;
    }
    let lo = sample[0];
    let hi = sample[size - 1];
    let denom = hi - lo;
    let slope = if denom.abs() < 1e-9 {
        0.0
    } else {
        (size as f64 - 1.0) / denom
    };
    let intercept = -slope * lo;
    let mut seen = vec![false; size];
    let mut collisions = 0u64;
    for &k in sample {
        let idx = (slope * k + intercept).round().clamp(0.0, (size - 1) as f64) as usize;
        if seen[idx] {
            collisions += 1;
        } else {
            seen[idx] = true;
        }
    }
    collisions
}

/// Decides whether the transform is worth enabling for this dataset, and
/// returns the tail-conflict estimate AFLI should size its root fan-out from.
///
/// Sampling the sorted data once at bulk-load time keeps this cheap relative
/// to a full bulk load, and the decision is never revisited (§4.5).
pub fn auto_switch(sorted_keys: &[f64], transform: &TransformModel) -> (bool, u64) {
    let indices = sample_indices(sorted_keys.len(), SAMPLE_SIZE);
    let raw_sample: Vec<f64> = indices.iter().map(|&i| sorted_keys[i]).collect();
    let raw_conflicts = estimate_tail_conflicts(&raw_sample);

    let mut transformed_sample: Vec<f64> =
        raw_sample.iter().map(|&k| transform.evaluate(k)).collect();
    transformed_sample.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let transformed_conflicts = estimate_tail_conflicts(&transformed_sample);

    let margin = ((raw_sample.len() as f64) * SWITCH_MARGIN_FRACTION).max(1.0) as u64;
    if raw_conflicts > transformed_conflicts && raw_conflicts - transformed_conflicts > margin {
        tracing::info!(
            raw_conflicts,
            transformed_conflicts,
            "auto_switch enabling NFL transform"
        );
        (true, transformed_conflicts)
    } else {
        tracing::info!(raw_conflicts, "auto_switch keeping NFL transform disabled");
        (false, raw_conflicts)
    }
}
