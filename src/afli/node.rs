use super::bucket::{Bucket, BucketInsert};
use super::config::AfliConfig;
use super::key::Key;

/// Below this denominator magnitude the slope is treated as zero rather than
/// risking a near-infinite fit (guards the single-key / all-equal subrange case).
const EPSILON: f64 = 1e-9;

/// Per-node-touch decay applied to `conflict_stats` so the refit heuristic
/// biases toward recent conflicts rather than lifetime totals (§4.2.1).
const CONFLICTS_DECAY: f32 = 0.1;

/// Accumulated (decayed) conflict weight at a slot past which a local refit
/// widens that slot's child subtree instead of just splitting once.
const REFIT_THRESHOLD: f32 = 3.0;

/// Growth factor applied to a refit child's size floor relative to its key count.
const REFIT_GROWTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeInsert {
    Inserted,
    Duplicate,
}

/// One fan-out entry of a [`Node`]: empty, a single key/value, a small sorted
/// bucket of collided keys, or a subordinate node (§3).
enum Slot<K, V> {
    Empty,
    Single(K, V),
    Bucket(Bucket<K, V>),
    Child(Box<Node<K, V>>),
}

/// A fan-out array of slots with an affine model predicting the slot for a key.
pub(crate) struct Node<K, V> {
    size: usize,
    slope: f64,
    intercept: f64,
    slots: Vec<Slot<K, V>>,
    conflict_stats: Vec<f32>,
}

#[inline]
fn predict_with(slope: f64, intercept: f64, size: usize, k: f64) -> usize {
    let raw = (slope * k + intercept).round();
    raw.clamp(0.0, (size - 1) as f64) as usize
}

/// Fits `slot(k) = clamp(round(a*k + b), 0, size-1)` over a sorted subrange (§4.2).
fn fit<K: Key, V>(data: &[(K, V)], size: usize) -> (f64, f64) {
    let lo = data[0].0.to_f64();
    let hi = data[data.len() - 1].0.to_f64();
    let denom = hi - lo;
    let slope = if denom.abs() < EPSILON {
        0.0
    } else {
        (size as f64 - 1.0) / denom
    };
    let intercept = -slope * lo;
    (slope, intercept)
}

/// `size = max(floor, next_power_of_two(n))`, where `floor` is an explicit
/// override if given (used by the conflict-driven refit and by AFLI's
/// `tail_conflicts` hint for root sizing), else the config's aggregate size,
/// else `1` ("auto").
fn node_size(n: usize, config: &AfliConfig, size_floor_override: Option<usize>) -> usize {
    let floor = size_floor_override
        .or_else(|| config.aggregate_size())
        .unwrap_or(1);
    std::cmp::max(floor, n).max(1).next_power_of_two()
}

/// Recursively builds a `Node` over a sorted, unique subrange (§4.2).
///
/// Since the fitted model is affine with non-negative slope, `predict` is
/// non-decreasing over sorted input, so a single linear scan grouping
/// consecutive equal-slot runs is enough to place every key.
pub(crate) fn build<K: Key, V: Clone>(
    data: &[(K, V)],
    config: &AfliConfig,
    size_floor_override: Option<usize>,
) -> Node<K, V> {
    let size = node_size(data.len(), config, size_floor_override);
    let (slope, intercept) = fit(data, size);
    let mut slots = Vec::with_capacity(size);
    slots.extend((0..size).map(|_| Slot::Empty));

    let bucket_cap = config.bucket_size();
    let mut i = 0;
    while i < data.len() {
        let idx = predict_with(slope, intercept, size, data[i].0.to_f64());
        let mut j = i + 1;
        while j < data.len() && predict_with(slope, intercept, size, data[j].0.to_f64()) == idx {
            j += 1;
        }
        let run = &data[i..j];
        slots[idx] = if run.len() == 1 {
            Slot::Single(run[0].0, run[0].1.clone())
        } else if run.len() <= bucket_cap {
            Slot::Bucket(Bucket::from_sorted(run))
        } else {
            Slot::Child(Box::new(build(run, config, None)))
        };
        i = j;
    }

    Node {
        size,
        slope,
        intercept,
        slots,
        conflict_stats: vec![0.0; size],
    }
}

impl<K: Key, V: Clone> Node<K, V> {
    #[inline]
    fn predict(&self, k: f64) -> usize {
        predict_with(self.slope, self.intercept, self.size, k)
    }

    pub(crate) fn find(&self, k: K) -> Option<&V> {
        match &self.slots[self.predict(k.to_f64())] {
            Slot::Empty => None,
            Slot::Single(ek, ev) => (*ek == k).then_some(ev),
            Slot::Bucket(bucket) => bucket.find(k),
            Slot::Child(child) => child.find(k),
        }
    }

    pub(crate) fn update(&mut self, k: K, v: V) -> bool {
        let idx = self.predict(k.to_f64());
        match &mut self.slots[idx] {
            Slot::Empty => false,
            Slot::Single(ek, ev) => {
                if *ek == k {
                    *ev = v;
                    true
                } else {
                    false
                }
            }
            Slot::Bucket(bucket) => bucket.update(k, v),
            Slot::Child(child) => child.update(k, v),
        }
    }

    pub(crate) fn remove(&mut self, k: K) -> bool {
        let idx = self.predict(k.to_f64());
        match &mut self.slots[idx] {
            Slot::Empty => false,
            Slot::Single(ek, _) => {
                if *ek == k {
                    self.slots[idx] = Slot::Empty;
                    true
                } else {
                    false
                }
            }
            Slot::Bucket(bucket) => bucket.remove(k),
            Slot::Child(child) => child.remove(k),
        }
    }

    /// Decays every slot's conflict weight, then bumps `idx` (§4.2.1).
    fn record_conflict(&mut self, idx: usize) {
        for c in self.conflict_stats.iter_mut() {
            *c *= 1.0 - CONFLICTS_DECAY;
        }
        self.conflict_stats[idx] += 1.0;
    }

    pub(crate) fn insert(&mut self, k: K, v: V, config: &AfliConfig) -> NodeInsert {
        let idx = self.predict(k.to_f64());
        match &mut self.slots[idx] {
            Slot::Empty => {
                self.slots[idx] = Slot::Single(k, v);
                NodeInsert::Inserted
            }
            Slot::Single(ek, _) if *ek == k => NodeInsert::Duplicate,
            Slot::Single(_, _) => {
                let (ek, ev) = match std::mem::replace(&mut self.slots[idx], Slot::Empty) {
                    Slot::Single(ek, ev) => (ek, ev),
                    _ => unreachable!(),
                };
                let pair = if ek.to_f64() < k.to_f64() {
                    [(ek, ev), (k, v)]
                } else {
                    [(k, v), (ek, ev)]
                };
                self.slots[idx] = Slot::Bucket(Bucket::from_sorted(&pair));
                self.record_conflict(idx);
                NodeInsert::Inserted
            }
            Slot::Bucket(bucket) => {
                if bucket.find(k).is_some() {
                    return NodeInsert::Duplicate;
                }
                match bucket.insert(k, v.clone(), config.bucket_size()) {
                    BucketInsert::Inserted => NodeInsert::Inserted,
                    BucketInsert::Replaced => unreachable!("presence already checked above"),
                    BucketInsert::Overflow => {
                        let mut combined: Vec<(K, V)> = bucket.iter().cloned().collect();
                        combined.push((k, v));
                        combined.sort_by(|a, b| a.0.to_f64().partial_cmp(&b.0.to_f64()).unwrap());
                        let child = build(&combined, config, None);
                        self.slots[idx] = Slot::Child(Box::new(child));
                        self.record_conflict(idx);
                        if self.conflict_stats[idx] >= REFIT_THRESHOLD {
                            let floor = combined.len() * REFIT_GROWTH;
                            self.slots[idx] =
                                Slot::Child(Box::new(build(&combined, config, Some(floor))));
                            tracing::debug!(slot = idx, size = floor, "refitting conflict-heavy slot");
                        } else {
                            tracing::debug!(slot = idx, "split bucket into child node");
                        }
                        NodeInsert::Inserted
                    }
                }
            }
            Slot::Child(child) => child.insert(k, v, config),
        }
    }

    pub(crate) fn model_size(&self) -> usize {
        let mut total = std::mem::size_of::<f64>() * 2 + std::mem::size_of::<usize>();
        for slot in &self.slots {
            if let Slot::Child(child) = slot {
                total += child.model_size();
            }
        }
        total
    }

    pub(crate) fn index_size(&self) -> usize {
        let mut total = std::mem::size_of::<Self>()
            + self.slots.len() * std::mem::size_of::<Slot<K, V>>()
            + self.conflict_stats.len() * std::mem::size_of::<f32>();
        for slot in &self.slots {
            total += match slot {
                Slot::Empty | Slot::Single(_, _) => 0,
                Slot::Bucket(bucket) => bucket.len() * std::mem::size_of::<(K, V)>(),
                Slot::Child(child) => child.index_size(),
            };
        }
        total
    }

    /// Recursively checks invariant 1/6: every key reachable below slot `i`
    /// predicts to `i` under this node's model, and every bucket stays sorted.
    #[cfg(test)]
    pub(crate) fn audit(&self) -> bool {
        self.slots.iter().enumerate().all(|(idx, slot)| match slot {
            Slot::Empty => true,
            Slot::Single(k, _) => self.predict(k.to_f64()) == idx,
            Slot::Bucket(bucket) => {
                bucket.is_sorted() && bucket.iter().all(|(k, _)| self.predict(k.to_f64()) == idx)
            }
            Slot::Child(child) => child.audit(),
        })
    }
}

impl<K, V> Drop for Node<K, V> {
    /// Iterative post-order drop: deep chains of `Child` nodes would
    /// otherwise recurse once per tree level through `Box`'s default drop glue.
    fn drop(&mut self) {
        let mut pending: Vec<Node<K, V>> = std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Child(boxed) => Some(*boxed),
                _ => None,
            })
            .collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.slots).into_iter().filter_map(
                |slot| match slot {
                    Slot::Child(boxed) => Some(*boxed),
                    _ => None,
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AfliConfig {
        AfliConfig::new(2, 0)
    }

    #[test]
    fn build_then_find_matches_every_key() {
        let data = vec![(1.0, 10u64), (2.0, 20), (3.0, 30)];
        let node = build(&data, &cfg(), None);
        assert_eq!(node.find(2.0), Some(&20));
        assert_eq!(node.find(2.5), None);
        assert!(node.audit());
    }

    #[test]
    fn insert_promotes_single_to_bucket_then_splits_to_child() {
        let data = vec![(0.0, 0u64), (100.0, 100)];
        let mut node = build(&data, &cfg(), None);
        // Force three more keys into the model's single mid slot.
        for (k, v) in [(50.0, 50u64), (50.5, 55), (50.25, 52)] {
            assert_eq!(node.insert(k, v, &cfg()), NodeInsert::Inserted);
        }
        for (k, v) in [
            (0.0, 0u64),
            (100.0, 100),
            (50.0, 50),
            (50.5, 55),
            (50.25, 52),
        ] {
            assert_eq!(node.find(k), Some(&v));
        }
        assert!(node.audit());
    }

    #[test]
    fn insert_duplicate_key_does_not_mutate() {
        let data = vec![(1.0, 10u64)];
        let mut node = build(&data, &cfg(), None);
        assert_eq!(node.insert(1.0, 999, &cfg()), NodeInsert::Duplicate);
        assert_eq!(node.find(1.0), Some(&10));
    }

    #[test]
    fn update_and_remove() {
        let data = vec![(1.0, 10u64), (2.0, 20)];
        let mut node = build(&data, &cfg(), None);
        assert!(node.update(1.0, 11));
        assert_eq!(node.find(1.0), Some(&11));
        assert!(!node.update(3.0, 1));
        assert!(node.remove(2.0));
        assert_eq!(node.find(2.0), None);
        assert!(!node.remove(2.0));
    }

    #[test]
    fn drop_does_not_overflow_on_a_deep_chain() {
        let mut data: Vec<(f64, u64)> = (0..5000).map(|i| (i as f64, i as u64)).collect();
        data.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let cfg = AfliConfig::new(1, 1);
        let node = build(&data, &cfg, None);
        drop(node);
    }
}
