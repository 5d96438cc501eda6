use super::key::Key;
use smallvec::SmallVec;

/// Inline capacity for [`Bucket`]'s storage. Runtime bucket capacity (`B`,
/// from [`super::config::AfliConfig`]) is clamped to this so a bucket never
/// spills to the heap, matching the "buckets never allocate" design note.
pub(crate) const INLINE_CAP: usize = 32;

/// Outcome of [`Bucket::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BucketInsert {
    Inserted,
    Replaced,
    Overflow,
}

/// Small sorted container of up to `B` entries for locally collided keys.
///
/// Entries are kept strictly sorted by key via binary search on every
/// mutation (§4.1); this is the bucket's ordering invariant (§8, property 5).
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    entries: SmallVec<[(K, V); INLINE_CAP]>,
}

impl<K: Key, V: Clone> Bucket<K, V> {
    /// Builds a bucket from entries already known to be sorted by `k` and
    /// unique, as produced by a bulk-load run of colliding keys.
    pub(crate) fn from_sorted(entries: &[(K, V)]) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0.to_f64() < w[1].0.to_f64()));
        Self {
            entries: entries.iter().cloned().collect(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self, k: K) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(ek, _)| ek.to_f64().partial_cmp(&k.to_f64()).unwrap())
    }

    pub(crate) fn find(&self, k: K) -> Option<&V> {
        self.position(k).ok().map(|i| &self.entries[i].1)
    }

    /// Inserts `(k, v)`, capped at `capacity` entries. Replaces in place if
    /// `k` is already present; signals `Overflow` instead of growing past
    /// `capacity` so the caller can promote the slot to a `Child` (§4.2.1).
    pub(crate) fn insert(&mut self, k: K, v: V, capacity: usize) -> BucketInsert {
        match self.position(k) {
            Ok(i) => {
                self.entries[i].1 = v;
                BucketInsert::Replaced
            }
            Err(i) => {
                if self.entries.len() >= capacity.min(INLINE_CAP) {
                    BucketInsert::Overflow
                } else {
                    self.entries.insert(i, (k, v));
                    BucketInsert::Inserted
                }
            }
        }
    }

    pub(crate) fn update(&mut self, k: K, v: V) -> bool {
        match self.position(k) {
            Ok(i) => {
                self.entries[i].1 = v;
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn remove(&mut self, k: K) -> bool {
        match self.position(k) {
            Ok(i) => {
                self.entries.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.entries.iter()
    }

    pub(crate) fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].0.to_f64() < w[1].0.to_f64())
    }
}
