//! Ordered segment index shared by both timelines.
//!
//! Records live in one sorted `Vec`. Every derived key of a timeline
//! (time for tempo segments, measure index for signature segments) is
//! monotonic in tick, so the same array is sorted by each of its keys
//! and a floor lookup only needs the right key extractor — no
//! duplicated storage per key.

use std::slice;

#[derive(Debug, Clone)]
pub(crate) struct Timeline<T> {
    records: Vec<T>,
}

impl<T> Timeline<T> {
    /// Bulk build from a pre-sorted record array.
    pub fn new(records: Vec<T>) -> Self {
        debug_assert!(!records.is_empty());
        Self { records }
    }

    pub fn first(&self) -> &T {
        self.records.first().expect("empty timeline")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Position and record with the greatest key not exceeding `key`,
    /// or `None` when `key` precedes the whole timeline.
    pub fn floor_by<K, F>(&self, key: K, f: F) -> Option<(usize, &T)>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let pos = self.records.partition_point(|r| f(r) <= key);
        match pos {
            0 => None,
            _ => Some((pos - 1, &self.records[pos - 1])),
        }
    }

    /// Floor lookup that falls back to the first record for keys
    /// preceding the whole timeline. Queries extrapolate backward
    /// from that record instead of clamping.
    pub fn floor_or_first_by<K, F>(&self, key: K, f: F) -> (usize, &T)
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.floor_by(key, f)
            .unwrap_or_else(|| (0, self.first()))
    }

    /// Forward iteration from an arbitrary position.
    pub fn iter_from(&self, pos: usize) -> slice::Iter<'_, T> {
        self.records[pos.min(self.records.len())..].iter()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.records.iter()
    }
}
