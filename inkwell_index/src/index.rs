// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::{FlatVec, GridF64};
use crate::types::Aabb2D;

#[derive(Clone, Debug)]
struct Entry<T, K> {
    id: K,
    aabb: Aabb2D<T>,
}

/// An identifier-keyed AABB index parameterized by a spatial backend.
///
/// Every identifier maps to exactly one box. Identifiers are translated to dense slots
/// internally so backends can work on plain integers; freed slots are recycled.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, K: Ord + Clone + Debug, B: Backend<T>> {
    entries: Vec<Option<Entry<T, K>>>,
    free_list: Vec<usize>,
    slots: BTreeMap<K, usize>,
    backend: B,
}

impl<T, K, B> IndexGeneric<T, K, B>
where
    T: Copy + PartialOrd + Debug,
    K: Ord + Clone + Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, K, B> Default for IndexGeneric<T, K, B>
where
    T: Copy + PartialOrd + Debug,
    K: Ord + Clone + Debug,
    B: Backend<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K, B> IndexGeneric<T, K, B>
where
    T: Copy + PartialOrd + Debug,
    K: Ord + Clone + Debug,
    B: Backend<T>,
{
    /// Create an empty index around an explicitly configured backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            slots: BTreeMap::new(),
            backend,
        }
    }

    /// Reserve space for at least `n` entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Insert an AABB for `id`.
    ///
    /// Callers are expected to insert each identifier once; inserting an identifier that is
    /// already present replaces its box, exactly like [`update`](Self::update).
    pub fn insert(&mut self, id: K, aabb: Aabb2D<T>) {
        if let Some(&slot) = self.slots.get(&id) {
            self.update_slot(slot, aabb);
            return;
        }
        let entry = Entry {
            id: id.clone(),
            aabb,
        };
        let slot = if let Some(slot) = self.free_list.pop() {
            self.entries[slot] = Some(entry);
            slot
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        };
        self.slots.insert(id, slot);
        self.backend.insert(slot, aabb);
    }

    /// Replace the AABB stored for `id`, inserting it if absent.
    ///
    /// Equivalent to `remove` followed by `insert`; the backend may skip rewriting its
    /// partitions when the new box lands in the same ones.
    pub fn update(&mut self, id: K, aabb: Aabb2D<T>) {
        match self.slots.get(&id) {
            Some(&slot) => self.update_slot(slot, aabb),
            None => self.insert(id, aabb),
        }
    }

    /// Remove `id`, returning its last box. Removing an absent identifier is a no-op.
    pub fn remove(&mut self, id: &K) -> Option<Aabb2D<T>> {
        let slot = self.slots.remove(id)?;
        let entry = self.entries.get_mut(slot)?.take()?;
        self.backend.remove(slot);
        self.free_list.push(slot);
        Some(entry.aabb)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.slots.clear();
        self.backend.clear();
    }

    /// The box currently stored for `id`.
    pub fn get(&self, id: &K) -> Option<Aabb2D<T>> {
        let slot = *self.slots.get(id)?;
        self.entries.get(slot)?.as_ref().map(|e| e.aabb)
    }

    /// Whether `id` has an entry.
    pub fn contains(&self, id: &K) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate all indexed identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &K> + '_ {
        self.slots.keys()
    }

    /// The backend, for diagnostics.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Identifiers whose box may contain the point.
    ///
    /// This is a broad phase: there are no false negatives, but backends such as the grid
    /// report every entry sharing the point's partition.
    pub fn query_point(&self, x: T, y: T) -> BTreeSet<K> {
        self.collect(self.backend.query_point(x, y))
    }

    /// Identifiers whose box may intersect `rect`, each reported once.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> BTreeSet<K> {
        self.collect(self.backend.query_rect(rect))
    }

    fn collect(&self, slots: impl Iterator<Item = usize>) -> BTreeSet<K> {
        slots
            .filter_map(|slot| self.entries.get(slot)?.as_ref().map(|e| e.id.clone()))
            .collect()
    }

    fn update_slot(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if let Some(Some(e)) = self.entries.get_mut(slot) {
            e.aabb = aabb;
            self.backend.update(slot, aabb);
        }
    }
}

/// Index using the exact flat vector backend.
pub type Index<T, K> = IndexGeneric<T, K, FlatVec<T>>;

/// Index using the uniform grid backend.
pub type GridIndex<K> = IndexGeneric<f64, K, GridF64>;

impl<K: Ord + Clone + Debug> GridIndex<K> {
    /// Create a grid-backed index with the given cell size, anchored at the world origin.
    pub fn with_uniform_grid(cell_size: f64) -> Self {
        Self::with_backend(GridF64::new(cell_size, 0.0, 0.0))
    }

    /// Create a grid-backed index with an explicit origin offset.
    pub fn with_uniform_grid_with_origin(cell_size: f64, origin_x: f64, origin_y: f64) -> Self {
        Self::with_backend(GridF64::new(cell_size, origin_x, origin_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn insert_update_and_query() {
        let mut idx: GridIndex<u32> = GridIndex::new();
        idx.insert(1, Aabb2D::from_xywh(100.0, 100.0, 50.0, 50.0));
        assert!(idx.query_point(125.0, 125.0).contains(&1));

        idx.update(1, Aabb2D::from_xywh(500.0, 500.0, 50.0, 50.0));
        assert!(!idx.query_point(125.0, 125.0).contains(&1));
        assert!(idx.query_point(525.0, 525.0).contains(&1));
        assert_eq!(idx.get(&1), Some(Aabb2D::new(500.0, 500.0, 550.0, 550.0)));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut idx: GridIndex<&str> = GridIndex::new();
        assert_eq!(idx.remove(&"never"), None);
        idx.insert("a", Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert!(idx.remove(&"a").is_some());
        assert_eq!(idx.remove(&"a"), None);
        assert!(idx.is_empty());
        assert!(idx.query_point(5.0, 5.0).is_empty());
    }

    #[test]
    fn update_of_absent_id_inserts() {
        let mut idx: Index<i64, u8> = Index::new();
        idx.update(9, Aabb2D::new(0, 0, 4, 4));
        assert!(idx.contains(&9));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn double_insert_replaces() {
        let mut idx: GridIndex<u8> = GridIndex::new();
        idx.insert(1, Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0));
        idx.insert(1, Aabb2D::from_xywh(1000.0, 0.0, 10.0, 10.0));
        assert_eq!(idx.len(), 1);
        assert!(idx.query_point(5.0, 5.0).is_empty());
        assert!(idx.query_point(1005.0, 5.0).contains(&1));
    }

    #[test]
    fn slots_are_recycled() {
        let mut idx: GridIndex<u32> = GridIndex::new();
        for i in 0..8 {
            idx.insert(i, Aabb2D::from_xywh(f64::from(i) * 10.0, 0.0, 5.0, 5.0));
        }
        for i in 0..4 {
            idx.remove(&i);
        }
        for i in 100..104 {
            idx.insert(i, Aabb2D::from_xywh(0.0, 0.0, 5.0, 5.0));
        }
        assert_eq!(idx.entries.len(), 8, "freed slots should be reused");
        let ids: Vec<_> = idx.ids().copied().collect();
        assert_eq!(ids, [4, 5, 6, 7, 100, 101, 102, 103]);
    }

    #[test]
    fn range_query_reports_spanning_entry_once() {
        let mut idx: GridIndex<&str> = GridIndex::with_uniform_grid(50.0);
        idx.insert("wide", Aabb2D::from_xywh(0.0, 0.0, 400.0, 400.0));
        idx.insert("far", Aabb2D::from_xywh(2000.0, 2000.0, 10.0, 10.0));
        let hits = idx.query_rect(Aabb2D::new(-10.0, -10.0, 500.0, 500.0));
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), ["wide"]);
    }

    #[test]
    fn grid_agrees_with_flat_scan() {
        let mut grid: GridIndex<u32> = GridIndex::with_uniform_grid_with_origin(64.0, -7.0, 3.0);
        let mut flat: Index<f64, u32> = Index::new();
        let mut seed = 0x9e37_79b9_u32;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            f64::from(seed % 1000) - 500.0
        };
        for id in 0..200 {
            let (x, y, w, h) = (next(), next(), next().abs() / 4.0, next().abs() / 4.0);
            let a = Aabb2D::from_xywh(x, y, w, h);
            grid.insert(id, a);
            flat.insert(id, a);
        }
        for id in (0..200).step_by(3) {
            grid.remove(&id);
            flat.remove(&id);
        }
        for _ in 0..100 {
            let (x, y) = (next(), next());
            let exact = flat.query_point(x, y);
            let broad = grid.query_point(x, y);
            assert!(exact.is_subset(&broad), "grid missed a hit at ({x}, {y})");
            let r = Aabb2D::from_xywh(x, y, 40.0, 40.0);
            assert!(flat.query_rect(r).is_subset(&grid.query_rect(r)));
        }
    }
}
