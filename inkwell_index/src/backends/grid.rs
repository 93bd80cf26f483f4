// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for `f64` world coordinates.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Default edge length of a grid cell, in world units.
pub const DEFAULT_CELL_SIZE: f64 = 200.0;

/// Entries covering more cells than this are kept in a side list instead of being
/// bucketed, so one enormous box cannot blow up memory or update cost.
const MAX_CELLS_PER_ENTRY: i128 = 4096;

type CellKey = (i64, i64);

/// Inclusive range of cells covered by a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellRange {
    min: CellKey,
    max: CellKey,
}

impl CellRange {
    fn count(self) -> i128 {
        let w = i128::from(self.max.0) - i128::from(self.min.0) + 1;
        let h = i128::from(self.max.1) - i128::from(self.min.1) + 1;
        w.max(0) * h.max(0)
    }

    fn contains(self, key: CellKey) -> bool {
        self.min.0 <= key.0 && key.0 <= self.max.0 && self.min.1 <= key.1 && key.1 <= self.max.1
    }

    fn keys(self) -> impl Iterator<Item = CellKey> {
        (self.min.1..=self.max.1).flat_map(move |y| (self.min.0..=self.max.0).map(move |x| (x, y)))
    }
}

/// Where a slot currently lives in the grid.
#[derive(Copy, Clone, Debug)]
enum Placement {
    Cells(CellRange),
    Oversized,
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    aabb: Aabb2D<f64>,
    placement: Placement,
}

/// Uniform grid backend.
///
/// The plane is split into square cells of `cell_size` world units, offset by an origin.
/// An entry is bucketed into every cell its box overlaps, from `floor(min / cell_size)`
/// through `floor(max / cell_size)` inclusive on each axis. Negative coordinates are fine.
///
/// Each slot remembers the exact cell range it occupies, so removal touches only those
/// buckets and an update whose box stays within the same cells skips the bucket rewrite.
pub struct GridF64 {
    cell_size: f64,
    origin_x: f64,
    origin_y: f64,
    slots: Vec<Option<Slot>>,
    cells: BTreeMap<CellKey, Vec<usize>>,
    oversized: BTreeSet<usize>,
}

impl Default for GridF64 {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE, 0.0, 0.0)
    }
}

impl GridF64 {
    /// Create a grid backend with the given cell size and origin offset.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not a positive, finite number.
    pub fn new(cell_size: f64, origin_x: f64, origin_y: f64) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "cell size must be positive and finite"
        );
        Self {
            cell_size,
            origin_x,
            origin_y,
            slots: Vec::new(),
            cells: BTreeMap::new(),
            oversized: BTreeSet::new(),
        }
    }

    /// Edge length of a cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cell coordinates saturate at the i64 range, far beyond any real canvas."
        )]
        let i = v as i64;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Only used to detect whether truncation rounded toward zero."
        )]
        let back = i as f64;
        if back > v { i - 1 } else { i }
    }

    fn key_for(&self, x: f64, y: f64) -> CellKey {
        let cx = Self::floor_to_i64((x - self.origin_x) / self.cell_size);
        let cy = Self::floor_to_i64((y - self.origin_y) / self.cell_size);
        (cx, cy)
    }

    fn range_for(&self, a: &Aabb2D<f64>) -> CellRange {
        CellRange {
            min: self.key_for(a.min_x, a.min_y),
            max: self.key_for(a.max_x, a.max_y),
        }
    }

    fn place(&mut self, slot: usize, range: CellRange) -> Placement {
        if range.count() > MAX_CELLS_PER_ENTRY {
            self.oversized.insert(slot);
            return Placement::Oversized;
        }
        for key in range.keys() {
            self.cells.entry(key).or_default().push(slot);
        }
        Placement::Cells(range)
    }

    fn unplace(&mut self, slot: usize, placement: Placement) {
        match placement {
            Placement::Oversized => {
                self.oversized.remove(&slot);
            }
            Placement::Cells(range) => {
                for key in range.keys() {
                    let Some(bucket) = self.cells.get_mut(&key) else {
                        continue;
                    };
                    if let Some(pos) = bucket.iter().position(|&s| s == slot) {
                        bucket.swap_remove(pos);
                    }
                    if bucket.is_empty() {
                        self.cells.remove(&key);
                    }
                }
            }
        }
    }

    /// Collect bucket contents for every occupied cell inside `range`.
    ///
    /// Walks whichever is smaller: the requested cells or the occupied cells.
    fn collect_range(&self, range: CellRange, out: &mut BTreeSet<usize>) {
        #[allow(
            clippy::cast_possible_wrap,
            reason = "Occupied cell counts are far below i128::MAX."
        )]
        let occupied = self.cells.len() as i128;
        if range.count() <= occupied {
            for key in range.keys() {
                if let Some(bucket) = self.cells.get(&key) {
                    out.extend(bucket.iter().copied());
                }
            }
        } else {
            for (key, bucket) in &self.cells {
                if range.contains(*key) {
                    out.extend(bucket.iter().copied());
                }
            }
        }
    }
}

impl Backend<f64> for GridF64 {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        if let Some(old) = self.slots[slot].take() {
            self.unplace(slot, old.placement);
        }
        let placement = self.place(slot, self.range_for(&aabb));
        self.slots[slot] = Some(Slot { aabb, placement });
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        let range = self.range_for(&aabb);
        if let Some(Some(current)) = self.slots.get_mut(slot)
            && let Placement::Cells(old) = current.placement
            && old == range
        {
            // Same buckets; only the stored box changes.
            current.aabb = aabb;
            return;
        }
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.slots.get_mut(slot).and_then(Option::take) {
            self.unplace(slot, old.placement);
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.cells.clear();
        self.oversized.clear();
    }

    fn query_point<'a>(&'a self, x: f64, y: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        let key = self.key_for(x, y);
        let mut set: BTreeSet<usize> = self.oversized.clone();
        if let Some(bucket) = self.cells.get(&key) {
            set.extend(bucket.iter().copied());
        }
        Box::new(set.into_iter())
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<f64>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut set: BTreeSet<usize> = self.oversized.clone();
        if !rect.is_empty() {
            self.collect_range(self.range_for(&rect), &mut set);
        }
        Box::new(set.into_iter())
    }
}

impl Debug for GridF64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|e| e.is_some()).count();
        f.debug_struct("GridF64")
            .field("cell_size", &self.cell_size)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn point_query_hits_only_its_cell() {
        let mut g = GridF64::default();
        g.insert(0, Aabb2D::from_xywh(100.0, 100.0, 50.0, 50.0));
        g.insert(1, Aabb2D::from_xywh(900.0, 900.0, 50.0, 50.0));
        let hits: Vec<_> = g.query_point(125.0, 125.0).collect();
        assert_eq!(hits, [0]);
        // Same cell, outside the box: broad phase still reports it.
        let hits: Vec<_> = g.query_point(10.0, 10.0).collect();
        assert_eq!(hits, [0]);
    }

    #[test]
    fn spanning_entry_is_reported_once() {
        let mut g = GridF64::default();
        g.insert(7, Aabb2D::from_xywh(150.0, 150.0, 500.0, 500.0));
        assert_eq!(g.occupied_cells(), 16);
        let hits: Vec<_> = g.query_rect(Aabb2D::new(0.0, 0.0, 1000.0, 1000.0)).collect();
        assert_eq!(hits, [7]);
    }

    #[test]
    fn negative_coordinates_use_floor() {
        let mut g = GridF64::default();
        g.insert(0, Aabb2D::from_xywh(-150.0, -150.0, 100.0, 100.0));
        let hits: Vec<_> = g.query_point(-100.0, -100.0).collect();
        assert_eq!(hits, [0]);
        let hits: Vec<_> = g.query_point(100.0, 100.0).collect();
        assert!(hits.is_empty(), "positive cell must not see negative entry");
    }

    #[test]
    fn update_within_same_cells_keeps_buckets() {
        let mut g = GridF64::default();
        g.insert(0, Aabb2D::from_xywh(10.0, 10.0, 20.0, 20.0));
        g.update(0, Aabb2D::from_xywh(50.0, 50.0, 20.0, 20.0));
        assert_eq!(g.occupied_cells(), 1);
        let hits: Vec<_> = g.query_point(60.0, 60.0).collect();
        assert_eq!(hits, [0]);
    }

    #[test]
    fn update_across_cells_moves_entry() {
        let mut g = GridF64::default();
        g.insert(0, Aabb2D::from_xywh(100.0, 100.0, 50.0, 50.0));
        g.update(0, Aabb2D::from_xywh(500.0, 500.0, 50.0, 50.0));
        assert_eq!(g.query_point(125.0, 125.0).count(), 0);
        assert_eq!(g.query_point(525.0, 525.0).count(), 1);
        assert_eq!(g.occupied_cells(), 1, "old bucket should be dropped");
    }

    #[test]
    fn remove_unknown_slot_is_noop() {
        let mut g = GridF64::default();
        g.remove(42);
        g.insert(0, Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0));
        g.remove(0);
        g.remove(0);
        assert_eq!(g.occupied_cells(), 0);
    }

    #[test]
    fn oversized_entries_are_always_candidates() {
        let mut g = GridF64::new(10.0, 0.0, 0.0);
        g.insert(0, Aabb2D::new(-1.0e6, -1.0e6, 1.0e6, 1.0e6));
        g.insert(1, Aabb2D::from_xywh(5.0, 5.0, 1.0, 1.0));
        assert_eq!(g.occupied_cells(), 1);
        let hits: Vec<_> = g.query_point(5.5, 5.5).collect();
        assert_eq!(hits, [0, 1]);
        let hits: Vec<_> = g.query_point(-9000.0, 42.0).collect();
        assert_eq!(hits, [0]);
        g.remove(0);
        assert_eq!(g.query_point(-9000.0, 42.0).count(), 0);
    }

    #[test]
    fn huge_range_query_walks_occupied_cells() {
        let mut g = GridF64::default();
        g.insert(0, Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0));
        g.insert(1, Aabb2D::from_xywh(5000.0, 5000.0, 10.0, 10.0));
        let hits: Vec<_> = g
            .query_rect(Aabb2D::new(-1.0e9, -1.0e9, 100.0, 100.0))
            .collect();
        assert_eq!(hits, [0]);
    }
}
