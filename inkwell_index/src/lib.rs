// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkwell Index: an identifier-keyed 2D AABB index.
//!
//! Inkwell Index is the broad phase behind canvas hit testing and range selection.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) keyed by an identifier.
//! - Query by point or by intersecting rectangle; results come back as a set of identifiers.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers compute world-space AABBs (including rotation and stroke padding) and feed
//! them here.
//!
//! Backends are pluggable via a simple trait. The uniform grid backend ([`GridF64`]) is the
//! workhorse: world space is split into square cells and each entry is bucketed into every
//! cell its box touches. The flat vector backend ([`FlatVec`]) scans linearly and is exact,
//! which makes it useful for tiny sets and as a reference in tests.
//!
//! # Example
//!
//! ```rust
//! use inkwell_index::{Aabb2D, GridIndex};
//!
//! let mut idx: GridIndex<&str> = GridIndex::with_uniform_grid(200.0);
//! idx.insert("a", Aabb2D::from_xywh(100.0, 100.0, 50.0, 50.0));
//! idx.insert("b", Aabb2D::from_xywh(-400.0, 0.0, 50.0, 50.0));
//!
//! // Point queries are a broad phase: everything sharing the cell is a candidate.
//! let hits = idx.query_point(125.0, 125.0);
//! assert!(hits.contains("a"));
//! assert!(!hits.contains("b"));
//!
//! // Moving an entry is a single update.
//! idx.update("a", Aabb2D::from_xywh(900.0, 900.0, 50.0, 50.0));
//! assert!(idx.query_point(125.0, 125.0).is_empty());
//! ```
//!
//! The flat backend returns exact results:
//!
//! ```rust
//! use inkwell_index::{Aabb2D, Index};
//!
//! let mut idx: Index<i64, u32> = Index::new();
//! idx.insert(1, Aabb2D::new(0, 0, 10, 10));
//! idx.insert(2, Aabb2D::new(5, 5, 15, 15));
//!
//! let hits: Vec<_> = idx.query_point(12, 12).into_iter().collect();
//! assert_eq!(hits, [2]);
//! ```
//!
//! ## Choosing a cell size
//!
//! Pick a cell size so most boxes fall within a handful of cells. Very large boxes that would
//! cover thousands of cells are kept on a side list and reported as candidates for every query.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::grid::{DEFAULT_CELL_SIZE, GridF64};
pub use index::{GridIndex, Index, IndexGeneric};
pub use types::Aabb2D;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn every_entry_is_discoverable_through_its_own_box() {
        let mut idx: GridIndex<u32> = GridIndex::new();
        let boxes = [
            Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0),
            Aabb2D::from_xywh(199.0, 199.0, 2.0, 2.0),
            Aabb2D::from_xywh(-350.0, 20.0, 700.0, 5.0),
            Aabb2D::from_xywh(1.0e5, -1.0e5, 1.0, 1.0),
        ];
        for (id, a) in (0..).zip(boxes) {
            idx.insert(id, a);
        }
        for (id, a) in (0..).zip(boxes) {
            assert!(idx.query_rect(a).contains(&id));
            let cx = (a.min_x + a.max_x) / 2.0;
            let cy = (a.min_y + a.max_y) / 2.0;
            assert!(idx.query_point(cx, cy).contains(&id));
        }
    }

    #[test]
    fn indexed_ids_track_inserts_and_removes() {
        let mut idx: GridIndex<&str> = GridIndex::new();
        idx.insert("x", Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0));
        idx.insert("y", Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0));
        idx.insert("z", Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0));
        idx.remove(&"y");
        let ids: Vec<_> = idx.ids().copied().collect();
        assert_eq!(ids, ["x", "z"]);
        idx.clear();
        assert!(idx.is_empty());
        assert_eq!(idx.backend().occupied_cells(), 0);
    }
}
