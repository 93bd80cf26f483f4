// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;

use crate::types::Aabb2D;
use core::fmt::Debug;

/// Spatial backend abstraction used by [`IndexGeneric`](crate::IndexGeneric).
///
/// Backends work in terms of dense slot numbers handed out by the index; they never see
/// entity identifiers. Queries are a broad phase: they may return slots whose box does not
/// actually satisfy the query, but must never omit one that does.
pub trait Backend<T: Copy + PartialOrd + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot from the spatial structure. Unknown slots are ignored.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Query slots whose AABB may contain the point. Each slot is yielded at most once.
    fn query_point<'a>(&'a self, x: T, y: T) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Query slots whose AABB may intersect the rectangle. Each slot is yielded at most once.
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a>;
}
