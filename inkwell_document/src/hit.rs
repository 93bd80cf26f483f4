// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point and rectangle picking over the spatial index.

use std::cmp::Ordering;

use inkwell_index::{Backend, IndexGeneric};
use inkwell_shapes::geometry;
use inkwell_shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

use crate::store::DocumentStore;
use crate::sync::{shape_aabb, to_aabb};

/// Stacking order: fractional index first, identifier as the tie-breaker.
pub fn z_order(a: &Shape, b: &Shape) -> Ordering {
    a.index
        .cmp(&b.index)
        .then_with(|| a.id.as_str().cmp(b.id.as_str()))
}

/// The topmost shape whose exact geometry contains `point`.
///
/// Candidates come from the index, are re-read from the store (skipping any that vanished),
/// and are filtered with [`geometry::contains`]. Locked shapes are ordinary results.
///
/// Lines are indexed under their bounds grown by their hit radius (see
/// [`index_aabb`](crate::index_aabb)), so the point query alone never misses a line the exact
/// test would accept.
pub fn find_top_shape_at<'s, B: Backend<f64>>(
    index: &IndexGeneric<f64, ShapeId, B>,
    store: &'s DocumentStore,
    point: Point,
) -> Option<&'s Shape> {
    index
        .query_point(point.x, point.y)
        .into_iter()
        .filter_map(|id| store.shape(&id))
        .filter(|shape| geometry::contains(shape, point))
        .max_by(|a, b| z_order(a, b))
}

/// Every shape whose bounds intersect `rect`, bottom to top.
pub fn shapes_in_rect<'s, B: Backend<f64>>(
    index: &IndexGeneric<f64, ShapeId, B>,
    store: &'s DocumentStore,
    rect: Rect,
) -> Vec<&'s Shape> {
    let area = to_aabb(rect);
    let mut hits: Vec<&Shape> = index
        .query_rect(area)
        .into_iter()
        .filter_map(|id| store.shape(&id))
        .filter(|shape| shape_aabb(shape).intersects(&area))
        .collect();
    hits.sort_by(|a, b| z_order(a, b));
    hits
}
