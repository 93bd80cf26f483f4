// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

/// Axis-aligned bounding box in 2D.
///
/// Bounds are inclusive on every edge: a point lying exactly on `max_x` is contained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// The intersection of two AABBs. May be empty; check with [`Aabb2D::is_empty`].
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
        }
    }

    /// Whether the two boxes overlap or touch.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The smallest AABB enclosing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// Return true if the AABB is inverted (no extent). Assumes no NaN.
    ///
    /// A degenerate box with `min == max` on an axis is not empty; it still covers a line or point.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    ///
    /// Negative sizes are normalized so the result is never inverted.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        Self::new(x0, y0, x1, y1)
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_inclusive() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(10.0, 10.0));
        assert!(a.contains_point(0.0, 5.0));
        assert!(!a.contains_point(10.5, 5.0));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2D::new(10.0, 0.0, 20.0, 10.0);
        let c = Aabb2D::new(10.1, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn from_xywh_normalizes_negative_sizes() {
        let a = Aabb2D::from_xywh(100.0, 100.0, -50.0, 20.0);
        assert_eq!(a, Aabb2D::new(50.0, 100.0, 100.0, 120.0));
        assert!(!a.is_empty());
    }

    #[test]
    fn union_encloses_both() {
        let a = Aabb2D::new(0, 0, 5, 5);
        let b = Aabb2D::new(-3, 2, 4, 9);
        assert_eq!(a.union(&b), Aabb2D::new(-3, 0, 5, 9));
    }
}
