// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact per-variant shape geometry.
//!
//! Everything here is a pure function of a [`Shape`] record. Rectangles rotate around their
//! center; lines are segments and never rotate.

use kurbo::{Point, Rect, Vec2};

use crate::shape::{Shape, ShapeKind};

/// Minimum distance, in world units, within which a line counts as hit regardless of how
/// thin its stroke is.
pub const MIN_HIT_RADIUS: f64 = 4.0;

/// The outline points of a shape in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Corners {
    /// Rectangle corners: top-left, top-right, bottom-right, bottom-left (before rotation).
    Rect([Point; 4]),
    /// Line start and end.
    Line([Point; 2]),
}

impl Corners {
    /// The points as a slice.
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Rect(p) => p,
            Self::Line(p) => p,
        }
    }
}

/// Rotate `offset` by `angle` radians and place it relative to `pivot`.
fn rotate_about(pivot: Point, offset: Vec2, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    pivot + Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

/// Axis-aligned bounding box.
///
/// Unrotated rectangles return their own frame; rotated ones return the box enclosing the
/// four rotated corners. Lines span their endpoints, whatever the direction.
pub fn aabb(shape: &Shape) -> Rect {
    match &shape.kind {
        ShapeKind::Rect(r) if shape.rotation == 0.0 => {
            Rect::from_origin_size(shape.origin(), (r.width, r.height))
        }
        ShapeKind::Rect(_) => enclosing(corners(shape).points()),
        ShapeKind::Line(_) => enclosing(corners(shape).points()),
    }
}

fn enclosing(points: &[Point]) -> Rect {
    let Some((&first, rest)) = points.split_first() else {
        return Rect::ZERO;
    };
    rest.iter()
        .fold(Rect::from_points(first, first), |acc, &p| acc.union_pt(p))
}

/// Rotation pivot of a rectangle, or midpoint of a line.
pub fn center(shape: &Shape) -> Point {
    match &shape.kind {
        ShapeKind::Rect(r) => Point::new(shape.x + r.width / 2.0, shape.y + r.height / 2.0),
        ShapeKind::Line(l) => Point::new(shape.x + l.end_x / 2.0, shape.y + l.end_y / 2.0),
    }
}

/// World-space outline points, with rotation applied.
pub fn corners(shape: &Shape) -> Corners {
    match &shape.kind {
        ShapeKind::Rect(r) => {
            let c = center(shape);
            let (hw, hh) = (r.width / 2.0, r.height / 2.0);
            let at = |dx: f64, dy: f64| rotate_about(c, Vec2::new(dx, dy), shape.rotation);
            Corners::Rect([at(-hw, -hh), at(hw, -hh), at(hw, hh), at(-hw, hh)])
        }
        ShapeKind::Line(l) => Corners::Line([
            shape.origin(),
            Point::new(shape.x + l.end_x, shape.y + l.end_y),
        ]),
    }
}

/// Whether `point` lies on the shape.
///
/// Rectangles are tested in their local frame, edges inclusive. Lines accept points within
/// [`line_hit_radius`] of the segment.
pub fn contains(shape: &Shape, point: Point) -> bool {
    match &shape.kind {
        ShapeKind::Rect(r) => {
            // Undo the rotation around the center, then test the unrotated frame.
            let local = rotate_about(Point::ORIGIN, point - center(shape), -shape.rotation);
            local.x.abs() <= r.width.abs() / 2.0 && local.y.abs() <= r.height.abs() / 2.0
        }
        ShapeKind::Line(l) => {
            let Corners::Line([a, b]) = corners(shape) else {
                return false;
            };
            distance_to_segment(point, a, b) <= line_hit_radius(l.stroke_width)
        }
    }
}

/// Hit tolerance for a line with the given stroke width.
pub fn line_hit_radius(stroke_width: f64) -> f64 {
    (stroke_width / 2.0).max(MIN_HIT_RADIUS)
}

/// Distance from `p` to the closed segment `a..b`. A zero-length segment is a point.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
