// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape records.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, ShapeId};

/// Default fractional index for freshly built shapes.
pub const DEFAULT_INDEX: &str = "a0";

/// A shape on the canvas.
///
/// Shapes are replaced wholesale in the store; there is no partial-field patching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Identifier, also the store key.
    pub id: ShapeId,
    /// Group this shape belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Fractional z-order key. Greater sorts on top.
    pub index: String,
    /// World x of the shape's origin (top-left for rectangles, start point for lines).
    pub x: f64,
    /// World y of the shape's origin.
    pub y: f64,
    /// Rotation in radians around the shape's center. Always 0 for lines.
    #[serde(default)]
    pub rotation: f64,
    /// UI-level interaction lock. Ignored by indexing and hit testing.
    #[serde(default)]
    pub is_locked: bool,
    /// Variant-specific properties.
    pub kind: ShapeKind,
}

/// The closed set of shape variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "kebab-case")]
pub enum ShapeKind {
    /// Axis-aligned rectangle before rotation.
    Rect(RectProps),
    /// Straight segment from the shape origin to `origin + (end_x, end_y)`.
    Line(LineProps),
}

/// Rectangle properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectProps {
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
    /// Fill color, as a CSS color string.
    pub fill: String,
    /// Stroke color, as a CSS color string.
    pub stroke: String,
    /// Stroke width in world units.
    pub stroke_width: f64,
}

impl Default for RectProps {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            fill: "#ffffff".into(),
            stroke: "#000000".into(),
            stroke_width: 1.0,
        }
    }
}

/// Decoration drawn at a line terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowStyle {
    /// No decoration.
    #[default]
    None,
    /// Open arrow head.
    Arrow,
    /// Filled arrow head.
    FilledArrow,
    /// Circle.
    Circle,
    /// Diamond.
    Diamond,
}

/// How a line is routed when drawn.
///
/// Purely presentational; geometry always treats a line as the straight segment
/// between its endpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathType {
    /// Direct segment.
    #[default]
    Straight,
    /// Smooth curve.
    Curved,
    /// Orthogonal elbow.
    Elbow,
}

/// Line properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProps {
    /// End x, relative to the shape origin.
    pub end_x: f64,
    /// End y, relative to the shape origin.
    pub end_y: f64,
    /// Stroke color, as a CSS color string.
    pub stroke: String,
    /// Stroke width in world units.
    pub stroke_width: f64,
    /// Decoration at the start point.
    #[serde(default)]
    pub start_arrow: ArrowStyle,
    /// Decoration at the end point.
    #[serde(default)]
    pub end_arrow: ArrowStyle,
    /// Routing style.
    #[serde(default)]
    pub path_type: PathType,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            end_x: 100.0,
            end_y: 0.0,
            stroke: "#000000".into(),
            stroke_width: 2.0,
            start_arrow: ArrowStyle::None,
            end_arrow: ArrowStyle::None,
            path_type: PathType::Straight,
        }
    }
}

impl Shape {
    fn with_kind(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            group_id: None,
            index: DEFAULT_INDEX.into(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            is_locked: false,
            kind,
        }
    }

    /// A rectangle of the given size at the origin, with default styling.
    pub fn rect(id: ShapeId, width: f64, height: f64) -> Self {
        Self::with_kind(
            id,
            ShapeKind::Rect(RectProps {
                width,
                height,
                ..RectProps::default()
            }),
        )
    }

    /// A line starting at the origin and ending at `(end_x, end_y)` relative to it.
    pub fn line(id: ShapeId, end_x: f64, end_y: f64) -> Self {
        Self::with_kind(
            id,
            ShapeKind::Line(LineProps {
                end_x,
                end_y,
                ..LineProps::default()
            }),
        )
    }

    /// Move the shape origin.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the z-order key.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Set the rotation in radians.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the stroke width of either variant.
    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        match &mut self.kind {
            ShapeKind::Rect(r) => r.stroke_width = stroke_width,
            ShapeKind::Line(l) => l.stroke_width = stroke_width,
        }
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }

    /// Mark the shape as a member of `group`.
    #[must_use]
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group_id = Some(group);
        self
    }

    /// Shape origin as a point.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether this is a line.
    pub fn is_line(&self) -> bool {
        matches!(self.kind, ShapeKind::Line(_))
    }

    /// World-space start and end of a line; `None` for other variants.
    pub fn line_endpoints(&self) -> Option<(Point, Point)> {
        match &self.kind {
            ShapeKind::Line(l) => Some((
                self.origin(),
                Point::new(self.x + l.end_x, self.y + l.end_y),
            )),
            ShapeKind::Rect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(body: &str) -> ShapeId {
        ShapeId::new(body).unwrap()
    }

    #[test]
    fn builders_apply_defaults() {
        let r = Shape::rect(sid("r"), 40.0, 20.0).at(5.0, 6.0).with_index("a3");
        assert_eq!((r.x, r.y), (5.0, 6.0));
        assert_eq!(r.index, "a3");
        let ShapeKind::Rect(props) = &r.kind else {
            panic!("expected a rectangle");
        };
        assert_eq!(props.fill, "#ffffff");
        assert_eq!(props.stroke_width, 1.0);

        let l = Shape::line(sid("l"), 10.0, 0.0);
        assert!(l.is_line());
        let ShapeKind::Line(props) = &l.kind else {
            panic!("expected a line");
        };
        assert_eq!(props.stroke_width, 2.0);
        assert_eq!(props.end_arrow, ArrowStyle::None);
    }

    #[test]
    fn line_endpoints_are_world_space() {
        let l = Shape::line(sid("l"), 200.0, -50.0).at(100.0, 100.0);
        assert_eq!(
            l.line_endpoints(),
            Some((Point::new(100.0, 100.0), Point::new(300.0, 50.0)))
        );
        assert_eq!(Shape::rect(sid("r"), 1.0, 1.0).line_endpoints(), None);
    }

    #[test]
    fn json_shape_is_tagged_and_camel_cased() {
        let l = Shape::line(sid("l"), 10.0, 0.0).in_group(GroupId::new("g").unwrap());
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["groupId"], "group:g");
        assert_eq!(json["kind"]["type"], "line");
        assert_eq!(json["kind"]["props"]["strokeWidth"], 2.0);
        assert_eq!(json["kind"]["props"]["pathType"], "straight");

        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, l);
    }

    #[test]
    fn optional_fields_default_on_read() {
        let json = r##"{
            "id": "shape:x",
            "index": "a1",
            "x": 1.0,
            "y": 2.0,
            "kind": {"type": "rect", "props": {
                "width": 3.0, "height": 4.0, "fill": "#fff", "stroke": "#000", "strokeWidth": 1.0
            }}
        }"##;
        let s: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(s.rotation, 0.0);
        assert!(!s.is_locked);
        assert_eq!(s.group_id, None);
    }
}
