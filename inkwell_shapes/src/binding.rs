// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bindings attach connectors and comments to target shapes.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::ids::{BindingId, CommentId, ShapeId};

/// A point in the unit square of a shape's bounds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// 0 is the left edge, 1 the right edge.
    pub x: f64,
    /// 0 is the top edge, 1 the bottom edge.
    pub y: f64,
}

impl NormalizedPoint {
    /// The center of the bounds.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Create a normalized point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map into world space through `bounds`.
    pub fn resolve(self, bounds: Rect) -> Point {
        Point::new(
            bounds.x0 + self.x * bounds.width(),
            bounds.y0 + self.y * bounds.height(),
        )
    }
}

impl Default for NormalizedPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Which end of a line a connector binds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    /// The line's origin.
    Start,
    /// The line's far end.
    End,
}

/// Binds one terminal of a line to an anchor on another shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorBinding {
    /// Identifier, also the store key.
    pub id: BindingId,
    /// The line being connected.
    pub from_id: ShapeId,
    /// Which end of the line.
    pub terminal: Terminal,
    /// The shape being connected to.
    pub to_id: ShapeId,
    /// Where on the target the terminal attaches.
    #[serde(default)]
    pub to_anchor: NormalizedPoint,
}

/// Attaches a comment to a shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBinding {
    /// Identifier, also the store key.
    pub id: BindingId,
    /// The attached comment.
    pub from_id: CommentId,
    /// The shape it is attached to.
    pub to_id: ShapeId,
}

/// Any binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Binding {
    /// Line-to-shape connection.
    Connector(ConnectorBinding),
    /// Comment-to-shape attachment.
    Comment(CommentBinding),
}

impl Binding {
    /// A connector anchored at the target's center.
    pub fn connector(id: BindingId, from: ShapeId, terminal: Terminal, to: ShapeId) -> Self {
        Self::Connector(ConnectorBinding {
            id,
            from_id: from,
            terminal,
            to_id: to,
            to_anchor: NormalizedPoint::CENTER,
        })
    }

    /// A comment attachment.
    pub fn comment(id: BindingId, comment: CommentId, to: ShapeId) -> Self {
        Self::Comment(CommentBinding {
            id,
            from_id: comment,
            to_id: to,
        })
    }

    /// The binding's identifier.
    pub fn id(&self) -> &BindingId {
        match self {
            Self::Connector(c) => &c.id,
            Self::Comment(c) => &c.id,
        }
    }

    /// The target shape.
    pub fn target(&self) -> &ShapeId {
        match self {
            Self::Connector(c) => &c.to_id,
            Self::Comment(c) => &c.to_id,
        }
    }

    /// Whether `shape` is either end of this binding.
    pub fn references_shape(&self, shape: &ShapeId) -> bool {
        match self {
            Self::Connector(c) => &c.from_id == shape || &c.to_id == shape,
            Self::Comment(c) => &c.to_id == shape,
        }
    }
}
