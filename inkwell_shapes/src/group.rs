// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape groups and their cached bounds.

use std::collections::BTreeSet;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::ids::{GroupId, ShapeId};
use crate::shape::Shape;

/// A set of at least two shapes that move and select together.
///
/// `bounds` is a cache of [`group_bounds`] over the current members; whoever changes a
/// member's geometry or the membership must refresh it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Identifier, also the store key.
    pub id: GroupId,
    /// Member shapes. Never groups.
    pub member_ids: BTreeSet<ShapeId>,
    /// Union of the members' rotation-aware bounds.
    pub bounds: Rect,
}

impl Group {
    /// Create a group over `members`, computing bounds from the given shapes.
    pub fn new<'a>(
        id: GroupId,
        members: impl IntoIterator<Item = ShapeId>,
        shapes: impl IntoIterator<Item = &'a Shape>,
    ) -> Self {
        Self {
            id,
            member_ids: members.into_iter().collect(),
            bounds: group_bounds(shapes),
        }
    }

    /// Whether `shape` is a member.
    pub fn contains(&self, shape: &ShapeId) -> bool {
        self.member_ids.contains(shape)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    /// True if there are no members. A stored group never is.
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// The smallest axis-aligned box enclosing every shape's [`geometry::aabb`].
///
/// An empty input yields [`Rect::ZERO`].
pub fn group_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Rect {
    shapes
        .into_iter()
        .map(geometry::aabb)
        .reduce(|acc, b| acc.union(b))
        .unwrap_or(Rect::ZERO)
}
