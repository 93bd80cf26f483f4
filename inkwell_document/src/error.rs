// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use inkwell_shapes::{CommentId, GroupId, ShapeId};

/// A local mutation that would break a document rule.
///
/// Validation runs before anything is written, so a rejected mutation leaves the store and
/// the index untouched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A referenced shape does not exist.
    #[error("shape not found: {0}")]
    ShapeNotFound(ShapeId),
    /// A referenced comment does not exist.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),
    /// A referenced group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
    /// Lines cannot be rotated.
    #[error("line {0} has non-zero rotation")]
    RotatedLine(ShapeId),
    /// A coordinate, size or angle is NaN or infinite.
    #[error("shape {0} has non-finite geometry")]
    NonFiniteGeometry(ShapeId),
    /// A connector's source is not a line.
    #[error("connector source {0} is not a line")]
    InvalidConnectorShape(ShapeId),
    /// A binding targets a shape that cannot be bound to.
    #[error("binding target {0} cannot be a line")]
    InvalidBindingTarget(ShapeId),
    /// A group with this identifier already exists.
    #[error("group {0} already exists")]
    GroupExists(GroupId),
    /// A group would have fewer than two members.
    #[error("group must have at least 2 members, got {0}")]
    TooFewMembers(usize),
    /// A shape is already a member of another group.
    #[error("shape {shape} is already in group {group}")]
    AlreadyGrouped {
        /// The shape.
        shape: ShapeId,
        /// The group it belongs to.
        group: GroupId,
    },
    /// A shape claims a group that does not list it.
    #[error("shape {shape} is not a member of group {group}")]
    NotAMember {
        /// The shape.
        shape: ShapeId,
        /// The group.
        group: GroupId,
    },
    /// A grouped shape cannot be deleted until it leaves its group.
    #[error("shape {shape} is still in group {group}")]
    StillGrouped {
        /// The shape.
        shape: ShapeId,
        /// The group it belongs to.
        group: GroupId,
    },
    /// A shape's group membership was changed by a plain write instead of a group operation.
    #[error("shape {0} changed group membership outside a group operation")]
    MembershipChanged(ShapeId),
}

/// Errors returned by [`Document`](crate::Document) operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// The mutation was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The grid cell size must be positive and finite.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),
    /// The grid origin must be finite.
    #[error("invalid grid origin: ({0}, {1})")]
    InvalidOrigin(f64, f64),
}
