// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkwell Shapes: the records of a collaborative canvas document and their geometry.
//!
//! - [`Shape`] is a closed sum over rectangles and lines, with a fractional z-order key.
//! - [`Comment`], [`Binding`] and [`Group`] complete the document model.
//! - Every record is keyed by a namespaced identifier ([`ShapeId`], [`CommentId`], ...)
//!   whose string form is also its key in the replicated store.
//! - [`geometry`] answers exact questions about a shape: bounds, center, outline and
//!   point containment, with rotation applied.
//!
//! ```rust
//! use inkwell_shapes::{Shape, ShapeId, geometry};
//! use kurbo::Point;
//!
//! let id = ShapeId::new("box").unwrap();
//! let shape = Shape::rect(id, 100.0, 50.0).at(100.0, 100.0);
//! assert_eq!(geometry::center(&shape), Point::new(150.0, 125.0));
//! assert!(geometry::contains(&shape, Point::new(100.0, 100.0)));
//!
//! let turned = shape.with_rotation(std::f64::consts::FRAC_PI_4);
//! assert!(!geometry::contains(&turned, Point::new(100.0, 100.0)));
//! ```
//!
//! All records derive `serde` traits. Identifiers are validated when deserialized.

pub mod binding;
pub mod comment;
pub mod geometry;
pub mod group;
pub mod ids;
pub mod shape;

pub use binding::{Binding, CommentBinding, ConnectorBinding, NormalizedPoint, Terminal};
pub use comment::{Comment, Reply};
pub use group::{Group, group_bounds};
pub use ids::{BindingId, CommentId, GroupId, IdError, ReplyId, ShapeId, UserId};
pub use shape::{ArrowStyle, LineProps, PathType, RectProps, Shape, ShapeKind};
