// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkwell Document: a spatially indexed canvas document over a replicated map.
//!
//! The document keeps four record collections (shapes, comments, bindings, groups) in
//! [`ReplicatedMap`]s and a spatial index that always mirrors the shape collection. Every
//! change, whether made locally or merged in from a peer, is recorded by the map and later
//! flushed through the same path, so the index never needs to know where a change came from.
//!
//! - [`DocumentStore`] owns the maps and delivers change batches to observers.
//! - [`IndexSynchronizer`] applies shape change batches to the index.
//! - [`hit`] resolves a point to the topmost shape: a broad-phase index query, an exact
//!   geometry filter, then z-order.
//! - [`Validator`] checks local mutations before anything is written.
//! - [`Document`] ties these together.
//!
//! ```rust
//! use inkwell_document::Document;
//! use inkwell_shapes::{Shape, ShapeId};
//! use kurbo::Point;
//!
//! let mut doc = Document::new();
//! let id = |s: &str| ShapeId::new(s).unwrap();
//! doc.put_shape(Shape::rect(id("back"), 100.0, 100.0).with_index("a0")).unwrap();
//! doc.put_shape(Shape::rect(id("front"), 100.0, 100.0).at(50.0, 50.0).with_index("a1")).unwrap();
//!
//! let top = doc.find_top_shape_at(Point::new(75.0, 75.0)).unwrap();
//! assert_eq!(top.id, id("front"));
//!
//! // Changes merged in from a peer are indexed the same way.
//! doc.apply_remote(|store| store.delete_shape(&id("front")));
//! let top = doc.find_top_shape_at(Point::new(75.0, 75.0)).unwrap();
//! assert_eq!(top.id, id("back"));
//! ```
//!
//! Diagnostics are emitted through `tracing`; the crate never installs a subscriber.

mod config;
mod document;
mod error;
pub mod hit;
pub mod replica;
mod store;
mod sync;
mod validate;

pub use config::DocumentConfig;
pub use document::Document;
pub use error::{DocumentError, ValidationError};
pub use replica::{ChangeAction, MapChange, MemoryMap, ReplicatedMap};
pub use store::{
    ChangeBatch, Collection, Collections, DocumentStore, Observer, Record, SubscriptionId,
};
pub use sync::{IndexSynchronizer, index_aabb, shape_aabb, to_aabb};
pub use validate::{RuleValidator, Validator};
