// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeps the spatial index in step with the shape collection.

use inkwell_index::{Aabb2D, Backend, IndexGeneric};
use inkwell_shapes::{Shape, ShapeId, ShapeKind, geometry};
use kurbo::Rect;
use tracing::{debug, trace, warn};

use crate::replica::{ChangeAction, MapChange};
use crate::store::DocumentStore;

/// Convert a kurbo rectangle into an index box.
pub fn to_aabb(rect: Rect) -> Aabb2D<f64> {
    let r = rect.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

/// A shape's rotation-aware bounds as an index box.
pub fn shape_aabb(shape: &Shape) -> Aabb2D<f64> {
    to_aabb(geometry::aabb(shape))
}

/// The box a shape is indexed under.
///
/// Rectangles use their bounds. Lines are grown by their hit radius, so every point that
/// [`geometry::contains`] accepts falls inside the indexed box, whatever the stroke width.
pub fn index_aabb(shape: &Shape) -> Aabb2D<f64> {
    match &shape.kind {
        ShapeKind::Rect(_) => shape_aabb(shape),
        ShapeKind::Line(l) => {
            let r = geometry::line_hit_radius(l.stroke_width);
            to_aabb(geometry::aabb(shape).inflate(r, r))
        }
    }
}

/// Owns the spatial index and applies shape change batches to it.
///
/// After each batch is applied, the indexed identifiers are exactly the identifiers of the
/// shapes in the store, each with the [`index_aabb`] of its current record.
#[derive(Debug)]
pub struct IndexSynchronizer<B: Backend<f64>> {
    index: IndexGeneric<f64, ShapeId, B>,
}

impl<B: Backend<f64>> IndexSynchronizer<B> {
    /// Wrap an index. Call [`rebuild`](Self::rebuild) before relying on it.
    pub fn new(index: IndexGeneric<f64, ShapeId, B>) -> Self {
        Self { index }
    }

    /// The synchronized index.
    pub fn index(&self) -> &IndexGeneric<f64, ShapeId, B> {
        &self.index
    }

    /// Clear the index and re-insert every shape in the store.
    ///
    /// Needed whenever the store was populated without this synchronizer seeing the changes,
    /// such as a document loaded from a snapshot.
    pub fn rebuild(&mut self, store: &DocumentStore) {
        self.index.clear();
        self.index.reserve(store.shape_count());
        for shape in store.iter_shapes() {
            self.index.insert(shape.id.clone(), index_aabb(shape));
        }
        debug!(shapes = self.index.len(), "spatial index rebuilt");
    }

    /// Apply one batch of shape changes.
    ///
    /// Additions and updates re-read the record from the store, since a later change in the
    /// same batch may already have deleted it.
    pub fn apply(&mut self, changes: &[MapChange], store: &DocumentStore) {
        for change in changes {
            let id = match ShapeId::parse(change.key.as_str()) {
                Ok(id) => id,
                Err(error) => {
                    warn!(%error, key = %change.key, "ignoring change with malformed key");
                    continue;
                }
            };
            match change.action {
                ChangeAction::Delete => {
                    self.index.remove(&id);
                    trace!(shape = %id, "unindexed");
                }
                ChangeAction::Add | ChangeAction::Update => {
                    let Some(shape) = store.shape(&id) else {
                        continue;
                    };
                    self.index.update(id, index_aabb(shape));
                    trace!(shape = %shape.id, action = ?change.action, "indexed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_index::GridIndex;
    use std::collections::BTreeSet;

    fn sid(body: &str) -> ShapeId {
        ShapeId::new(body).unwrap()
    }

    fn indexed(sync: &IndexSynchronizer<inkwell_index::GridF64>) -> BTreeSet<ShapeId> {
        sync.index().ids().cloned().collect()
    }

    fn stored(store: &DocumentStore) -> BTreeSet<ShapeId> {
        store.shapes().into_keys().collect()
    }

    #[test]
    fn index_mirrors_store_after_each_batch() {
        let mut store = DocumentStore::new();
        let mut sync = IndexSynchronizer::new(GridIndex::new());
        let mut seed = 17_u32;
        for step in 0..300 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let id = sid(&format!("s{}", seed % 23));
            let pos = f64::from(seed % 2000) - 1000.0;
            if seed % 5 == 0 {
                store.delete_shape(&id);
            } else {
                store.put_shape(Shape::rect(id, 30.0, 60.0).at(pos, -pos));
            }
            if step % 7 == 0 {
                for batch in store.flush() {
                    sync.apply(&batch.changes, &store);
                }
                assert_eq!(indexed(&sync), stored(&store));
            }
        }
        for batch in store.flush() {
            sync.apply(&batch.changes, &store);
        }
        assert_eq!(indexed(&sync), stored(&store));
        for shape in store.iter_shapes() {
            assert_eq!(sync.index().get(&shape.id), Some(index_aabb(shape)));
        }
    }

    #[test]
    fn add_then_delete_in_one_batch_leaves_nothing() {
        let mut store = DocumentStore::new();
        let mut sync = IndexSynchronizer::new(GridIndex::new());
        store.put_shape(Shape::rect(sid("a"), 1.0, 1.0));
        store.delete_shape(&sid("a"));
        for batch in store.flush() {
            sync.apply(&batch.changes, &store);
        }
        assert!(sync.index().is_empty());
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let store = DocumentStore::new();
        let mut sync = IndexSynchronizer::new(GridIndex::new());
        sync.apply(
            &[MapChange::new("comment:oops", ChangeAction::Delete)],
            &store,
        );
        assert!(sync.index().is_empty());
    }

    #[test]
    fn lines_are_indexed_with_their_hit_radius() {
        let thin = Shape::line(sid("thin"), 100.0, 0.0).at(0.0, 50.0);
        assert_eq!(index_aabb(&thin), Aabb2D::new(-4.0, 46.0, 104.0, 54.0));
        let wide = Shape::line(sid("wide"), 100.0, 0.0)
            .at(0.0, 50.0)
            .with_stroke_width(20.0);
        assert_eq!(index_aabb(&wide), Aabb2D::new(-10.0, 40.0, 110.0, 60.0));
        let rect = Shape::rect(sid("r"), 10.0, 20.0).at(5.0, 5.0);
        assert_eq!(index_aabb(&rect), shape_aabb(&rect));
    }

    #[test]
    fn rebuild_replaces_stale_contents() {
        let mut store = DocumentStore::new();
        store.put_shape(Shape::rect(sid("a"), 10.0, 10.0));
        store.put_shape(Shape::line(sid("b"), 10.0, 10.0).at(400.0, 0.0));
        let mut index = GridIndex::new();
        index.insert(sid("ghost"), Aabb2D::new(0.0, 0.0, 1.0, 1.0));
        let mut sync = IndexSynchronizer::new(index);
        sync.rebuild(&store);
        assert_eq!(indexed(&sync), stored(&store));
    }
}
