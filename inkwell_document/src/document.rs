// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document facade: store, index and rules behind one API.

use std::collections::{BTreeMap, BTreeSet};

use inkwell_index::{Backend, GridF64, GridIndex, IndexGeneric};
use inkwell_shapes::{
    Binding, BindingId, Comment, CommentBinding, CommentId, Group, GroupId, NormalizedPoint,
    Shape, ShapeId, geometry, group_bounds,
};
use kurbo::{Point, Rect};
use tracing::{debug, warn};

use crate::config::DocumentConfig;
use crate::error::{DocumentError, ValidationError};
use crate::hit;
use crate::store::{ChangeBatch, Collection, Collections, DocumentStore, SubscriptionId};
use crate::sync::IndexSynchronizer;
use crate::validate::{RuleValidator, Validator};

fn rejected(op: &'static str, error: ValidationError) -> DocumentError {
    warn!(op, %error, "rejected local mutation");
    error.into()
}

/// A canvas document with an always-fresh spatial index.
///
/// Local mutations are validated, written to the store, and synchronized into the index
/// before the call returns. Peer mutations go through [`apply_remote`](Self::apply_remote),
/// which skips validation but synchronizes the same way.
#[derive(Debug)]
pub struct Document<B: Backend<f64> = GridF64> {
    store: DocumentStore,
    sync: IndexSynchronizer<B>,
    validator: Box<dyn Validator>,
}

impl Document<GridF64> {
    /// An empty document with the default grid.
    pub fn new() -> Self {
        Self::from_parts(DocumentStore::new(), GridIndex::new())
    }

    /// An empty document with a configured grid.
    pub fn with_config(config: &DocumentConfig) -> Result<Self, DocumentError> {
        Self::from_store(DocumentStore::new(), config)
    }

    /// A document over an existing, possibly populated, store.
    pub fn from_store(
        store: DocumentStore,
        config: &DocumentConfig,
    ) -> Result<Self, DocumentError> {
        config.validate()?;
        let index = GridIndex::with_uniform_grid_with_origin(
            config.cell_size,
            config.origin_x,
            config.origin_y,
        );
        Ok(Self::from_parts(store, index))
    }
}

impl Default for Document<GridF64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend<f64>> Document<B> {
    /// Assemble a document from a store and an index with any backend.
    ///
    /// The index is rebuilt from the store's current shapes, and pending changes are flushed
    /// to the store's observers.
    pub fn from_parts(mut store: DocumentStore, index: IndexGeneric<f64, ShapeId, B>) -> Self {
        store.flush();
        let mut sync = IndexSynchronizer::new(index);
        sync.rebuild(&store);
        Self {
            store,
            sync,
            validator: Box::new(RuleValidator),
        }
    }

    /// Replace the rules applied to local mutations.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Read access to the store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Read access to the spatial index.
    pub fn index(&self) -> &IndexGeneric<f64, ShapeId, B> {
        self.sync.index()
    }

    /// Observe store changes. See [`DocumentStore::subscribe`].
    pub fn subscribe(
        &mut self,
        interest: Collections,
        observer: impl FnMut(&ChangeBatch) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(interest, observer)
    }

    /// Stop observing.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Drain the store's pending changes and bring the index up to date.
    ///
    /// Returns the number of shape changes applied. Mutations made through this type call
    /// it already; it only needs calling directly after writing to a shared replicated map
    /// behind the store's back.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        for batch in self.store.flush() {
            if batch.collection == Collection::Shapes {
                self.sync.apply(&batch.changes, &self.store);
                applied += batch.changes.len();
            }
        }
        applied
    }

    /// Apply changes that originated from a peer.
    ///
    /// No validation is performed, and cached group bounds are taken as delivered.
    pub fn apply_remote<R>(&mut self, apply: impl FnOnce(&mut DocumentStore) -> R) -> R {
        let out = apply(&mut self.store);
        let applied = self.sync();
        debug!(applied, "applied remote changes");
        out
    }

    // Shapes

    /// Insert or replace a shape.
    ///
    /// If the shape is grouped, the group's bounds are refreshed in the same batch.
    pub fn put_shape(&mut self, shape: Shape) -> Result<(), DocumentError> {
        self.validator
            .check_shape(&shape, &self.store)
            .map_err(|e| rejected("put_shape", e))?;
        let group = shape.group_id.clone();
        debug!(shape = %shape.id, "put shape");
        self.store.put_shape(shape);
        if let Some(group) = group {
            self.refresh_group_bounds(&group);
        }
        self.sync();
        Ok(())
    }

    /// Delete a shape. Deleting an absent shape succeeds; a grouped shape must leave its
    /// group first. Bindings referring to the shape are left for the caller to clean up.
    pub fn delete_shape(&mut self, id: &ShapeId) -> Result<(), DocumentError> {
        self.validator
            .check_shape_delete(id, &self.store)
            .map_err(|e| rejected("delete_shape", e))?;
        debug!(shape = %id, "delete shape");
        self.store.delete_shape(id);
        self.sync();
        Ok(())
    }

    /// The shape stored under `id`.
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.store.shape(id)
    }

    /// A copy of every shape.
    pub fn shapes(&self) -> BTreeMap<ShapeId, Shape> {
        self.store.shapes()
    }

    /// The topmost shape at `point`. See [`hit::find_top_shape_at`].
    pub fn find_top_shape_at(&self, point: Point) -> Option<&Shape> {
        hit::find_top_shape_at(self.sync.index(), &self.store, point)
    }

    /// Shapes whose bounds intersect `rect`, bottom to top.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<&Shape> {
        hit::shapes_in_rect(self.sync.index(), &self.store, rect)
    }

    // Comments

    /// Insert or replace a comment.
    pub fn put_comment(&mut self, comment: Comment) {
        debug!(comment = %comment.id, "put comment");
        self.store.put_comment(comment);
        self.sync();
    }

    /// Modify a stored comment in place, for replies, resolution and soft deletion.
    pub fn edit_comment(
        &mut self,
        id: &CommentId,
        edit: impl FnOnce(&mut Comment),
    ) -> Result<(), DocumentError> {
        let mut comment = self
            .store
            .comment(id)
            .cloned()
            .ok_or_else(|| rejected("edit_comment", ValidationError::CommentNotFound(id.clone())))?;
        edit(&mut comment);
        comment.id = id.clone();
        self.put_comment(comment);
        Ok(())
    }

    /// Remove a comment outright. Prefer [`Comment::soft_delete`] for user-facing deletes.
    pub fn delete_comment(&mut self, id: &CommentId) {
        debug!(comment = %id, "delete comment");
        self.store.delete_comment(id);
        self.sync();
    }

    /// The comment stored under `id`.
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.store.comment(id)
    }

    /// A copy of every comment.
    pub fn comments(&self) -> BTreeMap<CommentId, Comment> {
        self.store.comments()
    }

    /// The binding attaching `comment` to a shape, if any.
    pub fn comment_binding(&self, comment: &CommentId) -> Option<&CommentBinding> {
        self.store.iter_bindings().find_map(|b| match b {
            Binding::Comment(c) if c.from_id == *comment => Some(c),
            _ => None,
        })
    }

    /// World position of a comment.
    ///
    /// Bound comments store normalized coordinates, resolved here through the current bounds
    /// of the shape they are attached to. Returns `None` if the comment, or the shape it is
    /// bound to, is missing.
    pub fn comment_position(&self, id: &CommentId) -> Option<Point> {
        let comment = self.store.comment(id)?;
        match self.comment_binding(id) {
            Some(binding) => {
                let target = self.store.shape(&binding.to_id)?;
                let anchor = NormalizedPoint::new(comment.x, comment.y);
                Some(anchor.resolve(geometry::aabb(target)))
            }
            None => Some(comment.position()),
        }
    }

    // Bindings

    /// Insert or replace a binding.
    pub fn put_binding(&mut self, binding: Binding) -> Result<(), DocumentError> {
        self.validator
            .check_binding(&binding, &self.store)
            .map_err(|e| rejected("put_binding", e))?;
        debug!(binding = %binding.id(), "put binding");
        self.store.put_binding(binding);
        self.sync();
        Ok(())
    }

    /// Delete a binding. Absent ids are ignored.
    pub fn delete_binding(&mut self, id: &BindingId) {
        debug!(binding = %id, "delete binding");
        self.store.delete_binding(id);
        self.sync();
    }

    /// The binding stored under `id`.
    pub fn binding(&self, id: &BindingId) -> Option<&Binding> {
        self.store.binding(id)
    }

    /// A copy of every binding.
    pub fn bindings(&self) -> BTreeMap<BindingId, Binding> {
        self.store.bindings()
    }

    /// Bindings that start or end at `shape`; the ones to revisit when it moves or goes away.
    pub fn bindings_for_shape(&self, shape: &ShapeId) -> Vec<&Binding> {
        self.store
            .iter_bindings()
            .filter(|b| b.references_shape(shape))
            .collect()
    }

    /// World position where a connector attaches to its target.
    pub fn connector_anchor(&self, id: &BindingId) -> Option<Point> {
        let Binding::Connector(c) = self.store.binding(id)? else {
            return None;
        };
        let target = self.store.shape(&c.to_id)?;
        Some(c.to_anchor.resolve(geometry::aabb(target)))
    }

    // Groups

    /// The group stored under `id`.
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.store.group(id)
    }

    /// A copy of every group.
    pub fn groups(&self) -> BTreeMap<GroupId, Group> {
        self.store.groups()
    }

    /// Group at least two ungrouped shapes under a fresh `id`.
    pub fn create_group(
        &mut self,
        id: GroupId,
        members: impl IntoIterator<Item = ShapeId>,
    ) -> Result<Group, DocumentError> {
        let member_ids: BTreeSet<ShapeId> = members.into_iter().collect();
        let bounds = self.bounds_of(&member_ids);
        let group = Group {
            id,
            member_ids,
            bounds,
        };
        self.validator
            .check_group(&group, &self.store)
            .map_err(|e| rejected("create_group", e))?;
        for member in &group.member_ids {
            self.set_membership(member, Some(group.id.clone()));
        }
        debug!(group = %group.id, members = group.len(), "create group");
        self.store.put_group(group.clone());
        self.sync();
        Ok(group)
    }

    /// Add an ungrouped shape to an existing group.
    pub fn add_to_group(&mut self, id: &GroupId, shape: ShapeId) -> Result<Group, DocumentError> {
        let mut group = self.existing_group("add_to_group", id)?;
        if group.contains(&shape) {
            return Ok(group);
        }
        self.validator
            .check_join(&group, &shape, &self.store)
            .map_err(|e| rejected("add_to_group", e))?;
        self.set_membership(&shape, Some(id.clone()));
        debug!(group = %id, shape = %shape, "add to group");
        group.member_ids.insert(shape);
        group.bounds = self.bounds_of(&group.member_ids);
        self.store.put_group(group.clone());
        self.sync();
        Ok(group)
    }

    /// Remove a member from a group.
    ///
    /// A group left with fewer than two members is dissolved and `None` is returned.
    pub fn remove_from_group(
        &mut self,
        id: &GroupId,
        shape: &ShapeId,
    ) -> Result<Option<Group>, DocumentError> {
        let mut group = self.existing_group("remove_from_group", id)?;
        if !group.member_ids.remove(shape) {
            return Err(rejected(
                "remove_from_group",
                ValidationError::NotAMember {
                    shape: shape.clone(),
                    group: id.clone(),
                },
            ));
        }
        self.set_membership(shape, None);
        debug!(group = %id, shape = %shape, "remove from group");
        if group.len() < 2 {
            self.dissolve(&group);
            self.sync();
            return Ok(None);
        }
        group.bounds = self.bounds_of(&group.member_ids);
        self.store.put_group(group.clone());
        self.sync();
        Ok(Some(group))
    }

    /// Dissolve a group, releasing all of its members.
    pub fn ungroup(&mut self, id: &GroupId) -> Result<(), DocumentError> {
        let group = self.existing_group("ungroup", id)?;
        self.dissolve(&group);
        self.sync();
        Ok(())
    }

    fn existing_group(&self, op: &'static str, id: &GroupId) -> Result<Group, DocumentError> {
        self.store
            .group(id)
            .cloned()
            .ok_or_else(|| rejected(op, ValidationError::GroupNotFound(id.clone())))
    }

    fn dissolve(&mut self, group: &Group) {
        for member in &group.member_ids {
            self.set_membership(member, None);
        }
        debug!(group = %group.id, "dissolve group");
        self.store.delete_group(&group.id);
    }

    fn set_membership(&mut self, shape: &ShapeId, group: Option<GroupId>) {
        if let Some(mut record) = self.store.shape(shape).cloned() {
            record.group_id = group;
            self.store.put_shape(record);
        }
    }

    fn bounds_of(&self, members: &BTreeSet<ShapeId>) -> Rect {
        group_bounds(members.iter().filter_map(|m| self.store.shape(m)))
    }

    fn refresh_group_bounds(&mut self, id: &GroupId) {
        let Some(mut group) = self.store.group(id).cloned() else {
            return;
        };
        let bounds = self.bounds_of(&group.member_ids);
        if bounds != group.bounds {
            group.bounds = bounds;
            self.store.put_group(group);
        }
    }
}
