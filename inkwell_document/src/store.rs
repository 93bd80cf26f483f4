// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The authoritative record store.

use std::collections::BTreeMap;
use std::fmt::Debug;

use inkwell_shapes::{Binding, BindingId, Comment, CommentId, Group, GroupId, Shape, ShapeId};

use crate::replica::{MapChange, MemoryMap, ReplicatedMap};

/// A record stored under its own identifier.
pub trait Record: Clone {
    /// The identifier type; its string form is the map key.
    type Id: Ord + Clone + AsRef<str>;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;
}

impl Record for Shape {
    type Id = ShapeId;

    fn id(&self) -> &ShapeId {
        &self.id
    }
}

impl Record for Comment {
    type Id = CommentId;

    fn id(&self) -> &CommentId {
        &self.id
    }
}

impl Record for Binding {
    type Id = BindingId;

    fn id(&self) -> &BindingId {
        Self::id(self)
    }
}

impl Record for Group {
    type Id = GroupId;

    fn id(&self) -> &GroupId {
        &self.id
    }
}

/// One of the four record collections.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Shapes.
    Shapes,
    /// Comments.
    Comments,
    /// Bindings.
    Bindings,
    /// Groups.
    Groups,
}

impl Collection {
    /// Every collection, in flush order.
    pub const ALL: [Self; 4] = [Self::Shapes, Self::Comments, Self::Bindings, Self::Groups];

    /// The matching flag.
    pub fn flag(self) -> Collections {
        match self {
            Self::Shapes => Collections::SHAPES,
            Self::Comments => Collections::COMMENTS,
            Self::Bindings => Collections::BINDINGS,
            Self::Groups => Collections::GROUPS,
        }
    }
}

bitflags::bitflags! {
    /// A set of collections an observer is interested in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Collections: u8 {
        /// Shape changes.
        const SHAPES   = 0b0000_0001;
        /// Comment changes.
        const COMMENTS = 0b0000_0010;
        /// Binding changes.
        const BINDINGS = 0b0000_0100;
        /// Group changes.
        const GROUPS   = 0b0000_1000;
    }
}

/// The changes one collection accumulated since the previous flush.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Which collection changed.
    pub collection: Collection,
    /// The changes, in the order they happened.
    pub changes: Vec<MapChange>,
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with each flushed batch.
pub type Observer = Box<dyn FnMut(&ChangeBatch)>;

struct Subscription {
    id: SubscriptionId,
    interest: Collections,
    observer: Observer,
}

/// Four identifier-keyed collections, each backed by a [`ReplicatedMap`].
///
/// Mutations go straight into the replicated maps, which record them. [`flush`](Self::flush)
/// later drains those records, so local writes and merged peer writes reach observers
/// through the same path.
pub struct DocumentStore {
    shapes: Box<dyn ReplicatedMap<Shape>>,
    comments: Box<dyn ReplicatedMap<Comment>>,
    bindings: Box<dyn ReplicatedMap<Binding>>,
    groups: Box<dyn ReplicatedMap<Group>>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("shapes", &self.shapes.len())
            .field("comments", &self.comments.len())
            .field("bindings", &self.bindings.len())
            .field("groups", &self.groups.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot<R: Record>(map: &dyn ReplicatedMap<R>) -> BTreeMap<R::Id, R> {
    map.entries()
        .map(|(_, record)| (record.id().clone(), record.clone()))
        .collect()
}

fn put<R: Record>(map: &mut dyn ReplicatedMap<R>, record: R) {
    let key = record.id().as_ref().to_owned();
    map.set(&key, record);
}

impl DocumentStore {
    /// A store over fresh in-memory maps.
    pub fn new() -> Self {
        Self::with_maps(
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
            Box::new(MemoryMap::new()),
        )
    }

    /// A store over caller-supplied replicated maps, one per collection.
    pub fn with_maps(
        shapes: Box<dyn ReplicatedMap<Shape>>,
        comments: Box<dyn ReplicatedMap<Comment>>,
        bindings: Box<dyn ReplicatedMap<Binding>>,
        groups: Box<dyn ReplicatedMap<Group>>,
    ) -> Self {
        Self {
            shapes,
            comments,
            bindings,
            groups,
            subscriptions: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The shape stored under `id`.
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id.as_str())
    }

    /// Iterate stored shapes in key order without copying.
    pub fn iter_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.entries().map(|(_, s)| s)
    }

    /// A copy of every shape. Mutating it does not affect the store.
    pub fn shapes(&self) -> BTreeMap<ShapeId, Shape> {
        snapshot(self.shapes.as_ref())
    }

    /// Number of stored shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Insert or replace a shape under its own identifier.
    pub fn put_shape(&mut self, shape: Shape) {
        put(self.shapes.as_mut(), shape);
    }

    /// Delete a shape. Absent ids are ignored.
    pub fn delete_shape(&mut self, id: &ShapeId) {
        self.shapes.delete(id.as_str());
    }

    /// The comment stored under `id`.
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id.as_str())
    }

    /// A copy of every comment.
    pub fn comments(&self) -> BTreeMap<CommentId, Comment> {
        snapshot(self.comments.as_ref())
    }

    /// Insert or replace a comment.
    pub fn put_comment(&mut self, comment: Comment) {
        put(self.comments.as_mut(), comment);
    }

    /// Delete a comment. Absent ids are ignored.
    pub fn delete_comment(&mut self, id: &CommentId) {
        self.comments.delete(id.as_str());
    }

    /// The binding stored under `id`.
    pub fn binding(&self, id: &BindingId) -> Option<&Binding> {
        self.bindings.get(id.as_str())
    }

    /// Iterate stored bindings in key order without copying.
    pub fn iter_bindings(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.entries().map(|(_, b)| b)
    }

    /// A copy of every binding.
    pub fn bindings(&self) -> BTreeMap<BindingId, Binding> {
        snapshot(self.bindings.as_ref())
    }

    /// Insert or replace a binding.
    pub fn put_binding(&mut self, binding: Binding) {
        put(self.bindings.as_mut(), binding);
    }

    /// Delete a binding. Absent ids are ignored.
    pub fn delete_binding(&mut self, id: &BindingId) {
        self.bindings.delete(id.as_str());
    }

    /// The group stored under `id`.
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id.as_str())
    }

    /// A copy of every group.
    pub fn groups(&self) -> BTreeMap<GroupId, Group> {
        snapshot(self.groups.as_ref())
    }

    /// Insert or replace a group.
    pub fn put_group(&mut self, group: Group) {
        put(self.groups.as_mut(), group);
    }

    /// Delete a group. Absent ids are ignored.
    pub fn delete_group(&mut self, id: &GroupId) {
        self.groups.delete(id.as_str());
    }

    /// Register `observer` for changes to the collections in `interest`.
    pub fn subscribe(
        &mut self,
        interest: Collections,
        observer: impl FnMut(&ChangeBatch) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            interest,
            observer: Box::new(observer),
        });
        id
    }

    /// Drop a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Drain pending changes from every collection.
    ///
    /// Each non-empty batch is delivered to every interested observer, in subscription
    /// order, and then returned.
    pub fn flush(&mut self) -> Vec<ChangeBatch> {
        let mut batches = Vec::new();
        for collection in Collection::ALL {
            let changes = match collection {
                Collection::Shapes => self.shapes.take_changes(),
                Collection::Comments => self.comments.take_changes(),
                Collection::Bindings => self.bindings.take_changes(),
                Collection::Groups => self.groups.take_changes(),
            };
            if changes.is_empty() {
                continue;
            }
            let batch = ChangeBatch {
                collection,
                changes,
            };
            for sub in &mut self.subscriptions {
                if sub.interest.contains(collection.flag()) {
                    (sub.observer)(&batch);
                }
            }
            batches.push(batch);
        }
        batches
    }
}
