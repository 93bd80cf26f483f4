// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam to the replication layer.
//!
//! The document never assumes a particular merge algorithm. It only needs an ordered
//! string-keyed map per collection that records which keys changed, whether the change was
//! made locally or merged in from a peer.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// What happened to a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// The key did not exist before.
    Add,
    /// The key existed and its value was replaced.
    Update,
    /// The key was removed.
    Delete,
}

/// One entry of a change batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapChange {
    /// The affected key, `"<kind>:<identifier>"`.
    pub key: String,
    /// What happened to it.
    pub action: ChangeAction,
}

impl MapChange {
    /// Convenience constructor.
    pub fn new(key: impl Into<String>, action: ChangeAction) -> Self {
        Self {
            key: key.into(),
            action,
        }
    }
}

/// A replicated, ordered, string-keyed map.
///
/// Implementations record a [`MapChange`] for every mutation, local or remote, and hand the
/// pending batch over through [`take_changes`](Self::take_changes). Changes are delivered in
/// the order they happened and are not coalesced; a key may appear several times in one
/// batch, and readers must consult the map's current state rather than trusting the action.
pub trait ReplicatedMap<V> {
    /// Current value for `key`.
    fn get(&self, key: &str) -> Option<&V>;

    /// Insert or replace the value for `key`.
    fn set(&mut self, key: &str, value: V);

    /// Remove `key`. Removing an absent key records nothing.
    fn delete(&mut self, key: &str);

    /// Iterate all entries in key order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &V)> + '_>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// True if the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the changes recorded since the previous call.
    fn take_changes(&mut self) -> Vec<MapChange>;
}

/// In-process [`ReplicatedMap`] backed by a `BTreeMap`.
///
/// Suitable for single-user documents, for tests, and as the local replica that a network
/// layer merges peer updates into.
pub struct MemoryMap<V> {
    entries: BTreeMap<String, V>,
    pending: Vec<MapChange>,
}

impl<V> MemoryMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Number of recorded changes not yet taken.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<V> Default for MemoryMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Debug for MemoryMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMap")
            .field("len", &self.entries.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<V> ReplicatedMap<V> for MemoryMap<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: V) {
        let action = match self.entries.insert(key.to_owned(), value) {
            Some(_) => ChangeAction::Update,
            None => ChangeAction::Add,
        };
        self.pending.push(MapChange::new(key, action));
    }

    fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.pending.push(MapChange::new(key, ChangeAction::Delete));
        }
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &V)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn take_changes(&mut self) -> Vec<MapChange> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_follow_prior_state() {
        let mut m = MemoryMap::new();
        m.set("shape:a", 1);
        m.set("shape:a", 2);
        m.delete("shape:a");
        m.delete("shape:a");
        m.delete("shape:never");
        assert_eq!(
            m.take_changes(),
            [
                MapChange::new("shape:a", ChangeAction::Add),
                MapChange::new("shape:a", ChangeAction::Update),
                MapChange::new("shape:a", ChangeAction::Delete),
            ]
        );
        assert!(m.take_changes().is_empty(), "changes are drained once");
    }

    #[test]
    fn entries_are_key_ordered() {
        let mut m = MemoryMap::new();
        m.set("shape:b", 'b');
        m.set("shape:a", 'a');
        let keys: Vec<_> = m.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, ["shape:a", "shape:b"]);
        assert_eq!(m.get("shape:b"), Some(&'b'));
        assert_eq!(m.len(), 2);
        assert_eq!(m.pending(), 2);
    }
}
