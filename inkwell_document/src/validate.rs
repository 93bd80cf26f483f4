// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Referential rules checked before a local mutation is written.

use std::fmt::Debug;

use inkwell_shapes::{Binding, Group, Shape, ShapeId, ShapeKind};

use crate::error::ValidationError;
use crate::store::DocumentStore;

/// Checks local mutations against the current store.
///
/// Peer mutations arriving through the replication layer are not validated; the layer that
/// merged them is trusted.
pub trait Validator: Debug {
    /// A shape about to be inserted or replaced.
    fn check_shape(&self, shape: &Shape, store: &DocumentStore) -> Result<(), ValidationError>;

    /// A shape about to be deleted.
    fn check_shape_delete(&self, id: &ShapeId, store: &DocumentStore)
    -> Result<(), ValidationError>;

    /// A binding about to be inserted or replaced.
    fn check_binding(&self, binding: &Binding, store: &DocumentStore)
    -> Result<(), ValidationError>;

    /// A group about to be created.
    fn check_group(&self, group: &Group, store: &DocumentStore) -> Result<(), ValidationError>;

    /// A shape about to join an existing group.
    fn check_join(
        &self,
        group: &Group,
        shape: &ShapeId,
        store: &DocumentStore,
    ) -> Result<(), ValidationError>;
}

/// The standard document rules.
#[derive(Copy, Clone, Debug, Default)]
pub struct RuleValidator;

fn finite(shape: &Shape) -> bool {
    let props = match &shape.kind {
        ShapeKind::Rect(r) => [r.width, r.height, r.stroke_width],
        ShapeKind::Line(l) => [l.end_x, l.end_y, l.stroke_width],
    };
    [shape.x, shape.y, shape.rotation]
        .into_iter()
        .chain(props)
        .all(f64::is_finite)
}

/// A shape that exists and can be the target of a binding.
fn bindable_target<'s>(
    id: &ShapeId,
    store: &'s DocumentStore,
) -> Result<&'s Shape, ValidationError> {
    let target = store
        .shape(id)
        .ok_or_else(|| ValidationError::ShapeNotFound(id.clone()))?;
    if target.is_line() {
        return Err(ValidationError::InvalidBindingTarget(id.clone()));
    }
    Ok(target)
}

/// A shape that exists and is not in a group other than `except`.
fn ungrouped<'s>(
    id: &ShapeId,
    except: &Group,
    store: &'s DocumentStore,
) -> Result<&'s Shape, ValidationError> {
    let shape = store
        .shape(id)
        .ok_or_else(|| ValidationError::ShapeNotFound(id.clone()))?;
    match &shape.group_id {
        Some(group) if *group != except.id => Err(ValidationError::AlreadyGrouped {
            shape: id.clone(),
            group: group.clone(),
        }),
        _ => Ok(shape),
    }
}

impl Validator for RuleValidator {
    fn check_shape(&self, shape: &Shape, store: &DocumentStore) -> Result<(), ValidationError> {
        if !finite(shape) {
            return Err(ValidationError::NonFiniteGeometry(shape.id.clone()));
        }
        if shape.is_line() && shape.rotation != 0.0 {
            return Err(ValidationError::RotatedLine(shape.id.clone()));
        }
        let previous = store.shape(&shape.id).and_then(|s| s.group_id.as_ref());
        if previous != shape.group_id.as_ref() {
            return Err(ValidationError::MembershipChanged(shape.id.clone()));
        }
        if let Some(group_id) = &shape.group_id {
            let group = store
                .group(group_id)
                .ok_or_else(|| ValidationError::GroupNotFound(group_id.clone()))?;
            if !group.contains(&shape.id) {
                return Err(ValidationError::NotAMember {
                    shape: shape.id.clone(),
                    group: group_id.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_shape_delete(
        &self,
        id: &ShapeId,
        store: &DocumentStore,
    ) -> Result<(), ValidationError> {
        match store.shape(id).and_then(|s| s.group_id.as_ref()) {
            Some(group) => Err(ValidationError::StillGrouped {
                shape: id.clone(),
                group: group.clone(),
            }),
            None => Ok(()),
        }
    }

    fn check_binding(
        &self,
        binding: &Binding,
        store: &DocumentStore,
    ) -> Result<(), ValidationError> {
        match binding {
            Binding::Connector(c) => {
                let from = store
                    .shape(&c.from_id)
                    .ok_or_else(|| ValidationError::ShapeNotFound(c.from_id.clone()))?;
                if !from.is_line() {
                    return Err(ValidationError::InvalidConnectorShape(c.from_id.clone()));
                }
                bindable_target(&c.to_id, store)?;
            }
            Binding::Comment(c) => {
                if store.comment(&c.from_id).is_none() {
                    return Err(ValidationError::CommentNotFound(c.from_id.clone()));
                }
                bindable_target(&c.to_id, store)?;
            }
        }
        Ok(())
    }

    fn check_group(&self, group: &Group, store: &DocumentStore) -> Result<(), ValidationError> {
        if store.group(&group.id).is_some() {
            return Err(ValidationError::GroupExists(group.id.clone()));
        }
        if group.len() < 2 {
            return Err(ValidationError::TooFewMembers(group.len()));
        }
        for member in &group.member_ids {
            ungrouped(member, group, store)?;
        }
        Ok(())
    }

    fn check_join(
        &self,
        group: &Group,
        shape: &ShapeId,
        store: &DocumentStore,
    ) -> Result<(), ValidationError> {
        ungrouped(shape, group, store).map(drop)
    }
}
