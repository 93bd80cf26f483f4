// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comment threads.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, ReplyId, UserId};

/// A comment pinned to the canvas.
///
/// `x` and `y` are contextual: when a comment binding attaches the comment to a shape they
/// are normalized `[0, 1]` coordinates within that shape's bounds, otherwise they are world
/// coordinates.
///
/// Timestamps are Unix milliseconds supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier, also the store key.
    pub id: CommentId,
    /// Horizontal coordinate, normalized or world depending on binding.
    pub x: f64,
    /// Vertical coordinate, normalized or world depending on binding.
    pub y: f64,
    /// Body text.
    pub text: String,
    /// Author.
    pub author: UserId,
    /// Creation time.
    pub created_at: u64,
    /// Whether the thread has been marked resolved.
    pub resolved: bool,
    /// Soft-delete flag; deleted comments stay in the document so they can be restored.
    #[serde(default)]
    pub deleted: bool,
    /// When the comment was soft-deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<u64>,
    /// Who soft-deleted the comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<UserId>,
    /// Replies, oldest first.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// A reply in a comment thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Identifier.
    pub id: ReplyId,
    /// Body text.
    pub text: String,
    /// Author.
    pub author: UserId,
    /// Creation time.
    pub created_at: u64,
}

impl Comment {
    /// A fresh, unresolved comment with no replies.
    pub fn new(
        id: CommentId,
        x: f64,
        y: f64,
        text: impl Into<String>,
        author: UserId,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            x,
            y,
            text: text.into(),
            author,
            created_at,
            resolved: false,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
            replies: Vec::new(),
        }
    }

    /// The raw coordinate pair.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Append a reply to the thread.
    pub fn add_reply(&mut self, id: ReplyId, text: impl Into<String>, author: UserId, at: u64) {
        self.replies.push(Reply {
            id,
            text: text.into(),
            author,
            created_at: at,
        });
    }

    /// Mark the thread resolved.
    pub fn resolve(&mut self) {
        self.resolved = true;
    }

    /// Reopen a resolved thread.
    pub fn unresolve(&mut self) {
        self.resolved = false;
    }

    /// Soft-delete the comment, recording who did it and when.
    pub fn soft_delete(&mut self, by: UserId, at: u64) {
        self.deleted = true;
        self.deleted_at = Some(at);
        self.deleted_by = Some(by);
    }

    /// Undo a soft delete.
    pub fn restore(&mut self) {
        self.deleted = false;
        self.deleted_at = None;
        self.deleted_by = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    fn sample() -> Comment {
        Comment::new(
            CommentId::new("c").unwrap(),
            0.25,
            0.75,
            "looks off",
            user("ada"),
            1_000,
        )
    }

    #[test]
    fn thread_lifecycle() {
        let mut c = sample();
        c.add_reply(ReplyId::new("r1").unwrap(), "agreed", user("bob"), 1_100);
        c.add_reply(ReplyId::new("r2").unwrap(), "fixed", user("ada"), 1_200);
        assert_eq!(c.replies.len(), 2);
        assert_eq!(c.replies[1].text, "fixed");

        c.resolve();
        assert!(c.resolved);
        c.unresolve();
        assert!(!c.resolved);
    }

    #[test]
    fn soft_delete_round_trips_through_restore() {
        let mut c = sample();
        c.soft_delete(user("bob"), 2_000);
        assert!(c.deleted);
        assert_eq!(c.deleted_at, Some(2_000));
        assert_eq!(c.deleted_by, Some(user("bob")));
        c.restore();
        assert_eq!(c, sample());
    }
}
