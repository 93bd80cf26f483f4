// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Namespaced string identifiers.
//!
//! Every record kind has its own identifier type. The wrapped string always carries the
//! kind's prefix (for example `shape:`), and that full string doubles as the key in the
//! replicated map, so a `ShapeId` can never be used to look up a comment.

use core::borrow::Borrow;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors produced when parsing an identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The string does not start with the expected namespace prefix.
    #[error("identifier `{id}` does not start with `{expected}`")]
    WrongPrefix {
        /// The prefix the identifier type requires.
        expected: &'static str,
        /// The rejected input.
        id: String,
    },
    /// The prefix is present but nothing follows it.
    #[error("identifier `{0}` has an empty body")]
    Empty(String),
}

macro_rules! namespaced_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Namespace prefix, including the trailing colon.
            pub const PREFIX: &'static str = $prefix;

            /// Parse a full key such as the ones stored in the replicated map.
            pub fn parse(key: impl Into<String>) -> Result<Self, IdError> {
                let key = key.into();
                match key.strip_prefix(Self::PREFIX) {
                    None => Err(IdError::WrongPrefix {
                        expected: Self::PREFIX,
                        id: key,
                    }),
                    Some("") => Err(IdError::Empty(key)),
                    Some(_) => Ok(Self(key)),
                }
            }

            /// Build an identifier from its body, prepending the namespace prefix.
            ///
            /// This is the hook for an external id factory; the body is typically a UUID.
            pub fn new(body: &str) -> Result<Self, IdError> {
                Self::parse(format!("{}{body}", Self::PREFIX))
            }

            /// The full key, prefix included.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The part after the prefix.
            pub fn body(&self) -> &str {
                &self.0[Self::PREFIX.len()..]
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

namespaced_id! {
    /// Identifier of a shape (`shape:<body>`).
    ShapeId => "shape:"
}

namespaced_id! {
    /// Identifier of a group (`group:<body>`).
    GroupId => "group:"
}

namespaced_id! {
    /// Identifier of a comment (`comment:<body>`).
    CommentId => "comment:"
}

namespaced_id! {
    /// Identifier of a binding (`binding:<body>`).
    BindingId => "binding:"
}

namespaced_id! {
    /// Identifier of a comment reply (`reply:<body>`).
    ReplyId => "reply:"
}

namespaced_id! {
    /// Identifier of a user (`user:<body>`).
    UserId => "user:"
}
