//! Identity and key types for the comment forest.
//!
//! This module contains the identity types shared across the forest:
//! - `CommentId`: service-assigned comment identity, unique within a thread
//! - `MoreId`: crate-assigned arena key for placeholder nodes
//! - `NodeKey`: key of one sibling slot in a forest

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a comment within one discussion thread.
///
/// Identities are opaque strings assigned by the remote service (for example
/// `"t1_d8r4im1"`). They are compared byte-for-byte and never parsed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(String);

impl CommentId {
    /// Creates a comment identity from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identity is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CommentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentId({})", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena key for a placeholder node within one thread.
///
/// Placeholders have no service-side identity of their own, so the owning
/// thread assigns each one a key from a monotonically increasing counter.
/// Keys are never reused, which also makes them a stable tie-break when two
/// placeholders carry the same pending child count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoreId(pub(crate) u64);

impl MoreId {
    /// Returns the numeric value of this key.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "more#{}", self.0)
    }
}

/// Key of one sibling slot in a forest.
///
/// A forest stores keys rather than nodes; the nodes themselves live in the
/// owning thread's identity index and placeholder arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    /// A real comment, resolved through the identity index.
    Comment(CommentId),
    /// An unexpanded placeholder, resolved through the placeholder arena.
    More(MoreId),
}

impl NodeKey {
    /// Returns the comment identity if this key names a comment.
    pub fn as_comment(&self) -> Option<&CommentId> {
        match self {
            NodeKey::Comment(id) => Some(id),
            NodeKey::More(_) => None,
        }
    }

    /// Returns the placeholder key if this key names a placeholder.
    pub fn as_more(&self) -> Option<MoreId> {
        match self {
            NodeKey::Comment(_) => None,
            NodeKey::More(id) => Some(*id),
        }
    }

    /// Returns true if this key names a placeholder.
    pub fn is_more(&self) -> bool {
        matches!(self, NodeKey::More(_))
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
