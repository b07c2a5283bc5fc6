//! Comment node for the discussion tree.
//!
//! A `Comment` is a real content node: it carries an identity, an optional
//! parent identity, author and body text, and its own forest of reply keys.
//! Comments arrive either from the initial thread fetch or from resolving a
//! placeholder, and are stored in the owning thread's identity index.

use crate::error::{Result, ThicketError};
use crate::forest::constants::{MAX_AUTHOR_SIZE, MAX_COMMENT_BODY_SIZE};
use crate::forest::forest::CommentForest;
use crate::forest::types::CommentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A real comment node with identity, parent link, and its own reply forest.
#[derive(Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identity within the owning thread.
    id: CommentId,
    /// Identity of the parent comment, or `None` for a top-level comment.
    parent_id: Option<CommentId>,
    /// Author display name.
    author: String,
    /// Comment body text.
    body: String,
    /// Service-reported creation timestamp, milliseconds since Unix epoch.
    created_at: u64,
    /// Keys of this comment's direct replies, in service order.
    replies: CommentForest,
}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comment")
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("author", &self.author)
            .field("body_len", &self.body.len())
            .field("reply_count", &self.replies.len())
            .finish()
    }
}

impl Comment {
    /// Creates a new comment node with an empty reply forest.
    ///
    /// # Arguments
    /// * `id` - Identity assigned by the remote service
    /// * `parent_id` - Identity of the parent comment; `None` for top-level
    /// * `author` - Author display name
    /// * `body` - Comment body text (up to 100 KB)
    /// * `created_at` - Service-reported creation time, milliseconds since
    ///   Unix epoch. Comments are remote objects; their creation time comes
    ///   from the service payload, never from the local clock.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The identity is empty
    /// - The parent identity equals the comment's own identity
    /// - The body exceeds 100 KB or the author exceeds 256 bytes
    pub fn create(
        id: impl Into<CommentId>,
        parent_id: Option<CommentId>,
        author: impl Into<String>,
        body: impl Into<String>,
        created_at: u64,
    ) -> Result<Self> {
        let id = id.into();
        let author = author.into();
        let body = body.into();

        if id.is_empty() {
            return Err(ThicketError::validation("Comment identity cannot be empty"));
        }
        if parent_id.as_ref() == Some(&id) {
            return Err(ThicketError::validation(format!(
                "Comment {} cannot be its own parent",
                id
            )));
        }
        if body.len() > MAX_COMMENT_BODY_SIZE {
            return Err(ThicketError::validation(format!(
                "Comment body exceeds maximum size of {} bytes",
                MAX_COMMENT_BODY_SIZE
            )));
        }
        if author.len() > MAX_AUTHOR_SIZE {
            return Err(ThicketError::validation(format!(
                "Author name exceeds maximum size of {} bytes",
                MAX_AUTHOR_SIZE
            )));
        }

        Ok(Self {
            id,
            parent_id,
            author,
            body,
            created_at,
            replies: CommentForest::new(),
        })
    }

    /// Returns the comment's identity.
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    /// Returns the identity of the parent comment, if any.
    pub fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }

    /// Returns true if this comment sits directly under the thread itself.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns the author display name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the comment body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the service-reported creation timestamp in milliseconds since
    /// Unix epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns the keys of this comment's direct replies.
    pub fn replies(&self) -> &CommentForest {
        &self.replies
    }

    pub(crate) fn replies_mut(&mut self) -> &mut CommentForest {
        &mut self.replies
    }
}
