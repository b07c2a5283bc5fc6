//! Placeholder node for unexpanded comment subtrees.
//!
//! The remote service truncates deep or wide discussions: instead of the real
//! comments it returns a `MoreChildren` marker carrying the number of pending
//! children and their identities. The expansion engine later trades one fetch
//! per marker for the real nodes, or discards the marker when it is not worth
//! the request.

use crate::forest::types::CommentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque marker for an unexpanded subtree.
///
/// The pending child count doubles as the expansion priority: markers with
/// more children behind them are resolved first. "Continue this thread" style
/// markers report a count of zero.
#[derive(Clone, Serialize, Deserialize)]
pub struct MoreChildren {
    /// Number of children this marker stands for.
    count: u32,
    /// Identities of the children, used by the fetch collaborator to know
    /// what to request.
    children: Vec<CommentId>,
    /// Identity of the comment this marker appeared under, or `None` when it
    /// appeared at the top level of the thread.
    parent_id: Option<CommentId>,
}

impl fmt::Debug for MoreChildren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoreChildren")
            .field("count", &self.count)
            .field("children", &self.children.len())
            .field("parent_id", &self.parent_id)
            .finish()
    }
}

impl MoreChildren {
    /// Creates a new placeholder marker.
    ///
    /// # Arguments
    /// * `count` - Pending child count reported by the service
    /// * `children` - Identities of the pending children
    /// * `parent_id` - Comment this marker appeared under; `None` for top-level
    pub fn new(count: u32, children: Vec<CommentId>, parent_id: Option<CommentId>) -> Self {
        Self {
            count,
            children,
            parent_id,
        }
    }

    /// Returns the pending child count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the identities of the pending children.
    pub fn children(&self) -> &[CommentId] {
        &self.children
    }

    /// Returns the identity of the comment this marker appeared under.
    pub fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }
}
