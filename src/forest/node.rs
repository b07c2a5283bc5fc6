//! Node wrapper for the comment forest.
//!
//! The `Node` enum wraps the two node kinds that share a forest, providing a
//! unified interface for:
//! - Fetched pages (the fetch collaborator returns `Vec<Node>`)
//! - Insertion into a thread
//!
//! `NodeRef` is the borrowed counterpart yielded by tree traversal.

use crate::forest::comment::Comment;
use crate::forest::more::MoreChildren;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in the comment forest: a real comment or an unexpanded placeholder.
#[derive(Clone, Serialize, Deserialize)]
pub enum Node {
    /// A real comment with content and its own reply forest.
    Comment(Comment),
    /// An unexpanded subtree marker.
    More(MoreChildren),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comment(comment) => f
                .debug_struct("Node::Comment")
                .field("id", comment.id())
                .field("body_len", &comment.body().len())
                .finish(),
            Node::More(more) => f
                .debug_struct("Node::More")
                .field("count", &more.count())
                .finish(),
        }
    }
}

impl Node {
    /// Returns a reference to the inner comment if this is one.
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Comment(comment) => Some(comment),
            Node::More(_) => None,
        }
    }

    /// Returns a reference to the inner placeholder if this is one.
    pub fn as_more(&self) -> Option<&MoreChildren> {
        match self {
            Node::Comment(_) => None,
            Node::More(more) => Some(more),
        }
    }

    /// Returns true if this node is an unexpanded placeholder.
    pub fn is_more(&self) -> bool {
        matches!(self, Node::More(_))
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl From<MoreChildren> for Node {
    fn from(more: MoreChildren) -> Self {
        Node::More(more)
    }
}

/// A borrowed view of one node, yielded by traversal.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// A real comment.
    Comment(&'a Comment),
    /// An unexpanded subtree marker.
    More(&'a MoreChildren),
}

impl<'a> NodeRef<'a> {
    /// Returns the comment if this view is one.
    pub fn as_comment(self) -> Option<&'a Comment> {
        match self {
            NodeRef::Comment(comment) => Some(comment),
            NodeRef::More(_) => None,
        }
    }

    /// Returns the placeholder if this view is one.
    pub fn as_more(self) -> Option<&'a MoreChildren> {
        match self {
            NodeRef::Comment(_) => None,
            NodeRef::More(more) => Some(more),
        }
    }

    /// Returns true if this view is an unexpanded placeholder.
    pub fn is_more(self) -> bool {
        matches!(self, NodeRef::More(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::types::CommentId;

    fn create_test_comment() -> Comment {
        Comment::create(
            "t1_a",
            None,
            "alice",
            "hello",
            crate::forest::types::current_timestamp_millis(),
        )
        .expect("Failed to create comment")
    }

    #[test]
    fn test_node_comment_accessors() {
        let node: Node = create_test_comment().into();

        assert!(node.as_comment().is_some());
        assert!(node.as_more().is_none());
        assert!(!node.is_more());
    }

    #[test]
    fn test_node_more_accessors() {
        let node: Node = MoreChildren::new(3, vec![CommentId::new("t1_x")], None).into();

        assert!(node.as_comment().is_none());
        assert_eq!(node.as_more().map(|m| m.count()), Some(3));
        assert!(node.is_more());
    }

    #[test]
    fn test_node_debug_format() {
        let node: Node = create_test_comment().into();
        let debug_str = format!("{:?}", node);
        assert!(debug_str.contains("Node::Comment"));
        assert!(debug_str.contains("t1_a"));
    }

    #[test]
    fn test_node_serialization_roundtrip() {
        let node: Node = MoreChildren::new(5, vec![CommentId::new("t1_x")], None).into();

        let json = serde_json::to_string(&node).expect("Failed to serialize");
        let restored: Node = serde_json::from_str(&json).expect("Failed to deserialize");

        let more = restored.as_more().expect("Expected a placeholder");
        assert_eq!(more.count(), 5);
        assert_eq!(more.children(), &[CommentId::new("t1_x")]);
    }
}
