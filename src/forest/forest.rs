//! Ordered sibling sequence for one level of nesting.
//!
//! A `CommentForest` holds the keys of the nodes at one level: either the
//! thread's top-level sequence or a single comment's replies. Order is the
//! service-provided order and is significant; nodes are resolved through the
//! owning thread's identity index and placeholder arena.

use crate::forest::types::NodeKey;
use serde::{Deserialize, Serialize};

/// An ordered sequence of sibling node keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForest {
    keys: Vec<NodeKey>,
}

impl CommentForest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes at this level.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this level holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the key at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&NodeKey> {
        self.keys.get(index)
    }

    /// Returns the keys in service order.
    pub fn keys(&self) -> &[NodeKey] {
        &self.keys
    }

    /// Iterates over the keys in service order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeKey> {
        self.keys.iter()
    }

    /// Appends a key, preserving arrival order.
    pub(crate) fn push(&mut self, key: NodeKey) {
        self.keys.push(key);
    }

    /// Removes the first occurrence of `key`.
    ///
    /// Returns false if the key is not present, which callers treat as a
    /// broken removal-target invariant.
    pub(crate) fn remove_key(&mut self, key: &NodeKey) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drops all keys.
    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<'a> IntoIterator for &'a CommentForest {
    type Item = &'a NodeKey;
    type IntoIter = std::slice::Iter<'a, NodeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::types::{CommentId, MoreId};

    fn comment_key(id: &str) -> NodeKey {
        NodeKey::Comment(CommentId::new(id))
    }

    #[test]
    fn test_push_preserves_order() {
        let mut forest = CommentForest::new();
        forest.push(comment_key("t1_a"));
        forest.push(NodeKey::More(MoreId(1)));
        forest.push(comment_key("t1_b"));

        assert_eq!(forest.len(), 3);
        assert_eq!(forest.get(0), Some(&comment_key("t1_a")));
        assert_eq!(forest.get(1), Some(&NodeKey::More(MoreId(1))));
        assert_eq!(forest.get(2), Some(&comment_key("t1_b")));
    }

    #[test]
    fn test_remove_key_from_middle() {
        let mut forest = CommentForest::new();
        forest.push(comment_key("t1_a"));
        forest.push(NodeKey::More(MoreId(1)));
        forest.push(comment_key("t1_b"));

        assert!(forest.remove_key(&NodeKey::More(MoreId(1))));
        assert_eq!(forest.keys(), &[comment_key("t1_a"), comment_key("t1_b")]);
    }

    #[test]
    fn test_remove_missing_key_returns_false() {
        let mut forest = CommentForest::new();
        forest.push(comment_key("t1_a"));

        assert!(!forest.remove_key(&NodeKey::More(MoreId(9))));
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_distinct_more_keys_are_not_confused() {
        // Two placeholders with identical counts still have distinct arena
        // keys, so removing one never touches the other.
        let mut forest = CommentForest::new();
        forest.push(NodeKey::More(MoreId(1)));
        forest.push(NodeKey::More(MoreId(2)));

        assert!(forest.remove_key(&NodeKey::More(MoreId(2))));
        assert_eq!(forest.keys(), &[NodeKey::More(MoreId(1))]);
    }
}
