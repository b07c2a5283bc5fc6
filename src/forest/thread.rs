//! Thread aggregate: identity index, placeholder arena, top-level forest.
//!
//! A `Thread` owns everything a discussion needs to stay consistent while it
//! is incrementally materialized:
//!
//! - The **identity index**: every comment in the thread, keyed by identity.
//!   Uniqueness is enforced here; a duplicate insertion is a fatal error.
//! - The **placeholder arena**: unexpanded markers keyed by crate-assigned
//!   `MoreId`, so they can be excised from arbitrary containers by key.
//! - The **top-level forest**: the ordered keys of the thread's direct
//!   children.
//!
//! Sub-forests (comment replies) store keys into the same index and arena,
//! which sidesteps ownership cycles between a comment, its replies, and the
//! containers placeholders must later be removed from.

use crate::error::{Result, ThicketError};
use crate::forest::comment::Comment;
use crate::forest::forest::CommentForest;
use crate::forest::more::MoreChildren;
use crate::forest::node::{Node, NodeRef};
use crate::forest::types::{CommentId, MoreId, NodeKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// A discussion thread holding a partially materialized comment tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Service-assigned thread identity.
    id: String,
    /// Thread title.
    title: String,
    /// Identity index: every comment in the thread, keyed by identity.
    comments: HashMap<CommentId, Comment>,
    /// Placeholder arena, keyed by crate-assigned `MoreId`.
    mores: HashMap<MoreId, MoreChildren>,
    /// Keys of the thread's direct children, in service order.
    forest: CommentForest,
    /// Next placeholder key (monotonic, never reused).
    next_more_id: u64,
}

impl Thread {
    /// Creates an empty thread.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            comments: HashMap::new(),
            mores: HashMap::new(),
            forest: CommentForest::new(),
            next_more_id: 1,
        }
    }

    /// Returns the thread identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the thread title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Looks up a comment by identity.
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Looks up a placeholder by arena key.
    pub fn more(&self, id: MoreId) -> Option<&MoreChildren> {
        self.mores.get(&id)
    }

    /// Returns the thread's top-level forest.
    pub fn top_level(&self) -> &CommentForest {
        &self.forest
    }

    /// Returns the number of top-level nodes.
    pub fn len(&self) -> usize {
        self.forest.len()
    }

    /// Returns true if the thread has no materialized nodes.
    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Returns the number of comments in the identity index.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Returns the number of unexpanded placeholders in the thread.
    pub fn more_count(&self) -> usize {
        self.mores.len()
    }

    /// Replaces the thread's content with a freshly fetched top-level page.
    ///
    /// Drops every currently materialized node, then inserts the new nodes in
    /// order through the standard insertion path, so the page must list
    /// parents before children.
    pub fn set_comments(&mut self, nodes: Vec<Node>) -> Result<()> {
        self.comments.clear();
        self.mores.clear();
        self.forest.clear();

        for node in nodes {
            self.insert(node)?;
        }
        debug!(
            thread = %self.id,
            comments = self.comments.len(),
            mores = self.mores.len(),
            "installed top-level comment page"
        );
        Ok(())
    }

    /// Inserts one node into the thread.
    ///
    /// Placement policy: top-level comments append to the thread's own
    /// forest; a reply appends to its parent's replies, and the parent must
    /// already be indexed. A placeholder nests under its named parent when
    /// that parent is indexed, otherwise it lands at the top level.
    ///
    /// # Errors
    /// - [`ThicketError::DuplicateComment`] if the comment's identity is
    ///   already indexed. This is fatal to the current operation and is never
    ///   deduplicated.
    /// - [`ThicketError::BrokenInvariant`] if a reply's parent is absent from
    ///   the index, which means the caller delivered children before parents.
    pub fn insert(&mut self, node: Node) -> Result<()> {
        match node {
            Node::More(more) => {
                self.place_more(more);
                Ok(())
            }
            Node::Comment(comment) => self.insert_comment(comment),
        }
    }

    pub(crate) fn insert_comment(&mut self, comment: Comment) -> Result<()> {
        if self.comments.contains_key(comment.id()) {
            return Err(ThicketError::DuplicateComment(comment.id().clone()));
        }

        let id = comment.id().clone();
        match comment.parent_id().cloned() {
            None => {
                self.comments.insert(id.clone(), comment);
                self.forest.push(NodeKey::Comment(id));
            }
            Some(parent_id) => {
                if !self.comments.contains_key(&parent_id) {
                    return Err(ThicketError::broken_invariant(format!(
                        "Parent {} of comment {} is not indexed; children must arrive after their parents",
                        parent_id, id
                    )));
                }
                self.comments.insert(id.clone(), comment);
                // Checked above, the parent is present.
                if let Some(parent) = self.comments.get_mut(&parent_id) {
                    parent.replies_mut().push(NodeKey::Comment(id));
                }
            }
        }
        Ok(())
    }

    /// Moves a placeholder into the arena and returns its key.
    pub(crate) fn intern_more(&mut self, more: MoreChildren) -> MoreId {
        let id = MoreId(self.next_more_id);
        self.next_more_id += 1;
        self.mores.insert(id, more);
        id
    }

    /// Interns a placeholder and attaches it to the tree.
    ///
    /// The marker nests inside the replies of its named parent when that
    /// parent is indexed; an orphan marker lands in the top-level forest.
    /// Returns the new arena key and the parent it was placed under, which
    /// is also where it must later be removed from.
    pub(crate) fn place_more(&mut self, more: MoreChildren) -> (MoreId, Option<CommentId>) {
        let placed_under = more
            .parent_id()
            .filter(|parent_id| self.comments.contains_key(*parent_id))
            .cloned();
        let id = self.intern_more(more);
        match &placed_under {
            Some(parent_id) => {
                if let Some(parent) = self.comments.get_mut(parent_id) {
                    parent.replies_mut().push(NodeKey::More(id));
                }
            }
            None => self.forest.push(NodeKey::More(id)),
        }
        (id, placed_under)
    }

    /// Interns a placeholder and appends it to one explicit container: the
    /// replies of `container`, or the top-level forest when `container` is
    /// `None`. Unlike [`Thread::place_more`] the marker's own `parent_id` is
    /// ignored; the expansion engine uses this to append markers from a
    /// fetched page to the forest being expanded.
    pub(crate) fn attach_more(
        &mut self,
        more: MoreChildren,
        container: Option<&CommentId>,
    ) -> Result<MoreId> {
        if let Some(parent_id) = container {
            if !self.comments.contains_key(parent_id) {
                return Err(ThicketError::broken_invariant(format!(
                    "Container comment {} for a placeholder is not indexed",
                    parent_id
                )));
            }
        }
        let id = self.intern_more(more);
        match container {
            None => self.forest.push(NodeKey::More(id)),
            Some(parent_id) => {
                // Checked above, the container is present.
                if let Some(parent) = self.comments.get_mut(parent_id) {
                    parent.replies_mut().push(NodeKey::More(id));
                }
            }
        }
        Ok(id)
    }

    /// Removes `key` from the replies of `parent_id`, or from the top-level
    /// forest when `parent_id` is `None`. Returns false if the container does
    /// not hold the key.
    pub(crate) fn remove_from_container(
        &mut self,
        parent_id: Option<&CommentId>,
        key: &NodeKey,
    ) -> bool {
        match parent_id {
            None => self.forest.remove_key(key),
            Some(parent_id) => match self.comments.get_mut(parent_id) {
                Some(parent) => parent.replies_mut().remove_key(key),
                None => false,
            },
        }
    }

    /// Takes a placeholder out of the arena.
    pub(crate) fn take_more(&mut self, id: MoreId) -> Option<MoreChildren> {
        self.mores.remove(&id)
    }

    /// Returns a lazy breadth-first traversal over every materialized node.
    ///
    /// Descends into comment replies but never into placeholders; unresolved
    /// subtrees show up as [`NodeRef::More`] entries. Each call re-derives
    /// the traversal from current state and mutates nothing.
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            thread: self,
            queue: self.forest.iter().cloned().collect(),
        }
    }

    /// Returns a lazy breadth-first traversal over one comment's reply
    /// subtree, in the same order [`Thread::flatten`] would visit it. The
    /// comment itself is not yielded.
    ///
    /// Returns `None` when no comment with that identity is indexed.
    pub fn flatten_under(&self, id: &CommentId) -> Option<Flatten<'_>> {
        self.comments.get(id).map(|comment| Flatten {
            thread: self,
            queue: comment.replies().iter().cloned().collect(),
        })
    }
}

/// Lazy breadth-first iterator over a thread's materialized nodes.
///
/// Created by [`Thread::flatten`] or [`Thread::flatten_under`]. Yields each
/// level in stored order before descending.
#[derive(Debug)]
pub struct Flatten<'a> {
    thread: &'a Thread,
    queue: VecDeque<NodeKey>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.queue.pop_front() {
            match key {
                NodeKey::Comment(id) => {
                    if let Some(comment) = self.thread.comments.get(&id) {
                        self.queue.extend(comment.replies().iter().cloned());
                        return Some(NodeRef::Comment(comment));
                    }
                }
                NodeKey::More(id) => {
                    if let Some(more) = self.thread.mores.get(&id) {
                        return Some(NodeRef::More(more));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_thread() -> Thread {
        Thread::new("t3_thread", "Test Thread")
    }

    fn create_test_comment(id: &str, parent: Option<&str>) -> Comment {
        Comment::create(
            id,
            parent.map(CommentId::new),
            "author",
            "body",
            crate::forest::types::current_timestamp_millis(),
        )
        .expect("Failed to create comment")
    }

    #[test]
    fn test_insert_top_level_comment() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .expect("Failed to insert");

        assert_eq!(thread.len(), 1);
        assert_eq!(thread.comment_count(), 1);
        assert!(thread.comment(&CommentId::new("t1_a")).is_some());
    }

    #[test]
    fn test_insert_reply_under_parent() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .expect("Failed to insert parent");
        thread
            .insert(create_test_comment("t1_b", Some("t1_a")).into())
            .expect("Failed to insert reply");

        // The reply lands in the parent's forest, not the top level.
        assert_eq!(thread.len(), 1);
        let parent = thread.comment(&CommentId::new("t1_a")).unwrap();
        assert_eq!(
            parent.replies().keys(),
            &[NodeKey::Comment(CommentId::new("t1_b"))]
        );
    }

    #[test]
    fn test_insert_duplicate_is_fatal() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .expect("Failed to insert");

        let result = thread.insert(create_test_comment("t1_a", None).into());
        assert!(matches!(
            result,
            Err(ThicketError::DuplicateComment(id)) if id == CommentId::new("t1_a")
        ));
    }

    #[test]
    fn test_insert_orphan_reply_breaks_invariant() {
        let mut thread = create_test_thread();
        let result = thread.insert(create_test_comment("t1_b", Some("t1_missing")).into());

        assert!(matches!(result, Err(ThicketError::BrokenInvariant(_))));
        // Nothing was indexed for the rejected node.
        assert_eq!(thread.comment_count(), 0);
    }

    #[test]
    fn test_insert_placeholder_goes_top_level() {
        let mut thread = create_test_thread();
        thread
            .insert(MoreChildren::new(4, vec![], None).into())
            .expect("Failed to insert placeholder");

        assert_eq!(thread.len(), 1);
        assert_eq!(thread.more_count(), 1);
        assert!(thread.top_level().get(0).unwrap().is_more());
    }

    #[test]
    fn test_insert_placeholder_nests_under_indexed_parent() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();
        thread
            .insert(MoreChildren::new(3, vec![], Some(CommentId::new("t1_a"))).into())
            .unwrap();

        assert_eq!(thread.len(), 1);
        let parent = thread.comment(&CommentId::new("t1_a")).unwrap();
        assert_eq!(parent.replies().len(), 1);
        assert!(parent.replies().get(0).unwrap().is_more());
    }

    #[test]
    fn test_insert_orphan_placeholder_falls_back_to_top_level() {
        let mut thread = create_test_thread();
        thread
            .insert(MoreChildren::new(3, vec![], Some(CommentId::new("t1_gone"))).into())
            .unwrap();

        assert_eq!(thread.len(), 1);
        assert!(thread.top_level().get(0).unwrap().is_more());
    }

    #[test]
    fn test_flatten_yields_every_inserted_node() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_b", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_c", Some("t1_a")).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_d", Some("t1_c")).into())
            .unwrap();
        thread
            .insert(MoreChildren::new(7, vec![], None).into())
            .unwrap();

        assert_eq!(thread.flatten().count(), 5);
    }

    #[test]
    fn test_flatten_is_breadth_first_and_order_preserving() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_b", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_a1", Some("t1_a")).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_b1", Some("t1_b")).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_a1x", Some("t1_a1")).into())
            .unwrap();

        let order: Vec<String> = thread
            .flatten()
            .map(|node| match node {
                NodeRef::Comment(c) => c.id().to_string(),
                NodeRef::More(m) => format!("more({})", m.count()),
            })
            .collect();

        assert_eq!(order, ["t1_a", "t1_b", "t1_a1", "t1_b1", "t1_a1x"]);
    }

    #[test]
    fn test_flatten_does_not_descend_into_placeholders() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();
        thread
            .insert(
                MoreChildren::new(50, vec![CommentId::new("t1_hidden")], None).into(),
            )
            .unwrap();

        let nodes: Vec<_> = thread.flatten().collect();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[1].is_more());
    }

    #[test]
    fn test_flatten_under_scopes_to_one_subtree() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_b", None).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_a1", Some("t1_a")).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_a1x", Some("t1_a1")).into())
            .unwrap();
        thread
            .insert(create_test_comment("t1_b1", Some("t1_b")).into())
            .unwrap();

        let order: Vec<String> = thread
            .flatten_under(&CommentId::new("t1_a"))
            .expect("t1_a is indexed")
            .filter_map(|node| node.as_comment().map(|c| c.id().to_string()))
            .collect();

        // Only t1_a's descendants; neither the root itself nor t1_b's branch.
        assert_eq!(order, ["t1_a1", "t1_a1x"]);
    }

    #[test]
    fn test_flatten_under_unknown_comment_is_none() {
        let thread = create_test_thread();
        assert!(thread.flatten_under(&CommentId::new("t1_missing")).is_none());
    }

    #[test]
    fn test_attach_more_ignores_the_markers_named_parent() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();

        let more = MoreChildren::new(5, vec![], Some(CommentId::new("t1_a")));
        thread
            .attach_more(more, None)
            .expect("Failed to attach placeholder");

        // Explicit container wins: the marker sits at the top level even
        // though its payload names t1_a as parent.
        assert_eq!(thread.len(), 2);
        assert!(thread.top_level().keys().iter().any(|key| key.is_more()));
        let parent = thread.comment(&CommentId::new("t1_a")).unwrap();
        assert!(parent.replies().is_empty());
    }

    #[test]
    fn test_attach_more_to_missing_container_breaks_invariant() {
        let mut thread = create_test_thread();
        let more = MoreChildren::new(2, vec![], None);

        let result = thread.attach_more(more, Some(&CommentId::new("t1_gone")));
        assert!(matches!(result, Err(ThicketError::BrokenInvariant(_))));
        // Nothing leaked into the arena for the rejected marker.
        assert_eq!(thread.more_count(), 0);
    }

    #[test]
    fn test_flatten_is_restartable() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_a", None).into())
            .unwrap();

        assert_eq!(thread.flatten().count(), 1);
        assert_eq!(thread.flatten().count(), 1);
    }

    #[test]
    fn test_set_comments_replaces_existing_content() {
        let mut thread = create_test_thread();
        thread
            .insert(create_test_comment("t1_old", None).into())
            .unwrap();

        thread
            .set_comments(vec![
                create_test_comment("t1_new", None).into(),
                MoreChildren::new(2, vec![], None).into(),
            ])
            .expect("Failed to set comments");

        assert_eq!(thread.len(), 2);
        assert!(thread.comment(&CommentId::new("t1_old")).is_none());
        assert!(thread.comment(&CommentId::new("t1_new")).is_some());
    }

    #[test]
    fn test_more_ids_are_never_reused() {
        let mut thread = create_test_thread();
        let first = thread.intern_more(MoreChildren::new(1, vec![], None));
        thread.take_more(first);
        let second = thread.intern_more(MoreChildren::new(1, vec![], None));

        assert_ne!(first, second);
        assert!(first < second);
    }
}
