//! Placeholder expansion engine.
//!
//! `replace_more` progressively materializes a thread: it gathers every
//! placeholder into a priority queue, then repeatedly pops the most valuable
//! one, trades one fetch for its real children, merges them into the tree,
//! and requeues any placeholders the fetched page contained. The loop honors
//! a fetch budget and a pending-count threshold; markers not worth a fetch
//! are excised from the tree without spending budget.
//!
//! The engine is sequential: each fetch's results are fully merged before the
//! next fetch is issued, so every insertion sees an up-to-date identity
//! index. Fetch failures propagate unmodified; progress merged from earlier
//! fetches is kept.

use crate::error::{Result, ThicketError};
use crate::forest::constants::{DEFAULT_REPLACE_LIMIT, DEFAULT_REPLACE_THRESHOLD};
use crate::forest::fetch::FetchChildren;
use crate::forest::more::MoreChildren;
use crate::forest::node::Node;
use crate::forest::thread::Thread;
use crate::forest::types::{CommentId, MoreId, NodeKey};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use tracing::{debug, trace};

/// Where a gathered placeholder must be excised from once processed.
#[derive(Debug, Clone)]
pub(crate) enum RemoveFrom {
    /// The thread's own top-level forest.
    TopLevel,
    /// The replies forest of the named comment.
    Replies(CommentId),
}

/// One gathered placeholder awaiting processing.
#[derive(Debug, Clone)]
pub(crate) struct QueueEntry {
    pub(crate) count: u32,
    pub(crate) id: MoreId,
    pub(crate) remove_from: RemoveFrom,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Largest pending count first; equal counts resolve by allocation
        // order (smaller MoreId pops first). MoreIds are unique, so the
        // ordering is total and stable.
        self.count
            .cmp(&other.count)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Priority queue of gathered placeholders.
///
/// Ordered by pending child count descending; ties break by placeholder
/// allocation order, which makes the pop sequence deterministic.
#[derive(Debug, Default)]
pub(crate) struct MoreQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl MoreQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn push(&mut self, entry: QueueEntry) {
        self.heap.push(entry);
    }

    pub(crate) fn pop(&mut self) -> Option<QueueEntry> {
        self.heap.pop()
    }
}

impl Thread {
    /// Collects every placeholder reachable from the thread's top-level
    /// forest into `queue`.
    ///
    /// Each discovered placeholder records its removal target: the replies
    /// forest of its immediate parent comment, or the thread's top-level
    /// forest when it has none.
    pub(crate) fn gather_more(&self, queue: &mut MoreQueue) {
        self.gather_more_from(None, queue);
    }

    /// Collects every placeholder reachable from one forest: the thread's
    /// top-level forest when `root` is `None`, otherwise the replies of the
    /// named comment. An unindexed root gathers nothing.
    fn gather_more_from(&self, root: Option<&CommentId>, queue: &mut MoreQueue) {
        let mut work: VecDeque<(Option<CommentId>, NodeKey)> = match root {
            None => self
                .top_level()
                .iter()
                .map(|key| (None, key.clone()))
                .collect(),
            Some(root_id) => match self.comment(root_id) {
                Some(comment) => comment
                    .replies()
                    .iter()
                    .map(|key| (Some(root_id.clone()), key.clone()))
                    .collect(),
                None => VecDeque::new(),
            },
        };

        while let Some((parent, key)) = work.pop_front() {
            match key {
                NodeKey::More(id) => {
                    if let Some(more) = self.more(id) {
                        let remove_from = match parent {
                            Some(parent_id) => RemoveFrom::Replies(parent_id),
                            None => RemoveFrom::TopLevel,
                        };
                        queue.push(QueueEntry {
                            count: more.count(),
                            id,
                            remove_from,
                        });
                    }
                }
                NodeKey::Comment(id) => {
                    if let Some(comment) = self.comment(&id) {
                        for reply_key in comment.replies() {
                            work.push_back((Some(id.clone()), reply_key.clone()));
                        }
                    }
                }
            }
        }
    }

    /// Excises a processed placeholder from its recorded container and takes
    /// it out of the arena.
    fn remove_more(&mut self, entry: &QueueEntry) -> Result<MoreChildren> {
        let parent = match &entry.remove_from {
            RemoveFrom::TopLevel => None,
            RemoveFrom::Replies(parent_id) => Some(parent_id),
        };
        let key = NodeKey::More(entry.id);
        if !self.remove_from_container(parent, &key) {
            return Err(ThicketError::broken_invariant(format!(
                "Placeholder {} is missing from its removal target",
                entry.id
            )));
        }
        self.take_more(entry.id).ok_or_else(|| {
            ThicketError::broken_invariant(format!(
                "Placeholder {} vanished from the arena",
                entry.id
            ))
        })
    }

    /// Resolves placeholders with the default budget and threshold.
    ///
    /// Equivalent to `replace_more(fetcher, Some(DEFAULT_REPLACE_LIMIT), 0)`.
    pub fn replace_more_default<F: FetchChildren>(
        &mut self,
        fetcher: &mut F,
    ) -> Result<Vec<MoreChildren>> {
        self.replace_more(fetcher, Some(DEFAULT_REPLACE_LIMIT), DEFAULT_REPLACE_THRESHOLD)
    }

    /// Progressively replaces placeholders with the real subtrees they stand
    /// for, most valuable first.
    ///
    /// # Arguments
    /// * `fetcher` - Collaborator that resolves one placeholder per call
    /// * `limit` - Maximum number of fetches; `None` means no cap, `Some(0)`
    ///   removes every placeholder without fetching
    /// * `threshold` - Minimum pending child count a placeholder must have to
    ///   be worth a fetch
    ///
    /// Placeholders skipped for budget or threshold reasons are removed from
    /// the tree entirely rather than left as stale markers. The loop drains
    /// the queue, so the return value is the skipped markers in skip order.
    ///
    /// # Errors
    /// - Fetch errors propagate unmodified; already-merged progress is kept.
    /// - [`ThicketError::DuplicateComment`] if a fetch delivers an identity
    ///   that is already indexed. This guards against calling the method
    ///   again on content the service has already handed out once; call it
    ///   at most once per forest state.
    pub fn replace_more<F: FetchChildren>(
        &mut self,
        fetcher: &mut F,
        limit: Option<usize>,
        threshold: u32,
    ) -> Result<Vec<MoreChildren>> {
        self.replace_more_scoped(None, fetcher, limit, threshold)
    }

    /// Like [`Thread::replace_more`], but scoped to one comment's reply
    /// subtree: only placeholders under `root` are gathered, and markers a
    /// fetched page delivers are appended to `root`'s replies. Placeholders
    /// elsewhere in the thread are untouched.
    ///
    /// # Errors
    /// [`ThicketError::Validation`] when `root` is not indexed, plus the
    /// errors of [`Thread::replace_more`].
    pub fn replace_more_under<F: FetchChildren>(
        &mut self,
        root: &CommentId,
        fetcher: &mut F,
        limit: Option<usize>,
        threshold: u32,
    ) -> Result<Vec<MoreChildren>> {
        if self.comment(root).is_none() {
            return Err(ThicketError::validation(format!(
                "Comment {} is not part of this thread",
                root
            )));
        }
        self.replace_more_scoped(Some(root), fetcher, limit, threshold)
    }

    fn replace_more_scoped<F: FetchChildren>(
        &mut self,
        root: Option<&CommentId>,
        fetcher: &mut F,
        limit: Option<usize>,
        threshold: u32,
    ) -> Result<Vec<MoreChildren>> {
        let mut queue = MoreQueue::new();
        self.gather_more_from(root, &mut queue);
        debug!(
            thread = %self.id(),
            scope = root.map(CommentId::as_str).unwrap_or("top-level"),
            gathered = queue.len(),
            ?limit,
            threshold,
            "expanding placeholders"
        );

        // Markers delivered by a fetch join the forest being expanded, which
        // is also where they must later be removed from.
        let merge_target = match root {
            None => RemoveFrom::TopLevel,
            Some(root_id) => RemoveFrom::Replies(root_id.clone()),
        };

        let mut remaining = limit;
        let mut skipped = Vec::new();

        while let Some(entry) = queue.pop() {
            let exhausted = matches!(remaining, Some(0));
            if exhausted || entry.count < threshold {
                trace!(more = %entry.id, count = entry.count, "discarding placeholder without fetch");
                skipped.push(self.remove_more(&entry)?);
                continue;
            }

            let more = self.more(entry.id).ok_or_else(|| {
                ThicketError::broken_invariant(format!(
                    "Placeholder {} vanished from the arena",
                    entry.id
                ))
            })?;
            let page = fetcher.fetch_children(more)?;
            if let Some(budget) = remaining.as_mut() {
                *budget -= 1;
            }
            trace!(more = %entry.id, nodes = page.len(), "fetched placeholder children");

            // Merge the page in order. Comments route through the standard
            // insertion path; markers append to the expansion scope's own
            // sequence regardless of the parent they name, and join the live
            // queue immediately.
            for node in page {
                match node {
                    Node::Comment(comment) => self.insert_comment(comment)?,
                    Node::More(new_more) => {
                        let count = new_more.count();
                        let id = self.attach_more(new_more, root)?;
                        queue.push(QueueEntry {
                            count,
                            id,
                            remove_from: merge_target.clone(),
                        });
                    }
                }
            }

            self.remove_more(&entry)?;
        }

        debug!(
            thread = %self.id(),
            skipped = skipped.len(),
            comments = self.comment_count(),
            "placeholder expansion finished"
        );
        Ok(skipped)
    }
}
