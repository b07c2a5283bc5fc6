//! # Thicket - Comment Forest Materializer
//!
//! A library for representing and progressively completing discussion
//! threads whose nested comments are delivered incompletely by a remote
//! service. Truncated subtrees arrive as placeholder markers; this crate
//! holds the mixed tree, flattens it on demand, and resolves placeholders
//! through bounded, priority-ordered fetches.
//!
//! ## Features
//!
//! - **Partial trees**: real comments and unexpanded placeholders share one
//!   ordered forest, preserving service order at every level
//! - **Global identity index**: one per-thread map enforces that each comment
//!   identity is materialized exactly once
//! - **Priority-driven expansion**: `replace_more` resolves the largest
//!   placeholders first, honoring a fetch budget and a size threshold
//! - **Transport-agnostic**: placeholder resolution goes through a single
//!   trait; the HTTP client, auth, and backoff belong to the application
//!
//! ## Example
//!
//! ```rust
//! use thicket::{Comment, CommentId, MoreChildren, Thread};
//!
//! # fn main() -> thicket::Result<()> {
//! let mut thread = Thread::new("t3_3hahrw", "What are you reading?");
//! thread.insert(Comment::create("t1_a", None, "alice", "Dune, again.", 1_704_067_200_000)?.into())?;
//! thread.insert(MoreChildren::new(12, vec![CommentId::new("t1_b")], None).into())?;
//!
//! // One of the two top-level nodes is still a placeholder.
//! assert_eq!(thread.flatten().filter(|node| node.is_more()).count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Resolving placeholders requires a [`FetchChildren`] collaborator wired to
//! the remote service; see [`Thread::replace_more`] for whole-thread
//! expansion and [`Thread::replace_more_under`] for expanding one comment's
//! reply subtree.

pub mod error;
pub mod forest;

pub use error::{Result, ThicketError};
pub use forest::{
    Comment, CommentForest, CommentId, FetchChildren, Flatten, MoreChildren, MoreId, Node, NodeKey,
    NodeRef, Thread,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
