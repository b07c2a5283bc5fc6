//! Comment forest materialization for partially-fetched discussions.
//!
//! The remote service delivers a discussion thread incompletely: deep or wide
//! subtrees arrive as opaque placeholder markers carrying a pending child
//! count and the identities they stand for. This module holds the resulting
//! tree, flattens it on demand, and progressively replaces placeholders with
//! real subtrees through bounded, priority-ordered fetches.
//!
//! ## Hierarchy
//!
//! ```text
//! Thread (identity index + placeholder arena)
//!     └── CommentForest (top level, service order)
//!             ├── Comment
//!             │       └── CommentForest (replies)
//!             │               ├── Comment
//!             │               └── MoreChildren (unexpanded subtree)
//!             └── MoreChildren
//! ```
//!
//! ## Consistency
//!
//! The thread owns one identity index shared by every sub-forest. A comment
//! identity is indexed exactly once; re-inserting it is a fatal
//! [`DuplicateComment`](crate::error::ThicketError::DuplicateComment) error,
//! and a reply arriving before its parent breaks an invariant. Expansion is
//! sequential and monotonic: each fetch is merged completely before the next
//! begins, and a failed fetch leaves all earlier progress intact.

mod comment;
pub mod constants;
pub mod fetch;
mod forest;
mod more;
mod node;
mod replace;
mod thread;
pub mod types;

pub use comment::Comment;
pub use fetch::FetchChildren;
pub use forest::CommentForest;
pub use more::MoreChildren;
pub use node::{Node, NodeRef};
pub use thread::{Flatten, Thread};
pub use types::{CommentId, MoreId, NodeKey};
