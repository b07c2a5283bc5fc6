//! Fetch collaborator boundary for placeholder resolution.
//!
//! The expansion engine resolves placeholders through this trait. The actual
//! transport (HTTP client, authentication, request pagination, backoff) is
//! left to the application.

use crate::error::Result;
use crate::forest::more::MoreChildren;
use crate::forest::node::Node;

/// Resolves a placeholder into the nodes it stands for.
///
/// One call consumes one unit of the caller's fetch budget and delivers at
/// most [`MAX_CHILDREN_PER_FETCH`](crate::forest::constants::MAX_CHILDREN_PER_FETCH)
/// new nodes. Pages are flat, listing parents before children, and may
/// themselves contain further placeholders.
///
/// Errors (transport failures, rate limiting) are forwarded unmodified out of
/// [`Thread::replace_more`](crate::forest::Thread::replace_more); the engine
/// never retries and never rolls back progress merged from earlier fetches.
pub trait FetchChildren {
    /// Fetches the nodes the given placeholder represents.
    fn fetch_children(&mut self, more: &MoreChildren) -> Result<Vec<Node>>;
}
