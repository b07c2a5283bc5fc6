//! Error types for thicket operations.

use crate::forest::types::CommentId;
use thiserror::Error;

/// Result type alias for thicket operations.
pub type Result<T> = std::result::Result<T, ThicketError>;

/// Main error type for thicket operations.
#[derive(Error, Debug)]
pub enum ThicketError {
    /// A comment identity was inserted into a thread's index a second time.
    ///
    /// This signals caller misuse (running the replacement algorithm twice
    /// against an already-resolved forest) or a transport layer delivering
    /// the same node twice. It is never silently deduplicated.
    #[error("Duplicate comment insertion: {0}")]
    DuplicateComment(CommentId),

    /// An internal tree consistency check failed.
    ///
    /// Covers a non-root comment whose parent is absent from the identity
    /// index at insertion time, and a placeholder whose removal target no
    /// longer holds it. These abort the in-flight operation immediately.
    #[error("Broken invariant: {0}")]
    BrokenInvariant(String),

    /// Transport-level fetch errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rate limiting reported by the remote service
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invalid input or arguments
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ThicketError {
    /// Creates a new broken invariant error.
    pub fn broken_invariant<T: ToString>(msg: T) -> Self {
        Self::BrokenInvariant(msg.to_string())
    }

    /// Creates a new transport error.
    pub fn transport<T: ToString>(msg: T) -> Self {
        Self::Transport(msg.to_string())
    }

    /// Creates a new rate limited error.
    pub fn rate_limited<T: ToString>(msg: T) -> Self {
        Self::RateLimited(msg.to_string())
    }

    /// Creates a new validation error.
    pub fn validation<T: ToString>(msg: T) -> Self {
        Self::Validation(msg.to_string())
    }
}
