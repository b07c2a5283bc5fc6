//! Shared constants for comment forest limits and defaults.

// =============================================================================
// Expansion Defaults
// =============================================================================

/// Default maximum number of placeholder fetches per `replace_more` call.
/// Each fetch costs one network request, so the default is kept small.
pub const DEFAULT_REPLACE_LIMIT: usize = 32;

/// Default minimum pending child count for a placeholder to be worth a fetch.
pub const DEFAULT_REPLACE_THRESHOLD: u32 = 0;

// =============================================================================
// Fetch Protocol Limits
// =============================================================================

/// Maximum number of new nodes a single placeholder fetch may deliver.
pub const MAX_CHILDREN_PER_FETCH: usize = 100;

// =============================================================================
// Content Size Limits
// =============================================================================

/// Maximum comment body size (100KB).
pub const MAX_COMMENT_BODY_SIZE: usize = 100 * 1024;

/// Maximum author name size (256 bytes).
pub const MAX_AUTHOR_SIZE: usize = 256;
