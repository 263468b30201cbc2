//! Centralized limits and thresholds for the class-hierarchy analyzer.
//!
//! This module provides shared constants for recursion depths and operation
//! counts used throughout the analyzer. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit

/// Maximum inheritance depth followed during solid base resolution.
///
/// Resolution recurses from a class toward the universal root, so its depth is
/// bounded by the longest base-class chain in the hierarchy. Real hierarchies
/// stay in the tens; a chain past this limit means the upstream linearization
/// pass let a malformed hierarchy through, and the resolver bails out with an
/// internal-error result instead of overflowing the stack.
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

/// Maximum number of classes visited by a single resolution query.
///
/// A single `solid_base_of` query touches each ancestor at most once thanks to
/// memoization, so hitting this bound also signals a malformed hierarchy.
pub const MAX_RESOLUTION_ITERATIONS: u32 = 100_000;

/// Pre-allocation size for per-class direct-base lists.
///
/// Multiple inheritance beyond four direct bases is rare; `SmallVec` keeps the
/// common case inline.
pub const INLINE_BASE_COUNT: usize = 4;
