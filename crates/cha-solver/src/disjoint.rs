//! Disjointness queries over resolved solid bases.
//!
//! Two classes can share an instance only if their solid bases are comparable
//! under the subclass relation: an instance carries exactly one solid layout,
//! and that layout must satisfy both classes' ancestries. Incomparable solid
//! bases mean no common descendant can ever be declared, independent of any
//! structural similarity between the two classes.
//!
//! This is a necessary-but-not-sufficient overlap test: comparable solid
//! bases do not prove a common instance exists. Callers combine this verdict
//! with their other disjointness signals; only `Disjoint` is definitive.

use crate::resolver::SolidBaseResolver;
use cha_hierarchy::ClassId;
use std::sync::Arc;
use tracing::trace;

/// Outcome of a solid-base overlap query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapVerdict {
    /// The solid bases are comparable; a common instance may exist.
    Overlaps,
    /// The solid bases are incomparable; no common instance can exist.
    Disjoint,
    /// At least one class has no valid solid base; nothing can be concluded.
    /// Callers must treat this as "may overlap" — an already-broken class
    /// must not produce unreachability claims.
    Unknown,
}

impl OverlapVerdict {
    /// Conservative boolean view: everything except `Disjoint` may overlap.
    #[inline]
    pub fn may_overlap(self) -> bool {
        !matches!(self, Self::Disjoint)
    }
}

/// Answers "can `a` and `b` have a common instance?" for the reachability,
/// overload-overlap, and intersection-inhabitation passes.
pub struct DisjointnessOracle {
    resolver: Arc<SolidBaseResolver>,
}

impl DisjointnessOracle {
    pub fn new(resolver: Arc<SolidBaseResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver backing this oracle.
    pub fn resolver(&self) -> &Arc<SolidBaseResolver> {
        &self.resolver
    }

    /// Classify the solid-base overlap between `a` and `b`.
    ///
    /// Symmetric, and reflexively `Overlaps` for any validly declared class.
    pub fn check(&self, a: ClassId, b: ClassId) -> OverlapVerdict {
        let (Some(solid_a), Some(solid_b)) = (
            self.resolver.solid_base_of(a).resolved(),
            self.resolver.solid_base_of(b).resolved(),
        ) else {
            trace!(a = %a, b = %b, "overlap check: unresolved solid base, verdict unknown");
            return OverlapVerdict::Unknown;
        };

        let hierarchy = self.resolver.hierarchy();
        if solid_a == solid_b
            || hierarchy.is_subclass(solid_a, solid_b)
            || hierarchy.is_subclass(solid_b, solid_a)
        {
            OverlapVerdict::Overlaps
        } else {
            OverlapVerdict::Disjoint
        }
    }

    /// Boolean view of [`check`](Self::check): true iff a value could exist
    /// that is simultaneously an instance of `a` and `b`.
    pub fn overlaps(&self, a: ClassId, b: ClassId) -> bool {
        self.check(a, b).may_overlap()
    }
}

#[cfg(test)]
#[path = "tests/disjoint_tests.rs"]
mod tests;
