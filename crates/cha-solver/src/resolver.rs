//! Solid base resolution.
//!
//! This module computes, for every class, its unique solid base — the one
//! ancestor whose instance layout all instances of the class must carry — or
//! an `Invalid` marker when the declared bases contribute mutually
//! incompatible layouts.
//!
//! The computation is a pure bottom-up recursion over the hierarchy snapshot:
//! a class's result depends only on its direct bases' results, so memoization
//! makes the whole analysis linear in the number of inheritance edges.
//!
//! Note: Acyclicity is guaranteed by the upstream linearization pass BEFORE
//! classes reach this resolver. The per-query `RecursionGuard` converts an
//! unexpected cycle into an internal-error result instead of looping.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::solid_base::{CandidateList, InvalidReason, SolidBase};
use crate::solidness::SolidnessOracle;
use cha_hierarchy::{ClassHierarchy, ClassId};
use dashmap::DashMap;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, trace};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

type CandidateSet = IndexSet<ClassId, FxBuildHasher>;

/// Memoizing resolver for the unique solid base of each class.
///
/// ## Caching
///
/// Results are cached for the lifetime of the hierarchy snapshot. The cache
/// uses compute-then-publish-once semantics: a miss computes the result
/// without holding any cache lock (the recursion would self-deadlock on a
/// shard otherwise), then publishes through the entry API so the first
/// published value wins and every concurrent caller for a class observes the
/// same final result.
///
/// ## Invalidation
///
/// The resolver does not track dependents. When a declaration is amended the
/// host must evict the class and its transitive descendants before the next
/// query — `invalidate` drives that through the hierarchy collaborator, or
/// `amend_bases`'s returned affected set can be fed to `evict` directly.
pub struct SolidBaseResolver {
    /// Unique instance ID for debugging (tracks which resolver this is)
    instance_id: u64,

    hierarchy: Arc<ClassHierarchy>,
    oracle: SolidnessOracle,

    /// `ClassId` -> resolved solid base, compute-once per key.
    cache: DashMap<ClassId, SolidBase>,
}

impl SolidBaseResolver {
    /// Create a resolver over a hierarchy snapshot.
    pub fn new(hierarchy: Arc<ClassHierarchy>, oracle: SolidnessOracle) -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "SolidBaseResolver::new - creating new instance");
        Self {
            instance_id,
            hierarchy,
            oracle,
            cache: DashMap::new(),
        }
    }

    /// The hierarchy this resolver runs against.
    pub fn hierarchy(&self) -> &Arc<ClassHierarchy> {
        &self.hierarchy
    }

    /// The solid base of `id`, or the failure marker.
    ///
    /// Idempotent: repeated calls without an intervening hierarchy mutation
    /// return the identical result.
    pub fn solid_base_of(&self, id: ClassId) -> SolidBase {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SolidBaseResolution);
        self.resolve(id, &mut guard)
    }

    /// Evict a single cached result.
    pub fn evict(&self, id: ClassId) {
        self.cache.remove(&id);
    }

    /// Evict `id` and every transitive descendant's cached result.
    ///
    /// Returns the number of entries actually removed.
    pub fn invalidate(&self, id: ClassId) -> usize {
        let mut removed = usize::from(self.cache.remove(&id).is_some());
        for descendant in self.hierarchy.descendants_of(id) {
            removed += usize::from(self.cache.remove(&descendant).is_some());
        }
        debug!(
            instance_id = self.instance_id,
            id = %id,
            removed,
            "SolidBaseResolver::invalidate"
        );
        removed
    }

    /// Whether a result is currently cached for `id`.
    pub fn is_cached(&self, id: ClassId) -> bool {
        self.cache.contains_key(&id)
    }

    /// Number of cached results.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached result (for testing).
    pub fn clear(&self) {
        self.cache.clear();
    }

    fn resolve(&self, id: ClassId, guard: &mut RecursionGuard<ClassId>) -> SolidBase {
        if let Some(hit) = self.cache.get(&id) {
            trace!(instance_id = self.instance_id, id = %id, "solid_base_of: cache hit");
            return hit.clone();
        }

        let result = match guard.enter(id) {
            RecursionResult::Entered => {
                let computed = self.compute(id, guard);
                guard.leave(id);
                computed
            }
            denied => {
                error!(
                    instance_id = self.instance_id,
                    id = %id,
                    ?denied,
                    "solid_base_of: hierarchy cycle defense fired; upstream \
                     linearization let a malformed hierarchy through"
                );
                SolidBase::cycle()
            }
        };

        if result.is_invalid() {
            debug!(instance_id = self.instance_id, id = %id, ?result, "solid_base_of: invalid");
        }

        // First writer wins; concurrent computations for the same key are
        // discarded in favor of the published value.
        self.cache.entry(id).or_insert(result).clone()
    }

    fn compute(&self, id: ClassId, guard: &mut RecursionGuard<ClassId>) -> SolidBase {
        let Some(node) = self.hierarchy.node(id) else {
            error!(instance_id = self.instance_id, id = %id, "compute: unknown class id");
            debug_assert!(false, "solid_base_of called with an unregistered class");
            return SolidBase::cycle();
        };

        // An intrinsically solid class is its own solid base; its bases do
        // not need to resolve for descendants to build on this fact.
        if self.oracle.is_intrinsically_solid(&node) {
            return SolidBase::Resolved(id);
        }

        let mut candidates = CandidateSet::default();
        for base in node.bases {
            let Some(base_node) = self.hierarchy.node(base) else {
                error!(instance_id = self.instance_id, base = %base, "compute: unknown base id");
                debug_assert!(false, "hierarchy contains an unregistered base");
                return SolidBase::cycle();
            };

            let candidate = if self.oracle.is_intrinsically_solid(&base_node) {
                base
            } else {
                match self.resolve(base, guard) {
                    SolidBase::Resolved(candidate) => candidate,
                    SolidBase::Invalid(conflict) => {
                        // A class cannot have a valid solid base if any of
                        // its bases lacks one. Cycle defense stays marked as
                        // the internal-error class all the way down.
                        return if conflict.reason == InvalidReason::UnexpectedCycle {
                            SolidBase::cycle()
                        } else {
                            SolidBase::base_without_solid_base(base, conflict.candidates)
                        };
                    }
                }
            };
            candidates.insert(candidate);
        }

        match candidates.len() {
            // Only the universal root has no bases, and it is intrinsically
            // solid; a base-less class elsewhere is its own base case.
            0 => SolidBase::Resolved(id),
            1 => SolidBase::Resolved(candidates[0]),
            _ => self.pick_most_derived(candidates),
        }
    }

    /// Among multiple distinct candidates, the solid base is the unique
    /// candidate that is a subclass-or-self of every other candidate.
    fn pick_most_derived(&self, candidates: CandidateSet) -> SolidBase {
        let list: CandidateList = candidates.iter().copied().collect();

        let mut winner = None;
        for &candidate in &list {
            let dominates = list
                .iter()
                .all(|&other| other == candidate || self.hierarchy.is_subclass(candidate, other));
            if dominates {
                if winner.is_some() {
                    // Two distinct candidates each derived from the other
                    // cannot happen under a consistent subclass order; fail
                    // closed if it does.
                    return SolidBase::incomparable(list);
                }
                winner = Some(candidate);
            }
        }

        match winner {
            Some(candidate) => SolidBase::Resolved(candidate),
            None => SolidBase::incomparable(list),
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
