//! The solid base result model.
//!
//! Every class resolves to either a unique solid base or an `Invalid` marker
//! describing why no unique one exists. Invalid results keep the candidate
//! list that was discovered during resolution so the validation pass can name
//! the mutually incompatible bases without recomputing them.

use cha_hierarchy::ClassId;
use smallvec::SmallVec;

/// Deduplicated solid base candidates, in first-occurrence order.
pub type CandidateList = SmallVec<[ClassId; 4]>;

/// Why a class has no unique solid base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// The candidates contributed by the direct bases are mutually
    /// incomparable under the subclass relation.
    IncomparableCandidates,
    /// A direct base is itself `Invalid`; invalidity propagates.
    BaseWithoutSolidBase { base: ClassId },
    /// Resolution re-entered a class still being resolved. The hierarchy is
    /// acyclic by upstream contract, so this is an internal error, not a
    /// user-level declaration problem.
    UnexpectedCycle,
}

/// Details of a failed resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolidBaseConflict {
    pub reason: InvalidReason,
    /// The candidate solid bases in play when resolution failed. Empty for
    /// cycle defense results.
    pub candidates: CandidateList,
}

/// The resolved solid base of a class, or the failure marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolidBase {
    /// The unique solid base of the class.
    Resolved(ClassId),
    /// No unique solid base exists; the class cannot be validly instantiated.
    Invalid(SolidBaseConflict),
}

impl SolidBase {
    pub(crate) fn incomparable(candidates: CandidateList) -> Self {
        Self::Invalid(SolidBaseConflict {
            reason: InvalidReason::IncomparableCandidates,
            candidates,
        })
    }

    pub(crate) fn base_without_solid_base(base: ClassId, candidates: CandidateList) -> Self {
        Self::Invalid(SolidBaseConflict {
            reason: InvalidReason::BaseWithoutSolidBase { base },
            candidates,
        })
    }

    pub(crate) fn cycle() -> Self {
        Self::Invalid(SolidBaseConflict {
            reason: InvalidReason::UnexpectedCycle,
            candidates: CandidateList::new(),
        })
    }

    /// The resolved solid base, if any.
    #[inline]
    pub fn resolved(&self) -> Option<ClassId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Invalid(_) => None,
        }
    }

    /// Whether resolution failed.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The failure details, if resolution failed.
    #[inline]
    pub fn conflict(&self) -> Option<&SolidBaseConflict> {
        match self {
            Self::Resolved(_) => None,
            Self::Invalid(conflict) => Some(conflict),
        }
    }

    /// Whether this result signals a tooling bug rather than a user error.
    #[inline]
    pub fn is_internal_error(&self) -> bool {
        matches!(
            self,
            Self::Invalid(SolidBaseConflict {
                reason: InvalidReason::UnexpectedCycle,
                ..
            })
        )
    }
}
