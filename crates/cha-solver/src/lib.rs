//! Solid base resolution and disjointness queries.
//!
//! This crate is the analytical core of the analyzer:
//!
//! - **`SolidnessOracle`**: is a class intrinsically a solid base? A pure
//!   lookup over declaration flags and the configured fixed-layout builtin
//!   table.
//! - **`SolidBaseResolver`**: the memoized bottom-up computation of each
//!   class's unique solid base, or an `Invalid` marker when no unique one
//!   exists.
//! - **`DisjointnessOracle`**: "can these two classes share an instance?" —
//!   solid bases must be comparable under the subclass relation.
//!
//! The resolver is the single source of truth; the disjointness oracle and
//! the validation pass in `cha-checker` are thin consumers of its results.

mod disjoint;
pub mod recursion;
mod resolver;
mod solid_base;
mod solidness;

pub use disjoint::{DisjointnessOracle, OverlapVerdict};
pub use resolver::SolidBaseResolver;
pub use solid_base::{CandidateList, InvalidReason, SolidBase, SolidBaseConflict};
pub use solidness::{FIXED_LAYOUT_BUILTINS, SolidnessOracle};
