//! Class store and inheritance queries for the cha analyzer.
//!
//! This crate is the ClassHierarchy collaborator the solver builds on:
//! - `ClassNode` / `ClassFlags`: immutable per-class declaration records
//! - `ClassStore`: concurrent id-allocating storage for those records
//! - `ClassHierarchy`: registration, the reflexive-transitive subclass
//!   relation, descendant enumeration, and base amendment with an explicit
//!   affected-set so the host can drive cache invalidation.
//!
//! The hierarchy is append-only within a session; `amend_bases` is the single
//! sanctioned mutation and exists for declaration amendment flows.

mod class;
mod graph;
mod store;

pub use class::{BaseList, ClassFlags, ClassId, ClassNode};
pub use graph::ClassHierarchy;
pub use store::ClassStore;
