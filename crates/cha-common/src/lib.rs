//! Common types and utilities for the cha class-hierarchy analyzer.
//!
//! This crate provides foundational types used across all cha crates:
//! - String interning for qualified class names (`Atom`, `ShardedInterner`)
//! - The diagnostic model (`Diagnostic`, `DiagnosticCategory`, message data)
//! - Centralized limits and thresholds

// String interning for qualified-name deduplication
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Diagnostic types and message lookup
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, format_message,
    get_message_template,
};

// Centralized limits and thresholds
pub mod limits;
