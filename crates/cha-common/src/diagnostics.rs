//! Diagnostic types and message lookup for the class-hierarchy analyzer.
//!
//! The analyzer reports class-level problems as `Diagnostic` values; it never
//! aborts analysis with an error return. Message templates use `{0}`-style
//! placeholders filled in with `format_message`.

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., "see also" locations).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A class-analysis diagnostic message with optional related information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where a conflicting base was declared)
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Diagnostic codes emitted by the analyzer.
pub mod diagnostic_codes {
    /// A class combines bases whose solid bases are mutually incomparable.
    pub const INCOMPATIBLE_SOLID_BASES: u32 = 7101;
    /// A class inherits from a base that has no valid solid base.
    pub const BASE_WITHOUT_SOLID_BASE: u32 = 7102;
    /// The resolver hit a cycle that upstream linearization should have
    /// rejected. Internal-error class: a tooling bug, not a user error.
    pub const UNEXPECTED_HIERARCHY_CYCLE: u32 = 7103;
}

/// All message definitions, ordered by code.
pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::INCOMPATIBLE_SOLID_BASES,
        category: DiagnosticCategory::Error,
        message: "Class '{0}' cannot inherit from incompatible solid bases: {1}.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::BASE_WITHOUT_SOLID_BASE,
        category: DiagnosticCategory::Error,
        message: "Base class '{1}' of class '{0}' has no valid solid base.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNEXPECTED_HIERARCHY_CYCLE,
        category: DiagnosticCategory::Error,
        message: "Internal error: cyclic inheritance detected while resolving the solid base of class '{0}'.",
    },
];

/// Look up a diagnostic message definition by code.
///
/// Returns the `DiagnosticMessage` with template string containing `{0}`,
/// `{1}`, etc. placeholders. Use `format_message()` to fill them in.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
