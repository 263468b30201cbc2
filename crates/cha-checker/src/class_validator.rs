//! Solid base validation at class-definition time.
//!
//! The validator is a thin consumer of the resolver: it re-uses the candidate
//! list discovered during resolution instead of recomputing it, attaches the
//! declaration sites of the conflicting bases as related information, and
//! guarantees each class is reported at most once per session.

use cha_common::diagnostics::{Diagnostic, diagnostic_codes, format_message, get_message_template};
use cha_hierarchy::{ClassId, ClassNode};
use cha_solver::{InvalidReason, SolidBaseResolver};
use dashmap::DashSet;
use std::sync::Arc;
use tracing::debug;

/// Validates class declarations against the solid base rule.
pub struct ClassValidator {
    resolver: Arc<SolidBaseResolver>,
    /// Classes already reported; enforces exactly-once reporting even if the
    /// host validates a declaration twice.
    reported: DashSet<ClassId>,
}

impl ClassValidator {
    pub fn new(resolver: Arc<SolidBaseResolver>) -> Self {
        Self {
            resolver,
            reported: DashSet::new(),
        }
    }

    /// Validate one class declaration.
    ///
    /// Returns zero or one diagnostic. An `Invalid` resolution is reported at
    /// the class's declaration site; repeated calls for the same class return
    /// nothing further.
    pub fn validate(&self, id: ClassId) -> Vec<Diagnostic> {
        let result = self.resolver.solid_base_of(id);
        let Some(conflict) = result.conflict() else {
            return Vec::new();
        };

        if !self.reported.insert(id) {
            debug!(id = %id, "validate: already reported, skipping");
            return Vec::new();
        }

        let hierarchy = self.resolver.hierarchy();
        let Some(node) = hierarchy.node(id) else {
            return Vec::new();
        };
        let class_name = hierarchy.display_name(id);
        let (file, start, length) = declaration_site(hierarchy.interner(), &node);

        let diagnostic = match conflict.reason {
            InvalidReason::IncomparableCandidates => {
                let candidate_names: Vec<String> = conflict
                    .candidates
                    .iter()
                    .map(|&candidate| format!("'{}'", hierarchy.display_name(candidate)))
                    .collect();
                let code = diagnostic_codes::INCOMPATIBLE_SOLID_BASES;
                let message = format_message(
                    template(code),
                    &[&class_name, &candidate_names.join(", ")],
                );

                let mut diagnostic = Diagnostic::error(file, start, length, message, code);
                for &candidate in &conflict.candidates {
                    if let Some(candidate_node) = hierarchy.node(candidate) {
                        let (c_file, c_start, c_length) =
                            declaration_site(hierarchy.interner(), &candidate_node);
                        diagnostic = diagnostic.with_related(
                            c_file,
                            c_start,
                            c_length,
                            format!(
                                "Solid base '{}' is declared here.",
                                hierarchy.display_name(candidate)
                            ),
                        );
                    }
                }
                diagnostic
            }
            InvalidReason::BaseWithoutSolidBase { base } => {
                let code = diagnostic_codes::BASE_WITHOUT_SOLID_BASE;
                let base_name = hierarchy.display_name(base);
                let message = format_message(template(code), &[&class_name, &base_name]);

                let mut diagnostic = Diagnostic::error(file, start, length, message, code);
                if let Some(base_node) = hierarchy.node(base) {
                    let (b_file, b_start, b_length) =
                        declaration_site(hierarchy.interner(), &base_node);
                    diagnostic = diagnostic.with_related(
                        b_file,
                        b_start,
                        b_length,
                        format!("Base class '{base_name}' is declared here."),
                    );
                }
                diagnostic
            }
            InvalidReason::UnexpectedCycle => {
                let code = diagnostic_codes::UNEXPECTED_HIERARCHY_CYCLE;
                let message = format_message(template(code), &[&class_name]);
                Diagnostic::error(file, start, length, message, code)
            }
        };

        debug!(id = %id, code = diagnostic.code, "validate: reporting invalid solid base");
        vec![diagnostic]
    }

    /// Whether a class has already been reported this session.
    pub fn has_reported(&self, id: ClassId) -> bool {
        self.reported.contains(&id)
    }

    /// The resolver this validator consults.
    pub fn resolver(&self) -> &Arc<SolidBaseResolver> {
        &self.resolver
    }
}

fn template(code: u32) -> &'static str {
    // Every code the validator emits has an entry in the message table.
    get_message_template(code).unwrap_or("{0}")
}

fn declaration_site(
    interner: &cha_common::interner::ShardedInterner,
    node: &ClassNode,
) -> (String, u32, u32) {
    let file = node
        .file
        .map(|atom| interner.resolve(atom).to_string())
        .unwrap_or_default();
    let (start, length) = match node.span {
        Some((start, end)) => (start, end.saturating_sub(start)),
        None => (0, 0),
    };
    (file, start, length)
}

#[cfg(test)]
#[path = "tests/class_validator_tests.rs"]
mod tests;
