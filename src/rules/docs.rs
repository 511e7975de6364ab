//! Documentation requirements for public API

use super::{Finding, RuleOutcome, StyleRule};
use crate::source::{DeclarationKind, SourceUnit};

/// Public types and functions must carry a doc comment
#[derive(Debug, Clone, Default)]
pub struct DocCommentRule;

impl StyleRule for DocCommentRule {
    fn id(&self) -> &str {
        "doc-comment-required"
    }

    fn description(&self) -> &str {
        "Public types and functions must be preceded by a doc comment"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        Ok(unit
            .declarations()
            .iter()
            .filter(|decl| decl.is_public && !decl.has_doc)
            .filter(|decl| matches!(decl.kind, DeclarationKind::Type | DeclarationKind::Function))
            .map(|decl| {
                Finding::new(
                    decl.location,
                    format!("public {} `{}` has no doc comment", decl.keyword, decl.name),
                )
            })
            .collect())
    }
}
