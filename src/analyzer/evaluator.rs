//! Rule evaluation with per-rule failure isolation

use crate::domain::violations::{Severity, Violation};
use crate::rules::{Finding, RegisteredRule, RuleRegistry};
use crate::source::SourceUnit;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Applies every registered rule to a source unit
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator {
    parallel: bool,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl RuleEvaluator {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Violations of every rule for `unit`, grouped in registration order.
    ///
    /// A rule that fails or panics contributes a single crash violation
    /// instead of its findings; the other rules are unaffected.
    pub fn evaluate(&self, registry: &RuleRegistry, unit: &SourceUnit) -> Vec<Violation> {
        let rules = registry.all();

        if self.parallel && rules.len() > 1 {
            rules
                .par_iter()
                .flat_map_iter(|rule| run_rule(rule, unit))
                .collect()
        } else {
            rules.iter().flat_map(|rule| run_rule(rule, unit)).collect()
        }
    }
}

fn run_rule(rule: &RegisteredRule, unit: &SourceUnit) -> Vec<Violation> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.rule().check(unit)));

    let detail = match outcome {
        Ok(Ok(findings)) => {
            tracing::debug!(
                "Rule '{}' reported {} findings in {}",
                rule.id(),
                findings.len(),
                unit.path().display()
            );
            return findings
                .into_iter()
                .map(|finding| into_violation(rule, unit, finding))
                .collect();
        }
        Ok(Err(error)) => error.to_string(),
        Err(payload) => panic_payload_to_string(payload.as_ref()),
    };

    tracing::warn!(
        "Rule '{}' crashed on {}: {}",
        rule.id(),
        unit.path().display(),
        detail
    );

    vec![Violation::new(
        rule.id(),
        Severity::Error,
        unit.path().to_path_buf(),
        format!("rule `{}` crashed: {}", rule.id(), detail),
    )]
}

fn into_violation(rule: &RegisteredRule, unit: &SourceUnit, finding: Finding) -> Violation {
    let mut violation = Violation::new(
        rule.id(),
        rule.severity(),
        unit.path().to_path_buf(),
        finding.message,
    )
    .at(finding.location);

    if let Some(context) = finding.context {
        violation = violation.with_context(context);
    }
    if let Some(suggestion) = finding.suggestion {
        violation = violation.with_suggestion(suggestion);
    }
    violation
}

fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
