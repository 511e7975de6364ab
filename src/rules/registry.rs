//! Ordered, duplicate-free collection of rules

use super::StyleRule;
use crate::domain::violations::{Severity, StyleGuardError, StyleGuardResult, RESERVED_RULE_IDS};
use std::collections::HashMap;
use std::fmt;

/// A rule together with the severity it reports at
pub struct RegisteredRule {
    rule: Box<dyn StyleRule>,
    severity: Severity,
}

impl RegisteredRule {
    pub fn id(&self) -> &str {
        self.rule.id()
    }

    pub fn description(&self) -> &str {
        self.rule.description()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn rule(&self) -> &dyn StyleRule {
        self.rule.as_ref()
    }
}

impl fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("id", &self.id())
            .field("severity", &self.severity)
            .finish()
    }
}

/// Rules in registration order; ids are unique
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule at its default severity
    pub fn register(&mut self, rule: Box<dyn StyleRule>) -> StyleGuardResult<()> {
        let severity = rule.default_severity();
        self.register_with_severity(rule, severity)
    }

    /// Register a rule at an explicit severity.
    ///
    /// Fails with `DuplicateRule` when the id is already taken and with
    /// `ReservedRuleId` for ids the tool uses for its own diagnostics.
    pub fn register_with_severity(
        &mut self,
        rule: Box<dyn StyleRule>,
        severity: Severity,
    ) -> StyleGuardResult<()> {
        let id = rule.id().to_string();

        if RESERVED_RULE_IDS.contains(&id.as_str()) {
            return Err(StyleGuardError::ReservedRuleId { id });
        }
        if self.index.contains_key(&id) {
            return Err(StyleGuardError::duplicate_rule(id));
        }

        tracing::debug!("Registering rule '{}' at severity {}", id, severity);
        self.index.insert(id, self.rules.len());
        self.rules.push(RegisteredRule { rule, severity });
        Ok(())
    }

    /// All rules in registration order
    pub fn all(&self) -> &[RegisteredRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredRule> {
        self.index.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(RegisteredRule::id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::violations::PARSE_ERROR_RULE_ID;
    use crate::rules::{RuleOutcome, StyleRule};
    use crate::source::SourceUnit;

    struct Named(&'static str);

    impl StyleRule for Named {
        fn id(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test rule"
        }

        fn check(&self, _unit: &SourceUnit) -> RuleOutcome {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let mut registry = RuleRegistry::new();
        for id in ["zeta", "alpha", "mu", "beta"] {
            registry.register(Box::new(Named(id))).unwrap();
        }

        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mu", "beta"]);
        assert_eq!(registry.all().len(), 4);
        assert_eq!(registry.all()[2].id(), "mu");
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(Named("line-length"))).unwrap();

        let err = registry.register(Box::new(Named("line-length"))).unwrap_err();
        assert!(matches!(err, StyleGuardError::DuplicateRule { ref id } if id == "line-length"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reserved_id_is_rejected() {
        let mut registry = RuleRegistry::new();
        let err = registry.register(Box::new(Named(PARSE_ERROR_RULE_ID))).unwrap_err();

        assert!(matches!(err, StyleGuardError::ReservedRuleId { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_severity_override_and_lookup() {
        let mut registry = RuleRegistry::new();
        registry
            .register_with_severity(Box::new(Named("custom")), Severity::Error)
            .unwrap();

        let rule = registry.get("custom").unwrap();
        assert_eq!(rule.severity(), Severity::Error);
        assert_eq!(rule.description(), "test rule");
        assert!(registry.contains("custom"));
        assert!(registry.get("missing").is_none());
    }
}
