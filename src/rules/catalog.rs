//! Built-in rule catalog and registry construction from configuration

use super::docs::DocCommentRule;
use super::layout::{FinalNewlineRule, IndentationRule, LineLengthRule, TrailingWhitespaceRule};
use super::naming::{ConstantNamingRule, FunctionNamingRule, TypeNamingRule};
use super::pattern::PatternStyleRule;
use super::registry::RuleRegistry;
use super::StyleRule;
use crate::config::StyleGuardConfig;
use crate::domain::violations::{Severity, StyleGuardResult};

/// Ids of the built-in rules, in registration order
pub const BUILTIN_RULE_IDS: &[&str] = &[
    "line-length",
    "indentation",
    "trailing-whitespace",
    "final-newline",
    "type-naming",
    "function-naming",
    "constant-naming",
    "doc-comment-required",
];

/// A rule known to the configuration, whether or not it is enabled
pub struct CatalogEntry {
    pub rule: Box<dyn StyleRule>,
    pub severity: Severity,
    pub enabled: bool,
}

fn builtin_rules(config: &StyleGuardConfig) -> Vec<Box<dyn StyleRule>> {
    vec![
        Box::new(LineLengthRule::new(config.layout.max_line_length)),
        Box::new(IndentationRule::from_config(&config.layout)),
        Box::new(TrailingWhitespaceRule),
        Box::new(FinalNewlineRule),
        Box::new(TypeNamingRule),
        Box::new(FunctionNamingRule::new(config.naming.function_style)),
        Box::new(ConstantNamingRule),
        Box::new(DocCommentRule),
    ]
}

/// Every built-in and custom rule with its effective severity and enablement
pub fn catalog(config: &StyleGuardConfig) -> StyleGuardResult<Vec<CatalogEntry>> {
    let mut entries = Vec::new();

    for rule in builtin_rules(config) {
        entries.push(entry(config, rule, true));
    }

    for custom in &config.custom_rules {
        let rule = PatternStyleRule::from_config(custom)?;
        entries.push(entry(config, Box::new(rule), custom.enabled));
    }

    Ok(entries)
}

fn entry(config: &StyleGuardConfig, rule: Box<dyn StyleRule>, enabled: bool) -> CatalogEntry {
    let rule_override = config.rule_override(rule.id());
    CatalogEntry {
        severity: rule_override
            .and_then(|o| o.severity)
            .unwrap_or_else(|| rule.default_severity()),
        enabled: enabled && rule_override.map_or(true, |o| o.enabled),
        rule,
    }
}

/// Register every enabled rule: built-ins first, then custom rules in config order.
///
/// A custom rule that reuses an existing id fails with `DuplicateRule`.
pub fn build_registry(config: &StyleGuardConfig) -> StyleGuardResult<RuleRegistry> {
    let mut registry = RuleRegistry::new();

    for entry in catalog(config)? {
        if !entry.enabled {
            tracing::debug!("Rule '{}' disabled by configuration", entry.rule.id());
            continue;
        }
        registry.register_with_severity(entry.rule, entry.severity)?;
    }

    tracing::debug!("Registry built with {} rules", registry.len());
    Ok(registry)
}
