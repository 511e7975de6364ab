//! User-defined regex rules
//!
//! Each `custom_rules` entry of the configuration becomes one `PatternStyleRule`.
//! Matches run over the whole file so patterns may span lines.

use super::{Finding, RuleOutcome, StyleRule};
use crate::config::{ExcludeConditions, PatternRule};
use crate::domain::violations::{Severity, StyleGuardError, StyleGuardResult};
use crate::source::SourceUnit;
use regex::Regex;
use std::path::Path;

#[derive(Debug)]
pub struct PatternStyleRule {
    id: String,
    description: String,
    regex: Regex,
    message_template: String,
    severity: Severity,
    exclude_conditions: Option<ExcludeConditions>,
    exclude_globs: Vec<glob::Pattern>,
}

impl PatternStyleRule {
    pub fn from_config(rule: &PatternRule) -> StyleGuardResult<Self> {
        tracing::debug!(
            "Compiling pattern '{}' for rule '{}' (case sensitive: {})",
            rule.pattern,
            rule.id,
            rule.case_sensitive
        );

        let regex = rule.compile().map_err(|e| {
            StyleGuardError::pattern(format!("Invalid regex '{}': {}", rule.pattern, e))
        })?;

        let exclude_globs = rule
            .exclude_if
            .as_ref()
            .and_then(|conditions| conditions.file_patterns.as_ref())
            .into_iter()
            .flatten()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    StyleGuardError::pattern(format!(
                        "Invalid file pattern '{}' in rule '{}': {}",
                        pattern, rule.id, e
                    ))
                })
            })
            .collect::<StyleGuardResult<Vec<_>>>()?;

        Ok(Self {
            id: rule.id.clone(),
            description: rule
                .description
                .clone()
                .unwrap_or_else(|| format!("Reports matches of /{}/", rule.pattern)),
            regex,
            message_template: rule.message.clone(),
            severity: rule.severity.unwrap_or(Severity::Warning),
            exclude_conditions: rule.exclude_if.clone(),
            exclude_globs,
        })
    }

    fn is_excluded(&self, file_path: &Path) -> bool {
        let Some(conditions) = &self.exclude_conditions else {
            return false;
        };

        if conditions.in_tests && is_test_file(file_path) {
            tracing::debug!(
                "Rule '{}' skips test file '{}'",
                self.id,
                file_path.display()
            );
            return true;
        }

        if let Some(pattern) = self.exclude_globs.iter().find(|p| p.matches_path(file_path)) {
            tracing::debug!(
                "Rule '{}' skips '{}': matches pattern '{}'",
                self.id,
                file_path.display(),
                pattern
            );
            return true;
        }

        false
    }
}

impl StyleRule for PatternStyleRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        if self.is_excluded(unit.path()) {
            return Ok(Vec::new());
        }

        let content = unit.lines().join("\n");
        let findings = self
            .regex
            .find_iter(&content)
            .map(|regex_match| {
                let (line, column, context) = match_location(&content, regex_match.start());
                let message = self.message_template.replace("{match}", regex_match.as_str());
                Finding::at(line, column, message).with_context(context)
            })
            .collect();

        Ok(findings)
    }
}

/// Line, column and trimmed line text for a byte offset in `content`
fn match_location(content: &str, byte_offset: usize) -> (u32, u32, String) {
    let mut line = 1;
    let mut col = 1;
    let mut line_start = 0;

    for (i, ch) in content.char_indices() {
        if i >= byte_offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
            line_start = i + 1;
        } else {
            col += 1;
        }
    }

    let line_end = content[line_start..]
        .find('\n')
        .map(|pos| line_start + pos)
        .unwrap_or(content.len());

    (line, col, content[line_start..line_end].trim().to_string())
}

fn is_test_file(file_path: &Path) -> bool {
    file_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|s| s == "tests" || s == "test")
    }) || file_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| {
            stem.starts_with("test_")
                || stem.ends_with("_test")
                || stem.ends_with("Test")
                || stem.ends_with("Tests")
                || stem.ends_with(".test")
                || stem.ends_with(".spec")
        })
}
