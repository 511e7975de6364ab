//! Style rules and the registry that orders them
//!
//! Architectural Principle: Service Layer - Rules are independent predicates over a SourceUnit
//! - Every rule implements the StyleRule trait and reports rule-local findings
//! - The evaluator, not the rule, turns findings into violations with id, severity and path
//! - Built-in rules live in layout, naming and docs; user rules come from pattern

pub mod catalog;
pub mod docs;
pub mod layout;
pub mod naming;
pub mod pattern;
pub mod registry;

use crate::domain::violations::{Location, Severity};
use crate::source::SourceUnit;

pub use catalog::build_registry;
pub use registry::{RegisteredRule, RuleRegistry};

/// A rule-local observation; the evaluator converts it into a `Violation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub location: Location,
    pub message: String,
    pub context: Option<String>,
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            context: None,
            suggestion: None,
        }
    }

    /// Finding positioned at a 1-based line and column
    pub fn at(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(Location::new(line, column), message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Internal failure of a rule predicate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of evaluating one rule against one unit
pub type RuleOutcome = Result<Vec<Finding>, RuleError>;

/// A style rule.
///
/// Rules must not keep mutable state between calls: the evaluator may run
/// several rules, and several files, at the same time.
pub trait StyleRule: Send + Sync {
    /// Unique kebab-case identifier (e.g. `line-length`)
    fn id(&self) -> &str;

    /// One line describing what the rule enforces
    fn description(&self) -> &str;

    /// Severity used when the configuration does not override it
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Inspect a unit and return every finding
    fn check(&self, unit: &SourceUnit) -> RuleOutcome;
}
