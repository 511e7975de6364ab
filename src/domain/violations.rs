//! Core domain models for style violations and validation results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - Violations know their location, severity and how to render themselves as a report line
//! - ValidationReport acts as the aggregate root: it sorts, deduplicates and decides the verdict
//! - Rule ids reserved for tool-side problems live here so every layer agrees on them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Rule id used when a file cannot be parsed into a source unit
pub const PARSE_ERROR_RULE_ID: &str = "parse-error";

/// Rule id used when a file cannot be read from disk
pub const READ_ERROR_RULE_ID: &str = "read-error";

/// Rule ids that belong to the tool itself and can never be registered
pub const RESERVED_RULE_IDS: &[&str] = &[PARSE_ERROR_RULE_ID, READ_ERROR_RULE_ID];

/// Severity levels for style violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Deviations that should be addressed but don't fail the run
    Warning,
    /// Deviations that fail the run and CI/CD builds
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-based position inside a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Location used for findings that concern the whole file
    pub fn file_start() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A style violation detected during analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that detected this violation
    pub rule_id: String,
    /// Severity level of this violation
    pub severity: Severity,
    /// File path where the violation was found
    pub file_path: PathBuf,
    /// Position of the violation
    pub location: Location,
    /// Human-readable description of the violation
    pub message: String,
    /// Source code context around the violation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Suggested fix for the violation (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Violation {
    /// Create a new violation positioned at the start of the file
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        file_path: PathBuf,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            file_path,
            location: Location::file_start(),
            message: message.into(),
            context: None,
            suggested_fix: None,
        }
    }

    /// Set line and column position
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.location = Location::new(line, column);
        self
    }

    /// Set the position from an existing location
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Add source code context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }

    /// Whether this violation is blocking (fails the run)
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format violation as a single report line:
    /// `path:line:column: [severity] ruleId message`
    pub fn format_display(&self) -> String {
        format!(
            "{}:{}: [{}] {} {}",
            self.file_path.display(),
            self.location,
            self.severity.as_str(),
            self.rule_id,
            self.message
        )
    }

    /// Key used for ordering and deduplication
    fn sort_key(&self) -> (&PathBuf, Location, &str) {
        (&self.file_path, self.location, self.rule_id.as_str())
    }
}

/// Overall outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Process exit code for this verdict
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
        }
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of files analyzed
    pub total_files: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
        }
    }
}

/// Complete validation report containing all violations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All violations found during validation
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: ValidationSummary,
    /// Configuration used for this validation
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Pass/fail outcome: fails when any Error-severity violation is present
    pub fn verdict(&self) -> Verdict {
        if self.has_errors() {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.severity == severity)
    }

    /// Set the number of files analyzed
    pub fn set_files_analyzed(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_files += other.summary.total_files;
    }

    /// Sort violations by (file, line, column, rule id) for deterministic output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Sort, then drop violations that repeat an earlier (file, location, rule id)
    /// and recompute the severity counts.
    pub fn finalize(&mut self) {
        self.sort_violations();
        self.violations
            .dedup_by(|later, earlier| later.sort_key() == earlier.sort_key());

        let mut counts = ViolationCounts::default();
        for violation in &self.violations {
            counts.add(violation.severity);
        }
        self.summary.violations_by_severity = counts;
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur during validation
#[derive(Debug, thiserror::Error)]
pub enum StyleGuardError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// A rule with the same id is already registered
    #[error("Duplicate rule id '{id}'")]
    DuplicateRule { id: String },

    /// The rule id belongs to the tool's own diagnostics
    #[error("Rule id '{id}' is reserved")]
    ReservedRuleId { id: String },

    /// Analysis failed for a specific path
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },
}

impl StyleGuardError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create an analysis error
    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate rule error
    pub fn duplicate_rule(id: impl Into<String>) -> Self {
        Self::DuplicateRule { id: id.into() }
    }
}

/// Result type for style-guard operations
pub type StyleGuardResult<T> = Result<T, StyleGuardError>;
