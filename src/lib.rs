//! style-guard - House style enforcement for curly-brace languages and Rust
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Source frontends, rules and reporting are independent layers behind this facade
//! - Rules see a language-neutral SourceUnit, never raw parser output
//! - The verdict is computed from the complete report, independent of presentation

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod report;
pub mod rules;
pub mod source;

// Re-export main types for convenient access
pub use domain::violations::{
    Location, Severity, StyleGuardError, StyleGuardResult, ValidationReport, ValidationSummary,
    Verdict, Violation, PARSE_ERROR_RULE_ID, READ_ERROR_RULE_ID,
};

pub use config::{ConfigBuilder, FunctionStyle, PatternRule, StyleGuardConfig};

pub use analyzer::{AnalysisOptions, Analyzer, RuleEvaluator, RuleStats};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::{build_registry, Finding, RuleError, RuleRegistry, StyleRule};

pub use source::{Declaration, DeclarationKind, Language, ParseError, SourceParser, SourceUnit};

use std::path::{Path, PathBuf};

/// Main validator providing high-level validation operations
pub struct StyleValidator {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

/// Options for a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Output format for results
    pub output_format: OutputFormat,
    /// Report options
    pub report_options: ReportOptions,
    /// Analysis options
    pub analysis_options: AnalysisOptions,
}

impl StyleValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: StyleGuardConfig) -> StyleGuardResult<Self> {
        Ok(Self {
            analyzer: Analyzer::new(config)?,
            report_formatter: ReportFormatter::default(),
        })
    }

    /// Create a validator around an explicitly assembled registry
    pub fn with_registry(config: StyleGuardConfig, registry: RuleRegistry) -> StyleGuardResult<Self> {
        Ok(Self {
            analyzer: Analyzer::with_registry(config, registry)?,
            report_formatter: ReportFormatter::default(),
        })
    }

    /// Create a validator with default configuration
    pub fn new() -> StyleGuardResult<Self> {
        Self::new_with_config(StyleGuardConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> StyleGuardResult<Self> {
        let config = StyleGuardConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Validate files and directories with custom options
    pub fn validate_with_options<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
        options: &ValidationOptions,
    ) -> StyleGuardResult<ValidationReport> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.analyzer.analyze_paths(&paths, &options.analysis_options)
    }

    /// Validate a single file
    pub fn validate_file<P: AsRef<Path>>(&self, file_path: P) -> ValidationReport {
        let mut report = ValidationReport::new();
        for violation in self.analyzer.analyze_file(file_path) {
            report.add_violation(violation);
        }
        report.set_files_analyzed(1);
        report.set_config_fingerprint(self.analyzer.config_fingerprint());
        report.finalize();
        report
    }

    /// Validate in-memory source text as if it were the file at `path`
    pub fn validate_source<P: AsRef<Path>>(&self, path: P, text: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        for violation in self.analyzer.analyze_source(path.as_ref(), text) {
            report.add_violation(violation);
        }
        report.set_files_analyzed(1);
        report.finalize();
        report
    }

    /// Validate entire directory tree
    pub fn validate_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> StyleGuardResult<ValidationReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Format a validation report for output
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> StyleGuardResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Write a formatted validation report to `writer`
    pub fn write_report<W: std::io::Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        writer: W,
    ) -> StyleGuardResult<()> {
        self.report_formatter.write_report(report, format, writer)
    }

    /// One-line totals for a report
    pub fn summary_line(&self, report: &ValidationReport) -> String {
        self.report_formatter.summary_line(report)
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.analyzer.registry()
    }

    /// Get rule statistics
    pub fn rule_statistics(&self) -> StyleGuardResult<RuleStats> {
        self.analyzer.rule_stats()
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> StyleGuardResult<StyleValidator> {
    StyleValidator::new()
}

/// Convenience function to validate files with default settings
pub fn validate_files<P: AsRef<Path>>(files: Vec<P>) -> StyleGuardResult<ValidationReport> {
    StyleValidator::new()?.validate_with_options(files, &ValidationOptions::default())
}

/// Convenience function to validate a directory with default settings
pub fn validate_directory<P: AsRef<Path>>(directory: P) -> StyleGuardResult<ValidationReport> {
    StyleValidator::new()?.validate_directory(directory, &AnalysisOptions::default())
}
