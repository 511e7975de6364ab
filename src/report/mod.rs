//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Filtering is presentation only: the verdict always comes from the full report

use crate::domain::violations::{
    Severity, StyleGuardError, StyleGuardResult, ValidationReport, Violation,
};
use colored::{ColoredString, Colorize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `path:line:column: [severity] ruleId message` line per violation
    #[default]
    Text,
    /// Grouped by file, with colors, context and a summary
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// SARIF 2.1.0 for code scanning tools
    Sarif,
    /// GitHub Actions workflow annotations
    GitHub,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["text", "human", "json", "sarif", "github"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Human => "human",
            Self::Json => "json",
            Self::Sarif => "sarif",
            Self::GitHub => "github",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = StyleGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "sarif" => Ok(Self::Sarif),
            "github" => Ok(Self::GitHub),
            other => Err(StyleGuardError::config(format!(
                "Unknown output format '{other}'. Available: {}",
                Self::all_formats().join(", ")
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to show the source line of each violation
    pub show_context: bool,
    /// Whether to show violation suggestions
    pub show_suggestions: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_context: true,
            show_suggestions: true,
            max_violations: None,
            min_severity: None,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> StyleGuardResult<String> {
        let filtered_violations = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Text => Ok(self.format_text(&filtered_violations)),
            OutputFormat::Human => Ok(self.format_human(report, &filtered_violations)),
            OutputFormat::Json => self.format_json(report, &filtered_violations),
            OutputFormat::Sarif => self.format_sarif(&filtered_violations),
            OutputFormat::GitHub => Ok(self.format_github(&filtered_violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> StyleGuardResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Filter violations based on report options
    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| self.options.min_severity.map_or(true, |min| v.severity >= min))
            .collect();

        if let Some(max) = self.options.max_violations {
            filtered.truncate(max);
        }

        filtered
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.options.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_text(&self, violations: &[&Violation]) -> String {
        violations
            .iter()
            .map(|violation| format!("{}\n", violation.format_display()))
            .collect()
    }

    /// One-line totals, e.g. `2 files checked: 1 error, 0 warnings`
    pub fn summary_line(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.violations_by_severity;
        format!(
            "{} checked: {}, {}",
            plural(report.summary.total_files, "file"),
            plural(counts.error, "error"),
            plural(counts.warning, "warning")
        )
    }

    /// Format report in human-readable format
    fn format_human(&self, report: &ValidationReport, violations: &[&Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            output.push_str(&self.paint("No style violations found", |s| s.green().bold()));
            output.push_str("\n\n");
        } else {
            let header = "Style violations found";
            if report.has_errors() {
                output.push_str(&self.paint(header, |s| s.red().bold()));
            } else {
                output.push_str(&self.paint(header, |s| s.yellow().bold()));
            }
            output.push_str("\n\n");

            let mut by_file: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
            for violation in violations {
                by_file.entry(&violation.file_path).or_default().push(violation);
            }

            for (file_path, file_violations) in by_file {
                output.push_str(&self.paint(&file_path.display().to_string(), |s| s.bold().underline()));
                output.push('\n');

                for violation in file_violations {
                    let severity = match violation.severity {
                        Severity::Error => self.paint("error", |s| s.red()),
                        Severity::Warning => self.paint("warning", |s| s.yellow()),
                    };

                    output.push_str(&format!(
                        "  {} [{}] {} {}\n",
                        self.paint(&violation.location.to_string(), |s| s.dimmed()),
                        severity,
                        self.paint(&violation.rule_id, |s| s.cyan()),
                        violation.message
                    ));

                    if self.options.show_context {
                        if let Some(context) = &violation.context {
                            output.push_str(&format!(
                                "    {}\n",
                                self.paint(&format!("| {context}"), |s| s.dimmed())
                            ));
                        }
                    }

                    if self.options.show_suggestions {
                        if let Some(suggestion) = &violation.suggested_fix {
                            output.push_str(&format!(
                                "    {}\n",
                                self.paint(&format!("help: {suggestion}"), |s| s.green())
                            ));
                        }
                    }
                }
                output.push('\n');
            }
        }

        output.push_str(&self.format_summary(report));
        output
    }

    /// Format report in JSON format
    fn format_json(
        &self,
        report: &ValidationReport,
        violations: &[&Violation],
    ) -> StyleGuardResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.display().to_string(),
                    "line": v.location.line,
                    "column": v.location.column,
                    "message": v.message,
                    "context": v.context,
                    "suggested_fix": v.suggested_fix,
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "verdict": report.verdict(),
            "violations": json_violations,
            "summary": {
                "total_files": report.summary.total_files,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning,
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339(),
            },
            "config_fingerprint": report.config_fingerprint,
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| StyleGuardError::config(format!("JSON serialization failed: {e}")))
    }

    /// Format report in SARIF format
    fn format_sarif(&self, violations: &[&Violation]) -> StyleGuardResult<String> {
        let rule_ids: BTreeSet<&str> = violations.iter().map(|v| v.rule_id.as_str()).collect();
        let rules: Vec<JsonValue> = rule_ids
            .into_iter()
            .map(|id| serde_json::json!({ "id": id }))
            .collect();

        let sarif_results: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                let mut physical = serde_json::json!({
                    "artifactLocation": {
                        "uri": v.file_path.display().to_string().replace('\\', "/")
                    },
                    "region": {
                        "startLine": v.location.line,
                        "startColumn": v.location.column
                    }
                });
                if let Some(context) = &v.context {
                    physical["contextRegion"] = serde_json::json!({
                        "startLine": v.location.line,
                        "snippet": { "text": context }
                    });
                }

                serde_json::json!({
                    "ruleId": v.rule_id,
                    "level": v.severity.as_str(),
                    "message": { "text": v.message },
                    "locations": [{ "physicalLocation": physical }]
                })
            })
            .collect();

        let sarif_report = serde_json::json!({
            "version": "2.1.0",
            "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                        "rules": rules
                    }
                },
                "results": sarif_results
            }]
        });

        serde_json::to_string_pretty(&sarif_report)
            .map_err(|e| StyleGuardError::config(format!("SARIF serialization failed: {e}")))
    }

    /// Format report for GitHub Actions
    fn format_github(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            output.push_str(&format!(
                "::{} file={},line={},col={},title={}::{}\n",
                violation.severity.as_str(),
                escape_property(&violation.file_path.display().to_string()),
                violation.location.line,
                violation.location.column,
                escape_property(&violation.rule_id),
                escape_data(&violation.message)
            ));
        }

        output
    }

    /// Format the summary section
    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.violations_by_severity;
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;

        let mut parts = Vec::new();
        if counts.total() == 0 {
            parts.push(self.paint("0 violations", |s| s.green()));
        }
        if counts.error > 0 {
            parts.push(self.paint(&plural(counts.error, "error"), |s| s.red()));
        }
        if counts.warning > 0 {
            parts.push(self.paint(&plural(counts.warning, "warning"), |s| s.yellow()));
        }

        format!(
            "{} {} in {} ({:.1}s) at {}\n",
            self.paint("Summary:", |s| s.bold()),
            parts.join(", "),
            plural(report.summary.total_files, "file"),
            execution_time,
            report.summary.validated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Escape workflow command message data
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape workflow command property values
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_report() -> ValidationReport {
        let mut report = ValidationReport::new();

        report.add_violation(
            Violation::new(
                "type-naming",
                Severity::Error,
                PathBuf::from("src/Main.java"),
                "class name `main` is not UpperCamelCase",
            )
            .with_position(42, 15)
            .with_context("class main {")
            .with_suggestion("rename to `Main`"),
        );
        report.add_violation(
            Violation::new(
                "trailing-whitespace",
                Severity::Warning,
                PathBuf::from("src/App.java"),
                "trailing whitespace",
            )
            .with_position(3, 9),
        );

        report.set_files_analyzed(10);
        report.set_execution_time(1200);
        report.finalize();
        report
    }

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_text_format() {
        let output = plain()
            .format_report(&create_test_report(), OutputFormat::Text)
            .unwrap();

        assert_eq!(
            output,
            "src/App.java:3:9: [warning] trailing-whitespace trailing whitespace\n\
             src/Main.java:42:15: [error] type-naming class name `main` is not UpperCamelCase\n"
        );
        assert_eq!(
            plain().summary_line(&create_test_report()),
            "10 files checked: 1 error, 1 warning"
        );
    }

    #[test]
    fn test_write_report_matches_format_report() {
        let report = create_test_report();
        let mut buffer = Vec::new();
        plain()
            .write_report(&report, OutputFormat::GitHub, &mut buffer)
            .unwrap();

        let expected = plain().format_report(&report, OutputFormat::GitHub).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), expected);
    }

    #[test]
    fn test_human_format() {
        let output = plain()
            .format_report(&create_test_report(), OutputFormat::Human)
            .unwrap();

        assert!(output.contains("Style violations found"));
        assert!(output.contains("src/Main.java"));
        assert!(output.contains("  42:15 [error] type-naming class name `main`"));
        assert!(output.contains("| class main {"));
        assert!(output.contains("help: rename to `Main`"));
        assert!(output.contains("Summary: 1 error, 1 warning in 10 files"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_json_format() {
        let output = plain()
            .format_report(&create_test_report(), OutputFormat::Json)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["verdict"], "fail");
        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["violations"][1]["rule_id"], "type-naming");
        assert_eq!(json["violations"][1]["line"], 42);
        assert_eq!(json["summary"]["total_files"], 10);
    }

    #[test]
    fn test_sarif_format() {
        let output = plain()
            .format_report(&create_test_report(), OutputFormat::Sarif)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        let run = &json["runs"][0];
        assert_eq!(json["version"], "2.1.0");
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 2);
        assert_eq!(run["results"][1]["level"], "error");
        assert_eq!(
            run["results"][1]["locations"][0]["physicalLocation"]["region"]["startColumn"],
            15
        );
    }

    #[test]
    fn test_github_format() {
        let output = plain()
            .format_report(&create_test_report(), OutputFormat::GitHub)
            .unwrap();

        assert!(output.contains(
            "::error file=src/Main.java,line=42,col=15,title=type-naming::class name `main` is not UpperCamelCase\n"
        ));
        assert!(output.starts_with("::warning file=src/App.java"));
    }

    #[test]
    fn test_empty_report() {
        let output = plain()
            .format_report(&ValidationReport::new(), OutputFormat::Human)
            .unwrap();
        assert!(output.contains("No style violations found"));

        let output = plain()
            .format_report(&ValidationReport::new(), OutputFormat::Text)
            .unwrap();
        assert!(output.is_empty());
        assert_eq!(
            plain().summary_line(&ValidationReport::new()),
            "0 files checked: 0 errors, 0 warnings"
        );
    }

    #[test]
    fn test_filtering_does_not_change_verdict() {
        let formatter = ReportFormatter::new(ReportOptions {
            min_severity: Some(Severity::Error),
            use_colors: false,
            ..Default::default()
        });
        let report = create_test_report();

        let output = formatter.format_report(&report, OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 1);
        assert_eq!(json["violations"][0]["rule_id"], "type-naming");

        let capped = ReportFormatter::new(ReportOptions {
            max_violations: Some(0),
            use_colors: false,
            ..Default::default()
        });
        let output = capped.format_report(&report, OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert!(json["violations"].as_array().unwrap().is_empty());
        assert_eq!(json["verdict"], "fail");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("SARIF".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("junit".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_github_escaping() {
        assert_eq!(escape_data("50%\nnext"), "50%25%0Anext");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }
}
