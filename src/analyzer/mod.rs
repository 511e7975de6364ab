//! Main analysis orchestrator for style-guard
//!
//! CDD Principle: Domain Services - Analyzer orchestrates the read, parse, evaluate pipeline
//! - Coordinates path discovery, source parsing, rule evaluation and report aggregation
//! - Turns unreadable and unparsable files into violations instead of aborting the run
//! - Processes independent files in parallel and restores a deterministic order at the end

pub mod evaluator;
pub mod path_filter;

use crate::config::StyleGuardConfig;
use crate::domain::violations::{
    Severity, StyleGuardResult, ValidationReport, Violation, PARSE_ERROR_RULE_ID,
    READ_ERROR_RULE_ID,
};
use crate::rules::{build_registry, catalog, RuleRegistry};
use crate::source::{self, Language};
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

pub use evaluator::RuleEvaluator;
pub use path_filter::{Discovery, PathFilter, WalkFailure};

/// Main analyzer that orchestrates the entire validation process
pub struct Analyzer {
    /// Configuration for this analysis
    config: StyleGuardConfig,
    /// Rules applied to every file
    registry: RuleRegistry,
    /// Path filter for directory discovery
    path_filter: PathFilter,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of files to analyze
    pub max_files: Option<usize>,
    /// Additional patterns to exclude, applied to explicit files too
    pub exclude_patterns: Vec<String>,
    /// Whether to skip reading ignore files
    pub ignore_ignore_files: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            exclude_patterns: Vec::new(),
            ignore_ignore_files: false,
        }
    }
}

impl Analyzer {
    /// Create an analyzer whose registry is built from the configuration
    pub fn new(config: StyleGuardConfig) -> StyleGuardResult<Self> {
        let registry = build_registry(&config)?;
        Self::with_registry(config, registry)
    }

    /// Create an analyzer with an explicitly assembled registry
    pub fn with_registry(config: StyleGuardConfig, registry: RuleRegistry) -> StyleGuardResult<Self> {
        let path_filter = PathFilter::new(
            config.paths.patterns.clone(),
            config.paths.ignore_file.clone(),
        )?;

        Ok(Self {
            config,
            registry,
            path_filter,
        })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> StyleGuardResult<Self> {
        Self::new(StyleGuardConfig::default())
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StyleGuardConfig {
        &self.config
    }

    /// Parse `text` as the file at `path` and evaluate every rule against it
    pub fn analyze_source(&self, path: &Path, text: &str) -> Vec<Violation> {
        self.analyze_source_with(path, text, RuleEvaluator::default())
    }

    fn analyze_source_with(&self, path: &Path, text: &str, evaluator: RuleEvaluator) -> Vec<Violation> {
        match source::parse(path, text) {
            Ok(unit) => evaluator.evaluate(&self.registry, &unit),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                vec![Violation::new(
                    PARSE_ERROR_RULE_ID,
                    Severity::Error,
                    path.to_path_buf(),
                    format!(
                        "failed to parse {} source: {}",
                        Language::from_path(path),
                        e.message
                    ),
                )
                .at(e.location)]
            }
        }
    }

    /// Analyze a single file; read and parse failures are reported as violations
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> Vec<Violation> {
        self.analyze_file_with(file_path.as_ref(), RuleEvaluator::default())
    }

    fn analyze_file_with(&self, file_path: &Path, evaluator: RuleEvaluator) -> Vec<Violation> {
        tracing::debug!("Analyzing {}", file_path.display());

        let content = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", file_path.display(), e);
                return vec![Violation::new(
                    READ_ERROR_RULE_ID,
                    Severity::Error,
                    file_path.to_path_buf(),
                    format!("failed to read file: {e}"),
                )];
            }
        };

        self.analyze_source_with(file_path, &content, evaluator)
    }

    /// Resolve the files to analyze: explicit files are kept, directories are walked.
    ///
    /// Entries the walk could not read are returned alongside the files.
    pub fn collect_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> StyleGuardResult<Discovery> {
        let mut exclusions = PathFilter::allow_all();
        for pattern in &options.exclude_patterns {
            exclusions.add_pattern(pattern)?;
        }

        let mut walker = self.path_filter.clone();
        if options.ignore_ignore_files {
            walker = walker.without_ignore_files();
        }
        for pattern in &options.exclude_patterns {
            walker.add_pattern(pattern)?;
        }

        let mut collected = Discovery::default();
        for path in paths {
            let path = path.as_ref();

            if path.is_dir() {
                let discovered = walker.find_files(path)?;
                tracing::debug!(
                    "Discovered {} files under {}",
                    discovered.files.len(),
                    path.display()
                );
                collected.files.extend(
                    discovered
                        .files
                        .into_iter()
                        .filter(|file| Language::from_path(file).is_source()),
                );
                collected.failures.extend(discovered.failures);
            } else if exclusions.should_analyze(path, false) {
                // Missing paths are kept so they surface as read errors
                collected.files.push(path.to_path_buf());
            }
        }

        let mut files: Vec<PathBuf> = collected.files.iter().map(|f| normalize(f)).collect();
        files.sort();
        files.dedup();

        if let Some(max_files) = options.max_files {
            files.truncate(max_files);
        }

        collected.files = files;
        Ok(collected)
    }

    /// Analyze multiple paths and return a finalized validation report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> StyleGuardResult<ValidationReport> {
        let start_time = Instant::now();
        let discovery = self.collect_files(paths, options)?;
        let mut report = self.analyze_discovery(discovery, options);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        Ok(report)
    }

    fn analyze_discovery(&self, discovery: Discovery, options: &AnalysisOptions) -> ValidationReport {
        let Discovery { files, failures } = discovery;
        let total_files = files.len();

        let violations = if options.parallel && files.len() > 1 {
            self.analyze_files_parallel(&files)
        } else {
            self.analyze_files_sequential(&files, options.parallel)
        };

        let mut report = ValidationReport::new();
        for failure in failures {
            report.add_violation(Violation::new(
                READ_ERROR_RULE_ID,
                Severity::Error,
                failure.path,
                format!("failed to read directory entry: {}", failure.message),
            ));
        }
        for violation in violations {
            report.add_violation(violation);
        }

        report.set_files_analyzed(total_files);
        report.set_config_fingerprint(self.config.fingerprint());
        report.finalize();

        tracing::debug!(
            "Analyzed {} files: {} errors, {} warnings",
            total_files,
            report.summary.violations_by_severity.error,
            report.summary.violations_by_severity.warning
        );

        report
    }

    fn analyze_files_sequential(&self, files: &[PathBuf], parallel_rules: bool) -> Vec<Violation> {
        let evaluator = RuleEvaluator::new(parallel_rules);
        files
            .iter()
            .flat_map(|file_path| self.analyze_file_with(file_path, evaluator))
            .collect()
    }

    fn analyze_files_parallel(&self, files: &[PathBuf]) -> Vec<Violation> {
        // Files already saturate the pool; rules run in order within each file
        let evaluator = RuleEvaluator::new(false);
        files
            .par_iter()
            .flat_map_iter(|file_path| self.analyze_file_with(file_path, evaluator))
            .collect()
    }

    /// Analyze a directory tree and return a validation report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> StyleGuardResult<ValidationReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }

    /// Get configuration fingerprint
    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    /// Statistics about the configured rules
    pub fn rule_stats(&self) -> StyleGuardResult<RuleStats> {
        let mut stats = RuleStats::default();
        for entry in catalog::catalog(&self.config)? {
            if entry.enabled {
                stats.enabled_rules += 1;
            } else {
                stats.disabled_rules += 1;
            }
        }
        stats.custom_rules = self.config.custom_rules.len();
        stats.registered_rules = self.registry.len();
        Ok(stats)
    }
}

/// Drop `.` components so `./a.rs` and `a.rs` name the same file
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        normalized
    }
}

/// Statistics about configured rules
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleStats {
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    pub custom_rules: usize,
    pub registered_rules: usize,
}

impl RuleStats {
    pub fn total_rules(&self) -> usize {
        self.enabled_rules + self.disabled_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::domain::violations::Verdict;
    use crate::rules::{RuleOutcome, StyleRule};
    use crate::source::SourceUnit;
    use tempfile::TempDir;

    struct AlwaysPanics;

    impl StyleRule for AlwaysPanics {
        fn id(&self) -> &str {
            "always-panics"
        }

        fn description(&self) -> &str {
            "panics on every file"
        }

        fn check(&self, _unit: &SourceUnit) -> RuleOutcome {
            panic!("boom")
        }
    }

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_long_line_yields_one_warning() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let file = write(
            temp_dir.path(),
            "src/main.rs",
            &format!("// {}\nfn main() {{}}\n", "x".repeat(142)),
        );

        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_paths(&[&file], &AnalysisOptions::default())?;

        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.rule_id, "line-length");
        assert_eq!(violation.severity, Severity::Warning);
        assert_eq!(violation.location.line, 1);
        assert_eq!(report.verdict(), Verdict::Pass);
        Ok(())
    }

    #[test]
    fn test_lowercase_class_fails_the_run() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        write(root, "src/Good.java", "class Good {\n}\n");
        write(root, "src/Bad.java", "class bad {\n}\n");

        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_directory(root, &AnalysisOptions::default())?;

        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "type-naming");
        assert!(report.violations[0].file_path.ends_with("src/Bad.java"));
        assert_eq!(report.verdict().exit_code(), 1);
        Ok(())
    }

    #[test]
    fn test_crashing_rule_reports_once_per_file() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        write(root, "a.rs", "fn main() {}  \n");
        write(root, "b.rs", "fn helper() {}  \n");

        let mut registry = build_registry(&StyleGuardConfig::default())?;
        registry.register(Box::new(AlwaysPanics))?;
        let analyzer = Analyzer::with_registry(StyleGuardConfig::default(), registry)?;

        let report = analyzer.analyze_directory(root, &AnalysisOptions::default())?;

        let crashes: Vec<_> = report
            .violations
            .iter()
            .filter(|v| v.rule_id == "always-panics")
            .collect();
        assert_eq!(crashes.len(), 2);
        assert!(crashes.iter().all(|v| v.severity == Severity::Error));

        let trailing = report
            .violations
            .iter()
            .filter(|v| v.rule_id == "trailing-whitespace")
            .count();
        assert_eq!(trailing, 2);
        Ok(())
    }

    #[test]
    fn test_parse_error_skips_rules_for_that_file_only() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        write(root, "Broken.java", "class Broken {\n    void run() {\n}\n");
        write(root, "lower.java", "class lower {\n}\n");

        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_directory(root, &AnalysisOptions::default())?;

        let ids: Vec<&str> = report.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec![PARSE_ERROR_RULE_ID, "type-naming"]);
        assert_eq!(report.violations[0].severity, Severity::Error);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_read_error() -> StyleGuardResult<()> {
        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_paths(
            &[Path::new("/nonexistent/Missing.java")],
            &AnalysisOptions::default(),
        )?;

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, READ_ERROR_RULE_ID);
        assert_eq!(report.verdict(), Verdict::Fail);
        Ok(())
    }

    #[test]
    fn test_empty_registry_reports_nothing() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let file = write(temp_dir.path(), "bad.rs", "struct lower;\t \n");

        let analyzer = Analyzer::with_registry(StyleGuardConfig::default(), RuleRegistry::new())?;
        let report = analyzer.analyze_paths(&[&file], &AnalysisOptions::default())?;

        assert!(!report.has_violations());
        assert_eq!(report.summary.total_files, 1);
        Ok(())
    }

    #[test]
    fn test_analysis_options() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        write(root, "src/a.rs", "fn a() {}\n");
        write(root, "src/b.rs", "fn b() {}\n");
        write(root, "src/gen/c.rs", "fn c() {}\n");
        write(root, "README.md", "# readme\n");
        write(root, "target/debug/d.rs", "fn d() {}\n");

        let analyzer = Analyzer::with_defaults()?;

        let all = analyzer.collect_files(&[root], &AnalysisOptions::default())?;
        assert_eq!(all.files.len(), 3);
        assert!(all.failures.is_empty());

        let options = AnalysisOptions {
            max_files: Some(1),
            ..Default::default()
        };
        assert_eq!(analyzer.analyze_directory(root, &options)?.summary.total_files, 1);

        let options = AnalysisOptions {
            exclude_patterns: vec!["gen/".to_string()],
            ..Default::default()
        };
        assert_eq!(analyzer.collect_files(&[root], &options)?.files.len(), 2);
        Ok(())
    }

    #[test]
    fn test_explicit_files_bypass_path_filter() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let file = write(temp_dir.path(), "notes.txt", "trailing \n");

        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_paths(&[&file], &AnalysisOptions::default())?;
        assert_eq!(report.violations.len(), 1);

        let options = AnalysisOptions {
            exclude_patterns: vec!["*.txt".to_string()],
            ..Default::default()
        };
        assert!(analyzer.collect_files(&[&file], &options)?.files.is_empty());
        Ok(())
    }

    #[test]
    fn test_parallel_and_sequential_agree() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        for idx in 0..6 {
            write(
                root,
                &format!("src/File{idx}.java"),
                &format!("class file{idx} {{\n   int x; \n}}"),
            );
        }

        let analyzer = Analyzer::with_defaults()?;
        let parallel = analyzer.analyze_directory(root, &AnalysisOptions::default())?;
        let sequential = analyzer.analyze_directory(
            root,
            &AnalysisOptions {
                parallel: false,
                ..Default::default()
            },
        )?;

        assert_eq!(parallel.violations, sequential.violations);
        Ok(())
    }

    #[test]
    fn test_walk_failures_become_read_errors() -> StyleGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let file = write(temp_dir.path(), "Good.java", "class Good {\n}\n");
        let vanished = temp_dir.path().join("vanished");

        let mut discovery = PathFilter::allow_all().find_files(&vanished)?;
        assert_eq!(discovery.failures.len(), 1);
        discovery.files.push(file);

        let analyzer = Analyzer::with_defaults()?;
        let report = analyzer.analyze_discovery(discovery, &AnalysisOptions::default());

        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.rule_id, READ_ERROR_RULE_ID);
        assert_eq!(violation.severity, Severity::Error);
        assert_eq!(violation.file_path, vanished);
        assert!(violation.message.starts_with("failed to read directory entry: "));
        assert_eq!(report.summary.total_files, 1);
        assert_eq!(report.verdict(), Verdict::Fail);
        Ok(())
    }

    #[test]
    fn test_equivalent_paths_are_analyzed_once() -> StyleGuardResult<()> {
        let dotted = Path::new("./missing/Gone.java");
        let plain = Path::new("missing/Gone.java");

        let analyzer = Analyzer::with_defaults()?;
        let collected = analyzer.collect_files(&[dotted, plain], &AnalysisOptions::default())?;
        assert_eq!(collected.files, vec![plain.to_path_buf()]);

        let report = analyzer.analyze_paths(&[dotted, plain], &AnalysisOptions::default())?;
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, READ_ERROR_RULE_ID);
        assert_eq!(report.summary.total_files, 1);
        Ok(())
    }

    #[test]
    fn test_rule_stats() -> StyleGuardResult<()> {
        let config = ConfigBuilder::new().disable_rule("final-newline").build()?;
        let analyzer = Analyzer::new(config)?;
        let stats = analyzer.rule_stats()?;

        assert_eq!(stats.total_rules(), 8);
        assert_eq!(stats.disabled_rules, 1);
        assert_eq!(stats.registered_rules, 7);
        Ok(())
    }
}
