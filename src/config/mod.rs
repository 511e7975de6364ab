//! Configuration loading and management for style-guard
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to typed settings with defaults for every section
//! - Built-in rule settings live next to the rule catalog, user rules are declared here
//! - Validation happens on load so misconfiguration stops the run before any file is read

use crate::domain::violations::{Severity, StyleGuardError, StyleGuardResult};
use crate::rules::catalog::BUILTIN_RULE_IDS;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file names searched for in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["style_guard.yaml", "style_guard.yml", ".style_guard.yaml"];

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Main configuration structure for style-guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuardConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    pub paths: PathConfig,
    /// Line layout settings
    pub layout: LayoutConfig,
    /// Naming convention settings
    pub naming: NamingConfig,
    /// Per-rule enable/severity overrides keyed by rule id
    pub rules: BTreeMap<String, RuleOverride>,
    /// User-defined regex rules, registered after the built-in ones
    pub custom_rules: Vec<PatternRule>,
}

/// Path filtering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    pub patterns: Vec<String>,
    /// Optional ignore file read from every analysis root
    pub ignore_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Longest allowed line, in characters
    pub max_line_length: usize,
    /// Indentation step in spaces
    pub indent_width: usize,
    /// Accept tabs in leading whitespace
    pub allow_tabs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub function_style: FunctionStyle,
}

/// Expected spelling of function and method names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FunctionStyle {
    /// snake_case for Rust, lowerCamelCase for everything else
    #[default]
    Auto,
    LowerCamel,
    SnakeCase,
}

/// Override for a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct RuleOverride {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub severity: Option<Severity>,
}

/// User-defined regex rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PatternRule {
    /// Unique identifier for this rule
    pub id: String,
    /// Short description shown by `rules` and `explain`
    #[serde(default)]
    pub description: Option<String>,
    /// The regex to match against file content
    pub pattern: String,
    /// Message for violations; `{match}` is replaced by the matched text
    pub message: String,
    /// Severity (Warning if not specified)
    pub severity: Option<Severity>,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Case sensitivity for the pattern
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Conditions that exclude matches from being violations
    pub exclude_if: Option<ExcludeConditions>,
}

/// Conditions that can exclude a match from being reported as a violation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExcludeConditions {
    /// Exclude if in test files
    #[serde(default)]
    pub in_tests: bool,
    /// Exclude if the file matches one of these globs
    pub file_patterns: Option<Vec<String>>,
}

impl PatternRule {
    /// Compile the pattern honouring `case_sensitive`
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
    }
}

impl StyleGuardConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StyleGuardResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            StyleGuardError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config = Self::parse_yaml(&contents).map_err(|e| {
            StyleGuardError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> StyleGuardResult<Self> {
        let config = Self::parse_yaml(content)
            .map_err(|e| StyleGuardError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    // An empty file is a valid, all-default configuration
    fn parse_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// First configuration file present in `dir`, if any
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> StyleGuardResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(StyleGuardError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        if self.layout.max_line_length == 0 {
            return Err(StyleGuardError::config("layout.max_line_length must be at least 1"));
        }
        if self.layout.indent_width == 0 {
            return Err(StyleGuardError::config("layout.indent_width must be at least 1"));
        }

        for rule in &self.custom_rules {
            if rule.id.trim().is_empty() {
                return Err(StyleGuardError::config("Custom rule with an empty id"));
            }
            rule.compile().map_err(|e| {
                StyleGuardError::config(format!(
                    "Invalid regex pattern in rule '{}': {}",
                    rule.id, e
                ))
            })?;
        }

        for id in self.rules.keys() {
            let known = BUILTIN_RULE_IDS.contains(&id.as_str())
                || self.custom_rules.iter().any(|rule| &rule.id == id);
            if !known {
                return Err(StyleGuardError::config(format!(
                    "Override for unknown rule '{id}'"
                )));
            }
        }

        for pattern in &self.paths.patterns {
            let body = pattern.trim_start_matches('!').trim_end_matches('/');
            glob::Pattern::new(body).map_err(|e| {
                StyleGuardError::config(format!("Invalid path pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Override for a rule id, if configured
    pub fn rule_override(&self, id: &str) -> Option<&RuleOverride> {
        self.rules.get(id)
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> StyleGuardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StyleGuardError::config(format!("Failed to serialize config: {e}")))
    }

    /// Stable fingerprint of the configuration, echoed in machine-readable reports
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.paths.patterns.hash(&mut hasher);
        self.paths.ignore_file.hash(&mut hasher);

        self.layout.max_line_length.hash(&mut hasher);
        self.layout.indent_width.hash(&mut hasher);
        self.layout.allow_tabs.hash(&mut hasher);
        self.naming.function_style.hash(&mut hasher);

        // BTreeMap iterates in key order
        for (id, rule_override) in &self.rules {
            id.hash(&mut hasher);
            rule_override.hash(&mut hasher);
        }
        self.custom_rules.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }
}

impl Default for StyleGuardConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            layout: LayoutConfig::default(),
            naming: NamingConfig::default(),
            rules: BTreeMap::new(),
            custom_rules: Vec::new(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "target/".to_string(),
                "**/node_modules/".to_string(),
                "**/.git/".to_string(),
                "**/build/".to_string(),
                "**/*.generated.*".to_string(),
            ],
            ignore_file: Some(".styleguardignore".to_string()),
        }
    }
}

impl Default for RuleOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_line_length: 140,
            indent_width: 4,
            allow_tabs: false,
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            function_style: FunctionStyle::Auto,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: StyleGuardConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: StyleGuardConfig::default(),
        }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Set the ignore file name
    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    pub fn max_line_length(mut self, max: usize) -> Self {
        self.config.layout.max_line_length = max;
        self
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.config.layout.indent_width = width;
        self
    }

    pub fn allow_tabs(mut self, allow: bool) -> Self {
        self.config.layout.allow_tabs = allow;
        self
    }

    pub fn function_style(mut self, style: FunctionStyle) -> Self {
        self.config.naming.function_style = style;
        self
    }

    /// Disable a rule by id
    pub fn disable_rule(mut self, id: impl Into<String>) -> Self {
        self.config.rules.entry(id.into()).or_default().enabled = false;
        self
    }

    /// Change the severity a rule reports at
    pub fn rule_severity(mut self, id: impl Into<String>, severity: Severity) -> Self {
        self.config.rules.entry(id.into()).or_default().severity = Some(severity);
        self
    }

    /// Add a user-defined regex rule
    pub fn add_custom_rule(mut self, rule: PatternRule) -> Self {
        self.config.custom_rules.push(rule);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> StyleGuardResult<StyleGuardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn custom(id: &str, pattern: &str) -> PatternRule {
        PatternRule {
            id: id.to_string(),
            description: None,
            pattern: pattern.to_string(),
            message: "found {match}".to_string(),
            severity: None,
            enabled: true,
            case_sensitive: true,
            exclude_if: None,
        }
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = StyleGuardConfig::load_from_str("{}").unwrap();

        assert_eq!(config, StyleGuardConfig::default());
        assert_eq!(config.layout.max_line_length, 140);
        assert_eq!(config.layout.indent_width, 4);
        assert_eq!(config.naming.function_style, FunctionStyle::Auto);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
version: "1.0"
layout:
  max_line_length: 100
  allow_tabs: true
naming:
  function_style: snake_case
rules:
  line-length:
    severity: error
  doc-comment-required:
    enabled: false
custom_rules:
  - id: no-println
    pattern: 'println!\('
    message: "Use tracing instead of {match}"
    exclude_if:
      in_tests: true
"#;

        let config = StyleGuardConfig::load_from_str(yaml).unwrap();

        assert_eq!(config.layout.max_line_length, 100);
        assert_eq!(config.layout.indent_width, 4);
        assert!(config.layout.allow_tabs);
        assert_eq!(config.naming.function_style, FunctionStyle::SnakeCase);
        assert_eq!(
            config.rule_override("line-length").unwrap().severity,
            Some(Severity::Error)
        );
        assert!(config.rule_override("line-length").unwrap().enabled);
        assert!(!config.rule_override("doc-comment-required").unwrap().enabled);
        assert_eq!(config.custom_rules.len(), 1);
        assert!(config.custom_rules[0].case_sensitive);
        assert!(config.custom_rules[0].exclude_if.as_ref().unwrap().in_tests);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let err = StyleGuardConfig::load_from_str("version: \"2.0\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = ConfigBuilder::new()
            .add_custom_rule(custom("broken", "(unclosed"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_override_for_unknown_rule_is_rejected() {
        let err = StyleGuardConfig::load_from_str("rules:\n  no-such-rule:\n    enabled: false\n")
            .unwrap_err();
        assert!(err.to_string().contains("no-such-rule"));

        let config = ConfigBuilder::new()
            .add_custom_rule(custom("no-println", "println!"))
            .rule_severity("no-println", Severity::Error)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_zero_layout_values_are_rejected() {
        assert!(ConfigBuilder::new().max_line_length(0).build().is_err());
        assert!(ConfigBuilder::new().indent_width(0).build().is_err());
    }

    #[test]
    fn test_to_json_preserves_settings() {
        let config = ConfigBuilder::new()
            .max_line_length(100)
            .disable_rule("doc-comment-required")
            .add_custom_rule(custom("no-todo", "TODO"))
            .build()
            .unwrap();

        let json = config.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["layout"]["max_line_length"], 100);
        assert_eq!(value["rules"]["doc-comment-required"]["enabled"], false);
        assert_eq!(value["custom_rules"][0]["id"], "no-todo");

        let decoded: StyleGuardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let a = StyleGuardConfig::default();
        let b = StyleGuardConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let changed = ConfigBuilder::new().max_line_length(80).build().unwrap();
        assert_ne!(a.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_load_and_discover_from_directory() {
        let dir = TempDir::new().unwrap();
        assert!(StyleGuardConfig::discover(dir.path()).is_none());

        let path = dir.path().join("style_guard.yml");
        fs::write(&path, "layout:\n  indent_width: 2\n").unwrap();

        let found = StyleGuardConfig::discover(dir.path()).unwrap();
        assert_eq!(found, path);

        let config = StyleGuardConfig::load_from_file(&found).unwrap();
        assert_eq!(config.layout.indent_width, 2);
    }

    #[test]
    fn test_blank_document_uses_defaults() {
        assert_eq!(StyleGuardConfig::load_from_str("\n").unwrap(), StyleGuardConfig::default());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = StyleGuardConfig::load_from_file("/nonexistent/style_guard.yaml").unwrap_err();
        assert!(matches!(err, StyleGuardError::Configuration { .. }));
    }

    #[test]
    fn test_case_insensitive_compile() {
        let mut rule = custom("shout", "todo");
        rule.case_sensitive = false;
        assert!(rule.compile().unwrap().is_match("TODO"));
    }
}
