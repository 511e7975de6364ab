//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter owns the include/exclude decision
//! - Patterns are evaluated in order, the last matching pattern wins (`!` re-includes)
//! - A directory that is excluded prunes its whole subtree during discovery
//! - The ignore file at the root of each walked directory extends the configured patterns

use crate::domain::violations::{StyleGuardError, StyleGuardResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Include/exclude patterns
    patterns: Vec<FilterPattern>,
    /// Name of the ignore file read from each walk root, if any
    ignore_filename: Option<String>,
}

/// Result of walking a directory tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Files that passed the filter, sorted by path
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read
    pub failures: Vec<WalkFailure>,
}

/// A directory entry that could not be visited during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFailure {
    pub path: PathBuf,
    pub message: String,
}

/// A single path filter pattern
#[derive(Debug, Clone)]
struct FilterPattern {
    pattern: glob::Pattern,
    /// `!pattern` re-includes what an earlier pattern excluded
    is_include: bool,
    /// `pattern/` only matches directories
    dir_only: bool,
    /// Patterns with a `/` match the relative path, others only the file name
    match_full_path: bool,
}

impl FilterPattern {
    fn parse(raw: &str) -> StyleGuardResult<Self> {
        let (is_include, rest) = match raw.strip_prefix('!') {
            Some(stripped) => (true, stripped),
            None => (false, raw),
        };
        let dir_only = rest.ends_with('/');
        let rest = rest.trim_end_matches('/');
        let anchored = rest.starts_with('/');
        let rest = rest.trim_start_matches('/');

        let pattern = glob::Pattern::new(rest)
            .map_err(|e| StyleGuardError::pattern(format!("Invalid pattern '{raw}': {e}")))?;

        Ok(Self {
            pattern,
            is_include,
            dir_only,
            match_full_path: anchored || rest.contains('/'),
        })
    }

    fn matches(&self, relative: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        if self.match_full_path {
            self.pattern.matches(relative)
        } else {
            let name = relative.rsplit('/').next().unwrap_or(relative);
            self.pattern.matches(name)
        }
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> StyleGuardResult<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| FilterPattern::parse(raw))
            .collect::<StyleGuardResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            ignore_filename: ignore_filename.filter(|name| !name.is_empty()),
        })
    }

    /// Filter with no patterns and no ignore file: accepts everything
    pub fn allow_all() -> Self {
        Self {
            patterns: Vec::new(),
            ignore_filename: None,
        }
    }

    /// Stop reading ignore files during discovery
    pub fn without_ignore_files(mut self) -> Self {
        self.ignore_filename = None;
        self
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: impl AsRef<str>) -> StyleGuardResult<()> {
        self.patterns.push(FilterPattern::parse(pattern.as_ref())?);
        Ok(())
    }

    /// Whether a path, relative to the analysis root, passes the filter.
    ///
    /// A path is rejected when it or any of its parent directories is excluded.
    pub fn should_analyze(&self, relative: &Path, is_dir: bool) -> bool {
        let normalized = normalize(relative);
        if normalized.is_empty() {
            return true;
        }

        let mut prefix = String::new();
        let components: Vec<&str> = normalized.split('/').collect();
        for (idx, component) in components.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);

            let last = idx + 1 == components.len();
            if self.is_excluded(&prefix, !last || is_dir) {
                return false;
            }
        }
        true
    }

    fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        let mut excluded = false;
        for pattern in &self.patterns {
            if pattern.matches(relative, is_dir) {
                excluded = !pattern.is_include;
            }
        }
        excluded
    }

    /// Load patterns from an ignore file; invalid lines are skipped with a warning
    fn load_ignore_file(&self, path: &Path) -> StyleGuardResult<Vec<FilterPattern>> {
        let content = fs::read_to_string(path).map_err(|e| {
            StyleGuardError::config(format!(
                "Failed to read ignore file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut patterns = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match FilterPattern::parse(line) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => tracing::warn!("Skipping pattern in {}: {}", path.display(), e),
            }
        }

        Ok(patterns)
    }

    /// All files under `root` that pass the filter, plus the entries that could not be read
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> StyleGuardResult<Discovery> {
        let root = root.as_ref();

        let mut filter = self.clone();
        if let Some(name) = &self.ignore_filename {
            let ignore_file = root.join(name);
            if ignore_file.is_file() {
                let extra = self.load_ignore_file(&ignore_file)?;
                tracing::debug!(
                    "Loaded {} patterns from {}",
                    extra.len(),
                    ignore_file.display()
                );
                filter.patterns.extend(extra);
            }
        }

        let mut discovery = Discovery::default();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry.path().strip_prefix(root).is_ok_and(|relative| {
                        filter.should_analyze(relative, entry.file_type().is_dir())
                    })
            });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => discovery.files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    tracing::warn!("Unreadable entry {}: {}", path.display(), e);
                    discovery.failures.push(WalkFailure {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(discovery)
    }
}

fn normalize(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let mut trimmed = text.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_matches('/').to_string()
}
