//! Source model adapter: turns raw file text into a `SourceUnit`
//!
//! Architecture: Anti-Corruption Layer - Frontends translate language syntax into one model
//! - Every frontend implements `SourceParser` and produces the same `SourceUnit` shape
//! - Rules only ever see lines and declarations, never a language-specific tree
//! - Parse failures carry a location so they can be reported like any other finding

pub mod lexer;
pub mod rust;

use crate::domain::violations::Location;
use std::fmt;
use std::path::{Path, PathBuf};

pub use lexer::CFamilyParser;
pub use rust::RustParser;

/// Language family a file is parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Rust sources, parsed with `syn`
    Rust,
    /// Curly-brace languages (Java, Kotlin, C#, C/C++, JS/TS, Go, Swift, ...)
    CFamily,
    /// Anything else; only line based rules apply
    PlainText,
}

const C_FAMILY_EXTENSIONS: &[&str] = &[
    "java", "kt", "kts", "cs", "c", "h", "cc", "cpp", "cxx", "hpp", "hh", "js", "jsx", "mjs",
    "ts", "tsx", "go", "swift", "scala", "dart", "groovy", "gradle",
];

impl Language {
    /// Detect the language from the file extension
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("rs") => Self::Rust,
            Some(ext) if C_FAMILY_EXTENSIONS.contains(&ext) => Self::CFamily,
            _ => Self::PlainText,
        }
    }

    /// Whether directory discovery should pick up files of this language
    pub fn is_source(self) -> bool {
        !matches!(self, Self::PlainText)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::CFamily => "c-family",
            Self::PlainText => "text",
        }
    }
}

/// Kind of a named declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// Class, interface, struct, enum, trait, record, ...
    Type,
    /// Function or method
    Function,
    /// Compile-time constant or static
    Constant,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Function => "function",
            Self::Constant => "constant",
        }
    }
}

/// A named declaration found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Keyword that introduced the declaration (`class`, `fn`, `interface`, ...)
    pub keyword: String,
    pub name: String,
    /// Location of the name token
    pub location: Location,
    pub is_public: bool,
    /// Whether a doc comment directly precedes the declaration
    pub has_doc: bool,
}

/// Structured representation of a single file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    language: Language,
    lines: Vec<String>,
    declarations: Vec<Declaration>,
    ends_with_newline: bool,
}

impl SourceUnit {
    /// Build a unit from raw text; declarations are supplied by the frontend
    pub fn new(
        path: impl Into<PathBuf>,
        language: Language,
        text: &str,
        declarations: Vec<Declaration>,
    ) -> Self {
        let lines = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            path: path.into(),
            language,
            lines,
            declarations,
            ends_with_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Lines without their terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines paired with their 1-based line number
    pub fn numbered_lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx as u32 + 1, line.as_str()))
    }

    /// Text of a 1-based line, if present
    pub fn line(&self, number: u32) -> Option<&str> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.lines.get(idx).map(String::as_str)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn ends_with_newline(&self) -> bool {
        self.ends_with_newline
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Failure to turn source text into a `SourceUnit`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {location}")]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            location: Location::new(line, column),
        }
    }
}

/// A frontend that parses one language family
pub trait SourceParser: Send + Sync {
    /// Parse the text of `path` into a source unit
    fn parse(&self, path: &Path, text: &str) -> Result<SourceUnit, ParseError>;
}

/// Frontend for files without a known grammar: keeps the lines, finds no declarations
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextParser;

impl SourceParser for PlainTextParser {
    fn parse(&self, path: &Path, text: &str) -> Result<SourceUnit, ParseError> {
        Ok(SourceUnit::new(path, Language::PlainText, text, Vec::new()))
    }
}

/// Parse `text` with the frontend matching the extension of `path`
pub fn parse(path: &Path, text: &str) -> Result<SourceUnit, ParseError> {
    match Language::from_path(path) {
        Language::Rust => RustParser.parse(path, text),
        Language::CFamily => CFamilyParser.parse(path, text),
        Language::PlainText => PlainTextParser.parse(path, text),
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
