//! Naming convention rules for types, functions and constants

use super::{Finding, RuleOutcome, StyleRule};
use crate::config::FunctionStyle;
use crate::domain::violations::Severity;
use crate::source::{Declaration, DeclarationKind, Language, SourceUnit};

/// Type names must be UpperCamelCase
#[derive(Debug, Clone, Default)]
pub struct TypeNamingRule;

impl StyleRule for TypeNamingRule {
    fn id(&self) -> &str {
        "type-naming"
    }

    fn description(&self) -> &str {
        "Class, interface, struct, enum and trait names must be UpperCamelCase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        Ok(declarations_of(unit, DeclarationKind::Type)
            .filter(|decl| !is_upper_camel(&decl.name))
            .map(|decl| {
                misnamed(decl, "UpperCamelCase", to_upper_camel(&decl.name))
            })
            .collect())
    }
}

/// Function names follow the configured style
#[derive(Debug, Clone, Default)]
pub struct FunctionNamingRule {
    style: FunctionStyle,
}

impl FunctionNamingRule {
    pub fn new(style: FunctionStyle) -> Self {
        Self { style }
    }

    fn accepts(&self, unit: &SourceUnit, name: &str) -> (bool, &'static str) {
        match self.style {
            FunctionStyle::SnakeCase => (is_snake_case(name), "snake_case"),
            FunctionStyle::LowerCamel => (is_lower_camel(name), "lowerCamelCase"),
            FunctionStyle::Auto if unit.language() == Language::Rust => {
                (is_snake_case(name), "snake_case")
            }
            // Go exports and C# methods are capitalised by convention
            FunctionStyle::Auto if capitalised_methods(unit) => (
                is_lower_camel(name) || is_upper_camel(name),
                "camelCase",
            ),
            FunctionStyle::Auto => (is_lower_camel(name), "lowerCamelCase"),
        }
    }
}

fn capitalised_methods(unit: &SourceUnit) -> bool {
    matches!(
        unit.path().extension().and_then(|ext| ext.to_str()),
        Some("go") | Some("cs")
    )
}

impl StyleRule for FunctionNamingRule {
    fn id(&self) -> &str {
        "function-naming"
    }

    fn description(&self) -> &str {
        "Function names follow the configured naming style"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        let mut findings = Vec::new();
        for decl in declarations_of(unit, DeclarationKind::Function) {
            let (accepted, style) = self.accepts(unit, &decl.name);
            if accepted {
                continue;
            }
            let suggestion = if style == "snake_case" {
                to_snake_case(&decl.name)
            } else {
                to_lower_camel(&decl.name)
            };
            findings.push(misnamed(decl, style, suggestion));
        }
        Ok(findings)
    }
}

/// Constants must be SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Default)]
pub struct ConstantNamingRule;

impl StyleRule for ConstantNamingRule {
    fn id(&self) -> &str {
        "constant-naming"
    }

    fn description(&self) -> &str {
        "Constants must be SCREAMING_SNAKE_CASE"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        Ok(declarations_of(unit, DeclarationKind::Constant)
            .filter(|decl| !is_screaming_snake(&decl.name))
            .map(|decl| {
                misnamed(
                    decl,
                    "SCREAMING_SNAKE_CASE",
                    to_snake_case(&decl.name).to_uppercase(),
                )
            })
            .collect())
    }
}

fn declarations_of(
    unit: &SourceUnit,
    kind: DeclarationKind,
) -> impl Iterator<Item = &Declaration> {
    unit.declarations().iter().filter(move |decl| decl.kind == kind)
}

fn misnamed(decl: &Declaration, style: &str, suggestion: String) -> Finding {
    Finding::new(
        decl.location,
        format!("{} name `{}` is not {style}", decl.keyword, decl.name),
    )
    .with_suggestion(format!("rename to `{suggestion}`"))
}

pub fn is_upper_camel(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub fn is_lower_camel(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Lowercase words joined by single underscores; leading underscores mark unused items
pub fn is_snake_case(name: &str) -> bool {
    let body = name.trim_start_matches('_');
    !body.is_empty()
        && body
            .split('_')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
        && body.starts_with(|c: char| c.is_ascii_lowercase())
}

pub fn is_screaming_snake(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name
            .split('_')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
}

/// Split an identifier into lowercase words on underscores and case changes
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    for part in name.split(|c: char| c == '_' || c == '-') {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();
        for (idx, &c) in chars.iter().enumerate() {
            let boundary = c.is_uppercase()
                && idx > 0
                && (chars[idx - 1].is_lowercase()
                    || chars[idx - 1].is_ascii_digit()
                    || chars.get(idx + 1).is_some_and(|next| next.is_lowercase()));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn to_upper_camel(name: &str) -> String {
    words(name).iter().map(|word| capitalize(word)).collect()
}

pub fn to_lower_camel(name: &str) -> String {
    let words = words(name);
    let mut out = String::new();
    for (idx, word) in words.iter().enumerate() {
        if idx == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn to_snake_case(name: &str) -> String {
    words(name).join("_")
}
