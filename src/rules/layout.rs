//! Line layout rules: length, indentation, trailing whitespace, final newline

use super::{Finding, RuleOutcome, StyleRule};
use crate::config::LayoutConfig;
use crate::source::SourceUnit;

/// Flags lines longer than the configured maximum
#[derive(Debug, Clone)]
pub struct LineLengthRule {
    max: usize,
}

impl LineLengthRule {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl StyleRule for LineLengthRule {
    fn id(&self) -> &str {
        "line-length"
    }

    fn description(&self) -> &str {
        "Lines must not exceed the configured maximum length"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        let findings = unit
            .numbered_lines()
            .filter_map(|(number, line)| {
                let length = line.chars().count();
                (length > self.max).then(|| {
                    Finding::at(
                        number,
                        self.max as u32 + 1,
                        format!("line is {length} characters long, limit is {}", self.max),
                    )
                    .with_suggestion("wrap the line")
                })
            })
            .collect();

        Ok(findings)
    }
}

/// Checks leading whitespace against the indentation step
#[derive(Debug, Clone)]
pub struct IndentationRule {
    width: usize,
    allow_tabs: bool,
}

impl IndentationRule {
    pub fn new(width: usize, allow_tabs: bool) -> Self {
        Self { width, allow_tabs }
    }

    pub fn from_config(layout: &LayoutConfig) -> Self {
        Self::new(layout.indent_width, layout.allow_tabs)
    }

    fn check_line(&self, number: u32, line: &str) -> Option<Finding> {
        let body = line.trim_start_matches([' ', '\t']);
        // Whitespace-only lines belong to trailing-whitespace
        if body.is_empty() {
            return None;
        }
        let indent = &line[..line.len() - body.len()];

        if let Some(tab) = indent.find('\t') {
            if !self.allow_tabs {
                return Some(
                    Finding::at(number, tab as u32 + 1, "tab used for indentation")
                        .with_suggestion(format!("indent with {} spaces", self.width)),
                );
            }
            return None;
        }

        // ` * text` continues a block comment and is aligned one past the opener
        if body.starts_with('*') {
            return None;
        }

        let spaces = indent.len();
        (spaces % self.width != 0).then(|| {
            Finding::at(
                number,
                1,
                format!(
                    "indentation of {spaces} spaces is not a multiple of {}",
                    self.width
                ),
            )
        })
    }
}

impl StyleRule for IndentationRule {
    fn id(&self) -> &str {
        "indentation"
    }

    fn description(&self) -> &str {
        "Indentation uses spaces in multiples of the configured width"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        Ok(unit
            .numbered_lines()
            .filter_map(|(number, line)| self.check_line(number, line))
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespaceRule;

impl StyleRule for TrailingWhitespaceRule {
    fn id(&self) -> &str {
        "trailing-whitespace"
    }

    fn description(&self) -> &str {
        "Lines must not end with spaces or tabs"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        let findings = unit
            .numbered_lines()
            .filter_map(|(number, line)| {
                let trimmed = line.trim_end_matches([' ', '\t']);
                (trimmed.len() != line.len()).then(|| {
                    Finding::at(
                        number,
                        trimmed.chars().count() as u32 + 1,
                        "trailing whitespace",
                    )
                    .with_suggestion("remove the trailing whitespace")
                })
            })
            .collect();

        Ok(findings)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FinalNewlineRule;

impl StyleRule for FinalNewlineRule {
    fn id(&self) -> &str {
        "final-newline"
    }

    fn description(&self) -> &str {
        "Non-empty files must end with a newline"
    }

    fn check(&self, unit: &SourceUnit) -> RuleOutcome {
        if unit.is_empty() || unit.ends_with_newline() {
            return Ok(Vec::new());
        }

        let last_line = unit.lines().len() as u32;
        let column = unit
            .line(last_line)
            .map(|line| line.chars().count() as u32 + 1)
            .unwrap_or(1);

        Ok(vec![Finding::at(last_line, column, "file does not end with a newline")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::violations::Location;
    use crate::source::{Language, SourceUnit};

    fn unit(text: &str) -> SourceUnit {
        SourceUnit::new("Sample.java", Language::CFamily, text, Vec::new())
    }

    #[test]
    fn test_long_line_reports_once_at_first_overflowing_column() {
        let text = format!("short\n{}\nshort\n", "x".repeat(145));
        let findings = LineLengthRule::new(140).check(&unit(&text)).unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location, Location::new(2, 141));
        assert!(findings[0].message.contains("145"));
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let text = format!("{}\n", "é".repeat(140));
        assert!(LineLengthRule::new(140).check(&unit(&text)).unwrap().is_empty());
    }

    #[test]
    fn test_indentation_multiples() {
        let rule = IndentationRule::new(4, false);
        let text = "class A {\n    int a;\n   int b;\n        int c;\n}\n";
        let findings = rule.check(&unit(text)).unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location, Location::new(3, 1));
    }

    #[test]
    fn test_tabs_rejected_unless_allowed() {
        let text = "class A {\n\tint a;\n}\n";

        let findings = IndentationRule::new(4, false).check(&unit(text)).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "tab used for indentation");

        assert!(IndentationRule::new(4, true).check(&unit(text)).unwrap().is_empty());
    }

    #[test]
    fn test_block_comment_continuation_is_exempt() {
        let text = "/**\n * Docs.\n */\nclass A {}\n";
        assert!(IndentationRule::new(4, false).check(&unit(text)).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_whitespace_column() {
        let findings = TrailingWhitespaceRule.check(&unit("int a; \t\nint b;\n   \n")).unwrap();

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].location, Location::new(1, 7));
        assert_eq!(findings[1].location, Location::new(3, 1));
    }

    #[test]
    fn test_final_newline() {
        let findings = FinalNewlineRule.check(&unit("a\nbc")).unwrap();
        assert_eq!(findings, vec![Finding::at(2, 3, "file does not end with a newline")]);

        assert!(FinalNewlineRule.check(&unit("a\n")).unwrap().is_empty());
        assert!(FinalNewlineRule.check(&unit("")).unwrap().is_empty());
    }
}
