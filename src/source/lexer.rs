//! Lightweight frontend for curly-brace languages
//!
//! The lexer understands just enough of Java, Kotlin, C#, C/C++, JS/TS, Go, Swift and friends
//! to skip comments and literals, check that delimiters balance and pick out named
//! declarations. It is not a grammar; anything it cannot classify is ignored.

use super::{Declaration, DeclarationKind, Language, ParseError, SourceParser, SourceUnit};
use crate::domain::violations::Location;
use std::collections::HashSet;
use std::path::Path;

const TYPE_KEYWORDS: &[&str] = &[
    "class", "interface", "struct", "enum", "record", "trait", "object", "protocol", "union",
];

const FUNCTION_KEYWORDS: &[&str] = &["fun", "func", "function", "def", "fn"];

const PUBLIC_MODIFIERS: &[&str] = &["public", "export", "pub", "open"];

/// Identifiers that look like a call target but never name a function
const NOT_FUNCTION_NAMES: &[&str] = &[
    "if", "while", "for", "foreach", "switch", "catch", "synchronized", "using", "lock", "when",
    "return", "sizeof", "typeof", "match", "fixed", "checked", "unchecked", "with", "elif",
    "assert", "throw", "new", "super", "this", "else", "do", "try", "guard", "defer",
];

/// Tokens that, directly before `name(`, mean the name is being called rather than declared
const CALL_PREFIXES: &[&str] = &[
    "new", "return", "throw", "else", "case", "await", "yield", "in", "of", "typeof",
    "instanceof", "do", "is", "as", "not", "and", "or", "go", "defer",
];

/// Identifiers allowed between a type name and what follows it in a declaration header
const TYPE_HEADER_WORDS: &[&str] = &[
    "extends", "implements", "permits", "where", "private", "internal", "protected",
    "constructor", "final", "sealed",
];

/// Tokens after which a `/` in JavaScript starts a regex literal rather than a division
const REGEX_PREFIX_WORDS: &[&str] = &[
    "return", "typeof", "case", "yield", "await", "in", "of", "delete", "void", "throw", "new",
    "instanceof", "do", "else",
];

/// Per-language lexical quirks, chosen from the file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Dialect {
    /// JavaScript and TypeScript `/pattern/flags`
    regex_literals: bool,
    /// C# `@"..."` where `""` is the only escape
    verbatim_strings: bool,
    /// Scala 2 `'symbol`
    symbol_literals: bool,
}

impl Dialect {
    fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            regex_literals: matches!(
                extension.as_str(),
                "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts"
            ),
            verbatim_strings: extension == "cs",
            symbol_literals: extension == "scala",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Punct(char),
    Literal,
    DocComment,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: u32,
    column: u32,
}

impl Token {
    fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    fn is_ident_in(&self, words: &[&str]) -> bool {
        self.ident().is_some_and(|name| words.contains(&name))
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

/// Frontend for the C family of languages
#[derive(Debug, Default, Clone, Copy)]
pub struct CFamilyParser;

impl SourceParser for CFamilyParser {
    fn parse(&self, path: &Path, text: &str) -> Result<SourceUnit, ParseError> {
        let tokens = Lexer::new(text, Dialect::from_path(path)).tokenize()?;
        let declarations = extract_declarations(&tokens);

        tracing::debug!(
            "Lexed {} into {} tokens and {} declarations",
            path.display(),
            tokens.len(),
            declarations.len()
        );

        Ok(SourceUnit::new(path, Language::CFamily, text, declarations))
    }
}

struct Lexer {
    dialect: Dialect,
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    /// Open delimiters with their positions
    open: Vec<(char, u32, u32)>,
}

impl Lexer {
    fn new(text: &str, dialect: Dialect) -> Self {
        Self {
            dialect,
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            open: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: u32, column: u32) {
        self.tokens.push(Token { kind, line, column });
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(c) = self.peek(0) {
            let (line, column) = (self.line, self.column);

            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek(1) == Some('/') => self.line_comment(line, column),
                '/' if self.peek(1) == Some('*') => self.block_comment(line, column)?,
                '"' if self.peek(1) == Some('"') && self.peek(2) == Some('"') => {
                    self.text_block(line, column)?
                }
                '/' if self.dialect.regex_literals && self.regex_allowed() => {
                    self.regex(line, column)?
                }
                '@' | '$' if self.dialect.verbatim_strings && self.verbatim_start().is_some() => {
                    self.verbatim(line, column)?
                }
                '\'' if self.dialect.symbol_literals && self.is_symbol_literal() => {
                    self.bump();
                    self.identifier(line, column);
                    if let Some(token) = self.tokens.last_mut() {
                        token.kind = TokenKind::Literal;
                    }
                }
                '"' | '\'' => self.quoted(c, line, column)?,
                '`' => self.backtick(line, column)?,
                c if c.is_alphabetic() || c == '_' || c == '$' => self.identifier(line, column),
                c if c.is_ascii_digit() => self.number(line, column),
                _ => {
                    self.bump();
                    self.delimiter(c, line, column)?;
                    self.push(TokenKind::Punct(c), line, column);
                }
            }
        }

        if let Some((open, line, column)) = self.open.pop() {
            return Err(ParseError::new(format!("unclosed '{open}'"), line, column));
        }

        Ok(self.tokens)
    }

    fn delimiter(&mut self, c: char, line: u32, column: u32) -> Result<(), ParseError> {
        match c {
            '(' | '[' | '{' => self.open.push((c, line, column)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.open.pop() {
                    Some((open, ..)) if open == expected => {}
                    Some((open, open_line, open_column)) => {
                        return Err(ParseError::new(
                            format!(
                                "mismatched '{c}', expected closing for '{open}' opened at {open_line}:{open_column}"
                            ),
                            line,
                            column,
                        ));
                    }
                    None => {
                        return Err(ParseError::new(format!("unexpected '{c}'"), line, column));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn line_comment(&mut self, line: u32, column: u32) {
        let is_doc = self.peek(2) == Some('/') && self.peek(3) != Some('/');
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        if is_doc {
            self.push(TokenKind::DocComment, line, column);
        }
    }

    fn block_comment(&mut self, line: u32, column: u32) -> Result<(), ParseError> {
        let is_doc = self.peek(2) == Some('*') && self.peek(3) != Some('/');
        self.bump();
        self.bump();

        loop {
            match self.bump() {
                Some('*') if self.peek(0) == Some('/') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
                None => {
                    return Err(ParseError::new("unterminated block comment", line, column));
                }
            }
        }

        if is_doc {
            self.push(TokenKind::DocComment, line, column);
        }
        Ok(())
    }

    fn text_block(&mut self, line: u32, column: u32) -> Result<(), ParseError> {
        for _ in 0..3 {
            self.bump();
        }
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('"') if self.peek(0) == Some('"') && self.peek(1) == Some('"') => {
                    self.bump();
                    self.bump();
                    break;
                }
                Some(_) => {}
                None => return Err(ParseError::new("unterminated text block", line, column)),
            }
        }
        self.push(TokenKind::Literal, line, column);
        Ok(())
    }

    fn quoted(&mut self, quote: char, line: u32, column: u32) -> Result<(), ParseError> {
        self.bump();
        loop {
            match self.peek(0) {
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\n') | None => {
                    return Err(ParseError::new("unterminated string literal", line, column));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.push(TokenKind::Literal, line, column);
        Ok(())
    }

    /// A `/` starts a regex when no operand precedes it
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(token) => match &token.kind {
                // `</tag>` in JSX
                TokenKind::Punct('<') => token.line != self.line || token.column + 1 != self.column,
                TokenKind::Punct(c) => !matches!(c, ')' | ']' | '}'),
                TokenKind::Ident(word) => REGEX_PREFIX_WORDS.contains(&word.as_str()),
                TokenKind::Literal => false,
                TokenKind::DocComment => true,
            },
        }
    }

    fn regex(&mut self, line: u32, column: u32) -> Result<(), ParseError> {
        self.bump();
        let mut in_class = false;
        loop {
            match self.peek(0) {
                Some('\\') => {
                    self.bump();
                    if self.peek(0) == Some('\n') {
                        return Err(ParseError::new("unterminated regex literal", line, column));
                    }
                    self.bump();
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some('\n') | None => {
                    return Err(ParseError::new("unterminated regex literal", line, column));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        while self.peek(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        self.push(TokenKind::Literal, line, column);
        Ok(())
    }

    /// Length of a verbatim string prefix (`@"`, `@$"`, `$@"`) at the cursor
    fn verbatim_start(&self) -> Option<usize> {
        match (self.peek(0), self.peek(1), self.peek(2)) {
            (Some('@'), Some('"'), _) => Some(2),
            (Some('@'), Some('$'), Some('"')) | (Some('$'), Some('@'), Some('"')) => Some(3),
            _ => None,
        }
    }

    fn verbatim(&mut self, line: u32, column: u32) -> Result<(), ParseError> {
        for _ in 0..self.verbatim_start().unwrap_or(0) {
            self.bump();
        }
        loop {
            match self.bump() {
                Some('"') if self.peek(0) == Some('"') => {
                    self.bump();
                }
                Some('"') => break,
                Some(_) => {}
                None => {
                    return Err(ParseError::new("unterminated verbatim string", line, column));
                }
            }
        }
        self.push(TokenKind::Literal, line, column);
        Ok(())
    }

    /// `'name` with no closing quote where a character literal would have one
    fn is_symbol_literal(&self) -> bool {
        let starts_ident = self
            .peek(1)
            .is_some_and(|c| c.is_alphabetic() || c == '_');
        starts_ident && self.peek(2) != Some('\'')
    }

    fn backtick(&mut self, line: u32, column: u32) -> Result<(), ParseError> {
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('`') => break,
                Some(_) => {}
                None => {
                    return Err(ParseError::new("unterminated template literal", line, column));
                }
            }
        }
        self.push(TokenKind::Literal, line, column);
        Ok(())
    }

    fn identifier(&mut self, line: u32, column: u32) {
        let mut name = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Ident(name), line, column);
    }

    fn number(&mut self, line: u32, column: u32) {
        while let Some(c) = self.peek(0) {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Literal, line, column);
    }
}

/// Index of the token closing the group opened at `open_idx`
fn matching_close(tokens: &[Token], open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open_idx) {
        if token.is_punct(open) {
            depth += 1;
        } else if token.is_punct(close) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

struct DeclarationScanner<'a> {
    tokens: &'a [Token],
    declarations: Vec<Declaration>,
    claimed: HashSet<usize>,
}

impl<'a> DeclarationScanner<'a> {
    fn header(&self, header_start: usize, idx: usize) -> &'a [Token] {
        let tokens = self.tokens;
        &tokens[header_start.min(idx)..idx]
    }

    fn header_has(&self, header_start: usize, idx: usize, word: &str) -> bool {
        self.header(header_start, idx)
            .iter()
            .any(|t| t.ident() == Some(word))
    }

    fn record(
        &mut self,
        kind: DeclarationKind,
        keyword: &str,
        name_idx: usize,
        header_start: usize,
        has_doc: bool,
    ) -> bool {
        if !self.claimed.insert(name_idx) {
            return false;
        }
        let tokens = self.tokens;
        let token = &tokens[name_idx];
        let Some(name) = token.ident() else {
            return false;
        };
        let is_public = self
            .header(header_start, name_idx)
            .iter()
            .any(|t| t.is_ident_in(PUBLIC_MODIFIERS));

        self.declarations.push(Declaration {
            kind,
            keyword: keyword.to_string(),
            name: name.to_string(),
            location: token.location(),
            is_public,
            has_doc,
        });
        true
    }

    fn prev(&self, idx: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        idx.checked_sub(1).and_then(|p| tokens.get(p))
    }

    fn get(&self, idx: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        tokens.get(idx)
    }

    /// `class Name`, `interface Name`, ...
    fn type_name(&self, idx: usize) -> Option<usize> {
        if let Some(prev) = self.prev(idx) {
            if prev.is_punct('.') || prev.is_punct(':') {
                return None;
            }
        }

        let name_idx = idx + 1;
        let name = self.get(name_idx)?;
        if name.ident().is_none() || name.is_ident_in(TYPE_KEYWORDS) {
            return None;
        }

        match self.get(name_idx + 1) {
            None => Some(name_idx),
            Some(next) if next.line > name.line => Some(name_idx),
            Some(next) if next.is_ident_in(TYPE_HEADER_WORDS) => Some(name_idx),
            Some(next) if ['{', ':', '<', '(', ';', '['].iter().any(|c| next.is_punct(*c)) => {
                Some(name_idx)
            }
            _ => None,
        }
    }

    /// Go `type Name struct` and TypeScript `type Name = ...`
    fn type_alias_name(&self, idx: usize) -> Option<usize> {
        if self.prev(idx).is_some_and(|p| p.is_punct('.')) {
            return None;
        }
        let name_idx = idx + 1;
        self.get(name_idx)?.ident()?;

        let next = self.get(name_idx + 1)?;
        if next.is_ident_in(&["struct", "interface"]) || next.is_punct('=') || next.is_punct('<') {
            Some(name_idx)
        } else {
            None
        }
    }

    /// `fun name(`, `func (recv T) Name(`, `function name(`, ...
    fn keyword_function_name(&self, idx: usize) -> Option<usize> {
        if self.prev(idx).is_some_and(|p| p.is_punct('.')) {
            return None;
        }

        let mut j = idx + 1;
        let first = self.get(j)?;
        if first.is_punct('<') {
            j = matching_close(self.tokens, j, '<', '>')? + 1;
        } else if first.is_punct('(') {
            j = matching_close(self.tokens, j, '(', ')')? + 1;
        }

        self.get(j)?.ident()?;
        while self.get(j + 1).is_some_and(|t| t.is_punct('.'))
            && self.get(j + 2).is_some_and(|t| t.ident().is_some())
        {
            j += 2;
        }

        let after = self.get(j + 1)?;
        if after.is_punct('(') || after.is_punct('<') || after.is_punct('[') {
            Some(j)
        } else {
            None
        }
    }

    /// `Type name(...) {` style method headers without a keyword
    fn is_method_name(&self, idx: usize) -> bool {
        let Some(token) = self.get(idx) else {
            return false;
        };
        if token.is_ident_in(NOT_FUNCTION_NAMES) || token.is_ident_in(FUNCTION_KEYWORDS) {
            return false;
        }
        if !self.get(idx + 1).is_some_and(|t| t.is_punct('(')) {
            return false;
        }

        let prev_ok = match self.prev(idx) {
            Some(prev) if prev.ident().is_some() => {
                !prev.is_ident_in(CALL_PREFIXES)
                    && !prev.is_ident_in(FUNCTION_KEYWORDS)
                    && !prev.is_ident_in(TYPE_KEYWORDS)
            }
            Some(prev) => prev.is_punct('>') || prev.is_punct(']') || prev.is_punct('*'),
            None => false,
        };
        if !prev_ok {
            return false;
        }

        let Some(close) = matching_close(self.tokens, idx + 1, '(', ')') else {
            return false;
        };
        match self.get(close + 1) {
            Some(next) if next.is_punct('{') || next.ident() == Some("throws") => true,
            Some(next) if next.is_punct(':') => {
                self.get(close + 2).is_some_and(|t| t.ident().is_some())
            }
            _ => false,
        }
    }

    fn scan(mut self) -> Vec<Declaration> {
        let tokens = self.tokens;
        let mut stmt_start = 0usize;
        let mut line_start = 0usize;
        let mut doc_pending = false;

        for (idx, token) in tokens.iter().enumerate() {
            if idx == 0 || tokens[idx - 1].line != token.line {
                line_start = idx;
            }
            // Headers never reach back past the previous statement or line
            let header_start = stmt_start.max(line_start);

            // A doc comment belongs to the next declaration only
            match &token.kind {
                TokenKind::DocComment => doc_pending = true,
                TokenKind::Punct(';' | '{' | '}') => {
                    stmt_start = idx + 1;
                    doc_pending = false;
                }
                TokenKind::Punct('=') => {
                    let is_constant = (self.header_has(header_start, idx, "static")
                        && self.header_has(header_start, idx, "final"))
                        || (self.header_has(header_start, idx, "const")
                            && self.header_has(header_start, idx, "val"));
                    let in_parens = self
                        .header(header_start, idx)
                        .iter()
                        .any(|t| t.is_punct('('));
                    let named = idx
                        .checked_sub(1)
                        .filter(|prev| tokens[*prev].ident().is_some());

                    if let (true, false, Some(name_idx)) = (is_constant, in_parens, named) {
                        if self.record(DeclarationKind::Constant, "const", name_idx, header_start, doc_pending) {
                            doc_pending = false;
                        }
                    }
                }
                TokenKind::Ident(word) => {
                    let word = word.as_str();
                    if TYPE_KEYWORDS.contains(&word) {
                        if let Some(name_idx) = self.type_name(idx) {
                            if self.record(DeclarationKind::Type, word, name_idx, header_start, doc_pending) {
                                doc_pending = false;
                            }
                        }
                    } else if word == "type" {
                        if let Some(name_idx) = self.type_alias_name(idx) {
                            if self.record(DeclarationKind::Type, word, name_idx, header_start, doc_pending) {
                                doc_pending = false;
                            }
                        }
                    } else if FUNCTION_KEYWORDS.contains(&word) {
                        if let Some(name_idx) = self.keyword_function_name(idx) {
                            if self.record(DeclarationKind::Function, word, name_idx, header_start, doc_pending) {
                                doc_pending = false;
                            }
                        }
                    } else if self.is_method_name(idx) {
                        if self.record(DeclarationKind::Function, "method", idx, header_start, doc_pending) {
                            doc_pending = false;
                        }
                    }
                }
                _ => {}
            }
        }

        // Constructors share the type's name and are not functions for naming purposes
        let type_names: HashSet<String> = self
            .declarations
            .iter()
            .filter(|d| d.kind == DeclarationKind::Type)
            .map(|d| d.name.clone())
            .collect();
        self.declarations
            .retain(|d| d.kind != DeclarationKind::Function || !type_names.contains(&d.name));

        self.declarations
    }
}

fn extract_declarations(tokens: &[Token]) -> Vec<Declaration> {
    DeclarationScanner {
        tokens,
        declarations: Vec::new(),
        claimed: HashSet::new(),
    }
    .scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, text: &str) -> SourceUnit {
        CFamilyParser.parse(Path::new(name), text).unwrap()
    }

    fn names(unit: &SourceUnit, kind: DeclarationKind) -> Vec<String> {
        unit.declarations()
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.name.clone())
            .collect()
    }

    #[test]
    fn test_java_class_and_methods() {
        let unit = parse(
            "Account.java",
            "/** An account. */\npublic class Account {\n    public Account() {}\n    public int getBalance() {\n        if (x) { return 1; }\n        return helper(2);\n    }\n    private static final int MAX_ITEMS = 3;\n}\n",
        );

        assert_eq!(names(&unit, DeclarationKind::Type), vec!["Account"]);
        assert_eq!(names(&unit, DeclarationKind::Function), vec!["getBalance"]);
        assert_eq!(names(&unit, DeclarationKind::Constant), vec!["MAX_ITEMS"]);

        let class = &unit.declarations()[0];
        assert!(class.is_public);
        assert!(class.has_doc);
        assert_eq!(class.location, Location::new(2, 14));

        let method = unit
            .declarations()
            .iter()
            .find(|d| d.name == "getBalance")
            .unwrap();
        assert!(method.is_public);
        assert!(!method.has_doc);
    }

    #[test]
    fn test_kotlin_keyword_functions() {
        let unit = parse(
            "Main.kt",
            "data class point(val x: Int)\nfun String.shout(): String = uppercase()\nfun <T> identity(value: T): T = value\nconst val Limit = 10\n",
        );

        assert_eq!(names(&unit, DeclarationKind::Type), vec!["point"]);
        assert_eq!(names(&unit, DeclarationKind::Function), vec!["shout", "identity"]);
        assert_eq!(names(&unit, DeclarationKind::Constant), vec!["Limit"]);
    }

    #[test]
    fn test_go_receiver_function() {
        let unit = parse(
            "server.go",
            "type Server struct {}\n\nfunc (s *Server) Serve_Http(port int) error {\n    go func() {}()\n    return nil\n}\n",
        );

        assert_eq!(names(&unit, DeclarationKind::Function), vec!["Serve_Http"]);
    }

    #[test]
    fn test_member_access_is_not_a_type() {
        let unit = parse("A.java", "class A { Object k = String.class; }\n");
        assert_eq!(names(&unit, DeclarationKind::Type), vec!["A"]);
    }

    #[test]
    fn test_enum_class_counts_once() {
        let unit = parse("Color.kt", "enum class Color { RED, GREEN }\n");
        assert_eq!(names(&unit, DeclarationKind::Type), vec!["Color"]);
        assert_eq!(unit.declarations()[0].keyword, "class");
    }

    #[test]
    fn test_calls_are_not_declarations() {
        let unit = parse(
            "app.ts",
            "export function main(): void {\n  const widget = new Widget(1);\n  render(widget);\n  return build(widget);\n}\n",
        );

        assert_eq!(names(&unit, DeclarationKind::Function), vec!["main"]);
        assert!(unit.declarations()[0].is_public);
    }

    #[test]
    fn test_comments_and_strings_are_skipped() {
        let unit = parse(
            "a.js",
            "// class fake {\n/* class alsoFake { */\nconst s = \"class nope {\";\nconst t = `class\n nada {`;\n",
        );

        assert!(unit.declarations().is_empty());
    }

    #[test]
    fn test_doc_comment_resets_at_statement_end() {
        let unit = parse(
            "B.java",
            "/** docs */\nint counter = 0;\npublic class B {}\n",
        );

        let class = &unit.declarations()[0];
        assert_eq!(class.name, "B");
        assert!(!class.has_doc);
    }

    #[test]
    fn test_doc_survives_annotations() {
        let unit = parse(
            "C.java",
            "/**\n * Docs.\n */\n@Deprecated(since = \"1\")\npublic final class C {}\n",
        );

        assert!(unit.declarations()[0].has_doc);
    }

    #[test]
    fn test_doc_comment_covers_one_expression_body() {
        let unit = parse("Calc.scala", "/** doc */\ndef a() = 1\ndef b() = 2\n");

        let docs: Vec<(&str, bool)> = unit
            .declarations()
            .iter()
            .map(|d| (d.name.as_str(), d.has_doc))
            .collect();
        assert_eq!(docs, vec![("a", true), ("b", false)]);
    }

    #[test]
    fn test_javascript_regex_literals() {
        let unit = parse(
            "re.js",
            "const re = /\\(/g;\nconst cls = /[/)]+/i.test(s);\nfunction split(s) {\n  return s.split(/[{]/);\n}\n",
        );
        assert_eq!(names(&unit, DeclarationKind::Function), vec!["split"]);

        // Division after an operand stays punctuation
        parse("calc.ts", "const half = (total) / 2 / count;\nconst r = a[0] / b;\n");
    }

    #[test]
    fn test_jsx_closing_tag_is_not_a_regex() {
        parse("App.tsx", "const view = <div>{items.map(render)}</div>;\n");
    }

    #[test]
    fn test_unterminated_regex_is_parse_error() {
        let err = CFamilyParser
            .parse(Path::new("a.js"), "const re = /abc\n")
            .unwrap_err();
        assert!(err.message.contains("unterminated regex literal"));
        assert_eq!(err.location, Location::new(1, 12));
    }

    #[test]
    fn test_csharp_verbatim_strings() {
        let unit = parse(
            "Paths.cs",
            "class Paths {\n    string p = @\"C:\\dir\\\";\n    string q = @\"say \"\"hi\"\" {\";\n    string r = $@\"{p}\\\";\n}\n",
        );
        assert_eq!(names(&unit, DeclarationKind::Type), vec!["Paths"]);

        // Outside C# `@` keeps its usual meaning
        parse("A.java", "@Override\nclass A {}\n");
    }

    #[test]
    fn test_scala_symbol_literals() {
        let unit = parse(
            "A.scala",
            "object A {\n  val s = 'sym\n  val c = 'c'\n  val n = '\\n'\n}\n",
        );
        assert_eq!(names(&unit, DeclarationKind::Type), vec!["A"]);

        let err = CFamilyParser
            .parse(Path::new("A.java"), "class A {\n  char s = 'sym\n}\n")
            .unwrap_err();
        assert!(err.message.contains("unterminated string literal"));
    }

    #[test]
    fn test_unclosed_brace_is_parse_error() {
        let err = CFamilyParser
            .parse(Path::new("a.java"), "class A {\n  void f() {\n}\n")
            .unwrap_err();

        assert!(err.message.contains("unclosed '{'"));
        assert_eq!(err.location, Location::new(1, 9));
    }

    #[test]
    fn test_mismatched_delimiter_is_parse_error() {
        let err = CFamilyParser
            .parse(Path::new("a.c"), "int main() {\n  f(1];\n}\n")
            .unwrap_err();

        assert!(err.message.contains("mismatched ']'"));
        assert_eq!(err.location, Location::new(2, 6));
    }

    #[test]
    fn test_unterminated_literals_are_parse_errors() {
        let err = CFamilyParser.parse(Path::new("a.js"), "let s = \"abc\n").unwrap_err();
        assert!(err.message.contains("unterminated string literal"));

        let err = CFamilyParser.parse(Path::new("a.js"), "/* never ends").unwrap_err();
        assert!(err.message.contains("unterminated block comment"));
    }
}
