//! Lexer for the surface language.
//!
//! Produces a flat token sequence:
//! - Keywords: VAR, ARRAY, INPUT, IF, THEN, ELSE, WHILE, DO, OUTPUT, AND, OR
//!   (case-insensitive)
//! - Operators: := + - * / < > >= <= == != ( ) { } [ ] ; !
//! - Numbers: runs of decimal digits
//! - Identifiers: letter or `_`, then letters, digits, `_` (case-sensitive)
//!
//! Whitespace separates tokens and is otherwise ignored. Any other
//! character is a lex error carrying its byte position.

use crate::error::{OpsError, OpsResult};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Operator,
    Number,
    Identifier,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword => write!(f, "keyword"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Identifier => write!(f, "identifier"),
        }
    }
}

/// A token: the source lexeme and its lexical class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, kind: TokenKind) -> Self {
        Self { lexeme: lexeme.into(), kind }
    }
}

const KEYWORDS: &[&str] = &[
    "VAR", "ARRAY", "INPUT", "IF", "THEN", "ELSE", "WHILE", "DO", "OUTPUT", "AND", "OR",
];

// Two-character operators are matched before single-character ones.
const TWO_CHAR_OPERATORS: &[&str] = &[":=", ">=", "<=", "==", "!="];

const ONE_CHAR_OPERATORS: &[char] = &[
    '+', '-', '*', '/', '<', '>', '(', ')', '{', '}', '[', ']', ';', '!',
];

/// Split source text into tokens.
pub fn tokenize(source: &str) -> OpsResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < source.len() {
        let rest = &source[i..];
        let ch = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };

        if ch.is_whitespace() {
            i += ch.len_utf8();
            continue;
        }

        if let Some(op) = TWO_CHAR_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Token::new(*op, TokenKind::Operator));
            i += op.len();
            continue;
        }

        if ONE_CHAR_OPERATORS.contains(&ch) {
            tokens.push(Token::new(ch.to_string(), TokenKind::Operator));
            i += ch.len_utf8();
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let end = scan(rest, |c| c.is_alphanumeric() || c == '_');
            let lexeme = &rest[..end];
            let kind = if KEYWORDS.contains(&lexeme.to_uppercase().as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(lexeme, kind));
            i += end;
            continue;
        }

        if ch.is_ascii_digit() {
            let end = scan(rest, |c| c.is_ascii_digit());
            tokens.push(Token::new(&rest[..end], TokenKind::Number));
            i += end;
            continue;
        }

        return Err(OpsError::UnknownCharacter { ch, position: i });
    }

    Ok(tokens)
}

/// Length in bytes of the longest prefix of `s` whose chars satisfy `pred`.
fn scan(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
