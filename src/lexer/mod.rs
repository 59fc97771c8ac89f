//! # gmsl lexer
//!
//! Tokenizes gmsl source code into a flat stream of tokens.
//!
//! ## Design
//!
//! The whole source is scanned up front into a `Vec<Token>` rather than
//! produced lazily behind a channel: the parser consumes the full stream
//! anyway, and a single state variable driving a byte cursor is simpler and
//! behaviorally equivalent to a concurrent, channel-fed state machine.
//! [`Lexer`] wraps the resulting slice with the `peek`/`peek_n` front end the
//! parser needs.
//!
//! Numbers are a run of decimal digits; identifiers are any run of
//! characters that are not whitespace, a paren/brace, an operator start, or a
//! quote. Keywords and type names are recognized by classifying an
//! already-read word, not by a separate grammar — a keyword only counts when
//! followed by whitespace or end-of-input (so `iffy` never becomes `if` plus
//! `fy`, and so the fairly unusual case of no whitespace before a following
//! token, e.g. `return(x)` with no space, reads `return` as a plain
//! identifier rather than the keyword).

pub mod cursor;
pub mod token;

#[cfg(test)]
mod tests;

use crate::error::{LexError, Span};
use cursor::Cursor;
use token::{Token, TokenKind, TYPE_NAMES};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

const KEYWORDS: [(&str, TokenKind); 7] = [
    ("package", TokenKind::Package),
    ("import", TokenKind::Import),
    ("func", TokenKind::Func),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("var", TokenKind::Var),
    ("return", TokenKind::Return),
];

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_at_end() {
        match lex_token(&mut cursor) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: Span::new(l, c),
    });

    LexResult { tokens, errors }
}

fn lex_token(cursor: &mut Cursor) -> Result<Option<Token>, LexError> {
    while matches!(cursor.peek(), Some(' ' | '\t' | '\r' | '\n')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    match ch {
        '(' => single(cursor, sl, sc, TokenKind::LParen, "("),
        ')' => single(cursor, sl, sc, TokenKind::RParen, ")"),
        '{' => single(cursor, sl, sc, TokenKind::LBrace, "{"),
        '}' => single(cursor, sl, sc, TokenKind::RBrace, "}"),
        '"' => lex_string(cursor, sl, sc),
        '+' => single(cursor, sl, sc, TokenKind::Plus, "+"),
        '-' => single(cursor, sl, sc, TokenKind::Minus, "-"),
        '*' => single(cursor, sl, sc, TokenKind::Star, "*"),
        '/' => single(cursor, sl, sc, TokenKind::Slash, "/"),
        '%' => single(cursor, sl, sc, TokenKind::Percent, "%"),
        '.' => single(cursor, sl, sc, TokenKind::Dot, "."),
        '=' => lex_equals(cursor, sl, sc),
        ':' => lex_colon(cursor, sl, sc),
        c if c.is_ascii_digit() => lex_number(cursor, sl, sc),
        _ => lex_word(cursor, sl, sc),
    }
}

fn single(
    cursor: &mut Cursor,
    sl: usize,
    sc: usize,
    kind: TokenKind,
    lexeme: &str,
) -> Result<Option<Token>, LexError> {
    cursor.advance();
    Ok(Some(Token {
        kind,
        lexeme: lexeme.to_string(),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_equals(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, LexError> {
    cursor.advance();
    if cursor.peek() == Some('=') {
        cursor.advance();
        return Ok(Some(Token {
            kind: TokenKind::EqEq,
            lexeme: "==".into(),
            span: cursor.make_span(sl, sc),
        }));
    }
    Ok(Some(Token {
        kind: TokenKind::Eq,
        lexeme: "=".into(),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_colon(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, LexError> {
    cursor.advance();
    if cursor.peek() == Some('=') {
        cursor.advance();
        return Ok(Some(Token {
            kind: TokenKind::ColonEq,
            lexeme: ":=".into(),
            span: cursor.make_span(sl, sc),
        }));
    }
    Err(LexError::UnexpectedInput {
        span: cursor.make_span(sl, sc),
        snippet: cursor.snippet(20),
    })
}

fn lex_string(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, LexError> {
    cursor.advance();
    let mut raw = String::new();

    loop {
        match cursor.peek() {
            None => {
                return Err(LexError::UnterminatedString {
                    span: cursor.make_span(sl, sc),
                })
            }
            Some('\n') | Some('\r') => {
                return Err(LexError::UnterminatedString {
                    span: cursor.make_span(sl, sc),
                })
            }
            Some('"') => {
                cursor.advance();
                break;
            }
            Some('\\') => {
                cursor.advance();
                raw.push('\\');
                match cursor.peek() {
                    None => {
                        return Err(LexError::UnterminatedString {
                            span: cursor.make_span(sl, sc),
                        })
                    }
                    Some(c) => {
                        raw.push(c);
                        cursor.advance();
                    }
                }
            }
            Some(c) => {
                raw.push(c);
                cursor.advance();
            }
        }
    }

    Ok(Some(Token {
        kind: TokenKind::StringLiteral(raw.clone()),
        lexeme: format!("\"{raw}\""),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_number(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, LexError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    let value = digits.parse::<i64>().map_err(|_| LexError::UnexpectedInput {
        span: cursor.make_span(sl, sc),
        snippet: digits.clone(),
    })?;

    Ok(Some(Token {
        kind: TokenKind::Number(value),
        lexeme: digits,
        span: cursor.make_span(sl, sc),
    }))
}

/// A character that starts an operator, paren/brace, quote, or whitespace —
/// i.e. anything that ends a run of identifier characters.
fn is_boundary(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | '(' | ')' | '{' | '}' | '"' | '+' | '-' | '*' | '/' | '%'
            | '.' | '=' | ':'
    )
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, LexError> {
    let mut word = String::new();
    while let Some(c) = cursor.peek() {
        if is_boundary(c) {
            break;
        }
        word.push(cursor.advance().unwrap());
    }

    if word.is_empty() {
        let ch = cursor.advance().unwrap_or('\0');
        return Err(LexError::UnexpectedInput {
            span: cursor.make_span(sl, sc),
            snippet: ch.to_string(),
        });
    }

    let followed_by_boundary_whitespace = matches!(cursor.peek(), None | Some(' ' | '\t' | '\r' | '\n'));

    if followed_by_boundary_whitespace {
        for (kw, kind) in KEYWORDS.iter() {
            if *kw == word.as_str() {
                return Ok(Some(Token {
                    kind: kind.clone(),
                    lexeme: word,
                    span: cursor.make_span(sl, sc),
                }));
            }
        }
    }

    if TYPE_NAMES.contains(&word.as_str()) {
        return Ok(Some(Token {
            kind: TokenKind::Type(word.clone()),
            lexeme: word,
            span: cursor.make_span(sl, sc),
        }));
    }

    Ok(Some(Token {
        kind: TokenKind::Ident(word.clone()),
        lexeme: word,
        span: cursor.make_span(sl, sc),
    }))
}

/// A peekable front end over an eagerly tokenized stream.
pub struct Lexer {
    tokens: Vec<Token>,
    pos: usize,
}

impl Lexer {
    pub fn tokenize(source: &str) -> Result<Self, Vec<LexError>> {
        let LexResult { tokens, errors } = tokenize(source);
        if errors.is_empty() {
            Ok(Self { tokens, pos: 0 })
        } else {
            Err(errors)
        }
    }

    pub fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn peek_n(&self, k: usize) -> &Token {
        let idx = (self.pos + k).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }
}
