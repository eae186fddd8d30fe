//! Module `scanner` implements a one‑pass, streaming lexer for yaupl.
//!
//! It transforms source text into a sequence of [`Token`]s, skipping
//! whitespace and comments, and emitting exactly one `EOF` token at the end.
//! Designed as a `FusedIterator`, it can be chained safely with other
//! iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &str) -> Scanner<'_>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, YauplError>` on each `.next()`.  Errors never stop
//!   the scan: the next call simply continues after the offending input.
//!
//! - `Scanner::scan_tokens(reporter)`
//!   Drains the iterator, routes errors to an [`ErrorReporter`] and returns
//!   the token list together with the error flag.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `( ) { } [ ] , . - + ; : * % ^`.
//! - Two‑character operators: `!=`, `==`, `<=`, `>=`, `<<`, `>>`.
//! - Comments: `//` to end of line and `/* … */` blocks.  A block comment that
//!   is still open at end of input stays open: the `in_block_comment` flag can
//!   be carried into the next scanner (REPL lines) and everything up to the
//!   next `*/` is skipped.  Block comments do not nest.
//! - String literals: `"` … `"`, multi‑line, no escape sequences.  An
//!   unterminated string is reported and the partial literal still emitted.
//! - Numeric literals: integer part with an optional fractional part, always
//!   produced as `f64`.
//! - Identifiers/keywords: `[A-Za-z_][A-Za-z0-9_]*`, resolved via a
//!   perfect‑hash `KEYWORDS` map.
//!
//! Lines are counted from 0.

use crate::error::{Result, YauplError};
use crate::reporter::ErrorReporter;
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::{memchr, memchr_iter, memmem};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"      => TokenType::AND,
    b"or"       => TokenType::OR,
    b"xor"      => TokenType::XOR,
    b"nor"      => TokenType::NOR,
    b"nand"     => TokenType::NAND,
    b"class"    => TokenType::CLASS,
    b"else"     => TokenType::ELSE,
    b"false"    => TokenType::FALSE,
    b"fun"      => TokenType::FUN,
    b"for"      => TokenType::FOR,
    b"if"       => TokenType::IF,
    b"null"     => TokenType::NULL,
    b"print"    => TokenType::PRINT,
    b"return"   => TokenType::RETURN,
    b"super"    => TokenType::SUPER,
    b"this"     => TokenType::THIS,
    b"true"     => TokenType::TRUE,
    b"let"      => TokenType::LET,
    b"const"    => TokenType::CONST,
    b"while"    => TokenType::WHILE,
    b"do"       => TokenType::DO,
    b"break"    => TokenType::BREAK,
    b"continue" => TokenType::CONTINUE,
    b"static"   => TokenType::STATIC,
    b"import"   => TokenType::IMPORT,
};

/// Result of draining a scanner with [`Scanner::scan_tokens`].
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub had_error: bool,
    /// Whether the input ended inside an unterminated `/* …` comment.
    pub in_block_comment: bool,
}

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    text: &'a str,              // entire source
    src: &'a [u8],              // same source, byte view
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 0‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    queued: Option<Token>,      // token to hand out right after a reported error
    in_block_comment: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 0,
            pending: None,
            queued: None,
            in_block_comment: false,
        }
    }

    /// Start scanning as if a `/*` comment opened earlier were still open.
    pub fn with_block_comment(mut self, open: bool) -> Self {
        self.in_block_comment = open;
        self
    }

    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Scan the whole input, sending every lexical error to `reporter`.
    pub fn scan_tokens(mut self, reporter: &dyn ErrorReporter) -> ScanOutput {
        let mut tokens: Vec<Token> = Vec::new();
        let mut had_error = false;

        for item in &mut self {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => {
                    had_error = true;
                    reporter.report_error(&e);
                }
            }
        }

        info!(
            "Scanned {} token(s), had_error={}",
            tokens.len(),
            had_error
        );

        ScanOutput {
            tokens,
            had_error,
            in_block_comment: self.in_block_comment,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Current byte, or `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.text[self.start..self.curr]
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  If it produces a
    /// token the kind is stored in `self.pending`; whitespace and comments
    /// leave `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        if self.in_block_comment {
            self.skip_block_comment();
            return Ok(());
        }

        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b'[' => self.pending = Some(TokenType::LEFT_BRACKET),
            b']' => self.pending = Some(TokenType::RIGHT_BRACKET),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b':' => self.pending = Some(TokenType::COLON),
            b'%' => self.pending = Some(TokenType::MODULO),
            b'^' => self.pending = Some(TokenType::EXPONENT),
            b'*' => self.pending = Some(TokenType::STAR),

            // ── one‑ or two‑character operators ──────────────────────────
            b'!' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else if self.match_byte(b'<') {
                    TokenType::LSHIFT
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else if self.match_byte(b'>') {
                    TokenType::RSHIFT
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(());
            }

            b'\n' => {
                self.line += 1;

                return Ok(());
            }

            // ── comments or division ─────────────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Fast‑forward to the next newline; the newline itself is
                    // scanned normally so the line counter stays right.
                    if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                if self.match_byte(b'*') {
                    self.in_block_comment = true;
                    self.skip_block_comment();

                    return Ok(());
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                // Swallow UTF‑8 continuation bytes so the next lexeme starts
                // on a character boundary.
                while !self.is_at_end() && (self.peek() & 0xC0) == 0x80 {
                    self.advance();
                }

                return Err(YauplError::lex(
                    self.line,
                    format!("Unexpected character: {}", self.lexeme()),
                ));
            }
        }

        Ok(())
    }

    /// Skip to just past the next `*/`, or to EOF if the comment never closes
    /// (in which case `in_block_comment` stays set).
    fn skip_block_comment(&mut self) {
        let rest: &[u8] = &self.src[self.curr..];

        match memmem::find(rest, b"*/") {
            Some(pos) => {
                self.line += memchr_iter(b'\n', &rest[..pos]).count();
                self.curr += pos + 2;
                self.in_block_comment = false;
            }
            None => {
                self.line += memchr_iter(b'\n', rest).count();
                self.curr = self.len();
            }
        }
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            let partial: &str = &self.text[self.start + 1..self.curr];
            self.queued = Some(Token::new(
                TokenType::STRING(partial.to_owned()),
                self.lexeme(),
                self.line,
            ));

            return Err(YauplError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // closing quote

        let s: &str = &self.text[self.start + 1..self.curr - 1];
        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // Only ASCII digits and one dot were consumed, so this cannot fail.
        let n: f64 = self.lexeme().parse::<f64>().unwrap_or(0.0);
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.queued.take() {
            return Some(Ok(token));
        }

        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, self.lexeme(), self.line)));
            }
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
