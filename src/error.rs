//! Centralised error hierarchy for the **yaupl interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, import) convert their
//! internal failure modes into one of the variants defined here.  This gives
//! a uniform `Result<T>` alias throughout the crate and ergonomic
//! inter‑operation with `anyhow` in the binary.
//!
//! Lines are stored **0‑based** (the way the scanner counts them) and shifted
//! to 1‑based only when rendered.
//!
//! The module **does not** print diagnostics itself; see [`crate::reporter`].

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YauplError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {}] Error: {message}", .line + 1)]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 0‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {}] Error {location}: {message}", .line + 1)]
    Parse {
        message: String,
        line: usize,
        /// `at 'lexeme'` or `at end`.
        location: String,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {}] Error {location}: {message}", .line + 1)]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error, tied to the token that triggered it.
    #[error("[line {}] {message}", .line + 1)]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl YauplError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        YauplError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        YauplError::Parse {
            message,
            line: token.line,
            location: token.location(),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        YauplError::Resolve {
            message,
            line: token.line,
            location: token.location(),
        }
    }

    /// Helper constructor for the **interpreter** and the built-in types.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", token.line, message);

        YauplError::Runtime {
            message,
            line: token.line,
        }
    }

    /// 0‑based source line, when the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            YauplError::Lex { line, .. }
            | YauplError::Parse { line, .. }
            | YauplError::Resolve { line, .. }
            | YauplError::Runtime { line, .. } => Some(*line),
            YauplError::Io(_) | YauplError::Utf8(_) => None,
        }
    }

    /// The bare message, without line or location decoration.
    pub fn message(&self) -> String {
        match self {
            YauplError::Lex { message, .. }
            | YauplError::Parse { message, .. }
            | YauplError::Resolve { message, .. }
            | YauplError::Runtime { message, .. } => message.clone(),
            YauplError::Io(e) => e.to_string(),
            YauplError::Utf8(e) => e.to_string(),
        }
    }

    /// The `where` fragment of a static error (empty for the other kinds).
    pub fn location(&self) -> &str {
        match self {
            YauplError::Parse { location, .. } | YauplError::Resolve { location, .. } => location,
            _ => "",
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, YauplError>;
