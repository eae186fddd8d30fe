//! Diagnostic sinks.
//!
//! Every stage reports problems through [`ErrorReporter`], which only has to
//! implement [`ErrorReporter::report`]; token and runtime errors are
//! formatted by the provided methods.  Reporters take `&self` so a single
//! instance can be shared as [`SharedReporter`] by the scanner, parser,
//! resolver and interpreter of one run.

use std::cell::RefCell;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, warn};

use crate::error::YauplError;
use crate::token::Token;

pub type SharedReporter = Rc<dyn ErrorReporter>;

pub trait ErrorReporter {
    /// Emit one diagnostic. `line` is 0‑based, `location` is `at '<lexeme>'`,
    /// `at end`, or empty.
    fn report(&self, line: Option<usize>, message: &str, location: &str);

    fn report_token_error(&self, token: &Token, message: &str) {
        self.report(Some(token.line), message, &token.location());
    }

    fn report_runtime_error(&self, error: &YauplError) {
        self.report(error.line(), &error.message(), "");
    }

    /// Report any crate error with whatever position it carries.
    fn report_error(&self, error: &YauplError) {
        self.report(error.line(), &error.message(), error.location());
    }

    /// Name of the file currently being processed, shown in diagnostics.
    fn set_current_file(&self, _file: Option<String>) {}
}

/// Render a diagnostic the way every sink prints it.
pub fn format_diagnostic(
    file: Option<&str>,
    line: Option<usize>,
    message: &str,
    location: &str,
) -> String {
    let position = match (file, line) {
        (Some(file), Some(line)) => format!("[{}:{}] ", file, line + 1),
        (None, Some(line)) => format!("[line {}] ", line + 1),
        (Some(file), None) => format!("[{}] ", file),
        (None, None) => String::new(),
    };

    if location.is_empty() {
        format!("{}Error: {}", position, message)
    } else {
        format!("{}Error {}: {}", position, location, message)
    }
}

/// Writes diagnostics to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    current_file: RefCell<Option<String>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorReporter for ConsoleReporter {
    fn report(&self, line: Option<usize>, message: &str, location: &str) {
        let file = self.current_file.borrow();
        eprintln!(
            "{}",
            format_diagnostic(file.as_deref(), line, message, location)
        );
    }

    fn set_current_file(&self, file: Option<String>) {
        *self.current_file.borrow_mut() = file;
    }
}

/// Appends diagnostics to a log file, creating it on first use.
#[derive(Debug)]
pub struct FileReporter {
    path: PathBuf,
    current_file: RefCell<Option<String>>,
}

impl FileReporter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            current_file: RefCell::new(None),
        }
    }
}

impl ErrorReporter for FileReporter {
    fn report(&self, line: Option<usize>, message: &str, location: &str) {
        let text = {
            let file = self.current_file.borrow();
            format_diagnostic(file.as_deref(), line, message, location)
        };

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut log| writeln!(log, "{}", text));

        if let Err(e) = written {
            warn!("Cannot append to {:?}: {}", self.path, e);
            eprintln!("{}", text);
        }
    }

    fn set_current_file(&self, file: Option<String>) {
        *self.current_file.borrow_mut() = file;
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub message: String,
    pub location: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_diagnostic(
            None,
            self.line,
            &self.message,
            &self.location,
        ))
    }
}

/// Keeps diagnostics in memory instead of printing them.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl BufferedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Bare messages, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl ErrorReporter for BufferedReporter {
    fn report(&self, line: Option<usize>, message: &str, location: &str) {
        debug!("Buffered diagnostic: line={:?}, msg={}", line, message);

        self.diagnostics.borrow_mut().push(Diagnostic {
            line,
            message: message.to_string(),
            location: location.to_string(),
        });
    }
}
