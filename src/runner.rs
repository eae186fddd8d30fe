//! Drives the pipeline (scan → parse → resolve → interpret) for scripts and
//! for the interactive prompt.

use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::Stmt;
use crate::config::InterpreterConfig;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::SharedReporter;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::source;

/// Exit status for scan, parse and resolve errors.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for runtime errors.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

pub const PROMPT: &str = "ypl : ";

pub struct Runner {
    interpreter: Interpreter,
    reporter: SharedReporter,
    had_error: bool,
    had_runtime_error: bool,
    /// The previous REPL entry ended inside `/* …`.
    in_block_comment: bool,
}

impl Runner {
    pub fn new(config: InterpreterConfig, reporter: SharedReporter, out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(config, Rc::clone(&reporter), out),
            reporter,
            had_error: false,
            had_runtime_error: false,
            in_block_comment: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    pub fn exit_code(&self) -> i32 {
        if self.had_error {
            EXIT_STATIC_ERROR
        } else if self.had_runtime_error {
            EXIT_RUNTIME_ERROR
        } else {
            0
        }
    }

    /// Run one unit of source text.  Nothing runs if scanning, parsing or
    /// resolving reported an error; a runtime error is reported here.
    pub fn run_source(&mut self, text: &str) {
        let scanned = Scanner::new(text)
            .with_block_comment(self.in_block_comment)
            .scan_tokens(self.reporter.as_ref());
        self.in_block_comment = scanned.in_block_comment;

        let mut parser = Parser::new(&scanned.tokens, Rc::clone(&self.reporter));
        let statements: Vec<Stmt> = parser.parse();

        if scanned.had_error || parser.had_error() {
            debug!("Static errors while scanning or parsing, not running");
            self.had_error = true;
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if resolver.had_error() {
            debug!("Resolve errors, not running");
            self.had_error = true;
            return;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            debug!("Runtime error: {}", e);
            self.reporter.report_runtime_error(&e);
            self.had_runtime_error = true;
        }
    }

    /// Run a script file and return the process exit status.
    pub fn run_file(&mut self, path: &Path) -> Result<i32> {
        info!("Running file {:?}", path);

        let text: String = source::read_source(path)?;

        self.interpreter.set_script_path(path);
        self.reporter.set_current_file(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        );

        self.run_source(&text);

        Ok(self.exit_code())
    }

    /// Read‑eval‑print loop.  Each line is a unit of its own; errors are
    /// reported and forgotten before the next prompt.
    pub fn run_prompt<R: BufRead, W: Write>(&mut self, input: R, prompt: &mut W) -> Result<()> {
        info!("Starting REPL");

        self.interpreter.set_repl_mode(true);

        let mut lines = input.lines();

        loop {
            write!(prompt, "{}", PROMPT)?;
            prompt.flush()?;

            let line: String = match lines.next() {
                Some(line) => line?,
                None => break,
            };

            self.run_source(&line);

            self.had_error = false;
            self.had_runtime_error = false;
        }

        writeln!(prompt)?;

        info!("REPL finished");

        Ok(())
    }
}
