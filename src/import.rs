//! `import "path";`
//!
//! The imported file goes through the whole pipeline with the importing
//! interpreter's reporter.  Only its declarations are kept, and they run in
//! the global frame, so everything a file declares becomes a global of the
//! importer.  Failures of any kind surface as one runtime error at the
//! `import` keyword.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::ast::Stmt;
use crate::error::{Result, YauplError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::SharedReporter;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::source;
use crate::token::Token;

fn failed(keyword: &Token, path: &str) -> YauplError {
    YauplError::runtime(
        keyword,
        format!("Error while interpreting file {}'s content.", path),
    )
}

/// Resolve `path` against `base` unless it is absolute.
pub fn locate(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);

    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

pub(crate) fn import_file(interpreter: &mut Interpreter, keyword: &Token, path: &str) -> Result<()> {
    info!("Importing '{}'", path);

    let located: PathBuf = locate(interpreter.script_dir(), path);
    let canonical: PathBuf = located.canonicalize().map_err(|e| {
        YauplError::runtime(keyword, format!("Cannot import {}: {}.", path, e))
    })?;

    if interpreter.is_importing(&canonical) {
        return Err(YauplError::runtime(
            keyword,
            format!("Circular import of {}.", path),
        ));
    }

    if interpreter.was_imported(&canonical) {
        debug!("'{}' already imported, skipping", canonical.display());
        return Ok(());
    }

    let text: String = source::read_source(&canonical).map_err(|e| {
        YauplError::runtime(keyword, format!("Cannot import {}: {}.", path, e))
    })?;

    let reporter: SharedReporter = interpreter.reporter();

    let scanned = Scanner::new(&text).scan_tokens(reporter.as_ref());
    let mut parser = Parser::new(&scanned.tokens, reporter);
    let statements: Vec<Stmt> = parser.parse();

    if scanned.had_error || parser.had_error() {
        return Err(failed(keyword, path));
    }

    let declarations: Vec<Stmt> = statements
        .into_iter()
        .filter(|s| s.is_declaration())
        .collect();

    debug!(
        "Keeping {} declaration(s) from '{}'",
        declarations.len(),
        path
    );

    let mut resolver = Resolver::new(interpreter);
    resolver.resolve(&declarations);

    if resolver.had_error() {
        return Err(failed(keyword, path));
    }

    if let Err(e) = interpreter.run_imported(canonical, &declarations) {
        interpreter.reporter().report_runtime_error(&e);
        return Err(failed(keyword, path));
    }

    info!("Imported '{}'", path);

    Ok(())
}
