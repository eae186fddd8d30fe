//! `File(path)`: a handle on a host path.  Every method touches the file
//! system directly; I/O failures become runtime errors.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;

use crate::error::{Result, YauplError};
use crate::function::Arity;
use crate::token::Token;
use crate::value::Value;

use super::{method, undefined_property};

fn io_error(paren: &Token, action: &str, e: io::Error) -> YauplError {
    YauplError::runtime(paren, format!("File {} failed : {}.", action, e))
}

fn delete(path: &Path) -> io::Result<bool> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn write_text(path: &Path, text: &str, append: bool) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    file.write_all(text.as_bytes())
}

pub fn get(path: &Rc<PathBuf>, name: &Token) -> Result<Value> {
    let p: Rc<PathBuf> = Rc::clone(path);

    debug!("File property '{}' on {:?}", name.lexeme, p);

    match name.lexeme.as_str() {
        "create" => method("create", Arity::ZERO, move |paren, _| {
            match OpenOptions::new().write(true).create_new(true).open(&*p) {
                Ok(_) => Ok(Value::Bool(true)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Value::Bool(false)),
                Err(e) => Err(io_error(paren, "creation", e)),
            }
        }),

        "delete" => method("delete", Arity::ZERO, move |paren, _| {
            delete(&p)
                .map(Value::Bool)
                .map_err(|e| io_error(paren, "deletion", e))
        }),

        "exists" => method("exists", Arity::ZERO, move |_, _| Ok(Value::Bool(p.exists()))),

        "read" => method("read", Arity::ZERO, move |paren, _| {
            fs::read_to_string(&*p)
                .map(Value::string)
                .map_err(|e| io_error(paren, "reading", e))
        }),

        "readLines" => method("readLines", Arity::ZERO, move |paren, _| {
            let text: String =
                fs::read_to_string(&*p).map_err(|e| io_error(paren, "reading", e))?;

            Ok(Value::list(text.lines().map(Value::string).collect()))
        }),

        "write" => method("write", Arity::UNARY, move |paren, args| {
            write_text(&p, &args[0].to_string(), false)
                .map_err(|e| io_error(paren, "writing", e))?;

            Ok(Value::Nil)
        }),

        "append" => method("append", Arity::UNARY, move |paren, args| {
            write_text(&p, &args[0].to_string(), true)
                .map_err(|e| io_error(paren, "appending", e))?;

            Ok(Value::Nil)
        }),

        "rename" => method("rename", Arity::UNARY, move |paren, args| {
            let destination = PathBuf::from(args[0].to_string());

            if destination.exists() {
                return Ok(Value::Bool(false));
            }

            fs::rename(&*p, &destination).map_err(|e| io_error(paren, "renaming", e))?;

            Ok(Value::Bool(true))
        }),

        "size" => method("size", Arity::ZERO, move |_, _| {
            let len: u64 = fs::metadata(&*p).map(|m| m.len()).unwrap_or(0);

            Ok(Value::Number(len as f64))
        }),

        "absolutePath" => method("absolutePath", Arity::ZERO, move |paren, _| {
            std::path::absolute(&*p)
                .map(|abs| Value::string(abs.to_string_lossy()))
                .map_err(|e| io_error(paren, "path resolution", e))
        }),

        "isDirectory" => method("isDirectory", Arity::ZERO, move |_, _| {
            Ok(Value::Bool(p.is_dir()))
        }),

        _ => Err(undefined_property("File", name)),
    }
}
