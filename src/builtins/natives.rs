//! Global native functions seeded into every interpreter.

use std::path::PathBuf;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::environment::EnvRef;
use crate::error::{Result, YauplError};
use crate::function::{Arity, NativeFunction};
use crate::token::Token;
use crate::value::Value;

fn define(globals: &EnvRef, name: &str, arity: Arity, func: fn(&Token, Vec<Value>) -> Result<Value>) {
    debug!("Defining native function '{}'", name);

    globals.borrow_mut().define_builtin(
        name,
        Value::Native(Rc::new(NativeFunction::new(name, arity, func))),
        false,
    );
}

/// Seconds since the Unix epoch, with microsecond resolution.
fn clock(_: &Token, _: Vec<Value>) -> Result<Value> {
    let now = Utc::now();
    let seconds = now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;

    Ok(Value::Number(seconds))
}

fn type_of(_: &Token, args: Vec<Value>) -> Result<Value> {
    Ok(Value::string(args[0].type_name()))
}

fn array(paren: &Token, args: Vec<Value>) -> Result<Value> {
    match args[0] {
        Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => {
            let elements = super::filled(paren, Value::Nil, n as usize, "Array size too large.")?;

            Ok(Value::array(elements))
        }

        ref other => Err(YauplError::runtime(
            paren,
            format!("Array size must be a non-negative integer, got {}.", other),
        )),
    }
}

fn list(_: &Token, _: Vec<Value>) -> Result<Value> {
    Ok(Value::list(Vec::new()))
}

fn set(_: &Token, args: Vec<Value>) -> Result<Value> {
    Ok(Value::set(args))
}

fn string(_: &Token, args: Vec<Value>) -> Result<Value> {
    Ok(match args.first() {
        Some(value) => Value::string(value.to_string()),
        None => Value::string(""),
    })
}

fn file(_: &Token, args: Vec<Value>) -> Result<Value> {
    Ok(Value::File(Rc::new(PathBuf::from(args[0].to_string()))))
}

/// Define `Clock`, `Type` and the built‑in constructors in `globals`.
pub fn define_globals(globals: &EnvRef) {
    define(globals, "Clock", Arity::ZERO, clock);
    define(globals, "Type", Arity::UNARY, type_of);
    define(globals, "Array", Arity::UNARY, array);
    define(globals, "List", Arity::ZERO, list);
    define(globals, "Set", Arity::VARIADIC, set);
    define(globals, "String", Arity::NULLABLE, string);
    define(globals, "File", Arity::UNARY, file);

    info!("Native globals defined");
}
