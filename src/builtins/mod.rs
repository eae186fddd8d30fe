//! Built‑in composite types and global native functions.
//!
//! Arrays, lists, sets, strings and files have no fields of their own.
//! Reading a property (`arr.get`, `s.length`) returns a native function
//! bound to the receiver, built on demand by the per‑type `get` functions.

pub mod array;
pub mod file;
pub mod list;
pub mod natives;
pub mod set;
pub mod string;

use std::rc::Rc;

use crate::error::{Result, YauplError};
use crate::function::{Arity, NativeFunction};
use crate::token::Token;
use crate::value::Value;

/// Property read on a built‑in value.  `None` when `receiver` is not one.
pub fn get_property(receiver: &Value, name: &Token) -> Option<Result<Value>> {
    let result = match receiver {
        Value::Array(elements) => array::get(elements, name),
        Value::List(elements) => list::get(elements, name),
        Value::Set(elements) => set::get(elements, name),
        Value::Str(s) => string::get(s, name),
        Value::File(path) => file::get(path, name),
        _ => return None,
    };

    Some(result)
}

/// The error for `receiver.name = …` on a built‑in value.  `None` when
/// `receiver` is not one.
pub fn set_property_error(receiver: &Value, name: &Token) -> Option<YauplError> {
    let what = match receiver {
        Value::Array(_) => "arrays",
        Value::List(_) => "lists",
        Value::Set(_) => "sets",
        Value::Str(_) => "strings",
        Value::File(_) => "files",
        _ => return None,
    };

    Some(YauplError::runtime(
        name,
        format!("Cannot add properties to {}.", what),
    ))
}

/// Wrap a closure as a method value.
pub(crate) fn method<F>(name: &str, arity: Arity, func: F) -> Result<Value>
where
    F: Fn(&Token, Vec<Value>) -> Result<Value> + 'static,
{
    Ok(Value::Native(Rc::new(NativeFunction::new(name, arity, func))))
}

pub(crate) fn undefined_property(kind: &str, name: &Token) -> YauplError {
    YauplError::runtime(
        name,
        format!("Undefined {} property {}.", kind, name.lexeme),
    )
}

/// Truncate a numeric argument to an integer.
pub(crate) fn to_int(paren: &Token, value: &Value, what: &str) -> Result<i64> {
    match value {
        Value::Number(n) => Ok(n.trunc() as i64),
        other => Err(YauplError::runtime(
            paren,
            format!("{} must be a number, got {}.", what, other.type_name()),
        )),
    }
}

/// A vector of `count` copies of `value`, or `message` as a runtime error
/// when that much memory cannot be reserved.
pub(crate) fn filled<T: Clone>(paren: &Token, value: T, count: usize, message: &str) -> Result<Vec<T>> {
    let mut elements: Vec<T> = Vec::new();

    elements
        .try_reserve_exact(count)
        .map_err(|_| YauplError::runtime(paren, message))?;
    elements.resize(count, value);

    Ok(elements)
}

/// An empty string with room for `bytes` bytes.  `None` stands for a size
/// that already overflowed while being computed.
pub(crate) fn string_with_capacity(paren: &Token, bytes: Option<usize>, message: &str) -> Result<String> {
    let mut text = String::new();

    bytes
        .and_then(|n| text.try_reserve_exact(n).ok())
        .ok_or_else(|| YauplError::runtime(paren, message))?;

    Ok(text)
}

/// Map a possibly negative `index` onto `0..len`.  Negative indexes count
/// from the end only when `wrap` is set.
pub(crate) fn resolve_index(
    paren: &Token,
    index: i64,
    len: usize,
    wrap: bool,
    kind: &str,
) -> Result<usize> {
    let len = len as i64;
    let actual = if wrap && index < 0 { index + len } else { index };

    if actual < 0 || actual >= len {
        return Err(YauplError::runtime(
            paren,
            format!("{} index {} is out of bounds.", kind, index),
        ));
    }

    Ok(actual as usize)
}
