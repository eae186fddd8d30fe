//! String methods.  Positions and lengths count Unicode scalar values.

use std::rc::Rc;

use crate::error::{Result, YauplError};
use crate::function::Arity;
use crate::token::Token;
use crate::value::Value;

use super::{method, resolve_index, string_with_capacity, to_int, undefined_property};

/// Zero‑argument method computed from the text alone.
fn query<F>(name: &str, text: Rc<str>, f: F) -> Result<Value>
where
    F: Fn(&str) -> Value + 'static,
{
    method(name, Arity::ZERO, move |_, _| Ok(f(&text)))
}

fn single_char(paren: &Token, value: &Value) -> Result<char> {
    let s: String = value.to_string();
    let mut chars = s.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(YauplError::runtime(
            paren,
            "The value used for the padding should be a character.",
        )),
    }
}

fn pad(paren: &Token, text: &str, len: i64, fill: char, at_start: bool) -> Result<String> {
    let current = text.chars().count() as i64;
    let missing = len.saturating_sub(current).max(0) as usize;

    let bytes = missing
        .checked_mul(fill.len_utf8())
        .and_then(|n| n.checked_add(text.len()));
    let mut padded = string_with_capacity(paren, bytes, "Padding length too large.")?;

    if !at_start {
        padded.push_str(text);
    }
    padded.extend(std::iter::repeat(fill).take(missing));
    if at_start {
        padded.push_str(text);
    }

    Ok(padded)
}

pub fn get(text: &Rc<str>, name: &Token) -> Result<Value> {
    let s: Rc<str> = Rc::clone(text);

    match name.lexeme.as_str() {
        "length" => query("length", s, |t| Value::Number(t.chars().count() as f64)),
        "isEmpty" => query("isEmpty", s, |t| Value::Bool(t.is_empty())),
        "isNotEmpty" => query("isNotEmpty", s, |t| Value::Bool(!t.is_empty())),
        "isBlank" => query("isBlank", s, |t| Value::Bool(t.trim().is_empty())),
        "isNotBlank" => query("isNotBlank", s, |t| Value::Bool(!t.trim().is_empty())),
        "lowercase" => query("lowercase", s, |t| Value::string(t.to_lowercase())),
        "uppercase" => query("uppercase", s, |t| Value::string(t.to_uppercase())),
        "trim" => query("trim", s, |t| Value::string(t.trim())),
        "trimStart" => query("trimStart", s, |t| Value::string(t.trim_start())),
        "trimEnd" => query("trimEnd", s, |t| Value::string(t.trim_end())),

        "chars" => query("chars", s, |t| {
            Value::array(t.chars().map(|c| Value::string(c.to_string())).collect())
        }),

        "split" => method("split", Arity::UNARY, move |_, args| {
            let separator: String = args[0].to_string();
            let parts: Vec<Value> = s.split(separator.as_str()).map(Value::string).collect();

            Ok(Value::array(parts))
        }),

        "startsWith" => method("startsWith", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(s.starts_with(args[0].to_string().as_str())))
        }),

        "endsWith" => method("endsWith", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(s.ends_with(args[0].to_string().as_str())))
        }),

        "contains" => method("contains", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(s.contains(args[0].to_string().as_str())))
        }),

        "substring" => method("substring", Arity::BINARY, move |paren, args| {
            let start = to_int(paren, &args[0], "Substring start")?;
            let end = to_int(paren, &args[1], "Substring end")?;
            let len = s.chars().count() as i64;

            if start < 0 || end > len || start > end {
                return Err(YauplError::runtime(
                    paren,
                    format!("Substring range {}..{} is out of bounds.", start, end),
                ));
            }

            let part: String = s
                .chars()
                .skip(start as usize)
                .take((end - start) as usize)
                .collect();

            Ok(Value::string(part))
        }),

        "repeat" => method("repeat", Arity::UNARY, move |paren, args| {
            let times = to_int(paren, &args[0], "Repeat count")?;

            if times < 0 {
                return Err(YauplError::runtime(
                    paren,
                    "Invalid value for String.repeat.",
                ));
            }

            if s.is_empty() {
                return Ok(Value::string(""));
            }

            let times = times as usize;
            let bytes = s.len().checked_mul(times);
            let mut repeated =
                string_with_capacity(paren, bytes, "Invalid value for String.repeat.")?;

            for _ in 0..times {
                repeated.push_str(&s);
            }

            Ok(Value::string(repeated))
        }),

        "padStart" => method("padStart", Arity::BINARY, move |paren, args| {
            let len = to_int(paren, &args[0], "Padding length")?;
            let fill = single_char(paren, &args[1])?;

            Ok(Value::string(pad(paren, &s, len, fill, true)?))
        }),

        "padEnd" => method("padEnd", Arity::BINARY, move |paren, args| {
            let len = to_int(paren, &args[0], "Padding length")?;
            let fill = single_char(paren, &args[1])?;

            Ok(Value::string(pad(paren, &s, len, fill, false)?))
        }),

        "charAt" => method("charAt", Arity::UNARY, move |paren, args| {
            let position = to_int(paren, &args[0], "Position")?;
            let len = s.chars().count();

            let i = resolve_index(paren, position, len, true, "String").map_err(|_| {
                YauplError::runtime(
                    paren,
                    "Position for charAt out of the string length range.",
                )
            })?;

            Ok(s.chars()
                .nth(i)
                .map(|c| Value::string(c.to_string()))
                .unwrap_or(Value::Nil))
        }),

        _ => Err(undefined_property("String", name)),
    }
}
