//! `Array(size)`: fixed length, `null`‑filled at construction.

use std::rc::Rc;

use crate::error::{Result, YauplError};
use crate::function::Arity;
use crate::token::{Token, TokenType};
use crate::value::{Elements, Value};

use super::{method, resolve_index, to_int, undefined_property};

pub fn get(elements: &Elements, name: &Token) -> Result<Value> {
    let els: Elements = Rc::clone(elements);

    match name.lexeme.as_str() {
        "length" => Ok(Value::Number(elements.borrow().len() as f64)),

        "get" => method("get", Arity::UNARY, move |paren, args| match &args[0] {
            // `arr.get("set")` reaches the property named by the string
            Value::Str(prop) => get(&els, &Token::new(TokenType::IDENTIFIER, &**prop, paren.line)),

            index => {
                let index = to_int(paren, index, "Array index")?;
                let items = els.borrow();
                let i = resolve_index(paren, index, items.len(), true, "Array")?;

                Ok(items[i].clone())
            }
        }),

        "set" => method("set", Arity::BINARY, move |paren, mut args| {
            let value: Value = args.pop().unwrap_or(Value::Nil);
            let index = to_int(paren, &args[0], "Array index")?;

            let mut items = els.borrow_mut();
            let i = resolve_index(paren, index, items.len(), false, "Array")?;
            items[i] = value.clone();

            Ok(value)
        }),

        "concat" => method("concat", Arity::UNARY, move |paren, args| match &args[0] {
            Value::Array(other) => {
                let mut joined: Vec<Value> = els.borrow().clone();
                joined.extend(other.borrow().iter().cloned());

                Ok(Value::array(joined))
            }

            _ => Err(YauplError::runtime(
                paren,
                "Argument for Array.concat should be an Array.",
            )),
        }),

        "fill" => method("fill", Arity::UNARY, move |_, args| {
            let value: &Value = &args[0];

            for slot in els.borrow_mut().iter_mut() {
                *slot = value.clone();
            }

            Ok(Value::Nil)
        }),

        "find" => method("find", Arity::UNARY, move |_, args| {
            let found = els.borrow().iter().find(|e| **e == args[0]).cloned();

            Ok(found.unwrap_or(Value::Nil))
        }),

        "reverse" => method("reverse", Arity::ZERO, move |_, _| {
            let reversed: Vec<Value> = els.borrow().iter().rev().cloned().collect();

            Ok(Value::array(reversed))
        }),

        "contains" => method("contains", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(els.borrow().contains(&args[0])))
        }),

        _ => Err(undefined_property("Array", name)),
    }
}
