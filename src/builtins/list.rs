//! `List()`: growable, index‑addressed.

use std::rc::Rc;

use crate::error::{Result, YauplError};
use crate::function::Arity;
use crate::token::Token;
use crate::value::{Elements, Value};

use super::{method, resolve_index, to_int, undefined_property};

pub fn get(elements: &Elements, name: &Token) -> Result<Value> {
    let els: Elements = Rc::clone(elements);

    match name.lexeme.as_str() {
        "length" => Ok(Value::Number(elements.borrow().len() as f64)),

        "add" => method("add", Arity::UNARY, move |_, mut args| {
            let value: Value = args.pop().unwrap_or(Value::Nil);
            els.borrow_mut().push(value);

            Ok(Value::Nil)
        }),

        "get" => method("get", Arity::UNARY, move |paren, args| {
            let index = to_int(paren, &args[0], "List index")?;
            let items = els.borrow();
            let i = resolve_index(paren, index, items.len(), false, "List")?;

            Ok(items[i].clone())
        }),

        "set" => method("set", Arity::BINARY, move |paren, mut args| {
            let value: Value = args.pop().unwrap_or(Value::Nil);
            let index = to_int(paren, &args[0], "List index")?;

            let mut items = els.borrow_mut();
            let i = resolve_index(paren, index, items.len(), false, "List")?;
            items[i] = value.clone();

            Ok(value)
        }),

        "remove" => method("remove", Arity::UNARY, move |paren, args| {
            let index = to_int(paren, &args[0], "List index")?;

            let mut items = els.borrow_mut();
            let i = resolve_index(paren, index, items.len(), false, "List")?;

            Ok(items.remove(i))
        }),

        "concat" => method("concat", Arity::UNARY, move |paren, args| match &args[0] {
            Value::List(other) => {
                let mut joined: Vec<Value> = els.borrow().clone();
                joined.extend(other.borrow().iter().cloned());

                Ok(Value::list(joined))
            }

            _ => Err(YauplError::runtime(
                paren,
                "Argument for List.concat should be a List.",
            )),
        }),

        "fill" => method("fill", Arity::UNARY, move |_, args| {
            for slot in els.borrow_mut().iter_mut() {
                *slot = args[0].clone();
            }

            Ok(Value::Nil)
        }),

        "find" => method("find", Arity::UNARY, move |_, args| {
            let found = els.borrow().iter().find(|e| **e == args[0]).cloned();

            Ok(found.unwrap_or(Value::Nil))
        }),

        "reverse" => method("reverse", Arity::ZERO, move |_, _| {
            let reversed: Vec<Value> = els.borrow().iter().rev().cloned().collect();

            Ok(Value::list(reversed))
        }),

        "contains" => method("contains", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(els.borrow().contains(&args[0])))
        }),

        "clear" => method("clear", Arity::ZERO, move |_, _| {
            els.borrow_mut().clear();

            Ok(Value::Nil)
        }),

        _ => Err(undefined_property("List", name)),
    }
}
