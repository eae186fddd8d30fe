//! `Set(e1, …, eN)`: unique elements by value equality, insertion ordered.

use std::rc::Rc;

use crate::error::{Result, YauplError};
use crate::function::Arity;
use crate::token::Token;
use crate::value::{Elements, Value};

use super::{method, undefined_property};

fn other_set(paren: &Token, operation: &str, arg: &Value) -> Result<Elements> {
    match arg {
        Value::Set(other) => Ok(Rc::clone(other)),
        _ => Err(YauplError::runtime(
            paren,
            format!("Cannot call '{}' with non Set.", operation),
        )),
    }
}

pub fn get(elements: &Elements, name: &Token) -> Result<Value> {
    let els: Elements = Rc::clone(elements);

    match name.lexeme.as_str() {
        "add" => method("add", Arity::UNARY, move |_, mut args| {
            let value: Value = args.pop().unwrap_or(Value::Nil);

            // compare before mutably borrowing: `s.add(s)` reads `els`
            let present: bool = els.borrow().contains(&value);
            if !present {
                els.borrow_mut().push(value);
            }

            Ok(Value::Bool(!present))
        }),

        "remove" => method("remove", Arity::UNARY, move |_, args| {
            let position = els.borrow().iter().position(|e| *e == args[0]);

            Ok(Value::Bool(match position {
                Some(i) => {
                    els.borrow_mut().remove(i);
                    true
                }
                None => false,
            }))
        }),

        "contains" => method("contains", Arity::UNARY, move |_, args| {
            Ok(Value::Bool(els.borrow().contains(&args[0])))
        }),

        "size" => method("size", Arity::ZERO, move |_, _| {
            Ok(Value::Number(els.borrow().len() as f64))
        }),

        "clear" => method("clear", Arity::ZERO, move |_, _| {
            els.borrow_mut().clear();

            Ok(Value::Nil)
        }),

        "toArray" => method("toArray", Arity::ZERO, move |_, _| {
            Ok(Value::array(els.borrow().clone()))
        }),

        "toList" => method("toList", Arity::ZERO, move |_, _| {
            Ok(Value::list(els.borrow().clone()))
        }),

        "union" => method("union", Arity::UNARY, move |paren, args| {
            let other: Elements = other_set(paren, "union", &args[0])?;

            let mut all: Vec<Value> = els.borrow().clone();
            all.extend(other.borrow().iter().cloned());

            Ok(Value::set(all))
        }),

        "intersection" => method("intersection", Arity::UNARY, move |paren, args| {
            let other: Elements = other_set(paren, "intersection", &args[0])?;
            let other = other.borrow();

            let common: Vec<Value> = els
                .borrow()
                .iter()
                .filter(|e| other.contains(e))
                .cloned()
                .collect();

            Ok(Value::set(common))
        }),

        "difference" => method("difference", Arity::UNARY, move |paren, args| {
            let other: Elements = other_set(paren, "difference", &args[0])?;
            let other = other.borrow();

            let only_here: Vec<Value> = els
                .borrow()
                .iter()
                .filter(|e| !other.contains(e))
                .cloned()
                .collect();

            Ok(Value::set(only_here))
        }),

        _ => Err(undefined_property("Set", name)),
    }
}
