use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::function::{Class, Instance, NativeFunction, UserFunction};

/// Shared, mutable element storage of arrays, lists and sets.
pub type Elements = Rc<RefCell<Vec<Value>>>;

/// Every value a yaupl program can hold.
///
/// Primitives are copied; strings are shared immutable text; everything
/// else is shared by reference.
#[derive(Debug, Clone)]
pub enum Value {
    /// Declared with `let x;` and not assigned yet.
    Undefined,
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Native(Rc<NativeFunction>),
    Function(Rc<UserFunction>),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    /// Fixed length after construction.
    Array(Elements),
    List(Elements),
    /// Unique by value equality, kept in insertion order.
    Set(Elements),
    File(Rc<PathBuf>),
}

impl Value {
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(elements)))
    }

    /// Builds a set, dropping duplicates while keeping first occurrences.
    pub fn set(elements: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(elements.len());

        for e in elements {
            if !unique.contains(&e) {
                unique.push(e);
            }
        }

        Value::Set(Rc::new(RefCell::new(unique)))
    }

    /// `null` is false, booleans are themselves, numbers are true unless
    /// zero, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    /// Neither `null` nor the uninitialized sentinel.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, Value::Nil | Value::Undefined)
    }

    /// Short type tag, as returned by the `Type` native.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Nil => "Null",
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::Str(_) => "String",
            Value::Native(_) => "NativeFunction",
            Value::Function(_) => "Function",
            Value::Class(_) => "Class",
            Value::Instance(_) => "Instance",
            Value::Array(_) => "Array",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::File(_) => "File",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,

            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }

            (Value::Set(a), Value::Set(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }

                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().all(|e| b.contains(e))
            }

            (Value::File(a), Value::File(b)) => a == b,

            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),

            _ => false,
        }
    }
}

/// Number formatting: integral values without a fraction, others in the
/// shortest form that round‑trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }

    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }

    if n.fract() == 0.0 && n.abs() < 1e15 {
        let mut buf = itoa::Buffer::new();
        return buf.format(n as i64).to_owned();
    }

    n.to_string()
}

fn write_elements(f: &mut fmt::Formatter<'_>, elements: &Elements) -> fmt::Result {
    for (i, e) in elements.borrow().iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", e)?;
    }

    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),

            Value::Nil => f.write_str("null"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => f.write_str(&format_number(*n)),

            Value::Str(s) => f.write_str(s),

            Value::Native(n) => write!(f, "<native fun {}>", n.name),

            Value::Function(func) => write!(f, "<fun {}>", func.name()),

            Value::Class(c) => f.write_str(&c.name),

            Value::Instance(i) => write!(f, "{} instance", i.class.name),

            Value::Array(elements) => {
                f.write_str("Array [")?;
                write_elements(f, elements)?;
                f.write_str("]")
            }

            Value::List(elements) => {
                f.write_str("List [")?;
                write_elements(f, elements)?;
                f.write_str("]")
            }

            Value::Set(elements) => {
                f.write_str("Set {")?;
                write_elements(f, elements)?;
                f.write_str("}")
            }

            Value::File(path) => write!(f, "File({})", path.display()),
        }
    }
}
