//! Callable runtime objects: native functions, user functions (including
//! bound methods), classes and their instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::environment::{EnvRef, Environment};
use crate::error::{Result, YauplError};
use crate::token::Token;
use crate::value::Value;

pub const MAX_ARITY: usize = 255;

/// Accepted argument counts of a callable.
///
/// The set is always the contiguous range `min..=max`: every callable takes
/// either a fixed count, an optional trailing argument (`String()`), or any
/// count up to [`MAX_ARITY`] (`Set(...)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: usize,
}

impl Arity {
    pub const ZERO: Arity = Arity::exactly(0);
    pub const NULLABLE: Arity = Arity { min: 0, max: 1 };
    pub const UNARY: Arity = Arity::exactly(1);
    pub const BINARY: Arity = Arity::exactly(2);
    pub const VARIADIC: Arity = Arity {
        min: 0,
        max: MAX_ARITY,
    };

    pub const fn exactly(n: usize) -> Self {
        Arity { min: n, max: n }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    /// Check `args` against this arity, erroring at `paren` on mismatch.
    pub fn check(&self, paren: &Token, args: &[Value]) -> Result<()> {
        if self.accepts(args.len()) {
            return Ok(());
        }

        Err(YauplError::runtime(
            paren,
            format!("Expected {} arguments but got {}.", self, args.len()),
        ))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max - self.min {
            0 => write!(f, "{}", self.min),
            1 => write!(f, "{} or {}", self.min, self.max),
            _ => write!(f, "{} to {}", self.min, self.max),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native functions
// ─────────────────────────────────────────────────────────────────────────────

/// Host implementation of a native callable.  The token is the call's
/// closing parenthesis, used for error positions.
pub type NativeFn = dyn Fn(&Token, Vec<Value>) -> Result<Value>;

pub struct NativeFunction {
    pub name: String,
    pub arity: Arity,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: Arity, func: F) -> Self
    where
        F: Fn(&Token, Vec<Value>) -> Result<Value> + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }

    pub fn call(&self, paren: &Token, args: Vec<Value>) -> Result<Value> {
        (self.func)(paren, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({}, arity {})", self.name, self.arity)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User functions
// ─────────────────────────────────────────────────────────────────────────────

/// A `fun` declaration or method paired with the frame it closes over.
pub struct UserFunction {
    pub decl: Rc<FunctionDecl>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl UserFunction {
    pub fn new(decl: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            decl,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name.lexeme
    }

    pub fn arity(&self) -> Arity {
        Arity::exactly(self.decl.params.len())
    }

    /// Copy of this method whose closure is a new one‑entry frame binding
    /// `this` to `instance`.
    pub fn bind(&self, instance: &Rc<Instance>) -> UserFunction {
        let env: EnvRef = Environment::child(&self.closure);

        env.borrow_mut()
            .define_builtin("this", Value::Instance(Rc::clone(instance)), true);

        UserFunction::new(Rc::clone(&self.decl), env, self.is_initializer)
    }
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserFunction({})", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes and instances
// ─────────────────────────────────────────────────────────────────────────────

pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    methods: HashMap<String, Rc<UserFunction>>,
    static_methods: HashMap<String, Rc<UserFunction>>,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Rc<UserFunction>>,
        static_methods: HashMap<String, Rc<UserFunction>>,
    ) -> Self {
        Self {
            name: name.into(),
            superclass,
            methods,
            static_methods,
        }
    }

    /// Instance method lookup, falling back to the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<UserFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass.as_ref().and_then(|s| s.find_method(name))
    }

    pub fn find_static_method(&self, name: &str) -> Option<Rc<UserFunction>> {
        if let Some(method) = self.static_methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass
            .as_ref()
            .and_then(|s| s.find_static_method(name))
    }

    /// Constructor arity: that of `init`, or zero without one.
    pub fn arity(&self) -> Arity {
        self.find_method("init")
            .map(|init| init.arity())
            .unwrap_or(Arity::ZERO)
    }

    /// `Class.name` reads static methods only.
    pub fn get(&self, name: &Token) -> Result<Value> {
        self.find_static_method(&name.lexeme)
            .map(Value::Function)
            .ok_or_else(|| {
                YauplError::runtime(
                    name,
                    format!("Undefined static method {}.", name.lexeme),
                )
            })
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name)
    }
}

pub struct Instance {
    pub class: Rc<Class>,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Fields shadow methods; methods come back bound to `instance`.
    pub fn get(instance: &Rc<Instance>, name: &Token) -> Result<Value> {
        if let Some(value) = instance.fields.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = instance.class.find_method(&name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(instance))));
        }

        Err(YauplError::runtime(
            name,
            format!("Undefined property {}.", name.lexeme),
        ))
    }

    pub fn set(&self, name: &Token, value: Value) {
        self.fields.borrow_mut().insert(name.lexeme.clone(), value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.class.name)
    }
}
