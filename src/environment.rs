use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::debug;

use crate::error::{Result, YauplError};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to a scope frame.  Closures, child frames and the
/// interpreter all hold these, so a frame lives as long as any of them.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope frame: bindings, which of them are constant, the type each
/// binding was first given, and the enclosing frame.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    constants: HashSet<String>,
    types: HashMap<String, &'static str>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            enclosing: Some(enclosing),
            ..Self::default()
        }
    }

    /// Fresh global frame.
    pub fn new_ref() -> EnvRef {
        Rc::new(RefCell::new(Environment::new()))
    }

    /// Fresh frame whose outer frame is `parent`.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(parent))))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Bind `name` in this frame.  Redeclaring a name of the same frame is an
    /// error.
    pub fn define(&mut self, name: &Token, value: Value, constant: bool) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            return Err(YauplError::runtime(
                name,
                format!("Cannot redeclare variable {}.", name.lexeme),
            ));
        }

        debug!("define '{}' = {} (constant={})", name.lexeme, value, constant);

        self.bind(&name.lexeme, value, constant);

        Ok(())
    }

    /// Bind an interpreter‑provided name (`this`, `super`, native globals),
    /// replacing any previous binding.
    pub fn define_builtin(&mut self, name: &str, value: Value, constant: bool) {
        self.bind(name, value, constant);
    }

    fn bind(&mut self, name: &str, value: Value, constant: bool) {
        self.record_type(name, &value);
        self.values.insert(name.to_string(), value);

        if constant {
            self.constants.insert(name.to_string());
        }
    }

    fn record_type(&mut self, name: &str, value: &Value) {
        if value.is_concrete() && !self.types.contains_key(name) {
            self.types.insert(name.to_string(), value.type_name());
        }
    }

    /// Look `name` up here, then outward.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if self.values.contains_key(&name.lexeme) {
            return self.get_here(name);
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(undefined(name)),
        }
    }

    /// Reassign the nearest binding of `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            return self.assign_here(name, value);
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(undefined(name)),
        }
    }

    /// Read `name` from this frame only.
    fn get_here(&self, name: &Token) -> Result<Value> {
        match self.values.get(&name.lexeme) {
            Some(Value::Undefined) => Err(YauplError::runtime(
                name,
                format!("Variable {} used before initialization.", name.lexeme),
            )),
            Some(value) => Ok(value.clone()),
            None => Err(undefined(name)),
        }
    }

    /// Reassign `name` in this frame only.
    fn assign_here(&mut self, name: &Token, value: Value) -> Result<()> {
        if !self.values.contains_key(&name.lexeme) {
            return Err(undefined(name));
        }

        if self.constants.contains(&name.lexeme) {
            return Err(YauplError::runtime(
                name,
                format!("Cannot reassign constant {}.", name.lexeme),
            ));
        }

        if value.is_concrete() {
            if let Some(frozen) = self.types.get(&name.lexeme) {
                let actual: &'static str = value.type_name();

                if *frozen != actual {
                    return Err(YauplError::runtime(
                        name,
                        format!(
                            "Cannot assign a value of type {} to variable {} of type {}.",
                            actual, name.lexeme, frozen
                        ),
                    ));
                }
            }
        }

        debug!("assign '{}' = {}", name.lexeme, value);

        self.record_type(&name.lexeme, &value);
        self.values.insert(name.lexeme.clone(), value);

        Ok(())
    }

    /// Remove `name` from this frame, returning its value if it was bound.
    pub fn undef(&mut self, name: &str) -> Option<Value> {
        self.constants.remove(name);
        self.types.remove(name);
        self.values.remove(name)
    }

    /// Whether this very frame binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    // ───────────────────── distance‑based access ─────────────────────

    /// Walk `distance` frames outward from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize, name: &Token) -> Result<EnvRef> {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let next: Option<EnvRef> = current.borrow().enclosing();

            current = next.ok_or_else(|| {
                YauplError::runtime(
                    name,
                    format!("Scope of {} is no longer reachable.", name.lexeme),
                )
            })?;
        }

        Ok(current)
    }

    /// Read `name` from the frame exactly `distance` out; that frame must
    /// bind it.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        let frame: EnvRef = Self::ancestor(env, distance, name)?;
        let value = frame.borrow().get_here(name);
        value
    }

    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let frame: EnvRef = Self::ancestor(env, distance, name)?;
        let result = frame.borrow_mut().assign_here(name, value);
        result
    }
}

fn undefined(name: &Token) -> YauplError {
    YauplError::runtime(name, format!("Undefined variable {}.", name.lexeme))
}
