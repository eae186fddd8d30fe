//! Static resolver pass.
//!
//! One AST walk that
//! 1. mirrors the interpreter's frame nesting with a stack of
//!    `HashMap<String,bool>` scopes (declared / defined),
//! 2. reports static errors (redeclaration, read in own initializer, misplaced
//!    `return` / `this` / `super`, bad `init`), and
//! 3. tells the interpreter, for each variable occurrence, at what distance
//!    its binding lives.  Unrecorded references are globals.
//!
//! Errors go to the shared reporter and resolution carries on, so a single
//! pass finds as many problems as possible.  Check [`Resolver::had_error`]
//! before running the program.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::error::YauplError;
use crate::interpreter::Interpreter;
use crate::reporter::SharedReporter;
use crate::stack::ensure_sufficient_stack;
use crate::token::Token;

/// What kind of function body we are in.  Validates `return`, `this`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
    StaticMethod,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

pub struct Resolver<'interp> {
    interpreter: &'interp mut Interpreter,
    reporter: SharedReporter,
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    current_class: ClassType,
    had_error: bool,
}

impl<'interp> Resolver<'interp> {
    /// Create a new resolver bound to the given interpreter; errors go to the
    /// interpreter's reporter.
    pub fn new(interpreter: &'interp mut Interpreter) -> Self {
        info!("Resolver instantiated");

        let reporter: SharedReporter = interpreter.reporter();

        Resolver {
            interpreter,
            reporter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            had_error: false,
        }
    }

    /// Walk all top‑level statements.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    fn error(&mut self, token: &Token, message: &str) {
        debug!("Resolve error at line {}: {}", token.line, message);

        self.had_error = true;
        self.reporter.report_error(&YauplError::resolve(token, message));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(stmt))
    }

    fn resolve_stmt_inner(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_all(statements);
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Const { name, initializer } => {
                self.declare(name);
                self.resolve_expr(initializer);
                self.define(name);
            }

            Stmt::Function(decl) => {
                // name is visible inside its own body
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionType::Function);
            }

            Stmt::Class {
                name,
                superclass,
                methods,
                static_methods,
            } => self.resolve_class(name, superclass.as_ref(), methods, static_methods),

            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While {
                condition,
                body,
                increment,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
                // runs in the loop's frame, not the body's
                if let Some(inc) = increment {
                    self.resolve_expr(inc);
                }
            }

            Stmt::DoWhile { body, condition } => {
                self.resolve_stmt(body);
                self.resolve_expr(condition);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(keyword, "Cannot return from top-level code.");
                }

                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword, "Cannot return a value from an initializer.");
                    }

                    self.resolve_expr(expr);
                }
            }

            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Import { .. } => {}
        }
    }

    fn resolve_all(&mut self, statements: &[Stmt]) {
        for s in statements {
            self.resolve_stmt(s);
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
        static_methods: &[Rc<FunctionDecl>],
    ) {
        debug!("Resolving class '{}'", name.lexeme);

        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(sc) = superclass {
            if let Expr::Variable { name: sc_name, .. } = sc {
                if sc_name.lexeme == name.lexeme {
                    self.error(sc_name, "A class cannot inherit from itself.");
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(sc);

            self.begin_scope();
            self.define_synthetic("super");
        }

        self.begin_scope();
        self.define_synthetic("this");

        for method in methods {
            let kind = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };

            self.resolve_function(method, kind);
        }

        // static bodies run one frame below the class frame, where bound
        // methods keep `this`; the frame exists but binds nothing
        if let Some(scope) = self.scopes.last_mut() {
            scope.remove("this");
        }

        for method in static_methods {
            if method.name.lexeme == "init" {
                self.error(&method.name, "A static method cannot be an initializer.");
            }

            self.resolve_function(method, FunctionType::StaticMethod);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| self.resolve_expr_inner(expr))
    }

    fn resolve_expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) | Expr::StringLiteral(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(inner),

            Expr::Unary { right, .. } => self.resolve_expr(right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::ArrayLiteral { elements, .. } => {
                for e in elements {
                    self.resolve_expr(e);
                }
            }

            Expr::Variable { id, name } => {
                let in_own_initializer: bool = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.get(&name.lexeme) == Some(&false));

                if in_own_initializer {
                    self.error(name, "Cannot read local variable in its own initializer.");
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Cannot use 'this' outside of a class.");
                    return;
                }

                if self.current_function == FunctionType::StaticMethod {
                    self.error(keyword, "Cannot use 'this' in a static method.");
                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.error(keyword, "Cannot use 'super' outside of a class.");
                        return;
                    }
                    ClassType::Class => {
                        self.error(keyword, "Cannot use 'super' in a class with no superclass.");
                        return;
                    }
                    ClassType::Subclass => {}
                }

                if self.current_function == FunctionType::StaticMethod {
                    self.error(keyword, "Cannot use 'super' in a static method.");
                    return;
                }

                self.resolve_local(*id, keyword);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionType) {
        let enclosing = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_all(&decl.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
        debug!("Began scope; depth is now {}", self.scopes.len());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
        debug!("Ended scope; depth is now {}", self.scopes.len());
    }

    fn declare(&mut self, name: &Token) {
        let duplicate: bool = match self.scopes.last_mut() {
            Some(scope) => {
                let exists = scope.contains_key(&name.lexeme);
                scope.insert(name.lexeme.clone(), false);
                exists
            }
            None => false,
        };

        if duplicate {
            self.error(
                name,
                &format!("Variable {} is already declared in this scope.", name.lexeme),
            );
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn define_synthetic(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    /// Record the distance to the innermost scope binding `name`.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' {} at depth {}", name.lexeme, id, i);
                self.interpreter.resolve(id, i);
                return;
            }
        }

        debug!("'{}' left global", name.lexeme);
    }
}
