//! Tree‑walking evaluator.
//!
//! Statements run against a chain of [`Environment`] frames.  Variable
//! references that the resolver bound to a local scope are looked up at
//! their recorded distance; all others go straight to `globals`.
//!
//! Control flow (`break`, `continue`, `return`) travels back up through
//! [`Flow`] values, never through the error channel.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::builtins;
use crate::config::InterpreterConfig;
use crate::environment::{EnvRef, Environment};
use crate::error::{Result, YauplError};
use crate::function::{Class, Instance, UserFunction};
use crate::import;
use crate::reporter::{ConsoleReporter, SharedReporter};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<ExprId, usize>,
    /// Number of loops enclosing the running statement in the current call.
    loop_depth: usize,
    call_depth: usize,
    config: InterpreterConfig,
    out: Box<dyn Write>,
    reporter: SharedReporter,
    /// Canonical paths of the script and the imports being run, outermost
    /// first.
    import_chain: Vec<PathBuf>,
    /// Files whose declarations already live in `globals`.
    imported: HashSet<PathBuf>,
}

impl Interpreter {
    /// Interpreter printing to stdout and reporting to stderr.
    pub fn new() -> Self {
        Self::with_output(
            InterpreterConfig::default(),
            Rc::new(ConsoleReporter::new()),
            Box::new(io::stdout()),
        )
    }

    pub fn with_output(
        config: InterpreterConfig,
        reporter: SharedReporter,
        out: Box<dyn Write>,
    ) -> Self {
        info!("Initializing Interpreter with {:?}", config);

        let globals: EnvRef = Environment::new_ref();
        builtins::natives::define_globals(&globals);

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            loop_depth: 0,
            call_depth: 0,
            config,
            out,
            reporter,
            import_chain: Vec::new(),
            imported: HashSet::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Run a resolved program.  Stops at the first runtime error, which is
    /// returned (not reported).
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");

        Ok(())
    }

    /// Called by the resolver: `id` refers to a binding `depth` frames out.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Noting local {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    pub fn reporter(&self) -> SharedReporter {
        Rc::clone(&self.reporter)
    }

    pub fn set_repl_mode(&mut self, on: bool) {
        self.config.repl_mode = on;
    }

    /// Record the script being run: relative imports resolve against its
    /// directory and it counts as already imported.
    pub fn set_script_path(&mut self, path: &Path) {
        let canonical: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if let Some(dir) = canonical.parent() {
            self.config.script_dir = dir.to_path_buf();
        }

        self.import_chain = vec![canonical];
    }

    // ───────────────────────── imports ────────────────────────────

    pub(crate) fn script_dir(&self) -> &Path {
        &self.config.script_dir
    }

    pub(crate) fn is_importing(&self, path: &Path) -> bool {
        self.import_chain.iter().any(|p| p == path)
    }

    pub(crate) fn was_imported(&self, path: &Path) -> bool {
        self.imported.contains(path)
    }

    /// Run `statements` in the global frame with `path` as the current file.
    pub(crate) fn run_imported(&mut self, path: PathBuf, statements: &[Stmt]) -> Result<()> {
        let dir: PathBuf = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.script_dir.clone());

        let saved_dir = mem::replace(&mut self.config.script_dir, dir);
        let saved_env = mem::replace(&mut self.environment, Rc::clone(&self.globals));
        let saved_loops = mem::replace(&mut self.loop_depth, 0);
        self.import_chain.push(path.clone());

        let result = self.run_statements(statements).map(|_| ());

        self.import_chain.pop();
        if result.is_ok() {
            self.imported.insert(path);
        }
        self.loop_depth = saved_loops;
        self.environment = saved_env;
        self.config.script_dir = saved_dir;

        result
    }

    // ───────────────────────── statements ─────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                let value: Value = self.evaluate(expr)?;

                if self.config.repl_mode {
                    writeln!(self.out, "{}", value)?;
                }

                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;

                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);

                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Undefined,
                };

                self.environment.borrow_mut().define(name, value, false)?;

                Ok(Flow::Normal)
            }

            Stmt::Const { name, initializer } => {
                let value: Value = self.evaluate(initializer)?;

                self.environment.borrow_mut().define(name, value, true)?;

                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let env: EnvRef = Environment::child(&self.environment);

                self.execute_block(statements, env)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While {
                condition,
                body,
                increment,
            } => {
                self.loop_depth += 1;
                let result = self.run_while(condition, body, increment.as_ref());
                self.loop_depth -= 1;

                result
            }

            Stmt::DoWhile { body, condition } => {
                self.loop_depth += 1;
                let result = self.run_do_while(body, condition);
                self.loop_depth -= 1;

                result
            }

            Stmt::Break(keyword) => {
                if self.loop_depth == 0 {
                    return Err(YauplError::runtime(
                        keyword,
                        "Cannot use 'break' outside of a loop.",
                    ));
                }

                Ok(Flow::Break)
            }

            Stmt::Continue(keyword) => {
                if self.loop_depth == 0 {
                    return Err(YauplError::runtime(
                        keyword,
                        "Cannot use 'continue' outside of a loop.",
                    ));
                }

                Ok(Flow::Continue)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Returning value: {}", value);

                Ok(Flow::Return(value))
            }

            Stmt::Function(decl) => {
                let function = UserFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);

                self.environment.borrow_mut().define(
                    &decl.name,
                    Value::Function(Rc::new(function)),
                    false,
                )?;

                Ok(Flow::Normal)
            }

            Stmt::Class {
                name,
                superclass,
                methods,
                static_methods,
            } => {
                self.execute_class(name, superclass.as_ref(), methods, static_methods)?;

                Ok(Flow::Normal)
            }

            Stmt::Import { keyword, path } => {
                import::import_file(self, keyword, path)?;

                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` in `env`, restoring the current frame afterwards
    /// (also on error).
    pub fn execute_block(&mut self, statements: &[Stmt], env: EnvRef) -> Result<Flow> {
        let previous: EnvRef = mem::replace(&mut self.environment, env);

        let result = self.run_statements(statements);

        self.environment = previous;

        result
    }

    fn run_statements(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }

        Ok(Flow::Normal)
    }

    fn run_while(&mut self, condition: &Expr, body: &Stmt, increment: Option<&Expr>) -> Result<Flow> {
        while self.evaluate(condition)?.is_truthy() {
            match self.execute(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }

            if let Some(increment) = increment {
                self.evaluate(increment)?;
            }
        }

        Ok(Flow::Normal)
    }

    fn run_do_while(&mut self, body: &Stmt, condition: &Expr) -> Result<Flow> {
        loop {
            match self.execute(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }

            if !self.evaluate(condition)?.is_truthy() {
                break;
            }
        }

        Ok(Flow::Normal)
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
        static_methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass: Option<Rc<Class>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token: &Token = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => name,
                    };

                    return Err(YauplError::runtime(token, "Superclass must be a class."));
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(name, Value::Nil, false)?;

        // methods of a subclass see `super` one frame out
        let class_env: EnvRef = match &superclass {
            Some(sc) => {
                let env: EnvRef = Environment::child(&self.environment);
                env.borrow_mut()
                    .define_builtin("super", Value::Class(Rc::clone(sc)), true);
                env
            }
            None => Rc::clone(&self.environment),
        };

        let instance_methods: HashMap<String, Rc<UserFunction>> = methods
            .iter()
            .map(|decl| {
                let is_init: bool = decl.name.lexeme == "init";
                let f = UserFunction::new(Rc::clone(decl), Rc::clone(&class_env), is_init);

                (decl.name.lexeme.clone(), Rc::new(f))
            })
            .collect();

        // static methods have no `this`; the empty frame stands where bound
        // methods keep it, so resolved distances line up
        let static_env: EnvRef = Environment::child(&class_env);
        let class_methods: HashMap<String, Rc<UserFunction>> = static_methods
            .iter()
            .map(|decl| {
                let f = UserFunction::new(Rc::clone(decl), Rc::clone(&static_env), false);

                (decl.name.lexeme.clone(), Rc::new(f))
            })
            .collect();

        let class = Class::new(
            name.lexeme.clone(),
            superclass,
            instance_methods,
            class_methods,
        );

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        info!("Class '{}' defined", name.lexeme);

        Ok(())
    }

    // ───────────────────────── expressions ────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Null => Value::Nil,
            }),

            Expr::StringLiteral(s) => Ok(Value::string(s)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::ArrayLiteral { elements, .. } => {
                let values: Vec<Value> = elements
                    .iter()
                    .map(|e| self.evaluate(e))
                    .collect::<Result<_>>()?;

                Ok(Value::array(values))
            }

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Variable { id, name } => self.look_up_variable(name, *id),

            Expr::This { id, keyword } => self.look_up_variable(keyword, *id),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee: Value = self.evaluate(callee)?;

                let args: Vec<Value> = arguments
                    .iter()
                    .map(|a| self.evaluate(a))
                    .collect::<Result<_>>()?;

                self.call_value(callee, paren, args)
            }

            Expr::Get { object, name } => {
                let object: Value = self.evaluate(object)?;

                match &object {
                    Value::Instance(instance) => Instance::get(instance, name),
                    Value::Class(class) => class.get(name),
                    other => builtins::get_property(other, name).unwrap_or_else(|| {
                        Err(YauplError::runtime(name, "Only instances have properties."))
                    }),
                }
            }

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object: Value = self.evaluate(object)?;

                let instance: Rc<Instance> = match object {
                    Value::Instance(instance) => instance,
                    Value::Class(_) => {
                        return Err(YauplError::runtime(
                            name,
                            "Cannot set properties on a class.",
                        ))
                    }
                    other => {
                        return Err(builtins::set_property_error(&other, name).unwrap_or_else(
                            || YauplError::runtime(name, "Only class instances have fields."),
                        ))
                    }
                };

                let value: Value = self.evaluate(value)?;
                instance.set(name, value.clone());

                Ok(value)
            }

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance: usize = *self.locals.get(&id).ok_or_else(|| {
            YauplError::runtime(keyword, "Cannot use 'super' outside of a subclass.")
        })?;

        let superclass: Rc<Class> = match Environment::get_at(&self.environment, distance, keyword)? {
            Value::Class(class) => class,
            _ => return Err(YauplError::runtime(keyword, "Superclass must be a class.")),
        };

        let this_token = Token::new(TokenType::THIS, "this", keyword.line);
        let instance: Rc<Instance> =
            match Environment::get_at(&self.environment, distance.saturating_sub(1), &this_token)? {
                Value::Instance(instance) => instance,
                _ => {
                    return Err(YauplError::runtime(
                        keyword,
                        "Cannot use 'super' without an instance.",
                    ))
                }
            };

        let found = superclass.find_method(&method.lexeme).ok_or_else(|| {
            YauplError::runtime(method, format!("Undefined property {}.", method.lexeme))
        })?;

        Ok(Value::Function(Rc::new(found.bind(&instance))))
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(YauplError::runtime(operator, "Operand must be a number.")),
            },

            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

            _ => Err(YauplError::runtime(operator, "Invalid unary operator.")),
        }
    }

    /// `and` / `or` short‑circuit and yield an operand; `xor`, `nor` and
    /// `nand` are rewritten into those before evaluation.
    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        match operator.token_type {
            TokenType::OR => {
                let left: Value = self.evaluate(left)?;

                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            TokenType::AND => {
                let left: Value = self.evaluate(left)?;

                if !left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            _ => {
                let rewritten: Expr = rewrite_connective(left, operator, right);
                debug!("Rewrote '{}' expression", operator.lexeme);

                self.evaluate(&rewritten)
            }
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left: Value = self.evaluate(left)?;
        let right: Value = self.evaluate(right)?;

        debug!("Binary {} {} {}", left, operator.lexeme, right);

        match operator.token_type {
            TokenType::PLUS => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                _ => Ok(Value::string(format!("{}{}", left, right))),
            },

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),

            _ => {
                let (a, b) = number_operands(operator, &left, &right)?;

                match operator.token_type {
                    TokenType::MINUS => Ok(Value::Number(a - b)),
                    TokenType::STAR => Ok(Value::Number(a * b)),
                    TokenType::SLASH => Ok(Value::Number(a / b)),
                    TokenType::EXPONENT => Ok(Value::Number(a.powf(b))),

                    TokenType::MODULO => {
                        let (a, b) = (a.trunc() as i64, b.trunc() as i64);

                        if b == 0 {
                            return Err(YauplError::runtime(operator, "Modulo by zero."));
                        }

                        Ok(Value::Number(a.wrapping_rem(b) as f64))
                    }

                    TokenType::LSHIFT => {
                        Ok(Value::Number((a.trunc() as i64).wrapping_shl(b.trunc() as u32) as f64))
                    }

                    TokenType::RSHIFT => {
                        Ok(Value::Number((a.trunc() as i64).wrapping_shr(b.trunc() as u32) as f64))
                    }

                    TokenType::GREATER => Ok(Value::Bool(a > b)),
                    TokenType::GREATER_EQUAL => Ok(Value::Bool(a >= b)),
                    TokenType::LESS => Ok(Value::Bool(a < b)),
                    TokenType::LESS_EQUAL => Ok(Value::Bool(a <= b)),

                    _ => Err(YauplError::runtime(operator, "Invalid binary operator.")),
                }
            }
        }
    }

    // ───────────────────────── calls ──────────────────────────────

    /// Call any callable value with already evaluated arguments.
    pub fn call_value(&mut self, callee: Value, paren: &Token, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Native(native) => {
                native.arity.check(paren, &args)?;

                debug!("Calling native function '{}'", native.name);

                native.call(paren, args)
            }

            Value::Function(function) => {
                function.arity().check(paren, &args)?;

                self.call_function(&function, args)
            }

            Value::Class(class) => {
                class.arity().check(paren, &args)?;

                let instance: Rc<Instance> = Rc::new(Instance::new(Rc::clone(&class)));

                if let Some(init) = class.find_method("init") {
                    self.call_function(&init.bind(&instance), args)?;
                }

                info!("Constructed instance of '{}'", class.name);

                Ok(Value::Instance(instance))
            }

            _ => Err(YauplError::runtime(
                paren,
                "Can only call functions and classes.",
            )),
        }
    }

    fn call_function(&mut self, function: &UserFunction, args: Vec<Value>) -> Result<Value> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(YauplError::runtime(&function.decl.name, "Stack overflow."));
        }

        debug!("Calling user-defined function '{}'", function.name());

        let env: EnvRef = Environment::child(&function.closure);
        for (param, arg) in function.decl.params.iter().zip(args) {
            env.borrow_mut().define(param, arg, false)?;
        }

        self.call_depth += 1;
        let saved_loops: usize = mem::replace(&mut self.loop_depth, 0);

        let result = self.execute_block(&function.decl.body, env);

        self.loop_depth = saved_loops;
        self.call_depth -= 1;

        let flow: Flow = result?;

        if function.is_initializer {
            let this_token = Token::new(TokenType::THIS, "this", function.decl.name.line);
            return Environment::get_at(&function.closure, 0, &this_token);
        }

        Ok(match flow {
            Flow::Return(value) => value,
            _ => Value::Nil,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(YauplError::runtime(operator, "Operands must be numbers.")),
    }
}

/// Express `xor`, `nor` and `nand` with `and`, `or` and `!`:
///
/// * `a xor b` → `(a and !b) or (!a and b)`
/// * `a nor b` → `!(a or b)`
/// * `a nand b` → `!(a and b)`
fn rewrite_connective(left: &Expr, operator: &Token, right: &Expr) -> Expr {
    let line: usize = operator.line;

    let not = |e: Expr| Expr::Unary {
        operator: Token::new(TokenType::BANG, "!", line),
        right: Box::new(e),
    };
    let and = |l: Expr, r: Expr| Expr::Logical {
        left: Box::new(l),
        operator: Token::new(TokenType::AND, "and", line),
        right: Box::new(r),
    };
    let or = |l: Expr, r: Expr| Expr::Logical {
        left: Box::new(l),
        operator: Token::new(TokenType::OR, "or", line),
        right: Box::new(r),
    };

    match operator.token_type {
        TokenType::XOR => or(
            and(left.clone(), not(right.clone())),
            and(not(left.clone()), right.clone()),
        ),
        TokenType::NOR => not(Expr::Grouping(Box::new(or(left.clone(), right.clone())))),
        _ => not(Expr::Grouping(Box::new(and(left.clone(), right.clone())))),
    }
}
