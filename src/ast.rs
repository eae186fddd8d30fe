//! Abstract syntax tree produced by [`crate::parser::Parser`].
//!
//! Nodes own their tokens so a program can outlive the scanner's buffer
//! (REPL entries and imported files are parsed from short‑lived strings).
//! Expressions that the resolver binds (`Variable`, `Assign`, `This`,
//! `Super`) carry an [`ExprId`]; the interpreter's distance table is keyed
//! by it.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

/// Stable identity of a resolvable expression node.
///
/// Ids come from a process‑wide counter, so nodes parsed from different
/// sources (REPL lines, imported files) never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

impl ExprId {
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A literal constant that is not a string.  Strings have their own node
/// because they evaluate to string objects.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// `name = value`
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    /// Infix arithmetic, comparison, equality and shift operators.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// Closing `)`, kept for error positions.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// `object.name`
    Get { object: Box<Expr>, name: Token },

    /// `object.name = value`
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    Grouping(Box<Expr>),

    Literal(LiteralValue),

    StringLiteral(String),

    /// `and`, `or`, `xor`, `nor`, `nand`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// `super.method`
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },

    This { id: ExprId, keyword: Token },

    Unary { operator: Token, right: Box<Expr> },

    Variable { id: ExprId, name: Token },

    /// `[e1, e2, ...]`
    ArrayLiteral {
        bracket: Token,
        elements: Vec<Expr>,
    },
}

impl Expr {
    pub fn variable(name: Token) -> Self {
        Expr::Variable {
            id: ExprId::fresh(),
            name,
        }
    }
}

/// A named function or method: shared between the statement list and every
/// function value created from it.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Vec<Stmt>),

    Class {
        name: Token,
        /// Always an [`Expr::Variable`] when present.
        superclass: Option<Expr>,
        methods: Vec<Rc<FunctionDecl>>,
        static_methods: Vec<Rc<FunctionDecl>>,
    },

    Expression(Expr),

    Function(Rc<FunctionDecl>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    Print(Expr),

    Return { keyword: Token, value: Option<Expr> },

    /// `let name (= initializer)?;`
    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    /// `const name = initializer;`
    Const { name: Token, initializer: Expr },

    /// `while` loops, and `for` loops after desugaring.  `increment` is only
    /// set for the latter and runs after every iteration, including ones cut
    /// short by `continue`.
    While {
        condition: Expr,
        body: Box<Stmt>,
        increment: Option<Expr>,
    },

    DoWhile { body: Box<Stmt>, condition: Expr },

    Break(Token),

    Continue(Token),

    /// `import "path";`
    Import { keyword: Token, path: String },
}

impl Stmt {
    /// Statements an imported file may contribute to the importer.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Stmt::Var { .. }
                | Stmt::Const { .. }
                | Stmt::Function(_)
                | Stmt::Class { .. }
                | Stmt::Import { .. }
        )
    }
}
