use crate::ast::{Expr, LiteralValue, Stmt};

/// Renders the AST in parenthesised prefix form, e.g. `(+ 1.0 (group x))`.
/// Used by the `parse` command.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::Bool(b) => b.to_string(),

                LiteralValue::Null => "null".into(),

                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        // 3 → 3.0
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
            },

            Expr::StringLiteral(s) => s.clone(),

            // ── grouping ────────────────────────────────────────────────
            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            // ── operators ───────────────────────────────────────────────
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            // ── names ───────────────────────────────────────────────────
            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, Self::print(value))
            }

            Expr::This { .. } => "this".into(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),

            // ── calls and properties ────────────────────────────────────
            Expr::Call {
                callee, arguments, ..
            } => {
                let mut s = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&Self::print(arg));
                }
                s.push(')');
                s
            }

            Expr::Get { object, name } => format!("(. {} {})", Self::print(object), name.lexeme),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                Self::print(object),
                name.lexeme,
                Self::print(value)
            ),

            Expr::ArrayLiteral { elements, .. } => {
                let parts: Vec<String> = elements.iter().map(Self::print).collect();
                format!("Array [{}]", parts.join(", "))
            }
        }
    }

    /// One line per statement for simple statements; nested bodies are
    /// printed inline.
    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => Self::print(expr),

            Stmt::Print(expr) => format!("(print {})", Self::print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(let {} {})", name.lexeme, Self::print(init)),
                None => format!("(let {})", name.lexeme),
            },

            Stmt::Const { name, initializer } => {
                format!("(const {} {})", name.lexeme, Self::print(initializer))
            }

            Stmt::Block(statements) => Self::block(statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch),
                    Self::print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch)
                ),
            },

            Stmt::While {
                condition,
                body,
                increment,
            } => match increment {
                Some(inc) => format!(
                    "(while {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(body),
                    Self::print(inc)
                ),
                None => format!(
                    "(while {} {})",
                    Self::print(condition),
                    Self::print_stmt(body)
                ),
            },

            Stmt::DoWhile { body, condition } => format!(
                "(do {} {})",
                Self::print_stmt(body),
                Self::print(condition)
            ),

            Stmt::Function(decl) => {
                let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();
                format!(
                    "(fun {} ({}) {})",
                    decl.name.lexeme,
                    params.join(" "),
                    Self::block(&decl.body)
                )
            }

            Stmt::Class {
                name,
                superclass,
                methods,
                static_methods,
            } => {
                let mut s = format!("(class {}", name.lexeme);
                if let Some(sup) = superclass {
                    s.push_str(&format!(" : {}", Self::print(sup)));
                }
                for m in static_methods {
                    s.push_str(&format!(" (static {})", m.name.lexeme));
                }
                for m in methods {
                    s.push_str(&format!(" {}", m.name.lexeme));
                }
                s.push(')');
                s
            }

            Stmt::Return { value, .. } => match value {
                Some(v) => format!("(return {})", Self::print(v)),
                None => "(return)".into(),
            },

            Stmt::Break(_) => "(break)".into(),

            Stmt::Continue(_) => "(continue)".into(),

            Stmt::Import { path, .. } => format!("(import \"{}\")", path),
        }
    }

    fn block(statements: &[Stmt]) -> String {
        let inner: Vec<String> = statements.iter().map(Self::print_stmt).collect();

        if inner.is_empty() {
            "{}".into()
        } else {
            format!("{{ {} }}", inner.join(" "))
        }
    }
}
