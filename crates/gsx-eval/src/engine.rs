use std::collections::HashMap;

use crate::error::{ErrorKind, EvalError};
use crate::parser::{parse_snippet, BinOp, Expr, Stmt, StmtKind};

/// Result of evaluating a snippet: the value of its last statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    /// An assignment (or an empty snippet) produces no value.
    Unit,
}

/// An evaluation context with a persistent variable namespace.
///
/// One engine instance is meant to live for exactly one
/// Initialize..Cleanup window of its owning component; names assigned
/// by earlier calls stay visible to later ones within that window.
#[derive(Debug, Default)]
pub struct Engine {
    vars: HashMap<String, f64>,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    /// Run a snippet for its side effects on the namespace.
    pub fn exec(&mut self, source: &str) -> Result<(), EvalError> {
        self.run(source).map(|_| ())
    }

    /// Run a snippet and return the value of its last statement.
    pub fn eval(&mut self, source: &str) -> Result<Value, EvalError> {
        self.run(source)
    }

    /// Run a snippet and extract a numeric result.
    pub fn eval_f64(&mut self, source: &str) -> Result<f64, EvalError> {
        match self.run(source)? {
            Value::Number(n) => Ok(n),
            Value::Unit => Err(EvalError::new(
                ErrorKind::Type,
                "snippet did not produce a numeric result",
            )),
        }
    }

    /// Look up a variable in the namespace.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    fn run(&mut self, source: &str) -> Result<Value, EvalError> {
        let stmts = parse_snippet(source)?;
        let mut last = Value::Unit;
        for (index, stmt) in stmts.iter().enumerate() {
            last = self
                .run_stmt(stmt)
                .map_err(|err| err.with_frame(format!("statement {}: {}", index + 1, stmt.text)))?;
        }
        Ok(last)
    }

    fn run_stmt(&mut self, stmt: &Stmt) -> Result<Value, EvalError> {
        match &stmt.kind {
            StmtKind::Assign { name, expr } => {
                let value = self.eval_expr(expr)?;
                self.vars.insert(name.clone(), value);
                Ok(Value::Unit)
            }
            StmtKind::Expr(expr) => Ok(Value::Number(self.eval_expr(expr)?)),
        }
    }

    fn eval_expr(&self, expr: &Expr) -> Result<f64, EvalError> {
        match expr {
            Expr::Number(value) => Ok(*value),
            Expr::Var(name) => self.vars.get(name).copied().ok_or_else(|| {
                EvalError::new(ErrorKind::Name, format!("name '{name}' is not defined"))
            }),
            Expr::Neg(inner) => Ok(-self.eval_expr(inner)?),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                match op {
                    BinOp::Add => Ok(lhs + rhs),
                    BinOp::Sub => Ok(lhs - rhs),
                    BinOp::Mul => Ok(lhs * rhs),
                    BinOp::Div => {
                        if rhs == 0.0 {
                            Err(EvalError::new(ErrorKind::ZeroDivision, "division by zero"))
                        } else {
                            Ok(lhs / rhs)
                        }
                    }
                }
            }
        }
    }
}
