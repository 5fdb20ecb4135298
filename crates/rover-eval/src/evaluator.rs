//! Core expression and statement evaluator.

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::host::{RoverHost, TickOutput};
use crate::library;
use crate::memory::MemoryScope;
use crate::value::{Capability, Value};
use rand_pcg::Pcg32;
use rover_types::ast::*;
use rover_types::world::{Action, RoverState};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// How a statement finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Quit,
}

/// Walks the AST for one tick.
///
/// Borrows everything that outlives the tick (rover snapshot, memory, host
/// and random generator) and owns what does not (locals, the action slot
/// and written lines).
pub(crate) struct Evaluator<'a> {
    env: Environment,
    steps: u64,
    budget: u64,
    pub(crate) rover: &'a RoverState,
    pub(crate) memory: &'a mut MemoryScope,
    pub(crate) host: &'a mut dyn RoverHost,
    pub(crate) rng: &'a mut Pcg32,
    pub(crate) action: Option<Action>,
    pub(crate) output: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        budget: u64,
        rover: &'a RoverState,
        memory: &'a mut MemoryScope,
        host: &'a mut dyn RoverHost,
        rng: &'a mut Pcg32,
    ) -> Self {
        Self {
            env: Environment::new(),
            steps: 0,
            budget,
            rover,
            memory,
            host,
            rng,
            action: None,
            output: Vec::new(),
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn finish(self) -> TickOutput {
        TickOutput {
            action: self.action,
            output: self.output,
        }
    }

    /// Consume one step of the budget.
    fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.budget {
            tracing::warn!(budget = self.budget, "step budget exhausted");
            Err(EvalError::BudgetExhausted {
                budget: self.budget,
            })
        } else {
            Ok(())
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if self.eval_stmt(stmt)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Next)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        self.tick()?;
        match stmt {
            Stmt::Set(set) => {
                for assignment in &set.assignments {
                    let value = self.eval_expr(&assignment.value)?;
                    self.assign(&assignment.target, value)?;
                }
                Ok(Flow::Next)
            }
            Stmt::Do(d) => {
                self.eval_expr(&d.expr)?;
                Ok(Flow::Next)
            }
            Stmt::Write(w) => {
                let mut parts = Vec::with_capacity(w.args.len());
                for arg in &w.args {
                    parts.push(self.eval_expr(arg)?.to_string());
                }
                self.write_line(parts.join(" "));
                Ok(Flow::Next)
            }
            Stmt::If(stmt) => self.eval_if(stmt),
            Stmt::While(w) => self.eval_while(w),
            Stmt::For(f) => self.eval_for(f),
            Stmt::Quit(_) => Ok(Flow::Quit),
            Stmt::Malformed(m) => Err(EvalError::Malformed(m.text.clone())),
        }
    }

    fn eval_if(&mut self, stmt: &IfStmt) -> EvalResult<Flow> {
        for branch in &stmt.branches {
            if self.eval_expr(&branch.condition)?.is_truthy() {
                return self.eval_block(&branch.body.stmts);
            }
        }
        match &stmt.else_branch {
            Some(else_branch) => self.eval_block(&else_branch.body.stmts),
            None => Ok(Flow::Next),
        }
    }

    fn eval_while(&mut self, w: &WhileStmt) -> EvalResult<Flow> {
        loop {
            self.tick()?;
            if !self.eval_expr(&w.condition)?.is_truthy() {
                return Ok(Flow::Next);
            }
            if self.eval_block(&w.body.stmts)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    /// `for (let i = start; i <= end; i += step)`: bound and step are
    /// re-evaluated on every iteration.
    fn eval_for(&mut self, f: &ForStmt) -> EvalResult<Flow> {
        let start = self.eval_expr(&f.start)?;
        self.env.push_scope();
        self.env.define(&f.var.name, start);
        let flow = self.run_for(f);
        self.env.pop_scope();
        flow
    }

    fn run_for(&mut self, f: &ForStmt) -> EvalResult<Flow> {
        let name = f.var.name.as_str();
        loop {
            self.tick()?;
            let current = self.env.get(name).cloned().unwrap_or(Value::Nil);
            let end = self.eval_expr(&f.end)?;
            if !compare(&current, &end, BinOp::LessEq) {
                return Ok(Flow::Next);
            }
            if self.eval_block(&f.body.stmts)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
            let step = match &f.step {
                Some(step) => self.eval_expr(step)?,
                None => Value::Number(1.0),
            };
            let current = self.env.get(name).cloned().unwrap_or(Value::Nil);
            self.env.assign(name, add(&current, &step));
        }
    }

    pub(crate) fn write_line(&mut self, line: String) {
        tracing::trace!(%line, "write");
        self.output.push(line);
    }

    pub(crate) fn set_action(&mut self, action: Option<Action>) {
        if let (Some(previous), Some(next)) = (self.action, action) {
            tracing::debug!(%previous, %next, "action slot overwritten");
        }
        self.action = action;
    }

    // ══════════════════════════════════════════════════════════════════════
    // Assignment
    // ══════════════════════════════════════════════════════════════════════

    fn assign(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        let Some((root, path)) = flatten_target(target) else {
            return Err(EvalError::ReadOnly(describe(target)));
        };

        if self.env.get(root).is_some() {
            if path.is_empty() {
                self.env.assign(root, value);
                return Ok(());
            }
            let Some(slot) = self.env.get_mut(root) else {
                return Err(EvalError::UndefinedVariable(root.to_string()));
            };
            return if set_nested_field(slot, &path, value) {
                Ok(())
            } else {
                Err(EvalError::ReadOnly(describe(target)))
            };
        }

        match (Capability::global(root), path.as_slice()) {
            (None, []) => {
                self.env.assign(root, value);
                Ok(())
            }
            (None, _) => Err(EvalError::UndefinedVariable(root.to_string())),
            (Some(Capability::Memory), [_, ..]) => {
                self.memory.set(&path.join("."), value);
                Ok(())
            }
            (Some(Capability::Context), [first, rest @ ..])
                if first == "memory" && !rest.is_empty() =>
            {
                self.memory.set(&rest.join("."), value);
                Ok(())
            }
            (Some(Capability::Context), [output, action])
                if output == "output" && action == "action" =>
            {
                let action = self.action_from_value(&value)?;
                self.set_action(action);
                Ok(())
            }
            _ => Err(EvalError::ReadOnly(describe(target))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::Number(text) => text
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| EvalError::InvalidNumber(text.clone())),
            ExprKind::Str(s) => Ok(Value::String(s.clone())),
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Member {
                object,
                name,
                private,
            } => {
                let object = self.eval_expr(object)?;
                self.read_member(object, name, *private)
            }
            ExprKind::Call { callee, args } => {
                let function = self.eval_expr(callee)?;
                let args = self.eval_args(args)?;
                match function {
                    Value::Function { owner, name } => self.call_capability(owner, &name, args),
                    _ => Err(EvalError::NotCallable(describe(callee))),
                }
            }
            ExprKind::LibCall { name, args } => {
                let args = self.eval_args(args)?;
                library::call_lib(name, &args, self.rng)
            }
            ExprKind::Object(entries) => {
                let mut fields = BTreeMap::new();
                for entry in entries {
                    let value = self.eval_expr(&entry.value)?;
                    fields.insert(entry.key.clone(), value);
                }
                Ok(Value::Record(fields))
            }
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                })
            }
            ExprKind::Paren(inner) => self.eval_expr(inner),
            ExprKind::Malformed(text) => Err(EvalError::Malformed(text.clone())),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        Capability::global(name)
            .map(Value::Capability)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    fn read_member(&mut self, object: Value, name: &str, private: bool) -> EvalResult<Value> {
        match object {
            Value::Capability(cap) => self.read_capability(cap, name),
            Value::Record(mut fields) => {
                let key = if private {
                    format!("_{name}")
                } else {
                    name.to_string()
                };
                Ok(fields.remove(&key).unwrap_or(Value::Nil))
            }
            Value::String(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
            Value::List(items) if name == "length" => Ok(Value::Number(items.len() as f64)),
            Value::Nil => Err(EvalError::NilAccess(name.to_string())),
            _ => Ok(Value::Nil),
        }
    }

    /// JavaScript semantics: `&&` and `||` short-circuit and yield an
    /// operand, not a boolean.
    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        match op {
            BinOp::And if !lv.is_truthy() => return Ok(lv),
            BinOp::Or if lv.is_truthy() => return Ok(lv),
            BinOp::And | BinOp::Or => return self.eval_expr(right),
            _ => {}
        }
        let rv = self.eval_expr(right)?;
        Ok(match op {
            BinOp::Add => add(&lv, &rv),
            BinOp::Sub => Value::Number(lv.to_number() - rv.to_number()),
            BinOp::Mul => Value::Number(lv.to_number() * rv.to_number()),
            BinOp::Div => Value::Number(lv.to_number() / rv.to_number()),
            BinOp::Eq => Value::Bool(lv.loose_eq(&rv)),
            BinOp::NotEq => Value::Bool(!lv.loose_eq(&rv)),
            BinOp::Less | BinOp::Greater | BinOp::LessEq | BinOp::GreaterEq => {
                Value::Bool(compare(&lv, &rv, op))
            }
            BinOp::And | BinOp::Or => unreachable!("short-circuited above"),
        })
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════

/// `+`: concatenation when either side is not a number-like primitive.
pub(crate) fn add(lv: &Value, rv: &Value) -> Value {
    let numeric = |v: &Value| matches!(v, Value::Number(_) | Value::Bool(_) | Value::Nil);
    if numeric(lv) && numeric(rv) {
        Value::Number(lv.to_number() + rv.to_number())
    } else {
        Value::String(format!("{lv}{rv}"))
    }
}

/// Relational comparison: textual for two strings, numeric otherwise.
/// Any comparison with NaN is false.
pub(crate) fn compare(lv: &Value, rv: &Value, op: BinOp) -> bool {
    let ordering = match (lv, rv) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => lv.to_number().partial_cmp(&rv.to_number()),
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinOp::Less => ordering == Ordering::Less,
        BinOp::Greater => ordering == Ordering::Greater,
        BinOp::LessEq => ordering != Ordering::Greater,
        BinOp::GreaterEq => ordering != Ordering::Less,
        _ => false,
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Assignment targets
// ══════════════════════════════════════════════════════════════════════════

/// Split `a.b.%c` into its root name and member path (`["b", "_c"]`).
/// Returns `None` for anything that is not a plain member chain.
fn flatten_target(expr: &Expr) -> Option<(&str, Vec<String>)> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some((name.as_str(), Vec::new())),
        ExprKind::Member {
            object,
            name,
            private,
        } => {
            let (root, mut path) = flatten_target(object)?;
            path.push(if *private {
                format!("_{name}")
            } else {
                name.clone()
            });
            Some((root, path))
        }
        _ => None,
    }
}

/// Update `path` inside a local record in place. Every segment but the
/// last must already be a record.
fn set_nested_field(current: &mut Value, path: &[String], value: Value) -> bool {
    let Some((field, rest)) = path.split_first() else {
        *current = value;
        return true;
    };
    match current {
        Value::Record(fields) if rest.is_empty() => {
            fields.insert(field.clone(), value);
            true
        }
        Value::Record(fields) => match fields.get_mut(field) {
            Some(inner) => set_nested_field(inner, rest, value),
            None => false,
        },
        _ => false,
    }
}

/// Source-like rendering of a chain for error messages.
pub(crate) fn describe(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Member {
            object,
            name,
            private,
        } => {
            let sep = if *private { "._" } else { "." };
            format!("{}{sep}{name}", describe(object))
        }
        ExprKind::Call { callee, .. } => format!("{}(...)", describe(callee)),
        ExprKind::LibCall { name, .. } => format!("lib.{name}(...)"),
        ExprKind::Number(text) | ExprKind::Malformed(text) => text.clone(),
        ExprKind::Str(s) => format!("{s:?}"),
        _ => "expression".to_string(),
    }
}
