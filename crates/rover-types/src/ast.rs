//! AST node types for RoverScript.
//!
//! The parser builds these nodes; the transpiler and the execution host
//! both walk them. Nodes keep source order and carry a [`Span`] so that
//! emission can reproduce the line structure of the script.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete script: the body of the rover's per-tick method.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `{ stmts... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// Span of the closing `}`.
    pub close: Span,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `Set lhs = expr [, lhs = expr]*`
    Set(SetStmt),
    /// `Do expr`
    Do(DoStmt),
    /// `Write expr [, expr]*`
    Write(WriteStmt),
    /// `If c { } [ElseIf c { }]* [Else { }]`
    If(IfStmt),
    /// `While c { }`
    While(WhileStmt),
    /// `For id = start[:step]:end { }`
    For(ForStmt),
    /// `Quit` / `Return`
    Quit(Span),
    /// Tokens the parser could not make sense of, kept verbatim.
    Malformed(MalformedStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Set(s) => s.span,
            Stmt::Do(s) => s.span,
            Stmt::Write(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Quit(span) => *span,
            Stmt::Malformed(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetStmt {
    pub assignments: Vec<Assignment>,
    pub span: Span,
}

/// One `target = value` pair of a `Set` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoStmt {
    /// The call chain, already rooted at `context` when the written root
    /// was not a known local.
    pub expr: Expr,
    /// Whether emission prefixes `await`.
    pub awaited: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteStmt {
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// The `If` branch followed by every `ElseIf`.
    pub branches: Vec<CondBranch>,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondBranch {
    pub condition: Expr,
    pub body: Block,
    /// Span of the introducing command word.
    pub keyword: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseBranch {
    pub body: Block,
    pub keyword: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var: Ident,
    pub start: Expr,
    /// `None` when only `start:end` was written; the step is then 1.
    pub step: Option<Expr>,
    pub end: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MalformedStmt {
    pub text: String,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    depth: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let depth = 1 + kind.child_depth();
        Self { kind, span, depth }
    }

    /// Height of the tree rooted here. A leaf is 1.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Name of the leftmost identifier of a member/call chain.
    ///
    /// `$Name(...)` roots at `lib`. Anything that is not a chain has no root.
    pub fn chain_root(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            ExprKind::LibCall { .. } => Some("lib"),
            ExprKind::Member { object, .. } => object.chain_root(),
            ExprKind::Call { callee, .. } => callee.chain_root(),
            _ => None,
        }
    }

    /// Whether a call or a private member appears anywhere in the tree.
    pub fn has_call_or_private(&self) -> bool {
        match &self.kind {
            ExprKind::Call { .. } | ExprKind::LibCall { .. } => true,
            ExprKind::Member {
                private: true, ..
            } => true,
            ExprKind::Member { object, .. } => object.has_call_or_private(),
            ExprKind::Object(entries) => entries.iter().any(|e| e.value.has_call_or_private()),
            ExprKind::Binary { left, right, .. } => {
                left.has_call_or_private() || right.has_call_or_private()
            }
            ExprKind::Unary { operand, .. } => operand.has_call_or_private(),
            ExprKind::Paren(inner) => inner.has_call_or_private(),
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Identifier(_)
            | ExprKind::Malformed(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal (unescaped value).
    Str(String),
    /// `name`
    Identifier(String),
    /// `object.name`, or `object.%name` when `private`.
    Member {
        object: Box<Expr>,
        name: String,
        private: bool,
    },
    /// `callee(args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `$Name(args...)`
    LibCall { name: String, args: Vec<Expr> },
    /// `{ key: value, ... }`
    Object(Vec<ObjectEntry>),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `(expr)`
    Paren(Box<Expr>),
    /// Best-effort text for input the parser could not understand.
    Malformed(String),
}

impl ExprKind {
    fn child_depth(&self) -> u32 {
        match self {
            ExprKind::Member { object, .. } => object.depth,
            ExprKind::Call { callee, args } => callee.depth.max(max_depth(args.iter())),
            ExprKind::LibCall { args, .. } => max_depth(args.iter()),
            ExprKind::Object(entries) => max_depth(entries.iter().map(|e| &e.value)),
            ExprKind::Binary { left, right, .. } => left.depth.max(right.depth),
            ExprKind::Unary { operand, .. } => operand.depth,
            ExprKind::Paren(inner) => inner.depth,
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Identifier(_)
            | ExprKind::Malformed(_) => 0,
        }
    }
}

fn max_depth<'a>(exprs: impl Iterator<Item = &'a Expr>) -> u32 {
    exprs.map(Expr::depth).max().unwrap_or(0)
}

/// `key: value` inside an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    /// Whether the key was written as a string literal.
    pub quoted: bool,
    pub value: Expr,
}

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// The JavaScript spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::NotEq => 3,
            BinOp::Less | BinOp::Greater | BinOp::LessEq | BinOp::GreaterEq => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x` (numeric coercion)
    Plus,
    /// `'x`, emitted as `!x`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}
