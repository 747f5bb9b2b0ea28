pub mod display;
pub mod visit;

use crate::span::{Span, Spanned};

pub use crate::ops::{BoolOp, CmpOp};

/// Stable identity of a statement within its `Module`. Analyses such as
/// depth annotation are keyed by it instead of living on the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocator for `NodeId`s. Owned by the module so ids stay unique after
/// passes synthesise or clone statements.
#[derive(Clone, Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Build a statement with a fresh id.
    pub fn stmt(&mut self, kind: StmtKind, span: Span) -> Stmt {
        Stmt {
            id: self.fresh(),
            span,
            kind,
        }
    }

    /// Deep-copy a statement, giving it and every nested statement a new id.
    pub fn copy_stmt(&mut self, stmt: &Stmt) -> Stmt {
        let kind = match &stmt.kind {
            StmtKind::If { test, body, orelse } => StmtKind::If {
                test: test.clone(),
                body: self.copy_body(body),
                orelse: self.copy_body(orelse),
            },
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => StmtKind::For {
                target: target.clone(),
                iter: iter.clone(),
                body: self.copy_body(body),
                orelse: self.copy_body(orelse),
            },
            other => other.clone(),
        };
        self.stmt(kind, stmt.span)
    }

    pub fn copy_body(&mut self, body: &[Stmt]) -> Vec<Stmt> {
        body.iter().map(|s| self.copy_stmt(s)).collect()
    }
}

/// A parsed program: a flat body of statements plus its id allocator.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
    pub ids: NodeIds,
}

impl Module {
    /// Total number of statements, including nested ones.
    pub fn stmt_count(&self) -> usize {
        fn count(body: &[Stmt]) -> usize {
            body.iter()
                .map(|s| 1 + s.child_bodies().into_iter().map(count).sum::<usize>())
                .sum()
        }
        count(&self.body)
    }
}

/// A statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Assign {
        target: Spanned<String>,
        value: Spanned<Expr>,
    },
    Expr(Spanned<Expr>),
    Pass,
    If {
        test: Spanned<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        target: Spanned<String>,
        iter: Spanned<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
}

impl StmtKind {
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Assign { .. } => "Assign",
            StmtKind::Expr(_) => "Expr",
            StmtKind::Pass => "Pass",
            StmtKind::If { .. } => "If",
            StmtKind::For { .. } => "For",
        }
    }
}

impl Stmt {
    /// Conditionals and loops; everything else is a leaf statement.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, StmtKind::If { .. } | StmtKind::For { .. })
    }

    /// Direct child bodies in source order (`body`, then `orelse`).
    pub fn child_bodies(&self) -> Vec<&[Stmt]> {
        match &self.kind {
            StmtKind::If { body, orelse, .. } | StmtKind::For { body, orelse, .. } => {
                vec![body.as_slice(), orelse.as_slice()]
            }
            _ => Vec::new(),
        }
    }
}

/// Expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Name(String),
    List(Vec<Spanned<Expr>>),
    Call {
        func: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<Spanned<Expr>>,
    },
    /// `left ops[0] comparators[0] ops[1] comparators[1] ...`
    Compare {
        left: Box<Spanned<Expr>>,
        ops: Vec<CmpOp>,
        comparators: Vec<Spanned<Expr>>,
    },
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Literal(Literal::None)
    }
}

impl Expr {
    pub fn name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "Literal",
            Expr::Name(_) => "Name",
            Expr::List(_) => "List",
            Expr::Call { .. } => "Call",
            Expr::BinOp { .. } => "BinOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::BoolOp { .. } => "BoolOp",
            Expr::Compare { .. } => "Compare",
        }
    }

    /// Wrap `operand` in a logical `not`, keeping its span.
    pub fn not(operand: Spanned<Expr>) -> Spanned<Expr> {
        let span = operand.span;
        Spanned::new(
            Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Int(n))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    /// Always finite: the lexer rejects literals that overflow.
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,      // +
    Sub,      // -
    Mul,      // *
    Div,      // /
    FloorDiv, // //
    Mod,      // %
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinOp::Add => "Add",
            BinOp::Sub => "Sub",
            BinOp::Mul => "Mult",
            BinOp::Div => "Div",
            BinOp::FloorDiv => "FloorDiv",
            BinOp::Mod => "Mod",
        }
    }

    /// Left/right binding power; all arithmetic operators are left-associative.
    pub fn binding_power(&self) -> (u8, u8) {
        match self {
            BinOp::Add | BinOp::Sub => (5, 6),
            BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => (7, 8),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not ",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::Neg => "USub",
            UnaryOp::Pos => "UAdd",
        }
    }
}
