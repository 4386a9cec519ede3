//! Expression syntax: the AST produced by the parser and consumed by the
//! evaluator.

mod error;
pub mod literal;
mod nesting;
#[allow(clippy::module_inception)]
mod parser;

pub use error::ParseError;
pub use parser::{DEFAULT_MAX_PARSE_DEPTH, parse, parse_with_max_depth};

use crate::values::{RegExp, Value, coerce::format_number};

use std::fmt::{self, Write};

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    Eq,
    Neq,
    Le,
    Ge,
    Lt,
    Gt,
    Match,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    BitNot,
}

macro_rules! impl_op_symbols {
    ($($ty:ty { $($variant:ident => $symbol:literal),+ $(,)? })+) => {
        $(
            impl $ty {
                pub fn symbol(&self) -> &'static str {
                    match self {
                        $(Self::$variant => $symbol,)+
                    }
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.symbol())
                }
            }
        )+
    };
}

impl_op_symbols! {
    LogicalOp { And => "&&", Or => "||" }
    BitwiseOp { And => "&", Or => "|", Shl => "<<", Shr => ">>" }
    RelationalOp {
        Eq => "==", Neq => "!=", Le => "<=", Ge => ">=",
        Lt => "<", Gt => ">", Match => "=~", NoMatch => "!~",
    }
    ArithmeticOp { Add => "+", Sub => "-", Mul => "*", Div => "/", Rem => "%", Pow => "**" }
    UnaryOp { Not => "!", BitNot => "~" }
}

/// One `.name`, `[expr]` or optional `?.` step of a selection chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStep {
    pub key: Node,
    pub optional: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Sequence(Vec<Node>),
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    /// `value ?: fallback`
    ConditionalBinary {
        value: Box<Node>,
        fallback: Box<Node>,
    },
    /// `cond ? then_branch : else_branch`
    ConditionalTernary {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Bitwise {
        op: BitwiseOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Relational {
        op: RelationalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Arithmetical {
        op: ArithmeticOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Select {
        base: Box<Node>,
        steps: Vec<SelectStep>,
    },
    FuncCall {
        callee: Box<Node>,
        args: Vec<Node>,
        optional: bool,
    },
    /// A bare name used as a key or assignment target; evaluates to its text.
    Identifier(String),
    Variable(String),
    LiteralArray(Vec<Node>),
    /// Children are `LiteralObjectItem` nodes.
    LiteralObject(Vec<Node>),
    LiteralObjectItem {
        key: Box<Node>,
        value: Box<Node>,
    },
    LiteralTemplate(Vec<Node>),
    LiteralString(String),
    LiteralRegExp(RegExp),
    LiteralNumber(f64),
    /// `true`, `false`, `null`, `undefined`, `NaN` and `Infinity`.
    LiteralValue(Value),
}

/// Tag of an [`Expr`] variant, used in traces and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sequence,
    Assignment,
    ConditionalBinary,
    ConditionalTernary,
    Logical,
    Bitwise,
    Relational,
    Arithmetical,
    Unary,
    Select,
    FuncCall,
    Identifier,
    Variable,
    LiteralArray,
    LiteralObject,
    LiteralObjectItem,
    LiteralTemplate,
    LiteralString,
    LiteralRegExp,
    LiteralNumber,
    LiteralValue,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Sequence => "Sequence",
            NodeKind::Assignment => "Assignment",
            NodeKind::ConditionalBinary => "ConditionalBinary",
            NodeKind::ConditionalTernary => "ConditionalTernary",
            NodeKind::Logical => "Logical",
            NodeKind::Bitwise => "Bitwise",
            NodeKind::Relational => "Relational",
            NodeKind::Arithmetical => "Arithmetical",
            NodeKind::Unary => "Unary",
            NodeKind::Select => "Select",
            NodeKind::FuncCall => "FuncCall",
            NodeKind::Identifier => "Identifier",
            NodeKind::Variable => "Variable",
            NodeKind::LiteralArray => "LiteralArray",
            NodeKind::LiteralObject => "LiteralObject",
            NodeKind::LiteralObjectItem => "LiteralObjectItem",
            NodeKind::LiteralTemplate => "LiteralTemplate",
            NodeKind::LiteralString => "LiteralString",
            NodeKind::LiteralRegExp => "LiteralRegExp",
            NodeKind::LiteralNumber => "LiteralNumber",
            NodeKind::LiteralValue => "LiteralValue",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An AST node: an expression plus where it starts in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub expr: Expr,
    pub position: Position,
}

impl Node {
    pub fn new(expr: Expr, position: Position) -> Self {
        Self { expr, position }
    }

    pub fn kind(&self) -> NodeKind {
        match &self.expr {
            Expr::Sequence(_) => NodeKind::Sequence,
            Expr::Assignment { .. } => NodeKind::Assignment,
            Expr::ConditionalBinary { .. } => NodeKind::ConditionalBinary,
            Expr::ConditionalTernary { .. } => NodeKind::ConditionalTernary,
            Expr::Logical { .. } => NodeKind::Logical,
            Expr::Bitwise { .. } => NodeKind::Bitwise,
            Expr::Relational { .. } => NodeKind::Relational,
            Expr::Arithmetical { .. } => NodeKind::Arithmetical,
            Expr::Unary { .. } => NodeKind::Unary,
            Expr::Select { .. } => NodeKind::Select,
            Expr::FuncCall { .. } => NodeKind::FuncCall,
            Expr::Identifier(_) => NodeKind::Identifier,
            Expr::Variable(_) => NodeKind::Variable,
            Expr::LiteralArray(_) => NodeKind::LiteralArray,
            Expr::LiteralObject(_) => NodeKind::LiteralObject,
            Expr::LiteralObjectItem { .. } => NodeKind::LiteralObjectItem,
            Expr::LiteralTemplate(_) => NodeKind::LiteralTemplate,
            Expr::LiteralString(_) => NodeKind::LiteralString,
            Expr::LiteralRegExp(_) => NodeKind::LiteralRegExp,
            Expr::LiteralNumber(_) => NodeKind::LiteralNumber,
            Expr::LiteralValue(_) => NodeKind::LiteralValue,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Child nodes in evaluation order, skipping the first `from`.
    ///
    /// Selection steps contribute their key nodes.
    pub fn children(&self, from: usize) -> Vec<&Node> {
        let all: Vec<&Node> = match &self.expr {
            Expr::Sequence(nodes)
            | Expr::LiteralArray(nodes)
            | Expr::LiteralObject(nodes)
            | Expr::LiteralTemplate(nodes) => nodes.iter().collect(),
            Expr::Assignment { target, value } => vec![target.as_ref(), value.as_ref()],
            Expr::ConditionalBinary { value, fallback } => vec![value.as_ref(), fallback.as_ref()],
            Expr::ConditionalTernary {
                cond,
                then_branch,
                else_branch,
            } => vec![cond.as_ref(), then_branch.as_ref(), else_branch.as_ref()],
            Expr::Logical { left, right, .. }
            | Expr::Bitwise { left, right, .. }
            | Expr::Relational { left, right, .. }
            | Expr::Arithmetical { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Select { base, steps } => std::iter::once(base.as_ref())
                .chain(steps.iter().map(|step| &step.key))
                .collect(),
            Expr::FuncCall { callee, args, .. } => {
                std::iter::once(callee.as_ref()).chain(args).collect()
            }
            Expr::LiteralObjectItem { key, value } => vec![key.as_ref(), value.as_ref()],
            Expr::Identifier(_)
            | Expr::Variable(_)
            | Expr::LiteralString(_)
            | Expr::LiteralRegExp(_)
            | Expr::LiteralNumber(_)
            | Expr::LiteralValue(_) => Vec::new(),
        };
        all.into_iter().skip(from).collect()
    }

    /// Renders the tree as indented text, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{:indent$}{}", "", self.kind(), indent = depth * 2);
        match &self.expr {
            Expr::Logical { op, .. } => write_attr(out, op),
            Expr::Bitwise { op, .. } => write_attr(out, op),
            Expr::Relational { op, .. } => write_attr(out, op),
            Expr::Arithmetical { op, .. } => write_attr(out, op),
            Expr::Unary { op, .. } => write_attr(out, op),
            Expr::FuncCall { optional: true, .. } => out.push_str(" ?."),
            Expr::Identifier(name) | Expr::Variable(name) => write_attr(out, name),
            Expr::LiteralString(s) => write_attr(out, format_args!("{s:?}")),
            Expr::LiteralRegExp(re) => write_attr(out, re),
            Expr::LiteralNumber(n) => write_attr(out, format_number(*n)),
            Expr::LiteralValue(v) => write_attr(out, v),
            _ => {}
        }
        let _ = writeln!(out, " @{}:{}", self.position.line, self.position.column);

        if let Expr::Select { base, steps } = &self.expr {
            base.dump_into(out, depth + 1);
            for step in steps {
                let marker = if step.optional { "?." } else { "." };
                let _ = writeln!(out, "{:indent$}{marker}", "", indent = (depth + 1) * 2);
                step.key.dump_into(out, depth + 2);
            }
            return;
        }
        for child in self.children(0) {
            child.dump_into(out, depth + 1);
        }
    }
}

fn write_attr(out: &mut String, attr: impl fmt::Display) {
    let _ = write!(out, " {attr}");
}
