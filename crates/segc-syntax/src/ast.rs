//! AST (abstract syntax tree) types for the SEGC language.
//!
//! Every construct that can appear inside a function body is a [`Node`]; the
//! evaluator and the formatter both match on it exhaustively. Top-level code is
//! limited to function declarations and assignments, see [`Item`].

/// Infix operators. All of them bind with the same (flat) precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

/// Which keyword introduced a [`Conditional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondKind {
    If,
    Elsif,
    While,
    Else,
}

impl CondKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CondKind::If => "if",
            CondKind::Elsif => "elsif",
            CondKind::While => "while",
            CondKind::Else => "else",
        }
    }
}

/// A brace-delimited sequence of statements. Entering one opens a fresh scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub body: Vec<Node>,
}

/// `if`, `elsif`, `while` or `else` with its body.
///
/// `cond` is `None` only for `else`. `next` links an `if`/`elsif` to the
/// `elsif`/`else` that directly follows it in the source; it is filled in once
/// by the parser and never touched again.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub kind: CondKind,
    pub cond: Option<Box<Node>>,
    pub body: Block,
    pub next: Option<Box<Conditional>>,
}

/// Statements and expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(i64),
    Ident(String),
    Assign {
        name: String,
        value: Box<Node>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
    Return(Box<Node>),
    Block(Block),
    Binary {
        left: Box<Node>,
        op: BinaryOp,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Conditional(Conditional),
}

/// Function declaration. Parameters are plain names, bound positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// Top-level program items.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Assign { name: String, value: Node },
}

/// Entire program consisting of items in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            Item::Assign { .. } => None,
        })
    }
}
