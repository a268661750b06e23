//! Recursive-descent parser over a token queue.
//!
//! Tokens are consumed strictly front to back with `pop`/`peek`. There is no
//! precedence table: once a primary has been read, a following binary operator
//! takes the primary as its left side and a whole new expression as its right
//! side, so every operator chain associates to the right.

use std::collections::VecDeque;

use log::debug;
use segc_syntax::ast::*;
use segc_syntax::error::{Error, ErrorKind, Result};
use segc_syntax::token::{Token, TokenKind};

/// Deepest nesting of expressions and blocks accepted before parsing fails
/// with [`ErrorKind::NestingLimit`].
pub const MAX_NESTING: usize = 256;

pub struct Parser {
    tokens: VecDeque<Token>,
    /// Position just past the last consumed token, used for end-of-input errors.
    end_line: usize,
    end_col: usize,
    /// Expressions and blocks currently being parsed.
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            end_line: 1,
            end_col: 1,
            depth: 0,
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.front().map(|t| t.kind)
    }

    fn pop(&mut self) -> Option<Token> {
        let tok = self.tokens.pop_front()?;
        self.end_line = tok.line;
        self.end_col = tok.col + tok.lexeme.chars().count();
        Some(tok)
    }

    fn at_end(&self, kind: ErrorKind, msg: impl Into<String>) -> Error {
        Error::with_span(kind, msg, self.end_line, self.end_col)
    }

    fn at(tok: &Token, kind: ErrorKind, msg: impl Into<String>) -> Error {
        Error::with_span(kind, msg, tok.line, tok.col)
    }

    /// Runs `f` one nesting level deeper, failing once [`MAX_NESTING`] is reached.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            let msg = format!("nesting is deeper than {} levels", MAX_NESTING);
            return Err(match self.tokens.front() {
                Some(t) => Self::at(t, ErrorKind::NestingLimit, msg),
                None => self.at_end(ErrorKind::NestingLimit, msg),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parse the whole token queue.
    ///
    /// Only `fn` declarations and `name = expr` assignments are meaningful at
    /// the top level. Every other leading token is dropped and scanning resumes
    /// with the token after it.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();
        while let Some(tok) = self.pop() {
            match tok.kind {
                TokenKind::Fn => items.push(Item::Function(self.parse_function()?)),
                TokenKind::Ident if self.peek_kind() == Some(TokenKind::Assign) => {
                    self.pop();
                    let value = self.parse_expr()?;
                    items.push(Item::Assign {
                        name: tok.lexeme,
                        value,
                    });
                }
                _ => debug!("skipping top-level {} at {}:{}", tok.kind, tok.line, tok.col),
            }
        }
        Ok(Program { items })
    }

    fn parse_function(&mut self) -> Result<Function> {
        let name = match self.pop() {
            Some(t) if t.kind == TokenKind::Ident => t.lexeme,
            Some(t) => {
                return Err(Self::at(
                    &t,
                    ErrorKind::UnexpectedToken,
                    format!("expected a function name after 'fn', found {}", t.kind),
                ))
            }
            None => {
                return Err(self.at_end(
                    ErrorKind::UnexpectedToken,
                    "expected a function name after 'fn'",
                ))
            }
        };

        match self.pop() {
            Some(t) if t.kind == TokenKind::LParen => {}
            other => {
                let msg = "expected '(' after the function name";
                let err = match other {
                    Some(t) => Self::at(&t, ErrorKind::MissingOpenParen, msg),
                    None => self.at_end(ErrorKind::MissingOpenParen, msg),
                };
                return Err(err.with_hint("fn myFunction x){}", "fn myFunction(x){}"));
            }
        }

        let mut params = Vec::new();
        loop {
            match self.pop() {
                Some(t) if t.kind == TokenKind::RParen => break,
                Some(t) if t.kind == TokenKind::Ident => params.push(t.lexeme),
                Some(t) if t.kind == TokenKind::LBrace => {
                    return Err(Self::at(
                        &t,
                        ErrorKind::UnclosedParen,
                        format!("parameter list of '{}' is never closed", name),
                    )
                    .with_hint("fn myFunction(x y z {}", "fn myFunction(x y z){}"));
                }
                Some(t) => {
                    return Err(Self::at(
                        &t,
                        ErrorKind::InvalidParameter,
                        format!(
                            "parameters of '{}' must be plain identifiers, found {}",
                            name, t.kind
                        ),
                    )
                    .with_hint("fn myFunction(bar 1)", "fn myFunction(bar baz)"));
                }
                None => {
                    return Err(self
                        .at_end(
                            ErrorKind::UnclosedParen,
                            format!("parameter list of '{}' is never closed", name),
                        )
                        .with_hint("fn myFunction(x y z", "fn myFunction(x y z){}"));
                }
            }
        }

        let body = self.parse_block()?;
        debug!("parsed function '{}' with {} parameter(s)", name, params.len());
        Ok(Function { name, params, body })
    }

    /// Parse `{ statement* }`.
    pub fn parse_block(&mut self) -> Result<Block> {
        self.nested(Self::block)
    }

    fn block(&mut self) -> Result<Block> {
        let (open_line, open_col) = match self.pop() {
            Some(t) if t.kind == TokenKind::LBrace => (t.line, t.col),
            other => {
                let msg = "expected '{' to open a block";
                let err = match other {
                    Some(t) => Self::at(
                        &t,
                        ErrorKind::MissingOpenBrace,
                        format!("{}, found {}", msg, t.kind),
                    ),
                    None => self.at_end(ErrorKind::MissingOpenBrace, msg),
                };
                return Err(err.with_hint("if x == y\n    ret 1\n}", "if x == y {\n    ret 1\n}"));
            }
        };

        let mut body = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RBrace) => {
                    self.pop();
                    break;
                }
                Some(_) => body.push(self.parse_statement()?),
                None => {
                    return Err(Error::with_span(
                        ErrorKind::UnclosedBlock,
                        "block is never closed with '}'",
                        open_line,
                        open_col,
                    )
                    .with_hint("while x < 10 {\n    x = x + 1\n", "while x < 10 {\n    x = x + 1\n}"));
                }
            }
        }
        Ok(Block { body })
    }

    /// Parse one statement inside a block.
    pub fn parse_statement(&mut self) -> Result<Node> {
        match self.peek_kind() {
            Some(TokenKind::Ret) => {
                self.pop();
                Ok(Node::Return(Box::new(self.parse_expr()?)))
            }
            Some(TokenKind::LBrace) => Ok(Node::Block(self.parse_block()?)),
            _ => self.parse_expr(),
        }
    }

    fn parse_conditional(&mut self, tok: Token) -> Result<Conditional> {
        let kind = match tok.kind {
            TokenKind::If => CondKind::If,
            TokenKind::Elsif => CondKind::Elsif,
            TokenKind::While => CondKind::While,
            _ => CondKind::Else,
        };
        let cond = match kind {
            CondKind::Else => None,
            _ => Some(Box::new(self.parse_expr()?)),
        };
        let body = self.parse_block()?;

        let chains = matches!(kind, CondKind::If | CondKind::Elsif);
        let next = match self.peek_kind() {
            Some(TokenKind::Elsif) | Some(TokenKind::Else) if chains => match self.pop() {
                Some(t) => Some(Box::new(self.parse_conditional(t)?)),
                None => None,
            },
            _ => None,
        };
        Ok(Conditional {
            kind,
            cond,
            body,
            next,
        })
    }

    fn dangling_branch(tok: &Token) -> Error {
        let branch = if tok.kind == TokenKind::Else {
            "else {"
        } else {
            "elsif y == 24 {"
        };
        let wrong = format!("fn main() {{\n    {}\n        ret 0\n    }}\n}}", branch);
        let right = format!(
            "fn main() {{\n    if y == 0 {{\n        ret 1\n    }} {}\n        ret 0\n    }}\n}}",
            branch
        );
        Self::at(
            tok,
            ErrorKind::DanglingBranch,
            format!("'{}' must directly follow the body of an 'if' or 'elsif'", tok.lexeme),
        )
        .with_hint(wrong, right)
    }

    /// Parse a single expression: a primary, optionally followed by a binary
    /// operator and another full expression.
    pub fn parse_expr(&mut self) -> Result<Node> {
        self.nested(Self::expr)
    }

    fn expr(&mut self) -> Result<Node> {
        let tok = match self.pop() {
            Some(t) => t,
            None => {
                return Err(self.at_end(
                    ErrorKind::UnexpectedToken,
                    "expected an expression but reached the end of input",
                ))
            }
        };

        let primary = match tok.kind {
            TokenKind::Number => {
                let n = tok.lexeme.parse::<i64>().map_err(|_| {
                    Self::at(
                        &tok,
                        ErrorKind::InvalidNumber,
                        format!("number '{}' does not fit in a 64-bit integer", tok.lexeme),
                    )
                })?;
                Node::Number(n)
            }
            TokenKind::Ident => match self.peek_kind() {
                Some(TokenKind::Assign) => {
                    self.pop();
                    let value = self.parse_expr()?;
                    return Ok(Node::Assign {
                        name: tok.lexeme,
                        value: Box::new(value),
                    });
                }
                Some(TokenKind::LParen) => {
                    self.pop();
                    let args = self.parse_call_args(&tok.lexeme)?;
                    Node::Call {
                        name: tok.lexeme,
                        args,
                    }
                }
                _ => Node::Ident(tok.lexeme),
            },
            TokenKind::Bang | TokenKind::Minus => {
                let op = if tok.kind == TokenKind::Bang {
                    UnaryOp::Not
                } else {
                    UnaryOp::Neg
                };
                let operand = self.parse_expr()?;
                return Ok(Node::Unary {
                    op,
                    operand: Box::new(operand),
                });
            }
            TokenKind::If | TokenKind::While => {
                return Ok(Node::Conditional(self.parse_conditional(tok)?));
            }
            TokenKind::Elsif | TokenKind::Else => return Err(Self::dangling_branch(&tok)),
            other => {
                return Err(Self::at(
                    &tok,
                    ErrorKind::UnexpectedToken,
                    format!("unexpected {}, expected an expression", other),
                ))
            }
        };

        let op = match self.peek_kind().and_then(binary_op) {
            Some(op) => op,
            None => return Ok(primary),
        };
        self.pop();
        let right = self.parse_expr()?;
        Ok(Node::Binary {
            left: Box::new(primary),
            op,
            right: Box::new(right),
        })
    }

    fn parse_call_args(&mut self, name: &str) -> Result<Vec<Node>> {
        let mut args = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RParen) => {
                    self.pop();
                    return Ok(args);
                }
                Some(_) => args.push(self.parse_expr()?),
                None => {
                    return Err(self
                        .at_end(
                            ErrorKind::UnclosedParen,
                            format!("argument list of call to '{}' is never closed", name),
                        )
                        .with_hint("move(x 1", "move(x 1)"));
                }
            }
        }
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}
