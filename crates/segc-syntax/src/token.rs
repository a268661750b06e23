//! Token definitions for the SEGC language.
//!
//! Tokens are the smallest meaningful units of a script: keywords, identifiers,
//! integer literals, operators and the four bracket characters. The scanner
//! produces them in source order and never rewrites them afterwards.
//!
//! # Examples
//!
//! ```rust
//! use segc_syntax::{Token, TokenKind};
//!
//! let plus = Token::new(TokenKind::Plus, "+", 1, 2);
//! assert_eq!(plus.kind.to_string(), "'+'");
//! assert_eq!(TokenKind::keyword_or_ident("elsif"), TokenKind::Elsif);
//! ```

use std::fmt;

/// Token types produced by the SEGC scanner.
///
/// The set is closed: every character sequence the scanner accepts maps onto
/// exactly one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// A variable or function name, e.g. `playerX`
    Ident,

    /// An unsigned integer literal, e.g. `640`
    Number,

    // === Keywords ===
    /// `fn` - declares a function
    Fn,

    /// `ret` - returns from the enclosing function
    Ret,

    /// `if`
    If,

    /// `elsif` - continues an `if` chain
    Elsif,

    /// `while`
    While,

    /// `else` - closes an `if` chain
    Else,

    // === Operators ===
    /// Assignment `=`
    Assign,

    /// Addition `+`
    Plus,

    /// Subtraction or negation `-`
    Minus,

    /// Multiplication `*`
    Star,

    /// Integer division `/`
    Slash,

    /// Equality `==`
    EqEq,

    /// Less-than `<`
    Less,

    /// Greater-than `>`
    Greater,

    /// Logical AND `&`
    And,

    /// Logical OR `|`
    Or,

    /// Logical NOT `!`
    Bang,

    // === Punctuation ===
    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `{`
    LBrace,

    /// `}`
    RBrace,
}

impl TokenKind {
    /// Classifies an identifier-shaped word against the keyword set.
    pub fn keyword_or_ident(word: &str) -> TokenKind {
        match word {
            "fn" => TokenKind::Fn,
            "ret" => TokenKind::Ret,
            "if" => TokenKind::If,
            "elsif" => TokenKind::Elsif,
            "while" => TokenKind::While,
            "else" => TokenKind::Else,
            _ => TokenKind::Ident,
        }
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Fn => "'fn'",
            TokenKind::Ret => "'ret'",
            TokenKind::If => "'if'",
            TokenKind::Elsif => "'elsif'",
            TokenKind::While => "'while'",
            TokenKind::Else => "'else'",
            TokenKind::Assign => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::EqEq => "'=='",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Bang => "'!'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token together with its source text and position.
///
/// `line` and `col` are 1-based and point at the first character of the
/// lexeme; the parser copies them into syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The syntactic category of this token
    pub kind: TokenKind,

    /// The exact source text, e.g. `"=="` or `"playerX"`
    pub lexeme: String,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            col,
        }
    }
}
