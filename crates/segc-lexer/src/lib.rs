//! SEGC lexer: converts source text into tokens.
use segc_syntax::error::{error_at, ErrorKind, Result};
use segc_syntax::token::{Token, TokenKind};

/// Tokenize a whole script.
///
/// ```rust
/// use segc_syntax::TokenKind;
///
/// let tokens = segc_lexer::tokenize("x = 1 ; set x").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, [TokenKind::Ident, TokenKind::Assign, TokenKind::Number]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                // comment runs to end of line
                while let Some(c2) = self.peek() {
                    self.advance();
                    if c2 == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if accept(c) {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn read_number(&mut self) -> Result<Token> {
        let (line, col) = (self.line, self.col);
        let s = self.read_while(|c| c.is_ascii_digit());
        if s.parse::<i64>().is_err() {
            return error_at(
                ErrorKind::InvalidNumber,
                line,
                col,
                format!("number '{}' does not fit in a 64-bit integer", s),
            );
        }
        Ok(Token::new(TokenKind::Number, s, line, col))
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let s = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Token::new(TokenKind::keyword_or_ident(&s), s, line, col)
    }

    /// Tokenize the entire input. No end-of-file marker is appended.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let c = match self.peek() {
                None => break,
                Some(c) => c,
            };
            let single = match c {
                '+' => Some(TokenKind::Plus),
                '-' => Some(TokenKind::Minus),
                '*' => Some(TokenKind::Star),
                '/' => Some(TokenKind::Slash),
                '&' => Some(TokenKind::And),
                '|' => Some(TokenKind::Or),
                '!' => Some(TokenKind::Bang),
                '<' => Some(TokenKind::Less),
                '>' => Some(TokenKind::Greater),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                _ => None,
            };
            let tk = if let Some(kind) = single {
                self.advance();
                Token::new(kind, c.to_string(), line, col)
            } else if c == '=' {
                if self.peek_next() == Some('=') {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::EqEq, "==", line, col)
                } else {
                    self.advance();
                    Token::new(TokenKind::Assign, "=", line, col)
                }
            } else if c.is_ascii_digit() {
                self.read_number()?
            } else if c.is_ascii_alphabetic() {
                self.read_ident_or_keyword()
            } else {
                return error_at(
                    ErrorKind::UnknownCharacter,
                    line,
                    col,
                    format!("unknown character '{}'", c),
                );
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_sum_is_three_tokens() {
        let tokens = tokenize("1+2").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, TokenKind::Plus);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].lexeme, "2");
    }

    #[test]
    fn test_equals_versus_assign() {
        assert_eq!(kinds("=="), vec![TokenKind::EqEq]);
        assert_eq!(kinds("= ="), vec![TokenKind::Assign, TokenKind::Assign]);
        assert_eq!(
            kinds("x = y == 1"),
            vec![
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("fn ret if elsif else while"),
            vec![
                TokenKind::Fn,
                TokenKind::Ret,
                TokenKind::If,
                TokenKind::Elsif,
                TokenKind::Else,
                TokenKind::While
            ]
        );
        // keywords only match whole words
        assert_eq!(kinds("iffy fnord ret_val"), vec![TokenKind::Ident; 3]);
    }

    #[test]
    fn test_identifiers_keep_digits_and_underscores() {
        let tokens = tokenize("player_x2").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "player_x2");
    }

    #[test]
    fn test_single_character_operators() {
        assert_eq!(
            kinds("+ - * / & | ! < > ( ) { }"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace
            ]
        );
    }

    #[test]
    fn test_negative_literal_is_two_tokens() {
        assert_eq!(kinds("-5"), vec![TokenKind::Minus, TokenKind::Number]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(kinds("; nothing here\nx ; trailing"), vec![TokenKind::Ident]);
        assert!(kinds("; comment without newline").is_empty());
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("fn main() {\n  ret 0\n}").unwrap();
        let ret = &tokens[5];
        assert_eq!(ret.kind, TokenKind::Ret);
        assert_eq!((ret.line, ret.col), (2, 3));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("x = 1\ny = $").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCharacter);
        assert_eq!((err.line, err.col), (Some(2), Some(5)));
        // identifiers must start with a letter
        assert_eq!(tokenize("_x").unwrap_err().kind, ErrorKind::UnknownCharacter);
    }

    #[test]
    fn test_number_overflow() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("   \n\t ").unwrap().is_empty());
    }
}
