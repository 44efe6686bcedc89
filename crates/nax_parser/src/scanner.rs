use std::fmt::Display;
use std::iter::Peekable;
use std::str::Chars;

use crate::report::ErrorSink;
use crate::token::{Literal, Token, TokenKind};

#[derive(Debug)]
enum LexError {
    UnexpectedCharacter(char, usize),
    UnterminatedString(usize),
}

impl LexError {
    fn line(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter(_, line) => *line,
            LexError::UnterminatedString(line) => *line,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedCharacter(c, _) => write!(f, "Unexpected character '{}'.", c),
            LexError::UnterminatedString(_) => write!(f, "Unterminated string."),
        }
    }
}

type LexResult<T> = Result<T, LexError>;

pub struct Scanner<'a> {
    input_iter: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            input_iter: source.chars().peekable(),
            line: 1,
        }
    }

    /// Consume the whole source, reporting problems as they are found and
    /// skipping past them. The returned sequence always ends with Eof.
    pub fn scan_tokens(mut self, sink: &mut dyn ErrorSink) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            match self.next_token() {
                Ok(token) => {
                    let done = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if done {
                        break;
                    }
                }
                // Report and keep scanning from the next character
                Err(error) => sink.error(error.line(), &error.to_string()),
            }
        }

        tokens
    }

    /// Consume the next character, counting newlines as they go by.
    fn read_char(&mut self) -> Option<char> {
        let next = self.input_iter.next();
        if let Some('\n') = next {
            self.line += 1;
        }
        next
    }

    /// Get the next character without consuming it.
    fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    /// Consume whitespace until a non-whitespace character is found.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if c.is_whitespace() {
                self.read_char();
            } else {
                break;
            }
        }
    }

    fn make(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme.to_owned(), None, self.line)
    }

    fn next_token(&mut self) -> LexResult<Token> {
        loop {
            self.skip_whitespace();

            let line = self.line;

            let c = match self.read_char() {
                Some(c) => c,
                None => return Ok(Token::new(TokenKind::Eof, String::new(), None, line)),
            };

            let token = match c {
                '(' => self.make(TokenKind::LeftParen, "("),
                ')' => self.make(TokenKind::RightParen, ")"),
                '{' => self.make(TokenKind::LeftBrace, "{"),
                '}' => self.make(TokenKind::RightBrace, "}"),
                ',' => self.make(TokenKind::Comma, ","),
                '.' => self.make(TokenKind::Dot, "."),
                '-' => self.make(TokenKind::Minus, "-"),
                '+' => self.make(TokenKind::Plus, "+"),
                ';' => self.make(TokenKind::Semicolon, ";"),
                '*' => self.make(TokenKind::Star, "*"),

                '/' => match self.peek_char() {
                    // A line comment runs to the end of the line
                    Some('/') => {
                        while let Some(&ch) = self.peek_char() {
                            if ch == '\n' {
                                break;
                            }
                            self.read_char();
                        }
                        continue;
                    }
                    _ => self.make(TokenKind::Slash, "/"),
                },

                // Maximal munch for the two-character operators
                '!' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        self.make(TokenKind::BangEqual, "!=")
                    }
                    _ => self.make(TokenKind::Bang, "!"),
                },
                '=' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        self.make(TokenKind::EqualEqual, "==")
                    }
                    _ => self.make(TokenKind::Equal, "="),
                },
                '<' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        self.make(TokenKind::LessEqual, "<=")
                    }
                    _ => self.make(TokenKind::Less, "<"),
                },
                '>' => match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        self.make(TokenKind::GreaterEqual, ">=")
                    }
                    _ => self.make(TokenKind::Greater, ">"),
                },

                '"' => self.read_string(line)?,

                c if is_digit(c) => self.read_number(c),
                c if is_identifier_start(c) => self.read_identifier_or_keyword(c),

                _ => return Err(LexError::UnexpectedCharacter(c, line)),
            };

            return Ok(token);
        }
    }

    /// Read the rest of a string literal. No escape processing; the literal
    /// may span newlines. `line` is where the opening quote appeared, which
    /// is where an unterminated string gets reported.
    fn read_string(&mut self, line: usize) -> LexResult<Token> {
        let mut value = String::new();

        loop {
            match self.read_char() {
                Some('"') => break,
                Some(ch) => value.push(ch),
                None => return Err(LexError::UnterminatedString(line)),
            }
        }

        let lexeme = format!("\"{}\"", value);
        Ok(Token::new(
            TokenKind::String,
            lexeme,
            Some(Literal::String(value)),
            line,
        ))
    }

    /// Read the current and following characters as a number token:
    /// digits with at most one decimal point, always stored as f64.
    fn read_number(&mut self, first: char) -> Token {
        let mut seen_dot = false;

        let mut s = String::new();
        s.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_digit(ch) {
                s.push(ch);
                self.read_char();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                s.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        let value = match s.parse() {
            Ok(value) => value,
            // A digit run with at most one dot always parses as f64
            Err(_) => panic!("unparsable number literal {}", s),
        };

        Token::new(TokenKind::Number, s, Some(Literal::Number(value)), self.line)
    }

    /// Read the current and following characters as an identifier or a
    /// reserved keyword.
    fn read_identifier_or_keyword(&mut self, first: char) -> Token {
        let mut identifier = String::new();
        identifier.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_identifier_char(ch) {
                identifier.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        match TokenKind::lookup_keyword(&identifier) {
            Some(kind) => Token::new(kind, identifier, None, self.line),
            None => Token::new(TokenKind::Identifier, identifier, None, self.line),
        }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whether the given character may begin an identifier
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether the given character may continue an identifier
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
