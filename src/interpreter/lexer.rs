use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::Chars;
use lazy_static::lazy_static;
use crate::interpreter::error::Error;
use crate::util;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub file: Rc<str>,
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(file: Rc<str>, line: i32, column: i32) -> TokenPos {
        TokenPos { file, line, column }
    }

    pub fn begin(file: Rc<str>) -> TokenPos {
        TokenPos::new(file, 1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    None,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    SquareBracketLeft, SquareBracketRight,
    Dot, DotDot, Comma, Colon, Arrow,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, PlusPlus, PlusAssign,
    Minus, MinusMinus, MinusAssign,
    Multiply, MultiplyAssign,
    Divide, DivideAssign,

    /// An identifier that is not directly followed by `(`
    Name,
    /// An identifier directly followed by `(`, either a call or a function declaration
    Call,
    LiteralInt, LiteralFloat,
    LiteralBoolean,
    LiteralString,

    // Keywords
    Function, Return,
    Var,
    Int, Float, Boolean, String,
    For, In, Step,
    While, Do,
    If, Else, When,

    // EOF
    Eof,
}

lazy_static! {
    static ref RESERVED_KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("func", TokenType::Function),
        ("return", TokenType::Return),
        ("var", TokenType::Var),
        ("int", TokenType::Int),
        ("float", TokenType::Float),
        ("bool", TokenType::Boolean),
        ("string", TokenType::String),
        ("true", TokenType::LiteralBoolean),
        ("false", TokenType::LiteralBoolean),
        ("for", TokenType::For),
        ("in", TokenType::In),
        ("step", TokenType::Step),
        ("while", TokenType::While),
        ("do", TokenType::Do),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("when", TokenType::When),
    ]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    pos: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, pos: TokenPos) -> Token {
        Token { token_type, source, pos }
    }

    pub fn empty(file: Rc<str>) -> Token {
        Token {
            token_type: TokenType::None,
            source: String::from(""),
            pos: TokenPos::begin(file),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn pos(&self) -> &TokenPos { &self.pos }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::None => f.write_str("None"),
            TokenType::Eof => f.write_str("Eof"),
            TokenType::LiteralString => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

type LexerResult<T> = Result<T, Error>;

/// Turns source text into tokens, one [`Lexer::scan_token`] call at a time.
pub struct Lexer<'source> {
    input: &'source str,
    file: Rc<str>,

    chars: Chars<'source>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str, file: &str) -> Lexer<'source> {
        let file: Rc<str> = Rc::from(file);
        Lexer::with_pos(source, TokenPos::begin(file))
    }

    /// Creates a lexer whose first character is located at `pos`.
    ///
    /// Used for the expressions embedded in string literals, so their diagnostics point at the
    /// line of the literal.
    pub fn with_pos(source: &'source str, pos: TokenPos) -> Lexer<'source> {
        Lexer {
            input: source,
            file: Rc::clone(&pos.file),

            chars: source.chars(),

            start_index: 0,
            current_index: 0,

            start_pos: pos.clone(),
            current_pos: pos,
        }
    }

    pub fn file(&self) -> &Rc<str> {
        &self.file
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos.clone();

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenType::Eof)),
            };

            return match c {
                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                '[' => Ok(self.make_token(TokenType::SquareBracketLeft)),
                ']' => Ok(self.make_token(TokenType::SquareBracketRight)),
                ',' => Ok(self.make_token(TokenType::Comma)),
                ':' => Ok(self.make_token(TokenType::Colon)),
                // Stray semicolons carry no meaning
                ';' => continue,

                '.' => Ok(if self.expect('.') { self.make_token(TokenType::DotDot) } else {
                    self.make_token(TokenType::Dot)
                }),
                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else if self.expect('>') {
                    self.make_token(TokenType::Arrow)
                } else {
                    self.make_token(TokenType::Assign)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.make_token(TokenType::Not)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),

                '+' => Ok(if self.expect('+') { self.make_token(TokenType::PlusPlus) } else if self.expect('=') {
                    self.make_token(TokenType::PlusAssign)
                } else {
                    self.make_token(TokenType::Plus)
                }),
                '-' => {
                    if matches!(self.peek(), Some('0'..='9')) {
                        self.scan_number()
                    } else {
                        Ok(if self.expect('-') { self.make_token(TokenType::MinusMinus) } else if self.expect('=') {
                            self.make_token(TokenType::MinusAssign)
                        } else {
                            self.make_token(TokenType::Minus)
                        })
                    }
                },
                '*' => Ok(if self.expect('=') { self.make_token(TokenType::MultiplyAssign) } else {
                    self.make_token(TokenType::Multiply)
                }),
                '/' => Ok(if self.expect('/') {
                    self.skip_line();
                    continue;
                } else if self.expect('*') {
                    self.skip_block_comment();
                    continue;
                } else if self.expect('=') {
                    self.make_token(TokenType::DivideAssign)
                } else {
                    self.make_token(TokenType::Divide)
                }),

                '"' => self.scan_string(),
                '0'..='9' => self.scan_number(),
                c if util::is_alphabetic(c) => self.scan_identifier(),

                _ => Err(Error::InvalidCharacter { pos: self.start_pos.clone(), character: c }),
            };
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();
        }

        if self.consume().is_none() {
            return Err(Error::UnterminatedString { pos: self.start_pos.clone() });
        }

        // Don't add leading and trailing '"' characters to token
        Ok(Token {
            token_type: TokenType::LiteralString,
            source: self.input[(self.start_index + 1)..(self.current_index - 1)].to_owned(),
            pos: self.start_pos.clone(),
        })
    }

    fn scan_number(&mut self) -> LexerResult<Token> {
        while let Some('0'..='9') = self.peek() {
            self.consume();
        }

        let mut floating_point = false;

        if let Some('.') = self.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.consume();
                floating_point = true;

                while let Some('0'..='9') = self.peek() {
                    self.consume();
                }
            }
        }

        Ok(self.make_token(if floating_point { TokenType::LiteralFloat } else { TokenType::LiteralInt }))
    }

    fn scan_identifier(&mut self) -> LexerResult<Token> {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];

        let token_type = match RESERVED_KEYWORDS.get(name) {
            Some(keyword) => *keyword,
            // Calls are told apart from plain names right here, so the parser never has to
            // look further than one token ahead
            None if self.peek() == Some('(') => TokenType::Call,
            None => TokenType::Name,
        };

        Ok(Token { source: name.to_owned(), token_type, pos: self.start_pos.clone() })
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),
            pos: self.start_pos.clone(),
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.consume() {
            if c == '\n' {
                return;
            }
        }
    }

    /// Skips to just after the first `*/`, or to the end of the input.
    fn skip_block_comment(&mut self) {
        while let Some(c) = self.consume() {
            if c == '*' && self.expect('/') {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests;
