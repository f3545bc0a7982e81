use crate::interpreter::ast::{ArithmeticOperator, Ast, ComparisonOperator, IncrementDecrement, NodeId, NodeKind, StringPart};
use crate::interpreter::error::Error;
use crate::interpreter::lexer::{Lexer, Token, TokenPos, TokenType};
use crate::interpreter::value::ScalarKind;
use crate::util;

pub const MAIN_FUNCTION_NAME: &str = "Main";

type ParseResult<T> = Result<T, Error>;

/// Recursive-descent parser building an [`Ast`] out of the tokens of one [`Lexer`].
///
/// The first syntax error ends parsing; there is no recovery.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token,

    ast: Ast,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        Parser::with_ast(lexer, Ast::new())
    }

    /// Creates a parser that appends its nodes to an existing arena.
    pub fn with_ast(lexer: Lexer<'source>, ast: Ast) -> Parser<'source> {
        let file = lexer.file().clone();

        Parser {
            lexer,
            previous: Token::empty(file.clone()), current: Token::empty(file),
            ast,
        }
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    // Program parsing

    /// Parses a whole program: global declarations followed by one or more functions.
    pub fn parse(mut self) -> ParseResult<Ast> {
        self.start()?;
        let pos = self.current.pos().clone();

        let mut globals = Vec::new();

        while self.check(TokenType::Var) {
            globals.push(self.parse_variable_declaration()?);
        }

        if !self.check(TokenType::Function) {
            return Err(self.error_expected("'var' or 'func'"));
        }

        let mut functions = Vec::new();

        while self.check(TokenType::Function) {
            functions.push(self.parse_function()?);
        }

        if !self.is_eof() {
            return Err(self.error_expected("'func' or end of file"));
        }

        let main_index = functions.iter()
            .position(|id| matches!(&self.ast[*id].kind, NodeKind::Function { name, .. } if name == MAIN_FUNCTION_NAME))
            .ok_or(Error::MissingMain { pos: pos.clone() })?;
        functions.swap(0, main_index);

        let root = self.ast.add(NodeKind::Program { globals, functions }, pos);
        self.ast.set_root(root);
        Ok(self.ast)
    }

    /// Parses statements until the end of the input.
    pub fn parse_statements(&mut self) -> ParseResult<Vec<NodeId>> {
        self.start()?;
        let mut statements = Vec::new();

        while !self.is_eof() {
            statements.push(self.statement()?);
        }

        Ok(statements)
    }

    fn parse_function(&mut self) -> ParseResult<NodeId> {
        let func = self.expect(TokenType::Function)?;
        let name = self.expect(TokenType::Call)?;
        self.expect(TokenType::ParenthesisLeft)?;

        let mut parameters = Vec::new();

        if !self.check(TokenType::ParenthesisRight) {
            loop {
                self.matches(TokenType::Var)?;
                parameters.push(self.expect(TokenType::Name)?.source().to_owned());

                if !self.matches(TokenType::Comma)? {
                    break;
                }
            }
        }

        self.expect(TokenType::ParenthesisRight)?;
        let body = self.parse_block()?;

        Ok(self.ast.add(NodeKind::Function { name: name.source().to_owned(), parameters, body }, func.pos().clone()))
    }

    fn parse_block(&mut self) -> ParseResult<NodeId> {
        let pos = self.current.pos().clone();

        if !self.matches(TokenType::BracketLeft)? {
            let statement = self.statement()?;
            return Ok(self.ast.add(NodeKind::Block(vec![statement]), pos));
        }

        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            statements.push(self.statement()?);
        }

        self.expect(TokenType::BracketRight)?;
        Ok(self.ast.add(NodeKind::Block(statements), pos))
    }

    // Statement parsing

    pub fn statement(&mut self) -> ParseResult<NodeId> {
        self.start()?;

        match self.current.token_type() {
            TokenType::Call => self.parse_function_call(),
            TokenType::Name => self.parse_name_statement(),
            TokenType::Var => self.parse_variable_declaration(),
            TokenType::For => self.parse_for_statement(),
            TokenType::While => self.parse_while_statement(),
            TokenType::Do => self.parse_do_while_statement(),
            TokenType::If => self.parse_if_statement(),
            TokenType::When => self.parse_when_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => Err(self.error_expected("statement")),
        }
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<NodeId> {
        let var = self.expect(TokenType::Var)?;
        let name = self.expect(TokenType::Name)?.source().to_owned();
        self.expect(TokenType::Assign)?;

        let tag = match self.current.token_type() {
            TokenType::Int => Some(ScalarKind::Int),
            TokenType::Float => Some(ScalarKind::Float),
            TokenType::Boolean => Some(ScalarKind::Bool),
            TokenType::String => Some(ScalarKind::String),
            _ => None,
        };

        if tag.is_some() {
            self.consume()?;
            self.expect(TokenType::SquareBracketLeft)?;
        } else if !self.matches(TokenType::SquareBracketLeft)? {
            let value = self.expression()?;
            return Ok(self.ast.add(NodeKind::VariableDeclaration { name, value }, var.pos().clone()));
        }

        if self.check(TokenType::SquareBracketRight) {
            return Err(Error::EmptyArray { pos: self.current.pos().clone(), name });
        }

        let mut elements = vec![self.factor()?];

        while self.matches(TokenType::Comma)? {
            if self.check(TokenType::SquareBracketRight) {
                break;
            }

            elements.push(self.factor()?);
        }

        self.expect(TokenType::SquareBracketRight)?;

        let element_kind = tag.or_else(|| match self.ast[elements[0]].kind {
            NodeKind::Int(_) => Some(ScalarKind::Int),
            NodeKind::Float(_) => Some(ScalarKind::Float),
            NodeKind::Bool(_) => Some(ScalarKind::Bool),
            NodeKind::String(_) => Some(ScalarKind::String),
            _ => None,
        });

        Ok(self.ast.add(NodeKind::ArrayDeclaration { name, element_kind, elements }, var.pos().clone()))
    }

    /// Statements starting with a plain name: assignments, increments and bare usages.
    fn parse_name_statement(&mut self) -> ParseResult<NodeId> {
        let token = self.expect(TokenType::Name)?;
        let name = token.source().to_owned();
        let pos = token.pos().clone();

        let token_type = self.current.token_type();

        let kind = if self.matches(TokenType::Assign)? {
            NodeKind::VariableAssign { name, value: self.expression()? }
        } else if self.matches(TokenType::SquareBracketLeft)? {
            let index = self.expression()?;
            self.expect(TokenType::SquareBracketRight)?;

            if self.matches(TokenType::Assign)? {
                NodeKind::ArrayAssign { name, index, value: self.expression()? }
            } else {
                NodeKind::ArrayUsage { name, index }
            }
        } else if let Some(operator) = ArithmeticOperator::from_compound_assign(token_type) {
            self.consume()?;
            NodeKind::VariableCompoundAssign { name, operator, value: self.expression()? }
        } else if self.matches(TokenType::PlusPlus)? {
            NodeKind::VariableIncrementDecrement { name, operation: IncrementDecrement::Increment }
        } else if self.matches(TokenType::MinusMinus)? {
            NodeKind::VariableIncrementDecrement { name, operation: IncrementDecrement::Decrement }
        } else {
            NodeKind::VariableUsage { name }
        };

        Ok(self.ast.add(kind, pos))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeId> {
        let for_token = self.expect(TokenType::For)?;
        let variable = self.expect(TokenType::Name)?.source().to_owned();
        self.expect(TokenType::In)?;

        let first = self.expression()?;

        let kind = if self.matches(TokenType::DotDot)? {
            let to = self.expression()?;
            let step = if self.matches(TokenType::Step)? { Some(self.expression()?) } else { None };
            let body = self.parse_block()?;

            NodeKind::ForRange { variable, from: first, to, step, body }
        } else {
            NodeKind::ForEach { variable, iterable: first, body: self.parse_block()? }
        };

        Ok(self.ast.add(kind, for_token.pos().clone()))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeId> {
        let while_token = self.expect(TokenType::While)?;
        let condition = self.expression()?;
        let body = self.parse_block()?;

        Ok(self.ast.add(NodeKind::While { condition, body }, while_token.pos().clone()))
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<NodeId> {
        let do_token = self.expect(TokenType::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenType::While)?;
        let condition = self.expression()?;

        Ok(self.ast.add(NodeKind::DoWhile { body, condition }, do_token.pos().clone()))
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeId> {
        let if_token = self.expect(TokenType::If)?;
        let condition = self.expression()?;
        let then = self.parse_block()?;

        let mut else_ifs = Vec::new();
        let mut otherwise = None;

        while self.matches(TokenType::Else)? {
            if self.matches(TokenType::If)? {
                let condition = self.expression()?;
                else_ifs.push((condition, self.parse_block()?));
            } else {
                otherwise = Some(self.parse_block()?);
                break;
            }
        }

        Ok(self.ast.add(NodeKind::If { condition, then, else_ifs, otherwise }, if_token.pos().clone()))
    }

    fn parse_when_statement(&mut self) -> ParseResult<NodeId> {
        let when_token = self.expect(TokenType::When)?;
        let subject = self.expression()?;
        self.expect(TokenType::BracketLeft)?;

        let mut cases = Vec::new();
        let mut otherwise = None;

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            if self.matches(TokenType::Else)? {
                self.expect(TokenType::Arrow)?;
                otherwise = Some(self.parse_block()?);
                break;
            }

            let value = self.expression()?;
            self.expect(TokenType::Arrow)?;
            cases.push((value, self.parse_block()?));
        }

        if cases.is_empty() {
            return Err(self.error_expected("'when' case"));
        }

        self.expect(TokenType::BracketRight)?;

        Ok(self.ast.add(NodeKind::When { subject, cases, otherwise }, when_token.pos().clone()))
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeId> {
        let return_token = self.expect(TokenType::Return)?;
        let value = self.expression()?;

        Ok(self.ast.add(NodeKind::Return(value), return_token.pos().clone()))
    }

    fn parse_function_call(&mut self) -> ParseResult<NodeId> {
        let name = self.expect(TokenType::Call)?;
        self.expect(TokenType::ParenthesisLeft)?;

        let mut args = Vec::new();

        if !self.check(TokenType::ParenthesisRight) {
            args.push(self.expression()?);

            while self.matches(TokenType::Comma)? {
                args.push(self.expression()?);
            }
        }

        self.expect(TokenType::ParenthesisRight)?;
        Ok(self.ast.add(NodeKind::FunctionCall { name: name.source().to_owned(), args }, name.pos().clone()))
    }

    // Expression parsing

    /// `+ - * /` chains over terms.
    pub fn expression(&mut self) -> ParseResult<NodeId> {
        self.start()?;
        let mut expr = self.term()?;

        while let Some(operator) = ArithmeticOperator::from_token(self.current.token_type()) {
            let pos = self.current.pos().clone();
            self.consume()?;
            let right = self.term()?;

            expr = self.ast.add(NodeKind::Binary { left: expr, operator, right }, pos);
        }

        Ok(expr)
    }

    /// `* /` with a factor on the right, or a comparison with a whole expression on the right.
    fn term(&mut self) -> ParseResult<NodeId> {
        let mut expr = self.factor()?;

        loop {
            let token_type = self.current.token_type();
            let pos = self.current.pos().clone();

            if let Some(operator @ (ArithmeticOperator::Multiply | ArithmeticOperator::Divide)) = ArithmeticOperator::from_token(token_type) {
                self.consume()?;
                let right = self.factor()?;

                expr = self.ast.add(NodeKind::Binary { left: expr, operator, right }, pos);
            } else if let Some(operator) = ComparisonOperator::from_token(token_type) {
                self.consume()?;
                let right = self.expression()?;

                expr = self.ast.add(NodeKind::Comparison { left: expr, operator, right }, pos);
            } else {
                return Ok(expr);
            }
        }
    }

    fn factor(&mut self) -> ParseResult<NodeId> {
        let token = self.current.clone();
        let pos = token.pos().clone();

        match token.token_type() {
            TokenType::Call => self.parse_function_call(),
            TokenType::Name => {
                self.consume()?;
                let name = token.source().to_owned();

                if self.matches(TokenType::SquareBracketLeft)? {
                    let index = self.expression()?;
                    self.expect(TokenType::SquareBracketRight)?;

                    Ok(self.ast.add(NodeKind::ArrayUsage { name, index }, pos))
                } else {
                    Ok(self.ast.add(NodeKind::VariableUsage { name }, pos))
                }
            },
            TokenType::LiteralInt => {
                self.consume()?;
                let value = token.source().parse::<i64>().map_err(|_| Error::InvalidLiteral {
                    pos: pos.clone(), what: "int", text: token.source().to_owned(),
                })?;

                Ok(self.ast.add(NodeKind::Int(value), pos))
            },
            TokenType::LiteralFloat => {
                self.consume()?;
                let value = token.source().parse::<f64>().map_err(|_| Error::InvalidLiteral {
                    pos: pos.clone(), what: "float", text: token.source().to_owned(),
                })?;

                Ok(self.ast.add(NodeKind::Float(value), pos))
            },
            TokenType::LiteralBoolean => {
                self.consume()?;
                Ok(self.ast.add(NodeKind::Bool(token.source() == "true"), pos))
            },
            TokenType::LiteralString => {
                self.consume()?;
                self.parse_string_literal(&token)
            },
            TokenType::ParenthesisLeft => {
                self.consume()?;
                let expr = self.expression()?;
                self.expect(TokenType::ParenthesisRight)?;

                Ok(expr)
            },
            _ => Err(self.error_expected("expression")),
        }
    }

    /// Splits a string literal into text and `{...}` interpolations.
    ///
    /// A `{` without a matching `}` stays part of the text.
    fn parse_string_literal(&mut self, token: &Token) -> ParseResult<NodeId> {
        let text = token.source();
        let mut parts = Vec::new();
        let mut text_start = 0;

        while let Some(offset) = text[text_start..].find('{') {
            let open = text_start + offset;

            let close = match util::find_closing_brace(text, open) {
                Some(close) => close,
                None => break,
            };

            if open > text_start {
                parts.push(StringPart::Text(text[text_start..open].to_owned()));
            }

            let inner = &text[open + 1..close];

            if inner.trim().is_empty() {
                return Err(Error::EmptyInterpolation { pos: token.pos().clone() });
            }

            parts.push(StringPart::Interpolation(self.parse_interpolation(inner, token.pos())?));
            text_start = close + 1;
        }

        if text_start < text.len() {
            parts.push(StringPart::Text(text[text_start..].to_owned()));
        }

        Ok(self.ast.add(NodeKind::String(parts), token.pos().clone()))
    }

    fn parse_interpolation(&mut self, source: &str, pos: &TokenPos) -> ParseResult<NodeId> {
        let mut parser = Parser::with_ast(Lexer::with_pos(source, pos.clone()), std::mem::take(&mut self.ast));

        let result = parser.expression().and_then(|expr| {
            if parser.is_eof() {
                Ok(expr)
            } else {
                Err(parser.error_expected("end of interpolation"))
            }
        });

        self.ast = parser.into_ast();
        result
    }

    // Token helpers

    fn start(&mut self) -> ParseResult<()> {
        if self.current.token_type() == TokenType::None {
            self.consume()?;
        }

        Ok(())
    }

    fn consume(&mut self) -> ParseResult<()> {
        let next = self.lexer.scan_token()?;
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(())
    }

    fn expect(&mut self, token_type: TokenType) -> ParseResult<Token> {
        if self.current.token_type() != token_type {
            return Err(Error::UnexpectedToken {
                pos: self.current.pos().clone(),
                expected: token_type,
                got: self.current.token_type(),
                text: self.current.source().to_owned(),
            });
        }

        self.consume()?;
        Ok(self.previous.clone())
    }

    fn matches(&mut self, token_type: TokenType) -> ParseResult<bool> { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return Ok(false);
        }

        self.consume()?;
        Ok(true)
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    pub fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }

    fn error_expected(&self, context: &'static str) -> Error {
        Error::Expected {
            pos: self.current.pos().clone(),
            context,
            got: self.current.token_type(),
            text: self.current.source().to_owned(),
        }
    }
}
