use thiserror::Error;
use crate::interpreter::ast::ArithmeticOperator;
use crate::interpreter::lexer::{TokenPos, TokenType};
use crate::interpreter::registry::Kinds;
use crate::interpreter::symbols::SymbolKind;
use crate::interpreter::value::ValueKind;

/// Every failure the lexer, parser, semantic analyzer or interpreter can run into.
///
/// All of them are fatal: the phase that produced the error stops and the error travels up
/// to whoever drives the run (the file runner or a single REPL cycle).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Lexer
    #[error("{pos} Invalid character '{character}'")]
    InvalidCharacter { pos: TokenPos, character: char },
    #[error("{pos} Unterminated string")]
    UnterminatedString { pos: TokenPos },

    // Parser
    #[error("{pos} Unexpected token; expected {expected:?}, got {got:?} ('{text}')")]
    UnexpectedToken { pos: TokenPos, expected: TokenType, got: TokenType, text: String },
    #[error("{pos} Expected {context}, got {got:?} ('{text}')")]
    Expected { pos: TokenPos, context: &'static str, got: TokenType, text: String },
    #[error("{pos} Failed to parse {what} literal '{text}'")]
    InvalidLiteral { pos: TokenPos, what: &'static str, text: String },
    #[error("{pos} Array '{name}' cannot be empty")]
    EmptyArray { pos: TokenPos, name: String },
    #[error("{pos} Empty interpolation in string literal")]
    EmptyInterpolation { pos: TokenPos },
    #[error("{pos} No 'Main' function found; cannot execute program")]
    MissingMain { pos: TokenPos },

    // Semantic analysis
    #[error("{pos} {kind} '{name}' is already declared in this scope")]
    AlreadyDeclared { pos: TokenPos, kind: SymbolKind, name: String },
    #[error("{pos} {kind} '{name}' is not declared in this scope")]
    NotDeclared { pos: TokenPos, kind: SymbolKind, name: String },

    // Interpretation
    #[error("{pos} New value of variable '{name}' needs to be of type '{expected}', but is '{found}'")]
    TypeMismatch { pos: TokenPos, name: String, expected: ValueKind, found: ValueKind },
    #[error("{pos} Invalid operator '{operator}' for '{left}' and '{right}'")]
    InvalidOperator { pos: TokenPos, operator: ArithmeticOperator, left: ValueKind, right: ValueKind },
    #[error("{pos} Invalid operator '{operator}' for '{found}'")]
    InvalidUnaryOperator { pos: TokenPos, operator: &'static str, found: ValueKind },
    #[error("{pos} Division by zero")]
    DivisionByZero { pos: TokenPos },
    #[error("{pos} Integer overflow")]
    IntegerOverflow { pos: TokenPos },
    #[error("{pos} Array index {index} of '{name}' is out of bounds; the max index is {max}")]
    IndexOutOfBounds { pos: TokenPos, name: String, index: i64, max: i64 },
    #[error("{pos} Array index of '{name}' can only be an int, but is '{found}'")]
    InvalidIndex { pos: TokenPos, name: String, found: ValueKind },
    #[error("{pos} Elements of array '{name}' need to be of type '{expected}', but one is '{found}'")]
    ElementMismatch { pos: TokenPos, name: String, expected: ValueKind, found: ValueKind },
    #[error("{pos} Array '{name}' can only hold int, float, bool or string values, not '{found}'")]
    InvalidElement { pos: TokenPos, name: String, found: ValueKind },
    #[error("{pos} '{name}' is not an array, but '{found}'")]
    NotAnArray { pos: TokenPos, name: String, found: ValueKind },
    #[error("{pos} Expression of '{construct}' needs to evaluate to an array, but is '{found}'")]
    NotIterable { pos: TokenPos, construct: &'static str, found: ValueKind },
    #[error("{pos} Expression of '{construct}' needs to be a bool, but is '{found}'")]
    NonBooleanCondition { pos: TokenPos, construct: &'static str, found: ValueKind },
    #[error("{pos} Bound '{what}' of range loop needs to be an int, but is '{found}'")]
    NonIntegerRange { pos: TokenPos, what: &'static str, found: ValueKind },
    #[error("{pos} Step of range loop cannot be zero")]
    ZeroStep { pos: TokenPos },
    #[error("{pos} Function call parameter count ({got}) is not matching expected parameter count ({expected}) of function '{function}'")]
    ArgumentCount { pos: TokenPos, function: String, expected: usize, got: usize },
    #[error("{pos} Parameter {index} of function '{function}' needs to be of type '{expected}', but is '{found}'")]
    ArgumentKind { pos: TokenPos, function: String, index: usize, expected: Kinds, found: ValueKind },
    #[error("{pos} Function '{name}' not found")]
    FunctionNotFound { pos: TokenPos, name: String },
    #[error("{pos} Call of function '{function}' did not produce a value")]
    NoValue { pos: TokenPos, function: String },
    #[error("{pos} Statement cannot be used as a value")]
    NotAnExpression { pos: TokenPos },
    #[error("{pos} Function '{function}' failed: {message}")]
    Native { pos: TokenPos, function: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
