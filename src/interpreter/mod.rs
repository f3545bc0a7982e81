pub mod ast;
pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod scope;
pub mod semantic;
pub mod symbols;
pub mod value;
