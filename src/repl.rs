use std::io::{self, BufRead, Write};
use tracing::debug;
use crate::interpreter::ast::Ast;
use crate::interpreter::error::Result;
use crate::interpreter::evaluator::Interpreter;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use crate::interpreter::semantic::SemanticAnalyzer;
use crate::interpreter::value::Value;

const FILE_NAME: &str = "<repl>";
const PROMPT: &str = "> ";
const EXIT_COMMAND: &str = "exit";

/// Interactive prompt evaluating one line of statements at a time.
///
/// Globals and the symbol table survive between lines. All lines are parsed into the same
/// arena, so nodes of earlier lines stay valid.
pub struct Repl<'io> {
    interpreter: Interpreter<'io>,
    analyzer: SemanticAnalyzer,
    ast: Ast,
}

impl<'io> Repl<'io> {
    pub fn new(interpreter: Interpreter<'io>) -> Repl<'io> {
        Repl {
            interpreter,
            analyzer: SemanticAnalyzer::new(),
            ast: Ast::new(),
        }
    }

    /// Reads lines from the interpreter's input until `exit` or the end of input.
    ///
    /// Errors are reported on stderr and do not end the loop.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();

        loop {
            write!(self.interpreter.output(), "{}", PROMPT)?;
            self.interpreter.output().flush()?;

            line.clear();

            if self.interpreter.input().read_line(&mut line)? == 0 {
                writeln!(self.interpreter.output())?;
                break;
            }

            let input = line.trim();

            if input == EXIT_COMMAND {
                break;
            } else if input.is_empty() {
                continue;
            }

            match self.eval_line(input) {
                Ok(values) => for value in values {
                    writeln!(self.interpreter.output(), "{}", value)?;
                },
                Err(err) => eprintln!("{}", err),
            }
        }

        Ok(())
    }

    /// Parses, analyzes and executes every statement on one line, returning the values the
    /// statements produced.
    ///
    /// Statements before a failing one keep their effects. A failing statement declares nothing.
    pub fn eval_line(&mut self, line: &str) -> Result<Vec<Value>> {
        let mut parser = Parser::with_ast(Lexer::new(line, FILE_NAME), std::mem::take(&mut self.ast));
        let statements = parser.parse_statements();
        self.ast = parser.into_ast();

        let mut values = Vec::new();

        for statement in statements? {
            let checkpoint = self.analyzer.checkpoint();

            let result = self.analyzer.analyze_statement(&self.ast, statement)
                .and_then(|()| self.interpreter.execute_statement(&self.ast, statement));

            match result {
                Ok(Some(value)) => values.push(value),
                Ok(None) => {},
                Err(err) => {
                    // Keeps the symbol table in step with the runtime scope
                    self.analyzer.rollback(checkpoint);
                    return Err(err);
                },
            }
        }

        debug!(nodes = self.ast.len(), "evaluated line");
        Ok(values)
    }
}
