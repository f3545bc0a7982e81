pub mod util;
pub mod interpreter;
pub mod repl;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::{Parser as ClapParser, Subcommand};
use thiserror::Error;
use tracing::debug;
use crate::interpreter::ast::Ast;
use crate::interpreter::evaluator::Interpreter;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use crate::interpreter::semantic::SemanticAnalyzer;

pub const SOURCE_EXTENSION: &str = "ion";

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(short, long, global = true, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Runs a script file; without a command, an interactive prompt is started
    Run {
        #[clap(help = "Script to run (*.ion)")]
        path: PathBuf,
        #[clap(trailing_var_arg = true, allow_hyphen_values = true, help = "Arguments passed to the script as ARGS")]
        args: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Could not read '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Interpreter(#[from] interpreter::error::Error),
}

/// Reads a source file line by line, joining the lines with `\n`.
pub fn read_source(path: &Path) -> Result<String, RunError> {
    let io_error = |source| RunError::Io { path: path.to_owned(), source };

    let file = File::open(path).map_err(io_error)?;
    let lines = BufReader::new(file).lines().collect::<Result<Vec<_>, _>>().map_err(io_error)?;

    Ok(lines.join("\n"))
}

pub fn parse(path: &Path) -> Result<Ast, RunError> {
    let source = read_source(path)?;
    let file_name = path.to_string_lossy();

    parse_source(&source, &file_name)
}

fn parse_source(source: &str, file_name: &str) -> Result<Ast, RunError> {
    let start = Instant::now();
    let ast = Parser::new(Lexer::new(source, file_name)).parse()?;

    debug!(elapsed = ?start.elapsed(), nodes = ast.len(), "parsed {}", file_name);
    Ok(ast)
}

pub fn run_file(path: &Path, args: Vec<String>) -> Result<(), RunError> {
    let source = read_source(path)?;
    run_source(&source, &path.to_string_lossy(), args)
}

/// Parses, analyzes and interprets a complete program against stdin and stdout.
pub fn run_source(source: &str, file_name: &str, args: Vec<String>) -> Result<(), RunError> {
    let ast = parse_source(source, file_name)?;

    SemanticAnalyzer::new().analyze(&ast)?;
    Interpreter::new(args).interpret(&ast)?;

    Ok(())
}
