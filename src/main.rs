use std::path::Path;
use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use iona_lang::{Command, Config, SOURCE_EXTENSION};
use iona_lang::interpreter::evaluator::Interpreter;
use iona_lang::repl::Repl;

fn main() -> ExitCode {
    let config: Config = Config::parse();

    let default_level = if config.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match config.command {
        Some(Command::Run { path, args }) => run(&path, args),
        None => {
            let mut repl = Repl::new(Interpreter::new(vec![]));

            match repl.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                },
            }
        },
    }
}

fn run(path: &Path, args: Vec<String>) -> ExitCode {
    if path.extension().map_or(true, |extension| extension != SOURCE_EXTENSION) {
        println!("'{}' is not an Iona script; expected a .{} file", path.display(), SOURCE_EXTENSION);
        return ExitCode::SUCCESS;
    }

    if !path.exists() {
        println!("File '{}' does not exist", path.display());
        return ExitCode::SUCCESS;
    }

    match iona_lang::run_file(path, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}
