use std::fs;
use std::path::Path;
use regex::Regex;
use walkdir::WalkDir;
use crate::interpreter::builtins::unexpected_arguments;
use crate::interpreter::registry::{NativeContext, NativeResult};
use crate::interpreter::value::Value;

fn path_arg(args: &[Value]) -> Result<&str, String> {
    match args.first() {
        Some(Value::String(path)) => Ok(path.as_str()),
        _ => Err(unexpected_arguments(args)),
    }
}

pub fn exists(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    Ok(Some(Value::Bool(Path::new(path_arg(&args)?).exists())))
}

pub fn read(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    let path = path_arg(&args)?;

    fs::read_to_string(path)
        .map(|content| Some(Value::String(content)))
        .map_err(|err| format!("cannot read '{}': {}", path, err))
}

pub fn read_lines(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    let path = path_arg(&args)?;
    let content = fs::read_to_string(path).map_err(|err| format!("cannot read '{}': {}", path, err))?;

    Ok(Some(Value::StringArray(content.lines().map(str::to_owned).collect())))
}

pub fn write(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(path), Value::String(content)] => {
            fs::write(path, content).map_err(|err| format!("cannot write '{}': {}", path, err))?;
            Ok(None)
        },
        _ => Err(unexpected_arguments(&args)),
    }
}

/// Writes each line followed by a newline.
pub fn write_lines(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(path), Value::StringArray(lines)] => {
            let content: String = lines.iter().map(|line| format!("{}\n", line)).collect();

            fs::write(path, content).map_err(|err| format!("cannot write '{}': {}", path, err))?;
            Ok(None)
        },
        _ => Err(unexpected_arguments(&args)),
    }
}

pub fn copy(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(from), Value::String(to)] => {
            fs::copy(from, to).map_err(|err| format!("cannot copy '{}' to '{}': {}", from, to, err))?;
            Ok(None)
        },
        _ => Err(unexpected_arguments(&args)),
    }
}

/// Every file below a directory (recursively) whose path matches a regex, sorted by path.
pub fn list(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    let (directory, pattern) = match args.as_slice() {
        [Value::String(directory), Value::String(pattern)] => (directory, pattern),
        _ => return Err(unexpected_arguments(&args)),
    };

    let regex = Regex::new(pattern).map_err(|err| format!("invalid pattern '{}': {}", pattern, err))?;
    let mut files = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|err| format!("cannot list '{}': {}", directory, err))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_string_lossy().into_owned();

        if regex.is_match(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(Some(Value::StringArray(files)))
}
