use std::io::{BufRead, Write};
use crate::interpreter::builtins::unexpected_arguments;
use crate::interpreter::registry::{NativeContext, NativeResult};
use crate::interpreter::value::Value;

pub fn write_line(context: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [value] => {
            writeln!(context.output, "{}", value).map_err(|err| err.to_string())?;
            Ok(None)
        },
        _ => Err(unexpected_arguments(&args)),
    }
}

/// Reads one line, without its line terminator. An exhausted input reads as an empty line.
fn next_line(context: &mut NativeContext<'_>) -> Result<String, String> {
    context.output.flush().map_err(|err| err.to_string())?;

    let mut line = String::new();
    context.input.read_line(&mut line).map_err(|err| err.to_string())?;

    if line.ends_with('\n') {
        line.pop();

        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(line)
}

pub fn read_line(context: &mut NativeContext<'_>, _: Vec<Value>) -> NativeResult {
    Ok(Some(Value::String(next_line(context)?)))
}

pub fn read_int(context: &mut NativeContext<'_>, _: Vec<Value>) -> NativeResult {
    let line = next_line(context)?;

    line.trim().parse::<i64>()
        .map(|value| Some(Value::Int(value)))
        .map_err(|_| format!("'{}' is not an int", line))
}

pub fn read_float(context: &mut NativeContext<'_>, _: Vec<Value>) -> NativeResult {
    let line = next_line(context)?;

    line.trim().parse::<f64>()
        .map(|value| Some(Value::Float(value)))
        .map_err(|_| format!("'{}' is not a float", line))
}
