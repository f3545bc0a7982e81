//! The functions and constants every program can use without declaring them.

use crate::interpreter::registry::{FunctionRegistry, Kinds};
use crate::interpreter::value::Value;
use crate::util;

pub mod array;
pub mod console;
pub mod file;
pub mod math;
pub mod string;

/// Name of the global array holding the script's command line arguments.
pub const ARGS: &str = "ARGS";

pub fn constants() -> [(&'static str, Value); 5] {
    [
        ("PI", Value::Float(std::f64::consts::PI)),
        ("INT_MIN", Value::Int(i64::MIN)),
        ("INT_MAX", Value::Int(i64::MAX)),
        ("FLOAT_MIN", Value::Float(f64::MIN)),
        ("FLOAT_MAX", Value::Float(f64::MAX)),
    ]
}

pub fn register_all(registry: &mut FunctionRegistry) {
    registry.register("WriteLine", console::write_line, &[Kinds::ANY]);
    registry.register("ReadLine", console::read_line, &[]);
    registry.register("ReadInt", console::read_int, &[]);
    registry.register("ReadFloat", console::read_float, &[]);

    registry.register("ToUpperCase", string::to_upper_case, &[Kinds::STRING]);
    registry.register("ToLowerCase", string::to_lower_case, &[Kinds::STRING]);
    registry.register("StartsWith", string::starts_with, &[Kinds::STRING, Kinds::STRING]);
    registry.register("EndsWith", string::ends_with, &[Kinds::STRING, Kinds::STRING]);
    registry.register("Split", string::split, &[Kinds::STRING, Kinds::STRING]);
    registry.register("Trim", string::trim, &[Kinds::STRING]);

    registry.register("Contains", array::contains, &[Kinds::STRING | Kinds::ANY_ARRAY, Kinds::SCALAR]);
    registry.register("Size", array::size, &[Kinds::STRING | Kinds::ANY_ARRAY]);
    registry.register("Empty", array::empty, &[Kinds::STRING | Kinds::ANY_ARRAY]);
    registry.register("Random", array::random, &[Kinds::INT, Kinds::INT]);
    registry.register("Range", array::range, &[Kinds::INT]);
    registry.register("Reverse", array::reverse, &[Kinds::STRING | Kinds::ANY_ARRAY]);
    registry.register("ToString", array::to_string, &[Kinds::ANY]);

    registry.register("Min", math::min, &[Kinds::NUMBER, Kinds::NUMBER]);
    registry.register("Max", math::max, &[Kinds::NUMBER, Kinds::NUMBER]);

    registry.register("FileExists", file::exists, &[Kinds::STRING]);
    registry.register("FileRead", file::read, &[Kinds::STRING]);
    registry.register("FileWrite", file::write, &[Kinds::STRING, Kinds::STRING]);
    registry.register("FileCopy", file::copy, &[Kinds::STRING, Kinds::STRING]);
    registry.register("FileReadLines", file::read_lines, &[Kinds::STRING]);
    registry.register("FileWriteLines", file::write_lines, &[Kinds::STRING, Kinds::STRING_ARRAY]);
    registry.register("FileList", file::list, &[Kinds::STRING, Kinds::STRING]);
}

pub fn default_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    register_all(&mut registry);
    registry
}

/// Message for arguments a built-in cannot handle even though they passed the registry's kind checks.
pub(crate) fn unexpected_arguments(args: &[Value]) -> String {
    format!("unexpected arguments ({})", util::join(args.iter().map(Value::kind), ", "))
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::interpreter::registry::{NativeContext, NativeFunction, NativeResult};
    use crate::interpreter::value::Value;

    /// Calls `function` reading from `input`; returns its result and everything it printed.
    pub fn call_with_input(function: NativeFunction, input: &str, args: Vec<Value>) -> (NativeResult, String) {
        let mut output = Vec::new();
        let mut input = input.as_bytes();

        let result = {
            let mut context = NativeContext { output: &mut output, input: &mut input };
            function(&mut context, args)
        };

        (result, String::from_utf8_lossy(&output).into_owned())
    }

    pub fn call(function: NativeFunction, args: Vec<Value>) -> NativeResult {
        call_with_input(function, "", args).0
    }

    pub fn string(text: &str) -> Value {
        Value::String(text.to_owned())
    }

    pub fn strings(texts: &[&str]) -> Value {
        Value::StringArray(texts.iter().map(|text| text.to_string()).collect())
    }
}
