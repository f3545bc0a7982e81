use crate::interpreter::builtins::unexpected_arguments;
use crate::interpreter::registry::{NativeContext, NativeResult};
use crate::interpreter::value::Value;

fn map_string(args: &[Value], f: impl Fn(&str) -> Value) -> NativeResult {
    match args {
        [Value::String(text)] => Ok(Some(f(text))),
        _ => Err(unexpected_arguments(args)),
    }
}

fn test_strings(args: &[Value], f: impl Fn(&str, &str) -> bool) -> NativeResult {
    match args {
        [Value::String(text), Value::String(other)] => Ok(Some(Value::Bool(f(text, other)))),
        _ => Err(unexpected_arguments(args)),
    }
}

pub fn to_upper_case(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    map_string(&args, |text| Value::String(text.to_uppercase()))
}

pub fn to_lower_case(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    map_string(&args, |text| Value::String(text.to_lowercase()))
}

pub fn trim(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    map_string(&args, |text| Value::String(text.trim().to_owned()))
}

pub fn starts_with(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    test_strings(&args, |text, prefix| text.starts_with(prefix))
}

pub fn ends_with(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    test_strings(&args, |text, suffix| text.ends_with(suffix))
}

/// Splits at every occurrence of the separator, keeping empty parts.
/// An empty separator splits into single characters.
pub fn split(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(text), Value::String(separator)] if separator.is_empty() =>
            Ok(Some(Value::StringArray(text.chars().map(String::from).collect()))),
        [Value::String(text), Value::String(separator)] =>
            Ok(Some(Value::StringArray(text.split(separator.as_str()).map(str::to_owned).collect()))),
        _ => Err(unexpected_arguments(&args)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::builtins::test_util::{call, string, strings};
    use super::*;

    #[test]
    fn case_conversion() {
        assert_eq!(Ok(Some(string("HELLO, WORLD"))), call(to_upper_case, vec![string("Hello, World")]));
        assert_eq!(Ok(Some(string("hello, world"))), call(to_lower_case, vec![string("Hello, World")]));
    }

    #[test]
    fn prefix_and_suffix() {
        assert_eq!(Ok(Some(Value::Bool(true))), call(starts_with, vec![string("iona.ion"), string("iona")]));
        assert_eq!(Ok(Some(Value::Bool(false))), call(starts_with, vec![string("iona.ion"), string(".ion")]));
        assert_eq!(Ok(Some(Value::Bool(true))), call(ends_with, vec![string("iona.ion"), string(".ion")]));
    }

    #[test]
    fn split_keeps_empty_parts() {
        assert_eq!(Ok(Some(strings(&["a", "", "b"]))), call(split, vec![string("a,,b"), string(",")]));
        assert_eq!(Ok(Some(strings(&["x", "y"]))), call(split, vec![string("xy"), string("")]));
        assert_eq!(Ok(Some(strings(&["no separator"]))), call(split, vec![string("no separator"), string(";")]));
    }

    #[test]
    fn trim_whitespace() {
        assert_eq!(Ok(Some(string("a b"))), call(trim, vec![string(" \ta b\n")]));
    }

    #[test]
    fn wrong_arguments() {
        assert!(call(trim, vec![Value::Int(1)]).is_err());
    }
}
