use crate::interpreter::registry::{NativeContext, NativeResult};
use crate::interpreter::value::Value;

fn pick(args: &[Value], name: &str, int: fn(i64, i64) -> i64, float: fn(f64, f64) -> f64) -> NativeResult {
    match args {
        [Value::Int(left), Value::Int(right)] => Ok(Some(Value::Int(int(*left, *right)))),
        [Value::Float(left), Value::Float(right)] => Ok(Some(Value::Float(float(*left, *right)))),
        [left, right] => Err(format!("cannot take the {} of '{}' and '{}'", name, left.kind(), right.kind())),
        _ => Err(format!("cannot take the {} of {} values", name, args.len())),
    }
}

pub fn min(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    pick(&args, "minimum", i64::min, f64::min)
}

pub fn max(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    pick(&args, "maximum", i64::max, f64::max)
}

#[cfg(test)]
mod tests {
    use crate::interpreter::builtins::test_util::call;
    use super::*;

    #[test]
    fn same_kinds() {
        assert_eq!(Ok(Some(Value::Int(-3))), call(min, vec![Value::Int(4), Value::Int(-3)]));
        assert_eq!(Ok(Some(Value::Float(4.5))), call(max, vec![Value::Float(4.5), Value::Float(-3.0)]));
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        assert_eq!(Err(String::from("cannot take the minimum of 'int' and 'float'")),
                   call(min, vec![Value::Int(1), Value::Float(2.0)]));
    }
}
