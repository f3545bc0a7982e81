use rand::Rng;
use crate::interpreter::builtins::unexpected_arguments;
use crate::interpreter::registry::{NativeContext, NativeResult};
use crate::interpreter::value::Value;

/// Substring test for strings, element test for arrays.
pub fn contains(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(text), Value::String(part)] => Ok(Some(Value::Bool(text.contains(part.as_str())))),
        [array, element] if array.is_array() => {
            let found = array.elements()
                .map(|elements| elements.contains(element))
                .unwrap_or(false);

            Ok(Some(Value::Bool(found)))
        },
        [Value::String(_), other] => Err(format!("can only search strings for a string, not '{}'", other.kind())),
        _ => Err(unexpected_arguments(&args)),
    }
}

pub fn size(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(text)] => Ok(Some(Value::Int(text.chars().count() as i64))),
        [array] => array.len()
            .map(|len| Some(Value::Int(len as i64)))
            .ok_or_else(|| unexpected_arguments(&args)),
        _ => Err(unexpected_arguments(&args)),
    }
}

pub fn empty(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::String(text)] => Ok(Some(Value::Bool(text.is_empty()))),
        [array] => array.len()
            .map(|len| Some(Value::Bool(len == 0)))
            .ok_or_else(|| unexpected_arguments(&args)),
        _ => Err(unexpected_arguments(&args)),
    }
}

/// A random int between both bounds, inclusive.
pub fn random(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [Value::Int(min), Value::Int(max)] if min > max =>
            Err(format!("minimum {} is greater than maximum {}", min, max)),
        [Value::Int(min), Value::Int(max)] => Ok(Some(Value::Int(rand::thread_rng().gen_range(*min..=*max)))),
        _ => Err(unexpected_arguments(&args)),
    }
}

/// Largest array `Range` builds.
pub const MAX_RANGE_LEN: i64 = 1 << 28;

/// The ints `0` up to (excluding) the argument.
pub fn range(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    let count = match args.as_slice() {
        [Value::Int(count)] if !(0..=MAX_RANGE_LEN).contains(count) =>
            return Err(format!("cannot create a range of {} elements", count)),
        [Value::Int(count)] => *count,
        _ => return Err(unexpected_arguments(&args)),
    };

    let mut values = Vec::new();
    values.try_reserve_exact(count as usize)
        .map_err(|err| format!("cannot create a range of {} elements: {}", count, err))?;
    values.extend(0..count);

    Ok(Some(Value::IntArray(values)))
}

pub fn reverse(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    let reversed = match args.into_iter().next() {
        Some(Value::String(text)) => Value::String(text.chars().rev().collect()),
        Some(Value::IntArray(mut values)) => {
            values.reverse();
            Value::IntArray(values)
        },
        Some(Value::FloatArray(mut values)) => {
            values.reverse();
            Value::FloatArray(values)
        },
        Some(Value::BoolArray(mut values)) => {
            values.reverse();
            Value::BoolArray(values)
        },
        Some(Value::StringArray(mut values)) => {
            values.reverse();
            Value::StringArray(values)
        },
        other => return Err(unexpected_arguments(&other.into_iter().collect::<Vec<_>>())),
    };

    Ok(Some(reversed))
}

pub fn to_string(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
    match args.as_slice() {
        [value] => Ok(Some(Value::String(value.to_string()))),
        _ => Err(unexpected_arguments(&args)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::builtins::test_util::{call, string, strings};
    use super::*;

    #[test]
    fn contains_strings_and_elements() {
        assert_eq!(Ok(Some(Value::Bool(true))), call(contains, vec![string("haystack"), string("st")]));
        assert_eq!(Ok(Some(Value::Bool(true))), call(contains, vec![Value::IntArray(vec![1, 2, 3]), Value::Int(2)]));
        assert_eq!(Ok(Some(Value::Bool(false))), call(contains, vec![Value::IntArray(vec![1, 2, 3]), Value::Float(2.0)]));
        assert_eq!(Ok(Some(Value::Bool(true))), call(contains, vec![strings(&["a", "b"]), string("b")]));
        assert!(call(contains, vec![string("123"), Value::Int(1)]).is_err());
    }

    #[test]
    fn size_and_empty() {
        assert_eq!(Ok(Some(Value::Int(3))), call(size, vec![Value::IntArray(vec![1, 2, 3])]));
        assert_eq!(Ok(Some(Value::Int(4))), call(size, vec![string("äbcd")]));
        assert_eq!(Ok(Some(Value::Bool(true))), call(empty, vec![string("")]));
        assert_eq!(Ok(Some(Value::Bool(true))), call(empty, vec![Value::BoolArray(vec![])]));
        assert_eq!(Ok(Some(Value::Bool(false))), call(empty, vec![strings(&["x"])]));
    }

    #[test]
    fn random_stays_in_bounds() {
        for _ in 0..100 {
            match call(random, vec![Value::Int(-2), Value::Int(2)]) {
                Ok(Some(Value::Int(value))) => assert!((-2..=2).contains(&value)),
                other => panic!("unexpected result {:?}", other),
            }
        }

        assert_eq!(Ok(Some(Value::Int(7))), call(random, vec![Value::Int(7), Value::Int(7)]));
        assert!(call(random, vec![Value::Int(3), Value::Int(1)]).is_err());
    }

    #[test]
    fn range_counts_from_zero() {
        assert_eq!(Ok(Some(Value::IntArray(vec![0, 1, 2, 3]))), call(range, vec![Value::Int(4)]));
        assert_eq!(Ok(Some(Value::IntArray(vec![]))), call(range, vec![Value::Int(0)]));
        assert!(call(range, vec![Value::Int(-1)]).is_err());
    }

    #[test]
    fn huge_ranges_fail_instead_of_allocating() {
        assert!(call(range, vec![Value::Int(i64::MAX)]).is_err());
        assert!(call(range, vec![Value::Int(MAX_RANGE_LEN + 1)]).is_err());
    }

    #[test]
    fn reverse_twice_is_identity() {
        let array = Value::FloatArray(vec![1.0, 2.5, -3.0]);
        let reversed = call(reverse, vec![array.clone()]).expect("reverse failed").expect("no value");

        assert_eq!(Value::FloatArray(vec![-3.0, 2.5, 1.0]), reversed);
        assert_eq!(Ok(Some(array)), call(reverse, vec![reversed]));
        assert_eq!(Ok(Some(string("noi"))), call(reverse, vec![string("ion")]));
    }

    #[test]
    fn to_string_of_everything() {
        assert_eq!(Ok(Some(string("12"))), call(to_string, vec![Value::Int(12)]));
        assert_eq!(Ok(Some(string("[true, false]"))), call(to_string, vec![Value::BoolArray(vec![true, false])]));
    }
}
