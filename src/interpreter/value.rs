use std::fmt::{Display, Formatter};
use crate::util;

/// Element kinds an array can have, and the kinds an array literal can be tagged with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScalarKind {
    Int, Float, Bool, String,
}

impl ScalarKind {
    pub fn kind(self) -> ValueKind {
        match self {
            ScalarKind::Int => ValueKind::Int,
            ScalarKind::Float => ValueKind::Float,
            ScalarKind::Bool => ValueKind::Bool,
            ScalarKind::String => ValueKind::String,
        }
    }

    pub fn array_kind(self) -> ValueKind {
        match self {
            ScalarKind::Int => ValueKind::IntArray,
            ScalarKind::Float => ValueKind::FloatArray,
            ScalarKind::Bool => ValueKind::BoolArray,
            ScalarKind::String => ValueKind::StringArray,
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.kind(), f)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ValueKind {
    Int, Float, Bool, String,
    IntArray, FloatArray, BoolArray, StringArray,
}

impl ValueKind {
    pub const ALL: [ValueKind; 8] = [
        ValueKind::Int, ValueKind::Float, ValueKind::Bool, ValueKind::String,
        ValueKind::IntArray, ValueKind::FloatArray, ValueKind::BoolArray, ValueKind::StringArray,
    ];

    pub fn is_array(self) -> bool {
        self.element_kind().is_some()
    }

    pub fn element_kind(self) -> Option<ScalarKind> {
        match self {
            ValueKind::IntArray => Some(ScalarKind::Int),
            ValueKind::FloatArray => Some(ScalarKind::Float),
            ValueKind::BoolArray => Some(ScalarKind::Bool),
            ValueKind::StringArray => Some(ScalarKind::String),
            _ => None,
        }
    }

    pub fn scalar_kind(self) -> Option<ScalarKind> {
        match self {
            ValueKind::Int => Some(ScalarKind::Int),
            ValueKind::Float => Some(ScalarKind::Float),
            ValueKind::Bool => Some(ScalarKind::Bool),
            ValueKind::String => Some(ScalarKind::String),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::IntArray => "int[]",
            ValueKind::FloatArray => "float[]",
            ValueKind::BoolArray => "bool[]",
            ValueKind::StringArray => "string[]",
        })
    }
}

/// A runtime value.
///
/// Arrays hold one vector per element kind, so an array can never mix kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    BoolArray(Vec<bool>),
    StringArray(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::IntArray(_) => ValueKind::IntArray,
            Value::FloatArray(_) => ValueKind::FloatArray,
            Value::BoolArray(_) => ValueKind::BoolArray,
            Value::StringArray(_) => ValueKind::StringArray,
        }
    }

    pub fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    /// Builds an array of `kind` elements.
    ///
    /// Fails with the offending kind if any of `elements` is not a `kind` value.
    pub fn array_of(kind: ScalarKind, elements: Vec<Value>) -> Result<Value, ValueKind> {
        fn collect<T>(elements: Vec<Value>, extract: impl Fn(Value) -> Result<T, ValueKind>) -> Result<Vec<T>, ValueKind> {
            elements.into_iter().map(extract).collect()
        }

        Ok(match kind {
            ScalarKind::Int => Value::IntArray(collect(elements, |value| match value {
                Value::Int(value) => Ok(value),
                other => Err(other.kind()),
            })?),
            ScalarKind::Float => Value::FloatArray(collect(elements, |value| match value {
                Value::Float(value) => Ok(value),
                other => Err(other.kind()),
            })?),
            ScalarKind::Bool => Value::BoolArray(collect(elements, |value| match value {
                Value::Bool(value) => Ok(value),
                other => Err(other.kind()),
            })?),
            ScalarKind::String => Value::StringArray(collect(elements, |value| match value {
                Value::String(value) => Ok(value),
                other => Err(other.kind()),
            })?),
        })
    }

    /// Number of elements, `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::IntArray(values) => Some(values.len()),
            Value::FloatArray(values) => Some(values.len()),
            Value::BoolArray(values) => Some(values.len()),
            Value::StringArray(values) => Some(values.len()),
            _ => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Value::IntArray(values) => values.get(index).map(|value| Value::Int(*value)),
            Value::FloatArray(values) => values.get(index).map(|value| Value::Float(*value)),
            Value::BoolArray(values) => values.get(index).map(|value| Value::Bool(*value)),
            Value::StringArray(values) => values.get(index).map(|value| Value::String(value.clone())),
            _ => None,
        }
    }

    /// Replaces the element at `index`.
    ///
    /// The caller checks the index; a value of the wrong kind is handed back as `Err`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), Value> {
        match (self, value) {
            (Value::IntArray(values), Value::Int(value)) => values[index] = value,
            (Value::FloatArray(values), Value::Float(value)) => values[index] = value,
            (Value::BoolArray(values), Value::Bool(value)) => values[index] = value,
            (Value::StringArray(values), Value::String(value)) => values[index] = value,
            (_, value) => return Err(value),
        }

        Ok(())
    }

    /// The elements of an array as individual values, `None` for scalars.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::IntArray(values) => Some(values.iter().map(|value| Value::Int(*value)).collect()),
            Value::FloatArray(values) => Some(values.iter().map(|value| Value::Float(*value)).collect()),
            Value::BoolArray(values) => Some(values.iter().map(|value| Value::Bool(*value)).collect()),
            Value::StringArray(values) => Some(values.clone()
                .into_iter().map(Value::String).collect()),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::String(value) => f.write_str(value),
            Value::IntArray(values) => write!(f, "[{}]", util::join(values, ", ")),
            Value::FloatArray(values) => write!(f, "[{}]", util::join(values, ", ")),
            Value::BoolArray(values) => write!(f, "[{}]", util::join(values, ", ")),
            Value::StringArray(values) => write!(f, "[{}]", util::join(values, ", ")),
        }
    }
}
