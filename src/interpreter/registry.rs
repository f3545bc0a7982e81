use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use bitflags::bitflags;
use crate::interpreter::error::{Error, Result};
use crate::interpreter::lexer::TokenPos;
use crate::interpreter::value::{Value, ValueKind};

bitflags! {
    /// The set of value kinds a built-in accepts for one parameter.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Kinds: u8 {
        const INT = 1 << 0;
        const FLOAT = 1 << 1;
        const BOOL = 1 << 2;
        const STRING = 1 << 3;
        const INT_ARRAY = 1 << 4;
        const FLOAT_ARRAY = 1 << 5;
        const BOOL_ARRAY = 1 << 6;
        const STRING_ARRAY = 1 << 7;

        const NUMBER = Self::INT.bits() | Self::FLOAT.bits();
        const SCALAR = Self::NUMBER.bits() | Self::BOOL.bits() | Self::STRING.bits();
        const ANY_ARRAY = Self::INT_ARRAY.bits() | Self::FLOAT_ARRAY.bits() | Self::BOOL_ARRAY.bits() | Self::STRING_ARRAY.bits();
        const ANY = Self::SCALAR.bits() | Self::ANY_ARRAY.bits();
    }
}

impl Kinds {
    pub fn of(kind: ValueKind) -> Kinds {
        match kind {
            ValueKind::Int => Kinds::INT,
            ValueKind::Float => Kinds::FLOAT,
            ValueKind::Bool => Kinds::BOOL,
            ValueKind::String => Kinds::STRING,
            ValueKind::IntArray => Kinds::INT_ARRAY,
            ValueKind::FloatArray => Kinds::FLOAT_ARRAY,
            ValueKind::BoolArray => Kinds::BOOL_ARRAY,
            ValueKind::StringArray => Kinds::STRING_ARRAY,
        }
    }

    pub fn accepts(self, kind: ValueKind) -> bool {
        self.contains(Kinds::of(kind))
    }
}

impl Display for Kinds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if *self == Kinds::ANY {
            return f.write_str("any");
        }

        let mut names = vec![];

        if self.contains(Kinds::ANY_ARRAY) {
            names.push(String::from("array"));
        }

        for kind in ValueKind::ALL {
            if self.accepts(kind) && !(kind.is_array() && self.contains(Kinds::ANY_ARRAY)) {
                names.push(kind.to_string());
            }
        }

        f.write_str(&names.join(" | "))
    }
}

/// Console streams handed to built-ins.
pub struct NativeContext<'a> {
    pub output: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
}

/// A built-in's implementation.
///
/// Returns the call's value, or `None` for built-ins that only have side effects. An `Err`
/// message is turned into a fatal error at the call site.
pub type NativeFunction = fn(&mut NativeContext<'_>, Vec<Value>) -> NativeResult;

pub type NativeResult = std::result::Result<Option<Value>, String>;

struct FunctionEntry {
    function: NativeFunction,
    parameters: Vec<Kinds>,
}

#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    pub fn new() -> FunctionRegistry {
        FunctionRegistry::default()
    }

    /// Registers a built-in; the arity is the length of `parameters`.
    pub fn register(&mut self, name: &str, function: NativeFunction, parameters: &[Kinds]) {
        self.functions.insert(name.to_owned(), FunctionEntry { function, parameters: parameters.to_vec() });
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Calls a built-in after checking the argument count and each argument's kind.
    pub fn call(&self, pos: &TokenPos, name: &str, args: Vec<Value>, context: &mut NativeContext<'_>) -> Result<Option<Value>> {
        let entry = self.functions.get(name).ok_or_else(|| Error::FunctionNotFound {
            pos: pos.clone(),
            name: name.to_owned(),
        })?;

        if args.len() != entry.parameters.len() {
            return Err(Error::ArgumentCount {
                pos: pos.clone(),
                function: name.to_owned(),
                expected: entry.parameters.len(),
                got: args.len(),
            });
        }

        for (index, (arg, allowed)) in args.iter().zip(entry.parameters.iter()).enumerate() {
            if !allowed.accepts(arg.kind()) {
                return Err(Error::ArgumentKind {
                    pos: pos.clone(),
                    function: name.to_owned(),
                    index,
                    expected: *allowed,
                    found: arg.kind(),
                });
            }
        }

        tracing::trace!(function = name, "calling built-in");

        (entry.function)(context, args).map_err(|message| Error::Native {
            pos: pos.clone(),
            function: name.to_owned(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use super::*;

    thread_local! {
        static CALLS: Cell<usize> = Cell::new(0);
    }

    fn counting(_: &mut NativeContext<'_>, args: Vec<Value>) -> NativeResult {
        CALLS.with(|calls| calls.set(calls.get() + 1));
        Ok(args.into_iter().next())
    }

    fn call(registry: &FunctionRegistry, name: &str, args: Vec<Value>) -> Result<Option<Value>> {
        let mut output = Vec::new();
        let mut input: &[u8] = b"";
        let mut context = NativeContext { output: &mut output, input: &mut input };
        let pos = TokenPos::begin(Rc::from("registry.ion"));

        registry.call(&pos, name, args, &mut context)
    }

    #[test]
    fn kinds() {
        assert!(Kinds::ANY_ARRAY.accepts(ValueKind::BoolArray));
        assert!(!Kinds::ANY_ARRAY.accepts(ValueKind::Bool));
        assert_eq!("array | string", (Kinds::ANY_ARRAY | Kinds::STRING).to_string());
        assert_eq!("int | float", Kinds::NUMBER.to_string());
        assert_eq!("any", Kinds::ANY.to_string());
    }

    #[test]
    fn checks_happen_before_the_call() {
        let mut registry = FunctionRegistry::new();
        registry.register("Echo", counting, &[Kinds::INT | Kinds::ANY_ARRAY]);

        CALLS.with(|calls| calls.set(0));

        assert!(matches!(call(&registry, "Echo", vec![]),
            Err(Error::ArgumentCount { expected: 1, got: 0, .. })));
        assert!(matches!(call(&registry, "Echo", vec![Value::String(String::from("x"))]),
            Err(Error::ArgumentKind { index: 0, found: ValueKind::String, .. })));
        assert_eq!(0, CALLS.with(Cell::get));

        assert_eq!(Ok(Some(Value::FloatArray(vec![1.5]))), call(&registry, "Echo", vec![Value::FloatArray(vec![1.5])]));
        assert_eq!(1, CALLS.with(Cell::get));
    }

    #[test]
    fn unknown_function() {
        let registry = FunctionRegistry::new();

        assert!(!registry.exists("Nope"));
        assert!(matches!(call(&registry, "Nope", vec![]), Err(Error::FunctionNotFound { .. })));
    }
}
