use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;
use tracing::{debug, trace, warn};
use crate::interpreter::ast::{ArithmeticOperator, Ast, ComparisonOperator, IncrementDecrement, NodeId, NodeKind, StringPart};
use crate::interpreter::builtins;
use crate::interpreter::error::{Error, Result};
use crate::interpreter::lexer::TokenPos;
use crate::interpreter::parser::MAIN_FUNCTION_NAME;
use crate::interpreter::registry::{FunctionRegistry, NativeContext};
use crate::interpreter::scope::Scope;
use crate::interpreter::symbols::SymbolKind;
use crate::interpreter::value::{Value, ValueKind};

/// Tree-walking interpreter.
///
/// Owns the runtime [`Scope`], the user functions seen so far and the built-ins, but not the
/// [`Ast`]; every entry point borrows the arena it should run, so one interpreter can keep its
/// globals across many separately parsed statements.
pub struct Interpreter<'io> {
    scope: Scope,
    functions: HashMap<String, NodeId>,
    registry: FunctionRegistry,

    output: Box<dyn Write + 'io>,
    input: Box<dyn BufRead + 'io>,
}

impl Interpreter<'static> {
    /// Creates an interpreter talking to stdout and stdin.
    pub fn new(args: Vec<String>) -> Interpreter<'static> {
        Interpreter::with_io(args, io::stdout(), BufReader::new(io::stdin()))
    }
}

impl<'io> Interpreter<'io> {
    pub fn with_io(args: Vec<String>, output: impl Write + 'io, input: impl BufRead + 'io) -> Interpreter<'io> {
        let mut scope = Scope::new();

        for (name, value) in builtins::constants() {
            scope.declare(name, value);
        }

        scope.declare(builtins::ARGS, Value::StringArray(args));

        Interpreter {
            scope,
            functions: HashMap::new(),
            registry: builtins::default_registry(),
            output: Box::new(output),
            input: Box::new(input),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    pub fn input(&mut self) -> &mut dyn BufRead {
        &mut *self.input
    }

    /// Runs a whole program: declares its globals, then calls `Main`.
    pub fn interpret(&mut self, ast: &Ast) -> Result<()> {
        let start = Instant::now();

        if let Some(root) = ast.root() {
            self.execute(ast, root)?;
        }

        if let Err(err) = self.output.flush() {
            warn!("Could not flush output: {}", err);
        }

        debug!(elapsed = ?start.elapsed(), "interpretation finished");
        Ok(())
    }

    /// Runs a single statement in the global frame.
    ///
    /// Unlike statements inside a program, a bare variable, array element or call produces its
    /// value here, so a prompt can show it.
    pub fn execute_statement(&mut self, ast: &Ast, id: NodeId) -> Result<Option<Value>> {
        let node = &ast[id];

        let result = match &node.kind {
            NodeKind::VariableUsage { .. } | NodeKind::ArrayUsage { .. } => self.evaluate(ast, id).map(Some),
            NodeKind::FunctionCall { name, args } => self.call(ast, &node.pos, name, args),
            _ => self.execute(ast, id),
        };

        if let Err(err) = self.output.flush() {
            warn!("Could not flush output: {}", err);
        }

        result
    }

    fn run_program(&mut self, ast: &Ast, pos: &TokenPos, globals: &[NodeId], functions: &[NodeId]) -> Result<Option<Value>> {
        for global in globals {
            self.execute(ast, *global)?;
        }

        for function in functions {
            self.execute(ast, *function)?;
        }

        if !self.functions.contains_key(MAIN_FUNCTION_NAME) {
            return Err(Error::MissingMain { pos: pos.clone() });
        }

        self.call(ast, pos, MAIN_FUNCTION_NAME, &[])
    }

    // Statements

    /// Executes a statement, returning the value of the last `return` executed within it.
    ///
    /// `return` only records its value; the statements after it still run.
    fn execute(&mut self, ast: &Ast, id: NodeId) -> Result<Option<Value>> {
        let node = &ast[id];
        let pos = &node.pos;

        match &node.kind {
            NodeKind::Block(statements) => {
                let mut returned = None;

                for statement in statements {
                    if let Some(value) = self.execute(ast, *statement)? {
                        returned = Some(value);
                    }
                }

                Ok(returned)
            },
            NodeKind::If { condition, then, else_ifs, otherwise } => {
                if self.condition(ast, *condition, "if")? {
                    return self.in_frame(|this| this.execute(ast, *then));
                }

                for (condition, block) in else_ifs {
                    if self.condition(ast, *condition, "else if")? {
                        return self.in_frame(|this| this.execute(ast, *block));
                    }
                }

                match otherwise {
                    Some(otherwise) => self.in_frame(|this| this.execute(ast, *otherwise)),
                    None => Ok(None),
                }
            },
            NodeKind::When { subject, cases, otherwise } => {
                let subject = self.evaluate(ast, *subject)?;

                for (value, block) in cases {
                    let value = self.evaluate(ast, *value)?;

                    if Self::compare(ComparisonOperator::Equal, &subject, &value) {
                        return self.in_frame(|this| this.execute(ast, *block));
                    }
                }

                match otherwise {
                    Some(otherwise) => self.in_frame(|this| this.execute(ast, *otherwise)),
                    None => Ok(None),
                }
            },
            NodeKind::While { condition, body } => self.in_frame(|this| {
                let mut returned = None;

                while this.condition(ast, *condition, "while")? {
                    returned = this.execute(ast, *body)?.or(returned);
                }

                Ok(returned)
            }),
            NodeKind::DoWhile { body, condition } => self.in_frame(|this| {
                let mut returned = None;

                loop {
                    returned = this.execute(ast, *body)?.or(returned);

                    if !this.condition(ast, *condition, "do while")? {
                        return Ok(returned);
                    }
                }
            }),
            NodeKind::ForEach { variable, iterable, body } => {
                let iterable = self.evaluate(ast, *iterable)?;
                let elements = iterable.elements().ok_or_else(|| Error::NotIterable {
                    pos: pos.clone(),
                    construct: "for",
                    found: iterable.kind(),
                })?;

                self.in_frame(|this| {
                    let mut returned = None;

                    for element in elements {
                        this.scope.declare(variable, element);
                        returned = this.execute(ast, *body)?.or(returned);
                    }

                    Ok(returned)
                })
            },
            NodeKind::ForRange { variable, from, to, step, body } => {
                let from = self.range_bound(ast, *from, "from")?;
                let to = self.range_bound(ast, *to, "to")?;
                let step = match step {
                    Some(step) => self.range_bound(ast, *step, "step")?,
                    None => 1,
                };

                if step == 0 {
                    return Err(Error::ZeroStep { pos: pos.clone() });
                }

                self.in_frame(|this| {
                    let mut returned = None;
                    let mut i = from;

                    while (step > 0 && i < to) || (step < 0 && i > to) {
                        this.scope.declare(variable, Value::Int(i));
                        returned = this.execute(ast, *body)?.or(returned);

                        i = match i.checked_add(step) {
                            Some(next) => next,
                            None => break,
                        };
                    }

                    Ok(returned)
                })
            },

            NodeKind::VariableDeclaration { name, value } => {
                let value = self.evaluate(ast, *value)?;
                self.scope.declare(name, value);
                Ok(None)
            },
            NodeKind::VariableAssign { name, value } => {
                let value = self.evaluate(ast, *value)?;
                self.assign(pos, name, value)?;
                Ok(None)
            },
            NodeKind::VariableCompoundAssign { name, operator, value } => {
                let current = self.lookup(pos, name)?.clone();
                let value = self.evaluate(ast, *value)?;
                let value = Self::arithmetic(pos, *operator, current, value)?;

                self.assign(pos, name, value)?;
                Ok(None)
            },
            NodeKind::VariableIncrementDecrement { name, operation } => {
                let (operator, delta) = match operation {
                    IncrementDecrement::Increment => ("++", 1),
                    IncrementDecrement::Decrement => ("--", -1),
                };

                let value = match self.lookup(pos, name)? {
                    Value::Int(value) => Value::Int(value.checked_add(delta).ok_or(Error::IntegerOverflow { pos: pos.clone() })?),
                    Value::Float(value) => Value::Float(value + delta as f64),
                    other => return Err(Error::InvalidUnaryOperator { pos: pos.clone(), operator, found: other.kind() }),
                };

                self.assign(pos, name, value)?;
                Ok(None)
            },

            NodeKind::ArrayDeclaration { name, element_kind, elements } => {
                let values = elements.iter()
                    .map(|element| self.evaluate(ast, *element))
                    .collect::<Result<Vec<Value>>>()?;

                let element_kind = match element_kind {
                    Some(kind) => *kind,
                    None => {
                        let first = values.first().map(Value::kind).unwrap_or(ValueKind::Int);

                        first.scalar_kind().ok_or(Error::InvalidElement { pos: pos.clone(), name: name.clone(), found: first })?
                    },
                };

                let array = Value::array_of(element_kind, values).map_err(|found| Error::ElementMismatch {
                    pos: pos.clone(),
                    name: name.clone(),
                    expected: element_kind.kind(),
                    found,
                })?;

                self.scope.declare(name, array);
                Ok(None)
            },
            NodeKind::ArrayAssign { name, index, value } => {
                let index = self.evaluate(ast, *index)?;
                let value = self.evaluate(ast, *value)?;

                let array = self.scope.get_mut(name).ok_or_else(|| Error::NotDeclared {
                    pos: pos.clone(),
                    kind: SymbolKind::Variable,
                    name: name.clone(),
                })?;

                let len = array.len().ok_or_else(|| Error::NotAnArray {
                    pos: pos.clone(),
                    name: name.clone(),
                    found: array.kind(),
                })?;
                let index = Self::check_index(pos, name, index, len)?;
                let expected = array.kind().element_kind().map(|kind| kind.kind()).unwrap_or(ValueKind::Int);

                array.set(index, value).map_err(|value| Error::ElementMismatch {
                    pos: pos.clone(),
                    name: name.clone(),
                    expected,
                    found: value.kind(),
                })?;

                Ok(None)
            },

            NodeKind::Function { name, .. } => {
                self.functions.insert(name.clone(), id);
                Ok(None)
            },
            NodeKind::FunctionCall { name, args } => {
                self.call(ast, pos, name, args)?;
                Ok(None)
            },
            NodeKind::Return(value) => self.evaluate(ast, *value).map(Some),

            NodeKind::Program { globals, functions } => self.run_program(ast, pos, globals, functions),

            NodeKind::Int(_) | NodeKind::Float(_) | NodeKind::Bool(_) | NodeKind::String(_)
            | NodeKind::Binary { .. } | NodeKind::Comparison { .. }
            | NodeKind::VariableUsage { .. } | NodeKind::ArrayUsage { .. } => {
                self.evaluate(ast, id)?;
                Ok(None)
            },
        }
    }

    /// Runs `f` in a new innermost frame, which is dropped again even if `f` fails.
    fn in_frame<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.scope.push();
        trace!(depth = self.scope.depth(), "pushed frame");

        let result = f(self);

        self.scope.pop();
        trace!(depth = self.scope.depth(), "popped frame");
        result
    }

    fn condition(&mut self, ast: &Ast, id: NodeId, construct: &'static str) -> Result<bool> {
        match self.evaluate(ast, id)? {
            Value::Bool(value) => Ok(value),
            other => Err(Error::NonBooleanCondition { pos: ast[id].pos.clone(), construct, found: other.kind() }),
        }
    }

    fn range_bound(&mut self, ast: &Ast, id: NodeId, what: &'static str) -> Result<i64> {
        match self.evaluate(ast, id)? {
            Value::Int(value) => Ok(value),
            other => Err(Error::NonIntegerRange { pos: ast[id].pos.clone(), what, found: other.kind() }),
        }
    }

    fn lookup(&self, pos: &TokenPos, name: &str) -> Result<&Value> {
        self.scope.get(name).ok_or_else(|| Error::NotDeclared {
            pos: pos.clone(),
            kind: SymbolKind::Variable,
            name: name.to_owned(),
        })
    }

    /// Replaces a variable's value in the frame that owns it; the kind must stay the same.
    fn assign(&mut self, pos: &TokenPos, name: &str, value: Value) -> Result<()> {
        let slot = self.scope.get_mut(name).ok_or_else(|| Error::NotDeclared {
            pos: pos.clone(),
            kind: SymbolKind::Variable,
            name: name.to_owned(),
        })?;

        if slot.kind() != value.kind() {
            return Err(Error::TypeMismatch {
                pos: pos.clone(),
                name: name.to_owned(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }

        *slot = value;
        Ok(())
    }

    fn check_index(pos: &TokenPos, name: &str, index: Value, len: usize) -> Result<usize> {
        match index {
            Value::Int(index) if index < 0 || index as u64 >= len as u64 => Err(Error::IndexOutOfBounds {
                pos: pos.clone(),
                name: name.to_owned(),
                index,
                max: len as i64 - 1,
            }),
            Value::Int(index) => Ok(index as usize),
            other => Err(Error::InvalidIndex { pos: pos.clone(), name: name.to_owned(), found: other.kind() }),
        }
    }

    // Expressions

    fn evaluate(&mut self, ast: &Ast, id: NodeId) -> Result<Value> {
        let node = &ast[id];
        let pos = &node.pos;

        match &node.kind {
            NodeKind::Int(value) => Ok(Value::Int(*value)),
            NodeKind::Float(value) => Ok(Value::Float(*value)),
            NodeKind::Bool(value) => Ok(Value::Bool(*value)),
            NodeKind::String(parts) => {
                let mut result = String::new();

                for part in parts {
                    match part {
                        StringPart::Text(text) => result.push_str(text),
                        StringPart::Interpolation(expr) => result.push_str(&self.evaluate(ast, *expr)?.to_string()),
                    }
                }

                Ok(Value::String(result))
            },

            NodeKind::Binary { left, operator, right } => {
                let left = self.evaluate(ast, *left)?;
                let right = self.evaluate(ast, *right)?;

                Self::arithmetic(pos, *operator, left, right)
            },
            NodeKind::Comparison { left, operator, right } => {
                let left = self.evaluate(ast, *left)?;
                let right = self.evaluate(ast, *right)?;

                Ok(Value::Bool(Self::compare(*operator, &left, &right)))
            },

            NodeKind::VariableUsage { name } => self.lookup(pos, name).cloned(),
            NodeKind::ArrayUsage { name, index } => {
                let index = self.evaluate(ast, *index)?;
                let array = self.lookup(pos, name)?;

                let len = array.len().ok_or_else(|| Error::NotAnArray {
                    pos: pos.clone(),
                    name: name.clone(),
                    found: array.kind(),
                })?;
                let index = Self::check_index(pos, name, index, len)?;

                array.get(index).ok_or_else(|| Error::IndexOutOfBounds {
                    pos: pos.clone(),
                    name: name.clone(),
                    index: index as i64,
                    max: len as i64 - 1,
                })
            },

            NodeKind::FunctionCall { name, args } => self.call(ast, pos, name, args)?
                .ok_or_else(|| Error::NoValue { pos: pos.clone(), function: name.clone() }),

            _ => Err(Error::NotAnExpression { pos: pos.clone() }),
        }
    }

    /// `+ - * /` on two ints or two floats, and `+` on two strings.
    fn arithmetic(pos: &TokenPos, operator: ArithmeticOperator, left: Value, right: Value) -> Result<Value> {
        match (left, right) {
            (Value::Int(left), Value::Int(right)) => {
                let result = match operator {
                    ArithmeticOperator::Add => left.checked_add(right),
                    ArithmeticOperator::Subtract => left.checked_sub(right),
                    ArithmeticOperator::Multiply => left.checked_mul(right),
                    ArithmeticOperator::Divide => {
                        if right == 0 {
                            return Err(Error::DivisionByZero { pos: pos.clone() });
                        }

                        left.checked_div(right)
                    },
                };

                result.map(Value::Int).ok_or(Error::IntegerOverflow { pos: pos.clone() })
            },
            (Value::Float(left), Value::Float(right)) => Ok(Value::Float(match operator {
                ArithmeticOperator::Add => left + right,
                ArithmeticOperator::Subtract => left - right,
                ArithmeticOperator::Multiply => left * right,
                ArithmeticOperator::Divide => left / right,
            })),
            (Value::String(mut left), Value::String(right)) if operator == ArithmeticOperator::Add => {
                left.push_str(&right);
                Ok(Value::String(left))
            },
            (left, right) => Err(Error::InvalidOperator {
                pos: pos.clone(),
                operator,
                left: left.kind(),
                right: right.kind(),
            }),
        }
    }

    /// Numbers compare with each other (an int is widened for the comparison), strings only
    /// for (in)equality; every other pairing is `false`.
    fn compare(operator: ComparisonOperator, left: &Value, right: &Value) -> bool {
        let ordering = match (left, right) {
            (Value::Int(left), Value::Int(right)) => Some(left.cmp(right)),
            (Value::Float(left), Value::Float(right)) => left.partial_cmp(right),
            (Value::Int(left), Value::Float(right)) => (*left as f64).partial_cmp(right),
            (Value::Float(left), Value::Int(right)) => left.partial_cmp(&(*right as f64)),
            (Value::String(left), Value::String(right)) => return match operator {
                ComparisonOperator::Equal => left == right,
                ComparisonOperator::NotEqual => left != right,
                _ => false,
            },
            _ => return false,
        };

        match ordering {
            Some(ordering) => match operator {
                ComparisonOperator::Equal => ordering == Ordering::Equal,
                ComparisonOperator::NotEqual => ordering != Ordering::Equal,
                ComparisonOperator::Less => ordering == Ordering::Less,
                ComparisonOperator::LessEqual => ordering != Ordering::Greater,
                ComparisonOperator::Greater => ordering == Ordering::Greater,
                ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
            },
            // NaN is unequal to everything
            None => operator == ComparisonOperator::NotEqual,
        }
    }

    // Calls

    /// Calls a user function, or else a built-in. Arguments are evaluated in the caller's frame.
    fn call(&mut self, ast: &Ast, pos: &TokenPos, name: &str, args: &[NodeId]) -> Result<Option<Value>> {
        if let Some(function) = self.functions.get(name).copied() {
            let NodeKind::Function { parameters, body, .. } = &ast[function].kind else {
                return Err(Error::FunctionNotFound { pos: pos.clone(), name: name.to_owned() });
            };

            if parameters.len() != args.len() {
                return Err(Error::ArgumentCount {
                    pos: pos.clone(),
                    function: name.to_owned(),
                    expected: parameters.len(),
                    got: args.len(),
                });
            }

            let values = self.evaluate_all(ast, args)?;
            trace!(function = name, "calling function");

            self.in_frame(|this| {
                for (parameter, value) in parameters.iter().zip(values) {
                    this.scope.declare(parameter, value);
                }

                this.execute(ast, *body)
            })
        } else if self.registry.exists(name) {
            let values = self.evaluate_all(ast, args)?;
            let mut context = NativeContext { output: &mut *self.output, input: &mut *self.input };

            self.registry.call(pos, name, values, &mut context)
        } else {
            Err(Error::FunctionNotFound { pos: pos.clone(), name: name.to_owned() })
        }
    }

    fn evaluate_all(&mut self, ast: &Ast, args: &[NodeId]) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.evaluate(ast, *arg)).collect()
    }
}
