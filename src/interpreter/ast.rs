use std::fmt::{Debug, Display, Formatter};
use std::ops::Index;
use crate::interpreter::lexer::{TokenPos, TokenType};
use crate::interpreter::value::ScalarKind;

pub mod node;

pub use node::{NodeDisplay, StringPart};

/// Index of a [`Node`] inside its [`Ast`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArithmeticOperator {
    Add, Subtract, Multiply, Divide,
}

impl ArithmeticOperator {
    pub fn from_token(token_type: TokenType) -> Option<ArithmeticOperator> {
        match token_type {
            TokenType::Plus => Some(ArithmeticOperator::Add),
            TokenType::Minus => Some(ArithmeticOperator::Subtract),
            TokenType::Multiply => Some(ArithmeticOperator::Multiply),
            TokenType::Divide => Some(ArithmeticOperator::Divide),
            _ => None,
        }
    }

    /// The operator of a compound assignment token like `+=`.
    pub fn from_compound_assign(token_type: TokenType) -> Option<ArithmeticOperator> {
        match token_type {
            TokenType::PlusAssign => Some(ArithmeticOperator::Add),
            TokenType::MinusAssign => Some(ArithmeticOperator::Subtract),
            TokenType::MultiplyAssign => Some(ArithmeticOperator::Multiply),
            TokenType::DivideAssign => Some(ArithmeticOperator::Divide),
            _ => None,
        }
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComparisonOperator {
    Equal, NotEqual,
    Less, LessEqual,
    Greater, GreaterEqual,
}

impl ComparisonOperator {
    pub fn from_token(token_type: TokenType) -> Option<ComparisonOperator> {
        match token_type {
            TokenType::Equal => Some(ComparisonOperator::Equal),
            TokenType::NotEqual => Some(ComparisonOperator::NotEqual),
            TokenType::Less => Some(ComparisonOperator::Less),
            TokenType::LessEqual => Some(ComparisonOperator::LessEqual),
            TokenType::Greater => Some(ComparisonOperator::Greater),
            TokenType::GreaterEqual => Some(ComparisonOperator::GreaterEqual),
            _ => None,
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IncrementDecrement {
    Increment, Decrement,
}

impl Display for IncrementDecrement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IncrementDecrement::Increment => "++",
            IncrementDecrement::Decrement => "--",
        })
    }
}

#[derive(Clone, PartialEq)]
pub enum NodeKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(Vec<StringPart>),

    Binary {
        left: NodeId,
        operator: ArithmeticOperator,
        right: NodeId,
    },
    Comparison {
        left: NodeId,
        operator: ComparisonOperator,
        right: NodeId,
    },

    Block(Vec<NodeId>),
    If {
        condition: NodeId,
        then: NodeId,
        else_ifs: Vec<(NodeId, NodeId)>,
        otherwise: Option<NodeId>,
    },
    /// `(value, block)` cases, tried in order against the subject
    When {
        subject: NodeId,
        cases: Vec<(NodeId, NodeId)>,
        otherwise: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        condition: NodeId,
    },
    ForEach {
        variable: String,
        iterable: NodeId,
        body: NodeId,
    },
    ForRange {
        variable: String,
        from: NodeId,
        to: NodeId,
        step: Option<NodeId>,
        body: NodeId,
    },

    VariableDeclaration {
        name: String,
        value: NodeId,
    },
    VariableAssign {
        name: String,
        value: NodeId,
    },
    VariableCompoundAssign {
        name: String,
        operator: ArithmeticOperator,
        value: NodeId,
    },
    VariableIncrementDecrement {
        name: String,
        operation: IncrementDecrement,
    },
    VariableUsage {
        name: String,
    },

    ArrayDeclaration {
        name: String,
        /// `None` when the literal had no type tag and its first element is not a literal
        element_kind: Option<ScalarKind>,
        elements: Vec<NodeId>,
    },
    ArrayAssign {
        name: String,
        index: NodeId,
        value: NodeId,
    },
    ArrayUsage {
        name: String,
        index: NodeId,
    },

    Function {
        name: String,
        parameters: Vec<String>,
        body: NodeId,
    },
    FunctionCall {
        name: String,
        args: Vec<NodeId>,
    },
    Return(NodeId),

    /// `Main` is always the first function
    Program {
        globals: Vec<NodeId>,
        functions: Vec<NodeId>,
    },
}

#[derive(Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: TokenPos,
}

/// Arena owning every node of a parsed program.
///
/// Nodes are only ever appended; passes refer to them by [`NodeId`] and never change them.
#[derive(Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    pub fn add(&mut self, kind: NodeKind, pos: TokenPos) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, pos });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay::new(self, id)
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl Debug for Ast {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => write!(f, "{:?}", self.display(root)),
            None => write!(f, "<{} nodes>", self.nodes.len()),
        }
    }
}
