use std::fmt::{Debug, Formatter};
use crate::interpreter::ast::{Ast, NodeId, NodeKind};

#[derive(Clone, PartialEq, Debug)]
pub enum StringPart {
    Text(String),
    /// An expression from a `{...}` span, substituted when the literal is evaluated
    Interpolation(NodeId),
}

/// Renders a node and its children back into (roughly) the source syntax.
pub struct NodeDisplay<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl<'a> NodeDisplay<'a> {
    pub fn new(ast: &'a Ast, id: NodeId) -> NodeDisplay<'a> {
        NodeDisplay { ast, id }
    }

    fn child(&self, id: NodeId) -> NodeDisplay<'a> {
        NodeDisplay::new(self.ast, id)
    }

    fn list(&self, ids: &[NodeId], separator: &str) -> String {
        ids.iter().map(|id| format!("{:?}", self.child(*id))).collect::<Vec<String>>().join(separator)
    }
}

impl Debug for NodeDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.ast.get(self.id).kind {
            NodeKind::Int(value) => write!(f, "{}", value),
            NodeKind::Float(value) => write!(f, "{:?}", value),
            NodeKind::Bool(value) => write!(f, "{}", value),
            NodeKind::String(parts) => {
                write!(f, "\"")?;

                for part in parts {
                    match part {
                        StringPart::Text(text) => write!(f, "{}", text)?,
                        StringPart::Interpolation(id) => write!(f, "{{{:?}}}", self.child(*id))?,
                    }
                }

                write!(f, "\"")
            },

            NodeKind::Binary { left, operator, right } =>
                write!(f, "({:?} {} {:?})", self.child(*left), operator, self.child(*right)),
            NodeKind::Comparison { left, operator, right } =>
                write!(f, "({:?} {} {:?})", self.child(*left), operator, self.child(*right)),

            NodeKind::Block(statements) => write!(f, "{{ {} }}", self.list(statements, " ")),
            NodeKind::If { condition, then, else_ifs, otherwise } => {
                write!(f, "if {:?} {:?}", self.child(*condition), self.child(*then))?;

                for (condition, block) in else_ifs {
                    write!(f, " else if {:?} {:?}", self.child(*condition), self.child(*block))?;
                }

                if let Some(otherwise) = otherwise {
                    write!(f, " else {:?}", self.child(*otherwise))?;
                }

                Ok(())
            },
            NodeKind::When { subject, cases, otherwise } => {
                write!(f, "when {:?} {{", self.child(*subject))?;

                for (value, block) in cases {
                    write!(f, " {:?} => {:?}", self.child(*value), self.child(*block))?;
                }

                if let Some(otherwise) = otherwise {
                    write!(f, " else => {:?}", self.child(*otherwise))?;
                }

                write!(f, " }}")
            },
            NodeKind::While { condition, body } => write!(f, "while {:?} {:?}", self.child(*condition), self.child(*body)),
            NodeKind::DoWhile { body, condition } => write!(f, "do {:?} while {:?}", self.child(*body), self.child(*condition)),
            NodeKind::ForEach { variable, iterable, body } =>
                write!(f, "for {} in {:?} {:?}", variable, self.child(*iterable), self.child(*body)),
            NodeKind::ForRange { variable, from, to, step, body } => {
                write!(f, "for {} in {:?}..{:?}", variable, self.child(*from), self.child(*to))?;

                if let Some(step) = step {
                    write!(f, " step {:?}", self.child(*step))?;
                }

                write!(f, " {:?}", self.child(*body))
            },

            NodeKind::VariableDeclaration { name, value } => write!(f, "var {} = {:?}", name, self.child(*value)),
            NodeKind::VariableAssign { name, value } => write!(f, "{} = {:?}", name, self.child(*value)),
            NodeKind::VariableCompoundAssign { name, operator, value } =>
                write!(f, "{} {}= {:?}", name, operator, self.child(*value)),
            NodeKind::VariableIncrementDecrement { name, operation } => write!(f, "{}{}", name, operation),
            NodeKind::VariableUsage { name } => write!(f, "{}", name),

            NodeKind::ArrayDeclaration { name, element_kind, elements } => {
                write!(f, "var {} = ", name)?;

                if let Some(kind) = element_kind {
                    write!(f, "{}", kind)?;
                }

                write!(f, "[{}]", self.list(elements, ", "))
            },
            NodeKind::ArrayAssign { name, index, value } =>
                write!(f, "{}[{:?}] = {:?}", name, self.child(*index), self.child(*value)),
            NodeKind::ArrayUsage { name, index } => write!(f, "{}[{:?}]", name, self.child(*index)),

            NodeKind::Function { name, parameters, body } =>
                write!(f, "func {}({}) {:?}", name, parameters.join(", "), self.child(*body)),
            NodeKind::FunctionCall { name, args } => write!(f, "{}({})", name, self.list(args, ", ")),
            NodeKind::Return(value) => write!(f, "return {:?}", self.child(*value)),

            NodeKind::Program { globals, functions } => {
                let globals = self.list(globals, "\n");
                let functions = self.list(functions, "\n");

                if globals.is_empty() {
                    write!(f, "{}", functions)
                } else {
                    write!(f, "{}\n{}", globals, functions)
                }
            },
        }
    }
}
