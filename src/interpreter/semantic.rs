use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};
use crate::interpreter::ast::{Ast, NodeId, NodeKind, StringPart};
use crate::interpreter::builtins;
use crate::interpreter::error::{Error, Result};
use crate::interpreter::lexer::TokenPos;
use crate::interpreter::symbols::{ScopedSymbolTable, Symbol, SymbolKind};

/// Checks that every name is declared before it is used, and that no declaration reuses a name
/// visible from its scope.
///
/// Runs before anything is executed and never evaluates expressions, so it cannot catch type or
/// arity errors; those surface while interpreting.
pub struct SemanticAnalyzer {
    scope: Rc<RefCell<ScopedSymbolTable>>,
}

impl SemanticAnalyzer {
    pub fn new() -> SemanticAnalyzer {
        SemanticAnalyzer::with_scope(ScopedSymbolTable::new_global())
    }

    /// Creates an analyzer working on an existing (possibly already populated) global scope.
    pub fn with_scope(scope: Rc<RefCell<ScopedSymbolTable>>) -> SemanticAnalyzer {
        let analyzer = SemanticAnalyzer { scope };
        analyzer.register_builtin_symbols();
        analyzer
    }

    pub fn scope(&self) -> Rc<RefCell<ScopedSymbolTable>> {
        Rc::clone(&self.scope)
    }

    fn register_builtin_symbols(&self) {
        let mut scope = self.scope.borrow_mut();

        for name in builtins::default_registry().names() {
            scope.add(Symbol::function(name));
        }

        for (name, _) in builtins::constants() {
            scope.add(Symbol::variable(name));
        }

        scope.add(Symbol::variable(builtins::ARGS));
    }

    pub fn analyze(&mut self, ast: &Ast) -> Result<()> {
        let start = Instant::now();

        if let Some(root) = ast.root() {
            self.analyze_node(ast, root)?;
        }

        debug!(elapsed = ?start.elapsed(), "semantic analysis finished");
        Ok(())
    }

    /// Analyzes a single statement in the current scope; declarations stay visible to later calls.
    pub fn analyze_statement(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        self.analyze_node(ast, id)
    }

    /// Remembers the names of the current scope, so a later [`rollback`](Self::rollback) can
    /// forget everything declared in between.
    pub fn checkpoint(&self) -> HashMap<String, Symbol> {
        self.scope.borrow().snapshot()
    }

    pub fn rollback(&mut self, checkpoint: HashMap<String, Symbol>) {
        self.scope.borrow_mut().restore(checkpoint);
    }

    fn analyze_node(&mut self, ast: &Ast, id: NodeId) -> Result<()> {
        let node = &ast[id];
        let pos = &node.pos;

        match &node.kind {
            NodeKind::Int(_) | NodeKind::Float(_) | NodeKind::Bool(_) => Ok(()),
            NodeKind::String(parts) => {
                for part in parts {
                    if let StringPart::Interpolation(expr) = part {
                        self.analyze_node(ast, *expr)?;
                    }
                }

                Ok(())
            },

            NodeKind::Binary { left, right, .. } | NodeKind::Comparison { left, right, .. } => {
                self.analyze_node(ast, *left)?;
                self.analyze_node(ast, *right)
            },

            NodeKind::Block(statements) => {
                for statement in statements {
                    self.analyze_node(ast, *statement)?;
                }

                Ok(())
            },
            NodeKind::If { condition, then, else_ifs, otherwise } => {
                self.analyze_node(ast, *condition)?;
                self.in_child_scope(None, |this| this.analyze_node(ast, *then))?;

                for (condition, block) in else_ifs {
                    self.analyze_node(ast, *condition)?;
                    self.in_child_scope(None, |this| this.analyze_node(ast, *block))?;
                }

                if let Some(otherwise) = otherwise {
                    self.in_child_scope(None, |this| this.analyze_node(ast, *otherwise))?;
                }

                Ok(())
            },
            NodeKind::When { subject, cases, otherwise } => {
                self.analyze_node(ast, *subject)?;

                for (value, block) in cases {
                    self.analyze_node(ast, *value)?;
                    self.in_child_scope(None, |this| this.analyze_node(ast, *block))?;
                }

                if let Some(otherwise) = otherwise {
                    self.in_child_scope(None, |this| this.analyze_node(ast, *otherwise))?;
                }

                Ok(())
            },
            NodeKind::While { condition, body } | NodeKind::DoWhile { body, condition } => {
                self.analyze_node(ast, *condition)?;
                self.in_child_scope(None, |this| this.analyze_node(ast, *body))
            },
            NodeKind::ForEach { variable, iterable, body } => {
                self.analyze_node(ast, *iterable)?;

                self.in_child_scope(None, |this| {
                    this.declare(pos, Symbol::variable(variable))?;
                    this.analyze_node(ast, *body)
                })
            },
            NodeKind::ForRange { variable, from, to, step, body } => {
                self.analyze_node(ast, *from)?;
                self.analyze_node(ast, *to)?;

                if let Some(step) = step {
                    self.analyze_node(ast, *step)?;
                }

                self.in_child_scope(None, |this| {
                    this.declare(pos, Symbol::variable(variable))?;
                    this.analyze_node(ast, *body)
                })
            },

            NodeKind::VariableDeclaration { name, value } => {
                self.analyze_node(ast, *value)?;
                self.declare(pos, Symbol::variable(name))
            },
            NodeKind::VariableAssign { name, value } | NodeKind::VariableCompoundAssign { name, value, .. } => {
                self.ensure_declared(pos, SymbolKind::Variable, name)?;
                self.analyze_node(ast, *value)
            },
            NodeKind::VariableIncrementDecrement { name, .. } | NodeKind::VariableUsage { name } =>
                self.ensure_declared(pos, SymbolKind::Variable, name),

            NodeKind::ArrayDeclaration { name, elements, .. } => {
                for element in elements {
                    self.analyze_node(ast, *element)?;
                }

                self.declare(pos, Symbol::variable(name))
            },
            NodeKind::ArrayAssign { name, index, value } => {
                self.ensure_declared(pos, SymbolKind::Variable, name)?;
                self.analyze_node(ast, *index)?;
                self.analyze_node(ast, *value)
            },
            NodeKind::ArrayUsage { name, index } => {
                self.ensure_declared(pos, SymbolKind::Variable, name)?;
                self.analyze_node(ast, *index)
            },

            NodeKind::Function { name, parameters, body } => {
                self.in_child_scope(Some(name.clone()), |this| {
                    for parameter in parameters {
                        this.declare(pos, Symbol::variable(parameter))?;
                    }

                    this.analyze_node(ast, *body)
                })
            },
            NodeKind::FunctionCall { name, args } => {
                self.ensure_declared(pos, SymbolKind::Function, name)?;

                for arg in args {
                    self.analyze_node(ast, *arg)?;
                }

                Ok(())
            },
            NodeKind::Return(value) => self.analyze_node(ast, *value),

            NodeKind::Program { globals, functions } => {
                for global in globals {
                    self.analyze_node(ast, *global)?;
                }

                // All function names are known before any body is analyzed
                for function in functions {
                    let function = &ast[*function];

                    if let NodeKind::Function { name, .. } = &function.kind {
                        self.declare(&function.pos, Symbol::function(name))?;
                    }
                }

                for function in functions {
                    self.analyze_node(ast, *function)?;
                }

                Ok(())
            },
        }
    }

    /// Declares a name, which must not be visible yet from the current scope.
    fn declare(&mut self, pos: &TokenPos, symbol: Symbol) -> Result<()> {
        if self.scope.borrow().find(&symbol.name).is_some() {
            return Err(Error::AlreadyDeclared { pos: pos.clone(), kind: symbol.kind, name: symbol.name });
        }

        self.scope.borrow_mut().add(symbol);
        Ok(())
    }

    fn ensure_declared(&self, pos: &TokenPos, kind: SymbolKind, name: &str) -> Result<()> {
        match self.scope.borrow().find(name) {
            Some(symbol) if symbol.kind == kind => Ok(()),
            _ => Err(Error::NotDeclared { pos: pos.clone(), kind, name: name.to_owned() }),
        }
    }

    /// Runs `f` in a new child scope, which is dropped again even if `f` fails.
    fn in_child_scope(&mut self, name: Option<String>, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let parent = Rc::clone(&self.scope);
        let name = name.unwrap_or_else(|| (parent.borrow().level() + 1).to_string());

        self.scope = ScopedSymbolTable::new_with_parent(name, Rc::clone(&parent));
        trace!(scope = self.scope.borrow().name(), "entered scope");

        let result = f(self);
        self.scope = parent;

        result
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        SemanticAnalyzer::new()
    }
}

#[cfg(test)]
mod tests;
