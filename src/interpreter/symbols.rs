use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "Variable"),
            SymbolKind::Function => write!(f, "Function"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn variable(name: &str) -> Symbol {
        Symbol { name: name.to_owned(), kind: SymbolKind::Variable }
    }

    pub fn function(name: &str) -> Symbol {
        Symbol { name: name.to_owned(), kind: SymbolKind::Function }
    }
}

/// One scope of names known before execution.
///
/// Holds no values; only used to check that every name is declared before it is used.
#[derive(Debug)]
pub struct ScopedSymbolTable {
    name: String,
    level: u32,
    symbols: HashMap<String, Symbol>,

    parent: Option<Rc<RefCell<ScopedSymbolTable>>>,
}

impl ScopedSymbolTable {
    pub fn new_global() -> Rc<RefCell<ScopedSymbolTable>> {
        Rc::new(RefCell::new(ScopedSymbolTable {
            name: String::from("global"),
            level: 1,
            symbols: HashMap::new(),
            parent: None,
        }))
    }

    pub fn new_with_parent(name: String, parent: Rc<RefCell<ScopedSymbolTable>>) -> Rc<RefCell<ScopedSymbolTable>> {
        let level = parent.borrow().level + 1;

        Rc::new(RefCell::new(ScopedSymbolTable {
            name, level,
            symbols: HashMap::new(),
            parent: Some(parent),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Adds a symbol to this scope. Returns `false` if the name is already taken here.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&symbol.name) {
            return false;
        }

        self.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    /// Looks a name up in this scope and then in every enclosing one.
    pub fn find(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).cloned()
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.borrow().find(name)))
    }

    /// Copies the symbols declared directly in this scope.
    pub fn snapshot(&self) -> HashMap<String, Symbol> {
        self.symbols.clone()
    }

    /// Replaces the symbols declared directly in this scope with an earlier [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, symbols: HashMap<String, Symbol>) {
        self.symbols = symbols;
    }
}
