// AML - Scoped semantic analyzer for the Attack Modeling Language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Scope-local symbol table.
//!
//! One table holds the symbols declared or defined at a single nesting
//! depth. Tables are cleared between sibling blocks and reused, so a
//! finished block keeps a [`SymbolTable::snapshot`] rather than the table
//! itself.

use std::collections::HashMap;

use super::symbol::{Symbol, SymbolKind, Variable};

/// The symbols of one scope, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a symbol that has no contents yet.
    ///
    /// Returns `false` if the identifier is taken, or if the kind cannot
    /// exist without contents (filters, lists and reserved symbols).
    ///
    /// # Panics
    ///
    /// Panics if the identifier is empty.
    pub fn declare(&mut self, identifier: &str, kind: SymbolKind) -> bool {
        assert!(!identifier.is_empty(), "symbol identifier must not be empty");
        if self.contains(identifier) {
            return false;
        }
        match Symbol::placeholder(identifier, kind) {
            Some(symbol) => self.insert(symbol),
            None => false,
        }
    }

    /// Define a fully formed symbol.
    ///
    /// Returns `false` if the identifier is taken.
    pub fn define(&mut self, symbol: Symbol) -> bool {
        if self.contains(symbol.identifier()) {
            return false;
        }
        self.insert(symbol)
    }

    fn insert(&mut self, symbol: Symbol) -> bool {
        self.index
            .insert(symbol.identifier().to_string(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    /// Look up a symbol in this table.
    pub fn lookup(&self, identifier: &str) -> Option<&Symbol> {
        self.index.get(identifier).map(|&i| &self.symbols[i])
    }

    /// Look up a variable for modification.
    ///
    /// Only variables are handed out mutably, and only through an API that
    /// cannot change their identifier.
    pub fn variable_mut(&mut self, identifier: &str) -> Option<&mut Variable> {
        let i = *self.index.get(identifier)?;
        match &mut self.symbols[i] {
            Symbol::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Get the kind of a symbol in this table.
    pub fn kind_of(&self, identifier: &str) -> Option<SymbolKind> {
        self.lookup(identifier).map(Symbol::kind)
    }

    /// Check if an identifier is present in this table.
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Remove every symbol, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Iterate over the symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Take an independent copy of the current contents.
    pub fn snapshot(&self) -> SymbolTable {
        self.clone()
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
