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

//! Scope management for the semantic analyzer.
//!
//! AML nests blocks exactly three levels deep. The [`ScopeHandler`] owns
//! one [`SymbolTable`] per level for the whole parse; a name is visible at
//! depth `d` when it lives in any table from depth 0 through `d`.

use super::symbol::{Symbol, SymbolKind, Variable};
use super::symbol_table::SymbolTable;

/// Number of nesting levels in a scenario.
pub const SCOPES: usize = 3;

/// A nesting level of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// The `scenario` block.
    Scenario,
    /// A `from` block.
    Compound,
    /// A `once`, `every` or conditional block.
    Attack,
}

impl Scope {
    /// All scopes from the outermost inwards.
    pub const ALL: [Scope; SCOPES] = [Scope::Scenario, Scope::Compound, Scope::Attack];

    /// Get the depth of this scope.
    pub fn depth(&self) -> usize {
        match self {
            Scope::Scenario => 0,
            Scope::Compound => 1,
            Scope::Attack => 2,
        }
    }

    /// Get the scope at a depth.
    pub fn from_depth(depth: usize) -> Option<Scope> {
        Self::ALL.get(depth).copied()
    }

    /// Get the enclosing scope.
    pub fn parent(&self) -> Option<Scope> {
        match self {
            Scope::Scenario => None,
            Scope::Compound => Some(Scope::Scenario),
            Scope::Attack => Some(Scope::Compound),
        }
    }
}

/// One symbol table per nesting depth.
#[derive(Debug, Clone)]
pub struct ScopeHandler {
    tables: Vec<SymbolTable>,
}

impl ScopeHandler {
    /// Create a handler with a fixed number of depths.
    ///
    /// # Panics
    ///
    /// Panics if `scopes` is zero.
    pub fn new(scopes: usize) -> Self {
        assert!(scopes > 0, "a scope handler needs at least one scope");
        Self {
            tables: vec![SymbolTable::new(); scopes],
        }
    }

    /// Get the number of depths.
    pub fn scope_count(&self) -> usize {
        self.tables.len()
    }

    /// Declare a symbol without contents at a depth.
    ///
    /// Fails if the depth is invalid, if the identifier is visible
    /// anywhere from depth 0 through `depth`, or if the table rejects it.
    pub fn declare(&mut self, depth: usize, identifier: &str, kind: SymbolKind) -> bool {
        if depth >= self.tables.len() || self.exists_in_range(depth, identifier) {
            return false;
        }
        self.tables[depth].declare(identifier, kind)
    }

    /// Define a fully formed symbol at a depth.
    ///
    /// Only the table at `depth` is checked for collisions.
    pub fn define(&mut self, depth: usize, symbol: Symbol) -> bool {
        match self.tables.get_mut(depth) {
            Some(table) => table.define(symbol),
            None => false,
        }
    }

    /// Check if an identifier lives in any table from depth 0 through `max_depth`.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` is not a valid depth.
    pub fn exists_in_range(&self, max_depth: usize, identifier: &str) -> bool {
        self.check_depth(max_depth);
        self.tables[..=max_depth]
            .iter()
            .any(|table| table.contains(identifier))
    }

    /// Find a symbol, scanning all depths from the outermost inwards.
    pub fn object(&self, identifier: &str) -> Option<&Symbol> {
        self.tables.iter().find_map(|table| table.lookup(identifier))
    }

    /// Find a variable for modification, scanning all depths from the outermost inwards.
    pub fn variable_mut(&mut self, identifier: &str) -> Option<&mut Variable> {
        self.tables
            .iter_mut()
            .find(|table| table.contains(identifier))
            .and_then(|table| table.variable_mut(identifier))
    }

    /// Get the table at a depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not a valid depth.
    pub fn table(&self, depth: usize) -> &SymbolTable {
        self.check_depth(depth);
        &self.tables[depth]
    }

    /// Empty the table at a depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not a valid depth.
    pub fn clear(&mut self, depth: usize) {
        self.check_depth(depth);
        self.tables[depth].clear();
    }

    /// Empty every table.
    pub fn dump(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }

    /// Check if every table is empty.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(SymbolTable::is_empty)
    }

    fn check_depth(&self, depth: usize) {
        assert!(
            depth < self.tables.len(),
            "scope depth {} out of range 0..{}",
            depth,
            self.tables.len()
        );
    }
}

impl Default for ScopeHandler {
    fn default() -> Self {
        Self::new(SCOPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::symbol::Packet;
    use crate::ast::{Value, ValueType};

    #[test]
    fn test_scope_depths() {
        assert_eq!(Scope::Scenario.depth(), 0);
        assert_eq!(Scope::Attack.depth(), 2);
        assert_eq!(Scope::from_depth(1), Some(Scope::Compound));
        assert_eq!(Scope::from_depth(3), None);
        assert_eq!(Scope::Attack.parent(), Some(Scope::Compound));
        assert_eq!(Scope::Scenario.parent(), None);
    }

    #[test]
    fn test_declare_visible_in_range() {
        let mut handler = ScopeHandler::default();
        assert!(handler.declare(1, "x", SymbolKind::Variable));
        assert!(handler.exists_in_range(1, "x"));
        assert!(handler.exists_in_range(2, "x"));
        assert!(!handler.exists_in_range(0, "x"));
    }

    #[test]
    fn test_declare_collides_with_outer_scope() {
        let mut handler = ScopeHandler::default();
        assert!(handler.declare(0, "x", SymbolKind::Variable));
        assert!(!handler.declare(1, "x", SymbolKind::Variable));
        assert!(!handler.declare(2, "x", SymbolKind::Packet));
        assert!(handler.table(1).is_empty());
        assert!(handler.table(2).is_empty());
    }

    #[test]
    fn test_outer_declaration_after_inner_succeeds() {
        let mut handler = ScopeHandler::default();
        assert!(handler.declare(2, "x", SymbolKind::Variable));
        assert!(handler.declare(0, "x", SymbolKind::Variable));
    }

    #[test]
    fn test_invalid_depth_fails() {
        let mut handler = ScopeHandler::default();
        assert!(!handler.declare(3, "x", SymbolKind::Variable));
        assert!(!handler.define(5, Symbol::Packet(Packet::new("p"))));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_exists_in_range_invalid_depth_panics() {
        ScopeHandler::default().exists_in_range(3, "x");
    }

    #[test]
    fn test_object_returns_first_match() {
        let mut handler = ScopeHandler::default();
        handler.define(0, Symbol::Variable(Variable::with_value("v", Value::Integer(1))));
        handler.define(2, Symbol::Variable(Variable::with_value("v", Value::Integer(2))));
        let found = handler.object("v").unwrap().as_variable().unwrap();
        assert_eq!(found.value(), Some(&Value::Integer(1)));
        assert!(handler.object("missing").is_none());
    }

    #[test]
    fn test_variable_mut_reaches_outer_scope() {
        let mut handler = ScopeHandler::default();
        handler.declare(0, "x", SymbolKind::Variable);
        handler.variable_mut("x").unwrap().fix_type(ValueType::String);
        let x = handler.object("x").unwrap().as_variable().unwrap();
        assert_eq!(x.value_type(), ValueType::String);
    }

    #[test]
    fn test_clear_and_dump() {
        let mut handler = ScopeHandler::default();
        handler.declare(0, "a", SymbolKind::Variable);
        handler.declare(2, "b", SymbolKind::Variable);
        handler.clear(2);
        assert!(!handler.exists_in_range(2, "b"));
        assert!(handler.exists_in_range(2, "a"));
        handler.dump();
        assert!(handler.is_empty());
        assert_eq!(handler.scope_count(), SCOPES);
    }
}
