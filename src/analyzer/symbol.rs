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

//! Symbol definitions for the semantic analyzer.
//!
//! Everything nameable in a scenario is a [`Symbol`]: user variables,
//! packets, filters and lists, plus the reserved symbols the analyzer
//! synthesizes for literals, operators and keywords. Synthetic names carry
//! the [`RESERVED_PREFIX`], which no user identifier can start with.

use crate::ast::{Value, ValueType};

/// Prefix marking identifiers manufactured by the analyzer.
pub const RESERVED_PREFIX: &str = "__";

/// The kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Packet,
    Filter,
    List,
    Reserved,
}

impl SymbolKind {
    /// Get the name of this kind as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Packet => "packet",
            SymbolKind::Filter => "filter",
            SymbolKind::List => "list",
            SymbolKind::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed variable.
///
/// The value is absent while the type is [`ValueType::Unset`]. A typed
/// variable may still lack a value when its type was fixed by an
/// assignment rather than by its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    identifier: String,
    value_type: ValueType,
    value: Option<Value>,
}

impl Variable {
    /// Create a variable, checking that the type agrees with the value.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is empty, if a value is given for an
    /// `Unset` variable, or if the value has a different type.
    pub fn new(identifier: impl Into<String>, value_type: ValueType, value: Option<Value>) -> Self {
        let identifier = identifier.into();
        assert!(!identifier.is_empty(), "symbol identifier must not be empty");
        if let Some(value) = &value {
            assert_eq!(
                value.value_type(),
                value_type,
                "value of '{}' does not match its type",
                identifier
            );
        }
        Self {
            identifier,
            value_type,
            value,
        }
    }

    /// Create a declared variable whose type is not fixed yet.
    pub fn declared(identifier: impl Into<String>) -> Self {
        Self::new(identifier, ValueType::Unset, None)
    }

    /// Create a variable defined with a value.
    pub fn with_value(identifier: impl Into<String>, value: Value) -> Self {
        Self::new(identifier, value.value_type(), Some(value))
    }

    /// Create the synthetic variable standing for a literal.
    pub fn literal(value: Value) -> Self {
        Self::with_value(literal_identifier(&value), value)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Check if the type of this variable has been fixed.
    pub fn is_initialized(&self) -> bool {
        self.value_type.is_set()
    }

    /// Fix the type of a variable that is still `Unset`.
    ///
    /// # Panics
    ///
    /// Panics if the type is already fixed or if `value_type` is `Unset`.
    pub fn fix_type(&mut self, value_type: ValueType) {
        assert!(
            !self.is_initialized(),
            "type of '{}' is already fixed",
            self.identifier
        );
        assert!(value_type.is_set(), "cannot fix a type to unset");
        self.value_type = value_type;
    }
}

/// An opaque packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub identifier: String,
}

impl Packet {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        assert!(!identifier.is_empty(), "symbol identifier must not be empty");
        Self { identifier }
    }
}

/// A boolean packet filter, flattened to postfix order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub identifier: String,
    pub items: Vec<String>,
}

impl Filter {
    pub fn new(identifier: impl Into<String>, items: Vec<String>) -> Self {
        let identifier = identifier.into();
        assert!(!identifier.is_empty(), "symbol identifier must not be empty");
        Self { identifier, items }
    }
}

/// An ordered list of references to other symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub identifier: String,
    pub items: Vec<String>,
}

impl List {
    pub fn new(identifier: impl Into<String>, items: Vec<String>) -> Self {
        let identifier = identifier.into();
        assert!(!identifier.is_empty(), "symbol identifier must not be empty");
        Self { identifier, items }
    }

    /// Create the synthetic list standing for a list literal.
    pub fn literal(items: Vec<String>) -> Self {
        Self::new(list_identifier(&items), items)
    }
}

/// A synthetic symbol naming a keyword or operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reserved {
    pub identifier: String,
    pub keyword: String,
}

impl Reserved {
    pub fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        assert!(!keyword.is_empty(), "reserved keyword must not be empty");
        Self {
            identifier: reserved_identifier(&keyword),
            keyword,
        }
    }
}

/// Symbol table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Variable),
    Packet(Packet),
    Filter(Filter),
    List(List),
    Reserved(Reserved),
}

impl Symbol {
    /// Create the placeholder a declaration inserts.
    ///
    /// Only variables and packets can exist without contents; the other
    /// kinds return `None`.
    pub fn placeholder(identifier: &str, kind: SymbolKind) -> Option<Symbol> {
        match kind {
            SymbolKind::Variable => Some(Symbol::Variable(Variable::declared(identifier))),
            SymbolKind::Packet => Some(Symbol::Packet(Packet::new(identifier))),
            SymbolKind::Filter | SymbolKind::List | SymbolKind::Reserved => None,
        }
    }

    /// Get the identifier of this symbol.
    pub fn identifier(&self) -> &str {
        match self {
            Symbol::Variable(variable) => variable.identifier(),
            Symbol::Packet(packet) => &packet.identifier,
            Symbol::Filter(filter) => &filter.identifier,
            Symbol::List(list) => &list.identifier,
            Symbol::Reserved(reserved) => &reserved.identifier,
        }
    }

    /// Get the kind of this symbol.
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Variable(_) => SymbolKind::Variable,
            Symbol::Packet(_) => SymbolKind::Packet,
            Symbol::Filter(_) => SymbolKind::Filter,
            Symbol::List(_) => SymbolKind::List,
            Symbol::Reserved(_) => SymbolKind::Reserved,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Symbol::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            Symbol::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Symbol::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if the analyzer manufactured this symbol.
    pub fn is_synthetic(&self) -> bool {
        self.identifier().starts_with(RESERVED_PREFIX)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Variable(variable) => {
                write!(f, "variable {}: {}", variable.identifier, variable.value_type)?;
                if let Some(value) = &variable.value {
                    write!(f, " = {}", value)?;
                }
                Ok(())
            }
            Symbol::Packet(packet) => write!(f, "packet {}", packet.identifier),
            Symbol::Filter(filter) => {
                write!(f, "filter {} = [{}]", filter.identifier, filter.items.join(", "))
            }
            Symbol::List(list) => {
                write!(f, "list {} = [{}]", list.identifier, list.items.join(", "))
            }
            Symbol::Reserved(reserved) => {
                write!(f, "reserved {} ({})", reserved.identifier, reserved.keyword)
            }
        }
    }
}

/// Map a literal value to its synthetic identifier.
pub fn literal_identifier(value: &Value) -> String {
    format!("{}{}", RESERVED_PREFIX, value.canonical_text())
}

/// Map a keyword or operator to its synthetic identifier.
pub fn reserved_identifier(keyword: &str) -> String {
    format!("{}{}", RESERVED_PREFIX, keyword)
}

/// Map the members of a list literal to its synthetic identifier.
pub fn list_identifier(items: &[String]) -> String {
    format!("{}[{}]", RESERVED_PREFIX, items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_identifiers() {
        assert_eq!(literal_identifier(&Value::Integer(5)), "__5");
        assert_eq!(literal_identifier(&Value::Integer(-1)), "__-1");
        assert_eq!(literal_identifier(&Value::Real(5.0)), "__5.0");
        assert_eq!(
            literal_identifier(&Value::String("eth0".to_string())),
            "__\"eth0\""
        );
    }

    #[test]
    fn test_literal_identifier_is_deterministic() {
        let a = Variable::literal(Value::Real(2.5));
        let b = Variable::literal(Value::Real(2.5));
        assert_eq!(a.identifier(), b.identifier());
        assert_eq!(a, b);
    }

    #[test]
    fn test_list_identifier() {
        let items = vec!["__1".to_string(), "x".to_string()];
        assert_eq!(list_identifier(&items), "__[__1,x]");
        assert_eq!(List::literal(items.clone()).identifier, "__[__1,x]");
        assert_ne!(
            list_identifier(&["ab1".to_string()]),
            list_identifier(&["a".to_string(), "b1".to_string()])
        );
    }

    #[test]
    fn test_reserved_identifier() {
        let plus = Reserved::new("+");
        assert_eq!(plus.identifier, "__+");
        assert_eq!(plus.keyword, "+");

        let symbol = Symbol::Reserved(plus);
        assert_eq!(symbol.kind(), SymbolKind::Reserved);
        assert_eq!(symbol.identifier(), "__+");
        assert!(symbol.is_synthetic());
    }

    #[test]
    fn test_placeholders() {
        let variable = Symbol::placeholder("x", SymbolKind::Variable).unwrap();
        assert_eq!(variable.kind(), SymbolKind::Variable);
        assert_eq!(
            variable.as_variable().unwrap().value_type(),
            ValueType::Unset
        );
        assert_eq!(
            Symbol::placeholder("p", SymbolKind::Packet).unwrap().kind(),
            SymbolKind::Packet
        );
        assert!(Symbol::placeholder("f", SymbolKind::Filter).is_none());
        assert!(Symbol::placeholder("l", SymbolKind::List).is_none());
        assert!(Symbol::placeholder("r", SymbolKind::Reserved).is_none());
    }

    #[test]
    fn test_fix_type() {
        let mut variable = Variable::declared("x");
        assert!(!variable.is_initialized());
        variable.fix_type(ValueType::Integer);
        assert_eq!(variable.value_type(), ValueType::Integer);
        assert!(variable.value().is_none());
    }

    #[test]
    #[should_panic(expected = "already fixed")]
    fn test_fix_type_twice_panics() {
        let mut variable = Variable::with_value("x", Value::Integer(1));
        variable.fix_type(ValueType::Real);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_inconsistent_variable_panics() {
        Variable::new("x", ValueType::String, Some(Value::Integer(1)));
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_identifier_panics() {
        Packet::new("");
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::Variable(Variable::with_value("x", Value::Integer(1)));
        assert_eq!(symbol.to_string(), "variable x: integer = 1");
        let symbol = Symbol::Reserved(Reserved::new("s"));
        assert_eq!(symbol.to_string(), "reserved __s (s)");
        assert!(symbol.is_synthetic());
    }
}
