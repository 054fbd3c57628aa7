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

//! Identifier resolution.
//!
//! Every reference in a statement must name a symbol visible from the
//! block being built, and usually a symbol of one particular kind.

use super::symbol::{Symbol, SymbolKind, Variable};
use super::AnalyzerContext;
use crate::error::{CompileError, ErrorCode, Result, Span};

/// Extension trait for resolving identifiers against the visible scopes.
pub trait SymbolResolver {
    /// Resolve an identifier visible from the current block.
    fn resolve_symbol(&self, identifier: &str, span: &Span) -> Result<&Symbol>;

    /// Resolve an identifier visible from depth `max_depth`.
    fn resolve_symbol_in(&self, max_depth: usize, identifier: &str, span: &Span)
        -> Result<&Symbol>;

    /// Resolve an identifier of a given kind visible from depth `max_depth`.
    fn resolve_kind_in(
        &self,
        max_depth: usize,
        identifier: &str,
        kind: SymbolKind,
        span: &Span,
    ) -> Result<&Symbol>;

    /// Resolve a variable visible from the current block.
    fn resolve_variable(&self, identifier: &str, span: &Span) -> Result<&Variable>;

    /// Resolve a variable whose type has been fixed.
    fn resolve_initialized(&self, identifier: &str, span: &Span) -> Result<&Variable>;

    /// Resolve a packet visible from the current block.
    fn resolve_packet(&self, identifier: &str, span: &Span) -> Result<String>;
}

impl SymbolResolver for AnalyzerContext {
    fn resolve_symbol(&self, identifier: &str, span: &Span) -> Result<&Symbol> {
        self.lookup(identifier)
            .ok_or_else(|| undefined(identifier, span))
    }

    fn resolve_symbol_in(
        &self,
        max_depth: usize,
        identifier: &str,
        span: &Span,
    ) -> Result<&Symbol> {
        self.lookup_in(max_depth, identifier)
            .ok_or_else(|| undefined(identifier, span))
    }

    fn resolve_kind_in(
        &self,
        max_depth: usize,
        identifier: &str,
        kind: SymbolKind,
        span: &Span,
    ) -> Result<&Symbol> {
        let symbol = self.resolve_symbol_in(max_depth, identifier, span)?;
        check_kind(symbol, kind, span)?;
        Ok(symbol)
    }

    fn resolve_variable(&self, identifier: &str, span: &Span) -> Result<&Variable> {
        let symbol = self.resolve_symbol(identifier, span)?;
        symbol
            .as_variable()
            .ok_or_else(|| wrong_kind(symbol, SymbolKind::Variable, span))
    }

    fn resolve_initialized(&self, identifier: &str, span: &Span) -> Result<&Variable> {
        let variable = self.resolve_variable(identifier, span)?;
        if !variable.is_initialized() {
            return Err(CompileError::new(
                ErrorCode::VariableUsedBeforeInit,
                format!("Variable '{}' is used before it is assigned", identifier),
                span.clone(),
            )
            .with_hint(format!(
                "Assign a value first, for example '{} = 0'",
                identifier
            )));
        }
        Ok(variable)
    }

    fn resolve_packet(&self, identifier: &str, span: &Span) -> Result<String> {
        let symbol = self.resolve_symbol(identifier, span)?;
        check_kind(symbol, SymbolKind::Packet, span)?;
        Ok(symbol.identifier().to_string())
    }
}

fn undefined(identifier: &str, span: &Span) -> CompileError {
    CompileError::new(
        ErrorCode::UndefinedIdentifier,
        format!("Undefined identifier '{}'", identifier),
        span.clone(),
    )
}

fn wrong_kind(symbol: &Symbol, expected: SymbolKind, span: &Span) -> CompileError {
    CompileError::new(
        ErrorCode::WrongSymbolKind,
        format!(
            "'{}' is a {}, expected a {}",
            symbol.identifier(),
            symbol.kind(),
            expected
        ),
        span.clone(),
    )
}

fn check_kind(symbol: &Symbol, expected: SymbolKind, span: &Span) -> Result<()> {
    if symbol.kind() == expected {
        Ok(())
    } else {
        Err(wrong_kind(symbol, expected, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::BlockKind;

    fn context() -> AnalyzerContext {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Scenario);
        context.scopes_mut().declare(0, "x", SymbolKind::Variable);
        context.scopes_mut().declare(0, "p", SymbolKind::Packet);
        context.enter(BlockKind::Compound);
        context
    }

    #[test]
    fn test_resolve_outer_symbol() {
        let context = context();
        let symbol = context.resolve_symbol("x", &Span::default()).unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Variable);
        assert_eq!(context.resolve_packet("p", &Span::default()).unwrap(), "p");
    }

    #[test]
    fn test_undefined_identifier() {
        let context = context();
        let err = context.resolve_symbol("nope", &Span::new(3, 7)).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedIdentifier);
        assert_eq!(err.span, Span::new(3, 7));
    }

    #[test]
    fn test_wrong_kind() {
        let context = context();
        let err = context.resolve_packet("x", &Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::WrongSymbolKind);
        assert!(err.message.contains("is a variable, expected a packet"));
    }

    #[test]
    fn test_uninitialized_variable() {
        let context = context();
        assert!(context.resolve_variable("x", &Span::default()).is_ok());
        let err = context.resolve_initialized("x", &Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::VariableUsedBeforeInit);
    }

    #[test]
    fn test_resolve_kind_in_limits_depth() {
        let mut context = context();
        context.scopes_mut().declare(1, "q", SymbolKind::Packet);
        assert!(context
            .resolve_kind_in(1, "q", SymbolKind::Packet, &Span::default())
            .is_ok());
        let err = context
            .resolve_kind_in(0, "q", SymbolKind::Packet, &Span::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedIdentifier);
    }
}
