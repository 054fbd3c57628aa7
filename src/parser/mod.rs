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

//! Parser module for AML.
//!
//! This module drives the semantic analyzer over a token stream. It uses
//! recursive descent; every grammar production calls the matching
//! [`AnalyzerContext`] operation as soon as it is recognized, so the
//! scenario tree is complete when the closing brace of `scenario` is read.
//!
//! # Module Structure
//!
//! - `blocks` - Scenario, compound and attack blocks (BlockParser trait)
//! - `declarations` - Declarations and literals (DeclarationParser trait)
//! - `expressions` - Assignments and arithmetic (ExpressionParser trait)
//! - `filters` - Packet filters (FilterParser trait)
//! - `helpers` - Token stream navigation and error handling (ParserHelpers trait)
//! - `primitives` - Primitive statements (PrimitiveParser trait)

// Submodules
pub mod blocks;
pub mod declarations;
pub mod expressions;
pub mod filters;
pub mod helpers;
pub mod primitives;

use blocks::BlockParser;

use crate::analyzer::AnalyzerContext;
use crate::ast::Scenario;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;
use helpers::ParserHelpers;

/// How many parenthesized or negated levels an expression or filter may nest.
pub const MAX_NESTING_DEPTH: usize = 128;

/// The parser state.
pub struct Parser<'a> {
    /// The token stream to parse.
    pub(crate) tokens: &'a [(Token, Span)],
    /// Current position in the token stream.
    pub(crate) position: usize,
    /// The analyzer state grammar actions write into.
    pub(crate) context: AnalyzerContext,
    /// Current expression/filter nesting level.
    pub(crate) nesting: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given token stream.
    pub fn new(tokens: &'a [(Token, Span)]) -> Self {
        Self {
            tokens,
            position: 0,
            context: AnalyzerContext::new(),
            nesting: 0,
        }
    }

    /// Run `f` one nesting level deeper, failing once the level passes
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(self.error(
                ErrorCode::NestingTooDeep,
                format!(
                    "Expression nested too deeply (more than {} levels)",
                    MAX_NESTING_DEPTH
                ),
            ));
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    /// Parse the complete scenario.
    pub fn parse(&mut self) -> Result<Scenario, CompileError> {
        self.parse_scenario()
    }
}

/// Parse a token stream into a scenario tree.
pub fn parse(tokens: &[(Token, Span)]) -> Result<Scenario, CompileError> {
    let mut parser = Parser::new(tokens);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Codeblock, Primitive};
    use crate::error::ErrorCode;
    use crate::lexer::tokenize;
    use helpers::ParserHelpers;
    use pretty_assertions::assert_eq;

    /// Helper to parse source code directly.
    fn parse_source(source: &str) -> Result<Scenario, CompileError> {
        let tokens = tokenize(source)?;
        parse(&tokens)
    }

    fn first_primitive(scenario: &Scenario) -> Primitive {
        let compound = scenario.compounds().next().unwrap();
        let attack = compound.children.get(0).unwrap();
        attack
            .children()
            .and_then(|children| children.get(0))
            .and_then(Codeblock::as_primitive)
            .cloned()
            .unwrap()
    }

    // ========================================
    // Parser Creation Tests
    // ========================================

    #[test]
    fn test_parser_creation() {
        let tokens = vec![];
        let parser = Parser::new(&tokens);
        assert!(parser.is_at_end());
        assert!(parser.context.current_block().is_none());
    }

    #[test]
    fn test_parser_advance() {
        let tokens = vec![
            (Token::Scenario, Span::new(0, 8)),
            (Token::LeftBrace, Span::new(9, 10)),
        ];
        let mut parser = Parser::new(&tokens);
        let first = parser.advance();
        assert!(matches!(first, Some((Token::Scenario, _))));
        assert_eq!(parser.peek(), Some(&Token::LeftBrace));
    }

    // ========================================
    // Scenario Parsing Tests
    // ========================================

    #[test]
    fn test_parse_empty_scenario() {
        let scenario = parse_source("scenario { }").unwrap();
        assert!(scenario.symbols.is_empty());
        assert!(scenario.children.is_empty());
    }

    #[test]
    fn test_parse_compound_with_once() {
        let scenario =
            parse_source("scenario { variable x = 1 from 5 s { once { x += 2 } } }").unwrap();
        assert_eq!(
            first_primitive(&scenario),
            Primitive::Expression {
                destination: "x".to_string(),
                tokens: vec!["x".to_string(), "__2".to_string(), "__+".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_precedence() {
        let scenario = parse_source(
            "scenario { variable x = 1 from 0 s { once { x = 1 + 2 * 3 ** 2 ** 2 } } }",
        )
        .unwrap();
        match first_primitive(&scenario) {
            Primitive::Expression { tokens, .. } => assert_eq!(
                tokens,
                vec!["__1", "__2", "__3", "__2", "__**", "__2", "__**", "__*", "__+"]
            ),
            other => panic!("expected an expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let scenario =
            parse_source("scenario { variable x = 1 from 0 s { once { x = (x - 1) * 2 } } }")
                .unwrap();
        match first_primitive(&scenario) {
            Primitive::Expression { tokens, .. } => {
                assert_eq!(tokens, vec!["x", "__1", "__-", "__2", "__*"])
            }
            other => panic!("expected an expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unary_minus() {
        let scenario =
            parse_source("scenario { variable x = 1.5 from 0 s { once { x = -x } } }").unwrap();
        match first_primitive(&scenario) {
            Primitive::Expression { tokens, .. } => {
                assert_eq!(tokens, vec!["x", "__-1.0", "__*"])
            }
            other => panic!("expected an expression, got {:?}", other),
        }
    }

    // ========================================
    // Error Tests
    // ========================================

    #[test]
    fn test_missing_scenario_keyword() {
        let err = parse_source("from 1 s { }").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_unexpected_end_of_file() {
        let err = parse_source("scenario { from 1 s {").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEndOfFile);
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_source("scenario { } scenario { }").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_missing_identifier() {
        let err = parse_source("scenario { variable 5 }").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExpectedIdentifier);
    }
}
