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

//! Filter parsing for the parser.
//!
//! `or` binds weaker than `and`, which binds weaker than a comparison.
//! Parentheses group sub-filters.

use super::declarations::DeclarationParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::analyzer::{
    ComparisonOperator, Condition, ExpressionBuilder, FilterBuilder, LogicalOperator, Postfix,
};
use crate::error::CompileError;
use crate::lexer::Token;

/// Extension trait for filter parsing.
pub trait FilterParser {
    /// Parse a filter.
    fn parse_filter(&mut self) -> Result<Condition, CompileError>;

    /// Parse an `and` chain.
    fn parse_conjunction(&mut self) -> Result<Condition, CompileError>;

    /// Parse a comparison or a parenthesized filter.
    fn parse_comparison(&mut self) -> Result<Condition, CompileError>;

    /// Parse a comparison operand.
    fn parse_filter_operand(&mut self) -> Result<Postfix, CompileError>;
}

fn comparison_operator(token: &Token) -> Option<ComparisonOperator> {
    match token {
        Token::EqualEqual => Some(ComparisonOperator::Equal),
        Token::BangEqual => Some(ComparisonOperator::NotEqual),
        Token::Less => Some(ComparisonOperator::Less),
        Token::LessEqual => Some(ComparisonOperator::LessEqual),
        Token::Greater => Some(ComparisonOperator::Greater),
        Token::GreaterEqual => Some(ComparisonOperator::GreaterEqual),
        _ => None,
    }
}

impl<'a> FilterParser for Parser<'a> {
    fn parse_filter(&mut self) -> Result<Condition, CompileError> {
        let mut lhs = self.parse_conjunction()?;
        while self.match_token(&Token::Or) {
            let rhs = self.parse_conjunction()?;
            lhs = self.context.connective(lhs, LogicalOperator::Or, rhs);
        }
        Ok(lhs)
    }

    fn parse_conjunction(&mut self) -> Result<Condition, CompileError> {
        let mut lhs = self.parse_comparison()?;
        while self.match_token(&Token::And) {
            let rhs = self.parse_comparison()?;
            lhs = self.context.connective(lhs, LogicalOperator::And, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Condition, CompileError> {
        if self.match_token(&Token::LeftParen) {
            return self.nested(|parser| {
                let inner = parser.parse_filter()?;
                parser.expect(&Token::RightParen, "Expected ')' after filter")?;
                Ok(inner)
            });
        }

        let lhs = self.parse_filter_operand()?;
        let op = match self.peek().and_then(comparison_operator) {
            Some(op) => op,
            None => return Err(self.unexpected("Expected a comparison operator")),
        };
        let span = self.peek_span().unwrap_or_default();
        self.advance();
        let rhs = self.parse_filter_operand()?;
        self.context.comparison(lhs, op, rhs, &span)
    }

    fn parse_filter_operand(&mut self) -> Result<Postfix, CompileError> {
        if matches!(self.peek(), Some(Token::Identifier(_))) {
            let (name, span) = self.expect_identifier("an operand")?;
            return self.context.variable_operand(&name, &span);
        }
        let (value, _) = self.parse_literal()?;
        Ok(self.context.literal_operand(value))
    }
}

#[cfg(test)]
mod tests {
    use crate::analyzer::Symbol;
    use crate::error::ErrorCode;
    use crate::lexer::tokenize;
    use crate::parser::{parse, MAX_NESTING_DEPTH};
    use pretty_assertions::assert_eq;

    fn filter_items(filter: &str) -> Result<Vec<String>, ErrorCode> {
        let source = format!(
            "scenario {{ variable port = 80 variable proto = \"tcp\" filter f = {} }}",
            filter
        );
        let scenario = parse(&tokenize(&source).map_err(|e| e.code)?).map_err(|e| e.code)?;
        Ok(scenario
            .symbols
            .lookup("f")
            .and_then(Symbol::as_filter)
            .map(|f| f.items.clone())
            .unwrap())
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            filter_items("port == 80 or port == 443 and proto != \"udp\"").unwrap(),
            vec![
                "port", "__80", "__==", "port", "__443", "__==", "proto", "__\"udp\"", "__!=",
                "__and", "__or"
            ]
        );
    }

    #[test]
    fn test_parentheses_group() {
        assert_eq!(
            filter_items("(port < 1 or port > -1) and port >= 0").unwrap(),
            vec![
                "port", "__1", "__<", "port", "__-1", "__>", "__or", "port", "__0", "__>=",
                "__and"
            ]
        );
    }

    #[test]
    fn test_filter_errors() {
        assert_eq!(filter_items("port == \"80\""), Err(ErrorCode::TypeMismatch));
        assert_eq!(filter_items("port"), Err(ErrorCode::UnexpectedToken));
        assert_eq!(filter_items("ghost == 1"), Err(ErrorCode::UndefinedIdentifier));
    }

    #[test]
    fn test_nesting_limit() {
        let grouped = |depth: usize| {
            format!("{}port == 80{}", "(".repeat(depth), ")".repeat(depth))
        };
        assert_eq!(
            filter_items(&grouped(MAX_NESTING_DEPTH)).unwrap(),
            vec!["port", "__80", "__=="]
        );
        assert_eq!(
            filter_items(&grouped(MAX_NESTING_DEPTH + 1)),
            Err(ErrorCode::NestingTooDeep)
        );
        assert_eq!(filter_items(&"(".repeat(500)), Err(ErrorCode::NestingTooDeep));
    }
}
