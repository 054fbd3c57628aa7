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

//! Declaration parsing for the parser.
//!
//! This module provides declaration parsing functionality:
//! - `variable`, `packet`, `filter` and `list` declarations
//! - Literals with an optional leading minus
//! - List literals

use super::filters::FilterParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::analyzer::{FilterBuilder, Operand, ScenarioBuilder};
use crate::ast::Value;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;

/// Extension trait for declaration parsing.
pub trait DeclarationParser {
    /// Parse a declaration in the current block.
    fn parse_declaration(&mut self) -> Result<(), CompileError>;

    /// Parse a numeric or string literal.
    fn parse_literal(&mut self) -> Result<(Value, Span), CompileError>;

    /// Parse a numeric literal with an optional leading minus.
    fn parse_signed_number(&mut self) -> Result<(Value, Span), CompileError>;

    /// Parse `[item, ...]` and register every member.
    fn parse_list_items(&mut self) -> Result<Vec<String>, CompileError>;
}

impl<'a> DeclarationParser for Parser<'a> {
    fn parse_declaration(&mut self) -> Result<(), CompileError> {
        match self.advance() {
            Some((Token::Variable, _)) => {
                let (name, span) = self.expect_identifier("a variable name")?;
                if self.match_token(&Token::Equal) {
                    let (value, _) = self.parse_literal()?;
                    self.context.define_variable(&name, value, &span)
                } else {
                    self.context.declare_variable(&name, &span)
                }
            }
            Some((Token::Packet, _)) => {
                let (name, span) = self.expect_identifier("a packet name")?;
                self.context.declare_packet(&name, &span)
            }
            Some((Token::Filter, _)) => {
                let (name, span) = self.expect_identifier("a filter name")?;
                self.expect(&Token::Equal, "Expected '=' after the filter name")?;
                let condition = self.parse_filter()?;
                self.context.define_filter(&name, condition, &span)
            }
            Some((Token::List, _)) => {
                let (name, span) = self.expect_identifier("a list name")?;
                self.expect(&Token::Equal, "Expected '=' after the list name")?;
                let items = self.parse_list_items()?;
                self.context.define_list(&name, items, &span)
            }
            _ => Err(CompileError::new(
                ErrorCode::UnexpectedToken,
                "Expected 'variable', 'packet', 'filter' or 'list'",
                self.previous_span(),
            )),
        }
    }

    fn parse_literal(&mut self) -> Result<(Value, Span), CompileError> {
        if let Some(Token::String(text)) = self.peek() {
            let value = Value::String(text.clone());
            let span = self.peek_span().unwrap_or_default();
            self.advance();
            return Ok((value, span));
        }
        self.parse_signed_number()
    }

    fn parse_signed_number(&mut self) -> Result<(Value, Span), CompileError> {
        let sign = if self.check(&Token::Minus) {
            self.advance().map(|(_, span)| span)
        } else {
            None
        };

        let (value, span) = match self.peek() {
            Some(Token::Integer(n)) => (Value::Integer(*n), self.peek_span().unwrap_or_default()),
            Some(Token::Real(r)) => (Value::Real(*r), self.peek_span().unwrap_or_default()),
            _ => {
                let mut error = self.unexpected("Expected a number");
                if error.code == ErrorCode::UnexpectedToken {
                    error.code = ErrorCode::ExpectedLiteral;
                }
                return Err(error);
            }
        };
        self.advance();

        match sign {
            Some(minus) => Ok((value.negated(), minus.merge(&span))),
            None => Ok((value, span)),
        }
    }

    fn parse_list_items(&mut self) -> Result<Vec<String>, CompileError> {
        self.expect(&Token::LeftBracket, "Expected '['")?;
        let mut items = Vec::new();
        loop {
            let item = match self.peek() {
                Some(Token::Identifier(_)) => {
                    let (name, span) = self.expect_identifier("a list member")?;
                    self.context.list_item(Operand::Identifier(name), &span)?
                }
                _ => {
                    let (value, span) = self.parse_literal()?;
                    self.context.list_item(Operand::Literal(value), &span)?
                }
            };
            items.push(item);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightBracket, "Expected ']' after the list members")?;
        Ok(items)
    }
}
