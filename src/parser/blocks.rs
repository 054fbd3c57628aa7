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

//! Block parsing for the parser.
//!
//! This module provides block parsing functionality:
//! - The `scenario` root block
//! - `from` compound blocks
//! - `once`, `every` and conditional attack blocks
//! - Start times, periods and time units

use super::declarations::DeclarationParser;
use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::primitives::PrimitiveParser;
use super::Parser;
use crate::analyzer::{BlockKind, ScenarioBuilder, TimeValue};
use crate::ast::{Scenario, TimeUnit};
use crate::error::{CompileError, Span};
use crate::lexer::Token;

/// Extension trait for block parsing.
pub trait BlockParser {
    /// Parse the whole `scenario` block and finish the tree.
    fn parse_scenario(&mut self) -> Result<Scenario, CompileError>;

    /// Parse a `from` block.
    fn parse_compound(&mut self) -> Result<(), CompileError>;

    /// Parse a `once` block.
    fn parse_once(&mut self) -> Result<(), CompileError>;

    /// Parse an `every` block.
    fn parse_periodic(&mut self) -> Result<(), CompileError>;

    /// Parse a `for nodes in ... { for packets matching ... { } }` block.
    fn parse_conditional(&mut self) -> Result<(), CompileError>;

    /// Parse the statements of an attack block up to its closing brace.
    fn parse_attack_body(&mut self) -> Result<(), CompileError>;

    /// Parse a start time or period.
    fn parse_time(&mut self) -> Result<(TimeValue, Span), CompileError>;

    /// Parse a time unit keyword.
    fn parse_time_unit(&mut self) -> Result<TimeUnit, CompileError>;
}

impl<'a> BlockParser for Parser<'a> {
    fn parse_scenario(&mut self) -> Result<Scenario, CompileError> {
        self.expect(&Token::Scenario, "Expected 'scenario'")?;
        self.expect(&Token::LeftBrace, "Expected '{' after 'scenario'")?;
        self.context.enter(BlockKind::Scenario);

        loop {
            match self.peek() {
                Some(Token::RightBrace) => break,
                Some(Token::From) => self.parse_compound()?,
                Some(t) if t.is_declaration() => self.parse_declaration()?,
                _ => return Err(self.unexpected("Expected a declaration or a 'from' block")),
            }
        }
        self.expect(&Token::RightBrace, "Expected '}'")?;

        if !self.is_at_end() {
            return Err(self.unexpected("Expected end of file after the scenario"));
        }
        Ok(self.context.close_scenario())
    }

    fn parse_compound(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::From, "Expected 'from'")?;
        let (start_time, span) = self.parse_time()?;
        let unit = self.parse_time_unit()?;
        self.expect(&Token::LeftBrace, "Expected '{' after the start time")?;
        self.context.enter(BlockKind::Compound);

        loop {
            match self.peek() {
                Some(Token::RightBrace) => break,
                Some(Token::Once) => self.parse_once()?,
                Some(Token::Every) => self.parse_periodic()?,
                Some(Token::For) => self.parse_conditional()?,
                Some(t) if t.is_declaration() => self.parse_declaration()?,
                _ => {
                    return Err(self.unexpected(
                        "Expected a declaration or a 'once', 'every' or 'for' block",
                    ))
                }
            }
        }
        self.expect(&Token::RightBrace, "Expected '}'")?;

        self.context.close_compound(start_time, unit, &span)
    }

    fn parse_once(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Once, "Expected 'once'")?;
        self.expect(&Token::LeftBrace, "Expected '{' after 'once'")?;
        self.context.enter(BlockKind::Once);
        self.parse_attack_body()?;
        self.context.close_once();
        Ok(())
    }

    fn parse_periodic(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Every, "Expected 'every'")?;
        let (period, span) = self.parse_time()?;
        let unit = self.parse_time_unit()?;
        self.expect(&Token::LeftBrace, "Expected '{' after the period")?;
        self.context.enter(BlockKind::Periodic);
        self.parse_attack_body()?;
        self.context.close_periodic(period, unit, &span)
    }

    fn parse_conditional(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::For, "Expected 'for'")?;
        self.expect(&Token::Nodes, "Expected 'nodes' after 'for'")?;
        self.expect(&Token::In, "Expected 'in' after 'for nodes'")?;
        let (nodes, nodes_span) = self.expect_identifier("a list of nodes")?;
        self.expect(&Token::LeftBrace, "Expected '{' after the list of nodes")?;

        self.expect(&Token::For, "Expected 'for packets matching'")?;
        self.expect(&Token::Packets, "Expected 'packets' after 'for'")?;
        self.expect(&Token::Matching, "Expected 'matching' after 'for packets'")?;
        let (filter, filter_span) = self.expect_identifier("a filter")?;
        self.expect(&Token::LeftBrace, "Expected '{' after the filter")?;

        self.context.enter(BlockKind::Conditional);
        self.parse_attack_body()?;
        self.context
            .close_conditional(&nodes, &nodes_span, &filter, &filter_span)?;
        self.expect(&Token::RightBrace, "Expected '}'")?;
        Ok(())
    }

    fn parse_attack_body(&mut self) -> Result<(), CompileError> {
        loop {
            match self.peek() {
                Some(Token::RightBrace) => break,
                Some(Token::Identifier(_)) => self.parse_assignment()?,
                Some(t) if t.is_declaration() => self.parse_declaration()?,
                Some(t) if t.is_primitive() => self.parse_primitive()?,
                _ => {
                    return Err(self.unexpected(
                        "Expected a declaration, a primitive or an assignment",
                    ))
                }
            }
        }
        self.expect(&Token::RightBrace, "Expected '}'")?;
        Ok(())
    }

    fn parse_time(&mut self) -> Result<(TimeValue, Span), CompileError> {
        if matches!(self.peek(), Some(Token::Identifier(_))) {
            let (name, span) = self.expect_identifier("a time")?;
            return Ok((TimeValue::Variable(name), span));
        }
        let (value, span) = self.parse_signed_number()?;
        Ok((TimeValue::Literal(value), span))
    }

    fn parse_time_unit(&mut self) -> Result<TimeUnit, CompileError> {
        let unit = match self.peek() {
            Some(Token::Microseconds) => TimeUnit::Microseconds,
            Some(Token::Milliseconds) => TimeUnit::Milliseconds,
            Some(Token::Seconds) => TimeUnit::Seconds,
            _ => return Err(self.unexpected("Expected a time unit ('us', 'ms' or 's')")),
        };
        self.advance();
        Ok(unit)
    }
}
