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

//! Primitive statement parsing for the parser.
//!
//! Every primitive is written as a call, `name(argument, ...)`. Arguments
//! are registered with the analyzer while they are read and the primitive
//! is appended to the current attack block at the closing parenthesis.

use super::blocks::BlockParser;
use super::declarations::DeclarationParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::analyzer::{Operand, ScenarioBuilder, TimeValue};
use crate::ast::{Direction, Primitive};
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;

/// Extension trait for primitive parsing.
pub trait PrimitiveParser {
    /// Parse a primitive statement and append it to the current block.
    fn parse_primitive(&mut self) -> Result<(), CompileError>;

    /// Parse a value argument: a literal or a variable.
    fn parse_value_argument(&mut self) -> Result<String, CompileError>;

    /// Parse a packet argument: a packet or `captured`.
    fn parse_packet_argument(&mut self) -> Result<String, CompileError>;

    /// Parse a position: a list or a list literal.
    fn parse_position_argument(&mut self) -> Result<String, CompileError>;

    /// Parse a protocol argument.
    fn parse_protocol_argument(&mut self) -> Result<String, CompileError>;

    /// Parse a delay followed by its unit.
    fn parse_delay_arguments(&mut self) -> Result<(String, String), CompileError>;

    /// Parse `tx` or `rx`.
    fn parse_direction_argument(&mut self) -> Result<String, CompileError>;
}

impl<'a> Parser<'a> {
    fn comma(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Comma, "Expected ',' between arguments")?;
        Ok(())
    }

    fn operand(&mut self) -> Result<(Operand, Span), CompileError> {
        if matches!(self.peek(), Some(Token::Identifier(_))) {
            let (name, span) = self.expect_identifier("an argument")?;
            return Ok((Operand::Identifier(name), span));
        }
        let (value, span) = self.parse_literal()?;
        Ok((Operand::Literal(value), span))
    }
}

impl<'a> PrimitiveParser for Parser<'a> {
    fn parse_primitive(&mut self) -> Result<(), CompileError> {
        let (token, start) = match self.advance() {
            Some(next) => next,
            None => return Err(self.unexpected("Expected a primitive")),
        };
        self.expect(
            &Token::LeftParen,
            &format!("Expected '(' after {}", token.name()),
        )?;

        let primitive = match token {
            Token::DisableComponent => {
                let node = self.parse_value_argument()?;
                self.comma()?;
                let component = self.parse_value_argument()?;
                Primitive::DisableComponent { node, component }
            }
            Token::DeceiveComponent => {
                let node = self.parse_value_argument()?;
                self.comma()?;
                let component = self.parse_value_argument()?;
                self.comma()?;
                let value = self.parse_value_argument()?;
                Primitive::DeceiveComponent {
                    node,
                    component,
                    value,
                }
            }
            Token::DestroyComponent => {
                let node = self.parse_value_argument()?;
                self.comma()?;
                let component = self.parse_value_argument()?;
                Primitive::DestroyComponent { node, component }
            }
            Token::MisplaceNode => {
                let node = self.parse_value_argument()?;
                self.comma()?;
                let position = self.parse_position_argument()?;
                Primitive::MisplaceNode { node, position }
            }
            Token::DestroyNode => Primitive::DestroyNode {
                node: self.parse_value_argument()?,
            },
            Token::WriteField => {
                let packet = self.parse_packet_argument()?;
                self.comma()?;
                let path = self.parse_value_argument()?;
                self.comma()?;
                let source = self.parse_value_argument()?;
                Primitive::WriteField {
                    packet,
                    path,
                    source,
                }
            }
            Token::ReadField => {
                let (name, span) = self.expect_identifier("a destination variable")?;
                let destination = self.context.destination_argument(&name, &span)?;
                self.comma()?;
                let packet = self.parse_packet_argument()?;
                self.comma()?;
                let path = self.parse_value_argument()?;
                Primitive::ReadField {
                    destination,
                    packet,
                    path,
                }
            }
            Token::ForwardPacket => {
                let packet = self.parse_packet_argument()?;
                self.comma()?;
                let (delay, time_unit) = self.parse_delay_arguments()?;
                Primitive::ForwardPacket {
                    packet,
                    delay,
                    time_unit,
                }
            }
            Token::CreatePacket => {
                let (name, span) = self.expect_identifier("a packet")?;
                let packet = self.context.packet_argument(&name, &span)?;
                self.comma()?;
                let protocol = self.parse_protocol_argument()?;
                Primitive::CreatePacket { packet, protocol }
            }
            Token::InjectPacket => {
                let packet = self.parse_packet_argument()?;
                self.comma()?;
                let node = self.parse_value_argument()?;
                self.comma()?;
                let direction = self.parse_direction_argument()?;
                self.comma()?;
                let (delay, time_unit) = self.parse_delay_arguments()?;
                Primitive::InjectPacket {
                    packet,
                    node,
                    direction,
                    delay,
                    time_unit,
                }
            }
            Token::ClonePacket => {
                let (name, span) = self.expect_identifier("a destination packet")?;
                let destination = self.context.packet_argument(&name, &span)?;
                self.comma()?;
                let source = self.parse_packet_argument()?;
                Primitive::ClonePacket {
                    destination,
                    source,
                }
            }
            Token::DropPacket => Primitive::DropPacket {
                packet: self.parse_packet_argument()?,
            },
            other => {
                return Err(CompileError::new(
                    ErrorCode::UnexpectedToken,
                    format!("Expected a primitive, found {}", other),
                    start,
                ))
            }
        };

        let end = self.expect(&Token::RightParen, "Expected ')' after the arguments")?;
        self.context.append_primitive(primitive, &start.merge(&end))
    }

    fn parse_value_argument(&mut self) -> Result<String, CompileError> {
        let (operand, span) = self.operand()?;
        self.context.value_argument(operand, &span)
    }

    fn parse_packet_argument(&mut self) -> Result<String, CompileError> {
        if self.check(&Token::Captured) {
            let span = self.peek_span().unwrap_or_default();
            self.advance();
            return self.context.captured_argument(&span);
        }
        let (name, span) = self.expect_identifier("a packet or 'captured'")?;
        self.context.packet_argument(&name, &span)
    }

    fn parse_position_argument(&mut self) -> Result<String, CompileError> {
        if self.check(&Token::LeftBracket) {
            let items = self.parse_list_items()?;
            return Ok(self.context.list_literal(items));
        }
        let (name, span) = self.expect_identifier("a list or a list literal")?;
        self.context.position_argument(&name, &span)
    }

    fn parse_protocol_argument(&mut self) -> Result<String, CompileError> {
        let (operand, span) = self.operand()?;
        self.context.protocol_argument(operand, &span)
    }

    fn parse_delay_arguments(&mut self) -> Result<(String, String), CompileError> {
        let (delay, span) = match self.operand()? {
            (Operand::Literal(value), span) => (TimeValue::Literal(value), span),
            (Operand::Identifier(name), span) => (TimeValue::Variable(name), span),
        };
        let delay = self.context.delay_argument(delay, &span)?;
        self.comma()?;

        let unit = self.parse_time_unit()?;
        Ok((delay, self.context.unit_argument(unit)))
    }

    fn parse_direction_argument(&mut self) -> Result<String, CompileError> {
        let direction = match self.peek() {
            Some(Token::Tx) => Direction::Tx,
            Some(Token::Rx) => Direction::Rx,
            _ => return Err(self.unexpected("Expected a direction ('tx' or 'rx')")),
        };
        self.advance();
        Ok(self.context.direction_argument(direction))
    }
}
