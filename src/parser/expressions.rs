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

//! Expression parsing for the parser.
//!
//! This module provides expression parsing functionality:
//! - Assignments and compound assignments
//! - Precedence climbing for binary operators
//! - Unary minus
//! - Primary expressions (literals, identifiers, grouping)
//!
//! Operands are handed to the analyzer as soon as they are read, so the
//! result of every production is already in postfix order.

use super::helpers::ParserHelpers;
use super::Parser;
use crate::analyzer::{ArithmeticOperator, AssignmentOperator, ExpressionBuilder, Postfix};
use crate::ast::Value;
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for expression parsing.
pub trait ExpressionParser {
    /// Parse `target op= expression` and append it to the current block.
    fn parse_assignment(&mut self) -> Result<(), CompileError>;

    /// Parse an expression.
    fn parse_expression(&mut self) -> Result<Postfix, CompileError>;

    /// Parse an additive expression (+, -).
    fn parse_additive(&mut self) -> Result<Postfix, CompileError>;

    /// Parse a multiplicative expression (*, /, %).
    fn parse_multiplicative(&mut self) -> Result<Postfix, CompileError>;

    /// Parse a power expression (**), associating to the left.
    fn parse_power(&mut self) -> Result<Postfix, CompileError>;

    /// Parse a unary expression.
    fn parse_unary(&mut self) -> Result<Postfix, CompileError>;

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Result<Postfix, CompileError>;
}

fn assignment_operator(token: &Token) -> Option<AssignmentOperator> {
    match token {
        Token::Equal => Some(AssignmentOperator::Assign),
        Token::PlusAssign => Some(AssignmentOperator::AddAssign),
        Token::MinusAssign => Some(AssignmentOperator::SubtractAssign),
        Token::StarAssign => Some(AssignmentOperator::MultiplyAssign),
        Token::SlashAssign => Some(AssignmentOperator::DivideAssign),
        Token::PercentAssign => Some(AssignmentOperator::ModuloAssign),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Parse one level of left-associative binary operators.
    fn parse_binary_level(
        &mut self,
        operators: &[(Token, ArithmeticOperator)],
        next: fn(&mut Self) -> Result<Postfix, CompileError>,
    ) -> Result<Postfix, CompileError> {
        let mut lhs = next(self)?;
        while let Some(op) = operators
            .iter()
            .find(|(token, _)| self.check(token))
            .map(|(_, op)| *op)
        {
            let span = self.peek_span().unwrap_or_default();
            self.advance();
            let rhs = next(self)?;
            lhs = self.context.binary(lhs, op, rhs, &span)?;
        }
        Ok(lhs)
    }
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_assignment(&mut self) -> Result<(), CompileError> {
        let (target, _) = self.expect_identifier("an assignment target")?;
        let op = match self.peek().and_then(assignment_operator) {
            Some(op) => op,
            None => return Err(self.unexpected("Expected an assignment operator")),
        };
        let span = self.peek_span().unwrap_or_default();
        self.advance();
        let expression = self.parse_expression()?;
        self.context.assign(&target, op, expression, &span)?;
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Postfix, CompileError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Postfix, CompileError> {
        self.parse_binary_level(
            &[
                (Token::Plus, ArithmeticOperator::Add),
                (Token::Minus, ArithmeticOperator::Subtract),
            ],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Postfix, CompileError> {
        self.parse_binary_level(
            &[
                (Token::Star, ArithmeticOperator::Multiply),
                (Token::Slash, ArithmeticOperator::Divide),
                (Token::Percent, ArithmeticOperator::Modulo),
            ],
            Self::parse_power,
        )
    }

    fn parse_power(&mut self) -> Result<Postfix, CompileError> {
        self.parse_binary_level(
            &[(Token::StarStar, ArithmeticOperator::Power)],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Postfix, CompileError> {
        if self.check(&Token::Minus) {
            let span = self.peek_span().unwrap_or_default();
            self.advance();
            let operand = self.nested(Self::parse_unary)?;
            return self.context.negate(operand, &span);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Postfix, CompileError> {
        let literal = match self.peek() {
            Some(Token::Integer(n)) => Some(Value::Integer(*n)),
            Some(Token::Real(r)) => Some(Value::Real(*r)),
            Some(Token::String(s)) => Some(Value::String(s.clone())),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(self.context.literal_operand(value));
        }

        match self.peek() {
            Some(Token::Identifier(_)) => {
                let (name, span) = self.expect_identifier("an operand")?;
                self.context.variable_operand(&name, &span)
            }
            Some(Token::LeftParen) => {
                self.advance();
                self.nested(|parser| {
                    let inner = parser.parse_expression()?;
                    parser.expect(&Token::RightParen, "Expected ')' after expression")?;
                    Ok(inner)
                })
            }
            Some(_) => {
                let mut error = self.unexpected("Expected an expression");
                error.code = ErrorCode::ExpectedLiteral;
                Err(error)
            }
            None => Err(self.unexpected("Expected an expression")),
        }
    }
}
