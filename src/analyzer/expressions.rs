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

//! Expression flattening.
//!
//! Expressions are reduced bottom-up into postfix sequences of
//! identifiers. Literals and operators are first registered as synthetic
//! symbols, so every token of a finished sequence resolves through the
//! scope tables.

use super::builder::ScenarioBuilder;
use super::operators::{ArithmeticOperator, AssignmentOperator, OperatorChecker};
use super::resolve::SymbolResolver;
use super::symbol::{Reserved, Symbol, Variable};
use super::AnalyzerContext;
use crate::ast::{Primitive, Value, ValueType};
use crate::error::{CompileError, ErrorCode, Result, Span};

/// A flattened expression and the type of its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Postfix {
    pub tokens: Vec<String>,
    pub value_type: ValueType,
}

impl Postfix {
    fn operand(identifier: String, value_type: ValueType) -> Self {
        Self {
            tokens: vec![identifier],
            value_type,
        }
    }
}

/// Extension trait for building expressions and assignments.
pub trait ExpressionBuilder {
    /// Register a literal and use it as an operand.
    fn literal_operand(&mut self, value: Value) -> Postfix;

    /// Use an initialized variable as an operand.
    fn variable_operand(&self, identifier: &str, span: &Span) -> Result<Postfix>;

    /// Combine two operands with an arithmetic operator.
    fn binary(
        &mut self,
        lhs: Postfix,
        op: ArithmeticOperator,
        rhs: Postfix,
        span: &Span,
    ) -> Result<Postfix>;

    /// Negate an operand by multiplying it with minus one.
    fn negate(&mut self, operand: Postfix, span: &Span) -> Result<Postfix>;

    /// Append an assignment to the current attack block.
    fn assign(
        &mut self,
        target: &str,
        op: AssignmentOperator,
        expression: Postfix,
        span: &Span,
    ) -> Result<()>;
}

impl ExpressionBuilder for AnalyzerContext {
    fn literal_operand(&mut self, value: Value) -> Postfix {
        let value_type = value.value_type();
        let identifier = self.stage(Symbol::Variable(Variable::literal(value)));
        Postfix::operand(identifier, value_type)
    }

    fn variable_operand(&self, identifier: &str, span: &Span) -> Result<Postfix> {
        let variable = self.resolve_initialized(identifier, span)?;
        Ok(Postfix::operand(
            variable.identifier().to_string(),
            variable.value_type(),
        ))
    }

    fn binary(
        &mut self,
        lhs: Postfix,
        op: ArithmeticOperator,
        rhs: Postfix,
        span: &Span,
    ) -> Result<Postfix> {
        self.check_operand_type(lhs.value_type, rhs.value_type, span)?;
        self.check_arithmetic(op, lhs.value_type, span)?;
        let operator = self.stage(Symbol::Reserved(Reserved::new(op.symbol())));

        let mut tokens = lhs.tokens;
        tokens.extend(rhs.tokens);
        tokens.push(operator);
        Ok(Postfix {
            tokens,
            value_type: lhs.value_type,
        })
    }

    fn negate(&mut self, operand: Postfix, span: &Span) -> Result<Postfix> {
        let minus_one = match operand.value_type {
            ValueType::Integer => Value::Integer(-1),
            ValueType::Real => Value::Real(-1.0),
            other => {
                return Err(CompileError::new(
                    ErrorCode::InvalidOperatorForType,
                    format!("Unary '-' cannot be applied to {} operands", other),
                    span.clone(),
                ))
            }
        };
        let factor = self.literal_operand(minus_one);
        self.binary(operand, ArithmeticOperator::Multiply, factor, span)
    }

    fn assign(
        &mut self,
        target: &str,
        op: AssignmentOperator,
        expression: Postfix,
        span: &Span,
    ) -> Result<()> {
        let tokens = match op.arithmetic() {
            None => {
                let declared = self.resolve_variable(target, span)?.value_type();
                if declared.is_set() {
                    self.check_operand_type(declared, expression.value_type, span)?;
                } else if let Some(variable) = self.scopes_mut().variable_mut(target) {
                    variable.fix_type(expression.value_type);
                }
                expression.tokens
            }
            Some(arithmetic) => {
                let declared = self.resolve_initialized(target, span)?.value_type();
                self.check_operand_type(declared, expression.value_type, span)?;
                self.check_assignment(op, declared, span)?;
                let operator = self.stage(Symbol::Reserved(Reserved::new(arithmetic.symbol())));

                let mut tokens = Vec::with_capacity(expression.tokens.len() + 2);
                tokens.push(target.to_string());
                tokens.extend(expression.tokens);
                tokens.push(operator);
                tokens
            }
        };

        self.append_primitive(
            Primitive::Expression {
                destination: target.to_string(),
                tokens,
            },
            span,
        )
    }
}
