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

//! Operators and operator checking for the semantic analyzer.
//!
//! This module defines the operator families of AML and the checks that
//! tie them to operand types:
//! - Arithmetic operators (+, -, *, /, %, **)
//! - Assignment operators (=, +=, -=, *=, /=, %=)
//! - Comparison operators (==, !=, <, <=, >, >=)
//! - Logical operators (and, or)

use super::AnalyzerContext;
use crate::ast::ValueType;
use crate::error::{CompileError, ErrorCode, Result, Span};

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl ArithmeticOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
            ArithmeticOperator::Power => "**",
        }
    }

    /// Check if this operator accepts operands of a type.
    ///
    /// Strings only support concatenation.
    pub fn supports(&self, value_type: ValueType) -> bool {
        match value_type {
            ValueType::Integer | ValueType::Real => true,
            ValueType::String => matches!(self, ArithmeticOperator::Add),
            ValueType::Unset => false,
        }
    }
}

impl std::fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

impl AssignmentOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubtractAssign => "-=",
            AssignmentOperator::MultiplyAssign => "*=",
            AssignmentOperator::DivideAssign => "/=",
            AssignmentOperator::ModuloAssign => "%=",
        }
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn arithmetic(&self) -> Option<ArithmeticOperator> {
        match self {
            AssignmentOperator::Assign => None,
            AssignmentOperator::AddAssign => Some(ArithmeticOperator::Add),
            AssignmentOperator::SubtractAssign => Some(ArithmeticOperator::Subtract),
            AssignmentOperator::MultiplyAssign => Some(ArithmeticOperator::Multiply),
            AssignmentOperator::DivideAssign => Some(ArithmeticOperator::Divide),
            AssignmentOperator::ModuloAssign => Some(ArithmeticOperator::Modulo),
        }
    }
}

impl std::fmt::Display for AssignmentOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A comparison operator inside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
        }
    }
}

/// A logical connective inside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// Extension trait for operator type checking.
pub trait OperatorChecker {
    /// Check that a later operand has the type of the expression so far.
    fn check_operand_type(&self, expected: ValueType, found: ValueType, span: &Span)
        -> Result<()>;

    /// Check that an arithmetic operator accepts the expression type.
    fn check_arithmetic(&self, op: ArithmeticOperator, value_type: ValueType, span: &Span)
        -> Result<()>;

    /// Check that an assignment operator accepts the expression type.
    fn check_assignment(&self, op: AssignmentOperator, value_type: ValueType, span: &Span)
        -> Result<()>;
}

impl OperatorChecker for AnalyzerContext {
    fn check_operand_type(
        &self,
        expected: ValueType,
        found: ValueType,
        span: &Span,
    ) -> Result<()> {
        if expected != found {
            return Err(CompileError::new(
                ErrorCode::TypeMismatch,
                format!(
                    "Type mismatch: expected {} operand, found {}",
                    expected, found
                ),
                span.clone(),
            )
            .with_hint("All operands of an expression must have the same type"));
        }
        Ok(())
    }

    fn check_arithmetic(
        &self,
        op: ArithmeticOperator,
        value_type: ValueType,
        span: &Span,
    ) -> Result<()> {
        if !op.supports(value_type) {
            return Err(CompileError::new(
                ErrorCode::InvalidOperatorForType,
                format!("Operator '{}' cannot be applied to {} operands", op, value_type),
                span.clone(),
            ));
        }
        Ok(())
    }

    fn check_assignment(
        &self,
        op: AssignmentOperator,
        value_type: ValueType,
        span: &Span,
    ) -> Result<()> {
        match op.arithmetic() {
            None => Ok(()),
            Some(arithmetic) if arithmetic.supports(value_type) => Ok(()),
            Some(_) => Err(CompileError::new(
                ErrorCode::InvalidOperatorForType,
                format!("Operator '{}' cannot be applied to {} operands", op, value_type),
                span.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_supports_only_concatenation() {
        assert!(ArithmeticOperator::Add.supports(ValueType::String));
        assert!(!ArithmeticOperator::Subtract.supports(ValueType::String));
        assert!(!ArithmeticOperator::Power.supports(ValueType::String));
        assert!(ArithmeticOperator::Modulo.supports(ValueType::Real));
    }

    #[test]
    fn test_compound_assignment_maps_to_arithmetic() {
        assert_eq!(
            AssignmentOperator::SubtractAssign.arithmetic(),
            Some(ArithmeticOperator::Subtract)
        );
        assert_eq!(AssignmentOperator::Assign.arithmetic(), None);
    }

    #[test]
    fn test_check_assignment() {
        let context = AnalyzerContext::new();
        let span = Span::new(0, 1);
        assert!(context
            .check_assignment(AssignmentOperator::Assign, ValueType::String, &span)
            .is_ok());
        assert!(context
            .check_assignment(AssignmentOperator::AddAssign, ValueType::String, &span)
            .is_ok());
        let err = context
            .check_assignment(AssignmentOperator::MultiplyAssign, ValueType::String, &span)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOperatorForType);
    }

    #[test]
    fn test_check_operand_type() {
        let context = AnalyzerContext::new();
        let span = Span::new(0, 1);
        assert!(context
            .check_operand_type(ValueType::Integer, ValueType::Integer, &span)
            .is_ok());
        let err = context
            .check_operand_type(ValueType::Integer, ValueType::Real, &span)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }
}
