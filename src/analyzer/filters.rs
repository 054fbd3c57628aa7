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

//! Packet filter construction.
//!
//! A filter is flattened the same way as an arithmetic expression, but
//! over comparisons and the `and`/`or` connectives. The finished postfix
//! sequence is stored as a [`Filter`] symbol.

use log::trace;

use super::builder::already_declared;
use super::expressions::Postfix;
use super::operators::{ComparisonOperator, LogicalOperator, OperatorChecker};
use super::symbol::{Filter, Reserved, Symbol};
use super::AnalyzerContext;
use crate::error::{Result, Span};

/// A flattened boolean condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub tokens: Vec<String>,
}

/// Extension trait for building filters.
pub trait FilterBuilder {
    /// Compare two operands of the same type.
    fn comparison(
        &mut self,
        lhs: Postfix,
        op: ComparisonOperator,
        rhs: Postfix,
        span: &Span,
    ) -> Result<Condition>;

    /// Join two conditions with `and` or `or`.
    fn connective(&mut self, lhs: Condition, op: LogicalOperator, rhs: Condition) -> Condition;

    /// Define a filter in the current block.
    fn define_filter(&mut self, identifier: &str, condition: Condition, span: &Span)
        -> Result<()>;
}

impl FilterBuilder for AnalyzerContext {
    fn comparison(
        &mut self,
        lhs: Postfix,
        op: ComparisonOperator,
        rhs: Postfix,
        span: &Span,
    ) -> Result<Condition> {
        self.check_operand_type(lhs.value_type, rhs.value_type, span)?;
        let operator = self.stage(Symbol::Reserved(Reserved::new(op.symbol())));

        let mut tokens = lhs.tokens;
        tokens.extend(rhs.tokens);
        tokens.push(operator);
        Ok(Condition { tokens })
    }

    fn connective(&mut self, lhs: Condition, op: LogicalOperator, rhs: Condition) -> Condition {
        let operator = self.stage(Symbol::Reserved(Reserved::new(op.symbol())));
        let mut tokens = lhs.tokens;
        tokens.extend(rhs.tokens);
        tokens.push(operator);
        Condition { tokens }
    }

    fn define_filter(
        &mut self,
        identifier: &str,
        condition: Condition,
        span: &Span,
    ) -> Result<()> {
        if self.lookup_in(self.depth(), identifier).is_some() {
            return Err(already_declared(identifier, span));
        }
        self.commit_staged();
        trace!("filter {} = {:?}", identifier, condition.tokens);
        self.define_visible(Symbol::Filter(Filter::new(identifier, condition.tokens)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{BlockKind, ExpressionBuilder, Variable};
    use crate::ast::Value;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn context() -> AnalyzerContext {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Scenario);
        context.define_visible(Symbol::Variable(Variable::with_value(
            "proto",
            Value::String("udp".to_string()),
        )));
        context.define_visible(Symbol::Variable(Variable::with_value("port", Value::Integer(53))));
        context
    }

    #[test]
    fn test_filter_precedence_in_postfix() {
        let mut context = context();
        let span = Span::default();

        let proto = context.variable_operand("proto", &span).unwrap();
        let udp = context.literal_operand(Value::String("udp".to_string()));
        let is_udp = context
            .comparison(proto, ComparisonOperator::Equal, udp, &span)
            .unwrap();

        let port = context.variable_operand("port", &span).unwrap();
        let limit = context.literal_operand(Value::Integer(1024));
        let low_port = context
            .comparison(port, ComparisonOperator::Less, limit, &span)
            .unwrap();

        let condition = context.connective(is_udp, LogicalOperator::And, low_port);
        context.define_filter("f", condition, &span).unwrap();

        let filter = context.scopes().object("f").and_then(Symbol::as_filter).unwrap();
        assert_eq!(
            filter.items,
            vec!["proto", "__\"udp\"", "__==", "port", "__1024", "__<", "__and"]
        );
        assert!(context.scopes().table(0).contains("__and"));
        assert!(context.staged().is_empty());
    }

    #[test]
    fn test_comparison_type_mismatch() {
        let mut context = context();
        let span = Span::default();
        let proto = context.variable_operand("proto", &span).unwrap();
        let number = context.literal_operand(Value::Integer(1));
        let err = context
            .comparison(proto, ComparisonOperator::NotEqual, number, &span)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_filter_name_collision() {
        let mut context = context();
        let condition = Condition {
            tokens: vec!["port".to_string()],
        };
        let err = context
            .define_filter("port", condition, &Span::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IdentifierAlreadyDeclared);
    }
}
