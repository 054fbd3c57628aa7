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

//! Scenario construction.
//!
//! [`ScenarioBuilder`] exposes one operation per grammar action:
//! declarations, primitive arguments, primitive statements and block
//! closes. Closing a block copies the tables of its depth into the new
//! node, appends the node one depth up, and then clears the depth for
//! the next sibling.

use log::{info, trace};

use super::context::BlockKind;
use super::resolve::SymbolResolver;
use super::scope::Scope;
use super::symbol::{List, Reserved, Symbol, SymbolKind, Variable};
use super::AnalyzerContext;
use crate::ast::{
    Codeblock, Compound, Conditional, Direction, Once, Periodic, Primitive, Scenario, TimeUnit,
    Value, ValueType,
};
use crate::error::{CompileError, ErrorCode, Result, Span};

/// An argument written either as a literal or as a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Identifier(String),
}

/// A start time, period or delay.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    Literal(Value),
    Variable(String),
}

pub(crate) fn already_declared(identifier: &str, span: &Span) -> CompileError {
    CompileError::new(
        ErrorCode::IdentifierAlreadyDeclared,
        format!("Identifier '{}' is already declared", identifier),
        span.clone(),
    )
    .with_hint("Names must be unique across a block and every block enclosing it")
}

/// Extension trait driving the construction of a scenario.
pub trait ScenarioBuilder {
    /// Declare a variable whose type the first assignment fixes.
    fn declare_variable(&mut self, identifier: &str, span: &Span) -> Result<()>;

    /// Define a variable with an initial value.
    fn define_variable(&mut self, identifier: &str, value: Value, span: &Span) -> Result<()>;

    /// Declare a packet.
    fn declare_packet(&mut self, identifier: &str, span: &Span) -> Result<()>;

    /// Register one member of a list.
    fn list_item(&mut self, item: Operand, span: &Span) -> Result<String>;

    /// Define a named list from registered members.
    fn define_list(&mut self, identifier: &str, items: Vec<String>, span: &Span) -> Result<()>;

    /// Register an anonymous list from registered members.
    fn list_literal(&mut self, items: Vec<String>) -> String;

    /// Register a value argument: a literal or an initialized variable.
    fn value_argument(&mut self, operand: Operand, span: &Span) -> Result<String>;

    /// Resolve a packet argument.
    fn packet_argument(&self, identifier: &str, span: &Span) -> Result<String>;

    /// Register the packet captured by the enclosing conditional.
    fn captured_argument(&mut self, span: &Span) -> Result<String>;

    /// Resolve the variable a primitive writes into.
    fn destination_argument(&self, identifier: &str, span: &Span) -> Result<String>;

    /// Resolve a named list used as a position.
    fn position_argument(&self, identifier: &str, span: &Span) -> Result<String>;

    /// Register a protocol argument, which must be a string.
    fn protocol_argument(&mut self, operand: Operand, span: &Span) -> Result<String>;

    /// Register a non-negative delay.
    fn delay_argument(&mut self, delay: TimeValue, span: &Span) -> Result<String>;

    /// Register a time unit keyword.
    fn unit_argument(&mut self, unit: TimeUnit) -> String;

    /// Register a direction keyword.
    fn direction_argument(&mut self, direction: Direction) -> String;

    /// Append a primitive to the current attack block.
    fn append_primitive(&mut self, primitive: Primitive, span: &Span) -> Result<()>;

    /// Close a `once` block.
    fn close_once(&mut self);

    /// Close an `every` block.
    fn close_periodic(&mut self, period: TimeValue, unit: TimeUnit, span: &Span) -> Result<()>;

    /// Close a conditional block, checking its node list and filter.
    fn close_conditional(
        &mut self,
        target_nodes: &str,
        nodes_span: &Span,
        filter: &str,
        filter_span: &Span,
    ) -> Result<()>;

    /// Close a `from` block.
    fn close_compound(&mut self, start_time: TimeValue, unit: TimeUnit, span: &Span)
        -> Result<()>;

    /// Close the scenario and hand out the finished tree.
    fn close_scenario(&mut self) -> Scenario;
}

impl ScenarioBuilder for AnalyzerContext {
    fn declare_variable(&mut self, identifier: &str, span: &Span) -> Result<()> {
        let depth = self.depth();
        if !self
            .scopes_mut()
            .declare(depth, identifier, SymbolKind::Variable)
        {
            return Err(already_declared(identifier, span));
        }
        trace!("declare variable {} at depth {}", identifier, depth);
        Ok(())
    }

    fn define_variable(&mut self, identifier: &str, value: Value, span: &Span) -> Result<()> {
        self.commit_staged();
        if !self.define_visible(Symbol::Variable(Variable::with_value(identifier, value))) {
            return Err(already_declared(identifier, span));
        }
        Ok(())
    }

    fn declare_packet(&mut self, identifier: &str, span: &Span) -> Result<()> {
        let depth = self.depth();
        if !self
            .scopes_mut()
            .declare(depth, identifier, SymbolKind::Packet)
        {
            return Err(already_declared(identifier, span));
        }
        trace!("declare packet {} at depth {}", identifier, depth);
        Ok(())
    }

    fn list_item(&mut self, item: Operand, span: &Span) -> Result<String> {
        match item {
            Operand::Literal(value) => Ok(self.stage(Symbol::Variable(Variable::literal(value)))),
            Operand::Identifier(identifier) => {
                self.resolve_initialized(&identifier, span)?;
                Ok(identifier)
            }
        }
    }

    fn define_list(&mut self, identifier: &str, items: Vec<String>, span: &Span) -> Result<()> {
        if self.lookup_in(self.depth(), identifier).is_some() {
            return Err(already_declared(identifier, span));
        }
        self.commit_staged();
        self.define_visible(Symbol::List(List::new(identifier, items)));
        Ok(())
    }

    fn list_literal(&mut self, items: Vec<String>) -> String {
        self.stage(Symbol::List(List::literal(items)))
    }

    fn value_argument(&mut self, operand: Operand, span: &Span) -> Result<String> {
        match operand {
            Operand::Literal(value) => Ok(self.stage(Symbol::Variable(Variable::literal(value)))),
            Operand::Identifier(identifier) => {
                self.resolve_initialized(&identifier, span)?;
                Ok(identifier)
            }
        }
    }

    fn packet_argument(&self, identifier: &str, span: &Span) -> Result<String> {
        self.resolve_packet(identifier, span)
    }

    fn captured_argument(&mut self, span: &Span) -> Result<String> {
        if self.current_block() != Some(BlockKind::Conditional) {
            return Err(CompileError::new(
                ErrorCode::CapturedOutsideConditional,
                "'captured' can only be used inside a conditional block",
                span.clone(),
            )
            .with_hint("Wrap the statement in 'for nodes in ... { for packets matching ... { } }'"));
        }
        Ok(self.stage(Symbol::Reserved(Reserved::new("captured"))))
    }

    fn destination_argument(&self, identifier: &str, span: &Span) -> Result<String> {
        self.resolve_variable(identifier, span)?;
        Ok(identifier.to_string())
    }

    fn position_argument(&self, identifier: &str, span: &Span) -> Result<String> {
        let symbol = self.resolve_kind_in(self.depth(), identifier, SymbolKind::List, span)?;
        Ok(symbol.identifier().to_string())
    }

    fn protocol_argument(&mut self, operand: Operand, span: &Span) -> Result<String> {
        let value_type = match &operand {
            Operand::Literal(value) => value.value_type(),
            Operand::Identifier(identifier) => self.resolve_initialized(identifier, span)?.value_type(),
        };
        if value_type != ValueType::String {
            return Err(CompileError::new(
                ErrorCode::TypeMismatch,
                format!("Protocol must be a string, found {}", value_type),
                span.clone(),
            ));
        }
        self.value_argument(operand, span)
    }

    fn delay_argument(&mut self, delay: TimeValue, span: &Span) -> Result<String> {
        let depth = self.depth();
        match delay {
            TimeValue::Literal(value) => {
                let value = time_literal(value, span)?;
                Ok(self.stage(Symbol::Variable(Variable::literal(value))))
            }
            TimeValue::Variable(identifier) => self.time_variable(depth, &identifier, span),
        }
    }

    fn unit_argument(&mut self, unit: TimeUnit) -> String {
        self.stage(Symbol::Reserved(Reserved::new(unit.keyword())))
    }

    fn direction_argument(&mut self, direction: Direction) -> String {
        self.stage(Symbol::Reserved(Reserved::new(direction.keyword())))
    }

    fn append_primitive(&mut self, primitive: Primitive, span: &Span) -> Result<()> {
        assert_eq!(
            self.current_scope(),
            Some(Scope::Attack),
            "primitives can only be appended to attack blocks"
        );
        if primitive.is_conditional_only() && self.current_block() != Some(BlockKind::Conditional)
        {
            self.discard_staged();
            return Err(CompileError::new(
                ErrorCode::PrimitiveNotAllowed,
                format!(
                    "'{}' can only be used inside a conditional block",
                    primitive.name()
                ),
                span.clone(),
            ));
        }
        if let Primitive::ClonePacket {
            destination,
            source,
        } = &primitive
        {
            if destination == source {
                self.discard_staged();
                return Err(CompileError::new(
                    ErrorCode::IdenticalPackets,
                    format!("Cannot clone packet '{}' into itself", source),
                    span.clone(),
                ));
            }
        }

        self.commit_staged();
        trace!("append {}", primitive);
        self.append(Codeblock::Primitive(primitive));
        Ok(())
    }

    fn close_once(&mut self) {
        self.close_block(BlockKind::Once, |symbols, children| {
            Codeblock::Once(Once { symbols, children })
        });
    }

    fn close_periodic(&mut self, period: TimeValue, unit: TimeUnit, span: &Span) -> Result<()> {
        let parent = Scope::Compound.depth();
        let period = self.time_at(parent, period, span)?;
        let time_unit = self.intern(parent, Symbol::Reserved(Reserved::new(unit.keyword())));
        self.close_block(BlockKind::Periodic, |symbols, children| {
            Codeblock::Periodic(Periodic {
                symbols,
                children,
                period,
                time_unit,
            })
        });
        Ok(())
    }

    fn close_conditional(
        &mut self,
        target_nodes: &str,
        nodes_span: &Span,
        filter: &str,
        filter_span: &Span,
    ) -> Result<()> {
        let parent = Scope::Compound.depth();
        let target_nodes = self
            .resolve_kind_in(parent, target_nodes, SymbolKind::List, nodes_span)?
            .identifier()
            .to_string();
        let filter = self
            .resolve_kind_in(parent, filter, SymbolKind::Filter, filter_span)?
            .identifier()
            .to_string();
        self.close_block(BlockKind::Conditional, |symbols, children| {
            Codeblock::Conditional(Conditional {
                symbols,
                children,
                target_nodes,
                filter,
            })
        });
        Ok(())
    }

    fn close_compound(
        &mut self,
        start_time: TimeValue,
        unit: TimeUnit,
        span: &Span,
    ) -> Result<()> {
        let parent = Scope::Scenario.depth();
        let start_time = self.time_at(parent, start_time, span)?;
        let time_unit = self.intern(parent, Symbol::Reserved(Reserved::new(unit.keyword())));
        self.close_block(BlockKind::Compound, |symbols, children| {
            Codeblock::Compound(Compound {
                symbols,
                children,
                start_time,
                time_unit,
            })
        });
        Ok(())
    }

    fn close_scenario(&mut self) -> Scenario {
        let (symbols, children) = self.close_root();
        info!(
            "scenario finished: {} symbols, {} compound blocks",
            symbols.len(),
            children.len()
        );
        Scenario { symbols, children }
    }
}

impl AnalyzerContext {
    /// Resolve a block time and register a literal one at `depth`.
    fn time_at(&mut self, depth: usize, time: TimeValue, span: &Span) -> Result<String> {
        match time {
            TimeValue::Literal(value) => {
                let value = time_literal(value, span)?;
                Ok(self.intern(depth, Symbol::Variable(Variable::literal(value))))
            }
            TimeValue::Variable(identifier) => self.time_variable(depth, &identifier, span),
        }
    }

    /// Check a variable used as a time.
    fn time_variable(&self, max_depth: usize, identifier: &str, span: &Span) -> Result<String> {
        let symbol = self.resolve_kind_in(max_depth, identifier, SymbolKind::Variable, span)?;
        let Some(variable) = symbol.as_variable() else {
            return Err(CompileError::new(
                ErrorCode::WrongSymbolKind,
                format!("'{}' is not a variable", identifier),
                span.clone(),
            ));
        };
        if !variable.is_initialized() {
            return Err(CompileError::new(
                ErrorCode::VariableUsedBeforeInit,
                format!("Variable '{}' is used before it is assigned", identifier),
                span.clone(),
            ));
        }
        if !variable.value_type().is_numeric() {
            return Err(CompileError::new(
                ErrorCode::TypeMismatch,
                format!(
                    "A time must be numeric, but '{}' is {}",
                    identifier,
                    variable.value_type()
                ),
                span.clone(),
            ));
        }
        if variable.value().is_some_and(Value::is_negative) {
            return Err(negative_time(span));
        }
        Ok(identifier.to_string())
    }
}

/// Normalize a time literal to a non-negative real.
fn time_literal(value: Value, span: &Span) -> Result<Value> {
    match value.as_real() {
        Some(time) if time < 0.0 => Err(negative_time(span)),
        // Folds -0.0 into 0.0.
        Some(time) => Ok(Value::Real(time + 0.0)),
        None => Err(CompileError::new(
            ErrorCode::TypeMismatch,
            format!("A time must be numeric, found {}", value.value_type()),
            span.clone(),
        )),
    }
}

fn negative_time(span: &Span) -> CompileError {
    CompileError::new(
        ErrorCode::NegativeTime,
        "Times, periods and delays must not be negative",
        span.clone(),
    )
}
