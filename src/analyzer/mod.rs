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

//! Semantic analyzer for AML.
//!
//! This module performs the semantic analysis that runs while a scenario
//! is parsed:
//! - Scoped symbol management over three fixed nesting depths
//! - Synthetic symbols for literals, operators and keywords
//! - Expression and filter flattening to postfix order
//! - Type checking with types fixed by the first assignment
//! - Construction of the codeblock tree, one block at a time
//!
//! The grammar driver calls the operations of [`ScenarioBuilder`],
//! [`ExpressionBuilder`] and [`FilterBuilder`] on an [`AnalyzerContext`]
//! in source order. Every block's node is produced at its closing brace.

mod builder;
mod codeblock_table;
mod context;
mod expressions;
mod filters;
mod operators;
mod resolve;
mod scope;
mod symbol;
mod symbol_table;

pub use builder::{Operand, ScenarioBuilder, TimeValue};
pub use codeblock_table::{CodeblockHandler, CodeblockTable};
pub use context::{AnalyzerContext, BlockKind};
pub use expressions::{ExpressionBuilder, Postfix};
pub use filters::{Condition, FilterBuilder};
pub use operators::{
    ArithmeticOperator, AssignmentOperator, ComparisonOperator, LogicalOperator, OperatorChecker,
};
pub use resolve::SymbolResolver;
pub use scope::{Scope, ScopeHandler, SCOPES};
pub use symbol::{
    list_identifier, literal_identifier, reserved_identifier, Filter, List, Packet, Reserved,
    Symbol, SymbolKind, Variable, RESERVED_PREFIX,
};
pub use symbol_table::SymbolTable;
