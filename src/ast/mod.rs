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

//! Abstract Syntax Tree (AST) definitions for the AML front end.
//!
//! A finished scenario is a tree of codeblocks. Each block owns a snapshot
//! of the symbols declared lexically inside it (not those of its children)
//! and the list of its children in source order.

mod primitive;
mod types;

pub use primitive::*;
pub use types::*;

use std::fmt;

use crate::analyzer::{CodeblockTable, Symbol, SymbolTable};

/// The root of a finished scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub symbols: SymbolTable,
    /// Compound blocks.
    pub children: CodeblockTable,
}

impl Scenario {
    /// Iterate over the compound blocks of this scenario.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.children.iter().filter_map(|block| match block {
            Codeblock::Compound(compound) => Some(compound),
            _ => None,
        })
    }
}

/// A block starting at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub symbols: SymbolTable,
    /// Once, periodic and conditional blocks.
    pub children: CodeblockTable,
    /// Identifier of a literal or numeric variable.
    pub start_time: String,
    /// Identifier of the reserved unit symbol.
    pub time_unit: String,
}

/// An attack firing a single time.
#[derive(Debug, Clone, PartialEq)]
pub struct Once {
    pub symbols: SymbolTable,
    pub children: CodeblockTable,
}

/// An attack firing repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub struct Periodic {
    pub symbols: SymbolTable,
    pub children: CodeblockTable,
    pub period: String,
    pub time_unit: String,
}

/// An attack firing for every packet at the target nodes that matches a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub symbols: SymbolTable,
    pub children: CodeblockTable,
    /// Identifier of the list of target nodes.
    pub target_nodes: String,
    /// Identifier of the filter.
    pub filter: String,
}

/// A finished node stored in a codeblock table.
#[derive(Debug, Clone, PartialEq)]
pub enum Codeblock {
    Compound(Compound),
    Once(Once),
    Periodic(Periodic),
    Conditional(Conditional),
    Primitive(Primitive),
}

impl Codeblock {
    /// The name of this block kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Codeblock::Compound(_) => "compound",
            Codeblock::Once(_) => "once",
            Codeblock::Periodic(_) => "periodic",
            Codeblock::Conditional(_) => "conditional",
            Codeblock::Primitive(_) => "primitive",
        }
    }

    /// The symbols owned by this block; primitives own none.
    pub fn symbols(&self) -> Option<&SymbolTable> {
        match self {
            Codeblock::Compound(block) => Some(&block.symbols),
            Codeblock::Once(block) => Some(&block.symbols),
            Codeblock::Periodic(block) => Some(&block.symbols),
            Codeblock::Conditional(block) => Some(&block.symbols),
            Codeblock::Primitive(_) => None,
        }
    }

    /// The children of this block; primitives have none.
    pub fn children(&self) -> Option<&CodeblockTable> {
        match self {
            Codeblock::Compound(block) => Some(&block.children),
            Codeblock::Once(block) => Some(&block.children),
            Codeblock::Periodic(block) => Some(&block.children),
            Codeblock::Conditional(block) => Some(&block.children),
            Codeblock::Primitive(_) => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Codeblock::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    fn header(&self) -> String {
        match self {
            Codeblock::Compound(block) => {
                format!("from {} {}", block.start_time, block.time_unit)
            }
            Codeblock::Once(_) => "once".to_string(),
            Codeblock::Periodic(block) => format!("every {} {}", block.period, block.time_unit),
            Codeblock::Conditional(block) => format!(
                "for nodes in {} matching {}",
                block.target_nodes, block.filter
            ),
            Codeblock::Primitive(primitive) => primitive.to_string(),
        }
    }
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    indent: usize,
    header: &str,
    symbols: &SymbolTable,
    children: &CodeblockTable,
) -> fmt::Result {
    let pad = "  ".repeat(indent);
    writeln!(f, "{}{} {{", pad, header)?;
    for symbol in symbols {
        writeln!(f, "{}  {}", pad, symbol)?;
    }
    for child in children {
        write_codeblock(f, indent + 1, child)?;
    }
    writeln!(f, "{}}}", pad)
}

fn write_codeblock(f: &mut fmt::Formatter<'_>, indent: usize, block: &Codeblock) -> fmt::Result {
    match (block.symbols(), block.children()) {
        (Some(symbols), Some(children)) => {
            write_block(f, indent, &block.header(), symbols, children)
        }
        _ => writeln!(f, "{}{}", "  ".repeat(indent), block.header()),
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, 0, "scenario", &self.symbols, &self.children)
    }
}

impl fmt::Display for Codeblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_codeblock(f, 0, self)
    }
}

/// Resolve an identifier the way a consumer walking the tree would:
/// innermost block first, then its ancestors.
pub fn resolve<'a>(chain: &[&'a SymbolTable], identifier: &str) -> Option<&'a Symbol> {
    chain.iter().rev().find_map(|table| table.lookup(identifier))
}
