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

//! Codeblock tables.
//!
//! The structural twin of the scope handler: one ordered list of finished
//! nodes per nesting depth. Nodes are only appended until the enclosing
//! block closes and takes a snapshot.

use crate::ast::Codeblock;

/// Finished nodes of one scope, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeblockTable {
    codeblocks: Vec<Codeblock>,
}

impl CodeblockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, codeblock: Codeblock) {
        self.codeblocks.push(codeblock);
    }

    /// Remove every node, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.codeblocks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.codeblocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codeblocks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Codeblock> {
        self.codeblocks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Codeblock> {
        self.codeblocks.iter()
    }

    /// Take an independent copy of the current contents.
    pub fn snapshot(&self) -> CodeblockTable {
        self.clone()
    }
}

impl<'a> IntoIterator for &'a CodeblockTable {
    type Item = &'a Codeblock;
    type IntoIter = std::slice::Iter<'a, Codeblock>;

    fn into_iter(self) -> Self::IntoIter {
        self.codeblocks.iter()
    }
}

/// One codeblock table per nesting depth.
#[derive(Debug, Clone)]
pub struct CodeblockHandler {
    tables: Vec<CodeblockTable>,
}

impl CodeblockHandler {
    /// Create a handler with a fixed number of depths.
    ///
    /// # Panics
    ///
    /// Panics if `scopes` is zero.
    pub fn new(scopes: usize) -> Self {
        assert!(scopes > 0, "a codeblock handler needs at least one scope");
        Self {
            tables: vec![CodeblockTable::new(); scopes],
        }
    }

    pub fn scope_count(&self) -> usize {
        self.tables.len()
    }

    /// Append a finished node at a depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not a valid depth.
    pub fn append(&mut self, depth: usize, codeblock: Codeblock) {
        self.check_depth(depth);
        self.tables[depth].append(codeblock);
    }

    /// Get the table at a depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not a valid depth.
    pub fn table(&self, depth: usize) -> &CodeblockTable {
        self.check_depth(depth);
        &self.tables[depth]
    }

    /// Empty the table at a depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not a valid depth.
    pub fn clear(&mut self, depth: usize) {
        self.check_depth(depth);
        self.tables[depth].clear();
    }

    /// Empty every table.
    pub fn dump(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(CodeblockTable::is_empty)
    }

    fn check_depth(&self, depth: usize) {
        assert!(
            depth < self.tables.len(),
            "scope depth {} out of range 0..{}",
            depth,
            self.tables.len()
        );
    }
}

impl Default for CodeblockHandler {
    fn default() -> Self {
        Self::new(super::scope::SCOPES)
    }
}
