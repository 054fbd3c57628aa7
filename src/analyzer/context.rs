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

//! Analysis context for the semantic analyzer.
//!
//! The [`AnalyzerContext`] owns every piece of mutable state a parse needs:
//! the depth-indexed symbol and codeblock tables, the stack of open blocks
//! and the symbols staged by the statement currently being built. Grammar
//! actions receive it by exclusive borrow.

use log::{debug, trace};

use super::codeblock_table::{CodeblockHandler, CodeblockTable};
use super::scope::{Scope, ScopeHandler, SCOPES};
use super::symbol::Symbol;
use super::symbol_table::SymbolTable;
use crate::ast::Codeblock;

/// The kind of a block that can be open during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Scenario,
    Compound,
    Once,
    Periodic,
    Conditional,
}

impl BlockKind {
    /// Get the scope whose tables this block fills.
    pub fn scope(&self) -> Scope {
        match self {
            BlockKind::Scenario => Scope::Scenario,
            BlockKind::Compound => Scope::Compound,
            BlockKind::Once | BlockKind::Periodic | BlockKind::Conditional => Scope::Attack,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Scenario => "scenario",
            BlockKind::Compound => "compound",
            BlockKind::Once => "once",
            BlockKind::Periodic => "periodic",
            BlockKind::Conditional => "conditional",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerContext {
    scopes: ScopeHandler,
    codeblocks: CodeblockHandler,
    /// Synthetic symbols of the statement being built.
    staged: Vec<Symbol>,
    /// Open blocks, outermost first.
    open: Vec<BlockKind>,
    finished: bool,
}

impl AnalyzerContext {
    /// Create a context with empty tables and no open block.
    pub fn new() -> Self {
        Self {
            scopes: ScopeHandler::new(SCOPES),
            codeblocks: CodeblockHandler::new(SCOPES),
            staged: Vec::new(),
            open: Vec::new(),
            finished: false,
        }
    }

    /// Open a block.
    ///
    /// # Panics
    ///
    /// Panics if the scenario is finished or if the block does not nest
    /// directly inside the current one.
    pub fn enter(&mut self, kind: BlockKind) {
        self.assert_active();
        assert_eq!(
            self.open.len(),
            kind.scope().depth(),
            "a {} block cannot open at depth {}",
            kind,
            self.open.len()
        );
        debug!("open {} block at depth {}", kind, kind.scope().depth());
        self.open.push(kind);
    }

    /// Get the innermost open block.
    pub fn current_block(&self) -> Option<BlockKind> {
        self.open.last().copied()
    }

    /// Get the scope of the innermost open block.
    pub fn current_scope(&self) -> Option<Scope> {
        self.current_block().map(|kind| kind.scope())
    }

    /// Check if the scenario has been closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn scopes(&self) -> &ScopeHandler {
        &self.scopes
    }

    pub fn codeblocks(&self) -> &CodeblockHandler {
        &self.codeblocks
    }

    /// Get the symbols staged by the current statement.
    pub fn staged(&self) -> &[Symbol] {
        &self.staged
    }

    /// Find a symbol visible from the current block.
    ///
    /// Staged symbols are visible too, since they will be committed with
    /// the statement that references them.
    pub fn lookup(&self, identifier: &str) -> Option<&Symbol> {
        self.lookup_in(self.depth(), identifier)
            .or_else(|| self.staged.iter().find(|s| s.identifier() == identifier))
    }

    /// Find a symbol in the tables from depth 0 through `max_depth`.
    pub fn lookup_in(&self, max_depth: usize, identifier: &str) -> Option<&Symbol> {
        if !self.scopes.exists_in_range(max_depth, identifier) {
            return None;
        }
        (0..=max_depth)
            .rev()
            .find_map(|depth| self.scopes.table(depth).lookup(identifier))
    }

    /// Stage a synthetic symbol for the current statement.
    ///
    /// Nothing is staged when the identifier is already visible or staged.
    /// Returns the identifier either way.
    pub fn stage(&mut self, symbol: Symbol) -> String {
        let identifier = symbol.identifier().to_string();
        let visible = self.scopes.exists_in_range(self.depth(), &identifier);
        if !visible && !self.staged.iter().any(|s| s.identifier() == identifier) {
            trace!("stage {}", symbol);
            self.staged.push(symbol);
        }
        identifier
    }

    /// Commit every staged symbol into the table of the current block.
    pub fn commit_staged(&mut self) {
        let depth = self.depth();
        for symbol in std::mem::take(&mut self.staged) {
            trace!("define {} at depth {}", symbol, depth);
            let defined = self.scopes.define(depth, symbol);
            debug_assert!(defined, "staged symbol collided at depth {}", depth);
        }
    }

    /// Drop the staged symbols of a statement that failed.
    pub fn discard_staged(&mut self) {
        self.staged.clear();
    }

    /// Define a synthetic symbol directly at a depth unless it is visible there.
    pub(crate) fn intern(&mut self, depth: usize, symbol: Symbol) -> String {
        let identifier = symbol.identifier().to_string();
        if !self.scopes.exists_in_range(depth, &identifier) {
            trace!("define {} at depth {}", symbol, depth);
            self.scopes.define(depth, symbol);
        }
        identifier
    }

    /// Define a user symbol at the current depth.
    ///
    /// Returns `false` if the identifier is visible from the current block.
    pub(crate) fn define_visible(&mut self, symbol: Symbol) -> bool {
        let depth = self.depth();
        if self.scopes.exists_in_range(depth, symbol.identifier()) {
            return false;
        }
        trace!("define {} at depth {}", symbol, depth);
        self.scopes.define(depth, symbol)
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut ScopeHandler {
        &mut self.scopes
    }

    /// Append a finished node to the table of the current block.
    pub(crate) fn append(&mut self, codeblock: Codeblock) {
        let depth = self.depth();
        self.codeblocks.append(depth, codeblock);
    }

    /// Close the innermost block.
    ///
    /// The tables at the block's depth are copied into the node `build`
    /// returns, the node is appended to the parent depth, and only then are
    /// the tables at the block's depth cleared.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not the innermost open block or is the scenario.
    pub(crate) fn close_block<F>(&mut self, kind: BlockKind, build: F)
    where
        F: FnOnce(SymbolTable, CodeblockTable) -> Codeblock,
    {
        assert_ne!(kind, BlockKind::Scenario, "the scenario has no parent block");
        self.assert_innermost(kind);
        self.commit_staged();
        let depth = kind.scope().depth();
        let symbols = self.scopes.table(depth).snapshot();
        let children = self.codeblocks.table(depth).snapshot();
        debug!(
            "close {} block at depth {}: {} symbols, {} children",
            kind,
            depth,
            symbols.len(),
            children.len()
        );
        self.codeblocks.append(depth - 1, build(symbols, children));
        self.scopes.clear(depth);
        self.codeblocks.clear(depth);
        self.open.pop();
    }

    /// Close the scenario block and release every table.
    pub(crate) fn close_root(&mut self) -> (SymbolTable, CodeblockTable) {
        self.assert_innermost(BlockKind::Scenario);
        self.commit_staged();
        let symbols = self.scopes.table(0).snapshot();
        let children = self.codeblocks.table(0).snapshot();
        debug!(
            "close scenario block: {} symbols, {} children",
            symbols.len(),
            children.len()
        );
        self.scopes.dump();
        self.codeblocks.dump();
        self.open.pop();
        self.finished = true;
        (symbols, children)
    }

    /// Get the depth of the innermost open block.
    ///
    /// # Panics
    ///
    /// Panics if no block is open.
    pub(crate) fn depth(&self) -> usize {
        match self.current_scope() {
            Some(scope) => scope.depth(),
            None => panic!("no block is open"),
        }
    }

    fn assert_active(&self) {
        assert!(!self.finished, "the scenario is already finished");
    }

    fn assert_innermost(&self, kind: BlockKind) {
        self.assert_active();
        assert_eq!(
            self.current_block(),
            Some(kind),
            "cannot close a {} block here",
            kind
        );
    }
}

impl Default for AnalyzerContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::symbol::{Reserved, Variable};
    use crate::ast::{Once, Value};

    fn attack_context() -> AnalyzerContext {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Scenario);
        context.enter(BlockKind::Compound);
        context.enter(BlockKind::Once);
        context
    }

    #[test]
    fn test_block_scopes() {
        assert_eq!(BlockKind::Scenario.scope(), Scope::Scenario);
        assert_eq!(BlockKind::Compound.scope(), Scope::Compound);
        assert_eq!(BlockKind::Periodic.scope(), Scope::Attack);
        assert_eq!(BlockKind::Conditional.scope(), Scope::Attack);
    }

    #[test]
    fn test_enter_tracks_current_block() {
        let context = attack_context();
        assert_eq!(context.current_block(), Some(BlockKind::Once));
        assert_eq!(context.current_scope(), Some(Scope::Attack));
        assert!(!context.is_finished());
    }

    #[test]
    #[should_panic(expected = "cannot open at depth")]
    fn test_enter_out_of_order_panics() {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Once);
    }

    #[test]
    fn test_stage_deduplicates() {
        let mut context = attack_context();
        let first = context.stage(Symbol::Variable(Variable::literal(Value::Integer(2))));
        let second = context.stage(Symbol::Variable(Variable::literal(Value::Integer(2))));
        assert_eq!(first, "__2");
        assert_eq!(first, second);
        assert_eq!(context.staged().len(), 1);
        assert!(context.lookup("__2").is_some());
    }

    #[test]
    fn test_stage_skips_visible_symbols() {
        let mut context = attack_context();
        context.intern(0, Symbol::Reserved(Reserved::new("s")));
        context.stage(Symbol::Reserved(Reserved::new("s")));
        assert!(context.staged().is_empty());
    }

    #[test]
    fn test_commit_and_discard() {
        let mut context = attack_context();
        context.stage(Symbol::Reserved(Reserved::new("+")));
        context.commit_staged();
        assert!(context.staged().is_empty());
        assert!(context.scopes().table(2).contains("__+"));

        context.stage(Symbol::Reserved(Reserved::new("-")));
        context.discard_staged();
        assert!(context.lookup("__-").is_none());
    }

    #[test]
    fn test_define_visible_rejects_outer_names() {
        let mut context = attack_context();
        assert!(context.scopes_mut().declare(0, "x", crate::analyzer::SymbolKind::Variable));
        assert!(!context.define_visible(Symbol::Variable(Variable::declared("x"))));
        assert!(context.define_visible(Symbol::Variable(Variable::declared("y"))));
    }

    #[test]
    fn test_close_block_copies_then_clears() {
        let mut context = attack_context();
        context.define_visible(Symbol::Variable(Variable::with_value("v", Value::Integer(1))));
        context.close_block(BlockKind::Once, |symbols, children| {
            Codeblock::Once(Once { symbols, children })
        });

        assert!(context.scopes().table(2).is_empty());
        let parent = context.codeblocks().table(1);
        assert_eq!(parent.len(), 1);
        let symbols = parent.get(0).and_then(Codeblock::symbols).unwrap();
        assert!(symbols.contains("v"));
        assert_eq!(context.current_block(), Some(BlockKind::Compound));
    }

    #[test]
    fn test_close_root_finishes() {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Scenario);
        let (symbols, children) = context.close_root();
        assert!(symbols.is_empty());
        assert!(children.is_empty());
        assert!(context.is_finished());
        assert!(context.scopes().is_empty());
    }

    #[test]
    #[should_panic(expected = "already finished")]
    fn test_enter_after_finish_panics() {
        let mut context = AnalyzerContext::new();
        context.enter(BlockKind::Scenario);
        context.close_root();
        context.enter(BlockKind::Scenario);
    }
}
