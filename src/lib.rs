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

//! AML - Scoped semantic analyzer for the Attack Modeling Language.
//!
//! This library turns AML scenario descriptions into a checked tree of
//! codeblocks, ready for a simulator or renderer to walk.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Recursive-descent driver of the analyzer
//! - [`ast`] - The finished scenario tree
//! - [`analyzer`] - Scoped symbol tables, type checking and tree building
//! - [`output`] - Tree and XML rendering
//!
//! # Example
//!
//! ```no_run
//! use aml::{lexer, output, parser};
//!
//! fn render(source: &str) -> Result<String, Box<dyn std::error::Error>> {
//!     // Tokenize
//!     let tokens = lexer::tokenize(source)?;
//!
//!     // Parse and analyze
//!     let scenario = parser::parse(&tokens)?;
//!
//!     // Render
//!     Ok(output::render(&scenario, output::OutputFormat::Xml))
//! }
//! ```

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use analyzer::{
    AnalyzerContext, CodeblockHandler, CodeblockTable, Scope, ScopeHandler, Symbol, SymbolKind,
    SymbolTable,
};
pub use ast::{Codeblock, Primitive, Scenario, Value, ValueType};
pub use error::{format_error, CompileError, ErrorCategory, ErrorCode, Result, SourceLocation, Span};
pub use lexer::{tokenize, Token};
pub use parser::parse;

/// The version of the AML analyzer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the language.
pub const NAME: &str = "AML";

/// Analyze source code into a scenario tree.
///
/// This is the main entry point. It tokenizes the source and parses it,
/// running every semantic check while the tree is built. The first error
/// aborts the analysis.
///
/// # Example
///
/// ```no_run
/// let source = r#"
/// scenario {
///     variable x = 1
///     from 5 s {
///         once { x += 2 }
///     }
/// }
/// "#;
///
/// match aml::analyze(source) {
///     Ok(scenario) => print!("{}", scenario),
///     Err(e) => eprintln!("Analysis error: {}", e),
/// }
/// ```
pub fn analyze(source: &str) -> Result<Scenario> {
    // Tokenize
    let tokens = lexer::tokenize(source)?;

    // Parse and analyze
    parser::parse(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "AML");
    }

    #[test]
    fn test_analyze_reports_lexical_errors() {
        let err = analyze("scenario { $ }").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCharacter);
    }

    #[test]
    fn test_analyze_builds_tree() {
        let scenario = analyze("scenario { from 1 s { once { } } }").unwrap();
        assert_eq!(scenario.compounds().count(), 1);
    }
}
