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

//! Error types for the AML front end.
//!
//! This module defines all error types used throughout the analyzer,
//! including lexical, syntax, and semantic errors, and the two report
//! renderers used by the command-line driver.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span from a range.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error codes reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical errors (E001-E025)
    InvalidCharacter,
    UnterminatedString,
    InvalidEscapeSequence,
    IntegerOutOfRange,
    InvalidRealLiteral,

    // Syntax errors (E100-E122)
    UnexpectedToken,
    UnexpectedEndOfFile,
    ExpectedIdentifier,
    NestingTooDeep,
    ExpectedLiteral,

    // Semantic errors (E200-E242)
    UndefinedIdentifier,
    IdentifierAlreadyDeclared,
    WrongSymbolKind,
    VariableUsedBeforeInit,
    TypeMismatch,
    InvalidOperatorForType,
    NegativeTime,
    IdenticalPackets,
    PrimitiveNotAllowed,
    CapturedOutsideConditional,
}

/// The broad family an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The source text could not be split into tokens.
    Lexical,
    /// The token stream does not match the grammar.
    Syntax,
    /// A name is already visible in the enclosing scope chain.
    DeclarationConflict,
    /// A name is not visible, or names a symbol of the wrong kind.
    UnresolvedReference,
    /// A variable is read before its type is fixed.
    UninitializedUse,
    /// Operand types disagree, or an operator does not support a type.
    TypeMismatch,
    /// A value lies outside the range the language allows.
    DomainViolation,
    /// A statement breaks a placement or argument rule.
    Constraint,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::UnterminatedString => "E010",
            ErrorCode::InvalidEscapeSequence => "E012",
            ErrorCode::IntegerOutOfRange => "E020",
            ErrorCode::InvalidRealLiteral => "E025",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",
            ErrorCode::ExpectedIdentifier => "E105",
            ErrorCode::NestingTooDeep => "E110",
            ErrorCode::ExpectedLiteral => "E122",

            // Semantic errors
            ErrorCode::UndefinedIdentifier => "E200",
            ErrorCode::IdentifierAlreadyDeclared => "E201",
            ErrorCode::WrongSymbolKind => "E202",
            ErrorCode::VariableUsedBeforeInit => "E203",
            ErrorCode::TypeMismatch => "E210",
            ErrorCode::InvalidOperatorForType => "E212",
            ErrorCode::NegativeTime => "E230",
            ErrorCode::IdenticalPackets => "E240",
            ErrorCode::PrimitiveNotAllowed => "E241",
            ErrorCode::CapturedOutsideConditional => "E242",
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::InvalidCharacter
            | ErrorCode::UnterminatedString
            | ErrorCode::InvalidEscapeSequence
            | ErrorCode::IntegerOutOfRange
            | ErrorCode::InvalidRealLiteral => ErrorCategory::Lexical,

            ErrorCode::UnexpectedToken
            | ErrorCode::UnexpectedEndOfFile
            | ErrorCode::ExpectedIdentifier
            | ErrorCode::NestingTooDeep
            | ErrorCode::ExpectedLiteral => ErrorCategory::Syntax,

            ErrorCode::IdentifierAlreadyDeclared => ErrorCategory::DeclarationConflict,
            ErrorCode::UndefinedIdentifier | ErrorCode::WrongSymbolKind => {
                ErrorCategory::UnresolvedReference
            }
            ErrorCode::VariableUsedBeforeInit => ErrorCategory::UninitializedUse,
            ErrorCode::TypeMismatch | ErrorCode::InvalidOperatorForType => {
                ErrorCategory::TypeMismatch
            }
            ErrorCode::NegativeTime => ErrorCategory::DomainViolation,
            ErrorCode::IdenticalPackets
            | ErrorCode::PrimitiveNotAllowed
            | ErrorCode::CapturedOutsideConditional => ErrorCategory::Constraint,
        }
    }
}

/// An analysis error with source location.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

/// Result type for analyzer operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The content of the line.
    pub line_content: String,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];

        let line = before.chars().filter(|&c| c == '\n').count() + 1;

        let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[last_newline..].chars().count() + 1;

        let line_end = source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        let line_content = source[last_newline..line_end].to_string();

        Self {
            line,
            column,
            line_content,
        }
    }
}

/// Format an error with source context.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let loc = SourceLocation::from_offset(source, error.span.start);
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();

    output.push_str(&format!("error[{}]: {}\n", error.code_str(), error.message));
    output.push_str(&format!("  --> {}:{}:{}\n", filename, loc.line, loc.column));

    let line_num_width = loc.line.to_string().len();
    output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
    output.push_str(&format!(
        "{:>width$} | {}\n",
        loc.line,
        loc.line_content,
        width = line_num_width
    ));

    let underline_start = loc.column - 1;
    let underline_len = error
        .span
        .len()
        .max(1)
        .min(loc.line_content.len().saturating_sub(underline_start).max(1));
    output.push_str(&format!(
        "{:>width$} | {:>start$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
        width = line_num_width,
        start = underline_start
    ));

    if let Some(hint) = &error.hint {
        output.push_str(&format!(
            "{:>width$} = hint: {}\n",
            "",
            hint,
            width = line_num_width
        ));
    }

    output
}

/// Print an error report with source context to stderr.
///
/// The span is translated from byte offsets into the character offsets
/// expected by `ariadne`.
pub fn eprint_report(
    error: &CompileError,
    source: &str,
    filename: &str,
    color: bool,
) -> std::io::Result<()> {
    let start = char_offset(source, error.span.start);
    let end = char_offset(source, error.span.end).max(start + 1);

    let mut report = Report::build(ReportKind::Error, filename, start)
        .with_config(Config::default().with_color(color))
        .with_code(error.code_str())
        .with_message(&error.message)
        .with_label(
            Label::new((filename, start..end))
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some(hint) = &error.hint {
        report = report.with_help(hint);
    }

    report
        .finish()
        .eprint((filename, Source::from(source.to_string())))
}

fn char_offset(source: &str, byte_offset: usize) -> usize {
    let mut offset = byte_offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    source[..offset].chars().count()
}
