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

//! Lexer module for the AML front end.
//!
//! This module tokenizes AML source code into a stream of tokens.
//! It handles:
//! - Keywords, primitive names and identifiers
//! - Integer, real and string literals
//! - Operators and punctuation
//! - Comments (starting with #)
//!
//! Signs are not part of numeric literals; `-5` is a minus token followed
//! by `5` and the parser decides what the sign means.

mod tokens;

pub use tokens::{LexError, Token};

use logos::Logos;

use crate::error::{CompileError, ErrorCode, Result, Span};

/// Tokenize source code into a vector of tokens with their spans.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(error) => return Err(lex_error(error, source, span)),
        }
    }

    log::trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

fn lex_error(error: LexError, source: &str, span: Span) -> CompileError {
    let text = &source[span.start..span.end];
    match error {
        LexError::InvalidCharacter if text.starts_with('"') => {
            let line_end = source[span.start..]
                .find('\n')
                .map(|i| span.start + i)
                .unwrap_or(source.len());
            CompileError::new(
                ErrorCode::UnterminatedString,
                "Unterminated string literal",
                Span::new(span.start, line_end),
            )
            .with_hint("Close the string with '\"' before the end of the line")
        }
        LexError::InvalidCharacter => CompileError::new(
            ErrorCode::InvalidCharacter,
            format!("Invalid character '{}'", text.chars().next().unwrap_or('?')),
            span,
        ),
        LexError::InvalidEscape(c) => CompileError::new(
            ErrorCode::InvalidEscapeSequence,
            format!("Invalid escape sequence '\\{}'", c),
            span,
        )
        .with_hint("Valid escapes are \\\", \\\\, \\n, \\t and \\r"),
        LexError::IntegerOutOfRange => CompileError::new(
            ErrorCode::IntegerOutOfRange,
            format!("Integer literal '{}' does not fit into 64 bits", text),
            span,
        ),
        LexError::InvalidReal => CompileError::new(
            ErrorCode::InvalidRealLiteral,
            format!("Invalid real literal '{}'", text),
            span,
        ),
    }
}
