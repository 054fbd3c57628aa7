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

//! Fuzz target for the complete AML analyzer pipeline.
//!
//! This fuzzer feeds random source code through the lexer, the parser
//! and both renderers to find crashes at any stage.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_analyzer
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_analyzer -- -max_total_time=60

#![no_main]

use aml::output::{render, OutputFormat};
use aml::SourceLocation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    match aml::analyze(source) {
        Ok(scenario) => {
            let _ = render(&scenario, OutputFormat::Tree);
            let _ = render(&scenario, OutputFormat::Xml);
        }
        Err(error) => {
            // Error positions must be reportable
            let _ = SourceLocation::from_offset(source, error.span.start);
            let _ = aml::format_error(&error, source, None);
        }
    }
});
