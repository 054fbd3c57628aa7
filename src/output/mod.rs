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

//! Output rendering for AML.
//!
//! This module turns a finished scenario into text:
//! - Tree listings (the `Display` form of the scenario)
//! - XML documents
//!
//! and writes the result to a file or to stdout.

mod xml;

pub use xml::to_xml;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::ast::Scenario;

/// Determine the output format from a file extension.
pub fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "xml" => Some(OutputFormat::Xml),
        "txt" | "tree" => Some(OutputFormat::Tree),
        _ => None,
    }
}

/// The rendering of a finished scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented block listing.
    #[default]
    Tree,
    /// XML document.
    Xml,
}

/// Render a scenario in the specified format.
pub fn render(scenario: &Scenario, format: OutputFormat) -> String {
    match format {
        OutputFormat::Tree => scenario.to_string(),
        OutputFormat::Xml => to_xml(scenario),
    }
}

/// Write rendered output to a file, or to stdout when no path is given.
pub fn write_output(text: &str, path: Option<&Path>) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(text.as_bytes())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{SymbolTable, CodeblockTable};

    #[test]
    fn test_format_detection() {
        assert_eq!(
            format_from_extension(Path::new("scenario.xml")),
            Some(OutputFormat::Xml)
        );
        assert_eq!(
            format_from_extension(Path::new("scenario.XML")),
            Some(OutputFormat::Xml)
        );
        assert_eq!(
            format_from_extension(Path::new("scenario.txt")),
            Some(OutputFormat::Tree)
        );
        assert_eq!(format_from_extension(Path::new("scenario.aml")), None);
        assert_eq!(format_from_extension(Path::new("scenario")), None);
    }

    #[test]
    fn test_render_empty_scenario() {
        let scenario = Scenario {
            symbols: SymbolTable::new(),
            children: CodeblockTable::new(),
        };
        assert_eq!(render(&scenario, OutputFormat::Tree), "scenario {\n}\n");
        assert!(render(&scenario, OutputFormat::Xml).starts_with("<?xml version=\"1.0\"?>\n"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output("scenario {\n}\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "scenario {\n}\n");
    }
}
