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

//! Command-line front end of the AML analyzer.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use log::{debug, LevelFilter};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aml::error::eprint_report;
use aml::output::{format_from_extension, render, write_output, OutputFormat};

/// What to print for an analyzed scenario.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// Indented block listing
    Tree,
    /// XML document
    Xml,
    /// Nothing; only check the sources
    None,
}

/// AML - Scoped semantic analyzer for the Attack Modeling Language
#[derive(Parser, Debug)]
#[command(name = "aml")]
#[command(author = "Marcel Joachim Kloubert")]
#[command(version)]
#[command(about = "Checks AML attack scenarios and prints their codeblock tree")]
#[command(long_about = r#"
AML analyzes attack scenarios written in the Attack Modeling Language.
Every scenario is checked for scoping, typing and placement errors and
turned into a tree of codeblocks.

The output can be either:
  - tree - An indented listing of blocks and their symbols
  - xml  - An XML document
  - none - Nothing; the exit code tells whether the scenario is valid

Exit codes:
  0 - All scenarios are valid
  1 - At least one scenario has an analysis error
  2 - Invalid command line, or a source file cannot be read
  3 - The output cannot be written

Example usage:
  aml attack.aml
  aml attack.aml --emit xml -o attack.xml
  aml *.aml --emit none
"#)]
struct Cli {
    /// Source files to analyze (.aml)
    #[arg(required = true)]
    source_files: Vec<PathBuf>,

    /// Output file. Only valid with a single source file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (defaults to the output file extension, then tree)
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn output_format(cli: &Cli) -> Option<OutputFormat> {
    match cli.emit {
        Some(Emit::Tree) => Some(OutputFormat::Tree),
        Some(Emit::Xml) => Some(OutputFormat::Xml),
        Some(Emit::None) => None,
        None => Some(
            cli.output
                .as_deref()
                .and_then(format_from_extension)
                .unwrap_or_default(),
        ),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<input>".to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.output.is_some() && cli.source_files.len() > 1 {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--output can only be used with a single source file",
            )
            .exit();
    }
    init_logging(&cli);

    let format = output_format(&cli);
    debug!("{} v{}, format {:?}", aml::NAME, aml::VERSION, format);

    let color = std::io::stderr().is_terminal();
    let mut failed = false;

    for path in &cli.source_files {
        let source = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Cannot read {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        };

        debug!("analyzing {}", path.display());
        let scenario = match aml::analyze(&source) {
            Ok(scenario) => scenario,
            Err(e) => {
                if eprint_report(&e, &source, &display_name(path), color).is_err() {
                    eprintln!("{}: {}", path.display(), e);
                }
                failed = true;
                continue;
            }
        };

        let Some(format) = format else {
            continue;
        };
        let text = render(&scenario, format);
        if let Err(e) = write_output(&text, cli.output.as_deref()) {
            let target = cli
                .output
                .as_deref()
                .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
            eprintln!("Error: Cannot write {}: {}", target, e);
            return ExitCode::from(3);
        }
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
