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

//! XML rendering.
//!
//! Every block becomes a `<codeblock>` element wrapping an element named
//! after its kind. Inside it come the block's attributes as plain
//! elements, then its `<symboltable>` and its `<codeblocktable>`. Symbols
//! are wrapped the same way in `<symbol>` elements.

use crate::analyzer::{CodeblockTable, Symbol, SymbolTable};
use crate::ast::{Codeblock, Primitive, Scenario};

const INDENT: &str = "  ";

/// Render a scenario as an XML document.
pub fn to_xml(scenario: &Scenario) -> String {
    let mut writer = XmlWriter::default();
    writer.raw(0, "<?xml version=\"1.0\"?>");
    writer.open(0, "codeblock");
    writer.open(1, "scenario");
    writer.symbol_table(2, &scenario.symbols);
    writer.codeblock_table(2, &scenario.children);
    writer.close(1, "scenario");
    writer.close(0, "codeblock");
    writer.out
}

#[derive(Default)]
struct XmlWriter {
    out: String,
}

impl XmlWriter {
    fn raw(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, indent: usize, name: &str) {
        self.raw(indent, &format!("<{}>", name));
    }

    fn close(&mut self, indent: usize, name: &str) {
        self.raw(indent, &format!("</{}>", name));
    }

    fn element(&mut self, indent: usize, name: &str, text: &str) {
        self.raw(indent, &format!("<{0}>{1}</{0}>", name, escape(text)));
    }

    fn items(&mut self, indent: usize, name: &str, items: &[String]) {
        self.open(indent, name);
        for item in items {
            self.element(indent + 1, "item", item);
        }
        self.close(indent, name);
    }

    fn symbol_table(&mut self, indent: usize, table: &SymbolTable) {
        self.open(indent, "symboltable");
        for symbol in table {
            self.symbol(indent + 1, symbol);
        }
        self.close(indent, "symboltable");
    }

    fn symbol(&mut self, indent: usize, symbol: &Symbol) {
        let kind = symbol.kind().name();
        self.open(indent, "symbol");
        self.open(indent + 1, kind);
        self.element(indent + 2, "identifier", symbol.identifier());
        match symbol {
            Symbol::Variable(variable) => {
                self.element(indent + 2, "type", variable.value_type().name());
                if let Some(value) = variable.value() {
                    self.element(indent + 2, "value", &value.canonical_text());
                }
            }
            Symbol::Packet(_) => {}
            Symbol::Filter(filter) => self.items(indent + 2, "items", &filter.items),
            Symbol::List(list) => self.items(indent + 2, "items", &list.items),
            Symbol::Reserved(reserved) => self.element(indent + 2, "keyword", &reserved.keyword),
        }
        self.close(indent + 1, kind);
        self.close(indent, "symbol");
    }

    fn codeblock_table(&mut self, indent: usize, table: &CodeblockTable) {
        self.open(indent, "codeblocktable");
        for codeblock in table {
            self.codeblock(indent + 1, codeblock);
        }
        self.close(indent, "codeblocktable");
    }

    fn codeblock(&mut self, indent: usize, codeblock: &Codeblock) {
        if let Codeblock::Primitive(primitive) = codeblock {
            self.primitive(indent, primitive);
            return;
        }

        let kind = codeblock.kind_name();
        self.open(indent, "codeblock");
        self.open(indent + 1, kind);
        match codeblock {
            Codeblock::Compound(block) => {
                self.element(indent + 2, "start_time", &block.start_time);
                self.element(indent + 2, "time_unit", &block.time_unit);
            }
            Codeblock::Periodic(block) => {
                self.element(indent + 2, "period", &block.period);
                self.element(indent + 2, "time_unit", &block.time_unit);
            }
            Codeblock::Conditional(block) => {
                self.element(indent + 2, "target_nodes", &block.target_nodes);
                self.element(indent + 2, "filter", &block.filter);
            }
            Codeblock::Once(_) | Codeblock::Primitive(_) => {}
        }
        if let Some(symbols) = codeblock.symbols() {
            self.symbol_table(indent + 2, symbols);
        }
        if let Some(children) = codeblock.children() {
            self.codeblock_table(indent + 2, children);
        }
        self.close(indent + 1, kind);
        self.close(indent, "codeblock");
    }

    fn primitive(&mut self, indent: usize, primitive: &Primitive) {
        let name = primitive.name().to_lowercase();
        self.open(indent, "primitive");
        self.open(indent + 1, &name);
        match primitive {
            Primitive::Expression {
                destination,
                tokens,
            } => {
                self.element(indent + 2, "destination", destination);
                self.items(indent + 2, "tokens", tokens);
            }
            _ => {
                for (field, value) in primitive.fields() {
                    self.element(indent + 2, field, &value);
                }
            }
        }
        self.close(indent + 1, &name);
        self.close(indent, "primitive");
    }
}

/// Escape text for use inside an XML element.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
