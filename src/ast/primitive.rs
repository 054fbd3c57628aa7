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

//! Primitive statements.
//!
//! Primitives are the leaves of a scenario. Every field is the identifier
//! of a symbol; literals have been turned into synthetic variables before a
//! primitive is built.

/// A primitive statement inside an attack block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    DisableComponent {
        node: String,
        component: String,
    },
    DeceiveComponent {
        node: String,
        component: String,
        value: String,
    },
    DestroyComponent {
        node: String,
        component: String,
    },
    MisplaceNode {
        node: String,
        position: String,
    },
    DestroyNode {
        node: String,
    },
    WriteField {
        packet: String,
        path: String,
        source: String,
    },
    ReadField {
        destination: String,
        packet: String,
        path: String,
    },
    ForwardPacket {
        packet: String,
        delay: String,
        time_unit: String,
    },
    CreatePacket {
        packet: String,
        protocol: String,
    },
    InjectPacket {
        packet: String,
        node: String,
        direction: String,
        delay: String,
        time_unit: String,
    },
    ClonePacket {
        destination: String,
        source: String,
    },
    DropPacket {
        packet: String,
    },
    /// An assignment, with its right-hand side in postfix order.
    Expression {
        destination: String,
        tokens: Vec<String>,
    },
}

impl Primitive {
    /// The name of this primitive as written in source code.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::DisableComponent { .. } => "disableComponent",
            Primitive::DeceiveComponent { .. } => "deceiveComponent",
            Primitive::DestroyComponent { .. } => "destroyComponent",
            Primitive::MisplaceNode { .. } => "misplaceNode",
            Primitive::DestroyNode { .. } => "destroyNode",
            Primitive::WriteField { .. } => "writeField",
            Primitive::ReadField { .. } => "readField",
            Primitive::ForwardPacket { .. } => "forwardPacket",
            Primitive::CreatePacket { .. } => "createPacket",
            Primitive::InjectPacket { .. } => "injectPacket",
            Primitive::ClonePacket { .. } => "clonePacket",
            Primitive::DropPacket { .. } => "dropPacket",
            Primitive::Expression { .. } => "expression",
        }
    }

    /// Check if this primitive acts on a captured packet and therefore
    /// only makes sense inside a conditional block.
    pub fn is_conditional_only(&self) -> bool {
        matches!(
            self,
            Primitive::ReadField { .. } | Primitive::ForwardPacket { .. } | Primitive::DropPacket { .. }
        )
    }

    /// The named fields of this primitive, in argument order.
    ///
    /// The postfix tokens of an expression are joined with spaces.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Primitive::DisableComponent { node, component }
            | Primitive::DestroyComponent { node, component } => {
                vec![("node", node.clone()), ("component", component.clone())]
            }
            Primitive::DeceiveComponent {
                node,
                component,
                value,
            } => vec![
                ("node", node.clone()),
                ("component", component.clone()),
                ("value", value.clone()),
            ],
            Primitive::MisplaceNode { node, position } => {
                vec![("node", node.clone()), ("position", position.clone())]
            }
            Primitive::DestroyNode { node } => vec![("node", node.clone())],
            Primitive::WriteField {
                packet,
                path,
                source,
            } => vec![
                ("packet", packet.clone()),
                ("path", path.clone()),
                ("source", source.clone()),
            ],
            Primitive::ReadField {
                destination,
                packet,
                path,
            } => vec![
                ("destination", destination.clone()),
                ("packet", packet.clone()),
                ("path", path.clone()),
            ],
            Primitive::ForwardPacket {
                packet,
                delay,
                time_unit,
            } => vec![
                ("packet", packet.clone()),
                ("delay", delay.clone()),
                ("time_unit", time_unit.clone()),
            ],
            Primitive::CreatePacket { packet, protocol } => {
                vec![("packet", packet.clone()), ("protocol", protocol.clone())]
            }
            Primitive::InjectPacket {
                packet,
                node,
                direction,
                delay,
                time_unit,
            } => vec![
                ("packet", packet.clone()),
                ("node", node.clone()),
                ("direction", direction.clone()),
                ("delay", delay.clone()),
                ("time_unit", time_unit.clone()),
            ],
            Primitive::ClonePacket {
                destination,
                source,
            } => vec![
                ("destination", destination.clone()),
                ("source", source.clone()),
            ],
            Primitive::DropPacket { packet } => vec![("packet", packet.clone())],
            Primitive::Expression {
                destination,
                tokens,
            } => vec![
                ("destination", destination.clone()),
                ("tokens", tokens.join(" ")),
            ],
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Expression {
                destination,
                tokens,
            } => write!(f, "{} = [{}]", destination, tokens.join(", ")),
            _ => {
                let arguments: Vec<String> =
                    self.fields().into_iter().map(|(_, value)| value).collect();
                write!(f, "{}({})", self.name(), arguments.join(", "))
            }
        }
    }
}
