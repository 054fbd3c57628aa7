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

//! Value types for the AML language.

/// The type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point number.
    Real,
    /// Text string.
    String,
    /// Not fixed yet; the first assignment decides.
    Unset,
}

impl ValueType {
    /// Check if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Real)
    }

    /// Check if the type has been fixed.
    pub fn is_set(&self) -> bool {
        !matches!(self, ValueType::Unset)
    }

    /// Get the name of this type as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Real => "real",
            ValueType::String => "string",
            ValueType::Unset => "unset",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A literal value carried by a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    String(String),
}

impl Value {
    /// Get the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Real(_) => ValueType::Real,
            Value::String(_) => ValueType::String,
        }
    }

    /// Check if this is a number below zero.
    pub fn is_negative(&self) -> bool {
        match self {
            Value::Integer(n) => *n < 0,
            Value::Real(r) => *r < 0.0,
            Value::String(_) => false,
        }
    }

    /// The numeric value as a real, if this is a number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Real(r) => Some(*r),
            Value::String(_) => None,
        }
    }

    /// The value with its sign flipped.
    ///
    /// Strings have no sign and are returned unchanged.
    pub fn negated(self) -> Value {
        match self {
            Value::Integer(n) => Value::Integer(n.wrapping_neg()),
            Value::Real(r) => Value::Real(-r),
            Value::String(s) => Value::String(s),
        }
    }

    /// The canonical text form used to build literal identifiers.
    ///
    /// Reals always carry a fractional part or exponent and strings are
    /// quoted and escaped, so values of different types never share a form.
    pub fn canonical_text(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Real(r) => format!("{:?}", r),
            Value::String(s) => format!("{:?}", s),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_text())
    }
}

/// The unit of a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// The keyword spelling this unit in source code.
    pub fn keyword(&self) -> &'static str {
        match self {
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }
}

/// The direction a packet is injected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Outgoing from the node.
    Tx,
    /// Incoming to the node.
    Rx,
}

impl Direction {
    /// The keyword spelling this direction in source code.
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Tx => "tx",
            Direction::Rx => "rx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::Integer(1).value_type(), ValueType::Integer);
        assert_eq!(Value::Real(1.5).value_type(), ValueType::Real);
        assert_eq!(
            Value::String("a".to_string()).value_type(),
            ValueType::String
        );
    }

    #[test]
    fn test_canonical_text_distinguishes_types() {
        assert_eq!(Value::Integer(5).canonical_text(), "5");
        assert_eq!(Value::Real(5.0).canonical_text(), "5.0");
        assert_eq!(Value::String("5".to_string()).canonical_text(), "\"5\"");
        assert_eq!(
            Value::String("a\"b".to_string()).canonical_text(),
            "\"a\\\"b\""
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(Value::Integer(3).negated(), Value::Integer(-3));
        assert_eq!(Value::Real(0.5).negated(), Value::Real(-0.5));
        assert!(Value::Integer(-1).is_negative());
        assert!(!Value::Real(0.0).is_negative());
    }

    #[test]
    fn test_is_numeric() {
        assert!(ValueType::Integer.is_numeric());
        assert!(ValueType::Real.is_numeric());
        assert!(!ValueType::String.is_numeric());
        assert!(!ValueType::Unset.is_set());
    }
}
