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

//! Token definitions for the AML language.

use logos::Logos;

/// The reason a piece of source text could not become a token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    /// No token pattern matches here.
    #[default]
    InvalidCharacter,
    /// A string literal contains an unknown escape sequence.
    InvalidEscape(char),
    /// An integer literal does not fit into 64 bits.
    IntegerOutOfRange,
    /// A real literal could not be parsed.
    InvalidReal,
}

/// A token in the AML language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Literals
    /// Integer literal.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Real literal (digits on both sides of the point).
    #[regex(r"[0-9]+\.[0-9]+", parse_real)]
    Real(f64),
    /// String literal, with escapes already resolved.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    String(String),
    /// Identifier chosen by the author of the scenario.
    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Block keywords
    /// `scenario` - the root block.
    #[token("scenario")]
    Scenario,
    /// `from` - a compound block starting at a given time.
    #[token("from")]
    From,
    /// `once` - an attack firing a single time.
    #[token("once")]
    Once,
    /// `every` - an attack firing periodically.
    #[token("every")]
    Every,
    /// `for` - part of a conditional attack header.
    #[token("for")]
    For,
    /// `nodes` - part of a conditional attack header.
    #[token("nodes")]
    Nodes,
    /// `packets` - part of a conditional attack header.
    #[token("packets")]
    Packets,
    /// `in` - part of a conditional attack header.
    #[token("in")]
    In,
    /// `matching` - part of a conditional attack header.
    #[token("matching")]
    Matching,

    // Argument keywords
    /// `captured` - the packet matched by a conditional attack.
    #[token("captured")]
    Captured,
    /// `self` - reserved.
    #[token("self")]
    SelfKeyword,
    /// `tx` - transmission direction.
    #[token("tx")]
    Tx,
    /// `rx` - reception direction.
    #[token("rx")]
    Rx,
    /// `us` - microseconds.
    #[token("us")]
    Microseconds,
    /// `ms` - milliseconds.
    #[token("ms")]
    Milliseconds,
    /// `s` - seconds.
    #[token("s", priority = 3)]
    Seconds,

    // Declaration keywords
    /// `variable` - variable declaration or definition.
    #[token("variable")]
    Variable,
    /// `packet` - packet declaration.
    #[token("packet")]
    Packet,
    /// `filter` - filter definition.
    #[token("filter")]
    Filter,
    /// `list` - list definition.
    #[token("list")]
    List,

    // Logical keywords
    /// `and` - logical AND inside filters.
    #[token("and")]
    And,
    /// `or` - logical OR inside filters.
    #[token("or")]
    Or,

    // Primitives
    #[token("disableComponent")]
    DisableComponent,
    #[token("deceiveComponent")]
    DeceiveComponent,
    #[token("destroyComponent")]
    DestroyComponent,
    #[token("misplaceNode")]
    MisplaceNode,
    #[token("destroyNode")]
    DestroyNode,
    #[token("writeField")]
    WriteField,
    #[token("readField")]
    ReadField,
    #[token("forwardPacket")]
    ForwardPacket,
    #[token("createPacket")]
    CreatePacket,
    #[token("injectPacket")]
    InjectPacket,
    #[token("clonePacket")]
    ClonePacket,
    #[token("dropPacket")]
    DropPacket,

    // Arithmetic operators
    /// `+` - addition or concatenation.
    #[token("+")]
    Plus,
    /// `-` - subtraction or negation.
    #[token("-")]
    Minus,
    /// `*` - multiplication.
    #[token("*")]
    Star,
    /// `/` - division.
    #[token("/")]
    Slash,
    /// `%` - modulo.
    #[token("%")]
    Percent,
    /// `**` - exponentiation.
    #[token("**")]
    StarStar,

    // Comparison operators
    /// `==` - equal.
    #[token("==")]
    EqualEqual,
    /// `!=` - not equal.
    #[token("!=")]
    BangEqual,
    /// `<` - less than.
    #[token("<")]
    Less,
    /// `>` - greater than.
    #[token(">")]
    Greater,
    /// `<=` - less or equal.
    #[token("<=")]
    LessEqual,
    /// `>=` - greater or equal.
    #[token(">=")]
    GreaterEqual,

    // Assignment operators
    /// `=` - assignment.
    #[token("=")]
    Equal,
    /// `+=` - add assign.
    #[token("+=")]
    PlusAssign,
    /// `-=` - subtract assign.
    #[token("-=")]
    MinusAssign,
    /// `*=` - multiply assign.
    #[token("*=")]
    StarAssign,
    /// `/=` - divide assign.
    #[token("/=")]
    SlashAssign,
    /// `%=` - modulo assign.
    #[token("%=")]
    PercentAssign,

    // Punctuation
    /// `(` - left parenthesis.
    #[token("(")]
    LeftParen,
    /// `)` - right parenthesis.
    #[token(")")]
    RightParen,
    /// `[` - left bracket.
    #[token("[")]
    LeftBracket,
    /// `]` - right bracket.
    #[token("]")]
    RightBracket,
    /// `{` - left brace.
    #[token("{")]
    LeftBrace,
    /// `}` - right brace.
    #[token("}")]
    RightBrace,
    /// `,` - comma.
    #[token(",")]
    Comma,
}

fn parse_integer(lex: &mut logos::Lexer<Token>) -> Result<i64, LexError> {
    lex.slice()
        .parse()
        .map_err(|_| LexError::IntegerOutOfRange)
}

fn parse_real(lex: &mut logos::Lexer<Token>) -> Result<f64, LexError> {
    match lex.slice().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LexError::InvalidReal),
    }
}

fn parse_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => value.push('"'),
            Some('\\') => value.push('\\'),
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => return Err(LexError::InvalidEscape(other)),
            None => return Err(LexError::InvalidEscape('\\')),
        }
    }
    Ok(value)
}

impl Token {
    /// Check if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Scenario
                | Token::From
                | Token::Once
                | Token::Every
                | Token::For
                | Token::Nodes
                | Token::Packets
                | Token::In
                | Token::Matching
                | Token::Captured
                | Token::SelfKeyword
                | Token::Tx
                | Token::Rx
                | Token::Microseconds
                | Token::Milliseconds
                | Token::Seconds
                | Token::Variable
                | Token::Packet
                | Token::Filter
                | Token::List
                | Token::And
                | Token::Or
        ) || self.is_primitive()
    }

    /// Check if this token names a primitive statement.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Token::DisableComponent
                | Token::DeceiveComponent
                | Token::DestroyComponent
                | Token::MisplaceNode
                | Token::DestroyNode
                | Token::WriteField
                | Token::ReadField
                | Token::ForwardPacket
                | Token::CreatePacket
                | Token::InjectPacket
                | Token::ClonePacket
                | Token::DropPacket
        )
    }

    /// Check if this token starts a declaration.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Token::Variable | Token::Packet | Token::Filter | Token::List
        )
    }

    /// Get a human-readable name for this token type.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Integer(_) => "integer",
            Token::Real(_) => "real",
            Token::String(_) => "string",
            Token::Identifier(_) => "identifier",
            Token::Scenario => "'scenario'",
            Token::From => "'from'",
            Token::Once => "'once'",
            Token::Every => "'every'",
            Token::For => "'for'",
            Token::Nodes => "'nodes'",
            Token::Packets => "'packets'",
            Token::In => "'in'",
            Token::Matching => "'matching'",
            Token::Captured => "'captured'",
            Token::SelfKeyword => "'self'",
            Token::Tx => "'tx'",
            Token::Rx => "'rx'",
            Token::Microseconds => "'us'",
            Token::Milliseconds => "'ms'",
            Token::Seconds => "'s'",
            Token::Variable => "'variable'",
            Token::Packet => "'packet'",
            Token::Filter => "'filter'",
            Token::List => "'list'",
            Token::And => "'and'",
            Token::Or => "'or'",
            Token::DisableComponent => "'disableComponent'",
            Token::DeceiveComponent => "'deceiveComponent'",
            Token::DestroyComponent => "'destroyComponent'",
            Token::MisplaceNode => "'misplaceNode'",
            Token::DestroyNode => "'destroyNode'",
            Token::WriteField => "'writeField'",
            Token::ReadField => "'readField'",
            Token::ForwardPacket => "'forwardPacket'",
            Token::CreatePacket => "'createPacket'",
            Token::InjectPacket => "'injectPacket'",
            Token::ClonePacket => "'clonePacket'",
            Token::DropPacket => "'dropPacket'",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Percent => "'%'",
            Token::StarStar => "'**'",
            Token::EqualEqual => "'=='",
            Token::BangEqual => "'!='",
            Token::Less => "'<'",
            Token::Greater => "'>'",
            Token::LessEqual => "'<='",
            Token::GreaterEqual => "'>='",
            Token::Equal => "'='",
            Token::PlusAssign => "'+='",
            Token::MinusAssign => "'-='",
            Token::StarAssign => "'*='",
            Token::SlashAssign => "'/='",
            Token::PercentAssign => "'%='",
            Token::LeftParen => "'('",
            Token::RightParen => "')'",
            Token::LeftBracket => "'['",
            Token::RightBracket => "']'",
            Token::LeftBrace => "'{'",
            Token::RightBrace => "'}'",
            Token::Comma => "','",
        }
    }

    /// The source text of a keyword or operator token, without quotes.
    ///
    /// Returns `None` for literals and identifiers.
    pub fn lexeme(&self) -> Option<&'static str> {
        match self {
            Token::Integer(_) | Token::Real(_) | Token::String(_) | Token::Identifier(_) => None,
            _ => Some(self.name().trim_matches('\'')),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Real(r) => write!(f, "{:?}", r),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Identifier(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.name()),
        }
    }
}
