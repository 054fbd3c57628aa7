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

//! Negative/Error tests for the AML analyzer.
//!
//! These tests verify that invalid scenarios are rejected with the right
//! error code, and that nothing is built past the first error.

use aml::{analyze, lexer, ErrorCategory, ErrorCode};
use test_case::test_case;

/// Wrap attack-block statements in a scenario with a few ready symbols.
fn in_once(body: &str) -> String {
    format!(
        r#"scenario {{
            variable i = 1
            variable r = 2.5
            variable text = "a"
            variable unset
            packet p
            from 0 s {{ once {{ {} }} }}
        }}"#,
        body
    )
}

fn error_code(source: &str) -> ErrorCode {
    match analyze(source) {
        Ok(scenario) => panic!("expected an error, got\n{}", scenario),
        Err(e) => e.code,
    }
}

// ============================================================================
// Lexer Error Tests
// ============================================================================

#[test_case("scenario { @ }", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("scenario { variable x = 1; }", ErrorCode::InvalidCharacter; "semicolon")]
#[test_case("scenario { variable _x }", ErrorCode::InvalidCharacter; "leading_underscore")]
#[test_case("scenario { variable x = \"open\n }", ErrorCode::UnterminatedString; "newline_in_string")]
#[test_case("scenario { variable x = \"open", ErrorCode::UnterminatedString; "eof_in_string")]
#[test_case("scenario { variable x = \"\\q\" }", ErrorCode::InvalidEscapeSequence; "invalid_escape")]
#[test_case("scenario { variable x = 99999999999999999999 }", ErrorCode::IntegerOutOfRange; "overflow")]
#[test_case(&format!("scenario {{ variable x = {}.0 }}", "9".repeat(400)), ErrorCode::InvalidRealLiteral; "infinite_real")]
fn test_lexer_errors(source: &str, expected: ErrorCode) {
    let err = lexer::tokenize(source).unwrap_err();
    assert_eq!(err.code, expected);
    assert_eq!(err.category(), ErrorCategory::Lexical);
}

// ============================================================================
// Syntax Error Tests
// ============================================================================

#[test_case("", ErrorCode::UnexpectedEndOfFile; "empty_source")]
#[test_case("scenario", ErrorCode::UnexpectedEndOfFile; "missing_brace")]
#[test_case("scenario { from 1 s { once {", ErrorCode::UnexpectedEndOfFile; "unclosed_blocks")]
#[test_case("scenario { } }", ErrorCode::UnexpectedToken; "trailing_brace")]
#[test_case("scenario { once { } }", ErrorCode::UnexpectedToken; "once_at_scenario_depth")]
#[test_case("scenario { from 1 s { from 2 s { } } }", ErrorCode::UnexpectedToken; "nested_compound")]
#[test_case("scenario { from 1 hours { } }", ErrorCode::UnexpectedToken; "unknown_unit")]
#[test_case("scenario { variable from }", ErrorCode::ExpectedIdentifier; "keyword_as_name")]
#[test_case("scenario { list l = [] }", ErrorCode::ExpectedLiteral; "empty_list")]
#[test_case("scenario { from 0 s { for nodes l { } } }", ErrorCode::UnexpectedToken; "missing_in")]
fn test_syntax_errors(source: &str, expected: ErrorCode) {
    let code = error_code(source);
    assert_eq!(code, expected);
    assert_eq!(code.category(), ErrorCategory::Syntax);
}

#[test]
fn test_deep_nesting_is_rejected() {
    let parens = format!("i = {}1{}", "(".repeat(500), ")".repeat(500));
    let negations = format!("i = {}1", "-".repeat(100_000));
    let filter = format!(
        "scenario {{ variable port = 1 filter f = {}port == 1 }}",
        "(".repeat(500)
    );
    for source in [in_once(&parens), in_once(&negations), filter] {
        let code = error_code(&source);
        assert_eq!(code, ErrorCode::NestingTooDeep);
        assert_eq!(code.category(), ErrorCategory::Syntax);
    }
}

#[test_case("i = +", ErrorCode::ExpectedLiteral; "lone_plus")]
#[test_case("i = ()", ErrorCode::ExpectedLiteral; "empty_parens")]
#[test_case("i = (1 + 2", ErrorCode::UnexpectedToken; "unclosed_paren")]
#[test_case("i == 1", ErrorCode::UnexpectedToken; "comparison_as_statement")]
#[test_case("destroyNode i", ErrorCode::UnexpectedToken; "call_without_parens")]
fn test_statement_syntax_errors(body: &str, expected: ErrorCode) {
    assert_eq!(error_code(&in_once(body)), expected);
}

// ============================================================================
// Declaration Conflicts
// ============================================================================

#[test_case("scenario { variable x variable x }"; "same_block")]
#[test_case("scenario { variable x packet x }"; "different_kinds")]
#[test_case("scenario { variable x from 0 s { variable x } }"; "compound_shadows_scenario")]
#[test_case("scenario { packet x from 0 s { once { variable x } } }"; "attack_shadows_scenario")]
#[test_case("scenario { from 0 s { list x = [1] once { filter x = 1 == 1 } } }"; "attack_shadows_compound")]
#[test_case("scenario { from 0 s { once { variable x variable x } } }"; "same_once_block")]
fn test_declaration_conflicts(source: &str) {
    let code = error_code(source);
    assert_eq!(code, ErrorCode::IdentifierAlreadyDeclared);
    assert_eq!(code.category(), ErrorCategory::DeclarationConflict);
}

// ============================================================================
// Unresolved References
// ============================================================================

#[test_case("i = ghost", ErrorCode::UndefinedIdentifier; "undefined_operand")]
#[test_case("ghost = 1", ErrorCode::UndefinedIdentifier; "undefined_target")]
#[test_case("destroyNode(ghost)", ErrorCode::UndefinedIdentifier; "undefined_argument")]
#[test_case("createPacket(i, \"udp\")", ErrorCode::WrongSymbolKind; "variable_as_packet")]
#[test_case("p = 1", ErrorCode::WrongSymbolKind; "packet_as_target")]
#[test_case("misplaceNode(i, i)", ErrorCode::WrongSymbolKind; "variable_as_position")]
fn test_unresolved_references(body: &str, expected: ErrorCode) {
    let code = error_code(&in_once(body));
    assert_eq!(code, expected);
    assert_eq!(code.category(), ErrorCategory::UnresolvedReference);
}

#[test_case("scenario { packet p list l = [p] }", ErrorCode::WrongSymbolKind; "packet_member")]
#[test_case("scenario { filter f = 1 == 1 list l = [f] }", ErrorCode::WrongSymbolKind; "filter_member")]
#[test_case("scenario { list a = [1] list b = [a] }", ErrorCode::WrongSymbolKind; "list_member")]
#[test_case("scenario { variable v list l = [v] }", ErrorCode::VariableUsedBeforeInit; "unset_member")]
fn test_list_members(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source), expected);
}

#[test]
fn test_conditional_undefined_filter() {
    let source = "scenario {
        list targets = [\"n1\"]
        from 0 s { for nodes in targets { for packets matching ghost { } } }
    }";
    assert_eq!(error_code(source), ErrorCode::UndefinedIdentifier);
}

#[test]
fn test_conditional_filter_declared_inside() {
    let source = "scenario {
        list targets = [\"n1\"]
        from 0 s { for nodes in targets { for packets matching f { filter f = 1 == 1 } } }
    }";
    assert_eq!(error_code(source), ErrorCode::UndefinedIdentifier);
}

#[test]
fn test_sibling_symbols_are_not_visible() {
    let source = "scenario { from 0 s { once { variable v = 1 } once { v += 1 } } }";
    assert_eq!(error_code(source), ErrorCode::UndefinedIdentifier);
}

// ============================================================================
// Uninitialized Use
// ============================================================================

#[test_case("i = unset + 1"; "operand")]
#[test_case("unset += 1"; "compound_target")]
#[test_case("destroyNode(unset)"; "argument")]
#[test_case("injectPacket(p, \"n\", tx, unset, s)"; "delay")]
fn test_uninitialized_use(body: &str) {
    let code = error_code(&in_once(body));
    assert_eq!(code, ErrorCode::VariableUsedBeforeInit);
    assert_eq!(code.category(), ErrorCategory::UninitializedUse);
}

// ============================================================================
// Type Errors
// ============================================================================

#[test_case("i = i - \"a\"", ErrorCode::TypeMismatch; "integer_minus_string")]
#[test_case("i = i + r", ErrorCode::TypeMismatch; "integer_plus_real")]
#[test_case("i = 1.0", ErrorCode::TypeMismatch; "assign_real_to_integer")]
#[test_case("i += text", ErrorCode::TypeMismatch; "compound_with_string")]
#[test_case("unset = 1 unset = \"x\"", ErrorCode::TypeMismatch; "type_fixed_by_first_assignment")]
#[test_case("text = text - text", ErrorCode::InvalidOperatorForType; "string_subtraction")]
#[test_case("text = text ** text", ErrorCode::InvalidOperatorForType; "string_power")]
#[test_case("text *= \"b\"", ErrorCode::InvalidOperatorForType; "string_multiply_assign")]
#[test_case("text = -text", ErrorCode::InvalidOperatorForType; "string_negation")]
#[test_case("createPacket(p, 17)", ErrorCode::TypeMismatch; "numeric_protocol")]
fn test_type_errors(body: &str, expected: ErrorCode) {
    let code = error_code(&in_once(body));
    assert_eq!(code, expected);
    assert_eq!(code.category(), ErrorCategory::TypeMismatch);
}

#[test]
fn test_filter_operand_types() {
    let source = "scenario { variable port = 80 filter f = port == \"80\" }";
    assert_eq!(error_code(source), ErrorCode::TypeMismatch);
}

#[test]
fn test_string_start_time() {
    let source = "scenario { variable t = \"soon\" from t s { } }";
    assert_eq!(error_code(source), ErrorCode::TypeMismatch);
}

// ============================================================================
// Domain Violations
// ============================================================================

#[test_case("scenario { from -1 s { } }"; "negative_start_literal")]
#[test_case("scenario { from -0.5 ms { } }"; "negative_real_start")]
#[test_case("scenario { variable t = -3 from t s { } }"; "negative_start_variable")]
#[test_case("scenario { from 0 s { every -2 s { } } }"; "negative_period")]
#[test_case("scenario { packet p from 0 s { once { injectPacket(p, \"n\", rx, -1, us) } } }"; "negative_delay")]
fn test_negative_times(source: &str) {
    let code = error_code(source);
    assert_eq!(code, ErrorCode::NegativeTime);
    assert_eq!(code.category(), ErrorCategory::DomainViolation);
}

// ============================================================================
// Placement Constraints
// ============================================================================

#[test_case("dropPacket(p)", ErrorCode::PrimitiveNotAllowed; "drop_in_once")]
#[test_case("forwardPacket(p, 1, s)", ErrorCode::PrimitiveNotAllowed; "forward_in_once")]
#[test_case("readField(i, p, \"ttl\")", ErrorCode::PrimitiveNotAllowed; "read_in_once")]
#[test_case("writeField(captured, \"ttl\", 1)", ErrorCode::CapturedOutsideConditional; "captured_in_once")]
#[test_case("clonePacket(p, p)", ErrorCode::IdenticalPackets; "clone_into_itself")]
fn test_constraints(body: &str, expected: ErrorCode) {
    let code = error_code(&in_once(body));
    assert_eq!(code, expected);
    assert_eq!(code.category(), ErrorCategory::Constraint);
}

// ============================================================================
// Error Positions
// ============================================================================

#[test]
fn test_error_span_points_at_duplicate() {
    let source = "scenario {\n  variable x\n  variable x\n}";
    let err = analyze(source).unwrap_err();
    assert_eq!(&source[err.span.start..err.span.end], "x");
    let location = aml::SourceLocation::from_offset(source, err.span.start);
    assert_eq!(location.line, 3);
}

#[test]
fn test_error_span_points_at_operator() {
    let source = in_once("i = i - \"a\"");
    let err = analyze(&source).unwrap_err();
    assert_eq!(&source[err.span.start..err.span.end], "-");
}
