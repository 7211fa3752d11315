//! Error reporting tests
//!
//! Every failure kind maps to a stable error code, and diagnostics render
//! the same way for humans and tools.

mod common;

use common::*;
#[allow(unused_imports)]
use common::{assert_eq, assert_ne};
use lol_runtime::{Diagnostic, DiagnosticFormatter, LolError};
use rstest::rstest;

// ============================================================================
// Error codes
// ============================================================================

#[rstest]
#[case::undeclared_variable("VISIBLE MISSING", "LOL0001")]
#[case::duplicate_declaration("I HAS A X\nI HAS A X ITZ 2", "LOL0002")]
#[case::type_error("VISIBLE SUM OF 1 AN \"2\"", "LOL0003")]
#[case::division_by_zero("VISIBLE QUOSHUNT OF 1 AN 0", "LOL0004")]
#[case::float_division_by_zero("VISIBLE QUOSHUNT OF 1.5 AN 0.0", "LOL0004")]
#[case::integer_overflow("VISIBLE SUM OF 9223372036854775807 AN 1", "LOL0005")]
#[case::arity_mismatch(
    "HOW IZ I F YR N\nFOUND YR N\nIF U SAY SO\nF YR 1 AN YR 2",
    "LOL0006"
)]
#[case::not_a_function("I HAS A X ITZ 1\nX YR 2", "LOL0007")]
#[case::not_a_class("I HAS A X ITZ NEW NOPE", "LOL0008")]
#[case::not_an_instance("I HAS A X ITZ 1\nVISIBLE X'Z Y", "LOL0009")]
#[case::not_an_array("I HAS A X ITZ 1\nVISIBLE X AT 0", "LOL0010")]
#[case::no_such_member("O HAI IM T\nKTHX\nVISIBLE NEW T'Z NOPE", "LOL0011")]
#[case::self_outside_method("VISIBLE ME", "LOL0012")]
#[case::index_not_integer("I HAS A A1 ITZ BUKKIT\nVISIBLE A1 AT \"0\"", "LOL0013")]
#[case::negative_index("I HAS A A1 ITZ BUKKIT\nA1 AT -1 R 0", "LOL0014")]
#[case::unsupported_coercion("VISIBLE MAEK 1 A NUMBR", "LOL0015")]
#[case::return_outside_function("FOUND YR 1", "LOL0016")]
#[case::stack_overflow("HOW IZ I LOOP\nFOUND YR LOOP\nIF U SAY SO\nVISIBLE LOOP", "LOL9001")]
#[case::self_constructing_class(
    "O HAI IM NODE\nI HAS A NEXT ITZ NEW NODE\nKTHX\nI HAS A N1 ITZ NEW NODE",
    "LOL9001"
)]
#[case::unexpected_character("VISIBLE 1 ~", "LOL1001")]
#[case::unterminated_string("VISIBLE \"OPEN", "LOL1002")]
#[case::invalid_escape("VISIBLE \"A:qB\"", "LOL1003")]
#[case::unterminated_comment("OBTW never closed", "LOL1004")]
#[case::invalid_number("VISIBLE 99999999999999999999", "LOL1005")]
#[case::missing_expression("VISIBLE", "LOL1010")]
#[case::invalid_assignment_target("1 R 2", "LOL1011")]
#[case::bare_expression("SUM OF 1 AN 2", "LOL1012")]
fn test_error_codes(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(error_code_of(body), expected);
}

#[test]
fn test_nothing_runs_after_parse_error() {
    let (output, result) = run_source(&program("VISIBLE 1\nVISIBLE SUM OF 1"));
    assert_eq!(output, "");
    assert!(matches!(result, Err(LolError::Parse(_))));
}

// ============================================================================
// Messages
// ============================================================================

#[rstest]
#[case("VISIBLE 1", "Expected 'HAI' but found 'VISIBLE' at line 1")]
#[case("HAI\nVISIBLE 1", "Expected 'KTHXBYE' but found end of input at line 2")]
#[case(
    "HAI\nI HAS A 5\nKTHXBYE",
    "Expected a variable name but found number '5' at line 2"
)]
#[case(
    "HAI\nVISIBLE SUM OF SUM OF 1 AN 2 AN 3\nKTHXBYE",
    "Expected an expression but found 'SUM OF' at line 2"
)]
fn test_parse_error_messages(#[case] source: &str, #[case] expected: &str) {
    let err = run_source(source).1.unwrap_err();
    assert_eq!(err.to_string(), expected);
}

#[rstest]
#[case("VISIBLE MISSING", "Variable 'MISSING' is not declared")]
#[case(
    "HOW IZ I F YR N\nFOUND YR N\nIF U SAY SO\nVISIBLE F YR",
    "Function 'F' expects 1 argument(s) but got 0"
)]
#[case("VISIBLE QUOSHUNT OF 1 AN 0", "Division by zero")]
fn test_runtime_error_messages(#[case] body: &str, #[case] expected: &str) {
    let err = run_source(&program(body)).1.unwrap_err();
    assert_eq!(err.to_string(), expected);
}

// ============================================================================
// Rendering
// ============================================================================

fn diagnostic_for(source: &str) -> Diagnostic {
    run_source(source)
        .1
        .unwrap_err()
        .to_diagnostic()
        .with_file("test.lol")
        .with_source(source)
}

#[test]
fn test_human_rendering() {
    let diag = diagnostic_for("HAI 1.2\nVISIBLE MISSING\nKTHXBYE\n");
    let expected = [
        "error[LOL0001]: Variable 'MISSING' is not declared",
        "  --> test.lol:2:9",
        "   |",
        " 2 | VISIBLE MISSING",
        "   |         ^^^^^^^ not declared",
        "   = help: declare it first with 'I HAS A MISSING'",
        "",
    ]
    .join("\n");
    assert_eq!(diag.to_human_string(), expected);
}

#[test]
fn test_plain_formatter_matches_human_rendering() {
    let diag = diagnostic_for("HAI 1.2\nVISIBLE QUOSHUNT OF 1 AN 0\nKTHXBYE\n");
    let rendered = DiagnosticFormatter::plain().format_to_buffer(&diag);
    assert_eq!(String::from_utf8(rendered).unwrap(), diag.to_human_string());
}

#[test]
fn test_json_rendering() {
    let diag = diagnostic_for("HAI 1.2\nI HAS A X\nI HAS A X\nKTHXBYE\n");
    let json: serde_json::Value = serde_json::from_str(&diag.to_json_compact().unwrap()).unwrap();

    assert_eq!(json["diag_version"], 1);
    assert_eq!(json["code"], "LOL0002");
    assert_eq!(json["file"], "test.lol");
    assert_eq!(json["line"], 3);
    assert_eq!(json["column"], 9);
    assert_eq!(json["snippet"], "I HAS A X");
    assert!(json.get("notes").is_none());
}

#[test]
fn test_json_round_trip() {
    let diag = diagnostic_for("HAI 1.2\nVISIBLE MAEK 1 A NUMBR\nKTHXBYE\n");
    let parsed: Diagnostic = serde_json::from_str(&diag.to_json_string().unwrap()).unwrap();
    assert_eq!(parsed, diag);
    assert_eq!(parsed.notes.len(), 1);
}
