// Integration tests for the Emo interpreter
//
// These tests run complete Emo programs and check their printed output and
// final bindings. Tests cover:
// - Glyph and canonical spellings
// - Declaration, assignment and block scoping
// - if/elif/else, while and for loops with break/continue
// - Operator precedence and value coercions
// - Error reporting

use emo::errors::{EmoError, ErrorKind};
use emo::interpreter::{Interpreter, Value};
use emo::lexer::{tokenize, TokenKind};
use emo::parser::parse;
use emo::transformer::normalize;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn run_code(code: &str) -> (Interpreter, String) {
    let program = parse(code).expect("program should parse");
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let mut interp = Interpreter::new();
    interp.set_output(buffer.clone());
    interp.execute(&program).expect("program should run");
    let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    (interp, output)
}

fn output_of(code: &str) -> String {
    run_code(code).1
}

fn error_of(code: &str) -> EmoError {
    match parse(code) {
        Ok(program) => {
            let mut interp = Interpreter::new();
            interp.set_output(Arc::new(Mutex::new(Vec::new())));
            interp.execute(&program).expect_err("program should fail")
        }
        Err(err) => err,
    }
}

#[test]
fn test_glyph_and_canonical_programs_agree() {
    let glyphs = "📢 a 😌 6, b 😌 7\n🖨👉a ➕ b ✖ 2 ➖ 1👈\n";
    let canonical = "decl a = 6, b = 7\nprint(a + b * 2 - 1)\n";
    assert_eq!(output_of(glyphs), "19\n");
    assert_eq!(output_of(glyphs), output_of(canonical));
}

#[test]
fn test_normalized_tree_runs_the_same() {
    let source = "📢 n 😌 0\n💿👉n 😭 5👈🍽 n 😌 n ➕ 2 🥂\n🖨👉n👈\n";
    let mut program = parse(source).unwrap();
    normalize(&mut program);

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let mut interp = Interpreter::new();
    interp.set_output(buffer.clone());
    interp.execute(&program).unwrap();

    assert_eq!(String::from_utf8(buffer.lock().unwrap().clone()).unwrap(), output_of(source));
}

#[test]
fn test_presentation_selector_after_glyph() {
    assert_eq!(output_of("🖨\u{FE0F}👉✔\u{FE0F}👈"), "true\n");
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(output_of("💩 nothing to see 🖨👉1👈\nprint(2) 💩 trailing\n"), "2\n");
}

#[test]
fn test_uninitialized_variable_prints_zero() {
    let (interp, output) = run_code("decl x\nprint(x)\n");
    assert_eq!(output, "0\n");
    assert_eq!(interp.env.get("x"), Some(&Value::Unit));
}

#[test]
fn test_declared_values_stay_in_root_scope() {
    let (interp, _) = run_code("decl a = 1, b = 2.5, c = \"hi\", d = true\na = a + 1\n");
    assert_eq!(interp.env.get("a"), Some(&Value::Int(2)));
    assert_eq!(interp.env.get("b"), Some(&Value::Float(2.5)));
    assert_eq!(interp.env.get("c"), Some(&Value::Str("hi".to_string())));
    assert_eq!(interp.env.get("d"), Some(&Value::Bool(true)));
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_redeclaration_in_same_block_fails() {
    let err = error_of("decl x\ndecl x\n");
    assert_eq!(err.kind, ErrorKind::Redeclaration);
    assert_eq!(err.location.line, 2);

    let err = error_of("decl x = 1, x = 2\n");
    assert_eq!(err.kind, ErrorKind::Redeclaration);
}

#[test]
fn test_redeclaration_after_block_exit_succeeds() {
    let code = "if (true) { decl y = 1 }\nif (true) { decl y = 2\nprint(y) }\n";
    assert_eq!(output_of(code), "2\n");
}

#[test]
fn test_inner_block_shadows_outer() {
    let code = "decl x = 1\nif (true) { decl x = 2\nprint(x) }\nprint(x)\n";
    assert_eq!(output_of(code), "2\n1\n");
}

#[test]
fn test_assignment_updates_enclosing_scope() {
    let code = "decl total = 0\nwhile (total < 10) { total = total + 4 }\nprint(total)\n";
    assert_eq!(output_of(code), "12\n");
}

#[test]
fn test_assigning_undeclared_name_fails() {
    let err = error_of("y = 1\n");
    assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
    assert_eq!((err.location.line, err.location.column), (1, 1));
}

#[test]
fn test_reading_undeclared_name_suggests_close_match() {
    let err = error_of("decl counter = 1\nprint(countr)\n");
    assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
    assert_eq!(err.suggestion.as_deref(), Some("counter"));
}

#[test]
fn test_block_locals_do_not_leak() {
    let err = error_of("if (true) { decl t = 1 }\nprint(t)\n");
    assert_eq!(err.kind, ErrorKind::UndeclaredVariable);

    let err = error_of("for (decl i = 0; i < 1; i = i + 1) { }\nprint(i)\n");
    assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
}

#[test]
fn test_scopes_unwind_after_error_in_block() {
    let program = parse("decl a = 1\nwhile (true) { decl b = 2\nprint(c) }\n").unwrap();
    let mut interp = Interpreter::new();
    interp.set_output(Arc::new(Mutex::new(Vec::new())));
    assert!(interp.execute(&program).is_err());
    assert_eq!(interp.env.depth(), 1);
    assert_eq!(interp.env.get("b"), None);
}

#[test]
fn test_if_else_takes_else_branch() {
    assert_eq!(output_of("if (false) { print(1) } else { print(2) }\n"), "2\n");
}

#[test]
fn test_if_elif_short_circuits() {
    // `missing` would fail if its condition were evaluated
    let code = "if (true) { print(1) } elif (missing) { print(2) } else { print(3) }\n";
    assert_eq!(output_of(code), "1\n");
}

#[test]
fn test_elif_chain_picks_first_truthy() {
    let code = "decl x = 5\n🚩👉x 😭 3👈🍽 🖨👉\"small\"👈 🥂 🏳👉x 😭 10👈🍽 🖨👉\"medium\"👈 🥂 🏁🍽 🖨👉\"large\"👈 🥂\n";
    assert_eq!(output_of(code), "medium\n");
}

#[test]
fn test_if_without_taken_branch_does_nothing() {
    assert_eq!(output_of("if (0) { print(1) } elif (\"\") { print(2) }\nprint(3)\n"), "3\n");
}

#[test]
fn test_for_loop_counts() {
    assert_eq!(output_of("for (decl i = 0; i < 3; i = i + 1) { print(i) }\n"), "0\n1\n2\n");
}

#[test]
fn test_for_loop_glyphs() {
    let code = "📀👉📢 i 😌 3👄 i 😁 0👄 i 😌 i ➖ 1👈🍽 🖨👉i👈 🥂\n";
    assert_eq!(output_of(code), "3\n2\n1\n");
}

#[test]
fn test_for_loop_with_several_updates() {
    let code = "for (decl i = 0, j = 10; i < 2; i = i + 1, j = j - 1) { print(j) }\n";
    assert_eq!(output_of(code), "10\n9\n");
}

#[test]
fn test_for_loop_empty_test_runs_until_break() {
    let code = "for (decl i = 0; ; i = i + 1) { if (i == 2) { break } print(i) }\n";
    assert_eq!(output_of(code), "0\n1\n");
}

#[test]
fn test_continue_still_runs_for_update() {
    let code = "for (decl i = 0; i < 4; i = i + 1) { if (i == 1) { continue } print(i) }\n";
    assert_eq!(output_of(code), "0\n2\n3\n");
}

#[test]
fn test_while_break_runs_once() {
    let code = "decl n = 0\nwhile (true) { n = n + 1\nbreak\nprint(99) }\nprint(n)\n";
    assert_eq!(output_of(code), "1\n");
}

#[test]
fn test_while_continue_skips_rest_of_body() {
    let code = "decl n = 0\n💿👉n 😭 5👈🍽 n 😌 n ➕ 1\n🚩👉n 📎 2 😌😌 0👈🍽 ⏩ 🥂\n🖨👉n👈 🥂\n";
    assert_eq!(output_of(code), "1\n3\n5\n");
}

#[test]
fn test_break_only_leaves_innermost_loop() {
    let code = "for (decl i = 0; i < 2; i = i + 1) { while (true) { break } print(i) }\n";
    assert_eq!(output_of(code), "0\n1\n");
}

#[test]
fn test_stray_top_level_break_is_ignored() {
    assert_eq!(output_of("break\nprint(1)\n"), "1\n");
}

#[test]
fn test_equality_compares_string_forms() {
    assert_eq!(output_of("print(3 == 3.0)\n"), "false\n");
    assert_eq!(output_of("print(\"3\" == 3)\n"), "true\n");
    assert_eq!(output_of("print(3.0 != 3)\n"), "true\n");
    assert_eq!(output_of("decl u\nprint(u == 0)\n"), "true\n");
}

#[test]
fn test_bitwise_operators_chain_with_relational() {
    // (1 < 2) & 3, not 1 < (2 & 3)
    assert_eq!(output_of("print(1 < 2 & 3)\n"), "1\n");
    assert_eq!(output_of("print(6 ⚛ 3 ☯ 8)\n"), "10\n");
    assert_eq!(output_of("print(5 xor 1 == 4)\n"), "true\n");
}

#[test]
fn test_arithmetic_precedence_and_promotion() {
    assert_eq!(output_of("print(2 + 3 * 4)\n"), "14\n");
    assert_eq!(output_of("print((2 + 3) * 4)\n"), "20\n");
    assert_eq!(output_of("print(7 / 2)\n"), "3.500000\n");
    assert_eq!(output_of("print(1.5 + 1)\n"), "2.500000\n");
    assert_eq!(output_of("print(10 - 4 - 3)\n"), "3\n");
    assert_eq!(output_of("print(-3 + 1)\n"), "-2\n");
    assert_eq!(output_of("print(17 % 5)\n"), "2\n");
    assert_eq!(output_of("print(17 mod 5)\n"), "2\n");
}

#[test]
fn test_uninitialized_operand_promotes_to_float() {
    assert_eq!(output_of("decl s\ns = s + 1\nprint(s)\n"), "1.000000\n");
    let code = "decl sum\nfor (decl i = 1; i <= 3; i = i + 1) { sum = sum + i }\nprint(sum)\n";
    assert_eq!(output_of(code), "6.000000\n");
}

#[test]
fn test_numbers_use_leading_numeric_part() {
    assert_eq!(output_of("print(\"4x\" * 2)\n"), "8.000000\n");
    assert_eq!(output_of("print(1.2.3)\n"), "1.200000\n");
    assert_eq!(output_of("print(\"3.5kg\" + 0.5)\n"), "4.000000\n");
    assert_eq!(output_of("print(\"1e3\" % 7)\n"), "1\n");
}

#[test]
fn test_remainder_by_zero_fails() {
    assert_eq!(error_of("print(1 % 0)\n").kind, ErrorKind::DivisionByZero);
}

#[test]
fn test_division_by_zero_is_infinite() {
    assert_eq!(output_of("print(1 / 0)\n"), "inf\n");
}

#[test]
fn test_logical_operators_return_booleans() {
    assert_eq!(output_of("print(1 and 0)\n"), "false\n");
    assert_eq!(output_of("print(0 || \"x\")\n"), "true\n");
    assert_eq!(output_of("print(✔ 😠 ❌ 😇 ✔)\n"), "true\n");
    assert_eq!(output_of("print(true && 2 > 1)\n"), "true\n");
}

#[test]
fn test_unary_operators() {
    assert_eq!(output_of("print(!0)\n"), "true\n");
    assert_eq!(output_of("print(not true)\n"), "false\n");
    assert_eq!(output_of("print(❗\"\")\n"), "true\n");
    assert_eq!(output_of("print(~0)\n"), "-1\n");
    assert_eq!(output_of("print(〰5)\n"), "-6\n");
}

#[test]
fn test_string_printing() {
    assert_eq!(output_of("print(\"hello, 🌍\")\n"), "hello, 🌍\n");
}

#[test]
fn test_syntax_error_reports_position() {
    let err = error_of("print(})\n");
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert_eq!((err.location.line, err.location.column), (1, 7));
}

#[test]
fn test_tokens_for_mixed_spellings() {
    let kinds: Vec<TokenKind> = tokenize("📢 x 😌😌 \"s\" 12 ✔").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Name,
            TokenKind::Operator,
            TokenKind::String,
            TokenKind::Number,
            TokenKind::Boolean,
            TokenKind::Eof,
        ]
    );
}
