//! End-to-end tests: source → tokens → OPS → execution.
//!
//! These pin the externally observable contract of the whole pipeline:
//! core scenarios, output formatting, and the error taxonomy of each
//! phase.

#![cfg(test)]

use crate::common::*;

use opslang::*;

// =============================================================================
// Core scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn scalar_declaration_prints_name_and_value() {
        // Arrange & Act
        let result = run("VAR a := 10; OUTPUT a;");

        // Assert
        assert_output(&result, &["a=10"]);
    }

    #[test]
    fn arithmetic_respects_parentheses() {
        let result = run("VAR x := 3; VAR y := 4; VAR z := (x + y) * 2; OUTPUT z;");
        assert_output(&result, &["z=14"]);
    }

    #[test]
    fn if_runs_body_when_condition_holds() {
        let result = run("VAR a := 7; IF (a >= 5) THEN { OUTPUT a; } ;");
        assert_output(&result, &["a=7"]);
    }

    #[test]
    fn while_loops_until_condition_fails() {
        let result = run("VAR a := 0; VAR n := 5; WHILE (a < n) DO { a := a + 1; } ; OUTPUT a;");
        assert_output(&result, &["a=5"]);
        assert_int_binding(&result, "a", 5);
    }

    #[test]
    fn array_element_output_has_no_name_prefix() {
        let result =
            run("ARRAY v (3); v[0] := 10; v[1] := 20; v[2] := v[0] + v[1]; OUTPUT v[2];");
        assert_output(&result, &["30"]);
    }

    #[test]
    fn input_reads_one_integer_per_request() {
        let result = run_with_input("VAR a; INPUT a; OUTPUT a;", [42]);
        assert_output(&result, &["a=42"]);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let result = run("VAR q := 7 / 2; OUTPUT q;");
        assert_output(&result, &["q=3"]);
    }

    #[test]
    fn boolean_connectives_combine_comparisons() {
        let result = run(
            "VAR a := 2; VAR b := 8; \
             IF (a < 5 AND b > 5) THEN { OUTPUT 1; } ; \
             IF (a > 5 OR b == 8) THEN { OUTPUT 2; } ;",
        );
        assert_output(&result, &["1", "2"]);
    }

    #[test]
    fn fibonacci_via_while_and_arrays() {
        let result = run(
            "ARRAY fib (10); fib[0] := 0; fib[1] := 1; VAR i := 2; \
             WHILE (i < 10) DO { fib[i] := fib[i - 1] + fib[i - 2]; i := i + 1; } ; \
             OUTPUT fib[9];",
        );
        assert_output(&result, &["34"]);
    }

    #[test]
    fn input_can_drive_control_flow() {
        let result = run_with_input(
            "VAR n; INPUT n; VAR sum := 0; \
             WHILE (n > 0) DO { sum := sum + n; INPUT n; } ; \
             OUTPUT sum;",
            [5, 3, 0],
        );
        assert_output(&result, &["sum=8"]);
    }
}

// =============================================================================
// Pinned quirks
// =============================================================================

mod quirks {
    use super::*;

    #[test]
    fn else_body_runs_after_taken_then_branch() {
        let result = run("VAR a := 9; IF (a > 5) THEN { OUTPUT 1; } ELSE { OUTPUT 2; } ;");
        assert_output(&result, &["1", "2"]);
    }

    #[test]
    fn false_condition_skips_then_and_else_together() {
        let result = run("VAR a := 1; IF (a > 5) THEN { OUTPUT 1; } ELSE { OUTPUT 2; } ;");
        assert_output(&result, &[]);
    }

    #[test]
    fn output_of_unbound_name_is_the_name_itself() {
        let result = run("OUTPUT done;");
        assert_output(&result, &["done"]);
    }

    #[test]
    fn initializer_keeps_bare_names_as_text() {
        let result = run("VAR y := 5; VAR x := y; OUTPUT x;");
        assert_output(&result, &["x=y"]);
    }

    #[test]
    fn keywords_match_in_any_case() {
        let result = run("var a := 1; output a;");
        assert_output(&result, &["a=1"]);
    }
}

// =============================================================================
// Error taxonomy
// =============================================================================

mod errors {
    use super::*;

    #[test]
    fn unknown_character_is_a_lex_error() {
        let err = try_compile("VAR a := 1 @ 2;").expect_err("should fail");
        assert_eq!(err.category(), ErrorCategory::Lex);
    }

    #[test]
    fn missing_close_brace_is_a_parse_error() {
        let err = try_compile("IF (a > 1) THEN { OUTPUT a; ;").expect_err("should fail");
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let err = try_compile("VAR a := 1").expect_err("should fail");
        assert!(matches!(err, OpsError::UnexpectedTerminal { ref expected, .. } if expected == ";"));
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let err = run_err("VAR z := 0; OUTPUT 1 / z;");
        assert_eq!(err, OpsError::DivisionByZero);
    }

    #[test]
    fn uninitialized_read_is_a_runtime_error() {
        let err = run_err("VAR x := ghost + 1;");
        assert_eq!(err, OpsError::UninitializedVariable { name: "ghost".to_string() });
    }

    #[test]
    fn out_of_range_index_is_a_runtime_error() {
        let err = run_err("ARRAY v (3); OUTPUT v[5];");
        assert!(matches!(err, OpsError::IndexOutOfRange { index: 5, length: 3, .. }));
    }
}
