//! Integration tests for the OPS executor.
//!
//! These drive the executor through compiled programs and verify:
//! - Heterogeneous operand handling (names, integers, booleans, refs)
//! - Jump semantics (`j`, `jf`) over patched labels
//! - The variable table life cycle (`n`, `ar`, `f`, assignments)
//! - Input/output collaborator contracts

#![cfg(test)]

use crate::common::*;

use opslang::*;

mod operands {
    use super::*;

    #[test]
    fn names_resolve_at_operation_time() {
        let result = run("VAR a := 6; VAR b; b := a * 7; OUTPUT b;");
        assert_int_binding(&result, "b", 42);
    }

    #[test]
    fn array_references_read_lazily() {
        let result = run("ARRAY v (2); v[0] := 3; v[1] := v[0] * v[0]; OUTPUT v[1];");
        assert_output(&result, &["9"]);
    }

    #[test]
    fn comparisons_produce_booleans_for_connectives() {
        let result = run(
            "VAR a := 1; \
             IF (a == 1 AND a != 2 AND a < 9) THEN { OUTPUT yes; } ;",
        );
        assert_output(&result, &["yes"]);
    }

    #[test]
    fn unary_negation_applies_to_the_top_operand() {
        let result = run("VAR a := 5; VAR b := -a; OUTPUT b;");
        assert_int_binding(&result, "b", -5);
    }
}

mod jumps {
    use super::*;

    #[test]
    fn loop_executes_exact_iteration_count() {
        let result = run(
            "VAR count := 0; VAR i := 0; \
             WHILE (i < 10) DO { count := count + 1; i := i + 1; } ; \
             OUTPUT count;",
        );
        assert_output(&result, &["count=10"]);
    }

    #[test]
    fn zero_iteration_loop_skips_its_body() {
        let result = run(
            "VAR touched := 0; \
             WHILE (1 < 0) DO { touched := 1; } ; \
             OUTPUT touched;",
        );
        assert_output(&result, &["touched=0"]);
    }

    #[test]
    fn instruction_pointer_leaves_the_loop_after_the_back_jump() {
        // Evidence of loop termination: the statement after the loop runs.
        let result = run(
            "VAR a := 0; WHILE (a < 3) DO { a := a + 1; } ; OUTPUT after;",
        );
        assert_output(&result, &["after"]);
    }

    #[test]
    fn nested_loops_multiply_iteration_counts() {
        let result = run(
            "VAR total := 0; VAR i := 0; \
             WHILE (i < 3) DO { \
               VAR j := 0; \
               WHILE (j < 4) DO { total := total + 1; j := j + 1; } ; \
               i := i + 1; } ; \
             OUTPUT total;",
        );
        assert_output(&result, &["total=12"]);
    }
}

mod variables {
    use super::*;

    #[test]
    fn declaration_without_initializer_defaults_to_zero() {
        let result = run("VAR a; OUTPUT a;");
        assert_output(&result, &["a=0"]);
        assert_int_binding(&result, "a", 0);
    }

    #[test]
    fn redeclaration_does_not_reset_the_value() {
        let result = run("VAR a := 5; VAR a; OUTPUT a;");
        assert_output(&result, &["a=5"]);
    }

    #[test]
    fn arrays_are_zero_filled_on_declaration() {
        let result = run("ARRAY v (3); OUTPUT v[0]; OUTPUT v[2];");
        assert_output(&result, &["0", "0"]);
    }

    #[test]
    fn array_length_can_come_from_an_expression() {
        let result = run("VAR n := 2; ARRAY v (n + 1); v[2] := 9; OUTPUT v[2];");
        assert_output(&result, &["9"]);
    }

    #[test]
    fn scalar_and_array_namespaces_are_one() {
        // Rebinding a scalar name to an array replaces the binding.
        let result = run("VAR a := 1; ARRAY a (2); a[0] := 5; OUTPUT a[0];");
        assert_output(&result, &["5"]);
    }
}

mod io {
    use super::*;

    #[test]
    fn inputs_are_consumed_in_order() {
        let result = run_with_input(
            "VAR a; INPUT a; VAR b; INPUT b; OUTPUT a; OUTPUT b;",
            [1, 2],
        );
        assert_output(&result, &["a=1", "b=2"]);
    }

    #[test]
    fn input_overwrites_previous_values() {
        let result = run_with_input("VAR a := 9; INPUT a; OUTPUT a;", [4]);
        assert_output(&result, &["a=4"]);
    }

    #[test]
    fn exhausted_buffered_input_is_an_error() {
        let program = compile("VAR a; INPUT a;");
        let err = Executor::with_input([])
            .execute(&program)
            .expect_err("input should run out");
        assert_eq!(err, OpsError::InputExhausted { name: "a".to_string() });
    }

    #[test]
    fn output_lines_preserve_emission_order() {
        let result = run("OUTPUT 3; OUTPUT 1; OUTPUT 2;");
        assert_output(&result, &["3", "1", "2"]);
    }
}

mod limits {
    use super::*;

    #[test]
    fn non_terminating_loop_hits_the_step_limit() {
        let program = compile("VAR a := 1; WHILE (a > 0) DO { a := a + 0; } ;");
        let mut executor = Executor::with_source(
            ExecutorConfig { max_steps: 10_000 },
            Box::new(BufferedInput::default()),
        );
        let err = executor.execute(&program).expect_err("should hit the limit");
        assert_eq!(err, OpsError::StepLimitExceeded { limit: 10_000 });
    }

    #[test]
    fn executor_state_resets_between_runs() {
        let mut executor = Executor::with_input([]);
        let first = executor
            .execute(&compile("VAR a := 1; OUTPUT a;"))
            .expect("first run");
        let second = executor
            .execute(&compile("VAR b := 2; OUTPUT b;"))
            .expect("second run");
        assert_output(&first, &["a=1"]);
        assert_output(&second, &["b=2"]);
        assert!(second.variables.get("a").is_none());
    }
}
