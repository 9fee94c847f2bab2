//! Integration tests for the predictive parser.
//!
//! These verify:
//! - OPS shapes for every statement form
//! - Rule selection over shared FIRST prefixes (table order wins)
//! - Back-patching for nested control flow
//! - The derivation trace

#![cfg(test)]

use crate::common::*;

use opslang::*;

mod emission {
    use super::*;

    #[test]
    fn every_statement_form_lowers() {
        assert_eq!(compile("VAR a := 10;").to_string(), "a n 10 f");
        assert_eq!(compile("ARRAY v (3);").to_string(), "v 3 ar");
        assert_eq!(compile("x := 5;").to_string(), "x 5 :=");
        assert_eq!(compile("x[2] := 5;").to_string(), "x 2 i 5 :=");
        assert_eq!(compile("OUTPUT x;").to_string(), "x o");
        assert_eq!(compile("INPUT x;").to_string(), "x s");
    }

    #[test]
    fn expression_operators_come_out_postfix() {
        assert_eq!(compile("x := a + b * c;").to_string(), "x a b c * + :=");
        assert_eq!(compile("x := a * b + c;").to_string(), "x a b * c + :=");
        assert_eq!(compile("x := -a + b;").to_string(), "x a -' b + :=");
    }

    #[test]
    fn comparison_and_connectives_lower_postfix() {
        assert_eq!(
            compile("IF (a == b OR c != d) THEN { x := 1; };").to_string(),
            "a b == c d != OR M12 jf x 1 :="
        );
    }

    #[test]
    fn empty_program_emits_nothing() {
        let program = compile("");
        assert!(program.is_empty());
        assert_eq!(program.to_string(), "");
    }

    #[test]
    fn consecutive_statements_concatenate() {
        assert_eq!(
            compile("VAR a := 1; VAR b := 2; OUTPUT a;").to_string(),
            "a n 1 f b n 2 f a o"
        );
    }
}

mod control_flow {
    use super::*;

    #[test]
    fn if_patches_exit_past_the_body() {
        let program = compile("IF (a > 1) THEN { x := 2; };");
        assert_eq!(program.to_string(), "a 1 > M8 jf x 2 :=");
        assert!(!program.has_placeholders());
    }

    #[test]
    fn while_patches_exit_past_the_back_jump() {
        let program = compile("WHILE (a < n) DO { a := a + 1; };");
        // The exit label equals the program length: one past the j.
        assert_eq!(program.to_string(), "a n < M12 jf a a 1 + := M0 j");
        assert_eq!(program.len(), 12);
    }

    #[test]
    fn if_inside_while_patches_independently() {
        let program = compile(
            "WHILE (i < 9) DO { IF (i == 3) THEN { OUTPUT i; } ; i := i + 1; };",
        );
        assert!(!program.has_placeholders());
        // The loop back-jump targets the condition start, index 0.
        assert!(program.to_string().ends_with("M0 j"));
    }

    #[test]
    fn deeply_nested_loops_resolve_all_labels() {
        let program = compile(
            "WHILE (a < 2) DO { \
               WHILE (b < 2) DO { \
                 WHILE (c < 2) DO { c := c + 1; } ; \
                 b := b + 1; } ; \
               a := a + 1; } ;",
        );
        assert!(!program.has_placeholders());
        for element in program.iter() {
            if element.kind == OpsKind::Label {
                let target: usize = element.value[1..].parse().expect("numeric label");
                assert!(target <= program.len());
            }
        }
    }
}

mod rule_selection {
    use super::*;

    #[test]
    fn assignment_and_expression_share_the_identifier_first() {
        // Both `x := ...` and expressions start with terminal `a`; the
        // statement-level rule is tried (and matched) first.
        assert_eq!(compile("x := x;").to_string(), "x x :=");
    }

    #[test]
    fn nullable_tails_defer_to_follow_sets() {
        // H, V, and U in front of the comparison all derive λ here, which
        // rule selection resolves through their FOLLOW sets.
        assert_eq!(
            compile("IF (a < b) THEN { x := 1; };").to_string(),
            "a b < M8 jf x 1 :="
        );
    }

    #[test]
    fn conditions_require_a_comparison() {
        // A bare identifier is not a condition: O has no λ production.
        let err = try_compile("IF (a) THEN { x := 1; };").expect_err("should fail");
        assert!(matches!(
            err,
            OpsError::NoRuleApplies { ref non_terminal, .. } if non_terminal == "O"
        ));
    }

    #[test]
    fn no_rule_error_names_the_stuck_non_terminal() {
        let err = try_compile("VAR := 5;").expect_err("should fail");
        assert!(matches!(
            err,
            OpsError::NoRuleApplies { ref non_terminal, .. } if non_terminal == "P"
        ));
    }

    #[test]
    fn stray_close_brace_is_trailing_input() {
        // `}` sits in FOLLOW(A), so the program derives fully first.
        let err = try_compile("VAR a := 1; }").expect_err("should fail");
        assert_eq!(err, OpsError::TrailingInput { found: "}".to_string() });
    }
}

mod trace {
    use super::*;

    #[test]
    fn trace_follows_the_derivation() {
        let mut parser = Parser::new(Grammar::standard());
        parser.set_trace(TraceConfig::default());
        parser.parse("VAR a := 1;").expect("parse failed");

        let events = parser.trace().events();
        assert!(!events.is_empty());
        // Every recorded production belongs to the grammar.
        let grammar = Grammar::standard();
        for event in events {
            assert!(
                grammar
                    .rules_for(&event.non_terminal)
                    .iter()
                    .any(|rule| rule.to_string() == event.rule),
                "unknown production in trace: {} -> {}",
                event.non_terminal,
                event.rule
            );
        }
        // The OPS string only ever grows within one derivation step.
        for event in events {
            assert!(event.ops_after.len() >= event.ops_before.len());
        }
    }

    #[test]
    fn disabled_trace_stays_empty() {
        let mut parser = Parser::new(Grammar::standard());
        parser.set_trace(TraceConfig::disabled());
        parser.parse("VAR a := 1;").expect("parse failed");
        assert!(parser.trace().events().is_empty());
    }

    #[test]
    fn json_trace_lines_parse_back() {
        let mut parser = Parser::new(Grammar::standard());
        parser.set_trace(TraceConfig { enabled: true, format: TraceFormat::JsonLines });
        parser.parse("OUTPUT 1;").expect("parse failed");

        for line in parser.trace().render() {
            let value: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
            assert!(value.get("non_terminal").is_some());
            assert!(value.get("ops_after").is_some());
        }
    }
}
