//! Shared test utilities for opslang integration tests.
//!
//! This module provides:
//! - Compile and run helpers
//! - Assertion helpers for output lines and variable bindings
//!
//! ## AAA pattern
//!
//! Tests follow Arrange-Act-Assert: set up source and input, run the
//! pipeline, verify outputs and the final variable table.

use opslang::*;

/// Compile source into an OPS program.
///
/// # Panics
/// Panics if parsing fails, which is appropriate for test code.
pub fn compile(source: &str) -> OpsProgram {
    Parser::new(Grammar::standard())
        .parse(source)
        .expect("Failed to parse program")
}

/// Compile and parse, returning the error if any.
pub fn try_compile(source: &str) -> Result<OpsProgram, OpsError> {
    Parser::new(Grammar::standard()).parse(source)
}

/// Compile and execute with no input.
pub fn run(source: &str) -> ExecResult {
    run_with_input(source, [])
}

/// Compile and execute with canned input values.
pub fn run_with_input(source: &str, input: impl IntoIterator<Item = i64>) -> ExecResult {
    Executor::with_input(input)
        .execute(&compile(source))
        .expect("Failed to execute program")
}

/// Compile and execute, returning the runtime error.
pub fn run_err(source: &str) -> OpsError {
    Executor::with_input([])
        .execute(&compile(source))
        .expect_err("Execution succeeded unexpectedly")
}

/// Assert that the program produced exactly `expected` output lines.
pub fn assert_output(result: &ExecResult, expected: &[&str]) {
    let actual: Vec<&str> = result.output.iter().map(String::as_str).collect();
    assert_eq!(actual, expected, "output mismatch");
}

/// Assert that `name` is bound to an integer `value`.
pub fn assert_int_binding(result: &ExecResult, name: &str, value: i64) {
    assert_eq!(
        result.variables.get(name),
        Some(&Binding::Int(value)),
        "binding mismatch for {}",
        name
    );
}
