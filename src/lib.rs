//! opslang: a teaching compiler and stack machine for a small imperative
//! language.
//!
//! The pipeline has three stages:
//! 1. The [`lexer`] splits source text into tokens.
//! 2. The [`parser`], an LL(1) predictive parser driven by the
//!    action-annotated [`grammar`] table and the [`analysis`] FIRST/FOLLOW
//!    sets, lowers tokens to a linear postfix [`ops`] program, patching
//!    forward jump targets as `IF`/`WHILE` constructs close.
//! 3. The [`vm`] executes the OPS program against a variable table,
//!    reading `INPUT` from an [`vm::InputSource`] and collecting `OUTPUT`
//!    lines.

pub mod error;
pub mod lexer;
pub mod grammar;
pub mod analysis;
pub mod ops;
pub mod actions;
pub mod parser;
pub mod trace;
pub mod vm;

pub use error::{ErrorCategory, OpsError, OpsResult};
pub use lexer::{tokenize, Token, TokenKind};
pub use grammar::{Grammar, Rule, END, EPSILON, NO_ACTION, START_SYMBOL};
pub use analysis::Analysis;
pub use ops::{OpsElement, OpsKind, OpsProgram};
pub use actions::Emitter;
pub use parser::Parser;
pub use trace::{RuleTrace, TraceConfig, TraceFormat, TraceLog};
pub use vm::{
    Binding, BufferedInput, ExecResult, Executor, ExecutorConfig, InputSource, StdinInput, Value,
};
