//! Error types for the opslang pipeline.
//!
//! Every failure in the crate is an [`OpsError`]. Variants are grouped by
//! the phase that raises them:
//!
//! - **Lex errors**: unknown characters in the source text
//! - **Parse errors**: rule selection and terminal matching failures,
//!   plus semantic-action invariant violations
//! - **Runtime errors**: operand/init stack exhaustion, coercion failures,
//!   bad labels and array accesses during OPS execution
//!
//! No error is retried or recovered internally; each aborts its phase.
//! The embedder decides whether to print, log, or propagate.

use std::fmt;

/// Comprehensive error type for the compiler and the OPS executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    // =========================================================================
    // Lex errors
    // =========================================================================
    /// The source contains a character no token can start with.
    UnknownCharacter {
        ch: char,
        /// Byte offset into the source text.
        position: usize,
    },

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// A token mapped to a terminal the grammar does not know.
    UncoveredLexeme {
        lexeme: String,
    },

    /// No production of the non-terminal matches the current lookahead.
    NoRuleApplies {
        non_terminal: String,
        lookahead: String,
    },

    /// A terminal in the chosen production did not match the lookahead.
    UnexpectedTerminal {
        expected: String,
        found: String,
    },

    /// Tokens remain after the start symbol has been fully derived.
    TrailingInput {
        found: String,
    },

    /// A back-patch action fired with nothing to patch.
    EmptyPatchStack {
        action: &'static str,
    },

    // =========================================================================
    // Runtime errors
    // =========================================================================
    /// An operation needed more operands than the stack holds.
    OperandStackEmpty {
        operation: String,
    },

    /// Operation `f` fired with no pending declaration.
    EmptyInitStack,

    /// A name was read before anything was stored under it.
    UninitializedVariable {
        name: String,
    },

    /// An operand had the wrong shape for the operation.
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A number element could not be parsed as a 64-bit integer.
    InvalidNumber {
        text: String,
    },

    /// Integer division by zero.
    DivisionByZero,

    /// Array element access outside `0..length`.
    IndexOutOfRange {
        name: String,
        index: i64,
        length: usize,
    },

    /// The name is bound, but not to an array.
    NotAnArray {
        name: String,
    },

    /// `ar` was asked to allocate a negative length.
    InvalidArrayLength {
        length: i64,
    },

    /// A jump target was not a well-formed `M<n>` label.
    MalformedLabel {
        value: String,
    },

    /// An operation element the executor does not implement.
    UnknownOperation {
        value: String,
    },

    /// The executor ran for longer than the configured step limit.
    StepLimitExceeded {
        limit: u64,
    },

    /// The input source has no more values for `INPUT`.
    InputExhausted {
        name: String,
    },

    /// Reading from or prompting on the console failed.
    Io {
        message: String,
    },
}

/// Phase that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Parse,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Lex => write!(f, "lex"),
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Runtime => write!(f, "runtime"),
        }
    }
}

impl fmt::Display for OpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpsError::UnknownCharacter { ch, position } => {
                write!(f, "Unknown character '{}' at position {}", ch, position)
            }
            OpsError::UncoveredLexeme { lexeme } => {
                write!(f, "Token '{}' is not covered by the grammar terminals", lexeme)
            }
            OpsError::NoRuleApplies { non_terminal, lookahead } => {
                write!(f, "No rule applies for {} with lookahead '{}'", non_terminal, lookahead)
            }
            OpsError::UnexpectedTerminal { expected, found } => {
                write!(f, "Expected '{}', found '{}'", expected, found)
            }
            OpsError::TrailingInput { found } => {
                write!(f, "Trailing input after parse, starting at '{}'", found)
            }
            OpsError::EmptyPatchStack { action } => {
                write!(f, "Empty patch stack while applying action {}", action)
            }
            OpsError::OperandStackEmpty { operation } => {
                write!(f, "Operand stack is empty in operation {}", operation)
            }
            OpsError::EmptyInitStack => {
                write!(f, "Init stack is empty in operation f")
            }
            OpsError::UninitializedVariable { name } => {
                write!(f, "Variable '{}' is not initialized", name)
            }
            OpsError::TypeMismatch { expected, found } => {
                write!(f, "Expected {}, found {}", expected, found)
            }
            OpsError::InvalidNumber { text } => {
                write!(f, "Could not parse integer literal '{}'", text)
            }
            OpsError::DivisionByZero => {
                write!(f, "Division by zero")
            }
            OpsError::IndexOutOfRange { name, index, length } => {
                write!(f, "Index {} out of range for array '{}' of length {}", index, name, length)
            }
            OpsError::NotAnArray { name } => {
                write!(f, "'{}' is not an array", name)
            }
            OpsError::InvalidArrayLength { length } => {
                write!(f, "Invalid array length {}", length)
            }
            OpsError::MalformedLabel { value } => {
                write!(f, "Expected a label of the form M<number>, found '{}'", value)
            }
            OpsError::UnknownOperation { value } => {
                write!(f, "Unknown operation: {}", value)
            }
            OpsError::StepLimitExceeded { limit } => {
                write!(f, "Step limit exceeded: {} elements executed", limit)
            }
            OpsError::InputExhausted { name } => {
                write!(f, "Input exhausted while reading a value for '{}'", name)
            }
            OpsError::Io { message } => {
                write!(f, "Console I/O failed: {}", message)
            }
        }
    }
}

impl std::error::Error for OpsError {}

impl From<std::io::Error> for OpsError {
    fn from(err: std::io::Error) -> Self {
        OpsError::Io { message: err.to_string() }
    }
}

impl OpsError {
    /// The phase this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            OpsError::UnknownCharacter { .. } => ErrorCategory::Lex,

            OpsError::UncoveredLexeme { .. }
            | OpsError::NoRuleApplies { .. }
            | OpsError::UnexpectedTerminal { .. }
            | OpsError::TrailingInput { .. }
            | OpsError::EmptyPatchStack { .. } => ErrorCategory::Parse,

            OpsError::OperandStackEmpty { .. }
            | OpsError::EmptyInitStack
            | OpsError::UninitializedVariable { .. }
            | OpsError::TypeMismatch { .. }
            | OpsError::InvalidNumber { .. }
            | OpsError::DivisionByZero
            | OpsError::IndexOutOfRange { .. }
            | OpsError::NotAnArray { .. }
            | OpsError::InvalidArrayLength { .. }
            | OpsError::MalformedLabel { .. }
            | OpsError::UnknownOperation { .. }
            | OpsError::StepLimitExceeded { .. }
            | OpsError::InputExhausted { .. }
            | OpsError::Io { .. } => ErrorCategory::Runtime,
        }
    }

    /// Numeric code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Lex: 1000-1999
            OpsError::UnknownCharacter { .. } => 1001,

            // Parse: 2000-2999
            OpsError::UncoveredLexeme { .. } => 2001,
            OpsError::NoRuleApplies { .. } => 2002,
            OpsError::UnexpectedTerminal { .. } => 2003,
            OpsError::TrailingInput { .. } => 2004,
            OpsError::EmptyPatchStack { .. } => 2005,

            // Runtime: 3000-3999
            OpsError::OperandStackEmpty { .. } => 3001,
            OpsError::EmptyInitStack => 3002,
            OpsError::UninitializedVariable { .. } => 3003,
            OpsError::TypeMismatch { .. } => 3004,
            OpsError::InvalidNumber { .. } => 3005,
            OpsError::DivisionByZero => 3006,
            OpsError::IndexOutOfRange { .. } => 3007,
            OpsError::NotAnArray { .. } => 3008,
            OpsError::InvalidArrayLength { .. } => 3009,
            OpsError::MalformedLabel { .. } => 3010,
            OpsError::UnknownOperation { .. } => 3011,
            OpsError::StepLimitExceeded { .. } => 3012,
            OpsError::InputExhausted { .. } => 3013,
            OpsError::Io { .. } => 3014,
        }
    }
}

/// Result type alias for opslang operations.
pub type OpsResult<T> = Result<T, OpsError>;
