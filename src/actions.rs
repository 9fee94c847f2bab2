//! Semantic-action resolver: turns action tags into OPS elements.
//!
//! The [`Emitter`] owns the growing OPS output and the parser-scoped
//! control-flow state: two back-patch stacks, the pending-assignment
//! flag, and the most recently matched token. Tags map to emissions:
//!
//! | tag    | effect                                                     |
//! |--------|------------------------------------------------------------|
//! | `a`    | emit the last matched lexeme as an identifier              |
//! | `k`    | emit the last matched lexeme as a number                   |
//! | `:`    | arm the pending `:=` fuse, emits nothing                   |
//! | `=`    | emit `:=` if the fuse is armed, plain `=` otherwise        |
//! | `7`    | emit `M?` placeholder + `jf`, remember the placeholder     |
//! | `8`    | patch the newest placeholder to jump here                  |
//! | `9`    | remember the current position as a loop start              |
//! | `10`   | patch the loop exit past the back-jump, emit label + `j`   |
//! | `2`    | reserved ELSE marker, emits nothing                        |
//! | other  | emit the tag verbatim as an operation                      |
//!
//! Action `10` patches the exit to `len + 2` because exactly two elements
//! (the loop-start label and the `j`) are emitted after the patch.

use crate::error::{OpsError, OpsResult};
use crate::lexer::TokenKind;
use crate::ops::{OpsElement, OpsProgram};

/// OPS output under construction, together with back-patch state.
#[derive(Debug)]
pub struct Emitter {
    output: Vec<OpsElement>,
    /// Positions of `M?` placeholders awaiting their forward target.
    exit_labels: Vec<usize>,
    /// Positions of the first condition element of enclosing WHILEs.
    loop_starts: Vec<usize>,
    pending_assign: bool,
    last_lexeme: String,
    last_kind: Option<TokenKind>,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            exit_labels: Vec::new(),
            loop_starts: Vec::new(),
            pending_assign: false,
            last_lexeme: String::new(),
            last_kind: None,
        }
    }

    /// Record the token most recently matched by the parser.
    pub fn note_match(&mut self, lexeme: &str, kind: TokenKind) {
        self.last_lexeme = lexeme.to_string();
        self.last_kind = Some(kind);
    }

    /// Kind of the last matched token, if any terminal matched yet.
    pub fn last_kind(&self) -> Option<TokenKind> {
        self.last_kind
    }

    /// Number of elements emitted so far.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// The OPS emitted so far, space-joined (for traces).
    pub fn ops_string(&self) -> String {
        self.output
            .iter()
            .map(|el| el.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn into_program(self) -> OpsProgram {
        OpsProgram::new(self.output)
    }

    /// Apply one action tag.
    pub fn apply(&mut self, tag: &str) -> OpsResult<()> {
        match tag {
            "a" => {
                self.output.push(OpsElement::identifier(self.last_lexeme.clone()));
            }
            "k" => {
                self.output.push(OpsElement::number(self.last_lexeme.clone()));
            }
            ":" => {
                // Arm the fuse; the matching "=" turns into ":=".
                self.pending_assign = true;
            }
            "=" => {
                if self.pending_assign {
                    self.output.push(OpsElement::operation(":="));
                    self.pending_assign = false;
                } else {
                    self.output.push(OpsElement::operation("="));
                }
            }
            "7" => {
                self.exit_labels.push(self.output.len());
                self.output.push(OpsElement::placeholder());
                self.output.push(OpsElement::operation("jf"));
            }
            "8" => {
                let placeholder = self
                    .exit_labels
                    .pop()
                    .ok_or(OpsError::EmptyPatchStack { action: "8" })?;
                let target = self.output.len();
                self.output[placeholder] = OpsElement::label(target);
            }
            "9" => {
                self.loop_starts.push(self.output.len());
            }
            "10" => {
                let start = self
                    .loop_starts
                    .pop()
                    .ok_or(OpsError::EmptyPatchStack { action: "10" })?;
                let placeholder = self
                    .exit_labels
                    .pop()
                    .ok_or(OpsError::EmptyPatchStack { action: "10" })?;
                // The exit lands just past the label and `j` emitted below.
                let exit_target = self.output.len() + 2;
                self.output[placeholder] = OpsElement::label(exit_target);
                self.output.push(OpsElement::label(start));
                self.output.push(OpsElement::operation("j"));
            }
            "2" => {
                // Reserved ELSE marker.
            }
            other => {
                self.output.push(OpsElement::operation(other));
            }
        }
        Ok(())
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}
