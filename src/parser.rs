//! LL(1) predictive parser that lowers source text to an OPS program.
//!
//! The parser walks the token stream (mapped to grammar terminals, with
//! `$` appended) and expands non-terminals recursively. For each
//! non-terminal it picks the first production, in table order, whose
//! FIRST contains the lookahead, or whose nullable FIRST lets the
//! lookahead appear in the non-terminal's FOLLOW. Matched terminals feed
//! the emitter's "last lexeme"; action tags fire through the emitter
//! after their symbol, growing the OPS output and back-patching jump
//! targets as control-flow constructs close.

use crate::actions::Emitter;
use crate::analysis::Analysis;
use crate::error::{OpsError, OpsResult};
use crate::grammar::{Grammar, Rule, END, EPSILON, START_SYMBOL};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::ops::OpsProgram;
use crate::trace::{RuleTrace, TraceConfig, TraceLog};

/// Predictive parser over the fixed grammar.
pub struct Parser {
    grammar: Grammar,
    analysis: Analysis,
    trace: TraceLog,
}

/// Per-parse cursor and emission state.
struct ParseState<'t> {
    tokens: &'t [Token],
    /// Grammar terminal for each token, with `$` appended.
    symbols: Vec<String>,
    position: usize,
    emitter: Emitter,
    depth: usize,
}

impl<'t> ParseState<'t> {
    fn lookahead(&self) -> &str {
        self.symbols
            .get(self.position)
            .map(String::as_str)
            .unwrap_or(END)
    }

    fn match_terminal(&mut self, expected: &str) -> OpsResult<()> {
        let lookahead = self.lookahead();
        if lookahead != expected {
            return Err(OpsError::UnexpectedTerminal {
                expected: expected.to_string(),
                found: lookahead.to_string(),
            });
        }
        let token = &self.tokens[self.position];
        self.emitter.note_match(&token.lexeme, token.kind);
        self.position += 1;
        Ok(())
    }
}

impl Parser {
    /// Build a parser, computing FIRST/FOLLOW once.
    pub fn new(grammar: Grammar) -> Self {
        let analysis = Analysis::build(&grammar);
        Self {
            grammar,
            analysis,
            trace: TraceLog::new(TraceConfig::default()),
        }
    }

    /// Replace the trace configuration.
    pub fn set_trace(&mut self, config: TraceConfig) {
        self.trace = TraceLog::new(config);
    }

    /// The derivation trace of the most recent parse.
    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Tokenize and parse `source` into an OPS program.
    pub fn parse(&mut self, source: &str) -> OpsResult<OpsProgram> {
        let tokens = tokenize(source)?;
        self.parse_tokens(&tokens)
    }

    /// Parse an already-tokenized program.
    pub fn parse_tokens(&mut self, tokens: &[Token]) -> OpsResult<OpsProgram> {
        self.trace.clear();

        let mut symbols = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            let terminal = terminal_for(token);
            if !self.analysis.is_terminal(&terminal) {
                return Err(OpsError::UncoveredLexeme { lexeme: token.lexeme.clone() });
            }
            symbols.push(terminal);
        }
        symbols.push(END.to_string());

        let mut state = ParseState {
            tokens,
            symbols,
            position: 0,
            emitter: Emitter::new(),
            depth: 0,
        };

        self.parse_non_terminal(START_SYMBOL, &mut state)?;

        if state.lookahead() != END {
            return Err(OpsError::TrailingInput { found: state.lookahead().to_string() });
        }

        Ok(state.emitter.into_program())
    }

    fn parse_non_terminal(&mut self, non_terminal: &str, state: &mut ParseState<'_>) -> OpsResult<()> {
        let ops_before = state.emitter.ops_string();
        let lookahead = state.lookahead().to_string();

        let rule = self
            .choose_rule(non_terminal, &lookahead)
            .ok_or_else(|| OpsError::NoRuleApplies {
                non_terminal: non_terminal.to_string(),
                lookahead: lookahead.clone(),
            })?
            .clone();

        state.depth += 1;
        for (i, sym) in rule.symbols.iter().enumerate() {
            if sym != EPSILON {
                if self.analysis.is_non_terminal(sym) {
                    self.parse_non_terminal(sym, state)?;
                } else {
                    state.match_terminal(sym)?;
                }
            }
            if let Some(tag) = rule.action_at(i) {
                state.emitter.apply(tag)?;
            }
        }
        state.depth -= 1;

        if self.trace.enabled() {
            self.trace.record(RuleTrace {
                depth: state.depth,
                non_terminal: non_terminal.to_string(),
                rule: rule.to_string(),
                ops_before,
                ops_after: state.emitter.ops_string(),
            });
        }
        Ok(())
    }

    /// First production, in table order, consistent with the lookahead.
    fn choose_rule(&self, non_terminal: &str, lookahead: &str) -> Option<&Rule> {
        let rules = self.grammar.rules_for(non_terminal);
        let firsts = self.analysis.rule_firsts(non_terminal);
        for (rule, first) in rules.iter().zip(firsts) {
            if first.contains(lookahead) {
                return Some(rule);
            }
            if first.contains(EPSILON) {
                let in_follow = self
                    .analysis
                    .follow(non_terminal)
                    .map(|follow| follow.contains(lookahead))
                    .unwrap_or(false);
                if in_follow {
                    return Some(rule);
                }
            }
        }
        None
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Grammar::standard())
    }
}

/// Map a token to its grammar terminal.
fn terminal_for(token: &Token) -> String {
    match token.kind {
        TokenKind::Keyword => token.lexeme.to_uppercase(),
        TokenKind::Operator => token.lexeme.clone(),
        TokenKind::Number => "k".to_string(),
        TokenKind::Identifier => "a".to_string(),
    }
}
