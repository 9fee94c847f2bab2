//! FIRST and FOLLOW sets over the grammar.
//!
//! Computed once when a parser is built and memoized:
//! - `FIRST` for every non-terminal, by fixed-point iteration
//! - a per-production `FIRST(RHS)`, used directly for rule selection
//! - `FOLLOW` for every non-terminal, seeded with `FOLLOW(start) = {$}`
//!   and propagated with a right-to-left trailer walk until stable

use std::collections::{HashMap, HashSet};

use crate::grammar::{Grammar, END, EPSILON, START_SYMBOL};

/// Memoized FIRST/FOLLOW sets plus the grammar's symbol classification.
#[derive(Debug, Clone)]
pub struct Analysis {
    non_terminals: HashSet<String>,
    terminals: HashSet<String>,
    first: HashMap<String, HashSet<String>>,
    follow: HashMap<String, HashSet<String>>,
    /// FIRST(RHS) per production, keyed by non-terminal, in rule order.
    rule_firsts: HashMap<String, Vec<HashSet<String>>>,
}

impl Analysis {
    /// Compute all sets for `grammar`.
    pub fn build(grammar: &Grammar) -> Self {
        let non_terminals: HashSet<String> =
            grammar.non_terminals().map(str::to_string).collect();
        let terminals = collect_terminals(grammar, &non_terminals);

        let first = compute_first(grammar, &non_terminals);

        let mut rule_firsts: HashMap<String, Vec<HashSet<String>>> = HashMap::new();
        for (nt, rules) in grammar.iter() {
            let per_rule = rules
                .iter()
                .map(|rule| sequence_first(&rule.symbols, &first, &non_terminals))
                .collect();
            rule_firsts.insert(nt.to_string(), per_rule);
        }

        let follow = compute_follow(grammar, &non_terminals, &first);

        Self { non_terminals, terminals, first, follow, rule_firsts }
    }

    #[inline]
    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// True for symbols that may appear in the mapped token stream.
    #[inline]
    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    /// FIRST of a single symbol. Terminals (and `λ`) are their own FIRST.
    pub fn first(&self, symbol: &str) -> HashSet<String> {
        match self.first.get(symbol) {
            Some(set) => set.clone(),
            None => std::iter::once(symbol.to_string()).collect(),
        }
    }

    /// FIRST of a symbol sequence.
    pub fn first_of_sequence(&self, sequence: &[String]) -> HashSet<String> {
        sequence_first(sequence, &self.first, &self.non_terminals)
    }

    /// FOLLOW of a non-terminal; `None` for unknown names.
    pub fn follow(&self, non_terminal: &str) -> Option<&HashSet<String>> {
        self.follow.get(non_terminal)
    }

    /// Memoized FIRST(RHS) for each production of `non_terminal`.
    pub fn rule_firsts(&self, non_terminal: &str) -> &[HashSet<String>] {
        self.rule_firsts
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All RHS symbols that are not non-terminals and not `λ`, plus `$`.
fn collect_terminals(grammar: &Grammar, non_terminals: &HashSet<String>) -> HashSet<String> {
    let mut terminals = HashSet::new();
    for (_, rules) in grammar.iter() {
        for rule in rules {
            for sym in &rule.symbols {
                if !non_terminals.contains(sym) && sym != EPSILON {
                    terminals.insert(sym.clone());
                }
            }
        }
    }
    terminals.insert(END.to_string());
    terminals
}

/// FIRST for every non-terminal, iterated until no set grows.
fn compute_first(
    grammar: &Grammar,
    non_terminals: &HashSet<String>,
) -> HashMap<String, HashSet<String>> {
    let mut first: HashMap<String, HashSet<String>> = grammar
        .non_terminals()
        .map(|nt| (nt.to_string(), HashSet::new()))
        .collect();

    loop {
        let mut changed = false;
        for (nt, rules) in grammar.iter() {
            for rule in rules {
                let addition = sequence_first(&rule.symbols, &first, non_terminals);
                if let Some(set) = first.get_mut(nt) {
                    let before = set.len();
                    set.extend(addition);
                    changed |= set.len() > before;
                }
            }
        }
        if !changed {
            break;
        }
    }

    first
}

/// FIRST of a sequence: walk left to right, dropping `λ` from each symbol's
/// FIRST, stopping at the first non-nullable symbol; if every symbol was
/// nullable the sequence itself is, so `λ` joins the result.
fn sequence_first(
    sequence: &[String],
    first: &HashMap<String, HashSet<String>>,
    non_terminals: &HashSet<String>,
) -> HashSet<String> {
    let mut result = HashSet::new();
    let mut all_nullable = true;

    for sym in sequence {
        if non_terminals.contains(sym) {
            let sym_first = match first.get(sym) {
                Some(set) => set,
                None => break,
            };
            result.extend(sym_first.iter().filter(|s| *s != EPSILON).cloned());
            if !sym_first.contains(EPSILON) {
                all_nullable = false;
                break;
            }
        } else if sym == EPSILON {
            // FIRST(λ) = {λ}: nullable, contributes nothing else.
        } else {
            result.insert(sym.clone());
            all_nullable = false;
            break;
        }
    }

    if all_nullable {
        result.insert(EPSILON.to_string());
    }
    result
}

/// FOLLOW by fixed point, with a right-to-left trailer per production.
fn compute_follow(
    grammar: &Grammar,
    non_terminals: &HashSet<String>,
    first: &HashMap<String, HashSet<String>>,
) -> HashMap<String, HashSet<String>> {
    let mut follow: HashMap<String, HashSet<String>> = grammar
        .non_terminals()
        .map(|nt| (nt.to_string(), HashSet::new()))
        .collect();
    if let Some(start) = follow.get_mut(START_SYMBOL) {
        start.insert(END.to_string());
    }

    loop {
        let mut changed = false;
        for (lhs, rules) in grammar.iter() {
            for rule in rules {
                if rule.is_empty_production() {
                    continue;
                }
                let mut trailer: HashSet<String> =
                    follow.get(lhs).cloned().unwrap_or_default();
                for sym in rule.symbols.iter().rev() {
                    if non_terminals.contains(sym) {
                        if let Some(set) = follow.get_mut(sym) {
                            let before = set.len();
                            set.extend(trailer.iter().cloned());
                            changed |= set.len() > before;
                        }
                        let sym_first = first.get(sym).cloned().unwrap_or_default();
                        let without_epsilon =
                            sym_first.iter().filter(|s| *s != EPSILON).cloned();
                        if sym_first.contains(EPSILON) {
                            trailer.extend(without_epsilon);
                        } else {
                            trailer = without_epsilon.collect();
                        }
                    } else {
                        trailer = std::iter::once(sym.clone()).collect();
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    follow
}
