//! The Greibach-style grammar table.
//!
//! Each production carries, next to its right-hand side, a parallel column
//! of semantic-action tags. An action at index `i` fires after the symbol
//! at index `i` has been processed; `□` means no action. The table is
//! immutable after construction, and the order in which productions were
//! inserted is load-bearing: rule selection tries them first to last.

use std::collections::HashMap;
use std::fmt;

/// The empty production / nullable marker.
pub const EPSILON: &str = "λ";
/// End-of-input sentinel appended to the token stream.
pub const END: &str = "$";
/// Action column entry meaning "no action".
pub const NO_ACTION: &str = "□";

/// The grammar's start symbol.
pub const START_SYMBOL: &str = "A";

/// One production: RHS symbols, parallel action tags, and a comment.
///
/// The fixed table carries one row whose action column is longer than its
/// symbol column; entries past the end of `symbols` are never applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub symbols: Vec<String>,
    pub actions: Vec<String>,
    pub comment: &'static str,
}

impl Rule {
    fn new(symbols: &[&str], actions: &[&str], comment: &'static str) -> Self {
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            comment,
        }
    }

    /// True for the `λ` production.
    pub fn is_empty_production(&self) -> bool {
        self.symbols.len() == 1 && self.symbols[0] == EPSILON
    }

    /// The action to fire after symbol `index`, if one is set.
    pub fn action_at(&self, index: usize) -> Option<&str> {
        match self.actions.get(index) {
            Some(tag) if !tag.is_empty() && tag != NO_ACTION => Some(tag.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols.join(" "))?;
        if !self.actions.is_empty() {
            write!(f, " | OPS: {}", self.actions.join(" "))?;
        }
        Ok(())
    }
}

/// Ordered mapping non-terminal -> ordered list of productions.
#[derive(Debug, Clone)]
pub struct Grammar {
    order: Vec<String>,
    rules: HashMap<String, Vec<Rule>>,
}

impl Grammar {
    /// The fixed grammar of the surface language.
    pub fn standard() -> Self {
        let mut g = Grammar { order: Vec::new(), rules: HashMap::new() };

        g.add("A", &["VAR", "P", ";", "A"], &["□", "□", "□", "□"], "Scalar variable declaration");
        g.add("A", &["ARRAY", "K", ";", "A"], &["□", "□", "□", "□"], "Array declaration");
        g.add(
            "A",
            &["IF", "(", "L", ")", "THEN", "{", "A", "}", "C", "Z", ";", "A"],
            &["□", "□", "□", "□", "7", "□", "□", "□", "□", "8", "□", "□"],
            "Conditional statement",
        );
        g.add(
            "A",
            &["WHILE", "(", "L", ")", "DO", "{", "A", "}", "Z", ";", "A"],
            &["9", "□", "□", "□", "7", "□", "□", "□", "10", "□", "□"],
            "WHILE loop",
        );
        g.add(
            "A",
            &["a", "H", ":=", "E", "Z", ";", "A"],
            &["a", "□", "□", "□", ":", "=", "□", "□"],
            "Assignment to a variable",
        );
        g.add("A", &["OUTPUT", "E", ";", "A"], &["□", "□", "o", "□"], "Output statement");
        g.add("A", &["INPUT", "I'", ";", "A"], &["□", "□", "s", "□"], "Input statement");
        g.add("A", &[EPSILON], &[], "End of program");

        g.add("C", &["ELSE", "{", "A", "}"], &["2", "□", "□", "□"], "Conditional: alternative branch");
        g.add("C", &[EPSILON], &[], "Conditional: no alternative");

        g.add("H", &["[", "E", "]"], &["□", "□", "i"], "Array index");
        g.add("H", &[EPSILON], &[], "Plain variable");

        g.add("E", &["-", "G", "V", "U"], &["□", "□", "-'", "□"], "");
        g.add("E", &["(", "E", ")", "V", "U"], &["□", "□", "□", "□", "□"], "");
        g.add("E", &["a", "H", "V", "U"], &["a", "□", "□", "□"], "");
        g.add("E", &["k", "V", "U"], &["k", "□", "□"], "");

        g.add("U", &["+", "T", "U"], &["□", "□", "+"], "");
        g.add("U", &["-", "T", "U"], &["□", "□", "-"], "");
        g.add("U", &[EPSILON], &[], "");

        g.add("V", &["*", "F", "V"], &["□", "□", "*"], "");
        g.add("V", &["/", "F", "V"], &["□", "□", "/"], "");
        g.add("V", &[EPSILON], &[], "");

        g.add("T", &["-", "G", "V"], &["□", "□", "-'"], "");
        g.add("T", &["(", "E", ")", "V"], &["□", "□", "□", "□"], "");
        g.add("T", &["a", "H", "V"], &["a", "□", "□"], "");
        g.add("T", &["k", "V"], &["k", "□"], "");

        g.add("F", &["-", "G", "Z"], &["□", "□", "-'"], "");
        g.add("F", &["(", "E", ")"], &["□", "□", "□"], "");
        g.add("F", &["a", "H"], &["a", "□"], "");
        g.add("F", &["k"], &["k"], "");

        g.add("G", &["(", "E", ")"], &["□", "□", "□"], "");
        g.add("G", &["a", "H"], &["a", "□"], "");
        g.add("G", &["k"], &["k"], "");

        g.add("L", &["-", "G", "Z", "U", "O", "X", "W"], &["□", "□", "-'", "□", "□", "□", "□"], "");
        g.add("L", &["(", "L", ")", "X", "W"], &["□", "□", "□", "□", "□"], "");
        g.add("L", &["a", "H", "V", "U", "O", "X", "W"], &["a", "□", "□", "□", "□", "□", "□"], "");
        g.add("L", &["k", "V", "U", "O", "X", "W"], &["k", "□", "□", "□", "□", "□"], "");
        g.add("L", &["!", "(", "L", ")", "X", "W"], &["□", "□", "□", "□", "□", "!"], "");

        g.add("M", &["-", "G", "Z", "V", "U", "O", "X"], &["□", "□", "-'", "□", "□", "□", "□"], "");
        g.add("M", &["(", "L", ")", "X"], &["□", "□", "□", "□"], "");
        g.add("M", &["a", "H", "V", "U", "O", "X"], &["a", "□", "□", "□", "□", "□"], "");
        g.add("M", &["k", "V", "U", "O", "X"], &["k", "□", "□", "□"], "");
        g.add("M", &["!", "(", "L", ")", "X"], &["□", "□", "□", "□", "!"], "");

        g.add("W", &["OR", "M", "W"], &["□", "□", "OR"], "");
        g.add("W", &[EPSILON], &[], "");

        g.add("X", &["AND", "N", "X"], &["□", "□", "AND"], "");
        g.add("X", &[EPSILON], &[], "");

        g.add("N", &["-", "G", "Z", "V", "U", "O"], &["□", "□", "-'", "□", "□", "□"], "");
        g.add("N", &["(", "L", ")"], &["□", "□", "□"], "");
        g.add("N", &["a", "H", "V", "U", "O"], &["a", "□", "□", "□", "□"], "");
        g.add("N", &["k", "V", "U", "O"], &["k", "□", "□", "□"], "");
        g.add("N", &["!", "(", "L", ")", "Z"], &["□", "□", "□", "□", "!"], "");

        g.add("O", &["<", "E", "Z"], &["□", "□", "<"], "");
        g.add("O", &[">", "E", "Z"], &["□", "□", ">"], "");
        g.add("O", &[">=", "E", "Z"], &["□", "□", ">="], "");
        g.add("O", &["<=", "E", "Z"], &["□", "□", "<="], "");
        g.add("O", &["==", "E", "Z"], &["□", "□", "=="], "");
        g.add("O", &["!=", "E", "Z"], &["□", "□", "!="], "");

        g.add("P", &["a", "Z", "B"], &["a", "n", "□"], "");
        g.add("B", &[":=", "E", "Z"], &["□", "□", "f"], "");
        g.add("B", &[EPSILON], &[], "");

        g.add("K", &["a", "R"], &["a", "□"], "");
        g.add("R", &["(", "E", ")"], &["□", "□", "ar"], "");
        g.add("I'", &["a", "H"], &["a", "□"], "");
        g.add("Z", &[EPSILON], &[], "");

        g
    }

    fn add(&mut self, non_terminal: &str, symbols: &[&str], actions: &[&str], comment: &'static str) {
        if !self.rules.contains_key(non_terminal) {
            self.order.push(non_terminal.to_string());
            self.rules.insert(non_terminal.to_string(), Vec::new());
        }
        if let Some(rules) = self.rules.get_mut(non_terminal) {
            rules.push(Rule::new(symbols, actions, comment));
        }
    }

    /// Productions of `non_terminal`, in trial order. Empty for unknown names.
    pub fn rules_for(&self, non_terminal: &str) -> &[Rule] {
        self.rules.get(non_terminal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-terminals in insertion order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    /// All (non-terminal, productions) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.order
            .iter()
            .map(move |nt| (nt.as_str(), self.rules_for(nt)))
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}
