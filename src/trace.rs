//! Derivation trace for the predictive parser.
//!
//! Each applied production is recorded as a [`RuleTrace`]: the
//! non-terminal, the production display, and the OPS string before and
//! after the rule's actions ran, indented by recursion depth. Rendering
//! supports structured text lines and JSON Lines.

use serde::Serialize;

/// Output format for the derivation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// Three indented text lines per applied rule.
    Text,
    /// One JSON object per applied rule.
    JsonLines,
}

/// Configuration for trace collection.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Whether rule applications are recorded at all.
    pub enabled: bool,
    pub format: TraceFormat,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { enabled: true, format: TraceFormat::Text }
    }
}

impl TraceConfig {
    /// A disabled trace; nothing is recorded.
    pub fn disabled() -> Self {
        Self { enabled: false, format: TraceFormat::Text }
    }
}

/// One applied production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTrace {
    /// Recursion depth of the application, 0 for the start symbol.
    pub depth: usize,
    pub non_terminal: String,
    /// Production display: symbols plus the action column.
    pub rule: String,
    pub ops_before: String,
    pub ops_after: String,
}

/// Collector for rule applications during one parse.
#[derive(Debug, Default)]
pub struct TraceLog {
    config: TraceConfig,
    events: Vec<RuleTrace>,
}

impl TraceLog {
    pub fn new(config: TraceConfig) -> Self {
        Self { config, events: Vec::new() }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Record one rule application. No-op when disabled.
    pub fn record(&mut self, event: RuleTrace) {
        if self.config.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[RuleTrace] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Render all recorded events as output lines in the configured format.
    pub fn render(&self) -> Vec<String> {
        match self.config.format {
            TraceFormat::Text => self
                .events
                .iter()
                .flat_map(|ev| {
                    let indent = "  ".repeat(ev.depth);
                    [
                        format!("{}Apply: {} -> {}", indent, ev.non_terminal, ev.rule),
                        format!("{}OPS before: {}", indent, ev.ops_before),
                        format!("{}OPS after:  {}", indent, ev.ops_after),
                    ]
                })
                .collect(),
            TraceFormat::JsonLines => self
                .events
                .iter()
                .filter_map(|ev| serde_json::to_string(ev).ok())
                .collect(),
        }
    }
}
