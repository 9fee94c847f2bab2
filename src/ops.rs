//! The linear postfix intermediate representation ("OPS").
//!
//! An OPS program is a flat, 0-indexed sequence of elements. Labels `M<n>`
//! address element indices; `M?` placeholders exist only while the parser
//! is still back-patching and must all be resolved before execution.

use std::fmt;

/// What an OPS element denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsKind {
    /// A variable name, pushed as a name for later resolution.
    Identifier,
    /// An integer literal.
    Number,
    /// A resolved jump target `M<n>`.
    Label,
    /// An unresolved forward target `M?`; never survives parsing.
    LabelPlaceholder,
    /// An operation dispatched by the executor.
    Operation,
}

impl fmt::Display for OpsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpsKind::Identifier => write!(f, "identifier"),
            OpsKind::Number => write!(f, "number"),
            OpsKind::Label => write!(f, "label"),
            OpsKind::LabelPlaceholder => write!(f, "label-placeholder"),
            OpsKind::Operation => write!(f, "operation"),
        }
    }
}

/// One element of an OPS program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsElement {
    pub value: String,
    pub kind: OpsKind,
}

impl OpsElement {
    pub fn identifier(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: OpsKind::Identifier }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: OpsKind::Number }
    }

    /// A resolved label addressing element index `target`.
    pub fn label(target: usize) -> Self {
        Self { value: format!("M{}", target), kind: OpsKind::Label }
    }

    pub fn placeholder() -> Self {
        Self { value: "M?".to_string(), kind: OpsKind::LabelPlaceholder }
    }

    pub fn operation(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: OpsKind::Operation }
    }
}

impl fmt::Display for OpsElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.value, self.kind)
    }
}

/// A complete OPS program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpsProgram {
    elements: Vec<OpsElement>,
}

impl OpsProgram {
    pub fn new(elements: Vec<OpsElement>) -> Self {
        Self { elements }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OpsElement> {
        self.elements.get(index)
    }

    pub fn elements(&self) -> &[OpsElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OpsElement> {
        self.elements.iter()
    }

    /// True if any unresolved `M?` placeholder remains.
    pub fn has_placeholders(&self) -> bool {
        self.elements.iter().any(|el| el.kind == OpsKind::LabelPlaceholder)
    }
}

impl fmt::Display for OpsProgram {
    /// Element values joined by single spaces, in emission order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for el in &self.elements {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", el.value)?;
            first = false;
        }
        Ok(())
    }
}
