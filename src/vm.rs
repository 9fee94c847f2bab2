//! Stack machine for OPS programs.
//!
//! The executor walks the element sequence with an instruction pointer.
//! Identifier, number, and label elements push themselves; operation
//! elements pop their operands, dispatch, and push results. The operand
//! stack is heterogeneous: integers, booleans, bare names, labels, and
//! array references coexist, and each operation coerces explicitly.
//!
//! Two coercions centralize the error taxonomy:
//! - `as_integer`: integers pass; names must be bound to integers; array
//!   references read their element; booleans are rejected
//! - `as_boolean`: booleans pass; integers are true when nonzero
//!
//! Bare names resolve late ("resolve-or-keep"): a name that is bound
//! resolves to its value, an unbound name stays text. `o` leans on this
//! to print `name=value` for variables and the bare value otherwise.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io::{self, Write};

use crate::error::{OpsError, OpsResult};
use crate::ops::{OpsKind, OpsProgram};

// =============================================================================
// Values
// =============================================================================

/// A value on the operand stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    /// A variable name, resolved when an operation needs its value.
    Name(String),
    /// A jump target in `M<n>` form.
    Label(String),
    /// A pending array element access.
    ArrayRef { name: String, index: i64 },
}

impl Value {
    /// Human-readable shape + content, for error messages.
    fn describe(&self) -> String {
        match self {
            Value::Int(n) => format!("integer {}", n),
            Value::Bool(b) => format!("boolean {}", b),
            Value::Name(s) => format!("identifier '{}'", s),
            Value::Label(s) => format!("label '{}'", s),
            Value::ArrayRef { name, index } => format!("array reference {}[{}]", name, index),
        }
    }
}

/// A value bound in the variable table.
///
/// `Name` appears because operation `f` stores its operand unresolved:
/// `VAR x := y;` binds `x` to the text `y`, not to `y`'s value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Int(i64),
    Bool(bool),
    Array(Vec<i64>),
    Name(String),
}

impl Binding {
    fn describe(&self) -> String {
        match self {
            Binding::Int(n) => format!("integer {}", n),
            Binding::Bool(b) => format!("boolean {}", b),
            Binding::Array(items) => format!("array of length {}", items.len()),
            Binding::Name(s) => format!("text '{}'", s),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Int(n) => write!(f, "{}", n),
            Binding::Bool(b) => write!(f, "{}", b),
            Binding::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Binding::Name(s) => write!(f, "{}", s),
        }
    }
}

// =============================================================================
// Input sources
// =============================================================================

/// Supplies integers for the `s` (INPUT) operation.
pub trait InputSource {
    /// Produce the next integer for variable `name`. May block.
    fn next_integer(&mut self, name: &str) -> OpsResult<i64>;
}

/// Canned input values, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct BufferedInput {
    values: VecDeque<i64>,
}

impl BufferedInput {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self { values: values.into_iter().collect() }
    }
}

impl InputSource for BufferedInput {
    fn next_integer(&mut self, name: &str) -> OpsResult<i64> {
        self.values
            .pop_front()
            .ok_or_else(|| OpsError::InputExhausted { name: name.to_string() })
    }
}

/// Interactive console input: prompts, re-prompts on non-integer lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn next_integer(&mut self, name: &str) -> OpsResult<i64> {
        let mut prompt = format!("INPUT {}: ", name);
        loop {
            print!("{}", prompt);
            io::stdout().flush()?;
            let mut line = String::new();
            let read = io::stdin().read_line(&mut line)?;
            if read == 0 {
                return Err(OpsError::InputExhausted { name: name.to_string() });
            }
            match line.trim().parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    prompt = format!("Enter an integer value for {}: ", name);
                }
            }
        }
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Configuration for the executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of elements to execute (runaway-loop guard).
    pub max_steps: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { max_steps: 10_000_000 }
    }
}

/// Result of running an OPS program to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Lines produced by `o`, in emission order.
    pub output: Vec<String>,
    /// Final variable table.
    pub variables: HashMap<String, Binding>,
}

/// The OPS stack machine.
pub struct Executor {
    config: ExecutorConfig,
    input: Box<dyn InputSource>,
    stack: Vec<Value>,
    variables: HashMap<String, Binding>,
    /// Names declared by `n`/`ar` whose initializer has not run yet.
    init_stack: Vec<String>,
    output: Vec<String>,
}

impl Executor {
    /// Executor reading `INPUT` interactively from stdin.
    pub fn new() -> Self {
        Self::with_source(ExecutorConfig::default(), Box::new(StdinInput))
    }

    /// Executor reading `INPUT` from canned values.
    pub fn with_input(values: impl IntoIterator<Item = i64>) -> Self {
        Self::with_source(ExecutorConfig::default(), Box::new(BufferedInput::new(values)))
    }

    pub fn with_source(config: ExecutorConfig, input: Box<dyn InputSource>) -> Self {
        Self {
            config,
            input,
            stack: Vec::new(),
            variables: HashMap::new(),
            init_stack: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Run `program` from a clean state.
    pub fn execute(&mut self, program: &OpsProgram) -> OpsResult<ExecResult> {
        self.stack.clear();
        self.variables.clear();
        self.init_stack.clear();
        self.output.clear();

        let mut ip = 0usize;
        let mut steps = 0u64;

        while ip < program.len() {
            if steps >= self.config.max_steps {
                return Err(OpsError::StepLimitExceeded { limit: self.config.max_steps });
            }
            steps += 1;

            let element = &program.elements()[ip];
            match element.kind {
                OpsKind::Identifier => {
                    self.stack.push(Value::Name(element.value.clone()));
                    ip += 1;
                }
                OpsKind::Number => {
                    let n = element.value.parse::<i64>().map_err(|_| {
                        OpsError::InvalidNumber { text: element.value.clone() }
                    })?;
                    self.stack.push(Value::Int(n));
                    ip += 1;
                }
                OpsKind::Label | OpsKind::LabelPlaceholder => {
                    self.stack.push(Value::Label(element.value.clone()));
                    ip += 1;
                }
                OpsKind::Operation => {
                    ip = self.dispatch(&element.value, ip)?;
                }
            }
        }

        Ok(ExecResult {
            output: std::mem::take(&mut self.output),
            variables: std::mem::take(&mut self.variables),
        })
    }

    /// Execute one operation at `ip`; returns the next instruction pointer.
    fn dispatch(&mut self, op: &str, ip: usize) -> OpsResult<usize> {
        match op {
            "+" => {
                let (a, b) = self.pop_integer_pair(op)?;
                self.stack.push(Value::Int(a.wrapping_add(b)));
            }
            "-" => {
                let (a, b) = self.pop_integer_pair(op)?;
                self.stack.push(Value::Int(a.wrapping_sub(b)));
            }
            "*" => {
                let (a, b) = self.pop_integer_pair(op)?;
                self.stack.push(Value::Int(a.wrapping_mul(b)));
            }
            "/" => {
                let (a, b) = self.pop_integer_pair(op)?;
                if b == 0 {
                    return Err(OpsError::DivisionByZero);
                }
                self.stack.push(Value::Int(a.wrapping_div(b)));
            }
            "-'" => {
                let value = self.pop(op)?;
                let a = self.as_integer(value)?;
                self.stack.push(Value::Int(a.wrapping_neg()));
            }
            "<" | ">" | "<=" | ">=" | "==" | "!=" => {
                let (a, b) = self.pop_integer_pair(op)?;
                let result = match op {
                    "<" => a < b,
                    ">" => a > b,
                    "<=" => a <= b,
                    ">=" => a >= b,
                    "==" => a == b,
                    "!=" => a != b,
                    _ => false,
                };
                self.stack.push(Value::Bool(result));
            }
            "AND" => {
                let (a, b) = self.pop_boolean_pair(op)?;
                self.stack.push(Value::Bool(a && b));
            }
            "OR" => {
                let (a, b) = self.pop_boolean_pair(op)?;
                self.stack.push(Value::Bool(a || b));
            }
            "!" => {
                let value = self.pop(op)?;
                let a = self.as_boolean(value)?;
                self.stack.push(Value::Bool(!a));
            }
            "jf" => {
                let target_value = self.pop(op)?;
                let cond_value = self.pop(op)?;
                let cond = self.as_boolean(cond_value)?;
                let target = parse_label(&target_value)?;
                if !cond {
                    return Ok(target);
                }
            }
            "j" => {
                let target_value = self.pop(op)?;
                return Ok(parse_label(&target_value)?);
            }
            "n" => {
                let value = self.pop(op)?;
                let name = self.as_name(value)?;
                self.variables.entry(name.clone()).or_insert(Binding::Int(0));
                self.init_stack.push(name);
            }
            "ar" => {
                let size_value = self.pop(op)?;
                let size = self.as_integer(size_value)?;
                let name_value = self.pop(op)?;
                let name = self.as_name(name_value)?;
                if size < 0 {
                    return Err(OpsError::InvalidArrayLength { length: size });
                }
                self.variables.insert(name.clone(), Binding::Array(vec![0; size as usize]));
                self.init_stack.push(name);
            }
            "f" => {
                // The init stack is peeked, not popped.
                let name = self
                    .init_stack
                    .last()
                    .cloned()
                    .ok_or(OpsError::EmptyInitStack)?;
                let value = self.pop(op)?;
                let binding = match value {
                    Value::Int(n) => Binding::Int(n),
                    Value::Bool(b) => Binding::Bool(b),
                    Value::Name(s) | Value::Label(s) => Binding::Name(s),
                    Value::ArrayRef { name: array, index } => {
                        Binding::Int(self.read_array(&array, index)?)
                    }
                };
                self.variables.insert(name, binding);
            }
            "i" => {
                let index_value = self.pop(op)?;
                let index = self.as_integer(index_value)?;
                let name_value = self.pop(op)?;
                let name = self.as_name(name_value)?;
                self.stack.push(Value::ArrayRef { name, index });
            }
            "s" => {
                let value = self.pop(op)?;
                let name = self.as_name(value)?;
                let read = self.input.next_integer(&name)?;
                self.variables.insert(name, Binding::Int(read));
                self.stack.push(Value::Int(read));
            }
            "o" => {
                let value = self.pop(op)?;
                let line = self.format_output(value)?;
                self.output.push(line);
            }
            ":=" | "=" => {
                let rhs = self.pop(op)?;
                let value = self.resolve_value(rhs)?;
                let target = self.pop(op)?;
                match target {
                    Value::ArrayRef { name, index } => {
                        let n = self.binding_as_integer(&value)?;
                        self.write_array(&name, index, n)?;
                    }
                    Value::Name(name) => {
                        self.variables.insert(name, value);
                    }
                    other => {
                        return Err(OpsError::TypeMismatch {
                            expected: "identifier",
                            found: other.describe(),
                        });
                    }
                }
            }
            ":" => {
                // Syntactic marker, nothing to do.
            }
            other => {
                return Err(OpsError::UnknownOperation { value: other.to_string() });
            }
        }
        Ok(ip + 1)
    }

    fn pop(&mut self, operation: &str) -> OpsResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| OpsError::OperandStackEmpty { operation: operation.to_string() })
    }

    /// Pop `b` then `a`, both coerced to integers.
    fn pop_integer_pair(&mut self, operation: &str) -> OpsResult<(i64, i64)> {
        let b_value = self.pop(operation)?;
        let b = self.as_integer(b_value)?;
        let a_value = self.pop(operation)?;
        let a = self.as_integer(a_value)?;
        Ok((a, b))
    }

    /// Pop `b` then `a`, both coerced to booleans.
    fn pop_boolean_pair(&mut self, operation: &str) -> OpsResult<(bool, bool)> {
        let b_value = self.pop(operation)?;
        let b = self.as_boolean(b_value)?;
        let a_value = self.pop(operation)?;
        let a = self.as_boolean(a_value)?;
        Ok((a, b))
    }

    fn as_integer(&self, value: Value) -> OpsResult<i64> {
        match value {
            Value::Int(n) => Ok(n),
            Value::ArrayRef { name, index } => self.read_array(&name, index),
            Value::Name(name) => match self.variables.get(&name) {
                Some(Binding::Int(n)) => Ok(*n),
                None => Err(OpsError::UninitializedVariable { name }),
                Some(other) => Err(OpsError::TypeMismatch {
                    expected: "integer",
                    found: other.describe(),
                }),
            },
            other => Err(OpsError::TypeMismatch {
                expected: "integer",
                found: other.describe(),
            }),
        }
    }

    fn as_boolean(&self, value: Value) -> OpsResult<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(n) => Ok(n != 0),
            other => Err(OpsError::TypeMismatch {
                expected: "boolean",
                found: other.describe(),
            }),
        }
    }

    fn as_name(&self, value: Value) -> OpsResult<String> {
        match value {
            Value::Name(s) => Ok(s),
            other => Err(OpsError::TypeMismatch {
                expected: "identifier",
                found: other.describe(),
            }),
        }
    }

    /// Resolve an operand to a storable value. Array references read their
    /// element; bound names resolve; unbound names stay as text.
    fn resolve_value(&self, value: Value) -> OpsResult<Binding> {
        match value {
            Value::Int(n) => Ok(Binding::Int(n)),
            Value::Bool(b) => Ok(Binding::Bool(b)),
            Value::ArrayRef { name, index } => Ok(Binding::Int(self.read_array(&name, index)?)),
            Value::Name(s) | Value::Label(s) => Ok(self
                .variables
                .get(&s)
                .cloned()
                .unwrap_or(Binding::Name(s))),
        }
    }

    /// Coerce an already-resolved value to an integer for an element store.
    fn binding_as_integer(&self, binding: &Binding) -> OpsResult<i64> {
        match binding {
            Binding::Int(n) => Ok(*n),
            Binding::Name(s) => match self.variables.get(s) {
                Some(Binding::Int(n)) => Ok(*n),
                None => Err(OpsError::UninitializedVariable { name: s.clone() }),
                Some(other) => Err(OpsError::TypeMismatch {
                    expected: "integer",
                    found: other.describe(),
                }),
            },
            other => Err(OpsError::TypeMismatch {
                expected: "integer",
                found: other.describe(),
            }),
        }
    }

    fn read_array(&self, name: &str, index: i64) -> OpsResult<i64> {
        match self.variables.get(name) {
            Some(Binding::Array(items)) => {
                if index < 0 || index as usize >= items.len() {
                    Err(OpsError::IndexOutOfRange {
                        name: name.to_string(),
                        index,
                        length: items.len(),
                    })
                } else {
                    Ok(items[index as usize])
                }
            }
            _ => Err(OpsError::NotAnArray { name: name.to_string() }),
        }
    }

    fn write_array(&mut self, name: &str, index: i64, value: i64) -> OpsResult<()> {
        match self.variables.get_mut(name) {
            Some(Binding::Array(items)) => {
                if index < 0 || index as usize >= items.len() {
                    Err(OpsError::IndexOutOfRange {
                        name: name.to_string(),
                        index,
                        length: items.len(),
                    })
                } else {
                    items[index as usize] = value;
                    Ok(())
                }
            }
            _ => Err(OpsError::NotAnArray { name: name.to_string() }),
        }
    }

    /// Line produced by `o`: `name=value` for a bound bare name, the
    /// resolved value alone otherwise.
    fn format_output(&self, value: Value) -> OpsResult<String> {
        if let Value::Name(name) = &value {
            if let Some(binding) = self.variables.get(name) {
                return Ok(format!("{}={}", name, binding));
            }
        }
        let resolved = self.resolve_value(value)?;
        Ok(resolved.to_string())
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an `M<n>` jump target into an element index.
fn parse_label(value: &Value) -> OpsResult<usize> {
    let text = match value {
        Value::Label(s) | Value::Name(s) => s.as_str(),
        other => {
            return Err(OpsError::MalformedLabel { value: other.describe() });
        }
    };
    text.strip_prefix('M')
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or_else(|| OpsError::MalformedLabel { value: text.to_string() })
}
