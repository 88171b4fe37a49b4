//! Evaluation errors and control transfer.
//!
//! `EvalErrorKind` gives every runtime failure a typed category; the
//! factory functions below are the public way to build one and keep `kind`
//! and `message` in sync.
//!
//! Non-local exits travel on the error side of [`EvalResult`] as a
//! [`ControlAction`]: either a raised error or a `return` unwinding to the
//! nearest call frame. Every evaluator step propagates them with `?`, so
//! `finally` blocks can intercept any exit path without host unwinding.

use std::fmt;

use flo_ir::{BinaryOp, Span, UnaryOp};

use crate::value::{MapValue, Value};

/// Result of evaluating one node.
pub type EvalResult = Result<Value, ControlAction>;

/// Non-normal outcome of an evaluation step.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// A raised error, recoverable by `attempt/rescue`.
    Error(Box<EvalError>),
    /// `return`, unwinding to the nearest function call (or module, or
    /// strand body).
    Return(Value),
}

impl ControlAction {
    /// The error, if this is one.
    pub fn as_error(&self) -> Option<&EvalError> {
        match self {
            ControlAction::Error(err) => Some(err),
            ControlAction::Return(_) => None,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    // Bindings
    UndefinedVariable { name: String },
    ImmutableBinding { name: String },
    DuplicateBinding { name: String },

    // Types and arithmetic
    TypeMismatch { expected: String, got: String },
    DivisionByZero,
    IntegerOverflow { operation: String },

    // Control
    MatchNotExhaustive { value: String },
    UserRaised(Value),

    // Capabilities and providers
    CapabilityDenied { capability: String, reason: String },
    ProviderError(Value),
    UnresolvedImport { path: String },

    // Calls
    ArityMismatch { name: String, expected: usize, got: usize },
    NotCallable { type_name: String },
    StackOverflow { depth: usize },

    // Access
    IndexOutOfBounds { index: i64, len: usize },
    KeyNotFound { key: String },

    // Strands
    AwaitCycle { strand: u64 },
    UnknownStrand { strand: u64 },
    StrandCancelled { strand: u64 },

    /// Catch-all for errors without a structured category.
    Custom { message: String },
}

impl EvalErrorKind {
    /// Stable category name, exposed to `rescue` as the `kind` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UndefinedVariable { .. } => "UndefinedVariable",
            Self::ImmutableBinding { .. } => "ImmutableBinding",
            Self::DuplicateBinding { .. } => "DuplicateBinding",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::DivisionByZero => "DivisionByZero",
            Self::IntegerOverflow { .. } => "IntegerOverflow",
            Self::MatchNotExhaustive { .. } => "MatchNotExhaustive",
            Self::UserRaised(_) => "UserRaised",
            Self::CapabilityDenied { .. } => "CapabilityDenied",
            Self::ProviderError(_) => "ProviderError",
            Self::UnresolvedImport { .. } => "UnresolvedImport",
            Self::ArityMismatch { .. } => "ArityMismatch",
            Self::NotCallable { .. } => "NotCallable",
            Self::StackOverflow { .. } => "StackOverflow",
            Self::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            Self::KeyNotFound { .. } => "KeyNotFound",
            Self::AwaitCycle { .. } => "AwaitCycle",
            Self::UnknownStrand { .. } => "UnknownStrand",
            Self::StrandCancelled { .. } => "StrandCancelled",
            Self::Custom { .. } => "RuntimeError",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::ImmutableBinding { name } => {
                write!(f, "cannot assign to immutable binding: {name}")
            }
            Self::DuplicateBinding { name } => {
                write!(f, "{name} is already defined in this scope")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::MatchNotExhaustive { value } => write!(f, "no match arm matched {value}"),
            Self::UserRaised(value) => write!(f, "{value}"),
            Self::CapabilityDenied { capability, reason } => {
                write!(f, "capability denied: {capability}: {reason}")
            }
            Self::ProviderError(value) => match value.as_map().and_then(|m| m.get_str("message")) {
                Some(message) => write!(f, "provider error: {message}"),
                None => write!(f, "provider error: {value}"),
            },
            Self::UnresolvedImport { path } => write!(f, "no provider for module {path}"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                if name.is_empty() {
                    write!(f, "expected {expected} {arg_word}, got {got}")
                } else {
                    write!(f, "{name} expects {expected} {arg_word}, got {got}")
                }
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: {key}"),
            Self::AwaitCycle { strand } => {
                write!(f, "awaiting strand#{strand} would wait on itself")
            }
            Self::UnknownStrand { strand } => write!(f, "unknown strand#{strand}"),
            Self::StrandCancelled { strand } => {
                write!(f, "strand#{strand} was cancelled because the program stopped")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktraceFrame {
    /// Function name, or `<lambda>` / `<strand>`.
    pub name: String,
    /// Call site, if known.
    pub span: Option<Span>,
}

/// Call chain an error crossed on its way out, innermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Innermost source location the error passed through.
    pub span: Option<Span>,
    pub backtrace: EvalBacktrace,
}

impl EvalError {
    /// An uncategorised error.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            backtrace: EvalBacktrace::default(),
        }
    }

    /// Attach a span unless one is already set.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    /// Record a call boundary the error is leaving.
    pub fn push_frame(&mut self, name: impl Into<String>, span: Option<Span>) {
        self.backtrace.frames.push(BacktraceFrame {
            name: name.into(),
            span,
        });
    }

    /// The value a `rescue` clause binds.
    ///
    /// Raised values and provider error values pass through unchanged;
    /// runtime errors become `{message, kind}` maps.
    pub fn rescue_value(&self) -> Value {
        match &self.kind {
            EvalErrorKind::UserRaised(value) | EvalErrorKind::ProviderError(value) => {
                value.clone()
            }
            other => Value::map(MapValue::from_pairs([
                (Value::string("message"), Value::string(self.message.clone())),
                (Value::string("kind"), Value::string(other.name())),
            ])),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Binding Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn immutable_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateBinding {
        name: name.to_string(),
    })
}

// Type and Arithmetic Errors

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Operator applied to operand types it does not support.
#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: format!("operands supported by `{}`", op.as_symbol()),
        got: format!("{left} and {right}"),
    })
}

#[cold]
pub fn unary_type_mismatch(op: UnaryOp, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: format!("operand supported by unary `{}`", op.as_symbol()),
        got: operand.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Control Errors

#[cold]
pub fn match_not_exhaustive(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MatchNotExhaustive {
        value: value.to_string(),
    })
}

/// `raise value`
#[cold]
pub fn user_raised(value: Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UserRaised(value))
}

// Capability and Provider Errors

#[cold]
pub fn capability_denied(capability: &str, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CapabilityDenied {
        capability: capability.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn provider_error(value: Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ProviderError(value))
}

#[cold]
pub fn unresolved_import(path: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedImport {
        path: path.to_string(),
    })
}

// Call Errors

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

// Access Errors

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

// Strand Errors

#[cold]
pub fn await_cycle(strand: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AwaitCycle { strand })
}

#[cold]
pub fn unknown_strand(strand: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownStrand { strand })
}

#[cold]
pub fn strand_cancelled(strand: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StrandCancelled { strand })
}

#[cfg(test)]
mod tests;
