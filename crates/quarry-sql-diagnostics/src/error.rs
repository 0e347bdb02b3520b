//! Type-layer error types

use crate::{
    ErrorCode, QRY0001, QRY0002, QRY0003, QRY0004, QRY0100, QRY0101, QRY0102, QRY0103, QRY0104,
    QRY0105, QRY0106, QRY0400, QRY0401, SourcePosition,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Validation cannot proceed
    Error,
    /// Internal fault in the type catalog or a strategy
    Bug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Bug => write!(f, "internal error"),
        }
    }
}

/// A diagnostic message with position and help text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub position: Option<SourcePosition>,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            position: None,
            help: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(pos) = &self.position {
            write!(f, " at {pos}")?;
        }
        Ok(())
    }
}

/// Errors raised by the type catalog, the factory, operand checkers and
/// inference strategies
///
/// Construction errors are raised when a type or checker is built from bad
/// arguments. Validation errors describe user input that does not fit an
/// operator's signature. Internal errors (`AssignmentRulesIncomplete`,
/// `Internal`) point at a bug in the catalog and must not be reported as
/// ordinary validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Precision/scale combination not accepted by a type name
    #[error("Type {type_name} does not accept {detail}")]
    InvalidSignature { type_name: String, detail: String },

    /// Charset or collation applied to a non-character type
    #[error("Type {type_name} is not in the character family")]
    NotCharFamily { type_name: String },

    /// Malformed construction arguments for a type or checker
    #[error("{message}")]
    ConstructionPrecondition { message: String },

    /// Rejected type system configuration
    #[error("Invalid type system configuration: {message}")]
    InvalidConfig { message: String },

    /// Operand types do not satisfy the operator's checker
    #[error(
        "Cannot apply '{operator}' to arguments of type '{actual}'. Supported form(s): {allowed_signatures}"
    )]
    SignatureMismatch {
        operator: String,
        actual: String,
        allowed_signatures: String,
        position: SourcePosition,
    },

    /// NULL literal where the checker forbids one
    #[error("Illegal use of 'NULL' as operand {ordinal} of '{operator}'")]
    NullNotAllowed {
        operator: String,
        ordinal: usize,
        position: SourcePosition,
    },

    /// Non-literal operand where a literal is required
    #[error("Argument {ordinal} of '{operator}' must be a literal")]
    ArgumentMustBeLiteral {
        operator: String,
        ordinal: usize,
        position: SourcePosition,
    },

    /// Literal operand that must be a non-negative integer
    #[error("Argument {ordinal} of '{operator}' must be a positive integer literal")]
    ArgumentMustBePositiveInteger {
        operator: String,
        ordinal: usize,
        position: SourcePosition,
    },

    /// No common type exists for two operands
    #[error("Type '{left}' is not comparable to type '{right}'")]
    TypesNotComparable {
        left: String,
        right: String,
        left_position: SourcePosition,
        right_position: SourcePosition,
    },

    /// Set operation over inputs with different column counts
    #[error("Column count mismatch in {operator}")]
    ColumnCountMismatch {
        operator: String,
        position: SourcePosition,
    },

    /// Set operation column without a common type
    #[error("Type mismatch in column {column} of {operator}")]
    ColumnTypeMismatch {
        operator: String,
        column: usize,
        position: SourcePosition,
    },

    /// A type name has no entry in a rule table
    #[error("No assignment rules defined for type {type_name}")]
    AssignmentRulesIncomplete { type_name: String },

    /// Inference exhausted or an internal invariant failed
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TypeError {
    pub fn invalid_signature(type_name: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::InvalidSignature {
            type_name: type_name.to_string(),
            detail: detail.into(),
        }
    }

    pub fn not_char_family(type_name: impl fmt::Display) -> Self {
        Self::NotCharFamily {
            type_name: type_name.to_string(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::ConstructionPrecondition {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn signature_mismatch(
        operator: impl Into<String>,
        actual: impl Into<String>,
        allowed_signatures: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Self::SignatureMismatch {
            operator: operator.into(),
            actual: actual.into(),
            allowed_signatures: allowed_signatures.into(),
            position,
        }
    }

    pub fn null_not_allowed(
        operator: impl Into<String>,
        ordinal: usize,
        position: SourcePosition,
    ) -> Self {
        Self::NullNotAllowed {
            operator: operator.into(),
            ordinal,
            position,
        }
    }

    pub fn types_not_comparable(
        left: impl fmt::Display,
        left_position: SourcePosition,
        right: impl fmt::Display,
        right_position: SourcePosition,
    ) -> Self {
        Self::TypesNotComparable {
            left: left.to_string(),
            right: right.to_string(),
            left_position,
            right_position,
        }
    }

    pub fn rules_incomplete(type_name: impl fmt::Display) -> Self {
        Self::AssignmentRulesIncomplete {
            type_name: type_name.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSignature { .. } => QRY0001,
            Self::NotCharFamily { .. } => QRY0002,
            Self::ConstructionPrecondition { .. } => QRY0003,
            Self::InvalidConfig { .. } => QRY0004,
            Self::SignatureMismatch { .. } => QRY0100,
            Self::NullNotAllowed { .. } => QRY0101,
            Self::TypesNotComparable { .. } => QRY0102,
            Self::ArgumentMustBeLiteral { .. } => QRY0103,
            Self::ArgumentMustBePositiveInteger { .. } => QRY0104,
            Self::ColumnCountMismatch { .. } => QRY0105,
            Self::ColumnTypeMismatch { .. } => QRY0106,
            Self::AssignmentRulesIncomplete { .. } => QRY0400,
            Self::Internal { .. } => QRY0401,
        }
    }

    /// Whether this error describes user input rejected by a signature
    ///
    /// `NullNotAllowed` and the literal errors are refinements of a
    /// signature mismatch and count as validation errors too.
    pub fn is_validation_error(&self) -> bool {
        self.code().is_validation_error()
    }

    /// Whether this error signals a bug in the catalog or a strategy
    pub fn is_internal(&self) -> bool {
        self.code().is_internal_error()
    }

    /// Get the primary position if the error carries one
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::SignatureMismatch { position, .. }
            | Self::NullNotAllowed { position, .. }
            | Self::ArgumentMustBeLiteral { position, .. }
            | Self::ArgumentMustBePositiveInteger { position, .. }
            | Self::ColumnCountMismatch { position, .. }
            | Self::ColumnTypeMismatch { position, .. } => Some(*position),
            Self::TypesNotComparable {
                left_position,
                right_position,
                ..
            } => Some(left_position.plus(*right_position)),
            Self::InvalidSignature { .. }
            | Self::NotCharFamily { .. }
            | Self::ConstructionPrecondition { .. }
            | Self::InvalidConfig { .. }
            | Self::AssignmentRulesIncomplete { .. }
            | Self::Internal { .. } => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let mut diag = Diagnostic::error(code, self.to_string());
        if self.is_internal() {
            diag.severity = Severity::Bug;
        }
        if let Some(pos) = self.position() {
            diag = diag.with_position(pos);
        }
        if let Some(help) = code.info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}
