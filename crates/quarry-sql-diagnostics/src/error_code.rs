//! Type-layer error codes following a structured numbering system
//!
//! Error code ranges:
//! - QRY0001-QRY0099: Construction errors (malformed types or checkers)
//! - QRY0100-QRY0199: Validation errors (operand types rejected by a signature)
//! - QRY0400-QRY0499: Internal errors (catalog or inference bugs)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Numeric `QRY` code attached to every [`TypeError`](crate::TypeError)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Wrap a raw number; unregistered codes are allowed and render as usual
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Registered description and help, or a generic entry for unknown codes
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// QRY0001-QRY0099: a type or checker was built from bad arguments
    pub const fn is_construction_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// QRY0100-QRY0199: operands were rejected for a user's query
    pub const fn is_validation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// QRY0400-QRY0499: catalog or inference bug, never the user's fault
    pub const fn is_internal_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QRY{:04}", self.0)
    }
}

/// Registered text for a code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// One-line summary shown next to the code
    pub description: &'static str,
    /// How to fix it, when there is a known fix
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Construction errors (0001-0099)
    map.insert(
        1,
        ErrorInfo::new("Invalid precision/scale signature")
            .with_help("Only DECIMAL accepts a scale; only DECIMAL, TIME, TIMESTAMP and the string types accept a precision"),
    );
    map.insert(
        2,
        ErrorInfo::new("Type is not in the character family")
            .with_help("Character sets and collations apply to CHAR and VARCHAR only"),
    );
    map.insert(3, ErrorInfo::new("Construction precondition violated"));
    map.insert(4, ErrorInfo::new("Invalid type system configuration"));

    // Validation errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Operand types do not match the operator signature"),
    );
    map.insert(
        101,
        ErrorInfo::new("Illegal use of NULL")
            .with_help("Cast the NULL literal to the expected type"),
    );
    map.insert(102, ErrorInfo::new("Operand types are not comparable"));
    map.insert(103, ErrorInfo::new("Argument must be a literal"));
    map.insert(104, ErrorInfo::new("Argument must be a positive integer literal"));
    map.insert(
        105,
        ErrorInfo::new("Column count mismatch in set operation")
            .with_help("Both inputs of a set operation must have the same number of columns"),
    );
    map.insert(106, ErrorInfo::new("Column type mismatch in set operation"));

    // Internal errors (0400-0499)
    map.insert(
        400,
        ErrorInfo::new("Assignment rules are incomplete")
            .with_help("Every type name must have an entry in the assignment rule table"),
    );
    map.insert(401, ErrorInfo::new("Internal error"));

    map
});

// Construction error codes
pub const QRY0001: ErrorCode = ErrorCode::new(1);
pub const QRY0002: ErrorCode = ErrorCode::new(2);
pub const QRY0003: ErrorCode = ErrorCode::new(3);
pub const QRY0004: ErrorCode = ErrorCode::new(4);

// Validation error codes
pub const QRY0100: ErrorCode = ErrorCode::new(100);
pub const QRY0101: ErrorCode = ErrorCode::new(101);
pub const QRY0102: ErrorCode = ErrorCode::new(102);
pub const QRY0103: ErrorCode = ErrorCode::new(103);
pub const QRY0104: ErrorCode = ErrorCode::new(104);
pub const QRY0105: ErrorCode = ErrorCode::new(105);
pub const QRY0106: ErrorCode = ErrorCode::new(106);

// Internal error codes
pub const QRY0400: ErrorCode = ErrorCode::new(400);
pub const QRY0401: ErrorCode = ErrorCode::new(401);
