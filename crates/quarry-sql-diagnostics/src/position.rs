//! Source positions carried by validation errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// A region of SQL source text, as reported by the parser
///
/// Lines and columns are 1-based. [`SourcePosition::ZERO`] marks a position
/// that is unknown or synthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourcePosition {
    /// Unknown position
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a position spanning from `(line, column)` to `(end_line, end_column)`
    pub const fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Create a single-point position
    pub const fn point(line: u32, column: u32) -> Self {
        Self::new(line, column, line, column)
    }

    /// Check whether this is the unknown position
    pub const fn is_zero(&self) -> bool {
        self.line == 0 && self.column == 0
    }

    /// Smallest position covering both `self` and `other`
    ///
    /// The unknown position is the identity element.
    pub fn plus(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        let (line, column) = (self.line, self.column).min((other.line, other.column));
        let (end_line, end_column) =
            (self.end_line, self.end_column).max((other.end_line, other.end_column));
        Self::new(line, column, end_line, end_column)
    }

    /// Smallest position covering all of `positions`
    pub fn sum(positions: impl IntoIterator<Item = Self>) -> Self {
        positions.into_iter().fold(Self::ZERO, Self::plus)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
