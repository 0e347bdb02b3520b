//! Diagnostics and error handling for the quarry-sql type layer
//!
//! This crate provides the error taxonomy shared by the type catalog, the
//! operand checkers and the inference strategies, together with structured
//! error codes and source positions.

mod error;
mod error_code;
mod position;

pub use error::*;
pub use error_code::*;
pub use position::*;

/// Result type for type-layer operations
pub type Result<T> = std::result::Result<T, TypeError>;
