//! Static type layer for SQL validation
//!
//! This crate bundles the pieces a validator needs to type operator calls:
//! - The SQL type catalog, type values and the interning [`TypeFactory`]
//! - Assignment and CAST rules, and least-restrictive type resolution
//! - Operand type checkers and return/operand type inference
//! - Structured errors with codes and source positions
//!
//! # Example
//!
//! ```
//! use quarry_sql::{OperandList, TypeFactory, TypeName, strategies};
//!
//! let factory = TypeFactory::new();
//! let int = factory.create_sql_type(TypeName::Integer, None, None)?;
//! let dbl = factory.create_sql_type(TypeName::Double, None, None)?;
//! let call = OperandList::new(&factory, "+", [int, dbl]);
//!
//! assert!(strategies::plus().check_operand_types(&call, true)?);
//! let result = strategies::nullable_biggest().infer_return_type(&call)?;
//! assert_eq!(result.to_string(), "DOUBLE");
//! # Ok::<(), quarry_sql::TypeError>(())
//! ```

// Re-export all public APIs from internal crates
pub use quarry_sql_check as check;
pub use quarry_sql_diagnostics as diagnostics;
pub use quarry_sql_types as types;

// Convenience re-exports
pub use quarry_sql_check::{
    CallBinding, Literal, OperandCountRange, OperandList, OperandTypeChecker,
    OperandTypeInference, ReturnTypeInference, strategies,
};
pub use quarry_sql_diagnostics::{Result, SourcePosition, TypeError};
pub use quarry_sql_types::{SqlType, TypeFactory, TypeFamily, TypeName, TypeSystemConfig};
