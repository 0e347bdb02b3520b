//! SQL static type catalog
//!
//! This crate defines the type layer used by query validation:
//! - Type names, families and implicit-widening precedence
//! - Immutable, interned type values built by a [`TypeFactory`]
//! - Assignment and CAST rule tables
//! - Least-restrictive type resolution

pub mod compat;
pub mod config;
pub mod factory;
pub mod family;
mod least_restrictive;
pub mod precedence;
pub mod rules;
pub mod sql_type;
pub mod type_name;

pub use compat::*;
pub use config::TypeSystemConfig;
pub use factory::TypeFactory;
pub use family::TypeFamily;
pub use precedence::PrecedenceList;
pub use rules::{RuleKind, RuleTable, can_assign, can_coerce};
pub use sql_type::*;
pub use type_name::{Signatures, TypeName};
