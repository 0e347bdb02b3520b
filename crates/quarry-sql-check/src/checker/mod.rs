//! Operand type checkers
//!
//! [`OperandTypeChecker`] enumerates every way an operator can constrain its
//! operand types. Each variant wraps a small struct holding its parameters;
//! composite checkers own their children.
//!
//! Every check takes a `throw_on_failure` flag. When it is unset, an
//! ordinary mismatch returns `Ok(false)` so overload resolution can try the
//! next candidate. When it is set, the mismatch is returned as the most
//! specific [`TypeError`] available. Internal errors are always returned.

mod collection;
mod composite;
mod explicit;
mod family;
mod literal;
mod same;

pub use collection::{MultisetChecker, RecordMultisetChecker, SetOpChecker};
pub use composite::{CompositeChecker, CompositePolicy};
pub use explicit::{AssignableChecker, ExplicitChecker};
pub use family::FamilyChecker;
pub use literal::{LiteralChecker, PositiveIntegerLiteralChecker};
pub use same::{ComparableChecker, SameChecker};

use crate::call_binding::CallBinding;
use crate::count_range::OperandCountRange;
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{Comparability, SqlType, TypeFamily, TypeName};

#[derive(Debug, Clone, PartialEq)]
pub enum OperandTypeChecker {
    /// Allowed type names per position
    Explicit(ExplicitChecker),
    /// Required family per position
    Family(FamilyChecker),
    /// All operands pairwise comparable
    Same(SameChecker),
    /// Two operands with a minimum comparability
    Comparable(ComparableChecker),
    /// Single literal operand
    Literal(LiteralChecker),
    /// Operands assignable to declared parameter types
    Assignable(AssignableChecker),
    /// Two multisets with a common element type
    Multiset(MultisetChecker),
    /// Two row types with column-wise common types
    SetOp(SetOpChecker),
    /// AND / OR / SEQUENCE over child checkers
    Composite(CompositeChecker),
    /// Anything goes
    Variadic,
    /// Non-negative integer literal
    PositiveIntegerLiteral(PositiveIntegerLiteralChecker),
    /// Row type wrapping a single multiset column
    RecordMultiset(RecordMultisetChecker),
}

impl OperandTypeChecker {
    /// Checker allowing the given type names at each position
    pub fn explicit(allowed: Vec<Vec<TypeName>>) -> Result<Self> {
        ExplicitChecker::new(allowed).map(Self::Explicit)
    }

    pub fn family(families: Vec<TypeFamily>) -> Self {
        Self::Family(FamilyChecker::new(families))
    }

    /// `count` pairwise-comparable operands
    pub fn same(count: usize) -> Self {
        Self::Same(SameChecker::new(count))
    }

    /// Any number of pairwise-comparable operands
    pub fn same_variadic() -> Self {
        Self::Same(SameChecker::variadic())
    }

    pub fn comparable(required: Comparability) -> Self {
        Self::Comparable(ComparableChecker::new(required))
    }

    pub fn literal(allow_null: bool) -> Self {
        Self::Literal(LiteralChecker::new(allow_null))
    }

    pub fn assignable(params: Vec<SqlType>) -> Self {
        Self::Assignable(AssignableChecker::new(params))
    }

    pub fn multiset() -> Self {
        Self::Multiset(MultisetChecker)
    }

    pub fn set_op() -> Self {
        Self::SetOp(SetOpChecker)
    }

    pub fn positive_integer_literal() -> Self {
        Self::PositiveIntegerLiteral(PositiveIntegerLiteralChecker)
    }

    pub fn record_multiset() -> Self {
        Self::RecordMultiset(RecordMultisetChecker)
    }

    pub fn and(children: Vec<OperandTypeChecker>) -> Result<Self> {
        CompositeChecker::new(CompositePolicy::And, children).map(Self::Composite)
    }

    pub fn or(children: Vec<OperandTypeChecker>) -> Result<Self> {
        CompositeChecker::new(CompositePolicy::Or, children).map(Self::Composite)
    }

    /// Child `i` checks operand `i` alone
    pub fn sequence(children: Vec<OperandTypeChecker>) -> Result<Self> {
        CompositeChecker::new(CompositePolicy::Sequence, children).map(Self::Composite)
    }

    /// Check every operand of the call
    pub fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        match self {
            Self::Explicit(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Family(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Same(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Comparable(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Literal(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Assignable(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Multiset(c) => c.check_operand_types(binding, throw_on_failure),
            Self::SetOp(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Composite(c) => c.check_operand_types(binding, throw_on_failure),
            Self::Variadic => Ok(true),
            Self::PositiveIntegerLiteral(c) => c.check_operand_types(binding, throw_on_failure),
            Self::RecordMultiset(c) => c.check_operand_types(binding, throw_on_failure),
        }
    }

    /// Check operand `operand` against formal position `formal`
    ///
    /// Only checkers with the single-operand capability support this; the
    /// others fail with an internal error.
    pub fn check_single_operand(
        &self,
        binding: &dyn CallBinding,
        operand: usize,
        formal: usize,
        throw_on_failure: bool,
    ) -> Result<bool> {
        match self {
            Self::Explicit(c) => c.check_single_operand(binding, operand, formal, throw_on_failure),
            Self::Family(c) => c.check_single_operand(binding, operand, formal, throw_on_failure),
            Self::Literal(c) => c.check_single_operand(binding, operand, throw_on_failure),
            Self::Assignable(c) => {
                c.check_single_operand(binding, operand, formal, throw_on_failure)
            }
            Self::PositiveIntegerLiteral(c) => {
                c.check_single_operand(binding, operand, throw_on_failure)
            }
            Self::RecordMultiset(c) => c.check_single_operand(binding, operand, throw_on_failure),
            Self::Composite(c) if c.is_single_operand() => {
                c.check_single_operand(binding, operand, formal, throw_on_failure)
            }
            Self::Same(_)
            | Self::Comparable(_)
            | Self::Multiset(_)
            | Self::SetOp(_)
            | Self::Composite(_)
            | Self::Variadic => Err(TypeError::internal(format!(
                "{} checker cannot check a single operand of '{}'",
                self.kind(),
                binding.operator_name()
            ))),
        }
    }

    /// Whether [`check_single_operand`](Self::check_single_operand) is supported
    pub fn is_single_operand(&self) -> bool {
        match self {
            Self::Explicit(_)
            | Self::Family(_)
            | Self::Literal(_)
            | Self::Assignable(_)
            | Self::PositiveIntegerLiteral(_)
            | Self::RecordMultiset(_) => true,
            Self::Composite(c) => c.is_single_operand(),
            Self::Same(_) | Self::Comparable(_) | Self::Multiset(_) | Self::SetOp(_) | Self::Variadic => {
                false
            }
        }
    }

    pub fn operand_count_range(&self) -> OperandCountRange {
        match self {
            Self::Explicit(c) => OperandCountRange::Fixed(c.allowed().len()),
            Self::Family(c) => OperandCountRange::Fixed(c.families().len()),
            Self::Same(c) => c.operand_count_range(),
            Self::Comparable(_) | Self::Multiset(_) | Self::SetOp(_) => OperandCountRange::Fixed(2),
            Self::Literal(_) | Self::PositiveIntegerLiteral(_) | Self::RecordMultiset(_) => {
                OperandCountRange::Fixed(1)
            }
            Self::Assignable(c) => OperandCountRange::Fixed(c.params().len()),
            Self::Composite(c) => c.operand_count_range(),
            Self::Variadic => OperandCountRange::Variadic,
        }
    }

    /// Accepted call shapes for error messages, one per line
    pub fn allowed_signatures(&self, op_name: &str) -> String {
        match self {
            Self::Explicit(c) => c.allowed_signatures(op_name),
            Self::Family(c) => c.allowed_signatures(op_name),
            Self::Same(c) => c.allowed_signatures(op_name),
            Self::Comparable(c) => c.allowed_signatures(op_name),
            Self::Literal(_) => "<LITERAL>".to_string(),
            Self::Assignable(c) => c.allowed_signatures(op_name),
            Self::Multiset(_) => format!("<MULTISET> {op_name} <MULTISET>"),
            Self::SetOp(_) => format!("{{0}} {op_name} {{1}}"),
            Self::Composite(c) => c.allowed_signatures(op_name),
            Self::Variadic => String::new(),
            Self::PositiveIntegerLiteral(c) => c.allowed_signatures(op_name),
            Self::RecordMultiset(_) => "UNNEST(<MULTISET>)".to_string(),
        }
    }

    /// Descriptions of what a single-operand checker accepts at position 0
    fn single_operand_alternatives(&self) -> Vec<String> {
        match self {
            Self::Explicit(c) => c.alternatives(0),
            Self::Family(c) => c.alternatives(0),
            Self::Literal(_) => vec!["<LITERAL>".to_string()],
            Self::Assignable(c) => c.alternatives(0),
            Self::PositiveIntegerLiteral(c) => c.alternatives(),
            Self::RecordMultiset(_) => vec!["<RECORDTYPE(MULTISET)>".to_string()],
            Self::Composite(c) => c.single_operand_alternatives(),
            Self::Same(_) | Self::Comparable(_) | Self::Multiset(_) | Self::SetOp(_) | Self::Variadic => {
                vec!["<ANY>".to_string()]
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Family(_) => "family",
            Self::Same(_) => "same",
            Self::Comparable(_) => "comparable",
            Self::Literal(_) => "literal",
            Self::Assignable(_) => "assignable",
            Self::Multiset(_) => "multiset",
            Self::SetOp(_) => "set-operation",
            Self::Composite(_) => "composite",
            Self::Variadic => "variadic",
            Self::PositiveIntegerLiteral(_) => "positive integer literal",
            Self::RecordMultiset(_) => "record multiset",
        }
    }
}

/// `Ok(false)`, or the error built by `err` when throwing
fn reject(throw_on_failure: bool, err: impl FnOnce() -> TypeError) -> Result<bool> {
    if throw_on_failure { Err(err()) } else { Ok(false) }
}

/// One `OP(<A>, <B>)` line per combination of per-position alternatives
fn cartesian_signatures(op_name: &str, positions: &[Vec<String>]) -> String {
    let mut argument_lists = vec![String::new()];
    for (i, alternatives) in positions.iter().enumerate() {
        argument_lists = argument_lists
            .iter()
            .flat_map(|prefix| {
                alternatives.iter().map(move |alt| {
                    if i == 0 {
                        alt.clone()
                    } else {
                        format!("{prefix}, {alt}")
                    }
                })
            })
            .collect();
    }
    argument_lists
        .iter()
        .map(|args| format!("{op_name}({args})"))
        .collect::<Vec<_>>()
        .join("\n")
}
