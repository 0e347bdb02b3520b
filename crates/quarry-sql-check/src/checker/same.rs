//! Checkers relating operands to each other

use super::reject;
use crate::call_binding::{CallBinding, signature_error};
use crate::count_range::OperandCountRange;
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{Comparability, is_comparable};

/// Operands must be pairwise comparable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SameChecker {
    /// `None` checks however many operands the call has
    count: Option<usize>,
}

impl SameChecker {
    pub fn new(count: usize) -> Self {
        Self { count: Some(count) }
    }

    pub fn variadic() -> Self {
        Self { count: None }
    }

    pub(super) fn operand_count_range(&self) -> OperandCountRange {
        self.count
            .map_or(OperandCountRange::Variadic, OperandCountRange::Fixed)
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let count = binding.operand_count();
        if self.count.is_some_and(|n| n != count) {
            return Ok(false);
        }

        for i in 0..count {
            if binding.is_operand_null(i) {
                return reject(throw_on_failure, || {
                    TypeError::null_not_allowed(
                        binding.operator_name(),
                        i,
                        binding.operand_position(i),
                    )
                });
            }
        }

        let types = binding.operand_types()?;
        for (i, pair) in types.windows(2).enumerate() {
            if !is_comparable(&pair[0], &pair[1]) {
                return reject(throw_on_failure, || {
                    TypeError::types_not_comparable(
                        &pair[0],
                        binding.operand_position(i),
                        &pair[1],
                        binding.operand_position(i + 1),
                    )
                });
            }
        }
        Ok(true)
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        let shown = self.count.unwrap_or(2);
        let mut operands = vec!["<EQUIVALENT_TYPE>"; shown].join(", ");
        if self.count.is_none() {
            operands.push_str(", ...");
        }
        format!("{op_name}({operands})")
    }
}

/// Two operands whose types support at least the required comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparableChecker {
    required: Comparability,
}

impl ComparableChecker {
    pub fn new(required: Comparability) -> Self {
        Self { required }
    }

    pub fn required(&self) -> Comparability {
        self.required
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != 2 {
            return Ok(false);
        }
        for i in 0..2 {
            let ty = binding.operand_type(i)?;
            if ty.comparability() < self.required {
                return reject(throw_on_failure, || {
                    signature_error(
                        binding,
                        self.allowed_signatures(binding.operator_name()),
                        binding.operand_position(i),
                    )
                });
            }
        }
        SameChecker::new(2).check_operand_types(binding, throw_on_failure)
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        format!("<COMPARABLE_TYPE> {op_name} <COMPARABLE_TYPE>")
    }
}
