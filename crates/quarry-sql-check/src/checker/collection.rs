//! Checkers over collection and row operands

use super::{FamilyChecker, reject};
use crate::call_binding::{CallBinding, signature_error};
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{SqlType, TypeFamily, TypeName};

/// Two multisets whose element types have a common type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultisetChecker;

impl MultisetChecker {
    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != 2 {
            return Ok(false);
        }
        let family = FamilyChecker::new(vec![TypeFamily::Multiset]);
        for i in 0..2 {
            if !family.check_single_operand(binding, i, 0, throw_on_failure)? {
                return Ok(false);
            }
        }

        let left = binding.operand_type(0)?;
        let right = binding.operand_type(1)?;
        let elements: Vec<SqlType> = [&left, &right]
            .iter()
            .filter_map(|t| t.component_type().cloned())
            .collect();
        if elements.len() == 2
            && binding
                .type_factory()
                .least_restrictive(&elements)?
                .is_some()
        {
            return Ok(true);
        }
        reject(throw_on_failure, || {
            TypeError::types_not_comparable(
                &left,
                binding.operand_position(0),
                &right,
                binding.operand_position(1),
            )
        })
    }
}

/// Inputs of a set operation: two rows with column-wise common types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOpChecker;

impl SetOpChecker {
    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != 2 {
            return Ok(false);
        }
        let types = binding.operand_types()?;
        if let Some(i) = types.iter().position(|t| !t.is_struct()) {
            return reject(throw_on_failure, || {
                signature_error(
                    binding,
                    format!("{{0}} {} {{1}}", binding.operator_name()),
                    binding.operand_position(i),
                )
            });
        }

        let (left, right) = (&types[0], &types[1]);
        if left.field_count() != right.field_count() {
            return reject(throw_on_failure, || TypeError::ColumnCountMismatch {
                operator: binding.operator_name().to_string(),
                position: binding.call_position(),
            });
        }

        let factory = binding.type_factory();
        for column in 0..left.field_count() {
            let pair: Vec<SqlType> = [left, right]
                .iter()
                .filter_map(|t| t.field(column).map(|f| f.ty.clone()))
                .collect();
            if factory.least_restrictive(&pair)?.is_none() {
                return reject(throw_on_failure, || TypeError::ColumnTypeMismatch {
                    operator: binding.operator_name().to_string(),
                    column: column + 1,
                    position: binding.call_position(),
                });
            }
        }
        Ok(true)
    }
}

/// Row with exactly one column, of multiset type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMultisetChecker;

impl RecordMultisetChecker {
    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != 1 {
            return Ok(false);
        }
        self.check_single_operand(binding, 0, throw_on_failure)
    }

    pub(super) fn check_single_operand(
        &self,
        binding: &dyn CallBinding,
        operand: usize,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let ty = binding.operand_type(operand)?;
        let wraps_multiset = ty.is_struct()
            && ty.field_count() == 1
            && ty
                .field(0)
                .is_some_and(|f| f.ty.name() == TypeName::Multiset);
        if wraps_multiset {
            return Ok(true);
        }
        reject(throw_on_failure, || {
            signature_error(
                binding,
                "UNNEST(<MULTISET>)".to_string(),
                binding.operand_position(operand),
            )
        })
    }
}
