//! Positional checkers: allowed type names and assignable parameters

use super::{cartesian_signatures, reject};
use crate::call_binding::{CallBinding, signature_error};
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{SqlType, TypeName, can_assign_from, matches_type_name};

/// Allowed type names for each operand position
///
/// A NULL entry lets a NULL-typed operand through; an ANY entry accepts
/// every type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitChecker {
    allowed: Vec<Vec<TypeName>>,
}

impl ExplicitChecker {
    /// Fails if a position allows nothing, or only NULL
    pub fn new(allowed: Vec<Vec<TypeName>>) -> Result<Self> {
        for (i, names) in allowed.iter().enumerate() {
            if names.is_empty() {
                return Err(TypeError::precondition(format!(
                    "operand {i} of an explicit checker allows no types"
                )));
            }
            if names.iter().all(|n| *n == TypeName::Null) {
                return Err(TypeError::precondition(format!(
                    "operand {i} of an explicit checker allows only NULL"
                )));
            }
        }
        Ok(Self { allowed })
    }

    /// Build from static category tables known to be well formed
    pub(crate) fn from_sets(sets: &[&[TypeName]]) -> Self {
        Self {
            allowed: sets.iter().map(|s| s.to_vec()).collect(),
        }
    }

    pub fn allowed(&self) -> &[Vec<TypeName>] {
        &self.allowed
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != self.allowed.len() {
            return Ok(false);
        }
        for i in 0..self.allowed.len() {
            if !self.check_single_operand(binding, i, i, throw_on_failure)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(super) fn check_single_operand(
        &self,
        binding: &dyn CallBinding,
        operand: usize,
        formal: usize,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let Some(names) = self.allowed.get(formal) else {
            return Err(TypeError::internal(format!(
                "'{}' has no formal operand {formal}",
                binding.operator_name()
            )));
        };
        let ty = binding.operand_type(operand)?;
        if matches_type_name(names, &ty) {
            return Ok(true);
        }
        reject(throw_on_failure, || {
            signature_error(
                binding,
                self.allowed_signatures(binding.operator_name()),
                binding.operand_position(operand),
            )
        })
    }

    /// `<NAME>` for each non-NULL name allowed at `formal`
    pub(super) fn alternatives(&self, formal: usize) -> Vec<String> {
        self.allowed
            .get(formal)
            .map(|names| position_alternatives(names))
            .unwrap_or_default()
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        let positions: Vec<Vec<String>> =
            self.allowed.iter().map(|names| position_alternatives(names)).collect();
        cartesian_signatures(op_name, &positions)
    }
}

fn position_alternatives(names: &[TypeName]) -> Vec<String> {
    names
        .iter()
        .filter(|n| **n != TypeName::Null)
        .map(|n| format!("<{}>", n.sql_name()))
        .collect()
}

/// Operands must be assignable to declared parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignableChecker {
    params: Vec<SqlType>,
}

impl AssignableChecker {
    pub fn new(params: Vec<SqlType>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[SqlType] {
        &self.params
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != self.params.len() {
            return Ok(false);
        }
        for i in 0..self.params.len() {
            if !self.check_single_operand(binding, i, i, throw_on_failure)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(super) fn check_single_operand(
        &self,
        binding: &dyn CallBinding,
        operand: usize,
        formal: usize,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let Some(param) = self.params.get(formal) else {
            return Err(TypeError::internal(format!(
                "'{}' has no parameter {formal}",
                binding.operator_name()
            )));
        };
        let ty = binding.operand_type(operand)?;
        if can_assign_from(param, &ty)? {
            return Ok(true);
        }
        reject(throw_on_failure, || {
            signature_error(
                binding,
                self.allowed_signatures(binding.operator_name()),
                binding.operand_position(operand),
            )
        })
    }

    pub(super) fn alternatives(&self, formal: usize) -> Vec<String> {
        self.params
            .get(formal)
            .map(|p| vec![format!("<{p}>")])
            .unwrap_or_default()
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("<{p}>"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{op_name}({params})")
    }
}
