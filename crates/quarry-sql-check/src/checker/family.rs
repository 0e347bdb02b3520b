//! Family-per-position checker

use super::{cartesian_signatures, reject};
use crate::call_binding::{CallBinding, signature_error};
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{TypeFamily, TypeName};

/// Required family for each operand position
///
/// The ANY family and the ANY type always pass. Otherwise a NULL operand is
/// rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyChecker {
    families: Vec<TypeFamily>,
}

impl FamilyChecker {
    pub fn new(families: Vec<TypeFamily>) -> Self {
        Self { families }
    }

    pub fn families(&self) -> &[TypeFamily] {
        &self.families
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if binding.operand_count() != self.families.len() {
            return Ok(false);
        }
        for i in 0..self.families.len() {
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
        let Some(family) = self.families.get(formal) else {
            return Err(TypeError::internal(format!(
                "'{}' has no formal operand {formal}",
                binding.operator_name()
            )));
        };
        let ty = binding.operand_type(operand)?;
        if *family == TypeFamily::Any || ty.name() == TypeName::Any {
            return Ok(true);
        }
        if binding.is_operand_null(operand) {
            return reject(throw_on_failure, || {
                TypeError::null_not_allowed(
                    binding.operator_name(),
                    operand,
                    binding.operand_position(operand),
                )
            });
        }
        if family.contains(ty.name()) {
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
        self.families
            .get(formal)
            .map(|f| vec![format!("<{}>", f.display_name())])
            .unwrap_or_default()
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        let positions: Vec<Vec<String>> =
            (0..self.families.len()).map(|i| self.alternatives(i)).collect();
        cartesian_signatures(op_name, &positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_binding::{Literal, OperandList};
    use pretty_assertions::assert_eq;
    use quarry_sql_types::TypeFactory;

    fn numeric_string() -> FamilyChecker {
        FamilyChecker::new(vec![TypeFamily::Numeric, TypeFamily::String])
    }

    #[test]
    fn test_family_membership() {
        let factory = TypeFactory::new();
        let dec = factory.create_sql_type(TypeName::Decimal, Some(5), Some(2)).unwrap();
        let vb = factory.create_sql_type(TypeName::Varbinary, Some(4), None).unwrap();
        let call = OperandList::new(&factory, "F", [dec.clone(), vb]);
        assert!(numeric_string().check_operand_types(&call, true).unwrap());

        let swapped = OperandList::new(&factory, "F", [dec.clone(), dec]);
        assert!(!numeric_string().check_operand_types(&swapped, false).unwrap());
    }

    #[test]
    fn test_any_passes_and_null_fails() {
        let factory = TypeFactory::new();
        let any = factory.create_sql_type(TypeName::Any, None, None).unwrap();
        let null = factory.create_sql_type(TypeName::Null, None, None).unwrap();
        let checker = FamilyChecker::new(vec![TypeFamily::Numeric]);

        let call = OperandList::new(&factory, "F", [any]);
        assert!(checker.check_operand_types(&call, true).unwrap());

        let call = OperandList::new(&factory, "F", [null]).with_literal(0, Literal::Null);
        let any_family = FamilyChecker::new(vec![TypeFamily::Any]);
        assert!(any_family.check_operand_types(&call, true).unwrap());
        assert!(!checker.check_operand_types(&call, false).unwrap());
        assert!(matches!(
            checker.check_operand_types(&call, true),
            Err(TypeError::NullNotAllowed { ordinal: 0, .. })
        ));
    }

    #[test]
    fn test_arity_mismatch_returns_false() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let call = OperandList::new(&factory, "F", [int]);
        assert!(!numeric_string().check_operand_types(&call, true).unwrap());
    }

    #[test]
    fn test_signature_text() {
        assert_eq!(
            numeric_string().allowed_signatures("F"),
            "F(<NUMERIC>, <STRING>)"
        );
    }
}
