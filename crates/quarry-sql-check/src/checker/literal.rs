//! Literal operand checkers

use super::{cartesian_signatures, reject};
use crate::call_binding::{CallBinding, signature_error};
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::type_name::INT_TYPES;

/// Single operand that must be a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralChecker {
    allow_null: bool,
}

impl LiteralChecker {
    pub fn new(allow_null: bool) -> Self {
        Self { allow_null }
    }

    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

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
        let Some(literal) = binding.operand_literal(operand) else {
            return reject(throw_on_failure, || TypeError::ArgumentMustBeLiteral {
                operator: binding.operator_name().to_string(),
                ordinal: operand,
                position: binding.operand_position(operand),
            });
        };
        if literal.is_null() && !self.allow_null {
            return reject(throw_on_failure, || {
                TypeError::null_not_allowed(
                    binding.operator_name(),
                    operand,
                    binding.operand_position(operand),
                )
            });
        }
        Ok(true)
    }
}

/// Non-negative integer literal, e.g. the length argument of `SUBSTRING`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveIntegerLiteralChecker;

impl PositiveIntegerLiteralChecker {
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
        if !LiteralChecker::new(false).check_single_operand(binding, operand, throw_on_failure)? {
            return Ok(false);
        }
        let ty = binding.operand_type(operand)?;
        if !INT_TYPES.contains(&ty.name()) {
            return reject(throw_on_failure, || {
                signature_error(
                    binding,
                    self.allowed_signatures(binding.operator_name()),
                    binding.operand_position(operand),
                )
            });
        }
        let value = binding.operand_literal(operand).and_then(|l| l.as_i64());
        if value.is_some_and(|v| v >= 0) {
            return Ok(true);
        }
        reject(throw_on_failure, || TypeError::ArgumentMustBePositiveInteger {
            operator: binding.operator_name().to_string(),
            ordinal: operand,
            position: binding.operand_position(operand),
        })
    }

    pub(super) fn alternatives(&self) -> Vec<String> {
        INT_TYPES
            .iter()
            .map(|n| format!("<{}>", n.sql_name()))
            .collect()
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        cartesian_signatures(op_name, &[self.alternatives()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_binding::{Literal, OperandList};
    use quarry_sql_types::{TypeFactory, TypeName};
    use rstest::rstest;

    #[test]
    fn test_literal_required() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let checker = LiteralChecker::new(false);

        let column = OperandList::new(&factory, "F", [int.clone()]);
        assert!(!checker.check_operand_types(&column, false).unwrap());
        assert!(matches!(
            checker.check_operand_types(&column, true),
            Err(TypeError::ArgumentMustBeLiteral { ordinal: 0, .. })
        ));

        let literal = OperandList::new(&factory, "F", [int]).with_literal(0, Literal::Integer(3));
        assert!(checker.check_operand_types(&literal, true).unwrap());
    }

    #[test]
    fn test_null_literal() {
        let factory = TypeFactory::new();
        let null = factory.create_sql_type(TypeName::Null, None, None).unwrap();
        let call = OperandList::new(&factory, "F", [null]).with_literal(0, Literal::Null);
        assert!(LiteralChecker::new(true).check_operand_types(&call, true).unwrap());
        assert!(matches!(
            LiteralChecker::new(false).check_operand_types(&call, true),
            Err(TypeError::NullNotAllowed { .. })
        ));
    }

    #[rstest]
    #[case(TypeName::Integer, Literal::Integer(0), true)]
    #[case(TypeName::Bigint, Literal::Integer(42), true)]
    #[case(TypeName::Integer, Literal::Integer(-1), false)]
    #[case(TypeName::Decimal, Literal::Decimal("2".into()), false)]
    fn test_positive_integer_literal(
        #[case] name: TypeName,
        #[case] literal: Literal,
        #[case] expected: bool,
    ) {
        let factory = TypeFactory::new();
        let ty = factory.create_sql_type(name, None, None).unwrap();
        let call = OperandList::new(&factory, "SUBSTRING", [ty]).with_literal(0, literal);
        assert_eq!(
            PositiveIntegerLiteralChecker
                .check_operand_types(&call, false)
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_negative_literal_error() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let call = OperandList::new(&factory, "F", [int]).with_literal(0, Literal::Integer(-5));
        assert!(matches!(
            PositiveIntegerLiteralChecker.check_operand_types(&call, true),
            Err(TypeError::ArgumentMustBePositiveInteger { .. })
        ));
    }
}
