//! Checkers combining other checkers

use super::{OperandTypeChecker, cartesian_signatures};
use crate::call_binding::{CallBinding, signature_error};
use crate::count_range::OperandCountRange;
use log::debug;
use quarry_sql_diagnostics::{Result, TypeError};
use serde::{Deserialize, Serialize};

/// How a composite combines its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositePolicy {
    /// Every child must pass
    And,
    /// At least one child must pass
    Or,
    /// Child `i` checks operand `i`
    Sequence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeChecker {
    policy: CompositePolicy,
    children: Vec<OperandTypeChecker>,
}

impl CompositeChecker {
    /// Fails on an empty child list, or a SEQUENCE child that cannot check
    /// a single operand
    pub fn new(policy: CompositePolicy, children: Vec<OperandTypeChecker>) -> Result<Self> {
        if children.is_empty() {
            return Err(TypeError::precondition(
                "composite checker needs at least one child",
            ));
        }
        if policy == CompositePolicy::Sequence
            && let Some(i) = children.iter().position(|c| !c.is_single_operand())
        {
            return Err(TypeError::precondition(format!(
                "sequence child {i} cannot check a single operand"
            )));
        }
        Ok(Self { policy, children })
    }

    /// Build from catalog children known to satisfy [`new`](Self::new)
    pub(crate) fn from_parts(policy: CompositePolicy, children: Vec<OperandTypeChecker>) -> Self {
        Self { policy, children }
    }

    pub fn policy(&self) -> CompositePolicy {
        self.policy
    }

    pub fn children(&self) -> &[OperandTypeChecker] {
        &self.children
    }

    pub(super) fn is_single_operand(&self) -> bool {
        self.policy != CompositePolicy::Sequence
            && self.children.iter().all(OperandTypeChecker::is_single_operand)
    }

    pub(super) fn check_operand_types(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
    ) -> Result<bool> {
        if self.policy == CompositePolicy::Sequence {
            if binding.operand_count() != self.children.len() {
                return Ok(false);
            }
            return self.run(binding, throw_on_failure, |i, child, throw| {
                child.check_single_operand(binding, i, 0, throw)
            });
        }
        self.run(binding, throw_on_failure, |_, child, throw| {
            child.check_operand_types(binding, throw)
        })
    }

    pub(super) fn check_single_operand(
        &self,
        binding: &dyn CallBinding,
        operand: usize,
        formal: usize,
        throw_on_failure: bool,
    ) -> Result<bool> {
        self.run(binding, throw_on_failure, |_, child, throw| {
            child.check_single_operand(binding, operand, formal, throw)
        })
    }

    /// Evaluate children quietly, then re-run the failures to raise an error
    fn run(
        &self,
        binding: &dyn CallBinding,
        throw_on_failure: bool,
        check: impl Fn(usize, &OperandTypeChecker, bool) -> Result<bool>,
    ) -> Result<bool> {
        let mut failed = Vec::new();
        for (i, child) in self.children.iter().enumerate() {
            if !check(i, child, false)? {
                failed.push(i);
            } else if self.policy == CompositePolicy::Or {
                return Ok(true);
            }
        }
        if failed.is_empty() {
            return Ok(true);
        }
        if !throw_on_failure {
            return Ok(false);
        }

        debug!(
            "{:?} checker rejected '{}'; re-checking {} child(ren) for an error",
            self.policy,
            binding.operator_name(),
            failed.len()
        );
        let allowed = self.allowed_signatures(binding.operator_name());
        for i in failed {
            match check(i, &self.children[i], true) {
                Err(TypeError::SignatureMismatch {
                    operator,
                    actual,
                    position,
                    ..
                }) => {
                    return Err(TypeError::signature_mismatch(
                        operator, actual, allowed, position,
                    ));
                }
                Err(err) => return Err(err),
                Ok(_) => {}
            }
        }
        Err(signature_error(binding, allowed, binding.call_position()))
    }

    pub(super) fn operand_count_range(&self) -> OperandCountRange {
        let mut ranges = self.children.iter().map(OperandTypeChecker::operand_count_range);
        match self.policy {
            CompositePolicy::Sequence => OperandCountRange::Fixed(self.children.len()),
            CompositePolicy::Or => ranges
                .next()
                .map(|first| ranges.fold(first, |acc, r| acc.union(&r)))
                .unwrap_or(OperandCountRange::Variadic),
            CompositePolicy::And => ranges
                .next()
                .map(|first| ranges.fold(first, |acc, r| acc.intersect(&r)))
                .unwrap_or(OperandCountRange::Variadic),
        }
    }

    pub(super) fn allowed_signatures(&self, op_name: &str) -> String {
        match self.policy {
            CompositePolicy::Sequence => {
                let positions: Vec<Vec<String>> = self
                    .children
                    .iter()
                    .map(OperandTypeChecker::single_operand_alternatives)
                    .collect();
                cartesian_signatures(op_name, &positions)
            }
            CompositePolicy::And | CompositePolicy::Or => self
                .children
                .iter()
                .map(|c| c.allowed_signatures(op_name))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub(super) fn single_operand_alternatives(&self) -> Vec<String> {
        self.children
            .iter()
            .flat_map(OperandTypeChecker::single_operand_alternatives)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_binding::{Literal, OperandList};
    use pretty_assertions::assert_eq;
    use quarry_sql_types::{TypeFactory, TypeFamily, TypeName};

    fn numeric() -> OperandTypeChecker {
        OperandTypeChecker::family(vec![TypeFamily::Numeric])
    }

    fn character() -> OperandTypeChecker {
        OperandTypeChecker::family(vec![TypeFamily::Character])
    }

    #[test]
    fn test_construction_preconditions() {
        assert!(CompositeChecker::new(CompositePolicy::Or, vec![]).is_err());
        assert!(
            CompositeChecker::new(CompositePolicy::Sequence, vec![OperandTypeChecker::same(2)])
                .is_err()
        );
        assert!(CompositeChecker::new(CompositePolicy::And, vec![OperandTypeChecker::same(2)]).is_ok());
    }

    #[test]
    fn test_or_accepts_either_child() {
        let factory = TypeFactory::new();
        let checker = CompositeChecker::new(CompositePolicy::Or, vec![numeric(), character()])
            .unwrap();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let date = factory.create_sql_type(TypeName::Date, None, None).unwrap();

        let call = OperandList::new(&factory, "F", [int]);
        assert!(checker.check_operand_types(&call, true).unwrap());

        let call = OperandList::new(&factory, "F", [date]);
        match checker.check_operand_types(&call, true) {
            Err(TypeError::SignatureMismatch {
                allowed_signatures, ..
            }) => assert_eq!(allowed_signatures, "F(<NUMERIC>)\nF(<CHARACTER>)"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_and_requires_all_children() {
        let factory = TypeFactory::new();
        let checker = CompositeChecker::new(
            CompositePolicy::And,
            vec![numeric(), OperandTypeChecker::literal(false)],
        )
        .unwrap();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();

        let column = OperandList::new(&factory, "F", [int.clone()]);
        assert!(!checker.check_operand_types(&column, false).unwrap());
        assert!(matches!(
            checker.check_operand_types(&column, true),
            Err(TypeError::ArgumentMustBeLiteral { .. })
        ));

        let literal = OperandList::new(&factory, "F", [int]).with_literal(0, Literal::Integer(1));
        assert!(checker.check_operand_types(&literal, true).unwrap());
    }

    #[test]
    fn test_sequence_checks_each_operand() {
        let factory = TypeFactory::new();
        let checker =
            CompositeChecker::new(CompositePolicy::Sequence, vec![character(), numeric()]).unwrap();
        let vc = factory.create_sql_type(TypeName::Varchar, Some(3), None).unwrap();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();

        let call = OperandList::new(&factory, "LEFT", [vc.clone(), int.clone()]);
        assert!(checker.check_operand_types(&call, true).unwrap());

        let call = OperandList::new(&factory, "LEFT", [int, vc]);
        assert!(!checker.check_operand_types(&call, false).unwrap());
        assert_eq!(checker.operand_count_range(), OperandCountRange::Fixed(2));
        assert_eq!(
            checker.allowed_signatures("LEFT"),
            "LEFT(<CHARACTER>, <NUMERIC>)"
        );
    }

    #[test]
    fn test_count_ranges() {
        let or = CompositeChecker::new(
            CompositePolicy::Or,
            vec![numeric(), OperandTypeChecker::same(2)],
        )
        .unwrap();
        assert_eq!(or.operand_count_range(), OperandCountRange::of([1, 2]));

        let and = CompositeChecker::new(
            CompositePolicy::And,
            vec![OperandTypeChecker::same_variadic(), OperandTypeChecker::same(3)],
        )
        .unwrap();
        assert_eq!(and.operand_count_range(), OperandCountRange::Fixed(3));
    }
}
