//! Call binding boundary
//!
//! A [`CallBinding`] is the checker's view of one operator call: the
//! operator name, the operand types derived by the validator, literal
//! values where operands are literals, and source positions for errors.

use quarry_sql_diagnostics::{Result, SourcePosition, TypeError};
use quarry_sql_types::{SqlType, TypeFactory, TypeName};
use serde::{Deserialize, Serialize};

/// Literal operand value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Exact numeric kept in its source spelling
    Decimal(String),
    Double(f64),
    Char(String),
    Binary(Vec<u8>),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer value, if this is an integer literal
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Decimal(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// One operator call as seen by checkers and inference strategies
pub trait CallBinding {
    /// Display name of the operator, e.g. `SUBSTRING` or `+`
    fn operator_name(&self) -> &str;

    fn operand_count(&self) -> usize;

    /// Derived type of operand `ordinal`
    fn operand_type(&self, ordinal: usize) -> Result<SqlType>;

    /// Literal value of operand `ordinal`, if it is a literal
    fn operand_literal(&self, ordinal: usize) -> Option<&Literal>;

    fn operand_position(&self, ordinal: usize) -> SourcePosition;

    fn call_position(&self) -> SourcePosition;

    fn type_factory(&self) -> &TypeFactory;

    /// Whether operand `ordinal` is a NULL literal or typed as NULL
    fn is_operand_null(&self, ordinal: usize) -> bool {
        self.operand_literal(ordinal).is_some_and(Literal::is_null)
            || self
                .operand_type(ordinal)
                .is_ok_and(|t| t.name() == TypeName::Null)
    }

    /// Derived types of all operands, in order
    fn operand_types(&self) -> Result<Vec<SqlType>> {
        (0..self.operand_count())
            .map(|i| self.operand_type(i))
            .collect()
    }
}

/// Signature of the actual call, e.g. `FOO(<INTEGER>, <VARCHAR(5)>)`
pub fn actual_signature(binding: &dyn CallBinding) -> Result<String> {
    let operands = binding
        .operand_types()?
        .iter()
        .map(|t| format!("<{t}>"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("{}({operands})", binding.operator_name()))
}

/// `SignatureMismatch` for the call, positioned at `position`
pub fn signature_error(
    binding: &dyn CallBinding,
    allowed_signatures: String,
    position: SourcePosition,
) -> TypeError {
    match actual_signature(binding) {
        Ok(actual) => TypeError::signature_mismatch(
            binding.operator_name(),
            actual,
            allowed_signatures,
            position,
        ),
        Err(err) => err,
    }
}

#[derive(Debug, Clone)]
struct Operand {
    ty: SqlType,
    literal: Option<Literal>,
    position: SourcePosition,
}

/// Call binding over an explicit list of operand types
///
/// Used when types are already derived, for example to re-run inference
/// over multiset element types, and in tests.
#[derive(Debug, Clone)]
pub struct OperandList<'f> {
    factory: &'f TypeFactory,
    operator: String,
    operands: Vec<Operand>,
    position: SourcePosition,
}

impl<'f> OperandList<'f> {
    pub fn new(
        factory: &'f TypeFactory,
        operator: impl Into<String>,
        types: impl IntoIterator<Item = SqlType>,
    ) -> Self {
        Self {
            factory,
            operator: operator.into(),
            operands: types
                .into_iter()
                .map(|ty| Operand {
                    ty,
                    literal: None,
                    position: SourcePosition::ZERO,
                })
                .collect(),
            position: SourcePosition::ZERO,
        }
    }

    /// Mark operand `ordinal` as a literal
    pub fn with_literal(mut self, ordinal: usize, literal: Literal) -> Self {
        if let Some(operand) = self.operands.get_mut(ordinal) {
            operand.literal = Some(literal);
        }
        self
    }

    pub fn with_operand_position(mut self, ordinal: usize, position: SourcePosition) -> Self {
        if let Some(operand) = self.operands.get_mut(ordinal) {
            operand.position = position;
        }
        self
    }

    pub fn with_call_position(mut self, position: SourcePosition) -> Self {
        self.position = position;
        self
    }
}

impl CallBinding for OperandList<'_> {
    fn operator_name(&self) -> &str {
        &self.operator
    }

    fn operand_count(&self) -> usize {
        self.operands.len()
    }

    fn operand_type(&self, ordinal: usize) -> Result<SqlType> {
        self.operands
            .get(ordinal)
            .map(|o| o.ty.clone())
            .ok_or_else(|| {
                TypeError::internal(format!(
                    "{} has no operand {ordinal}",
                    self.operator
                ))
            })
    }

    fn operand_literal(&self, ordinal: usize) -> Option<&Literal> {
        self.operands.get(ordinal)?.literal.as_ref()
    }

    fn operand_position(&self, ordinal: usize) -> SourcePosition {
        self.operands
            .get(ordinal)
            .map_or(self.position, |o| o.position)
    }

    fn call_position(&self) -> SourcePosition {
        self.position
    }

    fn type_factory(&self) -> &TypeFactory {
        self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_actual_signature() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let vc = factory.create_sql_type(TypeName::Varchar, Some(5), None).unwrap();
        let call = OperandList::new(&factory, "FOO", [int, vc]);
        assert_eq!(
            actual_signature(&call).unwrap(),
            "FOO(<INTEGER>, <VARCHAR(5)>)"
        );
    }

    #[test]
    fn test_null_detection() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let null = factory.create_sql_type(TypeName::Null, None, None).unwrap();
        let call = OperandList::new(&factory, "F", [int.clone(), null, int])
            .with_literal(2, Literal::Null);
        assert!(!call.is_operand_null(0));
        assert!(call.is_operand_null(1));
        assert!(call.is_operand_null(2));
    }

    #[test]
    fn test_positions_and_missing_operands() {
        let factory = TypeFactory::new();
        let int = factory.create_sql_type(TypeName::Integer, None, None).unwrap();
        let call = OperandList::new(&factory, "F", [int])
            .with_call_position(SourcePosition::point(1, 1))
            .with_operand_position(0, SourcePosition::point(1, 3));
        assert_eq!(call.operand_position(0), SourcePosition::point(1, 3));
        assert_eq!(call.operand_position(7), SourcePosition::point(1, 1));
        assert!(call.operand_type(1).unwrap_err().is_internal());
    }

    #[test]
    fn test_literal_integer_values() {
        assert_eq!(Literal::Integer(-4).as_i64(), Some(-4));
        assert_eq!(Literal::Decimal("12".into()).as_i64(), Some(12));
        assert_eq!(Literal::Decimal("1.5".into()).as_i64(), None);
        assert_eq!(Literal::Char("3".into()).as_i64(), None);
    }
}
