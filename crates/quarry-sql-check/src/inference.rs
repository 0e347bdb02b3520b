//! Return and operand type inference
//!
//! [`ReturnTypeInference`] derives an operator's result type from its
//! operand types. Base strategies may decline with `None`; [`TypeTransform`]s
//! post-process a base result inside a `Cascade`, and a `Chain` tries
//! strategies in order until one answers.
//!
//! [`OperandTypeInference`] runs the other way, filling in the types of
//! untyped operands such as `?` parameters or bare NULLs.

use crate::call_binding::{CallBinding, OperandList};
use log::trace;
use quarry_sql_diagnostics::{Result, TypeError};
use quarry_sql_types::{
    Coercibility, SqlType, TypeFactory, TypeName, matches_type_name,
};

/// Strategy deriving a call's result type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnTypeInference {
    /// Type of operand `i`, unchanged
    Ordinal(usize),
    /// Constant type, ignoring operands
    Fixed {
        name: TypeName,
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// First operand at or after `start` whose name is in `names`
    Match { start: usize, names: Vec<TypeName> },
    /// Least-restrictive type of all operands
    LeastRestrictive,
    /// Multiset of the least-restrictive element type
    Multiset,
    /// Two strings concatenated: first operand's name, summed precision
    DyadicStringSumPrecision,
    /// Base strategy followed by transforms, in order
    Cascade {
        rule: Box<ReturnTypeInference>,
        transforms: Vec<TypeTransform>,
    },
    /// First strategy that does not decline
    Chain(Vec<ReturnTypeInference>),
}

/// Post-processing step applied to an inferred type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTransform {
    /// Nullable if any operand is nullable
    ToNullable,
    /// CHAR to VARCHAR, BINARY to VARBINARY
    ToVarying,
    /// Element type of a multiset
    ToMultisetElement,
    /// Widen an interval result to cover every interval operand
    CombineInterval,
}

impl ReturnTypeInference {
    pub fn fixed(name: TypeName) -> Self {
        Self::Fixed {
            name,
            precision: None,
            scale: None,
        }
    }

    pub fn fixed_with_precision(name: TypeName, precision: u32) -> Self {
        Self::Fixed {
            name,
            precision: Some(precision),
            scale: None,
        }
    }

    pub fn cascade(rule: ReturnTypeInference, transforms: Vec<TypeTransform>) -> Self {
        Self::Cascade {
            rule: Box::new(rule),
            transforms,
        }
    }

    /// Infer the result type; `None` when the strategy declines
    pub fn infer(&self, binding: &dyn CallBinding) -> Result<Option<SqlType>> {
        let factory = binding.type_factory();
        match self {
            Self::Ordinal(i) => {
                if *i >= binding.operand_count() {
                    return Err(TypeError::internal(format!(
                        "'{}' has no operand {i} to take its type from",
                        binding.operator_name()
                    )));
                }
                binding.operand_type(*i).map(Some)
            }
            Self::Fixed {
                name,
                precision,
                scale,
            } => factory.create_sql_type(*name, *precision, *scale).map(Some),
            Self::Match { start, names } => {
                for i in *start..binding.operand_count() {
                    let ty = binding.operand_type(i)?;
                    if matches_type_name(names, &ty) {
                        return Ok(Some(ty));
                    }
                }
                Ok(None)
            }
            Self::LeastRestrictive => factory.least_restrictive(&binding.operand_types()?),
            Self::Multiset => infer_multiset(binding),
            Self::DyadicStringSumPrecision => infer_string_sum(binding),
            Self::Cascade { rule, transforms } => {
                let Some(mut ty) = rule.infer(binding)? else {
                    return Ok(None);
                };
                for transform in transforms {
                    ty = transform.apply(binding, ty)?;
                }
                Ok(Some(ty))
            }
            Self::Chain(rules) => {
                for rule in rules {
                    if let Some(ty) = rule.infer(binding)? {
                        return Ok(Some(ty));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Infer the result type, treating a decline as an internal error
    pub fn infer_return_type(&self, binding: &dyn CallBinding) -> Result<SqlType> {
        let ty = self.infer(binding)?.ok_or_else(|| {
            TypeError::internal(format!(
                "no return type inferred for '{}'",
                binding.operator_name()
            ))
        })?;
        trace!("inferred {ty} for '{}'", binding.operator_name());
        Ok(ty)
    }
}

fn infer_multiset(binding: &dyn CallBinding) -> Result<Option<SqlType>> {
    let factory = binding.type_factory();
    let mut elements = Vec::with_capacity(binding.operand_count());
    for ty in binding.operand_types()? {
        let Some(element) = ty.component_type() else {
            return Ok(None);
        };
        elements.push(element.clone());
    }
    let element_call = OperandList::new(factory, binding.operator_name(), elements);
    let element_rule = ReturnTypeInference::cascade(
        ReturnTypeInference::LeastRestrictive,
        vec![TypeTransform::CombineInterval],
    );
    Ok(element_rule
        .infer(&element_call)?
        .map(|element| factory.create_multiset(element)))
}

fn infer_string_sum(binding: &dyn CallBinding) -> Result<Option<SqlType>> {
    if binding.operand_count() != 2 {
        return Ok(None);
    }
    let (first, second) = (binding.operand_type(0)?, binding.operand_type(1)?);
    let both_char = first.name().is_char() && second.name().is_char();
    let both_binary = first.name().is_binary() && second.name().is_binary();
    if !both_char && !both_binary {
        return Ok(None);
    }

    let factory = binding.type_factory();
    let name = first.name();
    let sum = first.precision().unwrap_or(0) + second.precision().unwrap_or(0);
    let precision = factory
        .config()
        .max_precision(name)
        .map_or(sum, |max| sum.min(max));
    let result = factory.create_sql_type(name, Some(precision), None)?;
    if !both_char {
        return Ok(Some(result));
    }

    let charset_of = |t: &SqlType| t.charset().map(|c| c.name.clone());
    if charset_of(&first) != charset_of(&second) {
        return Err(TypeError::types_not_comparable(
            &first,
            binding.operand_position(0),
            &second,
            binding.operand_position(1),
        ));
    }
    let source = [&first, &second]
        .into_iter()
        .find(|t| {
            t.collation()
                .is_some_and(|c| c.coercibility == Coercibility::Explicit)
        })
        .unwrap_or(&first);
    match (source.charset(), source.collation()) {
        (Some(charset), Some(collation)) => factory
            .create_with_charset_and_collation(&result, charset.clone(), collation.clone())
            .map(Some),
        _ => Ok(Some(result)),
    }
}

impl TypeTransform {
    pub fn apply(self, binding: &dyn CallBinding, ty: SqlType) -> Result<SqlType> {
        let factory = binding.type_factory();
        match self {
            Self::ToNullable => {
                let nullable = binding
                    .operand_types()?
                    .iter()
                    .any(SqlType::is_nullable);
                Ok(if nullable {
                    factory.create_with_nullability(&ty, true)
                } else {
                    ty
                })
            }
            Self::ToVarying => to_varying(factory, &ty),
            Self::ToMultisetElement => ty.component_type().cloned().ok_or_else(|| {
                TypeError::internal(format!("{ty} is not a multiset"))
            }),
            Self::CombineInterval => combine_interval(binding, ty),
        }
    }
}

fn to_varying(factory: &TypeFactory, ty: &SqlType) -> Result<SqlType> {
    let varying = match ty.name() {
        TypeName::Varchar | TypeName::Varbinary => return Ok(ty.clone()),
        TypeName::Char => TypeName::Varchar,
        TypeName::Binary => TypeName::Varbinary,
        other => {
            return Err(TypeError::internal(format!(
                "cannot make {other} varying"
            )));
        }
    };
    let mut result = factory.create_sql_type(varying, ty.precision(), None)?;
    if let (Some(charset), Some(collation)) = (ty.charset(), ty.collation()) {
        result =
            factory.create_with_charset_and_collation(&result, charset.clone(), collation.clone())?;
    }
    Ok(factory.create_with_nullability(&result, ty.is_nullable()))
}

fn combine_interval(binding: &dyn CallBinding, ty: SqlType) -> Result<SqlType> {
    let Some(mut qualifier) = ty.interval_qualifier().cloned() else {
        return Ok(ty);
    };
    let mut nullable = ty.is_nullable();
    for operand in binding.operand_types()? {
        if operand.name() != ty.name() {
            continue;
        }
        if let Some(other) = operand.interval_qualifier() {
            qualifier = qualifier.combine(other);
            nullable |= operand.is_nullable();
        }
    }
    let factory = binding.type_factory();
    let combined = factory.create_interval(qualifier);
    Ok(factory.create_with_nullability(&combined, nullable))
}

/// Strategy filling in unresolved operand types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandTypeInference {
    /// Every unresolved operand takes the first resolved operand's type
    FirstKnown,
    /// Operands take the call's expected type, field by field for rows
    FromReturnType,
    /// Every operand is BOOLEAN
    AssumeBoolean,
}

impl OperandTypeInference {
    /// Resolve operand types; `None` entries are unresolved
    pub fn infer_operand_types(
        self,
        factory: &TypeFactory,
        return_type: &SqlType,
        operand_types: &[Option<SqlType>],
    ) -> Result<Vec<SqlType>> {
        match self {
            Self::FirstKnown => {
                let known = operand_types.iter().flatten().next().ok_or_else(|| {
                    TypeError::internal("no operand type is known to propagate")
                })?;
                Ok(operand_types
                    .iter()
                    .map(|t| t.clone().unwrap_or_else(|| known.clone()))
                    .collect())
            }
            Self::FromReturnType => {
                if !return_type.is_struct() {
                    return Ok(vec![return_type.clone(); operand_types.len()]);
                }
                if return_type.field_count() < operand_types.len() {
                    return Err(TypeError::internal(format!(
                        "{return_type} has {} field(s) for {} operand(s)",
                        return_type.field_count(),
                        operand_types.len()
                    )));
                }
                Ok((0..operand_types.len())
                    .filter_map(|i| return_type.field(i).map(|f| f.ty.clone()))
                    .collect())
            }
            Self::AssumeBoolean => {
                let boolean = factory.create_sql_type(TypeName::Boolean, None, None)?;
                Ok(vec![boolean; operand_types.len()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quarry_sql_types::{Charset, Collation, IntervalQualifier, TimeUnit};
    use rstest::rstest;

    fn ty(factory: &TypeFactory, name: TypeName, precision: Option<u32>) -> SqlType {
        factory.create_sql_type(name, precision, None).unwrap()
    }

    #[test]
    fn test_ordinal_and_fixed() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let call = OperandList::new(&factory, "F", [int.clone()]);
        assert_eq!(ReturnTypeInference::Ordinal(0).infer(&call).unwrap(), Some(int));
        assert!(ReturnTypeInference::Ordinal(1).infer(&call).unwrap_err().is_internal());
        assert_eq!(
            ReturnTypeInference::fixed(TypeName::Boolean)
                .infer_return_type(&call)
                .unwrap()
                .to_string(),
            "BOOLEAN"
        );
    }

    #[test]
    fn test_match_from_start() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let dbl = ty(&factory, TypeName::Double, None);
        let call = OperandList::new(&factory, "F", [dbl.clone(), int.clone(), dbl.clone()]);
        let rule = ReturnTypeInference::Match {
            start: 1,
            names: vec![TypeName::Double],
        };
        assert_eq!(rule.infer(&call).unwrap(), Some(dbl));

        let rule = ReturnTypeInference::Match {
            start: 0,
            names: vec![TypeName::Date],
        };
        assert_eq!(rule.infer(&call).unwrap(), None);
        assert!(rule.infer_return_type(&call).unwrap_err().is_internal());
    }

    #[test]
    fn test_nullable_cascade() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let nullable = factory.create_with_nullability(&int, true);
        let call = OperandList::new(&factory, "+", [int, nullable]);
        let rule = ReturnTypeInference::cascade(
            ReturnTypeInference::Ordinal(0),
            vec![TypeTransform::ToNullable],
        );
        assert!(rule.infer_return_type(&call).unwrap().is_nullable());
    }

    #[rstest]
    #[case(TypeName::Char, "VARCHAR(4)")]
    #[case(TypeName::Binary, "VARBINARY(4)")]
    #[case(TypeName::Varchar, "VARCHAR(4)")]
    fn test_to_varying(#[case] name: TypeName, #[case] expected: &str) {
        let factory = TypeFactory::new();
        let input = ty(&factory, name, Some(4));
        let call = OperandList::new(&factory, "F", [input.clone()]);
        let result = TypeTransform::ToVarying.apply(&call, input).unwrap();
        assert_eq!(result.to_string(), expected);
    }

    #[test]
    fn test_to_varying_rejects_numbers() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let call = OperandList::new(&factory, "F", [int.clone()]);
        assert!(TypeTransform::ToVarying.apply(&call, int).unwrap_err().is_internal());
    }

    #[test]
    fn test_to_varying_keeps_collation() {
        let factory = TypeFactory::new();
        let char = ty(&factory, TypeName::Char, Some(3));
        let latin = factory
            .create_with_charset_and_collation(
                &char,
                Charset::new("LATIN1"),
                Collation::new("LATIN1$sv", Coercibility::Explicit),
            )
            .unwrap();
        let call = OperandList::new(&factory, "F", [latin.clone()]);
        let result = TypeTransform::ToVarying.apply(&call, latin.clone()).unwrap();
        assert_eq!(result.charset(), latin.charset());
        assert_eq!(result.collation(), latin.collation());
    }

    #[test]
    fn test_string_sum_precision() {
        let factory = TypeFactory::new();
        let a = ty(&factory, TypeName::Varchar, Some(3));
        let b = ty(&factory, TypeName::Char, Some(4));
        let call = OperandList::new(&factory, "||", [a, b]);
        let result = ReturnTypeInference::DyadicStringSumPrecision
            .infer(&call)
            .unwrap()
            .unwrap();
        assert_eq!(result.to_string(), "VARCHAR(7)");

        let int = ty(&factory, TypeName::Integer, None);
        let call = OperandList::new(&factory, "||", [int.clone(), int]);
        assert_eq!(
            ReturnTypeInference::DyadicStringSumPrecision.infer(&call).unwrap(),
            None
        );
    }

    #[test]
    fn test_string_sum_rejects_mixed_charsets() {
        let factory = TypeFactory::new();
        let a = ty(&factory, TypeName::Char, Some(2));
        let b = factory
            .create_with_charset_and_collation(
                &a,
                Charset::new("UTF16"),
                Collation::new("UTF16$en", Coercibility::Implicit),
            )
            .unwrap();
        let call = OperandList::new(&factory, "||", [a, b]);
        assert!(matches!(
            ReturnTypeInference::DyadicStringSumPrecision.infer(&call),
            Err(TypeError::TypesNotComparable { .. })
        ));
    }

    #[test]
    fn test_combine_interval() {
        let factory = TypeFactory::new();
        let day = factory.create_interval(IntervalQualifier::single(TimeUnit::Day));
        let second = factory.create_interval(IntervalQualifier::single(TimeUnit::Second));
        let second = factory.create_with_nullability(&second, true);
        let call = OperandList::new(&factory, "+", [day.clone(), second]);
        let result = TypeTransform::CombineInterval.apply(&call, day).unwrap();
        assert_eq!(result.to_string(), "INTERVAL DAY TO SECOND");
        assert!(result.is_nullable());
    }

    #[test]
    fn test_multiset_of_elements() {
        let factory = TypeFactory::new();
        let ints = factory.create_multiset(ty(&factory, TypeName::Integer, None));
        let bigs = factory.create_multiset(ty(&factory, TypeName::Bigint, None));
        let call = OperandList::new(&factory, "MULTISET UNION", [ints, bigs]);
        let result = ReturnTypeInference::Multiset.infer_return_type(&call).unwrap();
        assert_eq!(result.to_string(), "BIGINT MULTISET");
    }

    #[test]
    fn test_chain_takes_first_answer() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let call = OperandList::new(&factory, "*", [int.clone(), int.clone()]);
        let rule = ReturnTypeInference::Chain(vec![
            ReturnTypeInference::Match {
                start: 0,
                names: vec![TypeName::IntervalDayTime],
            },
            ReturnTypeInference::LeastRestrictive,
        ]);
        assert_eq!(rule.infer_return_type(&call).unwrap(), int);
    }

    #[test]
    fn test_operand_inference() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let vc = ty(&factory, TypeName::Varchar, Some(2));

        let resolved = OperandTypeInference::FirstKnown
            .infer_operand_types(&factory, &vc, &[None, Some(int.clone()), None])
            .unwrap();
        assert_eq!(resolved, vec![int.clone(), int.clone(), int.clone()]);

        let err = OperandTypeInference::FirstKnown
            .infer_operand_types(&factory, &vc, &[None, None])
            .unwrap_err();
        assert!(err.is_internal());

        let row = factory.create_struct([("A", int.clone()), ("B", vc.clone())]);
        let resolved = OperandTypeInference::FromReturnType
            .infer_operand_types(&factory, &row, &[None, None])
            .unwrap();
        assert_eq!(resolved, vec![int.clone(), vc.clone()]);
        assert!(
            OperandTypeInference::FromReturnType
                .infer_operand_types(&factory, &row, &[None, None, None])
                .is_err()
        );

        let resolved = OperandTypeInference::AssumeBoolean
            .infer_operand_types(&factory, &vc, &[None])
            .unwrap();
        assert_eq!(resolved[0].name(), TypeName::Boolean);
    }
}
