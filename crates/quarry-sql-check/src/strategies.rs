//! Predefined checkers and inference strategies
//!
//! Operator definitions pick their operand checker, return type inference
//! and operand type inference from here. Every function builds a fresh,
//! immutable value.

use crate::checker::{CompositeChecker, CompositePolicy, ExplicitChecker, OperandTypeChecker};
use crate::inference::{OperandTypeInference, ReturnTypeInference, TypeTransform};
use quarry_sql_types::type_name::{
    BINARY_NULLABLE_TYPES, BINARY_TYPES, BOOLEAN_NULLABLE_TYPES, BOOLEAN_TYPES,
    CHAR_NULLABLE_TYPES, CHAR_TYPES, DATETIME_NULLABLE_TYPES, DATETIME_TYPES, INT_NULLABLE_TYPES,
    INT_TYPES, INTERVAL_NULLABLE_TYPES, INTERVAL_TYPES, MULTISET_NULLABLE_TYPES, MULTISET_TYPES,
    NUMERIC_NULLABLE_TYPES, NUMERIC_TYPES, STRING_NULLABLE_TYPES, STRING_TYPES,
};
use quarry_sql_types::{Comparability, TypeName};

// =========================================================================
// Operand checkers
// =========================================================================

fn explicit(sets: &[&[TypeName]]) -> OperandTypeChecker {
    OperandTypeChecker::Explicit(ExplicitChecker::from_sets(sets))
}

fn or(children: Vec<OperandTypeChecker>) -> OperandTypeChecker {
    OperandTypeChecker::Composite(CompositeChecker::from_parts(CompositePolicy::Or, children))
}

fn and(children: Vec<OperandTypeChecker>) -> OperandTypeChecker {
    OperandTypeChecker::Composite(CompositeChecker::from_parts(CompositePolicy::And, children))
}

pub fn numeric() -> OperandTypeChecker {
    explicit(&[NUMERIC_TYPES])
}

pub fn nullable_numeric() -> OperandTypeChecker {
    explicit(&[NUMERIC_NULLABLE_TYPES])
}

pub fn numeric_x2() -> OperandTypeChecker {
    explicit(&[NUMERIC_TYPES, NUMERIC_TYPES])
}

pub fn nullable_numeric_x2() -> OperandTypeChecker {
    explicit(&[NUMERIC_NULLABLE_TYPES, NUMERIC_NULLABLE_TYPES])
}

pub fn int() -> OperandTypeChecker {
    explicit(&[INT_TYPES])
}

pub fn nullable_int() -> OperandTypeChecker {
    explicit(&[INT_NULLABLE_TYPES])
}

pub fn int_x2() -> OperandTypeChecker {
    explicit(&[INT_TYPES, INT_TYPES])
}

pub fn nullable_int_x2() -> OperandTypeChecker {
    explicit(&[INT_NULLABLE_TYPES, INT_NULLABLE_TYPES])
}

pub fn string() -> OperandTypeChecker {
    explicit(&[STRING_TYPES])
}

pub fn nullable_string() -> OperandTypeChecker {
    explicit(&[STRING_NULLABLE_TYPES])
}

pub fn string_x2() -> OperandTypeChecker {
    explicit(&[STRING_TYPES, STRING_TYPES])
}

pub fn nullable_string_x2() -> OperandTypeChecker {
    explicit(&[STRING_NULLABLE_TYPES, STRING_NULLABLE_TYPES])
}

pub fn string_x3() -> OperandTypeChecker {
    explicit(&[STRING_TYPES, STRING_TYPES, STRING_TYPES])
}

pub fn nullable_string_x3() -> OperandTypeChecker {
    explicit(&[
        STRING_NULLABLE_TYPES,
        STRING_NULLABLE_TYPES,
        STRING_NULLABLE_TYPES,
    ])
}

pub fn character() -> OperandTypeChecker {
    explicit(&[CHAR_TYPES])
}

pub fn nullable_character() -> OperandTypeChecker {
    explicit(&[CHAR_NULLABLE_TYPES])
}

pub fn character_x2() -> OperandTypeChecker {
    explicit(&[CHAR_TYPES, CHAR_TYPES])
}

pub fn nullable_character_x2() -> OperandTypeChecker {
    explicit(&[CHAR_NULLABLE_TYPES, CHAR_NULLABLE_TYPES])
}

pub fn binary() -> OperandTypeChecker {
    explicit(&[BINARY_TYPES])
}

pub fn nullable_binary() -> OperandTypeChecker {
    explicit(&[BINARY_NULLABLE_TYPES])
}

pub fn binary_x2() -> OperandTypeChecker {
    explicit(&[BINARY_TYPES, BINARY_TYPES])
}

pub fn nullable_binary_x2() -> OperandTypeChecker {
    explicit(&[BINARY_NULLABLE_TYPES, BINARY_NULLABLE_TYPES])
}

pub fn boolean() -> OperandTypeChecker {
    explicit(&[BOOLEAN_TYPES])
}

pub fn nullable_boolean() -> OperandTypeChecker {
    explicit(&[BOOLEAN_NULLABLE_TYPES])
}

pub fn boolean_x2() -> OperandTypeChecker {
    explicit(&[BOOLEAN_TYPES, BOOLEAN_TYPES])
}

pub fn nullable_boolean_x2() -> OperandTypeChecker {
    explicit(&[BOOLEAN_NULLABLE_TYPES, BOOLEAN_NULLABLE_TYPES])
}

pub fn datetime() -> OperandTypeChecker {
    explicit(&[DATETIME_TYPES])
}

pub fn nullable_datetime() -> OperandTypeChecker {
    explicit(&[DATETIME_NULLABLE_TYPES])
}

pub fn interval() -> OperandTypeChecker {
    explicit(&[INTERVAL_TYPES])
}

pub fn nullable_interval() -> OperandTypeChecker {
    explicit(&[INTERVAL_NULLABLE_TYPES])
}

/// Two intervals of the same kind
pub fn nullable_interval_x2() -> OperandTypeChecker {
    and(vec![
        explicit(&[INTERVAL_NULLABLE_TYPES, INTERVAL_NULLABLE_TYPES]),
        OperandTypeChecker::same(2),
    ])
}

pub fn explicit_multiset() -> OperandTypeChecker {
    explicit(&[MULTISET_TYPES])
}

pub fn nullable_explicit_multiset() -> OperandTypeChecker {
    explicit(&[MULTISET_NULLABLE_TYPES])
}

pub fn nullable_literal() -> OperandTypeChecker {
    OperandTypeChecker::literal(true)
}

pub fn not_null_literal() -> OperandTypeChecker {
    OperandTypeChecker::literal(false)
}

pub fn positive_int_literal() -> OperandTypeChecker {
    OperandTypeChecker::positive_integer_literal()
}

/// Character literal, e.g. a TRIM character or an escape character
pub fn varchar_literal() -> OperandTypeChecker {
    and(vec![character(), not_null_literal()])
}

pub fn positive_int_or_varchar_literal() -> OperandTypeChecker {
    or(vec![positive_int_literal(), varchar_literal()])
}

pub fn nullable_same_x2() -> OperandTypeChecker {
    OperandTypeChecker::same(2)
}

pub fn nullable_same_x3() -> OperandTypeChecker {
    OperandTypeChecker::same(3)
}

/// Operands of `<`, `>`, `BETWEEN` and friends
pub fn comparable_ordered() -> OperandTypeChecker {
    OperandTypeChecker::comparable(Comparability::All)
}

/// Operands of `=` and `<>`
pub fn comparable_unordered() -> OperandTypeChecker {
    OperandTypeChecker::comparable(Comparability::Unordered)
}

pub fn nullable_comparable_ordered() -> OperandTypeChecker {
    and(vec![nullable_same_x2(), comparable_ordered()])
}

pub fn nullable_comparable_unordered() -> OperandTypeChecker {
    and(vec![nullable_same_x2(), comparable_unordered()])
}

fn datetime_interval() -> OperandTypeChecker {
    explicit(&[DATETIME_NULLABLE_TYPES, INTERVAL_NULLABLE_TYPES])
}

fn interval_datetime() -> OperandTypeChecker {
    explicit(&[INTERVAL_NULLABLE_TYPES, DATETIME_NULLABLE_TYPES])
}

fn interval_numeric() -> OperandTypeChecker {
    explicit(&[INTERVAL_NULLABLE_TYPES, NUMERIC_NULLABLE_TYPES])
}

fn numeric_interval() -> OperandTypeChecker {
    explicit(&[NUMERIC_NULLABLE_TYPES, INTERVAL_NULLABLE_TYPES])
}

/// Binary `+`
pub fn plus() -> OperandTypeChecker {
    or(vec![
        nullable_numeric_x2(),
        nullable_interval_x2(),
        datetime_interval(),
        interval_datetime(),
    ])
}

/// Binary `-`
pub fn minus() -> OperandTypeChecker {
    or(vec![
        nullable_numeric_x2(),
        nullable_interval_x2(),
        datetime_interval(),
    ])
}

pub fn multiply() -> OperandTypeChecker {
    or(vec![
        nullable_numeric_x2(),
        interval_numeric(),
        numeric_interval(),
    ])
}

pub fn division() -> OperandTypeChecker {
    or(vec![nullable_numeric_x2(), interval_numeric()])
}

/// Unary minus and ABS
pub fn numeric_or_interval() -> OperandTypeChecker {
    or(vec![nullable_numeric(), nullable_interval()])
}

pub fn record_multiset() -> OperandTypeChecker {
    OperandTypeChecker::record_multiset()
}

/// Argument of UNNEST
pub fn multiset_or_record_multiset() -> OperandTypeChecker {
    or(vec![explicit_multiset(), record_multiset()])
}

/// Operands of MULTISET UNION / INTERSECT / EXCEPT
pub fn multiset_x2() -> OperandTypeChecker {
    OperandTypeChecker::multiset()
}

/// Inputs of UNION / INTERSECT / EXCEPT
pub fn set_op() -> OperandTypeChecker {
    OperandTypeChecker::set_op()
}

pub fn variadic() -> OperandTypeChecker {
    OperandTypeChecker::Variadic
}

// =========================================================================
// Return type inference
// =========================================================================

fn nullable(rule: ReturnTypeInference) -> ReturnTypeInference {
    ReturnTypeInference::cascade(rule, vec![TypeTransform::ToNullable])
}

pub fn first_arg() -> ReturnTypeInference {
    ReturnTypeInference::Ordinal(0)
}

pub fn nullable_first_arg() -> ReturnTypeInference {
    nullable(first_arg())
}

pub fn nullable_varying_first_arg() -> ReturnTypeInference {
    ReturnTypeInference::cascade(
        first_arg(),
        vec![TypeTransform::ToNullable, TypeTransform::ToVarying],
    )
}

pub fn first_interval() -> ReturnTypeInference {
    ReturnTypeInference::Match {
        start: 0,
        names: INTERVAL_TYPES.to_vec(),
    }
}

pub fn nullable_first_interval() -> ReturnTypeInference {
    nullable(first_interval())
}

pub fn boolean_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed(TypeName::Boolean)
}

pub fn nullable_boolean_result() -> ReturnTypeInference {
    nullable(boolean_result())
}

pub fn date_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed(TypeName::Date)
}

pub fn nullable_date_result() -> ReturnTypeInference {
    nullable(date_result())
}

pub fn time_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed_with_precision(TypeName::Time, 0)
}

pub fn nullable_time_result() -> ReturnTypeInference {
    nullable(time_result())
}

pub fn double_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed(TypeName::Double)
}

pub fn nullable_double_result() -> ReturnTypeInference {
    nullable(double_result())
}

pub fn integer_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed(TypeName::Integer)
}

pub fn nullable_integer_result() -> ReturnTypeInference {
    nullable(integer_result())
}

pub fn varchar_2000_result() -> ReturnTypeInference {
    ReturnTypeInference::fixed_with_precision(TypeName::Varchar, 2000)
}

pub fn nullable_varchar_2000_result() -> ReturnTypeInference {
    nullable(varchar_2000_result())
}

pub fn least_restrictive() -> ReturnTypeInference {
    ReturnTypeInference::LeastRestrictive
}

/// Least-restrictive type, widened over interval operands
pub fn biggest() -> ReturnTypeInference {
    ReturnTypeInference::cascade(
        ReturnTypeInference::LeastRestrictive,
        vec![TypeTransform::CombineInterval],
    )
}

pub fn nullable_biggest() -> ReturnTypeInference {
    ReturnTypeInference::cascade(
        ReturnTypeInference::LeastRestrictive,
        vec![TypeTransform::CombineInterval, TypeTransform::ToNullable],
    )
}

/// `*`: an interval operand decides, else numeric widening
pub fn nullable_product() -> ReturnTypeInference {
    ReturnTypeInference::Chain(vec![nullable_first_interval(), nullable_biggest()])
}

/// `/`: an interval dividend decides, else numeric widening
pub fn nullable_quotient() -> ReturnTypeInference {
    ReturnTypeInference::Chain(vec![nullable_first_interval(), nullable_biggest()])
}

pub fn dyadic_string_sum_precision() -> ReturnTypeInference {
    ReturnTypeInference::DyadicStringSumPrecision
}

pub fn nullable_dyadic_string_sum_precision() -> ReturnTypeInference {
    nullable(dyadic_string_sum_precision())
}

/// `||`
pub fn nullable_varying_dyadic_string_sum_precision() -> ReturnTypeInference {
    ReturnTypeInference::cascade(
        dyadic_string_sum_precision(),
        vec![TypeTransform::ToNullable, TypeTransform::ToVarying],
    )
}

pub fn multiset_result() -> ReturnTypeInference {
    ReturnTypeInference::Multiset
}

pub fn nullable_multiset_result() -> ReturnTypeInference {
    nullable(multiset_result())
}

/// Least restrictive element type over every multiset operand, e.g. for ELEMENT()
pub fn multiset_element_type() -> ReturnTypeInference {
    ReturnTypeInference::cascade(multiset_result(), vec![TypeTransform::ToMultisetElement])
}

pub fn nullable_multiset_element_type() -> ReturnTypeInference {
    ReturnTypeInference::cascade(
        multiset_result(),
        vec![TypeTransform::ToMultisetElement, TypeTransform::ToNullable],
    )
}

// =========================================================================
// Operand type inference
// =========================================================================

pub fn first_known() -> OperandTypeInference {
    OperandTypeInference::FirstKnown
}

pub fn return_type() -> OperandTypeInference {
    OperandTypeInference::FromReturnType
}

pub fn assume_boolean() -> OperandTypeInference {
    OperandTypeInference::AssumeBoolean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_binding::{Literal, OperandList};
    use crate::count_range::OperandCountRange;
    use pretty_assertions::assert_eq;
    use quarry_sql_diagnostics::TypeError;
    use quarry_sql_types::{IntervalQualifier, SqlType, TimeUnit, TypeFactory};

    fn scalar(factory: &TypeFactory, name: TypeName) -> SqlType {
        factory.create_sql_type(name, None, None).unwrap()
    }

    #[test]
    fn test_plus_accepts_numbers_and_intervals() {
        let factory = TypeFactory::new();
        let int = scalar(&factory, TypeName::Integer);
        let date = scalar(&factory, TypeName::Date);
        let day = factory.create_interval(IntervalQualifier::single(TimeUnit::Day));
        let month = factory.create_interval(IntervalQualifier::single(TimeUnit::Month));

        for operands in [
            vec![int.clone(), int.clone()],
            vec![day.clone(), day.clone()],
            vec![date.clone(), day.clone()],
            vec![day.clone(), date.clone()],
        ] {
            let call = OperandList::new(&factory, "+", operands);
            assert!(plus().check_operand_types(&call, true).unwrap());
        }

        let call = OperandList::new(&factory, "+", [day, month]);
        assert!(!plus().check_operand_types(&call, false).unwrap());

        let call = OperandList::new(&factory, "-", [int, date]);
        assert!(!minus().check_operand_types(&call, false).unwrap());
    }

    #[test]
    fn test_plus_error_lists_every_form() {
        let factory = TypeFactory::new();
        let bool_ty = scalar(&factory, TypeName::Boolean);
        let call = OperandList::new(&factory, "+", [bool_ty.clone(), bool_ty]);
        match plus().check_operand_types(&call, true) {
            Err(TypeError::SignatureMismatch {
                allowed_signatures, ..
            }) => {
                assert!(allowed_signatures.contains("+(<INTEGER>, <INTEGER>)"));
                assert!(allowed_signatures.contains("+(<DATE>, <INTERVAL_DAY_TIME>)"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_substring_length_argument() {
        let factory = TypeFactory::new();
        let int = scalar(&factory, TypeName::Integer);
        let vc = factory.create_sql_type(TypeName::Varchar, Some(1), None).unwrap();
        let checker = positive_int_or_varchar_literal();

        let call = OperandList::new(&factory, "F", [int]).with_literal(0, Literal::Integer(4));
        assert!(checker.check_operand_types(&call, true).unwrap());

        let call = OperandList::new(&factory, "F", [vc]).with_literal(0, Literal::Char("x".into()));
        assert!(checker.check_operand_types(&call, true).unwrap());
        assert_eq!(checker.operand_count_range(), OperandCountRange::Fixed(1));
    }

    #[test]
    fn test_nullable_comparisons() {
        let factory = TypeFactory::new();
        let int = scalar(&factory, TypeName::Integer);
        let ints = factory.create_multiset(int.clone());
        let call = OperandList::new(&factory, "=", [ints.clone(), ints]);
        assert!(nullable_comparable_unordered().check_operand_types(&call, true).unwrap());
        assert!(!nullable_comparable_ordered().check_operand_types(&call, false).unwrap());
    }

    #[test]
    fn test_product_prefers_interval() {
        let factory = TypeFactory::new();
        let int = scalar(&factory, TypeName::Integer);
        let day = factory.create_interval(IntervalQualifier::single(TimeUnit::Day));
        let call = OperandList::new(&factory, "*", [int.clone(), day.clone()]);
        assert_eq!(nullable_product().infer_return_type(&call).unwrap(), day);

        let bigint = scalar(&factory, TypeName::Bigint);
        let call = OperandList::new(&factory, "*", [int, bigint.clone()]);
        assert_eq!(nullable_product().infer_return_type(&call).unwrap(), bigint);
    }

    #[test]
    fn test_concat_result() {
        let factory = TypeFactory::new();
        let a = factory.create_sql_type(TypeName::Char, Some(2), None).unwrap();
        let b = factory.create_sql_type(TypeName::Char, Some(3), None).unwrap();
        let b = factory.create_with_nullability(&b, true);
        let call = OperandList::new(&factory, "||", [a, b]);
        let result = nullable_varying_dyadic_string_sum_precision()
            .infer_return_type(&call)
            .unwrap();
        assert_eq!(result.to_string(), "VARCHAR(5)");
        assert!(result.is_nullable());
    }

    #[test]
    fn test_fixed_results() {
        let factory = TypeFactory::new();
        let call = OperandList::new(&factory, "CURRENT_TIME", []);
        assert_eq!(time_result().infer_return_type(&call).unwrap().to_string(), "TIME(0)");
        assert_eq!(
            varchar_2000_result().infer_return_type(&call).unwrap().to_string(),
            "VARCHAR(2000)"
        );
    }

    #[test]
    fn test_element_type() {
        let factory = TypeFactory::new();
        let int = scalar(&factory, TypeName::Integer);
        let ints = factory.create_multiset(int.clone());
        let call = OperandList::new(&factory, "ELEMENT", [ints.clone()]);
        assert_eq!(multiset_element_type().infer_return_type(&call).unwrap(), int);
        assert_eq!(
            nullable_multiset_element_type().infer_return_type(&call).unwrap(),
            int
        );

        // Every operand's element takes part, not just the first
        let bigint = scalar(&factory, TypeName::Bigint);
        let bigints = factory.create_multiset(bigint.clone());
        let nullable_bigints = factory.create_with_nullability(&bigints, true);
        let call = OperandList::new(&factory, "F", [ints.clone(), bigints]);
        assert_eq!(multiset_element_type().infer_return_type(&call).unwrap(), bigint);

        let call = OperandList::new(&factory, "F", [ints, nullable_bigints]);
        let element = nullable_multiset_element_type()
            .infer_return_type(&call)
            .unwrap();
        assert!(element.equals_sans_nullability(&bigint));
        assert!(element.is_nullable());
        assert!(!multiset_element_type().infer_return_type(&call).unwrap().is_nullable());
    }
}
