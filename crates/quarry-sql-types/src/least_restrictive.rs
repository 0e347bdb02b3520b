//! Least-restrictive type resolution
//!
//! Finds one type that every input can be widened to, as needed for CASE
//! branches, UNION columns and IN lists. A structural pass handles string
//! and numeric widening; when it declines, a cast-based walk decides.

use crate::compat::can_cast;
use crate::factory::TypeFactory;
use crate::family::TypeFamily;
use crate::sql_type::{SqlType, TypeDescriptor};
use crate::type_name::TypeName;
use log::debug;
use quarry_sql_diagnostics::Result;

impl TypeFactory {
    /// Least-restrictive type of `types`, or `None` if there is none
    ///
    /// The fold runs left to right and is not commutative: the cast-based
    /// walk may give different answers for different input orders.
    pub fn least_restrictive(&self, types: &[SqlType]) -> Result<Option<SqlType>> {
        let Some(first) = types.first() else {
            return Ok(None);
        };
        if first.is_struct() {
            return self.least_restrictive_struct(types);
        }
        if let Some(ty) = self.least_restrictive_by_structure(types) {
            return Ok(Some(ty));
        }
        debug!(
            "structural widening declined for {}; trying casts",
            describe(types)
        );
        self.least_restrictive_by_cast(types)
    }

    /// Column-wise resolution into a ROW named after the first input
    ///
    /// Nullability lives on the resolved columns; the ROW itself is not
    /// made nullable.
    fn least_restrictive_struct(&self, types: &[SqlType]) -> Result<Option<SqlType>> {
        let Some(first_fields) = types[0].fields() else {
            return Ok(None);
        };
        let count = first_fields.len();
        if types
            .iter()
            .any(|t| !t.is_struct() || t.field_count() != count)
        {
            return Ok(None);
        }

        let mut fields = Vec::with_capacity(count);
        for (i, field) in first_fields.iter().enumerate() {
            let column: Vec<SqlType> = types
                .iter()
                .filter_map(|t| t.field(i).map(|f| f.ty.clone()))
                .collect();
            let Some(ty) = self.least_restrictive(&column)? else {
                return Ok(None);
            };
            fields.push((field.name.clone(), ty));
        }
        Ok(Some(self.create_struct(fields)))
    }

    fn least_restrictive_by_structure(&self, types: &[SqlType]) -> Option<SqlType> {
        let mut result = types[0].clone();
        let any_nullable = types.iter().any(SqlType::is_nullable);

        for next in &types[1..] {
            let (rn, nn) = (result.name(), next.name());
            if is_string_family(&result) && is_string_family(next) {
                if result.family() != next.family() {
                    return None;
                }
                let precision = match (result.declared_precision(), next.declared_precision()) {
                    (None, None) => None,
                    _ => result.precision().max(next.precision()),
                };
                // The incoming name wins unless the running result is
                // already variable width.
                let name = if rn.is_bounded_variable_width() { rn } else { nn };
                let mut desc = result.descriptor().clone();
                desc.name = name;
                desc.precision = precision;
                result = self.canonize(desc);
            } else if rn.is_exact_numeric() && nn.is_exact_numeric() {
                if result.equals_sans_nullability(next) {
                    continue;
                }
                if rn.allows_precision_no_scale() || nn.allows_precision_no_scale() {
                    return None;
                }
                if next.precision() > result.precision() {
                    result = next.clone();
                }
            } else if (rn.is_numeric() && nn.is_approximate_numeric())
                || (rn.is_approximate_numeric() && nn.is_numeric())
            {
                if !result.equals_sans_nullability(next) {
                    result = self.double();
                }
            } else {
                return None;
            }
        }
        Some(self.create_with_nullability(&result, any_nullable))
    }

    fn least_restrictive_by_cast(&self, types: &[SqlType]) -> Result<Option<SqlType>> {
        let mut best: Option<&SqlType> = None;
        let mut any_nullable = false;

        for ty in types {
            let is_null = ty.name() == TypeName::Null;
            any_nullable |= is_null || ty.is_nullable();
            if is_null {
                continue;
            }
            match best {
                None => best = Some(ty),
                Some(current) => {
                    if can_cast(ty, current, false)? {
                        best = Some(ty);
                    } else if !can_cast(current, ty, false)? {
                        return Ok(None);
                    }
                }
            }
        }

        let best = best.unwrap_or(&types[0]);
        Ok(Some(self.create_with_nullability(best, any_nullable)))
    }

    fn double(&self) -> SqlType {
        self.canonize(TypeDescriptor::new(TypeName::Double))
    }
}

fn is_string_family(ty: &SqlType) -> bool {
    matches!(
        ty.family(),
        Some(TypeFamily::Character | TypeFamily::Binary)
    )
}

fn describe(types: &[SqlType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ty(factory: &TypeFactory, name: TypeName, precision: Option<u32>) -> SqlType {
        factory.create_sql_type(name, precision, None).unwrap()
    }

    fn resolve(factory: &TypeFactory, types: &[SqlType]) -> Option<String> {
        factory
            .least_restrictive(types)
            .unwrap()
            .map(|t| t.full_digest())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TypeFactory::new().least_restrictive(&[]).unwrap(), None);
    }

    #[rstest]
    #[case(TypeName::Integer, TypeName::Bigint, "BIGINT NOT NULL")]
    #[case(TypeName::Bigint, TypeName::Tinyint, "BIGINT NOT NULL")]
    #[case(TypeName::Integer, TypeName::Double, "DOUBLE NOT NULL")]
    #[case(TypeName::Real, TypeName::Float, "DOUBLE NOT NULL")]
    #[case(TypeName::Double, TypeName::Double, "DOUBLE NOT NULL")]
    #[case(TypeName::Date, TypeName::Date, "DATE NOT NULL")]
    fn test_numeric_and_identity_widening(
        #[case] a: TypeName,
        #[case] b: TypeName,
        #[case] expected: &str,
    ) {
        let factory = TypeFactory::new();
        let types = [ty(&factory, a, None), ty(&factory, b, None)];
        assert_eq!(resolve(&factory, &types).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(TypeName::Char, 3, TypeName::Varchar, 5, "VARCHAR(5)")]
    #[case(TypeName::Varchar, 5, TypeName::Char, 10, "VARCHAR(10)")]
    #[case(TypeName::Char, 3, TypeName::Char, 5, "CHAR(5)")]
    #[case(TypeName::Binary, 8, TypeName::Varbinary, 2, "VARBINARY(8)")]
    fn test_string_widening(
        #[case] a: TypeName,
        #[case] pa: u32,
        #[case] b: TypeName,
        #[case] pb: u32,
        #[case] expected: &str,
    ) {
        let factory = TypeFactory::new();
        let types = [ty(&factory, a, Some(pa)), ty(&factory, b, Some(pb))];
        let result = factory.least_restrictive(&types).unwrap().unwrap();
        assert_eq!(result.to_string(), expected);
        assert_eq!(result.charset(), types[0].charset());
    }

    #[test]
    fn test_char_and_binary_do_not_mix() {
        let factory = TypeFactory::new();
        let types = [
            ty(&factory, TypeName::Char, Some(2)),
            ty(&factory, TypeName::Binary, Some(2)),
        ];
        assert_eq!(resolve(&factory, &types), None);
    }

    #[test]
    fn test_unrelated_types_have_no_result() {
        let factory = TypeFactory::new();
        let types = [
            ty(&factory, TypeName::Integer, None),
            ty(&factory, TypeName::Varchar, Some(4)),
        ];
        assert_eq!(resolve(&factory, &types), None);
    }

    #[test]
    fn test_nullability_is_propagated() {
        let factory = TypeFactory::new();
        let small = factory.create_with_nullability(&ty(&factory, TypeName::Smallint, None), true);
        let types = [small, ty(&factory, TypeName::Integer, None)];
        assert_eq!(resolve(&factory, &types).as_deref(), Some("INTEGER"));
    }

    #[test]
    fn test_null_inputs() {
        let factory = TypeFactory::new();
        let null = ty(&factory, TypeName::Null, None);
        let int = ty(&factory, TypeName::Integer, None);
        assert_eq!(
            resolve(&factory, &[null.clone(), int.clone()]).as_deref(),
            Some("INTEGER")
        );
        assert_eq!(resolve(&factory, &[int, null.clone()]).as_deref(), Some("INTEGER"));
        assert_eq!(resolve(&factory, &[null.clone(), null]).as_deref(), Some("NULL"));
    }

    #[test]
    fn test_fallback_widens_integer_to_decimal() {
        let factory = TypeFactory::new();
        let dec = factory.create_sql_type(TypeName::Decimal, Some(10), Some(2)).unwrap();
        let types = [ty(&factory, TypeName::Integer, None), dec];
        assert_eq!(resolve(&factory, &types).as_deref(), Some("DECIMAL(10, 2) NOT NULL"));
    }

    // The cast-based walk is order dependent; these pin the current answers.
    #[test]
    fn test_fallback_fold_order() {
        let factory = TypeFactory::new();
        let wide = factory.create_sql_type(TypeName::Decimal, Some(10), Some(2)).unwrap();
        let narrow = factory.create_sql_type(TypeName::Decimal, Some(5), Some(0)).unwrap();
        assert_eq!(
            resolve(&factory, &[wide.clone(), narrow.clone()]).as_deref(),
            Some("DECIMAL(5, 0) NOT NULL")
        );
        assert_eq!(
            resolve(&factory, &[narrow, wide]).as_deref(),
            Some("DECIMAL(10, 2) NOT NULL")
        );

        let date = ty(&factory, TypeName::Date, None);
        let ts = ty(&factory, TypeName::Timestamp, None);
        assert_eq!(
            resolve(&factory, &[date.clone(), ts.clone()]).as_deref(),
            Some("DATE NOT NULL")
        );
        assert_eq!(resolve(&factory, &[ts, date]).as_deref(), Some("DATE NOT NULL"));
    }

    #[test]
    fn test_multiset_elements_widen() {
        let factory = TypeFactory::new();
        let ints = factory.create_multiset(ty(&factory, TypeName::Integer, None));
        let bigints = factory.create_multiset(ty(&factory, TypeName::Bigint, None));
        assert_eq!(
            resolve(&factory, &[ints, bigints]).as_deref(),
            Some("BIGINT MULTISET NOT NULL")
        );
    }

    #[test]
    fn test_structs_resolve_column_wise() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let big = ty(&factory, TypeName::Bigint, None);
        let c3 = ty(&factory, TypeName::Char, Some(3));
        let vc5 = ty(&factory, TypeName::Varchar, Some(5));
        let a = factory.create_struct([("ID", int), ("NAME", c3)]);
        let b = factory.create_struct([("X", big.clone()), ("Y", vc5)]);
        let result = factory.least_restrictive(&[a.clone(), b]).unwrap().unwrap();
        assert_eq!(result.to_string(), "RecordType(BIGINT ID, VARCHAR(5) NAME)");

        let short = factory.create_struct([("X", big.clone())]);
        assert_eq!(factory.least_restrictive(&[a.clone(), short]).unwrap(), None);
        assert_eq!(factory.least_restrictive(&[a, big]).unwrap(), None);
    }

    #[test]
    fn test_struct_nullability_stays_on_columns() {
        let factory = TypeFactory::new();
        let int = ty(&factory, TypeName::Integer, None);
        let nullable_int = factory.create_with_nullability(&int, true);
        let plain = factory.create_struct([("A", int.clone()), ("B", int.clone())]);
        let nullable_row = factory.create_with_nullability(&plain, true);

        let result = factory
            .least_restrictive(&[plain.clone(), nullable_row])
            .unwrap()
            .unwrap();
        assert!(!result.is_nullable());

        let mixed = factory.create_struct([("A", nullable_int), ("B", int)]);
        let result = factory.least_restrictive(&[plain, mixed]).unwrap().unwrap();
        assert!(!result.is_nullable());
        assert_eq!(
            result.fields().unwrap().iter().map(|f| f.ty.is_nullable()).collect::<Vec<_>>(),
            vec![true, false]
        );
    }
}
