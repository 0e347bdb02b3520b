//! Assignment and coercion rule tables
//!
//! The assignment table lists, for every target type name, the source names
//! that may be stored into it without an explicit CAST. The coercion table
//! extends it with the pairs that are legal only under CAST.

use crate::type_name::{
    CHAR_TYPES, EXACT_TYPES, INT_TYPES, INTERVAL_TYPES, NUMERIC_TYPES, TypeName,
};
use indexmap::{IndexMap, IndexSet};
use log::error;
use quarry_sql_diagnostics::{Result, TypeError};
use std::sync::LazyLock;

/// Which rule table to consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Implicit assignment
    Assignment,
    /// Explicit CAST
    Coercion,
}

/// Mapping from target type name to the set of assignable source names
#[derive(Debug, Clone)]
pub struct RuleTable {
    kind: RuleKind,
    rules: IndexMap<TypeName, IndexSet<TypeName>>,
}

static ASSIGNMENT_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let rules = TypeName::ALL
        .iter()
        .copied()
        .filter(|to| *to != TypeName::Null)
        .map(|to| (to, assignable_from(to).iter().copied().collect()))
        .collect();
    RuleTable {
        kind: RuleKind::Assignment,
        rules,
    }
});

static COERCION_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let mut rules = ASSIGNMENT_RULES.rules.clone();
    for (to, sources) in rules.iter_mut() {
        sources.extend(coercible_from(*to).iter().copied());
    }
    RuleTable {
        kind: RuleKind::Coercion,
        rules,
    }
});

fn union(parts: &[&[TypeName]]) -> Vec<TypeName> {
    parts.concat()
}

/// Sources assignable into `to`
fn assignable_from(to: TypeName) -> Vec<TypeName> {
    use TypeName::*;
    match to {
        Tinyint => vec![Tinyint],
        Smallint => vec![Tinyint, Smallint],
        Integer => vec![Tinyint, Smallint, Integer],
        Bigint => INT_TYPES.to_vec(),
        Decimal => union(&[INT_TYPES, &[Real, Double, Decimal]]),
        Float => union(&[INT_TYPES, &[Decimal, Float]]),
        Real => union(&[INT_TYPES, &[Decimal, Float, Real]]),
        Double => NUMERIC_TYPES.to_vec(),
        Char => vec![Char],
        Varchar => vec![Char, Varchar],
        Binary => vec![Binary],
        Varbinary => vec![Binary, Varbinary],
        Boolean => vec![Boolean],
        Date => vec![Date, Timestamp],
        Time => vec![Time, Timestamp],
        Timestamp => vec![Timestamp],
        IntervalYearMonth => vec![IntervalYearMonth],
        IntervalDayTime => vec![IntervalDayTime],
        Multiset | Symbol | Distinct | Structured | Row | Cursor | ColumnList => vec![to],
        Any => TypeName::ALL.to_vec(),
        Null => Vec::new(),
    }
}

/// Extra sources legal only under CAST
fn coercible_from(to: TypeName) -> Vec<TypeName> {
    use TypeName::*;
    match to {
        Tinyint | Smallint | Integer | Bigint | Decimal => {
            union(&[NUMERIC_TYPES, CHAR_TYPES, INTERVAL_TYPES])
        }
        Float | Real | Double => union(&[NUMERIC_TYPES, CHAR_TYPES]),
        Char | Varchar => union(&[
            NUMERIC_TYPES,
            &[Boolean, Date, Time, Timestamp],
            INTERVAL_TYPES,
            CHAR_TYPES,
        ]),
        Boolean => CHAR_TYPES.to_vec(),
        Date | Time => union(&[CHAR_TYPES, &[Timestamp]]),
        Timestamp => union(&[CHAR_TYPES, &[Date, Time]]),
        IntervalYearMonth | IntervalDayTime => union(&[EXACT_TYPES, CHAR_TYPES]),
        Binary => vec![Varbinary],
        Varbinary | Null | Any | Symbol | Multiset | Distinct | Structured | Row | Cursor
        | ColumnList => Vec::new(),
    }
}

impl RuleTable {
    pub fn assignment() -> &'static RuleTable {
        &ASSIGNMENT_RULES
    }

    pub fn coercion() -> &'static RuleTable {
        &COERCION_RULES
    }

    /// Coercion table when `coerce` is set, assignment table otherwise
    pub fn select(coerce: bool) -> &'static RuleTable {
        if coerce {
            Self::coercion()
        } else {
            Self::assignment()
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Source names for a target
    ///
    /// A missing entry is a catalog bug and fails with
    /// `AssignmentRulesIncomplete`.
    pub fn sources(&self, to: TypeName) -> Result<&IndexSet<TypeName>> {
        self.rules.get(&to).ok_or_else(|| {
            error!("{:?} rule table has no entry for {to}", self.kind);
            TypeError::rules_incomplete(to)
        })
    }

    /// Whether a value of `from` may be stored into `to`
    ///
    /// Nothing converts to NULL; NULL converts to everything.
    pub fn can_cast_from(&self, to: TypeName, from: TypeName) -> Result<bool> {
        if to == TypeName::Null {
            return Ok(false);
        }
        if from == TypeName::Null {
            return Ok(true);
        }
        Ok(self.sources(to)?.contains(&from))
    }
}

/// Assignment check over type names
pub fn can_assign(to: TypeName, from: TypeName) -> Result<bool> {
    RuleTable::assignment().can_cast_from(to, from)
}

/// CAST check over type names
pub fn can_coerce(to: TypeName, from: TypeName) -> Result<bool> {
    RuleTable::coercion().can_cast_from(to, from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_every_non_null_name_has_rules() {
        for name in TypeName::ALL {
            let lookup = RuleTable::assignment().sources(name);
            assert_eq!(lookup.is_ok(), name != TypeName::Null, "{name}");
        }
    }

    #[test]
    fn test_null_lookup_is_incomplete() {
        let err = RuleTable::coercion().sources(TypeName::Null).unwrap_err();
        assert!(err.is_internal());
    }

    #[rstest]
    #[case(TypeName::Bigint, TypeName::Integer, true)]
    #[case(TypeName::Integer, TypeName::Bigint, false)]
    #[case(TypeName::Decimal, TypeName::Double, true)]
    #[case(TypeName::Float, TypeName::Double, false)]
    #[case(TypeName::Varchar, TypeName::Char, true)]
    #[case(TypeName::Char, TypeName::Varchar, false)]
    #[case(TypeName::Date, TypeName::Timestamp, true)]
    #[case(TypeName::Timestamp, TypeName::Date, false)]
    #[case(TypeName::Integer, TypeName::Varchar, false)]
    #[case(TypeName::Any, TypeName::Cursor, true)]
    fn test_assignment(#[case] to: TypeName, #[case] from: TypeName, #[case] expected: bool) {
        assert_eq!(can_assign(to, from).unwrap(), expected);
    }

    #[rstest]
    #[case(TypeName::Integer, TypeName::Varchar, true)]
    #[case(TypeName::Varchar, TypeName::Boolean, true)]
    #[case(TypeName::Boolean, TypeName::Char, true)]
    #[case(TypeName::Timestamp, TypeName::Date, true)]
    #[case(TypeName::IntervalDayTime, TypeName::Bigint, true)]
    #[case(TypeName::Decimal, TypeName::IntervalYearMonth, true)]
    #[case(TypeName::Double, TypeName::IntervalDayTime, false)]
    #[case(TypeName::Binary, TypeName::Varbinary, true)]
    #[case(TypeName::Varbinary, TypeName::Char, false)]
    #[case(TypeName::Boolean, TypeName::Integer, false)]
    fn test_coercion(#[case] to: TypeName, #[case] from: TypeName, #[case] expected: bool) {
        assert_eq!(can_coerce(to, from).unwrap(), expected);
    }

    #[test]
    fn test_coercion_extends_assignment() {
        for to in TypeName::ALL {
            for from in TypeName::ALL {
                if can_assign(to, from).unwrap() {
                    assert!(can_coerce(to, from).unwrap(), "{to} <- {from}");
                }
            }
        }
    }

    #[test]
    fn test_null_special_cases() {
        for name in TypeName::ALL {
            if name != TypeName::Null {
                assert!(can_assign(name, TypeName::Null).unwrap());
            }
            assert!(!can_assign(TypeName::Null, name).unwrap());
            assert!(!can_coerce(TypeName::Null, name).unwrap());
        }
    }
}
