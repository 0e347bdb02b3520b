//! Type families
//!
//! Families group type names. The nine primary families partition the
//! scalar names and decide `=`-comparability; the secondary families overlap
//! and exist for writing checker and inference rules.

use crate::type_name::{
    APPROX_TYPES, BINARY_TYPES, BOOLEAN_TYPES, CHAR_TYPES, COLUMN_LIST_TYPES, CURSOR_TYPES,
    DATETIME_TYPES, EXACT_TYPES, INT_TYPES, INTERVAL_TYPES, MULTISET_TYPES, NUMERIC_TYPES,
    STRING_TYPES, TypeName,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeFamily {
    // Primary
    Character,
    Binary,
    Numeric,
    Date,
    Time,
    Timestamp,
    Boolean,
    IntervalYearMonth,
    IntervalDayTime,
    // Secondary
    String,
    ApproximateNumeric,
    ExactNumeric,
    Integer,
    Datetime,
    DatetimeInterval,
    Multiset,
    Any,
    Cursor,
    ColumnList,
}

impl TypeFamily {
    pub const PRIMARY: [TypeFamily; 9] = [
        Self::Character,
        Self::Binary,
        Self::Numeric,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Boolean,
        Self::IntervalYearMonth,
        Self::IntervalDayTime,
    ];

    pub const fn is_primary(self) -> bool {
        match self {
            Self::Character
            | Self::Binary
            | Self::Numeric
            | Self::Date
            | Self::Time
            | Self::Timestamp
            | Self::Boolean
            | Self::IntervalYearMonth
            | Self::IntervalDayTime => true,
            Self::String
            | Self::ApproximateNumeric
            | Self::ExactNumeric
            | Self::Integer
            | Self::Datetime
            | Self::DatetimeInterval
            | Self::Multiset
            | Self::Any
            | Self::Cursor
            | Self::ColumnList => false,
        }
    }

    /// Member type names
    pub const fn type_names(self) -> &'static [TypeName] {
        match self {
            Self::Character => CHAR_TYPES,
            Self::Binary => BINARY_TYPES,
            Self::Numeric => NUMERIC_TYPES,
            Self::Date => &[TypeName::Date],
            Self::Time => &[TypeName::Time],
            Self::Timestamp => &[TypeName::Timestamp],
            Self::Boolean => BOOLEAN_TYPES,
            Self::IntervalYearMonth => &[TypeName::IntervalYearMonth],
            Self::IntervalDayTime => &[TypeName::IntervalDayTime],
            Self::String => STRING_TYPES,
            Self::ApproximateNumeric => APPROX_TYPES,
            Self::ExactNumeric => EXACT_TYPES,
            Self::Integer => INT_TYPES,
            Self::Datetime => DATETIME_TYPES,
            Self::DatetimeInterval => INTERVAL_TYPES,
            Self::Multiset => MULTISET_TYPES,
            Self::Any => &TypeName::ALL,
            Self::Cursor => CURSOR_TYPES,
            Self::ColumnList => COLUMN_LIST_TYPES,
        }
    }

    pub fn contains(self, name: TypeName) -> bool {
        self.type_names().contains(&name)
    }

    /// Upper-case name used in signature descriptions, e.g. `<NUMERIC>`
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Character => "CHARACTER",
            Self::Binary => "BINARY",
            Self::Numeric => "NUMERIC",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Boolean => "BOOLEAN",
            Self::IntervalYearMonth => "INTERVAL_YEAR_MONTH",
            Self::IntervalDayTime => "INTERVAL_DAY_TIME",
            Self::String => "STRING",
            Self::ApproximateNumeric => "APPROXIMATE_NUMERIC",
            Self::ExactNumeric => "EXACT_NUMERIC",
            Self::Integer => "INTEGER",
            Self::Datetime => "DATETIME",
            Self::DatetimeInterval => "DATETIME_INTERVAL",
            Self::Multiset => "MULTISET",
            Self::Any => "ANY",
            Self::Cursor => "CURSOR",
            Self::ColumnList => "COLUMN_LIST",
        }
    }

    /// Natural family of a type name
    ///
    /// Scalars map to their primary family. MULTISET, CURSOR and COLUMN_LIST
    /// map to their own secondary family. NULL, ANY, SYMBOL and the
    /// structured names have none.
    pub const fn of(name: TypeName) -> Option<Self> {
        match name {
            TypeName::Char | TypeName::Varchar => Some(Self::Character),
            TypeName::Binary | TypeName::Varbinary => Some(Self::Binary),
            TypeName::Tinyint
            | TypeName::Smallint
            | TypeName::Integer
            | TypeName::Bigint
            | TypeName::Decimal
            | TypeName::Float
            | TypeName::Real
            | TypeName::Double => Some(Self::Numeric),
            TypeName::Date => Some(Self::Date),
            TypeName::Time => Some(Self::Time),
            TypeName::Timestamp => Some(Self::Timestamp),
            TypeName::Boolean => Some(Self::Boolean),
            TypeName::IntervalYearMonth => Some(Self::IntervalYearMonth),
            TypeName::IntervalDayTime => Some(Self::IntervalDayTime),
            TypeName::Multiset => Some(Self::Multiset),
            TypeName::Cursor => Some(Self::Cursor),
            TypeName::ColumnList => Some(Self::ColumnList),
            TypeName::Null
            | TypeName::Any
            | TypeName::Symbol
            | TypeName::Distinct
            | TypeName::Structured
            | TypeName::Row => None,
        }
    }
}

impl TypeName {
    /// Natural family, see [`TypeFamily::of`]
    pub const fn family(self) -> Option<TypeFamily> {
        TypeFamily::of(self)
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primary_families_partition_scalars() {
        for name in TypeName::ALL {
            let owners: Vec<_> = TypeFamily::PRIMARY
                .iter()
                .filter(|f| f.contains(name))
                .collect();
            let scalar = matches!(name.family(), Some(f) if f.is_primary());
            assert_eq!(owners.len(), usize::from(scalar), "{name}");
        }
    }

    #[test]
    fn test_natural_family_contains_name() {
        for name in TypeName::ALL {
            if let Some(family) = name.family() {
                assert!(family.contains(name), "{family} should contain {name}");
            }
        }
    }

    #[test]
    fn test_secondary_families_overlap() {
        assert!(TypeFamily::Integer.contains(TypeName::Bigint));
        assert!(TypeFamily::ExactNumeric.contains(TypeName::Bigint));
        assert!(TypeFamily::Numeric.contains(TypeName::Bigint));
        assert!(TypeFamily::String.contains(TypeName::Varbinary));
        assert!(!TypeFamily::String.is_primary());
    }

    #[test]
    fn test_any_family_contains_everything() {
        for name in TypeName::ALL {
            assert!(TypeFamily::Any.contains(name));
        }
    }

    #[test]
    fn test_structured_names_have_no_family() {
        assert_eq!(TypeName::Row.family(), None);
        assert_eq!(TypeName::Null.family(), None);
        assert_eq!(TypeName::Multiset.family(), Some(TypeFamily::Multiset));
    }
}
