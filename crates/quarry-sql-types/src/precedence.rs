//! Implicit-widening precedence lists

use crate::type_name::TypeName;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Ordered ranking of type names within one family
///
/// Entries are stored lowest precedence first. A `None` sentinel between two
/// names joins them into one equal-precedence class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceList {
    entries: Vec<Option<TypeName>>,
}

const NUMERIC_ORDER: &[Option<TypeName>] = &[
    Some(TypeName::Tinyint),
    Some(TypeName::Smallint),
    Some(TypeName::Integer),
    Some(TypeName::Bigint),
    Some(TypeName::Decimal),
    Some(TypeName::Real),
    None,
    Some(TypeName::Float),
    Some(TypeName::Double),
];

// Indexed by ordinal.
static LISTS: LazyLock<Vec<PrecedenceList>> =
    LazyLock::new(|| TypeName::ALL.iter().map(|name| PrecedenceList::build(*name)).collect());

impl PrecedenceList {
    pub fn new(entries: Vec<Option<TypeName>>) -> Self {
        Self { entries }
    }

    /// The static list for `name`
    pub fn of(name: TypeName) -> &'static PrecedenceList {
        &LISTS[name.ordinal()]
    }

    fn build(name: TypeName) -> Self {
        let entries = match name {
            TypeName::Tinyint
            | TypeName::Smallint
            | TypeName::Integer
            | TypeName::Bigint
            | TypeName::Decimal
            | TypeName::Real
            | TypeName::Float
            | TypeName::Double => {
                let start = NUMERIC_ORDER
                    .iter()
                    .position(|e| *e == Some(name))
                    .unwrap_or(0);
                NUMERIC_ORDER[start..].to_vec()
            }
            TypeName::Char => vec![Some(TypeName::Char), Some(TypeName::Varchar)],
            TypeName::Binary => vec![Some(TypeName::Binary), Some(TypeName::Varbinary)],
            TypeName::Boolean
            | TypeName::Date
            | TypeName::Time
            | TypeName::Timestamp
            | TypeName::IntervalYearMonth
            | TypeName::IntervalDayTime
            | TypeName::Varchar
            | TypeName::Varbinary
            | TypeName::Null
            | TypeName::Any
            | TypeName::Symbol
            | TypeName::Multiset
            | TypeName::Distinct
            | TypeName::Structured
            | TypeName::Row
            | TypeName::Cursor
            | TypeName::ColumnList => vec![Some(name)],
        };
        Self::new(entries)
    }

    /// Names in the list, lowest precedence first
    pub fn names(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.entries.iter().flatten().copied()
    }

    pub fn contains_type(&self, name: TypeName) -> bool {
        self.entries.contains(&Some(name))
    }

    /// Equivalence-class index of `name`
    fn class_of(&self, name: TypeName) -> Option<usize> {
        let mut class = 0;
        let mut seen = false;
        let mut joined = false;
        for entry in &self.entries {
            match entry {
                None => joined = true,
                Some(n) => {
                    if seen && !joined {
                        class += 1;
                    }
                    seen = true;
                    joined = false;
                    if *n == name {
                        return Some(class);
                    }
                }
            }
        }
        None
    }

    /// Compare the precedence of two names in this list
    ///
    /// Returns `None` if either name is absent, otherwise the ordering of
    /// their equivalence classes.
    pub fn compare_precedence(&self, a: TypeName, b: TypeName) -> Option<Ordering> {
        let ca = self.class_of(a)?;
        let cb = self.class_of(b)?;
        Some(ca.cmp(&cb))
    }
}
