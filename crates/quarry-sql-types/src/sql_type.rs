//! Concrete SQL type values
//!
//! A [`SqlType`] is an immutable, shareable handle. Instances are built by
//! the [`TypeFactory`](crate::TypeFactory), which interns them so that equal
//! types usually share one allocation. Equality is always structural; the
//! pointer check is only a shortcut.

use crate::family::TypeFamily;
use crate::type_name::TypeName;
use quarry_sql_diagnostics::{Result, TypeError};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// How strongly a collation was attached to a character value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coercibility {
    /// Declared with an explicit COLLATE clause
    Explicit,
    /// Derived from a column
    Implicit,
    /// Derived from a literal or the session default
    Coercible,
    /// Conflicting collations were combined
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Charset {
    pub name: String,
}

impl Charset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collation {
    pub name: String,
    pub coercibility: Coercibility,
}

impl Collation {
    pub fn new(name: impl Into<String>, coercibility: Coercibility) -> Self {
        Self {
            name: name.into(),
            coercibility,
        }
    }

    /// Charset part of a `charset$locale$strength` collation name
    pub fn charset_name(&self) -> &str {
        self.name.split('$').next().unwrap_or(&self.name)
    }
}

/// Interval field, in significance order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub const fn is_year_month(self) -> bool {
        matches!(self, Self::Year | Self::Month)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }
}

/// Interval qualifier such as `DAY(2) TO SECOND(3)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalQualifier {
    start_unit: TimeUnit,
    start_precision: Option<u32>,
    end_unit: Option<TimeUnit>,
    fractional_second_precision: Option<u32>,
}

impl IntervalQualifier {
    /// Create a qualifier spanning `start` to `end`
    ///
    /// `end` must be less significant than `start` and on the same side of
    /// the year-month / day-time divide.
    pub fn new(start: TimeUnit, end: Option<TimeUnit>) -> Result<Self> {
        if let Some(end) = end {
            if end <= start || end.is_year_month() != start.is_year_month() {
                return Err(TypeError::precondition(format!(
                    "invalid interval qualifier {} TO {}",
                    start.name(),
                    end.name()
                )));
            }
        }
        Ok(Self {
            start_unit: start,
            start_precision: None,
            end_unit: end,
            fractional_second_precision: None,
        })
    }

    /// Single-field qualifier, e.g. `DAY`
    pub fn single(unit: TimeUnit) -> Self {
        Self {
            start_unit: unit,
            start_precision: None,
            end_unit: None,
            fractional_second_precision: None,
        }
    }

    pub fn with_start_precision(mut self, precision: u32) -> Self {
        self.start_precision = Some(precision);
        self
    }

    pub fn with_fractional_second_precision(mut self, precision: u32) -> Self {
        self.fractional_second_precision = Some(precision);
        self
    }

    pub fn start_unit(&self) -> TimeUnit {
        self.start_unit
    }

    pub fn end_unit(&self) -> Option<TimeUnit> {
        self.end_unit
    }

    pub fn start_precision(&self) -> Option<u32> {
        self.start_precision
    }

    pub fn fractional_second_precision(&self) -> Option<u32> {
        self.fractional_second_precision
    }

    pub fn is_year_month(&self) -> bool {
        self.start_unit.is_year_month()
    }

    /// INTERVAL_YEAR_MONTH or INTERVAL_DAY_TIME
    pub fn type_name(&self) -> TypeName {
        if self.is_year_month() {
            TypeName::IntervalYearMonth
        } else {
            TypeName::IntervalDayTime
        }
    }

    /// Least-restrictive qualifier covering both `self` and `other`
    ///
    /// Takes the more significant start unit, the less significant end unit
    /// and the larger of each precision. Both qualifiers must be on the same
    /// side of the year-month / day-time divide.
    pub fn combine(&self, other: &Self) -> Self {
        let mut start = self.start_unit;
        let mut end = self.end_unit;
        let start_precision = max_opt(self.start_precision, other.start_precision);
        let fractional_second_precision = max_opt(
            self.fractional_second_precision,
            other.fractional_second_precision,
        );

        if start > other.start_unit {
            end = end.or(Some(start));
            start = other.start_unit;
        } else if start < other.start_unit && end.is_none_or(|e| e < other.start_unit) {
            end = Some(other.start_unit);
        }
        if let Some(other_end) = other.end_unit {
            if end.is_none_or(|e| e < other_end) {
                end = Some(other_end);
            }
        }

        Self {
            start_unit: start,
            start_precision,
            end_unit: end.filter(|e| *e != start),
            fractional_second_precision,
        }
    }
}

fn max_opt(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.start_unit.name())?;
        if let Some(p) = self.start_precision {
            write!(f, "({p})")?;
        }
        if let Some(end) = self.end_unit {
            write!(f, " TO {}", end.name())?;
        }
        if let Some(p) = self.fractional_second_precision {
            write!(f, "({p})")?;
        }
        Ok(())
    }
}

/// How far values of a type can be compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Comparability {
    /// Not comparable at all
    None,
    /// Equality only
    Unordered,
    /// Equality and ordering
    All,
}

/// Named, positioned field of a structured type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeField {
    pub name: String,
    pub index: usize,
    pub ty: SqlType,
}

impl TypeField {
    pub fn new(name: impl Into<String>, index: usize, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            index,
            ty,
        }
    }
}

/// Attribute tuple of a type; the interning key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    pub(crate) name: TypeName,
    pub(crate) nullable: bool,
    pub(crate) precision: Option<u32>,
    pub(crate) scale: Option<u32>,
    pub(crate) charset: Option<Charset>,
    pub(crate) collation: Option<Collation>,
    pub(crate) component: Option<SqlType>,
    pub(crate) interval: Option<IntervalQualifier>,
    pub(crate) fields: Option<Vec<TypeField>>,
    pub(crate) identifier: Option<String>,
    pub(crate) comparability: Comparability,
}

impl TypeDescriptor {
    pub(crate) fn new(name: TypeName) -> Self {
        let comparability = match name {
            TypeName::Multiset => Comparability::Unordered,
            TypeName::Cursor | TypeName::ColumnList => Comparability::None,
            _ => Comparability::All,
        };
        Self {
            name,
            nullable: false,
            precision: None,
            scale: None,
            charset: None,
            collation: None,
            component: None,
            interval: None,
            fields: None,
            identifier: None,
            comparability,
        }
    }
}

/// Immutable, possibly parameterized SQL type
#[derive(Clone)]
pub struct SqlType(pub(crate) Arc<TypeDescriptor>);

impl SqlType {
    pub(crate) fn descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    pub fn name(&self) -> TypeName {
        self.0.name
    }

    pub fn is_nullable(&self) -> bool {
        self.0.nullable
    }

    /// Declared precision, else the name's default
    pub fn precision(&self) -> Option<u32> {
        self.0.precision.or(self.0.name.default_precision())
    }

    /// Precision exactly as declared
    pub fn declared_precision(&self) -> Option<u32> {
        self.0.precision
    }

    /// Declared scale, else the name's default
    pub fn scale(&self) -> Option<u32> {
        self.0.scale.or(self.0.name.default_scale())
    }

    pub fn declared_scale(&self) -> Option<u32> {
        self.0.scale
    }

    pub fn charset(&self) -> Option<&Charset> {
        self.0.charset.as_ref()
    }

    pub fn collation(&self) -> Option<&Collation> {
        self.0.collation.as_ref()
    }

    /// Element type of a multiset
    pub fn component_type(&self) -> Option<&SqlType> {
        self.0.component.as_ref()
    }

    pub fn interval_qualifier(&self) -> Option<&IntervalQualifier> {
        self.0.interval.as_ref()
    }

    pub fn fields(&self) -> Option<&[TypeField]> {
        self.0.fields.as_deref()
    }

    pub fn field_count(&self) -> usize {
        self.fields().map_or(0, <[TypeField]>::len)
    }

    pub fn field(&self, index: usize) -> Option<&TypeField> {
        self.fields().and_then(|f| f.get(index))
    }

    pub fn field_by_name(&self, name: &str) -> Option<&TypeField> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Whether this type carries a field list
    pub fn is_struct(&self) -> bool {
        self.0.fields.is_some()
    }

    /// Identifier of a STRUCTURED or DISTINCT user type
    pub fn identifier(&self) -> Option<&str> {
        self.0.identifier.as_deref()
    }

    pub fn comparability(&self) -> Comparability {
        self.0.comparability
    }

    pub fn family(&self) -> Option<TypeFamily> {
        self.0.name.family()
    }

    /// Whether both handles share one allocation
    pub fn ptr_eq(&self, other: &SqlType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Structural equality that ignores top-level nullability
    pub fn equals_sans_nullability(&self, other: &SqlType) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        a.name == b.name
            && a.precision == b.precision
            && a.scale == b.scale
            && a.charset == b.charset
            && a.collation == b.collation
            && a.component == b.component
            && a.interval == b.interval
            && a.fields == b.fields
            && a.identifier == b.identifier
            && a.comparability == b.comparability
    }

    /// Digest including charset, collation and nullability
    pub fn full_digest(&self) -> String {
        let mut digest = self.to_string();
        if let Some(cs) = self.charset() {
            digest.push_str(&format!(" CHARACTER SET \"{}\"", cs.name));
        }
        if let Some(coll) = self.collation() {
            digest.push_str(&format!(" COLLATE \"{}\"", coll.name));
        }
        if !self.is_nullable() {
            digest.push_str(" NOT NULL");
        }
        digest
    }
}

impl PartialEq for SqlType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for SqlType {}

impl Hash for SqlType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Serialize for SqlType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl fmt::Debug for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_digest())
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &*self.0;
        match d.name {
            TypeName::Decimal => {
                f.write_str("DECIMAL")?;
                match (d.precision, d.scale) {
                    (Some(p), Some(s)) => write!(f, "({p}, {s})"),
                    (Some(p), None) => write!(f, "({p})"),
                    _ => Ok(()),
                }
            }
            TypeName::Char
            | TypeName::Varchar
            | TypeName::Binary
            | TypeName::Varbinary
            | TypeName::Time
            | TypeName::Timestamp => {
                f.write_str(d.name.sql_name())?;
                match d.precision {
                    Some(p) => write!(f, "({p})"),
                    None => Ok(()),
                }
            }
            TypeName::IntervalYearMonth | TypeName::IntervalDayTime => match &d.interval {
                Some(q) => write!(f, "INTERVAL {q}"),
                None => f.write_str(d.name.sql_name()),
            },
            TypeName::Multiset => match &d.component {
                Some(c) => write!(f, "{c} MULTISET"),
                None => f.write_str("MULTISET"),
            },
            TypeName::Row => {
                f.write_str("RecordType(")?;
                for (i, field) in d.fields.iter().flatten().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", field.ty, field.name)?;
                }
                f.write_str(")")
            }
            TypeName::Structured | TypeName::Distinct => match &d.identifier {
                Some(id) => f.write_str(id),
                None => f.write_str(d.name.sql_name()),
            },
            TypeName::Boolean
            | TypeName::Tinyint
            | TypeName::Smallint
            | TypeName::Integer
            | TypeName::Bigint
            | TypeName::Float
            | TypeName::Real
            | TypeName::Double
            | TypeName::Date
            | TypeName::Null
            | TypeName::Any
            | TypeName::Symbol
            | TypeName::Cursor
            | TypeName::ColumnList => f.write_str(d.name.sql_name()),
        }
    }
}
