//! SQL type name catalog
//!
//! The closed set of base type names. Each name knows which precision/scale
//! signatures it accepts, its default and maximum precision, and its JDBC
//! wire code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JDBC `java.sql.Types` codes used on the wire
pub mod jdbc {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const REF: i32 = 2006;
    pub const BOOLEAN: i32 = 16;
    /// Synthetic code for cursors, outside the standard range
    pub const CURSOR: i32 = OTHER + 1;
    /// Synthetic code for column lists, outside the standard range
    pub const COLUMN_LIST: i32 = OTHER + 2;
}

/// Set of precision/scale signatures a type name accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signatures(u8);

impl Signatures {
    /// `NAME`
    pub const PREC_NO_SCALE_NO: Self = Self(1);
    /// `NAME(p)`
    pub const PREC_YES_SCALE_NO: Self = Self(2);
    /// `NAME(p, s)`
    pub const PREC_YES_SCALE_YES: Self = Self(4);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Signature flag for a given precision/scale shape
    pub const fn of(precision: bool, scale: bool) -> Self {
        match (precision, scale) {
            (false, false) => Self::PREC_NO_SCALE_NO,
            (true, false) => Self::PREC_YES_SCALE_NO,
            // A scale without a precision is never legal; callers reject it
            // before asking.
            (_, true) => Self::PREC_YES_SCALE_YES,
        }
    }
}

const NO_PREC: Signatures = Signatures::PREC_NO_SCALE_NO;
const PREC: Signatures = Signatures::PREC_NO_SCALE_NO.union(Signatures::PREC_YES_SCALE_NO);
const PREC_SCALE: Signatures = PREC.union(Signatures::PREC_YES_SCALE_YES);

/// Maximum fractional-second precision of TIME and TIMESTAMP
pub const MAX_DATETIME_PRECISION: u32 = 3;
/// Maximum precision of DECIMAL
pub const MAX_NUMERIC_PRECISION: u32 = 19;
/// Maximum scale of DECIMAL
pub const MAX_NUMERIC_SCALE: u32 = 19;
/// Maximum length of the string types
pub const MAX_CHAR_LENGTH: u32 = 65536;

/// Base SQL type name
///
/// Declaration order is the ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeName {
    Boolean,
    Tinyint,
    Smallint,
    Integer,
    Bigint,
    Decimal,
    Float,
    Real,
    Double,
    Date,
    Time,
    Timestamp,
    IntervalYearMonth,
    IntervalDayTime,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Null,
    Any,
    Symbol,
    Multiset,
    Distinct,
    Structured,
    Row,
    Cursor,
    ColumnList,
}

impl TypeName {
    /// Every type name in ordinal order
    pub const ALL: [TypeName; 27] = [
        Self::Boolean,
        Self::Tinyint,
        Self::Smallint,
        Self::Integer,
        Self::Bigint,
        Self::Decimal,
        Self::Float,
        Self::Real,
        Self::Double,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::IntervalYearMonth,
        Self::IntervalDayTime,
        Self::Char,
        Self::Varchar,
        Self::Binary,
        Self::Varbinary,
        Self::Null,
        Self::Any,
        Self::Symbol,
        Self::Multiset,
        Self::Distinct,
        Self::Structured,
        Self::Row,
        Self::Cursor,
        Self::ColumnList,
    ];

    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Upper-case SQL name, e.g. `INTERVAL_DAY_TIME`
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Tinyint => "TINYINT",
            Self::Smallint => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::Bigint => "BIGINT",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::IntervalYearMonth => "INTERVAL_YEAR_MONTH",
            Self::IntervalDayTime => "INTERVAL_DAY_TIME",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Binary => "BINARY",
            Self::Varbinary => "VARBINARY",
            Self::Null => "NULL",
            Self::Any => "ANY",
            Self::Symbol => "SYMBOL",
            Self::Multiset => "MULTISET",
            Self::Distinct => "DISTINCT",
            Self::Structured => "STRUCTURED",
            Self::Row => "ROW",
            Self::Cursor => "CURSOR",
            Self::ColumnList => "COLUMN_LIST",
        }
    }

    /// Look up a name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.sql_name().eq_ignore_ascii_case(name))
    }

    /// Precision/scale signatures this name accepts
    pub const fn signatures(self) -> Signatures {
        match self {
            Self::Decimal => PREC_SCALE,
            Self::Time
            | Self::Timestamp
            | Self::Char
            | Self::Varchar
            | Self::Binary
            | Self::Varbinary => PREC,
            Self::Boolean
            | Self::Tinyint
            | Self::Smallint
            | Self::Integer
            | Self::Bigint
            | Self::Float
            | Self::Real
            | Self::Double
            | Self::Date
            | Self::IntervalYearMonth
            | Self::IntervalDayTime
            | Self::Null
            | Self::Any
            | Self::Symbol
            | Self::Multiset
            | Self::Distinct
            | Self::Structured
            | Self::Row
            | Self::Cursor
            | Self::ColumnList => NO_PREC,
        }
    }

    /// Whether `NAME(p)` or `NAME(p, s)` shapes are accepted
    pub const fn allows_precision_scale(self, precision: bool, scale: bool) -> bool {
        if scale && !precision {
            return false;
        }
        self.signatures().contains(Signatures::of(precision, scale))
    }

    pub const fn allows_no_precision_no_scale(self) -> bool {
        self.allows_precision_scale(false, false)
    }

    pub const fn allows_precision_no_scale(self) -> bool {
        self.allows_precision_scale(true, false)
    }

    /// Precision used when none is declared
    ///
    /// The integer types report their declared width so that widening can
    /// rank them, even though they never accept an explicit precision.
    pub const fn default_precision(self) -> Option<u32> {
        match self {
            Self::Char | Self::Varchar | Self::Binary | Self::Varbinary => Some(1),
            Self::Time | Self::Timestamp => Some(0),
            Self::Decimal => Some(MAX_NUMERIC_PRECISION),
            Self::Tinyint => Some(3),
            Self::Smallint => Some(5),
            Self::Integer => Some(10),
            Self::Bigint => Some(19),
            _ => None,
        }
    }

    pub const fn default_scale(self) -> Option<u32> {
        match self {
            Self::Decimal => Some(0),
            _ => None,
        }
    }

    /// Largest precision accepted with the built-in limits
    pub const fn max_precision(self) -> Option<u32> {
        match self {
            Self::Decimal => Some(MAX_NUMERIC_PRECISION),
            Self::Time | Self::Timestamp => Some(MAX_DATETIME_PRECISION),
            Self::Char | Self::Varchar | Self::Binary | Self::Varbinary => Some(MAX_CHAR_LENGTH),
            _ => None,
        }
    }

    /// JDBC wire code
    pub const fn jdbc_code(self) -> i32 {
        match self {
            Self::Boolean => jdbc::BOOLEAN,
            Self::Tinyint => jdbc::TINYINT,
            Self::Smallint => jdbc::SMALLINT,
            Self::Integer => jdbc::INTEGER,
            Self::Bigint => jdbc::BIGINT,
            Self::Decimal => jdbc::DECIMAL,
            Self::Float => jdbc::FLOAT,
            Self::Real => jdbc::REAL,
            Self::Double => jdbc::DOUBLE,
            Self::Date => jdbc::DATE,
            Self::Time => jdbc::TIME,
            Self::Timestamp => jdbc::TIMESTAMP,
            Self::Char => jdbc::CHAR,
            Self::Varchar => jdbc::VARCHAR,
            Self::Binary => jdbc::BINARY,
            Self::Varbinary => jdbc::VARBINARY,
            Self::Null => jdbc::NULL,
            Self::Multiset => jdbc::ARRAY,
            Self::Distinct => jdbc::DISTINCT,
            Self::Row | Self::Structured => jdbc::STRUCT,
            Self::Cursor => jdbc::CURSOR,
            Self::ColumnList => jdbc::COLUMN_LIST,
            Self::IntervalYearMonth | Self::IntervalDayTime | Self::Any | Self::Symbol => {
                jdbc::OTHER
            }
        }
    }

    /// Type name for a JDBC wire code
    ///
    /// BIT maps to BOOLEAN and NUMERIC to DECIMAL. STRUCT resolves to
    /// STRUCTURED, so ROW does not round-trip. Codes outside `BIT..=REF`
    /// and the synthetic cursor codes have no name.
    pub const fn from_jdbc_code(code: i32) -> Option<Self> {
        if code < jdbc::BIT || code > jdbc::REF {
            return None;
        }
        match code {
            jdbc::TINYINT => Some(Self::Tinyint),
            jdbc::SMALLINT => Some(Self::Smallint),
            jdbc::BIGINT => Some(Self::Bigint),
            jdbc::INTEGER => Some(Self::Integer),
            jdbc::NUMERIC | jdbc::DECIMAL => Some(Self::Decimal),
            jdbc::FLOAT => Some(Self::Float),
            jdbc::REAL => Some(Self::Real),
            jdbc::DOUBLE => Some(Self::Double),
            jdbc::CHAR => Some(Self::Char),
            jdbc::VARCHAR => Some(Self::Varchar),
            jdbc::BINARY => Some(Self::Binary),
            jdbc::VARBINARY => Some(Self::Varbinary),
            jdbc::DATE => Some(Self::Date),
            jdbc::TIME => Some(Self::Time),
            jdbc::TIMESTAMP => Some(Self::Timestamp),
            jdbc::BIT | jdbc::BOOLEAN => Some(Self::Boolean),
            jdbc::DISTINCT => Some(Self::Distinct),
            jdbc::STRUCT => Some(Self::Structured),
            _ => None,
        }
    }

    /// ANY, NULL and SYMBOL are special: they never describe stored values
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Any | Self::Null | Self::Symbol)
    }

    pub const fn is_bounded_variable_width(self) -> bool {
        matches!(self, Self::Varchar | Self::Varbinary | Self::Multiset)
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Tinyint | Self::Smallint | Self::Integer | Self::Bigint
        )
    }

    pub const fn is_exact_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::Decimal)
    }

    pub const fn is_approximate_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Real | Self::Double)
    }

    pub const fn is_numeric(self) -> bool {
        self.is_exact_numeric() || self.is_approximate_numeric()
    }

    pub const fn is_char(self) -> bool {
        matches!(self, Self::Char | Self::Varchar)
    }

    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Binary | Self::Varbinary)
    }

    pub const fn is_string(self) -> bool {
        self.is_char() || self.is_binary()
    }

    pub const fn is_datetime(self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Timestamp)
    }

    pub const fn is_interval(self) -> bool {
        matches!(self, Self::IntervalYearMonth | Self::IntervalDayTime)
    }

    /// Names whose types carry a field list
    pub const fn is_struct_kind(self) -> bool {
        matches!(
            self,
            Self::Row | Self::Structured | Self::Distinct | Self::Cursor | Self::ColumnList
        )
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

// Category sets used to author checkers. The nullable variants also admit
// the NULL type, so an untyped NULL literal passes.

pub const BOOLEAN_TYPES: &[TypeName] = &[TypeName::Boolean];
pub const BOOLEAN_NULLABLE_TYPES: &[TypeName] = &[TypeName::Boolean, TypeName::Null];

pub const INT_TYPES: &[TypeName] = &[
    TypeName::Tinyint,
    TypeName::Smallint,
    TypeName::Integer,
    TypeName::Bigint,
];
pub const INT_NULLABLE_TYPES: &[TypeName] = &[
    TypeName::Tinyint,
    TypeName::Smallint,
    TypeName::Integer,
    TypeName::Bigint,
    TypeName::Null,
];

pub const EXACT_TYPES: &[TypeName] = &[
    TypeName::Tinyint,
    TypeName::Smallint,
    TypeName::Integer,
    TypeName::Bigint,
    TypeName::Decimal,
];

pub const APPROX_TYPES: &[TypeName] = &[TypeName::Float, TypeName::Real, TypeName::Double];

pub const NUMERIC_TYPES: &[TypeName] = &[
    TypeName::Tinyint,
    TypeName::Smallint,
    TypeName::Integer,
    TypeName::Bigint,
    TypeName::Decimal,
    TypeName::Float,
    TypeName::Real,
    TypeName::Double,
];
pub const NUMERIC_NULLABLE_TYPES: &[TypeName] = &[
    TypeName::Tinyint,
    TypeName::Smallint,
    TypeName::Integer,
    TypeName::Bigint,
    TypeName::Decimal,
    TypeName::Float,
    TypeName::Real,
    TypeName::Double,
    TypeName::Null,
];

pub const FRACTIONAL_TYPES: &[TypeName] = &[
    TypeName::Decimal,
    TypeName::Float,
    TypeName::Real,
    TypeName::Double,
];

pub const CHAR_TYPES: &[TypeName] = &[TypeName::Char, TypeName::Varchar];
pub const CHAR_NULLABLE_TYPES: &[TypeName] = &[TypeName::Char, TypeName::Varchar, TypeName::Null];

pub const BINARY_TYPES: &[TypeName] = &[TypeName::Binary, TypeName::Varbinary];
pub const BINARY_NULLABLE_TYPES: &[TypeName] =
    &[TypeName::Binary, TypeName::Varbinary, TypeName::Null];

pub const STRING_TYPES: &[TypeName] = &[
    TypeName::Char,
    TypeName::Varchar,
    TypeName::Binary,
    TypeName::Varbinary,
];
pub const STRING_NULLABLE_TYPES: &[TypeName] = &[
    TypeName::Char,
    TypeName::Varchar,
    TypeName::Binary,
    TypeName::Varbinary,
    TypeName::Null,
];

pub const DATETIME_TYPES: &[TypeName] = &[TypeName::Date, TypeName::Time, TypeName::Timestamp];
pub const DATETIME_NULLABLE_TYPES: &[TypeName] = &[
    TypeName::Date,
    TypeName::Time,
    TypeName::Timestamp,
    TypeName::Null,
];

pub const INTERVAL_TYPES: &[TypeName] = &[TypeName::IntervalYearMonth, TypeName::IntervalDayTime];
pub const INTERVAL_NULLABLE_TYPES: &[TypeName] = &[
    TypeName::IntervalYearMonth,
    TypeName::IntervalDayTime,
    TypeName::Null,
];

pub const MULTISET_TYPES: &[TypeName] = &[TypeName::Multiset];
pub const MULTISET_NULLABLE_TYPES: &[TypeName] = &[TypeName::Multiset, TypeName::Null];

pub const CURSOR_TYPES: &[TypeName] = &[TypeName::Cursor];
pub const COLUMN_LIST_TYPES: &[TypeName] = &[TypeName::ColumnList];
