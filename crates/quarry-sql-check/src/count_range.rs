//! Operand count ranges

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Operand counts a checker accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandCountRange {
    /// Exactly this many operands
    Fixed(usize),
    /// Any of these counts, ascending
    OneOf(SmallVec<[usize; 4]>),
    /// Any number of operands
    Variadic,
}

impl OperandCountRange {
    /// Range accepting exactly the given counts
    pub fn of(counts: impl IntoIterator<Item = usize>) -> Self {
        let mut counts: SmallVec<[usize; 4]> = counts.into_iter().collect();
        counts.sort_unstable();
        counts.dedup();
        if counts.len() == 1 {
            return Self::Fixed(counts[0]);
        }
        Self::OneOf(counts)
    }

    pub fn is_valid_count(&self, count: usize) -> bool {
        match self {
            Self::Fixed(n) => *n == count,
            Self::OneOf(counts) => counts.contains(&count),
            Self::Variadic => true,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic)
    }

    /// Explicit counts; `None` when variadic
    pub fn counts(&self) -> Option<&[usize]> {
        match self {
            Self::Fixed(n) => Some(std::slice::from_ref(n)),
            Self::OneOf(counts) => Some(counts.as_slice()),
            Self::Variadic => None,
        }
    }

    /// Counts accepted by either range
    pub fn union(&self, other: &Self) -> Self {
        match (self.counts(), other.counts()) {
            (Some(a), Some(b)) => Self::of(a.iter().chain(b).copied()),
            _ => Self::Variadic,
        }
    }

    /// Counts accepted by both ranges
    pub fn intersect(&self, other: &Self) -> Self {
        match (self.counts(), other.counts()) {
            (Some(a), Some(b)) => Self::of(a.iter().copied().filter(|n| b.contains(n))),
            (Some(_), None) => self.clone(),
            (None, _) => other.clone(),
        }
    }
}

impl fmt::Display for OperandCountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::OneOf(counts) if counts.is_empty() => f.write_str("none"),
            Self::OneOf(counts) => {
                let parts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" or "))
            }
            Self::Variadic => f.write_str("any"),
        }
    }
}
