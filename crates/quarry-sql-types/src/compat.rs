//! Type-level compatibility
//!
//! Assignability, castability and comparability over full [`SqlType`]
//! values. Structured shapes are dispatched here before the name-level
//! [`RuleTable`] is consulted.

use crate::rules::RuleTable;
use crate::sql_type::SqlType;
use crate::type_name::TypeName;
use quarry_sql_diagnostics::{Result, TypeError};

/// Whether a value of `from` may be converted to `to`
///
/// With `coerce` set the CAST table is used, otherwise the assignment
/// table. A target name missing from the table fails with
/// `AssignmentRulesIncomplete`.
pub fn can_cast(to: &SqlType, from: &SqlType, coerce: bool) -> Result<bool> {
    if to.equals_sans_nullability(from) {
        return Ok(true);
    }
    if to.name() == TypeName::Null {
        return Ok(false);
    }
    if from.name() == TypeName::Null {
        return Ok(true);
    }

    if to.is_struct() || from.is_struct() {
        return can_cast_struct(to, from, coerce);
    }

    match (to.component_type(), from.component_type()) {
        (Some(to_elem), Some(from_elem)) => return can_cast(to_elem, from_elem, coerce),
        (Some(_), None) | (None, Some(_)) => return Ok(false),
        (None, None) => {}
    }

    RuleTable::select(coerce).can_cast_from(to.name(), from.name())
}

fn can_cast_struct(to: &SqlType, from: &SqlType, coerce: bool) -> Result<bool> {
    match (to.name(), from.name()) {
        (TypeName::Distinct, TypeName::Distinct) => Ok(false),
        (TypeName::Distinct, _) => can_cast(wrapped(to)?, from, coerce),
        (_, TypeName::Distinct) => can_cast(to, wrapped(from)?, coerce),
        (TypeName::Row, TypeName::Row) => {
            let (Some(to_fields), Some(from_fields)) = (to.fields(), from.fields()) else {
                return Ok(false);
            };
            if to_fields.len() != from_fields.len() {
                return Ok(false);
            }
            for (t, f) in to_fields.iter().zip(from_fields) {
                if !can_cast(&t.ty, &f.ty, coerce)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (TypeName::Row, _) | (TypeName::Multiset, _) | (_, TypeName::Multiset) => Ok(false),
        _ => Ok(to.family().is_some() && to.family() == from.family()),
    }
}

fn wrapped(distinct: &SqlType) -> Result<&SqlType> {
    distinct.field(0).map(|f| &f.ty).ok_or_else(|| {
        TypeError::internal(format!("distinct type {distinct} has no underlying field"))
    })
}

/// Implicit assignment between full types
pub fn can_assign_from(to: &SqlType, from: &SqlType) -> Result<bool> {
    can_cast(to, from, false)
}

/// Whether `=` may compare values of the two types
///
/// NULL and ANY compare with anything. Structs compare field-wise when they
/// have the same number of fields. Everything else needs the same natural
/// family, or the same name for types without one.
pub fn is_comparable(a: &SqlType, b: &SqlType) -> bool {
    let special = |t: &SqlType| matches!(t.name(), TypeName::Null | TypeName::Any);
    if special(a) || special(b) {
        return true;
    }
    match (a.fields(), b.fields()) {
        (Some(fa), Some(fb)) => {
            fa.len() == fb.len() && fa.iter().zip(fb).all(|(x, y)| is_comparable(&x.ty, &y.ty))
        }
        (Some(_), None) | (None, Some(_)) => false,
        (None, None) => match (a.family(), b.family()) {
            (Some(x), Some(y)) => x == y,
            _ => a.name() == b.name(),
        },
    }
}

/// Same type names all the way down, ignoring precision and nullability
pub fn same_named_type(a: &SqlType, b: &SqlType) -> bool {
    if a.name() != b.name() {
        return false;
    }
    match (a.component_type(), b.component_type()) {
        (Some(x), Some(y)) => return same_named_type(x, y),
        (None, None) => {}
        _ => return false,
    }
    match (a.fields(), b.fields()) {
        (Some(fa), Some(fb)) => {
            fa.len() == fb.len()
                && fa.iter().zip(fb).all(|(x, y)| same_named_type(&x.ty, &y.ty))
        }
        (None, None) => true,
        _ => false,
    }
}

/// Whether the type or any nested field is nullable
pub fn contains_nullable(ty: &SqlType) -> bool {
    ty.is_nullable()
        || ty
            .fields()
            .is_some_and(|fields| fields.iter().any(|f| contains_nullable(&f.ty)))
}

/// Whether both types belong to one natural family
///
/// Structs only share a family with an equal struct.
pub fn in_same_family(a: &SqlType, b: &SqlType) -> bool {
    if a.is_struct() || b.is_struct() {
        return a.equals_sans_nullability(b);
    }
    a.family().is_some() && a.family() == b.family()
}

/// Like [`in_same_family`], but a NULL type matches any family
pub fn in_same_family_or_null(a: &SqlType, b: &SqlType) -> bool {
    a.name() == TypeName::Null || b.name() == TypeName::Null || in_same_family(a, b)
}

/// All character types with one charset
pub fn is_char_type_comparable(types: &[SqlType]) -> bool {
    let Some(first) = types.first() else {
        return true;
    };
    let charset = first.charset().map(|c| c.name.as_str());
    types
        .iter()
        .all(|t| t.name().is_char() && t.charset().map(|c| c.name.as_str()) == charset)
}

/// Whether `ty`'s name appears in `names`; an ANY entry matches every type
pub fn matches_type_name(names: &[TypeName], ty: &SqlType) -> bool {
    names.contains(&TypeName::Any) || names.contains(&ty.name())
}
