//! Canonicalizing type factory
//!
//! Every [`SqlType`] is created here. The factory validates construction
//! arguments and interns the result, so repeated requests for the same type
//! return handles sharing one allocation. The cache only grows.

use crate::config::TypeSystemConfig;
use crate::family::TypeFamily;
use crate::sql_type::{
    Charset, Coercibility, Collation, Comparability, IntervalQualifier, SqlType, TypeDescriptor,
    TypeField,
};
use crate::type_name::TypeName;
use log::trace;
use parking_lot::RwLock;
use quarry_sql_diagnostics::{Result, TypeError};
use std::collections::HashSet;
use std::sync::Arc;

/// Creates and interns SQL types
///
/// The factory is `Send + Sync`; one instance can be shared by every thread
/// of a compilation session.
#[derive(Debug, Default)]
pub struct TypeFactory {
    config: TypeSystemConfig,
    cache: RwLock<HashSet<Arc<TypeDescriptor>>>,
}

impl TypeFactory {
    /// Create a factory with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with a custom configuration
    pub fn with_config(config: TypeSystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: RwLock::default(),
        })
    }

    pub fn config(&self) -> &TypeSystemConfig {
        &self.config
    }

    /// Number of distinct types interned so far
    pub fn interned_count(&self) -> usize {
        self.cache.read().len()
    }

    /// Return the canonical instance for `desc`
    pub(crate) fn canonize(&self, desc: TypeDescriptor) -> SqlType {
        if let Some(existing) = self.cache.read().get(&desc) {
            return SqlType(Arc::clone(existing));
        }
        let mut cache = self.cache.write();
        if let Some(existing) = cache.get(&desc) {
            return SqlType(Arc::clone(existing));
        }
        let ty = SqlType(Arc::new(desc));
        trace!("interned type {}", ty.full_digest());
        cache.insert(Arc::clone(&ty.0));
        ty
    }

    /// Create a scalar type, e.g. `DECIMAL(10, 2)` or `VARCHAR(20)`
    ///
    /// Fails with `InvalidSignature` when `name` does not accept the given
    /// precision/scale shape or the values exceed the configured limits.
    /// MULTISET, the interval names, STRUCTURED and DISTINCT need extra
    /// structure and have dedicated constructors. The result is NOT NULL.
    pub fn create_sql_type(
        &self,
        name: TypeName,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Result<SqlType> {
        match name {
            TypeName::Multiset => {
                return Err(TypeError::precondition(
                    "MULTISET types are created with create_multiset",
                ));
            }
            TypeName::IntervalYearMonth | TypeName::IntervalDayTime => {
                return Err(TypeError::precondition(
                    "interval types are created with create_interval",
                ));
            }
            TypeName::Structured | TypeName::Distinct => {
                return Err(TypeError::precondition(format!(
                    "{name} types are created with create_structured or create_distinct"
                )));
            }
            _ => {}
        }

        if !name.allows_precision_scale(precision.is_some(), scale.is_some()) {
            return Err(TypeError::invalid_signature(
                name,
                describe_signature(precision, scale),
            ));
        }
        if let Some(p) = precision {
            if let Some(max) = self.config.max_precision(name) {
                if p > max {
                    return Err(TypeError::invalid_signature(
                        name,
                        format!("precision {p} (maximum is {max})"),
                    ));
                }
            }
            let sized = matches!(
                name.family(),
                Some(TypeFamily::Numeric | TypeFamily::Character | TypeFamily::Binary)
            );
            if p == 0 && sized {
                return Err(TypeError::invalid_signature(name, "precision 0"));
            }
        }
        if let (Some(p), Some(s)) = (precision, scale) {
            if s > p || s > self.config.max_numeric_scale {
                return Err(TypeError::invalid_signature(
                    name,
                    format!("scale {s} with precision {p}"),
                ));
            }
        }

        let mut desc = TypeDescriptor::new(name);
        desc.precision = precision;
        desc.scale = scale;
        if name.is_char() {
            desc.charset = Some(Charset::new(&self.config.default_charset));
            desc.collation = Some(Collation::new(
                &self.config.default_collation,
                Coercibility::Coercible,
            ));
        }
        if name.is_struct_kind() {
            desc.fields = Some(Vec::new());
        }
        Ok(self.canonize(desc))
    }

    /// Copy of `ty` with the given nullability
    ///
    /// Making a struct nullable makes all of its fields nullable, recursively.
    pub fn create_with_nullability(&self, ty: &SqlType, nullable: bool) -> SqlType {
        if ty.is_nullable() == nullable && !(nullable && ty.is_struct()) {
            return ty.clone();
        }
        let mut desc = ty.descriptor().clone();
        desc.nullable = nullable;
        if nullable {
            if let Some(fields) = desc.fields.as_mut() {
                for field in fields.iter_mut() {
                    field.ty = self.create_with_nullability(&field.ty, true);
                }
            }
        }
        self.canonize(desc)
    }

    /// Copy of a character type with a new charset and collation
    ///
    /// Fails with `NotCharFamily` for any non-character type.
    pub fn create_with_charset_and_collation(
        &self,
        ty: &SqlType,
        charset: Charset,
        collation: Collation,
    ) -> Result<SqlType> {
        if ty.family() != Some(TypeFamily::Character) {
            return Err(TypeError::not_char_family(ty));
        }
        let mut desc = ty.descriptor().clone();
        desc.charset = Some(charset);
        desc.collation = Some(collation);
        Ok(self.canonize(desc))
    }

    /// `element MULTISET`, NOT NULL
    pub fn create_multiset(&self, element: SqlType) -> SqlType {
        let mut desc = TypeDescriptor::new(TypeName::Multiset);
        desc.component = Some(element);
        self.canonize(desc)
    }

    /// Interval type for a qualifier, NOT NULL
    pub fn create_interval(&self, qualifier: IntervalQualifier) -> SqlType {
        let mut desc = TypeDescriptor::new(qualifier.type_name());
        desc.interval = Some(qualifier);
        self.canonize(desc)
    }

    /// ROW type from `(name, type)` pairs, NOT NULL
    pub fn create_struct<N: Into<String>>(
        &self,
        fields: impl IntoIterator<Item = (N, SqlType)>,
    ) -> SqlType {
        let mut desc = TypeDescriptor::new(TypeName::Row);
        desc.fields = Some(index_fields(fields));
        self.canonize(desc)
    }

    /// ROW type with fields named `$0`, `$1`, ...
    pub fn create_struct_from_types(&self, types: impl IntoIterator<Item = SqlType>) -> SqlType {
        self.create_struct(
            types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| (format!("${i}"), ty)),
        )
    }

    /// User-defined structured type
    pub fn create_structured<N: Into<String>>(
        &self,
        identifier: impl Into<String>,
        fields: impl IntoIterator<Item = (N, SqlType)>,
        comparability: Comparability,
    ) -> Result<SqlType> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(TypeError::precondition(
                "structured types need a non-empty identifier",
            ));
        }
        let mut desc = TypeDescriptor::new(TypeName::Structured);
        desc.fields = Some(index_fields(fields));
        desc.identifier = Some(identifier);
        desc.comparability = comparability;
        Ok(self.canonize(desc))
    }

    /// User-defined distinct type wrapping exactly one underlying type
    pub fn create_distinct(
        &self,
        identifier: impl Into<String>,
        underlying: SqlType,
        comparability: Comparability,
    ) -> Result<SqlType> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(TypeError::precondition(
                "distinct types need a non-empty identifier",
            ));
        }
        if underlying.is_struct() {
            return Err(TypeError::precondition(format!(
                "distinct type {identifier} cannot wrap structured type {underlying}"
            )));
        }
        let mut desc = TypeDescriptor::new(TypeName::Distinct);
        desc.fields = Some(vec![TypeField::new("$value", 0, underlying)]);
        desc.identifier = Some(identifier);
        desc.comparability = comparability;
        Ok(self.canonize(desc))
    }
}

fn index_fields<N: Into<String>>(fields: impl IntoIterator<Item = (N, SqlType)>) -> Vec<TypeField> {
    fields
        .into_iter()
        .enumerate()
        .map(|(index, (name, ty))| TypeField::new(name, index, ty))
        .collect()
}

fn describe_signature(precision: Option<u32>, scale: Option<u32>) -> String {
    match (precision, scale) {
        (Some(p), Some(s)) => format!("precision {p} and scale {s}"),
        (Some(p), None) => format!("precision {p}"),
        (None, Some(s)) => format!("scale {s} without a precision"),
        (None, None) => "a missing precision".to_string(),
    }
}
