use std::collections::BTreeMap;

use serde_json::Value;

use crate::filters::schema::{FilterParams, FilterSchema};
use crate::filters::{Filter, FilterType};
use crate::foundation::error::{LayercamError, LayercamResult};

/// Constructor stored per registered filter type.
pub type FilterFactory =
    Box<dyn Fn(&FilterParams<'_>) -> LayercamResult<Box<dyn Filter>> + Send + Sync>;

struct Registration {
    schema: FilterSchema,
    factory: FilterFactory,
}

/// Mapping from filter type name to schema and constructor.
///
/// Populated once at startup, then shared read-only (typically behind an `Arc`) with the
/// pipeline builder and the configuration editor.
#[derive(Default)]
pub struct FilterRegistry {
    entries: BTreeMap<String, Registration>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl FilterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `blur`, `roll` and `stripes`.
    pub fn with_builtin_filters() -> LayercamResult<Self> {
        let mut registry = Self::new();
        crate::filters::blur::register(&mut registry)?;
        crate::filters::roll::register(&mut registry)?;
        crate::filters::stripes::register(&mut registry)?;
        Ok(registry)
    }

    /// Add a filter type. Names must be unique.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        factory: FilterFactory,
        schema: FilterSchema,
    ) -> LayercamResult<()> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(LayercamError::config("filter type name must be non-empty"));
        }
        if self.entries.contains_key(&type_name) {
            return Err(LayercamError::config(format!(
                "filter type '{type_name}' is already registered"
            )));
        }
        tracing::debug!(filter = %type_name, params = schema.len(), "registered filter type");
        self.entries
            .insert(type_name, Registration { schema, factory });
        Ok(())
    }

    /// Register a [`FilterType`] under its own name and schema.
    pub fn register_type<T: FilterType>(&mut self) -> LayercamResult<()> {
        self.register(
            T::NAME,
            Box::new(construct_boxed::<T>),
            T::schema(),
        )
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Return `true` if `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Ordered schema of `type_name`.
    pub fn schema_of(&self, type_name: &str) -> LayercamResult<&FilterSchema> {
        self.entries
            .get(type_name)
            .map(|r| &r.schema)
            .ok_or_else(|| LayercamError::unknown_filter(type_name))
    }

    /// Fully defaulted parameter list for `type_name`.
    pub fn default_params(&self, type_name: &str) -> LayercamResult<Vec<Value>> {
        Ok(self.schema_of(type_name)?.default_params())
    }

    /// Build a fresh instance, defaulting omitted parameters from the schema.
    pub fn construct(&self, type_name: &str, params: &[Value]) -> LayercamResult<Box<dyn Filter>> {
        let reg = self
            .entries
            .get(type_name)
            .ok_or_else(|| LayercamError::unknown_filter(type_name))?;
        let resolved = reg.schema.resolve(params);
        (reg.factory)(&FilterParams::new(type_name, &reg.schema, &resolved))
    }
}

fn construct_boxed<T: FilterType>(params: &FilterParams<'_>) -> LayercamResult<Box<dyn Filter>> {
    Ok(Box::new(T::from_params(params)?))
}

#[cfg(test)]
#[path = "../../tests/unit/filters/registry.rs"]
mod tests;
