use serde_json::Value;

use crate::foundation::error::{LayercamError, LayercamResult};

/// Fallback for `file` properties that declare no default.
pub const FALLBACK_FILE: &str = "images/fog.png";
/// Fallback for `directory` properties that declare no default.
pub const FALLBACK_DIRECTORY: &str = "images/";
/// Fallback for `device` properties that declare no default.
pub const FALLBACK_DEVICE: &str = "/dev/video0";

/// Value kind and constraints of one filter parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyKind {
    /// Integer within an inclusive range.
    Numeric {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// Floating-point value within an inclusive range.
    Real {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// On/off switch.
    Boolean,
    /// One of a fixed list of strings.
    Enum {
        /// Allowed values, in display order.
        options: Vec<String>,
    },
    /// Path to a file.
    File,
    /// Path to a directory.
    Directory,
    /// Path to a device node.
    Device,
    /// Fixed value, not editable.
    Constant {
        /// The value passed to the constructor.
        value: Value,
    },
}

/// Declarative description of one positional filter parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyDescriptor {
    /// Human-facing property name.
    pub name: String,
    /// Kind and constraints.
    #[serde(flatten)]
    pub kind: PropertyKind,
    /// Declared default, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertyDescriptor {
    fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Integer property constrained to `[min, max]`.
    pub fn numeric(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(name, PropertyKind::Numeric { min, max })
    }

    /// Real property constrained to `[min, max]`.
    pub fn real(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(name, PropertyKind::Real { min, max })
    }

    /// Boolean property.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    /// Enum property over `options`.
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(name, PropertyKind::Enum { options })
    }

    /// File path property.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::File)
    }

    /// Directory path property.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Directory)
    }

    /// Device path property.
    pub fn device(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Device)
    }

    /// Constant property.
    pub fn constant(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(
            name,
            PropertyKind::Constant {
                value: value.into(),
            },
        )
    }

    /// Attach a declared default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value used when the parameter is omitted: the declared default, else the kind's fallback.
    pub fn default_value(&self) -> Value {
        if let Some(v) = &self.default {
            return v.clone();
        }
        match &self.kind {
            PropertyKind::Numeric { min, .. } => Value::from(*min),
            PropertyKind::Real { min, .. } => Value::from(*min),
            PropertyKind::Boolean => Value::Bool(false),
            PropertyKind::Enum { options } => options
                .first()
                .map(|o| Value::String(o.clone()))
                .unwrap_or(Value::Null),
            PropertyKind::File => Value::from(FALLBACK_FILE),
            PropertyKind::Directory => Value::from(FALLBACK_DIRECTORY),
            PropertyKind::Device => Value::from(FALLBACK_DEVICE),
            PropertyKind::Constant { value } => value.clone(),
        }
    }

    /// Pull a numeric value into `[min, max]`. Other kinds and non-numbers pass through.
    pub fn clamp_value(&self, value: &Value) -> Value {
        match self.kind {
            PropertyKind::Numeric { min, max } if min <= max => {
                if let Some(n) = value.as_i64() {
                    return Value::from(n.clamp(min, max));
                }
                match value.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => {
                        Value::from((f as i64).clamp(min, max))
                    }
                    _ => value.clone(),
                }
            }
            PropertyKind::Real { min, max } if min <= max => match value.as_f64() {
                Some(f) if f.is_finite() => Value::from(f.clamp(min, max)),
                _ => value.clone(),
            },
            _ => value.clone(),
        }
    }
}

/// Ordered parameter schema of one filter type.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct FilterSchema {
    properties: Vec<PropertyDescriptor>,
}

impl FilterSchema {
    /// Build a schema from positional descriptors.
    pub fn new(properties: Vec<PropertyDescriptor>) -> Self {
        Self { properties }
    }

    /// Descriptors in parameter order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Number of positional parameters.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Return `true` for parameterless filters.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Fully defaulted parameter list.
    pub fn default_params(&self) -> Vec<Value> {
        self.properties
            .iter()
            .map(PropertyDescriptor::default_value)
            .collect()
    }

    /// Fill omitted or `null` positions of `params` with defaults and clamp numbers into
    /// their declared range.
    ///
    /// Extra trailing parameters are ignored.
    pub fn resolve(&self, params: &[Value]) -> Vec<Value> {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, prop)| match params.get(i) {
                Some(v) if !v.is_null() => prop.clamp_value(v),
                _ => prop.default_value(),
            })
            .collect()
    }
}

/// Typed, positional view over resolved filter parameters.
#[derive(Clone, Copy, Debug)]
pub struct FilterParams<'a> {
    filter: &'a str,
    schema: &'a FilterSchema,
    values: &'a [Value],
}

impl<'a> FilterParams<'a> {
    pub(crate) fn new(filter: &'a str, schema: &'a FilterSchema, values: &'a [Value]) -> Self {
        Self {
            filter,
            schema,
            values,
        }
    }

    fn get(&self, idx: usize) -> LayercamResult<(&'a str, &'a Value)> {
        let name = self
            .schema
            .properties()
            .get(idx)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        let value = self.values.get(idx).ok_or_else(|| {
            LayercamError::invalid_param(format!(
                "{}: missing parameter #{idx} ('{name}')",
                self.filter
            ))
        })?;
        Ok((name, value))
    }

    fn type_error(&self, name: &str, expected: &str, got: &Value) -> LayercamError {
        LayercamError::invalid_param(format!(
            "{}.{name} must be {expected}, got {got}",
            self.filter
        ))
    }

    /// Integer parameter. Integral floats are accepted.
    pub fn int(&self, idx: usize) -> LayercamResult<i64> {
        let (name, v) = self.get(idx)?;
        if let Some(n) = v.as_i64() {
            return Ok(n);
        }
        match v.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
            _ => Err(self.type_error(name, "an integer", v)),
        }
    }

    /// Real parameter.
    pub fn real(&self, idx: usize) -> LayercamResult<f64> {
        let (name, v) = self.get(idx)?;
        match v.as_f64() {
            Some(f) if f.is_finite() => Ok(f),
            _ => Err(self.type_error(name, "a finite number", v)),
        }
    }

    /// Boolean parameter. Integers are read as C-style truthiness.
    pub fn boolean(&self, idx: usize) -> LayercamResult<bool> {
        let (name, v) = self.get(idx)?;
        if let Some(b) = v.as_bool() {
            return Ok(b);
        }
        v.as_i64()
            .map(|n| n != 0)
            .ok_or_else(|| self.type_error(name, "a boolean", v))
    }

    /// String parameter (enum option or path).
    pub fn string(&self, idx: usize) -> LayercamResult<&'a str> {
        let (name, v) = self.get(idx)?;
        v.as_str()
            .ok_or_else(|| self.type_error(name, "a string", v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/schema.rs"]
mod tests;
