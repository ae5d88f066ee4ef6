use std::collections::BTreeMap;

use serde_json::Value;

use crate::filters::registry::FilterRegistry;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercamError, LayercamResult};

/// Where a layer takes its source frame from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Live capture frame.
    Input,
    /// Static foreground asset.
    Foreground,
    /// Previous composited output of the active generation.
    Previous,
    /// Fully transparent frame.
    Empty,
}

impl LayerKind {
    /// All kinds, in editor display order.
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Input,
        LayerKind::Foreground,
        LayerKind::Previous,
        LayerKind::Empty,
    ];

    /// Configuration key of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Foreground => "foreground",
            LayerKind::Previous => "previous",
            LayerKind::Empty => "empty",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerKind {
    type Err = LayercamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LayercamError::config(format!("unknown layer kind '{s}'")))
    }
}

/// `[type_name, param_1, param_2, ...]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct FilterSpec {
    /// Registered filter type name.
    pub type_name: String,
    /// Positional parameters, interpreted by the type's schema.
    pub params: Vec<Value>,
}

impl FilterSpec {
    /// Build a spec from a type name and positional parameters.
    pub fn new(type_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            params,
        }
    }

    /// Spec of `type_name` with every parameter at its schema default.
    pub fn with_defaults(registry: &FilterRegistry, type_name: &str) -> LayercamResult<Self> {
        Ok(Self::new(type_name, registry.default_params(type_name)?))
    }
}

impl TryFrom<Vec<Value>> for FilterSpec {
    type Error = LayercamError;

    fn try_from(mut raw: Vec<Value>) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            return Err(LayercamError::config("filter spec must not be empty"));
        }
        let params = raw.split_off(1);
        match raw.pop() {
            Some(Value::String(type_name)) => Ok(Self { type_name, params }),
            Some(other) => Err(LayercamError::config(format!(
                "filter spec must start with a type name, got {other}"
            ))),
            None => Err(LayercamError::config("filter spec must not be empty")),
        }
    }
}

impl From<FilterSpec> for Vec<Value> {
    fn from(spec: FilterSpec) -> Self {
        let mut out = Vec::with_capacity(spec.params.len() + 1);
        out.push(Value::String(spec.type_name));
        out.extend(spec.params);
        out
    }
}

/// `{ <layer_kind>: [FilterSpec, ...] }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    try_from = "BTreeMap<LayerKind, Vec<FilterSpec>>",
    into = "BTreeMap<LayerKind, Vec<FilterSpec>>"
)]
pub struct LayerSpec {
    /// Source selector.
    pub kind: LayerKind,
    /// Filter chain, applied in order.
    pub filters: Vec<FilterSpec>,
}

impl LayerSpec {
    /// Layer with the given kind and filter chain.
    pub fn new(kind: LayerKind, filters: Vec<FilterSpec>) -> Self {
        Self { kind, filters }
    }
}

impl TryFrom<BTreeMap<LayerKind, Vec<FilterSpec>>> for LayerSpec {
    type Error = LayercamError;

    fn try_from(map: BTreeMap<LayerKind, Vec<FilterSpec>>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(LayercamError::config(format!(
                "layer must have exactly one kind key, got {}",
                map.len()
            )));
        }
        let Some((kind, filters)) = map.into_iter().next() else {
            return Err(LayercamError::config("layer must have exactly one kind key"));
        };
        Ok(Self { kind, filters })
    }
}

impl From<LayerSpec> for BTreeMap<LayerKind, Vec<FilterSpec>> {
    fn from(layer: LayerSpec) -> Self {
        BTreeMap::from([(layer.kind, layer.filters)])
    }
}

/// Ordered layers plus optional fixed output dimensions.
///
/// Layers composite bottom to top: `layers[0]` is drawn first.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    /// Fixed output width; inferred from the first input frame when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Fixed output height; inferred from the first input frame when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Layers, bottom first.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

impl Configuration {
    /// Configuration with the given layers and inferred dimensions.
    pub fn new(layers: Vec<LayerSpec>) -> Self {
        Self {
            width: None,
            height: None,
            layers,
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(s: &str) -> LayercamResult<Self> {
        serde_json::from_str(s).map_err(|e| LayercamError::serde(e.to_string()))
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> LayercamResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayercamError::serde(e.to_string()))
    }

    /// Declared output dimensions, if any.
    pub fn canvas(&self) -> LayercamResult<Option<Canvas>> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Canvas::new(w, h).map(Some),
            (None, None) => Ok(None),
            _ => Err(LayercamError::config(
                "width and height must be declared together",
            )),
        }
    }

    fn layer_mut(&mut self, layer: usize) -> LayercamResult<&mut LayerSpec> {
        let count = self.layers.len();
        self.layers.get_mut(layer).ok_or_else(|| {
            LayercamError::config(format!("layer index {layer} out of range ({count} layers)"))
        })
    }

    fn filter_mut(&mut self, layer: usize, filter: usize) -> LayercamResult<&mut FilterSpec> {
        let l = self.layer_mut(layer)?;
        let count = l.filters.len();
        l.filters.get_mut(filter).ok_or_else(|| {
            LayercamError::config(format!(
                "filter index {filter} out of range ({count} filters in layer {layer})"
            ))
        })
    }

    /// Insert an empty layer of `kind` at `index` (`index == len` appends).
    pub fn insert_layer(&mut self, index: usize, kind: LayerKind) -> LayercamResult<()> {
        if index > self.layers.len() {
            return Err(LayercamError::config(format!(
                "layer insert index {index} out of range"
            )));
        }
        self.layers.insert(index, LayerSpec::new(kind, Vec::new()));
        Ok(())
    }

    /// Remove and return the layer at `index`.
    pub fn remove_layer(&mut self, index: usize) -> LayercamResult<LayerSpec> {
        self.layer_mut(index)?;
        Ok(self.layers.remove(index))
    }

    /// Change a layer's source kind, keeping its filter chain.
    pub fn set_layer_kind(&mut self, layer: usize, kind: LayerKind) -> LayercamResult<()> {
        self.layer_mut(layer)?.kind = kind;
        Ok(())
    }

    /// Insert a filter into a layer's chain at `index` (`index == len` appends).
    pub fn insert_filter(
        &mut self,
        layer: usize,
        index: usize,
        spec: FilterSpec,
    ) -> LayercamResult<()> {
        let l = self.layer_mut(layer)?;
        if index > l.filters.len() {
            return Err(LayercamError::config(format!(
                "filter insert index {index} out of range"
            )));
        }
        l.filters.insert(index, spec);
        Ok(())
    }

    /// Remove and return a filter from a layer's chain.
    pub fn remove_filter(&mut self, layer: usize, index: usize) -> LayercamResult<FilterSpec> {
        self.filter_mut(layer, index)?;
        Ok(self.layer_mut(layer)?.filters.remove(index))
    }

    /// Replace a filter's type in place; its parameters reset to the new type's defaults.
    pub fn switch_filter_type(
        &mut self,
        layer: usize,
        index: usize,
        registry: &FilterRegistry,
        new_type: &str,
    ) -> LayercamResult<()> {
        let spec = FilterSpec::with_defaults(registry, new_type)?;
        *self.filter_mut(layer, index)? = spec;
        Ok(())
    }

    /// Set positional parameter `param` of a filter, padding skipped positions with `null`.
    pub fn set_filter_param(
        &mut self,
        layer: usize,
        index: usize,
        param: usize,
        value: Value,
    ) -> LayercamResult<()> {
        let spec = self.filter_mut(layer, index)?;
        if spec.params.len() <= param {
            spec.params.resize(param + 1, Value::Null);
        }
        spec.params[param] = value;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
