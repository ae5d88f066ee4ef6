use rayon::prelude::*;

use crate::config::model::{Configuration, LayerKind};
use crate::config::store::ConfigMarker;
use crate::effects::composite::over_in_place;
use crate::filters::registry::FilterRegistry;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::pipeline::layer::{Layer, LayerContext};
use crate::render::frame::Frame;

/// Per-iteration frames pulled from the external sources.
#[derive(Clone, Copy, Debug)]
pub struct ComposeInputs<'a> {
    /// Next capture frame. Its size defines the canvas when the configuration declares none.
    pub input: &'a Frame,
    /// Foreground asset frame; required only by foreground layers.
    pub foreground: Option<&'a Frame>,
}

/// All layers of one configuration version plus the generation's previous output.
#[derive(Debug)]
pub struct Pipeline {
    marker: Option<ConfigMarker>,
    declared: Option<Canvas>,
    layers: Vec<Layer>,
    previous: Option<Frame>,
    parallel: bool,
}

impl Pipeline {
    /// Build every layer of `config` with fresh filter state.
    ///
    /// Fails as a whole on the first layer that cannot be built.
    #[tracing::instrument(skip(config, registry), fields(layers = config.layers.len()))]
    pub fn build(
        config: &Configuration,
        registry: &FilterRegistry,
        marker: Option<ConfigMarker>,
    ) -> LayercamResult<Self> {
        let declared = config.canvas()?;
        let layers = config
            .layers
            .iter()
            .map(|spec| Layer::build(spec, registry))
            .collect::<LayercamResult<Vec<_>>>()?;
        Ok(Self {
            marker,
            declared,
            layers,
            previous: None,
            parallel: false,
        })
    }

    /// Run independent layer chains on the rayon pool.
    pub fn with_parallel_layers(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Marker of the configuration this pipeline was built from.
    pub fn marker(&self) -> Option<ConfigMarker> {
        self.marker
    }

    /// Layers, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Return `true` when any layer reads the foreground source.
    pub fn needs_foreground(&self) -> bool {
        self.layers
            .iter()
            .any(|l| l.kind() == LayerKind::Foreground)
    }

    /// Last composited output, if a frame has been produced.
    pub fn previous_output(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    /// Produce one output frame: every layer's chain, blended bottom to top with "over".
    ///
    /// All sources are checked against the canvas before any filter runs, so a shape mismatch
    /// fails the pass without advancing filter state.
    pub fn compose(&mut self, inputs: &ComposeInputs<'_>) -> LayercamResult<Frame> {
        let canvas = self.declared.unwrap_or_else(|| inputs.input.canvas());
        if let Some(prev) = &self.previous
            && prev.canvas() != canvas
        {
            return Err(LayercamError::ShapeMismatch {
                expected: prev.canvas(),
                actual: canvas,
            });
        }

        let ctx = LayerContext {
            canvas,
            input: inputs.input,
            foreground: inputs.foreground,
            previous: self.previous.as_ref(),
        };
        let sources = self
            .layers
            .iter()
            .map(|layer| layer.source(&ctx))
            .collect::<LayercamResult<Vec<_>>>()?;

        let produced = if self.parallel {
            self.layers
                .par_iter_mut()
                .zip(sources.into_par_iter())
                .map(|(layer, frame)| layer.apply_chain(frame))
                .collect::<LayercamResult<Vec<_>>>()?
        } else {
            self.layers
                .iter_mut()
                .zip(sources)
                .map(|(layer, frame)| layer.apply_chain(frame))
                .collect::<LayercamResult<Vec<_>>>()?
        };

        let mut out = Frame::transparent(canvas);
        for frame in &produced {
            over_in_place(&mut out, frame)?;
        }
        self.previous = Some(out.clone());
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/compositor.rs"]
mod tests;
