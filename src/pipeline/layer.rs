use crate::config::model::{LayerKind, LayerSpec};
use crate::filters::Filter;
use crate::filters::registry::FilterRegistry;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::render::frame::Frame;

/// Frames available to layers during one compose pass.
#[derive(Clone, Copy, Debug)]
pub struct LayerContext<'a> {
    /// Dimensions every layer must produce.
    pub canvas: Canvas,
    /// Live capture frame.
    pub input: &'a Frame,
    /// Foreground asset frame, when one was pulled for this pass.
    pub foreground: Option<&'a Frame>,
    /// Previous composited output of this generation, if any.
    pub previous: Option<&'a Frame>,
}

/// A source selector and the filter chain it exclusively owns.
#[derive(Debug)]
pub struct Layer {
    kind: LayerKind,
    filters: Vec<Box<dyn Filter>>,
}

impl Layer {
    /// Construct one fresh filter instance per spec, in order.
    pub fn build(spec: &LayerSpec, registry: &FilterRegistry) -> LayercamResult<Self> {
        let filters = spec
            .filters
            .iter()
            .map(|f| registry.construct(&f.type_name, &f.params))
            .collect::<LayercamResult<Vec<_>>>()?;
        Ok(Self {
            kind: spec.kind,
            filters,
        })
    }

    /// Source kind.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Type names of the chain, in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.type_name()).collect()
    }

    /// Copy of this layer's source frame, checked against `ctx.canvas`.
    ///
    /// Reading a source never touches filter state, so a failure here leaves the layer exactly
    /// as it was.
    pub fn source(&self, ctx: &LayerContext<'_>) -> LayercamResult<Frame> {
        let frame = match self.kind {
            LayerKind::Input => ctx.input.clone(),
            LayerKind::Foreground => ctx
                .foreground
                .ok_or_else(|| LayercamError::device("no foreground frame available"))?
                .clone(),
            LayerKind::Previous => match ctx.previous {
                Some(prev) => prev.clone(),
                None => Frame::transparent(ctx.canvas),
            },
            LayerKind::Empty => Frame::transparent(ctx.canvas),
        };
        frame.ensure_canvas(ctx.canvas)?;
        Ok(frame)
    }

    /// Run the filter chain over `frame`, one step per filter.
    pub fn apply_chain(&mut self, mut frame: Frame) -> LayercamResult<Frame> {
        let canvas = frame.canvas();
        for filter in &mut self.filters {
            filter.apply(&mut frame);
            frame.ensure_canvas(canvas)?;
        }
        Ok(frame)
    }

    /// Source frame transformed by the whole chain.
    pub fn produce(&mut self, ctx: &LayerContext<'_>) -> LayercamResult<Frame> {
        let frame = self.source(ctx)?;
        self.apply_chain(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/layer.rs"]
mod tests;
