//! The document renderer seam: the engine hands each placement to a
//! [`Renderer`] and only learns the footprint it reports back.
use super::geometry::Size;
use super::plan::Side;
use crate::counter::Counter;
use crate::definition::header::WITHOUT_RECTANGLE_MARKER;
use crate::template::Template;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("row {row}: template has no part named {part:?}")]
    MissingPart { part: String, row: usize },

    #[error("renderer failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'c> {
    pub counter: &'c Counter,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise
    pub rotation: f64,
}

pub trait Renderer {
    /// Put `request.counter` at the requested position and report its
    /// footprint after rotation.
    fn place(&mut self, request: &PlacementRequest<'_>) -> Result<Size, RenderError>;
}

/// Measures counters from the part rectangles of a [`Template`] without
/// drawing anything. A counter is as wide and as tall as its largest part.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRenderer<'t> {
    template: &'t Template,
}

impl<'t> GeometryRenderer<'t> {
    pub fn new(template: &'t Template) -> Self {
        GeometryRenderer { template }
    }

    pub fn measure(&self, counter: &Counter) -> Result<Size, RenderError> {
        let mut size = Size::default();
        for part in &counter.parts {
            let name = part.strip_prefix(WITHOUT_RECTANGLE_MARKER).unwrap_or(part);
            if name.is_empty() {
                continue;
            }
            let found = self.template.part(name).ok_or_else(|| RenderError::MissingPart {
                part: name.to_string(),
                row: counter.row,
            })?;
            size.width = size.width.max(found.rect.w);
            size.height = size.height.max(found.rect.h);
        }
        Ok(size)
    }
}

impl Renderer for GeometryRenderer<'_> {
    fn place(&mut self, request: &PlacementRequest<'_>) -> Result<Size, RenderError> {
        Ok(self.measure(request.counter)?.rotated(request.rotation))
    }
}
