//! Layout engine
//!
//! Counters are tiled greedily: left to right into rows, rows top to bottom
//! into boxes, boxes in order onto sheets. A new sheet starts when the last
//! box of the current one is full and something is still left to place.
//!
//! Backs are not placed with their fronts. They are collected while a box
//! fills and placed when it is closed, mirrored across the sheet width so
//! that a double sided print lines up.
//!
//! The engine never draws anything itself; a [`Renderer`] does the drawing
//! (or, with [`GeometryRenderer`], only the measuring) and reports each
//! counter's footprint.

pub mod engine;
pub mod geometry;
pub mod marks;
pub mod plan;
pub mod renderer;

pub use engine::{LayoutState, PlacementResult};
pub use geometry::{Rect, Size};
pub use marks::{Line, RegistrationMarks};
pub use plan::{LayoutPlan, Placement, Sheet, Side};
pub use renderer::{GeometryRenderer, PlacementRequest, RenderError, Renderer};

use crate::counter::Counter;
use serde::{Deserialize, Serialize};

/// Tolerance added to box sizes before deciding a counter does not fit.
pub const BOX_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("row {row}: counter has no size and would repeat forever")]
    DegenerateCounter { row: usize },

    #[error("no boxes to lay out into")]
    NoBoxes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub box_margin: f64,
    /// Gap between neighbouring counters, both directions
    pub spacing: f64,
    pub registration_marks_len: f64,
    /// Put backs on the front sheets instead of separate back sheets
    pub one_sided: bool,
    pub front_rotation: f64,
    pub back_rotation: f64,
    /// Width backs are mirrored across
    pub sheet_width: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            box_margin: BOX_MARGIN,
            spacing: 0.0,
            registration_marks_len: 0.0,
            one_sided: false,
            front_rotation: 0.0,
            back_rotation: 0.0,
            sheet_width: 0.0,
        }
    }
}

/// Place every counter, in order, as many times as its repeat policy asks.
pub fn lay_out<R>(
    counters: &mut [Counter],
    boxes: &[Rect],
    settings: &LayoutSettings,
    renderer: &mut R,
) -> Result<LayoutPlan, LayoutError>
where
    R: Renderer + ?Sized,
{
    let mut state = LayoutState::new(boxes, settings)?;
    for index in 0..counters.len() {
        while counters[index].can_add_another() {
            state.place_next(counters, index, renderer)?;
        }
    }
    let plan = state.finish(counters, renderer)?;
    log::info!(
        "laid out {} fronts and {} backs on {} sheets",
        plan.front_count(),
        plan.back_count(),
        plan.sheets.len()
    );
    Ok(plan)
}
