//! The layout result handed to the rendering/export layer.
use super::geometry::Size;
use super::marks::{Line, RegistrationMarks};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Index into the laid out counter list
    pub counter: usize,
    /// Source row of the counter
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub side: Side,
    pub autonumber: usize,
    #[serde(rename = "box")]
    pub box_index: usize,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    /// 1-based
    pub number: usize,
    pub front: Vec<Placement>,
    pub back: Vec<Placement>,
    pub marks: Vec<RegistrationMarks>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mark_lines: Vec<Line>,
}

impl Sheet {
    pub fn new(number: usize) -> Self {
        Sheet {
            number,
            front: Vec::new(),
            back: Vec::new(),
            marks: Vec::new(),
            mark_lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub sheets: Vec<Sheet>,
    /// Counter ids to export as individual bitmaps, in placement order
    pub export_ids: Vec<String>,
}

impl LayoutPlan {
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.sheets.iter().flat_map(|s| s.front.iter().chain(s.back.iter()))
    }

    pub fn front_count(&self) -> usize {
        self.sheets.iter().map(|s| s.front.len()).sum()
    }

    pub fn back_count(&self) -> usize {
        self.sheets.iter().map(|s| s.back.len()).sum()
    }
}
