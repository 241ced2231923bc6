//! Template catalog
//!
//! The parts a counter is assembled from live in a drawing. This crate never
//! reads the drawing itself; it works from a catalog describing it: the
//! document size, each part's bounding rectangle and inline style, the ids of
//! colour/gradient definitions, and the optional list of layout boxes.
//!
//! The catalog is JSON. Part geometry can additionally be merged from the
//! `id,x,y,w,h` table an `inkscape --query-all` run prints.

use crate::layout::Rect;
use crate::tabular::{self, Row};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid template: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatePart {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub parts: BTreeMap<String, TemplatePart>,
    #[serde(default)]
    pub definitions: BTreeSet<String>,
    /// Layout boxes, in placement order
    #[serde(default)]
    pub layout: Vec<Rect>,
}

impl Template {
    pub fn new(width: f64, height: f64) -> Self {
        Template {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    pub fn with_part(mut self, id: &str, rect: Rect) -> Self {
        self.parts.insert(
            id.to_string(),
            TemplatePart {
                rect,
                ..Default::default()
            },
        );
        self
    }

    pub fn with_style(mut self, id: &str, style: &str) -> Self {
        self.parts.entry(id.to_string()).or_default().style = Some(style.to_string());
        self
    }

    pub fn with_definition(mut self, id: &str) -> Self {
        self.definitions.insert(id.to_string());
        self
    }

    pub fn with_box(mut self, rect: Rect) -> Self {
        self.layout.push(rect);
        self
    }

    /// Merge geometry from `id,x,y,w,h` rows. Rows of any other shape, or
    /// with non-numeric coordinates, are skipped. Returns the merged count.
    pub fn merge_query_all(&mut self, rows: &[Row]) -> usize {
        let mut merged = 0;
        for row in rows {
            if row.len() != 5 {
                continue;
            }
            let coords: Option<Vec<f64>> = row[1..].iter().map(|c| c.trim().parse().ok()).collect();
            let Some(c) = coords else {
                log::debug!("template: skipping query row {:?}", row);
                continue;
            };
            self.parts.entry(row[0].clone()).or_default().rect = Rect::new(c[0], c[1], c[2], c[3]);
            merged += 1;
        }
        merged
    }

    /// Read and merge an `inkscape --query-all` dump.
    pub fn merge_query_all_source(&mut self, source: &str) -> usize {
        let rows = tabular::read_rows_with(source, tabular::Delimiter::Comma);
        self.merge_query_all(&rows)
    }

    pub fn part(&self, id: &str) -> Option<&TemplatePart> {
        self.parts.get(id)
    }

    pub fn style_of(&self, id: &str) -> Option<&str> {
        self.parts.get(id)?.style.as_deref()
    }

    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains(id)
    }

    /// Boxes to fill, in order. Without an explicit layout the whole
    /// document is one box, inset by the registration mark length so the
    /// marks stay on the page.
    pub fn boxes(&self, registration_marks_len: f64) -> Vec<Rect> {
        if !self.layout.is_empty() {
            return self.layout.clone();
        }
        let page = Rect::new(0.0, 0.0, self.width, self.height);
        if registration_marks_len > 0.0 {
            vec![page.inset(registration_marks_len)]
        } else {
            vec![page]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let t = Template::from_json(
            r#"{
                "width": 200, "height": 100,
                "parts": {"unit": {"x": 1, "y": 2, "w": 30, "h": 40, "style": "fill:red"}},
                "definitions": ["grad"],
                "layout": [{"x": 0, "y": 0, "w": 100, "h": 100}]
            }"#,
        )
        .unwrap();
        assert_eq!(t.part("unit").unwrap().rect, Rect::new(1.0, 2.0, 30.0, 40.0));
        assert_eq!(t.style_of("unit"), Some("fill:red"));
        assert!(t.has_definition("grad"));
        assert_eq!(t.boxes(10.0), vec![Rect::new(0.0, 0.0, 100.0, 100.0)]);
    }

    #[test]
    fn test_default_box_is_inset_page() {
        let t = Template::new(200.0, 100.0);
        assert_eq!(t.boxes(0.0), vec![Rect::new(0.0, 0.0, 200.0, 100.0)]);
        assert_eq!(t.boxes(5.0), vec![Rect::new(5.0, 5.0, 190.0, 90.0)]);
    }

    #[test]
    fn test_layout_boxes_keep_order() {
        let t = Template::new(200.0, 100.0)
            .with_box(Rect::new(100.0, 0.0, 100.0, 100.0))
            .with_box(Rect::new(0.0, 0.0, 100.0, 100.0));
        let boxes = t.boxes(5.0);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].x, 100.0);
    }

    #[test]
    fn test_merge_query_all() {
        let mut t = Template::new(10.0, 10.0).with_style("a", "fill:blue");
        let merged = t.merge_query_all_source("a,1,2,3,4\nsvg2,0,0,10,10\nbroken,x,1,1,1\nshort,1\n");
        assert_eq!(merged, 2);
        assert_eq!(t.part("a").unwrap().rect, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(t.style_of("a"), Some("fill:blue"));
        assert!(t.part("broken").is_none());
    }
}
