//! Counter model
//!
//! One [`Counter`] is built per data row. It lists the template parts it is
//! assembled from, the text substitutions and attribute overrides to apply to
//! the cloned parts, and which element ids to drop. A counter may own a back
//! (its mirrored side for double sided sheets), created lazily the first time
//! anything is applied to it.
//!
//! The layout engine drives the [`RepeatPolicy`] and fills in the runtime
//! fields (measured size, per-placement records).

pub mod glob;
pub mod repeat;
pub mod setting;
pub mod style;

pub use glob::Glob;
pub use repeat::{Boundaries, RepeatKind, RepeatPolicy};
pub use setting::{AttributeValue, Setting, SettingHolder};

use crate::layout::Size;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Substitution key the layout engine fills with the running placement number.
pub const AUTONUMBER: &str = "autonumber";

static PLACEHOLDER_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-\w.:]+$").unwrap());

/// True if `name` may be used between `%` signs as a text placeholder.
pub fn is_placeholder_name(name: &str) -> bool {
    PLACEHOLDER_NAME.is_match(name)
}

/// Insertion-ordered string map; re-inserting a key replaces its value in place.
/// Keys double as element id globs and are compiled once on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions(Vec<(Glob, String)>);

impl Substitutions {
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k.pattern() == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.0.push((Glob::new(name), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.pattern() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.pattern(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First value whose glob matches `element_id`.
    pub fn matching(&self, element_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.matches(element_id))
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for Substitutions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k.pattern(), v)?;
        }
        map.end()
    }
}

/// Attribute overrides for the elements matching one glob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeOverride {
    pub pattern: Glob,
    pub attributes: Vec<(String, AttributeValue)>,
}

/// Where a counter (or its back) was put by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRecord {
    pub sheet: usize,
    #[serde(rename = "box")]
    pub box_index: usize,
    pub x: f64,
    pub y: f64,
    pub autonumber: usize,
    /// Touches the left edge of its box
    pub first_column: bool,
    /// Sits in the top row of its box
    pub first_row: bool,
    /// Closed its row
    pub last_column: bool,
}

/// Fields only the layout engine writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterRuntime {
    pub measured: Option<Size>,
    pub placements: Vec<PlacementRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Counter {
    /// 1-based source row, 0 when not built from a row
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub parts: Vec<String>,
    pub substitutions: Substitutions,
    pub attributes: Vec<AttributeOverride>,
    exclude_ids: Vec<Glob>,
    include_ids: Vec<Glob>,
    pub has_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<Box<Counter>>,
    pub end_box: bool,
    pub end_row: bool,
    pub repeat: RepeatPolicy,
    pub runtime: CounterRuntime,
}

impl Counter {
    pub fn new(repeat: RepeatPolicy) -> Self {
        Counter {
            repeat,
            ..Default::default()
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    /// The back, created on first request with a fresh copy of this
    /// counter's repeat policy so both sides place the same number of times.
    pub fn back_mut(&mut self) -> &mut Counter {
        let repeat = self.repeat.restarted();
        let row = self.row;
        self.back
            .get_or_insert_with(|| Box::new(Counter::new(repeat).at_row(row)))
    }

    pub fn add_part(&mut self, part: &str) {
        self.parts.push(part.to_string());
    }

    pub fn add_substitution(&mut self, name: &str, value: &str) {
        self.substitutions.insert(name, value);
    }

    pub fn add_attribute(&mut self, pattern: &str, name: &str, value: AttributeValue) {
        let entry = match self.attributes.iter_mut().position(|a| a.pattern.pattern() == pattern) {
            Some(i) => &mut self.attributes[i],
            None => {
                self.attributes.push(AttributeOverride {
                    pattern: Glob::new(pattern),
                    attributes: Vec::new(),
                });
                let last = self.attributes.len() - 1;
                &mut self.attributes[last]
            }
        };
        match entry.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => entry.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, pattern: &str, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.pattern.pattern() == pattern)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn exclude_id(&mut self, pattern: &str) {
        if !self.exclude_ids.iter().any(|g| g.pattern() == pattern) {
            self.exclude_ids.push(Glob::new(pattern));
        }
    }

    pub fn include_id(&mut self, pattern: &str) {
        if !self.include_ids.iter().any(|g| g.pattern() == pattern) {
            self.include_ids.push(Glob::new(pattern));
        }
    }

    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.exclude_ids.iter().map(Glob::pattern).collect()
    }

    pub fn include_patterns(&self) -> Vec<&str> {
        self.include_ids.iter().map(Glob::pattern).collect()
    }

    /// Whether element `element_id` survives the exclude/include rules.
    /// Includes win over excludes; anonymous elements are always kept.
    pub fn is_included(&self, element_id: Option<&str>) -> bool {
        let eid = match element_id {
            Some(eid) if !eid.is_empty() => eid,
            _ => return true,
        };
        if self.include_ids.iter().any(|g| g.matches(eid)) {
            return true;
        }
        !self.exclude_ids.iter().any(|g| g.matches(eid))
    }

    /// Apply every matching `style:<property>` override to `style`.
    /// Overrides still waiting on another element's style are skipped.
    pub fn resolve_style(&self, element_id: &str, style: &str) -> String {
        let mut out = style.to_string();
        for over in self
            .attributes
            .iter()
            .filter(|a| a.pattern.matches(element_id))
        {
            for (name, value) in &over.attributes {
                let (Some(property), Some(value)) = (name.strip_prefix("style:"), value.literal())
                else {
                    continue;
                };
                out = style::replace_style_property(&out, property, &value);
            }
        }
        out
    }

    /// Replace `%name%` in `text` for every substitution with a valid
    /// placeholder name.
    pub fn substitute_placeholders(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (name, value) in self.substitutions.iter() {
            if is_placeholder_name(name) {
                out = out.replace(&format!("%{}%", name), value);
            }
        }
        out
    }

    /// Stamp the running placement number on this counter and its back.
    pub fn set_autonumber(&mut self, number: usize) {
        let value = number.to_string();
        self.add_substitution(AUTONUMBER, &value);
        if let Some(back) = self.back.as_mut() {
            back.add_substitution(AUTONUMBER, &value);
        }
    }

    pub fn can_add_another(&self) -> bool {
        self.repeat.can_add_another()
    }

    pub fn added_one(&mut self, boundaries: Boundaries) {
        self.repeat.added_one(boundaries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> Counter {
        Counter::new(RepeatPolicy::exact(1))
    }

    #[test]
    fn test_plain() {
        let c = counter();
        assert_eq!(c.repeat.count(), 1);
        assert!(!c.has_back);
        assert!(!c.end_box);
        assert!(c.back.is_none());
    }

    #[test]
    fn test_back_is_created_once_with_same_policy() {
        let mut c = Counter::new(RepeatPolicy::new(RepeatKind::MinFillRow, 3)).at_row(7);
        c.back_mut().add_part("b");
        c.back_mut().add_part("c");
        let back = c.back.as_ref().unwrap();
        assert_eq!(back.parts, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(back.repeat.kind(), RepeatKind::MinFillRow);
        assert_eq!(back.repeat.count(), 3);
        assert_eq!(back.row, 7);
        assert!(!back.end_box);
    }

    #[test]
    fn test_inclusion_precedence() {
        let mut c = counter();
        c.exclude_id("e*");
        assert!(!c.is_included(Some("e-one")));
        c.include_id("e-one");
        assert!(c.is_included(Some("e-one")));
        assert!(!c.is_included(Some("e-two")));
        assert!(c.is_included(Some("other")));
        assert!(c.is_included(None));
        assert!(c.is_included(Some("")));
    }

    #[test]
    fn test_exclude_ids_are_a_set() {
        let mut c = counter();
        c.exclude_id("e");
        c.exclude_id("e");
        assert_eq!(c.exclude_patterns(), vec!["e"]);
    }

    #[test]
    fn test_substitutions_keep_insertion_order() {
        let mut c = counter();
        c.add_substitution("b", "1");
        c.add_substitution("a", "2");
        c.add_substitution("b", "3");
        let pairs: Vec<_> = c.substitutions.iter().collect();
        assert_eq!(pairs, vec![("b", "3"), ("a", "2")]);
    }

    #[test]
    fn test_substitution_glob_lookup() {
        let mut c = counter();
        c.add_substitution("label*", "X");
        assert_eq!(c.substitutions.matching("label-top"), Some("X"));
        assert_eq!(c.substitutions.matching("name"), None);
    }

    #[test]
    fn test_placeholders() {
        let mut c = counter();
        c.add_substitution("name", "Rifle");
        c.add_substitution("bad name", "x");
        assert_eq!(c.substitute_placeholders("%name% %bad name%"), "Rifle %bad name%");
        assert!(is_placeholder_name("ABC_DEF.-GHIabc09zZ"));
        assert!(!is_placeholder_name(""));
        assert!(!is_placeholder_name("A%BC"));
        assert!(!is_placeholder_name("A&"));
    }

    #[test]
    fn test_resolve_style() {
        let mut c = counter();
        c.add_attribute("bg*", "style:fill", AttributeValue::Text("red".into()));
        c.add_attribute("bg*", "style:stroke", AttributeValue::Reference("g1".into()));
        c.add_attribute("bg*", "width", AttributeValue::Text("3".into()));
        assert_eq!(
            c.resolve_style("bg-1", "fill:#000;stroke:none;opacity:1"),
            "fill:red;stroke:url(#g1);opacity:1;"
        );
        assert_eq!(c.resolve_style("fg", "fill:#000"), "fill:#000");
    }

    #[test]
    fn test_autonumber_reaches_back() {
        let mut c = counter();
        c.back_mut();
        c.set_autonumber(4);
        assert_eq!(c.substitutions.get(AUTONUMBER), Some("4"));
        assert_eq!(c.back.as_ref().unwrap().substitutions.get(AUTONUMBER), Some("4"));
    }
}
