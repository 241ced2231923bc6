//! Header grammar
//!
//! A header row compiles into one [`HeaderNode`] per column. Classification
//! is by prefix/suffix markers, first match wins:
//!
//! | header        | node                                              |
//! |---------------|---------------------------------------------------|
//! | `…>`          | copy-to-back decorator around the rest            |
//! | `+name`       | add part `name` (or the cell value)               |
//! | `@name`       | add part without its rectangle                    |
//! | `id?`         | option: keep `id` only on a yes value             |
//! | `id-?`        | multi option: exclude `id`, re-include `id-<word>` |
//! | `id[attr]`    | attribute override                                |
//! | `ID`          | counter id                                        |
//! | `BACK`        | switch the rest of the row to the back            |
//! | `head=dflt`   | default-value decorator around `head`             |
//! | anything else | text substitution                                 |
//!
//! Column 0 is the background column and only knows `>` and `@`.
//! Malformed headers never fail; they fall through to a substitution.

use crate::counter::style::style_property;
use crate::counter::{AttributeValue, Setting, SettingHolder};
use crate::template::Template;

pub const COPY_TO_BACK_MARKER: char = '>';
pub const ADD_PART_MARKER: char = '+';
pub const WITHOUT_RECTANGLE_MARKER: char = '@';
pub const ID_HEADER: &str = "ID";
pub const BACK_HEADER: &str = "BACK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderNode {
    /// Blank header cell, the column is ignored
    Empty,
    /// Column 0: a part every counter of the block gets, the cell itself
    /// holds the repeat count
    Background { part: String },
    Part { name: String, without_rectangle: bool },
    Option { id: String },
    MultiOption { id: String },
    Attribute { element: String, attribute: String },
    Id,
    Back,
    Subst { name: String },
    CopyToBack(Box<HeaderNode>),
    DefaultValue { default: String, inner: Box<HeaderNode> },
}

/// Classify a header cell of any column but the first.
pub fn classify(header: &str) -> HeaderNode {
    if header.is_empty() {
        return HeaderNode::Empty;
    }
    if let Some(rest) = header.strip_suffix(COPY_TO_BACK_MARKER) {
        return HeaderNode::CopyToBack(Box::new(classify(rest)));
    }
    if let Some(rest) = header.strip_prefix(ADD_PART_MARKER) {
        return HeaderNode::Part {
            name: rest.to_string(),
            without_rectangle: false,
        };
    }
    if let Some(rest) = header.strip_prefix(WITHOUT_RECTANGLE_MARKER) {
        return HeaderNode::Part {
            name: rest.to_string(),
            without_rectangle: true,
        };
    }
    if let Some(id) = header.strip_suffix("-?") {
        if !id.is_empty() {
            return HeaderNode::MultiOption { id: id.to_string() };
        }
    }
    if let Some(id) = header.strip_suffix('?') {
        if !id.is_empty() && !id.ends_with('-') {
            return HeaderNode::Option { id: id.to_string() };
        }
    }
    if let Some((element, attribute)) = split_attribute(header) {
        return HeaderNode::Attribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        };
    }
    if header == ID_HEADER {
        return HeaderNode::Id;
    }
    if header == BACK_HEADER {
        return HeaderNode::Back;
    }
    if let Some((head, default)) = split_default(header) {
        return HeaderNode::DefaultValue {
            default: default.to_string(),
            inner: Box::new(classify(head)),
        };
    }
    HeaderNode::Subst {
        name: header.to_string(),
    }
}

/// Classify the first header cell of a row.
pub fn classify_background(header: &str) -> HeaderNode {
    if let Some(rest) = header.strip_suffix(COPY_TO_BACK_MARKER) {
        return HeaderNode::CopyToBack(Box::new(classify_background(rest)));
    }
    let part = match header.strip_prefix(WITHOUT_RECTANGLE_MARKER) {
        Some("") => return HeaderNode::Empty,
        Some(_) => header,
        None if header.is_empty() => return HeaderNode::Empty,
        None => header,
    };
    HeaderNode::Background {
        part: part.to_string(),
    }
}

/// `name[attr]` with a non-empty name.
fn split_attribute(header: &str) -> Option<(&str, &str)> {
    let body = header.strip_suffix(']')?;
    let open = body.find('[')?;
    if open == 0 || header.len() <= 2 {
        return None;
    }
    Some((&body[..open], &body[open + 1..]))
}

/// `head=default` split at the first `=`, which must not open the header.
fn split_default(header: &str) -> Option<(&str, &str)> {
    if header.chars().count() < 3 {
        return None;
    }
    match header.find('=') {
        Some(i) if i > 0 => Some((&header[..i], &header[i + 1..])),
        _ => None,
    }
}

/// `y`, `yes` or `x`, any case.
pub fn is_yes(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "y" | "yes" | "x")
}

impl HeaderNode {
    /// The header text this node was built from, markers stripped.
    pub fn name(&self) -> &str {
        match self {
            HeaderNode::Empty => "",
            HeaderNode::Background { part } => part,
            HeaderNode::Part { name, .. } => name,
            HeaderNode::Option { id } | HeaderNode::MultiOption { id } => id,
            HeaderNode::Attribute { element, .. } => element,
            HeaderNode::Id => ID_HEADER,
            HeaderNode::Back => BACK_HEADER,
            HeaderNode::Subst { name } => name,
            HeaderNode::CopyToBack(inner) => inner.name(),
            HeaderNode::DefaultValue { inner, .. } => inner.name(),
        }
    }

    /// Turn one cell into a setting. `value` is `None` when the row is
    /// shorter than the header row.
    pub fn fill_setting(&self, holder: &mut SettingHolder, value: Option<&str>, template: &Template) {
        match self {
            HeaderNode::Empty => {}
            HeaderNode::Background { part } => holder.set(Setting::Part(part.clone())),
            HeaderNode::Part {
                name,
                without_rectangle,
            } => {
                let part = match value {
                    Some(v) if !v.is_empty() => v,
                    _ => name.as_str(),
                };
                if part.is_empty() {
                    return;
                }
                let part = if *without_rectangle {
                    format!("{}{}", WITHOUT_RECTANGLE_MARKER, part)
                } else {
                    part.to_string()
                };
                holder.set(Setting::Part(part));
            }
            HeaderNode::Option { id } => {
                if !value.is_some_and(is_yes) {
                    holder.set(Setting::Exclude {
                        id: id.clone(),
                        exceptions: Vec::new(),
                    });
                }
            }
            HeaderNode::MultiOption { id } => {
                let exceptions = value
                    .unwrap_or("")
                    .split_whitespace()
                    .map(|suffix| format!("{}-{}", id, suffix))
                    .collect();
                holder.set(Setting::Exclude {
                    id: id.clone(),
                    exceptions,
                });
            }
            HeaderNode::Attribute { element, attribute } => {
                let value = attribute_value(attribute, value.unwrap_or(""), template);
                holder.set(Setting::Attribute {
                    id: element.clone(),
                    name: attribute.clone(),
                    value,
                });
            }
            HeaderNode::Id => {
                if let Some(id) = value.filter(|v| !v.is_empty()) {
                    holder.set(Setting::Id(id.to_string()));
                }
            }
            HeaderNode::Back => holder.set_back(),
            HeaderNode::Subst { name } => {
                if let Some(value) = value {
                    holder.set(Setting::Subst {
                        name: name.clone(),
                        value: value.to_string(),
                    });
                }
            }
            HeaderNode::CopyToBack(inner) => {
                holder.set_copy_to_back();
                inner.fill_setting(holder, value, template);
            }
            HeaderNode::DefaultValue { default, inner } => {
                let value = match value {
                    Some(v) if !v.is_empty() => v,
                    _ => default.as_str(),
                };
                inner.fill_setting(holder, Some(value), template);
            }
        }
    }
}

fn attribute_value(attribute: &str, value: &str, template: &Template) -> AttributeValue {
    let property = attribute.strip_prefix("style:").unwrap_or(attribute);
    if let Some(element) = value.strip_prefix('<') {
        let copied = template
            .style_of(element)
            .and_then(|style| style_property(style, property));
        return match copied {
            Some(v) => AttributeValue::Text(v.to_string()),
            None => AttributeValue::CopyStyle {
                element: element.to_string(),
                property: property.to_string(),
            },
        };
    }
    if matches!(property, "fill" | "stroke") && template.has_definition(value) {
        return AttributeValue::Reference(value.to_string());
    }
    AttributeValue::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subst(name: &str) -> HeaderNode {
        HeaderNode::Subst {
            name: name.to_string(),
        }
    }

    fn setting(node: &HeaderNode, value: Option<&str>) -> SettingHolder {
        let mut holder = SettingHolder::default();
        node.fill_setting(&mut holder, value, &Template::default());
        holder
    }

    #[test]
    fn test_plain_identifier_is_subst() {
        assert_eq!(classify("name"), subst("name"));
        assert_eq!(classify("a"), subst("a"));
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            classify("@"),
            HeaderNode::Part {
                name: String::new(),
                without_rectangle: true
            }
        );
        assert_eq!(
            classify("+unit"),
            HeaderNode::Part {
                name: "unit".into(),
                without_rectangle: false
            }
        );
        assert_eq!(classify("e?"), HeaderNode::Option { id: "e".into() });
        assert_eq!(classify("e-?"), HeaderNode::MultiOption { id: "e".into() });
        assert_eq!(
            classify("bg[style:fill]"),
            HeaderNode::Attribute {
                element: "bg".into(),
                attribute: "style:fill".into()
            }
        );
        assert_eq!(classify("ID"), HeaderNode::Id);
        assert_eq!(classify("BACK"), HeaderNode::Back);
    }

    #[test]
    fn test_copy_to_back_wraps_anything() {
        assert_eq!(
            classify("@>"),
            HeaderNode::CopyToBack(Box::new(HeaderNode::Part {
                name: String::new(),
                without_rectangle: true
            }))
        );
        assert_eq!(
            classify("e?>"),
            HeaderNode::CopyToBack(Box::new(HeaderNode::Option { id: "e".into() }))
        );
    }

    #[test]
    fn test_default_value() {
        assert_eq!(
            classify("e=d"),
            HeaderNode::DefaultValue {
                default: "d".into(),
                inner: Box::new(subst("e"))
            }
        );
        assert_eq!(
            classify("bg[fill]=red"),
            HeaderNode::DefaultValue {
                default: "red".into(),
                inner: Box::new(HeaderNode::Attribute {
                    element: "bg".into(),
                    attribute: "fill".into()
                })
            }
        );
        // Too short, or '=' first
        assert_eq!(classify("e="), subst("e="));
        assert_eq!(classify("=ab"), subst("=ab"));
    }

    #[test]
    fn test_degenerate_headers_fall_back_to_subst() {
        assert_eq!(classify("?"), subst("?"));
        assert_eq!(classify("-?"), subst("-?"));
        assert_eq!(classify("[a]"), subst("[a]"));
        assert_eq!(classify("id"), subst("id"));
    }

    #[test]
    fn test_background_column() {
        assert_eq!(classify_background(""), HeaderNode::Empty);
        assert_eq!(
            classify_background("b>"),
            HeaderNode::CopyToBack(Box::new(HeaderNode::Background { part: "b".into() }))
        );
        assert_eq!(
            classify_background("@frame"),
            HeaderNode::Background {
                part: "@frame".into()
            }
        );
        // No other markers apply to column 0
        assert_eq!(
            classify_background("e?"),
            HeaderNode::Background { part: "e?".into() }
        );
    }

    #[test]
    fn test_part_prefers_cell_value() {
        let node = classify("+unit");
        assert_eq!(setting(&node, Some("")).setting, Some(Setting::Part("unit".into())));
        assert_eq!(setting(&node, None).setting, Some(Setting::Part("unit".into())));
        assert_eq!(setting(&node, Some("hq")).setting, Some(Setting::Part("hq".into())));
        assert_eq!(setting(&classify("@"), Some("")).setting, None);
        assert_eq!(setting(&classify("@"), Some("e")).setting, Some(Setting::Part("@e".into())));
    }

    #[test]
    fn test_option_values() {
        let node = classify("e?");
        for yes in ["y", "Y", "yes", "YES", "x", "X"] {
            assert_eq!(setting(&node, Some(yes)).setting, None, "{}", yes);
        }
        for no in ["", "n", "no"] {
            assert!(setting(&node, Some(no)).setting.is_some(), "{}", no);
        }
        assert!(setting(&node, None).setting.is_some());
    }

    #[test]
    fn test_id_empty_is_noop() {
        assert_eq!(setting(&HeaderNode::Id, Some("")).setting, None);
        assert_eq!(setting(&HeaderNode::Id, None).setting, None);
        assert_eq!(setting(&HeaderNode::Id, Some("u1")).setting, Some(Setting::Id("u1".into())));
    }

    #[test]
    fn test_attribute_values() {
        let template = Template::default()
            .with_style("red-swatch", "stroke:none;fill:#ff0000")
            .with_definition("grad");
        let resolve = |header: &str, value: &str| {
            let mut holder = SettingHolder::default();
            classify(header).fill_setting(&mut holder, Some(value), &template);
            match holder.setting {
                Some(Setting::Attribute { value, .. }) => value,
                other => panic!("unexpected {:?}", other),
            }
        };
        assert_eq!(resolve("bg[style:fill]", "<red-swatch"), AttributeValue::Text("#ff0000".into()));
        assert_eq!(
            resolve("bg[style:fill]", "<missing"),
            AttributeValue::CopyStyle {
                element: "missing".into(),
                property: "fill".into()
            }
        );
        assert_eq!(resolve("bg[style:fill]", "grad"), AttributeValue::Reference("grad".into()));
        assert_eq!(resolve("bg[stroke]", "grad"), AttributeValue::Reference("grad".into()));
        assert_eq!(resolve("bg[width]", "grad"), AttributeValue::Text("grad".into()));
        assert_eq!(resolve("bg[style:fill]", "blue"), AttributeValue::Text("blue".into()));
    }
}
