//! Settings: one-shot commands produced by a header node for a single cell
//! and applied to a counter (and, when copied to back, to its back as well).
use super::Counter;
use serde::Serialize;

/// Value side of an attribute override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum AttributeValue {
    /// Literal attribute or style property value
    Text(String),
    /// `url(#id)` reference to a colour or gradient definition
    Reference(String),
    /// Copy `property` from the inline style of template element `element`.
    /// Only left unresolved when the template does not carry that style.
    CopyStyle { element: String, property: String },
}

impl AttributeValue {
    /// The value to write, when it is known without the template.
    pub fn literal(&self) -> Option<String> {
        match self {
            AttributeValue::Text(v) => Some(v.clone()),
            AttributeValue::Reference(id) => Some(format!("url(#{})", id)),
            AttributeValue::CopyStyle { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// Add a template part (`@` prefix: keep the look, drop the rectangle)
    Part(String),
    /// Exclude `id`, explicitly re-including each of `exceptions`
    Exclude { id: String, exceptions: Vec<String> },
    Attribute {
        id: String,
        name: String,
        value: AttributeValue,
    },
    Subst { name: String, value: String },
    Id(String),
}

impl Setting {
    pub fn apply_to(&self, counter: &mut Counter) {
        match self {
            Setting::Part(part) => counter.add_part(part),
            Setting::Exclude { id, exceptions } => {
                counter.exclude_id(id);
                for e in exceptions {
                    counter.include_id(e);
                }
            }
            Setting::Attribute { id, name, value } => counter.add_attribute(id, name, value.clone()),
            Setting::Subst { name, value } => counter.add_substitution(name, value),
            Setting::Id(id) => counter.id = Some(id.clone()),
        }
    }
}

/// What a header node made of one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingHolder {
    pub setting: Option<Setting>,
    pub copy_to_back: bool,
    /// Set by the `BACK` column; the factory decides from the cell value
    /// whether to switch to the back or stop reading the row
    pub back: bool,
}

impl SettingHolder {
    pub fn set(&mut self, setting: Setting) {
        self.setting = Some(setting);
    }

    pub fn set_copy_to_back(&mut self) {
        self.copy_to_back = true;
    }

    pub fn set_back(&mut self) {
        self.back = true;
    }

    /// Apply to `counter`; a copy-to-back holder also creates (once) and
    /// updates the back, even when it carries no setting.
    pub fn apply_to(&self, counter: &mut Counter) {
        if let Some(setting) = &self.setting {
            setting.apply_to(counter);
        }
        if self.copy_to_back {
            let back = counter.back_mut();
            if let Some(setting) = &self.setting {
                setting.apply_to(back);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::RepeatPolicy;

    fn holder(setting: Setting) -> SettingHolder {
        let mut h = SettingHolder::default();
        h.set(setting);
        h
    }

    #[test]
    fn test_part() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        holder(Setting::Part("p".into())).apply_to(&mut c);
        assert_eq!(c.parts, vec!["p".to_string()]);
        assert!(!c.has_back);
        assert!(c.back.is_none());
    }

    #[test]
    fn test_exclude() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        holder(Setting::Exclude {
            id: "i".into(),
            exceptions: vec![],
        })
        .apply_to(&mut c);
        assert_eq!(c.exclude_patterns(), vec!["i"]);
        assert!(c.back.is_none());
    }

    #[test]
    fn test_attribute() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        holder(Setting::Attribute {
            id: "i".into(),
            name: "a".into(),
            value: AttributeValue::Text("s".into()),
        })
        .apply_to(&mut c);
        assert_eq!(
            c.attribute("i", "a"),
            Some(&AttributeValue::Text("s".into()))
        );
    }

    #[test]
    fn test_id() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        holder(Setting::Id("i".into())).apply_to(&mut c);
        assert_eq!(c.id.as_deref(), Some("i"));
    }

    #[test]
    fn test_copy_to_back_creates_back_without_flagging_it() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        let mut h = holder(Setting::Subst {
            name: "n".into(),
            value: "v".into(),
        });
        h.set_copy_to_back();
        h.apply_to(&mut c);
        assert_eq!(c.substitutions.get("n"), Some("v"));
        assert!(!c.has_back);
        let back = c.back.as_ref().expect("back created");
        assert_eq!(back.substitutions.get("n"), Some("v"));
    }

    #[test]
    fn test_copy_to_back_twice_keeps_one_back() {
        let mut c = Counter::new(RepeatPolicy::exact(1));
        let mut h = holder(Setting::Part("p".into()));
        h.set_copy_to_back();
        h.apply_to(&mut c);
        h.apply_to(&mut c);
        let back = c.back.as_ref().expect("back created");
        assert!(back.back.is_none());
        assert_eq!(back.parts, vec!["p".to_string(), "p".to_string()]);
    }

    #[test]
    fn test_reference_literal() {
        assert_eq!(
            AttributeValue::Reference("grad".into()).literal().as_deref(),
            Some("url(#grad)")
        );
    }
}
