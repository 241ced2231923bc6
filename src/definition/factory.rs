//! Counter factory: the compiled header row of one block, turning each data
//! row of that block into a [`Counter`].
use super::header::{self, HeaderNode, BACK_HEADER};
use crate::counter::{Counter, RepeatPolicy, SettingHolder};
use crate::tabular;
use crate::template::Template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFactory {
    headers: Vec<HeaderNode>,
    has_back: bool,
}

/// Where the settings of the row currently go.
struct RowTargets {
    front: Counter,
    on_back: bool,
}

impl RowTargets {
    fn switch_to_back(&mut self) {
        self.front.has_back = true;
        self.front.back_mut();
        self.on_back = true;
    }

    fn apply(&mut self, holder: &SettingHolder) {
        if !self.on_back {
            holder.apply_to(&mut self.front);
            return;
        }
        // Already on the back: copy-to-back has nowhere further to go
        if let Some(setting) = &holder.setting {
            setting.apply_to(self.front.back_mut());
        }
    }
}

impl CounterFactory {
    pub fn from_header_row(row: &[String]) -> Self {
        let headers = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == 0 {
                    header::classify_background(cell)
                } else {
                    header::classify(cell)
                }
            })
            .collect();
        CounterFactory {
            headers,
            has_back: false,
        }
    }

    pub fn headers(&self) -> &[HeaderNode] {
        &self.headers
    }

    /// True once any row built by this factory switched to a back.
    pub fn has_back(&self) -> bool {
        self.has_back
    }

    /// Build one counter from `row`. Header columns beyond the end of the
    /// row see no value; a `BACK` column without a switch value ends the row.
    pub fn create_counter(
        &mut self,
        repeat: RepeatPolicy,
        row: &[String],
        row_number: usize,
        template: &Template,
    ) -> Counter {
        let mut targets = RowTargets {
            front: Counter::new(repeat).at_row(row_number),
            on_back: false,
        };
        for (i, node) in self.headers.iter().enumerate() {
            let value = tabular::cell(row, i);
            let mut holder = SettingHolder::default();
            node.fill_setting(&mut holder, value, template);
            if holder.back {
                if !value.is_some_and(is_back_switch) {
                    log::trace!("row {}: {} column stops the row", row_number, BACK_HEADER);
                    break;
                }
                if !targets.on_back {
                    targets.switch_to_back();
                }
                self.has_back = true;
                continue;
            }
            targets.apply(&holder);
        }
        targets.front
    }
}

fn is_back_switch(value: &str) -> bool {
    value == BACK_HEADER || header::is_yes(value)
}
