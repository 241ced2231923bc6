//! Repeat policies
//!
//! A counter is emitted until its policy says stop. `Exact` counts down;
//! the min-fill kinds count down too but keep going until the placement that
//! reaches (or passes) the count also closes a row, box or sheet. The layout
//! engine is the only caller of [`RepeatPolicy::added_one`].
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatKind {
    Exact,
    MinFillRow,
    MinFillBox,
    MinFillSheet,
}

/// Which boundaries the last placement closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Boundaries {
    pub last_on_row: bool,
    pub last_in_box: bool,
    pub last_on_sheet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatPolicy {
    kind: RepeatKind,
    count: i64,
    remaining: i64,
    keep_going: bool,
}

impl RepeatPolicy {
    pub fn new(kind: RepeatKind, count: i64) -> Self {
        RepeatPolicy {
            kind,
            count,
            remaining: count,
            keep_going: kind != RepeatKind::Exact,
        }
    }

    pub fn exact(count: i64) -> Self {
        Self::new(RepeatKind::Exact, count)
    }

    pub fn kind(&self) -> RepeatKind {
        self.kind
    }

    /// The count the policy was created with.
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn can_add_another(&self) -> bool {
        self.remaining > 0 || self.keep_going
    }

    pub fn added_one(&mut self, boundaries: Boundaries) {
        self.remaining -= 1;
        let closed = match self.kind {
            RepeatKind::Exact => true,
            RepeatKind::MinFillRow => boundaries.last_on_row,
            RepeatKind::MinFillBox => boundaries.last_in_box,
            RepeatKind::MinFillSheet => boundaries.last_on_sheet,
        };
        if closed && self.remaining <= 0 {
            self.keep_going = false;
        }
    }

    /// A fresh copy with the original count, used for backs.
    pub fn restarted(&self) -> Self {
        Self::new(self.kind, self.count)
    }
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        Self::exact(1)
    }
}
