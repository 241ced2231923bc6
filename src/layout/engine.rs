//! Greedy placement
//!
//! [`LayoutState`] holds the cursor of the engine: the current sheet and box,
//! the column/row origin inside the box, the registration mark offsets of
//! the box, and the backs waiting for their box to fill. [`LayoutState::place_next`]
//! performs one placement and reports which boundaries it closed; the
//! caller keeps calling it while the counter's repeat policy allows.
use super::geometry::{Rect, Size};
use super::marks::RegistrationMarks;
use super::plan::{LayoutPlan, Placement, Sheet, Side};
use super::renderer::{PlacementRequest, Renderer};
use super::{LayoutError, LayoutSettings};
use crate::counter::{Boundaries, Counter, PlacementRecord, RepeatKind, AUTONUMBER};

/// A front waiting for its back to be placed. `x` is the right edge of the
/// front, which becomes the left edge of the mirrored back.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingBack {
    counter: usize,
    x: f64,
    y: f64,
    autonumber: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    pub placement: Placement,
    pub boundaries: Boundaries,
}

#[derive(Debug)]
pub struct LayoutState<'a> {
    boxes: &'a [Rect],
    settings: &'a LayoutSettings,
    box_index: usize,
    colx: f64,
    rowy: f64,
    next_row_y: f64,
    marks: RegistrationMarks,
    pending_backs: Vec<PendingBack>,
    autonumber: usize,
    sheets: Vec<Sheet>,
}

impl<'a> LayoutState<'a> {
    pub fn new(boxes: &'a [Rect], settings: &'a LayoutSettings) -> Result<Self, LayoutError> {
        let first = *boxes.first().ok_or(LayoutError::NoBoxes)?;
        Ok(LayoutState {
            boxes,
            settings,
            box_index: 0,
            colx: 0.0,
            rowy: 0.0,
            next_row_y: 0.0,
            marks: RegistrationMarks::new(first),
            pending_backs: Vec::new(),
            autonumber: 0,
            sheets: Vec::new(),
        })
    }

    pub fn box_index(&self) -> usize {
        self.box_index
    }

    /// Column and row origin inside the current box.
    pub fn cursor(&self) -> (f64, f64) {
        (self.colx, self.rowy)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Place one copy of `counters[index]`.
    pub fn place_next<R>(
        &mut self,
        counters: &mut [Counter],
        index: usize,
        renderer: &mut R,
    ) -> Result<PlacementResult, LayoutError>
    where
        R: Renderer + ?Sized,
    {
        if self.sheets.is_empty() || self.box_index == self.boxes.len() {
            self.start_sheet();
        }
        let area = self.boxes[self.box_index];
        let settings = self.settings;
        let spacing = settings.spacing;
        let margin = settings.box_margin;

        self.autonumber += 1;
        let counter = &mut counters[index];
        counter.set_autonumber(self.autonumber);
        let (x, y) = (area.x + self.colx, area.y + self.rowy);
        let size = renderer.place(&PlacementRequest {
            counter: &*counter,
            side: Side::Front,
            x,
            y,
            rotation: settings.front_rotation,
        })?;
        check_progress(counter, size, spacing)?;
        counter.runtime.measured = Some(size);

        let first_column = self.colx == 0.0;
        let first_row = self.rowy == 0.0;

        self.marks.add_x(self.colx);
        self.marks.add_x(self.colx + size.width);
        if self.rowy + size.height + spacing > self.next_row_y {
            self.next_row_y = self.rowy + size.height + spacing;
        }
        // Top and bottom edge of the counter; rows start below the spacing gap
        self.marks.add_y(self.rowy);
        self.marks.add_y(self.rowy + size.height);

        if counter.has_back {
            self.pending_backs.push(PendingBack {
                counter: index,
                x: x + size.width,
                y,
                autonumber: self.autonumber,
            });
        }

        self.colx += size.width + spacing;

        let mut boundaries = Boundaries::default();
        if self.colx + size.width > area.w + margin || counter.end_row || counter.end_box {
            boundaries.last_on_row = true;
            self.colx = 0.0;
            self.rowy = self.next_row_y;
            self.next_row_y = self.rowy;
            log::trace!("row closed at y={}", self.rowy);

            if self.next_row_y + size.height > area.h + margin || counter.end_box {
                boundaries.last_in_box = true;
                boundaries.last_on_sheet = self.box_index + 1 == self.boxes.len();
            }
        }

        let sheet = self.sheets.len();
        counter.runtime.placements.push(PlacementRecord {
            sheet,
            box_index: self.box_index,
            x,
            y,
            autonumber: self.autonumber,
            first_column,
            first_row,
            last_column: boundaries.last_on_row,
        });
        counter.added_one(boundaries);

        let placement = Placement {
            counter: index,
            row: counter.row,
            id: counter.id.clone(),
            side: Side::Front,
            autonumber: self.autonumber,
            box_index: self.box_index,
            x,
            y,
            rotation: settings.front_rotation,
            size,
        };
        self.current_sheet().front.push(placement.clone());
        log::trace!(
            "counter {} #{} at {},{} size {}x{}",
            index,
            self.autonumber,
            x,
            y,
            size.width,
            size.height
        );

        if boundaries.last_in_box {
            self.close_box(counters, renderer)?;
        }
        Ok(PlacementResult {
            placement,
            boundaries,
        })
    }

    /// Flush what is left: pending backs and the marks of a partly filled box.
    pub fn finish<R>(mut self, counters: &mut [Counter], renderer: &mut R) -> Result<LayoutPlan, LayoutError>
    where
        R: Renderer + ?Sized,
    {
        if self.marks.has_marks() && self.sheets.last().is_some_and(|s| !s.is_empty()) {
            self.emit_marks();
        }
        self.flush_backs(counters, renderer)?;

        let mut export_ids: Vec<String> = Vec::new();
        for counter in counters.iter().filter(|c| !c.runtime.placements.is_empty()) {
            let ids = std::iter::once(counter).chain(counter.back.as_deref());
            for id in ids.filter_map(|c| c.id.as_deref()) {
                if !id.is_empty() && !export_ids.iter().any(|e| e == id) {
                    export_ids.push(id.to_string());
                }
            }
        }
        Ok(LayoutPlan {
            sheets: self.sheets,
            export_ids,
        })
    }

    fn start_sheet(&mut self) {
        let number = self.sheets.len() + 1;
        log::debug!("starting sheet {}", number);
        self.sheets.push(Sheet::new(number));
        self.box_index = 0;
        self.marks = RegistrationMarks::new(self.boxes[0]);
    }

    fn current_sheet(&mut self) -> &mut Sheet {
        if self.sheets.is_empty() {
            self.start_sheet();
        }
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    fn close_box<R>(&mut self, counters: &mut [Counter], renderer: &mut R) -> Result<(), LayoutError>
    where
        R: Renderer + ?Sized,
    {
        log::debug!(
            "box {} of sheet {} full",
            self.box_index + 1,
            self.sheets.len()
        );
        self.flush_backs(counters, renderer)?;
        self.emit_marks();
        self.box_index += 1;
        self.colx = 0.0;
        self.rowy = 0.0;
        self.next_row_y = 0.0;
        if let Some(next) = self.boxes.get(self.box_index) {
            self.marks = RegistrationMarks::new(*next);
        }
        Ok(())
    }

    fn emit_marks(&mut self) {
        let len = self.settings.registration_marks_len;
        let marks = std::mem::replace(&mut self.marks, RegistrationMarks::new(self.boxes[0]));
        let lines = marks.lines(len);
        let sheet = self.current_sheet();
        sheet.mark_lines.extend(lines);
        sheet.marks.push(marks);
    }

    /// Place every pending back mirrored across the sheet width.
    fn flush_backs<R>(&mut self, counters: &mut [Counter], renderer: &mut R) -> Result<(), LayoutError>
    where
        R: Renderer + ?Sized,
    {
        let pending = std::mem::take(&mut self.pending_backs);
        if pending.is_empty() {
            return Ok(());
        }
        log::debug!("placing {} backs", pending.len());
        let settings = self.settings;
        let sheet_number = self.sheets.len();
        for entry in pending {
            let front = &mut counters[entry.counter];
            let row = front.row;
            let back = front.back_mut();
            back.add_substitution(AUTONUMBER, &entry.autonumber.to_string());
            let x = settings.sheet_width - entry.x;
            let size = renderer.place(&PlacementRequest {
                counter: &*back,
                side: Side::Back,
                x,
                y: entry.y,
                rotation: settings.back_rotation,
            })?;
            back.runtime.measured = Some(size);
            back.runtime.placements.push(PlacementRecord {
                sheet: sheet_number,
                box_index: self.box_index,
                x,
                y: entry.y,
                autonumber: entry.autonumber,
                first_column: false,
                first_row: false,
                last_column: false,
            });
            let placement = Placement {
                counter: entry.counter,
                row,
                id: back.id.clone(),
                side: Side::Back,
                autonumber: entry.autonumber,
                box_index: self.box_index,
                x,
                y: entry.y,
                rotation: settings.back_rotation,
                size,
            };
            let sheet = self.current_sheet();
            if settings.one_sided {
                sheet.front.push(placement);
            } else {
                sheet.back.push(placement);
            }
        }
        Ok(())
    }
}

/// A min-fill counter must move the cursor, or its row (box) never ends.
fn check_progress(counter: &Counter, size: Size, spacing: f64) -> Result<(), LayoutError> {
    let advances_column = size.width + spacing > 0.0;
    let advances_row = size.height + spacing > 0.0;
    let closes_rows = advances_column || counter.end_row || counter.end_box;
    let closes_boxes = (closes_rows && advances_row) || counter.end_box;
    let degenerate = match counter.repeat.kind() {
        RepeatKind::Exact => false,
        RepeatKind::MinFillRow => !closes_rows,
        RepeatKind::MinFillBox | RepeatKind::MinFillSheet => !closes_boxes,
    };
    if degenerate {
        return Err(LayoutError::DegenerateCounter { row: counter.row });
    }
    Ok(())
}
