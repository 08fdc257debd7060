//! Row-by-row pagination and drawing.
//!
//! The driver walks body rows against the space left on the current page and
//! picks one of three outcomes per row: print it whole, split it at a line
//! boundary (printing a truncated copy now and carrying a synthetic
//! remainder row to the next page), or defer it whole. Head and foot
//! sections are re-emitted per page according to their visibility policy,
//! and a border box is closed out once per page.

use std::collections::BTreeMap;

use crate::cell::{Cell, Section};
use crate::column::Column;
use crate::draw::{BorderFrame, DrawTarget, Pos};
use crate::error::TableError;
use crate::hooks::{self, CellContext, Control, PageContext};
use crate::row::{section_height, Row, REMAINDER_ROW_INDEX};
use crate::table::{PageBreak, RowPageBreak, Settings, ShowFoot, ShowHead, Table};
use crate::units::Mm;

pub(crate) fn paginate(table: &mut Table, target: &mut dyn DrawTarget) -> Result<(), TableError> {
    let (_, page_height) = target.page_size();
    let head = std::mem::take(&mut table.head);
    let mut body = std::mem::take(&mut table.body);
    let foot = std::mem::take(&mut table.foot);
    let hooks = std::mem::take(&mut table.hooks);

    let head_height = section_height(&head, &table.columns);
    let foot_height = section_height(&foot, &table.columns);
    let cursor = Pos {
        x: table.settings.margin.left,
        y: table.settings.start_y,
    };

    let mut driver = Driver {
        target,
        settings: table.settings.clone(),
        columns: table.columns.clone(),
        hooks,
        head,
        foot,
        page_number: table.page_number,
        page_height,
        cursor,
        start_pos: Pos::default(),
        head_height,
        foot_height,
    };
    let result = driver.run(&mut body);

    table.head = driver.head;
    table.body = body;
    table.foot = driver.foot;
    table.hooks = driver.hooks;
    table.page_number = driver.page_number;
    result
}

struct Driver<'a> {
    target: &'a mut dyn DrawTarget,
    settings: Settings,
    columns: Vec<Column>,
    hooks: hooks::Hooks,
    head: Vec<Row>,
    foot: Vec<Row>,
    page_number: u32,
    page_height: Mm,
    cursor: Pos,
    /// Where the current page's row group started; the border box spans from
    /// here down to the cursor.
    start_pos: Pos,
    head_height: Mm,
    foot_height: Mm,
}

impl Driver<'_> {
    fn run(&mut self, body: &mut [Row]) -> Result<(), TableError> {
        // decide whether the table starts on the current page at all
        let mut min_bottom = self.settings.start_y
            + self.settings.margin.bottom
            + self.head_height
            + self.foot_height;
        if self.settings.page_break == PageBreak::Avoid {
            let body_height: Mm = body.iter().map(|row| row.height).sum();
            min_bottom += body_height;
        }
        if self.settings.page_break == PageBreak::Always || min_bottom > self.page_height {
            self.target.next_page()?;
            self.cursor.y = self.settings.margin.top;
        }
        self.will_draw_page();
        self.start_pos = self.cursor;

        if matches!(
            self.settings.show_head,
            ShowHead::FirstPage | ShowHead::EveryPage
        ) {
            self.print_section(SectionRows::Head)?;
        }

        let last_index = body.len() as i32 - 1;
        for row in body.iter_mut() {
            let is_last_row = row.index == last_index;
            self.print_full_row(row, is_last_row)?;
        }

        if matches!(
            self.settings.show_foot,
            ShowFoot::LastPage | ShowFoot::EveryPage
        ) {
            self.print_section(SectionRows::Foot)?;
        }

        self.draw_border()?;
        self.did_draw_page();
        Ok(())
    }

    /// Print one row, deciding between printing whole, splitting at a line
    /// boundary, or deferring to the next page; recurses on the remainder or
    /// deferred row.
    fn print_full_row(&mut self, row: &mut Row, is_last_row: bool) -> Result<(), TableError> {
        let remaining = self.remaining_page_space(is_last_row);
        if row.can_fit_entirely(remaining, &self.columns) {
            self.print_row(row)
        } else if self.should_print_on_current_page(row, remaining) {
            match split_row_to_fit(&self.columns, row, remaining) {
                Some(mut remainder) => {
                    self.print_row(row)?;
                    self.add_page()?;
                    self.print_full_row(&mut remainder, is_last_row)
                }
                // splitting would leave the same row behind; print it whole
                // and overflow instead of breaking pages forever
                None => self.print_row(row),
            }
        } else {
            self.add_page()?;
            self.print_full_row(row, is_last_row)
        }
    }

    /// Draw one row's cells left to right at the cursor, then advance the
    /// cursor past the row. Empty slots (sparse input or spanned-over
    /// columns) advance the cursor without drawing.
    fn print_row(&mut self, row: &mut Row) -> Result<(), TableError> {
        self.cursor.x = self.settings.margin.left;
        for column in &self.columns {
            let Some(cell) = row.cells.get_mut(&column.index) else {
                self.cursor.x += column.width;
                continue;
            };
            cell.x = self.cursor.x;
            cell.y = self.cursor.y;

            let verdict = {
                let mut ctx = CellContext {
                    cell: &mut *cell,
                    section: row.section,
                    row_index: row.index,
                    column_index: column.index,
                    column_key: &column.data_key,
                    cursor: Some(&mut self.cursor),
                    page_number: self.page_number,
                    settings: &self.settings,
                };
                hooks::run_cell_hooks(&mut self.hooks.will_draw_cell, &mut ctx)
            };
            if verdict == Control::Skip {
                self.cursor.x += column.width;
                continue;
            }

            self.target.draw_cell(&cell.frame())?;

            let mut ctx = CellContext {
                cell: &mut *cell,
                section: row.section,
                row_index: row.index,
                column_index: column.index,
                column_key: &column.data_key,
                cursor: Some(&mut self.cursor),
                page_number: self.page_number,
                settings: &self.settings,
            };
            hooks::run_cell_hooks(&mut self.hooks.did_draw_cell, &mut ctx);

            self.cursor.x += column.width;
        }
        self.cursor.y += row.height;
        Ok(())
    }

    fn print_section(&mut self, section: SectionRows) -> Result<(), TableError> {
        let mut rows = match section {
            SectionRows::Head => std::mem::take(&mut self.head),
            SectionRows::Foot => std::mem::take(&mut self.foot),
        };
        let result = rows.iter_mut().try_for_each(|row| self.print_row(row));
        match section {
            SectionRows::Head => self.head = rows,
            SectionRows::Foot => self.foot = rows,
        }
        result
    }

    /// Close out the current page (foot, hooks, border), open the next one
    /// and re-emit the head if it repeats.
    fn add_page(&mut self) -> Result<(), TableError> {
        if self.settings.show_foot == ShowFoot::EveryPage {
            self.print_section(SectionRows::Foot)?;
        }

        // run the page hooks before closing so their output lands on this
        // page, above everything already drawn
        self.did_draw_page();
        self.draw_border()?;

        self.target.next_page()?;
        self.page_number += 1;
        self.cursor = Pos {
            x: self.settings.margin.left,
            y: self.settings.margin.top,
        };
        self.start_pos.y = self.settings.margin.top;
        self.will_draw_page();

        if self.settings.show_head == ShowHead::EveryPage {
            self.print_section(SectionRows::Head)?;
        }
        Ok(())
    }

    /// Whether `row` must go onto the current page (whole or split) rather
    /// than deferred. A row that can never fit on any page is forced on with
    /// a warning.
    fn should_print_on_current_page(&self, row: &Row, remaining: Mm) -> bool {
        let margin = &self.settings.margin;
        let mut max_row_height = self.page_height - margin.top - margin.bottom;
        if row.section == Section::Body {
            max_row_height -= self.head_height + self.foot_height;
        }

        let min_row_height = row.min_row_height(&self.columns);
        if min_row_height > max_row_height {
            log::warn!(
                "row {} cannot fit on any page (minimum height {} exceeds usable page height {}); printing it anyway",
                row.index,
                min_row_height,
                max_row_height
            );
            return true;
        }
        if min_row_height >= remaining {
            return false;
        }
        if row.max_cell_height(&self.columns) > max_row_height {
            return true;
        }
        if self.settings.row_page_break == RowPageBreak::Avoid {
            return false;
        }
        true
    }

    /// Vertical space left for body content on the current page; the foot is
    /// reserved when it will be drawn on this page.
    fn remaining_page_space(&self, is_last_row: bool) -> Mm {
        let mut bottom = self.settings.margin.bottom;
        match self.settings.show_foot {
            ShowFoot::EveryPage => bottom += self.foot_height,
            ShowFoot::LastPage if is_last_row => bottom += self.foot_height,
            _ => {}
        }
        self.page_height - self.cursor.y - bottom
    }

    fn draw_border(&mut self) -> Result<(), TableError> {
        if self.settings.border_width <= Mm::ZERO {
            return Ok(());
        }
        let frame = BorderFrame {
            x: self.settings.margin.left,
            y: self.start_pos.y,
            width: self.settings.table_width,
            height: self.cursor.y - self.start_pos.y,
            line_width: self.settings.border_width,
            line_colour: self.settings.border_colour,
        };
        self.target.draw_border(&frame)
    }

    fn will_draw_page(&mut self) {
        let mut ctx = PageContext {
            cursor: &mut self.cursor,
            page_number: self.page_number,
            settings: &self.settings,
        };
        hooks::run_page_hooks(&mut self.hooks.will_draw_page, &mut ctx);
    }

    fn did_draw_page(&mut self) {
        let mut ctx = PageContext {
            cursor: &mut self.cursor,
            page_number: self.page_number,
            settings: &self.settings,
        };
        hooks::run_page_hooks(&mut self.hooks.did_draw_page, &mut ctx);
    }
}

enum SectionRows {
    Head,
    Foot,
}

/// Truncate `row` to the lines that fit in `remaining` and return the
/// synthetic remainder row holding the overflow. Per cell, the retained and
/// remainder line arrays concatenate back to the original sequence; a
/// remainder cell that absorbed a clamped minimum height carries the reduced
/// minimum forward. Rows too tall to ever fit still give up at least one
/// line per page; returns [None] when the remainder would be no shorter
/// than the row it came from, since printing it would change nothing.
fn split_row_to_fit(columns: &[Column], row: &mut Row, remaining: Mm) -> Option<Row> {
    let mut remainder_cells: BTreeMap<usize, Cell> = BTreeMap::new();
    let height_before = row.max_cell_height(columns);
    let mut moved_lines = false;
    row.height = Mm::ZERO;
    let mut remainder_height = Mm::ZERO;

    for column in columns {
        let Some(cell) = row.cells.get_mut(&column.index) else {
            continue;
        };

        let mut remainder = cell.clone();
        remainder.text = Vec::new();

        let keep = remaining_line_count(cell, remaining).max(1);
        if cell.text.len() > keep {
            remainder.text = cell.text.split_off(keep);
            moved_lines = true;
        }

        cell.content_height = cell.natural_height();
        if remaining > Mm::ZERO && cell.content_height >= remaining {
            cell.content_height = remaining;
            remainder.styles.min_cell_height -= remaining;
        }
        if cell.content_height > row.height {
            row.height = cell.content_height;
        }

        remainder.content_height = remainder.natural_height();
        if remainder.content_height > remainder_height {
            remainder_height = remainder.content_height;
        }
        remainder_cells.insert(column.index, remainder);
    }

    let mut remainder_row = Row::new(REMAINDER_ROW_INDEX, row.section, remainder_cells);
    remainder_row.height = remainder_height;

    for column in columns {
        if let Some(cell) = remainder_row.cells.get_mut(&column.index) {
            cell.height = remainder_row.height;
        }
        if let Some(cell) = row.cells.get_mut(&column.index) {
            cell.height = row.height;
        }
    }

    if moved_lines || remainder_height < height_before {
        Some(remainder_row)
    } else {
        None
    }
}

/// How many lines of `cell` still fit in `remaining` vertical space.
fn remaining_line_count(cell: &Cell, remaining: Mm) -> usize {
    let vpad = cell.padding().vertical();
    let lines = ((remaining - vpad) / Mm(cell.styles.line_height)).floor();
    if lines > 0.0 {
        lines as usize
    } else {
        0
    }
}
