use std::collections::{BTreeMap, HashMap};

use crate::cell::{Cell, Section};
use crate::colour::{colours, Colour};
use crate::column::Column;
use crate::draw::DrawTarget;
use crate::error::TableError;
use crate::hooks::Hooks;
use crate::layout;
use crate::measure::Measure;
use crate::row::{section_height, Row};
use crate::spacing::{Edges, Spacing};
use crate::style::{StyleOverride, StyleSheet};
use crate::units::Mm;

/// Where the table as a whole may start relative to the current page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PageBreak {
    /// Start at `start_y`, breaking to a new page only if not even the
    /// head/foot sections fit below it.
    #[default]
    Auto,
    /// Additionally reserve room for the whole body when deciding whether to
    /// start on the current page.
    Avoid,
    /// Always start on a fresh page.
    Always,
}

/// Whether a single row may be split across a page boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RowPageBreak {
    #[default]
    Auto,
    /// Defer the whole row to the next page instead of splitting, unless the
    /// row could never fit on any page.
    Avoid,
}

/// Head section visibility policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShowHead {
    #[default]
    EveryPage,
    FirstPage,
    Never,
}

impl From<bool> for ShowHead {
    fn from(show: bool) -> ShowHead {
        if show {
            ShowHead::EveryPage
        } else {
            ShowHead::Never
        }
    }
}

/// Foot section visibility policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShowFoot {
    #[default]
    EveryPage,
    LastPage,
    Never,
}

impl From<bool> for ShowFoot {
    fn from(show: bool) -> ShowFoot {
        if show {
            ShowFoot::EveryPage
        } else {
            ShowFoot::Never
        }
    }
}

/// Raw cell input: content plus optional spans and a per-cell style override.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CellDef {
    pub content: String,
    /// Number of columns to cover; 0/1 mean a plain cell.
    pub col_span: usize,
    /// Number of rows to cover; 0/1 mean a plain cell.
    pub row_span: usize,
    pub styles: Option<StyleOverride>,
}

impl CellDef {
    pub fn new(content: impl Into<String>) -> CellDef {
        CellDef {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_col_span(mut self, col_span: usize) -> CellDef {
        self.col_span = col_span;
        self
    }

    pub fn with_row_span(mut self, row_span: usize) -> CellDef {
        self.row_span = row_span;
        self
    }

    pub fn with_styles(mut self, styles: StyleOverride) -> CellDef {
        self.styles = Some(styles);
        self
    }
}

impl From<&str> for CellDef {
    fn from(content: &str) -> CellDef {
        CellDef::new(content)
    }
}

impl From<String> for CellDef {
    fn from(content: String) -> CellDef {
        CellDef::new(content)
    }
}

/// One raw row: either an ordered array of cells (span declarations consume
/// the slots to their right) or a record keyed by column data key (absent
/// keys leave empty slots).
#[derive(Debug, Clone, PartialEq)]
pub enum RowDef {
    Cells(Vec<CellDef>),
    Record(BTreeMap<String, CellDef>),
}

impl From<Vec<CellDef>> for RowDef {
    fn from(cells: Vec<CellDef>) -> RowDef {
        RowDef::Cells(cells)
    }
}

impl<T: Into<CellDef>, const N: usize> From<[T; N]> for RowDef {
    fn from(cells: [T; N]) -> RowDef {
        RowDef::Cells(cells.into_iter().map(Into::into).collect())
    }
}

/// A declared column: optional header/footer text (used to synthesize head
/// and foot rows when those sections are empty) and an optional data key for
/// record-shaped rows.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnDef {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub data_key: Option<String>,
}

impl ColumnDef {
    pub fn new(header: impl Into<String>) -> ColumnDef {
        ColumnDef {
            header: Some(header.into()),
            ..Default::default()
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> ColumnDef {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_data_key(mut self, data_key: impl Into<String>) -> ColumnDef {
        self.data_key = Some(data_key.into());
        self
    }
}

impl From<&str> for ColumnDef {
    fn from(header: &str) -> ColumnDef {
        ColumnDef::new(header)
    }
}

/// Resolved, immutable table-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Vertical position the table starts at on the first page.
    pub start_y: Mm,
    pub margin: Edges,
    pub page_break: PageBreak,
    pub row_page_break: RowPageBreak,
    pub table_width: Mm,
    pub show_head: ShowHead,
    pub show_foot: ShowFoot,
    /// Outer table border width; zero draws no visible border.
    pub border_width: Mm,
    pub border_colour: Colour,
}

/// The full configuration surface for one table render.
#[derive(Debug)]
pub struct TableOptions {
    pub start_y: Mm,
    pub table_width: Mm,
    pub margin: Spacing,
    pub page_break: PageBreak,
    pub row_page_break: RowPageBreak,
    pub show_head: ShowHead,
    pub show_foot: ShowFoot,
    pub border_width: Mm,
    pub border_colour: Colour,

    pub head: Vec<RowDef>,
    pub body: Vec<RowDef>,
    pub foot: Vec<RowDef>,
    /// Column declarations; left empty, columns are derived from the first
    /// supplied row.
    pub columns: Vec<ColumnDef>,

    pub styles: StyleSheet,
    pub hooks: Hooks,
}

impl Default for TableOptions {
    fn default() -> TableOptions {
        TableOptions {
            start_y: Mm::ZERO,
            table_width: Mm::ZERO,
            margin: Spacing::default(),
            page_break: PageBreak::default(),
            row_page_break: RowPageBreak::default(),
            show_head: ShowHead::default(),
            show_foot: ShowFoot::default(),
            border_width: Mm::ZERO,
            border_colour: colours::BLACK,
            head: Vec::new(),
            body: Vec::new(),
            foot: Vec::new(),
            columns: Vec::new(),
            styles: StyleSheet::default(),
            hooks: Hooks::default(),
        }
    }
}

/// The root aggregate: resolved settings, style layers, hooks, the column
/// sequence and the three row sections. Built once per layout call, mutated
/// in place through the width → span → fit → paginate passes, and exclusively
/// owned by that call throughout.
#[derive(Debug)]
pub struct Table {
    pub settings: Settings,
    pub styles: StyleSheet,
    pub hooks: Hooks,
    pub columns: Vec<Column>,
    pub head: Vec<Row>,
    pub body: Vec<Row>,
    pub foot: Vec<Row>,
    /// 1-based page counter, advanced at each page break during drawing.
    pub page_number: u32,
}

impl Table {
    /// Parse the caller's options and run the full layout pipeline (content
    /// parsing, width resolution, span collapse, content fitting) without
    /// drawing anything.
    ///
    /// The returned table's geometry is final: callers can inspect
    /// [`height`](Table::height) and the per-section heights to size a
    /// container before committing the table to a page — or skip drawing
    /// entirely for a dry run.
    pub fn build(
        options: TableOptions,
        page_width: Mm,
        measure: &dyn Measure,
    ) -> Result<Table, TableError> {
        let mut table = parse(options);
        layout::resolve_widths(&mut table, page_width, measure)?;
        layout::apply_col_spans(&mut table);
        layout::fit_content(&mut table, measure)?;
        layout::apply_row_spans(&mut table);
        Ok(table)
    }

    /// Paginate and draw the laid-out table onto `target`.
    pub fn draw(&mut self, target: &mut dyn DrawTarget) -> Result<(), TableError> {
        layout::paginate(self, target)
    }

    /// The declared total width; column widths sum to this after width
    /// resolution (within floating-point tolerance).
    pub fn width(&self) -> Mm {
        self.settings.table_width
    }

    pub fn head_height(&self) -> Mm {
        section_height(&self.head, &self.columns)
    }

    pub fn body_height(&self) -> Mm {
        section_height(&self.body, &self.columns)
    }

    pub fn foot_height(&self) -> Mm {
        section_height(&self.foot, &self.columns)
    }

    /// Total height of the laid-out table across all pages.
    pub fn height(&self) -> Mm {
        self.head_height() + self.body_height() + self.foot_height()
    }

    /// All rows in table order: head, body, foot concatenated. Several layout
    /// passes carry counters across this exact order.
    pub fn all_rows(&self) -> impl Iterator<Item = &Row> {
        self.head.iter().chain(self.body.iter()).chain(self.foot.iter())
    }

    pub fn all_rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.head
            .iter_mut()
            .chain(self.body.iter_mut())
            .chain(self.foot.iter_mut())
    }
}

/// Lay out and draw a table in one call, taking the page width from the
/// target. Returns the laid-out table so callers can read back its final
/// geometry.
pub fn draw_table(
    options: TableOptions,
    measure: &dyn Measure,
    target: &mut dyn DrawTarget,
) -> Result<Table, TableError> {
    let (page_width, _) = target.page_size();
    let mut table = Table::build(options, page_width, measure)?;
    table.draw(target)?;
    Ok(table)
}

fn parse(options: TableOptions) -> Table {
    let TableOptions {
        start_y,
        table_width,
        margin,
        page_break,
        row_page_break,
        show_head,
        show_foot,
        border_width,
        border_colour,
        mut head,
        body,
        mut foot,
        columns,
        styles,
        hooks,
    } = options;

    let settings = Settings {
        start_y,
        margin: margin.resolve(Mm::ZERO),
        page_break,
        row_page_break,
        table_width,
        show_head,
        show_foot,
        border_width,
        border_colour,
    };

    let column_defs = if columns.is_empty() {
        derive_columns(&head, &body, &foot)
    } else {
        columns
    };
    let columns: Vec<Column> = column_defs
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let data_key = def.data_key.clone().unwrap_or_else(|| index.to_string());
            Column::new(index, data_key)
        })
        .collect();

    // if no head or foot rows were supplied, try generating them from the
    // column declarations
    if head.is_empty() {
        if let Some(row) = section_row(&column_defs, &columns, Section::Head) {
            head.push(row);
        }
    }
    if foot.is_empty() {
        if let Some(row) = section_row(&column_defs, &columns, Section::Foot) {
            foot.push(row);
        }
    }

    let head = parse_section(Section::Head, head, &columns, &styles);
    let body = parse_section(Section::Body, body, &columns, &styles);
    let foot = parse_section(Section::Foot, foot, &columns, &styles);

    Table {
        settings,
        styles,
        hooks,
        columns,
        head,
        body,
        foot,
        page_number: 1,
    }
}

/// Derive positional columns from the first supplied row when the caller
/// declared none.
fn derive_columns(head: &[RowDef], body: &[RowDef], foot: &[RowDef]) -> Vec<ColumnDef> {
    let first = head.first().or_else(|| body.first()).or_else(|| foot.first());
    match first {
        Some(RowDef::Cells(cells)) => cells.iter().map(|_| ColumnDef::default()).collect(),
        Some(RowDef::Record(record)) => record
            .keys()
            .map(|key| ColumnDef::default().with_data_key(key.clone()))
            .collect(),
        None => Vec::new(),
    }
}

/// Build a one-row section from column header/footer declarations; [None] if
/// no column declares any.
fn section_row(defs: &[ColumnDef], columns: &[Column], section: Section) -> Option<RowDef> {
    let mut record = BTreeMap::new();
    for (def, column) in defs.iter().zip(columns) {
        let title = match section {
            Section::Head => def.header.as_ref(),
            Section::Foot => def.footer.as_ref(),
            Section::Body => None,
        };
        if let Some(title) = title {
            record.insert(column.data_key.clone(), CellDef::new(title.clone()));
        }
    }
    (!record.is_empty()).then_some(RowDef::Record(record))
}

#[derive(Clone, Copy)]
struct RowSpanState {
    /// Rows still to be skipped for this column.
    left: usize,
    /// Column-span spread of the row-spanning cell, re-applied on every
    /// covered row so the covered rows skip the same columns.
    times: usize,
}

/// Parse one section's raw rows into the sparse cell grid, resolving each
/// cell's effective style and consuming span declarations: a row-span absorbs
/// cell creation for its column on subsequent rows, a col-span consumes the
/// array slots to its right.
fn parse_section(
    section: Section,
    rows: Vec<RowDef>,
    columns: &[Column],
    styles: &StyleSheet,
) -> Vec<Row> {
    let mut row_spans_left: HashMap<usize, RowSpanState> = HashMap::new();
    rows.into_iter()
        .enumerate()
        .map(|(row_index, raw)| {
            let mut cells: BTreeMap<usize, Cell> = BTreeMap::new();
            let mut skipped_for_row_spans = 0usize;
            let mut col_spans_added = 0usize;
            let mut column_spans_left = 0usize;

            for column in columns {
                if let Some(state) = row_spans_left.get_mut(&column.index) {
                    if state.left > 0 {
                        state.left -= 1;
                        column_spans_left = state.times;
                        skipped_for_row_spans += 1;
                        continue;
                    }
                }
                if column_spans_left > 0 {
                    column_spans_left -= 1;
                    col_spans_added += 1;
                    continue;
                }
                let def = match &raw {
                    RowDef::Cells(cells) => cells
                        .get(column.index - col_spans_added - skipped_for_row_spans)
                        .cloned(),
                    RowDef::Record(record) => record.get(&column.data_key).cloned(),
                };
                // sparse input: a missing cell leaves an empty slot
                let Some(def) = def else { continue };
                let resolved = styles.resolve(
                    section,
                    &column.data_key,
                    column.index,
                    row_index,
                    def.styles.as_ref(),
                );
                let cell = Cell::new(def.content, resolved, section, def.col_span, def.row_span);
                column_spans_left = cell.col_span - 1;
                row_spans_left.insert(
                    column.index,
                    RowSpanState {
                        left: cell.row_span - 1,
                        times: column_spans_left,
                    },
                );
                cells.insert(column.index, cell);
            }
            Row::new(row_index as i32, section, cells)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_row(cells: &[&str]) -> RowDef {
        RowDef::Cells(cells.iter().map(|c| CellDef::new(*c)).collect())
    }

    #[test]
    fn derives_columns_from_first_row() {
        let options = TableOptions {
            body: vec![body_row(&["a", "b", "c"])],
            ..Default::default()
        };
        let table = parse(options);
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[1].data_key, "1");
        assert_eq!(table.body[0].cells.len(), 3);
    }

    #[test]
    fn synthesizes_head_and_foot_from_column_declarations() {
        let options = TableOptions {
            columns: vec![
                ColumnDef::new("Name").with_footer("Total"),
                ColumnDef::new("City"),
            ],
            body: vec![body_row(&["Alice", "New York"])],
            ..Default::default()
        };
        let table = parse(options);
        assert_eq!(table.head.len(), 1);
        assert_eq!(table.head[0].cells[&0].raw, "Name");
        assert_eq!(table.head[0].cells[&1].raw, "City");
        assert_eq!(table.foot.len(), 1);
        assert_eq!(table.foot[0].cells[&0].raw, "Total");
        // the second column declares no footer: empty slot
        assert!(!table.foot[0].cells.contains_key(&1));
    }

    #[test]
    fn no_sections_synthesized_without_declarations() {
        let options = TableOptions {
            body: vec![body_row(&["a", "b"])],
            ..Default::default()
        };
        let table = parse(options);
        assert!(table.head.is_empty());
        assert!(table.foot.is_empty());
    }

    #[test]
    fn record_rows_resolve_by_data_key() {
        let mut record = BTreeMap::new();
        record.insert("name".to_string(), CellDef::new("Alice"));
        let options = TableOptions {
            columns: vec![
                ColumnDef::default().with_data_key("name"),
                ColumnDef::default().with_data_key("city"),
            ],
            body: vec![RowDef::Record(record)],
            ..Default::default()
        };
        let table = parse(options);
        assert_eq!(table.body[0].cells[&0].raw, "Alice");
        // sparse record input: no cell for the "city" column
        assert!(!table.body[0].cells.contains_key(&1));
    }

    #[test]
    fn col_span_consumes_following_array_slots() {
        let options = TableOptions {
            columns: vec![ColumnDef::default(); 3],
            body: vec![
                RowDef::Cells(vec![CellDef::new("wide").with_col_span(2), CellDef::new("c")]),
                body_row(&["a", "b", "c"]),
            ],
            ..Default::default()
        };
        let table = parse(options);
        let row = &table.body[0];
        assert_eq!(row.cells[&0].raw, "wide");
        assert!(!row.cells.contains_key(&1));
        // the second array slot lands in the third column
        assert_eq!(row.cells[&2].raw, "c");
        assert_eq!(table.body[1].cells.len(), 3);
    }

    #[test]
    fn row_span_absorbs_cell_creation_on_later_rows() {
        let options = TableOptions {
            columns: vec![ColumnDef::default(); 2],
            body: vec![
                RowDef::Cells(vec![CellDef::new("tall").with_row_span(2), CellDef::new("b1")]),
                // only one raw cell: the first column is still owned by "tall"
                RowDef::Cells(vec![CellDef::new("b2")]),
            ],
            ..Default::default()
        };
        let table = parse(options);
        assert_eq!(table.body[0].cells[&0].raw, "tall");
        assert!(!table.body[1].cells.contains_key(&0));
        assert_eq!(table.body[1].cells[&1].raw, "b2");
    }

    #[test]
    fn alternate_row_styles_hit_even_body_rows() {
        let options = TableOptions {
            styles: StyleSheet {
                alternate_row: StyleOverride {
                    font_size: Some(99.0),
                    ..Default::default()
                },
                ..Default::default()
            },
            body: vec![body_row(&["a"]), body_row(&["b"]), body_row(&["c"])],
            ..Default::default()
        };
        let table = parse(options);
        assert_eq!(table.body[0].cells[&0].styles.font_size, 99.0);
        assert_eq!(table.body[1].cells[&0].styles.font_size, 10.0);
        assert_eq!(table.body[2].cells[&0].styles.font_size, 99.0);
    }

    #[test]
    fn show_flags_convert_from_bool() {
        assert_eq!(ShowHead::from(true), ShowHead::EveryPage);
        assert_eq!(ShowHead::from(false), ShowHead::Never);
        assert_eq!(ShowFoot::from(true), ShowFoot::EveryPage);
        assert_eq!(ShowFoot::from(false), ShowFoot::Never);
    }
}
