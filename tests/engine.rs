//! End-to-end layout and pagination tests driven through the public API,
//! with a fixed-advance measurer and a draw target that records every call.

use pretty_assertions::assert_eq;
use table_gen::*;

/// One millimetre per character, regardless of font size. Deterministic and
/// easy to reason about in the assertions below.
struct CharMeasure;

impl Measure for CharMeasure {
    fn text_width(
        &self,
        _font: Option<&str>,
        text: &str,
        _font_size: f64,
        _character_spacing: f64,
    ) -> Result<Mm, TableError> {
        Ok(Mm(text.chars().count() as f64))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Cell {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        section: Section,
        lines: Vec<String>,
    },
    Border {
        y: f64,
        height: f64,
    },
    Page,
}

struct Recorder {
    page: (Mm, Mm),
    events: Vec<Event>,
}

impl Recorder {
    fn new(width: f64, height: f64) -> Recorder {
        Recorder {
            page: (Mm(width), Mm(height)),
            events: Vec::new(),
        }
    }

    fn cells(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Cell { .. }))
            .collect()
    }

    fn page_breaks(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Page))
            .count()
    }
}

impl DrawTarget for Recorder {
    fn page_size(&self) -> (Mm, Mm) {
        self.page
    }

    fn draw_cell(&mut self, frame: &CellFrame<'_>) -> Result<(), TableError> {
        self.events.push(Event::Cell {
            x: frame.x.0,
            y: frame.y.0,
            width: frame.width.0,
            height: frame.height.0,
            section: frame.section,
            lines: frame.text.to_vec(),
        });
        Ok(())
    }

    fn draw_border(&mut self, frame: &BorderFrame) -> Result<(), TableError> {
        self.events.push(Event::Border {
            y: frame.y.0,
            height: frame.height.0,
        });
        Ok(())
    }

    fn next_page(&mut self) -> Result<(), TableError> {
        self.events.push(Event::Page);
        Ok(())
    }
}

/// Unit-scale styles: 1pt font, no padding, everything driven by the test.
fn unit_styles() -> StyleOverride {
    StyleOverride {
        font_size: Some(1.0),
        line_height: Some(1.0),
        cell_padding: Some(Spacing::Uniform(0.0)),
        ..Default::default()
    }
}

#[test]
fn column_widths_sum_to_table_width() {
    let options = TableOptions {
        table_width: Mm(150.0),
        body: vec![
            ["short", "a considerably longer cell", "mid"].into(),
            ["more content here", "x", "and some here too"].into(),
        ],
        ..Default::default()
    };
    let table = Table::build(options, Mm(500.0), &CharMeasure).unwrap();
    let total: Mm = table.columns.iter().map(|c| c.width).sum();
    assert!((total.0 - 150.0).abs() < 1e-6, "total width was {total}");
}

#[test]
fn auto_columns_grow_proportionally_to_wrapped_width() {
    // wrapped widths 40 / 35 / 60 against a declared width of 150: the 15mm
    // of slack is distributed proportional to each column's share
    let options = TableOptions {
        table_width: Mm(150.0),
        columns: vec![ColumnDef::default(); 3],
        styles: StyleSheet {
            base: unit_styles(),
            ..Default::default()
        },
        body: vec![RowDef::Cells(vec![
            CellDef::new("a".repeat(40)),
            CellDef::new("b".repeat(35)),
            CellDef::new("c".repeat(60)),
        ])],
        ..Default::default()
    };
    let table = Table::build(options, Mm(500.0), &CharMeasure).unwrap();
    let widths: Vec<f64> = table.columns.iter().map(|c| c.width.0).collect();
    assert!((widths[0] - 44.44).abs() < 0.01, "got {widths:?}");
    assert!((widths[1] - 38.89).abs() < 0.01, "got {widths:?}");
    assert!((widths[2] - 66.67).abs() < 0.01, "got {widths:?}");
    assert!((widths.iter().sum::<f64>() - 150.0).abs() < 1e-6);
}

#[test]
fn shrinking_sacrifices_readability_only_after_floors_bind() {
    // column 0 holds a single 50-char word: its readable floor is 50, its
    // hard minimum 10. Shrinking the table to 40 forces the second resize
    // pass to go below word width, but never below the hard minimum.
    let options = TableOptions {
        table_width: Mm(40.0),
        columns: vec![ColumnDef::default(); 2],
        styles: StyleSheet {
            base: unit_styles(),
            ..Default::default()
        },
        body: vec![RowDef::Cells(vec![
            CellDef::new("x".repeat(50)),
            CellDef::new("y".repeat(10)),
        ])],
        ..Default::default()
    };
    let table = Table::build(options, Mm(500.0), &CharMeasure).unwrap();
    let widths: Vec<f64> = table.columns.iter().map(|c| c.width.0).collect();
    assert!((widths[0] - 30.0).abs() < 1e-6, "got {widths:?}");
    assert!((widths[1] - 10.0).abs() < 1e-6, "got {widths:?}");
}

#[test]
fn col_span_owns_the_covered_columns_geometry() {
    // columns fixed at 20 and 30 by the cells of the second row; the
    // spanning cell in the first row takes their sum
    let mut fixed20 = unit_styles();
    fixed20.cell_width = Some(CellWidth::Fixed(20.0));
    let mut fixed30 = unit_styles();
    fixed30.cell_width = Some(CellWidth::Fixed(30.0));

    let options = TableOptions {
        table_width: Mm(50.0),
        columns: vec![ColumnDef::default(); 2],
        styles: StyleSheet {
            base: unit_styles(),
            ..Default::default()
        },
        body: vec![
            RowDef::Cells(vec![CellDef::new("span").with_col_span(2)]),
            RowDef::Cells(vec![
                CellDef::new("a").with_styles(fixed20),
                CellDef::new("b").with_styles(fixed30),
            ]),
        ],
        ..Default::default()
    };
    let table = Table::build(options, Mm(500.0), &CharMeasure).unwrap();
    assert_eq!(table.columns[0].width, Mm(20.0));
    assert_eq!(table.columns[1].width, Mm(30.0));
    let row = &table.body[0];
    assert_eq!(row.cells[&0].width, Mm(50.0));
    assert!(!row.cells.contains_key(&1));
}

/// A table with one narrow fixed column whose cell wraps to one word per
/// line, on a page `page_height` tall with no margins.
fn tall_cell_options(words: usize, line_height: f64, padding: f64) -> TableOptions {
    let mut base = unit_styles();
    base.line_height = Some(line_height);
    base.cell_padding = Some(Spacing::Uniform(padding));
    base.cell_width = Some(CellWidth::Fixed(3.0));
    let text = (0..words)
        .map(|i| format!("w{i:02}"))
        .collect::<Vec<_>>()
        .join(" ");
    TableOptions {
        table_width: Mm(3.0),
        columns: vec![ColumnDef::default()],
        styles: StyleSheet {
            base,
            ..Default::default()
        },
        body: vec![RowDef::Cells(vec![CellDef::new(text)])],
        ..Default::default()
    }
}

#[test]
fn splits_a_row_at_the_line_boundary_that_fits() {
    // six 5mm line bands plus 2mm of vertical padding against 25mm of page:
    // floor((25 - 2) / 5) = 4 lines stay, two carry over
    let mut target = Recorder::new(100.0, 25.0);
    draw_table(tall_cell_options(6, 5.0, 1.0), &CharMeasure, &mut target).unwrap();

    assert_eq!(target.page_breaks(), 1);
    let cells = target.cells();
    assert_eq!(cells.len(), 2);
    let (first, second) = (cells[0], cells[1]);
    let Event::Cell { lines: kept, .. } = first else {
        unreachable!()
    };
    let Event::Cell { lines: carried, y, .. } = second else {
        unreachable!()
    };
    assert_eq!(kept.len(), 4);
    assert_eq!(carried.len(), 2);
    // nothing duplicated or dropped across the boundary
    let mut all = kept.clone();
    all.extend(carried.clone());
    assert_eq!(all, vec!["w00", "w01", "w02", "w03", "w04", "w05"]);
    // the remainder starts at the top of the fresh page
    assert_eq!(*y, 0.0);
}

#[test]
fn avoid_policy_defers_a_row_that_could_fit_on_a_fresh_page() {
    // the row is 40mm tall with 30mm left on the page; with row breaking
    // avoided it must move to the next page in one piece
    let mut options = tall_cell_options(8, 5.0, 0.0);
    options.row_page_break = RowPageBreak::Avoid;
    options.start_y = Mm(70.0);
    let mut target = Recorder::new(100.0, 100.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    assert_eq!(target.page_breaks(), 1);
    let cells = target.cells();
    assert_eq!(cells.len(), 1, "row must not be split");
    let Event::Cell { lines, y, height, .. } = cells[0] else {
        unreachable!()
    };
    assert_eq!(lines.len(), 8);
    assert_eq!(*y, 0.0);
    assert_eq!(*height, 40.0);
}

#[test]
fn no_remainder_row_when_the_minimum_fits_and_policy_allows_printing() {
    // 20mm row, 25mm of space: prints whole, no split, no page break
    let mut target = Recorder::new(100.0, 25.0);
    draw_table(tall_cell_options(4, 5.0, 0.0), &CharMeasure, &mut target).unwrap();
    assert_eq!(target.page_breaks(), 0);
    assert_eq!(target.cells().len(), 1);
}

#[test]
fn defers_whole_when_not_even_one_line_band_remains() {
    // 40mm line bands with 30mm left on the page: below the row's minimum
    // height, so it moves to the next page whole with no remainder row
    let mut options = tall_cell_options(2, 40.0, 0.0);
    options.start_y = Mm(70.0);
    let mut target = Recorder::new(100.0, 100.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    assert_eq!(target.page_breaks(), 1);
    let cells = target.cells();
    assert_eq!(cells.len(), 1, "row must not be split");
    let Event::Cell { lines, y, height, .. } = cells[0] else {
        unreachable!()
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(*y, 0.0);
    assert_eq!(*height, 80.0);
}

#[test]
fn a_row_too_tall_for_any_page_prints_degraded_instead_of_looping() {
    // 10mm of vertical padding plus a line band against a 10mm page: the
    // row can never fit whole, so it sheds one line per page and terminates
    let mut target = Recorder::new(100.0, 10.0);
    let table = draw_table(tall_cell_options(3, 1.0, 5.0), &CharMeasure, &mut target).unwrap();

    assert_eq!(table.page_number, 4);
    assert_eq!(target.page_breaks(), 3);
    let printed: Vec<String> = target
        .cells()
        .iter()
        .flat_map(|event| match event {
            Event::Cell { lines, .. } => lines.clone(),
            _ => Vec::new(),
        })
        .collect();
    assert_eq!(printed, vec!["w00", "w01", "w02"]);
}

fn repeated_sections_options() -> TableOptions {
    let mut base = unit_styles();
    base.cell_width = Some(CellWidth::Fixed(10.0));
    TableOptions {
        table_width: Mm(10.0),
        columns: vec![ColumnDef::new("H").with_footer("F")],
        styles: StyleSheet {
            base,
            ..Default::default()
        },
        body: (0..6)
            .map(|i| RowDef::Cells(vec![CellDef::new(format!("r{i}"))]))
            .collect(),
        ..Default::default()
    }
}

#[test]
fn head_and_foot_repeat_on_every_page() {
    // 1mm head, 1mm foot, 1mm rows on a 5mm page: three body rows per page
    let mut target = Recorder::new(100.0, 5.0);
    let table = draw_table(repeated_sections_options(), &CharMeasure, &mut target).unwrap();

    assert_eq!(table.page_number, 2);
    let sections: Vec<Section> = target
        .events
        .iter()
        .filter_map(|event| match event {
            Event::Cell { section, .. } => Some(*section),
            _ => None,
        })
        .collect();
    assert_eq!(
        sections,
        vec![
            Section::Head,
            Section::Body,
            Section::Body,
            Section::Body,
            Section::Foot,
            Section::Head,
            Section::Body,
            Section::Body,
            Section::Body,
            Section::Foot,
        ]
    );
    assert_eq!(target.page_breaks(), 1);
}

#[test]
fn head_shown_on_first_page_only_when_configured() {
    let mut options = repeated_sections_options();
    options.show_head = ShowHead::FirstPage;
    let mut target = Recorder::new(100.0, 5.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    let heads = target
        .events
        .iter()
        .filter(|event| matches!(event, Event::Cell { section: Section::Head, .. }))
        .count();
    assert_eq!(heads, 1);
}

#[test]
fn border_is_closed_out_once_per_page() {
    let mut options = repeated_sections_options();
    options.border_width = Mm(0.5);
    let mut target = Recorder::new(100.0, 5.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    let borders: Vec<&Event> = target
        .events
        .iter()
        .filter(|event| matches!(event, Event::Border { .. }))
        .collect();
    assert_eq!(borders.len(), 2);
    // each border spans that page's drawn rows
    assert_eq!(borders[0], &Event::Border { y: 0.0, height: 5.0 });
    assert_eq!(borders[1], &Event::Border { y: 0.0, height: 5.0 });
}

#[test]
fn always_page_break_starts_on_a_fresh_page() {
    let mut options = repeated_sections_options();
    options.page_break = PageBreak::Always;
    options.start_y = Mm(2.0);
    let mut target = Recorder::new(100.0, 50.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    assert_eq!(target.events[0], Event::Page);
    let Event::Cell { y, .. } = &target.events[1] else {
        panic!("expected a cell after the page break");
    };
    assert_eq!(*y, 0.0);
}

#[test]
fn layout_is_deterministic() {
    let mut first = Recorder::new(100.0, 25.0);
    draw_table(tall_cell_options(6, 5.0, 1.0), &CharMeasure, &mut first).unwrap();
    let mut second = Recorder::new(100.0, 25.0);
    draw_table(tall_cell_options(6, 5.0, 1.0), &CharMeasure, &mut second).unwrap();
    assert_eq!(first.events, second.events);
}

#[test]
fn will_draw_cell_skip_suppresses_the_draw_but_advances_the_cursor() {
    let mut fixed20 = unit_styles();
    fixed20.cell_width = Some(CellWidth::Fixed(20.0));
    let mut fixed30 = unit_styles();
    fixed30.cell_width = Some(CellWidth::Fixed(30.0));

    let mut hooks = Hooks::default();
    hooks.on_will_draw_cell(|ctx| {
        if ctx.column_index == 0 {
            Control::Skip
        } else {
            Control::Proceed
        }
    });

    let options = TableOptions {
        table_width: Mm(50.0),
        columns: vec![ColumnDef::default(); 2],
        body: vec![RowDef::Cells(vec![
            CellDef::new("a").with_styles(fixed20),
            CellDef::new("b").with_styles(fixed30),
        ])],
        hooks,
        ..Default::default()
    };
    let mut target = Recorder::new(500.0, 300.0);
    draw_table(options, &CharMeasure, &mut target).unwrap();

    let cells = target.cells();
    assert_eq!(cells.len(), 1);
    let Event::Cell { x, lines, .. } = cells[0] else {
        unreachable!()
    };
    // the skipped cell still occupies its 20mm slot
    assert_eq!(*x, 20.0);
    assert_eq!(lines, &vec!["b".to_string()]);
}

#[test]
fn did_parse_cell_fires_once_per_cell_before_measurement() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&seen);
    let mut hooks = Hooks::default();
    hooks.on_did_parse_cell(move |_ctx| {
        *counter.borrow_mut() += 1;
        Control::Proceed
    });

    let options = TableOptions {
        table_width: Mm(60.0),
        columns: vec![ColumnDef::new("A"), ColumnDef::new("B")],
        body: vec![["1", "2"].into(), ["3", "4"].into()],
        hooks,
        ..Default::default()
    };
    Table::build(options, Mm(500.0), &CharMeasure).unwrap();

    // one synthesized head row plus two body rows, two columns each
    assert_eq!(*seen.borrow(), 6);
}

#[test]
fn dry_run_exposes_final_geometry_without_drawing() {
    let options = repeated_sections_options();
    let table = Table::build(options, Mm(500.0), &CharMeasure).unwrap();
    assert_eq!(table.width(), Mm(10.0));
    assert_eq!(table.head_height(), Mm(1.0));
    assert_eq!(table.body_height(), Mm(6.0));
    assert_eq!(table.foot_height(), Mm(1.0));
    assert_eq!(table.height(), Mm(8.0));
}
