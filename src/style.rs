use std::collections::BTreeMap;

use crate::colour::{colours, Colour};
use crate::cell::Section;
use crate::spacing::Spacing;
use crate::units::Mm;

/// How a cell's column width is determined during width resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum CellWidth {
    /// Start at the measured content width and let the resize passes
    /// redistribute leftover table width proportionally.
    #[default]
    Auto,
    /// Exactly the measured content width, clamped to the page's available
    /// width. The column is still resizable but will not give up readability.
    Wrap,
    /// A fixed width in millimetres; the column is excluded from resizing.
    Fixed(f64),
}

/// Horizontal text alignment within a cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment within a cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// The fully resolved style record a cell carries through layout and hands to
/// the draw collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyles {
    /// Font identifier passed through to the measurement and draw
    /// collaborators; [None] selects their fallback face.
    pub font_name: Option<String>,
    /// Cell background; [None] draws no fill.
    pub fill_colour: Option<Colour>,
    pub text_colour: Colour,
    /// Line height multiplier applied to `font_size`.
    pub line_height: f64,
    pub character_spacing: f64,
    pub alignment: Alignment,
    pub vertical_alignment: VerticalAlignment,
    pub font_size: f64,
    pub cell_padding: Spacing,
    /// Cell border colour.
    pub line_colour: Colour,
    /// Cell border width, per side.
    pub line_width: Spacing,
    pub cell_width: CellWidth,
    pub min_cell_height: Mm,
    pub min_cell_width: Mm,
}

impl Default for CellStyles {
    fn default() -> CellStyles {
        CellStyles {
            font_name: None,
            fill_colour: None,
            text_colour: colours::BLACK,
            line_height: 1.0,
            character_spacing: 0.0,
            alignment: Alignment::Left,
            vertical_alignment: VerticalAlignment::Middle,
            font_size: 10.0,
            cell_padding: Spacing::Uniform(5.0),
            line_colour: colours::BLACK,
            line_width: Spacing::Uniform(0.0),
            cell_width: CellWidth::Auto,
            min_cell_height: Mm::ZERO,
            min_cell_width: Mm::ZERO,
        }
    }
}

/// A partial style record; unset fields leave the layer below untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StyleOverride {
    pub font_name: Option<String>,
    pub fill_colour: Option<Colour>,
    pub text_colour: Option<Colour>,
    pub line_height: Option<f64>,
    pub character_spacing: Option<f64>,
    pub alignment: Option<Alignment>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub font_size: Option<f64>,
    pub cell_padding: Option<Spacing>,
    pub line_colour: Option<Colour>,
    pub line_width: Option<Spacing>,
    pub cell_width: Option<CellWidth>,
    pub min_cell_height: Option<Mm>,
    pub min_cell_width: Option<Mm>,
}

impl StyleOverride {
    /// Layer this override on top of `styles`.
    pub fn apply_to(&self, styles: &mut CellStyles) {
        if let Some(v) = &self.font_name {
            styles.font_name = Some(v.clone());
        }
        if let Some(v) = self.fill_colour {
            styles.fill_colour = Some(v);
        }
        if let Some(v) = self.text_colour {
            styles.text_colour = v;
        }
        if let Some(v) = self.line_height {
            styles.line_height = v;
        }
        if let Some(v) = self.character_spacing {
            styles.character_spacing = v;
        }
        if let Some(v) = self.alignment {
            styles.alignment = v;
        }
        if let Some(v) = self.vertical_alignment {
            styles.vertical_alignment = v;
        }
        if let Some(v) = self.font_size {
            styles.font_size = v;
        }
        if let Some(v) = &self.cell_padding {
            styles.cell_padding = v.clone();
        }
        if let Some(v) = self.line_colour {
            styles.line_colour = v;
        }
        if let Some(v) = &self.line_width {
            styles.line_width = v.clone();
        }
        if let Some(v) = self.cell_width {
            styles.cell_width = v;
        }
        if let Some(v) = self.min_cell_height {
            styles.min_cell_height = v;
        }
        if let Some(v) = self.min_cell_width {
            styles.min_cell_width = v;
        }
    }
}

/// The caller-supplied style layers for a table.
///
/// During parsing every cell resolves its effective style by layering, lowest
/// to highest precedence: engine defaults, `base` plus the row's section
/// layer, the per-column layer (body cells only), the alternate-row layer
/// (body rows at even index only), and finally the explicit per-cell override
/// from the row input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StyleSheet {
    /// Applied to every cell in every section.
    pub base: StyleOverride,
    pub head: StyleOverride,
    pub body: StyleOverride,
    pub foot: StyleOverride,
    /// Applied to body rows at even index, striping the table.
    pub alternate_row: StyleOverride,
    /// Keyed by column data key, with the stringified column index accepted
    /// as a fallback key.
    pub columns: BTreeMap<String, StyleOverride>,
}

impl StyleSheet {
    pub(crate) fn column_override(&self, data_key: &str, index: usize) -> Option<&StyleOverride> {
        self.columns
            .get(data_key)
            .or_else(|| self.columns.get(&index.to_string()))
    }

    /// Resolve the effective style for one cell position.
    pub(crate) fn resolve(
        &self,
        section: Section,
        data_key: &str,
        column_index: usize,
        row_index: usize,
        cell_override: Option<&StyleOverride>,
    ) -> CellStyles {
        let mut styles = CellStyles::default();
        self.base.apply_to(&mut styles);
        match section {
            Section::Head => self.head.apply_to(&mut styles),
            Section::Body => self.body.apply_to(&mut styles),
            Section::Foot => self.foot.apply_to(&mut styles),
        }
        if section == Section::Body {
            if let Some(column) = self.column_override(data_key, column_index) {
                column.apply_to(&mut styles);
            }
            if row_index % 2 == 0 {
                self.alternate_row.apply_to(&mut styles);
            }
        }
        if let Some(cell) = cell_override {
            cell.apply_to(&mut styles);
        }
        styles
    }
}
