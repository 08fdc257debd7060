//! Caller-supplied extension hooks.
//!
//! Five hook points fire at well-defined moments of a table render:
//!
//! * `did_parse_cell` — after a cell's content and styles are resolved,
//!   before its width is measured. Cursor is not available yet.
//! * `will_draw_cell` / `did_draw_cell` — around each cell draw. Returning
//!   [`Control::Skip`] from `will_draw_cell` skips that one cell's draw (and
//!   its `did_draw_cell` hooks); the cursor still advances as if drawn.
//! * `will_draw_page` / `did_draw_page` — at the start and end of each page
//!   the table touches.
//!
//! Hooks within a point run in registration order. Aborting is a tagged
//! return value, never an error.

use crate::cell::{Cell, Section};
use crate::draw::Pos;
use crate::table::Settings;

/// A cell hook's verdict.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    #[default]
    Proceed,
    /// Skip drawing the current cell; not an error.
    Skip,
}

/// Read/write view of the layout state handed to cell-level hooks.
pub struct CellContext<'a> {
    pub cell: &'a mut Cell,
    pub section: Section,
    pub row_index: i32,
    pub column_index: usize,
    pub column_key: &'a str,
    /// The live cursor during drawing; [None] for `did_parse_cell`, which
    /// fires before pagination starts.
    pub cursor: Option<&'a mut Pos>,
    pub page_number: u32,
    pub settings: &'a Settings,
}

/// Read/write view handed to page-level hooks.
pub struct PageContext<'a> {
    pub cursor: &'a mut Pos,
    pub page_number: u32,
    pub settings: &'a Settings,
}

pub type CellHook = Box<dyn FnMut(&mut CellContext<'_>) -> Control>;
pub type PageHook = Box<dyn FnMut(&mut PageContext<'_>)>;

/// Ordered lists of hooks, one per hook point.
#[derive(Default)]
pub struct Hooks {
    pub did_parse_cell: Vec<CellHook>,
    pub will_draw_cell: Vec<CellHook>,
    pub did_draw_cell: Vec<CellHook>,
    pub will_draw_page: Vec<PageHook>,
    pub did_draw_page: Vec<PageHook>,
}

impl Hooks {
    pub fn on_did_parse_cell(
        &mut self,
        hook: impl FnMut(&mut CellContext<'_>) -> Control + 'static,
    ) -> &mut Self {
        self.did_parse_cell.push(Box::new(hook));
        self
    }

    pub fn on_will_draw_cell(
        &mut self,
        hook: impl FnMut(&mut CellContext<'_>) -> Control + 'static,
    ) -> &mut Self {
        self.will_draw_cell.push(Box::new(hook));
        self
    }

    pub fn on_did_draw_cell(
        &mut self,
        hook: impl FnMut(&mut CellContext<'_>) -> Control + 'static,
    ) -> &mut Self {
        self.did_draw_cell.push(Box::new(hook));
        self
    }

    pub fn on_will_draw_page(&mut self, hook: impl FnMut(&mut PageContext<'_>) + 'static) -> &mut Self {
        self.will_draw_page.push(Box::new(hook));
        self
    }

    pub fn on_did_draw_page(&mut self, hook: impl FnMut(&mut PageContext<'_>) + 'static) -> &mut Self {
        self.did_draw_page.push(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("did_parse_cell", &self.did_parse_cell.len())
            .field("will_draw_cell", &self.will_draw_cell.len())
            .field("did_draw_cell", &self.did_draw_cell.len())
            .field("will_draw_page", &self.will_draw_page.len())
            .field("did_draw_page", &self.did_draw_page.len())
            .finish()
    }
}

/// Run cell hooks in order; the first [`Control::Skip`] wins and ends the
/// chain.
pub(crate) fn run_cell_hooks(hooks: &mut [CellHook], ctx: &mut CellContext<'_>) -> Control {
    for hook in hooks {
        if hook(ctx) == Control::Skip {
            return Control::Skip;
        }
    }
    Control::Proceed
}

pub(crate) fn run_page_hooks(hooks: &mut [PageHook], ctx: &mut PageContext<'_>) {
    for hook in hooks {
        hook(ctx);
    }
}
