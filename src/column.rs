use crate::units::Mm;

/// A table column, identified by a stable data key (declared, or the
/// positional index stringified) and its 0-based index. The measured width
/// fields are aggregated over the column's live cells during width
/// resolution; `width` is the single resolved value the rest of the layout
/// uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub index: usize,
    pub data_key: String,

    pub wrapped_width: Mm,
    pub min_readable_width: Mm,
    pub min_width: Mm,
    pub width: Mm,
}

impl Column {
    pub fn new(index: usize, data_key: impl Into<String>) -> Column {
        Column {
            index,
            data_key: data_key.into(),
            wrapped_width: Mm::ZERO,
            min_readable_width: Mm::ZERO,
            min_width: Mm::ZERO,
            width: Mm::ZERO,
        }
    }
}
