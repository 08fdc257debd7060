use crate::units::Mm;

/// A four-sided box of resolved spacing values, used for table margins, cell
/// padding and per-side border widths. There is no control preventing content
/// from overflowing the margins—they are guidelines for the layout passes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Edges {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Edges {
    /// Create edges by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Mm, right: Mm, bottom: Mm, left: Mm) -> Edges {
        Edges {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create edges where all values are equal
    pub fn all(value: Mm) -> Edges {
        Edges {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn vertical(&self) -> Mm {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> Mm {
        self.left + self.right
    }
}

/// Heterogeneous spacing input, accepted wherever a margin, padding or border
/// width can be configured.
///
/// Three shapes are supported, mirroring CSS shorthand conventions:
///
/// * a single uniform value,
/// * an ordered sequence of 1–4 values (top, right, bottom, left; two values
///   expand to vertical/horizontal, three leave `left` mirroring `right`),
/// * a directional record where `vertical`/`horizontal` aliases override
///   `top`+`bottom` and `left`+`right` respectively.
///
/// Resolution never fails: malformed or absent components degrade to the
/// caller-supplied default, applied per side independently.
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    Uniform(f64),
    Sequence(Vec<f64>),
    Sides {
        top: Option<f64>,
        right: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
        vertical: Option<f64>,
        horizontal: Option<f64>,
    },
}

impl Default for Spacing {
    fn default() -> Spacing {
        Spacing::Uniform(0.0)
    }
}

impl From<f64> for Spacing {
    fn from(value: f64) -> Spacing {
        Spacing::Uniform(value)
    }
}

impl From<[f64; 4]> for Spacing {
    fn from(value: [f64; 4]) -> Spacing {
        Spacing::Sequence(value.to_vec())
    }
}

impl From<[f64; 2]> for Spacing {
    fn from(value: [f64; 2]) -> Spacing {
        Spacing::Sequence(value.to_vec())
    }
}

impl Spacing {
    /// A directional record with only the named sides set.
    pub fn sides(
        top: Option<f64>,
        right: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
    ) -> Spacing {
        Spacing::Sides {
            top,
            right,
            bottom,
            left,
            vertical: None,
            horizontal: None,
        }
    }

    /// Normalize this input into a four-sided box, falling back to `default`
    /// for any side that is missing or not a finite number.
    pub fn resolve(&self, default: Mm) -> Edges {
        let side = |v: Option<f64>| match v {
            Some(v) if v.is_finite() => Mm(v),
            _ => default,
        };
        match self {
            Spacing::Uniform(v) => Edges::all(side(Some(*v))),
            Spacing::Sequence(values) => match values.as_slice() {
                [] => Edges::all(default),
                [v] => Edges::all(side(Some(*v))),
                [t, r] => Edges::trbl(side(Some(*t)), side(Some(*r)), side(Some(*t)), side(Some(*r))),
                [t, r, b] => Edges::trbl(side(Some(*t)), side(Some(*r)), side(Some(*b)), side(Some(*r))),
                [t, r, b, l, ..] => {
                    Edges::trbl(side(Some(*t)), side(Some(*r)), side(Some(*b)), side(Some(*l)))
                }
            },
            Spacing::Sides {
                top,
                right,
                bottom,
                left,
                vertical,
                horizontal,
            } => {
                // vertical/horizontal aliases win over the plain sides
                let top = vertical.or(*top);
                let bottom = vertical.or(*bottom);
                let left = horizontal.or(*left);
                let right = horizontal.or(*right);
                Edges::trbl(side(top), side(right), side(bottom), side(left))
            }
        }
    }
}
