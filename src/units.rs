use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};

/// A distance in millimetres.
///
/// The whole engine works in a single linear unit. Table geometry, margins,
/// padding and resolved cell boxes are all expressed in `Mm`; the measurement
/// collaborator is expected to report text widths in the same space (see
/// [`Measure`](crate::Measure)).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Mm(pub f64);

impl Mm {
    pub const ZERO: Mm = Mm(0.0);

    /// The larger of two distances.
    pub fn max(self, other: Mm) -> Mm {
        Mm(self.0.max(other.0))
    }

    /// The smaller of two distances.
    pub fn min(self, other: Mm) -> Mm {
        Mm(self.0.min(other.0))
    }

    pub fn abs(self) -> Mm {
        Mm(self.0.abs())
    }
}

/// Scale a distance, e.g. a column's proportional share of leftover width.
impl std::ops::Mul<f64> for Mm {
    type Output = Mm;

    fn mul(self, rhs: f64) -> Mm {
        Mm(self.0 * rhs)
    }
}

impl std::ops::Div<f64> for Mm {
    type Output = Mm;

    fn div(self, rhs: f64) -> Mm {
        Mm(self.0 / rhs)
    }
}

/// Ratio of two distances, e.g. a column's share of the total wrapped width.
impl std::ops::Div<Mm> for Mm {
    type Output = f64;

    fn div(self, rhs: Mm) -> f64 {
        self.0 / rhs.0
    }
}
