use std::ops::{Add, AddAssign};

/// The number of values a downstream has authorized for delivery.
///
/// A demand is either a finite count or [`UNLIMITED`](Demand::UNLIMITED).
/// Addition saturates, and unlimited absorbs anything added to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Demand(Option<usize>);

pub(crate) const UNLIMITED_RAW: u64 = u64::MAX;

impl Demand {
    pub const NONE: Demand = Demand(Some(0));
    pub const UNLIMITED: Demand = Demand(None);

    pub fn max(count: usize) -> Self {
        Demand(Some(count))
    }

    pub fn is_unlimited(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_none(&self) -> bool {
        matches!(self.0, Some(0))
    }

    pub(crate) fn into_raw(self) -> u64 {
        match self.0 {
            Some(count) => count as u64,
            None => UNLIMITED_RAW,
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Demand::NONE
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, rhs: Self) -> Self::Output {
        match (self.0, rhs.0) {
            (Some(lhs), Some(rhs)) => Demand(Some(lhs.saturating_add(rhs))),
            _ => Demand::UNLIMITED,
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl From<usize> for Demand {
    fn from(count: usize) -> Self {
        Demand::max(count)
    }
}
