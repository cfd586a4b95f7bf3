//! Points on the score time-line.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::fraction_tools::floor_fraction;
use super::Duration;

/// Exact rational point in time, measured in whole notes.
///
/// Offsets may be negative. They are always finite, so they carry a
/// total order.
///
/// # Example
/// ```
/// use fraction::Fraction;
/// use score_tree::primitives::{Duration, Offset};
///
/// let a = Offset::from(0);
/// let b = Offset::from(Fraction::new(4u64, 4u64));
/// assert!(a < b);
/// assert_eq!(a.distance_to(&b), Duration::new(1, 1));
/// assert_eq!(b.distance_to(&a), Duration::new(1, 1));
/// assert_eq!(a + Duration::new(1, 1), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    offset: Fraction,
}

impl Offset {
    /// # Panics
    /// On a zero denominator.
    pub fn new(num: i64, den: u64) -> Self {
        let frac = if num < 0 {
            -Fraction::new(num.unsigned_abs(), den)
        } else {
            Fraction::new(num as u64, den)
        };
        Self::from(frac)
    }

    pub fn get(&self) -> Fraction {
        self.offset
    }

    /// Absolute distance between two points, as a span.
    pub fn distance_to(&self, other: &Self) -> Duration {
        let (mut a, mut b) = (self.offset, other.offset);
        if a < b {
            (a, b) = (b, a);
        }
        Duration::from_fraction(a - b).expect("larger minus smaller is never negative")
    }

    /// Nearest multiple of `quantum`; halves round up.
    pub(crate) fn round_to_multiple(&self, quantum: Fraction) -> Self {
        let steps = floor_fraction(self.offset / quantum + Fraction::new(1u64, 2u64));
        Self::from(steps * quantum)
    }
}

/// Offsets are constructed finite, so malformed fractions are a fatal
/// input error rather than a representable state.
fn ensure_finite(frac: Fraction) -> Fraction {
    match frac {
        Fraction::Rational(..) => frac,
        _ => panic!("time offset must be a finite rational, got {}", frac),
    }
}

impl Eq for Offset {}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Offset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .partial_cmp(&other.offset)
            .expect("offsets are always finite")
    }
}

impl From<Fraction> for Offset {
    fn from(value: Fraction) -> Self {
        Self {
            offset: ensure_finite(value),
        }
    }
}

impl From<i64> for Offset {
    fn from(value: i64) -> Self {
        Self::new(value, 1)
    }
}

impl From<(i64, u64)> for Offset {
    fn from((num, den): (i64, u64)) -> Self {
        Self::new(num, den)
    }
}

impl From<Duration> for Offset {
    fn from(value: Duration) -> Self {
        Self { offset: value.get() }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

impl Add for Offset {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::from(self.offset + rhs.offset)
    }
}

impl Sub for Offset {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from(self.offset - rhs.offset)
    }
}

impl Add<Duration> for Offset {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self::Output {
        Self::from(self.offset + rhs.get())
    }
}

impl AddAssign<Duration> for Offset {
    fn add_assign(&mut self, rhs: Duration) {
        self.offset = self.offset + rhs.get();
    }
}

impl Sub<Duration> for Offset {
    type Output = Self;
    fn sub(self, rhs: Duration) -> Self::Output {
        Self::from(self.offset - rhs.get())
    }
}

impl SubAssign<Duration> for Offset {
    fn sub_assign(&mut self, rhs: Duration) {
        self.offset = self.offset - rhs.get();
    }
}

impl Add<Fraction> for Offset {
    type Output = Self;
    fn add(self, rhs: Fraction) -> Self::Output {
        Self::from(self.offset + rhs)
    }
}

impl Neg for Offset {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::from(-self.offset)
    }
}
