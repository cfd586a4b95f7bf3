//! Non-negative spans of time.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use fraction::Fraction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fraction_tools::{decompose_fraction, is_assignable_fraction};

#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("duration can not be negative, got {0}")]
    Negative(Fraction),
    #[error("duration must be a finite rational, got {0}")]
    NotFinite(Fraction),
}

/// Exact rational span of time, measured in whole notes.
///
/// Always finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    fraction: Fraction,
}

impl Duration {
    /// # Panics
    /// On a zero denominator.
    pub fn new(num: u64, den: u64) -> Self {
        Self::from_fraction(Fraction::new(num, den))
            .expect("unsigned parts can not make a negative duration")
    }

    pub fn zero() -> Self {
        Self {
            fraction: Fraction::from(0),
        }
    }

    /// Checked construction: the only way a `Duration` can come from
    /// signed arithmetic.
    pub fn from_fraction(fraction: Fraction) -> Result<Self, DurationError> {
        match fraction {
            Fraction::Rational(..) => {
                if fraction < Fraction::from(0) {
                    Err(DurationError::Negative(fraction))
                } else {
                    Ok(Self { fraction })
                }
            }
            _ => Err(DurationError::NotFinite(fraction)),
        }
    }

    pub fn get(&self) -> Fraction {
        self.fraction
    }

    pub fn is_zero(&self) -> bool {
        self.fraction == Fraction::from(0)
    }

    /// True if the span can be written as a single notated symbol
    /// (power-of-two base, optionally dotted).
    pub fn is_assignable(&self) -> bool {
        is_assignable_fraction(self.fraction)
    }

    /// True if the denominator is a power of two, which is what the
    /// tie-chain decomposition needs to work on.
    pub fn is_binary(&self) -> bool {
        self.fraction
            .denom()
            .map(|den| den.is_power_of_two())
            .unwrap_or(false)
    }

    /// Split the span into the minimal run of assignable spans,
    /// smallest first. An assignable span comes back as a singleton.
    ///
    /// Only meaningful for binary spans; see [`Duration::is_binary`].
    pub fn decompose(&self) -> Vec<Duration> {
        decompose_fraction(self.fraction, VecDeque::new())
            .into_iter()
            .map(|frac| Self { fraction: frac })
            .collect()
    }
}

impl Eq for Duration {}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fraction
            .partial_cmp(&other.fraction)
            .expect("durations are always finite")
    }
}

impl From<(u64, u64)> for Duration {
    fn from((num, den): (u64, u64)) -> Self {
        Self::new(num, den)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fraction)
    }
}

impl Add for Duration {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            fraction: self.fraction + rhs.fraction,
        }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.fraction = self.fraction + rhs.fraction;
    }
}

impl Sub for Duration {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        let frac = self.fraction - rhs.fraction;
        if frac < Fraction::from(0) {
            panic!(
                "duration can not be negative. left: {}, right: {}, result: {}",
                self.fraction, rhs.fraction, frac
            );
        }
        Self { fraction: frac }
    }
}

impl Mul<Fraction> for Duration {
    type Output = Self;
    fn mul(self, rhs: Fraction) -> Self::Output {
        Self::from_fraction(self.fraction * rhs)
            .expect("duration scaled by a negative factor")
    }
}

/// Ratio between two spans.
impl Div for Duration {
    type Output = Fraction;
    fn div(self, rhs: Self) -> Self::Output {
        self.fraction / rhs.fraction
    }
}
