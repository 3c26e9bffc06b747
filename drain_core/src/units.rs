//! Unit conversion between user-entered measurements and charge.
//!
//! Inputs are microamps and seconds; everything the ledger stores and
//! compares is in milliamp-hours.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

pub const MICROAMPS_PER_AMP: f64 = 1e6;
pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const MILLIAMPS_PER_AMP: f64 = 1000.0;

/// An amount of electric charge in milliamp-hours
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilliampHours(pub f64);

impl MilliampHours {
    pub const ZERO: MilliampHours = MilliampHours(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for MilliampHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honour precision so callers can write `{:.2}`
        match f.precision() {
            Some(p) => write!(f, "{:.*} mAh", p, self.0),
            None => write!(f, "{} mAh", self.0),
        }
    }
}

impl From<f64> for MilliampHours {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<MilliampHours> for f64 {
    fn from(value: MilliampHours) -> Self {
        value.0
    }
}

impl Add for MilliampHours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        MilliampHours(self.0 + rhs.0)
    }
}

impl AddAssign for MilliampHours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for MilliampHours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MilliampHours> for MilliampHours {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

pub fn microamps_to_amps(microamps: f64) -> f64 {
    microamps / MICROAMPS_PER_AMP
}

pub fn seconds_to_hours(seconds: f64) -> f64 {
    seconds / SECONDS_PER_HOUR
}

/// Charge drawn by a constant current over a duration.
///
/// No bounds checking: zero or negative inputs pass through arithmetically.
pub fn compute_consumption(current_microamps: f64, duration_seconds: f64) -> MilliampHours {
    let amps = microamps_to_amps(current_microamps);
    let hours = seconds_to_hours(duration_seconds);
    MilliampHours(amps * hours * MILLIAMPS_PER_AMP)
}

/// Parse one user-entered measurement field.
///
/// Rejects text that is not a number, plus NaN, infinities and negative
/// values. Zero is accepted.
pub fn parse_measurement(field: &'static str, input: &str) -> Result<f64> {
    let value: f64 = input.trim().parse().map_err(|_| Error::InvalidNumber {
        field,
        input: input.to_string(),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::OutOfRange { field, value });
    }

    Ok(value)
}
