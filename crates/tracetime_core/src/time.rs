//! Time types for TRACETIME.
//!
//! Recorders stamp snapshots with a monotonic clock in milliseconds
//! (fractional). Wall-clock time never enters resolution.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Monotonic recording time in milliseconds
///
/// Always finite, so it is totally ordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Timestamp(f64);

impl Timestamp {
    /// Recording origin
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Create from milliseconds
    ///
    /// # Errors
    ///
    /// Returns error if the value is NaN or infinite
    pub fn from_millis(millis: f64) -> CoreResult<Self> {
        if !millis.is_finite() {
            return Err(CoreError::InvalidTimestamp {
                reason: format!("{} is not finite", millis),
            });
        }
        // -0.0 and 0.0 must compare equal under total_cmp.
        Ok(Self(millis + 0.0))
    }

    /// Parse a decimal millisecond value, as found in query strings
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a finite number
    pub fn parse(s: &str) -> CoreResult<Self> {
        let millis: f64 = s.trim().parse().map_err(|_| CoreError::InvalidTimestamp {
            reason: format!("not a number: {:?}", s),
        })?;
        Self::from_millis(millis)
    }

    /// Get milliseconds
    #[must_use]
    pub const fn as_millis(&self) -> f64 {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Timestamp {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_millis(value)
    }
}

impl From<Timestamp> for f64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<u32> for Timestamp {
    fn from(millis: u32) -> Self {
        Self(f64::from(millis))
    }
}
