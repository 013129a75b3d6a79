use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::fmt::Display;
use std::ops::{Add, Mul};
use thiserror::Error;

// Danish retail prices quote provider fees in øre but settle bills in
// kroner. Keeping the two denominations as distinct types means a fee can
// only enter a price sum through an explicit conversion.
pub const OERE_PER_KRONE: u32 = 100;
pub const MONTHS_PER_YEAR: u32 = 12;

/// An amount of Danish kroner per kilowatt-hour, the denomination all
/// price composition happens in.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, PartialOrd, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(transparent)]
#[repr(transparent)]
pub struct KronerPerKwh(#[validate(minimum = 0.)] f64);

impl KronerPerKwh {
    pub fn new(value: f64) -> Result<Self, NotAPriceComponentError> {
        if !value.is_finite() {
            return Err(NotAPriceComponentError::NotFinite(value));
        }
        if value < 0. {
            return Err(NotAPriceComponentError::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Add for KronerPerKwh {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for KronerPerKwh {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Display for KronerPerKwh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for KronerPerKwh {
    fn from(value: f64) -> Self {
        Self::new(value).expect("A kr/kWh amount was expected to be finite and non-negative")
    }
}

/// An amount of øre per kilowatt-hour, the denomination providers publish
/// their per-kWh fees in. One øre is a hundredth of a krone.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, PartialOrd, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(transparent)]
#[repr(transparent)]
pub struct OerePerKwh(#[validate(minimum = 0.)] f64);

impl OerePerKwh {
    pub fn new(value: f64) -> Result<Self, NotAPriceComponentError> {
        if !value.is_finite() {
            return Err(NotAPriceComponentError::NotFinite(value));
        }
        if value < 0. {
            return Err(NotAPriceComponentError::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Convert to kroner, dividing by 100. This is the only place in the
    /// crate where øre turn into kroner.
    pub fn to_kroner(self) -> KronerPerKwh {
        KronerPerKwh(self.0 / OERE_PER_KRONE as f64)
    }
}

impl Display for OerePerKwh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for OerePerKwh {
    fn from(value: f64) -> Self {
        Self::new(value).expect("An øre/kWh amount was expected to be finite and non-negative")
    }
}

#[derive(Clone, Copy, Debug, Error)]
pub enum NotAPriceComponentError {
    #[error("A price component value of {0} was encountered, which is not a finite number")]
    NotFinite(f64),
    #[error("A price component value of {0} was encountered, which is negative")]
    Negative(f64),
}
