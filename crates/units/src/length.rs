use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub const AU_TO_M: f64 = 1.495_978_707e11;
pub const AU_TO_KM: f64 = 1.495_978_707e8;

/// Solar radius in AU: 1 R☉ = 0.00465047 AU
pub const SOLAR_RADIUS_AU: f64 = 1.0 / 215.032;
/// AU to solar radii
pub const AU_TO_SOLAR_RADIUS: f64 = 1.0 / SOLAR_RADIUS_AU;

/// A physical length using f64 precision.
///
/// Astronomical units are the base unit, matching the orbital bookkeeping.
/// Stellar radii usually arrive in solar radii and supernova geometry is
/// worked in kilometres, so both have direct constructors.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// let separation = Length::from_au(1.0);
/// let radius = Length::from_solar_radii(215.032);
/// assert!((separation.to_au() - radius.to_au()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: AU

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Length` from a value in astronomical units.
    pub fn from_au(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a value in solar radii.
    pub fn from_solar_radii(value: f64) -> Self {
        Self(value * SOLAR_RADIUS_AU)
    }

    /// Creates a new `Length` from a value in kilometers.
    pub fn from_km(value: f64) -> Self {
        Self(value / AU_TO_KM)
    }

    /// Creates a new `Length` from a value in meters.
    pub fn from_meters(value: f64) -> Self {
        Self(value / AU_TO_M)
    }

    pub fn to_au(&self) -> f64 {
        self.0
    }

    pub fn to_solar_radii(&self) -> f64 {
        self.0 * AU_TO_SOLAR_RADIUS
    }

    pub fn to_km(&self) -> f64 {
        self.0 * AU_TO_KM
    }

    pub fn to_meters(&self) -> f64 {
        self.0 * AU_TO_M
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// True if the stored value is NaN, used for not-applicable orbital outputs
    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    pub fn not_applicable() -> Self {
        Self(f64::NAN)
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Length) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Length> for f64 {
    type Output = Length;

    fn mul(self, rhs: Length) -> Length {
        rhs * self
    }
}
