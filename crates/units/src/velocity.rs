use crate::length::AU_TO_KM;
use crate::time::SECONDS_PER_YEAR;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Convert between AU/year and km/s
pub const AU_YEAR_TO_KM_SEC: f64 = AU_TO_KM / SECONDS_PER_YEAR;

/// A speed using f64 precision. Base unit: km/s.
///
/// Natal kicks and systemic velocities are conventionally quoted in km/s,
/// while orbital speeds from Kepler's law come out in AU/yr.
///
/// # Examples
///
/// ```rust
/// use units::Velocity;
///
/// let kick = Velocity::from_km_per_sec(265.0);
/// let earth = Velocity::from_au_per_year(std::f64::consts::TAU);
/// assert!((earth.to_km_per_sec() - 29.78).abs() < 0.01);
/// assert!(kick > earth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64);

impl Velocity {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn from_au_per_year(value: f64) -> Self {
        Self(value * AU_YEAR_TO_KM_SEC)
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.0
    }

    pub fn to_au_per_year(&self) -> f64 {
        self.0 / AU_YEAR_TO_KM_SEC
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

impl Div<f64> for Velocity {
    type Output = Velocity;

    fn div(self, rhs: f64) -> Velocity {
        Velocity(self.0 / rhs)
    }
}

/// Ratio of two speeds, e.g. a kick relative to the orbital speed
impl Div for Velocity {
    type Output = f64;

    fn div(self, rhs: Velocity) -> f64 {
        self.0 / rhs.0
    }
}
