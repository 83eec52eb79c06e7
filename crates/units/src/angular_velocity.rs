use crate::time::SECONDS_PER_YEAR;
use serde::{Deserialize, Serialize};

/// Angular velocity, base unit rad/yr.
///
/// Stellar spins and orbital frequencies share this unit so they can be
/// compared directly, e.g. against a chemically homogeneous threshold.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngularVelocity(f64);

impl AngularVelocity {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_rad_per_year(value: f64) -> Self {
        Self(value)
    }

    pub fn from_rad_per_sec(value: f64) -> Self {
        Self(value * SECONDS_PER_YEAR)
    }

    pub fn to_rad_per_year(&self) -> f64 {
        self.0
    }

    pub fn to_rad_per_sec(&self) -> f64 {
        self.0 / SECONDS_PER_YEAR
    }
}
