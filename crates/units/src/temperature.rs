use serde::{Deserialize, Serialize};

/// Effective temperature of the Sun in Kelvin
pub const SOLAR_TEMPERATURE_K: f64 = 5772.0;

/// A temperature using f64 precision. Base unit: Kelvin.
///
/// # Examples
///
/// ```rust
/// use units::Temperature;
///
/// let sun = Temperature::from_solar_temperature(1.0);
/// assert_eq!(sun.to_kelvin(), 5772.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Temperature(f64); // Base unit: Kelvin

impl Temperature {
    pub fn from_kelvin(value: f64) -> Self {
        Self(value)
    }

    /// Creates a temperature in units of the solar effective temperature.
    pub fn from_solar_temperature(value: f64) -> Self {
        Self(value * SOLAR_TEMPERATURE_K)
    }

    pub fn to_kelvin(&self) -> f64 {
        self.0
    }

    pub fn to_solar_temperature(&self) -> f64 {
        self.0 / SOLAR_TEMPERATURE_K
    }
}
