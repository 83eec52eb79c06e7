//! Physical constants shared by the orbital, supernova and coalescence code.
//!
//! Each block works in its own unit system: orbital bookkeeping in
//! AU / M☉ / yr, supernova geometry in km / M☉ / s, and gravitational-wave
//! coalescence in SI.

use std::f64::consts::PI;

/// Gravitational constant in AU³ M☉⁻¹ yr⁻² (Kepler's third law with P in years)
pub const G_AU_MSOL_YR: f64 = 4.0 * PI * PI;

/// Gravitational constant in km³ M☉⁻¹ s⁻²
pub const G_KM_MSOL_S: f64 = 1.327_124_400_18e11;

/// Gravitational constant in m³ kg⁻¹ s⁻²
pub const G_SI: f64 = 6.674_30e-11;

/// Speed of light in m s⁻¹
pub const SPEED_OF_LIGHT_SI: f64 = 2.997_924_58e8;

/// Age of the Universe in years, used as the coalescence cut-off
pub const HUBBLE_TIME_YEARS: f64 = 1.37e10;
