//! Random draws shared by star construction and initial-condition sampling.

use std::f64::consts::PI;

use rand::Rng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sample from a Gaussian (normal) distribution using Box-Muller transform
///
/// # Arguments
/// * `rng` - Random number generator
/// * `mean` - Mean of the distribution
/// * `std_dev` - Standard deviation
///
/// # Returns
/// A sample from the normal distribution N(mean, std_dev²)
pub fn sample_gaussian(rng: &mut ChaChaRng, mean: f64, std_dev: f64) -> f64 {
    // 1 - u keeps the logarithm finite
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

/// Inverse-transform sample from p(x) ∝ x^power on [x_min, x_max].
///
/// A power of exactly -1 is the flat-in-log case and is sampled as
/// `x_min · (x_max/x_min)^u`.
///
/// # Arguments
/// * `power` - Power-law exponent (e.g. -2.35 for Salpeter)
/// * `x_min` - Lower bound
/// * `x_max` - Upper bound
/// * `rng` - Random number generator
pub fn sample_power_law(power: f64, x_min: f64, x_max: f64, rng: &mut ChaChaRng) -> f64 {
    let u: f64 = rng.random();
    if power == -1.0 {
        return x_min * (u * (x_max / x_min).ln()).exp();
    }
    let power1 = power + 1.0;
    let low = x_min.powf(power1);
    let high = x_max.powf(power1);
    (u * (high - low) + low).powf(1.0 / power1)
}

/// Uniform draw on [low, high)
pub fn sample_uniform(low: f64, high: f64, rng: &mut ChaChaRng) -> f64 {
    low + (high - low) * rng.random::<f64>()
}

/// Initial mass function for primary masses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum InitialMassFunction {
    /// Salpeter (1955), slope -2.35
    Salpeter,
    /// Single power law with a configurable slope
    PowerLaw,
    Uniform,
    /// Kroupa (2001) broken power law
    #[default]
    Kroupa,
}

impl From<String> for InitialMassFunction {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "salpeter" => Self::Salpeter,
            "power_law" | "powerlaw" => Self::PowerLaw,
            "uniform" => Self::Uniform,
            "kroupa" => Self::Kroupa,
            other => {
                warn!(value = other, "unknown initial mass function, using Kroupa");
                Self::default()
            }
        }
    }
}

/// Kroupa (2001) segments: (lower break, upper break, slope)
const KROUPA_SEGMENTS: [(f64, f64, f64); 3] =
    [(0.01, 0.08, -0.3), (0.08, 0.5, -1.3), (0.5, f64::INFINITY, -2.3)];

/// Sample a mass in M☉ from an initial mass function
///
/// # Arguments
/// * `imf` - Mass function
/// * `power` - Slope used by [`InitialMassFunction::PowerLaw`]
/// * `min_mass` - Lower bound in solar masses
/// * `max_mass` - Upper bound in solar masses
/// * `rng` - Random number generator
pub fn sample_initial_mass(
    imf: InitialMassFunction,
    power: f64,
    min_mass: f64,
    max_mass: f64,
    rng: &mut ChaChaRng,
) -> f64 {
    match imf {
        InitialMassFunction::Salpeter => sample_power_law(-2.35, min_mass, max_mass, rng),
        InitialMassFunction::PowerLaw => sample_power_law(power, min_mass, max_mass, rng),
        InitialMassFunction::Uniform => sample_uniform(min_mass, max_mass, rng),
        InitialMassFunction::Kroupa => sample_kroupa(min_mass, max_mass, rng),
    }
}

/// Integral of k·m^α over [a, b]
fn segment_weight(k: f64, alpha: f64, a: f64, b: f64) -> f64 {
    let alpha1 = alpha + 1.0;
    k * (b.powf(alpha1) - a.powf(alpha1)) / alpha1
}

fn sample_kroupa(min_mass: f64, max_mass: f64, rng: &mut ChaChaRng) -> f64 {
    // Continuity coefficients at the 0.08 and 0.5 M☉ breaks
    let mut coefficient = 1.0;
    let mut segments = Vec::with_capacity(KROUPA_SEGMENTS.len());
    for (index, &(low, high, alpha)) in KROUPA_SEGMENTS.iter().enumerate() {
        if index > 0 {
            let previous_alpha = KROUPA_SEGMENTS[index - 1].2;
            coefficient *= low.powf(previous_alpha - alpha);
        }
        let a = low.max(min_mass);
        let b = high.min(max_mass);
        if a < b {
            segments.push((a, b, alpha, segment_weight(coefficient, alpha, a, b)));
        }
    }

    let total: f64 = segments.iter().map(|s| s.3).sum();
    let mut target = total * rng.random::<f64>();
    for &(a, b, alpha, weight) in &segments {
        if target < weight {
            return sample_power_law(alpha, a, b, rng);
        }
        target -= weight;
    }
    // Only reached through rounding at the upper edge
    match segments.last() {
        Some(&(a, b, alpha, _)) => sample_power_law(alpha, a, b, rng),
        None => min_mass,
    }
}
