//! Gaussian proposal for adaptive importance sampling of initial conditions.
//!
//! The proposal is centred on a region of interest in
//! `(log10 m1, q, log10 a)`. Draws landing outside the configured parameter
//! space are rejected by the birth loop.

use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use stellar::sampling::sample_gaussian;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GaussianProposal {
    pub mean_log_primary_mass: f64,
    pub std_dev_log_primary_mass: f64,
    pub mean_mass_ratio: f64,
    pub std_dev_mass_ratio: f64,
    pub mean_log_separation: f64,
    pub std_dev_log_separation: f64,
}

/// One proposal draw: primary mass in M☉, mass ratio, separation in AU
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposalDraw {
    pub primary_mass: f64,
    pub mass_ratio: f64,
    pub separation: f64,
}

/// Bounds of the supported parameter space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpace {
    pub primary_mass: (f64, f64),
    pub mass_ratio: (f64, f64),
    pub separation: (f64, f64),
}

impl GaussianProposal {
    pub fn draw(&self, rng: &mut ChaChaRng) -> ProposalDraw {
        let log_mass = sample_gaussian(rng, self.mean_log_primary_mass, self.std_dev_log_primary_mass);
        let mass_ratio = sample_gaussian(rng, self.mean_mass_ratio, self.std_dev_mass_ratio);
        let log_separation =
            sample_gaussian(rng, self.mean_log_separation, self.std_dev_log_separation);
        ProposalDraw {
            primary_mass: 10f64.powf(log_mass),
            mass_ratio,
            separation: 10f64.powf(log_separation),
        }
    }
}

impl ParameterSpace {
    pub fn contains(&self, draw: &ProposalDraw) -> bool {
        let within = |value: f64, (low, high): (f64, f64)| value >= low && value <= high;
        within(draw.primary_mass, self.primary_mass)
            && within(draw.mass_ratio, self.mass_ratio)
            && within(draw.separation, self.separation)
    }
}
