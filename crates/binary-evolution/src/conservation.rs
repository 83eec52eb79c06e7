//! Energy and angular momentum of the binary.
//!
//! Units are M☉, AU and years throughout (G = 4π²).

use serde::{Deserialize, Serialize};
use stellar::StellarModel;
use units::Length;
use units::constants::G_AU_MSOL_YR;

/// Aggregate mechanical state of a binary
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanics {
    pub total_mass: f64,
    pub reduced_mass: f64,
    pub orbital_energy: f64,
    pub total_energy: f64,
    pub orbital_angular_momentum: f64,
    pub total_angular_momentum: f64,
}

/// Keplerian orbital energy, `-G m1 m2 / 2a`
pub fn orbital_energy(m1: f64, m2: f64, semi_major_axis: f64) -> f64 {
    -G_AU_MSOL_YR * m1 * m2 / (2.0 * semi_major_axis)
}

/// Keplerian orbital angular momentum.
///
/// # Formula
///
/// ```text
/// J_orb = (m1 m2 / M) √(G M a (1 - e²))
/// ```
pub fn orbital_angular_momentum(m1: f64, m2: f64, semi_major_axis: f64, eccentricity: f64) -> f64 {
    let total = m1 + m2;
    (m1 * m2 / total)
        * (G_AU_MSOL_YR * total * semi_major_axis * (1.0 - eccentricity * eccentricity)).sqrt()
}

/// Moment of inertia `k M R²` in M☉ AU²
fn moment_of_inertia<S: StellarModel>(star: &S) -> f64 {
    let radius = star.radius().to_au();
    star.gyration_radius() * star.mass().to_solar_masses() * radius * radius
}

/// Spin angular momentum `I ω`
pub fn spin_angular_momentum<S: StellarModel>(star: &S) -> f64 {
    moment_of_inertia(star) * star.omega().to_rad_per_year()
}

/// Rotational kinetic energy `½ I ω²`
pub fn spin_energy<S: StellarModel>(star: &S) -> f64 {
    let omega = star.omega().to_rad_per_year();
    0.5 * moment_of_inertia(star) * omega * omega
}

/// Energy and angular momentum of two stars on the given orbit
pub fn compute_mechanics<S: StellarModel>(
    star1: &S,
    star2: &S,
    semi_major_axis: Length,
    eccentricity: f64,
) -> Mechanics {
    let m1 = star1.mass().to_solar_masses();
    let m2 = star2.mass().to_solar_masses();
    let a = semi_major_axis.to_au();
    let total_mass = m1 + m2;

    let orbital_energy = orbital_energy(m1, m2, a);
    let orbital_angular_momentum = orbital_angular_momentum(m1, m2, a, eccentricity);

    Mechanics {
        total_mass,
        reduced_mass: m1 * m2 / total_mass,
        orbital_energy,
        total_energy: spin_energy(star1) + spin_energy(star2) + orbital_energy,
        orbital_angular_momentum,
        total_angular_momentum: spin_angular_momentum(star1)
            + spin_angular_momentum(star2)
            + orbital_angular_momentum,
    }
}

/// Keplerian mean angular velocity of the orbit in rad/yr
pub fn orbital_angular_velocity(total_mass: f64, semi_major_axis: f64) -> f64 {
    (G_AU_MSOL_YR * total_mass / semi_major_axis.powi(3)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn earth_sun_orbit() {
        // One solar mass plus a test particle at 1 AU orbits once per year
        assert_relative_eq!(orbital_angular_velocity(1.0, 1.0), TAU, max_relative = 1e-12);
        assert_relative_eq!(orbital_energy(1.0, 1.0, 1.0), -2.0 * std::f64::consts::PI.powi(2));
    }

    #[test]
    fn eccentricity_lowers_orbital_angular_momentum() {
        let circular = orbital_angular_momentum(10.0, 8.0, 5.0, 0.0);
        let eccentric = orbital_angular_momentum(10.0, 8.0, 5.0, 0.6);
        assert_relative_eq!(eccentric / circular, 0.8, max_relative = 1e-12);
    }
}
