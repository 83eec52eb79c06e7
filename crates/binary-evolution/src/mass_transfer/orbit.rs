//! Semi-major axis response to non-conservative mass transfer.

use units::constants::G_AU_MSOL_YR;

use crate::roche::AngularMomentumLoss;

/// Fixed parameters of one transfer episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferParameters {
    /// Donor mass at the start of the episode, M☉
    pub donor_mass: f64,
    /// Accretor mass at the start of the episode, M☉
    pub accretor_mass: f64,
    /// β, fraction of the transferred mass the accretor keeps
    pub fraction_accreted: f64,
    pub angular_momentum_loss: AngularMomentumLoss,
    pub arbitrary_gamma: f64,
    /// Largest donor mass fraction moved in one sub-step
    pub max_fraction_per_step: f64,
}

/// Orbit at the end of an integration, AU and M☉ AU² yr⁻¹
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitIntegration {
    pub semi_major_axis: f64,
    pub orbital_angular_momentum: f64,
}

/// Integrate the separation over a donor mass change.
///
/// The change is split into `n = max(⌊|ΔM_d| / (f M_d)⌋, 1)` equal
/// sub-steps. Each sub-step re-evaluates γ from the instantaneous masses,
/// then applies
///
/// ```text
/// J_orb += γ J_orb (1 - β) dM / (M_d + M_a)
/// a     += -2 (dM / M_d) (1 - β M_d/M_a - (1 - β)(γ + 1/2) M_d/(M_d + M_a)) a
/// M_d   += dM
/// M_a   -= β dM
/// ```
///
/// # Arguments
/// * `parameters` - Masses, β and the angular momentum loss mode
/// * `semi_major_axis` - Separation before transfer in AU
/// * `donor_mass_change` - Change of the donor mass, negative for loss
pub fn integrate_semi_major_axis(
    parameters: &TransferParameters,
    semi_major_axis: f64,
    donor_mass_change: f64,
) -> OrbitIntegration {
    let beta = parameters.fraction_accreted;
    let mut donor = parameters.donor_mass;
    let mut accretor = parameters.accretor_mass;
    let mut a = semi_major_axis;

    let total = donor + accretor;
    let mut angular_momentum = (donor * accretor / total) * (a * G_AU_MSOL_YR * total).sqrt();

    let max_step = parameters.max_fraction_per_step * donor;
    let steps = ((donor_mass_change.abs() / max_step).floor() as usize).max(1);
    let dm = donor_mass_change / steps as f64;

    for _ in 0..steps {
        let gamma =
            parameters
                .angular_momentum_loss
                .gamma(donor, accretor, parameters.arbitrary_gamma);
        let total = donor + accretor;

        angular_momentum += gamma * angular_momentum * (1.0 - beta) / total * dm;
        let response = 1.0 - beta * donor / accretor - (1.0 - beta) * (gamma + 0.5) * donor / total;
        a += (-2.0 * dm / donor) * response * a;

        donor += dm;
        accretor -= dm * beta;
    }

    OrbitIntegration {
        semi_major_axis: a,
        orbital_angular_momentum: angular_momentum,
    }
}
