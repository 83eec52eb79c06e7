//! Roche-lobe geometry and its response to mass transfer.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Roche-lobe radius in units of the separation, as seen by the body of
/// mass `mass` orbiting `companion_mass`.
///
/// # Formula
///
/// ```text
/// q = M / M_c
/// R_L / a = 0.49 q^(2/3) / (0.6 q^(2/3) + ln(1 + q^(1/3)))
/// ```
///
/// # References
///
/// - Eggleton (1983), ApJ 268, 368, eq. 2
pub fn roche_lobe_radius(mass: f64, companion_mass: f64) -> f64 {
    let q = mass / companion_mass;
    let cube_root = q.cbrt();
    0.49 / (0.6 + (1.0 + cube_root).ln() / cube_root / cube_root)
}

/// How non-accreted mass carries angular momentum away from the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AngularMomentumLoss {
    /// Fast wind from the donor
    Jeans,
    /// Re-emitted from the vicinity of the accretor
    #[default]
    IsotropicReEmission,
    /// Lost through a circumbinary ring at twice the separation
    CircumbinaryRing,
    /// Fixed, configured value
    Arbitrary,
}

impl From<String> for AngularMomentumLoss {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "jeans" => Self::Jeans,
            "isotropic_re_emission" | "isotropic" => Self::IsotropicReEmission,
            "circumbinary_ring" | "circumbinary" => Self::CircumbinaryRing,
            "arbitrary" => Self::Arbitrary,
            other => {
                warn!(
                    value = other,
                    "unknown angular momentum loss prescription, using isotropic re-emission"
                );
                Self::default()
            }
        }
    }
}

impl AngularMomentumLoss {
    /// Specific angular momentum of lost material in units of the orbital
    /// specific angular momentum (gamma).
    ///
    /// # Arguments
    /// * `donor_mass` - Donor mass in M☉
    /// * `accretor_mass` - Accretor mass in M☉
    /// * `arbitrary_gamma` - Value returned for [`AngularMomentumLoss::Arbitrary`]
    pub fn gamma(self, donor_mass: f64, accretor_mass: f64, arbitrary_gamma: f64) -> f64 {
        match self {
            Self::Jeans => accretor_mass / donor_mass,
            Self::IsotropicReEmission => donor_mass / accretor_mass,
            Self::CircumbinaryRing => {
                let total = donor_mass + accretor_mass;
                std::f64::consts::SQRT_2 * total * total / (donor_mass * accretor_mass)
            }
            Self::Arbitrary => arbitrary_gamma,
        }
    }
}

/// Logarithmic response of the donor's Roche lobe to mass loss,
/// `d ln R_L / d ln M_d`.
///
/// # Formula
///
/// ```text
/// q  = M_d / M_a,  c = q^(1/3)
/// k1 = -2 (1 - βq - (1 - β)(γ + 1/2) q / (1 + q))
/// k2 = 2/3 - c (1.2c + 1/(1 + c)) / (3 (0.6c² + ln(1 + c)))
/// k3 = 1 + βq
/// ζ_RL = k1 + k2·k3
/// ```
///
/// # Arguments
/// * `donor_mass` - Donor mass in M☉
/// * `accretor_mass` - Accretor mass in M☉
/// * `fraction_accreted` - β, the fraction of transferred mass retained
/// * `gamma` - Specific angular momentum of the lost material
///
/// # References
///
/// - Woods et al. (2012), ApJ 744, 12
/// - van der Sluys, "Binary evolution in a nutshell", eq. 60
pub fn roche_lobe_zeta(
    donor_mass: f64,
    accretor_mass: f64,
    fraction_accreted: f64,
    gamma: f64,
) -> f64 {
    let beta = fraction_accreted;
    let q = donor_mass / accretor_mass;
    let c = q.cbrt();

    let k1 = -2.0 * (1.0 - beta * q - (1.0 - beta) * (gamma + 0.5) * (q / (1.0 + q)));
    let k2 = 2.0 / 3.0 - c * (1.2 * c + 1.0 / (1.0 + c)) / (3.0 * (0.6 * c * c + (1.0 + c).ln()));
    let k3 = 1.0 + beta * q;
    k1 + k2 * k3
}
