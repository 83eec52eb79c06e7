//! Stability classification of Roche-lobe overflow.

use stellar::StellarType;

use crate::config::{CaseBbStability, CriticalMassRatios, MassAcceptance};

/// Donor/accretor mass ratio above the configured threshold for the donor's stage
pub fn exceeds_critical_mass_ratio(
    ratios: &CriticalMassRatios,
    donor_type: StellarType,
    donor_mass: f64,
    accretor_mass: f64,
    degenerate_accretor: bool,
) -> bool {
    ratios
        .threshold(donor_type, degenerate_accretor)
        .is_some_and(|threshold| donor_mass / accretor_mass > threshold)
}

/// Stable when the donor's radius responds more steeply than its Roche
/// lobe, or when a case BB donor is declared stable by policy.
///
/// An `AlwaysUnstable` policy overrides the zeta comparison for case BB donors.
pub fn is_stable(
    case_bb: CaseBbStability,
    donor_type: StellarType,
    accretor_type: StellarType,
    zeta_star: f64,
    zeta_lobe: f64,
) -> bool {
    let case_bb_donor = donor_type.is_evolved_naked_helium_star();

    let zeta_stable =
        zeta_star > zeta_lobe && !(case_bb_donor && case_bb == CaseBbStability::AlwaysUnstable);
    let policy_stable = case_bb_donor
        && match case_bb {
            CaseBbStability::AlwaysStable => true,
            CaseBbStability::AlwaysStableOntoNsbh => accretor_type.is_neutron_star_or_black_hole(),
            CaseBbStability::AlwaysUnstable | CaseBbStability::ZetaBased => false,
        };

    zeta_stable || policy_stable
}

/// β, the fraction of transferred mass the accretor keeps.
///
/// Thermally limited acceptance is `min(1, C Ṁ_acc / Ṁ_don)` with both rates
/// thermal.
pub fn fraction_accreted(
    acceptance: MassAcceptance,
    fixed_fraction: f64,
    thermal_factor: f64,
    donor_rate: f64,
    accretor_rate: f64,
) -> f64 {
    match acceptance {
        MassAcceptance::Fixed => fixed_fraction,
        MassAcceptance::Thermal if donor_rate <= 0.0 => 1.0,
        MassAcceptance::Thermal => (thermal_factor * accretor_rate / donor_rate).clamp(0.0, 1.0),
    }
}
