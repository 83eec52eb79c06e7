//! Roche-lobe overflow: detection, stability and the stable-transfer
//! orbit update.

pub mod orbit;
pub mod root_finding;
pub mod stability;

#[cfg(test)]
mod mass_transfer_test;

use std::sync::Arc;

use stellar::{StellarModel, StellarType};
use tracing::{debug, warn};
use units::{Length, Mass};

use crate::body::BodyIndex;
use crate::config::AccretorThermalRate;
use crate::error::{BinaryError, RootSolveError};
use crate::roche::{roche_lobe_radius, roche_lobe_zeta};
use crate::system::{BinarySystem, MassTransferTracker};

use orbit::{TransferParameters, integrate_semi_major_axis};
use root_finding::BrentSolver;
use stability::{exceeds_critical_mass_ratio, fraction_accreted, is_stable};

/// Upper end of the donor mass-loss bracket, as a fraction of the donor mass
const MAX_MASS_LOSS_FRACTION: f64 = 1.0 - 1.0e-6;

impl<S: StellarModel> BinarySystem<S> {
    /// Reset the transfer state for a new step and evaluate overflow.
    ///
    /// Overflowing chemically homogeneous pairs equilibrate their masses and
    /// circularise instead of transferring. Other overflowing systems may be
    /// circularised first when configured.
    pub(crate) fn initialise_mass_transfer(&mut self) {
        self.mass_transfer_tracker = MassTransferTracker::NoMassTransfer;
        self.a_mass_transfer_diff = Length::zero();
        for body in &mut self.bodies {
            body.mass_transfer_diff = Mass::zero();
        }
        self.update_rlof_flags();

        if !self.bodies.iter().any(|body| body.rlof) {
            self.mass_transfer = false;
            return;
        }

        let config = Arc::clone(&self.config);
        if config.evolution.chemically_homogeneous.is_enabled() && self.both_chemically_homogeneous()
        {
            self.equilibrate_masses();
            if self.eccentricity != 0.0 {
                let m1 = self.bodies[0].mass().to_solar_masses();
                let m2 = self.bodies[1].mass().to_solar_masses();
                let total = m1 + m2;
                let factor = 16.0 * m1 * m1 * m2 * m2 / total.powi(4)
                    * (1.0 - self.eccentricity * self.eccentricity);
                self.semi_major_axis = self.semi_major_axis * factor;
                self.eccentricity = 0.0;
            }
            self.update_rlof_flags();
            self.mass_transfer = false;
            self.common_envelope_now = false;
            return;
        }

        self.mass_transfer = true;
        if config.mass_transfer.circularise {
            let e = self.eccentricity;
            let factor = if config.mass_transfer.circularise_conserving_angular_momentum {
                1.0 - e * e
            } else {
                1.0 - e
            };
            self.semi_major_axis = self.semi_major_axis * factor;
            self.eccentricity = 0.0;
            self.update_rlof_flags();
            self.semi_major_axis_prev = self.semi_major_axis;
            self.eccentricity_prev = self.eccentricity;
        }
    }

    /// Give both bodies the mean mass
    pub(crate) fn equilibrate_masses(&mut self) {
        let mean = Mass::from_solar_masses(0.5 * self.total_mass());
        for body in &mut self.bodies {
            let delta = mean - body.mass();
            if delta != Mass::zero() {
                body.star.update_mass(delta);
            }
        }
        self.masses_equilibrated = true;
    }

    /// Detect overflow and classify it.
    ///
    /// Both bodies overflowing, a critical mass ratio breach, or unstable
    /// transfer from an evolved donor raise a common envelope. Unstable
    /// transfer from a main-sequence donor merges the pair. Stable transfer
    /// sets the per-body transfer diffs and the separation change that
    /// mass-change resolution applies later.
    pub fn calculate_mass_transfer(&mut self) {
        self.initialise_mass_transfer();

        let config = Arc::clone(&self.config);
        if self.unbound || !config.mass_transfer.enabled {
            return;
        }
        let [one, two] = &self.bodies;
        if !(one.rlof || two.rlof) {
            return;
        }

        if config.evolution.chemically_homogeneous.is_enabled()
            && self.both_chemically_homogeneous()
            && self.is_touching()
        {
            self.stellar_merger = true;
            return;
        }

        if one.rlof && two.rlof {
            self.common_envelope_now = true;
            return;
        }

        let donor = if two.rlof { BodyIndex::Two } else { BodyIndex::One };
        let accretor = donor.other();
        let mass_transfer = &config.mass_transfer;

        let donor_star = self.star(donor);
        let accretor_star = self.star(accretor);
        let donor_mass = donor_star.mass().to_solar_masses();
        let accretor_mass = accretor_star.mass().to_solar_masses();
        let donor_type = donor_star.stellar_type();
        let accretor_type = accretor_star.stellar_type();

        let mut is_common_envelope = false;
        if mass_transfer.critical_mass_ratios.any_enabled()
            && exceeds_critical_mass_ratio(
                &mass_transfer.critical_mass_ratios,
                donor_type,
                donor_mass,
                accretor_mass,
                accretor_star.is_degenerate(),
            )
        {
            debug!(system = self.id, %donor, "critical mass ratio exceeded");
            self.common_envelope_now = true;
            is_common_envelope = true;
        } else {
            let donor_rate = donor_star.thermal_mass_loss_rate();
            let accretor_rate = match mass_transfer.thermal_rate {
                AccretorThermalRate::CFactor => accretor_star.thermal_mass_loss_rate(),
                AccretorThermalRate::RadiusToRocheLobe => {
                    let roche_lobe = self.semi_major_axis * self.roche_lobe_fraction(accretor);
                    let timescale = accretor_star.thermal_timescale_at_radius(roche_lobe).to_years();
                    let envelope = (accretor_star.mass() - accretor_star.core_mass()).to_solar_masses();
                    if timescale > 0.0 { envelope / timescale } else { 0.0 }
                }
            };
            let beta = fraction_accreted(
                mass_transfer.acceptance,
                mass_transfer.fraction_accreted,
                mass_transfer.thermal_limit_factor,
                donor_rate,
                accretor_rate,
            );
            let gamma = mass_transfer.angular_momentum_loss.gamma(
                donor_mass,
                accretor_mass,
                mass_transfer.arbitrary_gamma,
            );
            let zeta_lobe = roche_lobe_zeta(donor_mass, accretor_mass, beta, gamma);
            let zeta_star = donor_star.zeta(mass_transfer.zeta_prescription);
            self.fraction_accreted = beta;

            if is_stable(
                mass_transfer.case_bb_stability,
                donor_type,
                accretor_type,
                zeta_star,
                zeta_lobe,
            ) {
                let parameters = TransferParameters {
                    donor_mass,
                    accretor_mass,
                    fraction_accreted: beta,
                    angular_momentum_loss: mass_transfer.angular_momentum_loss,
                    arbitrary_gamma: mass_transfer.arbitrary_gamma,
                    max_fraction_per_step: mass_transfer.max_fraction_per_step,
                };
                if let Err(error) = self.resolve_stable_transfer(donor, &parameters) {
                    warn!(system = self.id, %error, "stable mass transfer abandoned");
                    self.set_error(BinaryError::RootSolve(error));
                    return;
                }
            } else {
                if donor_type.is_main_sequence() {
                    self.stellar_merger = true;
                } else {
                    self.common_envelope_now = true;
                }
                is_common_envelope = true;
            }
        }

        if !is_common_envelope && accretor_type == StellarType::NeutronStar {
            self.body_mut(donor).rlof_onto_neutron_star = true;
            self.body_mut(accretor).recycled_neutron_star = true;
        }
    }

    fn resolve_stable_transfer(
        &mut self,
        donor: BodyIndex,
        parameters: &TransferParameters,
    ) -> Result<(), RootSolveError> {
        let accretor = donor.other();
        self.mass_transfer_tracker = match donor {
            BodyIndex::One => MassTransferTracker::StableFrom1To2,
            BodyIndex::Two => MassTransferTracker::StableFrom2To1,
        };

        let beta = parameters.fraction_accreted;
        let a_initial = self.semi_major_axis.to_au();
        let donor_star = self.star(donor);
        let core = donor_star.core_mass();
        let envelope = donor_star.mass() - core;

        let a_final = if core.is_positive() && envelope.is_positive() {
            // The envelope leaves at once; only the accretor's gain waits
            // for mass-change resolution
            let a_final =
                integrate_semi_major_axis(parameters, a_initial, -envelope.to_solar_masses())
                    .semi_major_axis;
            let body = self.body_mut(donor);
            let type_before = body.star.stellar_type();
            let type_after = body.star.strip_envelope();
            body.mass_transfer_diff = Mass::zero();
            self.body_mut(accretor).mass_transfer_diff = envelope * beta;
            if type_after != type_before {
                self.print_detailed = true;
            }
            a_final
        } else {
            let lost = self.mass_to_fit_roche_lobe(donor, parameters)?;
            self.body_mut(donor).mass_transfer_diff = Mass::from_solar_masses(-lost);
            self.body_mut(accretor).mass_transfer_diff = Mass::from_solar_masses(lost * beta);
            integrate_semi_major_axis(parameters, a_initial, -lost).semi_major_axis
        };

        self.a_mass_transfer_diff = Length::from_au(a_final - a_initial);
        if self.common_envelope.count > 0 {
            self.common_envelope.stable_rlof_post = true;
        }
        Ok(())
    }

    /// Donor mass loss that leaves the donor exactly filling its Roche lobe
    /// at periastron of the updated orbit.
    pub(crate) fn mass_to_fit_roche_lobe(
        &self,
        donor: BodyIndex,
        parameters: &TransferParameters,
    ) -> Result<f64, RootSolveError> {
        let star = self.star(donor);
        let a = self.semi_major_axis.to_au();
        let periastron_factor = 1.0 - self.eccentricity;
        let beta = parameters.fraction_accreted;

        let overflow = |lost: f64| {
            let radius = star.radius_after_mass_loss(Mass::from_solar_masses(lost)).to_au();
            let a_after = integrate_semi_major_axis(parameters, a, -lost).semi_major_axis;
            let roche_lobe = roche_lobe_radius(
                parameters.donor_mass - lost,
                parameters.accretor_mass + beta * lost,
            );
            radius - a_after * periastron_factor * roche_lobe
        };

        BrentSolver::default().find_root(
            overflow,
            0.0,
            parameters.donor_mass * MAX_MASS_LOSS_FRACTION,
        )
    }
}
