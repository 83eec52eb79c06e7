//! Common-envelope ejection with the alpha-lambda energy formalism.

use std::sync::Arc;

use stellar::StellarModel;
use tracing::debug;
use units::{Length, Mass};
use units::constants::G_AU_MSOL_YR;

use crate::body::BodyIndex;
use crate::events::CommonEnvelopeRecord;
use crate::roche::roche_lobe_radius;
use crate::system::{BinarySystem, CommonEnvelopeSnapshot, MassTransferTracker};

/// Mass budget of one body entering the envelope
#[derive(Debug, Clone, Copy)]
struct EnvelopeBudget {
    mass: f64,
    final_mass: f64,
    envelope: f64,
    radius: f64,
    lambda: f64,
    compact: bool,
}

impl EnvelopeBudget {
    /// Loses an envelope and keeps a core
    fn has_envelope(&self) -> bool {
        self.envelope > 0.0 && self.final_mass > 0.0
    }

    /// Orbital energy needed to unbind the envelope, scaled by `2/(λα)`
    /// in units of G M☉² / R☉
    fn ejection_term(&self, alpha: f64) -> f64 {
        if self.compact {
            0.0
        } else {
            2.0 / (self.lambda * alpha) * self.mass * self.envelope / self.radius
        }
    }
}

impl<S: StellarModel> BinarySystem<S> {
    /// Resolve a common envelope around both bodies.
    ///
    /// # Formula
    ///
    /// ```text
    /// a_f = M_f1 M_f2 / (k1 + k2 + M1 M2 / r_p)
    /// k_i = 2 M_i M_env,i / (λ_i α R_i)     (zero for compact objects)
    /// ```
    ///
    /// with `r_p` the pre-event periastron. The orbit is circular afterwards.
    ///
    /// # References
    ///
    /// - Webbink (1984), ApJ 277, 355
    /// - de Kool (1990), ApJ 358, 189
    pub fn resolve_common_envelope(&mut self) -> CommonEnvelopeRecord {
        let config = Arc::clone(&self.config);
        let alpha = self.alpha;
        let main_sequence_survives = config.common_envelope.allow_main_sequence_survival;

        let periastron = self.semi_major_axis.to_solar_radii() * (1.0 - self.eccentricity);
        let roche_lobe1 = periastron * self.roche_lobe_fraction(BodyIndex::One);
        let roche_lobe2 = periastron * self.roche_lobe_fraction(BodyIndex::Two);

        let mut main_sequence_donor = false;
        let budgets = BodyIndex::BOTH.map(|index| {
            let body = self.body(index);
            let star = &body.star;
            let mass = star.mass().to_solar_masses();
            let (final_mass, envelope) =
                if main_sequence_survives && star.stellar_type().is_any_main_sequence() {
                    main_sequence_donor |= body.rlof;
                    (mass, 0.0)
                } else {
                    let core = star.core_mass().to_solar_masses();
                    (core, mass - core)
                };
            EnvelopeBudget {
                mass,
                final_mass,
                envelope,
                radius: star.radius().to_solar_radii(),
                lambda: star.common_envelope_lambda(),
                compact: star.stellar_type().is_compact_object(),
            }
        });
        let [first, second] = budgets;
        let types_pre = BodyIndex::BOTH.map(|index| self.star(index).stellar_type());

        self.common_envelope.count += 1;
        self.common_envelope.double_core = first.has_envelope() && second.has_envelope();
        self.common_envelope.simultaneous_rlof = self.bodies[0].rlof && self.bodies[1].rlof;
        self.common_envelope.optimistic = types_pre.iter().any(|t| t.is_any_hertzsprung_gap());

        for (index, budget) in BodyIndex::BOTH.into_iter().zip(budgets) {
            let radius_au = Length::from_solar_radii(budget.radius).to_au();
            let binding_energy = if budget.radius > 0.0 && budget.lambda > 0.0 {
                G_AU_MSOL_YR * budget.mass * budget.envelope / (budget.lambda * radius_au)
            } else {
                0.0
            };
            let body = self.body_mut(index);
            body.lambda_at_common_envelope = budget.lambda;
            body.binding_energy_at_common_envelope = binding_energy;
        }

        self.set_pre_common_envelope_snapshot(CommonEnvelopeSnapshot::new(
            self.semi_major_axis.to_solar_radii(),
            self.eccentricity,
            roche_lobe1,
            roche_lobe2,
        ));

        let orbital_term = first.mass * second.mass / periastron;
        let a_final = first.final_mass * second.final_mass
            / (first.ejection_term(alpha) + second.ejection_term(alpha) + orbital_term);

        if main_sequence_donor || !(first.has_envelope() || second.has_envelope()) {
            self.mass_transfer_tracker = if types_pre.iter().all(|t| t.is_any_main_sequence()) {
                MassTransferTracker::CommonEnvelopeBothMainSequence
            } else {
                MassTransferTracker::CommonEnvelopeMainSequenceWithCompactObject
            };
            self.stellar_merger = true;
        } else {
            for (index, budget) in BodyIndex::BOTH.into_iter().zip(budgets) {
                if budget.has_envelope() {
                    let star = &mut self.body_mut(index).star;
                    let type_before = star.stellar_type();
                    if star.strip_envelope() != type_before {
                        self.print_detailed = true;
                    }
                }
            }
            self.mass_transfer_tracker = match (first.has_envelope(), second.has_envelope()) {
                (true, true) => MassTransferTracker::CommonEnvelopeDoubleCore,
                (true, false) => MassTransferTracker::CommonEnvelopeFrom1To2,
                _ => MassTransferTracker::CommonEnvelopeFrom2To1,
            };
        }

        self.semi_major_axis = Length::from_solar_radii(a_final);
        self.eccentricity = 0.0;
        for body in &mut self.bodies {
            body.mass_loss_diff = Mass::zero();
            body.mass_transfer_diff = Mass::zero();
        }

        let radius1 = self.bodies[0].radius().to_solar_radii();
        let radius2 = self.bodies[1].radius().to_solar_radii();
        if !(a_final > 0.0) || radius1 + radius2 > a_final {
            self.stellar_merger = true;
        }

        if config.evolution.chemically_homogeneous.is_enabled() && a_final > 0.0 {
            let omega = self.orbital_angular_velocity();
            for body in &mut self.bodies {
                body.star.set_omega(omega);
            }
        }

        let mass1 = self.bodies[0].mass().to_solar_masses();
        let mass2 = self.bodies[1].mass().to_solar_masses();
        let (post_lobe1, post_lobe2) = if mass1 > 0.0 && mass2 > 0.0 {
            (
                a_final * roche_lobe_radius(mass1, mass2),
                a_final * roche_lobe_radius(mass2, mass1),
            )
        } else {
            (0.0, 0.0)
        };
        self.set_post_common_envelope_snapshot(CommonEnvelopeSnapshot::new(
            a_final, 0.0, post_lobe1, post_lobe2,
        ));
        self.common_envelope.immediate_rlof_post = radius1 >= post_lobe1 || radius2 >= post_lobe2;

        debug!(
            system = self.id,
            a_final_rsol = a_final,
            merger = self.stellar_merger,
            double_core = self.common_envelope.double_core,
            "common envelope resolved"
        );

        CommonEnvelopeRecord {
            time: self.time.to_myr(),
            count: self.common_envelope.count,
            alpha,
            pre: self.common_envelope.pre,
            post: self.common_envelope.post,
            mass1_pre: first.mass,
            mass2_pre: second.mass,
            mass1_post: mass1,
            mass2_post: mass2,
            stellar_type1_pre: types_pre[0],
            stellar_type2_pre: types_pre[1],
            stellar_type1_post: self.bodies[0].star.stellar_type(),
            stellar_type2_post: self.bodies[1].star.stellar_type(),
            lambda1: first.lambda,
            lambda2: second.lambda,
            binding_energy1: self.bodies[0].binding_energy_at_common_envelope,
            binding_energy2: self.bodies[1].binding_energy_at_common_envelope,
            double_core: self.common_envelope.double_core,
            optimistic: self.common_envelope.optimistic,
            simultaneous_rlof: self.common_envelope.simultaneous_rlof,
            merger: self.stellar_merger,
            immediate_rlof_post: self.common_envelope.immediate_rlof_post,
        }
    }
}
