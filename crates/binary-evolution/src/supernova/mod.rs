//! Natal kicks and the orbital response to instantaneous mass loss.
//!
//! Geometry is worked in km and km/s with G·M☉ in km³ s⁻². Each explosion
//! builds a frame with the pre-event angular momentum along z; velocities
//! are rotated back into the frame of the first explosion with the
//! accumulated [`EulerAngles`](crate::frame::EulerAngles).

pub mod euler;
pub mod kepler;

#[cfg(test)]
mod supernova_test;

use nalgebra::Vector3;
use stellar::{StellarModel, SupernovaKick};
use tracing::{debug, warn};
use units::Length;
use units::constants::G_KM_MSOL_S;
use units::length::AU_TO_KM;

use crate::body::BodyIndex;
use crate::conservation::orbital_energy;
use crate::error::BinaryError;
use crate::events::{BinaryEvent, EventSink, SupernovaRecord};
use crate::frame::{angle_between, unit_vector};
use crate::system::{BinarySystem, Orbit, SupernovaState};

use euler::{FrameVectors, bound_euler_angles, unbound_euler_angles};
use kepler::{eccentric_anomaly, true_anomaly};

/// Kick vector in the pre-event orbital frame, km/s
fn kick_vector(kick: &SupernovaKick, phi: f64) -> Vector3<f64> {
    let magnitude = kick.magnitude.to_km_per_sec();
    let (sin_theta, cos_theta) = kick.theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    magnitude * Vector3::new(cos_theta * cos_phi, cos_theta * sin_phi, sin_theta)
}

/// Orbital quantities of one resolved explosion
struct OrbitalResponse {
    orbital_velocity_pre: f64,
    dimensionless_kick: f64,
    semi_major_axis_post: f64,
    eccentricity_post: f64,
}

impl OrbitalResponse {
    fn not_applicable() -> Self {
        Self {
            orbital_velocity_pre: f64::NAN,
            dimensionless_kick: f64::NAN,
            semi_major_axis_post: f64::NAN,
            eccentricity_post: f64::NAN,
        }
    }
}

impl<S: StellarModel> BinarySystem<S> {
    /// Resolve pending explosions, star 1 first.
    ///
    /// A disrupted system is skipped unless `resolve_when_unbound` is set or
    /// the configuration asks for late explosions to be resolved anyway.
    pub(crate) fn evaluate_supernovae<E: EventSink>(
        &mut self,
        resolve_when_unbound: bool,
        sink: &mut E,
    ) {
        let resolve_when_unbound = resolve_when_unbound
            || self.config.supernova.resolve_late_supernova_when_unbound;
        if self.unbound && !resolve_when_unbound {
            return;
        }

        let pending = BodyIndex::BOTH.map(|index| self.star(index).is_supernova_pending());
        self.supernova_state = match (pending, self.supernova_state) {
            ([true, true], _) => SupernovaState::Simultaneous,
            ([true, false], SupernovaState::None) => SupernovaState::Star1,
            ([true, false], _) => SupernovaState::Star2ThenStar1,
            ([false, true], SupernovaState::None) => SupernovaState::Star2,
            ([false, true], _) => SupernovaState::Star1ThenStar2,
            ([false, false], state) => state,
        };

        for (index, pending) in BodyIndex::BOTH.into_iter().zip(pending) {
            if !pending {
                continue;
            }
            match self.resolve_supernova(index) {
                Ok(record) => sink.record(BinaryEvent::Supernova(record)),
                Err(error) => warn!(system = self.id, %error, "supernova not resolved"),
            }
        }
    }

    /// Apply the pending explosion of `exploding` to the orbit.
    ///
    /// In an already disrupted system only the exploding body's velocity
    /// changes and the orbital outputs of the record are NaN.
    ///
    /// # Errors
    /// [`BinaryError::SupernovaImproperlyCalled`] when the body has no
    /// pending explosion. Nothing is modified in that case.
    ///
    /// # References
    ///
    /// - Pfahl et al. (2002), ApJ 574, 364
    /// - Kalogera (1996), ApJ 471, 352
    pub fn resolve_supernova(&mut self, exploding: BodyIndex) -> Result<SupernovaRecord, BinaryError> {
        let Some(kick) = self.star(exploding).supernova_kick() else {
            warn!(system = self.id, %exploding, "supernova resolved without a pending event");
            return Err(BinaryError::SupernovaImproperlyCalled(exploding));
        };
        let companion = exploding.other();

        let pre_orbit = Orbit {
            semi_major_axis: self.semi_major_axis_prev,
            eccentricity: self.eccentricity_prev,
        };
        self.pre_supernova_orbit = Some(pre_orbit);

        let m1 = self.star(exploding).mass_prev().to_solar_masses();
        let m2 = self.star(companion).mass_prev().to_solar_masses();
        let orbital_energy_pre = orbital_energy(m1, m2, pre_orbit.semi_major_axis.to_au());

        let response = if self.unbound {
            let kick_velocity = self.euler.rotate(&kick_vector(&kick, kick.phi));
            self.body_mut(exploding).velocity += kick_velocity;
            OrbitalResponse::not_applicable()
        } else {
            self.apply_kick_to_orbit(exploding, &kick, pre_orbit)
        };

        let m1_post = self.star(exploding).mass().to_solar_masses();
        let m2_post = self.star(companion).mass().to_solar_masses();
        let orbital_energy_post = if response.semi_major_axis_post.is_nan() {
            f64::NAN
        } else {
            orbital_energy(m1_post, m2_post, self.semi_major_axis.to_au())
        };

        let star = self.star(exploding);
        let companion_star = self.star(companion);
        let record = SupernovaRecord {
            time: self.time.to_myr(),
            exploding,
            exploding_id: self.body(exploding).id,
            state: self.supernova_state,
            remnant_type: star.stellar_type(),
            remnant_mass: m1_post,
            companion_type: companion_star.stellar_type(),
            companion_mass: m2_post,
            kick_magnitude: kick.magnitude.to_km_per_sec(),
            theta: kick.theta,
            phi: kick.phi,
            mean_anomaly: kick.mean_anomaly,
            orbital_velocity_pre: response.orbital_velocity_pre,
            dimensionless_kick: response.dimensionless_kick,
            semi_major_axis_pre: pre_orbit.semi_major_axis.to_au(),
            eccentricity_pre: pre_orbit.eccentricity,
            semi_major_axis_post: response.semi_major_axis_post,
            eccentricity_post: response.eccentricity_post,
            orbital_energy_pre,
            orbital_energy_post,
            cos_inclination: self.euler.theta.cos(),
            systemic_speed: self.systemic_speed,
            unbound: self.unbound,
            companion_runaway: self.body(companion).runaway,
        };

        debug!(
            system = self.id,
            %exploding,
            a_post = record.semi_major_axis_post,
            e_post = record.eccentricity_post,
            unbound = record.unbound,
            "supernova resolved"
        );
        self.body_mut(exploding).star.clear_supernova();
        Ok(record)
    }

    fn apply_kick_to_orbit(
        &mut self,
        exploding: BodyIndex,
        kick: &SupernovaKick,
        pre_orbit: Orbit,
    ) -> OrbitalResponse {
        let companion = exploding.other();
        let gravity = G_KM_MSOL_S;

        let a = pre_orbit.semi_major_axis.to_km();
        let e = pre_orbit.eccentricity;
        let m1 = self.star(exploding).mass_prev().to_solar_masses();
        let m2 = self.star(companion).mass_prev().to_solar_masses();
        let total = m1 + m2;

        // Relative position and velocity, periapsis along x
        let anomaly = eccentric_anomaly(kick.mean_anomaly, e);
        let (sin_anomaly, cos_anomaly) = anomaly.sin_cos();
        let root = (1.0 - e * e).sqrt();
        let omega = (gravity * total / (a * a * a)).sqrt();

        let position = Vector3::new(a * (cos_anomaly - e), a * root * sin_anomaly, 0.0);
        let r = position.norm();
        let velocity = Vector3::new(
            -omega * a * a / r * sin_anomaly,
            omega * a * a / r * root * cos_anomaly,
            0.0,
        );
        let angular_momentum = position.cross(&velocity);
        let eccentricity_vector =
            velocity.cross(&angular_momentum) / (gravity * total) - position / r;

        let orbital_velocity_pre = velocity.norm();
        let dimensionless_kick = kick.magnitude.to_km_per_sec() / orbital_velocity_pre;

        // Measure phi from the instantaneous direction of motion
        let phi = kick.phi + true_anomaly(anomaly, e) + angle_between(&position, &velocity);
        let kick_velocity = kick_vector(kick, phi);
        let companion_recoil = Vector3::zeros();

        let m1_post = self.star(exploding).mass().to_solar_masses();
        let m2_post = self.star(companion).mass().to_solar_masses();
        let total_post = m1_post + m2_post;
        let dm1 = m1 - m1_post;
        let dm2 = m2 - m2_post;

        let centre_of_mass_velocity = (-m2 * dm1 / (total * total_post)
            + m1 * dm2 / (total * total_post))
            * velocity
            + (m1_post / total_post) * kick_velocity
            + (m2_post / total_post) * companion_recoil;
        let velocity_post = velocity + kick_velocity - companion_recoil;
        let angular_momentum_post = position.cross(&velocity_post);
        let h_post = angular_momentum_post.norm();
        let eccentricity_vector_post =
            velocity_post.cross(&angular_momentum_post) / (gravity * total_post) - position / r;
        let e_post = eccentricity_vector_post.norm();
        let a_post = h_post * h_post / (gravity * total_post * (1.0 - e_post * e_post));

        let rotated_centre_of_mass = self.euler.rotate(&centre_of_mass_velocity);
        self.systemic_velocity += rotated_centre_of_mass;
        self.systemic_speed = self.systemic_velocity.norm();

        if e_post >= 1.0 {
            self.unbound = true;

            let e_hat = unit_vector(&eccentricity_vector_post);
            let h_hat = unit_vector(&angular_momentum_post);
            let v_infinity = gravity * total_post / h_post * (e_post * e_post - 1.0).sqrt();
            let asymptotic = v_infinity
                * ((-1.0 / e_post) * e_hat
                    + (1.0 - 1.0 / (e_post * e_post)).sqrt() * h_hat.cross(&e_hat));

            let exploding_velocity = (m2_post / total_post) * asymptotic + centre_of_mass_velocity;
            let companion_velocity = -(m1_post / total_post) * asymptotic + centre_of_mass_velocity;
            let exploding_velocity = self.euler.rotate(&exploding_velocity);
            let companion_velocity = self.euler.rotate(&companion_velocity);
            self.body_mut(exploding).velocity += exploding_velocity;
            self.body_mut(companion).velocity += companion_velocity;

            self.euler =
                unbound_euler_angles(&angular_momentum, &angular_momentum_post, &mut self.rng);
        } else {
            self.body_mut(exploding).velocity += rotated_centre_of_mass;
            self.body_mut(companion).velocity += rotated_centre_of_mass;

            let vectors = FrameVectors {
                angular_momentum,
                angular_momentum_post,
                eccentricity_vector,
                eccentricity_vector_post,
            };
            self.euler = bound_euler_angles(&vectors, &mut self.rng);
        }

        if self.unbound {
            self.body_mut(companion).runaway = true;
        }
        self.eccentricity = e_post;
        self.semi_major_axis = Length::from_km(a_post);

        OrbitalResponse {
            orbital_velocity_pre,
            dimensionless_kick,
            semi_major_axis_post: a_post / AU_TO_KM,
            eccentricity_post: e_post,
        }
    }
}
