//! Building binaries: sampled initial conditions with rejection, or direct
//! construction from given masses and orbit.

pub mod distributions;
pub mod importance;


use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use stellar::FromZams;
use stellar::sampling::{sample_initial_mass, sample_uniform};
use tracing::{debug, warn};
use units::{Length, Mass};

use crate::body::ConstituentBody;
use crate::config::BinaryConfig;
use crate::error::BinaryError;
use crate::roche::roche_lobe_radius;
use crate::system::{BinarySystem, bodies_in_contact};

use distributions::{sample_eccentricity, sample_mass_ratio, sample_separation};

/// Hands out object ids.
///
/// Parallel workers each own a counter over a disjoint range, so ids stay
/// unique without shared state.
#[derive(Debug, Clone)]
pub struct ObjectIdCounter {
    next: u64,
}

impl ObjectIdCounter {
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for ObjectIdCounter {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Zero-age masses and orbit of one binary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialConditions {
    pub primary_mass: Mass,
    pub secondary_mass: Mass,
    pub semi_major_axis: Length,
    pub eccentricity: f64,
    pub metallicity: f64,
}

impl InitialConditions {
    /// `R / (a(1-e) R_L)` for both stars; above one is overflow
    fn roche_lobe_trackers<S: FromZams>(&self, star1: &S, star2: &S) -> [f64; 2] {
        let m1 = self.primary_mass.to_solar_masses();
        let m2 = self.secondary_mass.to_solar_masses();
        let periastron = self.semi_major_axis.to_au() * (1.0 - self.eccentricity);
        [
            star1.radius().to_au() / (periastron * roche_lobe_radius(m1, m2)),
            star2.radius().to_au() / (periastron * roche_lobe_radius(m2, m1)),
        ]
    }

    /// Equal masses and a circular orbit with the same angular momentum
    fn equilibrated(&self) -> Self {
        let m1 = self.primary_mass.to_solar_masses();
        let m2 = self.secondary_mass.to_solar_masses();
        let total = m1 + m2;
        let mean = 0.5 * total;
        let factor = 16.0 * m1 * m1 * m2 * m2 / total.powi(4)
            * (1.0 - self.eccentricity * self.eccentricity);
        Self {
            primary_mass: Mass::from_solar_masses(mean),
            secondary_mass: Mass::from_solar_masses(mean),
            semi_major_axis: self.semi_major_axis * factor,
            eccentricity: 0.0,
            metallicity: self.metallicity,
        }
    }
}

/// Star pair built for one set of initial conditions
struct Candidate<S> {
    conditions: InitialConditions,
    stars: [S; 2],
    trackers: [f64; 2],
    equilibrated: bool,
}

/// Creates binary systems from a shared configuration.
pub struct BinaryFactory {
    config: Arc<BinaryConfig>,
    ids: ObjectIdCounter,
}

impl BinaryFactory {
    pub fn new(config: Arc<BinaryConfig>, ids: ObjectIdCounter) -> Self {
        Self { config, ids }
    }

    pub fn config(&self) -> &Arc<BinaryConfig> {
        &self.config
    }

    pub fn ids(&self) -> &ObjectIdCounter {
        &self.ids
    }

    /// Draw initial conditions until a configuration is acceptable.
    ///
    /// Draws are rejected when a star overflows its Roche lobe or the stars
    /// touch (unless allowed), when the secondary is below the minimum mass,
    /// or when an importance-sampling draw leaves the parameter space.
    ///
    /// # Errors
    /// [`BinaryError::BirthRejected`] once the configured number of attempts
    /// is spent.
    pub fn sample<S: FromZams>(&mut self, seed: u64) -> Result<BinarySystem<S>, BinaryError> {
        let config = Arc::clone(&self.config);
        let birth = &config.birth;
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let bounds = birth.separation_bounds();
        let space = birth.parameter_space();
        let alpha = self.draw_alpha(&mut rng);

        for attempt in 1..=birth.max_attempts {
            let (primary_mass, mass_ratio, separation) = match &birth.importance_sampling {
                Some(proposal) => {
                    let draw = proposal.draw(&mut rng);
                    if !space.contains(&draw) {
                        continue;
                    }
                    (draw.primary_mass, draw.mass_ratio, Length::from_au(draw.separation))
                }
                None => {
                    let primary_mass = sample_initial_mass(
                        birth.initial_mass_function,
                        birth.initial_mass_power,
                        birth.min_primary_mass,
                        birth.max_primary_mass,
                        &mut rng,
                    );
                    let mass_ratio = sample_mass_ratio(
                        birth.mass_ratio,
                        birth.min_mass_ratio,
                        birth.max_mass_ratio,
                        &mut rng,
                    );
                    let total = Mass::from_solar_masses(primary_mass * (1.0 + mass_ratio));
                    let separation = sample_separation(birth.separation, &bounds, total, &mut rng);
                    (primary_mass, mass_ratio, separation)
                }
            };
            let eccentricity = sample_eccentricity(
                birth.eccentricity,
                birth.min_eccentricity,
                birth.max_eccentricity,
                &mut rng,
            );

            let secondary_mass = mass_ratio * primary_mass;
            if secondary_mass < birth.min_secondary_mass {
                continue;
            }

            let conditions = InitialConditions {
                primary_mass: Mass::from_solar_masses(primary_mass),
                secondary_mass: Mass::from_solar_masses(secondary_mass),
                semi_major_axis: separation,
                eccentricity,
                metallicity: birth.metallicity,
            };
            let candidate = self.candidate::<S>(conditions, seed);
            let rlof = candidate.trackers.iter().any(|&tracker| tracker > 1.0);
            if rlof && !birth.allow_rlof_at_birth {
                continue;
            }
            let [star1, star2] = &candidate.stars;
            let touching =
                bodies_in_contact(candidate.conditions.semi_major_axis, star1.radius(), star2.radius());
            if touching && !birth.allow_touching_at_birth {
                continue;
            }

            debug!(attempt, m1 = primary_mass, q = mass_ratio, a_au = separation.to_au(), "birth accepted");
            return Ok(self.assemble(candidate, seed, alpha));
        }

        warn!(attempts = birth.max_attempts, "no acceptable binary drawn");
        Err(BinaryError::BirthRejected(birth.max_attempts))
    }

    /// Build a binary from given initial conditions.
    ///
    /// Overflow at birth, when allowed, equilibrates the masses and
    /// circularises the orbit before the stars are rebuilt.
    ///
    /// # Errors
    /// [`BinaryError::InvalidOrbit`] for a non-positive separation or an
    /// eccentricity outside `[0, 1)`.
    pub fn build<S: FromZams>(
        &mut self,
        seed: u64,
        conditions: InitialConditions,
    ) -> Result<BinarySystem<S>, BinaryError> {
        let a = conditions.semi_major_axis.to_au();
        let e = conditions.eccentricity;
        if !(a > 0.0) || !(0.0..1.0).contains(&e) {
            return Err(BinaryError::InvalidOrbit {
                semi_major_axis: a,
                eccentricity: e,
            });
        }
        let candidate = self.candidate::<S>(conditions, seed);
        Ok(self.assemble(candidate, seed, self.config.common_envelope.alpha))
    }

    fn draw_alpha(&self, rng: &mut ChaChaRng) -> f64 {
        match self.config.common_envelope.alpha_range {
            Some((low, high)) => sample_uniform(low, high, rng),
            None => self.config.common_envelope.alpha,
        }
    }

    fn candidate<S: FromZams>(&self, conditions: InitialConditions, seed: u64) -> Candidate<S> {
        let conditions = InitialConditions {
            metallicity: conditions.metallicity.clamp(0.0, 1.0),
            ..conditions
        };
        let stars = Self::zams_pair::<S>(&conditions, seed);
        let trackers = conditions.roche_lobe_trackers(&stars[0], &stars[1]);

        if self.config.birth.allow_rlof_at_birth && trackers.iter().any(|&tracker| tracker > 1.0) {
            let conditions = conditions.equilibrated();
            let stars = Self::zams_pair::<S>(&conditions, seed);
            let trackers = conditions.roche_lobe_trackers(&stars[0], &stars[1]);
            return Candidate {
                conditions,
                stars,
                trackers,
                equilibrated: true,
            };
        }
        Candidate {
            conditions,
            stars,
            trackers,
            equilibrated: false,
        }
    }

    fn zams_pair<S: FromZams>(conditions: &InitialConditions, seed: u64) -> [S; 2] {
        [
            S::from_zams(conditions.primary_mass, conditions.metallicity, seed.wrapping_add(1)),
            S::from_zams(conditions.secondary_mass, conditions.metallicity, seed.wrapping_add(2)),
        ]
    }

    fn assemble<S: FromZams>(&mut self, candidate: Candidate<S>, seed: u64, alpha: f64) -> BinarySystem<S> {
        let id = self.ids.next_id();
        let [star1, star2] = candidate.stars;
        let mut bodies = [
            ConstituentBody::new(star1, self.ids.next_id()),
            ConstituentBody::new(star2, self.ids.next_id()),
        ];
        for (body, tracker) in bodies.iter_mut().zip(candidate.trackers) {
            body.roche_lobe_tracker = tracker;
        }

        let mut system = BinarySystem::from_bodies(
            Arc::clone(&self.config),
            id,
            seed,
            bodies,
            candidate.conditions.semi_major_axis,
            candidate.conditions.eccentricity,
            alpha,
        );
        system.masses_equilibrated_at_birth = candidate.equilibrated;
        system
    }
}
