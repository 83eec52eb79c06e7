//! The binary system: two owned bodies, the orbit and the bookkeeping every
//! resolver reads and writes.
//!
//! Resolvers live in their own modules as further `impl` blocks on
//! [`BinarySystem`]; this module holds the data model, the snapshot setters
//! and the record builders.

pub mod snapshots;

use std::sync::Arc;

use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use stellar::{StellarModel, StellarType};
use units::{AngularVelocity, Length, Time};

use crate::body::{BodyIndex, ConstituentBody};
use crate::config::BinaryConfig;
use crate::conservation::{Mechanics, compute_mechanics, orbital_angular_velocity};
use crate::error::BinaryError;
use crate::events::{BeBinaryRecord, DetailedRecord, RlofRecord};
use crate::frame::EulerAngles;
use crate::roche::roche_lobe_radius;

pub use snapshots::{CommonEnvelopeSnapshot, RingBuffer};

/// Which bodies have exploded, and in what order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupernovaState {
    #[default]
    None,
    Star1,
    Star2,
    /// Star 1 exploded after star 2
    Star2ThenStar1,
    /// Star 2 exploded after star 1
    Star1ThenStar2,
    Simultaneous,
}

/// Most recent mass-transfer classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassTransferTracker {
    #[default]
    NoMassTransfer,
    StableFrom1To2,
    StableFrom2To1,
    CommonEnvelopeFrom1To2,
    CommonEnvelopeFrom2To1,
    CommonEnvelopeDoubleCore,
    CommonEnvelopeBothMainSequence,
    CommonEnvelopeMainSequenceWithCompactObject,
}

/// Semi-major axis and eccentricity at a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orbit {
    pub semi_major_axis: Length,
    pub eccentricity: f64,
}

/// Common-envelope history
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommonEnvelopeState {
    pub count: u32,
    pub double_core: bool,
    pub optimistic: bool,
    pub simultaneous_rlof: bool,
    pub immediate_rlof_post: bool,
    pub stable_rlof_post: bool,
    pub pre: CommonEnvelopeSnapshot,
    pub post: CommonEnvelopeSnapshot,
}

pub struct BinarySystem<S> {
    pub(crate) id: u64,
    pub(crate) seed: u64,
    pub(crate) config: Arc<BinaryConfig>,
    pub(crate) rng: ChaChaRng,
    pub(crate) bodies: [ConstituentBody<S>; 2],

    pub(crate) semi_major_axis: Length,
    pub(crate) eccentricity: f64,
    pub(crate) semi_major_axis_prev: Length,
    pub(crate) eccentricity_prev: f64,
    pub(crate) initial_orbit: Orbit,
    pub(crate) pre_supernova_orbit: Option<Orbit>,
    pub(crate) double_compact_object_orbit: Option<Orbit>,

    pub(crate) mechanics: Mechanics,
    pub(crate) mechanics_prev: Mechanics,

    pub(crate) time: Time,
    pub(crate) time_prev: Time,
    pub(crate) dt: Time,
    pub(crate) steps: usize,

    pub(crate) unbound: bool,
    pub(crate) stellar_merger: bool,
    pub(crate) stellar_merger_at_birth: bool,
    pub(crate) merges_in_hubble_time: bool,
    pub(crate) masses_equilibrated: bool,
    pub(crate) masses_equilibrated_at_birth: bool,

    pub(crate) supernova_state: SupernovaState,
    /// Centre-of-mass velocity in the reference frame of the first explosion, km/s
    pub(crate) systemic_velocity: Vector3<f64>,
    pub(crate) systemic_speed: f64,
    pub(crate) euler: EulerAngles,

    pub(crate) alpha: f64,
    pub(crate) common_envelope: CommonEnvelopeState,
    pub(crate) common_envelope_now: bool,

    pub(crate) mass_transfer: bool,
    pub(crate) mass_transfer_tracker: MassTransferTracker,
    pub(crate) ever_rlof: bool,
    pub(crate) fraction_accreted: f64,
    pub(crate) a_mass_loss_diff: Length,
    pub(crate) a_mass_transfer_diff: Length,

    pub(crate) rlof_history: RingBuffer<RlofRecord>,
    pub(crate) be_binary: RingBuffer<BeBinaryRecord>,

    pub(crate) coalescence_time: Option<Time>,
    pub(crate) error: Option<BinaryError>,
    pub(crate) print_detailed: bool,
}

/// A bound orbit whose separation does not exceed the summed radii
pub(crate) fn bodies_in_contact(semi_major_axis: Length, radius1: Length, radius2: Length) -> bool {
    let a = semi_major_axis.to_au();
    a > 0.0 && a <= radius1.to_au() + radius2.to_au()
}

impl<S: StellarModel> BinarySystem<S> {
    /// Assemble a system from two bodies and an orbit, then derive the
    /// remaining state (previous and initial orbits, spins, conserved
    /// quantities).
    pub fn from_bodies(
        config: Arc<BinaryConfig>,
        id: u64,
        seed: u64,
        bodies: [ConstituentBody<S>; 2],
        semi_major_axis: Length,
        eccentricity: f64,
        alpha: f64,
    ) -> Self {
        let orbit = Orbit {
            semi_major_axis,
            eccentricity,
        };
        let mut system = Self {
            id,
            seed,
            config,
            rng: ChaChaRng::seed_from_u64(seed),
            bodies,
            semi_major_axis,
            eccentricity,
            semi_major_axis_prev: semi_major_axis,
            eccentricity_prev: eccentricity,
            initial_orbit: orbit,
            pre_supernova_orbit: None,
            double_compact_object_orbit: None,
            mechanics: Mechanics::default(),
            mechanics_prev: Mechanics::default(),
            time: Time::zero(),
            time_prev: Time::zero(),
            dt: Time::zero(),
            steps: 0,
            unbound: false,
            stellar_merger: false,
            stellar_merger_at_birth: false,
            merges_in_hubble_time: false,
            masses_equilibrated: false,
            masses_equilibrated_at_birth: false,
            supernova_state: SupernovaState::None,
            systemic_velocity: Vector3::zeros(),
            systemic_speed: 0.0,
            euler: EulerAngles::default(),
            alpha,
            common_envelope: CommonEnvelopeState::default(),
            common_envelope_now: false,
            mass_transfer: false,
            mass_transfer_tracker: MassTransferTracker::NoMassTransfer,
            ever_rlof: false,
            fraction_accreted: 0.0,
            a_mass_loss_diff: Length::zero(),
            a_mass_transfer_diff: Length::zero(),
            rlof_history: RingBuffer::default(),
            be_binary: RingBuffer::default(),
            coalescence_time: None,
            error: None,
            print_detailed: false,
        };
        system.set_remaining_common_values();
        system
    }

    fn set_remaining_common_values(&mut self) {
        self.semi_major_axis_prev = self.semi_major_axis;
        self.eccentricity_prev = self.eccentricity;
        self.initial_orbit = Orbit {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
        };

        if self.config.evolution.chemically_homogeneous.is_enabled() {
            let omega = self.orbital_angular_velocity();
            for body in &mut self.bodies {
                body.star.set_omega(omega);
                if body.star.stellar_type().is_main_sequence() {
                    let stellar_type = if omega >= body.star.omega_che() {
                        StellarType::ChemicallyHomogeneous
                    } else {
                        StellarType::main_sequence_for_mass(body.star.mass().to_solar_masses())
                    };
                    body.star.switch_to(stellar_type);
                }
            }
        }

        self.update_mechanics();
        self.mechanics_prev = self.mechanics;
        self.euler = EulerAngles::default();
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &BinaryConfig {
        &self.config
    }

    pub fn body(&self, index: BodyIndex) -> &ConstituentBody<S> {
        &self.bodies[index.slot()]
    }

    pub fn body_mut(&mut self, index: BodyIndex) -> &mut ConstituentBody<S> {
        &mut self.bodies[index.slot()]
    }

    pub fn star(&self, index: BodyIndex) -> &S {
        &self.bodies[index.slot()].star
    }

    pub fn semi_major_axis(&self) -> Length {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn semi_major_axis_prev(&self) -> Length {
        self.semi_major_axis_prev
    }

    pub fn initial_orbit(&self) -> Orbit {
        self.initial_orbit
    }

    pub fn pre_supernova_orbit(&self) -> Option<Orbit> {
        self.pre_supernova_orbit
    }

    pub fn double_compact_object_orbit(&self) -> Option<Orbit> {
        self.double_compact_object_orbit
    }

    pub fn mechanics(&self) -> &Mechanics {
        &self.mechanics
    }

    pub fn mechanics_prev(&self) -> &Mechanics {
        &self.mechanics_prev
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_unbound(&self) -> bool {
        self.unbound
    }

    pub fn is_stellar_merger(&self) -> bool {
        self.stellar_merger
    }

    pub fn merges_in_hubble_time(&self) -> bool {
        self.merges_in_hubble_time
    }

    pub fn masses_equilibrated(&self) -> bool {
        self.masses_equilibrated
    }

    pub fn supernova_state(&self) -> SupernovaState {
        self.supernova_state
    }

    pub fn systemic_velocity(&self) -> Vector3<f64> {
        self.systemic_velocity
    }

    pub fn euler_angles(&self) -> EulerAngles {
        self.euler
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn common_envelope(&self) -> &CommonEnvelopeState {
        &self.common_envelope
    }

    pub fn mass_transfer_tracker(&self) -> MassTransferTracker {
        self.mass_transfer_tracker
    }

    pub fn ever_rlof(&self) -> bool {
        self.ever_rlof
    }

    pub fn rlof_history(&self) -> &RingBuffer<RlofRecord> {
        &self.rlof_history
    }

    pub fn be_binary_history(&self) -> &RingBuffer<BeBinaryRecord> {
        &self.be_binary
    }

    pub fn coalescence_time(&self) -> Option<Time> {
        self.coalescence_time
    }

    pub fn error(&self) -> Option<&BinaryError> {
        self.error.as_ref()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies
            .iter()
            .map(|body| body.star.mass().to_solar_masses())
            .sum()
    }

    /// Store a failure; the first one recorded wins
    pub(crate) fn set_error(&mut self, error: BinaryError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Roche-lobe radius of `index` in units of the separation
    pub fn roche_lobe_fraction(&self, index: BodyIndex) -> f64 {
        let star = self.star(index);
        let companion = self.star(index.other());
        roche_lobe_radius(
            star.mass().to_solar_masses(),
            companion.mass().to_solar_masses(),
        )
    }

    /// Roche lobe of `index` at periastron of the current orbit
    pub fn roche_lobe_at_periastron(&self, index: BodyIndex) -> Length {
        self.semi_major_axis * ((1.0 - self.eccentricity) * self.roche_lobe_fraction(index))
    }

    /// Recompute both overflow flags against the current orbit
    pub(crate) fn update_rlof_flags(&mut self) {
        for index in BodyIndex::BOTH {
            let roche_lobe = self.roche_lobe_at_periastron(index);
            let overflowing = self.star(index).overflows(roche_lobe);
            self.body_mut(index).rlof = overflowing;
        }
    }

    /// Bodies overlap: `0 < a ≤ R1 + R2`
    pub fn is_touching(&self) -> bool {
        bodies_in_contact(self.semi_major_axis, self.bodies[0].radius(), self.bodies[1].radius())
    }

    pub fn has_massless_remnant(&self) -> bool {
        self.bodies.iter().any(ConstituentBody::is_massless)
    }

    pub fn is_double_compact_object(&self) -> bool {
        self.bodies
            .iter()
            .all(|body| body.star.stellar_type().is_neutron_star_or_black_hole())
    }

    pub fn is_white_dwarf_pair(&self) -> bool {
        self.bodies
            .iter()
            .all(|body| body.star.stellar_type().is_white_dwarf())
    }

    pub(crate) fn both_chemically_homogeneous(&self) -> bool {
        self.bodies
            .iter()
            .all(|body| body.star.stellar_type() == StellarType::ChemicallyHomogeneous)
    }

    pub(crate) fn is_supernova_pending(&self) -> bool {
        self.bodies.iter().any(|body| body.star.is_supernova_pending())
    }

    /// Keplerian angular velocity of the current orbit
    pub fn orbital_angular_velocity(&self) -> AngularVelocity {
        AngularVelocity::from_rad_per_year(orbital_angular_velocity(
            self.total_mass(),
            self.semi_major_axis.to_au(),
        ))
    }

    /// Shift the current conserved quantities into the previous slot and
    /// recompute them. Skipped while either body is massless.
    pub(crate) fn update_mechanics(&mut self) {
        if self.has_massless_remnant() {
            return;
        }
        self.mechanics_prev = self.mechanics;
        self.mechanics = compute_mechanics(
            &self.bodies[0].star,
            &self.bodies[1].star,
            self.semi_major_axis,
            self.eccentricity,
        );
    }

    pub fn set_pre_common_envelope_snapshot(&mut self, snapshot: CommonEnvelopeSnapshot) {
        self.common_envelope.pre = snapshot;
    }

    pub fn set_post_common_envelope_snapshot(&mut self, snapshot: CommonEnvelopeSnapshot) {
        self.common_envelope.post = snapshot;
    }

    /// Current state as a detailed-output record
    pub fn detailed_record(&self) -> DetailedRecord {
        let [one, two] = &self.bodies;
        DetailedRecord {
            time: self.time.to_myr(),
            dt: self.dt.to_myr(),
            mass1: one.mass().to_solar_masses(),
            mass2: two.mass().to_solar_masses(),
            radius1: one.radius().to_solar_radii(),
            radius2: two.radius().to_solar_radii(),
            stellar_type1: one.star.stellar_type(),
            stellar_type2: two.star.stellar_type(),
            semi_major_axis: self.semi_major_axis.to_au(),
            eccentricity: self.eccentricity,
            total_energy: self.mechanics.total_energy,
            total_angular_momentum: self.mechanics.total_angular_momentum,
        }
    }

    /// Push an overflow snapshot if either body overflows.
    ///
    /// # Returns
    /// The new record, when one was taken.
    pub(crate) fn record_rlof(&mut self) -> Option<RlofRecord> {
        let [one, two] = &self.bodies;
        if !(one.rlof || two.rlof) {
            return None;
        }
        self.ever_rlof = true;

        let counter = self
            .rlof_history
            .current()
            .map_or(0, |record| record.event_counter);
        let record = RlofRecord {
            id1: one.id,
            id2: two.id,
            mass1: one.mass().to_solar_masses(),
            mass2: two.mass().to_solar_masses(),
            radius1: one.radius().to_solar_radii(),
            radius2: two.radius().to_solar_radii(),
            stellar_type1: one.star.stellar_type(),
            stellar_type2: two.star.stellar_type(),
            separation: self.semi_major_axis.to_solar_radii(),
            event_counter: counter + 1,
            time: self.time.to_myr(),
            rlof1: one.rlof,
            rlof2: two.rlof,
            is_common_envelope: self.common_envelope_now,
        };
        self.rlof_history.push(record);
        Some(record)
    }

    /// Push a Be-binary snapshot while a neutron star orbits a main-sequence companion
    pub(crate) fn record_be_binary(&mut self) -> Option<BeBinaryRecord> {
        let neutron_star = BodyIndex::BOTH.into_iter().find(|&index| {
            self.star(index).stellar_type() == StellarType::NeutronStar
                && self.star(index.other()).stellar_type().is_main_sequence()
        })?;
        let star = self.star(neutron_star);
        let companion = self.star(neutron_star.other());

        let total_time = self
            .be_binary
            .current()
            .map_or(0.0, |record| record.total_time)
            + self.dt.to_myr();
        let record = BeBinaryRecord {
            id: self.id,
            dt: self.dt.to_myr(),
            total_time,
            separation: self.semi_major_axis.to_au(),
            eccentricity: self.eccentricity,
            neutron_star_mass: star.mass().to_solar_masses(),
            companion_mass: companion.mass().to_solar_masses(),
            companion_luminosity: companion.luminosity(),
            companion_temperature: companion.temperature().to_kelvin(),
            companion_radius: companion.radius().to_solar_radii(),
        };
        self.be_binary.push(record);
        Some(record)
    }
}
