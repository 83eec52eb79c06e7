//! Event records handed to an external recorder.
//!
//! Resolvers produce these values; the evolution loop forwards them to an
//! [`EventSink`]. Recording never feeds back into evolution.

use serde::{Deserialize, Serialize};
use stellar::StellarType;
use tracing::debug;

use crate::body::BodyIndex;
use crate::system::{CommonEnvelopeSnapshot, SupernovaState};

/// Mass-transfer episode state, radii and separation in R☉, time in Myr
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RlofRecord {
    pub id1: u64,
    pub id2: u64,
    pub mass1: f64,
    pub mass2: f64,
    pub radius1: f64,
    pub radius2: f64,
    pub stellar_type1: StellarType,
    pub stellar_type2: StellarType,
    pub separation: f64,
    /// Steps seen with either body in overflow, carried across snapshots
    pub event_counter: u64,
    pub time: f64,
    pub rlof1: bool,
    pub rlof2: bool,
    pub is_common_envelope: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEnvelopeRecord {
    pub time: f64,
    pub count: u32,
    pub alpha: f64,
    pub pre: CommonEnvelopeSnapshot,
    pub post: CommonEnvelopeSnapshot,
    pub mass1_pre: f64,
    pub mass2_pre: f64,
    pub mass1_post: f64,
    pub mass2_post: f64,
    pub stellar_type1_pre: StellarType,
    pub stellar_type2_pre: StellarType,
    pub stellar_type1_post: StellarType,
    pub stellar_type2_post: StellarType,
    pub lambda1: f64,
    pub lambda2: f64,
    /// Envelope binding energies in M☉ AU² yr⁻²
    pub binding_energy1: f64,
    pub binding_energy2: f64,
    pub double_core: bool,
    pub optimistic: bool,
    pub simultaneous_rlof: bool,
    pub merger: bool,
    pub immediate_rlof_post: bool,
}

/// Natal kick outcome. Velocities in km/s, separations in AU.
///
/// Orbital quantities are NaN for explosions in an already disrupted system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupernovaRecord {
    pub time: f64,
    pub exploding: BodyIndex,
    pub exploding_id: u64,
    pub state: SupernovaState,
    pub remnant_type: StellarType,
    pub remnant_mass: f64,
    pub companion_type: StellarType,
    pub companion_mass: f64,
    pub kick_magnitude: f64,
    pub theta: f64,
    pub phi: f64,
    pub mean_anomaly: f64,
    pub orbital_velocity_pre: f64,
    pub dimensionless_kick: f64,
    pub semi_major_axis_pre: f64,
    pub eccentricity_pre: f64,
    pub semi_major_axis_post: f64,
    pub eccentricity_post: f64,
    pub orbital_energy_pre: f64,
    pub orbital_energy_post: f64,
    pub cos_inclination: f64,
    pub systemic_speed: f64,
    pub unbound: bool,
    pub companion_runaway: bool,
}

/// Neutron star orbiting a main-sequence companion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeBinaryRecord {
    pub id: u64,
    pub dt: f64,
    pub total_time: f64,
    pub separation: f64,
    pub eccentricity: f64,
    pub neutron_star_mass: f64,
    pub companion_mass: f64,
    pub companion_luminosity: f64,
    pub companion_temperature: f64,
    pub companion_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleCompactObjectRecord {
    pub time: f64,
    pub id1: u64,
    pub id2: u64,
    pub mass1: f64,
    pub mass2: f64,
    pub stellar_type1: StellarType,
    pub stellar_type2: StellarType,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Gravitational-wave inspiral time in Myr
    pub coalescence_time: f64,
    pub merges_in_hubble_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulsarRecord {
    pub time: f64,
    pub body: BodyIndex,
    pub mass: f64,
    /// Spin in rad/s
    pub omega: f64,
    pub recycled: bool,
}

/// Per-step state, masses in M☉, radii in R☉, separation in AU
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRecord {
    pub time: f64,
    pub dt: f64,
    pub mass1: f64,
    pub mass2: f64,
    pub radius1: f64,
    pub radius2: f64,
    pub stellar_type1: StellarType,
    pub stellar_type2: StellarType,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub total_energy: f64,
    pub total_angular_momentum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BinaryEvent {
    Rlof(RlofRecord),
    CommonEnvelope(CommonEnvelopeRecord),
    Supernova(SupernovaRecord),
    BeBinary(BeBinaryRecord),
    DoubleCompactObject(DoubleCompactObjectRecord),
    Pulsar(PulsarRecord),
    Detailed(DetailedRecord),
}

/// Receiver for event records
pub trait EventSink {
    fn record(&mut self, event: BinaryEvent);
}

impl EventSink for Vec<BinaryEvent> {
    fn record(&mut self, event: BinaryEvent) {
        self.push(event);
    }
}

/// Emits every record as a `debug` event tagged with the system id
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    pub system_id: u64,
}

impl EventSink for TracingSink {
    fn record(&mut self, event: BinaryEvent) {
        debug!(system = self.system_id, ?event, "binary event");
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: BinaryEvent) {}
}
