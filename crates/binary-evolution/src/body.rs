//! The two bodies of a binary and the transient roles they play.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use stellar::StellarModel;
use units::{Length, Mass};

/// Slot of a body in its binary.
///
/// Donor/accretor and exploding/companion roles are expressed as a pair of
/// indices chosen at the start of each resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyIndex {
    One,
    Two,
}

impl BodyIndex {
    pub const BOTH: [BodyIndex; 2] = [BodyIndex::One, BodyIndex::Two];

    /// The companion's slot
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub fn slot(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for BodyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1"),
            Self::Two => write!(f, "2"),
        }
    }
}

/// A star model plus the per-body bookkeeping the binary engine keeps.
#[derive(Debug, Clone)]
pub struct ConstituentBody<S> {
    pub star: S,
    pub id: u64,
    /// Radius exceeds the Roche lobe at periastron
    pub rlof: bool,
    /// R / (a(1-e)·R_L) at birth
    pub roche_lobe_tracker: f64,
    pub mass_loss_diff: Mass,
    pub mass_transfer_diff: Mass,
    /// Space velocity in the reference frame of the first explosion, km/s
    pub velocity: Vector3<f64>,
    pub runaway: bool,
    pub rlof_onto_neutron_star: bool,
    pub recycled_neutron_star: bool,
    /// Common-envelope quantities captured at the last envelope event
    pub lambda_at_common_envelope: f64,
    pub binding_energy_at_common_envelope: f64,
}

impl<S: StellarModel> ConstituentBody<S> {
    pub fn new(star: S, id: u64) -> Self {
        Self {
            star,
            id,
            rlof: false,
            roche_lobe_tracker: 0.0,
            mass_loss_diff: Mass::zero(),
            mass_transfer_diff: Mass::zero(),
            velocity: Vector3::zeros(),
            runaway: false,
            rlof_onto_neutron_star: false,
            recycled_neutron_star: false,
            lambda_at_common_envelope: 0.0,
            binding_energy_at_common_envelope: 0.0,
        }
    }

    pub fn mass(&self) -> Mass {
        self.star.mass()
    }

    pub fn radius(&self) -> Length {
        self.star.radius()
    }

    pub fn is_massless(&self) -> bool {
        self.star.stellar_type() == stellar::StellarType::MasslessRemnant
    }
}
