//! Orbital evolution of binary stars.
//!
//! A [`BinarySystem`] owns two star models and the orbit between them. Each
//! step ages both stars, then resolves winds, Roche-lobe overflow, common
//! envelopes and supernova kicks until a terminal [`EvolutionStatus`] is
//! reached. Star physics comes from any [`stellar::StellarModel`].

pub mod birth;
pub mod body;
pub mod coalescence;
pub mod common_envelope;
pub mod config;
pub mod conservation;
pub mod error;
pub mod events;
pub mod evolution;
pub mod frame;
pub mod mass_transfer;
pub mod population;
pub mod roche;
pub mod supernova;
pub mod system;
pub mod winds;

#[cfg(test)]
pub(crate) mod testing;

pub use birth::{BinaryFactory, InitialConditions, ObjectIdCounter};
pub use body::{BodyIndex, ConstituentBody};
pub use coalescence::coalescence_time;
pub use config::BinaryConfig;
pub use conservation::Mechanics;
pub use error::{BinaryError, ConfigError, RootSolveError};
pub use events::{BinaryEvent, EventSink, NullSink, TracingSink};
pub use evolution::EvolutionStatus;
pub use population::{PopulationReport, PopulationRunner, SystemSummary};
pub use system::{BinarySystem, MassTransferTracker, Orbit, SupernovaState};
