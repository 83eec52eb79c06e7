//! The per-step dispatcher and the evolution loop.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stellar::{StellarModel, StellarType};
use tracing::{debug, warn};
use units::Time;

use crate::body::BodyIndex;
use crate::error::BinaryError;
use crate::events::{BinaryEvent, EventSink, PulsarRecord};
use crate::system::BinarySystem;

/// Initial timestep as a fraction of the bodies' natural timestep
const INITIAL_TIMESTEP_FRACTION: f64 = 1.0e-3;

/// Why evolution stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionStatus {
    Continue,
    StellarMergerAtBirth,
    StellarMerger,
    StarsTouching,
    /// Disrupted while unbound systems are not evolved further
    Unbound,
    MasslessRemnant,
    DoubleCompactObject,
    WhiteDwarfPair,
    BinaryError,
    SingleBodyError,
    TimesUp,
    StepsUp,
}

impl EvolutionStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::Continue
    }

    /// Stopped because something went wrong rather than by physics or budget
    pub fn is_error(self) -> bool {
        matches!(self, Self::BinaryError | Self::SingleBodyError | Self::StepsUp)
    }
}

impl fmt::Display for EvolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Continue => "continue",
            Self::StellarMergerAtBirth => "stellar merger at birth",
            Self::StellarMerger => "stellar merger",
            Self::StarsTouching => "stars touching",
            Self::Unbound => "unbound",
            Self::MasslessRemnant => "massless remnant",
            Self::DoubleCompactObject => "double compact object",
            Self::WhiteDwarfPair => "white dwarf pair",
            Self::BinaryError => "binary error",
            Self::SingleBodyError => "single body error",
            Self::TimesUp => "allowed time exceeded",
            Self::StepsUp => "allowed steps exceeded",
        };
        f.write_str(label)
    }
}

impl<S: StellarModel> BinarySystem<S> {
    /// Age both bodies by `dt`, stopping at the first failure
    pub(crate) fn age_bodies(&mut self, dt: Time) -> Result<(), BinaryError> {
        for index in BodyIndex::BOTH {
            self.body_mut(index)
                .star
                .age_one_timestep(dt)
                .map_err(|source| BinaryError::Stellar { index, source })?;
        }
        Ok(())
    }

    /// Smaller of the two natural timesteps, floored at the configured
    /// minimum while a body is massless or the step underflows.
    pub(crate) fn choose_timestep(&self) -> Time {
        let minimum = self.config.evolution.minimum_timestep();
        let dt = self.bodies[0].star.timestep().min(self.bodies[1].star.timestep());
        if self.has_massless_remnant() || dt < minimum {
            minimum
        } else {
            dt
        }
    }

    /// Resolve one step's worth of binary interaction.
    ///
    /// Mass transfer and winds are evaluated first. A common envelope or
    /// merger takes precedence over a pending explosion, which takes
    /// precedence over ordinary mass changes. Explosions triggered by the
    /// mass changes themselves are resolved afterwards.
    pub fn evaluate_binary<E: EventSink>(&mut self, dt: Time, sink: &mut E) {
        self.common_envelope_now = false;

        self.calculate_mass_transfer();
        self.calculate_wind_mass_loss();

        let tidally_locked = self.config.evolution.chemically_homogeneous.is_enabled()
            && self.both_chemically_homogeneous();
        if (self.common_envelope_now || self.stellar_merger) && !tidally_locked {
            let record = self.resolve_common_envelope();
            sink.record(BinaryEvent::CommonEnvelope(record));
        } else if self.is_supernova_pending() {
            self.evaluate_supernovae(true, sink);
        } else {
            self.resolve_mass_changes();
            if self.is_touching() {
                debug!(system = self.id, "mass transfer brought the bodies into contact");
                self.stellar_merger = true;
            }
        }

        if self.print_detailed && !self.stellar_merger {
            sink.record(BinaryEvent::Detailed(self.detailed_record()));
            self.print_detailed = false;
        }

        if self.is_supernova_pending() {
            self.evaluate_supernovae(false, sink);
        }

        self.semi_major_axis_prev = self.semi_major_axis;
        self.eccentricity_prev = self.eccentricity;
        self.update_mechanics();

        let common_envelope = self.common_envelope_now;
        for body in &mut self.bodies {
            if !body.is_massless() {
                body.star.update_magnetic_field_and_spin(common_envelope, dt);
            }
        }
    }

    /// Evolve until a terminal condition, forwarding every event to `sink`.
    pub fn evolve<E: EventSink>(&mut self, sink: &mut E) -> EvolutionStatus {
        if self.is_touching() {
            self.stellar_merger = true;
            self.stellar_merger_at_birth = true;
            return EvolutionStatus::StellarMergerAtBirth;
        }
        sink.record(BinaryEvent::Detailed(self.detailed_record()));

        let config = Arc::clone(&self.config);
        let evolution = &config.evolution;
        let max_time = evolution.max_evolution_time();

        self.dt = self.bodies[0].star.timestep().min(self.bodies[1].star.timestep())
            * INITIAL_TIMESTEP_FRACTION;
        let mut status = EvolutionStatus::Continue;
        while status == EvolutionStatus::Continue {
            self.steps += 1;
            self.time_prev = self.time;
            self.time += self.dt;

            status = if let Err(error) = self.age_bodies(self.dt) {
                warn!(system = self.id, %error, "single body evolution failed");
                self.set_error(error);
                EvolutionStatus::SingleBodyError
            } else if self.has_massless_remnant() {
                EvolutionStatus::MasslessRemnant
            } else if self.stellar_merger {
                EvolutionStatus::StellarMerger
            } else if self.is_touching() {
                EvolutionStatus::StarsTouching
            } else if self.unbound && !evolution.evolve_unbound_systems {
                EvolutionStatus::Unbound
            } else {
                sink.record(BinaryEvent::Detailed(self.detailed_record()));
                self.evaluate_binary(self.dt, sink);
                if let Some(record) = self.record_rlof() {
                    sink.record(BinaryEvent::Rlof(record));
                }
                self.step_status(evolution.evolve_unbound_systems, sink)
            };

            if status == EvolutionStatus::Continue {
                if self.error.is_some() {
                    status = EvolutionStatus::BinaryError;
                } else if self.is_white_dwarf_pair() {
                    status = EvolutionStatus::WhiteDwarfPair;
                } else if self.time > max_time {
                    status = EvolutionStatus::TimesUp;
                }
            }

            if status == EvolutionStatus::Continue && self.steps >= evolution.max_steps {
                warn!(system = self.id, steps = self.steps, "evolution stopped at the step limit");
                status = EvolutionStatus::StepsUp;
            }

            if status == EvolutionStatus::Continue {
                self.dt = self.choose_timestep();
            }
        }

        if !self.stellar_merger {
            sink.record(BinaryEvent::Detailed(self.detailed_record()));
        }
        debug!(system = self.id, %status, steps = self.steps, "evolution finished");
        status
    }

    /// Checks made after a step was evaluated, plus the records that only
    /// make sense for a surviving binary.
    fn step_status<E: EventSink>(&mut self, evolve_unbound: bool, sink: &mut E) -> EvolutionStatus {
        if self.error.is_some() {
            return EvolutionStatus::BinaryError;
        }
        if self.stellar_merger {
            return EvolutionStatus::StellarMerger;
        }
        if self.is_touching() {
            return EvolutionStatus::StarsTouching;
        }
        if self.unbound && !evolve_unbound {
            return EvolutionStatus::Unbound;
        }

        for index in BodyIndex::BOTH {
            let body = self.body(index);
            if body.star.stellar_type() == StellarType::NeutronStar {
                sink.record(BinaryEvent::Pulsar(PulsarRecord {
                    time: self.time.to_myr(),
                    body: index,
                    mass: body.mass().to_solar_masses(),
                    omega: body.star.omega().to_rad_per_sec(),
                    recycled: body.recycled_neutron_star,
                }));
            }
        }
        if let Some(record) = self.record_be_binary() {
            sink.record(BinaryEvent::BeBinary(record));
        }

        if self.is_double_compact_object() {
            if !self.unbound {
                let record = self.resolve_coalescence();
                sink.record(BinaryEvent::DoubleCompactObject(record));
            }
            return EvolutionStatus::DoubleCompactObject;
        }
        EvolutionStatus::Continue
    }
}
