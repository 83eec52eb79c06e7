//! Evolving many independent binaries in parallel.
//!
//! Each system gets its own seed (`population seed + index`) and a disjoint
//! id range, so results do not depend on how rayon schedules the work.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stellar::{FromZams, StellarModel, StellarType};
use tracing::{info, warn};

use crate::birth::{BinaryFactory, ObjectIdCounter};
use crate::config::BinaryConfig;
use crate::events::{EventSink, TracingSink};
use crate::evolution::EvolutionStatus;
use crate::system::BinarySystem;

/// Ids consumed per binary: the system and its two bodies
const IDS_PER_SYSTEM: u64 = 3;

/// Final state of one evolved binary. Masses in M☉, separation in AU,
/// coalescence time in Myr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub id: u64,
    pub seed: u64,
    pub status: EvolutionStatus,
    pub time: f64,
    pub steps: usize,
    pub mass1: f64,
    pub mass2: f64,
    pub stellar_type1: StellarType,
    pub stellar_type2: StellarType,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub unbound: bool,
    pub coalescence_time: Option<f64>,
    pub merges_in_hubble_time: bool,
    pub error: Option<String>,
}

impl SystemSummary {
    pub fn from_system<S: StellarModel>(system: &BinarySystem<S>, status: EvolutionStatus) -> Self {
        let [one, two] = &system.bodies;
        Self {
            id: system.id(),
            seed: system.seed(),
            status,
            time: system.time().to_myr(),
            steps: system.steps(),
            mass1: one.mass().to_solar_masses(),
            mass2: two.mass().to_solar_masses(),
            stellar_type1: one.star.stellar_type(),
            stellar_type2: two.star.stellar_type(),
            semi_major_axis: system.semi_major_axis().to_au(),
            eccentricity: system.eccentricity(),
            unbound: system.is_unbound(),
            coalescence_time: system.coalescence_time().map(|time| time.to_myr()),
            merges_in_hubble_time: system.merges_in_hubble_time(),
            error: system.error().map(ToString::to_string),
        }
    }
}

/// Outcome of a population run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationReport {
    /// Ordered by id
    pub summaries: Vec<SystemSummary>,
    /// Seeds for which no acceptable binary could be drawn
    pub rejected_seeds: Vec<u64>,
}

impl PopulationReport {
    pub fn count(&self, status: EvolutionStatus) -> usize {
        self.summaries
            .iter()
            .filter(|summary| summary.status == status)
            .count()
    }
}

pub struct PopulationRunner {
    config: Arc<BinaryConfig>,
    seed: u64,
}

impl PopulationRunner {
    pub fn new(config: Arc<BinaryConfig>, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Sample and evolve `count` binaries, logging events through `tracing`
    pub fn run<S: FromZams>(&self, count: usize) -> PopulationReport {
        self.run_with::<S, _, _>(count, |system_id| TracingSink { system_id })
    }

    /// Sample and evolve `count` binaries, one sink per system from `make_sink`
    pub fn run_with<S, E, F>(&self, count: usize, make_sink: F) -> PopulationReport
    where
        S: FromZams,
        E: EventSink,
        F: Fn(u64) -> E + Sync,
    {
        let outcomes: Vec<Result<SystemSummary, u64>> = (0..count as u64)
            .into_par_iter()
            .map(|index| {
                let seed = self.seed.wrapping_add(index);
                let ids = ObjectIdCounter::new(1 + index * IDS_PER_SYSTEM);
                let mut factory = BinaryFactory::new(Arc::clone(&self.config), ids);
                let mut system = match factory.sample::<S>(seed) {
                    Ok(system) => system,
                    Err(error) => {
                        warn!(seed, %error, "binary not generated");
                        return Err(seed);
                    }
                };

                let mut sink = make_sink(system.id());
                let status = system.evolve(&mut sink);
                info!(system = system.id(), seed, %status, "binary evolved");
                Ok(SystemSummary::from_system(&system, status))
            })
            .collect();

        let mut report = PopulationReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(summary) => report.summaries.push(summary),
                Err(seed) => report.rejected_seeds.push(seed),
            }
        }
        report.summaries.sort_by_key(|summary| summary.id);
        report
    }
}
