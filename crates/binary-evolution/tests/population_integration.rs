//! End-to-end runs with the analytic star model.
//!
//! These tests sample, evolve and summarise whole binaries, so they check
//! the loop terminates and the bookkeeping holds rather than exact numbers.

use std::sync::Arc;

use binary_evolution::{
    BinaryConfig, BinaryEvent, BinaryFactory, BodyIndex, ConfigError, EvolutionStatus, InitialConditions,
    NullSink, ObjectIdCounter, PopulationRunner, TracingSink,
};
use stellar::{AnalyticStar, StellarModel};
use units::{Length, Mass};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn sampled_binary_evolves_to_a_terminal_status() {
    init_tracing();
    let config = Arc::new(BinaryConfig::default());
    let mut factory = BinaryFactory::new(config, ObjectIdCounter::default());
    let mut system = factory.sample::<AnalyticStar>(7).expect("binary sampled");
    let mut sink = TracingSink {
        system_id: system.id(),
    };

    let status = system.evolve(&mut sink);

    assert!(status.is_terminal());
    assert_ne!(status, EvolutionStatus::StellarMergerAtBirth);
    assert!(system.steps() >= 1);
    assert!(system.time().to_myr() > 0.0);
}

#[test]
fn overlapping_zams_stars_merge_at_birth() {
    let mut factory = BinaryFactory::new(Arc::new(BinaryConfig::default()), ObjectIdCounter::default());
    let conditions = InitialConditions {
        primary_mass: Mass::from_solar_masses(10.0),
        secondary_mass: Mass::from_solar_masses(8.0),
        semi_major_axis: Length::from_au(1.0e-3),
        eccentricity: 0.0,
        metallicity: 0.0142,
    };
    let mut system = factory
        .build::<AnalyticStar>(3, conditions)
        .expect("valid orbit");

    assert!(system.is_touching());
    assert_eq!(system.evolve(&mut NullSink), EvolutionStatus::StellarMergerAtBirth);
}

#[test]
fn events_bracket_the_evolution() {
    let mut factory = BinaryFactory::new(Arc::new(BinaryConfig::default()), ObjectIdCounter::default());
    let conditions = InitialConditions {
        primary_mass: Mass::from_solar_masses(12.0),
        secondary_mass: Mass::from_solar_masses(6.0),
        semi_major_axis: Length::from_au(50.0),
        eccentricity: 0.1,
        metallicity: 0.0142,
    };
    let mut system = factory
        .build::<AnalyticStar>(11, conditions)
        .expect("valid orbit");
    let mut events = Vec::new();

    let status = system.evolve(&mut events);

    assert!(status.is_terminal());
    assert!(matches!(events.first(), Some(BinaryEvent::Detailed(_))));
    if !system.is_stellar_merger() {
        assert!(matches!(events.last(), Some(BinaryEvent::Detailed(_))));
    }
    for index in BodyIndex::BOTH {
        assert!(system.star(index).mass().to_solar_masses() >= 0.0);
    }
}

#[test]
fn population_runs_are_reproducible() {
    init_tracing();
    let config = Arc::new(BinaryConfig::default());
    let runner = PopulationRunner::new(config, 1_000);

    let first = runner.run::<AnalyticStar>(8);
    let second = runner.run::<AnalyticStar>(8);

    assert_eq!(first.summaries.len() + first.rejected_seeds.len(), 8);
    let outline = |report: &binary_evolution::PopulationReport| {
        report
            .summaries
            .iter()
            .map(|summary| (summary.id, summary.seed, summary.status, summary.steps))
            .collect::<Vec<_>>()
    };
    assert_eq!(outline(&first), outline(&second));
    assert_eq!(first.rejected_seeds, second.rejected_seeds);

    assert!(first.summaries.windows(2).all(|pair| pair[0].id < pair[1].id));
    for summary in &first.summaries {
        assert_eq!(summary.id, 1 + 3 * (summary.seed - 1_000));
        assert!(summary.status.is_terminal());
    }
}

#[test]
fn toml_configuration_drives_a_run() {
    let config = BinaryConfig::from_toml_str(
        r#"
        [evolution]
        max_steps = 5

        [birth]
        min_primary_mass = 8.0
        max_primary_mass = 20.0
        "#,
    )
    .expect("valid configuration");
    let runner = PopulationRunner::new(Arc::new(config), 3);

    let report = runner.run::<AnalyticStar>(4);

    for summary in &report.summaries {
        assert!(summary.steps <= 5, "{} steps", summary.steps);
        assert!(summary.status.is_terminal());
    }
    assert_eq!(report.count(EvolutionStatus::TimesUp), 0);
}

#[test]
fn invalid_configuration_is_reported() {
    let result = BinaryConfig::from_toml_str("[common_envelope]\nalpha = 0.0\n");

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
