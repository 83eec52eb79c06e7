use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;
use stellar::{StellarModel, StellarType, SupernovaKick};
use units::{Length, Mass, Velocity};

use crate::body::{BodyIndex, ConstituentBody};
use crate::config::BinaryConfig;
use crate::error::BinaryError;
use crate::events::{BinaryEvent, NullSink};
use crate::system::{BinarySystem, SupernovaState};
use crate::testing::TestStar;

fn kick(magnitude: f64) -> SupernovaKick {
    SupernovaKick {
        magnitude: Velocity::from_km_per_sec(magnitude),
        ..SupernovaKick::zero()
    }
}

/// Neutron star that collapsed from `progenitor_mass` and has a pending kick
fn neutron_star(mass: f64, progenitor_mass: f64, kick: SupernovaKick) -> TestStar {
    let mut star = TestStar::remnant(StellarType::NeutronStar, mass).with_kick(kick);
    star.mass_prev = Mass::from_solar_masses(progenitor_mass);
    star
}

fn system(star1: TestStar, star2: TestStar, a_au: f64) -> BinarySystem<TestStar> {
    BinarySystem::from_bodies(
        Arc::new(BinaryConfig::default()),
        1,
        99,
        [ConstituentBody::new(star1, 2), ConstituentBody::new(star2, 3)],
        Length::from_au(a_au),
        0.0,
        1.0,
    )
}

#[test]
fn zero_kick_without_mass_loss_leaves_a_circular_orbit_alone() {
    let mut system = system(
        neutron_star(1.4, 1.4, kick(0.0)),
        TestStar::main_sequence(10.0, 5.0),
        2.0,
    );

    let record = system.resolve_supernova(BodyIndex::One).expect("pending supernova");

    assert!(!system.is_unbound());
    assert!(system.eccentricity() < 1e-10);
    assert_relative_eq!(system.semi_major_axis().to_au(), 2.0, max_relative = 1e-9);
    assert_relative_eq!(record.semi_major_axis_post, 2.0, max_relative = 1e-9);
    assert_eq!(record.dimensionless_kick, 0.0);
    assert!(!system.star(BodyIndex::One).is_supernova_pending());
}

#[test]
fn symmetric_mass_loss_follows_blaauw() {
    let mut system = system(
        neutron_star(1.4, 2.0, kick(0.0)),
        TestStar::main_sequence(1.0, 1.0),
        1.0,
    );

    let record = system.resolve_supernova(BodyIndex::One).expect("pending supernova");

    // e = ΔM / M', a'/a = M' / (M' - ΔM)
    assert_relative_eq!(record.eccentricity_post, 0.25, max_relative = 1e-9);
    assert_relative_eq!(system.semi_major_axis().to_au(), 2.4 / 1.8, max_relative = 1e-9);
    assert!(!system.is_unbound());
    assert_eq!(
        system.pre_supernova_orbit().map(|orbit| orbit.semi_major_axis.to_au()),
        Some(1.0)
    );
    assert!(system.systemic_velocity().norm() > 0.0);
}

#[test]
fn explosion_without_a_pending_event_is_refused() {
    let mut system = system(
        TestStar::main_sequence(10.0, 5.0),
        TestStar::main_sequence(8.0, 4.0),
        2.0,
    );

    let result = system.resolve_supernova(BodyIndex::Two);

    assert_eq!(result, Err(BinaryError::SupernovaImproperlyCalled(BodyIndex::Two)));
    assert!(system.pre_supernova_orbit().is_none());
    assert_relative_eq!(system.semi_major_axis().to_au(), 2.0);
}

#[test]
fn large_kick_disrupts_and_disruption_is_permanent() {
    let mut system = system(
        neutron_star(1.4, 10.0, kick(1000.0)),
        neutron_star(1.4, 1.4, kick(5.0)),
        1.0,
    );

    let first = system.resolve_supernova(BodyIndex::One).expect("pending supernova");
    assert!(first.unbound);
    assert!(first.eccentricity_post >= 1.0);
    assert!(system.is_unbound());
    assert!(system.body(BodyIndex::Two).runaway);

    let orbit = (system.semi_major_axis(), system.eccentricity());
    let second = system.resolve_supernova(BodyIndex::Two).expect("pending supernova");
    assert!(system.is_unbound());
    assert!(second.unbound);
    assert_eq!((system.semi_major_axis(), system.eccentricity()), orbit);
}

#[test]
fn kick_in_a_disrupted_system_moves_only_the_exploding_body() {
    let mut system = system(
        TestStar::main_sequence(10.0, 5.0),
        neutron_star(1.4, 1.4, kick(100.0)),
        3.0,
    );
    system.unbound = true;

    let record = system.resolve_supernova(BodyIndex::Two).expect("pending supernova");

    assert!(record.semi_major_axis_post.is_nan());
    assert!(record.eccentricity_post.is_nan());
    assert!(record.orbital_velocity_pre.is_nan());
    assert!(record.orbital_energy_post.is_nan());
    assert_relative_eq!(system.semi_major_axis().to_au(), 3.0);
    assert_eq!(system.eccentricity(), 0.0);
    assert_relative_eq!(
        system.body(BodyIndex::Two).velocity.norm(),
        100.0,
        max_relative = 1e-12
    );
    assert_eq!(system.body(BodyIndex::One).velocity.norm(), 0.0);
}

#[test]
fn explosion_order_is_tracked() {
    let mut system = system(
        neutron_star(1.4, 1.4, kick(0.0)),
        TestStar::main_sequence(10.0, 5.0),
        2.0,
    );
    let mut events = Vec::new();

    system.evaluate_supernovae(false, &mut events);
    assert_eq!(system.supernova_state(), SupernovaState::Star1);
    assert!(matches!(events.as_slice(), [BinaryEvent::Supernova(record)] if record.exploding == BodyIndex::One));

    system.body_mut(BodyIndex::Two).star.kick = Some(kick(0.0));
    system.evaluate_supernovae(false, &mut events);
    assert_eq!(system.supernova_state(), SupernovaState::Star1ThenStar2);
    assert_eq!(events.len(), 2);
}

#[test]
fn simultaneous_explosions_are_flagged() {
    let mut system = system(
        neutron_star(1.4, 1.4, kick(0.0)),
        neutron_star(1.4, 1.4, kick(0.0)),
        2.0,
    );

    system.evaluate_supernovae(false, &mut NullSink);

    assert_eq!(system.supernova_state(), SupernovaState::Simultaneous);
    assert!(!system.is_supernova_pending());
}

#[test]
fn late_explosion_in_a_disrupted_system_waits_for_the_policy() {
    let mut system = system(
        TestStar::main_sequence(10.0, 5.0),
        neutron_star(1.4, 1.4, kick(10.0)),
        2.0,
    );
    system.unbound = true;

    system.evaluate_supernovae(false, &mut NullSink);
    assert!(system.star(BodyIndex::Two).is_supernova_pending());

    system.evaluate_supernovae(true, &mut NullSink);
    assert!(!system.star(BodyIndex::Two).is_supernova_pending());
}

proptest! {
    #[test]
    fn disruption_survives_any_later_kick(magnitude in 0.0f64..2000.0) {
        let mut system = system(
            neutron_star(1.4, 10.0, kick(1000.0)),
            neutron_star(1.4, 1.4, kick(magnitude)),
            1.0,
        );

        system.evaluate_supernovae(true, &mut NullSink);

        prop_assert!(system.is_unbound());
        prop_assert!(!system.is_supernova_pending());
    }
}
