use std::sync::Arc;

use approx::assert_relative_eq;
use stellar::{StellarModel, StellarType};
use units::{Length, Mass};

use crate::body::{BodyIndex, ConstituentBody};
use crate::config::{BinaryConfig, MassAcceptance, StageThreshold};
use crate::roche::roche_lobe_radius;
use crate::system::{BinarySystem, MassTransferTracker};
use crate::testing::TestStar;

fn conservative() -> BinaryConfig {
    let mut config = BinaryConfig::default();
    config.mass_transfer.acceptance = MassAcceptance::Fixed;
    config.mass_transfer.fraction_accreted = 1.0;
    config
}

fn system(
    config: BinaryConfig,
    star1: TestStar,
    star2: TestStar,
    a_au: f64,
    e: f64,
) -> BinarySystem<TestStar> {
    BinarySystem::from_bodies(
        Arc::new(config),
        1,
        11,
        [ConstituentBody::new(star1, 2), ConstituentBody::new(star2, 3)],
        Length::from_au(a_au),
        e,
        1.0,
    )
}

#[test]
fn detached_binary_does_nothing() {
    let mut system = system(
        conservative(),
        TestStar::main_sequence(10.0, 5.0),
        TestStar::main_sequence(8.0, 4.0),
        10.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert!(!system.mass_transfer);
    assert!(!system.common_envelope_now);
    assert_eq!(system.mass_transfer_tracker(), MassTransferTracker::NoMassTransfer);
    assert_eq!(system.a_mass_transfer_diff, Length::zero());
}

#[test]
fn both_bodies_overflowing_is_a_common_envelope() {
    let mut system = system(
        conservative(),
        TestStar::giant(10.0, 3.0, 200.0),
        TestStar::giant(8.0, 2.0, 150.0),
        1.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert!(system.bodies.iter().all(|body| body.rlof));
    assert!(system.common_envelope_now);
    assert!(!system.stellar_merger);
}

#[test]
fn giant_donor_loses_its_envelope_in_one_step() {
    let mut system = system(
        conservative(),
        TestStar::giant(2.0, 0.5, 100.0),
        TestStar::main_sequence(10.0, 5.0),
        1.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert_eq!(system.mass_transfer_tracker(), MassTransferTracker::StableFrom1To2);
    let donor = system.star(BodyIndex::One);
    assert_eq!(donor.stellar_type(), StellarType::NakedHeliumStarMainSequence);
    assert_relative_eq!(donor.mass().to_solar_masses(), 0.5);
    assert_eq!(system.body(BodyIndex::One).mass_transfer_diff, Mass::zero());
    assert_relative_eq!(
        system.body(BodyIndex::Two).mass_transfer_diff.to_solar_masses(),
        1.5
    );
    assert!(system.print_detailed);

    // Conservative transfer from the lighter body widens the orbit
    assert_relative_eq!(system.a_mass_transfer_diff.to_au(), 11.0016, max_relative = 1e-4);
}

#[test]
fn main_sequence_donor_shrinks_to_its_roche_lobe() {
    let mut system = system(
        conservative(),
        TestStar::main_sequence(5.0, 8.0),
        TestStar::main_sequence(10.0, 5.0),
        0.1,
        0.0,
    );

    system.calculate_mass_transfer();
    assert_eq!(system.mass_transfer_tracker(), MassTransferTracker::StableFrom1To2);
    assert!(system.error().is_none());

    let lost = -system.body(BodyIndex::One).mass_transfer_diff.to_solar_masses();
    assert!(lost > 0.0 && lost < 5.0, "lost = {lost}");
    assert_relative_eq!(
        system.body(BodyIndex::Two).mass_transfer_diff.to_solar_masses(),
        lost,
        max_relative = 1e-12
    );

    let radius = system
        .star(BodyIndex::One)
        .radius_after_mass_loss(Mass::from_solar_masses(lost))
        .to_au();
    let a_after = 0.1 + system.a_mass_transfer_diff.to_au();
    let roche_lobe = a_after * roche_lobe_radius(5.0 - lost, 10.0 + lost);
    assert_relative_eq!(radius, roche_lobe, max_relative = 1e-6);
}

#[test]
fn unstable_main_sequence_donor_merges() {
    let mut donor = TestStar::main_sequence(10.0, 20.0);
    donor.zeta_adiabatic = -5.0;
    let mut system = system(
        conservative(),
        donor,
        TestStar::main_sequence(8.0, 4.0),
        0.2,
        0.0,
    );

    system.calculate_mass_transfer();

    assert!(system.stellar_merger);
    assert!(!system.common_envelope_now);
}

#[test]
fn unstable_giant_donor_raises_a_common_envelope() {
    let mut system = system(
        conservative(),
        TestStar::giant(10.0, 3.0, 300.0),
        TestStar::main_sequence(2.0, 2.0),
        1.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert!(system.common_envelope_now);
    assert!(!system.stellar_merger);
}

#[test]
fn critical_mass_ratio_overrides_the_zeta_test() {
    let mut config = conservative();
    config.mass_transfer.critical_mass_ratios.giant_branch = StageThreshold {
        non_degenerate_accretor: Some(0.1),
        degenerate_accretor: None,
    };
    let mut system = system(
        config,
        TestStar::giant(2.0, 0.5, 100.0),
        TestStar::main_sequence(10.0, 5.0),
        1.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert!(system.common_envelope_now);
    assert_relative_eq!(system.star(BodyIndex::One).mass().to_solar_masses(), 2.0);
}

#[test]
fn stable_transfer_onto_a_neutron_star_recycles_it() {
    let mut system = system(
        conservative(),
        TestStar::giant(0.5, 0.2, 100.0),
        TestStar::remnant(StellarType::NeutronStar, 1.4),
        1.0,
        0.0,
    );

    system.calculate_mass_transfer();

    assert_eq!(system.mass_transfer_tracker(), MassTransferTracker::StableFrom1To2);
    assert!(system.body(BodyIndex::One).rlof_onto_neutron_star);
    assert!(system.body(BodyIndex::Two).recycled_neutron_star);
}

#[test]
fn circularisation_moves_to_periastron() {
    let mut config = conservative();
    config.mass_transfer.circularise = true;
    let mut system = system(
        config,
        TestStar::giant(2.0, 0.5, 100.0),
        TestStar::main_sequence(10.0, 5.0),
        1.25,
        0.2,
    );

    system.initialise_mass_transfer();

    assert!(system.mass_transfer);
    assert_eq!(system.eccentricity(), 0.0);
    assert_relative_eq!(system.semi_major_axis().to_au(), 1.0, max_relative = 1e-12);
    assert_eq!(system.semi_major_axis_prev(), system.semi_major_axis());
}
