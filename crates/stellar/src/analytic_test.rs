use approx::assert_relative_eq;
use units::{Length, Mass, Time};

use crate::analytic::{AnalyticStar, main_sequence_lifetime};
use crate::model::{StellarError, StellarModel, ZetaPrescription};
use crate::stellar_type::StellarType;

fn evolve_until_compact(star: &mut AnalyticStar) {
    for _ in 0..1000 {
        if star.stellar_type().is_compact_object() {
            return;
        }
        let dt = star.timestep();
        star.age_one_timestep(dt).expect("ageing should succeed");
    }
    panic!("star never became a compact object");
}

#[test]
fn solar_mass_star_starts_near_solar_radius() {
    let sun = AnalyticStar::new(Mass::from_solar_masses(1.0), 0.0142, 1);

    assert_eq!(sun.stellar_type(), StellarType::MainSequence);
    assert!(
        (sun.radius().to_solar_radii() - 1.0).abs() < 0.1,
        "Radius {} R☉ should be close to 1",
        sun.radius().to_solar_radii()
    );
    assert_relative_eq!(sun.luminosity(), 1.0);
    assert_eq!(sun.core_mass(), Mass::zero());
}

#[test]
fn lifetimes_decrease_with_mass() {
    assert!(main_sequence_lifetime(1.0) > main_sequence_lifetime(5.0));
    assert!(main_sequence_lifetime(5.0) > main_sequence_lifetime(20.0));
    assert_relative_eq!(main_sequence_lifetime(1.0), 1.0e4);
}

#[test]
fn ageing_commits_previous_values() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(5.0), 0.0142, 1);
    let radius_before = star.radius();

    star.age_one_timestep(star.timestep()).unwrap();

    assert_eq!(star.radius_prev(), radius_before);
    assert!(star.radius() > radius_before);
    assert_eq!(star.mass_prev(), Mass::from_solar_masses(5.0));
}

#[test]
fn rejects_non_positive_timestep() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(1.0), 0.0142, 1);
    let result = star.age_one_timestep(Time::zero());
    assert_eq!(result, Err(StellarError::InvalidTimestep(0.0)));
}

#[test]
fn massive_star_collapses_with_pending_kick() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(12.0), 0.0142, 9);
    evolve_until_compact(&mut star);

    assert_eq!(star.stellar_type(), StellarType::NeutronStar);
    assert_relative_eq!(star.mass().to_solar_masses(), 1.4);
    let kick = star.supernova_kick().expect("collapse should leave a pending kick");
    assert!(kick.magnitude.to_km_per_sec() >= 0.0);
    assert!(kick.theta.abs() <= std::f64::consts::FRAC_PI_2);

    star.clear_supernova();
    assert!(!star.is_supernova_pending());
}

#[test]
fn very_massive_star_forms_black_hole() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(30.0), 0.0142, 2);
    evolve_until_compact(&mut star);

    assert_eq!(star.stellar_type(), StellarType::BlackHole);
    assert!(star.mass().to_solar_masses() > 3.0);
    assert!(star.is_degenerate());
}

#[test]
fn low_mass_star_becomes_white_dwarf_without_kick() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(3.0), 0.0142, 4);
    evolve_until_compact(&mut star);

    assert!(star.stellar_type().is_white_dwarf());
    assert!(star.supernova_kick().is_none());
    assert!(star.mass().to_solar_masses() <= 1.38);
}

#[test]
fn giant_strips_to_helium_star() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(10.0), 0.0142, 5);
    while !star.stellar_type().is_giant() {
        star.age_one_timestep(star.timestep()).unwrap();
    }
    let core = star.core_mass();
    assert!(core.is_positive());

    let stripped = star.strip_envelope();

    assert!(stripped.is_naked_helium_star(), "got {}", stripped);
    assert_relative_eq!(star.mass().to_solar_masses(), core.to_solar_masses());
    assert_eq!(star.envelope_mass(), Mass::zero());
}

#[test]
fn losing_all_mass_leaves_massless_remnant() {
    let mut star = AnalyticStar::new(Mass::from_solar_masses(2.0), 0.0142, 6);
    let stellar_type = star.update_mass(Mass::from_solar_masses(-2.5));
    assert_eq!(stellar_type, StellarType::MasslessRemnant);
    assert_eq!(star.radius(), Length::zero());
}

#[test]
fn radiative_main_sequence_shrinks_on_mass_loss() {
    let star = AnalyticStar::new(Mass::from_solar_masses(5.0), 0.0142, 7);
    assert_relative_eq!(star.zeta(ZetaPrescription::Adiabatic), 2.0);

    let after = star.radius_after_mass_loss(Mass::from_solar_masses(1.0));
    assert_relative_eq!(
        after.to_au(),
        star.radius().to_au() * 0.8_f64.powf(2.0),
        max_relative = 1e-12
    );
}

#[test]
fn thermal_timescale_is_kelvin_helmholtz() {
    let sun = AnalyticStar::new(Mass::from_solar_masses(1.0), 0.0142, 8);
    let expected = 31.4 / sun.radius().to_solar_radii();
    assert_relative_eq!(sun.thermal_timescale().to_myr(), expected, max_relative = 1e-12);
    assert!(sun.thermal_mass_loss_rate() > 0.0);
}
