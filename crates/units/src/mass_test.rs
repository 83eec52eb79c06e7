use approx::assert_relative_eq;

use crate::mass::{Mass, SOLAR_MASS_KG};

#[test]
fn test_kg_round_trip() {
    let mass = Mass::from_kg(2.5 * SOLAR_MASS_KG);
    assert_relative_eq!(mass.to_solar_masses(), 2.5);
    assert_relative_eq!(mass.to_kg(), 2.5 * SOLAR_MASS_KG);
}

#[test]
fn test_signed_mass_changes() {
    let mut donor = Mass::from_solar_masses(10.0);
    donor += Mass::from_solar_masses(-2.0);
    assert_relative_eq!(donor.to_solar_masses(), 8.0);

    let lost = -Mass::from_solar_masses(0.5);
    assert!(!lost.is_positive());
    assert_relative_eq!(lost.abs().to_solar_masses(), 0.5);
}

#[test]
fn test_mass_ratio_and_sum() {
    let m1 = Mass::from_solar_masses(10.0);
    let m2 = Mass::from_solar_masses(8.0);
    assert_relative_eq!(m2 / m1, 0.8);

    let total: Mass = [m1, m2].into_iter().sum();
    assert_relative_eq!(total.to_solar_masses(), 18.0);
    assert_relative_eq!((0.5 * total).to_solar_masses(), 9.0);
    assert_eq!(m1.max(m2), m1);
    assert_eq!(m1.min(m2), m2);
}
