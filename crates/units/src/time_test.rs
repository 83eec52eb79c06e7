use approx::assert_relative_eq;

use crate::time::{SECONDS_PER_YEAR, Time};

#[test]
fn test_myr_conversion() {
    let step = Time::from_myr(2.5);
    assert_relative_eq!(step.to_years(), 2.5e6);
    assert_relative_eq!(step.to_myr(), 2.5);
}

#[test]
fn test_seconds_and_days() {
    let year = Time::from_seconds(SECONDS_PER_YEAR);
    assert_relative_eq!(year.to_years(), 1.0);
    assert_relative_eq!(year.to_days(), 365.25);
    assert_relative_eq!(Time::from_days(365.25).to_seconds(), SECONDS_PER_YEAR);
}

#[test]
fn test_time_accumulates() {
    let mut time = Time::zero();
    for _ in 0..4 {
        time += Time::from_myr(0.25);
    }
    assert_relative_eq!(time.to_myr(), 1.0);
    assert_eq!(Time::from_years(3.0).min(Time::from_years(2.0)), Time::from_years(2.0));
    assert_relative_eq!(Time::from_years(6.0) / Time::from_years(3.0), 2.0);
}
