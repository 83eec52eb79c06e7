use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::sampling::{
    InitialMassFunction, sample_gaussian, sample_initial_mass, sample_power_law, sample_uniform,
};

#[test]
fn sample_gaussian_produces_reasonable_values() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    let samples: Vec<f64> = (0..1000)
        .map(|_| sample_gaussian(&mut rng, 5.0, 1.0))
        .collect();
    let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
    assert!(
        (mean - 5.0).abs() < 0.2,
        "Mean {} should be close to 5.0",
        mean
    );

    let variance: f64 =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    let std_dev = variance.sqrt();
    assert!(
        (std_dev - 1.0).abs() < 0.2,
        "Std dev {} should be close to 1.0",
        std_dev
    );
}

#[test]
fn sample_power_law_respects_bounds() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    for power in [-2.35, -1.0, 0.0, 1.0] {
        for _ in 0..200 {
            let sample = sample_power_law(power, 0.5, 10.0, &mut rng);
            assert!(
                (0.5..=10.0).contains(&sample),
                "Sample {} outside bounds for power {}",
                sample,
                power
            );
        }
    }
}

#[test]
fn flat_in_log_has_log_uniform_median() {
    let mut rng = ChaChaRng::seed_from_u64(7);

    let mut samples: Vec<f64> = (0..2000)
        .map(|_| sample_power_law(-1.0, 1.0, 100.0, &mut rng))
        .collect();
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = samples[1000];

    // Geometric midpoint of [1, 100]
    assert!(
        (median - 10.0).abs() < 2.0,
        "Median {} should be near 10",
        median
    );
}

#[test]
fn sample_uniform_covers_range() {
    let mut rng = ChaChaRng::seed_from_u64(3);
    let samples: Vec<f64> = (0..1000).map(|_| sample_uniform(2.0, 4.0, &mut rng)).collect();
    assert!(samples.iter().all(|s| (2.0..4.0).contains(s)));
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    assert!((mean - 3.0).abs() < 0.1, "Mean {} should be near 3", mean);
}

#[test]
fn kroupa_masses_stay_in_range_and_favor_low_mass() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    let samples: Vec<f64> = (0..2000)
        .map(|_| sample_initial_mass(InitialMassFunction::Kroupa, 0.0, 5.0, 150.0, &mut rng))
        .collect();
    assert!(samples.iter().all(|m| (5.0..=150.0).contains(m)));

    let below_twenty = samples.iter().filter(|&&m| m < 20.0).count();
    assert!(
        below_twenty > samples.len() / 2,
        "Most masses should be below 20 M☉, got {} of {}",
        below_twenty,
        samples.len()
    );
}

#[test]
fn kroupa_spans_multiple_segments() {
    let mut rng = ChaChaRng::seed_from_u64(11);

    let samples: Vec<f64> = (0..2000)
        .map(|_| sample_initial_mass(InitialMassFunction::Kroupa, 0.0, 0.1, 10.0, &mut rng))
        .collect();
    assert!(samples.iter().any(|&m| m < 0.5));
    assert!(samples.iter().any(|&m| m > 0.5));
}

#[test]
fn salpeter_and_power_law_agree_for_same_slope() {
    let mut rng_a = ChaChaRng::seed_from_u64(5);
    let mut rng_b = ChaChaRng::seed_from_u64(5);

    let salpeter = sample_initial_mass(InitialMassFunction::Salpeter, 0.0, 1.0, 100.0, &mut rng_a);
    let power_law = sample_initial_mass(
        InitialMassFunction::PowerLaw,
        -2.35,
        1.0,
        100.0,
        &mut rng_b,
    );
    assert_eq!(salpeter, power_law);
}

#[test]
fn unknown_mass_function_falls_back_to_kroupa() {
    assert_eq!(
        InitialMassFunction::from("top_heavy".to_string()),
        InitialMassFunction::Kroupa
    );
    assert_eq!(
        InitialMassFunction::from("Salpeter".to_string()),
        InitialMassFunction::Salpeter
    );
}
