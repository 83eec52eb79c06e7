//! Anomalies of a Keplerian orbit.

use std::f64::consts::TAU;

const TOLERANCE: f64 = 1.0e-12;
const MAX_ITERATIONS: usize = 50;

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration.
///
/// # Arguments
/// * `mean_anomaly` - Mean anomaly in radians
/// * `eccentricity` - Orbital eccentricity in [0, 1)
pub fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mean_anomaly = mean_anomaly.rem_euclid(TAU);
    let mut anomaly = if eccentricity > 0.8 {
        std::f64::consts::PI
    } else {
        mean_anomaly
    };

    for _ in 0..MAX_ITERATIONS {
        let residual = anomaly - eccentricity * anomaly.sin() - mean_anomaly;
        let step = residual / (1.0 - eccentricity * anomaly.cos());
        anomaly -= step;
        if step.abs() < TOLERANCE {
            break;
        }
    }
    anomaly
}

/// True anomaly from the eccentric anomaly
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * eccentric_anomaly;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circular_orbit_anomalies_coincide() {
        assert_relative_eq!(eccentric_anomaly(1.3, 0.0), 1.3);
        assert_relative_eq!(true_anomaly(1.3, 0.0), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn solution_satisfies_keplers_equation() {
        for &(mean_anomaly, e) in &[(0.3, 0.1), (2.5, 0.6), (5.9, 0.95)] {
            let anomaly = eccentric_anomaly(mean_anomaly, e);
            assert_relative_eq!(anomaly - e * anomaly.sin(), mean_anomaly, epsilon = 1e-10);
        }
    }

    #[test]
    fn periastron_and_apastron() {
        assert_relative_eq!(true_anomaly(eccentric_anomaly(0.0, 0.5), 0.5), 0.0);
        assert_relative_eq!(
            true_anomaly(eccentric_anomaly(std::f64::consts::PI, 0.5), 0.5).abs(),
            std::f64::consts::PI,
            epsilon = 1e-10
        );
    }
}
