//! Initial orbital-element distributions.

use std::f64::consts::PI;

use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use stellar::sampling::{sample_gaussian, sample_power_law, sample_uniform};
use tracing::warn;
use units::constants::G_AU_MSOL_YR;
use units::{Length, Mass, Time};

/// Secondary-to-primary mass ratio distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MassRatioDistribution {
    #[default]
    Flat,
    /// Duquennoy & Mayor (1991) Gaussian in q
    DuquennoyMayor1991,
    /// Sana et al. (2012) power law, slope -0.1
    Sana2012,
}

impl From<String> for MassRatioDistribution {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "flat" => Self::Flat,
            "duquennoy_mayor_1991" | "dm91" => Self::DuquennoyMayor1991,
            "sana_2012" | "sana2012" => Self::Sana2012,
            other => {
                warn!(value = other, "unknown mass ratio distribution, using flat");
                Self::default()
            }
        }
    }
}

/// Semi-major axis distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SeparationDistribution {
    /// Öpik's law, dN/da ∝ 1/a
    #[default]
    FlatInLog,
    /// Log-normal in period, Duquennoy & Mayor (1991)
    DuquennoyMayor1991,
    /// Power law in log period, Sana et al. (2012)
    Sana2012,
    /// Power law in a with the configured slope
    Custom,
}

impl From<String> for SeparationDistribution {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "flat_in_log" | "flatinlog" => Self::FlatInLog,
            "duquennoy_mayor_1991" | "dm91" => Self::DuquennoyMayor1991,
            "sana_2012" | "sana2012" => Self::Sana2012,
            "custom" => Self::Custom,
            other => {
                warn!(value = other, "unknown separation distribution, using flat in log");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EccentricityDistribution {
    #[default]
    Zero,
    Flat,
    /// dN/de ∝ e
    Thermal,
    Geller2013,
    DuquennoyMayor1991,
    Sana2012,
}

impl From<String> for EccentricityDistribution {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "zero" => Self::Zero,
            "flat" => Self::Flat,
            "thermal" => Self::Thermal,
            "geller_2013" | "geller2013" => Self::Geller2013,
            "duquennoy_mayor_1991" | "dm91" => Self::DuquennoyMayor1991,
            "sana_2012" | "sana2012" => Self::Sana2012,
            other => {
                warn!(value = other, "unsupported eccentricity distribution, using zero");
                Self::default()
            }
        }
    }
}

/// Numeric bounds shared by the orbital draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationBounds {
    pub min_separation: Length,
    pub max_separation: Length,
    /// Period limits used by the period-based distributions
    pub min_period: Time,
    pub max_period: Time,
    /// Slope for [`SeparationDistribution::Custom`]
    pub power: f64,
}

/// Kepler's third law, a³ = G·M·P²/(4π²)
pub fn separation_from_period(period: Time, total_mass: Mass) -> Length {
    let p = period.to_years();
    let a3 = G_AU_MSOL_YR * total_mass.to_solar_masses() * p * p / (4.0 * PI * PI);
    Length::from_au(a3.cbrt())
}

/// Draw q = m2/m1 on [q_min, q_max]
pub fn sample_mass_ratio(
    distribution: MassRatioDistribution,
    q_min: f64,
    q_max: f64,
    rng: &mut ChaChaRng,
) -> f64 {
    match distribution {
        MassRatioDistribution::Flat => sample_uniform(q_min, q_max, rng),
        MassRatioDistribution::DuquennoyMayor1991 => loop {
            let q = sample_gaussian(rng, 0.23, 0.42);
            if (q_min..=q_max).contains(&q) {
                break q;
            }
        },
        MassRatioDistribution::Sana2012 => sample_power_law(-0.1, q_min, q_max, rng),
    }
}

/// Draw a semi-major axis for a binary of the given total mass
pub fn sample_separation(
    distribution: SeparationDistribution,
    bounds: &SeparationBounds,
    total_mass: Mass,
    rng: &mut ChaChaRng,
) -> Length {
    let a_min = bounds.min_separation.to_au();
    let a_max = bounds.max_separation.to_au();
    match distribution {
        SeparationDistribution::FlatInLog => Length::from_au(sample_power_law(-1.0, a_min, a_max, rng)),
        SeparationDistribution::Custom => {
            Length::from_au(sample_power_law(bounds.power, a_min, a_max, rng))
        }
        SeparationDistribution::DuquennoyMayor1991 => loop {
            // log10 P in days
            let log_period = sample_gaussian(rng, 4.8, 2.3);
            let separation =
                separation_from_period(Time::from_days(10f64.powf(log_period)), total_mass);
            if (a_min..=a_max).contains(&separation.to_au()) {
                break separation;
            }
        },
        SeparationDistribution::Sana2012 => {
            let ln_min = bounds.min_period.to_days().ln();
            let ln_max = bounds.max_period.to_days().ln();
            let period = sample_power_law(-0.55, ln_min, ln_max, rng).exp();
            separation_from_period(Time::from_days(period), total_mass)
        }
    }
}

/// Draw an eccentricity on [e_min, e_max]
pub fn sample_eccentricity(
    distribution: EccentricityDistribution,
    e_min: f64,
    e_max: f64,
    rng: &mut ChaChaRng,
) -> f64 {
    let truncated_gaussian = |rng: &mut ChaChaRng, mean: f64, std_dev: f64| loop {
        let e = sample_gaussian(rng, mean, std_dev);
        if e >= e_min && e < e_max {
            break e;
        }
    };

    match distribution {
        EccentricityDistribution::Zero => 0.0,
        EccentricityDistribution::Flat => sample_uniform(e_min, e_max, rng),
        EccentricityDistribution::Thermal => sample_power_law(1.0, e_min, e_max, rng),
        EccentricityDistribution::Geller2013 => truncated_gaussian(rng, 0.38, 0.23),
        EccentricityDistribution::DuquennoyMayor1991 => truncated_gaussian(rng, 0.3, 0.15),
        EccentricityDistribution::Sana2012 => sample_power_law(-0.42, e_min, e_max, rng),
    }
}
