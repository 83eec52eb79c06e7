//! Run configuration.
//!
//! Every section carries `#[serde(default)]`, so a partial TOML document
//! overrides only what it names. Enumerated prescriptions deserialize from
//! strings; unknown values are logged and replaced by the documented
//! default.

use serde::{Deserialize, Serialize};
use stellar::{InitialMassFunction, StellarType, ZetaPrescription};
use tracing::warn;
use units::{Length, Time};

use crate::birth::distributions::{
    EccentricityDistribution, MassRatioDistribution, SeparationBounds, SeparationDistribution,
};
use crate::birth::importance::{GaussianProposal, ParameterSpace};
use crate::error::ConfigError;
use crate::roche::AngularMomentumLoss;

/// Top-level configuration shared read-only by every system of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    pub evolution: EvolutionConfig,
    pub mass_transfer: MassTransferConfig,
    pub winds: WindConfig,
    pub common_envelope: CommonEnvelopeConfig,
    pub supernova: SupernovaConfig,
    pub birth: BirthConfig,
}

impl BinaryConfig {
    /// Parse a TOML document and check the numeric ranges
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mass_transfer = &self.mass_transfer;
        if !(0.0..=1.0).contains(&mass_transfer.fraction_accreted) {
            return Err(ConfigError::Invalid(format!(
                "mass_transfer.fraction_accreted must lie in [0, 1], got {}",
                mass_transfer.fraction_accreted
            )));
        }
        if mass_transfer.max_fraction_per_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mass_transfer.max_fraction_per_step must be positive, got {}",
                mass_transfer.max_fraction_per_step
            )));
        }
        if self.common_envelope.alpha <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "common_envelope.alpha must be positive, got {}",
                self.common_envelope.alpha
            )));
        }
        if let Some((low, high)) = self.common_envelope.alpha_range {
            if low <= 0.0 || high < low {
                return Err(ConfigError::Invalid(format!(
                    "common_envelope.alpha_range must satisfy 0 < low <= high, got ({low}, {high})"
                )));
            }
        }
        if self.evolution.minimum_timestep_myr <= 0.0 {
            return Err(ConfigError::Invalid(
                "evolution.minimum_timestep_myr must be positive".to_string(),
            ));
        }
        let birth = &self.birth;
        if birth.min_primary_mass <= 0.0 || birth.max_primary_mass < birth.min_primary_mass {
            return Err(ConfigError::Invalid(format!(
                "birth primary mass range ({}, {}) is empty",
                birth.min_primary_mass, birth.max_primary_mass
            )));
        }
        if birth.min_separation_au <= 0.0 || birth.max_separation_au < birth.min_separation_au {
            return Err(ConfigError::Invalid(format!(
                "birth separation range ({}, {}) AU is empty",
                birth.min_separation_au, birth.max_separation_au
            )));
        }
        Ok(())
    }
}

/// Chemically homogeneous evolution policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CheOption {
    #[default]
    None,
    Optimistic,
    Pessimistic,
}

impl CheOption {
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}

impl From<String> for CheOption {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "optimistic" => Self::Optimistic,
            "pessimistic" => Self::Pessimistic,
            other => {
                warn!(value = other, "unknown chemically homogeneous option, disabling");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Stop with `TimesUp` past this age, in Myr
    pub max_evolution_time_myr: f64,
    pub max_steps: usize,
    pub evolve_unbound_systems: bool,
    /// Floor for the timestep once a body is massless or the natural step underflows
    pub minimum_timestep_myr: f64,
    pub chemically_homogeneous: CheOption,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_evolution_time_myr: 13_700.0,
            max_steps: 99_999,
            evolve_unbound_systems: false,
            minimum_timestep_myr: 1.0e-6,
            chemically_homogeneous: CheOption::None,
        }
    }
}

impl EvolutionConfig {
    pub fn max_evolution_time(&self) -> Time {
        Time::from_myr(self.max_evolution_time_myr)
    }

    pub fn minimum_timestep(&self) -> Time {
        Time::from_myr(self.minimum_timestep_myr)
    }
}

/// How much transferred mass the accretor keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MassAcceptance {
    /// Configured fraction
    Fixed,
    /// Limited by the ratio of thermal rates
    #[default]
    Thermal,
}

impl From<String> for MassAcceptance {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "fixed" => Self::Fixed,
            "thermal" => Self::Thermal,
            other => {
                warn!(value = other, "unknown mass acceptance prescription, using thermal");
                Self::default()
            }
        }
    }
}

/// Which thermal rate limits a thermally accreting companion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AccretorThermalRate {
    /// The accretor's own thermal mass-loss rate, scaled by a constant factor
    #[default]
    CFactor,
    /// Envelope over the thermal timescale evaluated at the Roche-lobe radius
    RadiusToRocheLobe,
}

impl From<String> for AccretorThermalRate {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "c_factor" | "cfactor" => Self::CFactor,
            "radius_to_roche_lobe" | "radius_to_rochelobe" => Self::RadiusToRocheLobe,
            other => {
                warn!(value = other, "unknown thermal limit variation, using c factor");
                Self::default()
            }
        }
    }
}

/// Stability policy for stripped, shell-burning helium donors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CaseBbStability {
    #[default]
    AlwaysStable,
    AlwaysStableOntoNsbh,
    AlwaysUnstable,
    ZetaBased,
}

impl From<String> for CaseBbStability {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "always_stable" => Self::AlwaysStable,
            "always_stable_onto_nsbh" => Self::AlwaysStableOntoNsbh,
            "always_unstable" => Self::AlwaysUnstable,
            "zeta_based" => Self::ZetaBased,
            other => {
                warn!(value = other, "unknown case BB stability prescription, using always stable");
                Self::default()
            }
        }
    }
}

/// Critical mass ratio for one donor stage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageThreshold {
    pub non_degenerate_accretor: Option<f64>,
    pub degenerate_accretor: Option<f64>,
}

impl StageThreshold {
    fn for_accretor(&self, degenerate: bool) -> Option<f64> {
        if degenerate {
            self.degenerate_accretor
        } else {
            self.non_degenerate_accretor
        }
    }

    fn is_set(&self) -> bool {
        self.non_degenerate_accretor.is_some() || self.degenerate_accretor.is_some()
    }
}

/// Donor/accretor mass ratios above which transfer is unstable, per donor stage.
/// Unset thresholds leave the stage to the zeta comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalMassRatios {
    pub main_sequence: StageThreshold,
    pub hertzsprung_gap: StageThreshold,
    pub giant_branch: StageThreshold,
    pub helium_main_sequence: StageThreshold,
    pub helium_hertzsprung_gap: StageThreshold,
    pub helium_giant_branch: StageThreshold,
    pub white_dwarf: StageThreshold,
}

impl CriticalMassRatios {
    pub fn any_enabled(&self) -> bool {
        [
            self.main_sequence,
            self.hertzsprung_gap,
            self.giant_branch,
            self.helium_main_sequence,
            self.helium_hertzsprung_gap,
            self.helium_giant_branch,
            self.white_dwarf,
        ]
        .iter()
        .any(StageThreshold::is_set)
    }

    /// Threshold for a donor of type `donor` onto an accretor of the given degeneracy
    pub fn threshold(&self, donor: StellarType, degenerate_accretor: bool) -> Option<f64> {
        let stage = if donor == StellarType::NakedHeliumStarMainSequence {
            &self.helium_main_sequence
        } else if donor == StellarType::NakedHeliumStarHertzsprungGap {
            &self.helium_hertzsprung_gap
        } else if donor == StellarType::NakedHeliumStarGiantBranch {
            &self.helium_giant_branch
        } else if donor.is_main_sequence() {
            &self.main_sequence
        } else if donor == StellarType::HertzsprungGap {
            &self.hertzsprung_gap
        } else if donor.is_giant() {
            &self.giant_branch
        } else if donor.is_white_dwarf() {
            &self.white_dwarf
        } else {
            return None;
        };
        stage.for_accretor(degenerate_accretor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassTransferConfig {
    pub enabled: bool,
    pub angular_momentum_loss: AngularMomentumLoss,
    /// Gamma used by [`AngularMomentumLoss::Arbitrary`]
    pub arbitrary_gamma: f64,
    pub acceptance: MassAcceptance,
    /// Accreted fraction under [`MassAcceptance::Fixed`]
    pub fraction_accreted: f64,
    pub thermal_limit_factor: f64,
    pub thermal_rate: AccretorThermalRate,
    pub zeta_prescription: ZetaPrescription,
    pub case_bb_stability: CaseBbStability,
    pub critical_mass_ratios: CriticalMassRatios,
    /// Circularise the orbit when transfer starts
    pub circularise: bool,
    /// Circularise at constant angular momentum instead of at periastron
    pub circularise_conserving_angular_momentum: bool,
    /// Largest donor mass fraction moved per orbit-integration sub-step
    pub max_fraction_per_step: f64,
}

impl Default for MassTransferConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            angular_momentum_loss: AngularMomentumLoss::IsotropicReEmission,
            arbitrary_gamma: 1.0,
            acceptance: MassAcceptance::Thermal,
            fraction_accreted: 1.0,
            thermal_limit_factor: 10.0,
            thermal_rate: AccretorThermalRate::CFactor,
            zeta_prescription: ZetaPrescription::Adiabatic,
            case_bb_stability: CaseBbStability::AlwaysStable,
            critical_mass_ratios: CriticalMassRatios::default(),
            circularise: false,
            circularise_conserving_angular_momentum: false,
            max_fraction_per_step: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub enabled: bool,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonEnvelopeConfig {
    /// Ejection efficiency
    pub alpha: f64,
    /// Sample alpha uniformly in this range at birth instead of using `alpha`
    pub alpha_range: Option<(f64, f64)>,
    /// Main-sequence bodies keep their full mass instead of merging
    pub allow_main_sequence_survival: bool,
}

impl Default for CommonEnvelopeConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_range: None,
            allow_main_sequence_survival: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupernovaConfig {
    /// Still resolve a later explosion in a system a previous one disrupted.
    /// Only the exploding body's velocity changes in that case.
    pub resolve_late_supernova_when_unbound: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthConfig {
    pub initial_mass_function: InitialMassFunction,
    /// Slope for [`InitialMassFunction::PowerLaw`]
    pub initial_mass_power: f64,
    pub min_primary_mass: f64,
    pub max_primary_mass: f64,
    pub mass_ratio: MassRatioDistribution,
    pub min_mass_ratio: f64,
    pub max_mass_ratio: f64,
    pub min_secondary_mass: f64,
    pub separation: SeparationDistribution,
    pub min_separation_au: f64,
    pub max_separation_au: f64,
    pub min_period_days: f64,
    pub max_period_days: f64,
    pub separation_power: f64,
    pub eccentricity: EccentricityDistribution,
    pub min_eccentricity: f64,
    pub max_eccentricity: f64,
    pub metallicity: f64,
    pub allow_rlof_at_birth: bool,
    pub allow_touching_at_birth: bool,
    pub max_attempts: usize,
    pub importance_sampling: Option<GaussianProposal>,
}

impl Default for BirthConfig {
    fn default() -> Self {
        Self {
            initial_mass_function: InitialMassFunction::Kroupa,
            initial_mass_power: -2.35,
            min_primary_mass: 5.0,
            max_primary_mass: 150.0,
            mass_ratio: MassRatioDistribution::Flat,
            min_mass_ratio: 0.0,
            max_mass_ratio: 1.0,
            min_secondary_mass: 0.1,
            separation: SeparationDistribution::FlatInLog,
            min_separation_au: 0.1,
            max_separation_au: 1000.0,
            min_period_days: 10f64.powf(0.15),
            max_period_days: 10f64.powf(5.5),
            separation_power: -1.0,
            eccentricity: EccentricityDistribution::Zero,
            min_eccentricity: 0.0,
            max_eccentricity: 1.0,
            metallicity: 0.0142,
            allow_rlof_at_birth: false,
            allow_touching_at_birth: false,
            max_attempts: 10_000,
            importance_sampling: None,
        }
    }
}

impl BirthConfig {
    pub fn separation_bounds(&self) -> SeparationBounds {
        SeparationBounds {
            min_separation: Length::from_au(self.min_separation_au),
            max_separation: Length::from_au(self.max_separation_au),
            min_period: Time::from_days(self.min_period_days),
            max_period: Time::from_days(self.max_period_days),
            power: self.separation_power,
        }
    }

    pub fn parameter_space(&self) -> ParameterSpace {
        ParameterSpace {
            primary_mass: (self.min_primary_mass, self.max_primary_mass),
            mass_ratio: (self.min_mass_ratio, self.max_mass_ratio),
            separation: (self.min_separation_au, self.max_separation_au),
        }
    }
}
