//! The capability interface the binary engine consumes from a single-star
//! evolution model.
//!
//! The binary code never implements stellar structure itself. It reads the
//! quantities below, asks the star to age, and pushes mass changes back
//! through the mutators.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use units::{AngularVelocity, Length, Mass, Temperature, Time, Velocity};

use crate::stellar_type::StellarType;

/// Failure raised by a star model while ageing or updating attributes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StellarError {
    #[error("timestep must be positive, got {0} yr")]
    InvalidTimestep(f64),
    #[error("mass became non-positive ({0} M☉) outside a remnant stage")]
    NonPositiveMass(f64),
    #[error("stellar evolution failed: {0}")]
    Evolution(String),
}

/// Which mass-radius exponent a star reports for stability tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ZetaPrescription {
    /// Dynamical response of the envelope
    #[default]
    Adiabatic,
    /// Response once thermal equilibrium is restored
    Equilibrium,
}

impl From<String> for ZetaPrescription {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "adiabatic" => Self::Adiabatic,
            "equilibrium" => Self::Equilibrium,
            other => {
                warn!(value = other, "unknown zeta prescription, using adiabatic");
                Self::default()
            }
        }
    }
}

/// Natal kick drawn for a pending core-collapse event.
///
/// Angles follow the orbital-plane convention: `theta` is measured out of
/// the orbital plane, `phi` in the plane, and `mean_anomaly` places the
/// progenitor on its orbit at the moment of explosion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupernovaKick {
    pub magnitude: Velocity,
    pub theta: f64,
    pub phi: f64,
    pub mean_anomaly: f64,
}

impl SupernovaKick {
    /// A kick with no velocity, exploding at periastron
    pub fn zero() -> Self {
        Self {
            magnitude: Velocity::zero(),
            theta: 0.0,
            phi: 0.0,
            mean_anomaly: 0.0,
        }
    }
}

/// Single-star quantities and operations used by the binary resolvers.
///
/// Masses are in M☉, radii are carried as [`Length`], luminosity in L☉.
/// "Previous" accessors return the value committed at the start of the
/// current timestep.
pub trait StellarModel {
    fn mass(&self) -> Mass;
    fn mass_prev(&self) -> Mass;
    fn zams_mass(&self) -> Mass;
    fn core_mass(&self) -> Mass;

    fn envelope_mass(&self) -> Mass {
        (self.mass() - self.core_mass()).max(Mass::zero())
    }

    fn radius(&self) -> Length;
    fn radius_prev(&self) -> Length;
    fn zams_radius(&self) -> Length;
    fn luminosity(&self) -> f64;
    fn temperature(&self) -> Temperature;
    fn metallicity(&self) -> f64;

    fn stellar_type(&self) -> StellarType;
    fn stellar_type_prev(&self) -> StellarType;

    /// Force a stage change, e.g. to or from chemically homogeneous evolution
    fn switch_to(&mut self, stellar_type: StellarType);

    fn omega(&self) -> AngularVelocity;
    fn set_omega(&mut self, omega: AngularVelocity);

    /// Spin above which the star evolves chemically homogeneously
    fn omega_che(&self) -> AngularVelocity;

    /// Dimensionless radius of gyration, `I = k·M·R²`
    fn gyration_radius(&self) -> f64;

    /// Natural evolutionary timestep for the current stage
    fn timestep(&self) -> Time;

    /// Advance the star by `dt`, committing current values to the previous
    /// slots first.
    fn age_one_timestep(&mut self, dt: Time) -> Result<(), StellarError>;

    /// Mass the star would have after its own winds over the last timestep
    fn mass_after_winds(&self) -> Mass;

    /// Add `delta` (negative for loss) to the mass and re-evaluate attributes.
    ///
    /// # Returns
    /// The stellar type after the update.
    fn update_mass(&mut self, delta: Mass) -> StellarType;

    /// Remove the whole envelope, leaving the core, and switch stage.
    ///
    /// # Returns
    /// The stellar type after stripping.
    fn strip_envelope(&mut self) -> StellarType;

    /// Mass-radius exponent `d ln R / d ln M` under the given response
    fn zeta(&self, prescription: ZetaPrescription) -> f64;

    /// Envelope structure parameter for common-envelope binding energies
    fn common_envelope_lambda(&self) -> f64;

    /// Pending core-collapse event, if any
    fn supernova_kick(&self) -> Option<SupernovaKick>;

    fn clear_supernova(&mut self);

    fn is_supernova_pending(&self) -> bool {
        self.supernova_kick().is_some()
    }

    fn is_degenerate(&self) -> bool {
        self.stellar_type().is_degenerate()
    }

    /// Overflow predicate against a Roche-lobe radius
    fn overflows(&self, roche_lobe: Length) -> bool {
        self.radius() > roche_lobe
    }

    /// Kelvin-Helmholtz timescale with the star's radius replaced by `radius`.
    ///
    /// # Formula
    ///
    /// ```text
    /// τ_KH = 31.4 M (M - Mc) / (R L)  Myr
    /// ```
    ///
    /// with `Mc = 0` on the main sequence.
    ///
    /// # References
    ///
    /// - Hurley, Tout & Pols (2002), MNRAS 329, 897, eq. 61
    fn thermal_timescale_at_radius(&self, radius: Length) -> Time {
        let mass = self.mass().to_solar_masses();
        let envelope = if self.stellar_type().is_any_main_sequence() {
            mass
        } else {
            self.envelope_mass().to_solar_masses()
        };
        let radius_luminosity = radius.to_solar_radii() * self.luminosity();
        if radius_luminosity <= 0.0 {
            return Time::from_years(f64::INFINITY);
        }
        Time::from_myr(31.4 * mass * envelope / radius_luminosity)
    }

    fn thermal_timescale(&self) -> Time {
        self.thermal_timescale_at_radius(self.radius())
    }

    /// Envelope mass shed over one thermal timescale, in M☉/yr
    fn thermal_mass_loss_rate(&self) -> f64 {
        let timescale = self.thermal_timescale().to_years();
        if timescale <= 0.0 {
            return 0.0;
        }
        self.mass().to_solar_masses() / timescale
    }

    /// Radius after losing `mass_lost` on a dynamical timescale
    fn radius_after_mass_loss(&self, mass_lost: Mass) -> Length {
        let ratio = (self.mass() - mass_lost) / self.mass();
        if ratio <= 0.0 {
            return Length::zero();
        }
        self.radius() * ratio.powf(self.zeta(ZetaPrescription::Adiabatic))
    }

    /// Pulsar spin-down and field decay hook, a no-op for most models
    fn update_magnetic_field_and_spin(&mut self, _common_envelope: bool, _dt: Time) {}
}

/// Star models that can be built on the zero-age main sequence.
pub trait FromZams: StellarModel + Sized {
    fn from_zams(mass: Mass, metallicity: f64, seed: u64) -> Self;
}
