//! A minimal analytic single-star model.
//!
//! Main-sequence luminosity and temperature follow piecewise mass relations,
//! radii come from Stefan-Boltzmann, and post-main-sequence expansion is a
//! linear ramp toward a giant radius. Remnants are chosen by zero-age mass.
//! The model carries enough structure (core mass, stage changes, winds,
//! natal kicks) to drive the binary resolvers end to end; it is not a
//! replacement for detailed stellar tracks.

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use units::constants::{G_AU_MSOL_YR, G_SI, SPEED_OF_LIGHT_SI};
use units::temperature::SOLAR_TEMPERATURE_K;
use units::{AngularVelocity, Length, Mass, Temperature, Time, Velocity};

use crate::model::{FromZams, StellarError, StellarModel, SupernovaKick, ZetaPrescription};
use crate::sampling::sample_gaussian;
use crate::stellar_type::StellarType;

/// Post-main-sequence lifetime as a fraction of the main-sequence lifetime
const GIANT_PHASE_FRACTION: f64 = 0.1;
/// Fraction of the giant phase spent crossing the Hertzsprung gap
const HERTZSPRUNG_GAP_FRACTION: f64 = 0.1;
const STEPS_PER_PHASE: f64 = 100.0;

const SUPERNOVA_MASS_THRESHOLD: f64 = 8.0;
const BLACK_HOLE_MASS_THRESHOLD: f64 = 20.0;
const NEUTRON_STAR_MASS: f64 = 1.4;
const NEUTRON_STAR_RADIUS_KM: f64 = 10.0;
const CHANDRASEKHAR_MASS: f64 = 1.38;

/// One-dimensional Maxwellian dispersion for neutron-star kicks (Hobbs et al. 2005)
const DEFAULT_KICK_DISPERSION_KM_S: f64 = 265.0;
/// Reimers (1975) coefficient, M☉/yr for L, R, M in solar units
const REIMERS_COEFFICIENT: f64 = 4.0e-13;
const COMMON_ENVELOPE_LAMBDA: f64 = 0.5;

/// Main-sequence lifetime from piecewise mass relations.
///
/// # Arguments
/// * `mass` - Zero-age mass in solar masses
///
/// # Returns
/// Main-sequence lifetime in Myr
pub fn main_sequence_lifetime(mass: f64) -> f64 {
    match mass {
        m if m > 10.0 => 1.0e4 * 10.0_f64.powf(-2.5) * (m / 10.0).powf(-1.0),
        m if m > 0.5 => 1.0e4 * m.powf(-2.5),
        m => 1.0e4 * 0.5_f64.powf(-2.5) * (m / 0.5).powf(-2.0),
    }
}

/// Main-sequence luminosity (L☉) and effective temperature (K).
pub fn main_sequence_properties(mass: f64) -> (f64, f64) {
    match mass {
        m if m > 30.0 => (3.0e4 * (m / 30.0).powf(3.5), 38000.0 * (m / 30.0).powf(0.2)),
        m if m > 8.0 => (1.0e3 * (m / 8.0).powf(3.5), 22000.0 * (m / 8.0).powf(0.2)),
        m if m > 2.0 => (25.0 * (m / 2.0).powf(3.5), 9000.0 * (m / 2.0).powf(0.2)),
        m if m > 0.8 => (m.powf(4.0), 5800.0 * m.powf(0.1)),
        m => {
            let temperature = if m < 0.45 {
                2500.0 * (m / 0.08).powf(0.23)
            } else {
                3700.0 * (m / 0.45).powf(0.45)
            };
            (m.powf(2.3), temperature)
        }
    }
}

/// Stefan-Boltzmann radius in R☉ from L☉ and K
fn radius_from_luminosity(luminosity: f64, temperature: f64) -> f64 {
    luminosity.sqrt() / (temperature / SOLAR_TEMPERATURE_K).powi(2)
}

/// Stefan-Boltzmann temperature in K from L☉ and R☉
fn temperature_from_radius(luminosity: f64, radius: f64) -> f64 {
    SOLAR_TEMPERATURE_K * (luminosity.sqrt() / radius).sqrt()
}

/// Analytic star: main sequence, a single giant phase, then a remnant.
#[derive(Debug, Clone)]
pub struct AnalyticStar {
    zams_mass: Mass,
    metallicity: f64,
    mass: Mass,
    mass_prev: Mass,
    core_mass: Mass,
    radius: Length,
    radius_prev: Length,
    zams_radius: Length,
    terminal_age_radius: Length,
    luminosity: f64,
    terminal_age_luminosity: f64,
    temperature: Temperature,
    stellar_type: StellarType,
    stellar_type_prev: StellarType,
    age: Time,
    dt: Time,
    main_sequence_lifetime: Time,
    omega: AngularVelocity,
    kick_dispersion: Velocity,
    pending_kick: Option<SupernovaKick>,
    rng: ChaChaRng,
}

impl AnalyticStar {
    /// Builds a star on the zero-age main sequence.
    ///
    /// # Arguments
    /// * `mass` - Zero-age mass
    /// * `metallicity` - Metal mass fraction Z
    /// * `seed` - Seed for the star's own draws (natal kicks)
    pub fn new(mass: Mass, metallicity: f64, seed: u64) -> Self {
        let m = mass.to_solar_masses();
        let (luminosity, temperature) = main_sequence_properties(m);
        let radius = Length::from_solar_radii(radius_from_luminosity(luminosity, temperature));
        let stellar_type = StellarType::main_sequence_for_mass(m);

        Self {
            zams_mass: mass,
            metallicity,
            mass,
            mass_prev: mass,
            core_mass: Mass::zero(),
            radius,
            radius_prev: radius,
            zams_radius: radius,
            terminal_age_radius: radius * 1.6,
            luminosity,
            terminal_age_luminosity: luminosity,
            temperature: Temperature::from_kelvin(temperature),
            stellar_type,
            stellar_type_prev: stellar_type,
            age: Time::zero(),
            dt: Time::zero(),
            main_sequence_lifetime: Time::from_myr(main_sequence_lifetime(m)),
            omega: AngularVelocity::zero(),
            kick_dispersion: Velocity::from_km_per_sec(DEFAULT_KICK_DISPERSION_KM_S),
            pending_kick: None,
            rng: ChaChaRng::seed_from_u64(seed),
        }
    }

    /// Sets the Maxwellian dispersion used for natal kicks
    pub fn with_kick_dispersion(mut self, dispersion: Velocity) -> Self {
        self.kick_dispersion = dispersion;
        self
    }

    pub fn age(&self) -> Time {
        self.age
    }

    fn giant_phase_duration(&self) -> Time {
        self.main_sequence_lifetime * GIANT_PHASE_FRACTION
    }

    /// Fraction of the giant phase elapsed, 0 on the main sequence
    fn giant_phase_fraction(&self) -> f64 {
        let elapsed = self.age - self.main_sequence_lifetime;
        (elapsed / self.giant_phase_duration()).clamp(0.0, 1.0)
    }

    fn evolve_structure(&mut self) {
        if self.stellar_type.is_compact_object() {
            return;
        }

        if self.age < self.main_sequence_lifetime {
            self.evolve_main_sequence();
        } else if self.age < self.main_sequence_lifetime + self.giant_phase_duration() {
            if self.stellar_type.is_naked_helium_star()
                || self.stellar_type == StellarType::ChemicallyHomogeneous
            {
                self.evolve_helium_star();
            } else {
                self.evolve_giant();
            }
        } else {
            self.form_remnant();
        }
    }

    fn evolve_main_sequence(&mut self) {
        let tau = self.age / self.main_sequence_lifetime;
        let (luminosity, temperature) = main_sequence_properties(self.mass.to_solar_masses());
        let zams_radius = radius_from_luminosity(luminosity, temperature);

        // Fully mixed stars stay compact
        let expansion = if self.stellar_type == StellarType::ChemicallyHomogeneous {
            1.0
        } else {
            1.0 + 0.6 * tau
        };
        self.luminosity = luminosity * (1.0 + tau);
        self.radius = Length::from_solar_radii(zams_radius * expansion);
        self.temperature = Temperature::from_kelvin(temperature_from_radius(
            self.luminosity,
            self.radius.to_solar_radii(),
        ));
        self.terminal_age_radius = Length::from_solar_radii(zams_radius * 1.6);
        self.terminal_age_luminosity = 2.0 * luminosity;
    }

    fn evolve_giant(&mut self) {
        let fraction = self.giant_phase_fraction();
        let zams = self.zams_mass.to_solar_masses();

        self.stellar_type = if fraction < HERTZSPRUNG_GAP_FRACTION {
            StellarType::HertzsprungGap
        } else if zams < 2.0 {
            StellarType::FirstGiantBranch
        } else {
            StellarType::CoreHeliumBurning
        };

        let core = (0.10 + 0.20 * fraction) * zams;
        self.core_mass = Mass::from_solar_masses(core).min(self.mass).max(self.core_mass);

        let giant_radius = Length::from_solar_radii(150.0 * zams.sqrt());
        self.radius =
            self.terminal_age_radius + (giant_radius - self.terminal_age_radius) * fraction;
        self.luminosity = self.terminal_age_luminosity * (1.0 + 9.0 * fraction);
        self.temperature = Temperature::from_kelvin(temperature_from_radius(
            self.luminosity,
            self.radius.to_solar_radii(),
        ));
    }

    fn evolve_helium_star(&mut self) {
        let fraction = self.giant_phase_fraction();
        let mass = self.mass.to_solar_masses();

        self.stellar_type = if fraction < 0.5 {
            StellarType::NakedHeliumStarMainSequence
        } else if fraction < 0.8 {
            StellarType::NakedHeliumStarHertzsprungGap
        } else {
            StellarType::NakedHeliumStarGiantBranch
        };
        self.core_mass = self.mass;

        let expansion = 1.0 + 18.0 * (fraction - 0.5).max(0.0);
        self.radius = Length::from_solar_radii(0.2 * mass.powf(0.6) * expansion);
        self.luminosity = 1.0e3 * mass.powf(2.5);
        self.temperature = Temperature::from_kelvin(temperature_from_radius(
            self.luminosity,
            self.radius.to_solar_radii(),
        ));
    }

    fn form_remnant(&mut self) {
        let zams = self.zams_mass.to_solar_masses();
        let core = if self.core_mass.is_positive() {
            self.core_mass
        } else {
            self.mass
        };

        if zams < SUPERNOVA_MASS_THRESHOLD {
            let mass = core.min(Mass::from_solar_masses(CHANDRASEKHAR_MASS));
            self.stellar_type = match mass.to_solar_masses() {
                m if m < 0.45 => StellarType::HeliumWhiteDwarf,
                m if m < 1.1 => StellarType::CarbonOxygenWhiteDwarf,
                _ => StellarType::OxygenNeonWhiteDwarf,
            };
            self.set_remnant(mass, Length::from_solar_radii(0.0115 * mass.powf(-1.0 / 3.0)));
            self.luminosity = 1.0e-3;
        } else {
            let (stellar_type, mass) = if zams < BLACK_HOLE_MASS_THRESHOLD {
                (
                    StellarType::NeutronStar,
                    Mass::from_solar_masses(NEUTRON_STAR_MASS).min(self.mass),
                )
            } else {
                (StellarType::BlackHole, core)
            };
            let radius = match stellar_type {
                StellarType::NeutronStar => Length::from_km(NEUTRON_STAR_RADIUS_KM),
                _ => Length::from_meters(
                    2.0 * G_SI * mass.to_kg() / (SPEED_OF_LIGHT_SI * SPEED_OF_LIGHT_SI),
                ),
            };
            self.stellar_type = stellar_type;
            self.set_remnant(mass, radius);
            self.luminosity = 1.0e-4;
            self.pending_kick = Some(self.draw_natal_kick());
        }
        self.temperature = Temperature::from_kelvin(1.0e4);
    }

    fn set_remnant(&mut self, mass: Mass, radius: Length) {
        self.mass = mass;
        self.core_mass = mass;
        self.radius = radius;
    }

    /// Maxwellian magnitude, isotropic direction, uniform mean anomaly.
    /// Black-hole kicks are reduced by momentum conservation.
    fn draw_natal_kick(&mut self) -> SupernovaKick {
        let sigma = self.kick_dispersion.to_km_per_sec();
        let magnitude = (0..3)
            .map(|_| sample_gaussian(&mut self.rng, 0.0, sigma).powi(2))
            .sum::<f64>()
            .sqrt();
        let magnitude = if self.stellar_type == StellarType::BlackHole {
            magnitude * NEUTRON_STAR_MASS / self.mass.to_solar_masses()
        } else {
            magnitude
        };

        let cos_polar: f64 = 1.0 - 2.0 * self.rng.random::<f64>();
        SupernovaKick {
            magnitude: Velocity::from_km_per_sec(magnitude),
            theta: cos_polar.acos() - PI / 2.0,
            phi: TAU * self.rng.random::<f64>(),
            mean_anomaly: TAU * self.rng.random::<f64>(),
        }
    }
}

impl FromZams for AnalyticStar {
    fn from_zams(mass: Mass, metallicity: f64, seed: u64) -> Self {
        Self::new(mass, metallicity, seed)
    }
}

impl StellarModel for AnalyticStar {
    fn mass(&self) -> Mass {
        self.mass
    }

    fn mass_prev(&self) -> Mass {
        self.mass_prev
    }

    fn zams_mass(&self) -> Mass {
        self.zams_mass
    }

    fn core_mass(&self) -> Mass {
        self.core_mass
    }

    fn radius(&self) -> Length {
        self.radius
    }

    fn radius_prev(&self) -> Length {
        self.radius_prev
    }

    fn zams_radius(&self) -> Length {
        self.zams_radius
    }

    fn luminosity(&self) -> f64 {
        self.luminosity
    }

    fn temperature(&self) -> Temperature {
        self.temperature
    }

    fn metallicity(&self) -> f64 {
        self.metallicity
    }

    fn stellar_type(&self) -> StellarType {
        self.stellar_type
    }

    fn stellar_type_prev(&self) -> StellarType {
        self.stellar_type_prev
    }

    fn switch_to(&mut self, stellar_type: StellarType) {
        self.stellar_type = stellar_type;
    }

    fn omega(&self) -> AngularVelocity {
        self.omega
    }

    fn set_omega(&mut self, omega: AngularVelocity) {
        self.omega = omega;
    }

    /// Half the break-up spin
    fn omega_che(&self) -> AngularVelocity {
        let radius = self.radius.to_au();
        let breakup = (G_AU_MSOL_YR * self.mass.to_solar_masses() / radius.powi(3)).sqrt();
        AngularVelocity::from_rad_per_year(0.5 * breakup)
    }

    fn gyration_radius(&self) -> f64 {
        match self.stellar_type {
            t if t.is_giant() => 0.2,
            t if t.is_degenerate() => 0.4,
            _ => 0.1,
        }
    }

    fn timestep(&self) -> Time {
        if self.stellar_type.is_compact_object() {
            Time::from_myr(100.0)
        } else if self.age < self.main_sequence_lifetime {
            self.main_sequence_lifetime / STEPS_PER_PHASE
        } else {
            self.giant_phase_duration() / STEPS_PER_PHASE
        }
    }

    fn age_one_timestep(&mut self, dt: Time) -> Result<(), StellarError> {
        if dt.to_years() <= 0.0 || !dt.to_years().is_finite() {
            return Err(StellarError::InvalidTimestep(dt.to_years()));
        }
        self.mass_prev = self.mass;
        self.radius_prev = self.radius;
        self.stellar_type_prev = self.stellar_type;
        self.dt = dt;
        self.age += dt;
        self.evolve_structure();

        if self.stellar_type != StellarType::MasslessRemnant && !self.mass.is_positive() {
            return Err(StellarError::NonPositiveMass(self.mass.to_solar_masses()));
        }
        Ok(())
    }

    /// Reimers-scaled winds over the last timestep
    fn mass_after_winds(&self) -> Mass {
        if self.stellar_type.is_compact_object() {
            return self.mass;
        }
        let rate = REIMERS_COEFFICIENT * self.luminosity * self.radius.to_solar_radii()
            / self.mass.to_solar_masses();
        let lost = Mass::from_solar_masses(rate * self.dt.to_years());
        (self.mass - lost).max(self.core_mass)
    }

    fn update_mass(&mut self, delta: Mass) -> StellarType {
        self.mass += delta;
        if !self.mass.is_positive() {
            self.mass = Mass::zero();
            self.core_mass = Mass::zero();
            self.radius = Length::zero();
            self.stellar_type = StellarType::MasslessRemnant;
            return self.stellar_type;
        }
        if self.core_mass.is_positive() && self.mass <= self.core_mass {
            return self.strip_envelope();
        }
        self.evolve_structure();
        self.stellar_type
    }

    fn strip_envelope(&mut self) -> StellarType {
        if !self.core_mass.is_positive() || self.stellar_type.is_compact_object() {
            return self.stellar_type;
        }
        self.mass = self.core_mass;
        self.stellar_type = StellarType::NakedHeliumStarMainSequence;
        self.evolve_structure();
        self.stellar_type
    }

    fn zeta(&self, prescription: ZetaPrescription) -> f64 {
        use StellarType::*;
        match (self.stellar_type, prescription) {
            (MainSequenceLowMass, _) => -1.0 / 3.0,
            (MainSequence | ChemicallyHomogeneous, ZetaPrescription::Adiabatic) => 2.0,
            (MainSequence | ChemicallyHomogeneous, ZetaPrescription::Equilibrium) => 0.9,
            (HertzsprungGap, ZetaPrescription::Adiabatic) => 6.5,
            (HertzsprungGap, ZetaPrescription::Equilibrium) => -2.0,
            (NakedHeliumStarMainSequence, _) => 2.0,
            (t, _) if t.is_giant() || t.is_evolved_naked_helium_star() => -1.0 / 3.0,
            (t, _) if t.is_white_dwarf() => -1.0 / 3.0,
            _ => 0.0,
        }
    }

    fn common_envelope_lambda(&self) -> f64 {
        COMMON_ENVELOPE_LAMBDA
    }

    fn supernova_kick(&self) -> Option<SupernovaKick> {
        self.pending_kick
    }

    fn clear_supernova(&mut self) {
        self.pending_kick = None;
    }
}
