//! A scriptable star model for unit tests.

use stellar::{FromZams, StellarError, StellarModel, StellarType, SupernovaKick, ZetaPrescription};
use units::{AngularVelocity, Length, Mass, Temperature, Time};

/// Star whose every attribute is a plain field.
///
/// Ageing only commits the previous values; the structure never changes
/// unless a test changes it or a collapse is scheduled.
#[derive(Debug, Clone)]
pub struct TestStar {
    pub mass: Mass,
    pub mass_prev: Mass,
    pub zams_mass: Mass,
    pub core_mass: Mass,
    pub radius: Length,
    pub radius_prev: Length,
    pub stripped_radius: Length,
    pub luminosity: f64,
    pub temperature: Temperature,
    pub stellar_type: StellarType,
    pub stellar_type_prev: StellarType,
    pub omega: AngularVelocity,
    pub omega_che: AngularVelocity,
    pub gyration_radius: f64,
    pub timestep: Time,
    pub wind_loss: Mass,
    pub zeta_adiabatic: f64,
    pub zeta_equilibrium: f64,
    pub lambda: f64,
    pub kick: Option<SupernovaKick>,
    /// Mass and type the star jumps to on its next ageing step
    pub collapse_to: Option<(Mass, StellarType)>,
    pub pending_collapse_kick: Option<SupernovaKick>,
    /// Radius the star swells to on its next ageing step
    pub swell_to: Option<Length>,
    pub fail_ageing: bool,
}

impl TestStar {
    pub fn main_sequence(mass: f64, radius_rsol: f64) -> Self {
        let mass = Mass::from_solar_masses(mass);
        let radius = Length::from_solar_radii(radius_rsol);
        Self {
            mass,
            mass_prev: mass,
            zams_mass: mass,
            core_mass: Mass::zero(),
            radius,
            radius_prev: radius,
            stripped_radius: Length::from_solar_radii(0.5),
            luminosity: 1.0e3,
            temperature: Temperature::from_kelvin(2.0e4),
            stellar_type: StellarType::MainSequence,
            stellar_type_prev: StellarType::MainSequence,
            omega: AngularVelocity::zero(),
            omega_che: AngularVelocity::from_rad_per_year(f64::INFINITY),
            gyration_radius: 0.1,
            timestep: Time::from_myr(1.0),
            wind_loss: Mass::zero(),
            zeta_adiabatic: 2.0,
            zeta_equilibrium: 0.9,
            lambda: 0.5,
            kick: None,
            collapse_to: None,
            pending_collapse_kick: None,
            swell_to: None,
            fail_ageing: false,
        }
    }

    pub fn giant(mass: f64, core_mass: f64, radius_rsol: f64) -> Self {
        Self {
            core_mass: Mass::from_solar_masses(core_mass),
            stellar_type: StellarType::FirstGiantBranch,
            stellar_type_prev: StellarType::FirstGiantBranch,
            zeta_adiabatic: -1.0 / 3.0,
            zeta_equilibrium: -1.0 / 3.0,
            gyration_radius: 0.2,
            ..Self::main_sequence(mass, radius_rsol)
        }
    }

    pub fn remnant(stellar_type: StellarType, mass: f64) -> Self {
        let radius = match stellar_type {
            t if t.is_white_dwarf() => 0.01,
            _ => 1.4e-5,
        };
        Self {
            core_mass: Mass::from_solar_masses(mass),
            stellar_type,
            stellar_type_prev: stellar_type,
            luminosity: 1.0e-4,
            gyration_radius: 0.4,
            timestep: Time::from_myr(100.0),
            zeta_adiabatic: -1.0 / 3.0,
            zeta_equilibrium: -1.0 / 3.0,
            ..Self::main_sequence(mass, radius)
        }
    }

    pub fn with_kick(mut self, kick: SupernovaKick) -> Self {
        self.kick = Some(kick);
        self
    }

    pub fn with_wind_loss(mut self, wind_loss: f64) -> Self {
        self.wind_loss = Mass::from_solar_masses(wind_loss);
        self
    }

    pub fn with_timestep(mut self, timestep_myr: f64) -> Self {
        self.timestep = Time::from_myr(timestep_myr);
        self
    }

    /// Explode as `stellar_type` of `mass` at the next ageing step, with `kick`
    pub fn collapsing_to(mut self, stellar_type: StellarType, mass: f64, kick: SupernovaKick) -> Self {
        self.collapse_to = Some((Mass::from_solar_masses(mass), stellar_type));
        self.kick = None;
        self.pending_collapse_kick = Some(kick);
        self
    }

    pub fn swelling_to(mut self, radius_rsol: f64) -> Self {
        self.swell_to = Some(Length::from_solar_radii(radius_rsol));
        self
    }
}

impl StellarModel for TestStar {
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
        self.radius
    }

    fn luminosity(&self) -> f64 {
        self.luminosity
    }

    fn temperature(&self) -> Temperature {
        self.temperature
    }

    fn metallicity(&self) -> f64 {
        0.0142
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

    fn omega_che(&self) -> AngularVelocity {
        self.omega_che
    }

    fn gyration_radius(&self) -> f64 {
        self.gyration_radius
    }

    fn timestep(&self) -> Time {
        self.timestep
    }

    fn age_one_timestep(&mut self, dt: Time) -> Result<(), StellarError> {
        if self.fail_ageing {
            return Err(StellarError::Evolution("scripted failure".to_string()));
        }
        if dt.to_years() <= 0.0 {
            return Err(StellarError::InvalidTimestep(dt.to_years()));
        }
        self.mass_prev = self.mass;
        self.radius_prev = self.radius;
        self.stellar_type_prev = self.stellar_type;
        if let Some((mass, stellar_type)) = self.collapse_to.take() {
            self.mass = mass;
            self.core_mass = mass;
            self.radius = Length::from_km(10.0);
            self.stellar_type = stellar_type;
            self.kick = self.pending_collapse_kick.take();
        }
        if let Some(radius) = self.swell_to.take() {
            self.radius = radius;
        }
        Ok(())
    }

    fn mass_after_winds(&self) -> Mass {
        (self.mass - self.wind_loss).max(self.core_mass)
    }

    fn update_mass(&mut self, delta: Mass) -> StellarType {
        self.mass += delta;
        if !self.mass.is_positive() {
            self.mass = Mass::zero();
            self.core_mass = Mass::zero();
            self.radius = Length::zero();
            self.stellar_type = StellarType::MasslessRemnant;
        } else if self.core_mass.is_positive() && self.mass <= self.core_mass {
            return self.strip_envelope();
        }
        self.stellar_type
    }

    fn strip_envelope(&mut self) -> StellarType {
        if !self.core_mass.is_positive() || self.stellar_type.is_compact_object() {
            return self.stellar_type;
        }
        self.mass = self.core_mass;
        self.radius = self.stripped_radius;
        self.stellar_type = StellarType::NakedHeliumStarMainSequence;
        self.zeta_adiabatic = 2.0;
        self.stellar_type
    }

    fn zeta(&self, prescription: ZetaPrescription) -> f64 {
        match prescription {
            ZetaPrescription::Adiabatic => self.zeta_adiabatic,
            ZetaPrescription::Equilibrium => self.zeta_equilibrium,
        }
    }

    fn common_envelope_lambda(&self) -> f64 {
        self.lambda
    }

    fn supernova_kick(&self) -> Option<SupernovaKick> {
        self.kick
    }

    fn clear_supernova(&mut self) {
        self.kick = None;
    }
}

/// Main-sequence star with `R = M^0.8` in solar units
impl FromZams for TestStar {
    fn from_zams(mass: Mass, _metallicity: f64, _seed: u64) -> Self {
        let mass = mass.to_solar_masses();
        Self::main_sequence(mass, mass.powf(0.8))
    }
}
