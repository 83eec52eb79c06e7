use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Mass of the Sun in kilograms (1.98847 × 10³⁰ kg)
pub const SOLAR_MASS_KG: f64 = 1.98847e30;

/// A stellar mass using f64 precision.
///
/// Solar masses are the base unit. Mass changes from winds, transfer and
/// supernovae are carried as signed `Mass` values, so negative quantities
/// are allowed and represent mass lost.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let donor = Mass::from_solar_masses(10.0);
/// let lost = Mass::from_solar_masses(-2.0);
/// assert_eq!((donor + lost).to_solar_masses(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: Solar Masses

impl Mass {
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in solar masses.
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in kilograms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::{Mass, mass::SOLAR_MASS_KG};
    ///
    /// let sun = Mass::from_kg(SOLAR_MASS_KG);
    /// assert!((sun.to_solar_masses() - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_kg(value: f64) -> Self {
        Self(value / SOLAR_MASS_KG)
    }

    pub fn to_solar_masses(&self) -> f64 {
        self.0
    }

    pub fn to_kg(&self) -> f64 {
        self.0 * SOLAR_MASS_KG
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// True for strictly positive mass
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }

    pub fn powf(&self, n: f64) -> f64 {
        self.0.powf(n)
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl AddAssign for Mass {
    fn add_assign(&mut self, rhs: Mass) {
        self.0 += rhs.0;
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl SubAssign for Mass {
    fn sub_assign(&mut self, rhs: Mass) {
        self.0 -= rhs.0;
    }
}

impl Neg for Mass {
    type Output = Mass;

    fn neg(self) -> Mass {
        Mass(-self.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}

impl Sum for Mass {
    fn sum<I: Iterator<Item = Mass>>(iter: I) -> Mass {
        Mass(iter.map(|m| m.0).sum())
    }
}
