//! Failure types for the binary engine.
//!
//! Recoverable prescription problems never reach these types: they are
//! logged and replaced by defaults where the configuration is parsed.

use stellar::StellarError;
use thiserror::Error;

use crate::body::BodyIndex;

/// Failure while bracketing or converging a one-dimensional root
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootSolveError {
    #[error("root is not bracketed: f({lower}) = {f_lower}, f({upper}) = {f_upper}")]
    NotBracketed {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },
    #[error("no convergence after {0} iterations")]
    MaxIterations(usize),
}

/// Failure recorded on a binary system.
///
/// A stored error ends evolution at the next status check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinaryError {
    #[error("star {index} failed: {source}")]
    Stellar {
        index: BodyIndex,
        #[source]
        source: StellarError,
    },
    #[error("supernova resolved for star {0} without a pending event")]
    SupernovaImproperlyCalled(BodyIndex),
    #[error("mass transfer root solve failed: {0}")]
    RootSolve(#[from] RootSolveError),
    #[error("invalid orbit: a = {semi_major_axis} AU, e = {eccentricity}")]
    InvalidOrbit {
        semi_major_axis: f64,
        eccentricity: f64,
    },
    #[error("no valid birth configuration after {0} attempts")]
    BirthRejected(usize),
}

/// Failure reading a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = BinaryError> = std::result::Result<T, E>;
