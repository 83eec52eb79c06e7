//! Single-star collaborator for binary evolution: stellar types, the
//! capability trait the binary engine consumes, an analytic reference model
//! and sampling primitives.

pub mod analytic;
pub mod model;
pub mod sampling;
pub mod stellar_type;

#[cfg(test)]
mod analytic_test;
#[cfg(test)]
mod sampling_test;
#[cfg(test)]
mod stellar_type_test;

pub use analytic::AnalyticStar;
pub use model::{FromZams, StellarError, StellarModel, SupernovaKick, ZetaPrescription};
pub use sampling::InitialMassFunction;
pub use stellar_type::StellarType;
