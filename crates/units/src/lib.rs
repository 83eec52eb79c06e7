pub mod angular_velocity;
pub mod constants;
pub mod length;
pub mod mass;
pub mod temperature;
pub mod time;
pub mod velocity;

#[cfg(test)]
mod length_test;
#[cfg(test)]
mod mass_test;
#[cfg(test)]
mod time_test;

pub use angular_velocity::AngularVelocity;
pub use length::Length;
pub use mass::{Mass, SOLAR_MASS_KG};
pub use temperature::Temperature;
pub use time::Time;
pub use velocity::Velocity;
