//! Gravitational-wave inspiral of double compact objects.

use stellar::StellarModel;
use units::constants::{G_SI, HUBBLE_TIME_YEARS, SPEED_OF_LIGHT_SI};
use units::{Length, Mass, Time};

use crate::events::DoubleCompactObjectRecord;
use crate::system::{BinarySystem, Orbit};

const INTEGRATION_STEPS: usize = 10_000;
const LOW_ECCENTRICITY: f64 = 0.01;
const HIGH_ECCENTRICITY: f64 = 0.99;

/// Time to coalescence through gravitational radiation.
///
/// # Formula
///
/// ```text
/// β   = 64/5 G³ m1 m2 (m1 + m2) / c⁵
/// t_c = a⁴ / 4β                                   (e = 0)
/// c0  = a (1 - e²) e^(-12/19) (1 + 121e²/304)^(-870/2299)
/// t_c = 12/19 c0⁴/β ∫₀ᵉ e'^(29/19) (1 + 121e'²/304)^(1181/2299) / (1 - e'²)^(3/2) de'
/// ```
///
/// with the closed-form limits `c0⁴ e^(48/19) / 4β` for e < 0.01 and
/// `768/425 (1 - e²)^(7/2) a⁴/4β` for e > 0.99.
///
/// # References
///
/// - Peters (1964), Phys. Rev. 136, B1224
pub fn coalescence_time(m1: Mass, m2: Mass, semi_major_axis: Length, eccentricity: f64) -> Time {
    let m1 = m1.to_kg();
    let m2 = m2.to_kg();
    let a = semi_major_axis.to_meters();
    let e = eccentricity;

    let beta = 64.0 / 5.0 * G_SI.powi(3) * m1 * m2 * (m1 + m2) / SPEED_OF_LIGHT_SI.powi(5);
    let circular = a.powi(4) / (4.0 * beta);
    if e == 0.0 {
        return Time::from_seconds(circular);
    }

    let e2 = e * e;
    let c0 = a * (1.0 - e2) * e.powf(-12.0 / 19.0) * (1.0 + 121.0 * e2 / 304.0).powf(-870.0 / 2299.0);
    let seconds = if e < LOW_ECCENTRICITY {
        c0.powi(4) * e.powf(48.0 / 19.0) / (4.0 * beta)
    } else if e > HIGH_ECCENTRICITY {
        circular * 768.0 / 425.0 * (1.0 - e2).powf(3.5)
    } else {
        let de = e / INTEGRATION_STEPS as f64;
        let integral: f64 = (0..INTEGRATION_STEPS)
            .map(|step| {
                let x = (step as f64 + 0.5) * de;
                let x2 = x * x;
                x.powf(29.0 / 19.0) * (1.0 + 121.0 * x2 / 304.0).powf(1181.0 / 2299.0)
                    / (1.0 - x2).powf(1.5)
                    * de
            })
            .sum();
        12.0 / 19.0 * c0.powi(4) / beta * integral
    };
    Time::from_seconds(seconds)
}

impl<S: StellarModel> BinarySystem<S> {
    /// Record the orbit at double-compact-object formation and its inspiral time
    pub(crate) fn resolve_coalescence(&mut self) -> DoubleCompactObjectRecord {
        let orbit = Orbit {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
        };
        self.double_compact_object_orbit = Some(orbit);

        let [one, two] = &self.bodies;
        let time = coalescence_time(one.mass(), two.mass(), orbit.semi_major_axis, orbit.eccentricity);
        self.coalescence_time = Some(time);
        self.merges_in_hubble_time = time.to_years() < HUBBLE_TIME_YEARS;

        DoubleCompactObjectRecord {
            time: self.time.to_myr(),
            id1: one.id,
            id2: two.id,
            mass1: one.mass().to_solar_masses(),
            mass2: two.mass().to_solar_masses(),
            stellar_type1: one.star.stellar_type(),
            stellar_type2: two.star.stellar_type(),
            semi_major_axis: orbit.semi_major_axis.to_au(),
            eccentricity: orbit.eccentricity,
            coalescence_time: time.to_myr(),
            merges_in_hubble_time: self.merges_in_hubble_time,
        }
    }
}
