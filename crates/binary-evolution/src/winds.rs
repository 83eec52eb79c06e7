//! Wind mass loss and the per-step application of accumulated mass changes.

use stellar::StellarModel;
use units::{Length, Mass};

use crate::system::BinarySystem;

impl<S: StellarModel> BinarySystem<S> {
    /// Wind mass diffs for both bodies and the orbit's adiabatic response.
    ///
    /// Winds are skipped while mass transfer is active; the donor's own
    /// mass loss is then accounted for by the transfer.
    ///
    /// # Formula
    ///
    /// ```text
    /// a_w = a_prev (M1_prev + M2_prev) / (M1_w + M2_w)
    /// ```
    ///
    /// Isotropic winds carry the specific angular momentum of the losing
    /// body, which leaves `a·M` invariant.
    pub(crate) fn calculate_wind_mass_loss(&mut self) {
        self.a_mass_loss_diff = Length::zero();
        for body in &mut self.bodies {
            body.mass_loss_diff = Mass::zero();
        }

        let transferring = self.config.mass_transfer.enabled && self.mass_transfer;
        if !self.config.winds.enabled || transferring {
            return;
        }

        let mut mass_prev = Mass::zero();
        let mut mass_after_winds = Mass::zero();
        for body in &mut self.bodies {
            let after_winds = body.star.mass_after_winds();
            body.mass_loss_diff = after_winds - body.mass();
            mass_prev += body.star.mass_prev();
            mass_after_winds += after_winds;
        }

        if mass_after_winds.is_positive() {
            let a_prev = self.semi_major_axis_prev;
            let a_winds = a_prev * (mass_prev / mass_after_winds);
            self.a_mass_loss_diff = a_winds - a_prev;
        }
    }

    /// Apply the wind and transfer diffs to both bodies and move the orbit
    /// by the accumulated separation changes.
    pub(crate) fn resolve_mass_changes(&mut self) {
        let mut type_changed = false;
        for body in &mut self.bodies {
            let delta = body.mass_loss_diff + body.mass_transfer_diff;
            if delta != Mass::zero() {
                let type_before = body.star.stellar_type();
                type_changed |= body.star.update_mass(delta) != type_before;
            }
            body.mass_loss_diff = Mass::zero();
            body.mass_transfer_diff = Mass::zero();
        }
        if type_changed {
            self.print_detailed = true;
        }

        self.semi_major_axis =
            self.semi_major_axis_prev + self.a_mass_loss_diff + self.a_mass_transfer_diff;
        self.a_mass_loss_diff = Length::zero();
        self.a_mass_transfer_diff = Length::zero();

        if self.config.evolution.chemically_homogeneous.is_enabled() {
            let omega = self.orbital_angular_velocity();
            for body in &mut self.bodies {
                body.star.set_omega(omega);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use units::Time;

    use crate::body::ConstituentBody;
    use crate::config::BinaryConfig;
    use crate::system::BinarySystem;
    use crate::testing::TestStar;

    fn system(star1: TestStar, star2: TestStar, a_au: f64) -> BinarySystem<TestStar> {
        BinarySystem::from_bodies(
            Arc::new(BinaryConfig::default()),
            1,
            7,
            [ConstituentBody::new(star1, 1), ConstituentBody::new(star2, 2)],
            units::Length::from_au(a_au),
            0.0,
            1.0,
        )
    }

    fn age(system: &mut BinarySystem<TestStar>) {
        for body in &mut system.bodies {
            stellar::StellarModel::age_one_timestep(&mut body.star, Time::from_myr(1.0))
                .expect("test star ages");
        }
    }

    #[test]
    fn isotropic_winds_conserve_specific_orbital_angular_momentum() {
        let mut system = system(
            TestStar::main_sequence(10.0, 5.0).with_wind_loss(1.0),
            TestStar::main_sequence(8.0, 4.0).with_wind_loss(0.5),
            10.0,
        );
        let specific = |mechanics: &crate::conservation::Mechanics| {
            mechanics.orbital_angular_momentum / mechanics.reduced_mass
        };
        let before = specific(system.mechanics());

        age(&mut system);
        system.calculate_wind_mass_loss();
        system.resolve_mass_changes();
        system.update_mechanics();

        assert!(
            system.mechanics().orbital_angular_momentum
                < system.mechanics_prev().orbital_angular_momentum
        );
        assert_relative_eq!(specific(system.mechanics()), before, max_relative = 1e-12);
    }

    #[test]
    fn winds_keep_separation_times_mass_fixed() {
        let mut system = system(
            TestStar::main_sequence(10.0, 5.0).with_wind_loss(1.0),
            TestStar::main_sequence(8.0, 4.0).with_wind_loss(0.5),
            10.0,
        );

        age(&mut system);
        system.calculate_wind_mass_loss();
        system.resolve_mass_changes();

        assert_relative_eq!(system.total_mass(), 16.5, max_relative = 1e-12);
        assert_relative_eq!(
            system.semi_major_axis().to_au() * system.total_mass(),
            10.0 * 18.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn winds_are_skipped_during_transfer() {
        let mut system = system(
            TestStar::main_sequence(10.0, 5.0).with_wind_loss(1.0),
            TestStar::main_sequence(8.0, 4.0),
            10.0,
        );
        system.mass_transfer = true;

        system.calculate_wind_mass_loss();

        assert_eq!(system.bodies[0].mass_loss_diff, units::Mass::zero());
        assert_eq!(system.a_mass_loss_diff, units::Length::zero());
    }
}
