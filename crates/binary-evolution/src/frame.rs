//! Vector helpers and the Euler rotation between successive orbital-plane
//! bases.
//!
//! Each supernova defines a new orbital frame: the angular momentum vector
//! is the z-axis and the eccentricity vector the x-axis. Velocities computed
//! in the new frame are rotated back into the frame of the first event with
//! the accumulated Euler angles, so systemic and component velocities stay
//! comparable across events.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Angle between two vectors in [0, π].
///
/// Returns 0 when either vector has zero length, where the angle is
/// undefined.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let norms = a.norm() * b.norm();
    if norms <= 0.0 {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos()
}

/// Unit vector along `v`, or the zero vector if `v` has zero length
pub fn unit_vector(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Orientation of the current orbital frame relative to the first one.
///
/// `theta` is the inclination between successive angular momentum vectors,
/// `phi` and `psi` locate the line of nodes in the old and new planes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub theta: f64,
    pub phi: f64,
    pub psi: f64,
}

impl EulerAngles {
    pub fn new(theta: f64, phi: f64, psi: f64) -> Self {
        Self { theta, phi, psi }
    }

    /// Rotation matrix taking new-frame components to old-frame components.
    ///
    /// # Formula
    ///
    /// ```text
    /// | cφcψ - sφcθsψ   -cφsψ - sφcθcψ    sθsφ |
    /// | sφcψ + cφcθsψ   -sφsψ + cφcθcψ   -sθcφ |
    /// | sθsψ             sθcψ              cθ  |
    /// ```
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        let (s_theta, c_theta) = self.theta.sin_cos();
        let (s_phi, c_phi) = self.phi.sin_cos();
        let (s_psi, c_psi) = self.psi.sin_cos();

        Matrix3::new(
            c_phi * c_psi - s_phi * c_theta * s_psi,
            -c_phi * s_psi - s_phi * c_theta * c_psi,
            s_theta * s_phi,
            s_phi * c_psi + c_phi * c_theta * s_psi,
            -s_phi * s_psi + c_phi * c_theta * c_psi,
            -s_theta * c_phi,
            s_theta * s_psi,
            s_theta * c_psi,
            c_theta,
        )
    }

    /// Rotate `v` from the current event frame into the reference frame
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation_matrix() * v
    }
}
