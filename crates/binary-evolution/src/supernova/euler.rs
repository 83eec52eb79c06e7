//! Euler angles between the pre- and post-explosion orbital frames.
//!
//! `theta` is always the angle between the angular momentum vectors. The
//! in-plane angles locate the line of nodes `N = H × H'` relative to each
//! eccentricity vector, which fails when `N` vanishes (parallel or
//! antiparallel planes) or when an orbit is circular. The cases are
//! resolved by [`NodeCase`].

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;
use rand::Rng;
use rand_chacha::ChaChaRng;

use crate::frame::{EulerAngles, angle_between};

/// Tolerance for treating an angle or eccentricity as zero
const ANGLE_TOLERANCE: f64 = 1.0e-10;

/// Orbital vectors before and after an explosion
#[derive(Debug, Clone, Copy)]
pub struct FrameVectors {
    pub angular_momentum: Vector3<f64>,
    pub angular_momentum_post: Vector3<f64>,
    pub eccentricity_vector: Vector3<f64>,
    pub eccentricity_vector_post: Vector3<f64>,
}

/// Geometry of the line of nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCase {
    /// `H ∥ H'` with both orbits eccentric: only `phi + psi` is fixed
    Parallel,
    /// `H ∥ -H'` with both orbits eccentric: only `psi - phi` is fixed
    Antiparallel,
    /// The line of nodes is usable; each angle is defined when its orbit is eccentric
    Nodes { pre_defined: bool, post_defined: bool },
}

impl NodeCase {
    /// Decision table over (θ ≈ 0, θ ≈ π, e > 0, e' > 0)
    pub fn classify(theta: f64, eccentricity: f64, eccentricity_post: f64) -> Self {
        let pre_defined = eccentricity > ANGLE_TOLERANCE;
        let post_defined = eccentricity_post > ANGLE_TOLERANCE;
        let parallel = theta.abs() < ANGLE_TOLERANCE;
        let antiparallel = (theta - PI).abs() < ANGLE_TOLERANCE;

        match (parallel, antiparallel, pre_defined, post_defined) {
            (true, _, true, true) => Self::Parallel,
            (_, true, true, true) => Self::Antiparallel,
            _ => Self::Nodes {
                pre_defined,
                post_defined,
            },
        }
    }
}

/// Signed angle between an eccentricity vector and the line of nodes.
///
/// Positive when the eccentricity vector lies on the side of the other
/// orbit's angular momentum.
fn node_angle(
    eccentricity_vector: &Vector3<f64>,
    nodes: &Vector3<f64>,
    other_angular_momentum: &Vector3<f64>,
) -> f64 {
    let angle = angle_between(eccentricity_vector, nodes);
    if eccentricity_vector.dot(other_angular_momentum) >= 0.0 {
        angle
    } else {
        -angle
    }
}

/// Euler angles for a system that stays bound.
///
/// The argument of periapsis in the new frame is drawn at random after the
/// geometric solution, allowing for periapsis drift during later evolution.
pub fn bound_euler_angles(vectors: &FrameVectors, rng: &mut ChaChaRng) -> EulerAngles {
    let FrameVectors {
        angular_momentum: h,
        angular_momentum_post: h_post,
        eccentricity_vector: e_vec,
        eccentricity_vector_post: e_vec_post,
    } = vectors;

    let theta = angle_between(h, h_post);
    let case = NodeCase::classify(theta, e_vec.norm(), e_vec_post.norm());

    let (phi, _psi) = match case {
        NodeCase::Parallel => {
            let sum = angle_between(e_vec, e_vec_post);
            let phi = TAU * rng.random::<f64>();
            (phi, sum - phi)
        }
        NodeCase::Antiparallel => {
            let difference = angle_between(e_vec, e_vec_post);
            let phi = TAU * rng.random::<f64>();
            (phi, difference + phi)
        }
        NodeCase::Nodes {
            pre_defined,
            post_defined,
        } => {
            let nodes = h.cross(h_post);
            let phi = if pre_defined {
                node_angle(e_vec, &nodes, h_post)
            } else {
                TAU * rng.random::<f64>()
            };
            let psi = if post_defined {
                node_angle(e_vec_post, &nodes, h)
            } else {
                TAU * rng.random::<f64>()
            };
            (phi, psi)
        }
    };

    // TODO: keep the geometric psi once periapsis evolution during transfer is modelled
    let psi = TAU * rng.random::<f64>();
    EulerAngles::new(theta, phi, psi)
}

/// Euler angles for a system the explosion disrupted: only `theta` is
/// constrained.
pub fn unbound_euler_angles(
    angular_momentum: &Vector3<f64>,
    angular_momentum_post: &Vector3<f64>,
    rng: &mut ChaChaRng,
) -> EulerAngles {
    let theta = angle_between(angular_momentum, angular_momentum_post);
    let phi = TAU * rng.random::<f64>();
    let psi = TAU * rng.random::<f64>();
    EulerAngles::new(theta, phi, psi)
}
