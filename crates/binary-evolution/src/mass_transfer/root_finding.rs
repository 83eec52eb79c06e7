//! Brent's method for bracketed scalar roots.
//!
//! # References
//!
//! - Brent, R.P. (1973), "Algorithms for Minimization without Derivatives", ch. 4

use crate::error::RootSolveError;

#[derive(Debug, Clone, Copy)]
pub struct BrentSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BrentSolver {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-12,
            max_iterations: 100,
        }
    }
}

impl BrentSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Root of `f` in `[lower, upper]`; `f(lower)` and `f(upper)` must differ in sign.
    pub fn find_root<F>(&self, mut f: F, lower: f64, upper: f64) -> Result<f64, RootSolveError>
    where
        F: FnMut(f64) -> f64,
    {
        let (mut a, mut b) = (lower, upper);
        let (mut fa, mut fb) = (f(a), f(b));

        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if fa.signum() == fb.signum() || fa.is_nan() || fb.is_nan() {
            return Err(RootSolveError::NotBracketed {
                lower,
                upper,
                f_lower: fa,
                f_upper: fb,
            });
        }

        let (mut c, mut fc) = (a, fa);
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.max_iterations {
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // Keep b as the best estimate
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tolerance = 2.0 * f64::EPSILON * b.abs() + 0.5 * self.tolerance;
            let midpoint = 0.5 * (c - b);
            if midpoint.abs() <= tolerance || fb == 0.0 {
                return Ok(b);
            }

            if e.abs() >= tolerance && fa.abs() > fb.abs() {
                // Secant or inverse quadratic interpolation
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * midpoint * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * midpoint * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                } else {
                    p = -p;
                }
                if 2.0 * p < (3.0 * midpoint * q - (tolerance * q).abs()).min((e * q).abs()) {
                    e = d;
                    d = p / q;
                } else {
                    d = midpoint;
                    e = d;
                }
            } else {
                d = midpoint;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tolerance {
                d
            } else {
                tolerance.copysign(midpoint)
            };
            fb = f(b);
        }

        Err(RootSolveError::MaxIterations(self.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_square_root_of_two() {
        let root = BrentSolver::default()
            .find_root(|x| x * x - 2.0, 0.0, 2.0)
            .unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn finds_root_of_transcendental_function() {
        let root = BrentSolver::default()
            .find_root(|x: f64| x.exp() - 3.0, 0.0, 2.0)
            .unwrap();
        assert_relative_eq!(root, 3.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn rejects_unbracketed_interval() {
        let result = BrentSolver::default().find_root(|x| x * x + 1.0, -1.0, 1.0);
        assert!(matches!(result, Err(RootSolveError::NotBracketed { .. })));
    }

    #[test]
    fn reports_iteration_limit() {
        let result = BrentSolver::new(0.0, 2).find_root(|x| x.cos() - x, 0.0, 1.0);
        assert_eq!(result, Err(RootSolveError::MaxIterations(2)));
    }
}
