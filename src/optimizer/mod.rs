//! Local minimizers over the 2D (latitude, longitude) parameter space
use log::{debug, warn};
use nalgebra::Vector2;

use crate::{
    constants::{SOLVER_BOUNDS, SOLVER_MAX_ITERATIONS, SOLVER_TOLERANCE},
    error::Error,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod bfgs;
mod cg;
mod line_search;
mod nelder_mead;
mod slsqp;

/// Optimization [Method]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// Quasi-Newton (BFGS) with box bounds, projected iterates.
    LBfgsB,
    /// Unconstrained quasi-Newton (BFGS).
    Bfgs,
    /// Unconstrained nonlinear conjugate gradient (Polak-Ribière).
    ConjugateGradient,
    /// Sequential quadratic programming with box bounds.
    Slsqp,
    /// Derivative-free downhill simplex.
    #[default]
    NelderMead,
}

impl std::fmt::Display for Method {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::LBfgsB => write!(fmt, "L-BFGS-B"),
            Self::Bfgs => write!(fmt, "BFGS"),
            Self::ConjugateGradient => write!(fmt, "CG"),
            Self::Slsqp => write!(fmt, "SLSQP"),
            Self::NelderMead => write!(fmt, "Nelder-Mead"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "l-bfgs-b" | "lbfgsb" => Ok(Self::LBfgsB),
            "bfgs" => Ok(Self::Bfgs),
            "cg" | "conjugate-gradient" => Ok(Self::ConjugateGradient),
            "slsqp" => Ok(Self::Slsqp),
            "nelder-mead" | "neldermead" | "simplex" => Ok(Self::NelderMead),
            _ => Err(Error::UnknownOptimizationMethod),
        }
    }
}

impl Method {
    /// All supported methods
    pub fn all() -> [Self; 5] {
        [
            Self::LBfgsB,
            Self::Bfgs,
            Self::ConjugateGradient,
            Self::Slsqp,
            Self::NelderMead,
        ]
    }

    /// True if this [Method] applies box [Bounds] on both parameters.
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::LBfgsB | Self::Slsqp)
    }
}

/// Box bounds, identical on both parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: SOLVER_BOUNDS.0,
            upper: SOLVER_BOUNDS.1,
        }
    }
}

impl Bounds {
    /// Projects onto the box
    pub(crate) fn project(&self, x: &Vector2<f64>) -> Vector2<f64> {
        x.map(|x_i| x_i.clamp(self.lower, self.upper))
    }

    /// Gradient with components pushing out of the box (on active bounds) cancelled
    pub(crate) fn projected_gradient(&self, x: &Vector2<f64>, g: &Vector2<f64>) -> Vector2<f64> {
        let mut pg = *g;
        for i in 0..2 {
            if (x[i] <= self.lower && g[i] > 0.0) || (x[i] >= self.upper && g[i] < 0.0) {
                pg[i] = 0.0;
            }
        }
        pg
    }
}

/// Local [Minimum] found by the [Minimizer]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Best iterate
    pub x: Vector2<f64>,
    /// Objective value at best iterate
    pub value: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// False if we exited without meeting the tolerance
    pub converged: bool,
}

/// [Minimizer] runs the selected [Method] on a 2D objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimizer {
    /// [Method] to use
    pub method: Method,
    /// Convergence tolerance
    pub tolerance: f64,
    /// Iteration cap
    pub max_iterations: usize,
    /// [Bounds] applied by bounded methods
    pub bounds: Bounds,
}

impl Minimizer {
    /// Builds new [Minimizer] with default tolerance, iteration cap and bounds.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            tolerance: SOLVER_TOLERANCE,
            max_iterations: SOLVER_MAX_ITERATIONS,
            bounds: Bounds::default(),
        }
    }

    /// Copies and returns [Minimizer] with convergence tolerance
    pub fn with_tolerance(&self, tolerance: f64) -> Self {
        let mut s = *self;
        s.tolerance = tolerance;
        s
    }

    /// Copies and returns [Minimizer] with iteration cap
    pub fn with_max_iterations(&self, max_iterations: usize) -> Self {
        let mut s = *self;
        s.max_iterations = max_iterations;
        s
    }

    /// Minimizes `f` starting from `x0`. The best iterate is always returned,
    /// [Minimum::converged] tells whether tolerance was met.
    pub fn minimize<F: Fn(&Vector2<f64>) -> f64>(
        &self,
        f: F,
        x0: Vector2<f64>,
    ) -> Result<Minimum, Error> {
        let bounds = if self.method.is_bounded() {
            Some(&self.bounds)
        } else {
            None
        };

        let x0 = match bounds {
            Some(bounds) => bounds.project(&x0),
            None => x0,
        };

        if !f(&x0).is_finite() {
            return Err(Error::NonFiniteObjective);
        }

        let minimum = match self.method {
            Method::LBfgsB | Method::Bfgs => bfgs::minimize(self, &f, x0, bounds),
            Method::ConjugateGradient => cg::minimize(self, &f, x0),
            Method::Slsqp => slsqp::minimize(self, &f, x0, &self.bounds),
            Method::NelderMead => nelder_mead::minimize(self, &f, x0),
        };

        if minimum.converged {
            debug!(
                "{} - converged after {} iterations: x={:?} f={:.6}",
                self.method,
                minimum.iterations,
                minimum.x.as_slice(),
                minimum.value
            );
        } else {
            warn!(
                "{} - did not converge ({} iterations): x={:?} f={:.6}",
                self.method,
                minimum.iterations,
                minimum.x.as_slice(),
                minimum.value
            );
        }

        Ok(minimum)
    }
}
