//! Nonlinear conjugate gradient (Polak-Ribière+), unconstrained.
use nalgebra::Vector2;

use super::{
    line_search::{converged, gradient, search},
    Minimizer, Minimum,
};

/// Length of the very first step, in parameter units
const INITIAL_STEP: f64 = 1.0E-2;

/// Directions are reset to steepest descent every n iterations (n = dimension)
const RESTART_PERIOD: usize = 2;

pub(crate) fn minimize<F: Fn(&Vector2<f64>) -> f64>(
    minimizer: &Minimizer,
    f: &F,
    x0: Vector2<f64>,
) -> Minimum {
    let tolerance = minimizer.tolerance;

    let mut x = x0;
    let mut fx = f(&x);
    let mut g = gradient(f, &x);
    let mut p = -g;
    let mut last_step = INITIAL_STEP;
    let mut stalled = 0;

    for iter in 0..minimizer.max_iterations {
        if g.amax() <= tolerance {
            return Minimum {
                x,
                value: fx,
                iterations: iter,
                converged: true,
            };
        }

        if p.dot(&g) >= 0.0 {
            p = -g;
        }

        // first trial reuses the previous step length
        let alpha0 = last_step / p.norm();

        let step = match search(f, &x, fx, &g, &p, alpha0, None) {
            Some(step) => step,
            None => {
                return Minimum {
                    x,
                    value: fx,
                    iterations: iter,
                    converged: false,
                };
            },
        };

        last_step = (step.x - x).norm();

        let g_new = gradient(f, &step.x);

        let beta = if (iter + 1) % RESTART_PERIOD == 0 {
            0.0
        } else {
            (g_new.dot(&(g_new - g)) / g.dot(&g)).max(0.0)
        };

        p = -g_new + p * beta;

        let done = converged(fx, step.fx, tolerance);

        x = step.x;
        fx = step.fx;
        g = g_new;

        if done {
            stalled += 1;
            if stalled > 1 {
                return Minimum {
                    x,
                    value: fx,
                    iterations: iter + 1,
                    converged: true,
                };
            }
        } else {
            stalled = 0;
        }
    }

    Minimum {
        x,
        value: fx,
        iterations: minimizer.max_iterations,
        converged: false,
    }
}
