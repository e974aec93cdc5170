//! Quasi-Newton (BFGS) minimizer. When [Bounds] are defined, iterates are projected
//! onto the box and the active bounds are frozen (L-BFGS-B like behavior).
use nalgebra::{Matrix2, Vector2};

use super::{
    line_search::{converged, gradient, search},
    Bounds, Minimizer, Minimum,
};

/// Length of the very first step, in parameter units
const INITIAL_STEP: f64 = 1.0E-2;

fn initial_inverse_hessian(g: &Vector2<f64>) -> Matrix2<f64> {
    let norm = g.norm();
    let scale = if norm > 0.0 {
        (INITIAL_STEP / norm).min(1.0)
    } else {
        1.0
    };
    Matrix2::identity() * scale
}

/// Cancels direction components that would leave the box
fn freeze_active(bounds: Option<&Bounds>, x: &Vector2<f64>, p: &mut Vector2<f64>) {
    if let Some(bounds) = bounds {
        for i in 0..2 {
            if (x[i] <= bounds.lower && p[i] < 0.0) || (x[i] >= bounds.upper && p[i] > 0.0) {
                p[i] = 0.0;
            }
        }
    }
}

pub(crate) fn minimize<F: Fn(&Vector2<f64>) -> f64>(
    minimizer: &Minimizer,
    f: &F,
    x0: Vector2<f64>,
    bounds: Option<&Bounds>,
) -> Minimum {
    let tolerance = minimizer.tolerance;

    let mut x = x0;
    let mut fx = f(&x);
    let mut g = gradient(f, &x);
    let mut h = initial_inverse_hessian(&g);
    let mut updated = false;
    let mut stalled = 0;

    for iter in 0..minimizer.max_iterations {
        let pg = match bounds {
            Some(bounds) => bounds.projected_gradient(&x, &g),
            None => g,
        };

        if pg.amax() <= tolerance {
            return Minimum {
                x,
                value: fx,
                iterations: iter,
                converged: true,
            };
        }

        let mut p = -(h * pg);
        freeze_active(bounds, &x, &mut p);

        if p.dot(&pg) >= 0.0 {
            // lost positive definiteness: restart from steepest descent
            h = initial_inverse_hessian(&pg);
            updated = false;
            p = -(h * pg);
            freeze_active(bounds, &x, &mut p);
        }

        let step = match search(f, &x, fx, &g, &p, 1.0, bounds) {
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

        let s = step.x - x;
        let g_new = gradient(f, &step.x);
        let y = g_new - g;
        let sy = s.dot(&y);

        if sy > 1.0E-12 * s.norm() * y.norm() {
            if !updated {
                h = Matrix2::identity() * (sy / y.dot(&y));
                updated = true;
            }
            let rho = 1.0 / sy;
            let id = Matrix2::<f64>::identity();
            h = (id - rho * s * y.transpose()) * h * (id - rho * y * s.transpose())
                + rho * s * s.transpose();
        }

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
