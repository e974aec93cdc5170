//! Sequential quadratic programming on a box.
//! Each iteration solves the bound constrained quadratic sub problem exactly
//! (2D active set enumeration) using a damped BFGS Hessian approximation,
//! then runs a projected line search on the objective.
use nalgebra::{Matrix2, Vector2};

use super::{
    line_search::{converged, gradient, search},
    Bounds, Minimizer, Minimum,
};

/// Length of the very first step, in parameter units
const INITIAL_STEP: f64 = 1.0E-2;

/// Powell damping threshold
const DAMPING: f64 = 0.2;

fn initial_hessian(g: &Vector2<f64>) -> Matrix2<f64> {
    let norm = g.norm();
    let scale = if norm > 0.0 {
        (norm / INITIAL_STEP).max(1.0)
    } else {
        1.0
    };
    Matrix2::identity() * scale
}

/// Quadratic model q(d) = g.d + 1/2 d'Bd
fn model(g: &Vector2<f64>, b: &Matrix2<f64>, d: &Vector2<f64>) -> f64 {
    g.dot(d) + 0.5 * d.dot(&(b * d))
}

/// Minimizes the quadratic model over lower <= d <= upper.
/// Candidates are: the free minimizer, each 1D minimizer with the other
/// component fixed on one of its bounds, and the four corners.
fn solve_qp(
    g: &Vector2<f64>,
    b: &Matrix2<f64>,
    lower: &Vector2<f64>,
    upper: &Vector2<f64>,
) -> Vector2<f64> {
    let feasible = |d: &Vector2<f64>| {
        (0..2).all(|i| d[i] >= lower[i] - 1.0E-12 && d[i] <= upper[i] + 1.0E-12)
    };

    let mut candidates = Vec::with_capacity(9);

    if let Some(b_inv) = b.try_inverse() {
        candidates.push(-(b_inv * g));
    }

    for fixed in 0..2 {
        let free = 1 - fixed;
        for value in [lower[fixed], upper[fixed]] {
            let mut d = Vector2::zeros();
            d[fixed] = value;
            if b[(free, free)] > 0.0 {
                let d_free = -(g[free] + b[(free, fixed)] * value) / b[(free, free)];
                d[free] = d_free.clamp(lower[free], upper[free]);
            }
            candidates.push(d);
        }
    }

    for d0 in [lower[0], upper[0]] {
        for d1 in [lower[1], upper[1]] {
            candidates.push(Vector2::new(d0, d1));
        }
    }

    candidates
        .into_iter()
        .filter(|d| d.iter().all(|d_i| d_i.is_finite()) && feasible(d))
        .min_by(|a, b_| model(g, b, a).total_cmp(&model(g, b, b_)))
        .unwrap_or_else(Vector2::zeros)
}

pub(crate) fn minimize<F: Fn(&Vector2<f64>) -> f64>(
    minimizer: &Minimizer,
    f: &F,
    x0: Vector2<f64>,
    bounds: &Bounds,
) -> Minimum {
    let tolerance = minimizer.tolerance;

    let mut x = bounds.project(&x0);
    let mut fx = f(&x);
    let mut g = gradient(f, &x);
    let mut b = initial_hessian(&g);
    let mut stalled = 0;

    for iter in 0..minimizer.max_iterations {
        if bounds.projected_gradient(&x, &g).amax() <= tolerance {
            return Minimum {
                x,
                value: fx,
                iterations: iter,
                converged: true,
            };
        }

        let lower = Vector2::repeat(bounds.lower) - x;
        let upper = Vector2::repeat(bounds.upper) - x;

        let mut d = solve_qp(&g, &b, &lower, &upper);

        if d.dot(&g) >= 0.0 {
            b = initial_hessian(&g);
            d = solve_qp(&g, &b, &lower, &upper);
        }

        let step = match search(f, &x, fx, &g, &d, 1.0, Some(bounds)) {
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

        // damped BFGS update keeps B positive definite
        let bs = b * s;
        let sbs = s.dot(&bs);
        if sbs > 0.0 {
            let sy = s.dot(&y);
            let theta = if sy >= DAMPING * sbs {
                1.0
            } else {
                (1.0 - DAMPING) * sbs / (sbs - sy)
            };
            let r = y * theta + bs * (1.0 - theta);
            let sr = s.dot(&r);
            if sr > 0.0 {
                b = b - (bs * bs.transpose()) / sbs + (r * r.transpose()) / sr;
            }
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
