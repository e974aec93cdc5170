//! Numerical derivatives and step length selection shared by gradient based methods
use nalgebra::Vector2;

use super::Bounds;

/// Sufficient decrease (Armijo) constant
const ARMIJO_C1: f64 = 1.0E-4;

/// Maximal number of step halvings
const MAX_BACKTRACKING: usize = 60;

/// Maximal number of step doublings
const MAX_EXPANSION: usize = 20;

/// Central finite difference gradient
pub(crate) fn gradient<F: Fn(&Vector2<f64>) -> f64>(f: &F, x: &Vector2<f64>) -> Vector2<f64> {
    let mut g = Vector2::zeros();
    for i in 0..2 {
        let h = 1.0E-7 * x[i].abs().max(1.0);
        let mut fwd = *x;
        let mut bwd = *x;
        fwd[i] += h;
        bwd[i] -= h;
        g[i] = (f(&fwd) - f(&bwd)) / (2.0 * h);
    }
    g
}

/// Accepted step
pub(crate) struct Step {
    pub x: Vector2<f64>,
    pub fx: f64,
}

/// Backtracking line search along `p` starting at step length `alpha0`,
/// with forward expansion when the initial step is accepted.
/// Iterates are projected onto [Bounds] if any.
/// Returns None when no sufficient decrease could be obtained.
pub(crate) fn search<F: Fn(&Vector2<f64>) -> f64>(
    f: &F,
    x: &Vector2<f64>,
    fx: f64,
    g: &Vector2<f64>,
    p: &Vector2<f64>,
    alpha0: f64,
    bounds: Option<&Bounds>,
) -> Option<Step> {
    let trial = |alpha: f64| -> (Vector2<f64>, f64) {
        let mut x_new = x + p * alpha;
        if let Some(bounds) = bounds {
            x_new = bounds.project(&x_new);
        }
        let fx_new = f(&x_new);
        (x_new, fx_new)
    };

    let accepted = |x_new: &Vector2<f64>, fx_new: f64| -> bool {
        x_new != x && fx_new.is_finite() && fx_new <= fx + ARMIJO_C1 * g.dot(&(x_new - x))
    };

    let mut alpha = alpha0;
    let (mut x_new, mut fx_new) = trial(alpha);

    if accepted(&x_new, fx_new) {
        // expand while it keeps improving
        for _ in 0..MAX_EXPANSION {
            let (x_next, fx_next) = trial(alpha * 2.0);
            if !accepted(&x_next, fx_next) || fx_next >= fx_new || x_next == x_new {
                break;
            }
            alpha *= 2.0;
            x_new = x_next;
            fx_new = fx_next;
        }
        return Some(Step { x: x_new, fx: fx_new });
    }

    for _ in 0..MAX_BACKTRACKING {
        alpha *= 0.5;
        (x_new, fx_new) = trial(alpha);
        if accepted(&x_new, fx_new) {
            return Some(Step { x: x_new, fx: fx_new });
        }
    }

    None
}

/// Relative objective decrease criterion
pub(crate) fn converged(fx: f64, fx_new: f64, tolerance: f64) -> bool {
    (fx - fx_new) <= tolerance * fx.abs().max(fx_new.abs()).max(1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quadratic_gradient() {
        let f = |x: &Vector2<f64>| 3.0 * x[0].powi(2) + x[0] * x[1] - 2.0 * x[1];
        let g = gradient(&f, &Vector2::new(1.0, 2.0));
        assert!((g[0] - 8.0).abs() < 1e-5);
        assert!((g[1] - -1.0).abs() < 1e-5);
    }

    #[test]
    fn descent_step() {
        let f = |x: &Vector2<f64>| x.norm_squared();
        let x = Vector2::new(4.0, -2.0);
        let g = gradient(&f, &x);
        let step = search(&f, &x, f(&x), &g, &(-g), 1.0E-3, None).unwrap();
        assert!(step.fx < f(&x));
    }

    #[test]
    fn ascent_direction_rejected() {
        let f = |x: &Vector2<f64>| x.norm_squared();
        let x = Vector2::new(4.0, -2.0);
        let g = gradient(&f, &x);
        assert!(search(&f, &x, f(&x), &g, &g, 1.0, None).is_none());
    }
}
