//! Nelder-Mead downhill simplex, derivative free and unconstrained.
use itertools::Itertools;
use nalgebra::Vector2;

use super::{Minimizer, Minimum};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Relative perturbation of the initial vertices
const NON_ZERO_DELTA: f64 = 0.05;

/// Absolute perturbation of null initial components
const ZERO_DELTA: f64 = 0.00025;

fn initial_simplex(x0: &Vector2<f64>) -> [Vector2<f64>; 3] {
    let mut simplex = [*x0; 3];
    for i in 0..2 {
        let vertex = &mut simplex[i + 1];
        if vertex[i] != 0.0 {
            vertex[i] *= 1.0 + NON_ZERO_DELTA;
        } else {
            vertex[i] = ZERO_DELTA;
        }
    }
    simplex
}

pub(crate) fn minimize<F: Fn(&Vector2<f64>) -> f64>(
    minimizer: &Minimizer,
    f: &F,
    x0: Vector2<f64>,
) -> Minimum {
    let tolerance = minimizer.tolerance;

    let mut vertices = initial_simplex(&x0)
        .into_iter()
        .map(|x| (x, f(&x)))
        .collect::<Vec<_>>();

    for iter in 0..minimizer.max_iterations {
        vertices = vertices
            .into_iter()
            .sorted_by(|(_, a), (_, b)| a.total_cmp(b))
            .collect();

        let (best, f_best) = vertices[0];

        let x_spread = vertices[1..]
            .iter()
            .map(|(x, _)| (x - best).amax())
            .fold(0.0_f64, f64::max);

        let f_spread = vertices[1..]
            .iter()
            .map(|(_, fx)| (fx - f_best).abs())
            .fold(0.0_f64, f64::max);

        if x_spread <= tolerance && f_spread <= tolerance {
            return Minimum {
                x: best,
                value: f_best,
                iterations: iter,
                converged: true,
            };
        }

        let (worst, f_worst) = vertices[2];
        let f_second = vertices[1].1;
        let centroid = (vertices[0].0 + vertices[1].0) / 2.0;

        let reflected = centroid + (centroid - worst) * REFLECTION;
        let f_reflected = f(&reflected);

        if f_reflected < f_best {
            let expanded = centroid + (reflected - centroid) * EXPANSION;
            let f_expanded = f(&expanded);
            vertices[2] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
            continue;
        }

        if f_reflected < f_second {
            vertices[2] = (reflected, f_reflected);
            continue;
        }

        // contraction, outside then inside
        let mut shrink = true;
        if f_reflected < f_worst {
            let contracted = centroid + (reflected - centroid) * CONTRACTION;
            let f_contracted = f(&contracted);
            if f_contracted <= f_reflected {
                vertices[2] = (contracted, f_contracted);
                shrink = false;
            }
        } else {
            let contracted = centroid - (centroid - worst) * CONTRACTION;
            let f_contracted = f(&contracted);
            if f_contracted < f_worst {
                vertices[2] = (contracted, f_contracted);
                shrink = false;
            }
        }

        if shrink {
            for vertex in vertices.iter_mut().skip(1) {
                let x = best + (vertex.0 - best) * SHRINK;
                *vertex = (x, f(&x));
            }
        }
    }

    let (x, value) = vertices
        .into_iter()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .unwrap_or((x0, f(&x0)));

    Minimum {
        x,
        value,
        iterations: minimizer.max_iterations,
        converged: false,
    }
}
