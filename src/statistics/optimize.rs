//! Derivative-free minimisation with the Nelder–Mead simplex method.
//!
//! Used by the maximum-likelihood estimator, whose objectives are not
//! differentiable at the support boundary (infeasible points evaluate to
//! `+inf`).

use nalgebra::SVector;

/// Nelder–Mead simplex search settings.
#[derive(Debug, Clone, Copy)]
pub struct NelderMead {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Relative tolerance on the spread of objective values.
    pub f_tolerance: f64,
    /// Absolute tolerance on the simplex diameter (max-norm).
    pub x_tolerance: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 5_000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-8,
        }
    }
}

/// Converged minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum<const D: usize> {
    /// Best vertex.
    pub point: SVector<f64, D>,
    /// Objective at `point`.
    pub value: f64,
    /// Iterations used.
    pub iterations: usize,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Minimise `f` starting from `start`.
    ///
    /// The initial simplex offsets each coordinate by `max(0.1 |x_i|, 0.1)`.
    /// NaN objective values are treated as `+inf`.
    ///
    /// # Returns
    ///
    /// The converged minimum, or `None` when the iteration budget runs out
    /// or the starting point is infeasible.
    pub fn minimize<F, const D: usize>(&self, mut f: F, start: SVector<f64, D>) -> Option<Minimum<D>>
    where
        F: FnMut(&SVector<f64, D>) -> f64,
    {
        let mut eval = |x: &SVector<f64, D>| {
            let v = f(x);
            if v.is_nan() {
                f64::INFINITY
            } else {
                v
            }
        };

        let mut vertices: Vec<(SVector<f64, D>, f64)> = Vec::with_capacity(D + 1);
        vertices.push((start, eval(&start)));
        if !vertices[0].1.is_finite() {
            return None;
        }
        for i in 0..D {
            let mut p = start;
            p[i] += (0.1 * p[i].abs()).max(0.1);
            let v = eval(&p);
            vertices.push((p, v));
        }

        for iteration in 0..self.max_iterations {
            vertices.sort_by(|a, b| a.1.total_cmp(&b.1));

            let best = vertices[0].1;
            let worst = vertices[D].1;
            let diameter = vertices[1..]
                .iter()
                .map(|(p, _)| (p - vertices[0].0).amax())
                .fold(0.0, f64::max);
            if (worst - best).abs() <= self.f_tolerance * (best.abs() + self.f_tolerance)
                && diameter < self.x_tolerance
            {
                return Some(Minimum {
                    point: vertices[0].0,
                    value: best,
                    iterations: iteration,
                });
            }

            let centroid = vertices[..D]
                .iter()
                .fold(SVector::<f64, D>::zeros(), |acc, (p, _)| acc + p)
                / D as f64;
            let (worst_point, worst_value) = vertices[D];
            let second_worst = vertices[D - 1].1;

            let reflected = centroid + (centroid - worst_point) * REFLECTION;
            let fr = eval(&reflected);

            if best <= fr && fr < second_worst {
                vertices[D] = (reflected, fr);
                continue;
            }

            if fr < best {
                let expanded = centroid + (reflected - centroid) * EXPANSION;
                let fe = eval(&expanded);
                vertices[D] = if fe < fr { (expanded, fe) } else { (reflected, fr) };
                continue;
            }

            if fr < worst_value {
                let contracted = centroid + (reflected - centroid) * CONTRACTION;
                let fc = eval(&contracted);
                if fc <= fr {
                    vertices[D] = (contracted, fc);
                    continue;
                }
            } else {
                let contracted = centroid + (worst_point - centroid) * CONTRACTION;
                let fc = eval(&contracted);
                if fc < worst_value {
                    vertices[D] = (contracted, fc);
                    continue;
                }
            }

            let anchor = vertices[0].0;
            for vertex in vertices.iter_mut().skip(1) {
                let p = anchor + (vertex.0 - anchor) * SHRINK;
                *vertex = (p, eval(&p));
            }
        }

        None
    }
}
