//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for fast
/// quadratic convergence on smooth functions.
///
/// # Convergence
///
/// The solver fails if:
/// - The derivative magnitude drops below `config.min_derivative`
/// - The iteration budget is exhausted
/// - An iterate becomes non-finite
///
/// # Example
///
/// ```
/// use qe_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x³ - x - 2 = 0
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
/// let f_prime = |x: f64| 3.0 * x * x - 1.0;
///
/// let root = solver.find_root(f, f_prime, 1.5).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - Derivative too small
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        self.find_root_projected(f, f_prime, x0, |x| x)
    }

    /// Find a root of `f`, mapping every iterate through `project`.
    ///
    /// `project` keeps iterates inside the admissible domain (for instance
    /// clamping a volatility into `[0.001, 5.0]`).
    ///
    /// # Example
    ///
    /// ```
    /// use qe_core::math::solvers::NewtonRaphsonSolver;
    ///
    /// let solver = NewtonRaphsonSolver::<f64>::with_defaults();
    /// // Root of x² - 4 on the positive half-line, starting from a tiny value
    /// let root = solver
    ///     .find_root_projected(|x| x * x - 4.0, |x| 2.0 * x, 0.1, |x| x.max(0.01))
    ///     .unwrap();
    /// assert!((root - 2.0).abs() < 1e-9);
    /// ```
    pub fn find_root_projected<F, G, P>(
        &self,
        f: F,
        f_prime: G,
        x0: T,
        project: P,
    ) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
        P: Fn(T) -> T,
    {
        let mut x = project(x0);

        for iteration in 0..self.config.max_iterations {
            let f_val = f(x);

            if !f_val.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "objective evaluated to a non-finite value".to_string(),
                ));
            }

            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);

            if !(f_prime_val.abs() >= self.config.min_derivative) {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                    iteration,
                });
            }

            x = project(x - f_val / f_prime_val);

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_two() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());
        let root = solver
            .find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0)
            .unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_derivative_is_reported() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());
        // f'(0) = 0 at the starting point
        let result = solver.find_root(|x: f64| x * x + 1.0, |x: f64| 2.0 * x, 0.0);
        match result {
            Err(SolverError::DerivativeNearZero { iteration, .. }) => assert_eq!(iteration, 0),
            other => panic!("Expected DerivativeNearZero, got {:?}", other),
        }
    }

    #[test]
    fn test_max_iterations_exceeded() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12_f64, 5));
        // No real root: x² + 1 oscillates
        let result = solver.find_root(|x: f64| x * x + 1.0, |x: f64| 2.0 * x, 0.5);
        assert!(matches!(
            result,
            Err(SolverError::MaxIterationsExceeded { iterations: 5 })
                | Err(SolverError::DerivativeNearZero { .. })
        ));
    }

    #[test]
    fn test_projection_is_applied() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());
        // The unconstrained iteration from 0.5 jumps negative for f = x² - 0.01
        let root = solver
            .find_root_projected(
                |x: f64| x * x - 0.01,
                |x: f64| 2.0 * x,
                0.5,
                |x: f64| x.clamp(0.001, 5.0),
            )
            .unwrap();
        assert_relative_eq!(root, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_objective() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());
        let result = solver.find_root(|_x: f64| f64::NAN, |_x: f64| 1.0, 1.0);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }
}
