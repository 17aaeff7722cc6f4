//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// # Example
///
/// ```
/// use qe_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert_eq!(config.max_iterations, 100);
///
/// let custom = SolverConfig::new(1e-6, 50);
/// assert_eq!(custom.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance: the solver stops when `|f(x)| < tolerance`.
    pub tolerance: T,

    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,

    /// Derivative magnitude below which a Newton step is refused.
    pub min_derivative: T,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 100
    /// - `min_derivative`: 1e-10
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
            min_derivative: T::from(1e-10).unwrap_or_else(T::epsilon),
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with the given tolerance and iteration
    /// budget, keeping the default `min_derivative`.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be positive");
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Returns a copy with a different derivative floor.
    pub fn with_min_derivative(mut self, min_derivative: T) -> Self {
        self.min_derivative = min_derivative;
        self
    }
}
