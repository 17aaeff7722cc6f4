//! Root-finding solvers for numerical computation.
//!
//! Used for implied volatility inversion. Solvers are generic over
//! `num_traits::Float`.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: Fast quadratic convergence using derivatives,
//!   with an optional projection step to keep iterates inside a domain
//!
//! ## Configuration
//!
//! [`SolverConfig`] controls:
//! - `tolerance`: Convergence tolerance on `|f(x)|` (default: 1e-10)
//! - `max_iterations`: Maximum iteration count (default: 100)
//! - `min_derivative`: Derivative magnitude below which the solver gives up
//!   (default: 1e-10)
//!
//! ## Examples
//!
//! ```
//! use qe_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 (find √2)
//! let solver = NewtonRaphsonSolver::new(SolverConfig::default());
//!
//! let f = |x: f64| x * x - 2.0;
//! let f_prime = |x: f64| 2.0 * x;
//!
//! let root = solver.find_root(f, f_prime, 1.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod config;
mod newton_raphson;

pub use config::SolverConfig;
pub use newton_raphson::NewtonRaphsonSolver;
