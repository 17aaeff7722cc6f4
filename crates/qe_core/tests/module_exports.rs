//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute paths
//! and behave consistently across module boundaries.

/// Error types are accessible and convert across modules.
#[test]
fn test_types_module_exports() {
    use qe_core::types::error::ensure_finite;
    use qe_core::types::{PricingError, PricingResult, SolverError};

    fn fails() -> PricingResult<f64> {
        Err(SolverError::MaxIterationsExceeded { iterations: 7 })?
    }

    match fails() {
        Err(PricingError::Convergence { iterations, .. }) => assert_eq!(iterations, 7),
        other => panic!("Expected Convergence, got {:?}", other),
    }
    assert!(ensure_finite(f64::NEG_INFINITY, "ctx", "m").is_err());
}

/// Distribution functions are accessible via absolute path.
#[test]
fn test_distribution_exports() {
    use qe_core::math::distributions::{norm_cdf, norm_pdf};

    assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
    assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
}

/// Solvers are accessible and generic over the float type.
#[test]
fn test_solver_exports() {
    use qe_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};

    let solver = NewtonRaphsonSolver::new(SolverConfig::<f32>::new(1e-5, 50));
    let root = solver
        .find_root(|x: f32| x * x - 9.0, |x: f32| 2.0 * x, 1.0)
        .unwrap();
    assert!((root - 3.0).abs() < 1e-4);
}

/// Market data manager and records work together.
#[test]
fn test_market_data_exports() {
    use qe_core::market_data::{MarketData, MarketDataManager, MarketDataMap, ModelInputs};

    let mut manager = MarketDataManager::new();
    manager
        .add(MarketData::with_dividend_yield("SPX", 4500.0, 0.04, 0.18, 0.015).unwrap())
        .unwrap();
    manager
        .add(MarketData::new("NDX", 15500.0, 0.04, 0.22).unwrap())
        .unwrap();

    let map: &MarketDataMap = manager.as_map();
    let inputs: ModelInputs = map["SPX"].inputs();
    assert_eq!(inputs.spot, 4500.0);
    assert_eq!(inputs.dividend_yield, 0.015);
    assert_eq!(manager.len(), 2);
}
