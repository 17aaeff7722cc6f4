//! End-to-end portfolio risk scenarios.
//!
//! # Test Categories
//!
//! 1. **Scenarios**: hedged call/put book, empty book
//! 2. **Scaling**: k units aggregate to k × one unit
//! 3. **Tail ordering**: VaR99 ≥ VaR95 ≥ 0 and ES ≥ VaR for long books
//! 4. **Determinism**: fixed seed, sequential vs parallel
//! 5. **Failures**: missing or invalid market data

use std::collections::HashMap;

use approx::assert_relative_eq;
use qe_core::market_data::{MarketData, MarketDataManager};
use qe_models::instruments::{
    AmericanOption, EuropeanOption, Instrument, OptionType, PricingModel,
};
use qe_models::jump::JumpParameters;
use qe_risk::engine::{RiskEngine, RiskEngineConfig};
use qe_risk::parallel::ParallelConfig;
use qe_risk::portfolio::Portfolio;

fn market() -> HashMap<String, MarketData> {
    let mut manager = MarketDataManager::new();
    manager
        .add(MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap())
        .unwrap();
    manager
        .add(MarketData::with_dividend_yield("SPX", 4500.0, 0.04, 0.18, 0.015).unwrap())
        .unwrap();
    manager.into_map()
}

fn european(option_type: OptionType, strike: f64) -> Instrument {
    Instrument::European(EuropeanOption::new(option_type, strike, 1.0, "AAPL").unwrap())
}

fn engine(simulations: usize, seed: u64) -> RiskEngine {
    RiskEngine::with_config(RiskEngineConfig {
        var_simulations: simulations,
        seed,
        use_fixed_seed: true,
        ..Default::default()
    })
    .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_hedged_call_put_book() {
    let mut portfolio = Portfolio::new();
    for _ in 0..7 {
        portfolio.add(european(OptionType::Call, 100.0), 1).unwrap();
    }
    for _ in 0..12 {
        portfolio.add(european(OptionType::Put, 100.0), 1).unwrap();
    }

    let risk = engine(5_000, 42)
        .calculate_portfolio_risk(&portfolio, &market())
        .unwrap();

    assert!(risk.total_delta.abs() < 0.5, "delta = {}", risk.total_delta);
    assert!(risk.total_gamma > 0.0);
    assert_relative_eq!(risk.total_pv, 7.0 * 10.450584 + 12.0 * 5.573526, epsilon = 1e-3);
}

#[test]
fn test_empty_book_draws_no_random_numbers() {
    let report = engine(10_000, 42)
        .calculate_portfolio_risk_detailed(&Portfolio::new(), &market())
        .unwrap();

    assert!(report.result.fields().iter().all(|(_, v)| *v == 0.0));
    assert_eq!(report.diagnostics.normal_draws, 0);
    assert_eq!(report.diagnostics.paths_simulated, 0);
    assert!(report.diagnostics.simulation_skipped);
}

#[test]
fn test_offsetting_book_skips_simulation() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 5).unwrap();
    portfolio.add(european(OptionType::Call, 100.0), -5).unwrap();

    let report = engine(10_000, 42)
        .calculate_portfolio_risk_detailed(&portfolio, &market())
        .unwrap();
    assert!(report.diagnostics.simulation_skipped);
    assert_eq!(report.diagnostics.normal_draws, 0);
    assert_eq!(report.result.value_at_risk_95, 0.0);
    assert_eq!(report.result.expected_shortfall_99, 0.0);
}

// ============================================================================
// Scaling
// ============================================================================

#[test]
fn test_greeks_scale_with_quantity() {
    let m = market();
    let one = {
        let mut p = Portfolio::new();
        p.add(european(OptionType::Call, 105.0), 1).unwrap();
        engine(1_000, 1).calculate_portfolio_risk(&p, &m).unwrap()
    };
    let many = {
        let mut p = Portfolio::new();
        p.add(european(OptionType::Call, 105.0), 40).unwrap();
        engine(1_000, 1).calculate_portfolio_risk(&p, &m).unwrap()
    };

    assert_relative_eq!(many.total_pv, 40.0 * one.total_pv, max_relative = 1e-12);
    assert_relative_eq!(many.total_delta, 40.0 * one.total_delta, max_relative = 1e-12);
    assert_relative_eq!(many.total_gamma, 40.0 * one.total_gamma, max_relative = 1e-12);
    assert_relative_eq!(many.total_vega, 40.0 * one.total_vega, max_relative = 1e-12);
    // Same seed and a single asset: the P&L sample scales exactly
    assert_relative_eq!(many.value_at_risk_95, 40.0 * one.value_at_risk_95, max_relative = 1e-9);
}

#[test]
fn test_var_grows_with_position_size() {
    let m = market();
    let var_for = |quantity: i64, seed: u64| {
        let mut p = Portfolio::new();
        p.add(european(OptionType::Call, 100.0), quantity).unwrap();
        engine(20_000, seed).calculate_portfolio_risk(&p, &m).unwrap()
    };
    let small = var_for(1, 11);
    let large = var_for(10, 12);

    let ratio = large.value_at_risk_95 / small.value_at_risk_95;
    assert!((8.0..12.0).contains(&ratio), "ratio = {}", ratio);
}

// ============================================================================
// Tail Ordering
// ============================================================================

#[test]
fn test_long_book_tail_ordering() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 10).unwrap();
    portfolio.add(european(OptionType::Put, 95.0), 4).unwrap();
    portfolio
        .add(
            Instrument::American(AmericanOption::new(OptionType::Put, 4400.0, 0.5, "SPX").unwrap()),
            2,
        )
        .unwrap();
    portfolio
        .add(
            Instrument::European(
                EuropeanOption::new(OptionType::Call, 4600.0, 0.25, "SPX")
                    .unwrap()
                    .with_pricing_model(PricingModel::MertonJumpDiffusion)
                    .with_jump_parameters(JumpParameters::new(0.5, -0.05, 0.1).unwrap())
                    .unwrap(),
            ),
            1,
        )
        .unwrap();

    let risk = engine(4_000, 2024)
        .calculate_portfolio_risk(&portfolio, &market())
        .unwrap();

    assert!(risk.is_valid());
    assert!(risk.value_at_risk_95 >= 0.0);
    assert!(risk.value_at_risk_99 >= risk.value_at_risk_95);
    assert!(risk.expected_shortfall_95 >= risk.value_at_risk_95);
    assert!(risk.expected_shortfall_99 >= risk.value_at_risk_99);
}

#[test]
fn test_longer_horizon_widens_var() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 10).unwrap();
    let m = market();

    let one_day = engine(10_000, 5).calculate_portfolio_risk(&portfolio, &m).unwrap();
    let mut ten_day_engine = engine(10_000, 5);
    ten_day_engine.set_time_horizon_days(10.0).unwrap();
    let ten_day = ten_day_engine.calculate_portfolio_risk(&portfolio, &m).unwrap();

    assert!(ten_day.value_at_risk_99 > 2.0 * one_day.value_at_risk_99);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_fixed_seed_is_bit_identical() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 3).unwrap();
    portfolio.add(european(OptionType::Put, 110.0), -2).unwrap();
    let m = market();

    let a = engine(8_000, 99).calculate_portfolio_risk(&portfolio, &m).unwrap();
    let b = engine(8_000, 99).calculate_portfolio_risk(&portfolio, &m).unwrap();
    assert_eq!(a.value_at_risk_95.to_bits(), b.value_at_risk_95.to_bits());
    assert_eq!(a.expected_shortfall_99.to_bits(), b.expected_shortfall_99.to_bits());
}

#[test]
fn test_sequential_and_parallel_agree() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 3).unwrap();
    portfolio
        .add(
            Instrument::European(EuropeanOption::new(OptionType::Put, 4500.0, 1.0, "SPX").unwrap()),
            1,
        )
        .unwrap();
    let m = market();

    let mut sequential = engine(9_000, 3);
    sequential.set_parallel_config(ParallelConfig::sequential());
    let mut parallel = engine(9_000, 3);
    parallel.set_parallel_config(ParallelConfig::new(1024, 0));

    assert_eq!(
        sequential.calculate_portfolio_risk(&portfolio, &m).unwrap(),
        parallel.calculate_portfolio_risk(&portfolio, &m).unwrap()
    );
}

#[test]
fn test_different_seeds_differ() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 1).unwrap();
    let m = market();

    let a = engine(2_000, 1).calculate_portfolio_risk(&portfolio, &m).unwrap();
    let b = engine(2_000, 2).calculate_portfolio_risk(&portfolio, &m).unwrap();
    assert_ne!(a.value_at_risk_95, b.value_at_risk_95);
    assert_eq!(a.total_pv, b.total_pv);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_asset_fails_whole_calculation() {
    let mut portfolio = Portfolio::new();
    portfolio.add(european(OptionType::Call, 100.0), 1).unwrap();
    portfolio
        .add(
            Instrument::European(EuropeanOption::new(OptionType::Call, 50.0, 1.0, "NVDA").unwrap()),
            1,
        )
        .unwrap();

    let err = engine(1_000, 1)
        .calculate_portfolio_risk(&portfolio, &market())
        .unwrap_err();
    assert!(err.is_missing_market_data());
    assert!(err.to_string().contains("NVDA"));
}
