//! Cross-model pricing scenarios.
//!
//! # Test Categories
//!
//! 1. **Reference values**: at-the-money European call and put
//! 2. **Model agreement**: lattice convergence, Merton without jumps
//! 3. **Early exercise**: American premium and boundary behaviour
//! 4. **Expiry**: T = 0 collapses to intrinsic in every model

use approx::assert_relative_eq;
use proptest::prelude::*;
use qe_core::market_data::{MarketData, ModelInputs};
use qe_models::analytical::{implied_volatility, BlackScholes};
use qe_models::instruments::{
    AmericanOption, EuropeanOption, Instrument, OptionType, PricingModel,
};
use qe_models::jump::JumpParameters;

fn market(spot: f64) -> MarketData {
    MarketData::new("AAPL", spot, 0.05, 0.2).unwrap()
}

fn european(option_type: OptionType, strike: f64, expiry: f64) -> EuropeanOption {
    EuropeanOption::new(option_type, strike, expiry, "AAPL").unwrap()
}

// ============================================================================
// Reference Values
// ============================================================================

#[test]
fn test_atm_call_reference() {
    let call = Instrument::from(european(OptionType::Call, 100.0, 1.0));
    let g = call.greeks(&market(100.0)).unwrap();

    assert_relative_eq!(g.price, 10.4506, epsilon = 1e-4);
    assert_relative_eq!(g.delta, 0.6368, epsilon = 1e-4);
    assert_relative_eq!(g.gamma, 0.0188, epsilon = 1e-4);
    assert_relative_eq!(g.vega, 37.5245, epsilon = 1e-3);
}

#[test]
fn test_atm_put_reference() {
    let put = Instrument::from(european(OptionType::Put, 100.0, 1.0));
    let g = put.greeks(&market(100.0)).unwrap();

    assert_relative_eq!(g.price, 5.5735, epsilon = 1e-4);
    assert_relative_eq!(g.delta, -0.3632, epsilon = 1e-4);
}

// ============================================================================
// Model Agreement
// ============================================================================

#[test]
fn test_lattice_error_shrinks_with_steps() {
    let analytic = Instrument::from(european(OptionType::Call, 100.0, 1.0))
        .price(&market(100.0))
        .unwrap();

    let errors: Vec<f64> = [50, 100, 200]
        .into_iter()
        .map(|steps| {
            let option = european(OptionType::Call, 100.0, 1.0)
                .with_pricing_model(PricingModel::Binomial)
                .with_binomial_steps(steps)
                .unwrap();
            (Instrument::from(option).price(&market(100.0)).unwrap() - analytic).abs()
        })
        .collect();

    assert!(errors[0] > errors[1], "errors: {:?}", errors);
    assert!(errors[1] > errors[2], "errors: {:?}", errors);
    assert!(errors[2] < 0.02);
}

#[test]
fn test_merton_without_jumps_is_black_scholes() {
    for option_type in [OptionType::Call, OptionType::Put] {
        for strike in [80.0, 100.0, 120.0] {
            let analytic = Instrument::from(european(option_type, strike, 0.75));
            let merton = Instrument::from(
                european(option_type, strike, 0.75)
                    .with_pricing_model(PricingModel::MertonJumpDiffusion),
            );
            assert_relative_eq!(
                merton.price(&market(100.0)).unwrap(),
                analytic.price(&market(100.0)).unwrap(),
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn test_downward_jumps_raise_otm_put() {
    let plain = Instrument::from(european(OptionType::Put, 90.0, 1.0));
    let jumpy = Instrument::from(
        european(OptionType::Put, 90.0, 1.0)
            .with_pricing_model(PricingModel::MertonJumpDiffusion)
            .with_jump_parameters(JumpParameters::new(0.3, -0.1, 0.2).unwrap())
            .unwrap(),
    );
    let md = market(100.0);
    assert!(jumpy.price(&md).unwrap() > plain.price(&md).unwrap() + 0.5);
}

#[test]
fn test_implied_vol_recovers_instrument_volatility() {
    let md = MarketData::new("AAPL", 100.0, 0.05, 0.35).unwrap();
    let put = Instrument::from(european(OptionType::Put, 110.0, 0.5));
    let price = put.price(&md).unwrap();

    let vol = implied_volatility(OptionType::Put, price, md.inputs(), 110.0, 0.5).unwrap();
    assert_relative_eq!(vol, 0.35, epsilon = 1e-6);
}

// ============================================================================
// Early Exercise
// ============================================================================

#[test]
fn test_deep_itm_american_put_premium() {
    let md = market(80.0);
    let american = Instrument::from(AmericanOption::new(OptionType::Put, 100.0, 1.0, "AAPL").unwrap());
    let euro = Instrument::from(european(OptionType::Put, 100.0, 1.0));

    let a = american.price(&md).unwrap();
    let e = euro.price(&md).unwrap();
    assert!(a >= 20.0 - 1e-12);
    assert!(a - e >= 0.1, "american {} european {}", a, e);
}

#[test]
fn test_american_put_scenario_on_150_step_lattice() {
    let md = MarketData::new("AAPL", 70.0, 0.05, 0.3).unwrap();
    let american = Instrument::from(
        AmericanOption::new(OptionType::Put, 100.0, 1.0, "AAPL")
            .unwrap()
            .with_binomial_steps(150)
            .unwrap(),
    );
    let euro = Instrument::from(european(OptionType::Put, 100.0, 1.0));

    let a = american.price(&md).unwrap();
    assert!(a >= 30.0 - 1e-12);
    assert!(a - euro.price(&md).unwrap() >= 0.1);
}

#[test]
fn test_american_call_without_dividends_tracks_european() {
    let md = market(100.0);
    let american = Instrument::from(AmericanOption::new(OptionType::Call, 100.0, 1.0, "AAPL").unwrap());
    let euro = Instrument::from(european(OptionType::Call, 100.0, 1.0));

    assert_relative_eq!(
        american.price(&md).unwrap(),
        euro.price(&md).unwrap(),
        epsilon = 0.05
    );
}

#[test]
fn test_american_call_with_dividends_can_exceed_european() {
    let md = MarketData::with_dividend_yield("AAPL", 100.0, 0.05, 0.2, 0.08).unwrap();
    let american = Instrument::from(AmericanOption::new(OptionType::Call, 80.0, 2.0, "AAPL").unwrap());
    let euro = Instrument::from(
        european(OptionType::Call, 80.0, 2.0).with_pricing_model(PricingModel::Binomial),
    );
    assert!(american.price(&md).unwrap() > euro.price(&md).unwrap());
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn test_expired_options_are_intrinsic_in_every_model() {
    let md = market(110.0);
    let instruments = [
        Instrument::from(european(OptionType::Call, 100.0, 0.0)),
        Instrument::from(
            european(OptionType::Call, 100.0, 0.0).with_pricing_model(PricingModel::Binomial),
        ),
        Instrument::from(
            european(OptionType::Call, 100.0, 0.0)
                .with_pricing_model(PricingModel::MertonJumpDiffusion)
                .with_jump_parameters(JumpParameters::new(1.0, -0.1, 0.2).unwrap())
                .unwrap(),
        ),
        Instrument::from(AmericanOption::new(OptionType::Call, 100.0, 0.0, "AAPL").unwrap()),
    ];

    for instrument in &instruments {
        let g = instrument.greeks(&md).unwrap();
        assert_eq!(g.price, 10.0, "{:?}", instrument.pricing_model());
        assert_eq!(g.delta, 1.0);
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.vega, 0.0);
        assert_eq!(g.theta, 0.0);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_american_put_at_least_intrinsic(
        spot in 50.0..150.0_f64,
        strike in 80.0..120.0_f64,
        expiry in 0.1..2.0_f64,
    ) {
        let put = AmericanOption::new(OptionType::Put, strike, expiry, "AAPL").unwrap();
        let value = put.price_with_inputs(ModelInputs::new(spot, 0.05, 0.2, 0.0)).unwrap();
        prop_assert!(value >= (strike - spot).max(0.0) - 1e-10);
    }

    #[test]
    fn prop_put_call_parity_with_dividends(
        spot in 50.0..150.0_f64,
        strike in 50.0..150.0_f64,
        dividend in 0.0..0.08_f64,
    ) {
        let inputs = ModelInputs::new(spot, 0.05, 0.25, dividend);
        let bs = BlackScholes::from_inputs(inputs).unwrap();
        let call = bs.price(OptionType::Call, strike, 1.0).unwrap();
        let put = bs.price(OptionType::Put, strike, 1.0).unwrap();
        let forward = spot * (-dividend).exp() - strike * (-0.05_f64).exp();
        prop_assert!((call - put - forward).abs() < 1e-8);
    }
}
