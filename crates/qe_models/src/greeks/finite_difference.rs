//! Bump-and-reprice Greeks.
//!
//! Used by the lattice and jump-diffusion models, which have no closed-form
//! sensitivities. Each function takes a pricer `V(inputs, expiry)` and the
//! base point.
//!
//! | Greek | Bump | Formula |
//! |-------|------|---------|
//! | delta | h = 1% of S | (V(S+h) − V(S−h)) / 2h |
//! | gamma | h = 1% of S | (V(S+h) − 2V(S) + V(S−h)) / h² |
//! | vega  | 0.01, down leg floored at 0 | (V(σ+) − V(σ−)) / (σ+ − σ−) |
//! | theta | 1/365 | V(T − 1/365) − V(T), 0 if T < 1/365 |

use qe_core::market_data::ModelInputs;
use qe_core::types::PricingResult;

use super::Greeks;

/// Relative spot bump for delta and gamma.
pub const SPOT_BUMP_FRACTION: f64 = 0.01;

/// Absolute volatility bump for vega.
pub const VOL_BUMP: f64 = 0.01;

/// One calendar day in years.
pub const TIME_BUMP: f64 = 1.0 / 365.0;

/// Central-difference delta.
pub fn delta<F>(pricer: &F, inputs: ModelInputs, expiry: f64) -> PricingResult<f64>
where
    F: Fn(ModelInputs, f64) -> PricingResult<f64>,
{
    let h = inputs.spot * SPOT_BUMP_FRACTION;
    let up = pricer(inputs.with_spot(inputs.spot + h), expiry)?;
    let down = pricer(inputs.with_spot(inputs.spot - h), expiry)?;
    Ok((up - down) / (2.0 * h))
}

/// Second-difference gamma. `center` is V at the base point.
pub fn gamma<F>(pricer: &F, inputs: ModelInputs, expiry: f64, center: f64) -> PricingResult<f64>
where
    F: Fn(ModelInputs, f64) -> PricingResult<f64>,
{
    let h = inputs.spot * SPOT_BUMP_FRACTION;
    let up = pricer(inputs.with_spot(inputs.spot + h), expiry)?;
    let down = pricer(inputs.with_spot(inputs.spot - h), expiry)?;
    Ok((up - 2.0 * center + down) / (h * h))
}

/// Volatility sensitivity, divided by the actual bump width.
pub fn vega<F>(pricer: &F, inputs: ModelInputs, expiry: f64) -> PricingResult<f64>
where
    F: Fn(ModelInputs, f64) -> PricingResult<f64>,
{
    let vol_up = inputs.volatility + VOL_BUMP;
    let vol_down = (inputs.volatility - VOL_BUMP).max(0.0);
    let up = pricer(inputs.with_volatility(vol_up), expiry)?;
    let down = pricer(inputs.with_volatility(vol_down), expiry)?;
    Ok((up - down) / (vol_up - vol_down))
}

/// One-day time decay. `center` is V at the base point.
pub fn theta<F>(pricer: &F, inputs: ModelInputs, expiry: f64, center: f64) -> PricingResult<f64>
where
    F: Fn(ModelInputs, f64) -> PricingResult<f64>,
{
    if expiry < TIME_BUMP {
        return Ok(0.0);
    }
    let later = pricer(inputs, (expiry - TIME_BUMP).max(0.0))?;
    Ok(later - center)
}

/// Computes price and all four sensitivities, sharing the base price.
///
/// Callers handle their own boundary cases (expired or zero-volatility
/// inputs) before calling this.
pub fn greeks<F>(pricer: &F, inputs: ModelInputs, expiry: f64) -> PricingResult<Greeks>
where
    F: Fn(ModelInputs, f64) -> PricingResult<f64>,
{
    let price = pricer(inputs, expiry)?;
    Ok(Greeks {
        price,
        delta: delta(pricer, inputs, expiry)?,
        gamma: gamma(pricer, inputs, expiry, price)?,
        vega: vega(pricer, inputs, expiry)?,
        theta: theta(pricer, inputs, expiry, price)?,
    })
}
