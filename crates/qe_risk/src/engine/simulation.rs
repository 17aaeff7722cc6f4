//! One-step GBM revaluation of the portfolio.
//!
//! Each path draws one independent standard normal per distinct asset,
//! moves every spot over the horizon
//!
//! S_T = S · exp((r − q − σ²/2)·dt + σ·√dt·z)
//!
//! and reprices every position with its own model. Paths are generated in
//! chunks; chunk `i` uses the stream seeded by `derive_stream_seed(seed, i)`.

use qe_core::market_data::ModelInputs;
use qe_core::types::{PricingError, PricingResult};
use qe_models::instruments::Instrument;

use crate::parallel::{map_chunks, ParallelConfig};
use crate::rng::{derive_stream_seed, RiskRng};

/// Market state of one simulated asset.
#[derive(Debug, Clone)]
pub(crate) struct SimulatedAsset<'a> {
    pub asset_id: &'a str,
    pub inputs: ModelInputs,
}

/// A position resolved against its asset slot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulatedPosition<'a> {
    pub instrument: &'a Instrument,
    pub asset: usize,
    pub quantity: f64,
}

/// Everything the path loop reads. Borrowed, never mutated.
#[derive(Debug)]
pub(crate) struct SimulationPlan<'a> {
    pub assets: Vec<SimulatedAsset<'a>>,
    pub positions: Vec<SimulatedPosition<'a>>,
    pub initial_value: f64,
    pub horizon_years: f64,
}

/// Unsorted P&L sample and RNG usage.
#[derive(Debug)]
pub(crate) struct SimulationOutput {
    pub pnl: Vec<f64>,
    pub normal_draws: u64,
}

impl SimulationPlan<'_> {
    /// Simulates `paths` P&L outcomes.
    ///
    /// # Errors
    /// `Numerical` for a non-finite or non-positive simulated spot or a
    /// non-finite portfolio value; any pricing error from repricing.
    pub fn run(
        &self,
        paths: usize,
        seed: u64,
        parallel: &ParallelConfig,
    ) -> PricingResult<SimulationOutput> {
        let dt = self.horizon_years;
        let sqrt_dt = dt.sqrt();
        let moves: Vec<(f64, f64)> = self
            .assets
            .iter()
            .map(|a| {
                let vol = a.inputs.volatility;
                (
                    (a.inputs.rate - a.inputs.dividend_yield - 0.5 * vol * vol) * dt,
                    vol * sqrt_dt,
                )
            })
            .collect();

        let chunks = map_chunks(parallel, paths, |chunk, _start, len| -> PricingResult<_> {
            let mut rng = RiskRng::from_seed(derive_stream_seed(seed, chunk as u64));
            let mut shocks = vec![0.0; self.assets.len()];
            let mut shocked: Vec<ModelInputs> = self.assets.iter().map(|a| a.inputs).collect();
            let mut pnl = Vec::with_capacity(len);

            for _ in 0..len {
                rng.fill_normal(&mut shocks);
                for (slot, ((asset, &(drift, diffusion)), &z)) in shocked
                    .iter_mut()
                    .zip(self.assets.iter().zip(&moves).zip(&shocks))
                {
                    let spot = asset.inputs.spot * (drift + diffusion * z).exp();
                    if !spot.is_finite() || spot <= 0.0 {
                        return Err(PricingError::numerical(
                            asset.asset_id,
                            format!("simulated spot is invalid: {}", spot),
                        ));
                    }
                    *slot = asset.inputs.with_spot(spot);
                }

                let mut value = 0.0;
                for position in &self.positions {
                    let price = position
                        .instrument
                        .price_with_inputs(shocked[position.asset])?;
                    value += price * position.quantity;
                }
                if !value.is_finite() {
                    return Err(PricingError::numerical(
                        "portfolio",
                        format!("simulated portfolio value is not finite: {}", value),
                    ));
                }
                pnl.push(value - self.initial_value);
            }

            Ok((pnl, rng.normal_draws()))
        })?;

        let mut output = SimulationOutput {
            pnl: Vec::with_capacity(paths),
            normal_draws: 0,
        };
        for (pnl, draws) in chunks {
            output.pnl.extend(pnl);
            output.normal_draws += draws;
        }
        Ok(output)
    }
}
