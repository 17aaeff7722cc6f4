//! Jump-diffusion pricing models.
//!
//! - [`MertonJumpDiffusion`]: Poisson-weighted mixture of Black-Scholes
//!   prices with lognormal jumps

pub mod merton;

pub use merton::{poisson_probability, JumpParameters, MertonJumpDiffusion};
