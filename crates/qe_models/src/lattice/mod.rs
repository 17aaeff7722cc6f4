//! Lattice pricing models.
//!
//! - [`BinomialTree`]: Cox-Ross-Rubinstein recombining tree with European or
//!   American exercise

pub mod binomial;

pub use binomial::BinomialTree;
