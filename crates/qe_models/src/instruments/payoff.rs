//! Option type and exercise style definitions.

use std::fmt;

/// Call or put.
///
/// # Examples
/// ```
/// use qe_models::instruments::OptionType;
///
/// assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OptionType {
    /// Right to buy: max(S - K, 0)
    Call,
    /// Right to sell: max(K - S, 0)
    Put,
}

impl OptionType {
    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Immediate exercise value at `spot`.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Delta of the payoff itself: 1{S>K} for calls, -1{S<K} for puts.
    #[inline]
    pub fn intrinsic_delta(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call if spot > strike => 1.0,
            OptionType::Put if spot < strike => -1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// When an option can be exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    European,
    /// Exercise at any time up to expiry.
    American,
}

impl ExerciseStyle {
    /// Returns true if the option may be exercised before expiry.
    #[inline]
    pub fn allows_early_exercise(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "European"),
            ExerciseStyle::American => write!(f, "American"),
        }
    }
}
