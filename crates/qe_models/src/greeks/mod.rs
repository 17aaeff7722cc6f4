//! Greeks container and finite-difference sensitivities.
//!
//! - [`Greeks`]: price plus the five sensitivities aggregated by the risk
//!   engine
//! - [`finite_difference`]: bump-and-reprice Greeks for models without
//!   closed-form sensitivities

pub mod finite_difference;

use crate::instruments::OptionType;

/// Price and first/second order sensitivities of one instrument unit.
///
/// Units:
/// - `delta`: ∂V/∂S
/// - `gamma`: ∂²V/∂S²
/// - `vega`: ∂V/∂σ per unit of volatility (1.0 = 100 vol points)
/// - `theta`: value change per calendar day (1/365 year)
///
/// # Examples
/// ```
/// use qe_models::greeks::Greeks;
///
/// let unit = Greeks { price: 10.0, delta: 0.5, gamma: 0.02, vega: 37.0, theta: -0.017 };
/// let book = unit.scale(-3.0);
/// assert_eq!(book.delta, -1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// Present value.
    pub price: f64,
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ.
    pub vega: f64,
    /// Per-day time decay.
    pub theta: f64,
}

impl Greeks {
    /// Boundary values for an expired or zero-volatility option.
    ///
    /// Price is the intrinsic value, delta the payoff indicator, and
    /// gamma, vega and theta are zero.
    #[inline]
    pub fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> Self {
        Self {
            price: option_type.intrinsic(spot, strike),
            delta: option_type.intrinsic_delta(spot, strike),
            gamma: 0.0,
            vega: 0.0,
            theta: 0.0,
        }
    }

    /// Multiplies every field by `factor` (e.g. a position quantity).
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            price: self.price * factor,
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            vega: self.vega * factor,
            theta: self.theta * factor,
        }
    }

    /// Returns the name of the first non-finite field, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("price", self.price),
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("vega", self.vega),
            ("theta", self.theta),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}

impl std::ops::Add for Greeks {
    type Output = Greeks;

    fn add(self, rhs: Greeks) -> Greeks {
        Greeks {
            price: self.price + rhs.price,
            delta: self.delta + rhs.delta,
            gamma: self.gamma + rhs.gamma,
            vega: self.vega + rhs.vega,
            theta: self.theta + rhs.theta,
        }
    }
}

impl std::ops::AddAssign for Greeks {
    fn add_assign(&mut self, rhs: Greeks) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_boundary() {
        let g = Greeks::intrinsic(OptionType::Put, 90.0, 100.0);
        assert_eq!(g.price, 10.0);
        assert_eq!(g.delta, -1.0);
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.vega, 0.0);
        assert_eq!(g.theta, 0.0);
    }

    #[test]
    fn test_add_assign() {
        let mut total = Greeks::default();
        total += Greeks {
            price: 1.0,
            delta: 0.5,
            gamma: 0.1,
            vega: 2.0,
            theta: -0.1,
        };
        total += Greeks {
            price: 2.0,
            delta: -0.25,
            gamma: 0.1,
            vega: 1.0,
            theta: -0.2,
        };
        assert_eq!(total.price, 3.0);
        assert_eq!(total.delta, 0.25);
        assert_eq!(total.vega, 3.0);
    }

    #[test]
    fn test_first_non_finite() {
        let mut g = Greeks::default();
        assert_eq!(g.first_non_finite(), None);
        g.vega = f64::NAN;
        assert_eq!(g.first_non_finite(), Some("vega"));
        g.delta = f64::INFINITY;
        assert_eq!(g.first_non_finite(), Some("delta"));
    }
}
