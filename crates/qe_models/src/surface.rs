//! Scattered implied volatility surface.
//!
//! Stores quoted (strike, expiry, vol) points and answers nearest-neighbour
//! lookups, smile skew at an expiry and term-structure slope at a strike.

use qe_core::types::{PricingError, PricingResult};

const SUBJECT: &str = "vol surface";

/// Upper bound accepted for a quoted volatility.
pub const MAX_SURFACE_VOLATILITY: f64 = 10.0;

/// Absolute expiry tolerance used to select a smile slice.
pub const EXPIRY_TOLERANCE: f64 = 0.01;

/// Relative strike tolerance used to select a term-structure slice.
pub const STRIKE_TOLERANCE: f64 = 0.01;

/// One quoted implied volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolPoint {
    /// Strike price.
    pub strike: f64,
    /// Expiry in years.
    pub expiry: f64,
    /// Implied volatility.
    pub volatility: f64,
}

/// Implied volatility surface over scattered quotes.
///
/// # Examples
/// ```
/// use qe_models::surface::ImpliedVolSurface;
///
/// let mut surface = ImpliedVolSurface::new();
/// surface.add_point(90.0, 1.0, 0.25).unwrap();
/// surface.add_point(110.0, 1.0, 0.18).unwrap();
///
/// assert_eq!(surface.interpolate(95.0, 1.0).unwrap(), 0.25);
/// assert!(surface.skew(1.0) < 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolSurface {
    points: Vec<VolPoint>,
}

impl ImpliedVolSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quote.
    ///
    /// # Errors
    /// `Validation` unless strike > 0, expiry > 0 and vol ∈ [0, 10], all
    /// finite.
    pub fn add_point(&mut self, strike: f64, expiry: f64, volatility: f64) -> PricingResult<()> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(PricingError::validation(
                SUBJECT,
                "strike",
                format!("must be positive, got {}", strike),
            ));
        }
        if !(expiry.is_finite() && expiry > 0.0) {
            return Err(PricingError::validation(
                SUBJECT,
                "expiry",
                format!("must be positive, got {}", expiry),
            ));
        }
        if !(0.0..=MAX_SURFACE_VOLATILITY).contains(&volatility) {
            return Err(PricingError::validation(
                SUBJECT,
                "volatility",
                format!("must lie in [0, {}], got {}", MAX_SURFACE_VOLATILITY, volatility),
            ));
        }
        self.points.push(VolPoint {
            strike,
            expiry,
            volatility,
        });
        Ok(())
    }

    /// All quotes in insertion order.
    pub fn points(&self) -> &[VolPoint] {
        &self.points
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no quotes have been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Volatility of the quote nearest to (strike, expiry) in Euclidean
    /// distance. Ties go to the earlier quote.
    ///
    /// # Errors
    /// `Validation` if the surface is empty.
    pub fn interpolate(&self, strike: f64, expiry: f64) -> PricingResult<f64> {
        let distance = |p: &VolPoint| {
            let dk = p.strike - strike;
            let dt = p.expiry - expiry;
            dk * dk + dt * dt
        };

        self.points
            .iter()
            .fold(None::<(&VolPoint, f64)>, |best, p| {
                let d = distance(p);
                match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((p, d)),
                }
            })
            .map(|(p, _)| p.volatility)
            .ok_or_else(|| PricingError::validation(SUBJECT, "points", "surface is empty"))
    }

    /// Smile slope at `expiry`: (vol at highest strike − vol at lowest
    /// strike) / strike range, over quotes within 0.01 years.
    ///
    /// Zero with fewer than two quotes or a degenerate strike range.
    pub fn skew(&self, expiry: f64) -> f64 {
        let slice: Vec<&VolPoint> = self
            .points
            .iter()
            .filter(|p| (p.expiry - expiry).abs() < EXPIRY_TOLERANCE)
            .collect();
        slope(&slice, |p| p.strike)
    }

    /// Term-structure slope at `strike`: (long vol − short vol) / expiry
    /// range, over quotes within 1% of the strike.
    ///
    /// Zero with fewer than two quotes or a degenerate expiry range.
    pub fn term_structure(&self, strike: f64) -> f64 {
        let slice: Vec<&VolPoint> = self
            .points
            .iter()
            .filter(|p| (p.strike - strike).abs() < STRIKE_TOLERANCE * strike)
            .collect();
        slope(&slice, |p| p.expiry)
    }
}

/// Slope of volatility between the points with the smallest and largest
/// `axis` value.
fn slope(slice: &[&VolPoint], axis: impl Fn(&VolPoint) -> f64) -> f64 {
    if slice.len() < 2 {
        return 0.0;
    }
    let by_axis = |a: &&&VolPoint, b: &&&VolPoint| axis(a).total_cmp(&axis(b));
    let (Some(low), Some(high)) = (slice.iter().min_by(by_axis), slice.iter().max_by(by_axis))
    else {
        return 0.0;
    };
    let range = axis(high) - axis(low);
    if range <= 0.0 {
        return 0.0;
    }
    (high.volatility - low.volatility) / range
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> ImpliedVolSurface {
        let mut s = ImpliedVolSurface::new();
        for (k, t, v) in [
            (90.0, 0.5, 0.24),
            (100.0, 0.5, 0.20),
            (110.0, 0.5, 0.18),
            (100.0, 1.0, 0.22),
            (100.0, 2.0, 0.25),
        ] {
            s.add_point(k, t, v).unwrap();
        }
        s
    }

    #[test]
    fn test_add_point_validation() {
        let mut s = ImpliedVolSurface::new();
        assert!(s.add_point(0.0, 1.0, 0.2).unwrap_err().is_validation());
        assert!(s.add_point(100.0, 0.0, 0.2).is_err());
        assert!(s.add_point(100.0, 1.0, -0.01).is_err());
        assert!(s.add_point(100.0, 1.0, 10.5).is_err());
        assert!(s.add_point(100.0, 1.0, f64::NAN).is_err());
        assert!(s.is_empty());

        s.add_point(100.0, 1.0, 10.0).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_interpolate_empty_fails() {
        let err = ImpliedVolSurface::new().interpolate(100.0, 1.0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_interpolate_nearest_neighbour() {
        let s = sample();
        assert_eq!(s.interpolate(100.0, 0.5).unwrap(), 0.20);
        assert_eq!(s.interpolate(108.0, 0.6).unwrap(), 0.18);
        assert_eq!(s.interpolate(100.0, 1.8).unwrap(), 0.25);
    }

    #[test]
    fn test_skew_uses_extreme_strikes() {
        let s = sample();
        assert_relative_eq!(s.skew(0.5), (0.18 - 0.24) / 20.0, epsilon = 1e-12);
        assert_relative_eq!(s.skew(0.505), (0.18 - 0.24) / 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_skew_needs_two_points() {
        let s = sample();
        assert_eq!(s.skew(1.0), 0.0);
        assert_eq!(s.skew(3.0), 0.0);
    }

    #[test]
    fn test_term_structure_uses_extreme_expiries() {
        let s = sample();
        assert_relative_eq!(s.term_structure(100.0), (0.25 - 0.20) / 1.5, epsilon = 1e-12);
        assert_relative_eq!(s.term_structure(100.5), (0.25 - 0.20) / 1.5, epsilon = 1e-12);
        assert_eq!(s.term_structure(90.0), 0.0);
    }

    #[test]
    fn test_degenerate_range_is_zero() {
        let mut s = ImpliedVolSurface::new();
        s.add_point(100.0, 1.0, 0.2).unwrap();
        s.add_point(100.0, 1.0, 0.3).unwrap();
        assert_eq!(s.skew(1.0), 0.0);
        assert_eq!(s.term_structure(100.0), 0.0);
    }
}
