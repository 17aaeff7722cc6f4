//! Contract term validation shared by instruments and models.

use super::error::InstrumentError;

/// Lattice steps used when none are specified.
pub const DEFAULT_BINOMIAL_STEPS: usize = 100;

/// Upper bound on lattice steps.
pub const MAX_BINOMIAL_STEPS: usize = 10_000;

/// Strike must be positive and finite.
#[inline]
pub fn validate_strike(strike: f64) -> Result<(), InstrumentError> {
    if strike.is_finite() && strike > 0.0 {
        Ok(())
    } else {
        Err(InstrumentError::InvalidStrike { strike })
    }
}

/// Time to expiry must be non-negative and finite. Zero means expired.
#[inline]
pub fn validate_expiry(expiry: f64) -> Result<(), InstrumentError> {
    if expiry.is_finite() && expiry >= 0.0 {
        Ok(())
    } else {
        Err(InstrumentError::InvalidExpiry { expiry })
    }
}

/// Lattice steps must lie in `[1, MAX_BINOMIAL_STEPS]`.
#[inline]
pub fn validate_steps(steps: usize) -> Result<(), InstrumentError> {
    if (1..=MAX_BINOMIAL_STEPS).contains(&steps) {
        Ok(())
    } else {
        Err(InstrumentError::InvalidSteps { steps })
    }
}

/// Validates strike and expiry together.
#[inline]
pub fn validate_terms(strike: f64, expiry: f64) -> Result<(), InstrumentError> {
    validate_strike(strike)?;
    validate_expiry(expiry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_bounds() {
        assert!(validate_strike(100.0).is_ok());
        assert!(validate_strike(0.0).is_err());
        assert!(validate_strike(-1.0).is_err());
        assert!(validate_strike(f64::NAN).is_err());
    }

    #[test]
    fn test_expiry_bounds() {
        assert!(validate_expiry(0.0).is_ok());
        assert!(validate_expiry(2.5).is_ok());
        assert!(validate_expiry(-0.01).is_err());
        assert!(validate_expiry(f64::INFINITY).is_err());
    }

    #[test]
    fn test_steps_bounds() {
        assert!(validate_steps(1).is_ok());
        assert!(validate_steps(MAX_BINOMIAL_STEPS).is_ok());
        assert!(validate_steps(0).is_err());
        assert!(validate_steps(MAX_BINOMIAL_STEPS + 1).is_err());
    }
}
