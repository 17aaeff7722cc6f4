//! Portfolio of signed option positions.
//!
//! A [`Portfolio`] is an ordered list of [`Position`]s. It owns its
//! instruments: they are moved in by [`Portfolio::add`] and handed back by
//! [`Portfolio::remove`].
//!
//! Positions are addressed by index. Removing a position shifts every later
//! index down by one.
//!
//! # Examples
//!
//! ```
//! use qe_models::instruments::{EuropeanOption, Instrument, OptionType};
//! use qe_risk::portfolio::Portfolio;
//!
//! let call = EuropeanOption::new(OptionType::Call, 100.0, 1.0, "AAPL").unwrap();
//! let put = EuropeanOption::new(OptionType::Put, 95.0, 0.5, "AAPL").unwrap();
//!
//! let mut portfolio = Portfolio::new();
//! portfolio.add(Instrument::European(call), 10).unwrap();
//! portfolio.add(Instrument::European(put), -4).unwrap();
//!
//! assert_eq!(portfolio.len(), 2);
//! assert_eq!(portfolio.total_quantity("AAPL").unwrap(), 6);
//! ```

mod error;

pub use error::PortfolioError;

use qe_models::instruments::Instrument;

/// An instrument held with a signed quantity (negative = short).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// The held instrument.
    pub instrument: Instrument,
    /// Signed number of units.
    pub quantity: i64,
}

impl Position {
    /// Underlying asset id of the instrument.
    #[inline]
    pub fn asset_id(&self) -> &str {
        self.instrument.asset_id()
    }
}

/// Ordered collection of positions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    /// Creates an empty portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty portfolio with room for `capacity` positions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
        }
    }

    /// Appends a position and returns its index.
    ///
    /// Zero quantities are accepted and kept.
    ///
    /// # Errors
    /// [`PortfolioError::InvalidInstrument`] if the instrument fails
    /// validation (including an empty asset id); the portfolio is unchanged.
    pub fn add(&mut self, instrument: Instrument, quantity: i64) -> Result<usize, PortfolioError> {
        instrument
            .validate()
            .map_err(PortfolioError::InvalidInstrument)?;
        self.positions.push(Position {
            instrument,
            quantity,
        });
        Ok(self.positions.len() - 1)
    }

    /// Removes the position at `index` and returns its instrument.
    ///
    /// Later positions shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Instrument, PortfolioError> {
        self.check_index(index)?;
        Ok(self.positions.remove(index).instrument)
    }

    /// Replaces the quantity of the position at `index`.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), PortfolioError> {
        self.check_index(index)?;
        self.positions[index].quantity = quantity;
        Ok(())
    }

    /// Net quantity held in `asset_id` across all positions.
    ///
    /// Returns 0 for an asset the portfolio does not reference.
    ///
    /// # Errors
    /// [`PortfolioError::QuantityOverflow`] if the sum leaves the `i64`
    /// range.
    pub fn total_quantity(&self, asset_id: &str) -> Result<i64, PortfolioError> {
        self.positions
            .iter()
            .filter(|p| p.asset_id() == asset_id)
            .try_fold(0_i64, |acc, p| acc.checked_add(p.quantity))
            .ok_or_else(|| PortfolioError::QuantityOverflow {
                asset_id: asset_id.to_string(),
            })
    }

    /// Position at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    /// Iterates positions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    /// All positions in insertion order.
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Distinct asset ids in order of first appearance.
    pub fn asset_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for position in &self.positions {
            let id = position.asset_id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the portfolio holds no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Removes every position.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Reserves room for `additional` more positions.
    pub fn reserve(&mut self, additional: usize) {
        self.positions.reserve(additional);
    }

    fn check_index(&self, index: usize) -> Result<(), PortfolioError> {
        if index < self.positions.len() {
            Ok(())
        } else {
            Err(PortfolioError::IndexOutOfRange {
                index,
                len: self.positions.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}
