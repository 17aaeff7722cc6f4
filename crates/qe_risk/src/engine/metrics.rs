//! Tail risk metrics on a sorted P&L sample.
//!
//! All functions expect `sorted_pnl` in ascending order (worst loss first)
//! and report losses as positive numbers.
//!
//! | Metric | Definition |
//! |--------|------------|
//! | index  | ⌊(1 − q)·N⌋, clamped to N − 1 |
//! | VaR_q  | −pnl\[index\] |
//! | ES_q   | −mean(pnl\[0..=index\]) |

/// VaR and ES at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TailMetrics {
    /// Confidence level q.
    pub confidence: f64,
    /// Value at risk.
    pub value_at_risk: f64,
    /// Expected shortfall.
    pub expected_shortfall: f64,
}

/// Position of the q-quantile loss in a sample of `n`.
#[inline]
pub fn tail_index(n: usize, confidence: f64) -> usize {
    let raw = ((1.0 - confidence) * n as f64).floor();
    (raw.max(0.0) as usize).min(n.saturating_sub(1))
}

/// Value at risk. Zero for an empty sample.
///
/// # Examples
/// ```
/// use qe_risk::engine::metrics::value_at_risk;
///
/// let pnl: Vec<f64> = (0..100).map(|i| i as f64 - 50.0).collect();
/// assert_eq!(value_at_risk(&pnl, 0.95), 45.0);
/// ```
pub fn value_at_risk(sorted_pnl: &[f64], confidence: f64) -> f64 {
    if sorted_pnl.is_empty() {
        return 0.0;
    }
    -sorted_pnl[tail_index(sorted_pnl.len(), confidence)]
}

/// Expected shortfall: mean loss at or beyond the VaR index. Zero for an
/// empty sample.
pub fn expected_shortfall(sorted_pnl: &[f64], confidence: f64) -> f64 {
    if sorted_pnl.is_empty() {
        return 0.0;
    }
    let tail = &sorted_pnl[..=tail_index(sorted_pnl.len(), confidence)];
    -tail.iter().sum::<f64>() / tail.len() as f64
}

/// VaR and ES together.
pub fn tail_metrics(sorted_pnl: &[f64], confidence: f64) -> TailMetrics {
    TailMetrics {
        confidence,
        value_at_risk: value_at_risk(sorted_pnl, confidence),
        expected_shortfall: expected_shortfall(sorted_pnl, confidence),
    }
}
