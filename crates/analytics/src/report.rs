use serde::{Deserialize, Serialize};

/// The metrics of one fund over one lookback window.
///
/// Every figure is in percent except the Sharpe ratio. `None` means "not
/// available": either the window had fewer than two observations, or the
/// figure depends on a side (typically the benchmark) that is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetricSet {
    pub label: String,

    // I. Risk
    pub fund_volatility: Option<f64>,
    pub bench_volatility: Option<f64>,
    /// Fund volatility minus benchmark volatility. This is a signed
    /// difference of volatilities, not the standard deviation of excess
    /// returns that the term usually denotes.
    pub tracking_error: Option<f64>,

    // II. Performance, total or annualized according to the window basis
    pub fund_performance: Option<f64>,
    pub bench_performance: Option<f64>,
    pub excess_return: Option<f64>,

    // III. Risk-adjusted
    /// Annualized return over annualized volatility, risk-free rate zero.
    pub sharpe_ratio: Option<f64>,
}

impl PeriodMetricSet {
    /// A set where every figure is unavailable.
    pub fn not_available(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fund_volatility: None,
            bench_volatility: None,
            tracking_error: None,
            fund_performance: None,
            bench_performance: None,
            excess_return: None,
            sharpe_ratio: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.fund_volatility.is_some()
            || self.fund_performance.is_some()
            || self.sharpe_ratio.is_some()
    }
}
