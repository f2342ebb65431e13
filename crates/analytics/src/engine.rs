use crate::error::AnalyticsError;
use crate::report::PeriodMetricSet;
use crate::series::daily_returns;
use chrono::NaiveDate;
use core_types::{LookbackWindow, ReturnBasis, SeriesPoint};

/// Trading days used to annualize daily figures.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A stateless calculator for deriving windowed metrics from a NAV series.
///
/// The engine holds no state, so one instance can serve every fund and
/// every window of a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating period metrics.
    ///
    /// # Arguments
    ///
    /// * `series` - The fund's series, sorted by strictly increasing date.
    ///   It may be raw or rebased; ratios are the same either way.
    /// * `windows` - The lookback windows to evaluate. Each is anchored on the
    ///   last date of `series`.
    ///
    /// # Returns
    ///
    /// One `PeriodMetricSet` per window, in window order. An empty series
    /// gives a set of unavailable figures per window.
    #[tracing::instrument(name = "metrics_calculate", skip_all, fields(points = series.len(), windows = windows.len()))]
    pub fn calculate(
        &self,
        series: &[SeriesPoint],
        windows: &[LookbackWindow],
    ) -> Result<Vec<PeriodMetricSet>, AnalyticsError> {
        ensure_sorted(series)?;

        let Some(last) = series.last() else {
            return Ok(windows
                .iter()
                .map(|w| PeriodMetricSet::not_available(w.label.clone()))
                .collect());
        };

        windows
            .iter()
            .map(|window| self.calculate_window(series, last.date, window))
            .collect()
    }

    /// Calculates one window. `series` is already known to be sorted.
    fn calculate_window(
        &self,
        series: &[SeriesPoint],
        last_date: NaiveDate,
        window: &LookbackWindow,
    ) -> Result<PeriodMetricSet, AnalyticsError> {
        let start = window
            .anchor
            .start_date(last_date)
            .map_err(|source| AnalyticsError::Window {
                label: window.label.clone(),
                source,
            })?;

        let period = &series[series.partition_point(|p| p.date < start)..];
        if period.len() < 2 {
            tracing::debug!(window = %window.label, %start, points = period.len(), "Not enough observations in window.");
            return Ok(PeriodMetricSet::not_available(window.label.clone()));
        }

        // Short windows count as one full year so annualizing never inflates them.
        let years = (period.len() as f64 / TRADING_DAYS_PER_YEAR).max(1.0);

        let navs: Vec<f64> = period.iter().map(|p| p.nav).collect();
        // The benchmark side is only usable when every point in the window has a value.
        let benches: Option<Vec<f64>> = period.iter().map(|p| p.bench).collect();

        // --- Volatility ---
        let fund_volatility = annualized_volatility(&navs);
        let bench_volatility = benches.as_deref().and_then(annualized_volatility);
        let tracking_error = match (fund_volatility, bench_volatility) {
            (Some(fund), Some(bench)) => Some(fund - bench),
            _ => None,
        };

        // --- Performance ---
        let fund_performance = performance(&navs, window.basis, years);
        let bench_performance = benches
            .as_deref()
            .map(|values| performance(values, window.basis, years));
        let excess_return = bench_performance.map(|bench| fund_performance - bench);

        // --- Sharpe Ratio ---
        // Always from the annualized return, even for total-return windows.
        let annualized_return = performance(&navs, ReturnBasis::Annualized, years);
        let sharpe_ratio = fund_volatility.map(|vol| sharpe_ratio(annualized_return, vol));

        Ok(PeriodMetricSet {
            label: window.label.clone(),
            fund_volatility,
            bench_volatility,
            tracking_error,
            fund_performance: Some(fund_performance),
            bench_performance,
            excess_return,
            sharpe_ratio,
        })
    }
}

fn ensure_sorted(series: &[SeriesPoint]) -> Result<(), AnalyticsError> {
    match series.windows(2).find(|w| w[1].date <= w[0].date) {
        Some(w) => Err(AnalyticsError::UnsortedSeries {
            previous: w[0].date,
            found: w[1].date,
        }),
        None => Ok(()),
    }
}

/// Sample standard deviation of daily returns, annualized, in percent.
///
/// `None` with fewer than two usable daily returns.
pub fn annualized_volatility(values: &[f64]) -> Option<f64> {
    let returns = daily_returns(values);
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);

    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}

/// Return from the first to the last value, in percent.
///
/// A non-positive first or last value gives 0 rather than "not available".
pub fn performance(values: &[f64], basis: ReturnBasis, years: f64) -> f64 {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return 0.0;
    };
    if !(first > 0.0 && last > 0.0) {
        tracing::debug!(first, last, "Non-positive basis value, performance set to zero.");
        return 0.0;
    }

    let growth = last / first;
    match basis {
        ReturnBasis::Total => (growth - 1.0) * 100.0,
        ReturnBasis::Annualized => (growth.powf(1.0 / years) - 1.0) * 100.0,
    }
}

/// Annualized return over annualized volatility, both given in percent.
///
/// Zero volatility gives a ratio of 0.
pub fn sharpe_ratio(annualized_return_pct: f64, volatility_pct: f64) -> f64 {
    if volatility_pct == 0.0 {
        return 0.0;
    }
    (annualized_return_pct / 100.0) / (volatility_pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Days;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn series(navs: &[f64], benches: &[Option<f64>]) -> Vec<SeriesPoint> {
        navs.iter()
            .zip(benches)
            .enumerate()
            .map(|(i, (&nav, &bench))| SeriesPoint::new(start() + Days::new(i as u64), nav, bench))
            .collect()
    }

    #[test]
    fn single_point_window_is_entirely_unavailable() {
        let points = vec![
            SeriesPoint::new(NaiveDate::from_ymd_opt(2023, 12, 28).unwrap(), 100.0, Some(100.0)),
            SeriesPoint::new(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(), 101.0, Some(100.0)),
            SeriesPoint::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 102.0, Some(101.0)),
        ];
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap();
        assert_eq!(out[0], PeriodMetricSet::not_available("YTD"));
        assert!(!out[0].is_available());
    }

    #[test]
    fn empty_series_gives_unavailable_sets() {
        let windows = [LookbackWindow::year_to_date(), LookbackWindow::years(3)];
        let out = MetricsEngine::new().calculate(&[], &windows).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], PeriodMetricSet::not_available("3Y"));
    }

    #[test]
    fn zero_volatility_gives_zero_sharpe() {
        // Doubling every day: identical returns, so the sample stddev is exactly 0.
        let points = series(&[100.0, 200.0, 400.0, 800.0], &[Some(1.0); 4]);
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap();
        assert_eq!(out[0].fund_volatility, Some(0.0));
        assert_eq!(out[0].fund_performance, Some(700.0));
        assert_eq!(out[0].sharpe_ratio, Some(0.0));
    }

    #[test]
    fn tracking_error_is_signed_volatility_difference() {
        let points = series(
            &[100.0, 103.0, 98.0, 104.0, 101.0],
            &[Some(100.0), Some(100.5), Some(100.2), Some(100.9), Some(100.4)],
        );
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::years(1)])
            .unwrap();
        let set = &out[0];
        let fund = set.fund_volatility.unwrap();
        let bench = set.bench_volatility.unwrap();
        assert!(fund > bench);
        assert_eq!(set.tracking_error, Some(fund - bench));
    }

    #[test]
    fn non_positive_basis_falls_back_to_zero_performance() {
        let points = series(&[0.0, 10.0, 12.0], &[Some(100.0), Some(101.0), Some(-5.0)]);
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap();
        let set = &out[0];
        assert_eq!(set.fund_performance, Some(0.0));
        assert_eq!(set.bench_performance, Some(0.0));
        assert_eq!(set.excess_return, Some(0.0));
        // Only one finite fund return remains, not enough for a volatility.
        assert_eq!(set.fund_volatility, None);
        assert_eq!(set.sharpe_ratio, None);
    }

    #[test]
    fn missing_benchmark_only_blanks_the_benchmark_side() {
        let points = series(&[100.0, 101.0, 99.0, 102.0], &[Some(50.0), None, Some(51.0), Some(52.0)]);
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap();
        let set = &out[0];
        assert!(set.fund_volatility.is_some());
        assert!(set.fund_performance.is_some());
        assert_eq!(set.bench_volatility, None);
        assert_eq!(set.bench_performance, None);
        assert_eq!(set.tracking_error, None);
        assert_eq!(set.excess_return, None);
    }

    #[test]
    fn annualized_window_uses_year_count_above_one() {
        // 504 points is two years of trading days.
        let navs: Vec<f64> = (0..504).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
        let points: Vec<SeriesPoint> = navs
            .iter()
            .enumerate()
            .map(|(i, &nav)| SeriesPoint::new(start() + Days::new(i as u64), nav, None))
            .collect();
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::years(5)])
            .unwrap();

        let growth = navs[503] / navs[0];
        let expected = (growth.powf(0.5) - 1.0) * 100.0;
        assert_relative_eq!(out[0].fund_performance.unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn sharpe_uses_annualized_return_for_total_windows() {
        let points = series(&[100.0, 104.0, 101.0, 108.0], &[None; 4]);
        let out = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap();
        let set = &out[0];
        let vol = set.fund_volatility.unwrap();
        // With fewer than 252 points one year is assumed, so both returns match here.
        let annualized = performance(&[100.0, 108.0], ReturnBasis::Annualized, 1.0);
        assert_relative_eq!(set.sharpe_ratio.unwrap(), annualized / vol, max_relative = 1e-12);
    }

    #[test]
    fn unsorted_series_is_rejected() {
        let mut points = series(&[100.0, 101.0, 102.0], &[None; 3]);
        points.swap(0, 2);
        let err = MetricsEngine::new()
            .calculate(&points, &[LookbackWindow::year_to_date()])
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::UnsortedSeries { .. }));
    }

    #[test]
    fn performance_bases() {
        assert_relative_eq!(performance(&[100.0, 121.0], ReturnBasis::Total, 2.0), 21.0, epsilon = 1e-9);
        assert_relative_eq!(performance(&[100.0, 121.0], ReturnBasis::Annualized, 2.0), 10.0, epsilon = 1e-9);
        assert_eq!(performance(&[-1.0, 121.0], ReturnBasis::Total, 1.0), 0.0);
    }
}
