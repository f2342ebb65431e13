use chrono::NaiveDate;
use core_types::SeriesPoint;

/// The value every rebased series starts from.
pub const REBASE_VALUE: f64 = 100.0;

/// Cuts a fund's series to `[start, end]` and optionally rebases it to 100.
///
/// The output has one point per retained input point, sorted by date. When
/// rebasing, the first point is set to [`REBASE_VALUE`] for both fund and
/// benchmark and each later point compounds the raw day-over-day ratio, so
/// `rebased[t] / rebased[t-1] == raw[t] / raw[t-1]`.
///
/// A benchmark with any gap in the range is dropped entirely from a rebased
/// series: a partial index would not start at 100.
pub fn build_return_series(
    points: &[SeriesPoint],
    start: NaiveDate,
    end: NaiveDate,
    rebase: bool,
) -> Vec<SeriesPoint> {
    let mut filtered: Vec<SeriesPoint> = points
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .copied()
        .collect();
    filtered.sort_by_key(|p| p.date);

    if !rebase || filtered.is_empty() {
        return filtered;
    }

    let navs: Vec<f64> = filtered.iter().map(|p| p.nav).collect();
    let rebased_navs = rebase_values(&navs);

    let benches: Option<Vec<f64>> = filtered.iter().map(|p| p.bench).collect();
    let rebased_benches = benches.map(|values| rebase_values(&values));

    filtered
        .iter()
        .enumerate()
        .map(|(i, p)| SeriesPoint {
            date: p.date,
            nav: rebased_navs[i],
            bench: rebased_benches.as_ref().map(|values| values[i]),
        })
        .collect()
}

/// Compounds day-over-day ratios starting from [`REBASE_VALUE`].
fn rebase_values(raw: &[f64]) -> Vec<f64> {
    let mut rebased = Vec::with_capacity(raw.len());
    let mut level = REBASE_VALUE;
    for (i, value) in raw.iter().enumerate() {
        if i > 0 {
            let previous = raw[i - 1];
            let ratio = value / previous;
            if previous > 0.0 && ratio.is_finite() {
                level *= ratio;
            } else {
                tracing::debug!(previous, value, "Undefined daily ratio, carrying the rebased level forward.");
            }
        }
        rebased.push(level);
    }
    rebased
}

/// Simple daily returns `v[t] / v[t-1] - 1`; pairs that give a non-finite
/// return (a zero or missing basis) are skipped.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect()
}
