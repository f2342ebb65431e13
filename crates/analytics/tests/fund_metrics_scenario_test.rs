//! End-to-end checks: raw series → return series → period metrics.

use analytics::{build_return_series, MetricsEngine, REBASE_VALUE};
use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use core_types::{LookbackWindow, SeriesPoint};

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date")
}

/// Ten daily points, NAV rising linearly from 100 to 110, benchmark flat at 100.
fn linear_series() -> Vec<SeriesPoint> {
    (0u32..10)
        .map(|i| {
            let nav = 100.0 + f64::from(i) * 10.0 / 9.0;
            SeriesPoint::new(first_day() + Days::new(u64::from(i)), nav, Some(100.0))
        })
        .collect()
}

#[test]
fn ytd_window_over_linear_series() {
    let series = linear_series();
    let last_day = series.last().expect("non-empty").date;

    for rebase in [false, true] {
        let returns = build_return_series(&series, first_day(), last_day, rebase);
        assert_eq!(returns.len(), 10);

        let metrics = MetricsEngine::new()
            .calculate(&returns, &[LookbackWindow::year_to_date()])
            .expect("sorted series");
        let ytd = &metrics[0];

        assert_eq!(ytd.label, "YTD");
        assert_relative_eq!(ytd.fund_performance.expect("fund"), 10.0, epsilon = 1e-9);
        assert_relative_eq!(ytd.bench_performance.expect("bench"), 0.0, epsilon = 1e-12);
        assert_relative_eq!(ytd.excess_return.expect("excess"), 10.0, epsilon = 1e-9);
        assert_eq!(ytd.bench_volatility, Some(0.0));
        assert!(ytd.fund_volatility.expect("fund vol") > 0.0);
    }
}

#[test]
fn windows_are_anchored_on_each_funds_own_last_date() {
    // Fund A ends in 2024, fund B a year earlier; both have two years of data.
    let make = |end_year: i32| -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(end_year - 2, 1, 1).expect("valid date");
        (0..=730)
            .map(|i| SeriesPoint::new(start + Days::new(i), 100.0 + i as f64 * 0.01, None))
            .collect()
    };
    let a = make(2024);
    let b = make(2023);

    let engine = MetricsEngine::new();
    let window = [LookbackWindow::years(1)];
    let metrics_a = engine.calculate(&a, &window).expect("sorted");
    let metrics_b = engine.calculate(&b, &window).expect("sorted");

    // Same shape of data relative to each fund's last date, so both windows are populated.
    assert!(metrics_a[0].fund_performance.is_some());
    assert!(metrics_b[0].fund_performance.is_some());
}

#[test]
fn rebased_series_feeds_the_same_ratios_to_the_engine() {
    let series = linear_series();
    let last_day = series.last().expect("non-empty").date;
    let start = first_day() + Days::new(3);

    let rebased = build_return_series(&series, start, last_day, true);
    assert_eq!(rebased[0].nav, REBASE_VALUE);
    assert_eq!(rebased[0].date, start);

    let raw = build_return_series(&series, start, last_day, false);
    let engine = MetricsEngine::new();
    let windows = [LookbackWindow::year_to_date(), LookbackWindow::years(3)];
    let from_raw = engine.calculate(&raw, &windows).expect("sorted");
    let from_rebased = engine.calculate(&rebased, &windows).expect("sorted");

    for (r, b) in from_raw.iter().zip(&from_rebased) {
        assert_relative_eq!(
            r.fund_volatility.expect("raw vol"),
            b.fund_volatility.expect("rebased vol"),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            r.fund_performance.expect("raw perf"),
            b.fund_performance.expect("rebased perf"),
            max_relative = 1e-9
        );
    }
}
