//! # FundLens Analytics Engine
//!
//! This crate turns raw fund data into the figures the reports display.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or configuration. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless calculator. It takes
//!   a sorted NAV/benchmark series and a set of lookback windows and produces one
//!   `PeriodMetricSet` per window.
//! - **Silent degradation:** Unreadable values and thin windows become `None`, never
//!   errors. `AnalyticsError` is reserved for caller mistakes such as an unsorted series.
//!
//! ## Public API
//!
//! - `parse_size`, `parse_fee`, `revenue`: normalisation of the reference table's raw text.
//! - `build_return_series`: date-range filtering and rebasing to 100.
//! - `MetricsEngine` / `PeriodMetricSet`: windowed volatility, performance,
//!   tracking error, excess return and Sharpe ratio.
//! - `build_comparison` / `group_by_classification`: the cross-fund table.

// Declare the modules that constitute this crate.
pub mod comparison;
pub mod engine;
pub mod error;
pub mod parsers;
pub mod report;
pub mod revenue;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use comparison::{
    build_comparison, group_by_classification, ComparisonGroup, ComparisonRow, WindowComparison,
};
pub use engine::{MetricsEngine, TRADING_DAYS_PER_YEAR};
pub use error::AnalyticsError;
pub use parsers::{parse_fee, parse_size, RawValue};
pub use report::PeriodMetricSet;
pub use revenue::revenue;
pub use series::{build_return_series, daily_returns, REBASE_VALUE};
