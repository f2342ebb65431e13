use crate::enums::{ReturnBasis, WindowAnchor};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the fund reference table.
///
/// Every column except the name is optional: an empty or `N/A` cell is
/// `None`, never a placeholder string. AUM and fees are kept as the raw text
/// of the source table and parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub name: String,
    pub manager: Option<String>,
    pub manager_age: Option<u32>,
    pub manager_gender: Option<String>,
    /// 1 is the best rank, 100 the worst.
    pub peer_ranking_1y: Option<u32>,
    pub peer_ranking_3y: Option<u32>,
    /// Rating out of 5.
    pub rating: Option<f64>,
    pub fees: Option<String>,
    pub aum: Option<String>,
    pub esg_label: Option<String>,
    /// Environmental sub-score, lower is better.
    pub e_score: Option<f64>,
    pub fund_type: Option<String>,
    pub sub_type: Option<String>,
    pub benchmark_name: Option<String>,
    pub benchmark_start: Option<NaiveDate>,
    /// File name of the daily series, relative to the series directory.
    pub series_file: Option<String>,
}

impl FundRecord {
    /// Creates a record with only a name. Useful as a base for builders and tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager: None,
            manager_age: None,
            manager_gender: None,
            peer_ranking_1y: None,
            peer_ranking_3y: None,
            rating: None,
            fees: None,
            aum: None,
            esg_label: None,
            e_score: None,
            fund_type: None,
            sub_type: None,
            benchmark_name: None,
            benchmark_start: None,
            series_file: None,
        }
    }
}

/// A single daily observation of a fund and its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub nav: f64,
    pub bench: Option<f64>,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, nav: f64, bench: Option<f64>) -> Self {
        Self { date, nav, bench }
    }
}

/// A named period over which metrics are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub label: String,
    pub anchor: WindowAnchor,
    pub basis: ReturnBasis,
}

impl LookbackWindow {
    /// Creates a window whose basis follows its anchor rule.
    pub fn new(label: impl Into<String>, anchor: WindowAnchor) -> Self {
        Self {
            label: label.into(),
            basis: anchor.default_basis(),
            anchor,
        }
    }

    pub fn with_basis(mut self, basis: ReturnBasis) -> Self {
        self.basis = basis;
        self
    }

    /// The "YTD" window: total return since January 1.
    pub fn year_to_date() -> Self {
        Self::new("YTD", WindowAnchor::YearStart)
    }

    /// An "NY" window: annualized return over the last `years` years.
    pub fn years(years: u32) -> Self {
        Self::new(format!("{years}Y"), WindowAnchor::YearsBack(years))
    }
}
