use crate::error::CoreError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a window's performance figure is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnBasis {
    /// Cumulative return over the window (year-to-date style).
    Total,
    /// Compound growth rate scaled to one year.
    Annualized,
}

/// The rule that fixes where a lookback window starts.
///
/// Anchors are always resolved against the last date of the fund's own
/// series, never against the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// January 1 of the calendar year containing the last date.
    YearStart,
    /// The last date minus this many calendar years.
    YearsBack(u32),
}

impl WindowAnchor {
    /// Resolves the first date included in the window.
    ///
    /// `YearsBack` clamps to the end of the month, so Feb 29 minus one year
    /// lands on Feb 28.
    pub fn start_date(&self, last_date: NaiveDate) -> Result<NaiveDate, CoreError> {
        match self {
            WindowAnchor::YearStart => NaiveDate::from_ymd_opt(last_date.year(), 1, 1)
                .ok_or_else(|| CoreError::DateOutOfRange(format!("start of year {}", last_date.year()))),
            WindowAnchor::YearsBack(years) => last_date
                .checked_sub_months(Months::new(years.saturating_mul(12)))
                .ok_or_else(|| CoreError::DateOutOfRange(format!("{last_date} minus {years} years"))),
        }
    }

    /// The basis a window gets when configuration does not say otherwise.
    pub fn default_basis(&self) -> ReturnBasis {
        match self {
            WindowAnchor::YearStart => ReturnBasis::Total,
            WindowAnchor::YearsBack(_) => ReturnBasis::Annualized,
        }
    }
}
