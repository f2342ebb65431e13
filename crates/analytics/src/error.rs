use chrono::NaiveDate;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Series must be sorted by strictly increasing date; found {found} after {previous}")]
    UnsortedSeries { previous: NaiveDate, found: NaiveDate },

    #[error("Could not resolve lookback window '{label}': {source}")]
    Window {
        label: String,
        #[source]
        source: CoreError,
    },
}
