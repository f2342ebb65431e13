use crate::error::DatasetError;
use crate::loader::{load_funds, load_series};
use core_types::{FundRecord, SeriesPoint};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;

/// The read-only snapshot of the dataset for one session.
///
/// Holds the reference table in file order and the series of every fund
/// whose series file could be read.
#[derive(Debug, Clone, Default)]
pub struct FundRepository {
    funds: Vec<FundRecord>,
    series: HashMap<String, Vec<SeriesPoint>>,
}

impl FundRepository {
    pub fn from_parts(funds: Vec<FundRecord>, series: HashMap<String, Vec<SeriesPoint>>) -> Self {
        Self { funds, series }
    }

    /// Loads the reference table, then each fund's series from `series_dir`.
    ///
    /// The reference table must be readable. A fund whose series file is
    /// missing or unreadable is kept without a series.
    #[tracing::instrument(skip_all, fields(funds_file = %funds_file.display()))]
    pub fn load(funds_file: &Path, series_dir: &Path) -> Result<Self, DatasetError> {
        let funds = load_funds(funds_file)?;

        let progress_bar = ProgressBar::new(funds.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| DatasetError::ProgressBarTemplate(e.to_string()))?
                .progress_chars("=>-"),
        );

        let mut series = HashMap::new();
        for fund in &funds {
            progress_bar.set_message(fund.name.clone());
            match &fund.series_file {
                Some(file) => match load_series(&series_dir.join(file)) {
                    Ok(points) if points.is_empty() => {
                        tracing::warn!(fund = %fund.name, file = %file, "Series file has no usable rows.");
                    }
                    Ok(points) => {
                        series.insert(fund.name.clone(), points);
                    }
                    Err(e) => {
                        tracing::warn!(fund = %fund.name, error = %e, "Fund loaded without a series.");
                    }
                },
                None => tracing::warn!(fund = %fund.name, "No series file listed for fund."),
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        tracing::info!(funds = funds.len(), with_series = series.len(), "Dataset loaded.");
        Ok(Self { funds, series })
    }

    /// The reference table, in file order.
    pub fn funds(&self) -> &[FundRecord] {
        &self.funds
    }

    pub fn fund(&self, name: &str) -> Result<&FundRecord, DatasetError> {
        self.funds
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DatasetError::FundNotFound(name.to_string()))
    }

    pub fn series(&self, name: &str) -> Option<&[SeriesPoint]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Funds that have a series, paired with it, in reference order.
    pub fn funds_with_series(&self) -> impl Iterator<Item = (&FundRecord, &[SeriesPoint])> {
        self.funds
            .iter()
            .filter_map(|fund| self.series(&fund.name).map(|series| (fund, series)))
    }
}
