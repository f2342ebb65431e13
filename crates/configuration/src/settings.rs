use core_types::{LookbackWindow, ReturnBasis, WindowAnchor};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; a missing section falls back
/// to its `Default`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub metrics: MetricsSettings,
    pub comparison: ComparisonSettings,
    pub allocation: AllocationSettings,
    pub logging: LoggingSettings,
}

/// Where the reference table and the series files live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// CSV fund reference table.
    pub funds_file: PathBuf,
    /// Directory the `File` column of the reference table is resolved against.
    pub series_dir: PathBuf,
}

/// One lookback window as written in the config file.
///
/// A window without `years` is anchored at the start of the calendar year.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowSettings {
    pub label: String,
    #[serde(default)]
    pub years: Option<u32>,
    /// Overrides the basis implied by the anchor.
    #[serde(default)]
    pub basis: Option<ReturnBasis>,
}

/// Windows shown in the single-fund summary table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub windows: Vec<WindowSettings>,
}

/// Windows shown side by side in the cross-fund comparison.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    pub windows: Vec<WindowSettings>,
}

/// Parameters of the bonus allocation exercise.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    /// Total bonus budget. Exceeding it is reported, never rejected.
    pub budget: Decimal,
    /// How many recipients the top table lists.
    pub top_n: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

// --- Default Implementations ---
// These let a user omit any section from their toml and still have it work.

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            funds_file: PathBuf::from("data/funds.csv"),
            series_dir: PathBuf::from("data"),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            windows: vec![
                WindowSettings::year_start("YTD"),
                WindowSettings::years_back("3Y", 3),
                WindowSettings::years_back("5Y", 5),
            ],
        }
    }
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            windows: vec![
                WindowSettings::years_back("1Y", 1),
                WindowSettings::years_back("3Y", 3),
            ],
        }
    }
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            budget: dec!(1000000),
            top_n: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "fundlens.log".to_string(),
        }
    }
}

impl WindowSettings {
    pub fn year_start(label: &str) -> Self {
        Self {
            label: label.to_string(),
            years: None,
            basis: None,
        }
    }

    pub fn years_back(label: &str, years: u32) -> Self {
        Self {
            label: label.to_string(),
            years: Some(years),
            basis: None,
        }
    }

    pub fn to_window(&self) -> LookbackWindow {
        let anchor = match self.years {
            Some(years) => WindowAnchor::YearsBack(years),
            None => WindowAnchor::YearStart,
        };
        let window = LookbackWindow::new(self.label.clone(), anchor);
        match self.basis {
            Some(basis) => window.with_basis(basis),
            None => window,
        }
    }
}

impl Config {
    pub fn metric_windows(&self) -> Vec<LookbackWindow> {
        self.metrics.windows.iter().map(WindowSettings::to_window).collect()
    }

    pub fn comparison_windows(&self) -> Vec<LookbackWindow> {
        self.comparison.windows.iter().map(WindowSettings::to_window).collect()
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_windows("metrics", &self.metrics.windows)?;
        validate_windows("comparison", &self.comparison.windows)?;

        if self.allocation.budget < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "allocation.budget must not be negative, got {}",
                self.allocation.budget
            )));
        }
        if self.allocation.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "allocation.top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_windows(section: &str, windows: &[WindowSettings]) -> Result<(), ConfigError> {
    if windows.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{section}.windows must define at least one window"
        )));
    }

    let mut seen = HashSet::new();
    for window in windows {
        if window.label.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{section}.windows contains a window without a label"
            )));
        }
        if !seen.insert(window.label.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "{section}.windows defines '{}' twice",
                window.label
            )));
        }
        if window.years == Some(0) {
            return Err(ConfigError::ValidationError(format!(
                "{section}.windows '{}' must look back at least one year",
                window.label
            )));
        }
    }
    Ok(())
}
