use allocation::AllocationTable;
use anyhow::Context;
use configuration::Config;
use dataset::{load_allocations, FundRepository};
use rust_decimal::Decimal;
use std::path::Path;

/// The state of one invocation: the loaded dataset and the allocation being edited.
///
/// The repository is read-only once loaded; the allocation table is the only
/// mutable state.
pub struct Session {
    config: Config,
    repository: FundRepository,
    allocation: AllocationTable,
}

impl Session {
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let repository = FundRepository::load(&config.data.funds_file, &config.data.series_dir)
            .with_context(|| {
                format!(
                    "Failed to load the fund reference table from '{}'",
                    config.data.funds_file.display()
                )
            })?;
        Ok(Self::new(config, repository))
    }

    pub fn new(config: Config, repository: FundRepository) -> Self {
        let allocation = AllocationTable::from_funds(repository.funds());
        Self {
            config,
            repository,
            allocation,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &FundRepository {
        &self.repository
    }

    pub fn allocation(&self) -> &AllocationTable {
        &self.allocation
    }

    /// Replaces the allocation: every bonus goes back to zero, then the
    /// assignments of an allocation file apply, then the individual ones.
    pub fn apply_allocation(
        &mut self,
        file: Option<&Path>,
        assignments: &[(String, Decimal)],
    ) -> anyhow::Result<()> {
        self.allocation.reset();
        if let Some(file) = file {
            let from_file = load_allocations(file)
                .with_context(|| format!("Failed to read allocations from '{}'", file.display()))?;
            self.allocation
                .apply(from_file.iter().map(|(fund, bonus)| (fund.as_str(), *bonus)))
                .context("Invalid allocation file")?;
        }
        self.allocation
            .apply(assignments.iter().map(|(fund, bonus)| (fund.as_str(), *bonus)))
            .context("Invalid --bonus assignment")?;
        Ok(())
    }
}
