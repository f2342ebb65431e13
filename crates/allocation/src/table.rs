use crate::error::AllocationError;
use core_types::FundRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One manager's line in the bonus allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub fund: String,
    pub manager: Option<String>,
    pub bonus: Decimal,
}

/// The editable bonus allocation of a session.
///
/// Holds one entry per fund in reference-table order. The table only checks
/// that amounts are non-negative and that their total stays representable;
/// staying within the budget is reported by the summary, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationTable {
    entries: Vec<AllocationEntry>,
}

impl AllocationTable {
    /// Starts every fund of the reference table at a zero bonus.
    pub fn from_funds(funds: &[FundRecord]) -> Self {
        Self {
            entries: funds
                .iter()
                .map(|fund| AllocationEntry {
                    fund: fund.name.clone(),
                    manager: fund.manager.clone(),
                    bonus: Decimal::ZERO,
                })
                .collect(),
        }
    }

    /// Builds a table from existing entries, checking each amount as `set_bonus` would.
    pub fn from_entries(entries: Vec<AllocationEntry>) -> Result<Self, AllocationError> {
        let mut total = Decimal::ZERO;
        for entry in &entries {
            check_amount(&entry.fund, entry.bonus)?;
            total = total
                .checked_add(entry.bonus)
                .ok_or_else(|| AllocationError::TotalOverflow {
                    fund: entry.fund.clone(),
                })?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bonus(&self, fund: &str) -> Option<Decimal> {
        self.entries.iter().find(|e| e.fund == fund).map(|e| e.bonus)
    }

    /// Replaces the bonus of `fund`.
    pub fn set_bonus(&mut self, fund: &str, bonus: Decimal) -> Result<(), AllocationError> {
        check_amount(fund, bonus)?;

        let current = self
            .bonus(fund)
            .ok_or_else(|| AllocationError::UnknownFund(fund.to_string()))?;
        // Every amount is non-negative, so `total - current` cannot overflow.
        (self.total() - current)
            .checked_add(bonus)
            .ok_or_else(|| AllocationError::TotalOverflow {
                fund: fund.to_string(),
            })?;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.fund == fund) {
            entry.bonus = bonus;
        }
        tracing::debug!(fund, %bonus, "Bonus updated.");
        Ok(())
    }

    /// Applies a batch of assignments, stopping at the first invalid one.
    pub fn apply<'a>(
        &mut self,
        assignments: impl IntoIterator<Item = (&'a str, Decimal)>,
    ) -> Result<(), AllocationError> {
        for (fund, bonus) in assignments {
            self.set_bonus(fund, bonus)?;
        }
        Ok(())
    }

    /// Puts every bonus back to zero.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.bonus = Decimal::ZERO;
        }
    }

    /// Sum of all bonuses. Always representable: every update is checked.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.bonus).sum()
    }
}

fn check_amount(fund: &str, bonus: Decimal) -> Result<(), AllocationError> {
    if bonus.is_sign_negative() && !bonus.is_zero() {
        return Err(AllocationError::NegativeBonus {
            fund: fund.to_string(),
            amount: bonus,
        });
    }
    Ok(())
}
