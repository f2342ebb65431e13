use crate::breakdown::{group_by_age_band, group_by_gender, weighted_age, weighted_e_score, GroupBreakdown};
use crate::summary::{summarize, AllocationSummary};
use crate::table::AllocationTable;
use core_types::FundRecord;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything the allocation screen shows, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub summary: AllocationSummary,
    pub by_gender: Vec<GroupBreakdown>,
    pub by_age_band: Vec<GroupBreakdown>,
    /// Bonus-weighted E score, 0 when nothing is allocated.
    pub weighted_e_score: Option<Decimal>,
    /// Bonus-weighted manager age, 0 when nothing is allocated.
    pub weighted_age: Option<Decimal>,
}

impl AllocationReport {
    /// Summarises the table and joins it with the reference table for the breakdowns.
    #[tracing::instrument(skip(table, funds), fields(entries = table.len()))]
    pub fn build(
        table: &AllocationTable,
        funds: &[FundRecord],
        budget: Decimal,
        top_n: usize,
    ) -> Self {
        let report = Self {
            summary: summarize(table, budget, top_n),
            by_gender: group_by_gender(table, funds),
            by_age_band: group_by_age_band(table, funds),
            weighted_e_score: weighted_e_score(table, funds),
            weighted_age: weighted_age(table, funds),
        };
        tracing::debug!(
            total = %report.summary.total,
            funded = report.summary.positive_count,
            "Allocation report built."
        );
        report
    }

    /// Whether any manager receives a bonus. The breakdown sections are
    /// only meaningful when this holds.
    pub fn has_recipients(&self) -> bool {
        self.summary.positive_count > 0
    }
}
