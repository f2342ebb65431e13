use crate::table::{AllocationEntry, AllocationTable};
use rust_decimal::prelude::*;
use serde::Serialize;

/// Where the allocated total stands against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    Under,
    Exact,
    Over,
}

/// A line of the top recipients table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRecipient {
    pub fund: String,
    pub manager: Option<String>,
    pub bonus: Decimal,
    /// Share of the allocated total, 0 when nothing is allocated.
    pub pct_of_total: Decimal,
}

/// Distribution statistics of the bonus amounts.
///
/// Figures that are undefined for the table's size are `None`: mean,
/// median, min and max need one entry, the standard deviation two. The
/// standard deviation is also `None` when its squares overflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub budget: Decimal,
    pub total: Decimal,
    /// Negative when over budget.
    pub remaining: Decimal,
    /// `None` when the ratio exceeds the decimal range (a near-zero budget).
    pub pct_of_budget: Option<Decimal>,
    pub status: BudgetStatus,

    pub entries: usize,
    pub positive_count: usize,
    pub positive_pct: Decimal,

    pub mean: Option<Decimal>,
    pub median: Option<Decimal>,
    /// Sample standard deviation.
    pub std_dev: Option<Decimal>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,

    pub top: Vec<TopRecipient>,
}

/// Summarises the table against `budget`, listing at most `top_n` recipients.
pub fn summarize(table: &AllocationTable, budget: Decimal, top_n: usize) -> AllocationSummary {
    let amounts: Vec<Decimal> = table.entries().iter().map(|e| e.bonus).collect();
    let total = table.total();
    let entries = amounts.len();
    let positive_count = amounts.iter().filter(|b| **b > Decimal::ZERO).count();

    let status = match total.cmp(&budget) {
        std::cmp::Ordering::Less => BudgetStatus::Under,
        std::cmp::Ordering::Equal => BudgetStatus::Exact,
        std::cmp::Ordering::Greater => BudgetStatus::Over,
    };
    if status == BudgetStatus::Over {
        tracing::warn!(%total, %budget, "Allocation exceeds the budget.");
    }

    let (min, max) = find_min_max(&amounts);

    AllocationSummary {
        budget,
        total,
        remaining: budget - total,
        pct_of_budget: percent_of(total, budget),
        status,
        entries,
        positive_count,
        positive_pct: share_of(Decimal::from(positive_count), Decimal::from(entries)),
        mean: mean(&amounts),
        median: median(&amounts),
        std_dev: sample_std_dev(&amounts),
        min,
        max,
        top: top_recipients(table.entries(), total, top_n),
    }
}

/// The `n` largest bonuses, descending. Equal bonuses keep table order.
pub fn top_recipients(entries: &[AllocationEntry], total: Decimal, n: usize) -> Vec<TopRecipient> {
    let mut ranked: Vec<&AllocationEntry> = entries.iter().collect();
    // `sort_by` is stable, which gives the tie-break for free.
    ranked.sort_by(|a, b| b.bonus.cmp(&a.bonus));

    ranked
        .into_iter()
        .take(n)
        .map(|entry| TopRecipient {
            fund: entry.fund.clone(),
            manager: entry.manager.clone(),
            bonus: entry.bonus,
            pct_of_total: share_of(entry.bonus, total),
        })
        .collect()
}

/// `part / whole * 100`, 0 when `whole` is 0, `None` on overflow.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return Some(Decimal::ZERO);
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// [`percent_of`] for a non-negative `part` no larger than `whole`, which
/// stays within 0..=100.
fn share_of(part: Decimal, whole: Decimal) -> Decimal {
    percent_of(part, whole).unwrap_or(Decimal::ZERO)
}

/// Sum without panicking, `None` on overflow.
fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values)?.checked_div(Decimal::from(values.len()))
}

fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        // Halve first so two large amounts cannot overflow.
        Some(sorted[mid - 1] / Decimal::TWO + sorted[mid] / Decimal::TWO)
    }
}

fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = v.checked_sub(mean)?;
        acc.checked_add(deviation.checked_mul(deviation)?)
    });
    let Some(squares) = squares else {
        tracing::debug!("Bonus deviations overflow, standard deviation not available.");
        return None;
    };
    squares.checked_div(Decimal::from(values.len() - 1))?.sqrt()
}

/// Smallest and largest value, `None` for an empty slice.
fn find_min_max(values: &[Decimal]) -> (Option<Decimal>, Option<Decimal>) {
    values.iter().fold((None, None), |(min, max), &v| {
        (
            Some(min.map_or(v, |m: Decimal| m.min(v))),
            Some(max.map_or(v, |m: Decimal| m.max(v))),
        )
    })
}
