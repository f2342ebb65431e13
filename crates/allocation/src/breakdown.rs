//! Cross-cuts of the allocation by manager attributes.
//!
//! Entries are joined with the reference table by fund name. Only entries
//! with a strictly positive bonus take part in a breakdown.

use crate::summary::mean;
use crate::table::{AllocationEntry, AllocationTable};
use core_types::FundRecord;
use rust_decimal::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Group label for entries whose attribute is unknown.
pub const UNKNOWN: &str = "Unknown";

/// Bonus totals of one group of managers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBreakdown {
    pub key: String,
    pub count: usize,
    pub total: Decimal,
    pub mean: Decimal,
}

/// Manager age buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBand {
    Under40,
    From40To50,
    From50,
}

impl AgeBand {
    pub fn of(age: u32) -> Self {
        match age {
            0..=39 => AgeBand::Under40,
            40..=49 => AgeBand::From40To50,
            _ => AgeBand::From50,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under40 => "<40",
            AgeBand::From40To50 => "40-50",
            AgeBand::From50 => "50+",
        }
    }
}

/// Indexes the reference table by fund name.
fn index_funds(funds: &[FundRecord]) -> HashMap<&str, &FundRecord> {
    funds.iter().map(|f| (f.name.as_str(), f)).collect()
}

/// Entries with a positive bonus, each paired with its fund record if any.
fn funded_entries<'a>(
    table: &'a AllocationTable,
    funds: &'a [FundRecord],
) -> impl Iterator<Item = (&'a AllocationEntry, Option<&'a FundRecord>)> {
    let index = index_funds(funds);
    table
        .entries()
        .iter()
        .filter(|e| e.bonus > Decimal::ZERO)
        .map(move |e| (e, index.get(e.fund.as_str()).copied()))
}

fn to_breakdown(key: String, bonuses: &[Decimal]) -> GroupBreakdown {
    GroupBreakdown {
        key,
        count: bonuses.len(),
        total: bonuses.iter().sum(),
        mean: mean(bonuses).unwrap_or(Decimal::ZERO),
    }
}

/// Groups positive bonuses by a categorical attribute of the fund record.
///
/// Groups are sorted by key; a missing record or attribute falls in
/// [`UNKNOWN`].
pub fn group_by_attribute<F>(
    table: &AllocationTable,
    funds: &[FundRecord],
    attribute: F,
) -> Vec<GroupBreakdown>
where
    F: Fn(&FundRecord) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for (entry, fund) in funded_entries(table, funds) {
        let key = fund
            .and_then(&attribute)
            .unwrap_or_else(|| UNKNOWN.to_string());
        groups.entry(key).or_default().push(entry.bonus);
    }

    groups
        .into_iter()
        .map(|(key, bonuses)| to_breakdown(key, &bonuses))
        .collect()
}

pub fn group_by_gender(table: &AllocationTable, funds: &[FundRecord]) -> Vec<GroupBreakdown> {
    group_by_attribute(table, funds, |f| f.manager_gender.clone())
}

/// Groups positive bonuses by manager age band, youngest first.
///
/// Entries without a known age are left out.
pub fn group_by_age_band(table: &AllocationTable, funds: &[FundRecord]) -> Vec<GroupBreakdown> {
    let mut groups: BTreeMap<AgeBand, Vec<Decimal>> = BTreeMap::new();
    for (entry, fund) in funded_entries(table, funds) {
        if let Some(age) = fund.and_then(|f| f.manager_age) {
            groups.entry(AgeBand::of(age)).or_default().push(entry.bonus);
        }
    }

    groups
        .into_iter()
        .map(|(band, bonuses)| to_breakdown(band.label().to_string(), &bonuses))
        .collect()
}

/// Bonus-weighted average of a numeric attribute.
///
/// Only entries with a positive bonus and a finite attribute count. With no
/// such entry the average is 0. Each value is scaled by its share of the
/// weights rather than by the raw bonus, so large bonuses cannot overflow;
/// `None` only when the attribute values themselves leave the decimal range.
pub fn weighted_average<F>(
    table: &AllocationTable,
    funds: &[FundRecord],
    attribute: F,
) -> Option<Decimal>
where
    F: Fn(&FundRecord) -> Option<f64>,
{
    let weighted: Vec<(Decimal, Decimal)> = funded_entries(table, funds)
        .filter_map(|(entry, fund)| {
            fund.and_then(&attribute)
                .filter(|v| v.is_finite())
                .and_then(Decimal::from_f64)
                .map(|value| (value, entry.bonus))
        })
        .collect();

    // A subset of the table total, which is always representable.
    let weights: Decimal = weighted.iter().map(|(_, bonus)| *bonus).sum();
    if weights.is_zero() {
        return Some(Decimal::ZERO);
    }

    weighted.iter().try_fold(Decimal::ZERO, |acc, (value, bonus)| {
        let share = bonus.checked_div(weights)?;
        acc.checked_add(value.checked_mul(share)?)
    })
}

/// Bonus-weighted E score of the funded managers (lower is greener).
pub fn weighted_e_score(table: &AllocationTable, funds: &[FundRecord]) -> Option<Decimal> {
    weighted_average(table, funds, |f| f.e_score)
}

pub fn weighted_age(table: &AllocationTable, funds: &[FundRecord]) -> Option<Decimal> {
    weighted_average(table, funds, |f| f.manager_age.map(f64::from))
}
