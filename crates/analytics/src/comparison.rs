//! Cross-fund comparison: the same windows applied to every fund, joined
//! with the reference attributes and partitioned by classification.

use crate::engine::MetricsEngine;
use crate::error::AnalyticsError;
use crate::revenue::revenue;
use core_types::{FundRecord, LookbackWindow, SeriesPoint};
use serde::Serialize;
use std::collections::BTreeMap;

/// Title of the group holding funds without a type.
pub const UNCLASSIFIED: &str = "Unclassified";

/// The figures of one window in the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowComparison {
    pub label: String,
    pub performance: Option<f64>,
    pub excess_return: Option<f64>,
    pub volatility: Option<f64>,
}

/// One fund's line in the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub fund: String,
    pub fund_type: Option<String>,
    pub sub_type: Option<String>,
    pub windows: Vec<WindowComparison>,
    pub revenue: Option<f64>,
    pub e_score: Option<f64>,
    pub rating: Option<f64>,
    pub peer_ranking_1y: Option<u32>,
    pub peer_ranking_3y: Option<u32>,
}

/// Rows sharing a type and sub-type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonGroup {
    pub fund_type: Option<String>,
    pub sub_type: Option<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonGroup {
    pub fn title(&self) -> String {
        match (&self.fund_type, &self.sub_type) {
            (Some(fund_type), Some(sub_type)) => format!("{fund_type} - {sub_type}"),
            (Some(fund_type), None) => fund_type.clone(),
            (None, Some(sub_type)) => format!("{UNCLASSIFIED} - {sub_type}"),
            (None, None) => UNCLASSIFIED.to_string(),
        }
    }
}

/// Computes one comparison row per fund, in input order.
///
/// Funds are paired with their own series, so every window is anchored on
/// that fund's last date.
pub fn build_comparison<'a>(
    funds: impl IntoIterator<Item = (&'a FundRecord, &'a [SeriesPoint])>,
    windows: &[LookbackWindow],
) -> Result<Vec<ComparisonRow>, AnalyticsError> {
    let engine = MetricsEngine::new();
    funds
        .into_iter()
        .map(|(fund, series)| {
            let metrics = engine.calculate(series, windows)?;
            Ok(ComparisonRow {
                fund: fund.name.clone(),
                fund_type: fund.fund_type.clone(),
                sub_type: fund.sub_type.clone(),
                windows: metrics
                    .into_iter()
                    .map(|set| WindowComparison {
                        label: set.label,
                        performance: set.fund_performance,
                        excess_return: set.excess_return,
                        volatility: set.fund_volatility,
                    })
                    .collect(),
                revenue: revenue(fund.aum.as_ref(), fund.fees.as_ref()),
                e_score: fund.e_score,
                rating: fund.rating,
                peer_ranking_1y: fund.peer_ranking_1y,
                peer_ranking_3y: fund.peer_ranking_3y,
            })
        })
        .collect()
}

/// Partitions rows by type, then sub-type.
///
/// Named types come first in alphabetical order and unclassified funds
/// last; inside a type, named sub-types precede the type-only group. Rows
/// keep their input order within a group.
pub fn group_by_classification(rows: Vec<ComparisonRow>) -> Vec<ComparisonGroup> {
    type Key = (bool, Option<String>, bool, Option<String>);

    let mut groups: BTreeMap<Key, Vec<ComparisonRow>> = BTreeMap::new();
    for row in rows {
        let key = (
            row.fund_type.is_none(),
            row.fund_type.clone(),
            row.sub_type.is_none(),
            row.sub_type.clone(),
        );
        groups.entry(key).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|((_, fund_type, _, sub_type), rows)| ComparisonGroup {
            fund_type,
            sub_type,
            rows,
        })
        .collect()
}
