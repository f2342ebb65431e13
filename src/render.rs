//! Terminal rendering of the engines' outputs.
//!
//! Numbers arrive at full precision and are rounded here, and only here.

use allocation::{AllocationReport, BudgetStatus, GroupBreakdown};
use analytics::{parse_size, revenue, ComparisonGroup, PeriodMetricSet};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use core_types::{FundRecord, SeriesPoint};
use rust_decimal::Decimal;

const NOT_AVAILABLE: &str = "N/A";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn or_na_display<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Inserts `,` every three digits of the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}%"))
}

pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// AUM in billions or millions, or whole euros below a million.
/// Text that does not parse is shown as written.
pub fn format_aum(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_size(raw) {
        Some(v) if v >= 1e9 => format!("€{:.2}B", v / 1e9),
        Some(v) if v >= 1e6 => format!("€{:.2}M", v / 1e6),
        Some(v) => format!("€{}", group_thousands(&format!("{v:.0}"))),
        None => raw.to_string(),
    }
}

pub fn format_revenue(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 1e6 => format!("€{:.2}M", v / 1e6),
        Some(v) if v >= 1e3 => format!("€{:.2}K", v / 1e3),
        Some(v) => format!("€{v:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Euros with thousands grouping; the sign goes before the symbol.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}€{}", group_thousands(&format!("{:.2}", rounded.abs())))
}

fn format_decimal_pct(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// The reference table.
pub fn funds_table(funds: &[FundRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Fund",
        "Manager",
        "Age",
        "Gender",
        "Peer 1Y",
        "Peer 3Y",
        "Rating",
        "Fees",
        "ESG Label",
        "E Score",
        "AUM",
        "Type",
        "Sub Type",
        "Benchmark",
        "Start date",
    ]);
    for fund in funds {
        table.add_row(vec![
            Cell::new(&fund.name),
            Cell::new(or_na(fund.manager.as_deref())),
            right(or_na_display(fund.manager_age)),
            Cell::new(or_na(fund.manager_gender.as_deref())),
            right(or_na_display(fund.peer_ranking_1y)),
            right(or_na_display(fund.peer_ranking_3y)),
            right(or_na_display(fund.rating)),
            right(or_na(fund.fees.as_deref())),
            Cell::new(or_na(fund.esg_label.as_deref())),
            right(or_na_display(fund.e_score)),
            right(format_aum(fund.aum.as_deref())),
            Cell::new(or_na(fund.fund_type.as_deref())),
            Cell::new(or_na(fund.sub_type.as_deref())),
            Cell::new(or_na(fund.benchmark_name.as_deref())),
            Cell::new(or_na_display(fund.benchmark_start)),
        ]);
    }
    table
}

/// The characteristic panel of a single fund, as label/value pairs.
pub fn characteristics_table(fund: &FundRecord) -> Table {
    let rows: [(&str, String); 15] = [
        ("Fund", fund.name.clone()),
        ("Type", or_na(fund.fund_type.as_deref())),
        ("Sub Type", or_na(fund.sub_type.as_deref())),
        ("Benchmark", or_na(fund.benchmark_name.as_deref())),
        ("Start date", or_na_display(fund.benchmark_start)),
        ("Manager", or_na(fund.manager.as_deref())),
        ("Age", or_na_display(fund.manager_age)),
        ("Gender", or_na(fund.manager_gender.as_deref())),
        ("AUM", format_aum(fund.aum.as_deref())),
        ("Rating", or_na_display(fund.rating)),
        ("Fees", or_na(fund.fees.as_deref())),
        (
            "Revenue",
            format_revenue(revenue(fund.aum.as_ref(), fund.fees.as_ref())),
        ),
        (
            "Peer Ranking 1Y / 3Y",
            format!(
                "{} / {}",
                or_na_display(fund.peer_ranking_1y),
                or_na_display(fund.peer_ranking_3y)
            ),
        ),
        ("ESG Label", or_na(fund.esg_label.as_deref())),
        ("E Score", or_na_display(fund.e_score)),
    ];

    let mut table = new_table();
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

/// One row per metric, one column per window.
pub fn metrics_table(metrics: &[PeriodMetricSet]) -> Table {
    let mut table = new_table();
    let mut header = vec!["Metric".to_string()];
    header.extend(metrics.iter().map(|m| m.label.clone()));
    table.set_header(header);

    let rows: [(&str, fn(&PeriodMetricSet) -> String); 7] = [
        ("Fund volatility", |m| format_pct(m.fund_volatility)),
        ("Benchmark volatility", |m| format_pct(m.bench_volatility)),
        ("Tracking error", |m| format_pct(m.tracking_error)),
        ("Fund performance", |m| format_pct(m.fund_performance)),
        ("Benchmark performance", |m| format_pct(m.bench_performance)),
        ("Excess return", |m| format_pct(m.excess_return)),
        ("Sharpe ratio", |m| format_ratio(m.sharpe_ratio)),
    ];
    for (label, value) in rows {
        let mut row = vec![Cell::new(label)];
        row.extend(metrics.iter().map(|m| right(value(m))));
        table.add_row(row);
    }
    table
}

pub fn series_table(points: &[SeriesPoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "NAV", "Benchmark"]);
    for point in points {
        table.add_row(vec![
            Cell::new(point.date),
            right(format!("{:.4}", point.nav)),
            right(point.bench.map_or_else(|| NOT_AVAILABLE.to_string(), |b| format!("{b:.4}"))),
        ]);
    }
    table
}

pub fn comparison_table(group: &ComparisonGroup) -> Table {
    let mut table = new_table();
    let labels: Vec<&str> = group
        .rows
        .first()
        .map(|row| row.windows.iter().map(|w| w.label.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec!["Fund".to_string()];
    for label in &labels {
        header.push(format!("Perf {label}"));
        header.push(format!("Excess {label}"));
        header.push(format!("Vol {label}"));
    }
    header.extend(
        ["Revenue", "E Score", "Rating", "Peer 1Y", "Peer 3Y"]
            .iter()
            .map(|s| s.to_string()),
    );
    table.set_header(header);

    for row in &group.rows {
        let mut cells = vec![Cell::new(&row.fund)];
        for window in &row.windows {
            cells.push(right(format_pct(window.performance)));
            cells.push(right(format_pct(window.excess_return)));
            cells.push(right(format_pct(window.volatility)));
        }
        cells.push(right(format_revenue(row.revenue)));
        cells.push(right(or_na_display(row.e_score)));
        cells.push(right(or_na_display(row.rating)));
        cells.push(right(or_na_display(row.peer_ranking_1y)));
        cells.push(right(or_na_display(row.peer_ranking_3y)));
        table.add_row(cells);
    }
    table
}

pub fn budget_table(report: &AllocationReport) -> Table {
    let summary = &report.summary;
    let status = match summary.status {
        BudgetStatus::Under => "Under budget",
        BudgetStatus::Exact => "Budget fully allocated",
        BudgetStatus::Over => "OVER BUDGET",
    };
    let money = |v: Option<Decimal>| v.map_or_else(|| NOT_AVAILABLE.to_string(), format_money);

    let rows = [
        ("Budget", format_money(summary.budget)),
        ("Allocated", format_money(summary.total)),
        ("Remaining", format_money(summary.remaining)),
        (
            "Used",
            summary
                .pct_of_budget
                .map_or_else(|| NOT_AVAILABLE.to_string(), format_decimal_pct),
        ),
        ("Status", status.to_string()),
        (
            "Managers with a bonus",
            format!(
                "{} of {} ({})",
                summary.positive_count,
                summary.entries,
                format_decimal_pct(summary.positive_pct)
            ),
        ),
        ("Mean", money(summary.mean)),
        ("Median", money(summary.median)),
        ("Std. deviation", money(summary.std_dev)),
        ("Min", money(summary.min)),
        ("Max", money(summary.max)),
        (
            "Weighted E Score",
            report
                .weighted_e_score
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}", v.round_dp(2))),
        ),
        (
            "Weighted age",
            report
                .weighted_age
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.1}", v.round_dp(1))),
        ),
    ];

    let mut table = new_table();
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right(value)]);
    }
    table
}

pub fn top_recipients_table(report: &AllocationReport) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Fund", "Manager", "Bonus", "% of total"]);
    for (rank, recipient) in report.summary.top.iter().enumerate() {
        table.add_row(vec![
            right((rank + 1).to_string()),
            Cell::new(&recipient.fund),
            Cell::new(or_na(recipient.manager.as_deref())),
            right(format_money(recipient.bonus)),
            right(format_decimal_pct(recipient.pct_of_total)),
        ]);
    }
    table
}

pub fn breakdown_table(title: &str, groups: &[GroupBreakdown]) -> Table {
    let mut table = new_table();
    table.set_header(vec![title, "Managers", "Total", "Mean"]);
    for group in groups {
        table.add_row(vec![
            Cell::new(&group.key),
            right(group.count.to_string()),
            right(format_money(group.total)),
            right(format_money(group.mean)),
        ]);
    }
    table
}
