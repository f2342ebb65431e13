//! The allocation screen end to end: assignments in, report out.

use allocation::{AllocationError, AllocationReport, AllocationTable, BudgetStatus};
use core_types::FundRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_table() -> Vec<FundRecord> {
    let manager = |fund: &str, name: &str, gender: &str, age: u32, e_score: f64| FundRecord {
        manager: Some(name.to_string()),
        manager_gender: Some(gender.to_string()),
        manager_age: Some(age),
        e_score: Some(e_score),
        ..FundRecord::named(fund)
    };
    vec![
        manager("Alpha Equity", "Ada", "F", 38, 3.0),
        manager("Beta Bonds", "Ben", "M", 44, 5.0),
        manager("Gamma Growth", "Cleo", "F", 57, 1.0),
        manager("Delta Value", "Dan", "M", 29, 7.0),
    ]
}

#[test]
fn report_joins_summary_and_breakdowns() {
    let funds = reference_table();
    let mut table = AllocationTable::from_funds(&funds);
    table
        .apply([
            ("Alpha Equity", dec!(250000)),
            ("Beta Bonds", dec!(250000)),
            ("Gamma Growth", dec!(500000)),
        ])
        .expect("valid assignments");

    let report = AllocationReport::build(&table, &funds, dec!(1000000), 2);

    assert!(report.has_recipients());
    assert_eq!(report.summary.status, BudgetStatus::Exact);
    assert_eq!(report.summary.remaining, Decimal::ZERO);
    assert_eq!(report.summary.top.len(), 2);
    assert_eq!(report.summary.top[0].fund, "Gamma Growth");
    assert_eq!(report.summary.top[0].manager.as_deref(), Some("Cleo"));
    assert_eq!(report.summary.top[0].pct_of_total, dec!(50));

    // (3*250k + 5*250k + 1*500k) / 1M
    assert_eq!(report.weighted_e_score, Some(dec!(2.5)));
    // (38*250k + 44*250k + 57*500k) / 1M
    assert_eq!(report.weighted_age, Some(dec!(49)));

    let genders: Vec<(&str, usize)> = report
        .by_gender
        .iter()
        .map(|g| (g.key.as_str(), g.count))
        .collect();
    assert_eq!(genders, vec![("F", 2), ("M", 1)]);

    let bands: Vec<&str> = report.by_age_band.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(bands, vec!["<40", "40-50", "50+"]);
}

#[test]
fn empty_allocation_reports_zeroes() {
    let funds = reference_table();
    let table = AllocationTable::from_funds(&funds);
    let report = AllocationReport::build(&table, &funds, dec!(1000000), 10);

    assert!(!report.has_recipients());
    assert_eq!(report.summary.status, BudgetStatus::Under);
    assert_eq!(report.weighted_e_score, Some(Decimal::ZERO));
    assert_eq!(report.weighted_age, Some(Decimal::ZERO));
    assert!(report.by_gender.is_empty());
    // Zero-bonus entries still fill the top list.
    assert_eq!(report.summary.top.len(), 4);
}

#[test]
fn invalid_assignments_leave_earlier_ones_applied() {
    let funds = reference_table();
    let mut table = AllocationTable::from_funds(&funds);
    let result = table.apply([("Alpha Equity", dec!(10)), ("Omega", dec!(20))]);

    assert_eq!(result, Err(AllocationError::UnknownFund("Omega".to_string())));
    assert_eq!(table.bonus("Alpha Equity"), Some(dec!(10)));
}

#[test]
fn report_serializes_to_json() {
    let funds = reference_table();
    let mut table = AllocationTable::from_funds(&funds);
    table.set_bonus("Delta Value", dec!(1200000)).expect("valid");

    let report = AllocationReport::build(&table, &funds, dec!(1000000), 1);
    assert_eq!(report.summary.status, BudgetStatus::Over);

    let json = serde_json::to_value(&report).expect("serializable");
    assert_eq!(json["summary"]["status"], "Over");
    assert_eq!(json["by_age_band"][0]["key"], "<40");
}

#[test]
fn very_large_over_allocation_is_reported_not_fatal() {
    let funds = reference_table();
    let mut table = AllocationTable::from_funds(&funds);
    table
        .set_bonus("Beta Bonds", dec!(400000000000000))
        .expect("representable amount");

    let report = AllocationReport::build(&table, &funds, dec!(1000000), 10);

    assert_eq!(report.summary.status, BudgetStatus::Over);
    assert_eq!(report.summary.positive_count, 1);
    assert_eq!(report.summary.std_dev, None);
    assert_eq!(report.weighted_age, Some(dec!(44)));
}
