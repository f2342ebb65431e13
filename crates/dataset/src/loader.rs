use crate::error::DatasetError;
use chrono::NaiveDate;
use core_types::{FundRecord, SeriesPoint};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Date formats accepted for series dates and benchmark start dates.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y", "%Y/%m/%d"];

/// A row of the reference table as it appears on disk.
///
/// Every column except `Fund` is free text; conversion to typed fields is
/// lenient and leaves unreadable cells empty.
#[derive(Debug, Deserialize)]
struct FundRow {
    #[serde(rename = "Fund")]
    fund: Option<String>,
    #[serde(rename = "Manager", default)]
    manager: Option<String>,
    #[serde(rename = "Age", default)]
    age: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Peer Ranking 1Y", default)]
    peer_ranking_1y: Option<String>,
    #[serde(rename = "Peer Ranking 3Y", default)]
    peer_ranking_3y: Option<String>,
    #[serde(rename = "Rating", default)]
    rating: Option<String>,
    #[serde(rename = "Fees", default)]
    fees: Option<String>,
    #[serde(rename = "ESG Label", default)]
    esg_label: Option<String>,
    #[serde(rename = "E Score", default)]
    e_score: Option<String>,
    #[serde(rename = "AUM", default)]
    aum: Option<String>,
    #[serde(rename = "Type", default)]
    fund_type: Option<String>,
    #[serde(rename = "Sub Type", default)]
    sub_type: Option<String>,
    #[serde(rename = "Benchmark Name", default)]
    benchmark_name: Option<String>,
    #[serde(rename = "Start date", default)]
    start_date: Option<String>,
    #[serde(rename = "File", default)]
    file: Option<String>,
}

impl FundRow {
    fn into_record(self) -> Option<FundRecord> {
        let name = text(self.fund)?;
        Some(FundRecord {
            name,
            manager: text(self.manager),
            manager_age: whole_number(self.age.as_deref()),
            manager_gender: text(self.gender),
            peer_ranking_1y: whole_number(self.peer_ranking_1y.as_deref()),
            peer_ranking_3y: whole_number(self.peer_ranking_3y.as_deref()),
            rating: number(self.rating.as_deref()),
            fees: text(self.fees),
            esg_label: text(self.esg_label),
            e_score: number(self.e_score.as_deref()),
            aum: text(self.aum),
            fund_type: text(self.fund_type),
            sub_type: text(self.sub_type),
            benchmark_name: text(self.benchmark_name),
            benchmark_start: self.start_date.as_deref().and_then(parse_date),
            series_file: text(self.file),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    date: String,
    nav: Option<f64>,
    #[serde(default)]
    bench: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AllocationRow {
    fund: String,
    bonus: String,
}

/// Trimmed text, `None` when blank or a missing-value marker.
fn text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(trimmed.to_string())
}

fn number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Ages and rankings, which spreadsheets like to export as `45.0`.
fn whole_number(value: Option<&str>) -> Option<u32> {
    number(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .or_else(|| chrono::NaiveDateTime::parse_from_str(value, format).ok().map(|dt| dt.date()))
    })
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the fund reference table.
///
/// Rows without a fund name are skipped, as are repeated names after the
/// first occurrence. Both are logged.
pub fn read_funds<R: Read>(reader: R, source: &Path) -> Result<Vec<FundRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = reader.headers().map_err(|e| DatasetError::Csv {
        path: source.to_path_buf(),
        source: e,
    })?;
    if !headers.iter().any(|h| h == "Fund") {
        return Err(DatasetError::MissingColumn("Fund".to_string()));
    }

    let mut funds: Vec<FundRecord> = Vec::new();
    for (index, result) in reader.deserialize::<FundRow>().enumerate() {
        let line = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(file = %source.display(), line, error = %e, "Skipping unreadable fund row.");
                continue;
            }
        };
        let Some(record) = row.into_record() else {
            tracing::warn!(file = %source.display(), line, "Skipping fund row without a name.");
            continue;
        };
        if funds.iter().any(|f| f.name == record.name) {
            tracing::warn!(fund = %record.name, line, "Duplicate fund name, keeping the first row.");
            continue;
        }
        funds.push(record);
    }
    Ok(funds)
}

pub fn load_funds(path: &Path) -> Result<Vec<FundRecord>, DatasetError> {
    read_funds(open(path)?, path)
}

/// Reads a `date,nav,bench` series.
///
/// Rows with an unreadable date or NAV are skipped. The result is sorted by
/// date and keeps the first row of any repeated date.
pub fn read_series<R: Read>(reader: R, source: &Path) -> Result<Vec<SeriesPoint>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<SeriesRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(file = %source.display(), error = %e, "Unreadable series row.");
                skipped += 1;
                continue;
            }
        };
        match (parse_date(&row.date), row.nav.filter(|v| v.is_finite())) {
            (Some(date), Some(nav)) => {
                points.push(SeriesPoint::new(date, nav, row.bench.filter(|v| v.is_finite())))
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(file = %source.display(), skipped, "Skipped unreadable series rows.");
    }

    // Stable, so the first of equal dates stays in front.
    points.sort_by_key(|p: &SeriesPoint| p.date);
    points.dedup_by_key(|p| p.date);
    Ok(points)
}

pub fn load_series(path: &Path) -> Result<Vec<SeriesPoint>, DatasetError> {
    read_series(open(path)?, path)
}

/// Reads `fund,bonus` assignments. Unlike the data files, a bad amount is
/// an error: these are user edits and must not be silently dropped.
pub fn read_allocations<R: Read>(
    reader: R,
    source: &Path,
) -> Result<Vec<(String, Decimal)>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut assignments = Vec::new();
    for (index, result) in reader.deserialize::<AllocationRow>().enumerate() {
        let row = result.map_err(|e| DatasetError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        let amount = Decimal::from_str(&row.bonus).map_err(|_| DatasetError::InvalidAmount {
            fund: row.fund.clone(),
            value: row.bonus.clone(),
            line: index as u64 + 2,
        })?;
        assignments.push((row.fund, amount));
    }
    Ok(assignments)
}

pub fn load_allocations(path: &Path) -> Result<Vec<(String, Decimal)>, DatasetError> {
    read_allocations(open(path)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn here() -> &'static Path {
        Path::new("inline.csv")
    }

    #[test]
    fn fund_rows_are_converted_leniently() {
        let csv = "\
Fund,Manager,Age,Gender,Rating,Fees,E Score,AUM,Type,Sub Type,Start date,File
Alpha,Ada,45.0,F,4,\"1,5%\",3.2,1.5M,Equity,,2019-01-02,alpha.csv
Beta,N/A,old,,n/a,,,,Bond,Short,02/01/2020,
,Nobody,50,M,,,,,,,,
Alpha,Duplicate,60,M,,,,,,,,
";
        let funds = read_funds(csv.as_bytes(), here()).unwrap();
        assert_eq!(funds.len(), 2);

        let alpha = &funds[0];
        assert_eq!(alpha.manager.as_deref(), Some("Ada"));
        assert_eq!(alpha.manager_age, Some(45));
        assert_eq!(alpha.fees.as_deref(), Some("1,5%"));
        assert_eq!(alpha.e_score, Some(3.2));
        assert_eq!(alpha.sub_type, None);
        assert_eq!(alpha.benchmark_start, NaiveDate::from_ymd_opt(2019, 1, 2));
        assert_eq!(alpha.series_file.as_deref(), Some("alpha.csv"));

        let beta = &funds[1];
        assert_eq!(beta.manager, None);
        assert_eq!(beta.manager_age, None);
        assert_eq!(beta.rating, None);
        assert_eq!(beta.benchmark_start, NaiveDate::from_ymd_opt(2020, 1, 2));
        assert_eq!(beta.series_file, None);
    }

    #[test]
    fn reference_table_requires_a_fund_column() {
        let err = read_funds("Name,Manager\nA,B\n".as_bytes(), here()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(c) if c == "Fund"));
    }

    #[test]
    fn series_is_sorted_deduplicated_and_skips_bad_rows() {
        let csv = "\
date,nav,bench
2024-01-03,101.0,50.5
2024-01-02,100.0,50.0
not-a-date,1.0,1.0
2024-01-04,,51.0
2024-01-03,999.0,999.0
2024-01-05,102.0,
";
        let points = read_series(csv.as_bytes(), here()).unwrap();
        let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-05"]);
        assert_eq!(points[1].nav, 101.0);
        assert_eq!(points[2].bench, None);
    }

    #[test]
    fn series_without_benchmark_column() {
        let points = read_series("date,nav\n2024-01-02,100\n".as_bytes(), here()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].bench, None);
    }

    #[test]
    fn allocations_are_strict() {
        let ok = read_allocations("fund,bonus\nAlpha,250000\nBeta, 1500.50\n".as_bytes(), here())
            .unwrap();
        assert_eq!(
            ok,
            vec![("Alpha".to_string(), dec!(250000)), ("Beta".to_string(), dec!(1500.50))]
        );

        let err = read_allocations("fund,bonus\nAlpha,lots\n".as_bytes(), here()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidAmount { line: 2, .. }));
    }

    #[test]
    fn parses_the_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 30);
        assert_eq!(parse_date("2023-06-30"), expected);
        assert_eq!(parse_date("2023-06-30 00:00:00"), expected);
        assert_eq!(parse_date("30/06/2023"), expected);
        assert_eq!(parse_date("2023/06/30"), expected);
        assert_eq!(parse_date("June 30"), None);
    }
}
