mod render;
mod session;

use analytics::{build_comparison, build_return_series, group_by_classification, MetricsEngine};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::{init_logging, load_config_from, DEFAULT_CONFIG_FILE};
use rust_decimal::Decimal;
use serde::Serialize;
use session::Session;
use std::path::PathBuf;
use std::str::FromStr;

/// The main entry point for the FundLens command-line dashboard.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from '{}'", cli.config.display()))?;
    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_logging(&config.logging)?;

    let mut session = Session::load(config)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Funds => handle_funds(&session),
        Commands::Analyze(args) => handle_analyze(&session, args),
        Commands::Compare(args) => handle_compare(&session, args),
        Commands::Allocate(args) => handle_allocate(&mut session, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance, comparison and bonus allocation reports for a set of funds.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Missing is fine: every setting has a default.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fund reference table.
    Funds,
    /// Characteristics and period metrics of a single fund.
    Analyze(AnalyzeArgs),
    /// Compare every fund over the comparison windows, grouped by type.
    Compare(CompareArgs),
    /// Summarise a bonus allocation against the budget.
    ///
    /// Every run starts from an all-zero allocation; only the --file and
    /// --bonus assignments given to this run are applied.
    Allocate(AllocateArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The fund name as it appears in the reference table.
    #[arg(long)]
    fund: String,

    /// First date of the range (format: YYYY-MM-DD). Defaults to the first available date.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date of the range (format: YYYY-MM-DD). Defaults to the last available date.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Rebase fund and benchmark to 100 on the first date of the range.
    #[arg(long)]
    rebase: bool,

    /// Print the series used for the metrics.
    #[arg(long)]
    show_series: bool,

    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct CompareArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AllocateArgs {
    /// A bonus assignment, e.g. `--bonus "Alpha Equity=250000"`. Repeatable.
    #[arg(long = "bonus", value_parser = parse_assignment)]
    bonuses: Vec<(String, Decimal)>,

    /// A CSV file with `fund,bonus` columns, applied before any --bonus.
    #[arg(long)]
    file: Option<PathBuf>,

    #[arg(long)]
    json: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, Decimal), String> {
    let (fund, amount) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected FUND=AMOUNT, got '{raw}'"))?;
    let fund = fund.trim();
    if fund.is_empty() {
        return Err(format!("missing fund name in '{raw}'"));
    }
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| format!("invalid amount '{}': {e}", amount.trim()))?;
    Ok((fund.to_string(), amount))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_funds(session: &Session) -> anyhow::Result<()> {
    println!("{}", render::funds_table(session.repository().funds()));
    Ok(())
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    fund: &'a core_types::FundRecord,
    revenue: Option<f64>,
    from: NaiveDate,
    to: NaiveDate,
    rebased: bool,
    metrics: Vec<analytics::PeriodMetricSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<Vec<core_types::SeriesPoint>>,
}

fn handle_analyze(session: &Session, args: AnalyzeArgs) -> anyhow::Result<()> {
    let repository = session.repository();
    let fund = repository.fund(&args.fund)?;
    let Some(raw_series) = repository.series(&fund.name) else {
        bail!("Fund '{}' has no series data.", fund.name);
    };
    let (Some(first), Some(last)) = (raw_series.first(), raw_series.last()) else {
        bail!("Fund '{}' has no series data.", fund.name);
    };

    let from = args.from.unwrap_or(first.date);
    let to = args.to.unwrap_or(last.date);
    if from > to {
        bail!("--from ({from}) is after --to ({to}).");
    }

    let series = build_return_series(raw_series, from, to, args.rebase);
    if series.is_empty() {
        tracing::warn!(fund = %fund.name, %from, %to, "No observations in the selected range.");
    }
    let metrics = MetricsEngine::new()
        .calculate(&series, &session.config().metric_windows())
        .with_context(|| format!("Failed to compute metrics for '{}'", fund.name))?;

    if args.json {
        return print_json(&AnalyzeOutput {
            fund,
            revenue: analytics::revenue(fund.aum.as_ref(), fund.fees.as_ref()),
            from,
            to,
            rebased: args.rebase,
            metrics,
            series: args.show_series.then_some(series),
        });
    }

    println!("Fund characteristics");
    println!("{}", render::characteristics_table(fund));
    println!();
    println!("Summary metrics ({from} to {to}{})", if args.rebase { ", rebased to 100" } else { "" });
    println!("{}", render::metrics_table(&metrics));
    if args.show_series {
        println!();
        println!("{}", render::series_table(&series));
    }
    Ok(())
}

fn handle_compare(session: &Session, args: CompareArgs) -> anyhow::Result<()> {
    let windows = session.config().comparison_windows();
    let rows = build_comparison(session.repository().funds_with_series(), &windows)
        .context("Failed to build the fund comparison")?;
    let groups = group_by_classification(rows);

    if args.json {
        return print_json(&groups);
    }
    if groups.is_empty() {
        println!("No fund has series data to compare.");
        return Ok(());
    }
    for group in &groups {
        println!("{}", group.title());
        println!("{}", render::comparison_table(group));
        println!();
    }
    Ok(())
}

fn handle_allocate(session: &mut Session, args: AllocateArgs) -> anyhow::Result<()> {
    session.apply_allocation(args.file.as_deref(), &args.bonuses)?;

    let settings = &session.config().allocation;
    let report = allocation::AllocationReport::build(
        session.allocation(),
        session.repository().funds(),
        settings.budget,
        settings.top_n,
    );

    if args.json {
        return print_json(&report);
    }

    println!("Budget");
    println!("{}", render::budget_table(&report));
    if report.has_recipients() {
        println!();
        println!("Top {} recipients", report.summary.top.len());
        println!("{}", render::top_recipients_table(&report));
        println!();
        println!("{}", render::breakdown_table("Gender", &report.by_gender));
        println!("{}", render::breakdown_table("Age band", &report.by_age_band));
    } else {
        println!("No bonus allocated yet.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_bonus_assignments() {
        assert_eq!(
            parse_assignment("Alpha Equity = 250000.50"),
            Ok(("Alpha Equity".to_string(), dec!(250000.50)))
        );
        // The last '=' separates, so fund names may contain one.
        assert_eq!(
            parse_assignment("A=B=10"),
            Ok(("A=B".to_string(), dec!(10)))
        );
        assert!(parse_assignment("Alpha").is_err());
        assert!(parse_assignment("=10").is_err());
        assert!(parse_assignment("Alpha=ten").is_err());
    }

    #[test]
    fn cli_accepts_repeated_bonuses() {
        let cli = Cli::try_parse_from([
            "fundlens",
            "allocate",
            "--bonus",
            "A=1",
            "--bonus",
            "B=2",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Allocate(args) => {
                assert_eq!(args.bonuses.len(), 2);
                assert!(args.json);
            }
            _ => panic!("expected the allocate command"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }
}
