//! # FundLens Bonus Allocation
//!
//! This crate holds the manager bonus allocation and everything derived from it.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Like `analytics`, this is a pure logic crate that depends only
//!   on `core-types`. Loading assignments from disk is the `dataset` crate's job.
//! - **Exact money:** Bonus amounts are `rust_decimal::Decimal`. Percentages and
//!   averages are computed in decimals too, so totals always add up.
//! - **Report, don't enforce:** The table rejects negative amounts and unknown funds.
//!   Going over the budget is allowed and surfaced as `BudgetStatus::Over`.
//!
//! ## Public API
//!
//! - `AllocationTable`: the editable per-fund bonus amounts.
//! - `summarize` / `AllocationSummary`: budget usage, distribution statistics, top recipients.
//! - `group_by_gender`, `group_by_age_band`, `weighted_average`: breakdowns joined with
//!   the reference table.
//! - `AllocationReport`: all of the above in one value for rendering or JSON output.

pub mod breakdown;
pub mod error;
pub mod report;
pub mod summary;
pub mod table;

pub use breakdown::{
    group_by_age_band, group_by_attribute, group_by_gender, weighted_age, weighted_average,
    weighted_e_score, AgeBand, GroupBreakdown, UNKNOWN,
};
pub use error::AllocationError;
pub use report::AllocationReport;
pub use summary::{summarize, top_recipients, AllocationSummary, BudgetStatus, TopRecipient};
pub use table::{AllocationEntry, AllocationTable};
