//! # FundLens Dataset Crate
//!
//! This crate reads the fund data from disk. It is the system's only source of
//! fund information; nothing is ever written back.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** Encapsulates the CSV layouts of the reference table, the
//!   per-fund series and allocation files, and hands typed `core-types` values to the
//!   rest of the application.
//! - **Load once:** `FundRepository::load` builds an immutable snapshot at startup.
//!   Calculations borrow from it and never mutate it.
//! - **Keep going:** Bad rows and missing series files are logged and skipped so
//!   one broken file does not take the other funds down with it.
//!
//! ## Public API
//!
//! - `FundRepository`: the loaded snapshot with lookups by fund name.
//! - `load_funds`, `load_series`, `load_allocations`: the individual file readers.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod loader;
pub mod repository;

pub use error::DatasetError;
pub use loader::{load_allocations, load_funds, load_series, read_allocations, read_funds, read_series};
pub use repository::FundRepository;
