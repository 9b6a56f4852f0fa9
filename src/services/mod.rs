//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `status.rs`: due-date arithmetic and RED/ORANGE/GREEN classification.
//! - `store.rs`: state owner: reducer, typed mutations, persistence observer.
//! - `storage.rs`: state file location, load-with-fallback, atomic save.
//! - `dashboard.rs`: derived rows, status counts, chart data.
//! - `spreadsheet.rs`: export/template writing and additive import.
//! - `config.rs`: optional `config.toml` and data-dir resolution.
//! - `output.rs`: JSON/text output helpers and confirmation prompt.
//!
//! ## Conventions
//! - Prefer pure helpers where possible ("today" is always a parameter).
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod dashboard;
pub mod output;
pub mod spreadsheet;
pub mod status;
pub mod storage;
pub mod store;
