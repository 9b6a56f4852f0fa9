//! ReguTrack: regulatory compliance requirements, their verifiers, and
//! RED/ORANGE/GREEN due-date status, kept in a local JSON state file.
//!
//! ## Layout
//! - `cli.rs`: clap command tree.
//! - `commands/`: thin handlers wiring CLI input to services and output.
//! - `services/`: status engine, store, storage, dashboard, spreadsheets.
//! - `domain/`: data-only model and seed dataset.

pub mod cli;
pub mod commands;
pub mod domain;
pub mod services;

pub use cli::*;
pub use commands::RunContext;
pub use domain::models::*;
pub use domain::seed::seed_state;
pub use services::config::*;
pub use services::dashboard::*;
pub use services::output::*;
pub use services::spreadsheet::*;
pub use services::status::*;
pub use services::storage::*;
pub use services::store::*;
