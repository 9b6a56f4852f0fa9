//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `views.rs`: dashboard/show/settings (read-only screens).
//! - `manage.rs`: requirement/verifier CRUD and reset.
//! - `transfer.rs`: export/template/import.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod manage;
pub mod transfer;
pub mod views;

pub use manage::handle_manage_commands;
pub use transfer::handle_transfer_commands;
pub use views::handle_view_commands;

use chrono::NaiveDate;
use std::path::PathBuf;

/// Per-invocation values resolved once in `main`.
pub struct RunContext {
    pub today: NaiveDate,
    pub due_soon_days: i64,
    pub state_file: PathBuf,
}
