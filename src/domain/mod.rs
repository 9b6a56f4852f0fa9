//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep persisted state, report and config structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make state-file and JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs`: state, derived rows, report/output and config structs.
//! - `seed.rs`: the fixed seed dataset used on first run and on reset.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! The state file keeps camelCase field names (`lastDate`, `verifierId`, ...).
//! Renaming a field silently drops existing state back to the seed dataset.
//! Changes to report structs affect `--json` outputs and `docs/contracts/*`.

pub mod models;
pub mod seed;
