//! # tally-db: SQLite Persistence for the Cashier-Closing Suite
//!
//! Owns the read/write contract the closing session needs: closing records
//! keyed by (branch, business date) and per-branch configuration with a
//! change marker for cross-session propagation.
//!
//! ## Layers
//! ```text
//! tally-session ──► ClosingRepository ───┐
//! tally-session ──► SettingsRepository ──┼──► SqlitePool (WAL mode)
//! tally-sync ─────► SettingsRepository ──┘    + embedded migrations
//! ```
//!
//! All queries are runtime-bound; the pure computation layers never touch
//! this crate.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::closing::{generate_record_id, ClosingRepository};
pub use repository::settings::SettingsRepository;
