//! # tally-session: Cashier-Closing Session Orchestration
//!
//! The stateful layer the closing screen talks to. Owns the draft record,
//! the float-target resolution, the dirty/save gate, and the retry-once
//! save/load boundary. Every computation below it is pure and re-run from
//! scratch on each committed mutation; nothing here blocks or suspends
//! except the persistence calls themselves.
//!
//! ## Wiring Example
//! ```rust,ignore
//! use tally_core::DenominationTable;
//! use tally_db::{Database, DbConfig};
//! use tally_session::{ClosingSession, SessionConfig};
//! use tally_sync::{ConfigBus, SettingsWatcher, DEFAULT_POLL_INTERVAL};
//!
//! let db = Database::new(DbConfig::new("./tally.db")).await?;
//! let bus = ConfigBus::new();
//!
//! // Watch the branch configuration for out-of-process changes.
//! let (watcher, watcher_handle) =
//!     SettingsWatcher::new(db.settings(), bus.clone(), "branch-7", DEFAULT_POLL_INTERVAL);
//! tokio::spawn(watcher.run());
//!
//! let mut session = ClosingSession::new(
//!     DenominationTable::standard(),
//!     SessionConfig::from_env(),
//!     "branch-7",
//!     business_date,
//! );
//! if let Some(target) = db.settings().float_target("branch-7").await? {
//!     session.apply_branch_config(Some(target));
//! }
//! session.load(&db.closings()).await?;
//!
//! // UI event loop: counts in, broadcasts adopted, saves gated on dirty.
//! let mut config_rx = bus.subscribe();
//! while let Ok(message) = config_rx.recv().await {
//!     session.on_broadcast(&message);
//! }
//! ```

pub mod config;
pub mod dirty;
pub mod error;
pub mod resolver;
pub mod session;
pub mod store;

pub use config::{SessionConfig, DEFAULT_FLOAT_TARGET};
pub use dirty::SignatureTracker;
pub use error::{SessionError, SessionResult};
pub use resolver::{FloatTargetResolver, FloatTargetSource};
pub use session::{ClosingSession, LoadTicket};
pub use store::ClosingStore;
