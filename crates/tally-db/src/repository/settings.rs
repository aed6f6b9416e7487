//! # Branch Settings Repository
//!
//! Per-branch configuration consumed by the float-target resolver.
//!
//! ## Read-Through Cache + Change Marker
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 branch_settings Access Pattern                          │
//! │                                                                         │
//! │  float_target(branch)                                                  │
//! │       │                                                                 │
//! │       ├── cache hit ──► return cached value (no query)                  │
//! │       └── cache miss ─► SELECT, fill cache, return                      │
//! │                                                                         │
//! │  set_float_target(branch, value)                                       │
//! │       └── UPSERT row, settings_rev = settings_rev + 1, refresh cache    │
//! │                                                                         │
//! │  settings_rev(branch)   ← polled by the tally-sync watcher; a moved     │
//! │                           marker means "re-read the value"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The marker's value carries no meaning on its own; only its movement
//! signals dependents to invalidate and re-read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for branch-scoped configuration.
///
/// Clones share one cache: the pool and the cache are both internally
/// reference-counted.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
    cache: Arc<Mutex<HashMap<String, i64>>>,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository {
            pool,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The branch's configured cash float target, read-through cached.
    ///
    /// Returns `None` when the branch has no configuration row yet.
    pub async fn float_target(&self, branch_id: &str) -> DbResult<Option<i64>> {
        if let Some(&cached) = self
            .cache
            .lock()
            .expect("settings cache mutex poisoned")
            .get(branch_id)
        {
            return Ok(Some(cached));
        }

        let value: Option<i64> =
            sqlx::query_scalar("SELECT cash_float_target FROM branch_settings WHERE branch_id = ?1")
                .bind(branch_id)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(v) = value {
            self.cache
                .lock()
                .expect("settings cache mutex poisoned")
                .insert(branch_id.to_string(), v);
        }

        Ok(value)
    }

    /// Writes the branch's cash float target and bumps the change marker.
    pub async fn set_float_target(&self, branch_id: &str, value: i64) -> DbResult<()> {
        debug!(branch_id, value, "Updating branch float target");

        sqlx::query(
            r#"
            INSERT INTO branch_settings (branch_id, cash_float_target, settings_rev, updated_at)
            VALUES (?1, ?2, 1, ?3)
            ON CONFLICT(branch_id) DO UPDATE SET
                cash_float_target = excluded.cash_float_target,
                settings_rev = branch_settings.settings_rev + 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(branch_id)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.cache
            .lock()
            .expect("settings cache mutex poisoned")
            .insert(branch_id.to_string(), value);

        Ok(())
    }

    /// Current change-marker revision for a branch; 0 when no row exists.
    pub async fn settings_rev(&self, branch_id: &str) -> DbResult<i64> {
        let rev: Option<i64> =
            sqlx::query_scalar("SELECT settings_rev FROM branch_settings WHERE branch_id = ?1")
                .bind(branch_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(rev.unwrap_or(0))
    }

    /// Drops the cached value so the next read goes to the database.
    ///
    /// Called by watchers when the change marker moves.
    pub fn invalidate(&self, branch_id: &str) {
        self.cache
            .lock()
            .expect("settings cache mutex poisoned")
            .remove(branch_id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
