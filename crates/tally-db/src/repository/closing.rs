//! # Closing Record Repository
//!
//! Database operations for cashier-closing records.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Closing Record Lifecycle                             │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── get_by_key(branch, date) → Some(record) | None (fresh draft)   │
//! │                                                                         │
//! │  2. EDIT (in memory, tally-session)                                    │
//! │     └── counts, plan, payment figures mutate the draft only            │
//! │                                                                         │
//! │  3. SAVE                                                               │
//! │     └── save() → duplicate-key check + insert-or-update, one txn       │
//! │         A different record id on the same (branch, date) aborts        │
//! │         with DuplicateRecord and writes nothing.                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{Amount, ClosingRecord, NetCashInputs, RecordHeader};

/// Repository for closing-record database operations.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    pool: SqlitePool,
}

impl ClosingRepository {
    /// Creates a new ClosingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClosingRepository { pool }
    }

    /// Gets a record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ClosingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, branch_id, business_date, cashier_id, notes,
                   gross_revenue, card_settled, transfer_settled,
                   payout_adjustments, receivables_cash, deposits_cash,
                   float_target, cash_counts, withdrawal_plan
            FROM closing_records
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Gets the record for a logical key (branch + business date).
    pub async fn get_by_key(
        &self,
        branch_id: &str,
        business_date: NaiveDate,
    ) -> DbResult<Option<ClosingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, branch_id, business_date, cashier_id, notes,
                   gross_revenue, card_settled, transfer_settled,
                   payout_adjustments, receivables_cash, deposits_cash,
                   float_target, cash_counts, withdrawal_plan
            FROM closing_records
            WHERE branch_id = ?1 AND business_date = ?2
            "#,
        )
        .bind(branch_id)
        .bind(business_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Saves a record: insert when new, update when it already owns its
    /// logical key.
    ///
    /// Runs in one transaction. If a record with a *different* id already
    /// occupies (branch_id, business_date), the save aborts with
    /// [`DbError::DuplicateRecord`] and nothing is written.
    pub async fn save(&self, record: &ClosingRecord) -> DbResult<()> {
        debug!(
            id = %record.header.id,
            branch_id = %record.header.branch_id,
            business_date = %record.header.business_date,
            "Saving closing record"
        );

        let now = Utc::now();
        let cash_counts = serde_json::to_string(&record.cash_counts)?;
        let withdrawal_plan = serde_json::to_string(&record.withdrawal_plan)?;

        let mut tx = self.pool.begin().await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM closing_records WHERE branch_id = ?1 AND business_date = ?2")
                .bind(&record.header.branch_id)
                .bind(record.header.business_date)
                .fetch_optional(&mut *tx)
                .await?;

        match existing {
            Some(ref existing_id) if *existing_id != record.header.id => {
                return Err(DbError::DuplicateRecord {
                    branch_id: record.header.branch_id.clone(),
                    business_date: record.header.business_date,
                });
            }
            Some(_) => {
                sqlx::query(
                    r#"
                    UPDATE closing_records SET
                        cashier_id = ?2,
                        notes = ?3,
                        gross_revenue = ?4,
                        card_settled = ?5,
                        transfer_settled = ?6,
                        payout_adjustments = ?7,
                        receivables_cash = ?8,
                        deposits_cash = ?9,
                        float_target = ?10,
                        cash_counts = ?11,
                        withdrawal_plan = ?12,
                        updated_at = ?13
                    WHERE id = ?1
                    "#,
                )
                .bind(&record.header.id)
                .bind(&record.header.cashier_id)
                .bind(&record.header.notes)
                .bind(record.inputs.gross_revenue.units())
                .bind(record.inputs.card_settled.units())
                .bind(record.inputs.transfer_settled.units())
                .bind(record.inputs.payout_adjustments.units())
                .bind(record.inputs.receivables_cash.units())
                .bind(record.inputs.deposits_cash.units())
                .bind(record.float_target_at_save.units())
                .bind(&cash_counts)
                .bind(&withdrawal_plan)
                .bind(now.to_rfc3339())
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO closing_records (
                        id, branch_id, business_date, cashier_id, notes,
                        gross_revenue, card_settled, transfer_settled,
                        payout_adjustments, receivables_cash, deposits_cash,
                        float_target, cash_counts, withdrawal_plan,
                        created_at, updated_at
                    ) VALUES (
                        ?1, ?2, ?3, ?4, ?5,
                        ?6, ?7, ?8,
                        ?9, ?10, ?11,
                        ?12, ?13, ?14,
                        ?15, ?15
                    )
                    "#,
                )
                .bind(&record.header.id)
                .bind(&record.header.branch_id)
                .bind(record.header.business_date)
                .bind(&record.header.cashier_id)
                .bind(&record.header.notes)
                .bind(record.inputs.gross_revenue.units())
                .bind(record.inputs.card_settled.units())
                .bind(record.inputs.transfer_settled.units())
                .bind(record.inputs.payout_adjustments.units())
                .bind(record.inputs.receivables_cash.units())
                .bind(record.inputs.deposits_cash.units())
                .bind(record.float_target_at_save.units())
                .bind(&cash_counts)
                .bind(&withdrawal_plan)
                .bind(now.to_rfc3339())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a record by ID. Returns true when a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM closing_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Most recent `updated_at` for a branch, for dashboard listings.
    pub async fn last_updated(&self, branch_id: &str) -> DbResult<Option<DateTime<Utc>>> {
        let value: Option<String> = sqlx::query_scalar(
            "SELECT MAX(updated_at) FROM closing_records WHERE branch_id = ?1",
        )
        .bind(branch_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(value.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|d| d.with_timezone(&Utc))))
    }
}

/// Generates a new closing record ID.
pub fn generate_record_id() -> String {
    Uuid::new_v4().to_string()
}

fn record_from_row(row: SqliteRow) -> DbResult<ClosingRecord> {
    let cash_counts: BTreeMap<String, i64> =
        serde_json::from_str(&row.try_get::<String, _>("cash_counts")?)?;
    let withdrawal_plan: BTreeMap<String, i64> =
        serde_json::from_str(&row.try_get::<String, _>("withdrawal_plan")?)?;

    Ok(ClosingRecord {
        header: RecordHeader {
            id: row.try_get("id")?,
            branch_id: row.try_get("branch_id")?,
            business_date: row.try_get("business_date")?,
            cashier_id: row.try_get("cashier_id")?,
            notes: row.try_get("notes")?,
        },
        inputs: NetCashInputs {
            gross_revenue: Amount::from_units(row.try_get("gross_revenue")?),
            card_settled: Amount::from_units(row.try_get("card_settled")?),
            transfer_settled: Amount::from_units(row.try_get("transfer_settled")?),
            payout_adjustments: Amount::from_units(row.try_get("payout_adjustments")?),
            receivables_cash: Amount::from_units(row.try_get("receivables_cash")?),
            deposits_cash: Amount::from_units(row.try_get("deposits_cash")?),
        },
        float_target_at_save: Amount::from_units(row.try_get("float_target")?),
        cash_counts,
        withdrawal_plan,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
