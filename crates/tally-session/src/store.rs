//! # Closing Store Contract
//!
//! The read/write contract the session needs from persistence: load the
//! record for a logical key, save a snapshot. `tally-db` provides the
//! production implementation; tests inject failing stores to exercise the
//! retry policy.

use chrono::NaiveDate;

use tally_core::ClosingRecord;
use tally_db::{ClosingRepository, DbResult};

/// Persistence seam for [`crate::session::ClosingSession`].
pub trait ClosingStore {
    /// Loads the record for a branch + business date, if one exists.
    fn load(
        &self,
        branch_id: &str,
        business_date: NaiveDate,
    ) -> impl std::future::Future<Output = DbResult<Option<ClosingRecord>>>;

    /// Persists a snapshot. A different record occupying the same logical
    /// key must abort with [`tally_db::DbError::DuplicateRecord`].
    fn save(&self, record: &ClosingRecord) -> impl std::future::Future<Output = DbResult<()>>;
}

impl ClosingStore for ClosingRepository {
    async fn load(
        &self,
        branch_id: &str,
        business_date: NaiveDate,
    ) -> DbResult<Option<ClosingRecord>> {
        self.get_by_key(branch_id, business_date).await
    }

    async fn save(&self, record: &ClosingRecord) -> DbResult<()> {
        ClosingRepository::save(self, record).await
    }
}
