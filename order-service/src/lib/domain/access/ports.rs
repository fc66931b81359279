use async_trait::async_trait;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::OwnedRecord;
use crate::domain::access::models::RecordId;
use crate::domain::user::models::UserId;

/// Narrow record-store interface for owned records (addresses, payment
/// methods, orders).
///
/// Every operation is keyed by the owner; implementations must put the owner
/// in the lookup predicate (`record_id AND owner_id`), never filter afterwards.
/// `D` is the draft used to create or replace a record.
#[async_trait]
pub trait OwnedRecordRepository<R, D>: Send + Sync + 'static
where
    R: OwnedRecord,
    D: Send + 'static,
{
    /// Persist a new record owned by `owner`.
    ///
    /// # Errors
    /// * `Store` - Persistence failed
    async fn create(&self, owner: UserId, draft: D) -> Result<R, AccessError>;

    /// Fetch one record owned by `owner`.
    ///
    /// # Returns
    /// `None` when no record matches both the id and the owner
    async fn find(&self, owner: UserId, id: RecordId) -> Result<Option<R>, AccessError>;

    /// Fetch every record owned by `owner`.
    async fn list(&self, owner: UserId) -> Result<Vec<R>, AccessError>;

    /// Replace a record owned by `owner`.
    ///
    /// # Returns
    /// `None` when zero rows matched
    async fn update(&self, owner: UserId, id: RecordId, draft: D)
        -> Result<Option<R>, AccessError>;

    /// Remove a record owned by `owner`.
    ///
    /// # Returns
    /// Number of rows removed
    async fn delete(&self, owner: UserId, id: RecordId) -> Result<u64, AccessError>;
}
