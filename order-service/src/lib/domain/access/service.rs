use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::domain::access::models::OwnedRecord;
use crate::domain::access::models::RecordId;
use crate::domain::access::ports::OwnedRecordRepository;

/// Owner-scoped entry point to a record store.
///
/// Handlers reach owned records only through this service. It passes the
/// caller's identity into every store predicate and additionally refuses any
/// record the store hands back with a different owner.
pub struct ScopedRecordService<R, D, S>
where
    R: OwnedRecord,
    D: Send + 'static,
    S: OwnedRecordRepository<R, D>,
{
    store: Arc<S>,
    _records: PhantomData<fn() -> (R, D)>,
}

impl<R, D, S> ScopedRecordService<R, D, S>
where
    R: OwnedRecord,
    D: Send + 'static,
    S: OwnedRecordRepository<R, D>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _records: PhantomData,
        }
    }

    /// Create a record owned by the caller.
    pub async fn create(&self, identity: &Identity, draft: D) -> Result<R, AccessError> {
        let record = self.store.create(identity.user_id(), draft).await?;
        identity.ensure_owned(record)
    }

    /// Fetch one of the caller's records.
    ///
    /// # Errors
    /// * `NotFound` - Absent or owned by someone else
    /// * `Store` - Record store failed
    pub async fn get(&self, identity: &Identity, id: RecordId) -> Result<R, AccessError> {
        let record = self
            .store
            .find(identity.user_id(), id)
            .await?
            .ok_or(AccessError::NotFound)?;

        identity.ensure_owned(record)
    }

    /// Fetch all of the caller's records.
    pub async fn list(&self, identity: &Identity) -> Result<Vec<R>, AccessError> {
        let records = self.store.list(identity.user_id()).await?;
        let total = records.len();

        let owned: Vec<R> = records
            .into_iter()
            .filter(|record| identity.owns(record))
            .collect();

        if owned.len() != total {
            tracing::warn!(
                user_id = %identity.user_id(),
                dropped = total - owned.len(),
                "Record store listed records owned by another identity"
            );
        }

        Ok(owned)
    }

    /// Replace one of the caller's records.
    ///
    /// # Errors
    /// * `NotFound` - Zero rows matched the id and owner
    pub async fn update(&self, identity: &Identity, id: RecordId, draft: D) -> Result<R, AccessError> {
        let record = self
            .store
            .update(identity.user_id(), id, draft)
            .await?
            .ok_or(AccessError::NotFound)?;

        identity.ensure_owned(record)
    }

    /// Remove one of the caller's records.
    ///
    /// # Errors
    /// * `NotFound` - Zero rows matched the id and owner
    pub async fn delete(&self, identity: &Identity, id: RecordId) -> Result<(), AccessError> {
        let removed = self.store.delete(identity.user_id(), id).await?;

        if removed == 0 {
            return Err(AccessError::NotFound);
        }

        tracing::debug!(user_id = %identity.user_id(), record_id = %id, "Record deleted");
        Ok(())
    }
}
