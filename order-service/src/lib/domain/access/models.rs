use std::fmt;

use crate::domain::access::errors::AccessError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// The authenticated subject of a request.
///
/// Only the token-verification path constructs one, so holding an `Identity`
/// means a valid, unexpired token named this user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    user_id: UserId,
}

impl Identity {
    pub(crate) fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Whether this identity owns `record`.
    pub fn owns<R: OwnedRecord>(&self, record: &R) -> bool {
        record.owner() == self.user_id
    }

    /// Pass `record` through only if this identity owns it.
    ///
    /// # Errors
    /// * `NotFound` - The record belongs to another identity
    pub fn ensure_owned<R: OwnedRecord>(&self, record: R) -> Result<R, AccessError> {
        if self.owns(&record) {
            Ok(record)
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                owner_id = %record.owner(),
                "Record store returned a record owned by another identity"
            );
            Err(AccessError::NotFound)
        }
    }
}

/// Identifier of a protected record, unique within its record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A record that belongs to exactly one user.
pub trait OwnedRecord: Send + Sync + 'static {
    fn owner(&self) -> UserId;
}

/// An account owns its own record.
impl OwnedRecord for User {
    fn owner(&self) -> UserId {
        self.id
    }
}
