use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Absent, or owned by another identity. The two are never distinguished.
    #[error("record not found")]
    NotFound,

    #[error("Record store error: {0}")]
    Store(String),
}
