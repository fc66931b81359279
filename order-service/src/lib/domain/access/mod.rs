//! Identity-scoped access to owned records.
//!
//! Every protected lookup or mutation takes the caller's [`models::Identity`]
//! and is keyed by it. A record owned by someone else is reported exactly like
//! a record that does not exist.

pub mod errors;
pub mod models;
pub mod ports;
pub mod service;
