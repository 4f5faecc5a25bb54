//! SQLite-backed persistence for Arc (§4, §5).
//!
//! [`traits::Storage`] is the contract the service layer depends on;
//! [`sqlite::store::SqliteStore`] is the only implementation today.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use sqlite::store::SqliteStore;
pub use traits::{BlockedIssue, Statistics, Storage, Transaction};
