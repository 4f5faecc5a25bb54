//! SQLite backend. `store` owns the connection and schema lifecycle; the
//! remaining submodules each implement one slice of [`crate::traits::Storage`]
//! as inherent methods on [`store::SqliteStore`], wired together by
//! [`storage_impl`].

pub(crate) mod comments;
pub(crate) mod config;
pub(crate) mod dependencies;
pub(crate) mod issues;
pub(crate) mod labels;
pub(crate) mod plans;
pub(crate) mod queries;
pub mod schema;
pub mod store;
mod storage_impl;
mod transaction;
pub(crate) mod workspaces;
