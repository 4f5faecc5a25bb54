//! Config and metadata key-value helpers for [`SqliteStore`].
//!
//! Used internally by schema migration bookkeeping; not part of the public
//! service contract (the service layer has no need to expose arbitrary
//! key-value storage).

use rusqlite::{Connection, params};

use crate::error::{Result, StorageError};

pub(crate) fn set_metadata_on_conn(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

pub(crate) fn get_metadata_on_conn(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("metadata", key),
        other => StorageError::Query(other),
    })
}
