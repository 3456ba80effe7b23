// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use santalink_core::SantalinkError;

/// Handle to an open SQLite database.
///
/// Opening runs the PRAGMA setup and all embedded migrations, so a
/// constructed `Database` is always ready for queries.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, configure PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, SantalinkError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        conn.call(move |conn| -> Result<(), tokio_rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;

            crate::migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Map a tokio-rusqlite error into the store-unavailable taxonomy.
///
/// Backend error shapes stop here; callers only ever see
/// [`SantalinkError::StoreUnavailable`].
pub fn map_tr_err<E>(err: E) -> SantalinkError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SantalinkError::store(err)
}
