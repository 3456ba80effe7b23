// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TokenStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use santalink_config::model::StorageConfig;
use santalink_core::{HealthStatus, SantalinkError, TokenRecord, TokenStatus, TokenStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed token store.
///
/// Wraps a [`Database`] handle and delegates query operations to the typed
/// query module. The database is lazily initialized on the first call to
/// [`TokenStore::initialize`].
pub struct SqliteTokenStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteTokenStore {
    /// Create a new SqliteTokenStore with the given configuration.
    ///
    /// The database connection is not opened until [`TokenStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SantalinkError> {
        self.db.get().ok_or_else(|| {
            SantalinkError::Internal("store not initialized -- call initialize() first".into())
        })
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), SantalinkError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| {
            SantalinkError::Internal("store already initialized".into())
        })?;
        debug!(path = %self.config.database_path, "SQLite token store initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, SantalinkError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), tokio_rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), SantalinkError> {
        // Checkpoint WAL before close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), tokio_rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<TokenRecord>, SantalinkError> {
        queries::tokens::get_token(self.db()?, token).await
    }

    async fn put(&self, record: &TokenRecord) -> Result<(), SantalinkError> {
        queries::tokens::upsert_token(self.db()?, record).await
    }

    async fn put_if_status(
        &self,
        record: &TokenRecord,
        expected: TokenStatus,
    ) -> Result<(), SantalinkError> {
        queries::tokens::update_token_if_status(self.db()?, record, expected).await
    }
}
