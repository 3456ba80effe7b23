// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token record CRUD and the conditional status transition.

use std::str::FromStr;

use rusqlite::params;
use santalink_core::{SantalinkError, TokenRecord, TokenStatus};

use crate::database::{Database, map_tr_err};

/// Insert a token record, overwriting any existing row at the same key.
///
/// Token identifiers come from a 128-bit space, so the overwrite case is
/// not treated specially.
pub async fn upsert_token(db: &Database, record: &TokenRecord) -> Result<(), SantalinkError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), tokio_rusqlite::Error> {
            conn.execute(
                "INSERT INTO tokens (token, gifter, giftee, status)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(token) DO UPDATE SET
                     gifter = excluded.gifter,
                     giftee = excluded.giftee,
                     status = excluded.status",
                params![
                    record.token,
                    record.gifter,
                    record.giftee,
                    record.status.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a token record by its key, or `None` if absent.
pub async fn get_token(db: &Database, token: &str) -> Result<Option<TokenRecord>, SantalinkError> {
    let token = token.to_string();
    db.connection()
        .call(
            move |conn| -> Result<Option<TokenRecord>, tokio_rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT token, gifter, giftee, status FROM tokens WHERE token = ?1",
                )?;
                let result = stmt.query_row(params![token], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                });
                match result {
                    Ok((token, gifter, giftee, status)) => {
                        let status = TokenStatus::from_str(&status).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?;
                        Ok(Some(TokenRecord {
                            token,
                            gifter,
                            giftee,
                            status,
                        }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            },
        )
        .await
        .map_err(map_tr_err)
}

/// Write a token record only if its stored status equals `expected`.
///
/// The guarded UPDATE executes atomically under SQLite's writer lock, so of
/// any number of concurrent unused -> used transitions exactly one sees a
/// matched row. A zero-row update means the precondition did not hold
/// (status changed underneath us, or the row is gone).
pub async fn update_token_if_status(
    db: &Database,
    record: &TokenRecord,
    expected: TokenStatus,
) -> Result<(), SantalinkError> {
    let record = record.clone();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, tokio_rusqlite::Error> {
            let n = conn.execute(
                "UPDATE tokens SET
                     gifter = ?2,
                     giftee = ?3,
                     status = ?4,
                     used_at = CASE
                         WHEN ?4 = 'used' AND status = 'unused'
                         THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         ELSE used_at
                     END
                 WHERE token = ?1 AND status = ?5",
                params![
                    record.token,
                    record.gifter,
                    record.giftee,
                    record.status.to_string(),
                    expected.to_string(),
                ],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(SantalinkError::PreconditionFailed);
    }
    Ok(())
}
