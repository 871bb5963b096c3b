//! Nyckel-värde-lagring med JSON-blobbar
//!
//! Varje lyckad skrivning räknar upp nyckelns revision och publicerar
//! nyckelns ämne på ändringskanalen, oavsett vem som skrev.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::sync::{ChangeBus, Origin, Topic};
use crate::utils::{AppError, AppResult};

/// Senast kända revision per nyckel för det här handtaget
///
/// Delas med bevakaren så att handtagets egna skrivningar inte
/// rapporteras som externa.
pub type RevisionLedger = Arc<Mutex<HashMap<String, i64>>>;

pub struct StorageRepository {
    conn: Arc<Mutex<Connection>>,
    bus: ChangeBus,
    ledger: RevisionLedger,
    quota: usize,
}

impl StorageRepository {
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        bus: ChangeBus,
        ledger: RevisionLedger,
        quota: usize,
    ) -> Self {
        Self {
            conn,
            bus,
            ledger,
            quota,
        }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Läs värdet för en nyckel
    pub fn get(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        read_value(&conn, key)
    }

    /// Skriv ett värde, ersätter tidigare värde helt
    pub fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let value = value.to_string();
        self.update(key, move |_| Ok(Some(value)))?;
        Ok(())
    }

    /// Ta bort en nyckel. Returnerar false om den inte fanns.
    pub fn remove(&self, key: &str) -> AppResult<bool> {
        let mut existed = false;
        self.update(key, |current| {
            existed = current.is_some();
            Ok(None)
        })?;
        Ok(existed)
    }

    /// Läs-ändra-skriv i en transaktion mot senaste lagrade värdet
    ///
    /// `f` får nuvarande värde och returnerar nytt värde, `None` tar bort
    /// nyckeln. Om `f` returnerar fel rullas allt tillbaka och inget
    /// publiceras.
    pub fn update<F>(&self, key: &str, f: F) -> AppResult<Option<String>>
    where
        F: FnOnce(Option<&str>) -> AppResult<Option<String>>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = read_value(&tx, key)?;
        let next = f(current.as_deref())?;

        if next == current {
            // Ingen ändring, ingen revision
            return Ok(next);
        }

        match &next {
            Some(value) => {
                let needed = used_bytes_except(&tx, key)? + key.len() + value.len();
                if needed > self.quota {
                    warn!(
                        "Skrivning till '{}' avbruten: {} byte över kvoten {}",
                        key, needed, self.quota
                    );
                    return Err(AppError::QuotaExceeded {
                        needed,
                        quota: self.quota,
                    });
                }
                tx.execute(
                    "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    params![key, value],
                )?;
            }
            None => {
                tx.execute("DELETE FROM storage WHERE key = ?", [key])?;
            }
        }

        tx.execute(
            "INSERT INTO storage_revisions (key, revision) VALUES (?1, 1)
             ON CONFLICT(key) DO UPDATE SET revision = revision + 1",
            [key],
        )?;
        let revision: i64 = tx.query_row(
            "SELECT revision FROM storage_revisions WHERE key = ?",
            [key],
            |row| row.get(0),
        )?;

        // Ledgern hålls låst över commit så att bevakaren inte hinner se
        // den nya revisionen innan den är registrerad som egen
        {
            let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
            tx.commit()?;
            ledger.insert(key.to_string(), revision);
        }
        drop(conn);

        info!("Sparade '{}' (revision {})", key, revision);
        if let Some(topic) = Topic::for_key(key) {
            self.bus.publish(topic, Origin::Local);
        }

        Ok(next)
    }

    /// Nuvarande revision för en nyckel (0 om den aldrig skrivits)
    pub fn revision(&self, key: &str) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let revision = conn
            .query_row(
                "SELECT revision FROM storage_revisions WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(revision.unwrap_or(0))
    }

    /// Alla lagrade nycklar i bokstavsordning
    pub fn keys(&self) -> AppResult<Vec<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare("SELECT key FROM storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Standardposter för en nyckel, i ordning (id, JSON)
    pub fn seed_records(&self, key: &str) -> AppResult<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(
            "SELECT record_id, record FROM seed_records WHERE key = ? ORDER BY position",
        )?;
        let records = stmt
            .query_map([key], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, _>>()?;
        Ok(records)
    }

    /// Ta bort all användardata (standardposterna behålls)
    pub fn clear(&self) -> AppResult<usize> {
        let keys = self.keys()?;
        for key in &keys {
            self.remove(key)?;
        }
        info!("Rensade {} nycklar", keys.len());
        Ok(keys.len())
    }
}

fn read_value(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM storage WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn used_bytes_except(conn: &Connection, key: &str) -> AppResult<usize> {
    let used: i64 = conn.query_row(
        "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
         FROM storage WHERE key != ?",
        [key],
        |row| row.get(0),
    )?;
    Ok(used.max(0) as usize)
}

/// Läs alla revisioner från en anslutning
pub(crate) fn read_revisions(conn: &Connection) -> AppResult<HashMap<String, i64>> {
    let mut stmt = conn.prepare("SELECT key, revision FROM storage_revisions")?;
    let revisions = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<HashMap<String, i64>, _>>()?;
    Ok(revisions)
}
