pub mod schema;
pub mod migrations;
pub mod storage_repo;

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub use storage_repo::{RevisionLedger, StorageRepository};

use crate::models::Entity;
use crate::store::EntityStore;
use crate::sync::{ChangeBus, ExternalWatcher, Subscription, Topic};
use crate::utils::{AppError, AppResult};

/// Standardkvot, samma storleksordning som en webbläsares lokala lagring
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Huvuddatabas-wrapper med thread-safe access
///
/// Ett handtag motsvarar en flik: kloner delar anslutning och
/// ändringskanal, medan ett nytt `open` på samma fil är en egen flik som
/// bara ser andras ändringar via [`ExternalWatcher`].
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
    bus: ChangeBus,
    ledger: RevisionLedger,
    quota: usize,
}

impl Database {
    /// Öppna eller skapa databas
    pub fn open(path: &Path) -> AppResult<Self> {
        // Skapa katalog om den inte finns
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        configure_connection(&conn)?;

        let db = Self::from_connection(conn, Some(path.to_path_buf()));
        db.migrate()?;
        Ok(db)
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self::from_connection(conn, None);
        db.migrate()?;
        Ok(db)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
            bus: ChangeBus::new(),
            ledger: Arc::new(Mutex::new(HashMap::new())),
            quota: DEFAULT_QUOTA_BYTES,
        }
    }

    /// Sätt lagringskvot i byte
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> AppResult<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        migrations::run_migrations(&conn)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Hämta nyckel-värde-lagringen
    pub fn storage(&self) -> StorageRepository {
        StorageRepository::new(
            Arc::clone(&self.conn),
            self.bus.clone(),
            Arc::clone(&self.ledger),
            self.quota,
        )
    }

    /// Hämta entitetslagring för en posttyp
    pub fn store<T: Entity>(&self) -> EntityStore<T> {
        EntityStore::new(self.storage())
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Prenumerera på ändringar
    pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
        self.bus.subscribe(topics)
    }

    /// Starta bevakning av ändringar från andra anslutningar
    ///
    /// Kräver en filbaserad databas; in-memory-databaser kan inte delas.
    pub fn watch_external(&self, interval: Duration) -> AppResult<ExternalWatcher> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| AppError::other("Bevakning kräver en filbaserad databas"))?;
        ExternalWatcher::start(path, interval, self.bus.clone(), Arc::clone(&self.ledger))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            path: self.path.clone(),
            bus: self.bus.clone(),
            ledger: Arc::clone(&self.ledger),
            quota: self.quota,
        }
    }
}

/// Konfigurera SQLite för en filbaserad anslutning
pub(crate) fn configure_connection(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    Ok(())
}
