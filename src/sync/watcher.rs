//! Bevakning av ändringar gjorda av andra anslutningar
//!
//! SQLite saknar notifiering mellan processer, så en bakgrundstråd läser
//! `PRAGMA data_version` med fast intervall. Värdet ändras bara när någon
//! annan anslutning har gjort commit. Då jämförs revisionerna per nyckel
//! med handtagets ledger och ändrade nycklar publiceras som externa.

use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::PoisonError;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::bus::{ChangeBus, Origin, Topic};
use crate::db::storage_repo::read_revisions;
use crate::db::{configure_connection, RevisionLedger};
use crate::utils::AppResult;

/// Standardintervall för bevakningen
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Körande bevakare. Tråden stoppas och inväntas vid drop.
pub struct ExternalWatcher {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl ExternalWatcher {
    pub fn start(
        path: PathBuf,
        interval: Duration,
        bus: ChangeBus,
        ledger: RevisionLedger,
    ) -> AppResult<Self> {
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure_connection(&conn)?;

        let mut state = WatchState {
            conn,
            bus,
            ledger,
            data_version: 0,
        };
        state.prime()?;

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("byggdesk-watcher".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = state.tick() {
                            warn!("Bevakning misslyckades: {}", e);
                        }
                    }
                    // Stoppsignal eller ägaren borta
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        info!("Bevakar {:?} var {:?}", path, interval);

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stoppa bevakningen och vänta in tråden
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Bevakartråden avslutades med panic");
            }
        }
    }
}

impl Drop for ExternalWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct WatchState {
    conn: Connection,
    bus: ChangeBus,
    ledger: RevisionLedger,
    data_version: i64,
}

impl WatchState {
    /// Läs utgångsläget utan att publicera något
    fn prime(&mut self) -> AppResult<()> {
        self.data_version = self.read_data_version()?;
        let revisions = read_revisions(&self.conn)?;
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, revision) in revisions {
            let known = ledger.entry(key).or_insert(revision);
            *known = (*known).max(revision);
        }
        Ok(())
    }

    fn tick(&mut self) -> AppResult<()> {
        let version = self.read_data_version()?;
        if version == self.data_version {
            return Ok(());
        }
        self.data_version = version;

        let revisions = read_revisions(&self.conn)?;
        for topic in self.changed_topics(revisions) {
            debug!("Extern ändring: {}", topic);
            self.bus.publish(topic, Origin::External);
        }
        Ok(())
    }

    /// Jämför mot ledgern; nycklar med högre revision är andras skrivningar
    fn changed_topics(&self, revisions: HashMap<String, i64>) -> Vec<Topic> {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        let mut topics = Vec::new();

        for (key, revision) in revisions {
            let known = ledger.get(&key).copied().unwrap_or(0);
            if revision > known {
                ledger.insert(key.clone(), revision);
                if let Some(topic) = Topic::for_key(&key) {
                    if !topics.contains(&topic) {
                        topics.push(topic);
                    }
                }
            }
        }

        topics
    }

    fn read_data_version(&self) -> AppResult<i64> {
        let version = self
            .conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    const WAIT: Duration = Duration::from_secs(3);

    fn open_pair() -> (tempfile::TempDir, Database, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("byggdesk.db");
        let first = Database::open(&path).unwrap();
        let second = Database::open(&path).unwrap();
        (dir, first, second)
    }

    #[test]
    fn test_external_write_is_published() {
        let (_dir, first, second) = open_pair();
        let sub = first.subscribe(&[Topic::Projects]);
        let _watcher = first.watch_external(Duration::from_millis(20)).unwrap();

        second.storage().set("projects", "[]").unwrap();

        let event = sub.next_timeout(WAIT).expect("ingen extern händelse");
        assert_eq!(event.topic, Topic::Projects);
        assert_eq!(event.origin, Origin::External);
    }

    #[test]
    fn test_own_writes_are_not_external() {
        let (_dir, first, _second) = open_pair();
        let sub = first.subscribe(&[Topic::Roles]);
        let _watcher = first.watch_external(Duration::from_millis(20)).unwrap();

        first.storage().set("userRoles", "[]").unwrap();
        let local = sub.next_timeout(WAIT).unwrap();
        assert_eq!(local.origin, Origin::Local);

        // Ge bevakaren några varv; ingen extern händelse får komma
        std::thread::sleep(Duration::from_millis(150));
        assert!(sub.drain().iter().all(|e| e.origin == Origin::Local));
    }

    #[test]
    fn test_stop_joins_thread() {
        let (_dir, first, _second) = open_pair();
        let watcher = first.watch_external(Duration::from_millis(10)).unwrap();
        assert_eq!(watcher.interval(), Duration::from_millis(10));
        watcher.stop();
    }

    #[test]
    fn test_existing_data_is_not_reported_on_start() {
        let (_dir, first, second) = open_pair();
        second.storage().set("companies", "[]").unwrap();

        let sub = first.subscribe(&[Topic::Companies]);
        let _watcher = first.watch_external(Duration::from_millis(20)).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        assert!(sub.drain().is_empty());
    }
}
