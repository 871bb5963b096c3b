use rusqlite::{params, Connection};
use tracing::{info, warn};

use super::schema::{CREATE_TABLES, SCHEMA_VERSION};
use crate::models::seed_collections;
use crate::utils::AppResult;

/// Kör alla nödvändiga migrationer
pub fn run_migrations(conn: &Connection) -> AppResult<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        // Ny databas - skapa allt
        info!("Skapar ny databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version > SCHEMA_VERSION {
        warn!(
            "Databasen har schema version {}, programmet känner bara till {}",
            current_version, SCHEMA_VERSION
        );
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> AppResult<i32> {
    // Kontrollera om schema_migrations-tabellen finns
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .ok()
        .flatten();

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(CREATE_TABLES)?;

    insert_seed_records(conn)?;

    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    info!("Initial setup klar");
    Ok(())
}

/// Skriv standardposterna en gång; befintliga rader lämnas orörda
fn insert_seed_records(conn: &Connection) -> AppResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO seed_records (key, position, record_id, record) VALUES (?1, ?2, ?3, ?4)",
    )?;

    let mut total = 0;
    for collection in seed_collections()? {
        for (position, (record_id, record)) in collection.records.iter().enumerate() {
            stmt.execute(params![collection.key, position as i64, record_id, record])?;
            total += 1;
        }
    }

    info!("Lade till {} standardposter", total);
    Ok(())
}
