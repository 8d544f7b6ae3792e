use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

use crate::model::{Promotion, Show, Worker};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS promotions (
            promotion_id INTEGER PRIMARY KEY,
            name         TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shows (
            show_id    TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            arena      TEXT NOT NULL,
            show_date  TEXT NOT NULL,
            promotion  INTEGER NOT NULL REFERENCES promotions(promotion_id),
            url        TEXT NOT NULL,
            is_partial INTEGER NOT NULL DEFAULT 0 CHECK(is_partial IN (0, 1, 2))
        );
        CREATE INDEX IF NOT EXISTS idx_shows_promotion ON shows(promotion);
        CREATE INDEX IF NOT EXISTS idx_shows_date ON shows(show_date);

        CREATE TABLE IF NOT EXISTS workers (
            worker_id TEXT PRIMARY KEY,
            name      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS appearances (
            worker_id TEXT NOT NULL REFERENCES workers(worker_id),
            show_id   TEXT NOT NULL REFERENCES shows(show_id),
            UNIQUE(worker_id, show_id)
        );
        CREATE INDEX IF NOT EXISTS idx_appearances_show ON appearances(show_id);
        ",
    )
}

/// Rows actually inserted; existing rows are left untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveCounts {
    pub promotions: usize,
    pub shows: usize,
    pub workers: usize,
    pub appearances: usize,
}

impl SaveCounts {
    pub fn add(&mut self, other: SaveCounts) {
        self.promotions += other.promotions;
        self.shows += other.shows;
        self.workers += other.workers;
        self.appearances += other.appearances;
    }
}

/// Insert-if-absent a show with its promotion, workers and appearances, in
/// foreign-key order, as one transaction.
pub fn save_show(conn: &Connection, show: &Show, workers: &[Worker]) -> rusqlite::Result<SaveCounts> {
    let tx = conn.unchecked_transaction()?;
    let mut counts = SaveCounts::default();
    {
        counts.promotions = save_promotion(&tx, &show.promotion)?;

        counts.shows = tx.execute(
            "INSERT OR IGNORE INTO shows (show_id, name, arena, show_date, promotion, url, is_partial)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                show.show_id,
                show.name,
                show.arena,
                show.date.format("%Y-%m-%d").to_string(),
                show.promotion.id,
                show.url,
                show.kind.code(),
            ],
        )?;

        let mut w_stmt =
            tx.prepare("INSERT OR IGNORE INTO workers (worker_id, name) VALUES (?1, ?2)")?;
        let mut a_stmt =
            tx.prepare("INSERT OR IGNORE INTO appearances (worker_id, show_id) VALUES (?1, ?2)")?;
        for w in workers {
            let a = show.appearance(w);
            counts.workers += w_stmt.execute(rusqlite::params![a.worker_id, w.name])?;
            counts.appearances += a_stmt.execute(rusqlite::params![a.worker_id, a.show_id])?;
        }
    }
    tx.commit()?;
    Ok(counts)
}

fn save_promotion(conn: &Connection, promotion: &Promotion) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT OR IGNORE INTO promotions (promotion_id, name) VALUES (?1, ?2)",
        rusqlite::params![promotion.id, promotion.name],
    )
}

// ── Stats ──

#[derive(Debug, Serialize)]
pub struct Stats {
    pub promotions: usize,
    pub shows: usize,
    pub workers: usize,
    pub appearances: usize,
}

pub fn get_stats(conn: &Connection) -> rusqlite::Result<Stats> {
    let count = |table: &str| -> rusqlite::Result<usize> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
    };
    Ok(Stats {
        promotions: count("promotions")?,
        shows: count("shows")?,
        workers: count("workers")?,
        appearances: count("appearances")?,
    })
}

#[cfg(test)]
pub fn memory() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
    init_schema(&conn).unwrap();
    conn
}
