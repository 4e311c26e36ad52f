//! SQLite event-log sink.
//!
//! RULE: Only store.rs talks to the database.
//! The engine appends; nothing in the simulation reads back.

use rusqlite::{Connection, params};
use crate::{
    error::SimResult,
    event::EventLogEntry,
    types::Tick,
};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the trace database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, version: &str, started_at: i64) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, version, started_at) VALUES (?1, ?2, ?3)",
            params![run_id, version, started_at],
        )?;
        Ok(())
    }

    /// Record how the run ended. `finish_time` is None when it did not converge.
    pub fn record_outcome(
        &self,
        run_id: &str,
        finish_time: Option<Tick>,
        ticks: u64,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE run SET finish_time = ?2, ticks = ?3 WHERE run_id = ?1",
            params![run_id, finish_time.map(|t| t as i64), ticks as i64],
        )?;
        Ok(())
    }

    pub fn run_outcome(&self, run_id: &str) -> SimResult<(Option<Tick>, Option<u64>)> {
        let row = self.conn.query_row(
            "SELECT finish_time, ticks FROM run WHERE run_id = ?1",
            params![run_id],
            |row| Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, Option<i64>>(1)?)),
        )?;
        Ok((row.0.map(|t| t as u64), row.1.map(|t| t as u64)))
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, tick, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.run_id,
                entry.tick as i64,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_tick(&self, run_id: &str, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, tick, event_type, payload
             FROM event_log WHERE run_id = ?1 AND tick = ?2
             ORDER BY id ASC",
            params![run_id, tick as i64],
        )
    }

    pub fn events_for_run(&self, run_id: &str) -> SimResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, tick, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
            params![run_id],
        )
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn query_events(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt.query_map(params, |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                run_id:     row.get(1)?,
                tick:       row.get::<_, i64>(2)? as u64,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
