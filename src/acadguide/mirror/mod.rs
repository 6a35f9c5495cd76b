//! # Secondary tier
//!
//! A best-effort structured mirror of the primary tier, backed by SQLite and
//! owned by a dedicated worker thread. The façade talks to it through the
//! cloneable [`Mirror`] handle: write jobs are fire-and-forget (the send
//! result is deliberately discarded — a lost mirror write is a normal,
//! expected condition), read jobs carry a reply channel and degrade to an
//! empty result on any failure or timeout.
//!
//! The mirror may be entirely unavailable (no database file permission, a
//! newer schema on disk, ...). Callers treat that as the ordinary state
//! `Mirror::probe` reports; nothing in the store ever depends on a mirror
//! operation succeeding.

use crate::error::Result;
use crate::model::Collection;
use log::warn;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

mod db;
pub(crate) mod migrations;

/// How long a read waits for the worker before degrading to empty.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

enum Job {
    ReplaceAll {
        partition: Collection,
        records: Vec<Value>,
    },
    Insert {
        partition: Collection,
        record: Value,
    },
    Put {
        partition: Collection,
        record: Value,
    },
    Delete {
        partition: Collection,
        id: String,
    },
    ReadAll {
        partition: Collection,
        reply: Sender<Vec<Value>>,
    },
    ReadOne {
        partition: Collection,
        id: String,
        reply: Sender<Option<Value>>,
    },
    Flush {
        reply: Sender<()>,
    },
}

/// Handle to the mirror worker. Cheap to clone; the worker exits when the
/// last handle drops.
#[derive(Clone)]
pub struct Mirror {
    tx: Sender<Job>,
}

impl Mirror {
    /// Opens (creating if needed) the mirror database at `path`, applies
    /// pending migrations, and spawns the worker.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migrations::apply(&mut conn)?;
        Self::spawn(conn)
    }

    /// In-memory mirror, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migrations::apply(&mut conn)?;
        Self::spawn(conn)
    }

    /// Checks whether a mirror could be opened at `path` by opening and
    /// discarding a throwaway sibling database. The target file itself is
    /// never created or touched. Returns `false` on any error; never panics
    /// or propagates.
    pub fn probe(path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let Some(name) = path.file_name() else {
            return false;
        };
        let mut scratch_name = name.to_os_string();
        scratch_name.push(".probe");
        let scratch = path.with_file_name(scratch_name);

        let available = match Connection::open(&scratch) {
            Ok(mut conn) => migrations::apply(&mut conn).is_ok(),
            Err(err) => {
                warn!("mirror probe failed, continuing with primary tier only: {err}");
                false
            }
        };
        let _ = std::fs::remove_file(&scratch);
        available
    }

    fn spawn(conn: Connection) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("acadguide-mirror".to_string())
            .spawn(move || worker_loop(conn, rx))?;
        Ok(Self { tx })
    }

    /// Fire-and-forget full replacement of a partition.
    pub fn replace_all(&self, partition: Collection, records: Vec<Value>) {
        let _ = self.tx.send(Job::ReplaceAll { partition, records });
    }

    /// Fire-and-forget single-record insert.
    pub fn insert(&self, partition: Collection, record: Value) {
        let _ = self.tx.send(Job::Insert { partition, record });
    }

    /// Fire-and-forget upsert.
    pub fn put(&self, partition: Collection, record: Value) {
        let _ = self.tx.send(Job::Put { partition, record });
    }

    /// Fire-and-forget delete by id.
    pub fn delete(&self, partition: Collection, id: &str) {
        let _ = self.tx.send(Job::Delete {
            partition,
            id: id.to_string(),
        });
    }

    /// All records in a partition, or empty on any failure.
    pub fn read_all(&self, partition: Collection) -> Vec<Value> {
        let (reply, rx) = mpsc::channel();
        if self.tx.send(Job::ReadAll { partition, reply }).is_err() {
            return Vec::new();
        }
        rx.recv_timeout(READ_TIMEOUT).unwrap_or_default()
    }

    /// Blocks until every job queued before this call has been processed.
    /// Jobs run in FIFO order, so this acts as a write barrier for callers
    /// that are about to exit.
    pub fn flush(&self) {
        let (reply, rx) = mpsc::channel();
        if self.tx.send(Job::Flush { reply }).is_ok() {
            let _ = rx.recv_timeout(READ_TIMEOUT);
        }
    }

    /// A single record by id, or `None` on any failure.
    pub fn read_one(&self, partition: Collection, id: &str) -> Option<Value> {
        let (reply, rx) = mpsc::channel();
        let job = Job::ReadOne {
            partition,
            id: id.to_string(),
            reply,
        };
        if self.tx.send(job).is_err() {
            return None;
        }
        rx.recv_timeout(READ_TIMEOUT).ok().flatten()
    }
}

fn worker_loop(conn: Connection, rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        match job {
            Job::ReplaceAll { partition, records } => {
                if let Err(err) = db::replace_all(&conn, partition, &records) {
                    warn!("mirror replace of {partition} failed: {err}");
                }
            }
            Job::Insert { partition, record } => {
                if let Err(err) = db::insert(&conn, partition, &record) {
                    warn!("mirror insert into {partition} failed: {err}");
                }
            }
            Job::Put { partition, record } => {
                if let Err(err) = db::put(&conn, partition, &record) {
                    warn!("mirror put into {partition} failed: {err}");
                }
            }
            Job::Delete { partition, id } => {
                if let Err(err) = db::delete(&conn, partition, &id) {
                    warn!("mirror delete from {partition} failed: {err}");
                }
            }
            Job::ReadAll { partition, reply } => {
                let records = db::read_all(&conn, partition).unwrap_or_else(|err| {
                    warn!("mirror read of {partition} failed: {err}");
                    Vec::new()
                });
                let _ = reply.send(records);
            }
            Job::ReadOne {
                partition,
                id,
                reply,
            } => {
                let record = db::read_one(&conn, partition, &id).unwrap_or_else(|err| {
                    warn!("mirror lookup in {partition} failed: {err}");
                    None
                });
                let _ = reply.send(record);
            }
            Job::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }
}
