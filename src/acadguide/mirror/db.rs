//! Partition operations executed by the mirror worker.
//!
//! Each partition is a table named after its collection. Most are keyed by
//! the record's `id`; `notifications` and `updates` use an auto-assigned
//! surrogate key and are addressed through the `id` inside the JSON body.

use crate::error::Result;
use crate::model::Collection;
use crate::validate::record_id;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Clears the partition and inserts `records` one at a time. A per-record
/// failure is logged and does not abort the batch. Returns how many records
/// landed.
pub(super) fn replace_all(
    conn: &Connection,
    partition: Collection,
    records: &[Value],
) -> Result<usize> {
    conn.execute(&format!("DELETE FROM {partition}"), [])?;
    let mut inserted = 0;
    for record in records {
        match insert(conn, partition, record) {
            Ok(()) => inserted += 1,
            Err(err) => warn!("mirror insert into {partition} failed: {err}"),
        }
    }
    Ok(inserted)
}

pub(super) fn insert(conn: &Connection, partition: Collection, record: &Value) -> Result<()> {
    let body = serde_json::to_string(record)?;
    if partition.auto_keyed() {
        conn.execute(
            &format!("INSERT INTO {partition} (body) VALUES (?1)"),
            params![body],
        )?;
    } else {
        conn.execute(
            &format!("INSERT INTO {partition} (id, body) VALUES (?1, ?2)"),
            params![record_id(record).unwrap_or_default(), body],
        )?;
    }
    Ok(())
}

/// Upsert by record id.
pub(super) fn put(conn: &Connection, partition: Collection, record: &Value) -> Result<()> {
    let body = serde_json::to_string(record)?;
    let id = record_id(record).unwrap_or_default();
    if partition.auto_keyed() {
        let changed = conn.execute(
            &format!("UPDATE {partition} SET body = ?2 WHERE json_extract(body, '$.id') = ?1"),
            params![id, body],
        )?;
        if changed == 0 {
            conn.execute(
                &format!("INSERT INTO {partition} (body) VALUES (?1)"),
                params![body],
            )?;
        }
    } else {
        conn.execute(
            &format!(
                "INSERT INTO {partition} (id, body) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET body = excluded.body"
            ),
            params![id, body],
        )?;
    }
    Ok(())
}

pub(super) fn delete(conn: &Connection, partition: Collection, id: &str) -> Result<()> {
    if partition.auto_keyed() {
        conn.execute(
            &format!("DELETE FROM {partition} WHERE json_extract(body, '$.id') = ?1"),
            params![id],
        )?;
    } else {
        conn.execute(&format!("DELETE FROM {partition} WHERE id = ?1"), params![id])?;
    }
    Ok(())
}

pub(super) fn read_all(conn: &Connection, partition: Collection) -> Result<Vec<Value>> {
    let mut stmt = conn.prepare(&format!("SELECT body FROM {partition}"))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let body: String = row.get(0)?;
        match serde_json::from_str(&body) {
            Ok(value) => records.push(value),
            Err(err) => warn!("corrupt mirror row in {partition}: {err}"),
        }
    }
    Ok(records)
}

pub(super) fn read_one(
    conn: &Connection,
    partition: Collection,
    id: &str,
) -> Result<Option<Value>> {
    let sql = if partition.auto_keyed() {
        format!("SELECT body FROM {partition} WHERE json_extract(body, '$.id') = ?1")
    } else {
        format!("SELECT body FROM {partition} WHERE id = ?1")
    };
    let body: Option<String> = conn
        .query_row(&sql, params![id], |row| row.get(0))
        .optional()?;
    match body {
        None => Ok(None),
        Some(text) => Ok(serde_json::from_str(&text).ok()),
    }
}
