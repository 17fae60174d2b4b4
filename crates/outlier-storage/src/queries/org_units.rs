//! organisationunit queries and the SQLite hierarchy provider.

use std::sync::Arc;

use outlier_core::errors::StorageError;
use outlier_core::traits::{OrgUnitHierarchy, OrgUnitRecord};
use outlier_core::types::OrgUnitUid;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::connection::OutlierStore;

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_record((uid, path, level): (String, String, i64)) -> Result<OrgUnitRecord, StorageError> {
    let level = u32::try_from(level).map_err(|_| StorageError::CorruptRecord {
        table: "organisationunit".to_string(),
        message: format!("unit {uid} has level {level}"),
    })?;
    Ok(OrgUnitRecord {
        uid: OrgUnitUid::new(uid),
        path,
        level,
    })
}

/// Insert or replace an org unit.
pub fn upsert_org_unit(conn: &Connection, record: &OrgUnitRecord) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO organisationunit (uid, path, hierarchylevel) VALUES (?1, ?2, ?3)
         ON CONFLICT(uid) DO UPDATE SET path = excluded.path, hierarchylevel = excluded.hierarchylevel",
    )
    .map_err(sqlite_err)?
    .execute(params![record.uid.as_str(), record.path, record.level])
    .map_err(sqlite_err)?;
    Ok(())
}

/// Look up one org unit by uid.
pub fn get_org_unit(conn: &Connection, uid: &str) -> Result<Option<OrgUnitRecord>, StorageError> {
    let row = conn
        .prepare_cached("SELECT uid, path, hierarchylevel FROM organisationunit WHERE uid = ?1")
        .map_err(sqlite_err)?
        .query_row(params![uid], map_record)
        .optional()
        .map_err(sqlite_err)?;
    row.map(into_record).transpose()
}

/// Units at or below `path`, ordered by path.
pub fn list_subtree(conn: &Connection, path: &str) -> Result<Vec<OrgUnitRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT uid, path, hierarchylevel FROM organisationunit
             WHERE path = ?1 OR substr(path, 1, length(?1) + 1) = ?1 || '/'
             ORDER BY path",
        )
        .map_err(sqlite_err)?;
    let rows = stmt.query_map(params![path], map_record).map_err(sqlite_err)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(into_record(row.map_err(sqlite_err)?)?);
    }
    Ok(result)
}

/// Delete an org unit and, through the foreign key, its stored bounds.
pub fn delete_org_unit(conn: &Connection, uid: &str) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached("DELETE FROM organisationunit WHERE uid = ?1")
        .map_err(sqlite_err)?
        .execute(params![uid])
        .map_err(sqlite_err)?;
    Ok(deleted > 0)
}

/// [`OrgUnitHierarchy`] over a store's `organisationunit` table.
#[derive(Debug, Clone)]
pub struct SqliteOrgUnitHierarchy {
    store: Arc<OutlierStore>,
}

impl SqliteOrgUnitHierarchy {
    pub fn new(store: Arc<OutlierStore>) -> Self {
        Self { store }
    }

    /// Register a unit. The level is the path depth.
    pub fn insert(&self, uid: &str, path: &str) -> Result<(), StorageError> {
        let level = path.split('/').filter(|s| !s.is_empty()).count() as u32;
        let record = OrgUnitRecord {
            uid: OrgUnitUid::new(uid),
            path: path.to_string(),
            level,
        };
        self.store.with_conn(|conn| upsert_org_unit(conn, &record))
    }

    pub fn subtree(&self, path: &str) -> Result<Vec<OrgUnitRecord>, StorageError> {
        self.store.with_conn(|conn| list_subtree(conn, path))
    }
}

impl OrgUnitHierarchy for SqliteOrgUnitHierarchy {
    fn org_unit(&self, uid: &OrgUnitUid) -> Result<Option<OrgUnitRecord>, StorageError> {
        let record = self.store.with_conn(|conn| get_org_unit(conn, uid.as_str()))?;
        tracing::trace!(uid = %uid, found = record.is_some(), "org unit lookup");
        Ok(record)
    }
}
