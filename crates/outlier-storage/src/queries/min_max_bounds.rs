//! minmaxdataelement queries and the SQLite bounds store.

use std::sync::Arc;

use outlier_core::errors::StorageError;
use outlier_core::types::{CategoryComboUid, DataItemUid, OrgUnitUid};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::connection::OutlierStore;

/// Key of a stored bound pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundsKey {
    pub data_item: DataItemUid,
    pub org_unit: OrgUnitUid,
    pub category_option_combo: CategoryComboUid,
}

impl BoundsKey {
    pub fn new(
        data_item: impl Into<DataItemUid>,
        org_unit: impl Into<OrgUnitUid>,
        category_option_combo: impl Into<CategoryComboUid>,
    ) -> Self {
        Self {
            data_item: data_item.into(),
            org_unit: org_unit.into(),
            category_option_combo: category_option_combo.into(),
        }
    }
}

/// A stored `[min, max]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    pub key: BoundsKey,
    pub min: f64,
    pub max: f64,
    /// Set by the bounds-generation job; cleared for manually curated pairs.
    pub generated: bool,
}

impl BoundsRecord {
    /// Whether `value` falls outside the pair, as the Min-Max statement tests it.
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }

    /// Distance to the nearer boundary.
    pub fn bound_distance(&self, value: f64) -> f64 {
        (value - self.min).abs().min((value - self.max).abs())
    }
}

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

const SELECT_COLUMNS: &str = "SELECT dataelement_uid, orgunit_uid, categoryoptioncombo_uid,
        minimumvalue, maximumvalue, generated
 FROM minmaxdataelement";

fn map_record(row: &Row<'_>) -> rusqlite::Result<BoundsRecord> {
    let data_item: String = row.get(0)?;
    let org_unit: String = row.get(1)?;
    let category_option_combo: String = row.get(2)?;
    Ok(BoundsRecord {
        key: BoundsKey::new(data_item, org_unit, category_option_combo),
        min: row.get(3)?,
        max: row.get(4)?,
        generated: row.get(5)?,
    })
}

/// Insert or replace a bound pair. `min > max` is rejected by the schema.
pub fn upsert_bounds(conn: &Connection, record: &BoundsRecord) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO minmaxdataelement
             (dataelement_uid, orgunit_uid, categoryoptioncombo_uid, minimumvalue, maximumvalue, generated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(dataelement_uid, orgunit_uid, categoryoptioncombo_uid) DO UPDATE SET
             minimumvalue = excluded.minimumvalue,
             maximumvalue = excluded.maximumvalue,
             generated = excluded.generated",
    )
    .map_err(sqlite_err)?
    .execute(params![
        record.key.data_item.as_str(),
        record.key.org_unit.as_str(),
        record.key.category_option_combo.as_str(),
        record.min,
        record.max,
        record.generated,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn get_bounds(conn: &Connection, key: &BoundsKey) -> Result<Option<BoundsRecord>, StorageError> {
    conn.prepare_cached(&format!(
        "{SELECT_COLUMNS}
         WHERE dataelement_uid = ?1 AND orgunit_uid = ?2 AND categoryoptioncombo_uid = ?3"
    ))
    .map_err(sqlite_err)?
    .query_row(
        params![
            key.data_item.as_str(),
            key.org_unit.as_str(),
            key.category_option_combo.as_str()
        ],
        map_record,
    )
    .optional()
    .map_err(sqlite_err)
}

/// All pairs of one data item, ordered by org unit then category combo.
pub fn list_bounds_for_data_item(
    conn: &Connection,
    data_item: &str,
) -> Result<Vec<BoundsRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "{SELECT_COLUMNS}
             WHERE dataelement_uid = ?1
             ORDER BY orgunit_uid, categoryoptioncombo_uid"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt.query_map(params![data_item], map_record).map_err(sqlite_err)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_err)?);
    }
    Ok(result)
}

/// Remove generated pairs of one data item, keeping manually curated ones.
pub fn delete_generated_bounds(conn: &Connection, data_item: &str) -> Result<usize, StorageError> {
    conn.prepare_cached("DELETE FROM minmaxdataelement WHERE dataelement_uid = ?1 AND generated = 1")
        .map_err(sqlite_err)?
        .execute(params![data_item])
        .map_err(sqlite_err)
}

/// Stored bounds provider over a store's `minmaxdataelement` table.
#[derive(Debug, Clone)]
pub struct SqliteBoundsStore {
    store: Arc<OutlierStore>,
}

impl SqliteBoundsStore {
    pub fn new(store: Arc<OutlierStore>) -> Self {
        Self { store }
    }

    pub fn upsert(&self, record: &BoundsRecord) -> Result<(), StorageError> {
        self.store.with_conn(|conn| upsert_bounds(conn, record))?;
        tracing::debug!(
            data_item = %record.key.data_item,
            org_unit = %record.key.org_unit,
            min = record.min,
            max = record.max,
            "stored min-max bounds"
        );
        Ok(())
    }

    pub fn get(&self, key: &BoundsKey) -> Result<Option<BoundsRecord>, StorageError> {
        self.store.with_conn(|conn| get_bounds(conn, key))
    }

    pub fn list_for_data_item(&self, data_item: &DataItemUid) -> Result<Vec<BoundsRecord>, StorageError> {
        self.store
            .with_conn(|conn| list_bounds_for_data_item(conn, data_item.as_str()))
    }

    pub fn delete_generated(&self, data_item: &DataItemUid) -> Result<usize, StorageError> {
        self.store
            .with_conn(|conn| delete_generated_bounds(conn, data_item.as_str()))
    }
}
