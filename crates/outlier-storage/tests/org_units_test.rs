//! SQLite hierarchy provider.

use std::sync::Arc;

use chrono::NaiveDate;
use outlier_core::errors::{OutlierErrorCode, RequestError, StorageError};
use outlier_core::traits::OrgUnitHierarchy;
use outlier_core::types::OrgUnitUid;
use outlier_engine::{DataItem, OutlierRequestBuilder, StatementDispatcher};
use outlier_storage::queries::org_units::{delete_org_unit, get_org_unit};
use outlier_storage::{OutlierStore, SqliteOrgUnitHierarchy};

fn hierarchy() -> (Arc<OutlierStore>, SqliteOrgUnitHierarchy) {
    let store = Arc::new(OutlierStore::open_in_memory().unwrap());
    let hierarchy = SqliteOrgUnitHierarchy::new(store.clone());
    for (uid, path) in [
        ("root", "/root"),
        ("regionA", "/root/regionA"),
        ("districtB", "/root/regionA/districtB"),
        ("facilityC", "/root/regionA/districtB/facilityC"),
        ("regionAB", "/root/regionAB"),
    ] {
        hierarchy.insert(uid, path).unwrap();
    }
    (store, hierarchy)
}

#[test]
fn test_lookup_round_trips_path_and_level() {
    let (_, hierarchy) = hierarchy();
    let record = hierarchy
        .org_unit(&OrgUnitUid::new("facilityC"))
        .unwrap()
        .unwrap();
    assert_eq!(record.path, "/root/regionA/districtB/facilityC");
    assert_eq!(record.level, 4);
    assert!(hierarchy
        .org_unit(&OrgUnitUid::new("nowhere"))
        .unwrap()
        .is_none());
}

#[test]
fn test_insert_replaces_path() {
    let (store, hierarchy) = hierarchy();
    hierarchy
        .insert("facilityC", "/root/regionAB/facilityC")
        .unwrap();
    let record = store
        .with_conn(|conn| get_org_unit(conn, "facilityC"))
        .unwrap()
        .unwrap();
    assert_eq!(record.path, "/root/regionAB/facilityC");
    assert_eq!(record.level, 3);
}

#[test]
fn test_subtree_does_not_capture_prefix_siblings() {
    let (_, hierarchy) = hierarchy();
    let subtree: Vec<String> = hierarchy
        .subtree("/root/regionA")
        .unwrap()
        .into_iter()
        .map(|r| r.uid.into_inner())
        .collect();
    assert_eq!(subtree, vec!["regionA", "districtB", "facilityC"]);
}

#[test]
fn test_delete() {
    let (store, _) = hierarchy();
    assert!(store.with_conn(|c| delete_org_unit(c, "regionAB")).unwrap());
    assert!(!store.with_conn(|c| delete_org_unit(c, "regionAB")).unwrap());
}

#[test]
fn test_corrupt_level_reported() {
    let (store, hierarchy) = hierarchy();
    store
        .with_conn(|conn| {
            conn.execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE organisationunit SET hierarchylevel = -1 WHERE uid = 'root';",
            )
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
        })
        .unwrap();
    let err = hierarchy.org_unit(&OrgUnitUid::new("root")).unwrap_err();
    assert_eq!(err.error_code(), "CORRUPT_RECORD");
}

#[test]
fn test_request_resolved_from_sqlite() {
    let (_, hierarchy) = hierarchy();
    let request = OutlierRequestBuilder::new()
        .data_item(DataItem::number("deA"))
        .resolve_org_units(&hierarchy, ["districtB", "regionAB"])
        .unwrap()
        .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
        .build()
        .unwrap();
    let sql = StatementDispatcher::default()
        .generate(Some(&request))
        .into_parts()
        .0;
    assert!(sql.contains("ou.path like '/root/regionA/districtB/%'"));
    assert!(sql.contains("ou.path like '/root/regionAB/%'"));

    let err = OutlierRequestBuilder::new()
        .resolve_org_units(&hierarchy, ["ghost"])
        .unwrap_err();
    assert_eq!(err, RequestError::UnknownOrgUnit { uid: "ghost".into() });
}
