//! Record store integration tests against SQLite.

use pulselog_core::config::StoreConfig;
use pulselog_core::db::Database;
use pulselog_core::models::PatientRecord;
use pulselog_core::store::{RecordStore, StoreError};

fn make_record(name: &str, resident: &str) -> PatientRecord {
    let mut record = PatientRecord::new(name, resident);
    record.set_phone("01012345678");
    record.set_body_measurements(Some(170.0), Some(65.0));
    record.add_symptom("두통");
    record
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    let saved = {
        let store = RecordStore::new(Database::open(&path).unwrap(), StoreConfig::default());
        vec![
            store.save_record(make_record("Kim", "9012311234567")).unwrap(),
            store.save_record(make_record("Lee", "9201012234567")).unwrap(),
        ]
    };

    let store = RecordStore::new(Database::open(&path).unwrap(), StoreConfig::default());
    assert_eq!(store.list_records().unwrap(), saved);
    assert!(store.storage().slot_updated_at("userInfoData").unwrap().is_some());
}

#[test]
fn test_insertion_order_kept() {
    let store = RecordStore::new(Database::open_in_memory().unwrap(), StoreConfig::default());
    for name in ["C", "A", "B"] {
        store.save_record(make_record(name, "9012311234567")).unwrap();
    }

    let names: Vec<String> = store
        .list_records()
        .unwrap()
        .into_iter()
        .map(|r| r.record.name)
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

#[test]
fn test_slot_written_by_older_version() {
    let db = Database::open_in_memory().unwrap();
    db.write_slot(
        "userInfoData",
        r#"[
            {"id": 1704445200000, "createdAt": "2024-01-05T09:00:00.000Z",
             "name": "Kim", "residentNumber": "901231-1234567", "gender": "",
             "height": "170", "weight": "65", "bmi": "",
             "stressLevel": "높음", "selectedSymptoms": "두통, 불면",
             "ab_ms": "120.5"}
        ]"#,
    )
    .unwrap();
    let store = RecordStore::new(db, StoreConfig::default());

    let records = store.list_records().unwrap();
    assert_eq!(records.len(), 1);
    let stored = &records[0];
    assert_eq!(stored.id, "1704445200000");
    assert_eq!(stored.record.bmi(), Some(22.5));
    assert_eq!(stored.record.stress, "높음");
    assert_eq!(stored.record.selected_symptoms(), ["두통", "불면"]);
    assert_eq!(stored.record.waveform.ab_ms, Some(120.5));
    assert_eq!(stored.record.gender().map(|g| g.as_str()), Some("male"));
}

#[test]
fn test_one_bad_element_lenient_vs_strict() {
    let payload = r#"[
        {"id": "a", "createdAt": "2024-01-05T09:00:00Z", "name": "Kim", "residentNumber": "901231-1234567"},
        {"id": "b", "createdAt": "not a date", "name": "Lee", "residentNumber": "920101-2234567"}
    ]"#;

    let db = Database::open_in_memory().unwrap();
    db.write_slot("userInfoData", payload).unwrap();
    let lenient = RecordStore::new(db, StoreConfig::default());
    let records = lenient.list_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a");

    let db = Database::open_in_memory().unwrap();
    db.write_slot("userInfoData", payload).unwrap();
    let strict = RecordStore::new(db, StoreConfig::strict());
    assert!(matches!(strict.list_records(), Err(StoreError::Parse(_))));

    // Mutations never drop the unreadable element
    assert!(matches!(
        lenient.save_record(make_record("Park", "8001011234567")),
        Err(StoreError::Persistence(_))
    ));
    assert_eq!(lenient.storage().read_slot("userInfoData").unwrap().as_deref(), Some(payload));
}

#[test]
fn test_custom_slot_name() {
    let db = Database::open_in_memory().unwrap();
    let store = RecordStore::new(db, StoreConfig::default().with_slot_name("clinicB"));
    store.save_record(make_record("Kim", "9012311234567")).unwrap();

    assert_eq!(store.storage().list_slots().unwrap(), ["clinicB"]);
    assert_eq!(store.storage().read_slot("userInfoData").unwrap(), None);
}
