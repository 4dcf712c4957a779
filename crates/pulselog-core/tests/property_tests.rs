//! Property tests for the store and formatters.

use proptest::prelude::*;

use pulselog_core::config::StoreConfig;
use pulselog_core::formatters::{
    calculate_bmi, format_phone_number, format_resident_number, gender_from_resident_number,
};
use pulselog_core::models::{Gender, PatientRecord, StoredRecord};
use pulselog_core::store::{MemorySlots, RecordStore};

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z가-힣]{1,12}"
}

fn resident_strategy() -> impl Strategy<Value = String> {
    "[0-9]{13}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn save_adds_exactly_one(names in prop::collection::vec(name_strategy(), 0..8), new_name in name_strategy()) {
        let store = RecordStore::new(MemorySlots::new(), StoreConfig::default());
        for name in &names {
            store.save_record(PatientRecord::new(name.as_str(), "9012311234567")).unwrap();
        }

        let stored = store.save_record(PatientRecord::new(new_name.as_str(), "9012311234567")).unwrap();
        let records = store.list_records().unwrap();
        prop_assert_eq!(records.len(), names.len() + 1);
        prop_assert_eq!(records.iter().filter(|r| r.id == stored.id).count(), 1);
        prop_assert_eq!(records.last(), Some(&stored));
    }

    #[test]
    fn delete_removes_exactly_one(count in 1usize..8, pick in any::<prop::sample::Index>()) {
        let store = RecordStore::new(MemorySlots::new(), StoreConfig::default());
        for i in 0..count {
            store.save_record(PatientRecord::new(format!("P{}", i), "9012311234567")).unwrap();
        }
        let before = store.list_records().unwrap();
        let victim = before[pick.index(count)].id.clone();

        let after = store.delete_records([&victim]).unwrap();
        prop_assert_eq!(after.len(), count - 1);
        prop_assert!(after.iter().all(|r| r.id != victim));
        let expected: Vec<_> = before.into_iter().filter(|r| r.id != victim).collect();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn bmi_matches_stored_inputs(height in 50.0f64..250.0, weight in 2.0f64..300.0) {
        let mut record = PatientRecord::new("Kim", "9012311234567");
        record.set_body_measurements(Some(height), Some(weight));
        let expected = calculate_bmi(Some(height), Some(weight));
        prop_assert_eq!(record.bmi(), expected);

        let reloaded = StoredRecord::from_value(serde_json::to_value(StoredRecord::new(record)).unwrap()).unwrap();
        prop_assert_eq!(reloaded.record.bmi(), expected);
    }

    #[test]
    fn masks_are_idempotent(input in "[0-9 -]{0,20}") {
        let phone = format_phone_number(&input);
        prop_assert_eq!(format_phone_number(&phone), phone.clone());
        prop_assert!(phone.chars().filter(char::is_ascii_digit).count() <= 11);

        let resident = format_resident_number(&input);
        prop_assert_eq!(format_resident_number(&resident), resident.clone());
        prop_assert!(resident.chars().filter(char::is_ascii_digit).count() <= 13);
    }

    #[test]
    fn gender_follows_seventh_digit(resident in resident_strategy()) {
        let seventh = resident.as_bytes()[6];
        let expected = match seventh {
            b'1' | b'3' | b'5' => Some(Gender::Male),
            b'2' | b'4' | b'6' => Some(Gender::Female),
            _ => None,
        };
        prop_assert_eq!(gender_from_resident_number(&resident), expected);
        prop_assert_eq!(PatientRecord::new("Kim", &resident).gender(), expected);
    }
}
