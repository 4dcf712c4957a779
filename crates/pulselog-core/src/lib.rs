//! PulseLog Core Library
//!
//! Local record keeping for patient pulse-wave measurements.
//!
//! # Architecture
//!
//! ```text
//!  Intake form ──► Formatters ──► PatientRecord ──► validate
//!                                                     │
//!                                         ┌───────────▼───────────┐
//!                                         │      RecordStore      │
//!                                         │ read-modify-write of  │
//!                                         │ one JSON slot         │
//!                                         └───────────┬───────────┘
//!                                                     │ snapshot
//!                         ┌───────────────────────────┼──────────────────────┐
//!                         ▼                           ▼                      ▼
//!              filter → sort → window          Sheet / CSV export     JSON backup
//!                                                     ▲
//!                                   device sheet ─────┘ latest-session import
//! ```
//!
//! # Modules
//!
//! - [`formatters`]: phone / resident-number masking, BMI, date parsing
//! - [`models`]: PatientRecord, StoredRecord, Field
//! - [`db`]: SQLite slot storage
//! - [`store`]: record store over a slot
//! - [`query`]: filter, sort and windowing
//! - [`interop`]: sheet model, CSV and xlsx files, wave-measurement import
//! - [`backup`]: backup / restore documents
//! - [`config`]: store settings and locations

pub mod backup;
pub mod config;
pub mod db;
pub mod formatters;
pub mod interop;
pub mod models;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use backup::{Backup, BackupError};
pub use config::StoreConfig;
pub use db::Database;
pub use interop::{
    ColumnMapping, ImportLayout, InteropError, MeasurementRow, Sheet, SheetFormat, XlsxFormat,
};
pub use models::{Field, Gender, PatientRecord, StoredRecord, ValidationError, WaveformMetrics};
pub use query::{DateRange, FilterSpec, Query, QueryResult, SortDirection, SortSpec, Window};
pub use store::{MemorySlots, RecordStore, SlotStorage, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PulseLogError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No valid rows: {0}")]
    NoValidRowsError(String),

    #[error("Invalid backup format: {0}")]
    InvalidBackupFormatError(String),

    #[error("Import already in progress: {0}")]
    ImportInProgress(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StoreError> for PulseLogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => PulseLogError::ValidationError(v.to_string()),
            StoreError::Persistence(msg) => PulseLogError::PersistenceError(msg),
            StoreError::Parse(msg) => PulseLogError::ParseError(msg),
        }
    }
}

impl From<db::DbError> for PulseLogError {
    fn from(e: db::DbError) -> Self {
        PulseLogError::PersistenceError(e.to_string())
    }
}

impl From<InteropError> for PulseLogError {
    fn from(e: InteropError) -> Self {
        match e {
            InteropError::NoValidRows(subject) => PulseLogError::NoValidRowsError(subject),
            InteropError::Parse(msg) | InteropError::WorkbookRead(msg) => PulseLogError::ParseError(msg),
            InteropError::WorkbookWrite(msg) => PulseLogError::PersistenceError(msg),
            InteropError::Io(err) => PulseLogError::PersistenceError(err.to_string()),
        }
    }
}

impl From<BackupError> for PulseLogError {
    fn from(e: BackupError) -> Self {
        match e {
            BackupError::InvalidFormat(msg) => PulseLogError::InvalidBackupFormatError(msg),
            BackupError::Parse(msg) => PulseLogError::ParseError(msg),
            BackupError::Store(err) => err.into(),
        }
    }
}

impl From<serde_json::Error> for PulseLogError {
    fn from(e: serde_json::Error) -> Self {
        PulseLogError::ParseError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PulseLogError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PulseLogError::PersistenceError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a record store at the given database path.
#[uniffi::export]
pub fn open_record_store(path: String, lenient_read: bool) -> Result<Arc<PulseLogCore>, PulseLogError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PulseLogCore::new(
        db,
        StoreConfig::default().with_lenient_read(lenient_read),
    )))
}

/// Create an in-memory record store (for testing).
#[uniffi::export]
pub fn open_record_store_in_memory() -> Result<Arc<PulseLogCore>, PulseLogError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(PulseLogCore::new(db, StoreConfig::default())))
}

/// Mask a phone number as typed.
#[uniffi::export]
pub fn format_phone_number(value: String) -> String {
    formatters::format_phone_number(&value)
}

/// Mask a resident-registration number as typed.
#[uniffi::export]
pub fn format_resident_number(value: String) -> String {
    formatters::format_resident_number(&value)
}

/// BMI rounded to one decimal, if both inputs are usable.
#[uniffi::export]
pub fn calculate_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    formatters::calculate_bmi(height_cm, weight_kg)
}

/// Choices for the personality field, in display order.
#[uniffi::export]
pub fn personality_options() -> Vec<String> {
    models::PERSONALITY_OPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Choices for the stress and work-intensity fields, in display order.
#[uniffi::export]
pub fn level_options() -> Vec<String> {
    models::LEVEL_OPTIONS.iter().map(|s| s.to_string()).collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe record store wrapper for FFI.
///
/// Store calls are serialized by one mutex. Imports additionally hold an
/// import guard; an import issued while another runs is rejected.
#[derive(uniffi::Object)]
pub struct PulseLogCore {
    store: Arc<Mutex<RecordStore<Database>>>,
    import_guard: Mutex<()>,
}

impl PulseLogCore {
    fn new(db: Database, config: StoreConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(RecordStore::new(db, config))),
            import_guard: Mutex::new(()),
        }
    }

    /// Hold the import guard, or fail at once if another import holds it.
    fn begin_import(&self, subject: &str) -> Result<MutexGuard<'_, ()>, PulseLogError> {
        match self.import_guard.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(PulseLogError::ImportInProgress(subject.to_string())),
            Err(TryLockError::Poisoned(e)) => Err(e.into()),
        }
    }
}

#[uniffi::export]
impl PulseLogCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Validate and save a new record.
    pub fn save_record(&self, record: FfiPatientRecord) -> Result<FfiStoredRecord, PulseLogError> {
        let store = self.store.lock()?;
        let stored = store.save_record(record.into())?;
        Ok(stored.into())
    }

    /// All stored records.
    pub fn list_records(&self) -> Result<Vec<FfiStoredRecord>, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.list_records()?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Get a record by ID.
    pub fn get_record(&self, id: String) -> Result<FfiStoredRecord, PulseLogError> {
        let store = self.store.lock()?;
        store
            .get_record(&id)?
            .map(|r| r.into())
            .ok_or(PulseLogError::NotFound(id))
    }

    /// Delete records by ID; returns the remainder.
    pub fn delete_records(&self, ids: Vec<String>) -> Result<Vec<FfiStoredRecord>, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.delete_records(&ids)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Replace a record's body by ID; returns the collection.
    pub fn replace_record(
        &self,
        id: String,
        record: FfiPatientRecord,
    ) -> Result<Vec<FfiStoredRecord>, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.replace_record(&id, record.into())?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Filter, sort and window the current collection.
    pub fn query_records(&self, query: FfiQuery) -> Result<FfiQueryResult, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.list_records()?;
        let query = query.into_query(store.config().window_increment)?;
        Ok(query.run(&records).into())
    }

    // =========================================================================
    // Spreadsheet Operations
    // =========================================================================

    /// Export all records as CSV text.
    pub fn export_csv(&self, full_columns: bool) -> Result<String, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.list_records()?;
        Ok(Sheet::from_records(&records, &mapping(full_columns)).to_csv())
    }

    /// Export all records to a CSV file; returns the row count.
    pub fn export_csv_file(&self, path: String, full_columns: bool) -> Result<u32, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.list_records()?;
        let sheet = Sheet::from_records(&records, &mapping(full_columns));
        sheet.write_csv(&path)?;
        Ok(saturating_u32(sheet.rows.len()))
    }

    /// Export all records as xlsx workbook bytes (one sheet named "Data").
    pub fn export_xlsx(&self, full_columns: bool) -> Result<Vec<u8>, PulseLogError> {
        let store = self.store.lock()?;
        let records = store.list_records()?;
        Ok(XlsxFormat.to_bytes(&Sheet::from_records(&records, &mapping(full_columns)))?)
    }

    /// Fill a record's waveform metrics from the device sheet's latest
    /// session for that record's name.
    pub fn import_measurement_csv(
        &self,
        record: FfiPatientRecord,
        csv_text: String,
    ) -> Result<FfiPatientRecord, PulseLogError> {
        let _guard = self.begin_import(&record.name)?;
        let sheet = Sheet::from_csv(Sheet::DEFAULT_NAME, &csv_text)?;
        import_into(&sheet, record)
    }

    /// Same as [`Self::import_measurement_csv`], reading the first sheet of
    /// workbook file bytes (xlsx, xls, ods).
    pub fn import_measurement_workbook(
        &self,
        record: FfiPatientRecord,
        workbook: Vec<u8>,
    ) -> Result<FfiPatientRecord, PulseLogError> {
        let _guard = self.begin_import(&record.name)?;
        let sheet = XlsxFormat.from_bytes(&workbook)?;
        import_into(&sheet, record)
    }

    // =========================================================================
    // Backup Operations
    // =========================================================================

    /// Backup document for the current collection.
    pub fn create_backup_json(&self) -> Result<String, PulseLogError> {
        let store = self.store.lock()?;
        let backup = backup::create_backup(&store)?;
        Ok(backup.to_json()?)
    }

    /// Restore from a backup document; returns the record count.
    pub fn restore_backup_json(&self, json: String) -> Result<u32, PulseLogError> {
        let parsed = Backup::from_json(&json)?;
        let store = self.store.lock()?;
        Ok(saturating_u32(backup::restore_backup(&store, &parsed)?))
    }
}

fn import_into(sheet: &Sheet, record: FfiPatientRecord) -> Result<FfiPatientRecord, PulseLogError> {
    let mut record: PatientRecord = record.into();
    interop::import_latest_measurement(sheet, &mut record, &ImportLayout::default())?;
    Ok(record.into())
}

/// Counts cross the FFI as u32; larger values clamp instead of wrapping.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn mapping(full_columns: bool) -> ColumnMapping {
    if full_columns {
        ColumnMapping::full()
    } else {
        ColumnMapping::standard()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient record. `gender` and `bmi` are outputs only.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientRecord {
    pub name: String,
    pub resident_number: String,
    pub gender: Option<String>,
    pub phone: String,
    pub personality: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub stress: String,
    pub work_intensity: String,
    pub pulse: String,
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub waveform: Vec<Option<f64>>,
    pub selected_symptoms: Vec<String>,
    pub medication: String,
    pub preference: String,
    pub memo: String,
}

impl From<PatientRecord> for FfiPatientRecord {
    fn from(record: PatientRecord) -> Self {
        Self {
            resident_number: record.resident_number().to_string(),
            gender: record.gender().map(|g| g.as_str().to_string()),
            height: record.height(),
            weight: record.weight(),
            bmi: record.bmi(),
            waveform: record.waveform.values().to_vec(),
            selected_symptoms: record.selected_symptoms().to_vec(),
            name: record.name,
            phone: record.phone,
            personality: record.personality,
            stress: record.stress,
            work_intensity: record.work_intensity,
            pulse: record.pulse,
            systolic_bp: record.systolic_bp,
            diastolic_bp: record.diastolic_bp,
            medication: record.medication,
            preference: record.preference,
            memo: record.memo,
        }
    }
}

impl From<FfiPatientRecord> for PatientRecord {
    fn from(ffi: FfiPatientRecord) -> Self {
        let mut record = PatientRecord::new(ffi.name, &ffi.resident_number);
        record.set_phone(&ffi.phone);
        record.set_body_measurements(ffi.height, ffi.weight);
        record.personality = ffi.personality;
        record.stress = ffi.stress;
        record.work_intensity = ffi.work_intensity;
        record.pulse = ffi.pulse;
        record.systolic_bp = ffi.systolic_bp;
        record.diastolic_bp = ffi.diastolic_bp;
        let mut metrics = [None; models::WAVEFORM_METRIC_COUNT];
        for (slot, value) in metrics.iter_mut().zip(ffi.waveform) {
            *slot = value;
        }
        record.waveform = WaveformMetrics::from_options(metrics);
        for symptom in &ffi.selected_symptoms {
            record.add_symptom(symptom);
        }
        record.medication = ffi.medication;
        record.preference = ffi.preference;
        record.memo = ffi.memo;
        record
    }
}

/// FFI-safe stored record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStoredRecord {
    pub id: String,
    pub created_at: String,
    pub created_label: String,
    pub record: FfiPatientRecord,
}

impl From<StoredRecord> for FfiStoredRecord {
    fn from(stored: StoredRecord) -> Self {
        let local = stored.created_at.with_timezone(&chrono::Local);
        Self {
            id: stored.id,
            created_at: stored.created_at.to_rfc3339(),
            created_label: formatters::format_date_label(&local),
            record: stored.record.into(),
        }
    }
}

/// FFI-safe query settings.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiQuery {
    pub name_contains: Option<String>,
    pub resident_number_prefix: Option<String>,
    /// RFC 3339, inclusive
    pub created_from: Option<String>,
    /// RFC 3339, inclusive
    pub created_to: Option<String>,
    /// Wire field name, e.g. `name` or `systolicBP`
    pub sort_field: Option<String>,
    pub descending: bool,
    /// Number of "load more" steps already taken
    pub loaded_pages: u32,
}

impl FfiQuery {
    fn into_query(self, window_increment: usize) -> Result<Query, PulseLogError> {
        let parse = |s: &str| {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&chrono::Utc))
                .map_err(|e| PulseLogError::ParseError(format!("{}: {}", s, e)))
        };

        let created_between = match (self.created_from.as_deref(), self.created_to.as_deref()) {
            (None, None) => None,
            (from, to) => Some(DateRange::new(
                from.map(parse).transpose()?.unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC),
                to.map(parse).transpose()?.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC),
            )),
        };

        let sort = match self.sort_field.as_deref() {
            Some(name) => {
                let field = Field::from_name(name)
                    .ok_or_else(|| PulseLogError::NotFound(format!("sort field {}", name)))?;
                Some(if self.descending {
                    SortSpec::descending(field)
                } else {
                    SortSpec::ascending(field)
                })
            }
            None => None,
        };

        let increment = window_increment.max(1);
        let pages = usize::try_from(self.loaded_pages).unwrap_or(usize::MAX);
        let window = Window::with_end(increment, increment.saturating_mul(pages.saturating_add(1)));

        Ok(Query {
            filter: FilterSpec {
                created_between,
                name_contains: self.name_contains,
                resident_number_prefix: self.resident_number_prefix,
            },
            sort,
            window,
        })
    }
}

/// FFI-safe query result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueryResult {
    pub rows: Vec<FfiStoredRecord>,
    pub matched: u32,
    pub has_more: bool,
}

impl From<QueryResult> for FfiQueryResult {
    fn from(result: QueryResult) -> Self {
        Self {
            rows: result.rows.into_iter().map(|r| r.into()).collect(),
            matched: saturating_u32(result.matched),
            has_more: result.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_record(name: &str) -> FfiPatientRecord {
        FfiPatientRecord {
            name: name.into(),
            resident_number: "9012311234567".into(),
            height: Some(170.0),
            weight: Some(65.0),
            bmi: Some(99.0),
            gender: Some("female".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_fields_ignore_ffi_input() {
        let core = open_record_store_in_memory().unwrap();
        let stored = core.save_record(ffi_record("Kim")).unwrap();
        assert_eq!(stored.record.resident_number, "901231-1234567");
        assert_eq!(stored.record.gender.as_deref(), Some("male"));
        assert_eq!(stored.record.bmi, Some(22.5));
        assert_eq!(stored.record.waveform.len(), 8);
    }

    #[test]
    fn test_validation_surfaces() {
        let core = open_record_store_in_memory().unwrap();
        let err = core.save_record(ffi_record("")).unwrap_err();
        assert!(matches!(err, PulseLogError::ValidationError(_)));
        assert!(core.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_crud_through_core() {
        let core = open_record_store_in_memory().unwrap();
        let a = core.save_record(ffi_record("A")).unwrap();
        let b = core.save_record(ffi_record("B")).unwrap();

        let mut edited = ffi_record("A");
        edited.memo = "edited".into();
        core.replace_record(a.id.clone(), edited).unwrap();
        assert_eq!(core.get_record(a.id.clone()).unwrap().record.memo, "edited");

        let remaining = core.delete_records(vec![a.id.clone()]).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
        assert!(matches!(core.get_record(a.id), Err(PulseLogError::NotFound(_))));
    }

    #[test]
    fn test_query_through_core() {
        let core = open_record_store_in_memory().unwrap();
        for name in ["Kim", "Lee", "Kimura"] {
            core.save_record(ffi_record(name)).unwrap();
        }

        let result = core
            .query_records(FfiQuery {
                name_contains: Some("kim".into()),
                sort_field: Some("name".into()),
                descending: true,
                ..Default::default()
            })
            .unwrap();
        let names: Vec<&str> = result.rows.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, ["Kimura", "Kim"]);
        assert_eq!(result.matched, 2);
        assert!(!result.has_more);

        let err = core
            .query_records(FfiQuery {
                sort_field: Some("nope".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, PulseLogError::NotFound(_)));
    }

    #[test]
    fn test_loaded_pages_grow_window() {
        let core = open_record_store_in_memory().unwrap();
        for i in 0..45 {
            core.save_record(ffi_record(&format!("P{}", i))).unwrap();
        }

        let first = core.query_records(FfiQuery::default()).unwrap();
        assert_eq!(first.rows.len(), 20);
        assert!(first.has_more);

        let second = core
            .query_records(FfiQuery { loaded_pages: 1, ..Default::default() })
            .unwrap();
        assert_eq!(second.rows.len(), 40);

        let all = core
            .query_records(FfiQuery { loaded_pages: u32::MAX, ..Default::default() })
            .unwrap();
        assert_eq!(all.rows.len(), 45);
        assert_eq!(all.matched, 45);
        assert!(!all.has_more);
    }

    #[test]
    fn test_saturating_u32() {
        assert_eq!(saturating_u32(0), 0);
        assert_eq!(saturating_u32(45), 45);
        assert_eq!(saturating_u32(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(saturating_u32(u32::MAX as usize + 1), u32::MAX);
            assert_eq!(saturating_u32(usize::MAX), u32::MAX);
        }
    }

    #[test]
    fn test_option_lists() {
        assert_eq!(personality_options().len(), 5);
        assert_eq!(personality_options()[2], "원만");
        assert_eq!(level_options(), ["매우 높음", "높음", "보통", "낮음", "매우 낮음"]);
    }

    #[test]
    fn test_import_through_core() {
        let core = open_record_store_in_memory().unwrap();
        let csv = "name,datetime,ab,ac,ad,ae,ba,ca,da,ea\n\
                   Kim,1/5/24 9:00,1,2,3,4,5,6,7,8\n\
                   Kim,1/6/24 10:30,10,20,30,40,0.5,0.6,0.7,0.8\n";

        let record = core
            .import_measurement_csv(ffi_record("Kim"), csv.to_string())
            .unwrap();
        assert_eq!(record.waveform[0], Some(10.0));
        assert_eq!(record.waveform[7], Some(0.8));

        let err = core
            .import_measurement_csv(ffi_record("Park"), csv.to_string())
            .unwrap_err();
        assert!(matches!(err, PulseLogError::NoValidRowsError(_)));
    }

    #[test]
    fn test_workbook_import_through_core() {
        let csv = "name,datetime,ab,ac,ad,ae,ba,ca,da,ea\n\
                   Kim,1/5/24 9:00,1,2,3,4,5,6,7,8\n\
                   Kim,1/6/24 10:30,10,20,30,40,0.5,0.6,0.7,0.8\n";
        let workbook = XlsxFormat
            .to_bytes(&Sheet::from_csv("Sheet1", csv).unwrap())
            .unwrap();

        let core = open_record_store_in_memory().unwrap();
        let record = core
            .import_measurement_workbook(ffi_record("Kim"), workbook)
            .unwrap();
        assert_eq!(record.waveform[0], Some(10.0));
        assert_eq!(record.waveform[4], Some(0.5));

        let err = core
            .import_measurement_workbook(ffi_record("Kim"), b"plain text".to_vec())
            .unwrap_err();
        assert!(matches!(err, PulseLogError::ParseError(_)));
    }

    #[test]
    fn test_overlapping_import_rejected() {
        let core = open_record_store_in_memory().unwrap();
        let _held = core.import_guard.lock().unwrap();
        let err = core
            .import_measurement_csv(ffi_record("Kim"), "name\n".to_string())
            .unwrap_err();
        assert!(matches!(err, PulseLogError::ImportInProgress(_)));
        let err = core
            .import_measurement_workbook(ffi_record("Kim"), Vec::new())
            .unwrap_err();
        assert!(matches!(err, PulseLogError::ImportInProgress(_)));
    }

    #[test]
    fn test_backup_through_core() {
        let core = open_record_store_in_memory().unwrap();
        core.save_record(ffi_record("Kim")).unwrap();
        let json = core.create_backup_json().unwrap();

        let other = open_record_store_in_memory().unwrap();
        assert_eq!(other.restore_backup_json(json).unwrap(), 1);
        assert_eq!(other.list_records().unwrap().len(), 1);

        let err = other.restore_backup_json("{}".into()).unwrap_err();
        assert!(matches!(err, PulseLogError::InvalidBackupFormatError(_)));
    }

    #[test]
    fn test_export_csv() {
        let core = open_record_store_in_memory().unwrap();
        core.save_record(ffi_record("Kim")).unwrap();
        let csv = core.export_csv(false).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_export_xlsx() {
        let core = open_record_store_in_memory().unwrap();
        core.save_record(ffi_record("Kim")).unwrap();
        let bytes = core.export_xlsx(false).unwrap();

        let sheet = XlsxFormat.from_bytes(&bytes).unwrap();
        assert_eq!(sheet.name, "Data");
        assert_eq!(sheet.headers.len(), 16);
        assert_eq!(sheet.cell(0, 1), Some("Kim"));
        assert_eq!(sheet.cell(0, 7), Some("22.5"));
    }
}
