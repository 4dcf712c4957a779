//! Wave-measurement import from a device spreadsheet.
//!
//! Each sheet row is one measurement session for a named subject. The most
//! recent session for the active subject supplies the record's waveform
//! metrics.

use chrono::NaiveDateTime;

use super::{InteropError, InteropResult, Sheet};
use crate::formatters::parse_measurement_datetime;
use crate::models::{PatientRecord, WaveformMetrics, WAVEFORM_METRIC_COUNT};

/// Column positions in the device sheet (zero-based, data rows only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLayout {
    pub name_column: usize,
    pub datetime_column: usize,
    /// ab_ms, ac_ms, ad_ms, ae_ms, ba_ratio, ca_ratio, da_ratio, ea_ratio
    pub metric_columns: [usize; WAVEFORM_METRIC_COUNT],
}

impl Default for ImportLayout {
    fn default() -> Self {
        Self {
            name_column: 0,
            datetime_column: 1,
            metric_columns: [2, 3, 4, 5, 6, 7, 8, 9],
        }
    }
}

/// The selected measurement session.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Data-row index in the sheet
    pub row_index: usize,
    pub measured_at: NaiveDateTime,
    pub metrics: WaveformMetrics,
}

impl MeasurementRow {
    /// Copy the metrics into a record.
    pub fn apply_to(&self, record: &mut PatientRecord) {
        record.waveform = self.metrics;
    }
}

/// Find the most recent session for `subject`.
///
/// Rows whose date cell does not parse are left out; ties keep the earlier
/// row. A metric cell that does not parse in the selected row is an error.
pub fn latest_measurement(
    sheet: &Sheet,
    subject: &str,
    layout: &ImportLayout,
) -> InteropResult<MeasurementRow> {
    let subject = subject.trim();
    let mut latest: Option<(usize, NaiveDateTime)> = None;
    let mut candidates = 0usize;

    for (index, _) in sheet.rows.iter().enumerate() {
        let name = sheet.cell(index, layout.name_column).unwrap_or("").trim();
        if subject.is_empty() || name != subject {
            continue;
        }
        candidates += 1;

        let raw = sheet.cell(index, layout.datetime_column).unwrap_or("");
        let Some(measured_at) = parse_measurement_datetime(raw) else {
            tracing::warn!(row = index, value = raw, "Skipping row with unparseable date");
            continue;
        };
        if latest.map_or(true, |(_, best)| measured_at > best) {
            latest = Some((index, measured_at));
        }
    }

    let (row_index, measured_at) = latest.ok_or_else(|| {
        tracing::warn!(subject, candidates, "No usable measurement rows");
        InteropError::NoValidRows(subject.to_string())
    })?;

    let mut values = [0.0; WAVEFORM_METRIC_COUNT];
    for (slot, (value, column)) in values.iter_mut().zip(layout.metric_columns).enumerate() {
        let raw = sheet.cell(row_index, column).unwrap_or("").trim();
        *value = raw.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
            InteropError::Parse(format!(
                "row {}: {} is not a number: {:?}",
                row_index,
                WaveformMetrics::FIELD_NAMES[slot],
                raw
            ))
        })?;
    }

    tracing::info!(subject, row = row_index, %measured_at, "Selected latest measurement");
    Ok(MeasurementRow {
        row_index,
        measured_at,
        metrics: WaveformMetrics::from_values(values),
    })
}

/// Import the latest session for the record's own name into its waveform
/// metrics. The record is untouched on error.
pub fn import_latest_measurement(
    sheet: &Sheet,
    record: &mut PatientRecord,
    layout: &ImportLayout,
) -> InteropResult<MeasurementRow> {
    let row = latest_measurement(sheet, &record.name, layout)?;
    row.apply_to(record);
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new(
            "Sheet1",
            ["name", "datetime", "ab", "ac", "ad", "ae", "b/a", "c/a", "d/a", "e/a"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        sheet.rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        sheet
    }

    #[test]
    fn test_selects_most_recent_row() {
        let sheet = sheet(&[
            &["Kim", "1/5/24 9:00", "100", "150", "200", "250", "0.5", "0.6", "0.7", "0.8"],
            &["Lee", "2/1/24 9:00", "1", "1", "1", "1", "1", "1", "1", "1"],
            &["Kim", "1/6/24 10:30", "110", "160", "210", "260", "0.51", "0.61", "0.71", "0.81"],
        ]);

        let mut record = PatientRecord::new("Kim", "901231-1234567");
        let row = import_latest_measurement(&sheet, &mut record, &ImportLayout::default()).unwrap();

        assert_eq!(row.row_index, 2);
        assert_eq!(row.measured_at.to_string(), "2024-01-06 10:30:00");
        assert_eq!(
            record.waveform,
            WaveformMetrics::from_values([110.0, 160.0, 210.0, 260.0, 0.51, 0.61, 0.71, 0.81])
        );
    }

    #[test]
    fn test_unparseable_dates_excluded() {
        let sheet = sheet(&[
            &["Kim", "garbage", "9", "9", "9", "9", "9", "9", "9", "9"],
            &["Kim", "1/5/24 9:00", "1", "2", "3", "4", "5", "6", "7", "8"],
        ]);
        let row = latest_measurement(&sheet, "Kim", &ImportLayout::default()).unwrap();
        assert_eq!(row.row_index, 1);
        assert_eq!(row.metrics.ea_ratio, Some(8.0));
    }

    #[test]
    fn test_no_valid_rows_leaves_record_unchanged() {
        let sheet = sheet(&[&["Kim", "not a date", "1", "2", "3", "4", "5", "6", "7", "8"]]);
        let mut record = PatientRecord::new("Kim", "901231-1234567");
        record.waveform.ab_ms = Some(42.0);

        let err = import_latest_measurement(&sheet, &mut record, &ImportLayout::default()).unwrap_err();
        assert!(matches!(err, InteropError::NoValidRows(ref s) if s == "Kim"));
        assert_eq!(record.waveform.ab_ms, Some(42.0));

        let err = latest_measurement(&sheet, "Park", &ImportLayout::default()).unwrap_err();
        assert!(matches!(err, InteropError::NoValidRows(_)));
    }

    #[test]
    fn test_bad_metric_is_parse_error() {
        let sheet = sheet(&[&["Kim", "1/5/24 9:00", "1", "x", "3", "4", "5", "6", "7", "8"]]);
        let mut record = PatientRecord::new("Kim", "901231-1234567");
        let err = import_latest_measurement(&sheet, &mut record, &ImportLayout::default()).unwrap_err();
        assert!(matches!(err, InteropError::Parse(ref msg) if msg.contains("ac_ms")));
        assert!(record.waveform.is_empty());
    }

    #[test]
    fn test_custom_layout() {
        let sheet = sheet(&[&["1/5/24 9:00", "Kim", "1", "2", "3", "4", "5", "6", "7", "8"]]);
        let layout = ImportLayout {
            name_column: 1,
            datetime_column: 0,
            metric_columns: [9, 8, 7, 6, 5, 4, 3, 2],
        };
        let row = latest_measurement(&sheet, " Kim ", &layout).unwrap();
        assert_eq!(row.metrics.ab_ms, Some(8.0));
        assert_eq!(row.metrics.ea_ratio, Some(1.0));
    }
}
