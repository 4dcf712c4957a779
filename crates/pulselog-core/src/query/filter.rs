//! Record filters.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::StoredRecord;

/// Inclusive creation-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whole calendar days, from the start of `first` to the end of `last` (UTC).
    pub fn days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        let start = first.and_hms_opt(0, 0, 0)?;
        let end = last.and_hms_nano_opt(23, 59, 59, 999_999_999)?;
        Some(Self {
            start: Utc.from_utc_datetime(&start),
            end: Utc.from_utc_datetime(&end),
        })
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}

/// Conjunctive record filter. Unset (or blank) criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Creation time within this range
    pub created_between: Option<DateRange>,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    /// Prefix of the resident number
    pub resident_number_prefix: Option<String>,
}

impl FilterSpec {
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.created_between = Some(range);
        self
    }

    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn with_resident_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resident_number_prefix = Some(prefix.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.created_between.is_none()
            && non_blank(&self.name_contains).is_none()
            && non_blank(&self.resident_number_prefix).is_none()
    }

    pub fn matches(&self, record: &StoredRecord) -> bool {
        if let Some(range) = &self.created_between {
            if !range.contains(&record.created_at) {
                return false;
            }
        }
        if let Some(needle) = non_blank(&self.name_contains) {
            if !record
                .record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(prefix) = non_blank(&self.resident_number_prefix) {
            if !record.record.resident_number().starts_with(prefix) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Records matching `filter`, in their original order.
pub fn filter_records(records: &[StoredRecord], filter: &FilterSpec) -> Vec<StoredRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}
