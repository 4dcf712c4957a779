//! Stable record sorting.

use std::cmp::Ordering;

use crate::models::{Field, FieldKind, StoredRecord};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Selected sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Column-header click: same field flips direction, a new field starts ascending.
    pub fn toggle(current: Option<SortSpec>, field: Field) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec {
                field,
                direction: spec.direction.flipped(),
            },
            _ => SortSpec::ascending(field),
        }
    }

    /// Compare two records under this spec.
    pub fn compare(&self, a: &StoredRecord, b: &StoredRecord) -> Ordering {
        let ordering = match self.field.kind() {
            FieldKind::Timestamp => a.created_at.cmp(&b.created_at),
            FieldKind::Numeric => self.field.number(a).total_cmp(&self.field.number(b)),
            FieldKind::Text => self.field.text(a).cmp(&self.field.text(b)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Stable in-place sort; equal keys keep their relative order in both directions.
pub fn sort_records(records: &mut [StoredRecord], spec: &SortSpec) {
    records.sort_by(|a, b| spec.compare(a, b));
}
