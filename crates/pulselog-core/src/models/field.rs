//! Record fields addressable by name, for sorting and tabular export.

use super::StoredRecord;
use crate::formatters;

/// How a field's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Timestamp,
    Numeric,
    Text,
}

/// A displayable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CreatedAt,
    Name,
    ResidentNumber,
    Gender,
    Phone,
    Personality,
    Height,
    Weight,
    Bmi,
    Stress,
    WorkIntensity,
    Pulse,
    SystolicBp,
    DiastolicBp,
    /// Waveform metric by device column index (0..8)
    Waveform(usize),
    Symptoms,
    Medication,
    Preference,
    Memo,
}

impl Field {
    /// Every field in table order.
    pub fn all() -> Vec<Field> {
        let mut fields = vec![
            Field::CreatedAt,
            Field::Name,
            Field::ResidentNumber,
            Field::Gender,
            Field::Phone,
            Field::Personality,
            Field::Height,
            Field::Weight,
            Field::Bmi,
            Field::Stress,
            Field::WorkIntensity,
            Field::Pulse,
            Field::SystolicBp,
            Field::DiastolicBp,
        ];
        fields.extend((0..super::WAVEFORM_METRIC_COUNT).map(Field::Waveform));
        fields.extend([
            Field::Symptoms,
            Field::Medication,
            Field::Preference,
            Field::Memo,
        ]);
        fields
    }

    /// Wire (JSON) name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::CreatedAt => "createdAt",
            Field::Name => "name",
            Field::ResidentNumber => "residentNumber",
            Field::Gender => "gender",
            Field::Phone => "phone",
            Field::Personality => "personality",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Bmi => "bmi",
            Field::Stress => "stress",
            Field::WorkIntensity => "workIntensity",
            Field::Pulse => "pulse",
            Field::SystolicBp => "systolicBP",
            Field::DiastolicBp => "diastolicBP",
            Field::Waveform(i) => super::WaveformMetrics::FIELD_NAMES
                .get(*i)
                .copied()
                .unwrap_or("waveform"),
            Field::Symptoms => "selectedSymptoms",
            Field::Medication => "medication",
            Field::Preference => "preference",
            Field::Memo => "memo",
        }
    }

    /// Look up a field by wire name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::all().into_iter().find(|f| f.name() == name)
    }

    /// Localized column label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::CreatedAt => "등록일시",
            Field::Name => "이름",
            Field::ResidentNumber => "주민등록번호",
            Field::Gender => "성별",
            Field::Phone => "연락처",
            Field::Personality => "성격",
            Field::Height => "신장(cm)",
            Field::Weight => "체중(kg)",
            Field::Bmi => "BMI",
            Field::Stress => "스트레스",
            Field::WorkIntensity => "노동강도",
            Field::Pulse => "맥박(회/분)",
            Field::SystolicBp => "수축기 혈압",
            Field::DiastolicBp => "이완기 혈압",
            Field::Waveform(i) => match i {
                0 => "ab(ms)",
                1 => "ac(ms)",
                2 => "ad(ms)",
                3 => "ae(ms)",
                4 => "b/a",
                5 => "c/a",
                6 => "d/a",
                _ => "e/a",
            },
            Field::Symptoms => "증상",
            Field::Medication => "복용약물",
            Field::Preference => "기호식품",
            Field::Memo => "메모",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::CreatedAt => FieldKind::Timestamp,
            Field::Height
            | Field::Weight
            | Field::Bmi
            | Field::Pulse
            | Field::SystolicBp
            | Field::DiastolicBp
            | Field::Waveform(_) => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    /// Cell text for a record. Absent values render as an empty string.
    pub fn text(&self, record: &StoredRecord) -> String {
        let r = &record.record;
        match self {
            Field::CreatedAt => record.created_at.to_rfc3339(),
            Field::Name => r.name.clone(),
            Field::ResidentNumber => r.resident_number().to_string(),
            Field::Gender => r.gender().map(|g| g.as_str().to_string()).unwrap_or_default(),
            Field::Phone => r.phone.clone(),
            Field::Personality => r.personality.clone(),
            Field::Height => decimal_text(r.height()),
            Field::Weight => decimal_text(r.weight()),
            Field::Bmi => decimal_text(r.bmi()),
            Field::Stress => r.stress.clone(),
            Field::WorkIntensity => r.work_intensity.clone(),
            Field::Pulse => r.pulse.clone(),
            Field::SystolicBp => r.systolic_bp.clone(),
            Field::DiastolicBp => r.diastolic_bp.clone(),
            Field::Waveform(i) => decimal_text(r.waveform.get(*i)),
            Field::Symptoms => r.selected_symptoms().join(", "),
            Field::Medication => r.medication.clone(),
            Field::Preference => r.preference.clone(),
            Field::Memo => r.memo.clone(),
        }
    }

    /// Numeric value for sorting; unparseable or absent values are 0.
    pub fn number(&self, record: &StoredRecord) -> f64 {
        let r = &record.record;
        let value = match self {
            Field::Height => r.height(),
            Field::Weight => r.weight(),
            Field::Bmi => r.bmi(),
            Field::Waveform(i) => r.waveform.get(*i),
            Field::CreatedAt => Some(record.created_at.timestamp_millis() as f64),
            _ => formatters::leading_float(&self.text(record)),
        };
        value.filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

fn decimal_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
