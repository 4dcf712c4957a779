//! Patient record models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::compat;
use super::WaveformMetrics;
use crate::formatters;

/// Personality choices offered by the intake form.
pub const PERSONALITY_OPTIONS: [&str; 5] = ["매우 급함", "급함", "원만", "느긋", "매우 느긋"];

/// Level choices shared by stress and work intensity.
pub const LEVEL_OPTIONS: [&str; 5] = ["매우 높음", "높음", "보통", "낮음", "매우 낮음"];

/// Record validation errors, raised before any store call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Gender derived from the resident-registration number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse a wire value or its Korean display form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "male" | "Male" | "남성" => Some(Gender::Male),
            "female" | "Female" | "여성" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// A patient's intake record.
///
/// `gender` and `bmi` are derived and only change through the setters for
/// the resident number and the body measurements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Patient name (required)
    #[serde(default, deserialize_with = "compat::text")]
    pub name: String,
    /// Resident-registration number, `NNNNNN-NNNNNNN` (required)
    #[serde(default, deserialize_with = "compat::text")]
    resident_number: String,
    #[serde(default, deserialize_with = "compat::optional_gender")]
    gender: Option<Gender>,
    /// Phone, `NNN-NNNN-NNNN`
    #[serde(default, deserialize_with = "compat::text")]
    pub phone: String,
    /// One of [`PERSONALITY_OPTIONS`]
    #[serde(default, deserialize_with = "compat::text")]
    pub personality: String,
    #[serde(default, deserialize_with = "compat::optional_decimal")]
    height: Option<f64>,
    #[serde(default, deserialize_with = "compat::optional_decimal")]
    weight: Option<f64>,
    #[serde(default, deserialize_with = "compat::optional_decimal")]
    bmi: Option<f64>,
    /// One of [`LEVEL_OPTIONS`]
    #[serde(default, deserialize_with = "compat::text")]
    pub stress: String,
    #[serde(default, rename = "stressLevel", skip_serializing, deserialize_with = "compat::text")]
    legacy_stress_level: String,
    /// One of [`LEVEL_OPTIONS`]
    #[serde(default, deserialize_with = "compat::text")]
    pub work_intensity: String,
    /// Beats per minute
    #[serde(default, deserialize_with = "compat::text")]
    pub pulse: String,
    /// mmHg
    #[serde(default, rename = "systolicBP", deserialize_with = "compat::text")]
    pub systolic_bp: String,
    /// mmHg
    #[serde(default, rename = "diastolicBP", deserialize_with = "compat::text")]
    pub diastolic_bp: String,
    /// Imported pulse-wave metrics
    #[serde(flatten)]
    pub waveform: WaveformMetrics,
    #[serde(default, deserialize_with = "compat::symptom_list")]
    selected_symptoms: Vec<String>,
    #[serde(default, deserialize_with = "compat::text")]
    pub medication: String,
    #[serde(default, deserialize_with = "compat::text")]
    pub preference: String,
    #[serde(default, deserialize_with = "compat::text")]
    pub memo: String,
}

impl PatientRecord {
    /// Create a record with the two required fields.
    pub fn new(name: impl Into<String>, resident_number: &str) -> Self {
        let mut record = Self {
            name: name.into(),
            ..Self::default()
        };
        record.set_resident_number(resident_number);
        record
    }

    pub fn resident_number(&self) -> &str {
        &self.resident_number
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn bmi(&self) -> Option<f64> {
        self.bmi
    }

    /// Symptoms in selection order.
    pub fn selected_symptoms(&self) -> &[String] {
        &self.selected_symptoms
    }

    /// Set the resident number (masked) and re-derive gender.
    pub fn set_resident_number(&mut self, value: &str) {
        self.resident_number = formatters::format_resident_number(value);
        self.gender = formatters::gender_from_resident_number(&self.resident_number);
    }

    /// Set the phone number (masked).
    pub fn set_phone(&mut self, value: &str) {
        self.phone = formatters::format_phone_number(value);
    }

    pub fn set_height(&mut self, height_cm: Option<f64>) {
        self.height = height_cm;
        self.refresh_bmi();
    }

    pub fn set_weight(&mut self, weight_kg: Option<f64>) {
        self.weight = weight_kg;
        self.refresh_bmi();
    }

    /// Set height and weight together.
    pub fn set_body_measurements(&mut self, height_cm: Option<f64>, weight_kg: Option<f64>) {
        self.height = height_cm;
        self.weight = weight_kg;
        self.refresh_bmi();
    }

    /// Append a symptom; returns false if it was already selected or blank.
    pub fn add_symptom(&mut self, symptom: &str) -> bool {
        let symptom = symptom.trim();
        if symptom.is_empty() || self.selected_symptoms.iter().any(|s| s == symptom) {
            return false;
        }
        self.selected_symptoms.push(symptom.to_string());
        true
    }

    /// Remove a symptom; returns false if it was not selected.
    pub fn remove_symptom(&mut self, symptom: &str) -> bool {
        let before = self.selected_symptoms.len();
        self.selected_symptoms.retain(|s| s != symptom);
        self.selected_symptoms.len() != before
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.resident_number.trim().is_empty() {
            return Err(ValidationError::MissingField("residentNumber"));
        }
        Ok(())
    }

    /// Recompute derived fields after decoding stored data.
    pub(crate) fn refresh_derived(&mut self) {
        let legacy_stress = std::mem::take(&mut self.legacy_stress_level);
        if self.stress.is_empty() {
            self.stress = legacy_stress;
        }
        self.gender = formatters::gender_from_resident_number(&self.resident_number);
        self.refresh_bmi();
    }

    fn refresh_bmi(&mut self) {
        self.bmi = formatters::calculate_bmi(self.height, self.weight);
    }
}
