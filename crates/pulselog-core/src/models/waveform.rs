//! Pulse-wave timing and ratio metrics.

use serde::{Deserialize, Serialize};

use super::compat;

/// Number of waveform metrics carried by a record.
pub const WAVEFORM_METRIC_COUNT: usize = 8;

/// Eight metrics from the measurement device's spreadsheet export.
///
/// Durations are in milliseconds; ratios are dimensionless.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WaveformMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ab_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ac_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ad_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ae_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ba_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ca_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub da_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "compat::optional_decimal")]
    pub ea_ratio: Option<f64>,
}

impl WaveformMetrics {
    /// Wire names, in device column order.
    pub const FIELD_NAMES: [&'static str; WAVEFORM_METRIC_COUNT] = [
        "ab_ms", "ac_ms", "ad_ms", "ae_ms", "ba_ratio", "ca_ratio", "da_ratio", "ea_ratio",
    ];

    /// Build from values in device column order.
    pub fn from_values(values: [f64; WAVEFORM_METRIC_COUNT]) -> Self {
        Self::from_options(values.map(Some))
    }

    /// Build from possibly-missing values in device column order.
    pub fn from_options(values: [Option<f64>; WAVEFORM_METRIC_COUNT]) -> Self {
        let [ab_ms, ac_ms, ad_ms, ae_ms, ba_ratio, ca_ratio, da_ratio, ea_ratio] = values;
        Self {
            ab_ms,
            ac_ms,
            ad_ms,
            ae_ms,
            ba_ratio,
            ca_ratio,
            da_ratio,
            ea_ratio,
        }
    }

    /// Values in device column order.
    pub fn values(&self) -> [Option<f64>; WAVEFORM_METRIC_COUNT] {
        [
            self.ab_ms,
            self.ac_ms,
            self.ad_ms,
            self.ae_ms,
            self.ba_ratio,
            self.ca_ratio,
            self.da_ratio,
            self.ea_ratio,
        ]
    }

    /// Metric at a device column index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values().get(index).copied().flatten()
    }

    /// True when no metric has been imported.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }
}
