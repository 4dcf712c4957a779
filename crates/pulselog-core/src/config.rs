//! Store configuration and well-known locations.

use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "PulseLog";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canonical storage slot for the record collection.
pub const CANONICAL_SLOT: &str = "userInfoData";

/// Slots written by earlier versions, read when the canonical slot is absent.
pub const LEGACY_SLOTS: [&str; 1] = ["userData"];

/// Rows added to the visible window per "load more".
pub const DEFAULT_WINDOW_INCREMENT: usize = 20;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "pulselog.db";

/// Per-user application data directory, if the platform has one.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Default database location.
pub fn default_database_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DATABASE_FILE))
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,pulselog_core=info"
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Slot holding the serialized collection
    pub slot_name: String,
    /// Older slot names to fall back to when reading
    pub legacy_slot_names: Vec<String>,
    /// Return an empty list instead of an error when stored data is undecodable
    pub lenient_read: bool,
    /// Visible-window growth step for queries
    pub window_increment: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_name: CANONICAL_SLOT.to_string(),
            legacy_slot_names: LEGACY_SLOTS.iter().map(|s| s.to_string()).collect(),
            lenient_read: true,
            window_increment: DEFAULT_WINDOW_INCREMENT,
        }
    }
}

impl StoreConfig {
    /// Default settings with lenient reads turned off.
    pub fn strict() -> Self {
        Self {
            lenient_read: false,
            ..Self::default()
        }
    }

    pub fn with_lenient_read(mut self, lenient: bool) -> Self {
        self.lenient_read = lenient;
        self
    }

    pub fn with_slot_name(mut self, slot_name: impl Into<String>) -> Self {
        self.slot_name = slot_name.into();
        self
    }

    pub fn with_window_increment(mut self, increment: usize) -> Self {
        self.window_increment = increment.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.slot_name, "userInfoData");
        assert_eq!(config.legacy_slot_names, vec!["userData".to_string()]);
        assert!(config.lenient_read);
        assert_eq!(config.window_increment, 20);
    }

    #[test]
    fn test_strict_config() {
        let config = StoreConfig::strict().with_window_increment(0);
        assert!(!config.lenient_read);
        assert_eq!(config.window_increment, 1);
    }

    #[test]
    fn test_database_path_under_data_dir() {
        if let (Some(dir), Some(path)) = (app_data_dir(), default_database_path()) {
            assert!(path.starts_with(&dir));
            assert!(path.ends_with(DATABASE_FILE));
        }
    }
}
