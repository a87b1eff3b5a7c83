//! User settings, loaded once at startup from a JSON file

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reloading faster than this hammers the scheduler for no benefit
pub const MIN_RELOAD_RATE_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("can't read settings at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("queueCols must have JOBID as the first column")]
    JobIdColumn,
}

/// Runtime configuration for the queue view and reload timers
///
/// Field names follow the backend's camelCase convention so a host settings
/// file can be shared verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Ordered list of displayed/queried columns; JOBID must be index 0
    pub queue_cols: Vec<String>,
    /// Restrict the snapshot to jobs owned by the current user
    pub user_only: bool,
    pub items_per_page: usize,
    pub items_per_page_options: Vec<usize>,
    /// Re-fetch the queue automatically on a timer
    pub auto_reload: bool,
    /// Auto-reload period in milliseconds, floor-clamped on load
    pub auto_reload_rate: u64,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            queue_cols: [
                "JOBID",
                "PARTITION",
                "NAME",
                "USER",
                "ST",
                "TIME",
                "NODES",
                "NODELIST(REASON)",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            user_only: true,
            items_per_page: 15,
            items_per_page_options: vec![15, 25, 50, 100],
            auto_reload: false,
            auto_reload_rate: 60_000,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        info!("Reading settings at {}", path.display());
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validated()
    }

    /// Enforce the JOBID-first invariant and the reload rate floor
    pub fn validated(mut self) -> Result<Settings, SettingsError> {
        if self.queue_cols.first().map(String::as_str) != Some("JOBID") {
            return Err(SettingsError::JobIdColumn);
        }
        if self.auto_reload_rate < MIN_RELOAD_RATE_MS {
            warn!(
                "autoReloadRate {}ms is below the floor, clamping to {}ms",
                self.auto_reload_rate, MIN_RELOAD_RATE_MS
            );
            self.auto_reload_rate = MIN_RELOAD_RATE_MS;
        }
        Ok(self)
    }

    /// Index of the USER column, when configured
    pub fn user_col_idx(&self) -> Option<usize> {
        self.queue_cols.iter().position(|col| col == "USER")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_backend_columns() {
        let settings = Settings::default();
        assert_eq!(settings.queue_cols[0], "JOBID");
        assert_eq!(settings.user_col_idx(), Some(3));
        assert!(settings.user_only);
        assert_eq!(settings.items_per_page, 15);
    }

    #[test]
    fn reload_rate_is_floor_clamped() {
        let settings = Settings {
            auto_reload_rate: 2000,
            ..Settings::default()
        };
        let settings = settings.validated().unwrap();
        assert_eq!(settings.auto_reload_rate, MIN_RELOAD_RATE_MS);
    }

    #[test]
    fn jobid_must_come_first() {
        let settings = Settings {
            queue_cols: vec!["NAME".to_string(), "JOBID".to_string()],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::JobIdColumn)
        ));
    }

    #[test]
    fn loads_camel_case_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"queueCols": ["JOBID", "USER"], "userOnly": false, "autoReloadRate": 90000}}"#
        )
        .unwrap();
        let settings = Settings::load(file.path()).unwrap();
        assert!(!settings.user_only);
        assert_eq!(settings.auto_reload_rate, 90_000);
        assert_eq!(settings.user_col_idx(), Some(1));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Settings::load(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
