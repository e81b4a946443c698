//! Engine settings
//!
//! Settings are plain serde data so a host can keep them next to its own
//! configuration. Every field has a default; a TOML file only needs the keys
//! it overrides:
//!
//! ```toml
//! page_size = 25
//! data_binding = true
//! remote_debounce_ms = 300
//! ```

use std::path::Path;
use std::time::Duration;

use gridstate_core::{GridError, GridState, DEFAULT_PAGE_NUMBER_COUNT, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Rows per page of the initial state
    pub page_size: usize,
    /// Page number links shown at once
    pub page_number_count: usize,
    /// Start in remote mode: emit state changes instead of paging locally
    pub data_binding: bool,
    /// Filter debounce when a server owns the rows
    pub remote_debounce_ms: u64,
    /// Filter debounce for in-memory rows
    pub local_debounce_ms: u64,
    /// Page sizes offered to the user
    pub page_sizes: Vec<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number_count: DEFAULT_PAGE_NUMBER_COUNT,
            data_binding: false,
            remote_debounce_ms: 500,
            local_debounce_ms: 1,
            page_sizes: vec![10, 20, 50, 100],
        }
    }
}

impl EngineSettings {
    pub fn remote() -> Self {
        Self {
            data_binding: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let settings: EngineSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(content: &str) -> EngineResult<Self> {
        let settings: EngineSettings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.toml` or `.json` file
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded grid engine settings");
        Ok(settings)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPageSize(self.page_size).into());
        }
        if self.page_number_count == 0 {
            return Err(GridError::InvalidPageNumberCount(self.page_number_count).into());
        }
        if self.page_sizes.contains(&0) {
            return Err(EngineError::Settings(
                "page_sizes must not contain zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Debounce applied to filter requests in the given mode
    pub fn debounce_for(&self, remote: bool) -> Duration {
        if remote {
            Duration::from_millis(self.remote_debounce_ms)
        } else {
            Duration::from_millis(self.local_debounce_ms)
        }
    }

    pub fn initial_state(&self) -> EngineResult<GridState> {
        Ok(GridState::new(self.page_size)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.page_number_count, 5);
        assert!(!settings.data_binding);
        assert_eq!(settings.debounce_for(true), Duration::from_millis(500));
        assert_eq!(settings.debounce_for(false), Duration::from_millis(1));
    }

    #[test]
    fn test_toml_overrides_only_given_keys() {
        let settings = EngineSettings::from_toml_str(
            r#"
            page_size = 25
            data_binding = true
            "#,
        )
        .unwrap();

        assert_eq!(
            settings,
            EngineSettings {
                page_size: 25,
                data_binding: true,
                ..EngineSettings::default()
            }
        );
    }

    #[test]
    fn test_validation_rejects_zero_sizes() {
        assert!(matches!(
            EngineSettings::from_toml_str("page_size = 0"),
            Err(EngineError::Core(GridError::InvalidPageSize(0)))
        ));
        assert!(matches!(
            EngineSettings::from_json_str(r#"{"page_number_count": 0}"#),
            Err(EngineError::Core(GridError::InvalidPageNumberCount(0)))
        ));
        assert!(matches!(
            EngineSettings::from_toml_str("page_sizes = [10, 0]"),
            Err(EngineError::Settings(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            EngineSettings::from_toml_str("page_size = \"ten\""),
            Err(EngineError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("grid.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "remote_debounce_ms = 250").unwrap();
        let settings = EngineSettings::load(&toml_path).unwrap();
        assert_eq!(settings.debounce_for(true), Duration::from_millis(250));

        let json_path = dir.path().join("grid.json");
        std::fs::write(&json_path, r#"{"page_sizes": [5, 15]}"#).unwrap();
        let settings = EngineSettings::load(&json_path).unwrap();
        assert_eq!(settings.page_sizes, vec![5, 15]);

        assert!(matches!(
            EngineSettings::load(&dir.path().join("missing.toml")),
            Err(EngineError::Io(_))
        ));
    }
}
