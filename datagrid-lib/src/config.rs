//! Grid configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables shared by every grid instance.
///
/// Loadable from JSON; missing keys take their default.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridConfig;
///
/// let config = GridConfig::default()
///     .with_debounce_ms(150)
///     .with_page_size(20);
/// assert!(config.validate().is_ok());
///
/// let config = GridConfig::from_json_str(r#"{ "pageSize": 30 }"#).unwrap();
/// assert_eq!(config.debounce_ms, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GridConfig {
    /// Quiescence window for search and filter input, in milliseconds.
    ///
    /// Default: 300
    pub debounce_ms: u64,

    /// Rows per page on first render.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Choices offered by the page size selector.
    ///
    /// Default: 10, 20, 30, 40, 50
    pub page_size_options: Vec<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            page_size: 10,
            page_size_options: vec![10, 20, 30, 40, 50],
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce_ms = millis;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks that page sizes are usable.
    ///
    /// An empty option list allows any page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page size must be at least 1".into()));
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::Invalid(
                "page size options must be at least 1".into(),
            ));
        }
        if !self.page_size_options.is_empty() && !self.page_size_options.contains(&self.page_size)
        {
            return Err(ConfigError::Invalid(format!(
                "page size {} is not one of {:?}",
                self.page_size, self.page_size_options
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("GridConfig: loaded {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_size_options, vec![10, 20, 30, 40, 50]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GridConfig::from_json_str(r#"{ "debounceMs": 50 }"#).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_rejects_size_outside_options() {
        let err = GridConfig::from_json_str(r#"{ "pageSize": 15 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = GridConfig::default()
            .with_page_size(15)
            .with_page_size_options(Vec::new());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = GridConfig::default().with_page_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = GridConfig::from_json_str(r#"{ "pagesize": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GridConfig::load("/nonexistent/grid.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
