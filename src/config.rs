use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::analytics::{DEFAULT_QUANTILES, DEFAULT_TOP_N};
use crate::schema::TripSchema;

/// Report settings, optionally read from a JSON file.
///
/// Every key is optional; missing keys fall back to the defaults:
/// ```json
/// {
///   "top_n": 5,
///   "quantiles": [0.1, 0.5, 0.9],
///   "schema": { "model": "Bike Model" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub quantiles: Vec<f64>,
    pub schema: TripSchema,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            quantiles: DEFAULT_QUANTILES.to_vec(),
            schema: TripSchema::default(),
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ReportConfig::from_json("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.top_n, 10);
        assert_eq!(config.quantiles, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_overrides() {
        let config =
            ReportConfig::from_json(r#"{"top_n": 3, "schema": {"user_type": "Rider"}}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.schema.user_type, "Rider");
        assert_eq!(config.schema.start_time, "Start Time");
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = ReportConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
