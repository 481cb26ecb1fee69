use crate::error::CalcResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host settings that shape output column names and message rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Longest allowed column name, in UTF-8 bytes
    pub max_bytes_per_column_name: usize,
    /// Message catalog language (`en`, `en-GB`, ...)
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_bytes_per_column_name: 120,
            locale: "en".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; absent keys keep their defaults.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> CalcResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
