use super::SequenceTheme;
use crate::error::ThemeError;
use log::debug;
use std::fs;

impl SequenceTheme {
    /// Parses a theme from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, ThemeError> {
        serde_json::from_str(json).map_err(|e| ThemeError::Json(e.to_string()))
    }

    /// Loads and validates a theme from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ThemeError> {
        let content = fs::read_to_string(path).map_err(|e| ThemeError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let theme = Self::from_json_str(&content)?;
        theme.validate()?;
        debug!(
            "Loaded theme '{}' with {} steps from '{}'",
            theme.id,
            theme.steps.len(),
            path
        );
        Ok(theme)
    }

    pub fn to_json_string(&self) -> Result<String, ThemeError> {
        serde_json::to_string_pretty(self).map_err(|e| ThemeError::Json(e.to_string()))
    }
}
