//! Editor settings handed in by the host page

use crate::error::{EditorError, Result};
use crate::models::theory::DEFAULT_FRETS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Grid cells per beat
    pub subdivisions: u32,
    /// Fret count for newly created tabs
    pub default_frets: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            subdivisions: 4,
            default_frets: DEFAULT_FRETS,
        }
    }
}

impl EditorConfig {
    /// Parse a settings object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subdivisions == 0 || self.subdivisions > i32::MAX as u32 {
            return Err(EditorError::InvariantViolation(format!(
                "subdivisions must be at least 1, got {}",
                self.subdivisions
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = EditorConfig::from_json(r#"{"subdivisions":2}"#).unwrap();
        assert_eq!(config.subdivisions, 2);
        assert_eq!(config.default_frets, 24);
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_zero_subdivisions_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"subdivisions":0}"#),
            Err(EditorError::InvariantViolation(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#""four""#),
            Err(EditorError::Serialization(_))
        ));
    }
}
