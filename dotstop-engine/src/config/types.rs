use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A named exception list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionConfig {
    /// Language identification
    pub metadata: MetadataConfig,
    /// The exceptions themselves
    pub exceptions: ExceptionListConfig,
}

/// Language identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Short code such as `en`
    pub code: String,
    /// Display name
    pub name: String,
}

/// Strings after which breaks are suppressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionListConfig {
    /// Character splitting multi-part abbreviations
    #[serde(default = "default_separator")]
    pub separator: char,
    /// The exception strings
    pub suppress_after: Vec<String>,
}

fn default_separator() -> char {
    '.'
}

impl ExceptionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExceptionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            path: path.display().to_string(),
            reason: format!("failed to read file: {e}"),
        })?;
        let config: ExceptionConfig = toml::from_str(&content).map_err(|e| EngineError::Config {
            path: path.display().to_string(),
            reason: format!("failed to parse TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the list for missing metadata and blank entries
    pub fn validate(&self) -> Result<()> {
        if self.metadata.code.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "metadata.code must not be empty".into(),
            ));
        }
        if self.exceptions.separator.is_whitespace() {
            return Err(EngineError::InvalidConfig(
                "exceptions.separator must not be whitespace".into(),
            ));
        }
        if let Some(index) = self
            .exceptions
            .suppress_after
            .iter()
            .position(|s| s.trim().is_empty())
        {
            return Err(EngineError::InvalidConfig(format!(
                "exceptions.suppress_after[{index}] is blank"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_config_deserialize() {
        let toml_str = r#"
            [metadata]
            code = "xx"
            name = "Test"

            [exceptions]
            suppress_after = ["Mr.", "Ph.D."]
        "#;

        let config = ExceptionConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.metadata.code, "xx");
        assert_eq!(config.exceptions.separator, '.');
        assert_eq!(config.exceptions.suppress_after, vec!["Mr.", "Ph.D."]);
    }

    #[test]
    fn test_custom_separator() {
        let toml_str = r#"
            [metadata]
            code = "xx"
            name = "Test"

            [exceptions]
            separator = "。"
            suppress_after = ["株。式。"]
        "#;

        let config = ExceptionConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.exceptions.separator, '。');
    }

    #[test]
    fn test_multi_character_separator_rejected() {
        let toml_str = r#"
            [metadata]
            code = "xx"
            name = "Test"

            [exceptions]
            separator = ".."
            suppress_after = []
        "#;

        assert!(matches!(
            ExceptionConfig::from_toml_str(toml_str),
            Err(EngineError::Toml(_))
        ));
    }

    #[test]
    fn test_blank_entry_rejected() {
        let toml_str = r#"
            [metadata]
            code = "xx"
            name = "Test"

            [exceptions]
            suppress_after = ["Mr.", "  "]
        "#;

        match ExceptionConfig::from_toml_str(toml_str) {
            Err(EngineError::InvalidConfig(reason)) => assert!(reason.contains("[1]")),
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_code_rejected() {
        let toml_str = r#"
            [metadata]
            code = ""
            name = "Test"

            [exceptions]
            suppress_after = []
        "#;

        assert!(matches!(
            ExceptionConfig::from_toml_str(toml_str),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
