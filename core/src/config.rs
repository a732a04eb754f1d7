//! Engine configuration.
//!
//! Only settings the core acts on live here. Keyboard layouts, sounds and
//! other presentation preferences belong to the host.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::candidates::DEFAULT_PAGE_SIZE;
use crate::error::ConfigError;

/// Configuration shared by the Cangjie and Zhuyin sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImeConfig {
    /// Use simplified (first and last letter) Cangjie input
    pub cangjie_simplified: bool,

    /// Candidates per page
    pub candidate_page_size: usize,

    /// Locale used to filter the user dictionary
    pub locale: String,

    /// Packed Cangjie word table
    pub cangjie_table: Option<PathBuf>,

    /// Packed Zhuyin word table
    pub zhuyin_table: Option<PathBuf>,

    /// Packed phrase table
    pub phrase_table: Option<PathBuf>,

    /// redb user word list
    pub user_dictionary: Option<PathBuf>,
}

impl Default for ImeConfig {
    fn default() -> Self {
        Self {
            cangjie_simplified: false,
            candidate_page_size: DEFAULT_PAGE_SIZE,
            locale: "zh_TW".to_string(),
            cangjie_table: None,
            zhuyin_table: None,
            phrase_table: None,
            user_dictionary: None,
        }
    }
}

impl ImeConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ImeConfig::from_toml_str("cangjie_simplified = true\n").unwrap();
        assert!(config.cangjie_simplified);
        assert_eq!(config.candidate_page_size, 6);
        assert_eq!(config.locale, "zh_TW");
        assert_eq!(config.phrase_table, None);
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcime.toml");
        let config = ImeConfig {
            locale: "zh_HK".into(),
            phrase_table: Some(PathBuf::from("data/phrases.bin")),
            ..ImeConfig::default()
        };
        config.save_toml(&path).unwrap();
        assert_eq!(ImeConfig::load_toml(&path).unwrap(), config);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(ImeConfig::from_toml_str("candidate_page_size = \"six\"").is_err());
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImeConfig::load_toml(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
