//! User settings for manhours-cli
//!
//! Manages preferences such as the currency label, export file names and the
//! language-model connection used for MTO extraction.

use serde::{Deserialize, Serialize};

use super::paths::ManhoursPaths;
use crate::error::ManhoursError;

/// Language model connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Chat-completions endpoint (OpenAI-compatible)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model name sent with each request
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmSettings {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// User settings for manhours-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency code shown in column titles and totals
    #[serde(default = "default_currency")]
    pub currency_code: String,

    /// Default file name for the consolidated manhour workbook
    #[serde(default = "default_manhours_file")]
    pub manhours_export_file: String,

    /// Default file name for the extracted MTO workbook
    #[serde(default = "default_mto_file")]
    pub mto_export_file: String,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "SAR".to_string()
}

fn default_manhours_file() -> String {
    "manhours_consolidated.xlsx".to_string()
}

fn default_mto_file() -> String {
    "Extracted-MTO-Table.xlsx".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_code: default_currency(),
            manhours_export_file: default_manhours_file(),
            mto_export_file: default_mto_file(),
            llm: LlmSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ManhoursPaths) -> Result<Self, ManhoursError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ManhoursError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ManhoursError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ManhoursPaths) -> Result<(), ManhoursError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ManhoursError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            ManhoursError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_code, "SAR");
        assert_eq!(settings.manhours_export_file, "manhours_consolidated.xlsx");
        assert_eq!(settings.llm.model, "gpt-3.5-turbo");
        assert_eq!(settings.llm.temperature, 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_code = "USD".into();
        settings.llm.timeout_secs = 30;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_code, "USD");
        assert_eq!(loaded.llm.timeout_secs, 30);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_code": "AED"}"#).unwrap();
        assert_eq!(settings.currency_code, "AED");
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.llm.api_key_env, "OPENAI_API_KEY");
    }
}
