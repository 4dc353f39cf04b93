// Engine settings, loaded from an optional JSON file.
use serde::Deserialize;
use shared::i18n::Language;
use shared::models::Currency;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "INVOICE_ENGINE_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub language: Language,
    /// Single-byte field delimiter; JSON string is easier to edit than a byte.
    pub csv_delimiter: String,
    pub storage_path: PathBuf,
    /// How long a notice stays visible before it is dismissed.
    pub notice_duration_ms: u64,
    pub default_tax_rate: f64,
    pub currency: Currency,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            language: Language::Cs,
            csv_delimiter: ",".to_string(),
            storage_path: PathBuf::from("invoice_store.json"),
            notice_duration_ms: 4500,
            default_tax_rate: 20.0,
            currency: Currency::USD,
        }
    }
}

impl EngineSettings {
    /// Reads the file named by `INVOICE_ENGINE_CONFIG`, or the defaults when unset.
    pub fn load() -> Result<Self, EngineError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, EngineError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: EngineSettings = serde_json::from_str(&raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings file '{}': {}", path.display(), e)))?;
        settings.delimiter()?;
        Ok(settings)
    }

    pub fn delimiter(&self) -> Result<u8, EngineError> {
        match self.csv_delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(EngineError::ConfigError(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            ))),
        }
    }
}
