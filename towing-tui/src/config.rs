use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Secret shipped with the app. An access-friction mechanism for
/// destructive operations, not authentication.
const DEFAULT_GATE_SECRET: &str = "85988106362";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowingConfig {
    /// Passcode guarding contract deletion, contract renumbering and
    /// collaborator management.
    #[serde(default = "default_gate_secret")]
    pub gate_secret: String,
    /// Where contracts.json / collaborators.json live. Defaults to the
    /// platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Directory containing the report font family (regular/bold/italic
    /// TTF files). Defaults to ./fonts.
    #[serde(default = "default_font_dir")]
    pub font_dir: PathBuf,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Gemini API key for the photo-to-activities scan. When absent the
    /// scan action is unavailable.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

fn default_gate_secret() -> String {
    DEFAULT_GATE_SECRET.to_string()
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_font_family() -> String {
    "LiberationSans".to_string()
}

impl Default for TowingConfig {
    fn default() -> Self {
        Self {
            gate_secret: default_gate_secret(),
            data_dir: None,
            font_dir: default_font_dir(),
            font_family: default_font_family(),
            gemini_api_key: None,
        }
    }
}

impl TowingConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("towing")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Directory the persisted collections live in.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Ok(dirs::data_dir()
            .context("Cannot determine data directory")?
            .join("towing"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .context("Cannot determine data directory")?
            .join("towing")
            .join("towing-tui.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: TowingConfig = toml::from_str("").unwrap();
        assert_eq!(config.gate_secret, DEFAULT_GATE_SECRET);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.font_family, "LiberationSans");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: TowingConfig =
            toml::from_str("gate_secret = \"s3cret\"\ngemini_api_key = \"k\"").unwrap();
        assert_eq!(config.gate_secret, "s3cret");
        assert_eq!(config.gemini_api_key.as_deref(), Some("k"));
    }
}
