// Configuration module
// Centralized management of application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::services::slides::LayoutConfig;

pub mod tts; // voice presets

pub use tts::{VoicePreset, VoicePresets};

pub const ENV_OLLAMA_URL: &str = "SLIDECAST_OLLAMA_URL";
pub const ENV_OUTPUT_DIR: &str = "SLIDECAST_OUTPUT_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ollama_url: String,
    /// Transport timeout for inference requests; none by default
    pub request_timeout_secs: Option<u64>,
    /// Models probed in order before falling back to `default_model`
    pub model_preference: Vec<String>,
    pub default_model: String,
    pub output_dir: PathBuf,
    /// Base URL of the voice-cloning TTS service; the engine is skipped when unset
    pub voice_clone_endpoint: Option<String>,
    pub espeak_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Font used by drawtext; ffmpeg's built-in default when unset
    pub font_file: Option<PathBuf>,
    pub layout: LayoutConfig,
    pub voices: VoicePresets,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            request_timeout_secs: None,
            model_preference: vec![
                "codellama:instruct".to_string(),
                "deepseek-coder:instruct".to_string(),
                "llama3.1:instruct".to_string(),
            ],
            default_model: "llama3.1".to_string(),
            output_dir: PathBuf::from("output"),
            voice_clone_endpoint: None,
            espeak_path: PathBuf::from("espeak"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            font_file: None,
            layout: LayoutConfig::default(),
            voices: VoicePresets::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, then apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                let config: AppConfig = serde_json::from_str(&raw)?;
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                AppConfig::default()
            }
            None => AppConfig::default(),
        };

        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_OLLAMA_URL).filter(|v| !v.trim().is_empty()) {
            log::debug!("Ollama URL overridden by {}", ENV_OLLAMA_URL);
            self.ollama_url = url;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            log::debug!("Output directory overridden by {}", ENV_OUTPUT_DIR);
            self.output_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_preference.is_empty() && self.default_model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "no models configured: model_preference and default_model are both empty".into(),
            ));
        }
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Invalid("default_model must not be empty".into()));
        }
        if self.layout.width == 0 || self.layout.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size must be non-zero, got {}x{}",
                self.layout.width, self.layout.height
            )));
        }
        if self.ollama_url.trim().is_empty() {
            return Err(ConfigError::Invalid("ollama_url must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.default_model, "llama3.1");
        assert_eq!(config.model_preference.len(), 3);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"ollama_url": "http://gpu-box:11434", "font_file": "/f.ttf"}"#)
                .unwrap();
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.font_file, Some(PathBuf::from("/f.ttf")));
        assert_eq!(config.layout.width, 1920);
        assert_eq!(config.espeak_path, PathBuf::from("espeak"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_OLLAMA_URL, "http://remote:11434"),
            (ENV_OUTPUT_DIR, "/var/slidecast"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.ollama_url, "http://remote:11434");
        assert_eq!(config.output_dir, PathBuf::from("/var/slidecast"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides_from(|_| Some("   ".to_string()));
        assert_eq!(config.ollama_url, "http://localhost:11434");
    }

    #[test]
    fn test_validate_rejects_zero_frame() {
        let mut config = AppConfig::default();
        config.layout.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_model": "mistral", "model_preference": []}"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_model, "mistral");
        assert!(config.model_preference.is_empty());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Parse(_))));
    }
}
