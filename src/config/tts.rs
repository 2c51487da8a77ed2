use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_VOICE: &str = "default";
pub const DEFAULT_LANGUAGE: &str = "en";

// Voice preset for the voice-cloning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicePreset {
    /// Reference recording the cloned voice imitates; `None` uses the engine's default voice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<PathBuf>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for VoicePreset {
    fn default() -> Self {
        Self {
            sample: None,
            language: default_language(),
        }
    }
}

/// Named voice presets. Lookup never fails: unknown names map to the default voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoicePresets {
    presets: HashMap<String, VoicePreset>,
}

impl Default for VoicePresets {
    fn default() -> Self {
        let mut presets = HashMap::new();
        presets.insert(DEFAULT_VOICE.to_string(), VoicePreset::default());
        presets.insert(
            "professional_male".to_string(),
            VoicePreset {
                sample: Some(PathBuf::from("voices/professional_male.wav")),
                language: default_language(),
            },
        );
        presets.insert(
            "professional_female".to_string(),
            VoicePreset {
                sample: Some(PathBuf::from("voices/professional_female.wav")),
                language: default_language(),
            },
        );
        Self { presets }
    }
}

impl VoicePresets {
    pub fn resolve(&self, voice: &str) -> VoicePreset {
        if voice == DEFAULT_VOICE {
            return VoicePreset::default();
        }
        match self.presets.get(voice) {
            Some(preset) => preset.clone(),
            None => {
                log::debug!("Unknown voice preset '{}', using default voice", voice);
                VoicePreset::default()
            }
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, preset: VoicePreset) {
        self.presets.insert(name.into(), preset);
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
