// TTS services module
// Narration audio through an ordered chain of speech engines

use async_trait::async_trait;
use log::{info, warn};
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{AudioTrack, GenerationSettings};
use crate::services::fallback::{first_success, Attempt};

pub mod audio_format;
pub mod espeak;
pub mod silence;
pub mod voice_clone;

pub use espeak::EspeakEngine;
pub use silence::SilenceEngine;
pub use voice_clone::VoiceCloneEngine;

/// Trait that all speech engines must implement
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// `scratch` is a per-run directory for intermediate files.
    async fn synthesize(
        &self,
        script: &str,
        settings: &GenerationSettings,
        scratch: &Path,
    ) -> Attempt<AudioTrack>;
}

/// Script to audio through the configured engines, ending in silence.
pub struct AudioSynthesizer {
    engines: Vec<Box<dyn SpeechEngine>>,
}

impl AudioSynthesizer {
    /// `engines` are tried in order; [`SilenceEngine`] is always appended.
    pub fn new(mut engines: Vec<Box<dyn SpeechEngine>>) -> Self {
        engines.push(Box::new(SilenceEngine));
        Self { engines }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut engines: Vec<Box<dyn SpeechEngine>> = Vec::new();
        if let Some(endpoint) = &config.voice_clone_endpoint {
            engines.push(Box::new(VoiceCloneEngine::new(endpoint, config.voices.clone())));
        }
        engines.push(Box::new(EspeakEngine::new(config.espeak_path.clone())));
        Self::new(engines)
    }

    pub fn engine_names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Never fails; the result always has a positive duration.
    pub async fn synthesize(
        &self,
        script: &str,
        settings: &GenerationSettings,
        scratch: &Path,
    ) -> AudioTrack {
        let selected = first_success(self.engines.iter(), |engine| async move {
            match engine.synthesize(script, settings, scratch).await {
                Attempt::Success(track) if track.is_empty() => {
                    warn!("{} produced no audio, falling back", engine.name());
                    Attempt::unavailable(format!("{}: empty waveform", engine.name()))
                }
                Attempt::Success(track) => {
                    info!(
                        "Narration synthesized with {} ({:.1}s)",
                        engine.name(),
                        track.duration()
                    );
                    Attempt::Success(track)
                }
                Attempt::Unavailable(reason) => {
                    warn!("{} unavailable, falling back: {}", engine.name(), reason);
                    Attempt::Unavailable(reason)
                }
            }
        })
        .await;

        selected.unwrap_or_else(|| {
            warn!("All speech engines failed, using silent narration");
            SilenceEngine::track_for(script)
        })
    }
}
