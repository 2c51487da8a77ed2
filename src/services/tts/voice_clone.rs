use async_trait::async_trait;
use reqwest::{multipart, Client};
use std::path::Path;

use super::audio_format::decode_wav_bytes;
use super::SpeechEngine;
use crate::config::{VoicePreset, VoicePresets};
use crate::models::{AudioTrack, GenerationSettings};
use crate::services::fallback::Attempt;

/// Premium voice-cloning TTS service reached over HTTP
pub struct VoiceCloneEngine {
    client: Client,
    endpoint: String,
    presets: VoicePresets,
}

impl VoiceCloneEngine {
    pub fn new(endpoint: &str, presets: VoicePresets) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            presets,
        }
    }

    async fn build_form(&self, script: &str, preset: &VoicePreset) -> Result<multipart::Form, String> {
        let mut form = multipart::Form::new()
            .text("text", script.to_string())
            .text("language", preset.language.clone())
            .text("format", "wav");

        if let Some(sample) = &preset.sample {
            let bytes = tokio::fs::read(sample)
                .await
                .map_err(|e| format!("reference sample {}: {}", sample.display(), e))?;
            let file_name = sample
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "reference.wav".to_string());
            let part = multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("audio/wav")
                .map_err(|e| e.to_string())?;
            form = form.part("reference_audio", part);
        }

        Ok(form)
    }

    async fn request(&self, script: &str, settings: &GenerationSettings) -> Result<AudioTrack, String> {
        let preset = self.presets.resolve(&settings.voice);
        let form = self.build_form(script, &preset).await?;

        let response = self
            .client
            .post(format!("{}/v1/tts", self.endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read response: {}", e))?;
        decode_wav_bytes(&bytes).map_err(|e| format!("undecodable audio: {}", e))
    }
}

#[async_trait]
impl SpeechEngine for VoiceCloneEngine {
    fn name(&self) -> &'static str {
        "voice-clone"
    }

    async fn synthesize(
        &self,
        script: &str,
        settings: &GenerationSettings,
        _scratch: &Path,
    ) -> Attempt<AudioTrack> {
        self.request(script, settings).await.into()
    }
}
