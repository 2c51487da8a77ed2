use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::audio_format::decode_wav_file;
use super::SpeechEngine;
use crate::models::{AudioTrack, GenerationSettings};
use crate::services::fallback::Attempt;

/// Words per minute
pub const ESPEAK_SPEED: u32 = 150;

/// Basic offline speech through the `espeak` command line tool
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    program: PathBuf,
}

impl EspeakEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new("espeak")
    }
}

/// espeak reads its text as one argument; line breaks become spaces
pub fn flatten_script(script: &str) -> String {
    script.replace(&['\r', '\n'][..], " ")
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &'static str {
        "espeak"
    }

    async fn synthesize(
        &self,
        script: &str,
        _settings: &GenerationSettings,
        scratch: &Path,
    ) -> Attempt<AudioTrack> {
        let output = scratch.join("espeak_narration.wav");

        let result = Command::new(&self.program)
            .arg("-s")
            .arg(ESPEAK_SPEED.to_string())
            .arg("-w")
            .arg(&output)
            .arg(flatten_script(script))
            .output()
            .await;

        match result {
            Err(e) => Attempt::unavailable(format!("failed to run {}: {}", self.program.display(), e)),
            Ok(out) if !out.status.success() => Attempt::unavailable(format!(
                "espeak exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )),
            Ok(_) => decode_wav_file(&output).into(),
        }
    }
}
