use async_trait::async_trait;
use std::path::Path;

use super::SpeechEngine;
use crate::models::{AudioTrack, GenerationSettings};
use crate::services::fallback::Attempt;
use crate::utils::common::word_count;

pub const SILENCE_SAMPLE_RATE: u32 = 22_050;

/// Rough speaking rate used to size the silent track
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Last resort: a silent track as long as the script would take to read.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilenceEngine;

impl SilenceEngine {
    pub fn track_for(script: &str) -> AudioTrack {
        let seconds = word_count(script) as f64 / WORDS_PER_SECOND;
        AudioTrack::silent(seconds, SILENCE_SAMPLE_RATE)
    }
}

#[async_trait]
impl SpeechEngine for SilenceEngine {
    fn name(&self) -> &'static str {
        "silence"
    }

    async fn synthesize(
        &self,
        script: &str,
        _settings: &GenerationSettings,
        _scratch: &Path,
    ) -> Attempt<AudioTrack> {
        Attempt::Success(Self::track_for(script))
    }
}
