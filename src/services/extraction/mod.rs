// Content extraction
// Decodes uploaded documents and videos into the inputs the pipeline works on.
// PPTX and PDF parsing are not available; those uploads are rejected.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::errors::UnsupportedInputError;
use crate::models::{SlideContent, VideoContent, VideoFrame};
use crate::utils::ffmpeg::probe_duration;

/// Frames sampled per second of video
pub const FRAME_CADENCE_SECS: f64 = 1.0;
pub const MAX_FRAMES: usize = 10;

// a line made of three or more dashes separates slides
static SLIDE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*-{3,}[ \t]*\r?$").unwrap());

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n(?:[ \t]*\r?\n)*").unwrap());

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract_content(
        &self,
        encoded_document: &str,
        file_name: &str,
    ) -> Result<SlideContent, UnsupportedInputError>;

    async fn extract_video_content(
        &self,
        encoded_video: &str,
    ) -> Result<VideoContent, UnsupportedInputError>;
}

/// Decode standard base64, tolerating a `data:...;base64,` prefix and line breaks.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, UnsupportedInputError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| UnsupportedInputError::Decode(format!("invalid base64: {}", e)))
}

fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Plain text and Markdown decks
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn extract(&self, bytes: &[u8], file_name: &str) -> Result<SlideContent, UnsupportedInputError> {
        let ext = extension(file_name);
        match ext.as_str() {
            "txt" | "md" | "markdown" => {}
            "pptx" | "ppt" | "pdf" => {
                return Err(UnsupportedInputError::FileType(format!(
                    "{} (presentation parsing is not available)",
                    ext
                )))
            }
            _ => return Err(UnsupportedInputError::FileType(ext)),
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|e| UnsupportedInputError::Decode(format!("{} is not UTF-8: {}", file_name, e)))?;
        Ok(SlideContent::from_texts(split_slides(text)))
    }
}

/// Split on `---` lines when present, otherwise on runs of blank lines.
pub fn split_slides(text: &str) -> Vec<String> {
    let chunks: Vec<&str> = if SLIDE_SEPARATOR.is_match(text) {
        SLIDE_SEPARATOR.split(text).collect()
    } else {
        BLANK_RUN.split(text).collect()
    };

    chunks
        .into_iter()
        .map(|chunk| chunk.trim().replace("\r\n", "\n"))
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Duration via ffprobe; frames are sampled timestamps without pixel data
#[derive(Debug, Clone)]
pub struct FfprobeVideoExtractor {
    ffprobe: PathBuf,
}

impl FfprobeVideoExtractor {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    pub async fn extract(&self, bytes: &[u8]) -> Result<VideoContent, UnsupportedInputError> {
        let file = tempfile::Builder::new()
            .prefix("slidecast_upload_")
            .suffix(".mp4")
            .tempfile()
            .map_err(|e| UnsupportedInputError::Decode(e.to_string()))?;
        tokio::fs::write(file.path(), bytes)
            .await
            .map_err(|e| UnsupportedInputError::Decode(e.to_string()))?;

        let duration = probe_duration(&self.ffprobe, file.path())
            .await
            .map_err(|e| UnsupportedInputError::Decode(format!("unreadable video: {}", e)))?;

        Ok(VideoContent {
            frames: sample_frames(duration),
            duration,
        })
    }
}

pub fn sample_frames(duration: f64) -> Vec<VideoFrame> {
    (0..MAX_FRAMES)
        .map(|i| i as f64 * FRAME_CADENCE_SECS)
        .take_while(|t| *t < duration)
        .map(|timestamp| VideoFrame {
            timestamp,
            frame_data: None,
        })
        .collect()
}

/// Documents through [`PlainTextExtractor`], videos through [`FfprobeVideoExtractor`]
pub struct LocalContentExtractor {
    documents: PlainTextExtractor,
    videos: FfprobeVideoExtractor,
}

impl LocalContentExtractor {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            documents: PlainTextExtractor,
            videos: FfprobeVideoExtractor::new(ffprobe),
        }
    }
}

#[async_trait]
impl ContentExtractor for LocalContentExtractor {
    async fn extract_content(
        &self,
        encoded_document: &str,
        file_name: &str,
    ) -> Result<SlideContent, UnsupportedInputError> {
        let bytes = decode_base64(encoded_document)?;
        let content = self.documents.extract(&bytes, file_name)?;
        log::info!("Extracted {} slide(s) from {}", content.len(), file_name);
        Ok(content)
    }

    async fn extract_video_content(
        &self,
        encoded_video: &str,
    ) -> Result<VideoContent, UnsupportedInputError> {
        let bytes = decode_base64(encoded_video)?;
        self.videos.extract(&bytes).await
    }
}
