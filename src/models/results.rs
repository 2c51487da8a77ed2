use serde::{Deserialize, Serialize};

use super::settings::{AnalysisSettings, GenerationSettings};

/// Outcome of a successful generation run. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    script_text: String,
    audio_locator: String,
    video_locator: String,
    duration_label: String,
}

impl GenerationResult {
    pub fn new(
        script_text: String,
        audio_locator: String,
        video_locator: String,
        duration_label: String,
    ) -> Self {
        Self {
            script_text,
            audio_locator,
            video_locator,
            duration_label,
        }
    }

    pub fn script_text(&self) -> &str {
        &self.script_text
    }

    pub fn audio_locator(&self) -> &str {
        &self.audio_locator
    }

    pub fn video_locator(&self) -> &str {
        &self.video_locator
    }

    pub fn duration_label(&self) -> &str {
        &self.duration_label
    }
}

/// Output of the compositor
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub video_locator: String,
    pub audio_locator: String,
    pub duration_label: String,
    /// Final video duration after reconciliation, seconds
    pub video_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationRequest {
    /// Base64-encoded document
    pub slide_data: String,
    pub file_name: String,
    #[serde(default)]
    pub settings: GenerationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationResponse {
    pub success: bool,
    pub script: String,
    pub audio_url: String,
    pub video_url: String,
    pub duration: String,
    pub settings: GenerationSettings,
}

impl VideoGenerationResponse {
    pub fn from_result(result: &GenerationResult, settings: &GenerationSettings) -> Self {
        Self {
            success: true,
            script: result.script_text().to_string(),
            audio_url: result.audio_locator().to_string(),
            video_url: result.video_locator().to_string(),
            duration: result.duration_label().to_string(),
            settings: settings.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub video_base64: String,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

/// A sampled frame from a video under analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFrame {
    /// Seconds from the start
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    pub frames: Vec<VideoFrame>,
    /// Seconds
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub duration: String,
    pub file_size: String,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualAnalysisEntry {
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    pub clarity: String,
    pub tone: String,
    pub pacing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub transcript: String,
    pub metadata: AnalysisMetadata,
    pub visual_analysis: Vec<VisualAnalysisEntry>,
    pub audio_analysis: AudioAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    pub summary: String,
    pub key_insights: Vec<String>,
    pub transcript: String,
    pub metadata: AnalysisMetadata,
    pub visual_analysis: Vec<VisualAnalysisEntry>,
    pub audio_analysis: AudioAnalysis,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            success: true,
            summary: result.summary,
            key_insights: result.key_insights,
            transcript: result.transcript,
            metadata: result.metadata,
            visual_analysis: result.visual_analysis,
            audio_analysis: result.audio_analysis,
        }
    }
}
