use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Settings for one video generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Level of detail, 1 (beginner) to 5 (expert)
    #[serde(default = "default_intelligence_level")]
    pub intelligence_level: i32,

    /// Target speaking time lower bound, minutes
    #[serde(default = "default_min_length")]
    pub min_length: u32,

    /// Target speaking time upper bound, minutes
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// Voice preset key
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_tone")]
    pub tone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

fn default_intelligence_level() -> i32 {
    3
}

fn default_min_length() -> u32 {
    5
}

fn default_max_length() -> u32 {
    15
}

fn default_voice() -> String {
    "default".to_string()
}

fn default_tone() -> String {
    "professional".to_string()
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            intelligence_level: default_intelligence_level(),
            min_length: default_min_length(),
            max_length: default_max_length(),
            voice: default_voice(),
            tone: default_tone(),
            custom_instructions: None,
        }
    }
}

impl GenerationSettings {
    /// Out-of-range intelligence levels are tolerated; prompts fall back to level 3.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_length < self.min_length {
            return Err(AppError::InvalidSettings(format!(
                "maxLength ({}) is smaller than minLength ({})",
                self.max_length, self.min_length
            )));
        }
        if self.voice.trim().is_empty() {
            return Err(AppError::InvalidSettings("voice must not be empty".to_string()));
        }
        Ok(())
    }

    /// Custom instructions, if any non-blank ones were given.
    pub fn instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Settings for the video analysis feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    #[serde(default = "default_focus_area")]
    pub focus_area: String,
    #[serde(default = "default_summary_length")]
    pub summary_length: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_focus_area() -> String {
    "general".to_string()
}

fn default_summary_length() -> String {
    "medium".to_string()
}

fn default_output_format() -> String {
    "paragraph".to_string()
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            focus_area: default_focus_area(),
            summary_length: default_summary_length(),
            output_format: default_output_format(),
        }
    }
}
