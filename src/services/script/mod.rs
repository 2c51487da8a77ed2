// Script generation services
// Turns slide content into a spoken narration script, and video content into an analysis

use log::{error, info, warn};
use std::sync::Arc;

use crate::errors::InferenceError;
use crate::models::{AnalysisResult, AnalysisSettings, GenerationSettings, SlideContent, VideoContent};
use crate::services::fallback::{first_success, Attempt};
use crate::services::inference::{TextGenerator, TextRequest};

pub mod analysis;
pub mod prompts;
pub mod sanitize;

pub use prompts::{build_system_prompt, build_user_prompt, level_descriptor};
pub use sanitize::sanitize;

pub const SCRIPT_MAX_TOKENS: u32 = 2000;
pub const SCRIPT_TEMPERATURE: f32 = 0.7;

const PROBE_PROMPT: &str = "Test";

pub struct ScriptSynthesizer {
    generator: Arc<dyn TextGenerator>,
    model_preference: Vec<String>,
    default_model: String,
}

impl ScriptSynthesizer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        model_preference: Vec<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            model_preference,
            default_model: default_model.into(),
        }
    }

    /// Probe preferred models in order with a one-token request.
    ///
    /// Resolved afresh on every call; falls back to the unvalidated default.
    pub async fn select_model(&self) -> String {
        let generator = &self.generator;
        let selected = first_success(self.model_preference.iter(), |model| async move {
            let probe = TextRequest::new(model, PROBE_PROMPT).max_tokens(1);
            match generator.generate_text(&probe).await {
                Ok(_) => Attempt::Success(model.clone()),
                Err(e) => Attempt::unavailable(format!("model {}: {}", model, e)),
            }
        })
        .await;

        match selected {
            Some(model) => {
                info!("Using model: {}", model);
                model
            }
            None => {
                warn!(
                    "No preferred models available, using default {}",
                    self.default_model
                );
                self.default_model.clone()
            }
        }
    }

    /// Generate a sanitized narration script.
    pub async fn generate(
        &self,
        content: &SlideContent,
        settings: &GenerationSettings,
    ) -> Result<String, InferenceError> {
        let model = self.select_model().await;
        let system_prompt = build_system_prompt(settings);
        let user_prompt = build_user_prompt(content, settings);

        let request = TextRequest::new(&model, &user_prompt)
            .system(&system_prompt)
            .max_tokens(SCRIPT_MAX_TOKENS)
            .temperature(SCRIPT_TEMPERATURE);

        let raw = self.generator.generate_text(&request).await.map_err(|e| {
            error!("Failed to generate script: {}", e);
            e
        })?;

        Ok(sanitize(&raw))
    }

    pub async fn generate_analysis(
        &self,
        video: &VideoContent,
        settings: &AnalysisSettings,
    ) -> Result<AnalysisResult, InferenceError> {
        let model = self.select_model().await;
        let prompt = analysis::build_analysis_prompt(video, settings);

        let request = TextRequest::new(&model, &prompt)
            .max_tokens(analysis::ANALYSIS_MAX_TOKENS)
            .temperature(analysis::ANALYSIS_TEMPERATURE);

        let summary = self.generator.generate_text(&request).await.map_err(|e| {
            error!("Failed to generate analysis: {}", e);
            e
        })?;

        Ok(analysis::build_analysis(summary, video))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Recorded call to the fake generator
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub model: String,
        pub prompt: String,
        pub system_prompt: Option<String>,
        pub max_tokens: u32,
        pub temperature: f32,
    }

    /// Fake text generator: models in `available` answer, everything else is a 404
    pub struct FakeGenerator {
        pub available: HashSet<String>,
        pub reply: String,
        pub calls: Mutex<Vec<RecordedCall>>,
        pub fail_generation: bool,
    }

    impl FakeGenerator {
        pub fn new(available: &[&str], reply: &str) -> Self {
            Self {
                available: available.iter().map(|s| s.to_string()).collect(),
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
                fail_generation: false,
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn check_connection(&self) -> bool {
            !self.available.is_empty()
        }

        async fn generate_text(&self, request: &TextRequest<'_>) -> Result<String, InferenceError> {
            self.calls.lock().unwrap().push(RecordedCall {
                model: request.model.to_string(),
                prompt: request.prompt.to_string(),
                system_prompt: request.system_prompt.map(str::to_string),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            });

            let is_probe = request.max_tokens == 1;
            if !self.available.contains(request.model) || (self.fail_generation && !is_probe) {
                return Err(InferenceError::Status {
                    status: 404,
                    body: format!("model '{}' not found", request.model),
                });
            }
            Ok(if is_probe { "ok".to_string() } else { self.reply.clone() })
        }

        async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
            let mut models: Vec<String> = self.available.iter().cloned().collect();
            models.sort();
            Ok(models)
        }
    }

    fn preference() -> Vec<String> {
        vec![
            "codellama:instruct".into(),
            "deepseek-coder:instruct".into(),
            "llama3.1:instruct".into(),
        ]
    }

    #[tokio::test]
    async fn test_select_model_first_available() {
        let fake = Arc::new(FakeGenerator::new(
            &["deepseek-coder:instruct", "llama3.1:instruct"],
            "",
        ));
        let synth = ScriptSynthesizer::new(fake.clone(), preference(), "llama3.1");

        assert_eq!(synth.select_model().await, "deepseek-coder:instruct");

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].model, "codellama:instruct");
        assert_eq!(calls[0].prompt, "Test");
        assert_eq!(calls[0].max_tokens, 1);
    }

    #[tokio::test]
    async fn test_select_model_falls_back_to_default() {
        let fake = Arc::new(FakeGenerator::new(&[], ""));
        let synth = ScriptSynthesizer::new(fake.clone(), preference(), "llama3.1");

        assert_eq!(synth.select_model().await, "llama3.1");
        assert_eq!(fake.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_select_model_is_not_cached() {
        let fake = Arc::new(FakeGenerator::new(&["llama3.1:instruct"], ""));
        let synth = ScriptSynthesizer::new(fake.clone(), preference(), "llama3.1");

        synth.select_model().await;
        synth.select_model().await;
        assert_eq!(fake.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_generate_uses_selected_model_and_sanitizes() {
        let fake = Arc::new(FakeGenerator::new(
            &["codellama:instruct"],
            "Introduction: Rust is great.\n\nIn conclusion, use it.",
        ));
        let synth = ScriptSynthesizer::new(fake.clone(), preference(), "llama3.1");
        let content = SlideContent::from_texts(["Why Rust"]);

        let script = synth
            .generate(&content, &GenerationSettings::default())
            .await
            .unwrap();
        assert_eq!(script, "Welcome everyone. Rust is great.\nuse it.");

        let calls = fake.calls();
        let generation = calls.last().unwrap();
        assert_eq!(generation.model, "codellama:instruct");
        assert_eq!(generation.max_tokens, 2000);
        assert!((generation.temperature - 0.7).abs() < f32::EPSILON);
        assert!(generation.prompt.contains("Slide 1: Why Rust"));
        assert!(generation
            .system_prompt
            .as_deref()
            .unwrap()
            .contains("professional presentation script"));
    }

    #[tokio::test]
    async fn test_generate_propagates_inference_error() {
        let mut fake = FakeGenerator::new(&["codellama:instruct"], "unused");
        fake.fail_generation = true;
        let synth = ScriptSynthesizer::new(Arc::new(fake), preference(), "llama3.1");

        let err = synth
            .generate(&SlideContent::from_texts(["x"]), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_generate_analysis() {
        let fake = Arc::new(FakeGenerator::new(&["llama3.1:instruct"], "A clear talk."));
        let synth = ScriptSynthesizer::new(fake.clone(), preference(), "llama3.1");
        let video = VideoContent {
            frames: Vec::new(),
            duration: 40.0,
        };

        let result = synth
            .generate_analysis(&video, &AnalysisSettings::default())
            .await
            .unwrap();
        assert_eq!(result.summary, "A clear talk.");
        assert_eq!(result.transcript, "A clear talk....");

        let generation = fake.calls().last().cloned().unwrap();
        assert_eq!(generation.max_tokens, 1500);
        assert!(generation.system_prompt.is_none());
        assert!(generation.prompt.contains("Duration: 40.0 seconds"));
    }
}
