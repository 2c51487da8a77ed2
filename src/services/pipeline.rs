//! Request orchestration
//!
//! One call to [`Pipeline::generate_video`] runs a whole job: extraction,
//! script generation, audio synthesis and slide rendering side by side, then
//! composition. Progress is reported at fixed checkpoints. Any hard failure
//! ends the run with a single [`AppError`]; no partial result is returned.

use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::events::{ProgressRegistry, ProgressReporter};
use crate::models::{
    AnalysisRequest, AnalysisResponse, GenerationResult, GenerationSettings, SlideContent,
    VideoGenerationRequest, VideoGenerationResponse,
};
use crate::services::extraction::{ContentExtractor, LocalContentExtractor};
use crate::services::health::{self, HealthReport};
use crate::services::inference::{OllamaClient, TextGenerator};
use crate::services::script::ScriptSynthesizer;
use crate::services::slides::{FfmpegRasterizer, SlideRenderer};
use crate::services::storage::ArtifactStore;
use crate::services::tts::AudioSynthesizer;
use crate::services::video::{Compositor, FfmpegEncoder, VideoEncoder};
use crate::utils::ids::{IdGenerator, UuidIds};
use crate::utils::temp::ScratchDir;

pub mod stages {
    pub const PROCESSING_SLIDES: &str = "Processing slides...";
    pub const GENERATING_SCRIPT: &str = "Generating natural script...";
    pub const CREATING_VIDEO: &str = "Creating synchronized video...";
    pub const RENDERING_VIDEO: &str = "Rendering video...";
    pub const GENERATION_COMPLETE: &str = "Video generation complete!";
    pub const EXTRACTING_VIDEO: &str = "Extracting video content...";
    pub const ANALYZING: &str = "Analyzing content with local AI...";
    pub const ANALYSIS_COMPLETE: &str = "Analysis complete!";
}

/// Rendering sub-steps at 10/40/70/100 percent, mapped into 60..=90
fn rendering_progress(step: u8) -> u8 {
    60 + (step as u32 * 3 / 10) as u8
}

/// Collaborators a pipeline is assembled from
pub struct PipelineComponents {
    pub extractor: Arc<dyn ContentExtractor>,
    pub generator: Arc<dyn TextGenerator>,
    pub scripts: ScriptSynthesizer,
    pub audio: AudioSynthesizer,
    pub renderer: Arc<SlideRenderer>,
    pub compositor: Compositor,
    pub progress: Arc<dyn ProgressRegistry>,
}

pub struct Pipeline {
    extractor: Arc<dyn ContentExtractor>,
    generator: Arc<dyn TextGenerator>,
    scripts: ScriptSynthesizer,
    audio: AudioSynthesizer,
    renderer: Arc<SlideRenderer>,
    compositor: Compositor,
    progress: Arc<dyn ProgressRegistry>,
}

impl Pipeline {
    pub fn new(components: PipelineComponents) -> Self {
        let PipelineComponents {
            extractor,
            generator,
            scripts,
            audio,
            renderer,
            compositor,
            progress,
        } = components;
        Self {
            extractor,
            generator,
            scripts,
            audio,
            renderer,
            compositor,
            progress,
        }
    }

    /// Production wiring: Ollama, ffmpeg, espeak and random artifact ids.
    pub fn from_config(config: &AppConfig, progress: Arc<dyn ProgressRegistry>) -> AppResult<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let generator: Arc<dyn TextGenerator> = Arc::new(OllamaClient::new(&config.ollama_url, timeout)?);

        let rasterizer = Arc::new(FfmpegRasterizer::new(
            config.ffmpeg_path.clone(),
            config.font_file.clone(),
        ));
        let renderer = Arc::new(SlideRenderer::new(config.layout.clone(), rasterizer));

        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIds);
        let store = ArtifactStore::new(config.output_dir.clone(), ids);
        let encoder: Arc<dyn VideoEncoder> = Arc::new(FfmpegEncoder::new(config.ffmpeg_path.clone()));

        Ok(Self::new(PipelineComponents {
            extractor: Arc::new(LocalContentExtractor::new(config.ffprobe_path.clone())),
            scripts: ScriptSynthesizer::new(
                generator.clone(),
                config.model_preference.clone(),
                config.default_model.clone(),
            ),
            generator,
            audio: AudioSynthesizer::from_config(config),
            compositor: Compositor::new(encoder, store, renderer.clone()),
            renderer,
            progress,
        }))
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        self.compositor.store()
    }

    /// Full job for an uploaded deck.
    pub async fn generate_video(
        &self,
        request: &VideoGenerationRequest,
        client_id: &str,
    ) -> AppResult<VideoGenerationResponse> {
        let reporter = self.reporter(client_id);
        match self.run_request(request, &reporter).await {
            Ok(result) => Ok(VideoGenerationResponse::from_result(&result, &request.settings)),
            Err(e) => {
                error!("Video generation failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_request(
        &self,
        request: &VideoGenerationRequest,
        reporter: &ProgressReporter,
    ) -> AppResult<GenerationResult> {
        request.settings.validate()?;
        reporter.report(stages::PROCESSING_SLIDES, 10);
        let content = self
            .extractor
            .extract_content(&request.slide_data, &request.file_name)
            .await?;
        self.run_generation(&content, &request.settings, reporter).await
    }

    /// Job for already extracted content.
    pub async fn generate_from_content(
        &self,
        content: &SlideContent,
        settings: &GenerationSettings,
        client_id: &str,
    ) -> AppResult<GenerationResult> {
        settings.validate()?;
        let reporter = self.reporter(client_id);
        self.run_generation(content, settings, &reporter)
            .await
            .map_err(|e| {
                error!("Video generation failed: {}", e);
                e
            })
    }

    async fn run_generation(
        &self,
        content: &SlideContent,
        settings: &GenerationSettings,
        reporter: &ProgressReporter,
    ) -> AppResult<GenerationResult> {
        reporter.report(stages::GENERATING_SCRIPT, 30);
        let script = self.scripts.generate(content, settings).await?;
        info!("Generated script with {} words", script.split_whitespace().count());

        reporter.report(stages::CREATING_VIDEO, 60);
        let scratch = ScratchDir::new()?;

        reporter.report(stages::RENDERING_VIDEO, rendering_progress(10));
        // 72% marks finished narration, 81% finished slides
        let (audio, visuals) = tokio::join!(
            async {
                let audio = self.audio.synthesize(&script, settings, scratch.path()).await;
                reporter.report(stages::RENDERING_VIDEO, rendering_progress(40));
                audio
            },
            async {
                let visuals = self.renderer.render(content, scratch.path()).await;
                if visuals.is_ok() {
                    reporter.report(stages::RENDERING_VIDEO, rendering_progress(70));
                }
                visuals
            },
        );
        let visuals = visuals?;

        let composition = self
            .compositor
            .compose(&audio, &visuals, scratch.path())
            .await?;
        reporter.report(stages::RENDERING_VIDEO, rendering_progress(100));

        reporter.report(stages::GENERATION_COMPLETE, 100);
        Ok(GenerationResult::new(
            script,
            composition.audio_locator,
            composition.video_locator,
            composition.duration_label,
        ))
    }

    pub async fn analyze_video(
        &self,
        request: &AnalysisRequest,
        client_id: &str,
    ) -> AppResult<AnalysisResponse> {
        let reporter = self.reporter(client_id);
        self.run_analysis(request, &reporter).await.map_err(|e| {
            error!("Video analysis failed: {}", e);
            e
        })
    }

    async fn run_analysis(
        &self,
        request: &AnalysisRequest,
        reporter: &ProgressReporter,
    ) -> AppResult<AnalysisResponse> {
        reporter.report(stages::EXTRACTING_VIDEO, 20);
        let video = self
            .extractor
            .extract_video_content(&request.video_base64)
            .await?;

        reporter.report(stages::ANALYZING, 50);
        let analysis = self
            .scripts
            .generate_analysis(&video, &request.settings)
            .await?;

        reporter.report(stages::ANALYSIS_COMPLETE, 100);
        Ok(AnalysisResponse::from(analysis))
    }

    /// Whether the inference service answers; logged, never fatal.
    pub async fn check_connection(&self) -> bool {
        let connected = self.generator.check_connection().await;
        if connected {
            info!("Connected to the inference service");
        } else {
            warn!("Inference service is not reachable, script generation will fail");
        }
        connected
    }

    pub async fn health(&self, config: &AppConfig) -> HealthReport {
        health::health(self.generator.as_ref(), config).await
    }

    fn reporter(&self, client_id: &str) -> ProgressReporter {
        ProgressReporter::new(self.progress.clone(), client_id)
    }
}
