// Video composition services
// Times the slides against the narration, then muxes and encodes the final MP4

use std::path::Path;
use std::sync::Arc;

use crate::errors::CompositionError;
use crate::models::{AudioTrack, Composition, VisualTrack};
use crate::services::slides::SlideRenderer;
use crate::services::storage::{ArtifactKind, ArtifactStore};
use crate::services::tts::audio_format::encode_wav;
use crate::utils::common::duration_label;

pub mod encoder;
pub mod timeline;

pub use encoder::{EncodeJob, FfmpegEncoder, VideoEncoder};
pub use timeline::{SlideTiming, FPS};

pub struct Compositor {
    encoder: Arc<dyn VideoEncoder>,
    store: ArtifactStore,
    renderer: Arc<SlideRenderer>,
}

impl Compositor {
    pub fn new(
        encoder: Arc<dyn VideoEncoder>,
        store: ArtifactStore,
        renderer: Arc<SlideRenderer>,
    ) -> Self {
        Self {
            encoder,
            store,
            renderer,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    async fn timeline(
        &self,
        audio: &AudioTrack,
        visuals: &VisualTrack,
        scratch: &Path,
    ) -> Result<Vec<SlideTiming>, CompositionError> {
        if !visuals.is_empty() {
            return Ok(timeline::allocate(&visuals.images(), audio.duration()));
        }

        log::warn!("No rendered slides, composing with the default frame");
        let default = self.renderer.render_default(scratch).await?;
        let timings = vec![SlideTiming {
            image: default.image,
            seconds: timeline::DEFAULT_SLIDE_SECONDS,
        }];
        Ok(timeline::reconcile(timings, audio.duration()))
    }

    /// Mux narration and slides into the output directory.
    ///
    /// On failure nothing is left behind in the output directory.
    pub async fn compose(
        &self,
        audio: &AudioTrack,
        visuals: &VisualTrack,
        scratch: &Path,
    ) -> Result<Composition, CompositionError> {
        let timings = self.timeline(audio, visuals, scratch).await?;
        let concat_list = scratch.join("concat.txt");
        tokio::fs::write(&concat_list, timeline::concat_script(&timings)).await?;

        self.store.ensure_dirs()?;
        let id = self.store.next_id();
        let audio_artifact = self.store.reserve(ArtifactKind::Audio, &id);
        let video_artifact = self.store.reserve(ArtifactKind::Video, &id);

        if let Err(e) = encode_wav(audio, &audio_artifact.path) {
            log::error!("Failed to write narration audio: {}", e);
            audio_artifact.discard();
            return Err(e.into());
        }

        let layout = self.renderer.config();
        let job = EncodeJob {
            concat_list,
            audio: audio_artifact.path.clone(),
            output: video_artifact.path.clone(),
            duration: audio.duration(),
            fps: FPS,
            width: layout.width,
            height: layout.height,
        };

        if let Err(e) = self.encoder.encode(&job).await {
            log::error!("Video composition failed: {}", e);
            video_artifact.discard();
            audio_artifact.discard();
            return Err(e);
        }

        let video_duration = timeline::total_seconds(&timings);
        log::info!(
            "Composed {} ({} slide(s), {:.2}s)",
            video_artifact.file_name,
            timings.len(),
            video_duration
        );

        Ok(Composition {
            video_locator: video_artifact.url(),
            audio_locator: audio_artifact.url(),
            duration_label: duration_label(audio.duration()),
            video_duration,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::RenderedSlide;
    use crate::services::slides::tests::FakeRasterizer;
    use crate::services::slides::LayoutConfig;
    use crate::utils::ids::SequentialIds;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Captures jobs and the concat script; writes a stub output file
    #[derive(Default)]
    pub struct FakeEncoder {
        pub jobs: Mutex<Vec<(EncodeJob, String)>>,
        pub fail: bool,
    }

    impl FakeEncoder {
        pub fn jobs(&self) -> Vec<(EncodeJob, String)> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoEncoder for FakeEncoder {
        async fn encode(&self, job: &EncodeJob) -> Result<(), CompositionError> {
            let script = tokio::fs::read_to_string(&job.concat_list).await?;
            self.jobs.lock().unwrap().push((job.clone(), script));
            // a failing encoder still leaves a partial file behind
            tokio::fs::write(&job.output, b"partial mp4").await?;
            if self.fail {
                return Err(CompositionError::Encode("ffmpeg exited with 1".into()));
            }
            Ok(())
        }
    }

    fn compositor(output: &Path, encoder: Arc<FakeEncoder>) -> Compositor {
        let renderer = Arc::new(SlideRenderer::new(
            LayoutConfig::default(),
            Arc::new(FakeRasterizer::default()),
        ));
        let store = ArtifactStore::new(output, Arc::new(SequentialIds::new()));
        Compositor::new(encoder, store, renderer)
    }

    fn visuals(scratch: &Path, n: u32) -> VisualTrack {
        VisualTrack::new(
            (1..=n)
                .map(|i| RenderedSlide {
                    number: i,
                    image: scratch.join(format!("slide_{}.png", i)),
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_compose_writes_artifacts() {
        let output = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let encoder = Arc::new(FakeEncoder::default());
        let compositor = compositor(output.path(), encoder.clone());
        let audio = AudioTrack::silent(125.0, 8000);

        let composition = compositor
            .compose(&audio, &visuals(scratch.path(), 4), scratch.path())
            .await
            .unwrap();

        assert_eq!(composition.video_locator, "/download/videos/video_1.mp4");
        assert_eq!(composition.audio_locator, "/download/audio/audio_1.wav");
        assert_eq!(composition.duration_label, "2:05");
        assert!((composition.video_duration - audio.duration()).abs() < 1e-9);
        assert!(output.path().join("audio/audio_1.wav").exists());

        let jobs = encoder.jobs();
        let (job, script) = &jobs[0];
        assert_eq!(job.fps, 24);
        assert_eq!(job.duration, audio.duration());
        assert_eq!(script.matches("duration 31.250000").count(), 4);
    }

    #[tokio::test]
    async fn test_empty_visuals_use_default_frame_for_whole_audio() {
        let output = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let encoder = Arc::new(FakeEncoder::default());
        let compositor = compositor(output.path(), encoder.clone());
        let audio = AudioTrack::silent(12.0, 8000);

        let composition = compositor
            .compose(&audio, &VisualTrack::default(), scratch.path())
            .await
            .unwrap();

        assert_eq!(composition.video_duration, 12.0);
        let (_, script) = &encoder.jobs()[0];
        assert!(script.contains("default_slide.png"));
        assert!(script.contains("duration 12.000000"));
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_no_artifacts() {
        let output = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let encoder = Arc::new(FakeEncoder {
            fail: true,
            ..Default::default()
        });
        let compositor = compositor(output.path(), encoder);

        let result = compositor
            .compose(&AudioTrack::silent(3.0, 8000), &visuals(scratch.path(), 2), scratch.path())
            .await;

        assert!(matches!(result, Err(CompositionError::Encode(_))));
        assert!(!output.path().join("videos/video_1.mp4").exists());
        assert!(!output.path().join("audio/audio_1.wav").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_composition_error() {
        let scratch = tempfile::tempdir().unwrap();
        let blocker = scratch.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();
        let compositor = compositor(&PathBuf::from(&blocker), Arc::new(FakeEncoder::default()));

        let result = compositor
            .compose(&AudioTrack::silent(1.0, 8000), &visuals(scratch.path(), 1), scratch.path())
            .await;
        assert!(matches!(result, Err(CompositionError::Io(_))));
    }
}
