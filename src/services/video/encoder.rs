use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::CompositionError;
use crate::utils::ffmpeg::run_ffmpeg;

/// Inputs for muxing the slide timeline with the narration
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    /// ffconcat script listing the slide images
    pub concat_list: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
    /// Output is clamped to this many seconds
    pub duration: f64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait VideoEncoder: Send + Sync {
    async fn encode(&self, job: &EncodeJob) -> Result<(), CompositionError>;
}

/// H.264 + AAC in MP4 via the ffmpeg command line tool
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    pub(crate) fn arguments(job: &EncodeJob) -> Vec<String> {
        vec![
            "-y".into(),
            "-v".into(),
            "error".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            job.concat_list.to_string_lossy().into_owned(),
            "-i".into(),
            job.audio.to_string_lossy().into_owned(),
            "-map".into(),
            "0:v".into(),
            "-map".into(),
            "1:a".into(),
            "-vf".into(),
            format!("scale={}:{},fps={}", job.width, job.height, job.fps),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            "aac".into(),
            "-t".into(),
            format!("{:.3}", job.duration),
            "-movflags".into(),
            "+faststart".into(),
            job.output.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn encode(&self, job: &EncodeJob) -> Result<(), CompositionError> {
        log::info!(
            "Encoding {} ({:.1}s at {} fps)",
            job.output.display(),
            job.duration,
            job.fps
        );
        run_ffmpeg(&self.ffmpeg, Self::arguments(job)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments() {
        let job = EncodeJob {
            concat_list: PathBuf::from("/scratch/concat.txt"),
            audio: PathBuf::from("/out/audio/audio_1.wav"),
            output: PathBuf::from("/out/videos/video_1.mp4"),
            duration: 12.3456,
            fps: 24,
            width: 1920,
            height: 1080,
        };
        let args = FfmpegEncoder::arguments(&job).join(" ");

        assert!(args.contains("-f concat -safe 0 -i /scratch/concat.txt -i /out/audio/audio_1.wav"));
        assert!(args.contains("-vf scale=1920:1080,fps=24"));
        assert!(args.contains("-c:v libx264"));
        assert!(args.contains("-c:a aac"));
        assert!(args.contains("-t 12.346"));
        assert!(args.ends_with("/out/videos/video_1.mp4"));
    }
}
