//! Screen-time allocation and the concat demuxer script

use std::path::PathBuf;

use crate::utils::ffmpeg::quote;

pub const FPS: u32 = 24;

/// Screen time given to the fallback frame before reconciliation
pub const DEFAULT_SLIDE_SECONDS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SlideTiming {
    pub image: PathBuf,
    pub seconds: f64,
}

/// Split `audio_duration` evenly across the images.
pub fn allocate(images: &[PathBuf], audio_duration: f64) -> Vec<SlideTiming> {
    if images.is_empty() {
        return Vec::new();
    }
    let per_slide = audio_duration / images.len() as f64;
    let timings = images
        .iter()
        .map(|image| SlideTiming {
            image: image.clone(),
            seconds: per_slide,
        })
        .collect();
    reconcile(timings, audio_duration)
}

/// Make the timeline end exactly at `audio_duration`; the final slide absorbs
/// the difference. Audio is never touched.
pub fn reconcile(mut timings: Vec<SlideTiming>, audio_duration: f64) -> Vec<SlideTiming> {
    let Some((last, rest)) = timings.split_last_mut() else {
        return timings;
    };
    let preceding: f64 = rest.iter().map(|t| t.seconds).sum();
    let adjusted = (audio_duration - preceding).max(0.0);
    if (adjusted - last.seconds).abs() > f64::EPSILON {
        log::debug!(
            "Reconciling final slide: {:.3}s -> {:.3}s",
            last.seconds,
            adjusted
        );
    }
    last.seconds = adjusted;
    timings
}

pub fn total_seconds(timings: &[SlideTiming]) -> f64 {
    timings.iter().map(|t| t.seconds).sum()
}

/// Script for ffmpeg's concat demuxer. The last image is listed twice so its
/// duration is honoured.
pub fn concat_script(timings: &[SlideTiming]) -> String {
    let mut script = String::from("ffconcat version 1.0\n");
    for timing in timings {
        script.push_str(&format!(
            "file {}\nduration {:.6}\n",
            quote(&timing.image.to_string_lossy()),
            timing.seconds
        ));
    }
    if let Some(last) = timings.last() {
        script.push_str(&format!("file {}\n", quote(&last.image.to_string_lossy())));
    }
    script
}
