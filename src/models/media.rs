use std::path::PathBuf;

/// Decoded mono narration waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioTrack {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Zero-amplitude track of the given length, never shorter than one sample.
    pub fn silent(seconds: f64, sample_rate: u32) -> Self {
        let count = (seconds.max(0.0) * sample_rate as f64).round() as usize;
        Self::new(vec![0.0; count.max(1)], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() || self.sample_rate == 0
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// One rendered slide image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub number: u32,
    pub image: PathBuf,
}

/// Rendered slides in presentation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualTrack {
    pub slides: Vec<RenderedSlide>,
}

impl VisualTrack {
    pub fn new(slides: Vec<RenderedSlide>) -> Self {
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn images(&self) -> Vec<PathBuf> {
        self.slides.iter().map(|s| s.image.clone()).collect()
    }
}
