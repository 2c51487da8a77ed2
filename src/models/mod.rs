// Domain models module
// Contains core data structures used throughout the pipeline

pub mod media;
pub mod results;
pub mod settings;
pub mod slides;

pub use media::{AudioTrack, RenderedSlide, VisualTrack};
pub use results::{
    AnalysisMetadata, AnalysisRequest, AnalysisResponse, AnalysisResult, AudioAnalysis,
    Composition, GenerationResult, VideoContent, VideoFrame, VideoGenerationRequest,
    VideoGenerationResponse, VisualAnalysisEntry,
};
pub use settings::{AnalysisSettings, GenerationSettings};
pub use slides::{ImageRef, Slide, SlideContent};
