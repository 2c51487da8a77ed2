// Services module
// Business logic separated by stage of the generation pipeline

pub mod extraction; // Document and video decoding
pub mod fallback; // Ordered first-success selection
pub mod health; // Service and tool status
pub mod inference; // Local LLM client
pub mod pipeline; // Request orchestration
pub mod script; // Narration script and analysis generation
pub mod slides; // Slide layout and rasterization
pub mod storage; // Output artifacts
pub mod tts; // Text-to-Speech engines
pub mod video; // Timeline and encoding

pub use pipeline::{Pipeline, PipelineComponents};
