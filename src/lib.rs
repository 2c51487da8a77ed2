//! Slidecast turns a slide deck into a narrated video.
//!
//! A local LLM writes the narration script, a chain of speech engines voices
//! it (falling back to silence when none is available), slides are rendered
//! to images and ffmpeg muxes everything into an MP4. See [`Pipeline`].

pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use events::{ChannelRegistry, ProgressMessage, ProgressRegistry};
pub use services::Pipeline;
