pub mod common;
pub mod ffmpeg;
pub mod ids;
pub mod logger;
pub mod temp;
pub mod tools;
