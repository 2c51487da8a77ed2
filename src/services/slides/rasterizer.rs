use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::layout::{Anchor, SlideLayout, TextItem};
use crate::errors::CompositionError;
use crate::utils::ffmpeg::{quote, run_ffmpeg};

/// Turns a laid-out slide into an image file
#[async_trait]
pub trait SlideRasterizer: Send + Sync {
    async fn rasterize(&self, layout: &SlideLayout, output: &Path) -> Result<(), CompositionError>;
}

/// Draws text with ffmpeg `drawtext` over a white `color` source and writes a PNG.
#[derive(Debug, Clone)]
pub struct FfmpegRasterizer {
    ffmpeg: PathBuf,
    font_file: Option<PathBuf>,
}

impl FfmpegRasterizer {
    pub fn new(ffmpeg: impl Into<PathBuf>, font_file: Option<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            font_file,
        }
    }

    /// One `drawtext` filter; the text itself is read from `text_file`.
    fn drawtext(&self, item: &TextItem, text_file: &Path) -> String {
        let (x, y) = match item.anchor {
            Anchor::TopLeft => (item.x.to_string(), item.y.to_string()),
            Anchor::Center => ("(w-text_w)/2".to_string(), "(h-text_h)/2".to_string()),
        };

        let mut options = Vec::new();
        if let Some(font) = &self.font_file {
            options.push(format!("fontfile={}", quote(&font.to_string_lossy())));
        }
        options.push(format!("textfile={}", quote(&text_file.to_string_lossy())));
        options.push("expansion=none".to_string());
        options.push(format!("fontsize={}", item.font_size));
        options.push(format!("fontcolor={}", item.color));
        options.push(format!("x={}", x));
        options.push(format!("y={}", y));

        format!("drawtext={}", options.join(":"))
    }

    pub(crate) fn filter_graph(&self, layout: &SlideLayout, text_files: &[PathBuf]) -> String {
        let filters: Vec<String> = layout
            .items
            .iter()
            .zip(text_files)
            .map(|(item, file)| self.drawtext(item, file))
            .collect();
        if filters.is_empty() {
            "null".to_string()
        } else {
            filters.join(",")
        }
    }
}

#[async_trait]
impl SlideRasterizer for FfmpegRasterizer {
    async fn rasterize(&self, layout: &SlideLayout, output: &Path) -> Result<(), CompositionError> {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slide".to_string());
        let dir = output.parent().unwrap_or_else(|| Path::new("."));

        let mut text_files = Vec::with_capacity(layout.items.len());
        for (index, item) in layout.items.iter().enumerate() {
            let path = dir.join(format!("{}_text_{}.txt", stem, index));
            tokio::fs::write(&path, &item.text).await?;
            text_files.push(path);
        }

        let source = format!("color=c=white:s={}x{}:d=1", layout.width, layout.height);
        let filters = self.filter_graph(layout, &text_files);
        let output_arg = output.to_string_lossy().into_owned();

        run_ffmpeg(
            &self.ffmpeg,
            [
                "-y",
                "-v",
                "error",
                "-f",
                "lavfi",
                "-i",
                source.as_str(),
                "-vf",
                filters.as_str(),
                "-frames:v",
                "1",
                output_arg.as_str(),
            ],
        )
        .await
        .map_err(|e| CompositionError::Render(format!("{}: {}", output.display(), e)))
    }
}
