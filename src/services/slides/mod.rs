// Slide rendering services
// Slide text to 1920x1080 frames through a pure layout step and a rasterizer

use std::path::Path;
use std::sync::Arc;

use crate::errors::CompositionError;
use crate::models::{RenderedSlide, SlideContent, VisualTrack};

pub mod layout;
pub mod rasterizer;

pub use layout::{default_layout, layout_slide, wrap_words, LayoutConfig, SlideLayout, TextItem};
pub use rasterizer::{FfmpegRasterizer, SlideRasterizer};

pub struct SlideRenderer {
    config: LayoutConfig,
    rasterizer: Arc<dyn SlideRasterizer>,
}

impl SlideRenderer {
    pub fn new(config: LayoutConfig, rasterizer: Arc<dyn SlideRasterizer>) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Render every slide into `scratch`; an empty deck yields the default frame.
    pub async fn render(
        &self,
        content: &SlideContent,
        scratch: &Path,
    ) -> Result<VisualTrack, CompositionError> {
        if content.is_empty() {
            log::info!("No slides to render, using default frame");
            return Ok(VisualTrack::new(vec![self.render_default(scratch).await?]));
        }

        let mut slides = Vec::with_capacity(content.len());
        for (index, slide) in content.slides().iter().enumerate() {
            let position = index + 1;
            let layout = layout_slide(&slide.text, position, &self.config);
            let image = scratch.join(format!("slide_{}.png", position));

            self.rasterizer.rasterize(&layout, &image).await.map_err(|e| {
                log::error!("Failed to render slide {}: {}", position, e);
                e
            })?;
            slides.push(RenderedSlide {
                number: position as u32,
                image,
            });
        }

        log::info!("Rendered {} slide(s)", slides.len());
        Ok(VisualTrack::new(slides))
    }

    /// Frame captioned "Generated Presentation", used when there is nothing else to show.
    pub async fn render_default(&self, scratch: &Path) -> Result<RenderedSlide, CompositionError> {
        let image = scratch.join("default_slide.png");
        self.rasterizer
            .rasterize(&default_layout(&self.config), &image)
            .await?;
        Ok(RenderedSlide { number: 1, image })
    }
}
