use serde::{Deserialize, Serialize};

use crate::errors::UnsupportedInputError;

/// Opaque reference to an image embedded in a slide.
pub type ImageRef = String;

/// A single slide as produced by content extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based position in the deck
    pub number: u32,
    pub text: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// Ordered slides plus the text the script prompt is built from.
///
/// `combined_text` is derived from `slides` and is rebuilt on every mutation,
/// so it is only reachable through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSlideContent")]
pub struct SlideContent {
    slides: Vec<Slide>,
    combined_text: String,
}

#[derive(Deserialize)]
struct RawSlideContent {
    #[serde(default)]
    slides: Vec<Slide>,
}

impl TryFrom<RawSlideContent> for SlideContent {
    type Error = UnsupportedInputError;

    fn try_from(raw: RawSlideContent) -> Result<Self, Self::Error> {
        SlideContent::from_slides(raw.slides)
    }
}

impl SlideContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build content from slide texts, numbering them from 1.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut content = Self::new();
        for text in texts {
            content.push_slide(text, Vec::new());
        }
        content
    }

    /// Build content from already numbered slides.
    ///
    /// Numbers must start at 1 or above and strictly increase.
    pub fn from_slides(slides: Vec<Slide>) -> Result<Self, UnsupportedInputError> {
        let mut previous = 0;
        for slide in &slides {
            if slide.number <= previous {
                return Err(UnsupportedInputError::Malformed(format!(
                    "slide number {} follows {}",
                    slide.number, previous
                )));
            }
            previous = slide.number;
        }

        let combined_text = combine_slide_text(&slides);
        Ok(Self {
            slides,
            combined_text,
        })
    }

    /// Append a slide and return its number.
    pub fn push_slide(&mut self, text: impl Into<String>, images: Vec<ImageRef>) -> u32 {
        let number = self.slides.last().map_or(1, |s| s.number + 1);
        self.slides.push(Slide {
            number,
            text: text.into(),
            images,
        });
        self.combined_text = combine_slide_text(&self.slides);
        number
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn combined_text(&self) -> &str {
        &self.combined_text
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

fn combine_slide_text(slides: &[Slide]) -> String {
    slides
        .iter()
        .filter(|slide| !slide.text.trim().is_empty())
        .map(|slide| format!("Slide {}: {}", slide.number, slide.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
