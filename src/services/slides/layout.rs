//! Deterministic text layout for slide frames
//!
//! Layout is pure: it turns slide text into positioned [`TextItem`]s and never
//! touches the filesystem. Rasterization happens separately.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPTION: &str = "Generated Presentation";

/// Frame geometry and text thresholds, in pixels and characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    pub margin_x: u32,
    /// Cursor start
    pub top: u32,
    /// Rendering stops once the cursor passes `height - bottom_margin`
    pub bottom_margin: u32,
    /// First line is a title when shorter than this
    pub title_max_chars: usize,
    /// Lines longer than this are word-wrapped
    pub wrap_chars: usize,
    /// Source lines considered per slide
    pub max_lines: usize,
    pub title_font_size: u32,
    pub body_font_size: u32,
    pub title_advance: u32,
    pub body_advance: u32,
    /// Slide stamp sits at `(width - stamp_offset_x, height - stamp_offset_y)`
    pub stamp_offset_x: u32,
    pub stamp_offset_y: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            margin_x: 100,
            top: 200,
            bottom_margin: 100,
            title_max_chars: 50,
            wrap_chars: 80,
            max_lines: 10,
            title_font_size: 72,
            body_font_size: 48,
            title_advance: 100,
            body_advance: 60,
            stamp_offset_x: 200,
            stamp_offset_y: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Body,
    Stamp,
    Caption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// (x, y) is the top-left corner of the text box
    TopLeft,
    /// Text box is centred on the frame; x and y hold the frame centre
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub font_size: u32,
    pub color: &'static str,
    pub role: TextRole,
    pub anchor: Anchor,
}

impl TextItem {
    fn at(text: impl Into<String>, x: u32, y: u32, font_size: u32, role: TextRole) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
            color: if role == TextRole::Stamp { "gray" } else { "black" },
            role,
            anchor: Anchor::TopLeft,
        }
    }
}

/// Everything drawn on one white frame
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub width: u32,
    pub height: u32,
    pub items: Vec<TextItem>,
}

/// Lay out one slide. `position` is the 1-based place in the deck.
pub fn layout_slide(text: &str, position: usize, config: &LayoutConfig) -> SlideLayout {
    let mut items = Vec::new();
    let mut y = config.top;
    let limit = config.height.saturating_sub(config.bottom_margin);

    for (index, line) in text.split('\n').take(config.max_lines).enumerate() {
        let length = line.chars().count();

        if index == 0 && length < config.title_max_chars {
            push_line(&mut items, line, config.margin_x, y, config.title_font_size, TextRole::Title);
            y += config.title_advance;
        } else if length > config.wrap_chars {
            for wrapped in wrap_words(line, config.wrap_chars) {
                push_line(&mut items, &wrapped, config.margin_x, y, config.body_font_size, TextRole::Body);
                y += config.body_advance;
            }
        } else {
            push_line(&mut items, line, config.margin_x, y, config.body_font_size, TextRole::Body);
            y += config.body_advance;
        }

        if y > limit {
            break;
        }
    }

    items.push(TextItem::at(
        format!("Slide {}", position),
        config.width.saturating_sub(config.stamp_offset_x),
        config.height.saturating_sub(config.stamp_offset_y),
        config.body_font_size,
        TextRole::Stamp,
    ));

    SlideLayout {
        width: config.width,
        height: config.height,
        items,
    }
}

// Blank lines keep their vertical space but draw nothing
fn push_line(items: &mut Vec<TextItem>, line: &str, x: u32, y: u32, size: u32, role: TextRole) {
    if !line.trim().is_empty() {
        items.push(TextItem::at(line, x, y, size, role));
    }
}

/// Frame shown when a deck has no slides.
pub fn default_layout(config: &LayoutConfig) -> SlideLayout {
    SlideLayout {
        width: config.width,
        height: config.height,
        items: vec![TextItem {
            text: DEFAULT_CAPTION.to_string(),
            x: config.width / 2,
            y: config.height / 2,
            font_size: config.title_font_size,
            color: "black",
            role: TextRole::Caption,
            anchor: Anchor::Center,
        }],
    }
}

/// Greedy word wrap: a word joins the current line while the line plus the
/// word stays shorter than `limit` characters. Yields an empty first line when
/// the first word alone reaches `limit`.
pub fn wrap_words(line: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    // accumulates "word " pieces, trailing space included
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.chars().count() + word.chars().count() < limit {
            current.push_str(word);
            current.push(' ');
        } else {
            lines.push(current.trim().to_string());
            current = format!("{} ", word);
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        lines.push(last.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(layout: &SlideLayout, role: TextRole) -> Vec<&str> {
        layout
            .items
            .iter()
            .filter(|i| i.role == role)
            .map(|i| i.text.as_str())
            .collect()
    }

    #[test]
    fn test_title_and_body() {
        let layout = layout_slide("Why Rust\nMemory safety\nFearless concurrency", 1, &LayoutConfig::default());

        let title = &layout.items[0];
        assert_eq!(title.role, TextRole::Title);
        assert_eq!((title.x, title.y, title.font_size), (100, 200, 72));

        assert_eq!(texts(&layout, TextRole::Body), vec!["Memory safety", "Fearless concurrency"]);
        assert_eq!(layout.items[1].y, 300);
        assert_eq!(layout.items[2].y, 360);
        assert_eq!(layout.items[2].font_size, 48);
    }

    #[test]
    fn test_long_first_line_is_body() {
        let first = "x".repeat(50);
        let layout = layout_slide(&first, 1, &LayoutConfig::default());
        assert!(texts(&layout, TextRole::Title).is_empty());
        assert_eq!(texts(&layout, TextRole::Body), vec![first.as_str()]);
    }

    #[test]
    fn test_stamp_position() {
        let layout = layout_slide("Title", 7, &LayoutConfig::default());
        let stamp = layout.items.last().unwrap();
        assert_eq!(stamp.text, "Slide 7");
        assert_eq!((stamp.x, stamp.y), (1720, 980));
        assert_eq!(stamp.color, "gray");
    }

    #[test]
    fn test_only_first_ten_lines() {
        let text = (0..15).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let layout = layout_slide(&text, 1, &LayoutConfig::default());
        // title + 9 body lines, y reaches 200 + 100 + 9*60 = 840
        assert_eq!(texts(&layout, TextRole::Title), vec!["line 0"]);
        assert_eq!(texts(&layout, TextRole::Body).len(), 9);
        assert_eq!(texts(&layout, TextRole::Body).last(), Some(&"line 9"));
    }

    #[test]
    fn test_overflow_stops_after_source_line() {
        let long = vec!["word"; 150].join(" ");
        let text = format!("Title\n{}\n{}\nnever drawn", long, long);
        let layout = layout_slide(&text, 1, &LayoutConfig::default());

        let body = texts(&layout, TextRole::Body);
        assert!(!body.contains(&"never drawn"));
        let max_y = layout
            .items
            .iter()
            .filter(|i| i.role == TextRole::Body)
            .map(|i| i.y)
            .max()
            .unwrap();
        // the second long line starts above the limit and finishes below it
        assert!(max_y > 980 - 60);
    }

    #[test]
    fn test_wrap_words_rule() {
        let line = vec!["abcdefghi"; 20].join(" ");
        let wrapped = wrap_words(&line, 80);
        // 8 words give a 79-char line plus its trailing space
        assert_eq!(wrapped[0].chars().count(), 79);
        assert!(wrapped.iter().all(|l| l.chars().count() < 80));
        assert_eq!(wrapped.join(" "), line);
    }

    #[test]
    fn test_wrap_oversized_leading_word_keeps_empty_row() {
        let giant = "y".repeat(120);
        let wrapped = wrap_words(&format!("{} tail", giant), 80);
        assert_eq!(wrapped, vec![String::new(), giant, "tail".to_string()]);
    }

    #[test]
    fn test_oversized_word_shifts_following_rows() {
        let giant = "y".repeat(120);
        let layout = layout_slide(&format!("Title\n{} tail", giant), 1, &LayoutConfig::default());
        let body: Vec<(&str, u32)> = layout
            .items
            .iter()
            .filter(|i| i.role == TextRole::Body)
            .map(|i| (i.text.as_str(), i.y))
            .collect();
        // the empty row at y=300 is not drawn
        assert_eq!(body, vec![(giant.as_str(), 360), ("tail", 420)]);
    }

    #[test]
    fn test_blank_lines_advance_but_draw_nothing() {
        let layout = layout_slide("Title\n\nAfter gap", 1, &LayoutConfig::default());
        let body: Vec<&TextItem> = layout.items.iter().filter(|i| i.role == TextRole::Body).collect();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].y, 360);
    }

    #[test]
    fn test_default_layout_is_centred() {
        let layout = default_layout(&LayoutConfig::default());
        assert_eq!(layout.items.len(), 1);
        let caption = &layout.items[0];
        assert_eq!(caption.text, "Generated Presentation");
        assert_eq!(caption.anchor, Anchor::Center);
        assert_eq!((caption.x, caption.y), (960, 540));
    }
}
