//! Text object content.

use super::Paint;
use serde::{Deserialize, Serialize};

/// Default font family for new text objects.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 32.0;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Content carried by a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// The text itself.
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Fill, stroke and stroke width.
    #[serde(default)]
    pub paint: Paint,
}

impl TextContent {
    /// Create text content with default font settings.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            paint: Paint::default(),
        }
    }

    /// Rough layout size used as the initial object size.
    ///
    /// The surface owns real text metrics; this only gives new objects a
    /// plausible box before the first render.
    pub fn estimated_size(&self) -> (f64, f64) {
        let widest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = self.content.lines().count().max(1);
        (
            widest as f64 * self.font_size * 0.6,
            lines as f64 * self.font_size * 1.2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = TextContent::new("Hello");
        assert_eq!(text.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(text.font_weight, FontWeight::Normal);
        assert!((text.font_size - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimated_size_multiline() {
        let mut text = TextContent::new("ab\nabcd");
        text.font_size = 10.0;
        let (w, h) = text.estimated_size();
        assert!((w - 24.0).abs() < 1e-9);
        assert!((h - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_weight_numeric() {
        assert_eq!(FontWeight::Bold.numeric(), 700);
        assert_eq!(FontWeight::Light.numeric(), 300);
        assert_eq!(FontWeight::default().numeric(), 400);
    }
}
