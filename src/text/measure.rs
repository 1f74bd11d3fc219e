//! Text measurement abstraction
//!
//! Layout does not shape real fonts; it measures text through the
//! [`TextMeasure`] trait so callers can supply whatever metrics they want.
//! The default implementation assigns every character a fixed advance of half
//! the font size, which keeps line wrapping and highlight rectangles fully
//! deterministic: a 16px paragraph advances 8px per character, so a given
//! document and viewport width always produce the same line boxes.

/// Source of horizontal text metrics for layout.
pub trait TextMeasure {
  /// Advance width of a single character at the given font size, in pixels.
  fn char_advance(&self, ch: char, font_size: f32) -> f32;

  /// Total advance of `text` at the given font size.
  fn text_width(&self, text: &str, font_size: f32) -> f32 {
    text
      .chars()
      .map(|ch| self.char_advance(ch, font_size))
      .sum()
  }
}

/// Deterministic metrics: every character advances by a fixed fraction of the
/// font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
  em_fraction: f32,
}

impl FixedAdvanceMetrics {
  /// Default advance as a fraction of font size (half an em per character).
  pub const DEFAULT_EM_FRACTION: f32 = 0.5;

  /// Creates metrics advancing `em_fraction × font_size` per character.
  pub fn new(em_fraction: f32) -> Self {
    Self { em_fraction }
  }
}

impl Default for FixedAdvanceMetrics {
  fn default() -> Self {
    Self::new(Self::DEFAULT_EM_FRACTION)
  }
}

impl TextMeasure for FixedAdvanceMetrics {
  fn char_advance(&self, _ch: char, font_size: f32) -> f32 {
    font_size * self.em_fraction
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_advance_is_half_em() {
    let metrics = FixedAdvanceMetrics::default();
    assert_eq!(metrics.char_advance('a', 16.0), 8.0);
    assert_eq!(metrics.char_advance('M', 20.0), 10.0);
  }

  #[test]
  fn test_text_width_sums_advances() {
    let metrics = FixedAdvanceMetrics::default();
    assert_eq!(metrics.text_width("Hello", 16.0), 40.0);
    assert_eq!(metrics.text_width("", 16.0), 0.0);
  }

  #[test]
  fn test_custom_fraction() {
    let metrics = FixedAdvanceMetrics::new(0.6);
    assert_eq!(metrics.char_advance('x', 10.0), 6.0);
  }

  #[test]
  fn test_multibyte_chars_count_once() {
    let metrics = FixedAdvanceMetrics::default();
    // 4 characters, not 12 bytes.
    assert_eq!(metrics.text_width("你好世界", 16.0), 32.0);
  }
}
