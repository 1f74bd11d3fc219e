//! Highlight appearance options
//!
//! Colors come in light and dark variants per channel; the session picks the
//! dark variant when the highlighted text itself is dark, so the overlay stays
//! visible against the text it sits behind. Radii are corner radii in pixels,
//! forwarded to the paint procedures through the radius properties.

use crate::error::{Result, StyleError};
use crate::style::Rgba;

/// Default sentence fill, a faint violet wash.
pub const DEFAULT_SENTENCE_COLOR: Rgba = Rgba::new(122, 89, 255, 0.08);
/// Sentence fill used over dark text.
pub const DEFAULT_SENTENCE_DARK_COLOR: Rgba = Rgba::new(122, 89, 255, 0.16);
/// Default word fill, twice the sentence alpha.
pub const DEFAULT_WORD_COLOR: Rgba = Rgba::new(122, 89, 255, 0.16);
/// Word fill used over dark text.
pub const DEFAULT_WORD_DARK_COLOR: Rgba = Rgba::new(122, 89, 255, 0.32);
/// Default corner radius for both channels, in pixels.
pub const DEFAULT_HIGHLIGHT_RADIUS: f32 = 6.0;

/// Appearance of the two highlight channels.
///
/// The defaults reproduce the stock look; individual fields can be replaced
/// either directly or by parsing CSS color strings through the setters.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightOptions {
  pub sentence_color: Rgba,
  pub sentence_dark_color: Rgba,
  pub sentence_radius: f32,
  pub word_color: Rgba,
  pub word_dark_color: Rgba,
  pub word_radius: f32,
}

impl Default for HighlightOptions {
  fn default() -> Self {
    Self {
      sentence_color: DEFAULT_SENTENCE_COLOR,
      sentence_dark_color: DEFAULT_SENTENCE_DARK_COLOR,
      sentence_radius: DEFAULT_HIGHLIGHT_RADIUS,
      word_color: DEFAULT_WORD_COLOR,
      word_dark_color: DEFAULT_WORD_DARK_COLOR,
      word_radius: DEFAULT_HIGHLIGHT_RADIUS,
    }
  }
}

impl HighlightOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the sentence fill from a CSS color string.
  ///
  /// # Errors
  ///
  /// Returns [`StyleError::InvalidColor`] when the value does not parse.
  pub fn set_sentence_color(&mut self, value: &str) -> Result<()> {
    self.sentence_color = parse_color(value)?;
    Ok(())
  }

  /// Sets the sentence fill used over dark text from a CSS color string.
  pub fn set_sentence_dark_color(&mut self, value: &str) -> Result<()> {
    self.sentence_dark_color = parse_color(value)?;
    Ok(())
  }

  /// Sets the word fill from a CSS color string.
  pub fn set_word_color(&mut self, value: &str) -> Result<()> {
    self.word_color = parse_color(value)?;
    Ok(())
  }

  /// Sets the word fill used over dark text from a CSS color string.
  pub fn set_word_dark_color(&mut self, value: &str) -> Result<()> {
    self.word_dark_color = parse_color(value)?;
    Ok(())
  }
}

fn parse_color(value: &str) -> Result<Rgba> {
  Rgba::parse(value).map_err(|_| {
    StyleError::InvalidColor {
      value: value.to_string(),
    }
    .into()
  })
}
