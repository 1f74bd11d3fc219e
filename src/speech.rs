//! Speech boundary driver
//!
//! Maps word-boundary events from a speech synthesizer onto highlight calls.
//! The driver owns the utterance text and the selection it was read from;
//! each boundary event re-highlights the sentence and moves the word
//! highlight to the spoken word, and the end of speech clears everything.
//!
//! Boundary events carry a char index and length within the utterance. The
//! word offsets handed to the session are made relative to the selection:
//! `relative_start = max(0, char_index − selection_start)` and
//! `relative_end = min(selection_len, relative_start + char_length)`, so
//! events outside the selection clamp to its edges instead of escaping it.

use crate::dom::{Document, NodeId, SelectionRange};
use crate::highlight::Highlighter;
use crate::layout::Layout;
use crate::style::ComputedStyles;

/// Drives a [`Highlighter`] from speech synthesis events.
#[derive(Debug, Clone)]
pub struct SpeechDriver {
  utterance: String,
  range: SelectionRange,
}

impl SpeechDriver {
  /// Creates a driver for one utterance read from `range`.
  pub fn new(utterance: impl Into<String>, range: SelectionRange) -> Self {
    Self {
      utterance: utterance.into(),
      range,
    }
  }

  pub fn utterance(&self) -> &str {
    &self.utterance
  }

  pub fn range(&self) -> SelectionRange {
    self.range
  }

  /// Handles a word-boundary event at `char_index` with `char_length` chars.
  ///
  /// Re-highlights the sentence (passing the originating selection through)
  /// and highlights the word the synthesizer is about to speak.
  pub fn on_boundary(
    &self,
    session: &mut Highlighter,
    doc: &mut Document,
    styles: &ComputedStyles,
    layout: &Layout,
    char_index: usize,
    char_length: usize,
  ) {
    let relative_start = char_index.saturating_sub(self.range.start_offset);
    let selection_len = self.range.end_offset.saturating_sub(self.range.start_offset);
    let relative_end = (relative_start + char_length).min(selection_len);

    let container = self.container_hint(doc);
    session.highlight_sentence(
      doc,
      styles,
      layout,
      self.utterance.trim(),
      container,
      Some(self.range),
    );
    session.highlight_word(doc, styles, layout, relative_start, relative_end);
  }

  /// Speech finished; drop the highlight.
  pub fn on_end(&self, session: &mut Highlighter, doc: &mut Document) {
    session.clear(doc);
  }

  /// Speech failed; drop the highlight.
  pub fn on_error(&self, session: &mut Highlighter, doc: &mut Document) {
    session.clear(doc);
  }

  /// The element the selection sits in: parent of the range's common
  /// ancestor, falling back to the body.
  fn container_hint(&self, doc: &Document) -> NodeId {
    let ancestor = self.range.common_ancestor(doc);
    doc
      .parent(ancestor)
      .filter(|&parent| doc.is_element(parent))
      .unwrap_or_else(|| doc.body().unwrap_or_else(|| doc.root()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::parse_html;
  use crate::geometry::Rect;
  use crate::text::FixedAdvanceMetrics;

  fn setup(html: &str) -> (Document, ComputedStyles, Layout) {
    let doc = parse_html(html).expect("parse");
    let styles = ComputedStyles::resolve(&doc);
    let layout =
      Layout::compute(&doc, &styles, 800.0, &FixedAdvanceMetrics::default()).expect("layout");
    (doc, styles, layout)
  }

  const PAGE: &str = "<body><p style='line-height: 20px'>Hello world. Foo bar.</p></body>";

  #[test]
  fn test_boundary_highlights_sentence_and_word() {
    let (mut doc, styles, layout) = setup(PAGE);
    let p = doc.find_element("p").expect("p");
    let text_node = doc.children(p)[0];

    let range = SelectionRange::new(text_node, 0, text_node, 21);
    let driver = SpeechDriver::new("Hello world. Foo bar.", range);
    let mut session = Highlighter::default();

    // The synthesizer reaches "Foo" at utterance char 13.
    driver.on_boundary(&mut session, &mut doc, &styles, &layout, 13, 3);

    assert_eq!(
      session.sentence_rects().expect("sentence"),
      &[Rect::from_xywh(0.0, 0.0, 168.0, 20.0)]
    );
    assert_eq!(
      session.word_rects().expect("word"),
      &[Rect::from_xywh(101.0, 0.0, 30.0, 20.0)]
    );
    assert_eq!(
      doc.style_property(p, "--highlightWordPos"),
      Some("101,0,30,20")
    );
  }

  #[test]
  fn test_boundary_before_selection_clamps_to_start() {
    let (mut doc, styles, layout) = setup(PAGE);
    let p = doc.find_element("p").expect("p");
    let text_node = doc.children(p)[0];

    let range = SelectionRange::new(text_node, 13, text_node, 21);
    let driver = SpeechDriver::new("Foo bar.", range);
    let mut session = Highlighter::default();

    // char_index 4 is below the selection start offset; the word clamps to
    // the first chars of the selection.
    driver.on_boundary(&mut session, &mut doc, &styles, &layout, 4, 3);
    assert_eq!(
      session.word_rects().expect("word"),
      &[Rect::from_xywh(101.0, 0.0, 30.0, 20.0)]
    );
  }

  #[test]
  fn test_boundary_past_selection_clamps_to_end() {
    let (mut doc, styles, layout) = setup(PAGE);
    let p = doc.find_element("p").expect("p");
    let text_node = doc.children(p)[0];

    let range = SelectionRange::new(text_node, 0, text_node, 21);
    let driver = SpeechDriver::new("Hello world. Foo bar.", range);
    let mut session = Highlighter::default();

    driver.on_boundary(&mut session, &mut doc, &styles, &layout, 17, 40);

    // 17 + 40 overshoots; the word ends at the selection end (byte 21).
    assert_eq!(
      session.word_rects().expect("word"),
      &[Rect::from_xywh(133.0, 0.0, 38.0, 20.0)]
    );
  }

  #[test]
  fn test_container_hint_is_parent_of_common_ancestor() {
    let (doc, _styles, _layout) = setup(PAGE);
    let p = doc.find_element("p").expect("p");
    let text_node = doc.children(p)[0];

    let driver = SpeechDriver::new("x", SelectionRange::new(text_node, 0, text_node, 5));
    assert_eq!(driver.container_hint(&doc), p);
  }

  #[test]
  fn test_end_and_error_clear_the_session() {
    let (mut doc, styles, layout) = setup(PAGE);
    let p = doc.find_element("p").expect("p");
    let text_node = doc.children(p)[0];

    let range = SelectionRange::new(text_node, 0, text_node, 21);
    let driver = SpeechDriver::new("Hello world. Foo bar.", range);
    let mut session = Highlighter::default();

    driver.on_boundary(&mut session, &mut doc, &styles, &layout, 0, 5);
    assert!(doc.style_property(p, "background-image").is_some());

    driver.on_end(&mut session, &mut doc);
    assert_eq!(doc.style_property(p, "background-image"), None);
    assert!(!session.observer().is_observing());
  }
}
