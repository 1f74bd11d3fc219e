//! The highlight session
//!
//! [`Highlighter`] owns everything one sentence-plus-word highlight needs
//! across its lifetime: the resolved containers, the memoized sentence
//! offsets, the last computed rectangle lists, and the resize observer that
//! keeps the rectangles fresh while the container changes size.
//!
//! A session follows a fixed flow. `highlight_sentence` drops the previous
//! highlight, resolves the three containers, computes sentence rectangles
//! and publishes them through the custom-property channels, then starts
//! observing the block container. `highlight_word` re-bases word offsets
//! onto the resolved sentence and publishes the word channel alongside.
//! Resize handling is polled: the host calls `notify_resize` when the
//! container may have changed size and `pump` on its own cadence; a ripe
//! pump recomputes both channels from the memoized offsets without running
//! the locator searches again.
//!
//! Failures never escalate. A sentence that cannot be located, a range
//! outside the layout, a missing container: each path simply leaves the
//! document unstyled, and the session stays consistent for the next call.

use std::time::{Duration, Instant};

use crate::debug::runtime::runtime_toggles;
use crate::debug::SessionSnapshot;
use crate::dom::{Document, NodeId, SelectionRange};
use crate::geometry::Rect;
use crate::highlight::observer::{ResizeObserver, DEFAULT_DEBOUNCE};
use crate::highlight::options::HighlightOptions;
use crate::layout::Layout;
use crate::locate::{RangeBoundary, TextLocator, TextOffsets};
use crate::paint::ensure_paint_procedures_registered;
use crate::style::{
  add_paint_layers, clear_channels, remove_paint_layers, write_channel, ComputedStyles,
  HighlightKind,
};

/// Memoized result of the sentence-offset search.
///
/// `Missing` is remembered too: once a lookup fails, later recomputes for
/// the same highlight skip the search instead of consuming further
/// occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SentenceLookup {
  Unresolved,
  Missing,
  Found(TextOffsets),
}

/// One sentence-plus-word highlight over a document.
#[derive(Debug)]
pub struct Highlighter {
  options: HighlightOptions,
  locator: TextLocator,
  observer: ResizeObserver,
  text: String,
  range: Option<SelectionRange>,
  block_container: Option<NodeId>,
  text_node_container: Option<NodeId>,
  text_node_block_container: Option<NodeId>,
  sentence_lookup: SentenceLookup,
  word_offset: Option<TextOffsets>,
  sentence_rects: Option<Vec<Rect>>,
  word_rects: Option<Vec<Rect>>,
}

impl Default for Highlighter {
  fn default() -> Self {
    Self::new(HighlightOptions::default())
  }
}

impl Highlighter {
  /// Creates a session and makes sure the paint procedures are registered.
  ///
  /// The debounce window honors `OVERMARK_DEBOUNCE_MS` when set.
  pub fn new(options: HighlightOptions) -> Self {
    ensure_paint_procedures_registered();
    let debounce = runtime_toggles()
      .debounce_ms()
      .map(Duration::from_millis)
      .unwrap_or(DEFAULT_DEBOUNCE);
    Self {
      options,
      locator: TextLocator::new(),
      observer: ResizeObserver::new(debounce),
      text: String::new(),
      range: None,
      block_container: None,
      text_node_container: None,
      text_node_block_container: None,
      sentence_lookup: SentenceLookup::Unresolved,
      word_offset: None,
      sentence_rects: None,
      word_rects: None,
    }
  }

  /// Highlights `text` near `container`, replacing any previous highlight.
  ///
  /// `container` is a hint, typically the element the selection sits in;
  /// the session walks up to its block ancestor and back down to the
  /// innermost element whose text contains `text`. `range`, when given, is
  /// the originating selection and short-circuits the locator whenever both
  /// endpoints share one text node.
  ///
  /// The block container is observed for resizes from here on, whether or
  /// not the sentence was found.
  pub fn highlight_sentence(
    &mut self,
    doc: &mut Document,
    styles: &ComputedStyles,
    layout: &Layout,
    text: &str,
    container: NodeId,
    range: Option<SelectionRange>,
  ) {
    self.unhighlight(doc);
    self.text = text.trim().to_string();
    self.range = range;

    let block = self.locator.find_parent_block_element(doc, styles, container);
    let text_node_container = self
      .locator
      .find_text_node_container(doc, styles, &self.text, block);
    let text_node_block = self
      .locator
      .find_parent_block_element(doc, styles, text_node_container);
    self.block_container = Some(block);
    self.text_node_container = Some(text_node_container);
    self.text_node_block_container = Some(text_node_block);

    self.sentence_lookup = SentenceLookup::Unresolved;
    self.word_offset = None;

    self.do_highlight_sentence(doc, styles, layout);
    self.observer.observe(text_node_block);
  }

  /// Highlights the word at `[start_index, end_index)` within the current
  /// sentence.
  ///
  /// Offsets are byte offsets relative to the sentence text. Nothing
  /// happens unless the sentence rectangles resolved first.
  pub fn highlight_word(
    &mut self,
    doc: &mut Document,
    styles: &ComputedStyles,
    layout: &Layout,
    start_index: usize,
    end_index: usize,
  ) {
    self.word_offset = Some(TextOffsets::new(start_index, end_index));
    self.do_highlight_word(doc, styles, layout);
  }

  fn do_highlight_sentence(&mut self, doc: &mut Document, styles: &ComputedStyles, layout: &Layout) {
    self.sentence_rects = self.calc_pos(doc, styles, layout, None);
    if let Some(rects) = self.sentence_rects.clone() {
      self.set_container_style(doc, styles, &rects, None);
    }
  }

  fn do_highlight_word(&mut self, doc: &mut Document, styles: &ComputedStyles, layout: &Layout) {
    let Some(word) = self.word_offset else {
      return;
    };
    self.word_rects = self.calc_pos(doc, styles, layout, Some(word));
    if let (Some(word_rects), Some(sentence_rects)) =
      (self.word_rects.clone(), self.sentence_rects.clone())
    {
      self.set_container_style(doc, styles, &sentence_rects, Some(&word_rects));
    }
  }

  /// Computes container-relative, line-height corrected rectangles for the
  /// sentence, or for a word within it when `word_offset` is given.
  ///
  /// Returns None when the endpoints cannot be resolved; an empty list is a
  /// successful resolution whose range happens to produce no rectangles.
  fn calc_pos(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    layout: &Layout,
    word_offset: Option<TextOffsets>,
  ) -> Option<Vec<Rect>> {
    let block = self.text_node_block_container?;
    let text_node_container = self.text_node_container?;
    let (start, end) = self.resolve_boundaries(doc, styles, text_node_container, word_offset)?;

    let block_rect = layout.border_box(block)?;
    let rects = layout.client_rects(start.node, start.offset, end.node, end.offset);
    let line_height = styles.get(text_node_container).line_height_px();

    let mut positions = Vec::with_capacity(rects.len());
    for rect in rects {
      let mut x = rect.x() - block_rect.x();
      let mut y = rect.y() - block_rect.y();
      let mut width = rect.width();
      let mut height = rect.height();
      // Positive when the rect is shorter than the line, negative when a
      // taller-than-line fragment (inline image, large font) leaks through.
      let offset = line_height - rect.height();

      if offset < 0.0 {
        height = line_height - 4.0;
        y += (rect.height() - height) / 2.0;
      }
      if x < 0.0 {
        x = 0.0;
      }
      if y < 0.0 {
        y = 0.0;
      }
      if x > 0.0 {
        x -= 3.0;
        width += 6.0;
      }
      if y > 0.0 && offset > 4.0 {
        y -= 1.0;
        height += 2.0;
      }
      positions.push(Rect::from_xywh(x, y, width, height));
    }
    Some(positions)
  }

  /// Resolves the range endpoints for the current sentence or word.
  ///
  /// The caller-supplied selection is trusted only when both endpoints sit
  /// in the same text node; word offsets are then re-based onto the
  /// selection start. Everything else goes through the locator.
  fn resolve_boundaries(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    text_node_container: NodeId,
    word_offset: Option<TextOffsets>,
  ) -> Option<(RangeBoundary, RangeBoundary)> {
    if let Some(range) = &self.range {
      if range.is_within_one_node() && doc.is_text(range.start_node) {
        let mut start = RangeBoundary {
          node: range.start_node,
          offset: range.start_offset,
        };
        let mut end = RangeBoundary {
          node: range.end_node,
          offset: range.end_offset,
        };
        if let Some(word) = word_offset {
          end.offset = start.offset + word.end_index;
          start.offset += word.start_index;
        }
        return Some((start, end));
      }
    }

    let sentence = self.memoized_sentence_offset(doc, styles, text_node_container)?;
    self
      .locator
      .find_range_text_nodes(doc, styles, text_node_container, sentence, word_offset)
  }

  fn memoized_sentence_offset(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    container: NodeId,
  ) -> Option<TextOffsets> {
    match self.sentence_lookup {
      SentenceLookup::Found(offsets) => Some(offsets),
      SentenceLookup::Missing => None,
      SentenceLookup::Unresolved => {
        let result = self
          .locator
          .sentence_offset(doc, styles, &self.text, container);
        self.sentence_lookup = match result {
          Some(offsets) => SentenceLookup::Found(offsets),
          None => SentenceLookup::Missing,
        };
        result
      }
    }
  }

  /// Publishes rectangle lists through the custom-property channels on the
  /// block container and makes sure the paint layers are attached.
  fn set_container_style(
    &self,
    doc: &mut Document,
    styles: &ComputedStyles,
    sentence_rects: &[Rect],
    word_rects: Option<&[Rect]>,
  ) {
    let (Some(block), Some(text_node_container)) =
      (self.text_node_block_container, self.text_node_container)
    else {
      return;
    };

    add_paint_layers(doc, block);

    // Dark text gets the higher-alpha variants so the wash stays visible.
    let is_dark = styles.get(text_node_container).color.is_dark();
    let sentence_color = if is_dark {
      self.options.sentence_dark_color
    } else {
      self.options.sentence_color
    };
    write_channel(
      doc,
      block,
      HighlightKind::Sentence,
      sentence_rects,
      sentence_color,
      self.options.sentence_radius,
    );

    if let Some(word) = word_rects {
      let word_color = if is_dark {
        self.options.word_dark_color
      } else {
        self.options.word_color
      };
      write_channel(
        doc,
        block,
        HighlightKind::Word,
        word,
        word_color,
        self.options.word_radius,
      );
    }
  }

  /// Strips the paint layers and channel properties from the current block
  /// container. Session state is left alone; starting the next highlight
  /// replaces it wholesale.
  pub fn unhighlight(&self, doc: &mut Document) {
    if let Some(container) = self.text_node_block_container {
      remove_paint_layers(doc, container);
      clear_channels(doc, container);
    }
  }

  /// Stops observing, removes the highlight, and forgets consumed
  /// occurrences.
  pub fn clear(&mut self, doc: &mut Document) {
    self.observer.disconnect();
    self.unhighlight(doc);
    self.locator.clear();
  }

  /// Forgets consumed occurrences without touching the document.
  ///
  /// After document churn invalidates earlier matches, this lets the same
  /// sentences be located again from their first occurrence.
  pub fn rewind(&mut self) {
    self.locator.clear();
  }

  /// Records that the observed container may have changed size at `now`.
  pub fn notify_resize(&mut self, now: Instant) {
    self.observer.notify(now);
  }

  /// Recomputes both channels when a debounced resize notification is ripe.
  ///
  /// Returns true when a recompute ran. The first ripe pump after
  /// `highlight_sentence` is the initial observation and is a no-op.
  pub fn pump(
    &mut self,
    doc: &mut Document,
    styles: &ComputedStyles,
    layout: &Layout,
    now: Instant,
  ) -> bool {
    if !self.observer.poll(now) {
      return false;
    }
    self.do_highlight_sentence(doc, styles, layout);
    self.do_highlight_word(doc, styles, layout);
    if runtime_toggles().hl_trace() {
      eprintln!(
        "[hl-trace] resize recompute: sentence_rects={} word_rects={}",
        self.sentence_rects.as_ref().map_or(0, Vec::len),
        self.word_rects.as_ref().map_or(0, Vec::len),
      );
    }
    true
  }

  /// Captures the session state for debug output.
  pub fn snapshot(&self) -> SessionSnapshot {
    SessionSnapshot {
      text: self.text.clone(),
      block_container: self.block_container,
      text_node_container: self.text_node_container,
      text_node_block_container: self.text_node_block_container,
      sentence_offset: match self.sentence_lookup {
        SentenceLookup::Found(offsets) => Some(offsets.into()),
        _ => None,
      },
      word_offset: self.word_offset.map(Into::into),
      sentence_rects: self
        .sentence_rects
        .as_ref()
        .map(|rects| rects.iter().copied().map(Into::into).collect()),
      word_rects: self
        .word_rects
        .as_ref()
        .map(|rects| rects.iter().copied().map(Into::into).collect()),
    }
  }

  pub fn options(&self) -> &HighlightOptions {
    &self.options
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn block_container(&self) -> Option<NodeId> {
    self.block_container
  }

  pub fn text_node_container(&self) -> Option<NodeId> {
    self.text_node_container
  }

  pub fn text_node_block_container(&self) -> Option<NodeId> {
    self.text_node_block_container
  }

  /// Rectangles published on the sentence channel, container-relative.
  pub fn sentence_rects(&self) -> Option<&[Rect]> {
    self.sentence_rects.as_deref()
  }

  /// Rectangles published on the word channel, container-relative.
  pub fn word_rects(&self) -> Option<&[Rect]> {
    self.word_rects.as_deref()
  }

  pub fn observer(&self) -> &ResizeObserver {
    &self.observer
  }
}
