//! Layout engine producing block rectangles and wrapped line boxes
//!
//! Layout runs in one pass over the element tree:
//!
//! 1. Block-level elements stack vertically; each receives the containing
//!    width unless its computed `width` narrows it.
//! 2. Consecutive inline-level children of a block are grouped into an
//!    anonymous run and laid out as a [`Paragraph`]: the run's rendered text
//!    is wrapped greedily at UAX #14 break opportunities, every line box
//!    taking the block's line-height as its height.
//! 3. Character advances come from the injected [`TextMeasure`], resolved at
//!    the block's font size, and are recorded per paragraph so range queries
//!    need no re-measurement.
//!
//! `display: none` subtrees produce no geometry at all.

use rustc_hash::FxHashMap;

use crate::dom::{Document, NodeId};
use crate::error::{LayoutError, Result};
use crate::geometry::{Point, Rect};
use crate::style::ComputedStyles;
use crate::text::line_break::find_break_opportunities;
use crate::text::{RenderedText, TextMeasure};

/// One wrapped line of a paragraph, as a byte range of its rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBox {
  pub start: usize,
  pub end: usize,
}

/// A run of inline content laid out as wrapped lines.
#[derive(Debug, Clone)]
pub struct Paragraph {
  /// Block element the run belongs to.
  pub block: NodeId,
  /// Top-left corner in viewport coordinates.
  pub origin: Point,
  /// Width available for wrapping.
  pub width: f32,
  /// Height of every line box.
  pub line_height: f32,
  /// Rendered text of the run with provenance.
  pub rendered: RenderedText,
  /// Lines in top-to-bottom order, covering the rendered text exactly.
  pub lines: Vec<LineBox>,
  // Cumulative advance at every rendered char boundary, including the end.
  advances: Vec<(usize, f32)>,
}

impl Paragraph {
  pub fn height(&self) -> f32 {
    self.lines.len() as f32 * self.line_height
  }

  /// Cumulative advance from the start of the rendered text to `byte_offset`.
  ///
  /// Snaps to the previous char boundary if the offset falls inside a
  /// character.
  pub fn advance_at(&self, byte_offset: usize) -> f32 {
    match self
      .advances
      .binary_search_by(|(boundary, _)| boundary.cmp(&byte_offset))
    {
      Ok(i) => self.advances[i].1,
      Err(i) => self.advances[i.saturating_sub(1)].1,
    }
  }
}

/// Positioned geometry of a document at a fixed viewport width.
#[derive(Debug, Clone)]
pub struct Layout {
  viewport_width: f32,
  content_height: f32,
  blocks: FxHashMap<NodeId, Rect>,
  paragraphs: Vec<Paragraph>,
  // Text node -> index into `paragraphs`.
  node_to_paragraph: FxHashMap<NodeId, usize>,
}

impl Layout {
  /// Lays out the document body at the given viewport width.
  ///
  /// # Errors
  ///
  /// Returns [`LayoutError::InvalidConstraints`] when the viewport width is
  /// not a positive finite number.
  pub fn compute(
    doc: &Document,
    styles: &ComputedStyles,
    viewport_width: f32,
    measure: &dyn TextMeasure,
  ) -> Result<Layout> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
      return Err(
        LayoutError::InvalidConstraints {
          message: format!("viewport width must be positive, got {viewport_width}"),
        }
        .into(),
      );
    }
    let mut layout = Layout {
      viewport_width,
      content_height: 0.0,
      blocks: FxHashMap::default(),
      paragraphs: Vec::new(),
      node_to_paragraph: FxHashMap::default(),
    };
    if let Some(body) = doc.body() {
      layout.content_height = layout.layout_block(doc, styles, body, 0.0, viewport_width, measure);
    }
    Ok(layout)
  }

  pub fn viewport_width(&self) -> f32 {
    self.viewport_width
  }

  /// Height of the laid-out content, from the top of the body to the bottom
  /// of the last line.
  pub fn content_height(&self) -> f32 {
    self.content_height
  }

  /// Border box of a block-level element in viewport coordinates.
  ///
  /// Inline elements and elements outside the flow have no box.
  pub fn border_box(&self, node: NodeId) -> Option<Rect> {
    self.blocks.get(&node).copied()
  }

  pub fn paragraphs(&self) -> &[Paragraph] {
    &self.paragraphs
  }

  /// The paragraph a text node was laid out in, if any.
  pub fn paragraph_for_node(&self, node: NodeId) -> Option<&Paragraph> {
    self
      .node_to_paragraph
      .get(&node)
      .map(|&i| &self.paragraphs[i])
  }

  /// Decomposes a text range into one rectangle per line it touches, in
  /// viewport coordinates, top to bottom.
  ///
  /// Offsets are byte offsets into the raw content of the given text nodes.
  /// Returns an empty list when either endpoint has no rendered position or
  /// the endpoints resolve to different paragraphs.
  pub fn client_rects(
    &self,
    start_node: NodeId,
    start_offset: usize,
    end_node: NodeId,
    end_offset: usize,
  ) -> Vec<Rect> {
    let Some(&start_para) = self.node_to_paragraph.get(&start_node) else {
      return Vec::new();
    };
    let Some(&end_para) = self.node_to_paragraph.get(&end_node) else {
      return Vec::new();
    };
    if start_para != end_para {
      return Vec::new();
    }
    let para = &self.paragraphs[start_para];
    let Some(range_start) = para.rendered.rendered_offset(start_node, start_offset) else {
      return Vec::new();
    };
    let Some(range_end) = para.rendered.rendered_offset(end_node, end_offset) else {
      return Vec::new();
    };
    if range_end <= range_start {
      return Vec::new();
    }
    let mut rects = Vec::new();
    for (i, line) in para.lines.iter().enumerate() {
      let seg_start = range_start.max(line.start);
      let seg_end = range_end.min(line.end);
      if seg_start >= seg_end {
        continue;
      }
      let x = para.origin.x + para.advance_at(seg_start) - para.advance_at(line.start);
      let y = para.origin.y + i as f32 * para.line_height;
      let width = para.advance_at(seg_end) - para.advance_at(seg_start);
      rects.push(Rect::from_xywh(x, y, width, para.line_height));
    }
    rects
  }

  // Lays out one block-level element at vertical position `y` and returns its
  // height.
  fn layout_block(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    node: NodeId,
    y: f32,
    available_width: f32,
    measure: &dyn TextMeasure,
  ) -> f32 {
    let style = styles.get(node);
    let width = style.width.unwrap_or(available_width);
    let mut cursor = y;
    let mut inline_run: Vec<NodeId> = Vec::new();
    for &child in doc.children(node) {
      let child_display = styles.get(child).display;
      let is_block_child = doc.is_element(child) && child_display.is_block_level();
      if is_block_child {
        cursor += self.flush_inline_run(doc, styles, node, &inline_run, cursor, width, measure);
        inline_run.clear();
        cursor += self.layout_block(doc, styles, child, cursor, width, measure);
      } else if doc.is_element(child) && child_display.is_none() {
        continue;
      } else {
        inline_run.push(child);
      }
    }
    cursor += self.flush_inline_run(doc, styles, node, &inline_run, cursor, width, measure);
    let height = cursor - y;
    self.blocks.insert(node, Rect::from_xywh(0.0, y, width, height));
    height
  }

  // Lays out an anonymous inline run inside `block` and returns its height.
  fn flush_inline_run(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    block: NodeId,
    run: &[NodeId],
    y: f32,
    width: f32,
    measure: &dyn TextMeasure,
  ) -> f32 {
    if run.is_empty() {
      return 0.0;
    }
    let rendered = RenderedText::build_run(doc, styles, run);
    if rendered.is_empty() {
      return 0.0;
    }
    let block_style = styles.get(block);
    let font_size = block_style.font_size;
    let text = rendered.text().to_string();
    let mut advances = Vec::with_capacity(text.len() + 1);
    let mut total = 0.0;
    advances.push((0, 0.0));
    for (offset, ch) in text.char_indices() {
      total += measure.char_advance(ch, font_size);
      advances.push((offset + ch.len_utf8(), total));
    }
    let lines = wrap_lines(&text, &advances, width);
    let index = self.paragraphs.len();
    for entry in rendered.provenance() {
      self.node_to_paragraph.insert(entry.node, index);
    }
    let paragraph = Paragraph {
      block,
      origin: Point::new(0.0, y),
      width,
      line_height: block_style.line_height_px(),
      rendered,
      lines,
      advances,
    };
    let height = paragraph.height();
    self.paragraphs.push(paragraph);
    height
  }
}

// Greedy wrap: segments between break opportunities are appended to the
// current line while they fit; the first segment of a line always stays even
// when it overflows.
fn wrap_lines(text: &str, advances: &[(usize, f32)], width: f32) -> Vec<LineBox> {
  if text.is_empty() {
    return Vec::new();
  }
  let advance_at = |byte: usize| -> f32 {
    match advances.binary_search_by(|(boundary, _)| boundary.cmp(&byte)) {
      Ok(i) => advances[i].1,
      Err(i) => advances[i.saturating_sub(1)].1,
    }
  };
  let mut lines = Vec::new();
  let mut line_start = 0;
  let mut prev_break = 0;
  for brk in find_break_opportunities(text) {
    let seg_end = brk.byte_offset;
    if seg_end == line_start {
      prev_break = seg_end;
      continue;
    }
    let line_width = advance_at(seg_end) - advance_at(line_start);
    if line_width > width && prev_break > line_start {
      lines.push(LineBox {
        start: line_start,
        end: prev_break,
      });
      line_start = prev_break;
    }
    if brk.is_mandatory() {
      lines.push(LineBox {
        start: line_start,
        end: seg_end,
      });
      line_start = seg_end;
    }
    prev_break = seg_end;
  }
  if line_start < text.len() {
    lines.push(LineBox {
      start: line_start,
      end: text.len(),
    });
  }
  lines
}
