//! The highlight custom-property schema
//!
//! Highlight geometry travels from the measuring side to the painting side
//! through a fixed set of custom properties on the block container's inline
//! style, mirroring how a paint worklet receives its inputs:
//!
//! - `--highlightWordPos` / `--highlightSentencePos`: a flat comma-joined
//!   list of numbers, four per rectangle (`x,y,w,h,...`), in pixels relative
//!   to the container's border box
//! - `--highlightWordColor` / `--highlightSentenceColor`: a CSS color
//! - `--highlightWordRadius` / `--highlightSentenceRadius`: a bare number
//!
//! The container's `background-image` additionally gains the two layers
//! `paint(highlightWord),paint(highlightSentence)`, prepended exactly once;
//! word is first so it paints on top of sentence.

use crate::dom::{Document, NodeId};
use crate::geometry::Rect;
use crate::style::color::Rgba;

/// The two highlight channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
  Word,
  Sentence,
}

impl HighlightKind {
  /// The paint procedure name (`paint(<name>)` in `background-image`).
  pub fn paint_name(self) -> &'static str {
    match self {
      HighlightKind::Word => "highlightWord",
      HighlightKind::Sentence => "highlightSentence",
    }
  }

  pub fn pos_property(self) -> &'static str {
    match self {
      HighlightKind::Word => "--highlightWordPos",
      HighlightKind::Sentence => "--highlightSentencePos",
    }
  }

  pub fn color_property(self) -> &'static str {
    match self {
      HighlightKind::Word => "--highlightWordColor",
      HighlightKind::Sentence => "--highlightSentenceColor",
    }
  }

  pub fn radius_property(self) -> &'static str {
    match self {
      HighlightKind::Word => "--highlightWordRadius",
      HighlightKind::Sentence => "--highlightSentenceRadius",
    }
  }
}

/// `background-image` layer for the word channel.
pub const PAINT_WORD_LAYER: &str = "paint(highlightWord)";
/// `background-image` layer for the sentence channel.
pub const PAINT_SENTENCE_LAYER: &str = "paint(highlightSentence)";

/// Radius applied when the radius property is missing or unparseable.
pub const DEFAULT_PAINT_RADIUS: f32 = 4.0;

/// Encodes rectangles as the flat `x,y,w,h,...` position list.
///
/// # Examples
///
/// ```
/// use overmark::geometry::Rect;
/// use overmark::style::encode_positions;
///
/// let rects = [Rect::from_xywh(10.0, 20.0, 100.0, 24.0)];
/// assert_eq!(encode_positions(&rects), "10,20,100,24");
/// ```
pub fn encode_positions(rects: &[Rect]) -> String {
  let mut parts = Vec::with_capacity(rects.len() * 4);
  for rect in rects {
    parts.push(format_number(rect.x()));
    parts.push(format_number(rect.y()));
    parts.push(format_number(rect.width()));
    parts.push(format_number(rect.height()));
  }
  parts.join(",")
}

fn format_number(value: f32) -> String {
  format!("{}", value)
}

/// Decodes a position list back into rectangles.
///
/// Returns None when any component fails to parse; a trailing partial
/// group of fewer than four numbers is dropped.
pub fn decode_positions(value: &str) -> Option<Vec<Rect>> {
  let mut numbers = Vec::new();
  for part in value.split(',') {
    numbers.push(part.trim().parse::<f32>().ok()?);
  }
  Some(
    numbers
      .chunks_exact(4)
      .map(|chunk| Rect::from_xywh(chunk[0], chunk[1], chunk[2], chunk[3]))
      .collect(),
  )
}

/// Decodes a radius property value, falling back to the default.
pub fn decode_radius(value: Option<&str>) -> f32 {
  match value {
    Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or(DEFAULT_PAINT_RADIUS),
    _ => DEFAULT_PAINT_RADIUS,
  }
}

/// Everything a paint procedure reads for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInputs {
  pub rects: Vec<Rect>,
  pub color: Option<Rgba>,
  pub radius: f32,
}

/// Writes one channel's properties onto the container.
pub fn write_channel(
  doc: &mut Document,
  container: NodeId,
  kind: HighlightKind,
  rects: &[Rect],
  color: Rgba,
  radius: f32,
) {
  doc.set_style_property(container, kind.pos_property(), &encode_positions(rects));
  doc.set_style_property(container, kind.color_property(), &color.to_string());
  doc.set_style_property(container, kind.radius_property(), &format_number(radius));
}

/// Reads one channel's properties off the container.
///
/// Returns None when the position list is absent or malformed; a missing
/// color leaves `color` as None (the painter skips such channels).
pub fn read_channel(doc: &Document, container: NodeId, kind: HighlightKind) -> Option<ChannelInputs> {
  let pos = doc.style_property(container, kind.pos_property())?;
  let rects = decode_positions(pos)?;
  let color = doc
    .style_property(container, kind.color_property())
    .and_then(|value| Rgba::parse(value).ok());
  let radius = decode_radius(doc.style_property(container, kind.radius_property()));
  Some(ChannelInputs {
    rects,
    color,
    radius,
  })
}

/// Removes all six channel properties from the container.
pub fn clear_channels(doc: &mut Document, container: NodeId) {
  for kind in [HighlightKind::Sentence, HighlightKind::Word] {
    doc.remove_style_property(container, kind.pos_property());
    doc.remove_style_property(container, kind.color_property());
    doc.remove_style_property(container, kind.radius_property());
  }
}

/// Prepends the two paint layers to the container's `background-image`.
///
/// Idempotent: when the sentence layer is already present nothing changes.
/// Pre-existing image layers are preserved after the paint layers.
pub fn add_paint_layers(doc: &mut Document, container: NodeId) {
  let current = doc
    .style_property(container, "background-image")
    .unwrap_or("none")
    .to_string();

  if current.contains(PAINT_SENTENCE_LAYER) {
    return;
  }

  let rest = if current == "none" {
    String::new()
  } else {
    filter_paint_layers(&current)
  };
  let new_value = if rest.is_empty() {
    format!("{},{}", PAINT_WORD_LAYER, PAINT_SENTENCE_LAYER)
  } else {
    format!("{},{},{}", PAINT_WORD_LAYER, PAINT_SENTENCE_LAYER, rest)
  };
  doc.set_style_property(container, "background-image", &new_value);
}

/// Strips the two paint layers from the container's `background-image`.
///
/// When nothing else remains the declaration is removed entirely.
pub fn remove_paint_layers(doc: &mut Document, container: NodeId) {
  let current = doc
    .style_property(container, "background-image")
    .unwrap_or("none")
    .to_string();

  let rest = filter_paint_layers(&current);
  if rest.is_empty() || rest == "none" {
    doc.remove_style_property(container, "background-image");
  } else {
    doc.set_style_property(container, "background-image", &rest);
  }
}

fn filter_paint_layers(value: &str) -> String {
  value
    .split(',')
    .map(str::trim)
    .filter(|layer| *layer != PAINT_WORD_LAYER && *layer != PAINT_SENTENCE_LAYER)
    .collect::<Vec<_>>()
    .join(",")
}
