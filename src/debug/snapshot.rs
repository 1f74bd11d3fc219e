//! Session state snapshots
//!
//! Serializable views of a highlight session's resolved state, flattened to
//! plain types for logging and test assertions.

use serde::Serialize;

use crate::geometry::Rect;
use crate::locate::TextOffsets;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RectSnapshot {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl From<Rect> for RectSnapshot {
  fn from(rect: Rect) -> Self {
    Self {
      x: rect.x(),
      y: rect.y(),
      width: rect.width(),
      height: rect.height(),
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct OffsetsSnapshot {
  pub start_index: usize,
  pub end_index: usize,
}

impl From<TextOffsets> for OffsetsSnapshot {
  fn from(offsets: TextOffsets) -> Self {
    Self {
      start_index: offsets.start_index,
      end_index: offsets.end_index,
    }
  }
}

/// Everything a session has resolved for the current sentence, in one
/// serializable record. Unresolved fields stay `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
  pub text: String,
  pub block_container: Option<usize>,
  pub text_node_container: Option<usize>,
  pub text_node_block_container: Option<usize>,
  pub sentence_offset: Option<OffsetsSnapshot>,
  pub word_offset: Option<OffsetsSnapshot>,
  pub sentence_rects: Option<Vec<RectSnapshot>>,
  pub word_rects: Option<Vec<RectSnapshot>>,
}

/// Renders a snapshot as a JSON value, `null` on serialization failure.
pub fn session_snapshot_json(snapshot: &SessionSnapshot) -> serde_json::Value {
  serde_json::to_value(snapshot).unwrap_or(serde_json::Value::Null)
}
