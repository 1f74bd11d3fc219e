//! Paint procedures
//!
//! Named procedures that render an element's highlight layers from its
//! custom-property channels, the engine's stand-in for a CSS paint worklet.
//! A process-wide registry maps `paint(name)` references found in
//! `background-image` to procedures; registration happens when the first
//! highlight session is constructed.
//!
//! `background-image` layers stack first-on-top, so
//! [`paint_element_background`] walks them last-to-first: the sentence wash
//! goes down before the word accent.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::RwLock;

use crate::debug::runtime;
use crate::dom::Document;
use crate::dom::NodeId;
use crate::error::LayoutError;
use crate::error::Result;
use crate::layout::Layout;
use crate::paint::canvas::Canvas;
use crate::style::read_channel;
use crate::style::ChannelInputs;
use crate::style::HighlightKind;

/// A named paint procedure, invoked once per matching `paint(name)` layer.
pub trait PaintProcedure: Send + Sync {
  /// The name this procedure is registered under.
  fn name(&self) -> &'static str;

  /// Draws the layer onto `canvas` from decoded channel inputs.
  fn paint(&self, canvas: &mut Canvas, inputs: &ChannelInputs);
}

/// Paints one highlight channel as a run of rounded rectangles.
///
/// Skips the layer entirely when the color input is missing. The corner
/// radius is clamped per rectangle so thin fragments keep pill-shaped ends
/// instead of self-intersecting corners.
pub struct RoundedRectPainter {
  kind: HighlightKind,
}

impl RoundedRectPainter {
  pub fn new(kind: HighlightKind) -> Self {
    Self { kind }
  }
}

impl PaintProcedure for RoundedRectPainter {
  fn name(&self) -> &'static str {
    self.kind.paint_name()
  }

  fn paint(&self, canvas: &mut Canvas, inputs: &ChannelInputs) {
    let Some(color) = inputs.color else {
      return;
    };
    for &rect in &inputs.rects {
      let mut radius = inputs.radius;
      if rect.width() < 2.0 * radius {
        radius = rect.width() / 2.0;
      }
      if rect.height() < 2.0 * radius {
        radius = rect.height() / 2.0;
      }
      canvas.fill_rounded_rect(rect, radius, color);
    }
  }
}

type Registry = RwLock<Vec<Arc<dyn PaintProcedure>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
  REGISTRY.get_or_init(|| RwLock::new(Vec::new()))
}

/// Registers a paint procedure. Names are unique; re-registering an
/// already-known name is a no-op.
pub fn register_paint(procedure: Arc<dyn PaintProcedure>) {
  let mut procedures = registry().write().expect("paint registry lock poisoned");
  if procedures.iter().any(|p| p.name() == procedure.name()) {
    return;
  }
  procedures.push(procedure);
}

/// Looks up a registered procedure by its `paint()` name.
pub fn paint_procedure(name: &str) -> Option<Arc<dyn PaintProcedure>> {
  registry()
    .read()
    .expect("paint registry lock poisoned")
    .iter()
    .find(|p| p.name() == name)
    .cloned()
}

/// Names of every registered procedure, in registration order.
pub fn registered_paint_names() -> Vec<&'static str> {
  registry()
    .read()
    .expect("paint registry lock poisoned")
    .iter()
    .map(|p| p.name())
    .collect()
}

/// Registers the two highlight painters. Idempotent; honors
/// `OVERMARK_NO_PAINT`, which skips registration entirely.
pub fn ensure_paint_procedures_registered() {
  if runtime::runtime_toggles().no_paint() {
    return;
  }
  for kind in [HighlightKind::Sentence, HighlightKind::Word] {
    register_paint(Arc::new(RoundedRectPainter::new(kind)));
  }
}

/// Maps a `paint()` reference name back to its highlight channel.
pub fn kind_for_paint_name(name: &str) -> Option<HighlightKind> {
  if name == HighlightKind::Word.paint_name() {
    Some(HighlightKind::Word)
  } else if name == HighlightKind::Sentence.paint_name() {
    Some(HighlightKind::Sentence)
  } else {
    None
  }
}

// "paint(highlightWord)" -> "highlightWord"
fn paint_reference_name(layer: &str) -> Option<&str> {
  layer.trim().strip_prefix("paint(")?.strip_suffix(")")
}

/// Paints an element's `paint()` background layers onto `canvas`.
///
/// Layers are walked last-to-first so the first layer in the list lands on
/// top. Layers naming an unregistered procedure, or whose channel is absent
/// or malformed, are skipped. `OVERMARK_NO_PAINT` disables invocation.
pub fn paint_element_background(doc: &Document, canvas: &mut Canvas, container: NodeId) {
  if runtime::runtime_toggles().no_paint() {
    return;
  }
  let Some(background) = doc.style_property(container, "background-image") else {
    return;
  };
  let layers: Vec<&str> = background.split(',').map(str::trim).collect();
  for layer in layers.iter().rev() {
    let Some(name) = paint_reference_name(layer) else {
      continue;
    };
    let Some(kind) = kind_for_paint_name(name) else {
      continue;
    };
    let Some(procedure) = paint_procedure(name) else {
      continue;
    };
    let Some(inputs) = read_channel(doc, container, kind) else {
      continue;
    };
    procedure.paint(canvas, &inputs);
  }
}

/// Renders every highlight layer of `container` into a fresh transparent
/// canvas sized to its border box.
pub fn render_highlights(doc: &Document, layout: &Layout, container: NodeId) -> Result<Canvas> {
  let rect = layout
    .border_box(container)
    .ok_or(LayoutError::UnknownNode { node: container })?;
  let width = (rect.width().ceil() as u32).max(1);
  let height = (rect.height().ceil() as u32).max(1);
  let mut canvas = Canvas::new_transparent(width, height)?;
  paint_element_background(doc, &mut canvas, container);
  Ok(canvas)
}
