//! Computed style values
//!
//! A deliberately small cascade: user-agent defaults per tag, overridden by
//! inline `style` declarations, with inheritance for the inherited
//! properties. There is no stylesheet matching; the highlight engine only
//! needs the handful of properties that influence text geometry and
//! highlight color selection.
//!
//! # Computed Values
//!
//! - `em` font sizes resolve against the parent's font size
//! - `line-height` keeps its computed form (normal / number / length) and
//!   resolves to pixels per element at use time
//! - Colors are fully resolved to RGBA
//! - Unparseable declarations are ignored, as in a browser
//!
//! Reference: CSS Cascading and Inheritance Level 3
//! <https://www.w3.org/TR/css-cascade-3/>

use crate::dom::Document;
use crate::style::color::Rgba;
use crate::style::display::Display;

/// Default font size in CSS pixels
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Multiplier used when `line-height` is `normal`
pub const NORMAL_LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Computed `line-height` value
///
/// Kept in its computed form so that a number multiplier re-resolves
/// against each inheriting element's own font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
  /// `line-height: normal`
  Normal,
  /// A unitless multiplier of the element's font size
  Multiple(f32),
  /// An absolute pixel value
  Px(f32),
}

impl LineHeight {
  /// Resolves to a pixel value for an element with the given font size.
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::LineHeight;
  ///
  /// assert_eq!(LineHeight::Normal.resolve(20.0), 24.0);
  /// assert_eq!(LineHeight::Multiple(1.5).resolve(16.0), 24.0);
  /// assert_eq!(LineHeight::Px(30.0).resolve(16.0), 30.0);
  /// ```
  pub fn resolve(self, font_size: f32) -> f32 {
    match self {
      LineHeight::Normal => NORMAL_LINE_HEIGHT_FACTOR * font_size,
      LineHeight::Multiple(factor) => factor * font_size,
      LineHeight::Px(px) => px,
    }
  }
}

/// Computed CSS styles for a node
///
/// Text nodes carry their parent element's computed style so that layout
/// can read font metrics straight off a text node id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
  /// Display type (from the UA default for the tag unless overridden)
  pub display: Display,
  /// Text color; inherited
  pub color: Rgba,
  /// Font size in CSS pixels; inherited
  pub font_size: f32,
  /// Line height in computed form; inherited
  pub line_height: LineHeight,
  /// Used width in CSS pixels, or None for `auto`; not inherited
  pub width: Option<f32>,
}

impl ComputedStyle {
  /// The initial style: the values the root inherits from nowhere.
  pub fn initial() -> Self {
    Self {
      display: Display::Block,
      color: Rgba::BLACK,
      font_size: DEFAULT_FONT_SIZE,
      line_height: LineHeight::Normal,
      width: None,
    }
  }

  /// Line height in pixels for this element.
  pub fn line_height_px(&self) -> f32 {
    self.line_height.resolve(self.font_size)
  }
}

impl Default for ComputedStyle {
  fn default() -> Self {
    Self::initial()
  }
}

/// Computed styles for every node of a document, indexed by node id.
///
/// # Examples
///
/// ```
/// use overmark::dom::parse_html;
/// use overmark::style::{ComputedStyles, Display};
///
/// let doc = parse_html("<p style='color: red'>x</p>").expect("parse");
/// let styles = ComputedStyles::resolve(&doc);
/// let p = doc.find_element("p").expect("p");
/// assert_eq!(styles.get(p).display, Display::Block);
/// assert_eq!(styles.get(p).color.r, 255);
/// ```
pub struct ComputedStyles {
  styles: Vec<ComputedStyle>,
}

impl ComputedStyles {
  /// Resolves styles for the whole document in one pre-order pass.
  ///
  /// Pre-order guarantees a parent is resolved before its children, which
  /// is all the inheritance machinery this cascade needs.
  pub fn resolve(doc: &Document) -> Self {
    let mut styles = vec![ComputedStyle::initial(); doc.len()];
    for id in doc.descendants(doc.root()) {
      let parent_style = match doc.parent(id) {
        Some(parent) => styles[parent],
        None => ComputedStyle::initial(),
      };
      styles[id] = compute_node(doc, id, parent_style);
    }
    Self { styles }
  }

  /// The computed style of a node.
  pub fn get(&self, id: usize) -> &ComputedStyle {
    &self.styles[id]
  }
}

fn compute_node(doc: &Document, id: usize, parent: ComputedStyle) -> ComputedStyle {
  let Some(tag) = doc.tag_name(id) else {
    // Document and text nodes: inherit wholesale.
    return ComputedStyle {
      width: None,
      ..parent
    };
  };

  let mut style = ComputedStyle {
    display: Display::ua_default(tag),
    color: parent.color,
    font_size: parent.font_size,
    line_height: parent.line_height,
    width: None,
  };

  if let Some(value) = doc.style_property(id, "display") {
    if let Ok(display) = Display::parse(value) {
      style.display = display;
    }
  }

  if let Some(value) = doc.style_property(id, "color") {
    if let Ok(color) = Rgba::parse(value) {
      style.color = color;
    }
  }

  if let Some(value) = doc.style_property(id, "font-size") {
    if let Some(px) = parse_font_size(value, parent.font_size) {
      style.font_size = px;
    }
  }

  if let Some(value) = doc.style_property(id, "line-height") {
    if let Some(line_height) = parse_line_height(value) {
      style.line_height = line_height;
    }
  }

  if let Some(value) = doc.style_property(id, "width") {
    style.width = parse_px(value);
  }

  style
}

/// Parses a pixel length ("120px"). Negative and non-finite values are
/// rejected.
fn parse_px(value: &str) -> Option<f32> {
  let number = value.trim().strip_suffix("px")?.trim();
  let px: f32 = number.parse().ok()?;
  if px.is_finite() && px >= 0.0 {
    Some(px)
  } else {
    None
  }
}

fn parse_font_size(value: &str, parent_font_size: f32) -> Option<f32> {
  let value = value.trim();
  if let Some(px) = parse_px(value) {
    return Some(px);
  }
  if let Some(number) = value.strip_suffix("em") {
    let factor: f32 = number.trim().parse().ok()?;
    if factor.is_finite() && factor >= 0.0 {
      return Some(factor * parent_font_size);
    }
  }
  None
}

fn parse_line_height(value: &str) -> Option<LineHeight> {
  let value = value.trim();
  if value.eq_ignore_ascii_case("normal") {
    return Some(LineHeight::Normal);
  }
  if let Some(px) = parse_px(value) {
    return Some(LineHeight::Px(px));
  }
  let factor: f32 = value.parse().ok()?;
  if factor.is_finite() && factor >= 0.0 {
    Some(LineHeight::Multiple(factor))
  } else {
    None
  }
}
