//! Canvas wrapper for tiny-skia
//!
//! A thin abstraction over a tiny-skia `Pixmap` with the primitives paint
//! procedures need: clearing, plain fills and rounded-rectangle fills.
//! Rounded corners use the cubic bezier quarter-circle approximation.
//!
//! # Example
//!
//! ```
//! use overmark::geometry::Rect;
//! use overmark::paint::Canvas;
//! use overmark::style::Rgba;
//!
//! let mut canvas = Canvas::new_transparent(100, 40).expect("canvas");
//! canvas.fill_rounded_rect(Rect::from_xywh(4.0, 4.0, 60.0, 20.0), 6.0, Rgba::rgb(122, 89, 255));
//! assert!(canvas.pixel(30, 14).expect("pixel").alpha() > 0);
//! ```

use tiny_skia::FillRule;
use tiny_skia::Paint;
use tiny_skia::PathBuilder;
use tiny_skia::Pixmap;
use tiny_skia::PremultipliedColorU8;
use tiny_skia::Rect as SkiaRect;
use tiny_skia::Transform;

use crate::error::PaintError;
use crate::error::Result;
use crate::geometry::Rect;
use crate::geometry::Size;
use crate::style::Rgba;

// 4/3 * tan(pi/8), cubic approximation of a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// A pixel surface paint procedures draw into.
#[derive(Debug)]
pub struct Canvas {
  pixmap: Pixmap,
}

impl Canvas {
  /// Creates a canvas with the given dimensions, filled with `background`.
  ///
  /// # Errors
  ///
  /// Returns [`PaintError::CanvasCreationFailed`] when either dimension is
  /// zero or the buffer cannot be allocated.
  pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
    let pixmap =
      Pixmap::new(width, height).ok_or(PaintError::CanvasCreationFailed { width, height })?;
    let mut canvas = Self { pixmap };
    canvas.clear(background);
    Ok(canvas)
  }

  /// Creates a canvas filled with transparent black.
  pub fn new_transparent(width: u32, height: u32) -> Result<Self> {
    Self::new(width, height, Rgba::TRANSPARENT)
  }

  /// Wraps an existing pixmap without clearing it.
  pub fn from_pixmap(pixmap: Pixmap) -> Self {
    Self { pixmap }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.pixmap.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.pixmap.height()
  }

  #[inline]
  pub fn size(&self) -> Size {
    Size::new(self.width() as f32, self.height() as f32)
  }

  /// Canvas bounds as a rectangle at the origin.
  #[inline]
  pub fn bounds(&self) -> Rect {
    Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32)
  }

  /// Fills the whole canvas with `color`.
  pub fn clear(&mut self, color: Rgba) {
    let skia_color =
      tiny_skia::Color::from_rgba8(color.r, color.g, color.b, (color.a * 255.0) as u8);
    self.pixmap.fill(skia_color);
  }

  /// Fills a rectangle. Degenerate rectangles are skipped.
  pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
    if color.is_transparent() {
      return;
    }
    if let Some(skia_rect) = to_skia_rect(rect) {
      let path = PathBuilder::from_rect(skia_rect);
      let paint = create_paint(color);
      self
        .pixmap
        .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
  }

  /// Fills a rectangle with uniformly rounded corners.
  ///
  /// The radius is reduced to half the shorter side when it would overlap
  /// itself. A non-positive radius falls back to a plain fill.
  pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) {
    if color.is_transparent() {
      return;
    }
    if radius <= 0.0 {
      return self.fill_rect(rect, color);
    }
    if let Some(path) = rounded_rect_path(rect, radius) {
      let paint = create_paint(color);
      self
        .pixmap
        .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
  }

  /// Reads back one pixel, premultiplied. `None` outside the canvas.
  pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
    self.pixmap.pixel(x, y)
  }

  #[inline]
  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  #[inline]
  pub fn pixmap_mut(&mut self) -> &mut Pixmap {
    &mut self.pixmap
  }

  /// Consumes the canvas and returns the underlying pixmap.
  pub fn into_pixmap(self) -> Pixmap {
    self.pixmap
  }
}

fn create_paint(color: Rgba) -> Paint<'static> {
  let mut paint = Paint::default();
  paint.set_color_rgba8(color.r, color.g, color.b, (color.a * 255.0) as u8);
  paint.anti_alias = true;
  paint
}

fn to_skia_rect(rect: Rect) -> Option<SkiaRect> {
  SkiaRect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height())
}

fn rounded_rect_path(rect: Rect, radius: f32) -> Option<tiny_skia::Path> {
  to_skia_rect(rect)?;
  let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
  if r <= 0.0 {
    return to_skia_rect(rect).map(PathBuilder::from_rect);
  }

  let (x0, y0) = (rect.min_x(), rect.min_y());
  let (x1, y1) = (rect.max_x(), rect.max_y());
  // Control point inset for a circular corner of radius r.
  let k = r * (1.0 - KAPPA);

  let mut pb = PathBuilder::new();
  pb.move_to(x0 + r, y0);
  pb.line_to(x1 - r, y0);
  pb.cubic_to(x1 - k, y0, x1, y0 + k, x1, y0 + r);
  pb.line_to(x1, y1 - r);
  pb.cubic_to(x1, y1 - k, x1 - k, y1, x1 - r, y1);
  pb.line_to(x0 + r, y1);
  pb.cubic_to(x0 + k, y1, x0, y1 - k, x0, y1 - r);
  pb.line_to(x0, y0 + r);
  pb.cubic_to(x0, y0 + k, x0 + k, y0, x0 + r, y0);
  pb.close();
  pb.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rgba(pixel: PremultipliedColorU8) -> (u8, u8, u8, u8) {
    (pixel.red(), pixel.green(), pixel.blue(), pixel.alpha())
  }

  #[test]
  fn test_canvas_creation() {
    let canvas = Canvas::new(100, 50, Rgba::WHITE).expect("canvas");
    assert_eq!(canvas.width(), 100);
    assert_eq!(canvas.height(), 50);
    assert_eq!(canvas.bounds(), Rect::from_xywh(0.0, 0.0, 100.0, 50.0));
  }

  #[test]
  fn test_canvas_creation_rejects_zero_dimension() {
    let err = Canvas::new(0, 50, Rgba::WHITE).expect_err("zero width");
    assert!(format!("{}", err).contains("0x50"));
  }

  #[test]
  fn test_clear_sets_every_pixel() {
    let mut canvas = Canvas::new(4, 4, Rgba::WHITE).expect("canvas");
    canvas.clear(Rgba::rgb(255, 0, 0));
    assert_eq!(rgba(canvas.pixel(0, 0).expect("pixel")), (255, 0, 0, 255));
    assert_eq!(rgba(canvas.pixel(3, 3).expect("pixel")), (255, 0, 0, 255));
  }

  #[test]
  fn test_fill_rect_stays_in_bounds() {
    let mut canvas = Canvas::new_transparent(20, 20).expect("canvas");
    canvas.fill_rect(Rect::from_xywh(5.0, 5.0, 10.0, 10.0), Rgba::rgb(0, 0, 255));
    assert_eq!(rgba(canvas.pixel(10, 10).expect("pixel")), (0, 0, 255, 255));
    assert_eq!(canvas.pixel(2, 2).expect("pixel").alpha(), 0);
  }

  #[test]
  fn test_fill_rect_skips_degenerate() {
    let mut canvas = Canvas::new_transparent(10, 10).expect("canvas");
    canvas.fill_rect(Rect::from_xywh(2.0, 2.0, 0.0, 5.0), Rgba::BLACK);
    canvas.fill_rect(Rect::from_xywh(2.0, 2.0, -3.0, 5.0), Rgba::BLACK);
    assert_eq!(canvas.pixel(2, 4).expect("pixel").alpha(), 0);
  }

  #[test]
  fn test_rounded_rect_clips_corners() {
    let mut canvas = Canvas::new_transparent(40, 40).expect("canvas");
    canvas.fill_rounded_rect(
      Rect::from_xywh(0.0, 0.0, 40.0, 40.0),
      12.0,
      Rgba::rgb(0, 255, 0),
    );
    // Center and edge midpoints are inside the shape, the extreme corner is not.
    assert_eq!(rgba(canvas.pixel(20, 20).expect("pixel")), (0, 255, 0, 255));
    assert_eq!(rgba(canvas.pixel(20, 0).expect("pixel")), (0, 255, 0, 255));
    assert_eq!(canvas.pixel(0, 0).expect("pixel").alpha(), 0);
  }

  #[test]
  fn test_rounded_rect_radius_clamps_to_half_extent() {
    let mut canvas = Canvas::new_transparent(40, 10).expect("canvas");
    // Radius exceeds half the height; the shape must still cover the middle row.
    canvas.fill_rounded_rect(
      Rect::from_xywh(0.0, 0.0, 40.0, 10.0),
      30.0,
      Rgba::rgb(255, 0, 0),
    );
    assert_eq!(rgba(canvas.pixel(20, 5).expect("pixel")), (255, 0, 0, 255));
  }

  #[test]
  fn test_zero_radius_matches_plain_fill() {
    let mut canvas = Canvas::new_transparent(10, 10).expect("canvas");
    canvas.fill_rounded_rect(Rect::from_xywh(1.0, 1.0, 8.0, 8.0), 0.0, Rgba::BLACK);
    assert_eq!(canvas.pixel(1, 1).expect("pixel").alpha(), 255);
  }

  #[test]
  fn test_translucent_fill_premultiplies() {
    let mut canvas = Canvas::new_transparent(10, 10).expect("canvas");
    canvas.fill_rect(
      Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
      Rgba::new(122, 89, 255, 0.5),
    );
    let pixel = canvas.pixel(5, 5).expect("pixel");
    assert!(pixel.alpha() > 100 && pixel.alpha() < 150);
    assert!(pixel.red() <= pixel.alpha());
  }
}
