//! Painting and rasterization
//!
//! This module turns highlight channel data into pixels.
//!
//! # Responsibilities
//!
//! - **Canvas**: Pixel surface over tiny-skia with rounded-rect fills
//! - **Worklet**: Paint procedure registry and `background-image` layer
//!   dispatch
//!
//! # Architecture
//!
//! Painting is pull-based, mirroring how a paint worklet runs in a browser:
//! nothing is drawn when highlight state changes. Instead the session writes
//! `paint(name)` layers and custom-property channels onto the container, and
//! a later [`render_highlights`] call reads them back and invokes the named
//! procedures. Layers stack first-on-top, so procedures run last-to-first.
//!
//! # Example
//!
//! ```rust,ignore
//! use overmark::paint::{ensure_paint_procedures_registered, render_highlights};
//!
//! ensure_paint_procedures_registered();
//! let canvas = render_highlights(&doc, &layout, container)?;
//! let pixmap = canvas.into_pixmap();
//! ```

pub mod canvas;
pub mod worklet;

pub use canvas::Canvas;
pub use worklet::{
  ensure_paint_procedures_registered, kind_for_paint_name, paint_element_background,
  paint_procedure, register_paint, registered_paint_names, render_highlights, PaintProcedure,
  RoundedRectPainter,
};
