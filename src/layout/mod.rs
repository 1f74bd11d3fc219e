//! Deterministic block and line layout
//!
//! Transforms a parsed document plus computed styles into positioned
//! geometry:
//!
//! - **Block layout**: block-level elements stack vertically at `x = 0`,
//!   spanning the containing width unless an inline `width` narrows them.
//! - **Inline layout**: each run of inline content becomes a [`Paragraph`]
//!   whose rendered text wraps greedily at UAX #14 break opportunities,
//!   measured through [`crate::text::TextMeasure`].
//!
//! The output answers the two geometry questions highlighting needs:
//! [`Layout::client_rects`] decomposes a text range into one rectangle per
//! line it touches, and [`Layout::border_box`] reports a block's rectangle.
//! Both are in viewport coordinates. Layout is a pure function of
//! `(document, styles, viewport width, metrics)`; recomputing after a
//! viewport change is how resize is modeled.

pub mod engine;

pub use engine::{Layout, LineBox, Paragraph};
