//! Sentence and word highlighting
//!
//! The public face of the engine. A [`Highlighter`] session locates a
//! sentence in the document, re-bases word offsets onto it, turns both into
//! container-relative rectangles, and publishes them through the
//! custom-property channels that the paint procedures read back. A polled
//! [`ResizeObserver`] keeps published rectangles in step with container
//! resizes, debounced so bursts collapse into one recompute.
//!
//! Appearance lives in [`HighlightOptions`]; geometry and location live in
//! [`crate::layout`] and [`crate::locate`]; rasterization lives in
//! [`crate::paint`].

pub mod observer;
pub mod options;
pub mod session;

pub use observer::{ResizeObserver, DEFAULT_DEBOUNCE};
pub use options::{
  HighlightOptions, DEFAULT_HIGHLIGHT_RADIUS, DEFAULT_SENTENCE_COLOR, DEFAULT_SENTENCE_DARK_COLOR,
  DEFAULT_WORD_COLOR, DEFAULT_WORD_DARK_COLOR,
};
pub use session::Highlighter;
