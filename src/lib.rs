pub mod debug;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod layout;
pub mod locate;
pub mod paint;
pub mod speech;
pub mod style;
pub mod text;

pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use highlight::{HighlightOptions, Highlighter};
pub use speech::SpeechDriver;

// Re-export the types most callers touch alongside the session.
pub use dom::{parse_html, Document, NodeId, SelectionRange};
pub use style::{ComputedStyles, Rgba};
pub use text::FixedAdvanceMetrics;
