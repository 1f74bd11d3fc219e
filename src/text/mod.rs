//! Text extraction, measurement and line breaking.

pub mod line_break;
pub mod measure;
pub mod rendered;

pub use measure::{FixedAdvanceMetrics, TextMeasure};
pub use rendered::{raw_text, Provenance, RenderedText};
