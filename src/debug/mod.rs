//! Debug and introspection helpers

pub mod runtime;
pub mod snapshot;

pub use snapshot::{session_snapshot_json, OffsetsSnapshot, RectSnapshot, SessionSnapshot};
