//! Style system types.

pub mod color;
pub mod computed;
pub mod custom_properties;
pub mod display;

pub use color::{ColorParseError, Rgba};
pub use computed::{
  ComputedStyle, ComputedStyles, LineHeight, DEFAULT_FONT_SIZE, NORMAL_LINE_HEIGHT_FACTOR,
};
pub use custom_properties::{
  add_paint_layers, clear_channels, decode_positions, decode_radius, encode_positions,
  read_channel, remove_paint_layers, write_channel, ChannelInputs, HighlightKind,
  DEFAULT_PAINT_RADIUS, PAINT_SENTENCE_LAYER, PAINT_WORD_LAYER,
};
pub use display::{Display, DisplayParseError};
