//! Error types for overmark
//!
//! This module provides error types for all subsystems:
//! - Parse errors (HTML)
//! - Style errors (color parsing, property values)
//! - Layout errors (constraints, rect queries)
//! - Paint errors (canvas creation, rasterization)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use thiserror::Error;

/// Result type alias for overmark operations
///
/// This is a convenience type that uses our Error type as the error variant.
///
/// # Examples
///
/// ```
/// use overmark::Result;
///
/// fn parse_html(html: &str) -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for overmark
///
/// This enum covers all possible errors that can occur while locating,
/// measuring, and painting highlights. Each variant wraps a more specific
/// error type for that subsystem.
///
/// # Examples
///
/// ```
/// use overmark::Error;
/// use overmark::error::LayoutError;
///
/// fn layout() -> Result<(), Error> {
///     Err(Error::Layout(LayoutError::InvalidConstraints {
///         message: "Viewport width cannot be zero".to_string(),
///     }))
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
  /// HTML parsing error
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),

  /// Style computation error
  #[error("Style error: {0}")]
  Style(#[from] StyleError),

  /// Layout error
  #[error("Layout error: {0}")]
  Layout(#[from] LayoutError),

  /// Painting or rasterization error
  #[error("Paint error: {0}")]
  Paint(#[from] PaintError),

  /// I/O error (file reading, etc.)
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  /// Generic error for miscellaneous issues
  #[error("{0}")]
  Other(String),
}

/// Errors that occur during HTML parsing
///
/// These errors indicate that the input HTML could not be turned into a
/// document tree.
///
/// # Examples
///
/// ```
/// use overmark::error::ParseError;
///
/// let error = ParseError::InvalidHtml {
///     message: "Input is not valid UTF-8".to_string(),
///     line: 1,
/// };
/// ```
#[derive(Error, Debug, Clone)]
pub enum ParseError {
  /// Invalid HTML structure
  #[error("Invalid HTML at line {line}: {message}")]
  InvalidHtml { message: String, line: usize },

  /// The parsed document has no body element
  #[error("Document has no body element")]
  MissingBody,
}

/// Errors that occur during style parsing and computation
#[derive(Error, Debug, Clone)]
pub enum StyleError {
  /// A CSS color value could not be parsed
  #[error("Invalid color value: '{value}'")]
  InvalidColor { value: String },

  /// Invalid property value
  #[error("Invalid value for property '{property}': {value}")]
  InvalidPropertyValue { property: String, value: String },
}

/// Errors that occur during layout computation
///
/// # Examples
///
/// ```
/// use overmark::error::LayoutError;
///
/// let error = LayoutError::InvalidConstraints {
///     message: "Viewport width cannot be negative: -100px".to_string(),
/// };
/// println!("{}", error);
/// ```
#[derive(Error, Debug, Clone)]
pub enum LayoutError {
  /// Invalid layout constraints
  #[error("Invalid layout constraints: {message}")]
  InvalidConstraints { message: String },

  /// A rect query referenced a node the layout does not know about
  #[error("Node {node} is not part of the laid-out document")]
  UnknownNode { node: usize },
}

/// Errors that occur during painting and rasterization
#[derive(Error, Debug, Clone)]
pub enum PaintError {
  /// Canvas creation failed
  #[error("Failed to create canvas: {width}x{height}")]
  CanvasCreationFailed { width: u32, height: u32 },

  /// Invalid paint parameters
  #[error("Invalid paint parameters: {message}")]
  InvalidParameters { message: String },
}
