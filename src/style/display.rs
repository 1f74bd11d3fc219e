//! CSS Display property
//!
//! The display property decides two things this engine cares about:
//! whether an element is a block container (blocks stack vertically and
//! bound highlight containers) and whether a subtree renders at all
//! (`display: none` content contributes no rendered text and no geometry).
//!
//! # Examples
//!
//! ```
//! use overmark::style::Display;
//!
//! let display = Display::parse("flex").unwrap();
//! assert!(display.is_block_level());
//! ```

use std::fmt;

/// CSS display property value
///
/// # Examples
///
/// ```
/// use overmark::style::Display;
///
/// let block = Display::Block;
/// assert!(block.is_block_level());
/// assert!(!Display::Inline.is_block_level());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Display {
  /// Element generates no boxes (removed from layout tree)
  None,
  /// Block-level box
  Block,
  /// Inline-level box
  Inline,
  /// Inline-level box that establishes its own block formatting context
  InlineBlock,
  /// Block-level flex container
  Flex,
  /// Inline-level flex container
  InlineFlex,
  /// Block-level grid container
  Grid,
  /// Inline-level grid container
  InlineGrid,
  /// Block-level table wrapper box
  Table,
  /// List item box (block with marker)
  ListItem,
  /// Block-level box establishing a new block formatting context
  FlowRoot,
}

impl Display {
  /// Returns true if this display value means the element generates no boxes
  pub fn is_none(self) -> bool {
    matches!(self, Display::None)
  }

  /// Returns true if the element generates block-level boxes
  ///
  /// Block-level elements stack vertically and can act as highlight
  /// containers.
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::Display;
  ///
  /// assert!(Display::Block.is_block_level());
  /// assert!(Display::Flex.is_block_level());
  /// assert!(Display::Grid.is_block_level());
  /// assert!(Display::Table.is_block_level());
  /// assert!(!Display::Inline.is_block_level());
  /// assert!(!Display::InlineFlex.is_block_level());
  /// ```
  pub fn is_block_level(self) -> bool {
    matches!(
      self,
      Display::Block
        | Display::Flex
        | Display::Grid
        | Display::Table
        | Display::ListItem
        | Display::FlowRoot
    )
  }

  /// Returns true if the element generates inline-level boxes
  pub fn is_inline_level(self) -> bool {
    matches!(
      self,
      Display::Inline | Display::InlineBlock | Display::InlineFlex | Display::InlineGrid
    )
  }

  /// Parse a display value from a CSS string
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::Display;
  ///
  /// assert_eq!(Display::parse("block").unwrap(), Display::Block);
  /// assert_eq!(Display::parse("inline-block").unwrap(), Display::InlineBlock);
  /// assert!(Display::parse("ruby").is_err());
  /// ```
  pub fn parse(s: &str) -> Result<Self, DisplayParseError> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
      "none" => Ok(Display::None),
      "block" => Ok(Display::Block),
      "inline" => Ok(Display::Inline),
      "inline-block" => Ok(Display::InlineBlock),
      "flex" => Ok(Display::Flex),
      "inline-flex" => Ok(Display::InlineFlex),
      "grid" => Ok(Display::Grid),
      "inline-grid" => Ok(Display::InlineGrid),
      "table" => Ok(Display::Table),
      "list-item" => Ok(Display::ListItem),
      "flow-root" => Ok(Display::FlowRoot),
      _ => Err(DisplayParseError::InvalidValue(s.to_string())),
    }
  }

  /// The user-agent default display for an HTML tag.
  ///
  /// Covers the subset of the HTML UA stylesheet this engine needs:
  /// document metadata and scripting elements default to `none` (which is
  /// what keeps them out of rendered text), the usual structural elements
  /// default to `block`, and everything else is `inline`.
  pub fn ua_default(tag: &str) -> Display {
    match tag {
      "head" | "meta" | "link" | "title" | "base" | "script" | "style" | "template"
      | "noframes" => Display::None,
      "html" | "body" | "div" | "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol"
      | "blockquote" | "pre" | "section" | "article" | "header" | "footer" | "nav" | "aside"
      | "main" | "figure" | "figcaption" | "address" | "fieldset" | "form" | "hr" | "dl"
      | "dt" | "dd" | "details" | "summary" | "dialog" => Display::Block,
      "li" => Display::ListItem,
      "table" => Display::Table,
      _ => Display::Inline,
    }
  }
}

/// Error when parsing display value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayParseError {
  /// Invalid display value
  InvalidValue(String),
}

impl fmt::Display for DisplayParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DisplayParseError::InvalidValue(s) => {
        write!(f, "Invalid display value: '{}'", s)
      }
    }
  }
}

impl std::error::Error for DisplayParseError {}

impl fmt::Display for Display {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Display::None => write!(f, "none"),
      Display::Block => write!(f, "block"),
      Display::Inline => write!(f, "inline"),
      Display::InlineBlock => write!(f, "inline-block"),
      Display::Flex => write!(f, "flex"),
      Display::InlineFlex => write!(f, "inline-flex"),
      Display::Grid => write!(f, "grid"),
      Display::InlineGrid => write!(f, "inline-grid"),
      Display::Table => write!(f, "table"),
      Display::ListItem => write!(f, "list-item"),
      Display::FlowRoot => write!(f, "flow-root"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_basic_values() {
    assert_eq!(Display::parse("block").unwrap(), Display::Block);
    assert_eq!(Display::parse("inline").unwrap(), Display::Inline);
    assert_eq!(Display::parse("none").unwrap(), Display::None);
    assert_eq!(Display::parse("flex").unwrap(), Display::Flex);
    assert_eq!(Display::parse("grid").unwrap(), Display::Grid);
    assert_eq!(Display::parse("table").unwrap(), Display::Table);
    assert_eq!(Display::parse("list-item").unwrap(), Display::ListItem);
    assert_eq!(Display::parse("flow-root").unwrap(), Display::FlowRoot);
  }

  #[test]
  fn test_parse_case_insensitive() {
    assert_eq!(Display::parse("BLOCK").unwrap(), Display::Block);
    assert_eq!(Display::parse("Inline-Block").unwrap(), Display::InlineBlock);
  }

  #[test]
  fn test_parse_with_whitespace() {
    assert_eq!(Display::parse("  block  ").unwrap(), Display::Block);
    assert_eq!(Display::parse("\tflex\n").unwrap(), Display::Flex);
  }

  #[test]
  fn test_parse_invalid() {
    assert!(Display::parse("invalid").is_err());
    assert!(Display::parse("").is_err());
    assert!(Display::parse("block-inline").is_err());
  }

  #[test]
  fn test_is_block_level() {
    assert!(Display::Block.is_block_level());
    assert!(Display::Flex.is_block_level());
    assert!(Display::Grid.is_block_level());
    assert!(Display::Table.is_block_level());
    assert!(Display::ListItem.is_block_level());
    assert!(Display::FlowRoot.is_block_level());

    assert!(!Display::Inline.is_block_level());
    assert!(!Display::InlineBlock.is_block_level());
    assert!(!Display::InlineFlex.is_block_level());
    assert!(!Display::InlineGrid.is_block_level());
    assert!(!Display::None.is_block_level());
  }

  #[test]
  fn test_is_inline_level() {
    assert!(Display::Inline.is_inline_level());
    assert!(Display::InlineBlock.is_inline_level());
    assert!(Display::InlineFlex.is_inline_level());
    assert!(Display::InlineGrid.is_inline_level());

    assert!(!Display::Block.is_inline_level());
    assert!(!Display::None.is_inline_level());
  }

  #[test]
  fn test_ua_defaults() {
    assert_eq!(Display::ua_default("div"), Display::Block);
    assert_eq!(Display::ua_default("p"), Display::Block);
    assert_eq!(Display::ua_default("body"), Display::Block);
    assert_eq!(Display::ua_default("li"), Display::ListItem);
    assert_eq!(Display::ua_default("table"), Display::Table);
    assert_eq!(Display::ua_default("span"), Display::Inline);
    assert_eq!(Display::ua_default("a"), Display::Inline);
    assert_eq!(Display::ua_default("b"), Display::Inline);
    assert_eq!(Display::ua_default("custom-element"), Display::Inline);
    assert_eq!(Display::ua_default("script"), Display::None);
    assert_eq!(Display::ua_default("style"), Display::None);
    assert_eq!(Display::ua_default("head"), Display::None);
    assert_eq!(Display::ua_default("template"), Display::None);
  }

  #[test]
  fn test_display_formatting_round_trip() {
    let values = vec![
      Display::None,
      Display::Block,
      Display::Inline,
      Display::InlineBlock,
      Display::Flex,
      Display::InlineFlex,
      Display::Grid,
      Display::InlineGrid,
      Display::Table,
      Display::ListItem,
      Display::FlowRoot,
    ];

    for display in values {
      let string = format!("{}", display);
      let parsed = Display::parse(&string).unwrap();
      assert_eq!(parsed, display, "Round-trip failed for {:?}", display);
    }
  }

  #[test]
  fn test_parse_error_message() {
    let err = Display::parse("invalid").unwrap_err();
    assert_eq!(err.to_string(), "Invalid display value: 'invalid'");
  }
}
