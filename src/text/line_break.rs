//! Line break opportunity detection using the Unicode Line Breaking Algorithm (UAX #14)
//!
//! Wraps the `unicode-linebreak` crate behind a small API used by the line
//! layout in [`crate::layout`]. Positions are byte offsets into the UTF-8
//! string, pointing AFTER the character that permits the break: in
//! `"Hello world"` the break sits at byte 6, the first byte of `world`.
//!
//! The algorithm distinguishes mandatory breaks (newlines, line and paragraph
//! separators) from allowed breaks (soft wrap opportunities after spaces,
//! hyphens, between CJK characters). Rendered paragraph text never contains
//! newlines, so layout only ever consumes allowed breaks in practice, but
//! mandatory breaks are honored if they appear.

use unicode_linebreak::linebreaks;
use unicode_linebreak::BreakOpportunity as RawOpportunity;

/// Whether a break at a position is required or merely permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakType {
  /// The line must break here (U+000A, U+000D, U+2028, U+2029).
  Mandatory,
  /// The line may break here when wrapping.
  Allowed,
}

/// A legal line break position in a UTF-8 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakOpportunity {
  /// Byte offset immediately after the character that permits the break.
  pub byte_offset: usize,
  /// Whether the break is mandatory or optional.
  pub break_type: BreakType,
}

impl BreakOpportunity {
  #[inline]
  pub fn new(byte_offset: usize, break_type: BreakType) -> Self {
    Self {
      byte_offset,
      break_type,
    }
  }

  /// Check if this is a mandatory break.
  #[inline]
  pub fn is_mandatory(&self) -> bool {
    self.break_type == BreakType::Mandatory
  }

  /// Check if this is an allowed (soft) break.
  #[inline]
  pub fn is_allowed(&self) -> bool {
    self.break_type == BreakType::Allowed
  }
}

/// Finds every break opportunity in `text`, sorted by byte offset.
///
/// UAX #14 always reports an opportunity at the end of the string; callers
/// that only care about wrap points inside the text should use
/// [`find_interior_breaks`].
///
/// # Example
///
/// ```rust
/// use overmark::text::line_break::{find_break_opportunities, BreakType};
///
/// let breaks = find_break_opportunities("Hello world");
/// let after_space = breaks.iter().find(|b| b.byte_offset == 6);
/// assert_eq!(after_space.map(|b| b.break_type), Some(BreakType::Allowed));
/// ```
pub fn find_break_opportunities(text: &str) -> Vec<BreakOpportunity> {
  linebreaks(text)
    .map(|(byte_offset, raw)| {
      let break_type = match raw {
        RawOpportunity::Mandatory => BreakType::Mandatory,
        RawOpportunity::Allowed => BreakType::Allowed,
      };
      BreakOpportunity {
        byte_offset,
        break_type,
      }
    })
    .collect()
}

/// Break opportunities strictly inside `text`, with the end-of-text break
/// removed.
pub fn find_interior_breaks(text: &str) -> Vec<BreakOpportunity> {
  let len = text.len();
  find_break_opportunities(text)
    .into_iter()
    .filter(|b| b.byte_offset < len)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_string_has_no_breaks() {
    assert!(find_break_opportunities("").is_empty());
  }

  #[test]
  fn test_break_after_space() {
    let breaks = find_break_opportunities("Hello world");
    let brk = breaks.iter().find(|b| b.byte_offset == 6);
    assert!(brk.is_some());
    assert_eq!(brk.map(|b| b.break_type), Some(BreakType::Allowed));
  }

  #[test]
  fn test_end_of_text_break_reported() {
    let text = "Hello world";
    let breaks = find_break_opportunities(text);
    assert!(breaks.iter().any(|b| b.byte_offset == text.len()));
  }

  #[test]
  fn test_newline_is_mandatory() {
    let breaks = find_break_opportunities("Line 1\nLine 2");
    let brk = breaks.iter().find(|b| b.byte_offset == 7);
    assert!(brk.is_some());
    assert!(brk.map(|b| b.is_mandatory()).unwrap_or(false));
  }

  #[test]
  fn test_non_breaking_space_prevents_break() {
    let interior = find_interior_breaks("Hello\u{00A0}world");
    assert!(interior.is_empty());
  }

  #[test]
  fn test_cjk_breaks_between_characters() {
    let text = "你好世界";
    let breaks = find_break_opportunities(text);
    assert!(breaks.len() >= 3);
    for brk in &breaks {
      assert!(text.is_char_boundary(brk.byte_offset));
    }
  }

  #[test]
  fn test_interior_breaks_exclude_end() {
    let interior = find_interior_breaks("Hello world");
    assert_eq!(interior.len(), 1);
    assert_eq!(interior[0].byte_offset, 6);
  }

  #[test]
  fn test_single_word_has_no_interior_breaks() {
    assert!(find_interior_breaks("supercalifragilistic").is_empty());
  }

  #[test]
  fn test_breaks_are_sorted() {
    let breaks = find_break_opportunities("The quick brown fox jumps");
    for window in breaks.windows(2) {
      assert!(window[0].byte_offset <= window[1].byte_offset);
    }
  }
}
