//! Text location inside a parsed document
//!
//! Maps a target substring (a sentence, or a word range nested in it) to the
//! concrete text nodes and byte offsets that contain it. Location has to
//! bridge two views of the same content: offsets are found against rendered
//! text (whitespace collapsed, hidden subtrees dropped) but range endpoints
//! must index into raw text-node content, so every lookup runs through a
//! correction table recording where the two views diverge.
//!
//! Duplicate occurrences of the same substring are disambiguated with
//! per-element occurrence counters: each successful lookup consumes one
//! occurrence, so repeated lookups advance through duplicates in document
//! order. Counters and cached correction tables live on the [`TextLocator`]
//! and survive until [`TextLocator::clear`], which callers invoke when the
//! underlying document is about to change.
//!
//! Every operation is best-effort: a failed resolution returns a fallback or
//! `None`, never an error.

use rustc_hash::FxHashMap;

use crate::dom::{Document, NodeId, NO_NODE};
use crate::style::ComputedStyles;
use crate::text::{raw_text, RenderedText};

/// Byte offsets of a located substring, end exclusive.
///
/// Sentence offsets index into the container's rendered text with newlines
/// removed; word offsets are relative to the sentence they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOffsets {
  pub start_index: usize,
  pub end_index: usize,
}

impl TextOffsets {
  pub fn new(start_index: usize, end_index: usize) -> Self {
    Self {
      start_index,
      end_index,
    }
  }

  pub fn len(&self) -> usize {
    self.end_index.saturating_sub(self.start_index)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// One endpoint of a located range: a text node and a byte offset into its
/// raw content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBoundary {
  pub node: NodeId,
  pub offset: usize,
}

type CounterMap = FxHashMap<NodeId, FxHashMap<String, usize>>;

/// Locates substrings in a document, tracking consumed occurrences.
#[derive(Debug, Default)]
pub struct TextLocator {
  // Per (element, text): how many times the element matched as a container.
  container_counters: CounterMap,
  // Per (container, text): how many occurrences have been resolved.
  occurrence_counters: CounterMap,
  correction_cache: FxHashMap<NodeId, Vec<(usize, usize)>>,
  #[cfg(test)]
  pub(crate) correction_scans: usize,
  #[cfg(test)]
  pub(crate) sentence_scans: usize,
}

impl TextLocator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Finds the innermost element whose text contains `text`.
  ///
  /// Depth-first over element children, skipping `svg` subtrees. When
  /// several candidates contain the text, the first leaf-most candidate in
  /// document order whose unconsumed occurrences still cover `text` wins,
  /// and one occurrence is consumed. Falls back to `root` (or the body when
  /// `root` is invalid) instead of failing.
  pub fn find_text_node_container(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    text: &str,
    root: NodeId,
  ) -> NodeId {
    let fallback = if root != NO_NODE && doc.get(root).is_some() {
      root
    } else {
      doc.body().unwrap_or_else(|| doc.root())
    };
    if text.is_empty() {
      return fallback;
    }
    let mut potential = Vec::new();
    self.collect_potential(doc, styles, text, fallback, &mut potential);
    for &element in &potential {
      if self.check_element(doc, styles, text, element) {
        return element;
      }
    }
    fallback
  }

  // Collects elements that contain `text` but whose element children do not,
  // leaf-most first within each branch. Returns whether `element` contains
  // the text at all.
  fn collect_potential(
    &self,
    doc: &Document,
    styles: &ComputedStyles,
    text: &str,
    element: NodeId,
    out: &mut Vec<NodeId>,
  ) -> bool {
    let rendered = RenderedText::build(doc, styles, element);
    if !rendered.text().contains(text) && !raw_text(doc, element).contains(text) {
      return false;
    }
    let mut found_in_child = false;
    for &child in doc.children(element) {
      if !doc.is_element(child) || doc.is_svg(child) {
        continue;
      }
      if self.collect_potential(doc, styles, text, child, out) {
        found_in_child = true;
      }
    }
    if !found_in_child {
      out.push(element);
    }
    true
  }

  // Containment test against the element's rendered and raw text with the
  // first `n` occurrences masked out, where `n` counts this element's
  // previous matches for the same text. A match consumes one occurrence.
  fn check_element(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    text: &str,
    element: NodeId,
  ) -> bool {
    let skip = counter_value(&self.container_counters, element, text);
    let rendered = RenderedText::build(doc, styles, element);
    let matched = find_occurrence(rendered.text(), text, skip).is_some()
      || find_occurrence(&raw_text(doc, element), text, skip).is_some();
    if matched {
      bump_counter(&mut self.container_counters, element, text);
    }
    matched
  }

  /// Walks up from `node` to the nearest block-level element that is not an
  /// inline anchor or span. The body is the final fallback.
  pub fn find_parent_block_element(
    &self,
    doc: &Document,
    styles: &ComputedStyles,
    node: NodeId,
  ) -> NodeId {
    let mut current = node;
    loop {
      if doc.is_element(current)
        && styles.get(current).display.is_block_level()
        && !matches!(doc.tag_name(current), Some("a") | Some("span"))
      {
        return current;
      }
      match doc.parent(current) {
        Some(parent) => current = parent,
        None => return doc.body().unwrap_or_else(|| doc.root()),
      }
    }
  }

  /// Byte offsets of the next unconsumed occurrence of `text` within the
  /// container's rendered text, newlines removed.
  ///
  /// Previously resolved occurrences are masked out of the search, so a new
  /// lookup for the same `(container, text)` pair advances to the next
  /// duplicate. A hit consumes one occurrence. Sessions memoize the result;
  /// this method itself always searches.
  pub fn sentence_offset(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    text: &str,
    container: NodeId,
  ) -> Option<TextOffsets> {
    let rendered = RenderedText::build(doc, styles, container)
      .text()
      .replace('\n', "");
    self.sentence_offset_in(text, container, &rendered)
  }

  pub(crate) fn sentence_offset_in(
    &mut self,
    text: &str,
    container: NodeId,
    rendered: &str,
  ) -> Option<TextOffsets> {
    #[cfg(test)]
    {
      self.sentence_scans += 1;
    }
    let skip = counter_value(&self.occurrence_counters, container, text);
    let start_index = find_occurrence(rendered, text, skip)?;
    bump_counter(&mut self.occurrence_counters, container, text);
    Some(TextOffsets::new(start_index, start_index + text.len()))
  }

  /// Converts sentence offsets (with an optional nested word range) into
  /// concrete start and end boundaries over the container's text nodes.
  ///
  /// Rendered offsets are first corrected into raw offsets using the
  /// divergence table for this container, then resolved by walking text
  /// nodes in document order. Returns `None` when either boundary falls
  /// outside the walked content.
  pub fn find_range_text_nodes(
    &mut self,
    doc: &Document,
    styles: &ComputedStyles,
    container: NodeId,
    sentence: TextOffsets,
    word_offset: Option<TextOffsets>,
  ) -> Option<(RangeBoundary, RangeBoundary)> {
    let rendered = RenderedText::build(doc, styles, container)
      .text()
      .replace('\n', "");
    let raw = raw_text(doc, container).replace('\n', " ");

    let mut start_index = sentence.start_index;
    let mut end_index = sentence.end_index;
    if let Some(word) = word_offset {
      end_index = sentence.start_index + word.end_index;
      start_index = sentence.start_index + word.start_index;
    }

    let mut start_correction = 0;
    let mut end_correction = 0;
    for &(index, skipped) in self.corrections_for(container, &rendered, &raw) {
      if index <= start_index {
        start_correction += skipped;
      }
      if index <= end_index {
        end_correction += skipped;
      }
    }
    start_index += start_correction;
    end_index += end_correction;

    let mut start = None;
    let mut end = None;
    let mut cursor = 0;
    for node in doc.text_nodes_under(container) {
      let len = doc.text(node).map_or(0, str::len);
      let node_start = cursor;
      let node_end = cursor + len;
      if node_start <= start_index && start_index < node_end {
        start = Some(RangeBoundary {
          node,
          offset: start_index - node_start,
        });
      }
      if node_start < end_index && end_index <= node_end {
        end = Some(RangeBoundary {
          node,
          offset: end_index - node_start,
        });
      }
      if start.is_some() && end.is_some() {
        break;
      }
      cursor = node_end;
    }
    match (start, end) {
      (Some(start), Some(end)) => Some((start, end)),
      _ => None,
    }
  }

  fn corrections_for(&mut self, container: NodeId, rendered: &str, raw: &str) -> &[(usize, usize)] {
    if !self.correction_cache.contains_key(&container) {
      #[cfg(test)]
      {
        self.correction_scans += 1;
      }
      self
        .correction_cache
        .insert(container, correction_map(rendered, raw));
    }
    &self.correction_cache[&container]
  }

  /// Drops every occurrence counter and cached correction table. Invoked
  /// when a session ends or the document content is about to change.
  pub fn clear(&mut self) {
    self.container_counters.clear();
    self.occurrence_counters.clear();
    self.correction_cache.clear();
  }
}

/// Builds the rendered-to-raw correction table.
///
/// Walks the two strings in lockstep. A raw character that does not match
/// the rendered character under the rendered cursor records its byte length
/// at the current rendered offset and advances only the raw side; matching
/// characters advance both. The result maps rendered byte offsets to the
/// number of raw bytes skipped there, in ascending offset order.
pub fn correction_map(rendered: &str, raw: &str) -> Vec<(usize, usize)> {
  let mut map: Vec<(usize, usize)> = Vec::new();
  let mut rendered_offset = 0;
  for raw_ch in raw.chars() {
    let rendered_ch = rendered[rendered_offset..].chars().next();
    if rendered_ch == Some(raw_ch) {
      rendered_offset += raw_ch.len_utf8();
    } else {
      match map.last_mut() {
        Some((index, skipped)) if *index == rendered_offset => *skipped += raw_ch.len_utf8(),
        _ => map.push((rendered_offset, raw_ch.len_utf8())),
      }
    }
  }
  map
}

// Byte index of the (skip + 1)-th non-overlapping occurrence of `needle`.
fn find_occurrence(haystack: &str, needle: &str, skip: usize) -> Option<usize> {
  if needle.is_empty() {
    return None;
  }
  let mut from = 0;
  let mut found = None;
  for _ in 0..=skip {
    match haystack[from..].find(needle) {
      Some(i) => {
        let at = from + i;
        found = Some(at);
        from = at + needle.len();
      }
      None => return None,
    }
  }
  found
}

fn counter_value(counters: &CounterMap, node: NodeId, text: &str) -> usize {
  counters
    .get(&node)
    .and_then(|per_text| per_text.get(text))
    .copied()
    .unwrap_or(0)
}

fn bump_counter(counters: &mut CounterMap, node: NodeId, text: &str) {
  *counters
    .entry(node)
    .or_default()
    .entry(text.to_string())
    .or_insert(0) += 1;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::parse_html;

  fn setup(html: &str) -> (Document, ComputedStyles) {
    let doc = parse_html(html).expect("parse");
    let styles = ComputedStyles::resolve(&doc);
    (doc, styles)
  }

  #[test]
  fn test_find_occurrence_advances() {
    assert_eq!(find_occurrence("aXbXc", "X", 0), Some(1));
    assert_eq!(find_occurrence("aXbXc", "X", 1), Some(3));
    assert_eq!(find_occurrence("aXbXc", "X", 2), None);
    assert_eq!(find_occurrence("abc", "", 0), None);
  }

  #[test]
  fn test_correction_map_identity() {
    assert!(correction_map("abc", "abc").is_empty());
  }

  #[test]
  fn test_correction_map_single_divergence() {
    // Raw has a space the rendered view dropped.
    assert_eq!(correction_map("FirstSecond", "First Second"), vec![(5, 1)]);
  }

  #[test]
  fn test_correction_map_run_accumulates() {
    assert_eq!(correction_map("ab", "a???b"), vec![(1, 3)]);
  }

  #[test]
  fn test_correction_map_trailing_raw() {
    assert_eq!(correction_map("ab", "abxyz"), vec![(2, 3)]);
  }

  #[test]
  fn test_correction_map_multibyte() {
    // 'é' is two bytes; the skipped newline counts one.
    assert_eq!(correction_map("aé", "a\né"), vec![(1, 1)]);
  }

  #[test]
  fn test_find_parent_block_element_skips_inline() {
    let (doc, styles) = setup("<body><p>text <span id=\"s\">in <a id=\"a\">link</a></span></p></body>");
    let locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let span = doc.element_by_id("s").expect("span");
    let anchor = doc.element_by_id("a").expect("a");
    assert_eq!(locator.find_parent_block_element(&doc, &styles, span), p);
    assert_eq!(locator.find_parent_block_element(&doc, &styles, anchor), p);
    assert_eq!(locator.find_parent_block_element(&doc, &styles, p), p);
  }

  #[test]
  fn test_find_parent_block_element_from_text_node() {
    let (doc, styles) = setup("<body><div><b>bold</b></div></body>");
    let locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    let text = doc.text_nodes_under(div)[0];
    assert_eq!(locator.find_parent_block_element(&doc, &styles, text), div);
  }

  #[test]
  fn test_find_parent_block_element_rejects_block_styled_span() {
    let (doc, styles) =
      setup("<body><div><span style=\"display: block\">styled</span></div></body>");
    let locator = TextLocator::new();
    let span = doc.find_element("span").expect("span");
    let div = doc.find_element("div").expect("div");
    assert_eq!(locator.find_parent_block_element(&doc, &styles, span), div);
  }

  #[test]
  fn test_find_text_node_container_prefers_leaf() {
    let (doc, styles) = setup("<body><div><p><b>target text</b> rest</p></div></body>");
    let mut locator = TextLocator::new();
    let body = doc.body().expect("body");
    let b = doc.find_element("b").expect("b");
    assert_eq!(
      locator.find_text_node_container(&doc, &styles, "target text", body),
      b
    );
  }

  #[test]
  fn test_find_text_node_container_duplicates_advance_in_document_order() {
    let (doc, styles) =
      setup("<body><div><p id=\"first\">dup</p><p id=\"second\">dup</p></div></body>");
    let mut locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    let first = doc.element_by_id("first").expect("first");
    let second = doc.element_by_id("second").expect("second");
    assert_eq!(locator.find_text_node_container(&doc, &styles, "dup", div), first);
    assert_eq!(locator.find_text_node_container(&doc, &styles, "dup", div), second);
    // Both consumed: back to the fallback.
    assert_eq!(locator.find_text_node_container(&doc, &styles, "dup", div), div);
  }

  #[test]
  fn test_find_text_node_container_skips_svg() {
    let (doc, styles) = setup(
      "<body><div><svg><text>needle</text></svg><p>needle</p></div></body>",
    );
    let mut locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    let p = doc.find_element("p").expect("p");
    assert_eq!(locator.find_text_node_container(&doc, &styles, "needle", div), p);
  }

  #[test]
  fn test_find_text_node_container_falls_back_to_root() {
    let (doc, styles) = setup("<body><div><p>content</p></div></body>");
    let mut locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    assert_eq!(
      locator.find_text_node_container(&doc, &styles, "absent", div),
      div
    );
  }

  #[test]
  fn test_find_text_node_container_matches_raw_only_text() {
    // Hidden content is invisible in rendered text but present in raw text.
    let (doc, styles) =
      setup("<body><div><p style=\"display: none\">secret</p></div></body>");
    let mut locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    let p = doc.find_element("p").expect("p");
    assert_eq!(locator.find_text_node_container(&doc, &styles, "secret", div), p);
  }

  #[test]
  fn test_sentence_offset_advances_through_occurrences() {
    let (doc, styles) = setup("<body><p>say hi. say hi.</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let first = locator
      .sentence_offset(&doc, &styles, "say hi.", p)
      .expect("first");
    assert_eq!((first.start_index, first.end_index), (0, 7));
    let second = locator
      .sentence_offset(&doc, &styles, "say hi.", p)
      .expect("second");
    assert_eq!((second.start_index, second.end_index), (8, 15));
    assert!(locator.sentence_offset(&doc, &styles, "say hi.", p).is_none());
  }

  #[test]
  fn test_sentence_offset_miss_does_not_consume() {
    let (doc, styles) = setup("<body><p>only once</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    assert!(locator.sentence_offset(&doc, &styles, "absent", p).is_none());
    assert!(locator
      .sentence_offset(&doc, &styles, "only once", p)
      .is_some());
  }

  #[test]
  fn test_clear_resets_occurrence_counters() {
    let (doc, styles) = setup("<body><p>say hi.</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    assert!(locator.sentence_offset(&doc, &styles, "say hi.", p).is_some());
    assert!(locator.sentence_offset(&doc, &styles, "say hi.", p).is_none());
    locator.clear();
    assert!(locator.sentence_offset(&doc, &styles, "say hi.", p).is_some());
  }

  #[test]
  fn test_find_range_text_nodes_single_node() {
    let (doc, styles) = setup("<body><p>Hello world. Foo bar.</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = TextOffsets::new(13, 21);
    let (start, end) = locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("range");
    let node = doc.text_nodes_under(p)[0];
    assert_eq!(start, RangeBoundary { node, offset: 13 });
    assert_eq!(end, RangeBoundary { node, offset: 21 });
  }

  #[test]
  fn test_find_range_text_nodes_across_nodes() {
    let (doc, styles) = setup("<body><p>Hello <b>world</b></p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = locator
      .sentence_offset(&doc, &styles, "world", p)
      .expect("offset");
    assert_eq!((sentence.start_index, sentence.end_index), (6, 11));
    let (start, end) = locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("range");
    let nodes = doc.text_nodes_under(p);
    assert_eq!(start, RangeBoundary { node: nodes[1], offset: 0 });
    assert_eq!(end, RangeBoundary { node: nodes[1], offset: 5 });
  }

  #[test]
  fn test_find_range_text_nodes_applies_corrections() {
    // The script text sits in raw text but not rendered text.
    let (doc, styles) =
      setup("<body><p>First<script>xx</script>Second</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = locator
      .sentence_offset(&doc, &styles, "Second", p)
      .expect("offset");
    assert_eq!(sentence.start_index, 5);
    let (start, end) = locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("range");
    let nodes = doc.text_nodes_under(p);
    // nodes: "First", "xx", "Second"
    assert_eq!(start, RangeBoundary { node: nodes[2], offset: 0 });
    assert_eq!(end, RangeBoundary { node: nodes[2], offset: 6 });
  }

  #[test]
  fn test_find_range_text_nodes_word_offsets_rebase() {
    let (doc, styles) = setup("<body><p>Hello world. Foo bar.</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = TextOffsets::new(13, 21);
    let word = TextOffsets::new(0, 3);
    let (start, end) = locator
      .find_range_text_nodes(&doc, &styles, p, sentence, Some(word))
      .expect("range");
    let node = doc.text_nodes_under(p)[0];
    // "Foo" within "Foo bar.".
    assert_eq!(start, RangeBoundary { node, offset: 13 });
    assert_eq!(end, RangeBoundary { node, offset: 16 });
  }

  #[test]
  fn test_find_range_text_nodes_out_of_bounds() {
    let (doc, styles) = setup("<body><p>short</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = TextOffsets::new(2, 99);
    assert!(locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .is_none());
  }

  #[test]
  fn test_find_range_text_nodes_across_block_boundary_strip() {
    // Rendered text of the div contains a newline between paragraphs; the
    // sentence offsets are found against the stripped view.
    let (doc, styles) =
      setup("<body><div><p>Hello world.</p><p>Foo bar.</p></div></body>");
    let mut locator = TextLocator::new();
    let div = doc.find_element("div").expect("div");
    let sentence = locator
      .sentence_offset(&doc, &styles, "Foo bar.", div)
      .expect("offset");
    assert_eq!((sentence.start_index, sentence.end_index), (12, 20));
    let (start, end) = locator
      .find_range_text_nodes(&doc, &styles, div, sentence, None)
      .expect("range");
    let nodes = doc.text_nodes_under(div);
    assert_eq!(start, RangeBoundary { node: nodes[1], offset: 0 });
    assert_eq!(end, RangeBoundary { node: nodes[1], offset: 8 });
  }

  #[test]
  fn test_correction_table_is_cached_per_container() {
    let (doc, styles) = setup("<body><p>some text here</p></body>");
    let mut locator = TextLocator::new();
    let p = doc.find_element("p").expect("p");
    let sentence = TextOffsets::new(0, 4);
    locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("first");
    locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("second");
    assert_eq!(locator.correction_scans, 1);
    locator.clear();
    locator
      .find_range_text_nodes(&doc, &styles, p, sentence, None)
      .expect("after clear");
    assert_eq!(locator.correction_scans, 2);
  }
}
