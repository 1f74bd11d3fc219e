//! Rendered and raw text extraction
//!
//! Rendered text is the headless analog of `innerText`: the visible text of a
//! subtree with whitespace runs collapsed to single spaces, leading and
//! trailing whitespace trimmed, a newline at each block boundary, and
//! `display: none` subtrees excluded. Raw text is the analog of
//! `textContent`: the literal concatenation of every descendant text node,
//! hidden or not.
//!
//! The two views diverge exactly where whitespace collapses or hidden
//! subtrees drop out, which is why highlight offsets resolved against
//! rendered text need a correction step before they can index into raw text
//! (see [`crate::locate`]). [`RenderedText`] therefore carries a provenance
//! entry per rendered character pointing back at the text node and raw byte
//! offset that produced it, so layout can translate raw range endpoints into
//! rendered positions and back.
//!
//! All offsets are byte offsets into UTF-8 strings.

use crate::dom::{Document, DomData, NodeId};
use crate::style::ComputedStyles;

/// Maps one rendered character back to its source text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
  /// Byte offset of the character in the rendered string.
  pub rendered_offset: usize,
  /// Text node that produced the character.
  pub node: NodeId,
  /// Byte offset of the source character within the text node's content.
  ///
  /// A collapsed whitespace run points at its first whitespace character.
  pub raw_offset: usize,
}

/// Rendered text of a subtree with per-character provenance.
///
/// Synthetic characters (block-boundary newlines) carry no provenance entry;
/// every other rendered character has exactly one.
#[derive(Debug, Clone)]
pub struct RenderedText {
  text: String,
  provenance: Vec<Provenance>,
}

impl RenderedText {
  /// Builds the rendered text of the subtree rooted at `root`.
  ///
  /// # Example
  ///
  /// ```rust
  /// use overmark::dom::parse_html;
  /// use overmark::style::ComputedStyles;
  /// use overmark::text::RenderedText;
  ///
  /// let doc = parse_html("<body><p>Hello   world</p><p>Next</p></body>").expect("parse");
  /// let styles = ComputedStyles::resolve(&doc);
  /// let rendered = RenderedText::build(&doc, &styles, doc.body().expect("body"));
  /// assert_eq!(rendered.text(), "Hello world\nNext");
  /// ```
  pub fn build(doc: &Document, styles: &ComputedStyles, root: NodeId) -> RenderedText {
    Self::build_run(doc, styles, &[root])
  }

  /// Builds the rendered text of several sibling subtrees as one flow, in
  /// order. Used by layout for anonymous inline runs between block children.
  pub fn build_run(doc: &Document, styles: &ComputedStyles, roots: &[NodeId]) -> RenderedText {
    let mut builder = Builder {
      out: String::new(),
      provenance: Vec::new(),
      pending_space: None,
      boundary_pending: false,
    };
    for &root in roots {
      builder.walk(doc, styles, root);
    }
    RenderedText {
      text: builder.out,
      provenance: builder.provenance,
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Provenance entries in rendered order, one per non-synthetic character.
  pub fn provenance(&self) -> &[Provenance] {
    &self.provenance
  }

  /// Translates a raw position inside a text node into a rendered position.
  ///
  /// Snaps forward: if the raw offset landed in collapsed whitespace, the
  /// rendered position of the next surviving character is returned. A raw
  /// offset past the node's last surviving character maps to the rendered
  /// position just after that character. Returns `None` when the node
  /// contributed nothing to the rendered text.
  ///
  /// Works for exclusive end offsets as well as start offsets.
  pub fn rendered_offset(&self, node: NodeId, raw_offset: usize) -> Option<usize> {
    let mut last: Option<&Provenance> = None;
    for entry in &self.provenance {
      if entry.node != node {
        continue;
      }
      if entry.raw_offset >= raw_offset {
        return Some(entry.rendered_offset);
      }
      last = Some(entry);
    }
    last.map(|entry| entry.rendered_offset + self.char_len_at(entry.rendered_offset))
  }

  /// The source of the rendered character starting at `rendered_offset`, or
  /// `None` for synthetic characters and non-boundary offsets.
  pub fn source_at(&self, rendered_offset: usize) -> Option<(NodeId, usize)> {
    self
      .provenance
      .binary_search_by(|entry| entry.rendered_offset.cmp(&rendered_offset))
      .ok()
      .map(|i| (self.provenance[i].node, self.provenance[i].raw_offset))
  }

  fn char_len_at(&self, rendered_offset: usize) -> usize {
    self.text[rendered_offset..]
      .chars()
      .next()
      .map(|ch| ch.len_utf8())
      .unwrap_or(0)
  }
}

/// Raw text of the subtree rooted at `root`: every descendant text node
/// concatenated in document order, including hidden and script/style content.
pub fn raw_text(doc: &Document, root: NodeId) -> String {
  let mut out = String::new();
  for id in doc.text_nodes_under(root) {
    if let Some(text) = doc.text(id) {
      out.push_str(text);
    }
  }
  out
}

struct Builder {
  out: String,
  provenance: Vec<Provenance>,
  // First whitespace character of a pending collapsed run.
  pending_space: Option<(NodeId, usize)>,
  boundary_pending: bool,
}

impl Builder {
  fn walk(&mut self, doc: &Document, styles: &ComputedStyles, id: NodeId) {
    match &doc.node(id).data {
      DomData::Document => {
        for &child in doc.children(id) {
          self.walk(doc, styles, child);
        }
      }
      DomData::Element { .. } => {
        let display = styles.get(id).display;
        if display.is_none() {
          return;
        }
        let block = display.is_block_level();
        if block {
          self.mark_block_boundary();
        }
        for &child in doc.children(id) {
          self.walk(doc, styles, child);
        }
        if block {
          self.mark_block_boundary();
        }
      }
      DomData::Text { content } => self.push_text(id, content),
    }
  }

  fn mark_block_boundary(&mut self) {
    self.pending_space = None;
    if !self.out.is_empty() {
      self.boundary_pending = true;
    }
  }

  fn push_text(&mut self, node: NodeId, content: &str) {
    for (raw_offset, ch) in content.char_indices() {
      if ch.is_whitespace() {
        if !self.out.is_empty() && !self.boundary_pending && self.pending_space.is_none() {
          self.pending_space = Some((node, raw_offset));
        }
        continue;
      }
      if self.boundary_pending {
        self.out.push('\n');
        self.boundary_pending = false;
      }
      if let Some((space_node, space_raw)) = self.pending_space.take() {
        self.provenance.push(Provenance {
          rendered_offset: self.out.len(),
          node: space_node,
          raw_offset: space_raw,
        });
        self.out.push(' ');
      }
      self.provenance.push(Provenance {
        rendered_offset: self.out.len(),
        node,
        raw_offset,
      });
      self.out.push(ch);
    }
  }
}
