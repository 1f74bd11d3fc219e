//! DOM representation and HTML parsing
//!
//! This module owns the document tree the rest of the engine works against.
//! HTML is parsed with `html5ever` into an arena: a flat `Vec` of nodes
//! addressed by `NodeId`. Ids are assigned in document pre-order starting at
//! 1; id 0 is reserved as "no node" so parent links and selection endpoints
//! can stay plain integers.
//!
//! # Architecture
//!
//! - `parse_html` drives html5ever with scripting disabled and converts the
//!   resulting `RcDom` into the arena in a single walk. Comments, doctypes,
//!   and processing instructions are dropped. Template contents stay out of
//!   the child list (html5ever parks them on the template element; we do not
//!   re-attach them).
//! - Elements keep their attributes as parsed plus a separate list of inline
//!   style declarations, split out of the `style` attribute once at load
//!   time. All later style mutation goes through the declaration list.
//! - `SelectionRange` is the engine's analog of a DOM `Range`: two
//!   (text node, byte offset) endpoints.
//!
//! All text offsets in this crate are byte offsets into UTF-8 strings.

use crate::error::{Error, ParseError, Result};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use std::io;

/// Identifier of a node in a [`Document`] arena.
///
/// Ids are 1-based; 0 means "no node" (e.g. the parent of the root).
pub type NodeId = usize;

/// The id used for absent node references.
pub const NO_NODE: NodeId = 0;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Payload of a single DOM node.
#[derive(Debug, Clone, PartialEq)]
pub enum DomData {
  /// The document root.
  Document,
  /// An element node.
  Element {
    /// Lowercase tag name (html5ever lowercases HTML tags during parsing)
    tag_name: String,
    /// Element namespace; empty for HTML elements
    namespace: String,
    /// Attributes in source order
    attributes: Vec<(String, String)>,
    /// Inline style declarations, parsed from the `style` attribute.
    /// Programmatic style mutation happens here, not in `attributes`.
    style: Vec<(String, String)>,
  },
  /// A text node.
  Text { content: String },
}

/// A node in the arena: tree links plus payload.
#[derive(Debug, Clone)]
pub struct DomNode {
  /// This node's id (index into the arena)
  pub id: NodeId,
  /// Parent id, or [`NO_NODE`] for the root
  pub parent: NodeId,
  /// Child ids in document order
  pub children: Vec<NodeId>,
  /// Node payload
  pub data: DomData,
}

/// An owned HTML document.
///
/// # Examples
///
/// ```
/// use overmark::dom::parse_html;
///
/// let doc = parse_html("<p>Hello</p>").expect("parse");
/// let body = doc.body().expect("body");
/// assert_eq!(doc.tag_name(body), Some("body"));
/// ```
pub struct Document {
  nodes: Vec<DomNode>,
}

/// Two (text node, byte offset) endpoints, in document order.
///
/// The engine's analog of a DOM `Range` whose boundaries sit inside text
/// nodes. Offsets are byte offsets into the text node's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRange {
  pub start_node: NodeId,
  pub start_offset: usize,
  pub end_node: NodeId,
  pub end_offset: usize,
}

impl SelectionRange {
  pub fn new(start_node: NodeId, start_offset: usize, end_node: NodeId, end_offset: usize) -> Self {
    Self {
      start_node,
      start_offset,
      end_node,
      end_offset,
    }
  }

  /// Returns true if both endpoints sit in the same text node.
  pub fn is_within_one_node(&self) -> bool {
    self.start_node == self.end_node
  }

  /// The deepest node containing both endpoints.
  pub fn common_ancestor(&self, doc: &Document) -> NodeId {
    doc.common_ancestor(self.start_node, self.end_node)
  }
}

/// Parses HTML into a [`Document`].
///
/// Parsing uses html5ever with scripting disabled, so `<noscript>` content
/// is kept. The parser recovers from malformed markup the way browsers do;
/// only I/O-level failures surface as errors.
///
/// # Examples
///
/// ```
/// use overmark::dom::parse_html;
///
/// let doc = parse_html("<div id='x'>text</div>").expect("parse");
/// assert!(doc.element_by_id("x").is_some());
/// ```
pub fn parse_html(html: &str) -> Result<Document> {
  let opts = ParseOpts {
    tree_builder: TreeBuilderOpts {
      scripting_enabled: false,
      ..Default::default()
    },
    ..Default::default()
  };

  let mut reader = io::Cursor::new(html.as_bytes());
  let rcdom = parse_document(RcDom::default(), opts)
    .from_utf8()
    .read_from(&mut reader)
    .map_err(|e| {
      Error::Parse(ParseError::InvalidHtml {
        message: format!("Failed to parse HTML: {}", e),
        line: 0,
      })
    })?;

  let mut doc = Document {
    // Slot 0 is a sentinel so id 0 can mean "no node".
    nodes: vec![DomNode {
      id: NO_NODE,
      parent: NO_NODE,
      children: Vec::new(),
      data: DomData::Document,
    }],
  };
  convert_handle(&rcdom.document, NO_NODE, &mut doc);
  Ok(doc)
}

/// Converts one rcdom handle (and its subtree) into the arena.
///
/// Returns the assigned id, or None for node kinds the engine drops.
fn convert_handle(handle: &Handle, parent: NodeId, doc: &mut Document) -> Option<NodeId> {
  let data = match &handle.data {
    RcNodeData::Document => DomData::Document,
    RcNodeData::Element { name, attrs, .. } => {
      let namespace = if name.ns.as_ref() == "http://www.w3.org/1999/xhtml" {
        String::new()
      } else {
        name.ns.to_string()
      };
      let attrs_ref = attrs.borrow();
      let mut attributes = Vec::with_capacity(attrs_ref.len());
      for attr in attrs_ref.iter() {
        attributes.push((attr.name.local.to_string(), attr.value.to_string()));
      }
      let style = attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("style"))
        .map(|(_, v)| parse_style_declarations(v))
        .unwrap_or_default();
      DomData::Element {
        tag_name: name.local.to_string(),
        namespace,
        attributes,
        style,
      }
    }
    RcNodeData::Text { contents } => DomData::Text {
      content: contents.borrow().to_string(),
    },
    // Comments, doctypes, and processing instructions carry no geometry.
    _ => return None,
  };

  let id = doc.nodes.len();
  doc.nodes.push(DomNode {
    id,
    parent,
    children: Vec::new(),
    data,
  });

  let children_ref = handle.children.borrow();
  for child in children_ref.iter() {
    if let Some(child_id) = convert_handle(child, id, doc) {
      doc.nodes[id].children.push(child_id);
    }
  }
  Some(id)
}

/// Splits a `style` attribute into (property, value) declarations.
fn parse_style_declarations(css_text: &str) -> Vec<(String, String)> {
  let mut out = Vec::new();
  for declaration in css_text.split(';') {
    let Some((name, value)) = declaration.split_once(':') else {
      continue;
    };
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
      continue;
    }
    out.push((name.to_string(), value.to_string()));
  }
  out
}

/// Property name comparison for the declaration list.
///
/// Standard property names are ASCII case-insensitive; custom properties
/// (`--*`) are case-sensitive per css-variables.
fn style_name_matches(actual: &str, expected: &str) -> bool {
  if expected.starts_with("--") {
    actual == expected
  } else {
    actual.eq_ignore_ascii_case(expected)
  }
}

impl Document {
  /// The root (document) node id.
  pub fn root(&self) -> NodeId {
    1
  }

  /// Number of nodes, counting the unused sentinel slot.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.len() <= 1
  }

  /// Borrows a node. Panics on out-of-range ids; callers hold ids handed
  /// out by this document.
  pub fn node(&self, id: NodeId) -> &DomNode {
    &self.nodes[id]
  }

  pub fn get(&self, id: NodeId) -> Option<&DomNode> {
    if id == NO_NODE {
      return None;
    }
    self.nodes.get(id)
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    let parent = self.nodes[id].parent;
    if parent == NO_NODE {
      None
    } else {
      Some(parent)
    }
  }

  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.nodes[id].children
  }

  pub fn is_element(&self, id: NodeId) -> bool {
    matches!(self.nodes[id].data, DomData::Element { .. })
  }

  pub fn is_text(&self, id: NodeId) -> bool {
    matches!(self.nodes[id].data, DomData::Text { .. })
  }

  pub fn tag_name(&self, id: NodeId) -> Option<&str> {
    match &self.nodes[id].data {
      DomData::Element { tag_name, .. } => Some(tag_name),
      _ => None,
    }
  }

  /// Returns true for `<svg>` roots and anything parsed in the SVG
  /// namespace.
  pub fn is_svg(&self, id: NodeId) -> bool {
    match &self.nodes[id].data {
      DomData::Element {
        tag_name,
        namespace,
        ..
      } => tag_name == "svg" || namespace == SVG_NAMESPACE,
      _ => false,
    }
  }

  pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
    match &self.nodes[id].data {
      DomData::Element { attributes, .. } => attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str()),
      _ => None,
    }
  }

  /// Text content of a text node.
  pub fn text(&self, id: NodeId) -> Option<&str> {
    match &self.nodes[id].data {
      DomData::Text { content } => Some(content),
      _ => None,
    }
  }

  /// The `<body>` element, if the document has one.
  pub fn body(&self) -> Option<NodeId> {
    self.find_element("body")
  }

  /// First element with the given tag name, in document order.
  pub fn find_element(&self, tag: &str) -> Option<NodeId> {
    self
      .descendants(self.root())
      .find(|&id| self.tag_name(id) == Some(tag))
  }

  /// First element whose `id` attribute equals `value`.
  pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
    self
      .descendants(self.root())
      .find(|&id| self.attribute(id, "id") == Some(value))
  }

  /// Pre-order iterator over `from` and all its descendants.
  pub fn descendants(&self, from: NodeId) -> Descendants<'_> {
    Descendants {
      doc: self,
      stack: vec![from],
    }
  }

  /// Iterator over the parent chain of `id`, nearest first. Does not yield
  /// `id` itself.
  pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
    Ancestors { doc: self, at: id }
  }

  /// Returns true if `node` is `ancestor` or sits inside its subtree.
  pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
    if ancestor == node {
      return true;
    }
    self.ancestors(node).any(|a| a == ancestor)
  }

  /// The deepest node that contains both `a` and `b`.
  pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
    if a == b {
      return a;
    }
    let mut seen = vec![a];
    seen.extend(self.ancestors(a));
    let mut candidate = b;
    loop {
      if seen.contains(&candidate) {
        return candidate;
      }
      match self.parent(candidate) {
        Some(parent) => candidate = parent,
        None => return self.root(),
      }
    }
  }

  /// Text node ids under `container`, in document order.
  pub fn text_nodes_under(&self, container: NodeId) -> Vec<NodeId> {
    self
      .descendants(container)
      .filter(|&id| self.is_text(id))
      .collect()
  }

  // Inline style declarations

  /// Reads one inline style declaration.
  pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
    match &self.nodes[id].data {
      DomData::Element { style, .. } => style
        .iter()
        .find(|(k, _)| style_name_matches(k, name))
        .map(|(_, v)| v.as_str()),
      _ => None,
    }
  }

  /// Sets one inline style declaration, replacing any existing value.
  pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
    if let DomData::Element { style, .. } = &mut self.nodes[id].data {
      if let Some(slot) = style.iter_mut().find(|(k, _)| style_name_matches(k, name)) {
        slot.1 = value.to_string();
      } else {
        style.push((name.to_string(), value.to_string()));
      }
    }
  }

  /// Removes one inline style declaration if present.
  pub fn remove_style_property(&mut self, id: NodeId, name: &str) {
    if let DomData::Element { style, .. } = &mut self.nodes[id].data {
      style.retain(|(k, _)| !style_name_matches(k, name));
    }
  }

  /// Serializes the inline style declarations back to CSS text.
  pub fn style_css_text(&self, id: NodeId) -> String {
    match &self.nodes[id].data {
      DomData::Element { style, .. } => style
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("; "),
      _ => String::new(),
    }
  }
}

/// Pre-order traversal over a subtree. See [`Document::descendants`].
pub struct Descendants<'a> {
  doc: &'a Document,
  stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let id = self.stack.pop()?;
    let children = self.doc.children(id);
    // Reverse push keeps document order on pop.
    for &child in children.iter().rev() {
      self.stack.push(child);
    }
    Some(id)
  }
}

/// Parent-chain traversal. See [`Document::ancestors`].
pub struct Ancestors<'a> {
  doc: &'a Document,
  at: NodeId,
}

impl<'a> Iterator for Ancestors<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let parent = self.doc.parent(self.at)?;
    self.at = parent;
    Some(parent)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_basic_document() {
    let doc = parse_html("<!doctype html><html><body><p>Hello</p></body></html>").expect("parse");
    let body = doc.body().expect("body present");
    assert_eq!(doc.tag_name(body), Some("body"));
    let p = doc.find_element("p").expect("p present");
    assert!(doc.contains(body, p));
  }

  #[test]
  fn test_ids_are_preorder_and_one_based() {
    let doc = parse_html("<p>a<span>b</span></p>").expect("parse");
    assert_eq!(doc.root(), 1);
    let order: Vec<NodeId> = doc.descendants(doc.root()).collect();
    // Pre-order ids are exactly the push order.
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);
    assert_eq!(order[0], 1);
    assert!(!order.contains(&NO_NODE));
  }

  #[test]
  fn test_parse_preserves_text_content() {
    let doc = parse_html("<p>Hello &amp; goodbye</p>").expect("parse");
    let p = doc.find_element("p").expect("p");
    let text = doc.children(p)[0];
    assert_eq!(doc.text(text), Some("Hello & goodbye"));
  }

  #[test]
  fn test_comments_and_doctype_are_dropped() {
    let doc = parse_html("<!doctype html><p><!-- note -->x</p>").expect("parse");
    let p = doc.find_element("p").expect("p");
    assert_eq!(doc.children(p).len(), 1);
    assert!(doc.is_text(doc.children(p)[0]));
  }

  #[test]
  fn test_template_contents_stay_out_of_the_tree() {
    let doc = parse_html("<div><template><p>hidden</p></template>visible</div>").expect("parse");
    let template = doc.find_element("template").expect("template");
    assert!(doc.children(template).is_empty());
  }

  #[test]
  fn test_noscript_content_kept_without_scripting() {
    let doc = parse_html("<body><noscript><p>fallback</p></noscript></body>").expect("parse");
    let noscript = doc.find_element("noscript").expect("noscript");
    assert!(!doc.children(noscript).is_empty());
  }

  #[test]
  fn test_attribute_lookup_is_case_insensitive() {
    let doc = parse_html("<div ID='x' data-k='v'></div>").expect("parse");
    let div = doc.find_element("div").expect("div");
    assert_eq!(doc.attribute(div, "id"), Some("x"));
    assert_eq!(doc.attribute(div, "data-k"), Some("v"));
    assert_eq!(doc.attribute(div, "missing"), None);
  }

  #[test]
  fn test_element_by_id() {
    let doc = parse_html("<p id='a'>1</p><p id='b'>2</p>").expect("parse");
    let b = doc.element_by_id("b").expect("found");
    assert_eq!(doc.tag_name(b), Some("p"));
    assert!(doc.element_by_id("c").is_none());
  }

  #[test]
  fn test_svg_detection() {
    let doc = parse_html("<div><svg><rect/></svg></div>").expect("parse");
    let svg = doc.find_element("svg").expect("svg");
    assert!(doc.is_svg(svg));
    let div = doc.find_element("div").expect("div");
    assert!(!doc.is_svg(div));
  }

  #[test]
  fn test_style_attribute_parsed_into_declarations() {
    let doc =
      parse_html("<p style='color: red; font-size: 20px; ; bogus'>x</p>").expect("parse");
    let p = doc.find_element("p").expect("p");
    assert_eq!(doc.style_property(p, "color"), Some("red"));
    assert_eq!(doc.style_property(p, "font-size"), Some("20px"));
    assert_eq!(doc.style_property(p, "bogus"), None);
  }

  #[test]
  fn test_style_property_mutation() {
    let mut doc = parse_html("<div style='color: blue'></div>").expect("parse");
    let div = doc.find_element("div").expect("div");

    doc.set_style_property(div, "background-image", "none");
    assert_eq!(doc.style_property(div, "background-image"), Some("none"));

    doc.set_style_property(div, "color", "green");
    assert_eq!(doc.style_property(div, "color"), Some("green"));

    doc.remove_style_property(div, "color");
    assert_eq!(doc.style_property(div, "color"), None);
  }

  #[test]
  fn test_custom_properties_are_case_sensitive() {
    let mut doc = parse_html("<div></div>").expect("parse");
    let div = doc.find_element("div").expect("div");
    doc.set_style_property(div, "--highlightWordPos", "0px 0px 10px 10px");
    assert_eq!(doc.style_property(div, "--highlightwordpos"), None);
    assert!(doc.style_property(div, "--highlightWordPos").is_some());
  }

  #[test]
  fn test_style_css_text_round_trip() {
    let mut doc = parse_html("<div style='color: red'></div>").expect("parse");
    let div = doc.find_element("div").expect("div");
    doc.set_style_property(div, "--x", "1");
    assert_eq!(doc.style_css_text(div), "color: red; --x: 1");
  }

  #[test]
  fn test_common_ancestor() {
    let doc = parse_html("<div><p><b>a</b></p><p>b</p></div>").expect("parse");
    let div = doc.find_element("div").expect("div");
    let b = doc.find_element("b").expect("b");
    let ps: Vec<NodeId> = doc
      .descendants(doc.root())
      .filter(|&id| doc.tag_name(id) == Some("p"))
      .collect();
    assert_eq!(ps.len(), 2);
    assert_eq!(doc.common_ancestor(b, ps[1]), div);
    assert_eq!(doc.common_ancestor(b, b), b);
    let b_text = doc.children(b)[0];
    assert_eq!(doc.common_ancestor(b_text, b), b);
  }

  #[test]
  fn test_text_nodes_under_in_document_order() {
    let doc = parse_html("<div>a<span>b</span>c</div>").expect("parse");
    let div = doc.find_element("div").expect("div");
    let texts = doc.text_nodes_under(div);
    let contents: Vec<&str> = texts.iter().map(|&id| doc.text(id).unwrap()).collect();
    assert_eq!(contents, vec!["a", "b", "c"]);
  }

  #[test]
  fn test_selection_range_common_ancestor() {
    let doc = parse_html("<p><b>one</b> two</p>").expect("parse");
    let b = doc.find_element("b").expect("b");
    let p = doc.find_element("p").expect("p");
    let b_text = doc.children(b)[0];
    let tail = doc.children(p)[1];
    let range = SelectionRange::new(b_text, 0, tail, 4);
    assert_eq!(range.common_ancestor(&doc), p);
    assert!(!range.is_within_one_node());
  }
}
