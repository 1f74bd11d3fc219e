use overmark::dom::{parse_html, Document};
use overmark::layout::Layout;
use overmark::locate::TextLocator;
use overmark::style::ComputedStyles;
use overmark::text::FixedAdvanceMetrics;
use overmark::Highlighter;

fn setup(html: &str) -> (Document, ComputedStyles, Layout) {
  let doc = parse_html(html).expect("parse");
  let styles = ComputedStyles::resolve(&doc);
  let layout =
    Layout::compute(&doc, &styles, 800.0, &FixedAdvanceMetrics::default()).expect("layout");
  (doc, styles, layout)
}

const TWO_PARAGRAPHS: &str = "<body>\
<p style='line-height: 20px'>Same words here.</p>\
<p style='line-height: 20px'>Same words here.</p>\
</body>";

#[test]
fn repeated_highlights_advance_through_duplicates_in_document_order() {
  let (mut doc, styles, layout) = setup(TWO_PARAGRAPHS);
  let body = doc.body().expect("body");
  let paragraphs: Vec<_> = doc
    .children(body)
    .iter()
    .copied()
    .filter(|&child| doc.tag_name(child) == Some("p"))
    .collect();
  assert_eq!(paragraphs.len(), 2);

  let mut session = Highlighter::default();

  session.highlight_sentence(&mut doc, &styles, &layout, "Same words here.", body, None);
  assert_eq!(session.text_node_container(), Some(paragraphs[0]));
  assert_eq!(session.text_node_block_container(), Some(paragraphs[0]));
  assert!(session.sentence_rects().is_some());
  assert!(doc.style_property(paragraphs[0], "background-image").is_some());

  session.highlight_sentence(&mut doc, &styles, &layout, "Same words here.", body, None);
  assert_eq!(session.text_node_container(), Some(paragraphs[1]));
  assert_eq!(session.text_node_block_container(), Some(paragraphs[1]));
  assert!(session.sentence_rects().is_some());
  // The new highlight lives on the second paragraph; rects are relative to
  // it, so both resolutions start at its own top-left corner.
  assert_eq!(session.sentence_rects().expect("rects")[0].y(), 0.0);
  assert!(doc.style_property(paragraphs[1], "background-image").is_some());
}

#[test]
fn rewind_starts_over_from_the_first_duplicate() {
  let (mut doc, styles, layout) = setup(TWO_PARAGRAPHS);
  let body = doc.body().expect("body");

  let mut session = Highlighter::default();
  session.highlight_sentence(&mut doc, &styles, &layout, "Same words here.", body, None);
  let first_container = session.text_node_container();
  session.highlight_sentence(&mut doc, &styles, &layout, "Same words here.", body, None);
  assert_ne!(session.text_node_container(), first_container);

  session.rewind();
  session.highlight_sentence(&mut doc, &styles, &layout, "Same words here.", body, None);
  assert_eq!(session.text_node_container(), first_container);
}

#[test]
fn duplicates_inside_one_container_advance_by_occurrence() {
  let (doc, styles, _) =
    setup("<body><p>Echo echo. Then Echo echo. again.</p></body>");
  let p = doc.find_element("p").expect("p");

  let mut locator = TextLocator::new();
  let container = locator.find_text_node_container(&doc, &styles, "Echo echo.", p);
  let first = locator
    .sentence_offset(&doc, &styles, "Echo echo.", container)
    .expect("first");
  let container = locator.find_text_node_container(&doc, &styles, "Echo echo.", p);
  let second = locator
    .sentence_offset(&doc, &styles, "Echo echo.", container)
    .expect("second");

  assert_eq!(first.start_index, 0);
  assert_eq!(second.start_index, 16);
  assert!(locator
    .sentence_offset(&doc, &styles, "Echo echo.", container)
    .is_none());
}

#[test]
fn distinct_sentences_keep_independent_counters() {
  let (doc, styles, _) = setup("<body><p>Alpha. Beta. Alpha.</p></body>");
  let p = doc.find_element("p").expect("p");

  let mut locator = TextLocator::new();
  let alpha_first = locator
    .sentence_offset(&doc, &styles, "Alpha.", p)
    .expect("alpha");
  // The Beta lookup must not disturb Alpha's counter.
  let beta = locator.sentence_offset(&doc, &styles, "Beta.", p).expect("beta");
  let alpha_second = locator
    .sentence_offset(&doc, &styles, "Alpha.", p)
    .expect("alpha again");

  assert_eq!(alpha_first.start_index, 0);
  assert_eq!(beta.start_index, 7);
  assert_eq!(alpha_second.start_index, 13);
}
