//! Edge cases for the annotation pass

use vl_dom::DomTree;
use vl_highlight::{
    Annotator, HighlightConfig, HighlightContext, PatternBuilder, RootWordSet, markers,
};
use vl_html::{HtmlParser, inner_html};

fn refreshed(html: &str, words: &[&str]) -> (vl_dom::Document, HighlightContext) {
    let mut doc = HtmlParser::new().parse(html).unwrap();
    let body = doc.body();
    let mut ctx = HighlightContext::with_words(HighlightConfig::default(), words.iter());
    ctx.refresh(doc.tree_mut(), body);
    (doc, ctx)
}

#[test]
fn test_script_and_style_are_not_scanned() {
    let (doc, ctx) = refreshed(
        "<p>cat</p><script>var cat = 1;</script><style>.cat { color: red }</style><noscript>cat</noscript>",
        &["cat"],
    );
    let html = inner_html(doc.tree(), doc.body());
    assert!(html.contains("<script>var cat = 1;</script>"));
    assert!(html.contains("<style>.cat { color: red }</style>"));
    assert_eq!(markers(doc.tree(), doc.body(), ctx.config()).len(), 1);
}

#[test]
fn test_overlay_ui_is_not_scanned() {
    let (doc, ctx) = refreshed(
        r#"<p>cat</p><div class="lv-tooltip"><b>cat</b> means a small feline</div><button class="lv-translation-button">cat</button>"#,
        &["cat"],
    );
    assert_eq!(markers(doc.tree(), doc.body(), ctx.config()).len(), 1);
}

#[test]
fn test_preexisting_marker_is_replaced_not_nested() {
    let page = r#"<p><span class="lv-highlighted-word" data-word="cat" style="background-color: red">cat</span> and a dog</p>"#;
    let (doc, ctx) = refreshed(page, &["cat", "dog"]);
    let hits = markers(doc.tree(), doc.body(), ctx.config());
    assert_eq!(hits.len(), 2);
    let html = inner_html(doc.tree(), doc.body());
    assert!(!html.contains("background-color: red"));
}

#[test]
fn test_match_split_across_elements_is_not_joined() {
    let (doc, ctx) = refreshed("<p>ca<b>t</b></p>", &["cat"]);
    assert!(markers(doc.tree(), doc.body(), ctx.config()).is_empty());
}

#[test]
fn test_punctuation_and_case_boundaries() {
    let (doc, ctx) = refreshed("<p>(Cat), CAT! cat's \"cats\"</p>", &["cat"]);
    let hits = markers(doc.tree(), doc.body(), ctx.config());
    let shown: Vec<&str> = hits.iter().map(|h| h.display_text.as_str()).collect();
    assert_eq!(shown, vec!["Cat", "CAT", "cat", "cats"]);
    assert!(hits.iter().all(|h| h.root == "cat"));
}

#[test]
fn test_non_ascii_text_is_preserved() {
    let page = "<p>Le café: a cat naïvely running—über fast.</p>";
    let mut doc = HtmlParser::new().parse(page).unwrap();
    let body = doc.body();
    let before = doc.tree().text_content(body);

    let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat", "run"]);
    let report = ctx.refresh(doc.tree_mut(), body);
    assert_eq!(report.markers_created, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(doc.tree().text_content(body), before);
}

#[test]
fn test_detached_text_is_reported_not_rewritten() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let text = tree.create_text("cat");
    tree.append_child(div, text).unwrap();

    let config = HighlightConfig::default();
    let roots: RootWordSet = ["cat"].into_iter().collect();
    let pattern = PatternBuilder::default().build(&roots).unwrap();
    let report = Annotator::new(&config, &roots, &pattern, "yellow").annotate(&mut tree, div);

    assert_eq!(report.text_nodes_scanned, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(report.markers_created, 0);
    assert_eq!(tree.child_ids(div), vec![text]);
}

#[test]
fn test_attribute_values_are_escaped_in_output() {
    let mut doc = HtmlParser::new().parse("<p>cat</p>").unwrap();
    let body = doc.body();
    let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat"]);
    ctx.apply(vl_highlight::HighlightEvent::ColorChanged("\"><script>".into()));
    ctx.refresh(doc.tree_mut(), body);

    let html = inner_html(doc.tree(), body);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&quot;&gt;&lt;script&gt;"));
}

#[test]
fn test_large_word_set_compiles() {
    let words: Vec<String> = (0..500).map(|i| format!("word{i}x")).collect();
    let roots: RootWordSet = words.iter().collect();
    let pattern = PatternBuilder::default().build(&roots).unwrap();
    assert!(!pattern.is_noop());
    let spans = pattern.scan("see word42x and word499xes", &roots);
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].attribution.root, "word499x");
}

#[test]
fn test_very_deep_nesting_is_walked() {
    let mut tree = DomTree::new();
    let body = tree.create_element("body");
    tree.append_child(tree.root(), body).unwrap();
    let mut parent = body;
    for _ in 0..10_000 {
        let div = tree.create_element("div");
        tree.append_child(parent, div).unwrap();
        parent = div;
    }
    let text = tree.create_text("a cat");
    tree.append_child(parent, text).unwrap();

    let config = HighlightConfig::default();
    let mut ctx = HighlightContext::with_words(config.clone(), ["cat"]);
    let report = ctx.refresh(&mut tree, body);
    assert_eq!(report.markers_created, 1);
    assert_eq!(report.errors, 0);

    let report = ctx.refresh(&mut tree, body);
    assert_eq!(report.markers_created, 1);
    assert_eq!(markers(&tree, body, &config).len(), 1);
    assert_eq!(tree.text_content(body), "a cat");
}
