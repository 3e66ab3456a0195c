use super::*;
use crate::results::{ElementView, PageSnapshot};

#[test]
fn test_end_to_end_document() {
    let snapshot = PageSnapshot::new(
        "Home".to_string(),
        "Welcome".to_string(),
        vec![ElementView::heading(1, "Hi"), ElementView::paragraph("Text")],
    );
    assert_eq!(
        serialize(&snapshot),
        "# Home\n\nWelcome\n\n## Content\n\n# Hi\n\nText\n\n"
    );
}

#[test]
fn test_empty_description_leaves_blank_line() {
    let snapshot = PageSnapshot::new("T".to_string(), String::new(), Vec::new());
    assert_eq!(serialize(&snapshot), "# T\n\n\n\n## Content\n\n");
}

#[test]
fn test_heading_levels_map_to_hashes() {
    let elements = [
        ElementView::heading(1, "One"),
        ElementView::heading(2, "Two"),
        ElementView::heading(3, "Three"),
    ];
    assert_eq!(
        render_body(&blocks(&elements)),
        "# One\n\n## Two\n\n### Three\n\n"
    );
}

#[test]
fn test_consecutive_list_items_have_no_blank_line() {
    let elements = [
        ElementView::paragraph("Intro"),
        ElementView::list_item("a"),
        ElementView::list_item("b"),
        ElementView::paragraph("Outro"),
    ];
    assert_eq!(
        render_body(&blocks(&elements)),
        "Intro\n\n- a\n- b\nOutro\n\n"
    );
}

#[test]
fn test_links_and_images() {
    let elements = [
        ElementView::link("Docs", Some("https://example.com/docs")),
        ElementView::image(Some("https://example.com/a.png"), Some("Logo")),
        ElementView::image(Some("/rel.png"), None),
    ];
    assert_eq!(
        render_body(&blocks(&elements)),
        "[Docs](https://example.com/docs)\n\n\
         ![Logo](https://example.com/a.png)\n\n\
         ![Image](/rel.png)\n\n"
    );
}

#[test]
fn test_skip_conditions() {
    let elements = [
        ElementView::image(None, Some("no source")),
        ElementView::image(Some(""), None),
        ElementView::link("", Some("https://example.com")),
        ElementView::link("No href", None),
        ElementView::heading(2, ""),
        ElementView::list_item(""),
        ElementView::paragraph(""),
        ElementView::button(""),
    ];
    assert!(blocks(&elements).is_empty());
}

#[test]
fn test_button_renders_as_plain_text() {
    let elements = [ElementView::button("Sign up")];
    assert_eq!(
        blocks(&elements),
        vec![ContentBlock::Paragraph("Sign up".to_string())]
    );
}
