use crate::parsers::text;
use crate::results::{ElementKind, ElementView, PageSnapshot};
use scraper::{ElementRef, Html, Selector};

/// Tags kept in a snapshot, in the order the browser would report them
pub const CONTENT_SELECTOR: &str = "h1, h2, h3, p, li, a, img, button";

/// Subtrees that never render as text
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Elements laid out on their own line, so their text never runs into a neighbour's
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Parses a rendered DOM serialization into a snapshot
pub fn parse(html: &str) -> PageSnapshot {
    let doc = Html::parse_document(html);

    let title = extract_title(&doc);
    let description = extract_description(&doc);
    let elements = extract_elements(&doc);

    ::log::debug!(
        "HTML parser kept {} content elements (title: {:?})",
        elements.len(),
        title
    );

    PageSnapshot::new(title, description, elements)
}

/// Returns the document title with whitespace collapsed, or an empty string
pub fn extract_title(doc: &Html) -> String {
    let title_selector = Selector::parse("title").unwrap();
    doc.select(&title_selector)
        .next()
        .map(|e| text::normalize_fragments(e.text()))
        .unwrap_or_default()
}

/// Returns the `content` of `<meta name="description">`, or an empty string
pub fn extract_description(doc: &Html) -> String {
    let meta_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    doc.select(&meta_selector)
        .next()
        .and_then(|e| e.value().attr("content"))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Collects the content-bearing elements in document order
pub fn extract_elements(doc: &Html) -> Vec<ElementView> {
    let content_selector = Selector::parse(CONTENT_SELECTOR).unwrap();
    doc.select(&content_selector)
        .filter_map(element_view)
        .collect()
}

fn element_view(element: ElementRef<'_>) -> Option<ElementView> {
    let kind = ElementKind::from_tag(element.value().name())?;
    let view = match kind {
        ElementKind::Image => ElementView::image(attr(&element, "src"), attr(&element, "alt")),
        ElementKind::Link => ElementView::link(visible_text(element), attr(&element, "href")),
        _ => ElementView {
            kind,
            text: visible_text(element),
            target: None,
            alt: None,
        },
    };

    Some(view)
}

/// Text a reader would see for `element`, whitespace collapsed
///
/// Line breaks and block-level children separate words; script, style and
/// template contents are skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);
    text::normalize(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(fragment) = child.value().as_text() {
            out.push_str(fragment);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        if HIDDEN_TAGS.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push(' ');
            continue;
        }

        let block = BLOCK_TAGS.contains(&name);
        if block {
            out.push(' ');
        }
        push_visible_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).map(str::trim)
}
