use serde::{Deserialize, Serialize};

/// Kind of a content-bearing element kept in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `h1`-`h3`, carrying the level
    Heading(u8),
    Paragraph,
    ListItem,
    Link,
    Image,
    Button,
}

impl ElementKind {
    /// Maps a lowercase tag name to its kind, or `None` for tags that are not kept
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(ElementKind::Heading(1)),
            "h2" => Some(ElementKind::Heading(2)),
            "h3" => Some(ElementKind::Heading(3)),
            "p" => Some(ElementKind::Paragraph),
            "li" => Some(ElementKind::ListItem),
            "a" => Some(ElementKind::Link),
            "img" => Some(ElementKind::Image),
            "button" => Some(ElementKind::Button),
            _ => None,
        }
    }
}

/// One element of a rendered page, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementView {
    pub kind: ElementKind,

    /// Whitespace-normalized text content
    pub text: String,

    /// `href` for links, `src` for images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// `alt` for images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ElementView {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::text_only(ElementKind::Heading(level), text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text_only(ElementKind::Paragraph, text)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::text_only(ElementKind::ListItem, text)
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::text_only(ElementKind::Button, text)
    }

    pub fn link(text: impl Into<String>, href: Option<&str>) -> Self {
        Self {
            kind: ElementKind::Link,
            text: text.into(),
            target: href.map(str::to_string),
            alt: None,
        }
    }

    pub fn image(src: Option<&str>, alt: Option<&str>) -> Self {
        Self {
            kind: ElementKind::Image,
            text: String::new(),
            target: src.map(str::to_string),
            alt: alt.map(str::to_string),
        }
    }

    fn text_only(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            target: None,
            alt: None,
        }
    }
}

/// Fully rendered page, read-only once produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Document title
    pub title: String,

    /// Content of `<meta name="description">`, empty when absent
    pub description: String,

    /// Content-bearing elements in document order
    pub elements: Vec<ElementView>,
}

impl PageSnapshot {
    /// Create a new snapshot
    pub fn new(title: String, description: String, elements: Vec<ElementView>) -> Self {
        Self {
            title,
            description,
            elements,
        }
    }

    /// Image `src` values in document order, including empty or relative ones
    pub fn image_sources(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::Image)
            .filter_map(|e| e.target.as_deref())
    }
}
