//! Turns the elements of a snapshot into a markdown-like text document.

use crate::results::{ElementKind, ElementView, PageSnapshot};
use std::fmt::Write;

#[cfg(test)]
mod tests;

/// Alt text used for images that carry none
pub const DEFAULT_ALT: &str = "Image";

/// One unit of serialized text output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Link { text: String, target: String },
    ImageRef { alt: String, source: String },
}

impl ContentBlock {
    /// Builds the block for an element, or `None` when the element has nothing to emit
    pub fn from_element(element: &ElementView) -> Option<Self> {
        let text = non_empty(Some(element.text.as_str())).map(str::to_string);
        match element.kind {
            ElementKind::Image => {
                let source = non_empty(element.target.as_deref())?;
                let alt = non_empty(element.alt.as_deref()).unwrap_or(DEFAULT_ALT);
                Some(ContentBlock::ImageRef {
                    alt: alt.to_string(),
                    source: source.to_string(),
                })
            }
            ElementKind::Link => {
                let target = non_empty(element.target.as_deref())?;
                Some(ContentBlock::Link {
                    text: text?,
                    target: target.to_string(),
                })
            }
            ElementKind::Heading(level) => text.map(|text| ContentBlock::Heading { level, text }),
            ElementKind::ListItem => text.map(ContentBlock::ListItem),
            ElementKind::Paragraph | ElementKind::Button => text.map(ContentBlock::Paragraph),
        }
    }

    /// Writes the block followed by its separator
    ///
    /// List items end with a single newline so consecutive items stay together;
    /// everything else is followed by a blank line.
    pub fn write_to(&self, out: &mut String) {
        // Writing into a String cannot fail
        let _ = match self {
            ContentBlock::Heading { level, text } => {
                write!(out, "{} {}\n\n", "#".repeat(usize::from(*level)), text)
            }
            ContentBlock::Paragraph(text) => write!(out, "{text}\n\n"),
            ContentBlock::ListItem(text) => writeln!(out, "- {text}"),
            ContentBlock::Link { text, target } => write!(out, "[{text}]({target})\n\n"),
            ContentBlock::ImageRef { alt, source } => write!(out, "![{alt}]({source})\n\n"),
        };
    }
}

/// Converts elements into blocks, dropping the ones with nothing to emit
pub fn blocks(elements: &[ElementView]) -> Vec<ContentBlock> {
    elements.iter().filter_map(ContentBlock::from_element).collect()
}

/// Renders the body text for a sequence of blocks
pub fn render_body(blocks: &[ContentBlock]) -> String {
    let mut body = String::new();
    for block in blocks {
        block.write_to(&mut body);
    }
    body
}

/// Assembles the final document around an already rendered body
pub fn render_document(title: &str, description: &str, body: &str) -> String {
    format!("# {title}\n\n{description}\n\n## Content\n\n{body}")
}

/// Serializes a snapshot into the text entry of the archive
pub fn serialize(snapshot: &PageSnapshot) -> String {
    let blocks = blocks(&snapshot.elements);
    ::log::debug!(
        "Serialized {} of {} elements into content blocks",
        blocks.len(),
        snapshot.elements.len()
    );
    render_document(&snapshot.title, &snapshot.description, &render_body(&blocks))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
