//! Render a single web page and stream its text and images as a zip archive.

pub mod archive;
pub mod config;
pub mod content;
pub mod error;
pub mod images;
pub mod parsers;
pub mod pipeline;
pub mod renderers;
pub mod results;
pub mod server;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use config::{ArchiverConfig, ConfigError};
pub use error::{ArchiveError, ImageFetchError, RenderCause, RenderError};
pub use pipeline::{ArchiveSummary, Archiver, PipelineState, PreparedPage};
pub use renderers::{Renderer, WebDriverRenderer};
pub use results::{ElementKind, ElementView, PageSnapshot};
