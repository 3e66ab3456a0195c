//! Image address collection and download.

pub mod fetch;

#[cfg(test)]
mod tests;

pub use fetch::ImageFetcher;

use std::collections::HashSet;
use url::Url;

/// Extension used when the image path has none
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Directory prefix for image entries inside the archive
pub const IMAGE_DIR: &str = "images";

/// A distinct image address and its position in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub index: usize,
    pub url: Url,
}

impl ImageTask {
    /// Name of the archive entry for this image, e.g. `images/image-3.png`
    pub fn archive_name(&self) -> String {
        format!(
            "{}/image-{}{}",
            IMAGE_DIR,
            self.index,
            extension_for(&self.url)
        )
    }
}

/// Builds the capped, deduplicated task list from raw `src` values
///
/// Only absolute `http`/`https` addresses qualify; everything else is dropped
/// silently. Indices are fixed here, so they do not depend on how the
/// downloads later turn out.
pub fn collect_tasks<'a, I>(sources: I, max_images: usize) -> Vec<ImageTask>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();

    sources
        .into_iter()
        .filter(|src| seen.insert(*src))
        .filter_map(qualifying_url)
        .take(max_images)
        .enumerate()
        .map(|(index, url)| ImageTask { index, url })
        .collect()
}

fn qualifying_url(src: &str) -> Option<Url> {
    let url = match Url::parse(src) {
        Ok(url) => url,
        Err(_) => {
            ::log::trace!("Skipping non-absolute image source: {}", src);
            return None;
        }
    };

    match url.scheme() {
        "http" | "https" => Some(url),
        scheme => {
            ::log::trace!("Skipping image with scheme {}: {}", scheme, src);
            None
        }
    }
}

/// File extension (with the leading dot) of the last path segment
///
/// Dotfiles and names ending in a bare dot count as having no extension.
pub fn extension_for(url: &Url) -> String {
    let file_name = url.path().rsplit('/').next().unwrap_or_default();

    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => file_name[idx..].to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
