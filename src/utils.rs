/// Longest file stem produced by [`archive_file_name`]
const MAX_STEM_LEN: usize = 100;

/// Convert a page URL to a sanitized file stem
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let name = url
        .trim()
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .replace(['/', ':', '?', '&', '=', '#', '%', '\\', '*', '"', '<', '>', '|'], "_");
    let name = name.trim_matches('_');

    // Limit filename length
    let name: String = name.chars().take(MAX_STEM_LEN).collect();
    if name.is_empty() {
        "page".to_string()
    } else {
        name
    }
}

/// Default archive file name for a page URL, e.g. `example.com_docs.zip`
pub fn archive_file_name(url: &str) -> String {
    format!("{}.zip", sanitize_filename(url))
}
