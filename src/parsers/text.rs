/// Collapses every run of whitespace to a single space and trims both ends
///
/// Mirrors what a browser reports for `innerText` closely enough for archiving:
/// line breaks, tabs and non-breaking layout whitespace all become one space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes the concatenated text nodes of an element
pub fn normalize_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = fragments.into_iter().collect::<String>();
    normalize(&joined)
}
