use crate::images::{ImageTask, collect_tasks, extension_for};
use url::Url;

fn ext(url: &str) -> String {
    extension_for(&Url::parse(url).unwrap())
}

#[test]
fn test_only_absolute_http_sources_qualify() {
    let sources = [
        "https://example.com/a.png",
        "/relative/logo.png",
        "logo.png",
        "data:image/gif;base64,R0lGOD",
        "ftp://example.com/b.png",
        "",
        "http://example.com/c.gif",
    ];
    let tasks = collect_tasks(sources, 20);
    let urls: Vec<&str> = tasks.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://example.com/a.png", "http://example.com/c.gif"]
    );
}

#[test]
fn test_duplicates_keep_first_position() {
    let sources = [
        "https://example.com/b.png",
        "https://example.com/a.png",
        "https://example.com/b.png",
        "https://example.com/c.png",
        "https://example.com/a.png",
    ];
    let tasks = collect_tasks(sources, 20);
    let expected: Vec<(usize, &str)> = vec![
        (0, "https://example.com/b.png"),
        (1, "https://example.com/a.png"),
        (2, "https://example.com/c.png"),
    ];
    let actual: Vec<(usize, &str)> = tasks.iter().map(|t| (t.index, t.url.as_str())).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_cap_keeps_first_distinct_addresses() {
    let sources: Vec<String> = (0..25)
        .map(|i| format!("https://cdn.example.com/{i}.jpg"))
        .collect();
    let tasks = collect_tasks(sources.iter().map(String::as_str), 20);
    assert_eq!(tasks.len(), 20);
    assert_eq!(tasks[19].url.as_str(), "https://cdn.example.com/19.jpg");
    assert!(tasks.iter().enumerate().all(|(i, t)| t.index == i));
}

#[test]
fn test_cap_counts_distinct_addresses_only() {
    let mut sources = vec!["https://example.com/same.png"; 30];
    sources.push("https://example.com/other.png");
    let tasks = collect_tasks(sources, 20);
    assert_eq!(tasks.len(), 2);
}

#[test]
fn test_extension_from_path() {
    assert_eq!(ext("https://example.com/img/photo.png"), ".png");
    assert_eq!(ext("https://example.com/img/photo.tar.gz"), ".gz");
    assert_eq!(ext("https://example.com/img/photo.webp?w=200&fmt=jpg"), ".webp");
    assert_eq!(ext("https://example.com/img/v1.2/photo"), ".jpg");
    assert_eq!(ext("https://example.com/img/"), ".jpg");
    assert_eq!(ext("https://example.com"), ".jpg");
    assert_eq!(ext("https://example.com/.hidden"), ".jpg");
    assert_eq!(ext("https://example.com/trailing."), ".jpg");
}

#[test]
fn test_archive_name() {
    let task = ImageTask {
        index: 7,
        url: Url::parse("https://example.com/logo.svg").unwrap(),
    };
    assert_eq!(task.archive_name(), "images/image-7.svg");
}
