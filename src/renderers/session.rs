use crate::config::ArchiverConfig;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};

/// Local endpoints tried when the configured WebDriver URL does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:9515",
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A WebDriver session that is closed exactly once
///
/// Call [`BrowserSession::close`] on every normal path. If the session is
/// dropped without it (early return, panic, cancelled future) the close is
/// scheduled on the current runtime instead.
pub struct BrowserSession {
    client: Client,
    closed: bool,
}

impl BrowserSession {
    /// Opens a fresh session sized to the configured viewport
    pub async fn open(config: &ArchiverConfig) -> Result<Self, String> {
        let client = connect_to_webdriver(config).await?;
        let session = Self {
            client,
            closed: false,
        };

        if let Err(e) = session
            .client
            .set_window_size(config.viewport_width, config.viewport_height)
            .await
        {
            ::log::warn!("Failed to resize browser window: {}", e);
        }

        Ok(session)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Ends the WebDriver session
    pub async fn close(mut self) {
        self.closed = true;
        match self.client.clone().close().await {
            Ok(()) => ::log::debug!("Closed WebDriver session"),
            Err(e) => ::log::warn!("Failed to close WebDriver session: {}", e),
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let client = self.client.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                ::log::debug!("WebDriver session dropped without close, closing in background");
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close dropped WebDriver session: {}", e);
                    }
                });
            }
            Err(_) => {
                ::log::warn!("WebDriver session dropped outside a runtime, leaving it to the driver");
            }
        }
    }
}

/// Browser capabilities for an isolated desktop-sized session
pub fn capabilities(config: &ArchiverConfig) -> Map<String, Value> {
    let mut chrome_args = vec![
        format!(
            "--window-size={},{}",
            config.viewport_width, config.viewport_height
        ),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    let mut firefox_args = Vec::new();
    if config.headless {
        chrome_args.push("--headless=new".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": chrome_args }),
    );
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({ "args": firefox_args }),
    );
    caps
}

/// Connects to the configured WebDriver instance, then to common local defaults
async fn connect_to_webdriver(config: &ArchiverConfig) -> Result<Client, String> {
    let webdriver_url = config.webdriver_url.as_str();
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));

    let primary_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(format!("{webdriver_url}: {primary_error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let caps = capabilities(&ArchiverConfig::default());
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1920,1080")));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
    }

    #[test]
    fn test_headed_capabilities() {
        let config = ArchiverConfig {
            headless: false,
            viewport_width: 1280,
            viewport_height: 720,
            ..ArchiverConfig::default()
        };
        let caps = capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1280,720")));
    }
}
