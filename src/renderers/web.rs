use crate::config::ArchiverConfig;
use crate::error::{RenderCause, RenderError};
use crate::parsers;
use crate::renderers::Renderer;
use crate::renderers::session::BrowserSession;
use crate::results::PageSnapshot;
use fantoccini::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};

/// Reports load state and how many resources have finished loading so far
const IDLE_PROBE_SCRIPT: &str =
    "return [document.readyState, performance.getEntriesByType('resource').length];";

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders pages in a real browser driven over WebDriver
///
/// Every call opens its own session, so concurrent requests never share a
/// browsing context.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    config: ArchiverConfig,
}

impl WebDriverRenderer {
    pub fn new(config: ArchiverConfig) -> Self {
        Self { config }
    }
}

impl Renderer for WebDriverRenderer {
    async fn render(&self, address: &str) -> Result<PageSnapshot, RenderError> {
        let started = Instant::now();
        ::log::info!("Rendering {}", address);

        // One deadline covers session setup, navigation and the idle wait. A
        // session that finished opening lands in `session` so it is closed
        // even when the deadline fires mid-load.
        let render_timeout = self.config.render_timeout();
        let mut session: Option<BrowserSession> = None;
        let loaded = timeout(render_timeout, async {
            let opened = BrowserSession::open(&self.config)
                .await
                .map_err(RenderCause::Session)?;
            let client = session.insert(opened).client();
            load_snapshot(client, address, self.config.idle_window()).await
        })
        .await;

        if let Some(session) = session {
            session.close().await;
        }

        let snapshot = match loaded {
            Ok(result) => result.map_err(|cause| RenderError::new(address, cause))?,
            Err(_) => {
                ::log::error!("Timeout rendering: {}", address);
                return Err(RenderError::new(
                    address,
                    RenderCause::Timeout(render_timeout),
                ));
            }
        };

        ::log::info!(
            "Rendered {} in {:.2} seconds ({} content elements)",
            address,
            started.elapsed().as_secs_f64(),
            snapshot.elements.len()
        );
        Ok(snapshot)
    }
}

/// Navigates, waits for the network to settle and parses the live DOM
async fn load_snapshot(
    client: &Client,
    address: &str,
    idle_window: Duration,
) -> Result<PageSnapshot, RenderCause> {
    client
        .goto(address)
        .await
        .map_err(|e| RenderCause::Navigation(e.to_string()))?;

    wait_for_network_idle(client, idle_window).await?;

    let html = client
        .source()
        .await
        .map_err(|e| RenderCause::Dom(e.to_string()))?;

    Ok(parsers::parse(&html))
}

/// Polls until the document is complete and no resource has finished loading
/// for `idle_window`
///
/// The caller bounds the total wait.
async fn wait_for_network_idle(client: &Client, idle_window: Duration) -> Result<(), RenderCause> {
    let mut last_count: Option<u64> = None;
    let mut quiet_since = Instant::now();

    loop {
        let probe = client
            .execute(IDLE_PROBE_SCRIPT, Vec::new())
            .await
            .map_err(|e| RenderCause::Dom(e.to_string()))?;

        let ready = probe.get(0).and_then(Value::as_str) == Some("complete");
        let count = probe.get(1).and_then(Value::as_u64);

        if !ready || count != last_count {
            last_count = count;
            quiet_since = Instant::now();
        } else if quiet_since.elapsed() >= idle_window {
            ::log::debug!("Network idle after {} resources", count.unwrap_or(0));
            return Ok(());
        }

        sleep(IDLE_POLL_INTERVAL).await;
    }
}
