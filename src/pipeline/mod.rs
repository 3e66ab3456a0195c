//! Sequences render, serialization, image collection and archiving for one page.


use crate::archive::{ArchiveStreamer, TEXT_ENTRY_NAME};
use crate::config::{ArchiverConfig, ConfigError};
use crate::content;
use crate::error::{ArchiveError, ArchiveWriteError, Result};
use crate::images::{self, ImageFetcher, ImageTask};
use crate::renderers::Renderer;
use futures::StreamExt;
use std::fmt;
use std::time::Instant;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

/// Where a single archiving run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Rendering,
    Serializing,
    CollectingImages,
    Archiving,
    Finalized,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Finalized | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// State of one run, logged on every transition
#[derive(Debug)]
struct Run {
    address: String,
    state: PipelineState,
}

impl Run {
    fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        ::log::debug!("[{}] {} -> {}", self.address, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: ArchiveError) -> ArchiveError {
        if !self.state.is_terminal() {
            ::log::error!("[{}] failed while {}: {}", self.address, self.state, error);
            self.state = PipelineState::Failed;
        }
        error
    }
}

/// A rendered page whose archive has not been written yet
///
/// Nothing has touched the output sink at this point, so failures up to here
/// can still be reported as structured errors.
#[derive(Debug)]
pub struct PreparedPage {
    run: Run,
    /// Text entry content
    pub text: String,
    /// Capped, deduplicated images in first-seen order
    pub images: Vec<ImageTask>,
}

impl PreparedPage {
    pub fn address(&self) -> &str {
        &self.run.address
    }

    pub fn state(&self) -> PipelineState {
        self.run.state
    }
}

/// Outcome of a finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Names of the image entries written, in archive order
    pub images_archived: Vec<String>,
    /// Images whose download failed and were left out
    pub images_failed: usize,
    /// Total bytes handed to the sink
    pub bytes_written: u64,
}

/// Turns page addresses into streamed zip archives
pub struct Archiver<R> {
    renderer: R,
    fetcher: ImageFetcher,
    config: ArchiverConfig,
}

impl<R: Renderer> Archiver<R> {
    /// Create an archiver rendering pages with `renderer`
    pub fn new(renderer: R, config: ArchiverConfig) -> std::result::Result<Self, ConfigError> {
        let fetcher = ImageFetcher::new(config.fetch_timeout())?;
        Ok(Self {
            renderer,
            fetcher,
            config,
        })
    }

    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Validate, render and serialize a page, and pick the images to fetch
    ///
    /// The browsing context is released before this returns.
    pub async fn prepare(&self, address: &str) -> Result<PreparedPage> {
        let address = validate_address(address)?;
        let mut run = Run::new(address);

        run.advance(PipelineState::Rendering);
        let snapshot = self
            .renderer
            .render(address)
            .await
            .map_err(|e| run.fail(e.into()))?;

        run.advance(PipelineState::Serializing);
        let text = content::serialize(&snapshot);

        run.advance(PipelineState::CollectingImages);
        let images = images::collect_tasks(snapshot.image_sources(), self.config.max_images);
        ::log::info!(
            "Found {} images to archive for {}",
            images.len(),
            run.address
        );

        Ok(PreparedPage { run, text, images })
    }

    /// Write the archive for a prepared page into `sink`
    ///
    /// Once this starts, failures can no longer be reported to the receiving
    /// side in a structured way: the sink simply ends early. A sink error stops
    /// all remaining downloads and skips finalization.
    pub async fn stream<W>(&self, page: PreparedPage, sink: W) -> Result<ArchiveSummary>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.stream_until(page, sink, CancellationToken::new()).await
    }

    /// Like [`Archiver::stream`], but also stops as soon as `receiver_gone` is cancelled
    ///
    /// A sink only reports a closed receiver on the next write, and nothing is
    /// written while downloads keep failing. The token lets the receiving side
    /// end the run without waiting for that.
    pub async fn stream_until<W>(
        &self,
        page: PreparedPage,
        sink: W,
        receiver_gone: CancellationToken,
    ) -> Result<ArchiveSummary>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let PreparedPage {
            mut run,
            text,
            images,
        } = page;
        let started = Instant::now();

        run.advance(PipelineState::Archiving);
        let mut streamer = ArchiveStreamer::new(sink, self.config.compression_level);
        streamer
            .append(TEXT_ENTRY_NAME, text.as_bytes())
            .await
            .map_err(|e| run.fail(e.into()))?;

        let mut images_archived = Vec::new();
        let mut images_failed = 0;
        let mut downloads =
            std::pin::pin!(self.fetcher.fetch_all(&images, self.config.fetch_concurrency));

        loop {
            let next = tokio::select! {
                biased;
                _ = receiver_gone.cancelled() => {
                    ::log::warn!("Receiver for {} went away, dropping remaining downloads", run.address);
                    return Err(run.fail(ArchiveWriteError::ReceiverClosed.into()));
                }
                next = downloads.next() => next,
            };
            let Some((task, result)) = next else {
                break;
            };

            match result {
                Ok(bytes) => {
                    let name = task.archive_name();
                    streamer
                        .append(&name, &bytes)
                        .await
                        .map_err(|e| run.fail(e.into()))?;
                    images_archived.push(name);
                }
                Err(e) => {
                    ::log::warn!("Failed to download image {}: {}", task.index, e);
                    images_failed += 1;
                }
            }
        }

        let (_, bytes_written) = streamer.finalize().await.map_err(|e| run.fail(e.into()))?;
        run.advance(PipelineState::Finalized);

        ::log::info!(
            "Archived {} in {:.2} seconds: {} images, {} failed downloads",
            run.address,
            started.elapsed().as_secs_f64(),
            images_archived.len(),
            images_failed
        );

        Ok(ArchiveSummary {
            images_archived,
            images_failed,
            bytes_written,
        })
    }

    /// Render `address` and stream its archive into `sink`
    pub async fn archive<W>(&self, address: &str, sink: W) -> Result<ArchiveSummary>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let page = self.prepare(address).await?;
        self.stream(page, sink).await
    }
}

/// Rejects missing or blank addresses before any work starts
pub fn validate_address(address: &str) -> Result<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ArchiveError::InvalidInput);
    }
    Ok(address)
}
