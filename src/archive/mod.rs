//! Incremental zip writer that pushes bytes to an async sink after every entry.


use crate::error::ArchiveWriteError;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use zip::write::{SimpleFileOptions, StreamWriter};
use zip::{CompressionMethod, ZipWriter};

/// Name of the text entry at the root of every archive
pub const TEXT_ENTRY_NAME: &str = "content.md";

/// MIME type of the produced container
pub const CONTENT_TYPE: &str = "application/zip";

/// Staging area between the synchronous zip encoder and the async sink
///
/// Holds at most what one entry produces before it is drained.
#[derive(Debug, Clone, Default)]
struct PendingBytes(Arc<Mutex<Vec<u8>>>);

impl PendingBytes {
    fn take(&self) -> io::Result<Vec<u8>> {
        let mut pending = self
            .0
            .lock()
            .map_err(|_| io::Error::other("archive buffer lock poisoned"))?;
        Ok(std::mem::take(&mut *pending))
    }
}

impl Write for PendingBytes {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("archive buffer lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a zip container to `sink` one entry at a time
///
/// The streamer is the only writer of the sink. Entries are compressed with
/// deflate and handed to the sink as soon as they are appended.
pub struct ArchiveStreamer<W> {
    zip: ZipWriter<StreamWriter<PendingBytes>>,
    pending: PendingBytes,
    sink: W,
    options: SimpleFileOptions,
    bytes_written: u64,
    entries: usize,
}

impl<W: AsyncWrite + Unpin> ArchiveStreamer<W> {
    /// Create a streamer writing to `sink` with the given deflate level
    pub fn new(sink: W, compression_level: i64) -> Self {
        let pending = PendingBytes::default();
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.clamp(0, 9)));

        Self {
            zip: ZipWriter::new_stream(pending.clone()),
            pending,
            sink,
            options,
            bytes_written: 0,
            entries: 0,
        }
    }

    /// Add an entry and push everything encoded so far to the sink
    pub async fn append(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveWriteError> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        self.zip.flush()?;
        self.entries += 1;
        ::log::debug!("Appended {} ({} bytes) to archive", name, data.len());

        self.drain().await
    }

    /// Write the central directory, flush and shut down the sink
    ///
    /// Must be the last call. Returns the sink and the total number of bytes
    /// it received once everything has reached it.
    pub async fn finalize(self) -> Result<(W, u64), ArchiveWriteError> {
        let ArchiveStreamer {
            zip,
            pending,
            mut sink,
            bytes_written,
            entries,
            ..
        } = self;

        zip.finish()?;
        let tail = drain_into(&pending, &mut sink).await?;
        sink.shutdown().await?;

        let total = bytes_written + tail;
        ::log::debug!(
            "Finalized archive with {} entries ({} bytes)",
            entries,
            total
        );
        Ok((sink, total))
    }

    /// Whether any byte has been handed to the sink
    pub fn has_started(&self) -> bool {
        self.bytes_written > 0
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    async fn drain(&mut self) -> Result<(), ArchiveWriteError> {
        self.bytes_written += drain_into(&self.pending, &mut self.sink).await?;
        Ok(())
    }
}

async fn drain_into<W: AsyncWrite + Unpin>(
    pending: &PendingBytes,
    sink: &mut W,
) -> Result<u64, ArchiveWriteError> {
    let chunk = pending.take()?;
    if chunk.is_empty() {
        return Ok(0);
    }

    sink.write_all(&chunk).await?;
    sink.flush().await?;
    Ok(chunk.len() as u64)
}
