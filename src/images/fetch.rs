use crate::error::ImageFetchError;
use crate::images::ImageTask;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Downloads image bytes over plain HTTP(S), one attempt per image
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("page-archiver/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the raw bytes of one image
    ///
    /// Anything other than `200 OK` is a failure.
    pub async fn fetch(&self, task: &ImageTask) -> Result<Vec<u8>, ImageFetchError> {
        let transport = |source| ImageFetchError::Transport {
            url: task.url.to_string(),
            source,
        };

        let response = self
            .client
            .get(task.url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ImageFetchError::Status {
                url: task.url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        ::log::debug!("Fetched {} bytes from {}", bytes.len(), task.url);
        Ok(bytes.to_vec())
    }

    /// Fetch every task with at most `concurrency` requests in flight
    ///
    /// Results are yielded in task order regardless of which download finishes
    /// first. Dropping the stream cancels the downloads still in flight.
    pub fn fetch_all<'a>(
        &'a self,
        tasks: &'a [ImageTask],
        concurrency: usize,
    ) -> impl Stream<Item = (&'a ImageTask, Result<Vec<u8>, ImageFetchError>)> + 'a {
        stream::iter(tasks)
            .map(move |task| async move { (task, self.fetch(task).await) })
            .buffered(concurrency.max(1))
    }
}
