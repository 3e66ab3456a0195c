//! Helpers shared by the unit tests: a local image server, a scripted
//! renderer and sinks that misbehave on purpose.

use crate::error::{RenderCause, RenderError};
use crate::renderers::Renderer;
use crate::results::PageSnapshot;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::io::{self, Cursor, Read};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;

type Hits = Arc<Mutex<Vec<String>>>;

/// Local HTTP server answering `/images/{name}`
///
/// Names starting with `slow` are delayed by half a second, names containing
/// `missing` then get a 404, everything else returns `image:{name}`.
pub struct ImageServer {
    pub base: String,
    hits: Hits,
}

impl ImageServer {
    pub async fn spawn() -> Self {
        let hits: Hits = Arc::default();
        let app = Router::new()
            .route("/images/{*name}", get(serve_image))
            .with_state(Arc::clone(&hits));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            hits,
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/images/{}", self.base, name)
    }

    /// Names requested so far, in arrival order
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

async fn serve_image(State(hits): State<Hits>, Path(name): Path<String>) -> Response {
    hits.lock().unwrap().push(name.clone());

    if name.starts_with("slow") {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    if name.contains("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    (StatusCode::OK, format!("image:{name}")).into_response()
}

/// Renderer that returns a fixed snapshot or a fixed failure
pub struct FakeRenderer {
    outcome: Result<PageSnapshot, String>,
    calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn returning(snapshot: PageSnapshot) -> Self {
        Self {
            outcome: Ok(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for FakeRenderer {
    async fn render(&self, address: &str) -> Result<PageSnapshot, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(message) => Err(RenderError::new(
                address,
                RenderCause::Navigation(message.clone()),
            )),
        }
    }
}

/// Sink that accepts a number of writes and then fails like a closed socket
#[derive(Debug, Default)]
pub struct FailAfter {
    remaining_writes: usize,
    pub written: Vec<u8>,
}

impl FailAfter {
    pub fn new(remaining_writes: usize) -> Self {
        Self {
            remaining_writes,
            written: Vec::new(),
        }
    }
}

impl AsyncWrite for FailAfter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.remaining_writes == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "receiver went away",
            )));
        }
        self.remaining_writes -= 1;
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Reads back every entry of a finished archive as `(name, bytes)`, in archive order
pub fn read_entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

/// Names of every entry of a finished archive
pub fn entry_names(archive: &[u8]) -> Vec<String> {
    read_entries(archive).into_iter().map(|(name, _)| name).collect()
}
