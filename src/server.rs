//! HTTP surface: `POST /api/scrape` answers with a streamed zip.

use crate::archive::CONTENT_TYPE;
use crate::error::ArchiveError;
use crate::pipeline::Archiver;
use crate::renderers::Renderer;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

/// Size of the in-memory pipe between the archive writer and the response body
const BODY_PIPE_CAPACITY: usize = 64 * 1024;

const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"scraped-site.zip\"";

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Routes served by [`serve`]
pub fn router<R>(archiver: Arc<Archiver<R>>) -> Router
where
    R: Renderer + 'static,
{
    Router::new()
        .route("/api/scrape", post(scrape::<R>))
        .with_state(archiver)
}

/// Bind `0.0.0.0:port` and serve until the process stops
pub async fn serve<R>(archiver: Archiver<R>, port: u16) -> std::io::Result<()>
where
    R: Renderer + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    ::log::info!("Server is running on port {}", port);
    axum::serve(listener, router(Arc::new(archiver))).await
}

async fn scrape<R>(
    State(archiver): State<Arc<Archiver<R>>>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response
where
    R: Renderer + 'static,
{
    let url = match payload {
        Ok(Json(request)) => request.url.unwrap_or_default(),
        Err(rejection) => {
            ::log::debug!("Rejected scrape request body: {}", rejection);
            String::new()
        }
    };

    ::log::info!("Starting scrape for: {}", url);

    // Everything up to here can still become a JSON error
    let page = match archiver.prepare(&url).await {
        Ok(page) => page,
        Err(ArchiveError::InvalidInput) => {
            return error_response(StatusCode::BAD_REQUEST, "URL is required");
        }
        Err(e) => {
            ::log::error!("Scraping error: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to scrape website");
        }
    };

    let (writer, reader) = tokio::io::duplex(BODY_PIPE_CAPACITY);
    let receiver_gone = CancellationToken::new();
    let stream_cancel = receiver_gone.clone();
    tokio::spawn(async move {
        // The response is already committed; a failure only truncates the body
        if let Err(e) = archiver.stream_until(page, writer, stream_cancel).await {
            ::log::error!("Archive stream for {} ended early: {}", url, e);
        }
    });

    // Dropping the body (client disconnect or completed response) cancels the run
    let body_guard = receiver_gone.drop_guard();
    let body = ReaderStream::new(reader).map(move |chunk| {
        let _guard = &body_guard;
        chunk
    });

    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        Body::from_stream(body),
    )
        .into_response()
}
