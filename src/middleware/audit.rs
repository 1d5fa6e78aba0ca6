//! Audit logging stage.
//!
//! Logs method / path / subject and a capped request body snapshot before
//! dispatch, then status / latency and a capped response body snapshot after.
//! Both bodies are buffered and re-attached, so the handler and the client see
//! exactly the bytes that were sent.
//!
//! Bodies on `REDACTED_PATHS` carry credentials or tokens: only their length
//! is logged.

use std::{future::poll_fn, pin::Pin, time::Instant};

use axum::{
    body::{Body, Bytes, HttpBody, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSettings {
    /// Max bytes of each body written to the log.
    pub snapshot_bytes: usize,
    /// Max request body size buffered for logging.
    pub body_limit_bytes: usize,
}

/// Paths whose request / response bodies are never written to the log.
pub const REDACTED_PATHS: &[&str] = &["/api/v1/auth/login"];

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            snapshot_bytes: 1024,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

pub async fn record(
    State(settings): State<AuditSettings>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let subject = req
        .extensions()
        .get::<AuthCtx>()
        .map(|ctx| ctx.subject.clone())
        .unwrap_or_else(|| "-".to_string());

    let redacted = REDACTED_PATHS.contains(&path.as_str());
    let loggable = |bytes: &[u8]| {
        if redacted {
            format!("<redacted {} bytes>", bytes.len())
        } else {
            snapshot(bytes, settings.snapshot_bytes)
        }
    };

    let (parts, body) = req.into_parts();
    let bytes = buffer_request(body, settings.body_limit_bytes)
        .await
        .inspect_err(|err| {
            tracing::warn!(%method, %path, error = %err, "failed to buffer request body");
        })?;

    tracing::info!(
        %method,
        %path,
        %subject,
        body = %loggable(&bytes[..]),
        "incoming request"
    );

    let res = next
        .run(Request::from_parts(parts, Body::from(bytes)))
        .await;

    let (parts, body) = res.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.map_err(|err| {
        AppError::Unexpected(anyhow::anyhow!("failed to buffer response body: {err}"))
    })?;

    tracing::info!(
        %method,
        %path,
        status = parts.status.as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        body = %loggable(&bytes[..]),
        "outgoing response"
    );

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[derive(Debug, thiserror::Error)]
enum BufferError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),
}

impl From<BufferError> for AppError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::TooLarge(_) => AppError::PayloadTooLarge,
            BufferError::Read(_) => AppError::invalid_request("Failed to read request body."),
        }
    }
}

/// Collects the request body, stopping as soon as it grows past `limit`.
async fn buffer_request(mut body: Body, limit: usize) -> Result<Bytes, BufferError> {
    let mut buf = Vec::new();

    while let Some(frame) = poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await {
        let frame = frame.map_err(BufferError::Read)?;
        let Ok(data) = frame.into_data() else {
            // trailers
            continue;
        };

        if buf.len() + data.len() > limit {
            return Err(BufferError::TooLarge(limit));
        }
        buf.extend_from_slice(&data);
    }

    Ok(Bytes::from(buf))
}

/// Lossy UTF-8 view of `bytes`, cut at `cap` bytes on a char boundary.
fn snapshot(bytes: &[u8], cap: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= cap {
        return text.into_owned();
    }

    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}... (+{} bytes)", &text[..end], text.len() - end)
}
