//! Loopback HTTP requests over libcurl.
//!
//! Every request carries its own total timeout; expiry is reported the same way
//! as a refused connection. The functions here block the calling thread, so
//! async callers go through [`blocking`].

mod classify;

pub use classify::{classify_curl_error, FailureKind};

use std::time::Duration;

/// Liveness responses larger than this are abandoned; the companion's ping reply is small JSON.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// What to do with the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    /// Buffer up to [`MAX_BODY_BYTES`]; anything larger aborts the request.
    Capped,
    /// Read and drop whatever arrives, of any size.
    Discard,
}

/// Failure to complete a request (no HTTP status was obtained).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Curl(e) => classify_curl_error(e),
            TransportError::Join(_) => FailureKind::Other,
        }
    }
}

/// Completed HTTP exchange: status and (capped) body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn easy_for(url: &str, timeout: Duration) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    // Loopback traffic must never be routed through an http_proxy from the environment.
    easy.noproxy("*")?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    easy.follow_location(false)?;
    Ok(easy)
}

fn perform(mut easy: curl::easy::Easy, mode: BodyMode) -> Result<HttpResponse, curl::Error> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if mode == BodyMode::Discard {
                return Ok(data.len());
            }
            if body.len() + data.len() > MAX_BODY_BYTES {
                // Short write makes curl abort with CURLE_WRITE_ERROR.
                return Ok(0);
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let status = easy.response_code()?;
    Ok(HttpResponse { status, body })
}

/// `GET url` with a total timeout. Runs in the current thread.
pub fn get(url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
    let mut easy = easy_for(url, timeout)?;
    easy.get(true)?;
    Ok(perform(easy, BodyMode::Capped)?)
}

/// `POST url` with a JSON body and a total timeout. Runs in the current thread.
///
/// Only the status matters here, so the reply body is discarded rather than capped:
/// a large 2xx reply is still an accepted job.
pub fn post_json(url: &str, body: &[u8], timeout: Duration) -> Result<HttpResponse, TransportError> {
    let mut easy = easy_for(url, timeout)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;
    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    // Suppress `Expect: 100-continue`; the companion answers in one round trip.
    list.append("Expect:")?;
    easy.http_headers(list)?;
    Ok(perform(easy, BodyMode::Discard)?)
}

/// Run a blocking request on tokio's blocking pool.
pub async fn blocking<F>(f: F) -> Result<HttpResponse, TransportError>
where
    F: FnOnce() -> Result<HttpResponse, TransportError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
