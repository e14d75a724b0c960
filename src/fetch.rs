//! Single HTTP requests bounded by a connect timeout and a total deadline,
//! and helpers to stream a response body to disk.
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use toolbelt::fetch::{FetchConfig, Fetcher};
//!
//! let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
//! fetcher
//!     .download_to_path("https://example.com/index.html", "/tmp/index.html")
//!     .await
//!     .unwrap();
//! # })
//! ```
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::pin::pin;
use std::time::Duration;

use futures_lite::StreamExt;
use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::Method;
use reqwest::Response;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::errors::Error;

/// Default time allowed to establish a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time allowed for a whole request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeouts applied by a [`Fetcher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct FetchConfig {
    /// Limit on establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// Deadline for the whole request unless overridden per call.
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Issues bounded HTTP requests.
///
/// The inner client is reused across calls; each request carries its own
/// deadline so calls never affect each other.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Builds a fetcher applying `config`.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(client_setup_error)?;
        Ok(Self { client, config })
    }

    /// The timeouts this fetcher applies.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Sends one request with method `verb` and an optional body.
    ///
    /// `timeout` overrides [`FetchConfig::request_timeout`] for this call and
    /// bounds everything up to the end of the response body. Dropping the
    /// returned response cancels whatever is still in flight.
    ///
    /// The status code is not checked.
    pub async fn request(
        &self,
        url: &str,
        verb: &str,
        body: Option<Vec<u8>>,
        timeout: Option<Duration>,
    ) -> Result<Response, Error> {
        const OP: &str = "request";
        let method = Method::from_bytes(verb.as_bytes())
            .map_err(|e| Error::InvalidArgument(format!("HTTP method {verb:?}: {e}")))?;
        let timeout = timeout.unwrap_or(self.config.request_timeout);
        debug!("{OP}: {method} {url} (timeout {timeout:?})");

        let mut request = self.client.request(method, url).timeout(timeout);
        if let Some(body) = body {
            request = request.body(body);
        }
        request.send().await.map_err(|e| Error::request(OP, url, &e))
    }

    /// `GET url` with the default deadline.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.request(url, Method::GET.as_str(), None, None).await
    }

    /// Downloads `url` into `path`.
    ///
    /// The destination is created (or truncated) before the request is sent
    /// and is left in place when the request fails, so a failed download
    /// leaves an empty or partial file behind. See
    /// [`download_to_path_atomic`](Self::download_to_path_atomic) for a
    /// variant that never exposes partial content.
    pub async fn download_to_path<P: AsRef<Path>>(&self, url: &str, path: P) -> Result<(), Error> {
        const OP: &str = "download_to_path";
        let path = path.as_ref();
        let mut out = File::create(path)
            .await
            .map_err(|e| Error::io(OP, "create", path, e))?;

        let response = self.get(url).await.map_err(|e| relabel(OP, e))?;
        copy_body(OP, url, response, &mut out, path).await?;
        debug!("{OP}: {url} -> {}", path.display());
        Ok(())
    }

    /// Downloads `url` into a `.part` sibling of `path` and renames it onto
    /// `path` once the body is complete.
    ///
    /// On failure the partial file is removed and `path` is untouched.
    pub async fn download_to_path_atomic<P: AsRef<Path>>(
        &self,
        url: &str,
        path: P,
    ) -> Result<(), Error> {
        const OP: &str = "download_to_path_atomic";
        let path = path.as_ref();
        let part = part_path(path);

        let result = async {
            let mut out = File::create(&part)
                .await
                .map_err(|e| Error::io(OP, "create", &part, e))?;
            let response = self.get(url).await.map_err(|e| relabel(OP, e))?;
            copy_body(OP, url, response, &mut out, &part).await?;
            drop(out);
            fs::rename(&part, path)
                .await
                .map_err(|e| Error::io(OP, "rename", path, e))
        }
        .await;

        if result.is_err() {
            if let Err(e) = fs::remove_file(&part).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("{OP}: failed to remove {}: {e}", part.display());
                }
            }
        }
        result
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut part: OsString = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

fn client_setup_error(e: reqwest::Error) -> Error {
    Error::InvalidArgument(format!("Fetcher::new: cannot build HTTP client: {e}"))
}

// Reports fetch failures under the caller's operation name.
fn relabel(op: &str, e: Error) -> Error {
    match e {
        Error::Timeout { url, how, .. } => Error::Timeout {
            op: op.into(),
            url,
            how,
        },
        Error::Transport { url, how, .. } => Error::Transport {
            op: op.into(),
            url,
            how,
        },
        other => other,
    }
}

async fn copy_body(
    op: &str,
    url: &str,
    response: Response,
    out: &mut File,
    path: &Path,
) -> Result<(), Error> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(Error::BadStatus {
            op: op.into(),
            url: url.into(),
            status: status.to_string(),
        });
    }

    let mut stream = pin!(response.bytes_stream());
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::request(op, url, &e))?;
        out.write_all(&chunk)
            .await
            .map_err(|e| Error::io(op, "write", path, e))?;
    }
    out.flush()
        .await
        .map_err(|e| Error::io(op, "write", path, e))
}
