use crate::feed::payload::{parse_payload, ArticleRecord, FeedPayload};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading the news payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Local payload file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Payload was not valid news JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Payload exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Where the payload lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` locations are remote; `file://` URLs and
    /// anything else are local paths.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => FeedSource::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => FeedSource::Local(path),
                Err(()) => FeedSource::Local(PathBuf::from(location)),
            },
            _ => FeedSource::Local(PathBuf::from(location)),
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{}", url),
            FeedSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the precomputed news payload from a fixed location.
///
/// A single attempt per call; the host re-fetches on its refresh interval.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    source: FeedSource,
    timeout: Duration,
}

impl FeedLoader {
    pub fn new(client: reqwest::Client, source: FeedSource) -> Self {
        Self {
            client,
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch and parse the whole payload.
    pub async fn fetch(&self) -> Result<FeedPayload, FetchError> {
        let bytes = match &self.source {
            FeedSource::Remote(url) => self.fetch_remote(url).await?,
            FeedSource::Local(path) => {
                tokio::time::timeout(self.timeout, read_local(path, MAX_PAYLOAD_SIZE))
                    .await
                    .map_err(|_| FetchError::Timeout)??
            }
        };

        let payload = parse_payload(&bytes)?;
        tracing::info!(
            source = %self.source,
            articles = payload.articles.len(),
            last_updated = ?payload.last_updated,
            "Loaded news payload"
        );
        Ok(payload)
    }

    /// Fetch just the article records.
    pub async fn fetch_articles(&self) -> Result<Vec<ArticleRecord>, FetchError> {
        self.fetch().await.map(|payload| payload.articles)
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let url = cache_busted(url);
        tracing::debug!(url = %url, "Fetching news payload");

        let response = tokio::time::timeout(self.timeout, self.client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "News payload request failed");
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_PAYLOAD_SIZE))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}

/// Append a `t=<unix millis>` query parameter so intermediate caches never
/// serve a stale payload.
fn cache_busted(url: &Url) -> Url {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut url = url.clone();
    url.query_pairs_mut().append_pair("t", &millis.to_string());
    url
}

/// Read a local payload, at most `limit` bytes.
///
/// Reads through the file instead of trusting its metadata, so pipes and
/// files that grow while being read are bounded too.
async fn read_local(path: &Path, limit: usize) -> Result<Vec<u8>, FetchError> {
    let io_err = |source| FetchError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_err)?;
    read_limited(file, limit)
        .await
        .map_err(io_err)?
        .ok_or(FetchError::ResponseTooLarge)
}

/// Read `reader` to the end, or `None` once more than `limit` bytes arrive.
async fn read_limited<R>(reader: R, limit: usize) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;
    if bytes.len() > limit {
        return Ok(None);
    }
    Ok(Some(bytes))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
