//! Remote texture retrieval

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Default texture host: vanilla entity textures.
pub const DEFAULT_BASE_URL: &str =
    "https://assets.mcasset.cloud/latest/assets/minecraft/textures/entity";

/// A non-404 failure while fetching a texture.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection, body read)
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    /// Server answered with an error status other than 404
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// Local texture file could not be read
    #[error("failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where texture bytes come from.
///
/// `Ok(None)` means "not found here", which lets the caller try the next
/// candidate. Any `Err` ends the request.
pub trait TextureSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Option<Vec<u8>>, FetchError>> + Send;
}

/// Fetches textures over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpTextureSource {
    client: reqwest::Client,
}

impl HttpTextureSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextureSource for HttpTextureSource {
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        debug!(url, "fetching texture");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request { url: url.to_string(), message: e.to_string() })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request { url: url.to_string(), message: e.to_string() })?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Serves one local texture file for every location.
///
/// Used by `pixelface render --texture` to run the pipeline offline.
#[derive(Debug, Clone)]
pub struct FileTextureSource {
    path: PathBuf,
}

impl FileTextureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextureSource for FileTextureSource {
    async fn fetch(&self, _url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FetchError::File { path: self.path.clone(), source }),
        }
    }
}

/// Candidate texture URLs in the order they are tried: the resolved asset
/// path first, then the bare name. Duplicates are dropped.
pub fn texture_urls(base_url: &str, asset_path: &str, name: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let primary = format!("{}/{}.png", base, asset_path);
    let fallback = format!("{}/{}.png", base, name);
    if primary == fallback {
        vec![primary]
    } else {
        vec![primary, fallback]
    }
}
