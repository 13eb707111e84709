use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("body of {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot fetch {url}: {reason}")]
    UnsupportedUrl { url: String, reason: String },
}

/// The network capability: fetch a URL and parse its body as JSON.
///
/// Like a browser `fetch(..).then(r => r.json())`, the response status is not
/// inspected; only the body has to be JSON.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;
        debug!(url = %url, status = response.status().as_u16(), "fetched");

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Serves documents from a local directory tree.
///
/// `file://` URLs are read as-is; for any other URL the path component is
/// looked up under `root`, so `https://host/lp/promo.json` reads
/// `<root>/lp/promo.json`.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn local_path(&self, url: &Url) -> Result<PathBuf, FetchError> {
        if url.scheme() == "file" {
            return url.to_file_path().map_err(|_| FetchError::UnsupportedUrl {
                url: url.to_string(),
                reason: "not a local file path".to_string(),
            });
        }

        let mut path = self.root.clone();
        if let Some(segments) = url.path_segments() {
            for raw in segments.filter(|s| !s.is_empty()) {
                let seg = urlencoding::decode(raw).map_err(|_| FetchError::UnsupportedUrl {
                    url: url.to_string(),
                    reason: "path is not valid UTF-8".to_string(),
                })?;
                if seg == ".." || seg == "." || seg.contains(['/', '\\']) {
                    return Err(FetchError::UnsupportedUrl {
                        url: url.to_string(),
                        reason: "path escapes the document root".to_string(),
                    });
                }
                path.push(&*seg);
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        let path = self.local_path(url)?;
        debug!(url = %url, path = %path.display(), "reading local document");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetcher chosen at runtime from settings / CLI flags.
#[derive(Debug, Clone)]
pub enum AnyFetcher {
    Http(HttpFetcher),
    Dir(DirFetcher),
}

impl AnyFetcher {
    pub fn from_root(root: Option<&Path>) -> Self {
        match root {
            Some(root) => AnyFetcher::Dir(DirFetcher::new(root)),
            None => AnyFetcher::Http(HttpFetcher::new()),
        }
    }
}

#[async_trait]
impl Fetcher for AnyFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        match self {
            AnyFetcher::Http(f) => f.fetch_json(url).await,
            AnyFetcher::Dir(f) => f.fetch_json(url).await,
        }
    }
}
