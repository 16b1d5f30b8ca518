//! Artifact source resolution: local files and remote URIs.
//!
//! Remote artifacts are downloaded once and cached on disk under a file
//! named after the SHA-256 of the URI, so restarts reuse the cached copy.

use std::fmt;
use std::path::{Path, PathBuf};

use hex::ToHex;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ModelError;

/// Where a model artifact is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Local filesystem path.
    File(PathBuf),
    /// `http://` or `https://` URL.
    Uri(String),
}

/// Raw artifact bytes with provenance.
#[derive(Debug, Clone)]
pub struct FetchedArtifact {
    /// Artifact contents.
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, lowercase hex.
    pub sha256: String,
    /// Whether a remote artifact was served from the disk cache.
    pub from_cache: bool,
}

/// Computes the SHA-256 of `bytes` as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().encode_hex::<String>()
}

impl ModelSource {
    /// Interprets a configuration value as a file path or URL.
    ///
    /// `file://` prefixes are stripped.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if is_url(value) {
            Self::Uri(value.to_string())
        } else {
            let path = value.strip_prefix("file://").unwrap_or(value);
            Self::File(PathBuf::from(path))
        }
    }

    /// Reads the artifact, downloading and caching it first if remote.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Io` on filesystem failures and
    /// `ModelError::Fetch` on HTTP failures.
    pub async fn fetch(&self, cache_dir: &Path) -> Result<FetchedArtifact, ModelError> {
        match self {
            Self::File(path) => {
                let bytes = read_file(path).await?;
                Ok(FetchedArtifact {
                    sha256: sha256_hex(&bytes),
                    bytes,
                    from_cache: false,
                })
            }
            Self::Uri(uri) => {
                let cached = cache_file(cache_dir, uri);
                if tokio::fs::try_exists(&cached).await.unwrap_or(false) {
                    debug!(%uri, path = %cached.display(), "using cached model artifact");
                    let bytes = read_file(&cached).await?;
                    return Ok(FetchedArtifact {
                        sha256: sha256_hex(&bytes),
                        bytes,
                        from_cache: true,
                    });
                }

                info!(%uri, "downloading model artifact");
                let bytes = download(uri).await?;
                store_in_cache(&cached, &bytes).await?;
                info!(%uri, bytes = bytes.len(), path = %cached.display(), "model artifact cached");
                Ok(FetchedArtifact {
                    sha256: sha256_hex(&bytes),
                    bytes,
                    from_cache: false,
                })
            }
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Uri(uri) => f.write_str(uri),
        }
    }
}

fn cache_file(cache_dir: &Path, uri: &str) -> PathBuf {
    cache_dir.join(format!("{}.model", sha256_hex(uri.as_bytes())))
}

/// Returns `true` if the given source string looks like a URL.
fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ModelError> {
    tokio::fs::read(path).await.map_err(|e| ModelError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Fetches raw bytes from a URL.
async fn download(uri: &str) -> Result<Vec<u8>, ModelError> {
    let fetch_err = |reason: String| ModelError::Fetch {
        uri: uri.to_string(),
        reason,
    };
    let resp = reqwest::get(uri)
        .await
        .map_err(|e| fetch_err(format!("HTTP request failed: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_err(format!("HTTP {status}")));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| fetch_err(format!("failed to read body: {e}")))?;
    Ok(bytes.to_vec())
}

/// Writes `bytes` to `path` through a temporary sibling and a rename.
async fn store_in_cache(path: &Path, bytes: &[u8]) -> Result<(), ModelError> {
    let io_err = |source: std::io::Error| ModelError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let tmp = path.with_extension("partial");
    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}
