use crate::client::HttpClient;
use facegrab_model::{basename, DownloadOutcome, ImageRef};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// Downloads images into a directory, skipping names that already exist.
///
/// A file on disk is taken as complete; it is never re-fetched or
/// overwritten. Within one run, a file name is claimed before the
/// existence check so two concurrent downloads of the same name cannot
/// both write it.
#[derive(Debug)]
pub struct ImageDownloader {
    client: HttpClient,
    dest_dir: PathBuf,
    claims: Mutex<HashSet<PathBuf>>,
    limiter: Option<Semaphore>,
}

impl ImageDownloader {
    pub fn new(
        client: HttpClient,
        dest_dir: impl Into<PathBuf>,
        max_concurrent: Option<usize>,
    ) -> Self {
        Self {
            client,
            dest_dir: dest_dir.into(),
            claims: Mutex::new(HashSet::new()),
            limiter: max_concurrent.map(Semaphore::new),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub async fn download(&self, image: &ImageRef) -> DownloadOutcome {
        self.download_to(&image.url, &self.dest_dir).await
    }

    /// Download `url` into `dir`, named after the URL's final path segment.
    pub async fn download_to(&self, url: &str, dir: &Path) -> DownloadOutcome {
        let Some(file) = basename(url) else {
            tracing::error!(url = %url, "Failed to download {url}: no file name in URL");
            return DownloadOutcome::Failed {
                url: url.to_string(),
                reason: "no file name in URL".to_string(),
            };
        };
        let path = dir.join(file);

        let Some(_claim) = Claim::take(&self.claims, &path) else {
            tracing::info!(file = %file, "Already in progress: {file}");
            return DownloadOutcome::InFlight { file: file.to_string() };
        };

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                tracing::info!(file = %file, "Already exists: {file}");
                return DownloadOutcome::AlreadyExists { file: file.to_string() };
            }
            Ok(false) => {}
            Err(e) => return failed(url, format!("could not check {}: {e}", path.display())),
        }

        let _permit = match &self.limiter {
            Some(limiter) => match limiter.acquire().await {
                Ok(permit) => Some(permit),
                Err(e) => return failed(url, e.to_string()),
            },
            None => None,
        };

        let bytes = match self.client.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => return failed(url, format!("{e:#}")),
        };

        // Not atomic: an interrupted write leaves a truncated file behind.
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            return failed(url, format!("could not write {}: {e}", path.display()));
        }

        tracing::info!(file = %file, bytes = bytes.len(), "Downloaded: {file}");
        DownloadOutcome::Downloaded {
            file: file.to_string(),
            bytes: bytes.len(),
        }
    }
}

fn failed(url: &str, reason: String) -> DownloadOutcome {
    tracing::error!(url = %url, "Failed to download {url}: {reason}");
    DownloadOutcome::Failed {
        url: url.to_string(),
        reason,
    }
}

/// Holds a file name in the claim set until dropped.
struct Claim<'a> {
    claims: &'a Mutex<HashSet<PathBuf>>,
    path: PathBuf,
}

impl<'a> Claim<'a> {
    fn take(claims: &'a Mutex<HashSet<PathBuf>>, path: &Path) -> Option<Self> {
        let mut held = claims.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !held.insert(path.to_path_buf()) {
            return None;
        }
        Some(Self {
            claims,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let mut held = self.claims.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        held.remove(&self.path);
    }
}
