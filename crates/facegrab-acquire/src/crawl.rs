use crate::client::HttpClient;
use crate::config::AcquireConfig;
use crate::download::ImageDownloader;
use crate::extract;
use anyhow::{Context, Result};
use facegrab_model::{DownloadOutcome, Identifier, ImageEndpoint, RunReport};
use futures::future::join_all;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to retrieve the base webpage: {0}")]
    BaseUnavailable(String),
}

/// What happened to one team page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Fetch failed or the body was empty; nothing was scheduled.
    Unavailable,
    /// One outcome per face image found on the page.
    Processed(Vec<DownloadOutcome>),
}

/// Drives a crawl or an identifier list through the downloader.
///
/// All work a run discovers is launched at once and awaited together;
/// one failed fetch never cancels its siblings.
#[derive(Debug)]
pub struct Crawler {
    client: HttpClient,
    endpoint: ImageEndpoint,
    downloader: ImageDownloader,
}

impl Crawler {
    /// Build a crawler, creating the destination directory if needed.
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.dest_dir).with_context(|| {
            format!("Failed to create output directory {}", config.dest_dir.display())
        })?;

        let client = HttpClient::new(config)?;
        let downloader =
            ImageDownloader::new(client.clone(), &config.dest_dir, config.max_concurrent);

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            downloader,
        })
    }

    pub fn downloader(&self) -> &ImageDownloader {
        &self.downloader
    }

    /// Crawl the team listing at `base_url`.
    ///
    /// For every `item-title` link, downloads the team image and processes
    /// the team page concurrently. Failing to fetch the listing itself is
    /// the only error returned; it is left to the caller to log.
    pub async fn run(&self, base_url: &str) -> Result<RunReport, CrawlError> {
        let base = Url::parse(base_url).map_err(|source| CrawlError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let mut report = RunReport::new(base_url, now());

        let html = match self.client.fetch_text(base.as_str()).await {
            Some(html) if !html.is_empty() => html,
            _ => return Err(CrawlError::BaseUnavailable(base.to_string())),
        };
        report.pages_fetched += 1;

        let links = extract::team_links(&html, &base);
        if links.is_empty() {
            tracing::error!(url = %base, "No team links found on {base}");
            report.finish(now());
            return Ok(report);
        }
        tracing::info!(teams = links.len(), "Found team links");

        let teams = join_all(links.iter().map(|link| self.process_team(link))).await;
        for (team_image, page) in teams {
            if let Some(outcome) = team_image {
                report.record(outcome);
            }
            match page {
                PageOutcome::Unavailable => report.pages_failed += 1,
                PageOutcome::Processed(outcomes) => {
                    report.pages_fetched += 1;
                    report.record_all(outcomes);
                }
            }
        }

        report.finish(now());
        log_summary(&report);
        Ok(report)
    }

    /// Team image download and team page processing, run side by side.
    async fn process_team(&self, link: &Url) -> (Option<DownloadOutcome>, PageOutcome) {
        let team_image = async {
            match Identifier::from_page_url(link) {
                Ok(id) => Some(self.downloader.download(&self.endpoint.team(&id)).await),
                Err(e) => {
                    tracing::warn!(url = %link, "No team identifier in link: {e}");
                    None
                }
            }
        };

        futures::join!(team_image, self.process_team_page(link))
    }

    /// Fetch one team page and download every face image on it.
    pub async fn process_team_page(&self, team_url: &Url) -> PageOutcome {
        let html = match self.client.fetch_text(team_url.as_str()).await {
            Some(html) if !html.is_empty() => html,
            _ => return PageOutcome::Unavailable,
        };

        let faces: Vec<_> = extract::face_ids(&html)
            .iter()
            .map(|id| self.endpoint.face(id))
            .collect();
        tracing::info!(url = %team_url, faces = faces.len(), "Processing team page");

        let outcomes = join_all(faces.iter().map(|face| self.downloader.download(face))).await;
        PageOutcome::Processed(outcomes)
    }

    /// Download the face image of every identifier in `ids`.
    pub async fn run_ids(&self, source: &str, ids: &[Identifier]) -> RunReport {
        let mut report = RunReport::new(source, now());
        if ids.is_empty() {
            tracing::error!(source = %source, "No Unique IDs found in {source}");
            report.finish(now());
            return report;
        }
        tracing::info!(ids = ids.len(), "Downloading face images");

        let faces: Vec<_> = ids.iter().map(|id| self.endpoint.face(id)).collect();
        let outcomes = join_all(faces.iter().map(|face| self.downloader.download(face))).await;
        report.record_all(outcomes);

        report.finish(now());
        log_summary(&report);
        report
    }
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        downloaded = report.downloaded,
        already_present = report.already_present,
        duplicates = report.in_flight_duplicates,
        failed = report.failed.len(),
        pages_failed = report.pages_failed,
        "Run complete"
    );
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
