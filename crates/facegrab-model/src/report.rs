use serde::{Deserialize, Serialize};

/// Result of a single image download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Fetched and written to disk.
    Downloaded { file: String, bytes: usize },
    /// A file with this name was already present; no request was made.
    AlreadyExists { file: String },
    /// Another download in this run already claimed the file name.
    ///
    /// Counted as a skip without waiting for the claiming download. If that
    /// download fails, no file exists even though this entry reports a skip.
    InFlight { file: String },
    /// Fetch or write failed; no file was created.
    Failed { url: String, reason: String },
}

impl DownloadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DownloadOutcome::Failed { .. })
    }
}

/// Totals for one crawl or CSV run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub source: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub downloaded: usize,
    pub bytes_written: usize,
    pub already_present: usize,
    pub in_flight_duplicates: usize,
    pub failed: Vec<FailedDownload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDownload {
    pub url: String,
    pub reason: String,
}

impl RunReport {
    pub fn new(source: impl Into<String>, started_at: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            started_at: started_at.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_written += bytes;
            }
            DownloadOutcome::AlreadyExists { .. } => self.already_present += 1,
            DownloadOutcome::InFlight { .. } => self.in_flight_duplicates += 1,
            DownloadOutcome::Failed { url, reason } => {
                self.failed.push(FailedDownload { url, reason });
            }
        }
    }

    pub fn record_all(&mut self, outcomes: impl IntoIterator<Item = DownloadOutcome>) {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    /// Number of image downloads that were attempted or skipped.
    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.in_flight_duplicates + self.failed.len()
    }

    pub fn finish(&mut self, finished_at: impl Into<String>) {
        self.finished_at = Some(finished_at.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_outcome() {
        let mut report = RunReport::new("https://example.com/teams", "2026-01-01T00:00:00Z");
        report.record_all([
            DownloadOutcome::Downloaded { file: "1.png".into(), bytes: 10 },
            DownloadOutcome::Downloaded { file: "2.png".into(), bytes: 5 },
            DownloadOutcome::AlreadyExists { file: "3.png".into() },
            DownloadOutcome::InFlight { file: "3.png".into() },
            DownloadOutcome::Failed { url: "https://x/4.png".into(), reason: "HTTP 404".into() },
        ]);

        assert_eq!(report.downloaded, 2);
        assert_eq!(report.bytes_written, 15);
        assert_eq!(report.already_present, 1);
        assert_eq!(report.in_flight_duplicates, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.total(), 5);
    }

    #[test]
    fn test_outcome_json_tagging() {
        let json = serde_json::to_string(&DownloadOutcome::AlreadyExists { file: "7.png".into() })
            .unwrap();
        assert_eq!(json, r#"{"status":"already_exists","file":"7.png"}"#);
    }
}
