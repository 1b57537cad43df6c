use facegrab_model::{ImageEndpoint, DEFAULT_IMAGE_BASE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "facegrab/0.1 (team and face image downloader)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireConfig {
    /// Directory downloaded images are written to. Created if absent.
    pub dest_dir: PathBuf,
    /// Prefix for `<base>/team/<id>.png` and `<base>/face/<id>.png`.
    pub image_base: String,
    pub user_agent: String,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Upper bound on simultaneous image downloads; `None` launches everything at once.
    pub max_concurrent: Option<usize>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from("."),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            max_concurrent: None,
        }
    }
}

impl AcquireConfig {
    pub fn with_dest_dir(mut self, dest_dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dest_dir.into();
        self
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// A cap of zero is treated as "no cap".
    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent.filter(|&n| n > 0);
        self
    }

    pub fn endpoint(&self) -> ImageEndpoint {
        ImageEndpoint::new(self.image_base.as_str())
    }
}
