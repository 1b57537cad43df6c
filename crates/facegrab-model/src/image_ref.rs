use crate::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const DEFAULT_IMAGE_BASE: &str = "https://sortitoutsi.b-cdn.net/uploads";

/// Which upload folder an image lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Team crest, keyed by the team page's final path segment.
    Team,
    /// Player face, keyed by the `iconface` thumbnail name.
    Face,
}

impl ImageKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            ImageKind::Team => "team",
            ImageKind::Face => "face",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A concrete image to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub kind: ImageKind,
    pub id: Identifier,
    pub url: String,
}

impl ImageRef {
    /// Local file name for this image.
    pub fn file_name(&self) -> Option<&str> {
        basename(&self.url)
    }
}

/// Builds image URLs of the form `<base>/<kind>/<id>.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEndpoint {
    base: String,
}

impl ImageEndpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn image(&self, kind: ImageKind, id: &Identifier) -> ImageRef {
        ImageRef {
            kind,
            id: id.clone(),
            url: format!("{}/{}/{}.png", self.base, kind.path_segment(), id),
        }
    }

    pub fn team(&self, id: &Identifier) -> ImageRef {
        self.image(ImageKind::Team, id)
    }

    pub fn face(&self, id: &Identifier) -> ImageRef {
        self.image(ImageKind::Face, id)
    }
}

impl Default for ImageEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}

/// Final path segment of a URL, ignoring any query string or fragment.
///
/// Returns `None` when the path ends in `/` (nothing to name a file after).
pub fn basename(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment.split('?').next().unwrap_or(without_fragment);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}
