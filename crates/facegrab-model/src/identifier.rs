use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier '{0}' contains a path separator")]
    PathSeparator(String),
}

/// A team or face token (numeric in practice, e.g. "2000276779").
///
/// Identifiers are templated into image URLs and end up as local file
/// names, so they are guaranteed non-empty and free of `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn new(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if trimmed.contains('/') {
            return Err(IdentifierError::PathSeparator(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derive an identifier from an image `src` attribute.
    ///
    /// Takes the last `/`-separated segment and cuts it at the first `.`,
    /// so `/uploads/iconface/2000123.png` yields `2000123`.
    pub fn from_image_src(src: &str) -> Result<Self, IdentifierError> {
        let last = src.rsplit('/').next().unwrap_or(src);
        let stem = last.split('.').next().unwrap_or(last);
        Self::new(stem)
    }

    /// Derive an identifier from the final path segment of a team page URL.
    pub fn from_page_url(url: &Url) -> Result<Self, IdentifierError> {
        let last = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");
        Self::new(last)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}
