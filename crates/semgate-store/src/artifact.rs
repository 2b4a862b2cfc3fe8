//! Artifact references as given on the command line.

use crate::errors::{unsupported_scheme, Result};
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an artifact comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    Local(PathBuf),
    Remote(Url),
}

impl ArtifactLocation {
    /// Interpret a user-supplied location.
    ///
    /// `file:` URLs become local paths; `http:` and `https:` URLs are
    /// fetched. Anything else without `://` is a local path, including names
    /// with a colon (`build:1/old.jar`) and Windows drive paths.
    ///
    /// # Errors
    ///
    /// `ERR_UNSUPPORTED_SCHEME` for any other `scheme://` URL, or a `file:`
    /// URL that does not name a local path.
    pub fn parse(input: &str) -> Result<Self> {
        let url = match Url::parse(input) {
            Ok(url) if url.scheme().len() > 1 => url,
            _ => return Ok(ArtifactLocation::Local(PathBuf::from(input))),
        };

        match url.scheme() {
            "file" => url
                .to_file_path()
                .map(ArtifactLocation::Local)
                .map_err(|_| unsupported_scheme(input, "file")),
            "http" | "https" => Ok(ArtifactLocation::Remote(url)),
            other if input.contains("://") => Err(unsupported_scheme(input, other)),
            _ => Ok(ArtifactLocation::Local(PathBuf::from(input))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ArtifactLocation::Remote(_))
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactLocation::Local(path) => write!(f, "{}", path.display()),
            ArtifactLocation::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// A binary archive plus its declared version.
///
/// Built from user input, staged once by the resolver, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    location: ArtifactLocation,
    staged: Option<PathBuf>,
    version: String,
}

impl Artifact {
    pub fn new(location: ArtifactLocation, version: impl Into<String>) -> Self {
        Self {
            location,
            staged: None,
            version: version.into(),
        }
    }

    pub fn location(&self) -> &ArtifactLocation {
        &self.location
    }

    /// Local file holding the artifact, once resolved
    pub fn staged_path(&self) -> Option<&Path> {
        self.staged.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn staged_at(mut self, path: PathBuf) -> Self {
        self.staged = Some(path);
        self
    }
}
