//! Image reference parsing.

use std::fmt;

use berth_common::constants::DEFAULT_IMAGE_TAG;

use crate::error::{Result, RuntimeError};

/// A parsed image reference such as `nginx`, `nginx:1.27`,
/// `registry.local:5000/team/app:v2` or `alpine@sha256:...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Repository, including any registry host and port.
    pub repository: String,
    /// Tag, if one was given.
    pub tag: Option<String>,
    /// Digest, if one was given.
    pub digest: Option<String>,
}

impl ImageRef {
    /// Parses an image reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is empty, contains whitespace, or
    /// has an empty repository, tag, or digest.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || RuntimeError::InvalidImage {
            reference: reference.to_string(),
        };
        if reference.is_empty() || reference.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let (name, digest) = match reference.split_once('@') {
            Some((name, digest)) => (name, Some(digest)),
            None => (reference, None),
        };

        // Colons before the last `/` belong to a registry port.
        let path_start = name.rfind('/').map_or(0, |i| i + 1);
        let (repository, tag) = match name[path_start..].rfind(':') {
            Some(i) => (
                &name[..path_start + i],
                Some(&name[path_start + i + 1..]),
            ),
            None => (name, None),
        };

        if repository.is_empty() || tag == Some("") || digest == Some("") {
            return Err(invalid());
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
            digest: digest.map(str::to_string),
        })
    }

    /// Tag or digest to request from the registry.
    ///
    /// Falls back to `latest` so that a bare repository never pulls every tag.
    #[must_use]
    pub fn pull_tag(&self) -> &str {
        self.digest
            .as_deref()
            .or(self.tag.as_deref())
            .unwrap_or(DEFAULT_IMAGE_TAG)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}
