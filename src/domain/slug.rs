// Copyright (c) 2025 - Cowboy AI, Inc.
//! Slug Value Object with Naming Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Slug validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("Name is empty after slugification: {0:?}")]
    Empty(String),
}

/// Slugified identifier value object
///
/// Every component of a machine, network or interface name is a slug.
/// Invariants:
/// - Non-empty
/// - ASCII lowercase letters and digits only
///
/// # Examples
///
/// ```rust
/// use cyber_range_topology::domain::Slug;
///
/// let slug = Slug::new("Web Server_01").unwrap();
/// assert_eq!(slug.as_str(), "webserver01");
///
/// assert!(Slug::new("").is_err());
/// assert!(Slug::new("--- ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Slugify and validate a raw name
    ///
    /// Runs of characters outside `[a-zA-Z0-9]` are stripped and the result is
    /// lower-cased.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SlugError> {
        let raw = raw.as_ref();
        let slug: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if slug.is_empty() {
            return Err(SlugError::Empty(raw.to_string()));
        }

        Ok(Self(slug))
    }

    /// Whether `raw` is already in canonical slug form
    pub fn is_canonical(raw: &str) -> bool {
        !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    /// Get the slug as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Slug {
    type Error = SlugError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
