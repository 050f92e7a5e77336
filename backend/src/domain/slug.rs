//! URL-safe listing slugs.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. New slugs are derived from the listing
//! title plus a short random suffix so retitled listings keep their
//! original address and concurrent sellers rarely collide.

use std::fmt;

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Length of the random suffix appended to generated slugs.
const SLUG_SUFFIX_LEN: usize = 6;

/// Base used when a title contains no ASCII alphanumerics at all.
const SLUG_FALLBACK_BASE: &str = "listing";

/// Validation errors returned by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    Empty,
    InvalidCharacters,
}

impl fmt::Display for SlugValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "slug must not be empty"),
            Self::InvalidCharacters => write!(
                f,
                "slug may only contain lowercase ASCII letters, digits, or hyphens",
            ),
        }
    }
}

impl std::error::Error for SlugValidationError {}

/// Return `true` when `value` is a valid listing slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Stable, URL-safe listing identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a [`Slug`] from existing input.
    pub fn new(slug: impl Into<String>) -> Result<Self, SlugValidationError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if !is_valid_slug(&slug) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(slug))
    }

    /// Derive a fresh slug from a listing title.
    ///
    /// The title is lowercased and non-alphanumeric runs collapse into
    /// single hyphens; a random six-character suffix keeps near-identical
    /// titles from colliding. Titles without ASCII alphanumerics fall back
    /// to a generic base.
    pub fn generate(title: &str, rng: &mut impl Rng) -> Self {
        let mut base = slugify(title);
        if base.is_empty() {
            base = SLUG_FALLBACK_BASE.to_owned();
        }
        let suffix: String = rng
            .sample_iter(&Alphanumeric)
            .take(SLUG_SUFFIX_LEN)
            .map(|byte| char::from(byte.to_ascii_lowercase()))
            .collect();
        Self(format!("{base}-{suffix}"))
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
