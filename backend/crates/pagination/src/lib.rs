//! Opaque cursor and pagination envelope primitives shared by list
//! endpoints.
//!
//! A [`Page`] describes a validated limit/offset window. Cursors are the
//! window serialized to JSON and wrapped in URL-safe base64 so clients
//! treat them as opaque tokens. [`Paginated`] is the response envelope
//! carrying a window of items together with the total collection size,
//! and [`page_links`] derives ready-made navigation URLs from it.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use url::Url;

/// Window size applied when a request does not specify one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper bound on the number of items a single window may span.
pub const MAX_LIMIT: u32 = 100;

/// Rejection raised when a requested window is out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageValidationError {
    /// The requested limit was zero, which would never make progress.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested limit exceeded [`MAX_LIMIT`].
    #[error("limit must not exceed {MAX_LIMIT}")]
    LimitTooLarge,
}

/// Rejection raised when an opaque cursor cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorDecodeError {
    /// The cursor was not valid URL-safe base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// The decoded bytes did not describe a pagination window.
    #[error("cursor payload is malformed")]
    Payload,
    /// The decoded window failed validation.
    #[error(transparent)]
    Window(#[from] PageValidationError),
}

/// A validated limit/offset window over an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    limit: u32,
    offset: u64,
}

impl Page {
    /// Validate and construct a window.
    ///
    /// # Errors
    ///
    /// Returns [`PageValidationError`] when `limit` is zero or exceeds
    /// [`MAX_LIMIT`].
    pub const fn new(limit: u32, offset: u64) -> Result<Self, PageValidationError> {
        if limit == 0 {
            return Err(PageValidationError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageValidationError::LimitTooLarge);
        }
        Ok(Self { limit, offset })
    }

    /// Build a window from optional query parameters, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PageValidationError`] when a supplied `limit` is out of
    /// bounds; absent parameters fall back to [`DEFAULT_LIMIT`] and
    /// offset 0.
    pub fn from_query(limit: Option<u32>, offset: Option<u64>) -> Result<Self, PageValidationError> {
        Self::new(limit.unwrap_or(DEFAULT_LIMIT), offset.unwrap_or(0))
    }

    /// Number of items the window spans.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// The window immediately after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(u64::from(self.limit)),
        }
    }

    /// The window immediately before this one, if any.
    #[must_use]
    pub fn prev(&self) -> Option<Self> {
        if self.offset == 0 {
            return None;
        }
        Some(Self {
            limit: self.limit,
            offset: self.offset.saturating_sub(u64::from(self.limit)),
        })
    }

    /// Serialise the window into an opaque URL-safe cursor token.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = serde_json::to_vec(self).unwrap_or_else(|_| b"{}".to_vec());
        URL_SAFE_NO_PAD.encode(payload)
    }

    /// Decode a cursor token produced by [`Page::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorDecodeError`] when the token is not base64, does
    /// not contain a window payload, or describes an out-of-bounds
    /// window.
    pub fn decode(cursor: &str) -> Result<Self, CursorDecodeError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor)
            .map_err(|_| CursorDecodeError::Encoding)?;
        let raw: Self = serde_json::from_slice(&bytes).map_err(|_| CursorDecodeError::Payload)?;
        Ok(Self::new(raw.limit, raw.offset)?)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Response envelope carrying one window of an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// The items within the requested window, in collection order.
    pub items: Vec<T>,
    /// Total number of items in the collection, not just this window.
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Wrap a window of items with the collection total.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Transform each item while preserving the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Whether items remain beyond the supplied window.
    #[must_use]
    pub fn has_more(&self, page: &Page) -> bool {
        let seen = page.offset().saturating_add(u64::from(page.limit()));
        seen < self.total
    }
}

/// Navigation links derived from a window and a collection total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// URL of the following window, absent on the final page.
    pub next: Option<String>,
    /// URL of the preceding window, absent on the first page.
    pub prev: Option<String>,
}

/// Derive `next`/`prev` URLs for a window within a collection.
///
/// Existing `limit`, `offset`, and `cursor` query parameters on `base`
/// are replaced; all other parameters are preserved.
#[must_use]
pub fn page_links(base: &Url, page: &Page, total: u64) -> PageLinks {
    let has_next = page.offset().saturating_add(u64::from(page.limit())) < total;
    let next = has_next.then(|| String::from(with_window(base, &page.next())));
    let prev = page
        .prev()
        .map(|window| String::from(with_window(base, &window)));
    PageLinks { next, prev }
}

fn with_window(base: &Url, page: &Page) -> Url {
    let mut url = base.clone();
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "limit" && key != "offset" && key != "cursor")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.set_query(None);
    {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("limit", &page.limit().to_string());
        serializer.append_pair("offset", &page.offset().to_string());
    }
    url
}
