//! Cursor based pagination over lists and list members.
//!
//! A listing starts from a [`PageRequest`] (page size plus offset). Each
//! returned [`Page`] knows how to produce the [`Cursor`] for the page after
//! it: either the continuation URL the server handed back, or the same
//! request advanced past the items just read. Filtering always happens on
//! the server.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Page size used when none is given.
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest page size the API accepts. Larger requests are clamped.
pub const MAX_LIMIT: u32 = 1000;

/// Page size and offset for an offset-based listing.
///
/// # Examples
///
/// ```
/// use mailgun_lists::PageRequest;
///
/// let first = PageRequest::new(10, 0);
/// let second = first.advance(10);
/// assert_eq!(second.skip, 10);
/// assert_eq!(second.limit, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items per page. Must be non-zero.
    pub limit: u32,
    /// Number of items to skip from the start of the filtered set.
    pub skip: u32,
}

impl PageRequest {
    /// Creates a request for `limit` items after skipping `skip`.
    pub fn new(limit: u32, skip: u32) -> Self {
        Self { limit, skip }
    }

    /// The same page size, moved forward past `count` items.
    pub fn advance(&self, count: usize) -> Self {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            limit: self.limit,
            skip: self.skip.saturating_add(count),
        }
    }

    /// Validates the request and renders it as query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `limit` is zero.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        if self.limit == 0 {
            return Err(Error::validation("limit must be greater than zero"));
        }

        let limit = if self.limit > MAX_LIMIT {
            tracing::debug!(
                requested = self.limit,
                max = MAX_LIMIT,
                "Clamping page size to provider maximum"
            );
            MAX_LIMIT
        } else {
            self.limit
        };

        Ok(vec![
            ("limit".to_string(), limit.to_string()),
            ("skip".to_string(), self.skip.to_string()),
        ])
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// Which members of a list to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionFilter {
    /// Every member regardless of subscription state.
    #[default]
    All,
    /// Only subscribed members.
    Subscribed,
    /// Only unsubscribed members.
    Unsubscribed,
}

impl SubscriptionFilter {
    /// The `subscribed` query value, or `None` when no filtering applies.
    pub(crate) fn query_value(&self) -> Option<&'static str> {
        match self {
            SubscriptionFilter::All => None,
            SubscriptionFilter::Subscribed => Some("yes"),
            SubscriptionFilter::Unsubscribed => Some("no"),
        }
    }
}

/// Where the next page of a listing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// An explicit page size and offset.
    Offset(PageRequest),
    /// A continuation URL returned by the server in `paging`.
    ///
    /// Its query parameters are opaque and already carry any filter the
    /// listing was started with.
    Continuation(Url),
}

impl Cursor {
    /// The query parameters to send for this cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an offset cursor with a zero limit.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        match self {
            Cursor::Offset(request) => request.query_pairs(),
            Cursor::Continuation(url) => Ok(url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()),
        }
    }

    /// The API path this cursor reads from.
    ///
    /// Offset cursors read from `path`. Continuation cursors read from the
    /// path of the URL the server handed back, relative to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a continuation URL points at another
    /// host or outside the base path.
    pub(crate) fn request_path(&self, base: &Url, path: String) -> Result<String> {
        let url = match self {
            Cursor::Offset(_) => return Ok(path),
            Cursor::Continuation(url) => url,
        };

        let outside = || {
            Error::validation(format!(
                "continuation URL '{}' is outside the API at '{}'",
                url, base
            ))
        };
        if url.origin() != base.origin() {
            return Err(outside());
        }

        let prefix = base.path().trim_end_matches('/');
        match url.path().strip_prefix(prefix) {
            Some(rest) if rest.starts_with('/') && rest.len() > 1 => Ok(rest.to_string()),
            _ => Err(outside()),
        }
    }

    /// Returns `true` for a continuation cursor.
    pub fn is_continuation(&self) -> bool {
        matches!(self, Cursor::Continuation(_))
    }
}

impl From<PageRequest> for Cursor {
    fn from(request: PageRequest) -> Self {
        Cursor::Offset(request)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::Offset(PageRequest::default())
    }
}

/// Page locators returned alongside a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// URL of the first page.
    #[serde(default)]
    pub first: Option<String>,
    /// URL of the last page.
    #[serde(default)]
    pub last: Option<String>,
    /// URL of the page after this one.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the page before this one.
    #[serde(default)]
    pub previous: Option<String>,
}

/// One page of a collection.
///
/// `total_count` describes the whole filtered set, not this page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Size of the whole filtered set.
    #[serde(default)]
    pub total_count: u64,
    /// Items on this page, in server order.
    #[serde(default)]
    pub items: Vec<T>,
    /// Page locators, when the server sends them.
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    /// The cursor for the page after this one, or `None` when this page
    /// was the last.
    ///
    /// An empty page always ends the listing. A server supplied `next` URL
    /// wins over offset arithmetic.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgun_lists::{Cursor, Page, PageRequest};
    ///
    /// let page = Page { total_count: 3, items: vec!["a", "b"], paging: None };
    /// let current = Cursor::Offset(PageRequest::new(2, 0));
    /// assert_eq!(
    ///     page.next_cursor(&current),
    ///     Some(Cursor::Offset(PageRequest::new(2, 2)))
    /// );
    /// ```
    pub fn next_cursor(&self, current: &Cursor) -> Option<Cursor> {
        if self.items.is_empty() {
            return None;
        }

        let continuation = self
            .paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .and_then(|next| Url::parse(next).ok())
            .map(Cursor::Continuation)
            .filter(|next| next != current);
        if continuation.is_some() {
            return continuation;
        }

        match current {
            Cursor::Offset(request) => {
                let consumed = u64::from(request.skip) + self.items.len() as u64;
                (consumed < self.total_count)
                    .then(|| Cursor::Offset(request.advance(self.items.len())))
            }
            Cursor::Continuation(_) => None,
        }
    }
}
