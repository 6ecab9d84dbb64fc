// crates/sensor-registry-core/src/interfaces/paging.rs
// ============================================================================
// Module: Cursor-Based Pagination
// Description: Page shapes, link descriptors, and stateless cursors.
// Purpose: Let paged query results be re-fetched without the original
//          filter payload.
// Dependencies: serde, serde_json, base64, url
// ============================================================================

//! ## Overview
//! A paged query returns a [`Page`]: the page values plus optional
//! `prev`/`next` [`PageLink`] descriptors. Each link is independently
//! resolvable: its href carries a `cursor` query parameter whose token
//! encodes the original filter together with the adjacent page's offset
//! and count, so following a link needs no other request state. Tokens are
//! URL-safe base64 over the cursor's JSON form and are treated as opaque
//! by clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::errors::ErrorKind;
use crate::core::errors::RegistryErrors;
use crate::core::errors::RegistryResult;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of records per page.
pub const DEFAULT_PAGE_COUNT: u64 = 5;

/// Link path for paged sensor-type queries.
pub const SENSOR_TYPES_PATH: &str = "/sensor-types";
/// Link path for paged sensor queries.
pub const SENSORS_PATH: &str = "/sensors";
/// Link path for paged sensor-reading queries.
pub const SENSOR_READINGS_PATH: &str = "/sensor-readings";

/// HTTP method carried by every page link.
const LINK_METHOD: &str = "GET";

// ============================================================================
// SECTION: Page Shapes
// ============================================================================

/// Window selection for a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based record offset of the page start.
    pub offset: u64,
    /// Maximum number of records in the page; must be positive.
    pub count: u64,
}

impl PageRequest {
    /// Selects the first page with the given count.
    #[must_use]
    pub const fn first(count: u64) -> Self {
        Self { offset: 0, count }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_COUNT)
    }
}

/// Fails a paged query with a zero page count.
///
/// # Errors
///
/// Returns `BAD_VAL` when `count` is zero.
pub fn ensure_page_count(count: u64) -> RegistryResult<()> {
    if count == 0 {
        return Err(RegistryErrors::of(
            ErrorKind::BadVal,
            "page count must be greater than zero",
        ));
    }
    Ok(())
}

/// Relation link to an adjacent result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Link relation: `prev` or `next`.
    pub rel: String,
    /// Path plus cursor query parameter for the adjacent page.
    pub href: String,
    /// HTTP method used to resolve the link.
    pub method: String,
}

impl PageLink {
    /// Builds a `prev` relation link.
    #[must_use]
    pub fn prev(href: String) -> Self {
        Self {
            rel: "prev".to_string(),
            href,
            method: LINK_METHOD.to_string(),
        }
    }

    /// Builds a `next` relation link.
    #[must_use]
    pub fn next(href: String) -> Self {
        Self {
            rel: "next".to_string(),
            href,
            method: LINK_METHOD.to_string(),
        }
    }
}

/// One page of query results with optional adjacent-page links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records in this page, in query order.
    pub values: Vec<T>,
    /// Link to the previous page, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    /// Link to the next page, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

// ============================================================================
// SECTION: Cursors
// ============================================================================

/// Stateless cursor combining a filter with a page window.
///
/// # Invariants
/// - Decoding a token yields exactly the filter and window that were
///   encoded; tokens carry no server-side session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor<R> {
    /// The original typed filter request.
    pub filter: R,
    /// Zero-based record offset of the target page.
    pub offset: u64,
    /// Records per page.
    pub count: u64,
}

impl<R> PageCursor<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Encodes the cursor as an opaque URL-safe token.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` when the filter cannot be serialized.
    pub fn token(&self) -> RegistryResult<String> {
        let json = serde_json::to_vec(self).map_err(|err| {
            RegistryErrors::of(ErrorKind::BadVal, format!("cannot encode page cursor: {err}"))
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a cursor from an opaque token.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` when the token is not valid base64 or does not
    /// decode to a cursor for this filter type.
    pub fn from_token(token: &str) -> RegistryResult<Self> {
        let json = URL_SAFE_NO_PAD.decode(token).map_err(|err| {
            RegistryErrors::of(ErrorKind::BadVal, format!("malformed page cursor: {err}"))
        })?;
        serde_json::from_slice(&json).map_err(|err| {
            RegistryErrors::of(ErrorKind::BadVal, format!("malformed page cursor: {err}"))
        })
    }

    /// Builds the href resolving to this cursor's page.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` when the cursor cannot be encoded.
    pub fn href(&self, base_path: &str) -> RegistryResult<String> {
        let token = self.token()?;
        Ok(format!("{base_path}?cursor={token}"))
    }

    /// Re-derives a cursor from a previously issued link href.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` when the href has no `cursor` parameter or the
    /// token is malformed.
    pub fn from_href(href: &str) -> RegistryResult<Self> {
        let Some((_, query)) = href.split_once('?') else {
            return Err(RegistryErrors::of(
                ErrorKind::BadVal,
                format!("page link \"{href}\" has no query string"),
            ));
        };
        let token = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "cursor")
            .map(|(_, value)| value.into_owned());
        match token {
            Some(token) => Self::from_token(&token),
            None => Err(RegistryErrors::of(
                ErrorKind::BadVal,
                format!("page link \"{href}\" has no cursor parameter"),
            )),
        }
    }
}

// ============================================================================
// SECTION: Slice Paginator
// ============================================================================

/// Pages an already-filtered, already-sorted result set.
///
/// Emits a `prev` link when the window starts past the first record and a
/// `next` link when records remain beyond the window. Stores that page
/// natively (SQL `LIMIT`/`OFFSET`) must produce the same links.
///
/// # Errors
///
/// Returns `BAD_VAL` for a zero page count or an unencodable filter.
pub fn paginate<T, R>(
    items: Vec<T>,
    filter: &R,
    page: &PageRequest,
    base_path: &str,
) -> RegistryResult<Page<T>>
where
    R: Serialize + DeserializeOwned + Clone,
{
    ensure_page_count(page.count)?;
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let start = page.offset.min(total);
    let end = page.offset.saturating_add(page.count).min(total);
    // start and end are clamped to the collection length, so the usize
    // conversions cannot actually saturate.
    let values: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(end - start).unwrap_or(usize::MAX))
        .collect();
    let prev = if page.offset > 0 {
        let cursor = PageCursor {
            filter: filter.clone(),
            offset: page.offset.saturating_sub(page.count),
            count: page.count,
        };
        Some(PageLink::prev(cursor.href(base_path)?))
    } else {
        None
    };
    let next = if end < total {
        let cursor = PageCursor {
            filter: filter.clone(),
            offset: end,
            count: page.count,
        };
        Some(PageLink::next(cursor.href(base_path)?))
    } else {
        None
    };
    Ok(Page { values, prev, next })
}
