//! Page-number pagination over the listing endpoints.
//!
//! The service has no total count or "has more" flag: listing is exhausted on
//! the first page that yields no ids.

use std::{collections::BTreeSet, future::Future};

use thiserror::Error;

use crate::{ids::PageId, observability::PROGRESS_LEVEL};

/// A listing kept returning ids past the largest representable page cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{listing} listing never returned an empty page (last page_id {last_page})")]
pub struct PageLimitExceeded {
    pub listing: String,
    pub last_page: PageId,
}

/// Fetch pages `0, 1, 2, ...` until one comes back empty, unioning every id.
///
/// The empty page is the last request made. The first fetch error is
/// returned as-is and the ids gathered so far are dropped.
pub async fn collect_pages<T, E, F, Fut>(label: &str, fetch: F) -> Result<BTreeSet<T>, E>
where
    T: Ord,
    E: From<PageLimitExceeded>,
    F: FnMut(PageId) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    collect_pages_from(label, PageId::FIRST, fetch).await
}

async fn collect_pages_from<T, E, F, Fut>(
    label: &str,
    first: PageId,
    mut fetch: F,
) -> Result<BTreeSet<T>, E>
where
    T: Ord,
    E: From<PageLimitExceeded>,
    F: FnMut(PageId) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut collected = BTreeSet::new();
    let mut page = first;

    loop {
        let ids: BTreeSet<T> = fetch(page).await?.into_iter().collect();
        if ids.is_empty() {
            tracing::trace!(listing = label, page_id = page.0, "Reached empty page");
            break;
        }

        let page_len = ids.len();
        collected.extend(ids);
        tracing::event!(
            PROGRESS_LEVEL,
            listing = label,
            page_id = page.0,
            page_len,
            total = collected.len(),
            "Fetched page"
        );

        page = page.next().ok_or_else(|| PageLimitExceeded {
            listing: label.to_string(),
            last_page: page,
        })?;
    }

    Ok(collected)
}
