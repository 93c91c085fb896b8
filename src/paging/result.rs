use serde::{Deserialize, Serialize};

use super::PageToken;

/// A page of data elements together with an optional [`PageToken`] that can
/// be used to request the next page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// The page of result rows, in query order.
    pub data: Vec<T>,
    /// Continuation token; `None` means no further pages.
    pub page_token: Option<PageToken>,
}

impl<T> PagedResult<T> {
    /// Pairs a data page with an explicit continuation token.
    #[must_use]
    pub fn new(data: Vec<T>, page_token: Option<PageToken>) -> Self {
        Self { data, page_token }
    }

    /// Builds a [`PagedResult`] from a page of data and a callback deriving
    /// the continuation token from the page's last element. An empty page
    /// carries no token.
    #[must_use]
    pub fn from_page<F>(data: Vec<T>, token_for: F) -> Self
    where
        F: FnOnce(&T) -> Option<PageToken>,
    {
        let page_token = data.last().and_then(token_for);
        Self { data, page_token }
    }
}
