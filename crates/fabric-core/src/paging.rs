//! Paged list results.

use serde::{Deserialize, Serialize};

use crate::identifiers::ContinuationToken;

/// One page of a list query.
///
/// Items may be plain records or variant families; families resolve through
/// their own serde impls.
///
/// ```rust
/// use fabric_core::{paging::PagedList, service::ServiceInfo};
/// use serde_json::json;
///
/// let page: PagedList<ServiceInfo> = serde_json::from_value(json!({
///     "ContinuationToken": "",
///     "Items": [{ "ServiceKind": "Stateless", "Name": "fabric:/web/front", "TypeName": "FrontType" }],
/// }))?;
/// assert!(!page.has_more());
/// assert_eq!(page.len(), 1);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "PascalCase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct PagedList<T> {
    #[serde(
        default,
        deserialize_with = "ContinuationToken::deserialize_wire",
        skip_serializing_if = "Option::is_none"
    )]
    pub continuation_token: Option<ContinuationToken>,
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> PagedList<T> {
    /// A final page
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            continuation_token: None,
            items,
        }
    }

    #[must_use]
    pub fn with_continuation_token(mut self, token: ContinuationToken) -> Self {
        self.continuation_token = Some(token);
        self
    }

    /// Whether another page can be requested; depends only on the token
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the paging position
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            continuation_token: self.continuation_token,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
