//! Subcategory lookup: `GET {endpoint}?padre_id={id}`.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds: the transport reports a network failure since the endpoint
//! is only reachable from the browser page that embeds it.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors and non-2xx statuses become `NetworkFailure`; bodies that
//! are empty or not a list of `{id, nombre}` records become
//! `MalformedResponse`. Callers never see partial results.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "lookup_test.rs"]
mod lookup_test;

use std::future::Future;

use serde::Deserialize;

use crate::selector::{ChildOption, ParentId};

/// Query parameter naming the parent category.
pub const PARENT_QUERY_PARAM: &str = "padre_id";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Source of child options for a parent selection.
pub trait SubcategoryLookup {
    /// Fetch the children of `parent`, in the order the server returns them.
    fn fetch_children(&self, parent: &ParentId) -> impl Future<Output = Result<Vec<ChildOption>, LookupError>>;
}

/// Lookup over HTTP against the endpoint configured on the page.
#[derive(Clone, Debug)]
pub struct HttpSubcategoryLookup {
    endpoint: String,
}

impl HttpSubcategoryLookup {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubcategoryLookup for HttpSubcategoryLookup {
    async fn fetch_children(&self, parent: &ParentId) -> Result<Vec<ChildOption>, LookupError> {
        let url = lookup_url(&self.endpoint, parent);
        #[cfg(feature = "hydrate")]
        {
            log::debug!("subcategory lookup: GET {url}");
            let resp = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|e| LookupError::NetworkFailure(e.to_string()))?;
            let status = resp.status();
            if !(200..300).contains(&status) {
                return Err(status_failure(status));
            }
            let body = resp
                .text()
                .await
                .map_err(|e| LookupError::NetworkFailure(e.to_string()))?;
            parse_children(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(LookupError::NetworkFailure(format!("{url}: not available outside the browser")))
        }
    }
}

/// Build the request URL for `parent`, appending to any existing query string.
pub fn lookup_url(endpoint: &str, parent: &ParentId) -> String {
    let separator = match endpoint.find('?') {
        None => "?",
        Some(_) if endpoint.ends_with('?') || endpoint.ends_with('&') => "",
        Some(_) => "&",
    };
    let encoded: String = url::form_urlencoded::byte_serialize(parent.as_str().as_bytes()).collect();
    format!("{endpoint}{separator}{PARENT_QUERY_PARAM}={encoded}")
}

#[cfg(any(test, feature = "hydrate"))]
fn status_failure(status: u16) -> LookupError {
    LookupError::NetworkFailure(format!("lookup returned status {status}"))
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct SubcategoryRecord {
    id: RecordId,
    #[serde(rename = "nombre", alias = "displayName")]
    display_name: String,
}

/// Integer primary keys or string ids. Fractional numbers are rejected.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            Self::Signed(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Parse a lookup response body into child options.
///
/// # Errors
///
/// Returns `MalformedResponse` for an empty body, JSON that is not a list of
/// `{id, nombre}` records, or a record with a blank id (it would collide with
/// the sentinel option).
pub fn parse_children(body: &str) -> Result<Vec<ChildOption>, LookupError> {
    if body.trim().is_empty() {
        return Err(LookupError::MalformedResponse("empty body".to_owned()));
    }
    let records: Vec<SubcategoryRecord> =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;
    records
        .into_iter()
        .map(|record| {
            let id = record.id.into_string();
            if id.trim().is_empty() {
                return Err(LookupError::MalformedResponse(format!(
                    "record \"{}\" has a blank id",
                    record.display_name
                )));
            }
            Ok(ChildOption::new(id, record.display_name))
        })
        .collect()
}
