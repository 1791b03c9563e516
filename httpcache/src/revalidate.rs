//! Conditional requests and `304 Not Modified` merging.

use std::collections::HashSet;

use http::HeaderMap;
use http::header::{
    CONNECTION, CONTENT_LENGTH, ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH,
    LAST_MODIFIED, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRANSFER_ENCODING, UPGRADE,
};

/// Headers that only describe a single connection.
const HOP_BY_HOP: [HeaderName; 8] = [
    CONNECTION,
    HeaderName::from_static("keep-alive"),
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
    TE,
    HeaderName::from_static("trailers"),
    TRANSFER_ENCODING,
    UPGRADE,
];

/// Adds validators of a cached response to an outgoing request.
///
/// Validators the caller already set are left alone.
pub(crate) fn add_conditional_headers(request: &mut HeaderMap, cached: &HeaderMap) {
    if let Some(etag) = cached.get(ETAG)
        && !request.contains_key(IF_NONE_MATCH)
    {
        request.insert(IF_NONE_MATCH, etag.clone());
    }
    if let Some(last_modified) = cached.get(LAST_MODIFIED)
        && !request.contains_key(IF_MODIFIED_SINCE)
    {
        request.insert(IF_MODIFIED_SINCE, last_modified.clone());
    }
}

/// Copies the end-to-end headers of a `304 Not Modified` onto a cached response.
///
/// Each copied header replaces all values of the same name. Hop-by-hop
/// headers, headers named in the 304's `Connection` value and the 304's own
/// `Content-Length` are skipped.
pub(crate) fn merge_not_modified(cached: &mut HeaderMap, not_modified: &HeaderMap) {
    let listed = connection_listed(not_modified);
    for name in not_modified.keys() {
        if HOP_BY_HOP.contains(name) || listed.contains(name) || name == CONTENT_LENGTH {
            continue;
        }
        cached.remove(name);
        for value in not_modified.get_all(name) {
            cached.append(name.clone(), value.clone());
        }
    }
}

fn connection_listed(headers: &HeaderMap) -> HashSet<HeaderName> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}
