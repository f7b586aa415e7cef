//! ETags for room snapshots, so polling clients can skip unchanged state.

/// Strong ETag for a room at a given lock version:
/// `"room-{code}-v{version}"`, quotes included.
///
/// ```
/// # use farkle::http::etag::room_etag;
/// assert_eq!(room_etag("K7M2QX", 5), r#""room-K7M2QX-v5""#);
/// ```
pub fn room_etag(code: &str, version: i32) -> String {
    format!(r#""room-{code}-v{version}""#)
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Handles `*`, comma-separated lists and weak validators (`W/`), which
/// compare equal under the weak comparison GET uses.
pub fn if_none_match_hits(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}
