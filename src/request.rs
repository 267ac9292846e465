//! Incoming request plumbing: the body type the context carries and the
//! parsing of the request target into path and query.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::combinators::UnsyncBoxBody;

use crate::error::BoxError;

/// Type-erased request body.
///
/// hyper's `Incoming` in production, `Full<Bytes>` in tests. Only `Send` is
/// required: the body is owned by exactly one request task.
pub type RequestBody = UnsyncBoxBody<Bytes, BoxError>;

/// Erases any body into a [`RequestBody`].
pub(crate) fn boxed<B>(body: B) -> RequestBody
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    body.map_err(Into::into).boxed_unsync()
}

/// Splits a request target into its path and its decoded query mapping.
///
/// The path is returned as received (no percent-decoding). Query pairs are
/// form-decoded; when a key repeats, the last occurrence wins.
pub(crate) fn parse_target(uri: &http::Uri) -> (String, HashMap<String, String>) {
    let pathname = match uri.path() {
        "" => "/".to_owned(),
        p  => p.to_owned(),
    };
    let query = uri.query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    (pathname, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(target: &str) -> (String, HashMap<String, String>) {
        parse_target(&target.parse().unwrap())
    }

    #[test]
    fn splits_path_and_query() {
        let (path, query) = parse("/artists?sort=name&limit=10");
        assert_eq!(path, "/artists");
        assert_eq!(query.get("sort").map(String::as_str), Some("name"));
        assert_eq!(query.get("limit").map(String::as_str), Some("10"));
    }

    #[test]
    fn last_duplicate_key_wins() {
        let (_, query) = parse("/x?tag=a&tag=b&tag=c");
        assert_eq!(query.len(), 1);
        assert_eq!(query["tag"], "c");
    }

    #[test]
    fn decodes_query_but_not_path() {
        let (path, query) = parse("/a%20b?q=hello+world&e=%C3%A9");
        assert_eq!(path, "/a%20b");
        assert_eq!(query["q"], "hello world");
        assert_eq!(query["e"], "é");
    }

    #[test]
    fn no_query_is_empty() {
        let (path, query) = parse("/");
        assert_eq!(path, "/");
        assert!(query.is_empty());
    }
}
