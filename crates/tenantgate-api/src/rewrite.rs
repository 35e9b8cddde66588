//! Request rewriting
//!
//! After a short resource name has been resolved to its full identifier the
//! request forwarded to the backend may need a new body, a new URI, or both.
//! The resolved identifier travels with the request as a [`ResolvedResource`]
//! extension so later stages don't resolve it again.

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderValue, Request, Uri};
use tracing::debug;

use crate::error::{Error, Result};

/// Full identifier of the resource a request was resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource(pub String);

impl ResolvedResource {
    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replace the body and/or URI of a request
///
/// `body: None` keeps the original body. An empty or absent `uri` keeps the
/// original URI; anything else must parse as a URI. The resolved identifier
/// is recorded on the request in every case.
pub fn rewrite_request(
    request: Request<Body>,
    body: Option<Bytes>,
    uri: Option<&str>,
    resource_id: &str,
) -> Result<Request<Body>> {
    let new_uri = match uri {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<Uri>()
                .map_err(|e| Error::invalid_request(format!("invalid rewrite URI {raw}: {e}")))?,
        ),
        _ => None,
    };

    let (mut parts, original_body) = request.into_parts();

    if let Some(new_uri) = new_uri {
        debug!(from = %parts.uri, to = %new_uri, resource = %resource_id, "Rewriting request URI");
        parts.uri = new_uri;
    }

    let body = match body {
        Some(bytes) => {
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
            debug!(length = bytes.len(), resource = %resource_id, "Rewriting request body");
            Body::from(bytes)
        }
        None => original_body,
    };

    parts
        .extensions
        .insert(ResolvedResource(resource_id.to_string()));

    Ok(Request::from_parts(parts, body))
}

/// Identifier recorded by [`rewrite_request`], if any
pub fn resolved_resource<B>(request: &Request<B>) -> Option<&str> {
    request
        .extensions()
        .get::<ResolvedResource>()
        .map(ResolvedResource::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn request(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_LENGTH, "2")
            .body(Body::from("{}"))
            .unwrap()
    }

    async fn body_bytes(request: Request<Body>) -> Bytes {
        axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    // =========================================================================
    // URI Tests
    // =========================================================================

    #[test]
    fn test_rewrite_uri() {
        let rewritten = rewrite_request(
            request("/containers/web/start"),
            None,
            Some("/containers/0123abcd/start"),
            "0123abcd",
        )
        .unwrap();
        assert_eq!(rewritten.uri().path(), "/containers/0123abcd/start");
    }

    #[test]
    fn test_empty_uri_leaves_request_unchanged() {
        let rewritten =
            rewrite_request(request("/containers/web/json?size=1"), None, Some(""), "web").unwrap();
        assert_eq!(rewritten.uri(), "/containers/web/json?size=1");

        let rewritten =
            rewrite_request(request("/containers/web/json"), None, None, "web").unwrap();
        assert_eq!(rewritten.uri(), "/containers/web/json");
    }

    #[test]
    fn test_invalid_uri_is_rejected() {
        let err = rewrite_request(request("/containers/web/start"), None, Some("/bad uri"), "web")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_query_is_kept_in_rewritten_uri() {
        let rewritten = rewrite_request(
            request("/containers/web/logs"),
            None,
            Some("/containers/0123/logs?follow=1"),
            "0123",
        )
        .unwrap();
        assert_eq!(rewritten.uri().query(), Some("follow=1"));
    }

    // =========================================================================
    // Body Tests
    // =========================================================================

    #[tokio::test]
    async fn test_rewrite_body_updates_length() {
        let payload = Bytes::from_static(br#"{"Name":"s42-front"}"#);
        let rewritten = rewrite_request(
            request("/networks/create"),
            Some(payload.clone()),
            None,
            "front",
        )
        .unwrap();

        assert_eq!(
            rewritten.headers().get(CONTENT_LENGTH).unwrap(),
            &payload.len().to_string()
        );
        assert_eq!(body_bytes(rewritten).await, payload);
    }

    #[tokio::test]
    async fn test_missing_body_keeps_original() {
        let rewritten =
            rewrite_request(request("/containers/web/start"), None, None, "web").unwrap();
        assert_eq!(body_bytes(rewritten).await, Bytes::from_static(b"{}"));
    }

    // =========================================================================
    // Extension Tests
    // =========================================================================

    #[test]
    fn test_resolved_resource_is_recorded() {
        let rewritten = rewrite_request(request("/containers/web/start"), None, None, "0123abcd")
            .unwrap();
        assert_eq!(resolved_resource(&rewritten), Some("0123abcd"));
    }

    #[test]
    fn test_unrewritten_request_has_no_resolved_resource() {
        assert_eq!(resolved_resource(&request("/containers/web/start")), None);
    }
}
