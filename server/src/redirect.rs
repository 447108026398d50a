use axum::{
    body::Body,
    http::{Request, Response, StatusCode, header},
    middleware::Next,
};

/// The canonical location for a request addressed to a `www.` host, if any.
fn canonical_location(req: &Request<Body>) -> Option<String> {
    let host = req.headers().get(header::HOST)?.to_str().ok()?;
    let bare = host.strip_prefix("www.")?;
    let path = req
        .uri()
        .path_and_query()
        .map_or("/", |path_query| path_query.as_str());
    Some(format!("https://{bare}{path}"))
}

/// Sends `www.` visitors to the bare domain with a permanent redirect.
pub async fn redirect_www(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    let Some(location) = canonical_location(&req) else {
        return Ok(next.run(req).await);
    };
    tracing::debug!(%location, "Redirecting www request");
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .map_err(|e| {
            tracing::error!("Failed to build redirect response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt as _;

    fn router() -> Router {
        Router::new()
            .route("/blog", get(|| async { "listing" }))
            .layer(middleware::from_fn(redirect_www))
    }

    fn request(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_www_host_redirects_with_query() {
        let response = router()
            .oneshot(request("www.lumen.studio", "/blog?tag=rust&page=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://lumen.studio/blog?tag=rust&page=2"
        );
    }

    #[tokio::test]
    async fn test_bare_host_passes_through() {
        let response = router()
            .oneshot(request("lumen.studio", "/blog"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_canonical_location() {
        assert_eq!(
            canonical_location(&request("www.lumen.studio", "/")).as_deref(),
            Some("https://lumen.studio/")
        );
        assert_eq!(canonical_location(&request("wwwlumen.studio", "/")), None);
    }
}
