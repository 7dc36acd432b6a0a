//! Static error pages for browsers.
//!
//! JSON clients keep the JSON error body; requests accepting `text/html` get
//! `<code>.html` from the error pages directory, or a plain fallback page when
//! no themed page exists for that status.

use std::{path::PathBuf, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

pub async fn error_pages_middleware(
    State(pages_dir): State<Arc<PathBuf>>,
    req: Request,
    next: Next,
) -> Response {
    let wants_html = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));

    let response = next.run(req).await;
    let status = response.status();
    if !wants_html || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let themed = pages_dir.join(format!("{}.html", status.as_u16()));
    let page = match tokio::fs::read_to_string(&themed).await {
        Ok(page) => page,
        Err(err) => {
            debug!(page = %themed.display(), error = %err, "No themed error page");
            fallback_page(status)
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Response::from_parts(parts, Body::from(page))
}

pub fn fallback_page(status: StatusCode) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} {reason}</title></head>\n<body>\n<h1>{code}</h1>\n<p>{reason}</p>\n<p><a href=\"/\">Back to the homepage</a></p>\n</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::fallback_page;
    use axum::http::StatusCode;

    #[test]
    fn fallback_mentions_status() {
        let page = fallback_page(StatusCode::FORBIDDEN);
        assert!(page.contains("<h1>403</h1>"));
        assert!(page.contains("Forbidden"));
    }
}
