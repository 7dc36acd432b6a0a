use axum::routing::get;
use axum::{
    body::Body,
    extract::{Extension, Path},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Router,
};
use std::{io::ErrorKind, sync::Arc};
use tokio_util::io::ReaderStream;

use crate::assets;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};

pub fn storage_router() -> Router {
    Router::new().route("/storage/*path", get(serve_file))
}

/// Streams an uploaded image or PDF from the public file area.
pub async fn serve_file(
    Path(path): Path<String>,
    Extension(config): Extension<Arc<Config>>,
) -> ApiResult<impl IntoResponse> {
    let not_found = || ApiError::NotFound(format!("File {path}"));
    let full_path = assets::resolve(&config.storage_dir, &path).ok_or_else(not_found)?;

    let file = match tokio::fs::File::open(&full_path).await {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(err.into()),
    };
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let content_type = mime_guess::from_path(&full_path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    Ok((headers, body))
}
