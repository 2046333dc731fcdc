use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::{
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    util::time::now::tokio_now,
};

/// Accepts only plain relative paths under the uploads directory. Anything
/// that could climb out of it (empty or dot components, backslashes, leading
/// slash) is refused before touching the filesystem.
#[inline(always)]
fn is_safe_upload_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..")
}

/// Serves an uploaded file. Unsafe and missing paths are indistinguishable
/// to the caller; both come back as a plain 404.
#[utoipa::path(
    get,
    path = "/uploads/{path}",
    tag = "uploads",
    responses(
        (status = 200, description = "The file, content type guessed from the extension"),
        (status = 404, description = "No such file"),
    )
)]
pub async fn serve_upload(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !is_safe_upload_path(&path) {
        return Err(CodeError::FILE_NOT_FOUND.into());
    }

    let file_path = state.get_uploads_dir().join(&path);
    let bytes = tokio::fs::read(&file_path)
        .await
        .map_err(|e| code_err(CodeError::FILE_NOT_FOUND, e))?;

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();

    let mut response: Response = (
        [(header::CONTENT_TYPE, mime.essence_str().to_string())],
        bytes,
    )
        .into_response();

    let duration = start.elapsed();
    if let Ok(value) = HeaderValue::from_str(&format!("{duration:?}")) {
        response.headers_mut().insert("x-processed-in", value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_names_pass() {
        assert!(is_safe_upload_path("shot.png"));
        assert!(is_safe_upload_path("a1b2c3.webp"));
        assert!(is_safe_upload_path("nested/dir/file.jpg"));
    }

    #[test]
    fn traversal_attempts_fail() {
        assert!(!is_safe_upload_path("../etc/passwd"));
        assert!(!is_safe_upload_path("a/../../etc/passwd"));
        assert!(!is_safe_upload_path("/etc/passwd"));
        assert!(!is_safe_upload_path("..\\windows\\system32"));
        assert!(!is_safe_upload_path("a/./b"));
        assert!(!is_safe_upload_path("a//b"));
        assert!(!is_safe_upload_path(""));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(
            mime_guess::from_path("shot.png").first_or_octet_stream(),
            mime_guess::mime::IMAGE_PNG
        );
        assert_eq!(
            mime_guess::from_path("unknown.blob")
                .first_or_octet_stream()
                .essence_str(),
            "application/octet-stream"
        );
    }
}
