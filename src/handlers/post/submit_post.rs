use std::sync::Arc;

use axum::{
    Extension,
    extract::{Multipart, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::{
        post::{NewPost, Post, PostCounts, PostWithMeta, ViewerFlags},
        user::UserBadge,
    },
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{posts, users},
    util::time::now::tokio_now,
};

const MAX_SCREENSHOT_SIZE: usize = 1024 * 1024 * 10; // 10MB
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

#[inline(always)]
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "post",
    responses(
        (status = 200, description = "Created post", body = PostWithMeta),
        (status = 400, description = "Missing required fields or invalid screenshot"),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn submit_post(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    mut multipart: Multipart,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut headline: Option<String> = None;
    let mut error_description: Option<String> = None;
    let mut solution: Option<String> = None;
    let mut code_snippet: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut image_url: Option<String> = None;
    let mut screenshot: Option<(&'static str, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?
    {
        match field.name() {
            Some("headline") => {
                headline = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("errorDescription") => {
                error_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("solution") => {
                solution = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("codeSnippet") => {
                code_snippet = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("tags") => {
                tags = parse_tags(
                    &field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("imageUrl") => {
                image_url = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?,
                );
            }
            Some("screenshot") => {
                let mime = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .ok_or_else(|| {
                        code_err(CodeError::INVALID_IMAGE, "Screenshot field has no MIME type")
                    })?;
                if !ALLOWED_MIME_TYPES.contains(&mime.as_ref()) {
                    return Err(code_err(CodeError::INVALID_IMAGE, "Unsupported image type"));
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| code_err(CodeError::FILE_UPLOAD_ERROR, e))?;
                if bytes.len() > MAX_SCREENSHOT_SIZE {
                    return Err(code_err(CodeError::FILE_UPLOAD_ERROR, "Screenshot too large"));
                }

                // Trust the magic bytes over the client-declared MIME type.
                let format = image::guess_format(&bytes)
                    .map_err(|e| code_err(CodeError::INVALID_IMAGE, e))?;
                let extension = format
                    .extensions_str()
                    .first()
                    .copied()
                    .ok_or_else(|| code_err(CodeError::INVALID_IMAGE, "Unknown image format"))?;

                screenshot = Some((extension, bytes.to_vec()));
            }
            _ => continue,
        }
    }

    let (headline, error_description, solution) = match (&headline, &error_description, &solution)
    {
        (Some(headline), Some(error_description), Some(solution))
            if !headline.trim().is_empty()
                && !error_description.trim().is_empty()
                && !solution.trim().is_empty() =>
        {
            (headline, error_description, solution)
        }
        _ => return Err(CodeError::POST_FIELDS_INVALID.into()),
    };

    // An uploaded screenshot wins over a pasted URL.
    let screenshot_url: Option<String> = match screenshot {
        Some((extension, bytes)) => {
            let file_name = format!("{}.{extension}", Uuid::new_v4());
            let file_path = state.get_uploads_dir().join(&file_name);
            tokio::fs::write(&file_path, &bytes)
                .await
                .map_err(|e| code_err(CodeError::FILE_WRITE_ERROR, e))?;
            Some(format!("/uploads/{file_name}"))
        }
        None => image_url,
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let new_post = NewPost::new(
        &user_id,
        headline,
        error_description,
        solution,
        code_snippet.as_deref(),
        &tags,
        screenshot_url.as_deref(),
    );

    let post: Post = diesel::insert_into(posts::table)
        .values(new_post)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    let author: UserBadge = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserBadge::as_select())
        .first(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(
        PostWithMeta::from_parts(
            post,
            &author,
            PostCounts {
                likes: 0,
                helpfuls: 0,
                comments: 0,
            },
            ViewerFlags {
                liked: false,
                helpful: false,
                saved: false,
            },
        ),
        start,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_commas_and_trim() {
        assert_eq!(
            parse_tags("rust, diesel ,axum"),
            vec!["rust".to_string(), "diesel".to_string(), "axum".to_string()]
        );
    }

    #[test]
    fn empty_tag_segments_dropped() {
        assert_eq!(parse_tags(",, ,rust,"), vec!["rust".to_string()]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("  ").is_empty());
    }
}
