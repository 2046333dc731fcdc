use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::comment::Comment,
    dto::{
        requests::comment::update_comment_request::UpdateCommentRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::comments,
    util::time::now::tokio_now,
};

#[utoipa::path(
    put,
    path = "/comments/{comment_id}",
    tag = "comment",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = Comment),
        (status = 400, description = "Missing content"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such comment"),
    )
)]
pub async fn update_comment(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(comment_id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let content = match &request.content {
        Some(content) if !content.trim().is_empty() => content,
        _ => return Err(CodeError::COMMENT_CONTENT_REQUIRED.into()),
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let comment: Comment = match comments::table
        .filter(comments::comment_id.eq(comment_id))
        .select(Comment::as_select())
        .first(&mut conn)
        .await
    {
        Ok(comment) => comment,
        Err(DieselError::NotFound) => return Err(CodeError::COMMENT_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    if comment.user_id != user_id {
        return Err(CodeError::NOT_RESOURCE_OWNER.into());
    }

    let updated: Comment = diesel::update(comments::table.filter(comments::comment_id.eq(comment_id)))
        .set((
            comments::comment_content.eq(content),
            comments::comment_updated_at.eq(Some(Utc::now())),
        ))
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    Ok(http_resp(updated, start))
}
