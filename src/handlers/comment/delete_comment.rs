use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::comment::Comment,
    dto::responses::{message_response::MessageResponse, response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{comment_helpfuls, comment_likes, comments, notifications},
    util::time::now::tokio_now,
};

/// Deletes a comment, every reply under it, and the interaction rows and
/// notifications hanging off any of them.
#[utoipa::path(
    delete,
    path = "/comments/{comment_id}",
    tag = "comment",
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such comment"),
    )
)]
pub async fn delete_comment(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(comment_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

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

    // Nesting depth is unenforced, so replies can carry replies of their
    // own; walk the tree down until no new rows turn up.
    let mut doomed_ids: Vec<Uuid> = vec![comment_id];
    let mut frontier: Vec<Uuid> = vec![comment_id];
    while !frontier.is_empty() {
        let next: Vec<Uuid> = comments::table
            .filter(comments::parent_comment_id.eq_any(&frontier))
            .select(comments::comment_id)
            .load(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
        doomed_ids.extend(&next);
        frontier = next;
    }

    diesel::delete(comment_likes::table.filter(comment_likes::comment_id.eq_any(&doomed_ids)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(
        comment_helpfuls::table.filter(comment_helpfuls::comment_id.eq_any(&doomed_ids)),
    )
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    let doomed_refs: Vec<Option<Uuid>> = doomed_ids.iter().map(|id| Some(*id)).collect();
    diesel::delete(notifications::table.filter(notifications::comment_id.eq_any(&doomed_refs)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    // One statement covers the whole subtree, so the parent links between
    // its members never dangle mid-delete.
    diesel::delete(comments::table.filter(comments::comment_id.eq_any(&doomed_ids)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(
        MessageResponse::new("Comment deleted successfully."),
        start,
    ))
}
