use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::{
        comment::{Comment, CommentWithMeta, NewComment},
        notification::{self, NewNotification},
        post::Post,
        user::UserBadge,
    },
    dto::{
        requests::comment::submit_comment_request::SubmitCommentRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{comments, posts, users},
    util::time::now::tokio_now,
};

/// Adds a comment to a post. With `parentCommentId` set this is a reply and
/// notifies the parent's author; otherwise the post owner is notified. The
/// parent must live on the same post, but may itself be a reply; nesting
/// depth is a client-side rendering convention, not enforced here.
#[utoipa::path(
    post,
    path = "/comments/post/{post_id}",
    tag = "comment",
    request_body = SubmitCommentRequest,
    responses(
        (status = 200, description = "Created comment", body = CommentWithMeta),
        (status = 400, description = "Missing content or parent on another post"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post or parent comment"),
    )
)]
pub async fn submit_comment(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<SubmitCommentRequest>,
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

    let post: Post = match posts::table
        .filter(posts::post_id.eq(post_id))
        .select(Post::as_select())
        .first(&mut conn)
        .await
    {
        Ok(post) => post,
        Err(DieselError::NotFound) => return Err(CodeError::POST_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    let parent: Option<Comment> = match &request.parent_comment_id {
        Some(parent_comment_id) => {
            let parent: Comment = match comments::table
                .filter(comments::comment_id.eq(parent_comment_id))
                .select(Comment::as_select())
                .first(&mut conn)
                .await
            {
                Ok(parent) => parent,
                Err(DieselError::NotFound) => return Err(CodeError::COMMENT_NOT_FOUND.into()),
                Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
            };

            if parent.post_id != post_id {
                return Err(CodeError::PARENT_COMMENT_MISMATCH.into());
            }

            Some(parent)
        }
        None => None,
    };

    let comment: Comment = diesel::insert_into(comments::table)
        .values(NewComment::new(
            &post_id,
            &user_id,
            content,
            request.parent_comment_id.as_ref(),
        ))
        .returning(Comment::as_returning())
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

    let new_notification = match &parent {
        Some(parent) => NewNotification::comment_reply(parent, comment.comment_id, user_id),
        None => NewNotification::comment(&post, comment.comment_id, user_id),
    };
    if let Some(new_notification) = new_notification {
        tokio::spawn(notification::dispatch(state.clone(), new_notification));
    }

    Ok(http_resp(
        CommentWithMeta::from_parts(comment, &author, 0, 0, false, false),
        start,
    ))
}
