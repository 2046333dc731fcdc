use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, dsl::exists};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::{
        post::{Post, PostCounts, PostWithMeta, ViewerFlags},
        user::UserBadge,
    },
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    routers::middleware::identity::AuthStatus,
    schema::{comments, post_helpfuls, post_likes, posts, saved_posts, users},
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = "post",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post with counts and viewer flags", body = PostWithMeta),
        (status = 404, description = "No such post"),
    )
)]
pub async fn get_post(
    State(state): State<Arc<ServerState>>,
    Extension(auth_status): Extension<AuthStatus>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let post: Post = posts::table
        .filter(posts::post_id.eq(post_id))
        .select(Post::as_select())
        .first(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => code_err(CodeError::POST_NOT_FOUND, e),
            _ => code_err(CodeError::DB_QUERY_ERROR, e),
        })?;

    let author: UserBadge = users::table
        .filter(users::user_id.eq(post.user_id))
        .select(UserBadge::as_select())
        .first(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let likes: i64 = post_likes::table
        .filter(post_likes::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let helpfuls: i64 = post_helpfuls::table
        .filter(post_helpfuls::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let comment_count: i64 = comments::table
        .filter(comments::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let flags = match auth_status.user_id() {
        Some(viewer_id) => {
            let liked: bool = diesel::select(exists(
                post_likes::table
                    .filter(post_likes::post_id.eq(post_id))
                    .filter(post_likes::user_id.eq(viewer_id)),
            ))
            .get_result(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
            let helpful: bool = diesel::select(exists(
                post_helpfuls::table
                    .filter(post_helpfuls::post_id.eq(post_id))
                    .filter(post_helpfuls::user_id.eq(viewer_id)),
            ))
            .get_result(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
            let saved: bool = diesel::select(exists(
                saved_posts::table
                    .filter(saved_posts::post_id.eq(post_id))
                    .filter(saved_posts::user_id.eq(viewer_id)),
            ))
            .get_result(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
            ViewerFlags {
                liked,
                helpful,
                saved,
            }
        }
        None => ViewerFlags {
            liked: false,
            helpful: false,
            saved: false,
        },
    };

    drop(conn);

    Ok(http_resp(
        PostWithMeta::from_parts(
            post,
            &author,
            PostCounts {
                likes,
                helpfuls,
                comments: comment_count,
            },
            flags,
        ),
        start,
    ))
}
