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
    domain::{
        interaction::NewPostHelpful,
        notification::{self, NewNotification},
        post::Post,
    },
    dto::responses::{response_data::http_resp, toggle_response::ToggleHelpfulResponse},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{post_helpfuls, posts},
    util::time::now::tokio_now,
};

/// Same flip logic as the like toggle, over the helpfuls table.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/helpful",
    tag = "post",
    responses(
        (status = 200, description = "New helpful state and count", body = ToggleHelpfulResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn toggle_post_helpful(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

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

    let inserted = diesel::insert_into(post_helpfuls::table)
        .values(NewPostHelpful {
            post_id: &post_id,
            user_id: &user_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    let helpful = if inserted == 1 {
        if let Some(new_notification) = NewNotification::post_helpful(&post, user_id) {
            tokio::spawn(notification::dispatch(state.clone(), new_notification));
        }
        true
    } else {
        diesel::delete(
            post_helpfuls::table
                .filter(post_helpfuls::post_id.eq(post_id))
                .filter(post_helpfuls::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;
        false
    };

    let helpfuls: i64 = post_helpfuls::table
        .filter(post_helpfuls::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(ToggleHelpfulResponse { helpful, helpfuls }, start))
}
