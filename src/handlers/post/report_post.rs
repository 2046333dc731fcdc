use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, dsl::exists};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::report::{NewReport, REPORT_STATUS_PENDING, Report},
    dto::{requests::post::report_post_request::ReportPostRequest, responses::response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{posts, reports},
    util::time::now::tokio_now,
};

/// Files a report against a post. One pending report per (user, post); once
/// a moderator resolves or ignores it, the same user may report again.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/report",
    tag = "post",
    request_body = ReportPostRequest,
    responses(
        (status = 200, description = "Report filed", body = Report),
        (status = 400, description = "Missing reason or already pending"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn report_post(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<ReportPostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let reason = match &request.reason {
        Some(reason) if !reason.trim().is_empty() => reason,
        _ => return Err(CodeError::REPORT_REASON_REQUIRED.into()),
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let post_exists: bool = diesel::select(exists(
        posts::table.filter(posts::post_id.eq(post_id)),
    ))
    .get_result(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if !post_exists {
        return Err(CodeError::POST_NOT_FOUND.into());
    }

    let already_pending: bool = diesel::select(exists(
        reports::table
            .filter(reports::post_id.eq(post_id))
            .filter(reports::user_id.eq(user_id))
            .filter(reports::report_status.eq(REPORT_STATUS_PENDING)),
    ))
    .get_result(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if already_pending {
        return Err(CodeError::REPORT_ALREADY_PENDING.into());
    }

    let report: Report = diesel::insert_into(reports::table)
        .values(NewReport::new(&post_id, &user_id, reason))
        .returning(Report::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(report, start))
}
