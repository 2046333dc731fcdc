use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::{
    domain::report::Report,
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::reports,
    util::time::now::tokio_now,
};

/// Every report on file, newest first. Any signed-in user can read these;
/// there is no moderator role in the data model.
#[utoipa::path(
    get,
    path = "/reports",
    tag = "report",
    responses(
        (status = 200, description = "All reports", body = [Report]),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn list_reports(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let all_reports: Vec<Report> = reports::table
        .order(reports::report_created_at.desc())
        .select(Report::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(all_reports, start))
}
