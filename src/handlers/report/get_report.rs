use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::report::Report,
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::reports,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/reports/{report_id}",
    tag = "report",
    responses(
        (status = 200, description = "The report", body = Report),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such report"),
    )
)]
pub async fn get_report(
    State(state): State<Arc<ServerState>>,
    Path(report_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let report: Report = match reports::table
        .filter(reports::report_id.eq(report_id))
        .select(Report::as_select())
        .first(&mut conn)
        .await
    {
        Ok(report) => report,
        Err(DieselError::NotFound) => return Err(CodeError::REPORT_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    drop(conn);

    Ok(http_resp(report, start))
}
