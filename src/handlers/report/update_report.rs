use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::report::{Report, ReportStatus},
    dto::{
        requests::report::update_report_request::UpdateReportRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::reports,
    util::time::now::tokio_now,
};

/// Moves a report to `pending`, `resolved` or `ignored`. Setting a report
/// back to `pending` reopens it for the duplicate-report check.
#[utoipa::path(
    patch,
    path = "/reports/{report_id}",
    tag = "report",
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Updated report", body = Report),
        (status = 400, description = "Missing or unknown status"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such report"),
    )
)]
pub async fn update_report(
    State(state): State<Arc<ServerState>>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<UpdateReportRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let raw_status = match &request.status {
        Some(raw_status) => raw_status,
        None => return Err(CodeError::MISSING_FIELDS.into()),
    };

    let status = match ReportStatus::parse(raw_status) {
        Some(status) => status,
        None => return Err(CodeError::REPORT_STATUS_INVALID.into()),
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let updated: Report = match diesel::update(reports::table.filter(reports::report_id.eq(report_id)))
        .set((
            reports::report_status.eq(status.as_str()),
            reports::report_updated_at.eq(Utc::now()),
        ))
        .returning(Report::as_returning())
        .get_result(&mut conn)
        .await
    {
        Ok(updated) => updated,
        Err(DieselError::NotFound) => return Err(CodeError::REPORT_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_UPDATE_ERROR, e)),
    };

    drop(conn);

    Ok(http_resp(updated, start))
}
