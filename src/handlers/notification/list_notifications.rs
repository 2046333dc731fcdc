use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::notification::Notification,
    dto::responses::response_data::http_resp,
    errors::code_error::HandlerResponse,
    init::state::ServerState,
    routers::middleware::identity::AuthStatus,
    schema::notifications,
    util::time::now::tokio_now,
};

/// The caller's notifications, newest first. Like the saved shelf, this
/// bell-icon feed always answers 200 with a list; anonymous callers and
/// failed reads both get an empty one.
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notification",
    responses(
        (status = 200, description = "Notifications, empty when anonymous", body = [Notification]),
    )
)]
pub async fn list_notifications(
    State(state): State<Arc<ServerState>>,
    Extension(auth_status): Extension<AuthStatus>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let Some(user_id) = auth_status.user_id() else {
        return Ok(http_resp(Vec::<Notification>::new(), start));
    };

    let feed = match load_feed(&state, user_id).await {
        Ok(feed) => feed,
        Err(e) => {
            warn!("Could not load notifications for user {}: {:?}", user_id, e);
            Vec::new()
        }
    };

    Ok(http_resp(feed, start))
}

async fn load_feed(state: &Arc<ServerState>, user_id: Uuid) -> anyhow::Result<Vec<Notification>> {
    let mut conn = state.get_conn().await?;

    let feed = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order(notifications::notification_created_at.desc())
        .select(Notification::as_select())
        .load(&mut conn)
        .await?;

    drop(conn);

    Ok(feed)
}
