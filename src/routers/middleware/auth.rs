use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

use crate::{
    errors::code_error::{CodeError, HandlerResponse},
    init::state::ServerState,
    util::auth::identity::resolve_identity,
};

/// Rejects the request outright when no identity resolves. Handlers behind
/// this middleware take `Extension<Uuid>` and may assume it is valid.
pub async fn auth_middleware(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let user_id = match resolve_identity(request.headers(), state.get_auth_config()) {
        Some(user_id) => user_id,
        None => return Err(CodeError::UNAUTHORIZED_ACCESS.into()),
    };

    request.extensions_mut().insert(user_id);

    let response = next.run(request).await;

    Ok(response)
}
