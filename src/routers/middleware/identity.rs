use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    errors::code_error::HandlerResponse, init::state::ServerState,
    util::auth::identity::resolve_identity,
};

#[derive(Clone)]
pub enum AuthStatus {
    LoggedIn(Uuid),
    LoggedOut,
}

impl AuthStatus {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthStatus::LoggedIn(user_id) => Some(*user_id),
            AuthStatus::LoggedOut => None,
        }
    }
}

/// Resolves identity without requiring it. Routes that render differently for
/// logged-in users (viewer flags, saved lists) read the injected `AuthStatus`.
pub async fn identity_middleware(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let auth_status = match resolve_identity(request.headers(), state.get_auth_config()) {
        Some(user_id) => AuthStatus::LoggedIn(user_id),
        None => AuthStatus::LoggedOut,
    };

    request.extensions_mut().insert(auth_status);

    let response = next.run(request).await;

    Ok(response)
}
