use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{
        auth::{
            forgot_password::forgot_password, login::login, logout::logout,
            register::register, reset_password::reset_password,
        },
        comment::{
            delete_comment::delete_comment, list_comments::list_comments,
            submit_comment::submit_comment, toggle_comment_helpful::toggle_comment_helpful,
            toggle_comment_like::toggle_comment_like, update_comment::update_comment,
        },
        fallback::fallback_handler,
        notification::{list_notifications::list_notifications, mark_all_read::mark_all_read},
        post::{
            delete_post::delete_post, get_post::get_post, list_posts::list_posts,
            report_post::report_post, save_post::save_post, saved_posts::saved_posts,
            submit_post::submit_post, toggle_post_helpful::toggle_post_helpful,
            toggle_post_like::toggle_post_like, unsave_post::unsave_post,
        },
        report::{get_report::get_report, list_reports::list_reports, update_report::update_report},
        server::healthcheck::healthcheck,
        uploads::serve_upload::serve_upload,
        user::{get_me::get_me, update_me::update_me},
    },
    init::state::ServerState,
};

use super::middleware::{
    auth::auth_middleware, identity::identity_middleware, logging::log_middleware,
};

const MAX_REQUEST_SIZE: usize = 1024 * 1024 * 15; // 15MB, bounded by the screenshot upload

pub fn build_router(state: Arc<ServerState>) -> axum::Router {
    let auth_middleware = from_fn_with_state(state.clone(), auth_middleware);
    let log_middleware = from_fn_with_state(state.clone(), log_middleware);
    let identity_middleware = from_fn_with_state(state.clone(), identity_middleware);
    let compression_middleware = CompressionLayer::new().gzip(true);
    let cors_layer = CorsLayer::very_permissive();

    // Publicly accessible routes. Listing endpoints still see the viewer's
    // identity (when present) through the identity middleware.
    let public_router = Router::new()
        .route("/healthz", get(healthcheck))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/posts", get(list_posts))
        .route("/posts/saved", get(saved_posts))
        .route("/posts/{post_id}", get(get_post))
        .route("/comments/post/{post_id}", get(list_comments))
        .route("/notifications", get(list_notifications))
        .route("/uploads/{*path}", get(serve_upload));

    // Routes requiring authentication
    let protected_router = Router::new()
        .route("/auth/logout", post(logout))
        .route("/users/me", get(get_me).put(update_me))
        .route("/posts", post(submit_post))
        .route("/posts/{post_id}", delete(delete_post))
        .route("/posts/{post_id}/like", post(toggle_post_like))
        .route("/posts/{post_id}/helpful", post(toggle_post_helpful))
        .route("/posts/{post_id}/save", post(save_post))
        .route("/posts/{post_id}/unsave", post(unsave_post))
        .route("/posts/{post_id}/report", post(report_post))
        .route("/comments/post/{post_id}", post(submit_comment))
        .route(
            "/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/comments/{comment_id}/like", post(toggle_comment_like))
        .route(
            "/comments/{comment_id}/helpful",
            post(toggle_comment_helpful),
        )
        .route("/notifications/mark-all-read", post(mark_all_read))
        .route("/reports", get(list_reports))
        .route(
            "/reports/{report_id}",
            get(get_report).patch(update_report),
        )
        .layer(auth_middleware);

    // Combine all API routes and apply shared middleware
    let api_router = public_router
        .merge(protected_router)
        .layer(identity_middleware)
        .layer(compression_middleware)
        .layer(log_middleware)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .layer(cors_layer)
        .with_state(state.clone());

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(fallback_handler)
}
