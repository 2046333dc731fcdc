//! OpenAPI documentation registration for Swagger UI.
//!
//! Important: Utoipa only exposes operations you list in `#[openapi(paths(...))]`.
//! Handler functions still need their own `#[utoipa::path(...)]` attributes.

use utoipa::OpenApi;

// ---- handlers (for `paths(...)`) ----
use crate::handlers::{
    auth::{forgot_password, login, logout, register, reset_password},
    comment::{
        delete_comment, list_comments, submit_comment, toggle_comment_helpful,
        toggle_comment_like, update_comment,
    },
    notification::{list_notifications, mark_all_read},
    post::{
        delete_post, get_post, list_posts, report_post, save_post, saved_posts, submit_post,
        toggle_post_helpful, toggle_post_like, unsave_post,
    },
    report::{get_report, list_reports, update_report},
    server::healthcheck,
    uploads::serve_upload,
    user::{get_me, update_me},
};

// ---- schemas (for `components(schemas(...))`) ----
use crate::domain::{
    comment::{Comment, CommentWithMeta},
    notification::Notification,
    post::{Post, PostWithMeta},
    report::Report,
    user::{UserBadge, UserInfo},
};
use crate::dto::{
    requests::{
        auth::{
            forgot_password_request::ForgotPasswordRequest, login_request::LoginRequest,
            register_request::RegisterRequest, reset_password_request::ResetPasswordRequest,
        },
        comment::{
            submit_comment_request::SubmitCommentRequest,
            update_comment_request::UpdateCommentRequest,
        },
        post::{get_posts_request::GetPostsRequest, report_post_request::ReportPostRequest},
        report::update_report_request::UpdateReportRequest,
        user::update_profile_request::UpdateProfileRequest,
    },
    responses::{
        auth::{login_response::LoginResponse, register_response::RegisterResponse},
        message_response::MessageResponse,
        notification::mark_all_read_response::MarkAllReadResponse,
        post::save_post_response::SavePostResponse,
        toggle_response::{ToggleHelpfulResponse, ToggleLikeResponse},
    },
};
use crate::errors::code_error::ErrorBody;
use crate::handlers::server::healthcheck::ServerHealthcheckResponse;

/// Central OpenAPI document for Swagger UI.
#[derive(OpenApi)]
#[openapi(
    // All public + protected API routes from `main_router.rs`.
    paths(
        // --- server ---
        healthcheck::healthcheck,

        // --- auth ---
        register::register,
        login::login,
        logout::logout,
        forgot_password::forgot_password,
        reset_password::reset_password,

        // --- user ---
        get_me::get_me,
        update_me::update_me,

        // --- posts ---
        list_posts::list_posts,
        get_post::get_post,
        submit_post::submit_post,
        delete_post::delete_post,
        toggle_post_like::toggle_post_like,
        toggle_post_helpful::toggle_post_helpful,
        save_post::save_post,
        unsave_post::unsave_post,
        saved_posts::saved_posts,
        report_post::report_post,

        // --- comments ---
        list_comments::list_comments,
        submit_comment::submit_comment,
        update_comment::update_comment,
        delete_comment::delete_comment,
        toggle_comment_like::toggle_comment_like,
        toggle_comment_helpful::toggle_comment_helpful,

        // --- notifications ---
        list_notifications::list_notifications,
        mark_all_read::mark_all_read,

        // --- reports ---
        list_reports::list_reports,
        get_report::get_report,
        update_report::update_report,

        // --- uploads ---
        serve_upload::serve_upload,
    ),
    components(
        schemas(
            // shared error response
            ErrorBody,

            // --- auth DTOs ---
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,

            // --- user DTOs ---
            UpdateProfileRequest,

            // --- post DTOs ---
            GetPostsRequest,
            ReportPostRequest,
            ToggleLikeResponse,
            ToggleHelpfulResponse,
            SavePostResponse,

            // --- comment DTOs ---
            SubmitCommentRequest,
            UpdateCommentRequest,

            // --- notification DTOs ---
            MarkAllReadResponse,

            // --- report DTOs ---
            UpdateReportRequest,

            // --- domain models used in responses ---
            UserInfo,
            UserBadge,

            Post,
            PostWithMeta,
            Comment,
            CommentWithMeta,

            Notification,
            Report,

            ServerHealthcheckResponse,
        )
    ),
    tags(
        (name = "server", description = "Server status endpoints"),
        (name = "auth", description = "Registration, login and password reset endpoints"),
        (name = "user", description = "Profile endpoints"),
        (name = "post", description = "Post feed, toggles, shelf and report endpoints"),
        (name = "comment", description = "Comment thread endpoints"),
        (name = "notification", description = "Notification feed endpoints"),
        (name = "report", description = "Moderation queue endpoints"),
        (name = "uploads", description = "Uploaded file serving")
    )
)]
pub struct ApiDoc;
