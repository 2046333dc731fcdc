use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_derive::Serialize;
use std::error::Error;
use std::fmt;
use utoipa::ToSchema;

pub type HandlerResponse<T> = Result<T, CodeErrorResp>;

/// Catalogued error condition. `message` is the whole client-visible body;
/// whatever detail produced the error stays in server logs via the
/// `x-error-*` headers the logging middleware records and strips.
pub struct CodeError {
    pub error_code: u16,
    pub http_status_code: StatusCode,
    pub message: &'static str,
}

impl CodeError {
    pub const POOL_ERROR: CodeError = CodeError {
        error_code: 0,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not get connection out of pool!",
    };
    pub const DB_QUERY_ERROR: CodeError = CodeError {
        error_code: 1,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database query failed!",
    };
    pub const DB_INSERTION_ERROR: CodeError = CodeError {
        error_code: 2,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database insert failed!",
    };
    pub const DB_UPDATE_ERROR: CodeError = CodeError {
        error_code: 3,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database update failed!",
    };
    pub const DB_DELETION_ERROR: CodeError = CodeError {
        error_code: 4,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database delete failed!",
    };
    pub const COULD_NOT_HASH_PW: CodeError = CodeError {
        error_code: 5,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not hash password!",
    };
    pub const COULD_NOT_VERIFY_PW: CodeError = CodeError {
        error_code: 6,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not verify password!",
    };
    pub const FILE_WRITE_ERROR: CodeError = CodeError {
        error_code: 7,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not store uploaded file!",
    };
    pub const TOKEN_SIGN_ERROR: CodeError = CodeError {
        error_code: 8,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not issue session token!",
    };

    pub const UNAUTHORIZED_ACCESS: CodeError = CodeError {
        error_code: 10,
        http_status_code: StatusCode::UNAUTHORIZED,
        message: "Authentication required.",
    };
    pub const INVALID_CREDENTIALS: CodeError = CodeError {
        error_code: 11,
        http_status_code: StatusCode::UNAUTHORIZED,
        message: "Invalid credentials.",
    };

    pub const NOT_RESOURCE_OWNER: CodeError = CodeError {
        error_code: 20,
        http_status_code: StatusCode::FORBIDDEN,
        message: "You do not own this resource.",
    };

    pub const USER_NOT_FOUND: CodeError = CodeError {
        error_code: 30,
        http_status_code: StatusCode::NOT_FOUND,
        message: "User not found.",
    };
    pub const POST_NOT_FOUND: CodeError = CodeError {
        error_code: 31,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Post not found.",
    };
    pub const COMMENT_NOT_FOUND: CodeError = CodeError {
        error_code: 32,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Comment not found.",
    };
    pub const REPORT_NOT_FOUND: CodeError = CodeError {
        error_code: 33,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Report not found.",
    };
    pub const FILE_NOT_FOUND: CodeError = CodeError {
        error_code: 34,
        http_status_code: StatusCode::NOT_FOUND,
        message: "File not found.",
    };

    pub const USERNAME_INVALID: CodeError = CodeError {
        error_code: 40,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Username must be 1 to 64 characters.",
    };
    pub const EMAIL_INVALID: CodeError = CodeError {
        error_code: 41,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Email address is invalid.",
    };
    pub const PASSWORD_INVALID: CodeError = CodeError {
        error_code: 42,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Password must be at least 8 characters.",
    };
    pub const MISSING_FIELDS: CodeError = CodeError {
        error_code: 43,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Required fields are missing.",
    };
    pub const POST_FIELDS_INVALID: CodeError = CodeError {
        error_code: 44,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Headline, error description and solution are required.",
    };
    pub const COMMENT_CONTENT_REQUIRED: CodeError = CodeError {
        error_code: 45,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Comment content is required.",
    };
    pub const REPORT_REASON_REQUIRED: CodeError = CodeError {
        error_code: 46,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Report reason is required.",
    };
    pub const REPORT_STATUS_INVALID: CodeError = CodeError {
        error_code: 47,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Report status must be pending, resolved or ignored.",
    };
    pub const INVALID_IMAGE: CodeError = CodeError {
        error_code: 48,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Uploaded file is not a recognized image.",
    };
    pub const RESET_TOKEN_INVALID: CodeError = CodeError {
        error_code: 49,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Invalid or expired token.",
    };
    pub const EMAIL_MUST_BE_UNIQUE: CodeError = CodeError {
        error_code: 50,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "An account with that email already exists.",
    };
    pub const REPORT_ALREADY_PENDING: CodeError = CodeError {
        error_code: 51,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "You already have a pending report for this post.",
    };
    pub const FILE_UPLOAD_ERROR: CodeError = CodeError {
        error_code: 52,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Could not read uploaded file!",
    };
    pub const PARENT_COMMENT_MISMATCH: CodeError = CodeError {
        error_code: 53,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Parent comment belongs to a different post.",
    };
}

pub fn code_err<E: fmt::Display>(cerr: CodeError, e: E) -> CodeErrorResp {
    CodeErrorResp {
        error_code: cerr.error_code,
        http_status_code: cerr.http_status_code,
        message: cerr.message.to_string(),
        error_message: e.to_string(),
    }
}

#[derive(Debug)]
pub struct CodeErrorResp {
    pub error_code: u16,
    pub http_status_code: StatusCode,
    pub message: String,
    pub error_message: String,
}

impl From<CodeError> for CodeErrorResp {
    fn from(cerr: CodeError) -> Self {
        CodeErrorResp {
            error_code: cerr.error_code,
            http_status_code: cerr.http_status_code,
            message: cerr.message.to_string(),
            error_message: String::new(),
        }
    }
}

/// The only body shape error responses carry.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl fmt::Display for CodeErrorResp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.error_message)
    }
}

impl Error for CodeErrorResp {}

impl IntoResponse for CodeErrorResp {
    fn into_response(self) -> axum::response::Response {
        let log_level = if self.http_status_code.is_server_error() {
            "ERROR"
        } else {
            "INFO"
        };

        let mut response = (
            self.http_status_code,
            Json(ErrorBody {
                error: self.message.clone(),
            }),
        )
            .into_response();

        let headers = response.headers_mut();
        headers.insert("x-error-log-level", HeaderValue::from_static(log_level));
        headers.insert(
            "x-error-status-code",
            header_value_or_empty(&self.http_status_code.as_u16().to_string()),
        );
        headers.insert(
            "x-error-code",
            header_value_or_empty(&self.error_code.to_string()),
        );
        headers.insert("x-error-message", header_value_or_empty(&self.message));
        headers.insert("x-error-detail", header_value_or_empty(&self.error_message));

        response
    }
}

fn header_value_or_empty(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_maps_errors_to_status_classes() {
        assert_eq!(
            CodeError::UNAUTHORIZED_ACCESS.http_status_code,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CodeError::NOT_RESOURCE_OWNER.http_status_code,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CodeError::POST_NOT_FOUND.http_status_code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CodeError::RESET_TOKEN_INVALID.http_status_code,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CodeError::REPORT_ALREADY_PENDING.http_status_code,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CodeError::DB_QUERY_ERROR.http_status_code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_serializes_to_single_error_field() {
        let body = ErrorBody {
            error: "Invalid or expired token.".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Invalid or expired token."}"#
        );
    }

    #[test]
    fn response_carries_status_and_log_headers() {
        let resp = code_err(CodeError::DB_QUERY_ERROR, "connection reset").into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get("x-error-log-level").unwrap(),
            &HeaderValue::from_static("ERROR")
        );
        assert_eq!(
            resp.headers().get("x-error-detail").unwrap(),
            &HeaderValue::from_static("connection reset")
        );
    }

    #[test]
    fn client_errors_log_at_info() {
        let resp = CodeErrorResp::from(CodeError::UNAUTHORIZED_ACCESS).into_response();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("x-error-log-level").unwrap(),
            &HeaderValue::from_static("INFO")
        );
    }

    #[test]
    fn display_joins_message_and_detail() {
        let resp = code_err(CodeError::POOL_ERROR, "timed out waiting for connection");
        assert_eq!(
            resp.to_string(),
            "Could not get connection out of pool!: timed out waiting for connection"
        );
    }
}
