use axum::http::{HeaderValue, header::SET_COOKIE};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::Cookie;

/// Wraps a handler payload so the serialized body is the payload itself,
/// with per-request timing carried in the `x-processed-in` header.
pub struct Response<D: serde::Serialize> {
    data: D,
    start: tokio::time::Instant,
    cookies_to_add: Option<Vec<Cookie<'static>>>,
    cookies_to_remove: Option<Vec<Cookie<'static>>>,
}

impl<D: serde::Serialize> IntoResponse for Response<D> {
    fn into_response(self) -> axum::response::Response {
        let duration = self.start.elapsed();

        let mut response = axum::response::Json(self.data).into_response();
        let headers = response.headers_mut();

        if let Ok(value) = HeaderValue::from_str(&format!("{duration:?}")) {
            headers.insert("x-processed-in", value);
        }

        if let Some(cookies) = self.cookies_to_add {
            for cookie in cookies {
                if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                    headers.append(SET_COOKIE, value);
                }
            }
        }

        if let Some(cookies) = self.cookies_to_remove {
            for mut cookie in cookies {
                cookie.make_removal();
                if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                    headers.append(SET_COOKIE, value);
                }
            }
        }

        response
    }
}

pub fn http_resp<D: serde::Serialize>(data: D, start: tokio::time::Instant) -> Response<D> {
    Response {
        data,
        start,
        cookies_to_add: None,
        cookies_to_remove: None,
    }
}

pub fn http_resp_with_cookies<D: serde::Serialize>(
    data: D,
    start: tokio::time::Instant,
    cookies_to_add: Option<Vec<Cookie<'static>>>,
    cookies_to_remove: Option<Vec<Cookie<'static>>>,
) -> Response<D> {
    Response {
        data,
        start,
        cookies_to_add,
        cookies_to_remove,
    }
}
