//! Request identity resolution: one entry point, two ordered strategies.
//! Strategy order is part of the contract: a valid session cookie wins over
//! whatever the Authorization header carries.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use uuid::Uuid;

use crate::{init::config::AuthConfig, util::auth::token::verify_token};

pub const SESSION_COOKIE: &str = "session_token";
const BEARER_PREFIX: &str = "Bearer ";

/// Strategy 1: the first-party session cookie.
pub fn try_session_cookie(headers: &HeaderMap, auth: &AuthConfig) -> Option<Uuid> {
    let jar = CookieJar::from_headers(headers);
    let cookie = jar.get(SESSION_COOKIE)?;

    match verify_token(cookie.value(), auth.session_secret.as_bytes()) {
        Some(user_id) => Some(user_id),
        None => {
            debug!("session cookie present but did not verify");
            None
        }
    }
}

/// Strategy 2: a bearer token minted by the previous stack, verified
/// against its own secret.
pub fn try_bearer_token(headers: &HeaderMap, auth: &AuthConfig) -> Option<Uuid> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?;

    match verify_token(token, auth.legacy_jwt_secret.as_bytes()) {
        Some(user_id) => Some(user_id),
        None => {
            debug!("bearer token present but did not verify");
            None
        }
    }
}

/// First valid identity wins; `None` means unauthenticated, which is not an
/// error here. Absent, malformed and badly-signed credentials all land in
/// the same `None`.
pub fn resolve_identity(headers: &HeaderMap, auth: &AuthConfig) -> Option<Uuid> {
    try_session_cookie(headers, auth).or_else(|| try_bearer_token(headers, auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::auth::token::mint_token;
    use axum::http::HeaderValue;
    use axum::http::header::COOKIE;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            session_secret: "session-secret-for-tests".to_string(),
            legacy_jwt_secret: "legacy-secret-for-tests".to_string(),
            session_ttl_hours: 24,
        }
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, token)).unwrap(),
        );
        headers
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn session_strategy_accepts_only_the_session_secret() {
        let auth = test_auth_config();
        let user_id = Uuid::new_v4();

        let good = mint_token(user_id, auth.session_secret.as_bytes(), 1).unwrap();
        assert_eq!(
            try_session_cookie(&cookie_headers(&good), &auth),
            Some(user_id)
        );

        // a legacy-signed token in the cookie slot must not resolve
        let cross = mint_token(user_id, auth.legacy_jwt_secret.as_bytes(), 1).unwrap();
        assert_eq!(try_session_cookie(&cookie_headers(&cross), &auth), None);

        assert_eq!(try_session_cookie(&HeaderMap::new(), &auth), None);
    }

    #[test]
    fn bearer_strategy_accepts_only_the_legacy_secret() {
        let auth = test_auth_config();
        let user_id = Uuid::new_v4();

        let good = mint_token(user_id, auth.legacy_jwt_secret.as_bytes(), 1).unwrap();
        assert_eq!(
            try_bearer_token(&bearer_headers(&good), &auth),
            Some(user_id)
        );

        let cross = mint_token(user_id, auth.session_secret.as_bytes(), 1).unwrap();
        assert_eq!(try_bearer_token(&bearer_headers(&cross), &auth), None);

        // scheme must be Bearer
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", good)).unwrap(),
        );
        assert_eq!(try_bearer_token(&headers, &auth), None);
    }

    #[test]
    fn cookie_wins_when_both_are_valid() {
        let auth = test_auth_config();
        let cookie_user = Uuid::new_v4();
        let bearer_user = Uuid::new_v4();

        let mut headers = cookie_headers(
            &mint_token(cookie_user, auth.session_secret.as_bytes(), 1).unwrap(),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!(
                "Bearer {}",
                mint_token(bearer_user, auth.legacy_jwt_secret.as_bytes(), 1).unwrap()
            ))
            .unwrap(),
        );

        assert_eq!(resolve_identity(&headers, &auth), Some(cookie_user));
    }

    #[test]
    fn invalid_cookie_falls_through_to_bearer() {
        let auth = test_auth_config();
        let bearer_user = Uuid::new_v4();

        let mut headers = cookie_headers("mangled.session.token");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!(
                "Bearer {}",
                mint_token(bearer_user, auth.legacy_jwt_secret.as_bytes(), 1).unwrap()
            ))
            .unwrap(),
        );

        assert_eq!(resolve_identity(&headers, &auth), Some(bearer_user));
    }

    #[test]
    fn no_credentials_resolve_to_none_without_error() {
        let auth = test_auth_config();
        assert_eq!(resolve_identity(&HeaderMap::new(), &auth), None);

        let headers = cookie_headers("garbage");
        assert_eq!(resolve_identity(&headers, &auth), None);
    }
}
