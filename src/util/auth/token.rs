//! Signed identity tokens. The same HS256 mechanics back both credential
//! carriers: the first-party session cookie and the bearer tokens minted by
//! the stack this service replaced, which stay valid through the migration.
//! The two are verified against different secrets and never interchange.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub fn mint_token(user_id: Uuid, secret: &[u8], ttl_hours: i64) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = IdentityClaims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| anyhow::anyhow!(e))
}

/// Any verification failure (bad signature, expiry, garbage input) is
/// "no identity", never an error the caller has to distinguish.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<Uuid> {
    decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn mint_then_verify_returns_the_user() {
        let user_id = Uuid::new_v4();
        let token = mint_token(user_id, SECRET, 1).unwrap();
        assert_eq!(verify_token(&token, SECRET), Some(user_id));
    }

    #[test]
    fn wrong_secret_is_no_identity() {
        let token = mint_token(Uuid::new_v4(), SECRET, 1).unwrap();
        assert_eq!(verify_token(&token, b"some-other-secret"), None);
    }

    #[test]
    fn expired_token_is_no_identity() {
        // default Validation allows 60s leeway, so back-date well past it
        let token = mint_token(Uuid::new_v4(), SECRET, -2).unwrap();
        assert_eq!(verify_token(&token, SECRET), None);
    }

    #[test]
    fn garbage_is_no_identity() {
        assert_eq!(verify_token("", SECRET), None);
        assert_eq!(verify_token("not.a.jwt", SECRET), None);
        assert_eq!(verify_token("aaaa.bbbb.cccc", SECRET), None);
    }
}
