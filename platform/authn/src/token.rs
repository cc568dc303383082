use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthnError, AuthnResult};

#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    pub session_ttl_minutes: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(secret: impl Into<Vec<u8>>, session_ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            session_ttl_minutes,
        }
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn issue_token(user_id: Uuid, email: &str, config: &AuthConfig) -> AuthnResult<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.session_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: user_id,
        email: email.to_string(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
        .map_err(AuthnError::Issue)
}

pub fn decode_token(token: &str, config: &AuthConfig) -> AuthnResult<SessionClaims> {
    jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => AuthnError::TokenExpired,
            _ => AuthnError::InvalidToken(err),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::new(b"0123456789abcdef0123456789abcdef".to_vec(), 60)
    }

    #[test]
    fn issued_token_decodes_to_same_subject() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "ann@x.com", &config()).unwrap();
        let claims = decode_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ann@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "ann@x.com", &config()).unwrap();
        let other = AuthConfig::new(b"another-secret-another-secret-xx".to_vec(), 60);
        assert!(matches!(
            decode_token(&token, &other),
            Err(AuthnError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Default validation allows 60s of leeway, so expire well beyond it.
        let expired = AuthConfig::new(b"0123456789abcdef0123456789abcdef".to_vec(), -10);
        let token = issue_token(Uuid::new_v4(), "ann@x.com", &expired).unwrap();
        assert!(matches!(
            decode_token(&token, &expired),
            Err(AuthnError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            decode_token("not-a-jwt", &config()),
            Err(AuthnError::InvalidToken(_))
        ));
    }
}
