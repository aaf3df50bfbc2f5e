//! Signed administrator session kept in the identity cookie.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, error};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::auth::AdminUser;

/// Session lifetime when "remember me" is ticked.
pub const REMEMBER_ME_DAYS: i64 = 30;
pub const SESSION_DAYS: i64 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    token: String,
    remember_me: bool,
    user: AdminUser,
}

/// Signed-in administrator and the backend token issued at login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession {
    pub user: AdminUser,
    /// Bearer token for backend calls.
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub remember_me: bool,
}

impl AdminSession {
    pub fn new(user: AdminUser, token: String, remember_me: bool, now: DateTime<Utc>) -> Self {
        let lifetime = if remember_me {
            Duration::days(REMEMBER_ME_DAYS)
        } else {
            Duration::days(SESSION_DAYS)
        };
        Self {
            user,
            token,
            issued_at: now,
            expires_at: now + lifetime,
            remember_me,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Serializes the session as an HS256 JWT signed with `secret`.
    pub fn encode(&self, secret: &str) -> Result<String, SessionError> {
        let claims = Claims {
            sub: self.user.id.clone(),
            iat: self.issued_at.timestamp(),
            exp: self.expires_at.timestamp(),
            token: self.token.clone(),
            remember_me: self.remember_me,
            user: self.user.clone(),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?)
    }

    /// Verifies signature and expiry.
    pub fn decode(jwt: &str, secret: &str) -> Result<Self, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(
            jwt,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        let claims = data.claims;
        Ok(Self {
            user: claims.user,
            token: claims.token,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
            remember_me: claims.remember_me,
        })
    }
}

/// Available in handlers behind the route guard, which stores the decoded
/// session in the request extensions.
impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AdminSession>()
                .cloned()
                .ok_or_else(|| error::ErrorUnauthorized("Not signed in")),
        )
    }
}
