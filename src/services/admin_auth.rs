//! Single-admin authentication.
//!
//! One shared secret serves as both the login password and the token signing key.
//! `AdminAuth` is built once from configuration and handed to the login route and
//! the authentication middleware; it holds no other state.

use crate::helpers::jwt::{self, AdminClaims, TokenError};
use crate::helpers::ApiError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

pub const PASSWORD_REQUIRED: &str = "password is required";
pub const INVALID_PASSWORD: &str = "invalid password";
pub const HEADER_REQUIRED: &str = "authorization header required";
pub const INVALID_TOKEN: &str = "invalid token";
pub const TOKEN_EXPIRED: &str = "token expired";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct AdminAuth {
    secret: Arc<str>,
}

impl fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuth")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl AdminAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Exchange the admin password for a token.
    ///
    /// The password is compared with plain equality.
    pub fn login(&self, password: Option<&str>, now: DateTime<Utc>) -> Result<String, ApiError> {
        let password = match password {
            Some(password) if !password.is_empty() => password,
            _ => return Err(ApiError::validation(PASSWORD_REQUIRED)),
        };

        if password != &*self.secret {
            tracing::warn!("admin login rejected");
            return Err(ApiError::unauthorized(INVALID_PASSWORD));
        }

        let token = jwt::issue(&self.secret, now).map_err(|err| {
            tracing::error!("failed to sign admin token: {}", err);
            ApiError::internal("failed to generate token")
        })?;
        tracing::info!("admin login succeeded");

        Ok(token)
    }

    /// Admit or reject a request from the raw `Authorization` header value.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AdminClaims, ApiError> {
        let token = authorization
            .map(extract_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized(HEADER_REQUIRED))?;

        jwt::verify(token, &self.secret, now).map_err(|err| {
            tracing::debug!("admin token rejected: {}", err);
            match err {
                TokenError::Expired => ApiError::unauthorized(TOKEN_EXPIRED),
                TokenError::Malformed | TokenError::InvalidSignature | TokenError::Signing => {
                    ApiError::unauthorized(INVALID_TOKEN)
                }
            }
        })
    }
}

/// Accepts both `Bearer <token>` and a bare token.
pub fn extract_token(authorization: &str) -> &str {
    let authorization = authorization.trim_start();
    authorization
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(authorization)
        .trim()
}
