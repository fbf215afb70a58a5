// ABOUTME: JWT bearer-token authentication for the HTTP API
// ABOUTME: Issues and validates HS256 tokens carrying the user identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

//! # Authentication
//!
//! Bearer-token validation shared by every route group. User provisioning is
//! external; this module only issues tokens for known user ids and validates
//! incoming ones. Tokens are HS256 JWTs with the user id in `sub`.

use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Default token lifetime in hours
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// JWT claims carried by fitlog tokens
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User identifier
    sub: String,
    /// Issued-at, seconds since epoch
    iat: i64,
    /// Expiry, seconds since epoch
    exp: i64,
    /// Issuer tag
    iss: String,
}

/// Outcome of a successful authentication
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// Authenticated user
    pub user_id: Uuid,
}

/// Issues and validates bearer tokens
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthManager {
    /// Create a manager from the shared signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&["fitlog"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for the given user
    ///
    /// # Errors
    ///
    /// Returns an internal error if token encoding fails.
    pub fn generate_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            iss: "fitlog".to_owned(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a raw token string
    ///
    /// # Errors
    ///
    /// Returns an auth error if the token is expired, malformed, or carries a
    /// non-UUID subject.
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;
        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;
        Ok(AuthResult { user_id })
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an auth error when the `Authorization` header is absent, is
    /// not a bearer scheme, or carries an invalid token.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let header = headers
            .get(http::header::AUTHORIZATION)
            .ok_or_else(AppError::auth_required)?;
        let value = header
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))?;
        self.validate_token(token)
    }
}
