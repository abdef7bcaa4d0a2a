// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication middleware for the server.
//!
//! This module provides Axum extractors for validating session tokens
//! and enforcing authentication at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use lyceum_visa_api::{AuthenticatedActor, AuthenticationService};
use lyceum_visa_persistence::OperatorData;
use tracing::{debug, warn};

use crate::AppState;

/// Extractor for authenticated operators.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the session token via
///    `AuthenticationService::validate_session`
/// 3. Check session expiration and operator disabled status
/// 4. Return the `AuthenticatedActor` and `OperatorData`
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, the
/// token is invalid or expired, or the operator is disabled.
pub struct SessionOperator(pub AuthenticatedActor, pub OperatorData);

impl FromRequestParts<AppState> for SessionOperator {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let (actor, operator) = AuthenticationService::validate_session(&mut persistence, token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;
        drop(persistence);

        debug!(
            login_name = %operator.login_name,
            role = ?actor.role,
            "Session validated"
        );

        Ok(Self(actor, operator))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header"),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header"),
            ),
            Self::InvalidSession(reason) => (StatusCode::UNAUTHORIZED, reason),
        };

        let body = axum::Json(serde_json::json!({
            "error": true,
            "message": message,
        }));
        (status, body).into_response()
    }
}
