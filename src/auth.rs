//! Bearer token authentication and role policy.
//!
//! Handlers take an [`AuthUser`] argument to require a valid HS256 token
//! and call [`AuthUser::require`] before any role-gated operation.

use crate::{
    error::{AppError, AppResult},
    handlers::AppState,
    models::UserRole,
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: UserRole,
    /// Expiry, seconds since the epoch
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: Uuid, role: UserRole, ttl: chrono::Duration) -> Self {
        Self {
            sub: user_id,
            role,
            exp: (chrono::Utc::now() + ttl).timestamp().max(0) as usize,
        }
    }
}

/// Sign claims with the shared secret
pub fn encode_token(claims: &Claims, secret: &str) -> AppResult<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::unauthorized("Invalid or expired token")
        })
}

/// What a role is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, edit and delete projects, samples and reports
    ManageProjects,
    /// Change sample status and submit analysis reports
    AnalyzeSamples,
    /// Register user accounts
    ManageUsers,
}

impl Capability {
    pub fn allows(self, role: UserRole) -> bool {
        match self {
            Capability::ManageProjects => matches!(role, UserRole::Researcher | UserRole::Admin),
            Capability::AnalyzeSamples => true,
            Capability::ManageUsers => role == UserRole::Admin,
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if capability.allows(self.role) {
            Ok(())
        } else {
            tracing::debug!(
                "User {} ({}) lacks {:?}",
                self.user_id,
                self.role,
                capability
            );
            Err(AppError::forbidden("Forbidden"))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let claims = decode_token(token.trim(), &state.config.auth.jwt_secret)?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
