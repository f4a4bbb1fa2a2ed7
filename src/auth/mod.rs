//! Authentication and authorization.
//!
//! Login is a roster lookup: the staff tab holds the credential, the password
//! cell is compared in plaintext (hardening is an explicit non-goal of this
//! system). Successful login issues an HS256 bearer token carrying
//! `{staff_id, name, role}`; every protected route extracts [`AuthUser`] from
//! it, and the admin sub-router composes [`require_admin`] in front of its
//! handlers as a single role predicate.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::StaffRecord;
use crate::AppState;

pub const ADMIN_ROLE: &str = "Administrator";

/// Claim structure for issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // staff_id
    pub name: String, // staff display name
    pub role: String, // single role per staff member
    pub jti: String,  // token id
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity decoded from the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    #[schema(example = "S01")]
    pub staff_id: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "Administrator")]
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl AuthService {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn issue_token(&self, staff: &StaffRecord) -> Result<String, ServiceError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: staff.staff_id.clone(),
            name: staff.name.clone(),
            role: staff.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::seconds(self.expiry.as_secs() as i64)).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| ServiceError::AuthError(format!("invalid or expired token: {e}")))?;
        Ok(AuthUser {
            staff_id: data.claims.sub,
            name: data.claims.name,
            role: data.claims.role,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ServiceError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServiceError::AuthError("authorization token missing".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::AuthError("authorization header is not a bearer token".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.auth.verify_token(token)
    }
}

/// Role guard composed in front of the admin sub-router.
pub async fn require_admin(
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !user.is_admin() {
        return Err(ServiceError::Forbidden(
            "this operation is restricted to administrators".to_string(),
        ));
    }
    Ok(next.run(request).await)
}
