// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::AppError,
    models::user::{Caller, Role, User},
    state::AppState,
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the account email.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Account role, which also selects the identity namespace.
    pub role: Role,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new JWT for the user.
pub fn sign_jwt(user: &User, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Reads the token from the Authorization header.
/// The `Bearer ` prefix is optional.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Axum Middleware: Authentication.
///
/// Validates the Authorization header and injects `Claims` into the request
/// extensions for the `Caller` extractor. Rejects with 401 otherwise.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_headers(req.headers())
        .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Resolves the authenticated claims to a stored account, once per request.
/// Must run behind `auth_middleware`.
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

        let user = state
            .identities
            .find_by_email(&claims.sub, claims.role)
            .await?
            .ok_or_else(|| AppError::AuthError(format!("{} not found", claims.role)))?;

        Ok(Caller::from_user(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn student() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password: String::new(),
            role: Role::Student,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sign_then_verify_round_trips_identity() {
        let token = sign_jwt(&student(), "secret", 60).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "sam@example.com");
        assert_eq!(claims.name, "Sam");
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(&student(), "secret", 60).unwrap();
        assert!(matches!(
            verify_jwt(&token, "other"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn token_prefix_is_optional() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(token_from_headers(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc"));
        assert_eq!(token_from_headers(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(token_from_headers(&headers), None);
    }
}
