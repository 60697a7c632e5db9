// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, NewUser, Role, SignupRequest},
    repositories::{IdentityStore, StoreError},
    utils::{
        hash::{hash_password_async, verify_password_async},
        jwt::{sign_jwt, token_from_headers, verify_jwt},
    },
};

/// Emails are stored and looked up in one canonical form.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new student or admin account.
///
/// Hashes the password with Argon2 off the request thread before storing it.
/// Returns 201 Created.
pub async fn signup(
    State(identities): State<Arc<dyn IdentityStore>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let role = Role::from_is_student(payload.is_student);
    let email = normalize_email(&payload.email);
    let hashed_password = hash_password_async(payload.password).await?;

    let user = identities
        .insert(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password: hashed_password,
            role,
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => AppError::Conflict("Email already exists.".to_string()),
            other => {
                tracing::error!("Failed to register user: {:?}", other);
                AppError::from(other)
            }
        })?;

    tracing::info!(email = %user.email, %role, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account Created Successfully",
            "success": true,
        })),
    ))
}

/// Authenticates an account and returns a JWT token.
pub async fn login(
    State(identities): State<Arc<dyn IdentityStore>>,
    State(config): State<Config>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let role = Role::from_is_student(payload.is_student);
    let invalid = || AppError::AuthError("Invalid email or password.".to_string());

    let user = identities
        .find_by_email(&normalize_email(&payload.email), role)
        .await?
        .ok_or_else(invalid)?;

    let is_valid = verify_password_async(payload.password, user.password.clone()).await?;
    if !is_valid {
        return Err(invalid());
    }

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "message": "Login Successful",
        "success": true,
        "jwt_token": token,
        "user": {
            "name": user.name,
            "email": user.email,
            "isStudent": role.is_student(),
        }
    })))
}

/// Reports whether the presented token is valid, and whose it is.
pub async fn verify_token(State(config): State<Config>, headers: HeaderMap) -> Response {
    let claims = token_from_headers(&headers).and_then(|t| verify_jwt(t, &config.jwt_secret).ok());

    match claims {
        Some(claims) => Json(json!({
            "valid": true,
            "user": {
                "email": claims.sub,
                "isStudent": claims.role.is_student(),
                "name": claims.name,
            }
        }))
        .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
